use super::{PlatformSamples, SummaryRow, TableKind, write_csv};
use crate::audit::{AuditReader, Category, Metric};
use crate::discovery::{PageFiles, discover_pages};
use crate::stats::StatSummary;
use crate::{Config, Platform, Result};
use std::path::{Path, PathBuf};

/// Statistics tables for one page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageTables {
    pub performance: Vec<SummaryRow>,
    pub scores: Vec<SummaryRow>,
}

impl PageTables {
    pub fn rows(&self, kind: TableKind) -> &[SummaryRow] {
        match kind {
            TableKind::Performance => &self.performance,
            TableKind::Scores => &self.scores,
        }
    }

    /// Write `performance_<page>.csv` and `scores_<page>.csv` into `dir`
    pub fn write(&self, dir: &Path, page: &str) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(2);
        for kind in TableKind::ALL {
            let path = dir.join(kind.file_name(page));
            write_csv(
                &path,
                &kind.header(),
                self.rows(kind).iter().map(SummaryRow::record),
            )?;
            written.push(path);
        }
        Ok(written)
    }
}

/// Outcome of processing one app/module pair
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppModuleReport {
    pub pages_written: Vec<String>,
    pub pages_skipped: Vec<String>,
}

/// Read every run of a page and compute per-platform statistics
pub fn summarize_page(files: &PageFiles) -> PageTables {
    let mut samples = PlatformSamples::default();
    for platform in Platform::ALL {
        let bucket = samples.get_mut(platform);
        for path in files.get(platform) {
            if let Some(record) = AuditReader::load_record(path) {
                bucket.push(&record);
            }
        }
    }

    let mut tables = PageTables::default();
    for platform in Platform::ALL {
        let bucket = samples.get(platform);
        for metric in Metric::ALL {
            let stats = StatSummary::from_values(bucket.metric(metric));
            tables
                .performance
                .push(SummaryRow::metric(platform, metric, &stats));
        }
        for category in Category::ALL {
            let stats = StatSummary::from_values(bucket.score(category));
            tables
                .scores
                .push(SummaryRow::score(platform, category, &stats));
        }
    }
    tables
}

/// Write per-page tables for every page of `app` under `module`.
///
/// A missing data directory and pages without any JSON file are logged and
/// skipped.
pub fn generate_page_reports(config: &Config, module: &str, app: &str) -> Result<AppModuleReport> {
    let pages = discover_pages(&config.data_root, module, app)?;
    let mut report = AppModuleReport::default();

    if pages.is_empty() {
        tracing::info!("Skipping {}/{}: base path not found or empty", module, app);
        return Ok(report);
    }

    let results_dir = config.results_root.join(app).join(module);
    std::fs::create_dir_all(&results_dir)?;

    for (page, files) in &pages {
        if files.is_empty() {
            tracing::info!("Skipping {}/{}/{}: no JSON files found", module, app, page);
            report.pages_skipped.push(page.clone());
            continue;
        }

        summarize_page(files).write(&results_dir, page)?;
        tracing::info!("Done: {}/{}/{}", module, app, page);
        report.pages_written.push(page.clone());
    }

    Ok(report)
}
