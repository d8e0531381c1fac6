mod consolidated;
mod format;
mod page;

pub use consolidated::{ConsolidatedRow, ConsolidatedTables, consolidate_module, consolidated_paths};
pub use format::{SCORE_SCALE, ValueFormat};
pub use page::{AppModuleReport, PageTables, generate_page_reports, summarize_page};

use crate::audit::{AuditRecord, Category, Metric};
use crate::stats::StatSummary;
use crate::{Platform, Result};
use std::collections::BTreeMap;
use std::path::Path;

pub const STAT_COLUMNS: [&str; 5] = ["Média", "Mediana", "Desvio Padrão", "Mínimo", "Máximo"];
pub const PLATFORM_COLUMN: &str = "Plataforma";
pub const UNIT_COLUMN: &str = "Unidade";

/// The two per-page tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Performance,
    Scores,
}

impl TableKind {
    pub const ALL: [TableKind; 2] = [TableKind::Performance, TableKind::Scores];

    /// File name prefix, followed by the page name and `.csv`
    pub fn file_prefix(&self) -> &'static str {
        match self {
            TableKind::Performance => "performance_",
            TableKind::Scores => "scores_",
        }
    }

    /// Header of the metric or category column
    pub fn name_column(&self) -> &'static str {
        match self {
            TableKind::Performance => "Métrica",
            TableKind::Scores => "Categoria",
        }
    }

    pub fn header(&self) -> Vec<&'static str> {
        let mut header = vec![PLATFORM_COLUMN, self.name_column()];
        header.extend(STAT_COLUMNS);
        header.push(UNIT_COLUMN);
        header
    }

    pub fn file_name(&self, page: &str) -> String {
        format!("{}{}.csv", self.file_prefix(), page)
    }
}

/// One persisted statistics row
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub platform: Platform,
    pub name: String,
    pub values: [String; 5],
    pub unit: String,
}

impl SummaryRow {
    pub fn metric(platform: Platform, metric: Metric, stats: &StatSummary) -> Self {
        let fmt = ValueFormat::for_metric(metric);
        Self {
            platform,
            name: metric.label().to_string(),
            values: fmt.format_summary(stats),
            unit: fmt.unit.to_string(),
        }
    }

    /// `stats` must already be on the percent scale
    pub fn score(platform: Platform, category: Category, stats: &StatSummary) -> Self {
        Self {
            platform,
            name: category.id().to_string(),
            values: ValueFormat::SCORE.format_summary(stats),
            unit: ValueFormat::SCORE.unit.to_string(),
        }
    }

    fn record(&self) -> Vec<&str> {
        let mut record = vec![self.platform.as_str(), self.name.as_str()];
        record.extend(self.values.iter().map(String::as_str));
        record.push(&self.unit);
        record
    }
}

/// Raw values bucketed per metric and category for one platform
#[derive(Debug, Clone, Default)]
pub struct SampleSet {
    metrics: BTreeMap<Metric, Vec<f64>>,
    scores: BTreeMap<Category, Vec<f64>>,
}

impl SampleSet {
    /// Add one run; scores are stored as percentages
    pub fn push(&mut self, record: &AuditRecord) {
        for metric in Metric::ALL {
            self.metrics
                .entry(metric)
                .or_default()
                .push(record.metrics.get(metric));
        }
        for category in Category::ALL {
            self.scores
                .entry(category)
                .or_default()
                .push(record.scores.get(category) * SCORE_SCALE);
        }
    }

    pub fn metric(&self, metric: Metric) -> &[f64] {
        self.metrics.get(&metric).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn score(&self, category: Category) -> &[f64] {
        self.scores.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Samples for both platforms
#[derive(Debug, Clone, Default)]
pub struct PlatformSamples {
    pub desktop: SampleSet,
    pub mobile: SampleSet,
}

impl PlatformSamples {
    pub fn get(&self, platform: Platform) -> &SampleSet {
        match platform {
            Platform::Desktop => &self.desktop,
            Platform::Mobile => &self.mobile,
        }
    }

    pub fn get_mut(&mut self, platform: Platform) -> &mut SampleSet {
        match platform {
            Platform::Desktop => &mut self.desktop,
            Platform::Mobile => &mut self.mobile,
        }
    }
}

/// Write a header and rows, replacing any existing file
pub(crate) fn write_csv<'a, I>(path: &Path, header: &[&str], rows: I) -> Result<()>
where
    I: IntoIterator<Item = Vec<&'a str>>,
{
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_path(path)?;
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(&row)?;
    }
    writer.flush()?;

    tracing::debug!("Wrote {}", path.display());
    Ok(())
}
