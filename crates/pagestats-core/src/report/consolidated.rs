use super::{PLATFORM_COLUMN, PlatformSamples, UNIT_COLUMN, ValueFormat, write_csv};
use crate::audit::{AuditReader, Category, Metric};
use crate::discovery::discover_pages;
use crate::stats::mean_or_zero;
use crate::{Config, Platform, Result};
use std::path::{Path, PathBuf};

/// One metric or category with a mean per configured app
#[derive(Debug, Clone, PartialEq)]
pub struct ConsolidatedRow {
    pub platform: Platform,
    pub name: String,
    /// Formatted means, aligned with `Config::apps`
    pub values: Vec<String>,
    pub unit: String,
}

impl ConsolidatedRow {
    fn record(&self) -> Vec<&str> {
        let mut record = vec![self.platform.as_str(), self.name.as_str()];
        record.extend(self.values.iter().map(String::as_str));
        record.push(&self.unit);
        record
    }
}

/// Module-wide means pivoted with one column per app
#[derive(Debug, Clone, PartialEq)]
pub struct ConsolidatedTables {
    pub header: Vec<String>,
    pub metrics: Vec<ConsolidatedRow>,
    pub scores: Vec<ConsolidatedRow>,
}

impl ConsolidatedTables {
    pub fn write(&self, metrics_path: &Path, scores_path: &Path) -> Result<()> {
        let header: Vec<&str> = self.header.iter().map(String::as_str).collect();

        write_csv(
            metrics_path,
            &header,
            self.metrics.iter().map(ConsolidatedRow::record),
        )?;
        tracing::info!(
            "Generated {} ({} rows)",
            metrics_path.display(),
            self.metrics.len()
        );

        write_csv(
            scores_path,
            &header,
            self.scores.iter().map(ConsolidatedRow::record),
        )?;
        tracing::info!(
            "Generated {} ({} rows)",
            scores_path.display(),
            self.scores.len()
        );

        Ok(())
    }
}

/// `results/<module>_metrics_means.csv` and `results/<module>_scores_means.csv`
pub fn consolidated_paths(config: &Config, module: &str) -> (PathBuf, PathBuf) {
    let stem = module.to_lowercase();
    (
        config
            .results_root
            .join(format!("{}_metrics_means.csv", stem)),
        config.results_root.join(format!("{}_scores_means.csv", stem)),
    )
}

/// Metric units in the consolidated tables carry a leading space (` ms`,
/// ` KB`), as in earlier exports of these files. An empty unit stays empty.
fn metric_unit(unit: &str) -> String {
    if unit.is_empty() {
        String::new()
    } else {
        format!(" {}", unit)
    }
}

/// Pool every run of every page per app, then average per platform and key.
///
/// Unlike the regrouped chart data, these means are taken over raw per-run
/// values, not over per-page means.
pub fn consolidate_module(config: &Config, module: &str) -> Result<ConsolidatedTables> {
    let mut pooled: Vec<PlatformSamples> = Vec::with_capacity(config.apps.len());

    for app in config.app_ids() {
        let mut samples = PlatformSamples::default();
        let pages = discover_pages(&config.data_root, module, app)?;
        if pages.is_empty() {
            tracing::info!(
                "Skipping {}: directory not found",
                config.data_root.join(module).join(app).display()
            );
        }

        for files in pages.values() {
            for platform in Platform::ALL {
                let bucket = samples.get_mut(platform);
                for path in files.get(platform) {
                    if let Some(record) = AuditReader::load_record(path) {
                        bucket.push(&record);
                    }
                }
            }
        }
        pooled.push(samples);
    }

    let mut header = vec![PLATFORM_COLUMN.to_string(), "Métrica".to_string()];
    header.extend(config.apps.iter().map(|a| a.label.clone()));
    header.push(UNIT_COLUMN.to_string());

    let mut metrics = Vec::new();
    let mut scores = Vec::new();
    for platform in Platform::ALL {
        for metric in Metric::ALL {
            let fmt = ValueFormat::for_metric(metric);
            metrics.push(ConsolidatedRow {
                platform,
                name: metric.label().to_string(),
                values: pooled
                    .iter()
                    .map(|s| fmt.format(mean_or_zero(s.get(platform).metric(metric))))
                    .collect(),
                unit: metric_unit(fmt.unit),
            });
        }
        for category in Category::ALL {
            let fmt = ValueFormat::SCORE;
            scores.push(ConsolidatedRow {
                platform,
                name: category.id().to_string(),
                values: pooled
                    .iter()
                    .map(|s| fmt.format(mean_or_zero(s.get(platform).score(category))))
                    .collect(),
                unit: fmt.unit.to_string(),
            });
        }
    }

    Ok(ConsolidatedTables {
        header,
        metrics,
        scores,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_audit(path: &Path, ttfb: f64, seo: f64) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let json = format!(
            r#"{{"audits": {{"server-response-time": {{"numericValue": {ttfb}}}}},
                "categories": {{"seo": {{"score": {seo}}}}}}}"#
        );
        fs::write(path, json).unwrap();
    }

    #[test]
    fn test_pools_runs_across_pages() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data").join("Lighthouse");
        // Page means would be 100 and 400; the pooled mean is 300.
        write_audit(&data.join("sigaa").join("home").join("1.json"), 100.0, 1.0);
        write_audit(&data.join("sigaa").join("login").join("1.json"), 300.0, 0.5);
        write_audit(&data.join("sigaa").join("login").join("2.json"), 500.0, 0.6);
        write_audit(
            &data.join("ufc-hub").join("home").join("mobile").join("1.json"),
            250.0,
            0.9,
        );

        let config = Config::default().with_roots(
            Some(dir.path().join("data")),
            Some(dir.path().join("results")),
            None,
        );
        let tables = consolidate_module(&config, "Lighthouse").unwrap();

        assert_eq!(
            tables.header,
            vec!["Plataforma", "Métrica", "UFC Hub", "SIGAA", "UFC Notícias", "Unidade"]
        );
        assert_eq!(tables.metrics.len(), 14);
        assert_eq!(tables.scores.len(), 8);

        let ttfb = &tables.metrics[0];
        assert_eq!(ttfb.platform, Platform::Desktop);
        assert_eq!(ttfb.name, "TTFB");
        assert_eq!(ttfb.values, vec!["0.00", "300.00", "0.00"]);
        assert_eq!(ttfb.unit, " ms");

        let mobile_ttfb = tables
            .metrics
            .iter()
            .find(|r| r.platform == Platform::Mobile && r.name == "TTFB")
            .unwrap();
        assert_eq!(mobile_ttfb.values, vec!["250.00", "0.00", "0.00"]);

        let seo = tables
            .scores
            .iter()
            .find(|r| r.platform == Platform::Desktop && r.name == "seo")
            .unwrap();
        assert_eq!(seo.values, vec!["0.00", "70.00", "0.00"]);
        assert_eq!(seo.unit, "%");
    }

    #[test]
    fn test_write_consolidated_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default().with_roots(
            Some(dir.path().join("data")),
            Some(dir.path().join("results")),
            None,
        );
        let tables = consolidate_module(&config, "PageSpeed").unwrap();
        let (metrics_path, scores_path) = consolidated_paths(&config, "PageSpeed");
        tables.write(&metrics_path, &scores_path).unwrap();

        assert!(metrics_path.ends_with("pagespeed_metrics_means.csv"));
        let content = fs::read_to_string(&metrics_path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Plataforma,Métrica,UFC Hub,SIGAA,UFC Notícias,Unidade"
        );
        assert_eq!(lines.next().unwrap(), "Desktop,TTFB,0.00,0.00,0.00, ms");
        assert!(content.contains("Desktop,Total Transfer Size,0.00,0.00,0.00, KB\r\n"));
        assert!(content.contains("Mobile,CLS,0.0000,0.0000,0.0000,\r\n"));
        assert!(scores_path.exists());
    }
}
