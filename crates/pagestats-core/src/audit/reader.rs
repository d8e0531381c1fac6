use super::types::{AuditRecord, Category, CategoryScores, LighthouseReport, Metric, MetricValues};
use crate::Result;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Key under which PageSpeed Insights API responses nest the Lighthouse report
const PAGESPEED_ENVELOPE: &str = "lighthouseResult";

pub struct AuditReader;

impl AuditReader {
    /// Read and parse an audit report from the given path
    pub fn from_file(path: &Path) -> Result<LighthouseReport> {
        tracing::debug!("Reading audit report from: {}", path.display());

        let file = File::open(path)?;
        let value: Value = serde_json::from_reader(BufReader::new(file))?;
        Self::from_value(value)
    }

    /// Parse an audit report from a JSON string
    pub fn from_str(content: &str) -> Result<LighthouseReport> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_value(value)
    }

    fn from_value(mut value: Value) -> Result<LighthouseReport> {
        if let Some(inner) = value.get_mut(PAGESPEED_ENVELOPE).map(Value::take) {
            tracing::trace!("Unwrapping PageSpeed Insights envelope");
            value = inner;
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Extract a record from a file, or `None` when it cannot be read.
    ///
    /// Failures are logged with the file path; callers leave the run out of
    /// their aggregates.
    pub fn load_record(path: &Path) -> Option<AuditRecord> {
        match Self::from_file(path) {
            Ok(report) => Some(AuditRecord::from_report(&report)),
            Err(err) => {
                tracing::warn!("Skipping {}: {}", path.display(), err);
                None
            }
        }
    }
}

impl AuditRecord {
    pub fn from_report(report: &LighthouseReport) -> Self {
        let numeric = |metric: Metric| {
            metric
                .audit_id()
                .and_then(|id| report.audits.get(id))
                .and_then(|a| a.numeric_value)
                .unwrap_or(0.0)
        };
        let score = |category: Category| {
            report
                .categories
                .get(category.id())
                .and_then(|c| c.score)
                .unwrap_or(0.0)
        };

        Self {
            metrics: MetricValues {
                ttfb: numeric(Metric::Ttfb),
                fcp: numeric(Metric::Fcp),
                tbt: numeric(Metric::Tbt),
                lcp: numeric(Metric::Lcp),
                cls: numeric(Metric::Cls),
                speed_index: numeric(Metric::SpeedIndex),
                total_transfer_size: total_transfer_size(report),
            },
            scores: CategoryScores {
                performance: score(Category::Performance),
                accessibility: score(Category::Accessibility),
                best_practices: score(Category::BestPractices),
                seo: score(Category::Seo),
            },
        }
    }
}

/// Page weight in bytes.
///
/// Prefers the `diagnostics` total byte weight; falls back to summing the
/// transfer size of every network request.
fn total_transfer_size(report: &LighthouseReport) -> f64 {
    let byte_weight = report
        .audits
        .get("diagnostics")
        .and_then(|a| a.details.as_ref())
        .and_then(|d| d.items.first())
        .and_then(|item| item.get("totalByteWeight"))
        .and_then(Value::as_f64)
        .unwrap_or(0.0);

    if byte_weight != 0.0 {
        return byte_weight;
    }

    report
        .audits
        .get("network-requests")
        .and_then(|a| a.details.as_ref())
        .map(|d| {
            d.items
                .iter()
                .filter_map(|item| item.get("transferSize").and_then(Value::as_f64))
                .sum()
        })
        .unwrap_or(0.0)
}
