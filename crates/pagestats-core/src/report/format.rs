use crate::audit::Metric;
use crate::stats::StatSummary;

/// Category scores are stored as percentages
pub const SCORE_SCALE: f64 = 100.0;

/// How a value column is rendered in the CSV tables
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueFormat {
    /// Applied to the value before formatting
    pub factor: f64,
    pub decimals: usize,
    pub unit: &'static str,
}

impl ValueFormat {
    /// Scores are already scaled to percent when sampled
    pub const SCORE: ValueFormat = ValueFormat {
        factor: 1.0,
        decimals: 2,
        unit: "%",
    };

    pub fn for_metric(metric: Metric) -> Self {
        match metric {
            Metric::TotalTransferSize => ValueFormat {
                factor: 1.0 / 1024.0,
                decimals: 2,
                unit: "KB",
            },
            Metric::Cls => ValueFormat {
                factor: 1.0,
                decimals: 4,
                unit: "",
            },
            _ => ValueFormat {
                factor: 1.0,
                decimals: 2,
                unit: "ms",
            },
        }
    }

    pub fn format(&self, value: f64) -> String {
        format!("{:.*}", self.decimals, value * self.factor)
    }

    /// Mean, median, stdev, min and max, in column order
    pub fn format_summary(&self, stats: &StatSummary) -> [String; 5] {
        stats.fields().map(|v| self.format(v))
    }
}
