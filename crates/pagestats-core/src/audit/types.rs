use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// The subset of a Lighthouse report this tool reads
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LighthouseReport {
    #[serde(default)]
    pub audits: HashMap<String, Audit>,
    #[serde(default)]
    pub categories: HashMap<String, CategoryResult>,
}

/// A single audit result keyed by audit id
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Audit {
    #[serde(rename = "numericValue", default)]
    pub numeric_value: Option<f64>,
    #[serde(default)]
    pub details: Option<AuditDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditDetails {
    #[serde(default)]
    pub items: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryResult {
    #[serde(default)]
    pub score: Option<f64>,
}

/// Performance metrics collected per audit run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    Ttfb,
    Fcp,
    Tbt,
    Lcp,
    Cls,
    SpeedIndex,
    TotalTransferSize,
}

impl Metric {
    /// CSV row order
    pub const ALL: [Metric; 7] = [
        Metric::Ttfb,
        Metric::Fcp,
        Metric::Tbt,
        Metric::Lcp,
        Metric::Cls,
        Metric::SpeedIndex,
        Metric::TotalTransferSize,
    ];

    /// Name written in the `Métrica` column
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Ttfb => "TTFB",
            Metric::Fcp => "FCP",
            Metric::Tbt => "TBT",
            Metric::Lcp => "LCP",
            Metric::Cls => "CLS",
            Metric::SpeedIndex => "SI",
            Metric::TotalTransferSize => "Total Transfer Size",
        }
    }

    /// Lighthouse audit id holding the metric's `numericValue`
    pub fn audit_id(&self) -> Option<&'static str> {
        match self {
            Metric::Ttfb => Some("server-response-time"),
            Metric::Fcp => Some("first-contentful-paint"),
            Metric::Tbt => Some("total-blocking-time"),
            Metric::Lcp => Some("largest-contentful-paint"),
            Metric::Cls => Some("cumulative-layout-shift"),
            Metric::SpeedIndex => Some("speed-index"),
            Metric::TotalTransferSize => None,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lighthouse report categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Performance,
    Accessibility,
    BestPractices,
    Seo,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Performance,
        Category::Accessibility,
        Category::BestPractices,
        Category::Seo,
    ];

    /// Lighthouse category id, also written in the `Categoria` column
    pub fn id(&self) -> &'static str {
        match self {
            Category::Performance => "performance",
            Category::Accessibility => "accessibility",
            Category::BestPractices => "best-practices",
            Category::Seo => "seo",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Metric values extracted from one audit run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricValues {
    pub ttfb: f64,
    pub fcp: f64,
    pub tbt: f64,
    pub lcp: f64,
    pub cls: f64,
    pub speed_index: f64,
    /// Bytes
    pub total_transfer_size: f64,
}

impl MetricValues {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Ttfb => self.ttfb,
            Metric::Fcp => self.fcp,
            Metric::Tbt => self.tbt,
            Metric::Lcp => self.lcp,
            Metric::Cls => self.cls,
            Metric::SpeedIndex => self.speed_index,
            Metric::TotalTransferSize => self.total_transfer_size,
        }
    }
}

/// Category scores in [0, 1] extracted from one audit run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CategoryScores {
    pub performance: f64,
    pub accessibility: f64,
    pub best_practices: f64,
    pub seo: f64,
}

impl CategoryScores {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Performance => self.performance,
            Category::Accessibility => self.accessibility,
            Category::BestPractices => self.best_practices,
            Category::Seo => self.seo,
        }
    }
}

/// Everything the pipeline keeps from a single audit JSON file
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AuditRecord {
    pub metrics: MetricValues,
    pub scores: CategoryScores,
}
