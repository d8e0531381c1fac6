/// Descriptive statistics over a numeric sample
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatSummary {
    pub mean: f64,
    pub median: f64,
    pub stdev: f64,
    pub min: f64,
    pub max: f64,
}

impl StatSummary {
    /// Summarize a sample.
    ///
    /// An empty sample yields all zeros and a single value yields a zero
    /// standard deviation; larger samples use the n - 1 denominator.
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let median = if count.is_multiple_of(2) {
            let mid = count / 2;
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[count / 2]
        };

        let stdev = if count > 1 {
            let variance =
                values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            variance.sqrt()
        } else {
            0.0
        };

        Self {
            mean,
            median,
            stdev,
            min: sorted[0],
            max: sorted[count - 1],
        }
    }

    /// Fields in CSV column order
    pub fn fields(&self) -> [f64; 5] {
        [self.mean, self.median, self.stdev, self.min, self.max]
    }
}

/// Mean of a sample, or zero when it is empty
pub fn mean_or_zero(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
