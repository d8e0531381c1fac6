use crate::{Error, Result};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontStyle, FontTransform};
use std::fmt;
use std::path::Path;

const CHART_SIZE: (u32, u32) = (1500, 900);
const FONT: &str = "sans-serif";
/// Gap in pixels between a bar (or its error bar) and the value printed above it
const VALUE_LABEL_GAP: i32 = 6;

/// An opaque RGB bar color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesColor(pub u8, pub u8, pub u8);

impl Default for SeriesColor {
    fn default() -> Self {
        SeriesColor(128, 128, 128)
    }
}

impl SeriesColor {
    /// Parse `#rrggbb` (the leading `#` is optional)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(SeriesColor(channel(0)?, channel(2)?, channel(4)?))
    }

    fn rgb(&self) -> RGBColor {
        RGBColor(self.0, self.1, self.2)
    }
}

/// One bar per x category, drawn side by side with the other series
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: Option<String>,
    pub values: Vec<f64>,
    /// Error-bar half heights, aligned with `values`
    pub errors: Option<Vec<f64>>,
    pub color: SeriesColor,
}

impl ChartSeries {
    pub fn new(label: impl Into<String>, values: Vec<f64>, color: SeriesColor) -> Self {
        Self {
            label: Some(label.into()),
            values,
            errors: None,
            color,
        }
    }

    pub fn with_errors(mut self, errors: Vec<f64>) -> Self {
        self.errors = Some(errors);
        self
    }
}

/// A grouped bar chart written to a PNG file
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedBarChart {
    pub title: String,
    pub y_label: String,
    pub x_labels: Vec<String>,
    pub series: Vec<ChartSeries>,
    /// Fixed y axis; derived from the data when unset
    pub y_range: Option<(f64, f64)>,
    /// Draw x labels vertically for long category names
    pub rotate_x_labels: bool,
    /// Width of one bar in x-axis units (one category slot is 1.0)
    pub bar_width: f64,
    /// Decimals in the value printed above each bar
    pub value_precision: usize,
}

impl GroupedBarChart {
    pub fn new(title: impl Into<String>, y_label: impl Into<String>, x_labels: Vec<String>) -> Self {
        Self {
            title: title.into(),
            y_label: y_label.into(),
            x_labels,
            series: Vec::new(),
            y_range: None,
            rotate_x_labels: false,
            bar_width: 0.35,
            value_precision: 1,
        }
    }

    pub fn with_series(mut self, series: ChartSeries) -> Self {
        self.series.push(series);
        self
    }

    pub fn with_y_range(mut self, min: f64, max: f64) -> Self {
        self.y_range = Some((min, max));
        self
    }

    pub fn with_rotated_labels(mut self) -> Self {
        self.rotate_x_labels = true;
        self
    }

    pub fn with_bar_width(mut self, width: f64) -> Self {
        self.bar_width = width;
        self
    }

    /// Horizontal offset of series `index` from its category center
    pub fn bar_offset(&self, index: usize) -> f64 {
        let count = self.series.len() as f64;
        (index as f64 - (count - 1.0) / 2.0) * self.bar_width
    }

    /// The y axis span: the fixed range, or zero to 115% of the tallest bar
    pub fn y_bounds(&self) -> (f64, f64) {
        if let Some(range) = self.y_range {
            return range;
        }

        let tallest = self
            .series
            .iter()
            .flat_map(|s| {
                s.values.iter().enumerate().map(|(i, v)| {
                    let error = s.errors.as_ref().and_then(|e| e.get(i)).copied();
                    v + error.unwrap_or(0.0)
                })
            })
            .fold(0.0_f64, f64::max);

        if tallest > 0.0 {
            (0.0, tallest * 1.15)
        } else {
            (0.0, 1.0)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.x_labels.is_empty() {
            return Err(Error::Chart(format!("'{}' has no categories", self.title)));
        }
        let (min, max) = self.y_bounds();
        if !(min < max) {
            return Err(Error::Chart(format!(
                "'{}' has an empty y range {}..{}",
                self.title, min, max
            )));
        }
        for series in &self.series {
            let name = series.label.as_deref().unwrap_or("unlabelled");
            if series.values.len() != self.x_labels.len() {
                return Err(Error::Chart(format!(
                    "series '{}' has {} values for {} categories",
                    name,
                    series.values.len(),
                    self.x_labels.len()
                )));
            }
            if let Some(errors) = &series.errors
                && errors.len() != series.values.len()
            {
                return Err(Error::Chart(format!(
                    "series '{}' has {} error bars for {} values",
                    name,
                    errors.len(),
                    series.values.len()
                )));
            }
        }
        Ok(())
    }

    /// Render to `out_path`, creating parent directories and replacing any
    /// existing file
    pub fn render(&self, out_path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let root = BitMapBackend::new(out_path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let categories = self.x_labels.len();
        let (y_min, y_max) = self.y_bounds();

        let mut chart = ChartBuilder::on(&root)
            .caption(&self.title, (FONT, 34))
            .margin(20)
            .x_label_area_size(if self.rotate_x_labels { 180 } else { 60 })
            .y_label_area_size(90)
            .build_cartesian_2d(-0.5..categories as f64 - 0.5, y_min..y_max)
            .map_err(chart_err)?;

        let labels = &self.x_labels;
        let label_for = |x: &f64| {
            let index = x.round();
            if index < 0.0 || (x - index).abs() > 1e-6 {
                return String::new();
            }
            labels.get(index as usize).cloned().unwrap_or_default()
        };

        let x_label_style = if self.rotate_x_labels {
            (FONT, 18)
                .into_font()
                .style(FontStyle::Bold)
                .transform(FontTransform::Rotate90)
        } else {
            (FONT, 20).into_font().style(FontStyle::Bold)
        };

        chart
            .configure_mesh()
            .disable_x_mesh()
            // Request extra ticks so every integer category center gets one;
            // half-step ticks format to an empty label.
            .x_labels(categories * 2 + 1)
            .x_label_formatter(&label_for)
            .x_label_style(x_label_style)
            .y_desc(self.y_label.as_str())
            .y_label_style((FONT, 18))
            .axis_desc_style((FONT, 20))
            .draw()
            .map_err(chart_err)?;

        let half_width = self.bar_width / 2.0;
        let value_style = TextStyle::from((FONT, 16).into_font().style(FontStyle::Bold))
            .pos(Pos::new(HPos::Center, VPos::Bottom));

        for (index, series) in self.series.iter().enumerate() {
            let color = series.color.rgb();
            let offset = self.bar_offset(index);

            let bars = series.values.iter().enumerate().map(|(i, value)| {
                let center = i as f64 + offset;
                Rectangle::new(
                    [
                        (center - half_width, y_min),
                        (center + half_width, value.clamp(y_min, y_max)),
                    ],
                    color.mix(0.9).filled(),
                )
            });
            let drawn = chart.draw_series(bars).map_err(chart_err)?;
            if let Some(label) = &series.label {
                drawn.label(label.as_str()).legend(move |(x, y)| {
                    Rectangle::new([(x, y - 6), (x + 14, y + 6)], color.filled())
                });
            }

            if let Some(errors) = &series.errors {
                let whiskers = series.values.iter().zip(errors).enumerate().map(|(i, (value, error))| {
                    ErrorBar::new_vertical(
                        i as f64 + offset,
                        (value - error).max(y_min),
                        value.clamp(y_min, y_max),
                        (value + error).min(y_max),
                        BLACK.stroke_width(2),
                        12,
                    )
                });
                chart.draw_series(whiskers).map_err(chart_err)?;
            }

            let precision = self.value_precision;
            let value_labels = series.values.iter().enumerate().map(|(i, value)| {
                let error = series.errors.as_ref().and_then(|e| e.get(i)).copied();
                let top = (value + error.unwrap_or(0.0).max(0.0)).clamp(y_min, y_max);
                EmptyElement::at((i as f64 + offset, top))
                    + Text::new(
                        format!("{:.*}", precision, value),
                        (0, -VALUE_LABEL_GAP),
                        value_style.clone(),
                    )
            });
            chart.draw_series(value_labels).map_err(chart_err)?;
        }

        if self.series.iter().any(|s| s.label.is_some()) {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .label_font((FONT, 20))
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()
                .map_err(chart_err)?;
        }

        root.present().map_err(chart_err)?;
        tracing::info!("Chart generated: {}", out_path.display());
        Ok(())
    }
}

fn chart_err<E: fmt::Display>(err: E) -> Error {
    Error::Chart(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart_with(series: usize) -> GroupedBarChart {
        let mut chart = GroupedBarChart::new("t", "y", vec!["a".into(), "b".into()]);
        for i in 0..series {
            chart = chart.with_series(ChartSeries::new(
                format!("s{}", i),
                vec![1.0, 2.0],
                SeriesColor::default(),
            ));
        }
        chart
    }

    #[test]
    fn test_hex_colors() {
        assert_eq!(SeriesColor::from_hex("#2b7fff"), Some(SeriesColor(0x2b, 0x7f, 0xff)));
        assert_eq!(SeriesColor::from_hex("EA4335"), Some(SeriesColor(0xea, 0x43, 0x35)));
        assert_eq!(SeriesColor::from_hex("#fff"), None);
        assert_eq!(SeriesColor::from_hex("#zzzzzz"), None);
    }

    #[test]
    fn test_offsets_are_centered() {
        let two = chart_with(2);
        assert!((two.bar_offset(0) + 0.175).abs() < 1e-9);
        assert!((two.bar_offset(1) - 0.175).abs() < 1e-9);

        let three = chart_with(3).with_bar_width(0.25);
        assert!((three.bar_offset(0) + 0.25).abs() < 1e-9);
        assert_eq!(three.bar_offset(1), 0.0);
        assert!((three.bar_offset(2) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_y_bounds() {
        assert_eq!(chart_with(1).with_y_range(40.0, 115.0).y_bounds(), (40.0, 115.0));

        let chart = GroupedBarChart::new("t", "y", vec!["a".into()]).with_series(
            ChartSeries::new("s", vec![100.0], SeriesColor::default()).with_errors(vec![20.0]),
        );
        let (min, max) = chart.y_bounds();
        assert_eq!(min, 0.0);
        assert!((max - 138.0).abs() < 1e-9);

        assert_eq!(chart_with(0).y_bounds(), (0.0, 1.0));
    }

    const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

    #[test]
    fn test_render_writes_and_replaces_png() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("figs").join("sigaa").join("chart.png");
        let chart = chart_with(2).with_y_range(0.0, 5.0).with_series(
            ChartSeries::new("with errors", vec![3.0, 4.0], SeriesColor(0xea, 0x43, 0x35))
                .with_errors(vec![0.5, 1.0]),
        );

        chart.render(&out).unwrap();
        let bytes = std::fs::read(&out).unwrap();
        assert!(bytes.starts_with(PNG_SIGNATURE));

        std::fs::write(&out, b"stale").unwrap();
        chart.with_rotated_labels().render(&out).unwrap();
        let bytes = std::fs::read(&out).unwrap();
        assert!(bytes.starts_with(PNG_SIGNATURE));
    }

    #[test]
    fn test_render_rejects_invalid_chart_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("figs").join("empty.png");

        let result = GroupedBarChart::new("t", "y", vec![]).render(&out);

        assert!(matches!(result, Err(Error::Chart(_))));
        assert!(!dir.path().join("figs").exists());
    }

    #[test]
    fn test_validate_rejects_misaligned_series() {
        let chart = chart_with(1).with_series(ChartSeries::new("bad", vec![1.0], SeriesColor::default()));
        assert!(matches!(chart.validate(), Err(Error::Chart(_))));

        let chart = GroupedBarChart::new("t", "y", vec!["a".into()]).with_series(
            ChartSeries::new("s", vec![1.0], SeriesColor::default()).with_errors(vec![]),
        );
        assert!(chart.validate().is_err());

        assert!(GroupedBarChart::new("t", "y", vec![]).validate().is_err());
        assert!(chart_with(2).validate().is_ok());
    }
}
