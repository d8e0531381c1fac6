//! Chart views over the per-page tables in `results/`.
//!
//! Every view reads the tables back, regroups them and renders one or more
//! grouped bar charts. A view with no data logs a line and renders nothing.

mod overall;
mod pages;
mod summary;

use crate::ChartView;
use anyhow::Result;
use console::style;
use pagestats_core::chart::{ChartSeries, GroupedBarChart};
use pagestats_core::dataset::{GroupField, GroupStat, ResultRecord, distinct};
use pagestats_core::{Config, Platform};

/// Y axis label for score-based summaries
const SCORE_AXIS: &str = "Pontuação Média";

/// Execute the chart command for one view, returning how many charts were written
pub fn execute(config: &Config, view: ChartView) -> Result<usize> {
    let rendered = match view {
        ChartView::Pages => pages::render(config)?,
        ChartView::Apps => summary::render_apps(config)?,
        ChartView::Modules => summary::render_modules(config)?,
        ChartView::Categories => overall::render_categories(config)?,
        ChartView::Performance => overall::render_performance(config)?,
    };
    tracing::debug!("{} view: {} charts", view.as_str(), rendered);
    Ok(rendered)
}

/// Execute every view in order with numbered progress lines
pub fn execute_all(config: &Config) -> Result<usize> {
    let total = ChartView::ALL.len();
    let mut rendered = 0;

    for (index, view) in ChartView::ALL.into_iter().enumerate() {
        println!(
            "{} {}...",
            style(format!("[{}/{}]", index + 1, total)).cyan().bold(),
            view.description()
        );
        rendered += execute(config, view)?;
    }

    println!("{}", style("Concluído.").green().bold());
    Ok(rendered)
}

/// One series per platform, valued by `lookup` at each x key
fn platform_series<F>(config: &Config, keys: &[String], lookup: F) -> Vec<ChartSeries>
where
    F: Fn(&str, Platform) -> GroupStat,
{
    Platform::ALL
        .into_iter()
        .map(|platform| {
            let stats: Vec<GroupStat> = keys
                .iter()
                .map(|key| lookup(key.as_str(), platform))
                .collect();
            ChartSeries::new(
                platform.as_str(),
                stats.iter().map(|s| s.mean).collect(),
                config.platform_color(platform),
            )
            .with_errors(stats.iter().map(|s| s.stdev).collect())
        })
        .collect()
}

fn with_series(chart: GroupedBarChart, series: Vec<ChartSeries>) -> GroupedBarChart {
    series.into_iter().fold(chart, GroupedBarChart::with_series)
}

/// `name (unit)`, or just the name when the unit is empty
fn axis_label(name: &str, unit: &str) -> String {
    if unit.is_empty() {
        name.to_string()
    } else {
        format!("{} ({})", name, unit)
    }
}

/// Appends ` (a, b)` listing the modules present in `records`
fn with_modules_suffix(title: String, records: &[ResultRecord]) -> String {
    let modules = distinct(records, GroupField::Module);
    if modules.is_empty() {
        title
    } else {
        format!("{} ({})", title, modules.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagestats_core::stats::StatSummary;

    fn record(module: &str) -> ResultRecord {
        ResultRecord {
            app: "sigaa".to_string(),
            module: module.to_string(),
            page: "home".to_string(),
            platform: "Desktop".to_string(),
            name: "performance".to_string(),
            stats: StatSummary::default(),
            unit: "%".to_string(),
        }
    }

    #[test]
    fn test_axis_label() {
        assert_eq!(axis_label("TTFB", "ms"), "TTFB (ms)");
        assert_eq!(axis_label("CLS", ""), "CLS");
    }

    #[test]
    fn test_modules_suffix_is_sorted_and_distinct() {
        let records = vec![record("PageSpeed"), record("Lighthouse"), record("PageSpeed")];
        assert_eq!(
            with_modules_suffix("Resumo".to_string(), &records),
            "Resumo (Lighthouse, PageSpeed)"
        );
        assert_eq!(with_modules_suffix("Resumo".to_string(), &[]), "Resumo");
    }

    #[test]
    fn test_platform_series_follows_platform_order() {
        let config = Config::default();
        let keys = vec!["a".to_string(), "b".to_string()];
        let series = platform_series(&config, &keys, |key, platform| GroupStat {
            mean: if key == "a" { 10.0 } else { 20.0 },
            stdev: if platform == Platform::Mobile { 1.0 } else { 0.0 },
            count: 1,
        });

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].label.as_deref(), Some("Desktop"));
        assert_eq!(series[0].values, vec![10.0, 20.0]);
        assert_eq!(series[0].color, config.platform_color(Platform::Desktop));
        assert_eq!(series[1].label.as_deref(), Some("Mobile"));
        assert_eq!(series[1].errors, Some(vec![1.0, 1.0]));
    }
}
