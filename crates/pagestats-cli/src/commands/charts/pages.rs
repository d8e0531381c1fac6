use super::{axis_label, platform_series, with_series};
use anyhow::Result;
use pagestats_core::Config;
use pagestats_core::audit::{Category, Metric};
use pagestats_core::chart::GroupedBarChart;
use pagestats_core::dataset::{
    GroupField, RecordFilter, ResultRecord, distinct, group_mean_stdev, read_records,
};
use pagestats_core::report::TableKind;
use std::path::PathBuf;

const METRICS: [Metric; 6] = [
    Metric::Lcp,
    Metric::Fcp,
    Metric::Ttfb,
    Metric::Tbt,
    Metric::Cls,
    Metric::TotalTransferSize,
];

const SCORE_RANGE: (f64, f64) = (0.0, 105.0);

/// Which table a chart draws from and how it is named
enum Subject {
    Metric(Metric),
    Category(Category),
}

impl Subject {
    fn name(&self) -> &'static str {
        match self {
            Subject::Metric(metric) => metric.label(),
            Subject::Category(category) => category.id(),
        }
    }

    fn y_range(&self) -> Option<(f64, f64)> {
        match self {
            Subject::Metric(_) => None,
            Subject::Category(_) => Some(SCORE_RANGE),
        }
    }
}

fn subjects() -> impl Iterator<Item = Subject> {
    METRICS
        .into_iter()
        .map(Subject::Metric)
        .chain(Category::ALL.into_iter().map(Subject::Category))
}

/// Per-page charts for every app and module found, then per-app comparisons
/// for every module
pub fn render(config: &Config) -> Result<usize> {
    let performance = read_records(&config.results_root, TableKind::Performance, &RecordFilter::new())?;
    let scores = read_records(&config.results_root, TableKind::Scores, &RecordFilter::new())?;

    if performance.is_empty() && scores.is_empty() {
        tracing::info!(
            "Nenhum dado encontrado em {}. Nada a plotar.",
            config.results_root.display()
        );
        return Ok(0);
    }

    let records_for = |subject: &Subject| match subject {
        Subject::Metric(_) => &performance,
        Subject::Category(_) => &scores,
    };

    let mut apps = distinct(&performance, GroupField::App);
    apps.extend(distinct(&scores, GroupField::App));
    apps.sort();
    apps.dedup();

    let mut modules = distinct(&performance, GroupField::Module);
    modules.extend(distinct(&scores, GroupField::Module));
    modules.sort();
    modules.dedup();

    let mut rendered = 0;
    for app in &apps {
        for module in &modules {
            for subject in subjects() {
                if by_page(config, records_for(&subject), app, module, &subject)? {
                    rendered += 1;
                }
            }
        }
    }

    for module in &modules {
        for subject in subjects() {
            if across_apps(config, records_for(&subject), module, &subject)? {
                rendered += 1;
            }
        }
    }

    Ok(rendered)
}

fn select(records: &[ResultRecord], keep: impl Fn(&ResultRecord) -> bool) -> Vec<ResultRecord> {
    records.iter().filter(|r| keep(r)).cloned().collect()
}

fn by_page(
    config: &Config,
    records: &[ResultRecord],
    app: &str,
    module: &str,
    subject: &Subject,
) -> Result<bool> {
    let name = subject.name();
    let data = select(records, |r| r.app == app && r.module == module && r.name == name);
    if data.is_empty() {
        return Ok(false);
    }

    let stats = group_mean_stdev(&data, &[GroupField::Page, GroupField::Platform]);
    let pages = distinct(&data, GroupField::Page);
    let series = platform_series(config, &pages, |page, platform| {
        stats.get(&[page, platform.as_str()])
    });

    let (title, file_name) = match subject {
        Subject::Metric(_) => (
            format!("{} por pagina e plataforma – {} / {}", name, module, app),
            format!("{}_por_pagina.png", name),
        ),
        Subject::Category(_) => (
            format!("Pontuacoes de {} por pagina – {} / {}", name, module, app),
            format!("{}_scores_por_pagina.png", name),
        ),
    };

    let mut chart = GroupedBarChart::new(title, axis_label(name, &data[0].unit), pages)
        .with_rotated_labels();
    if let Some((min, max)) = subject.y_range() {
        chart = chart.with_y_range(min, max);
    }

    let out_path: PathBuf = config.figs_root.join(app).join(module).join(file_name);
    with_series(chart, series).render(&out_path)?;
    Ok(true)
}

fn across_apps(
    config: &Config,
    records: &[ResultRecord],
    module: &str,
    subject: &Subject,
) -> Result<bool> {
    let name = subject.name();
    let data = select(records, |r| r.module == module && r.name == name);
    if data.is_empty() {
        return Ok(false);
    }

    let stats = group_mean_stdev(&data, &[GroupField::App, GroupField::Platform]);
    let apps: Vec<String> = config
        .app_ids()
        .filter(|app| data.iter().any(|r| r.app == *app))
        .map(str::to_string)
        .collect();
    if apps.is_empty() {
        tracing::debug!("No configured app has {} data for {}", name, module);
        return Ok(false);
    }

    let series = platform_series(config, &apps, |app, platform| {
        stats.get(&[app, platform.as_str()])
    });
    let x_labels = apps
        .iter()
        .map(|app| config.app_label(app).to_string())
        .collect();

    let module_label = config.module_label(module);
    let (title, file_name) = match subject {
        Subject::Metric(_) => (
            format!("{} médio por aplicativo – {}", name, module_label),
            format!("{}_apps.png", name),
        ),
        Subject::Category(_) => (
            format!("Pontuações médias de {} por aplicativo – {}", name, module_label),
            format!("{}_scores_apps.png", name),
        ),
    };

    let mut chart = GroupedBarChart::new(title, axis_label(name, &data[0].unit), x_labels);
    if let Some((min, max)) = subject.y_range() {
        chart = chart.with_y_range(min, max);
    }

    let out_path = config.figs_root.join("comparativos").join(module).join(file_name);
    with_series(chart, series).render(&out_path)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subjects_cover_metrics_then_categories() {
        let names: Vec<&str> = subjects().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec![
                "LCP",
                "FCP",
                "TTFB",
                "TBT",
                "CLS",
                "Total Transfer Size",
                "performance",
                "accessibility",
                "best-practices",
                "seo",
            ]
        );
    }

    #[test]
    fn test_only_scores_have_fixed_range() {
        assert_eq!(Subject::Metric(Metric::Lcp).y_range(), None);
        assert_eq!(Subject::Category(Category::Seo).y_range(), Some(SCORE_RANGE));
    }

    #[test]
    fn test_no_results_renders_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default().with_roots(
            None,
            Some(dir.path().join("results")),
            Some(dir.path().join("figs")),
        );
        assert_eq!(render(&config).unwrap(), 0);
        assert!(!dir.path().join("figs").exists());
    }
}
