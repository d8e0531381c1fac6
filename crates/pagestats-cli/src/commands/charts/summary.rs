use super::{SCORE_AXIS, platform_series, with_modules_suffix, with_series};
use anyhow::Result;
use pagestats_core::Config;
use pagestats_core::audit::Category;
use pagestats_core::chart::GroupedBarChart;
use pagestats_core::dataset::{GroupField, RecordFilter, group_mean_stdev, read_records};
use pagestats_core::report::TableKind;

/// Category ids in chart order, as x keys
fn category_keys() -> Vec<String> {
    Category::ALL.iter().map(|c| c.id().to_string()).collect()
}

fn category_labels(config: &Config) -> Vec<String> {
    Category::ALL
        .iter()
        .map(|c| config.category_label(*c).to_string())
        .collect()
}

/// One quality chart per app, pooling every module
pub fn render_apps(config: &Config) -> Result<usize> {
    let mut rendered = 0;

    for app in config.app_ids() {
        let filter = RecordFilter::new().with_apps([app]);
        let records = read_records(&config.results_root, TableKind::Scores, &filter)?;
        if records.is_empty() {
            tracing::info!("No score tables found for {}", app);
            continue;
        }

        let stats = group_mean_stdev(&records, &[GroupField::Name, GroupField::Platform]);
        let series = platform_series(config, &category_keys(), |category, platform| {
            stats.get(&[category, platform.as_str()])
        });

        let title = with_modules_suffix(
            format!("Resumo Geral de Qualidade - {}", config.app_label(app)),
            &records,
        );
        let chart = GroupedBarChart::new(title, SCORE_AXIS, category_labels(config))
            .with_y_range(40.0, 115.0);

        let out_path = config.figs_root.join(app).join("resumo_qualidade.png");
        with_series(chart, series).render(&out_path)?;
        rendered += 1;
    }

    Ok(rendered)
}

/// One quality chart per app and module
pub fn render_modules(config: &Config) -> Result<usize> {
    let mut rendered = 0;

    for app in config.app_ids() {
        for module in config.module_ids() {
            let filter = RecordFilter::new().with_apps([app]).with_modules([module]);
            let records = read_records(&config.results_root, TableKind::Scores, &filter)?;
            if records.is_empty() {
                tracing::info!("No score tables found for {}/{}", app, module);
                continue;
            }

            let stats = group_mean_stdev(&records, &[GroupField::Platform, GroupField::Name]);
            let series = platform_series(config, &category_keys(), |category, platform| {
                stats.get(&[platform.as_str(), category])
            });

            let title = format!(
                "Resumo de Qualidade – {} ({})",
                config.app_label(app),
                config.module_label(module)
            );
            let chart = GroupedBarChart::new(title, SCORE_AXIS, category_labels(config))
                .with_y_range(40.0, 120.0);

            let out_path = config
                .figs_root
                .join(app)
                .join(module)
                .join("resumo_qualidade.png");
            with_series(chart, series).render(&out_path)?;
            rendered += 1;
        }
    }

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_axis_uses_configured_labels() {
        let config = Config::default();
        assert_eq!(
            category_labels(&config),
            vec!["Performance", "Acessibilidade", "Boas Práticas", "SEO"]
        );
        assert_eq!(
            category_keys(),
            vec!["performance", "accessibility", "best-practices", "seo"]
        );
    }

    #[test]
    fn test_missing_results_skip_every_app() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default().with_roots(
            None,
            Some(dir.path().join("missing")),
            Some(dir.path().join("figs")),
        );
        assert_eq!(render_apps(&config).unwrap(), 0);
        assert_eq!(render_modules(&config).unwrap(), 0);
    }
}
