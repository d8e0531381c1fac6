use super::{SCORE_AXIS, platform_series, with_modules_suffix, with_series};
use anyhow::Result;
use pagestats_core::audit::Category;
use pagestats_core::chart::{ChartSeries, GroupedBarChart};
use pagestats_core::dataset::{GroupField, RecordFilter, group_mean_stdev, read_records};
use pagestats_core::report::TableKind;
use pagestats_core::{Config, Platform};

/// Category scores per app, one chart per platform
pub fn render_categories(config: &Config) -> Result<usize> {
    let records = read_records(&config.results_root, TableKind::Scores, &RecordFilter::new())?;
    if records.is_empty() {
        tracing::info!("Nenhum dado encontrado. Nada a plotar.");
        return Ok(0);
    }

    let stats = group_mean_stdev(
        &records,
        &[GroupField::Platform, GroupField::Name, GroupField::App],
    );
    let x_labels: Vec<String> = Category::ALL
        .iter()
        .map(|c| config.category_label(*c).to_string())
        .collect();

    let mut rendered = 0;
    for platform in Platform::ALL {
        let series = config.apps.iter().map(|app| {
            let group: Vec<_> = Category::ALL
                .iter()
                .map(|c| stats.get(&[platform.as_str(), c.id(), app.id.as_str()]))
                .collect();
            ChartSeries::new(
                app.label.as_str(),
                group.iter().map(|s| s.mean).collect(),
                config.app_color(&app.id),
            )
            .with_errors(group.iter().map(|s| s.stdev).collect())
        });

        let title = with_modules_suffix(
            format!("Pontuação média por categoria – {}", platform),
            &records,
        );
        let chart = GroupedBarChart::new(title, SCORE_AXIS, x_labels.clone())
            .with_bar_width(0.25)
            .with_y_range(40.0, 120.0);

        let out_path = config.figs_root.join(format!(
            "resumo_categorias_{}.png",
            platform.as_str().to_lowercase()
        ));
        with_series(chart, series.collect()).render(&out_path)?;
        rendered += 1;
    }

    Ok(rendered)
}

/// Performance score per configured app and platform, pooling every module
pub fn render_performance(config: &Config) -> Result<usize> {
    let filter = RecordFilter::new().with_names([Category::Performance.id()]);
    let records = read_records(&config.results_root, TableKind::Scores, &filter)?;
    if records.is_empty() {
        tracing::info!("Nenhum dado encontrado. Nada a plotar.");
        return Ok(0);
    }

    let stats = group_mean_stdev(&records, &[GroupField::App, GroupField::Platform]);
    let apps: Vec<String> = config.app_ids().map(str::to_string).collect();
    let series = platform_series(config, &apps, |app, platform| {
        stats.get(&[app, platform.as_str()])
    });
    let x_labels = apps
        .iter()
        .map(|app| config.app_label(app).to_string())
        .collect();

    let title = with_modules_suffix("Performance Média por Site".to_string(), &records);
    let chart =
        GroupedBarChart::new(title, SCORE_AXIS, x_labels).with_y_range(60.0, 105.0);

    let out_path = config.figs_root.join("resumo_performance_todos_apps.png");
    with_series(chart, series).render(&out_path)?;
    Ok(1)
}
