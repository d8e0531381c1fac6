use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use pagestats_core::Config;
use pagestats_core::report::generate_page_reports;

/// Totals across every app/module pair
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessSummary {
    pub pages_written: usize,
    pub pages_skipped: usize,
}

/// Execute the process command - per-page tables for every app and module
pub fn execute(config: &Config) -> Result<ProcessSummary> {
    let pairs: Vec<(&str, &str)> = config
        .app_ids()
        .flat_map(|app| config.module_ids().map(move |module| (app, module)))
        .collect();

    let pb = ProgressBar::new(pairs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")?
            .progress_chars("=> "),
    );

    let mut summary = ProcessSummary::default();
    for (app, module) in pairs {
        pb.set_message(format!("{}/{}", module, app));

        let report = pb
            .suspend(|| generate_page_reports(config, module, app))
            .with_context(|| format!("Failed to process {}/{}", module, app))?;

        summary.pages_written += report.pages_written.len();
        summary.pages_skipped += report.pages_skipped.len();
        pb.inc(1);
    }
    pb.finish_and_clear();

    println!(
        "{} {} pages written to {}",
        style("[OK]").green(),
        summary.pages_written,
        config.results_root.display()
    );
    if summary.pages_skipped > 0 {
        println!(
            "{} {} pages had no audit files",
            style("[WARN]").yellow(),
            summary.pages_skipped
        );
    }

    Ok(summary)
}
