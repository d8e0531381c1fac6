use anyhow::{Context, Result};
use console::style;
use pagestats_core::Config;
use pagestats_core::report::{consolidate_module, consolidated_paths};
use std::path::PathBuf;

/// Execute the consolidate command - one metrics and one scores table per module
pub fn execute(config: &Config) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    for module in config.module_ids() {
        let tables = consolidate_module(config, module)
            .with_context(|| format!("Failed to consolidate {}", module))?;
        let (metrics_path, scores_path) = consolidated_paths(config, module);
        tables.write(&metrics_path, &scores_path)?;

        println!(
            "{} {}: {}, {}",
            style("[OK]").green(),
            style(config.module_label(module)).bold(),
            metrics_path.display(),
            scores_path.display()
        );
        written.push(metrics_path);
        written.push(scores_path);
    }

    Ok(written)
}
