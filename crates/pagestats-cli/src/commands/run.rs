use super::{charts, consolidate, process};
use anyhow::Result;
use pagestats_core::Config;

/// Execute the run command - the whole pipeline from raw audits to charts
pub fn execute(config: &Config) -> Result<()> {
    process::execute(config)?;
    consolidate::execute(config)?;
    charts::execute_all(config)?;
    Ok(())
}
