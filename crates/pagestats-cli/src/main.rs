use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use pagestats_cli::{ChartView, commands};
use pagestats_core::Config;
use std::io;
use std::path::PathBuf;

const BIN_NAME: &str = "pagestats";

#[derive(Parser)]
#[command(name = BIN_NAME)]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Aggregate Lighthouse and PageSpeed Insights audits into statistics tables and charts",
    long_about = "pagestats reads raw audit JSON files from data/<module>/<app>/<page>/, writes \
                  per-page statistics tables and consolidated per-module tables as CSV, and \
                  renders grouped bar charts from those tables."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON configuration file (apps, modules, colors, labels, directories)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Root of the raw audit files
    #[arg(long, global = true, env = "PAGESTATS_DATA_DIR", value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Where statistics tables are written and read back
    #[arg(long, global = true, env = "PAGESTATS_RESULTS_DIR", value_name = "DIR")]
    results_dir: Option<PathBuf>,

    /// Where chart images are written
    #[arg(long, global = true, env = "PAGESTATS_FIGS_DIR", value_name = "DIR")]
    figs_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write per-page statistics tables for every app and module
    Process,

    /// Write consolidated per-module tables comparing apps
    Consolidate,

    /// Render a single chart view from the per-page tables
    Chart {
        /// Which view to render
        #[arg(value_enum)]
        view: ChartView,
    },

    /// Render every chart view in sequence
    Charts,

    /// Process, consolidate and render charts in one go
    Run,

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    if let Commands::Completion { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, BIN_NAME, &mut io::stdout());
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref())
        .with_context(|| match &cli.config {
            Some(path) => format!("Failed to load configuration from {}", path.display()),
            None => "Failed to load default configuration".to_string(),
        })?
        .with_roots(cli.data_dir, cli.results_dir, cli.figs_dir);

    tracing::debug!(
        "Using data={} results={} figs={}",
        config.data_root.display(),
        config.results_root.display(),
        config.figs_root.display()
    );

    match cli.command {
        Commands::Process => commands::process::execute(&config).map(|_| ()),
        Commands::Consolidate => commands::consolidate::execute(&config).map(|_| ()),
        Commands::Chart { view } => commands::charts::execute(&config, view).map(|_| ()),
        Commands::Charts => commands::charts::execute_all(&config).map(|_| ()),
        Commands::Run => commands::run::execute(&config),
        Commands::Completion { .. } => Ok(()),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_directives = if verbose {
        "pagestats=debug,pagestats_cli=debug,pagestats_core=debug"
    } else {
        "pagestats=info,pagestats_cli=info,pagestats_core=info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
