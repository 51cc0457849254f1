//! flagsweep CLI - stamp expiry dates onto feature flags in bulk.

mod commands;
mod config;
mod progress;
mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::Term;
use tracing_subscriber::EnvFilter;

use crate::report::OutputFormat;

#[derive(Parser)]
#[command(name = "flagsweep")]
#[command(version)]
#[command(about = "Stamp expiry-date custom properties onto feature flags")]
#[command(
    long_about = "Flagsweep enumerates every feature flag in a project, finds the ones that \
lack an expiry-date custom property, and writes one back computed from each \
flag's creation date, throttled to respect the service's rate limits."
)]
#[command(after_long_help = r#"EXAMPLES
    Stamp expiry dates on every flag in a project:
        $ flagsweep sweep web-app

    Preview without writing anything:
        $ flagsweep sweep web-app --dry-run

    Overwrite existing expiry dates, ISO layout, 90-day offset:
        $ flagsweep sweep web-app --update-existing --date-format YYYY-MM-DD --days-offset 90

    Inspect a single flag:
        $ flagsweep check web-app checkout-redesign

    Generate shell completions:
        $ flagsweep completions bash > ~/.local/share/bash-completion/completions/flagsweep

CONFIGURATION
    Flagsweep reads configuration from:
      1. ~/.config/flagsweep/config.toml (or $XDG_CONFIG_HOME/flagsweep/config.toml)
      2. ./flagsweep.toml
      3. Environment variables (FLAGSWEEP_* prefix)
      4. .env file in the current directory

ENVIRONMENT VARIABLES
    FLAGSWEEP_ACCESS_TOKEN    API access token (read and write access required)
    FLAGSWEEP_HOST            Service host (default: https://app.launchdarkly.com)
    FLAGSWEEP_PROJECT_KEY     Default project key
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enumerate a project's flags and stamp missing expiry dates
    Sweep {
        /// Project key (falls back to config or FLAGSWEEP_PROJECT_KEY)
        project: Option<String>,

        #[command(flatten)]
        sweep_opts: SweepArgs,
    },
    /// Show a single flag and whether a sweep would update it
    Check {
        /// Project key
        project: String,

        /// Flag key
        key: String,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
    /// Generate man page(s)
    Man {
        /// Output directory for man pages (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Sweep options, each falling back to the config file's value.
#[derive(Debug, Clone, clap::Args)]
struct SweepArgs {
    /// Custom property to write the expiry date into (default flag.expiry.date)
    #[arg(short = 'p', long)]
    property_name: Option<String>,

    /// Days from creation to expiry, 1-365 (default 30)
    #[arg(short = 'd', long)]
    days_offset: Option<u32>,

    /// Expiry layout: MM/DD/YYYY, MM-DD-YYYY, YYYY-MM-DD or YYYY/MM/DD
    #[arg(short = 'f', long)]
    date_format: Option<String>,

    /// Rewrite flags that already carry the property
    #[arg(short = 'U', long)]
    update_existing: bool,

    /// Dry run - compute everything, write nothing
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Concurrent write calls per batch (default 5)
    #[arg(short = 'b', long)]
    batch_size: Option<usize>,

    /// Pause between write batches, in milliseconds (default 1000)
    #[arg(long)]
    batch_delay_ms: Option<u64>,

    /// Pause between enumeration pages, in milliseconds (default 0)
    #[arg(long)]
    page_delay_ms: Option<u64>,

    /// Service host URL
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Proactive request rate in requests per second (default 5)
    #[arg(long)]
    rps: Option<u32>,

    /// Disable proactive rate limiting (may cause API throttling)
    #[arg(short = 'R', long)]
    no_rate_limit: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Structured logging only off-TTY; on a TTY progress bars take over.
    if !Term::stdout().is_term() {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new("flagsweep=info,flagsweep_cli=info"),
        };

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    // Load configuration (config files -> env vars -> defaults)
    let config = config::Config::load();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sweep {
            project,
            sweep_opts,
        } => {
            commands::sweep::handle_sweep(project, sweep_opts, &config).await?;
        }
        Commands::Check { project, key } => {
            commands::check::handle_check(&project, &key, &config).await?;
        }
        Commands::Completions { shell } => {
            commands::meta::handle_completions(shell)?;
        }
        Commands::Man { output } => {
            commands::meta::handle_man(output)?;
        }
    }

    Ok(())
}
