//! Claim fixture generator and submitter
//!
//! # Usage
//!
//! ```bash
//! claimgen employers --count 10
//! claimgen employees --count 500
//! claimgen generate -n 200 --mix "medical_continuous=3,bonding_newborn=1" --dor
//! claimgen submit --concurrency 3
//! ```
//!
//! # Environment Variables
//!
//! * `CLAIMGEN_API_BASE_URL` - Claims API base URL (default: http://localhost:1550/v1)
//! * `CLAIMGEN_API_TOKEN` - Bearer token for the claims API
//! * `CLAIMGEN_CONCURRENCY` - Claims submitted at once (default: 3)
//! * `CLAIMGEN_MAX_CONSECUTIVE_ERRORS` - Failures before cooldown or halt (default: unset)
//! * `CLAIMGEN_COOLDOWN_SECS` - Cooldown length (default: 60)
//! * `CLAIMGEN_MAX_COOLDOWNS` - Cooldowns before halting (default: 1)
//! * `CLAIMGEN_REQUEST_TIMEOUT_SECS` - HTTP timeout (default: 30)
//! * `CLAIMGEN_DATA_DIR` - Simulation directory (default: ./data)
//! * `CLAIMGEN_TEMPLATES_DIR` - PDF template directory (default: synthesised forms)
//! * `CLAIMGEN_LOG_LEVEL` - trace, debug, info, warn, error (default: info)

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use interface_submit::commands;
use interface_submit::SubmitConfig;

#[derive(Parser)]
#[command(name = "claimgen")]
#[command(about = "Generate synthetic leave claims and submit them to the claims API", long_about = None)]
struct Cli {
    /// Simulation directory (overrides CLAIMGEN_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// PDF template directory (overrides CLAIMGEN_TEMPLATES_DIR)
    #[arg(long, global = true)]
    templates_dir: Option<PathBuf>,

    /// Log level (overrides CLAIMGEN_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the employer pool
    Employers(commands::employers::EmployersArgs),

    /// Generate the employee pool for stored employers
    Employees(commands::employees::EmployeesArgs),

    /// Generate claims, documents and optional DOR files
    Generate(commands::generate::GenerateArgs),

    /// Write DOR files for the stored pools
    Dor(commands::dor::DorArgs),

    /// Submit generated claims to the claims API
    Submit(commands::submit::SubmitArgs),

    /// List available scenarios
    Scenarios(commands::scenarios::ScenariosArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = SubmitConfig::from_env().context("failed to load configuration")?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(templates_dir) = cli.templates_dir {
        config.templates_dir = Some(templates_dir);
    }
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level;
    }

    init_tracing(&config.log_level);
    tracing::debug!(data_dir = %config.data_dir.display(), "Loaded configuration");

    match cli.command {
        Commands::Employers(args) => commands::employers::run(&config, args)?,
        Commands::Employees(args) => commands::employees::run(&config, args)?,
        Commands::Generate(args) => commands::generate::run(&config, args)?,
        Commands::Dor(args) => commands::dor::run(&config, args)?,
        Commands::Submit(args) => commands::submit::run(&config, args).await?,
        Commands::Scenarios(args) => commands::scenarios::run(args)?,
    }

    Ok(())
}

/// Initializes the tracing subscriber, preferring `RUST_LOG` when set
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
