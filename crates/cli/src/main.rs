mod commands;
mod render;
mod shell;

use clap::{Parser, Subcommand};
use commands::PageCommand;
use healthrecs_client::{HttpExtractionClient, HttpRecordsClient};
use healthrecs_core::config::{
    base_url_from_env_value, login_delay_from_env_value, recent_limit_from_env_value,
};
use healthrecs_core::constants::{DEFAULT_EXTRACT_URL, DEFAULT_RECORDS_URL, DEFAULT_STATE_DIR};
use healthrecs_core::context::AppContext;
use healthrecs_core::CoreConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "healthrecs")]
#[command(about = "HealthRecs patient record client")]
struct Cli {
    /// Records service base URL
    #[arg(long, env = "HEALTHRECS_RECORDS_URL", global = true)]
    records_url: Option<String>,
    /// Image extraction service base URL
    #[arg(long, env = "HEALTHRECS_EXTRACT_URL", global = true)]
    extract_url: Option<String>,
    /// Directory holding the local store (theme)
    #[arg(long, env = "HEALTHRECS_STATE_DIR", global = true)]
    state_dir: Option<PathBuf>,
    /// Demo account username
    #[arg(long, env = "HEALTHRECS_USER", global = true)]
    user: Option<String>,
    /// Demo account password
    #[arg(long, env = "HEALTHRECS_PASSWORD", global = true, hide_env_values = true)]
    password: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session
    Shell,
    #[command(flatten)]
    Page(PageCommand),
}

/// Resolve the core configuration from flags and environment.
///
/// # Environment Variables
/// - `HEALTHRECS_RECORDS_URL` / `HEALTHRECS_EXTRACT_URL`: service base URLs
/// - `HEALTHRECS_STATE_DIR`: local store directory (default: ".healthrecs")
/// - `HEALTHRECS_LOGIN_DELAY_MS`: simulated login latency (default: 800)
/// - `HEALTHRECS_RECENT_LIMIT`: dashboard recent patients (default: 3)
fn resolve_config(cli: &Cli) -> anyhow::Result<CoreConfig> {
    let cfg = CoreConfig::new(
        base_url_from_env_value(cli.records_url.clone(), DEFAULT_RECORDS_URL)?,
        base_url_from_env_value(cli.extract_url.clone(), DEFAULT_EXTRACT_URL)?,
        cli.state_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR)),
        login_delay_from_env_value(std::env::var("HEALTHRECS_LOGIN_DELAY_MS").ok())?,
        recent_limit_from_env_value(std::env::var("HEALTHRECS_RECENT_LIMIT").ok())?,
    )?;
    Ok(cfg)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("healthrecs=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command.as_ref() else {
        println!("Use 'healthrecs --help' for commands");
        return Ok(());
    };

    let cfg = resolve_config(&cli)?;
    let shared = Arc::new(cfg.clone());
    let records = Arc::new(HttpRecordsClient::new(shared.clone())?);
    let extraction = Arc::new(HttpExtractionClient::new(shared)?);
    let mut ctx = AppContext::new(cfg, records, extraction)?;

    let needs_login = match command {
        Commands::Shell => false,
        Commands::Page(page) => !page.is_public(),
    };
    if needs_login {
        let (Some(user), Some(password)) = (cli.user.as_deref(), cli.password.as_deref()) else {
            anyhow::bail!("credentials required: pass --user and --password or set HEALTHRECS_USER and HEALTHRECS_PASSWORD");
        };
        ctx.session_mut().login(user, password).await?;
    }

    match cli.command {
        Some(Commands::Shell) => shell::run(&mut ctx).await?,
        Some(Commands::Page(command)) => {
            if !commands::run(&mut ctx, command).await {
                std::process::exit(1);
            }
        }
        None => {}
    }

    Ok(())
}
