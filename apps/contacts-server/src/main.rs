//! Contacts API server
//!
//! `contacts-server run` applies pending database migrations and then serves
//! HTTP on the configured address (`0.0.0.0:8000` by default). When the
//! migrations fail the server is not started and the process exits non-zero.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use contacts_service::config::{AppConfig, LoggingConfig};
use contacts_service::lifecycle::{self, DatabaseMigrator, SchemaMigrator};
use contacts_service::ContactsServiceModule;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "contacts-server", version, about = "Contacts API server")]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Command {
    /// Apply migrations, then serve (default)
    Run,
    /// Apply migrations and exit
    Migrate,
    /// Serve without touching the schema
    Serve,
}

/// A missing `.env` is fine; an unreadable or malformed one is not
fn skip_missing_env_file<T>(loaded: dotenvy::Result<T>) -> Result<()> {
    match loaded {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e).context("failed to load .env"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    skip_missing_env_file(dotenvy::dotenv())?;

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    init_logging(&config.logging);

    let result = match cli.command.unwrap_or(Command::Run) {
        Command::Run => run(config).await,
        Command::Migrate => migrate(config).await,
        Command::Serve => {
            let module = build_module(config).await?;
            serve(&module).await
        }
    };

    if let Err(e) = &result {
        tracing::error!("contacts-server failed: {e:#}");
    }
    result
}

async fn run(config: AppConfig) -> Result<()> {
    let module = build_module(config).await?;
    lifecycle::migrate_then_serve(&module.migrator(), || serve(&module)).await
}

async fn migrate(config: AppConfig) -> Result<()> {
    let db = ContactsServiceModule::connect(&config.database).await?;
    DatabaseMigrator::new(Arc::new(db)).migrate().await
}

async fn build_module(config: AppConfig) -> Result<ContactsServiceModule> {
    let db = ContactsServiceModule::connect(&config.database).await?;
    ContactsServiceModule::init(config, db)
}

async fn serve(module: &ContactsServiceModule) -> Result<()> {
    let listener = lifecycle::bind(&module.config().server.bind).await?;
    let cancel = CancellationToken::new();
    tokio::spawn(lifecycle::shutdown_signal(cancel.clone()));
    lifecycle::serve_listener(listener, module.router(), cancel).await
}

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    if config.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}
