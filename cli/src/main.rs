//! NutriSculpt CLI
//!
//! Runs one calculator, prints the result and optionally shares it as a
//! PNG result card.

use anyhow::Result;
use clap::Parser;
use nutrisculpt_cli::{app, commands::Cli, config};
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();
    let config = config::AppConfig::load().map_err(|e| {
        error!(error = %e, "Invalid configuration");
        e
    })?;

    debug!(
        version = env!("CARGO_PKG_VERSION"),
        env = if config::AppConfig::is_production() { "production" } else { "development" },
        "Starting NutriSculpt"
    );

    let output = app::run(cli, &config).await?;
    println!("{}", output);
    Ok(())
}

/// Initialize tracing/logging on stderr; stdout carries calculator output
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config::AppConfig::is_production() {
            "nutrisculpt_cli=info,nutrisculpt_shared=info".into()
        } else {
            "nutrisculpt_cli=debug,nutrisculpt_shared=debug".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config::AppConfig::is_production() {
        // JSON logging for production
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init();
    }
}
