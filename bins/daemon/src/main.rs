//! Folio scheduler daemon.
//!
//! Main entry point for the background snapshot jobs: loads
//! configuration, installs tracing, and runs the periodic scheduler
//! over the property's books.

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::RwLock;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_core::{Books, scheduler::Scheduler};
use folio_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;
    let timezone = config
        .property
        .tz()
        .map_err(|err| anyhow::anyhow!("Failed to parse property timezone: {err}"))?;
    info!(
        property = %config.property.name,
        %timezone,
        "starting scheduler daemon"
    );

    // The property's books; settlement operations arrive through the
    // embedding application, the daemon only keeps checkpoints rolling.
    let books = Arc::new(RwLock::new(Books::new()));

    Scheduler::new(books, &config.schedule, timezone).run().await;

    Ok(())
}
