//! Platewise - auth flow and landing shell for the calorie tracker.
//!
//! Signs users in against the hosted identity provider (email/password or
//! Google), keeps their session across restarts, and makes sure every
//! authenticated user has a profile document.

use std::io;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use platewise::app::App;
use platewise::config::Config;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    info!("Platewise starting");

    // A missing publishable key fails here, before anything else runs.
    let config = Config::load()?;

    let mut app = App::new(config)?;
    app.run().await?;

    info!("Platewise shutting down");
    Ok(())
}
