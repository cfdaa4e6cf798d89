//! Carhire CLI - browse the rental inventory and replay owner garage events.
//!
//! Runs the carhire-engine filter and garage logic outside the mobile app,
//! configured from the environment (and a `.env` file when present).

mod commands;
mod config;
mod error;

use crate::config::Config;
use crate::error::CliError;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "carhire <browse | options | garage <events.json> [snapshot.json]>";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "carhire_cli=info,carhire_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let output = match args.first().map(String::as_str) {
        Some("browse") => commands::browse(&config)?,
        Some("options") => commands::options()?,
        Some("garage") => {
            let events = args
                .get(1)
                .ok_or_else(|| CliError::Usage(USAGE.to_string()))?;
            let snapshot = args.get(2).map(Path::new);
            commands::garage(&config, Path::new(events), snapshot)?
        }
        _ => return Err(CliError::Usage(USAGE.to_string()).into()),
    };

    println!("{}", output);
    Ok(())
}
