//! Specimen Rig - Two-sensor dimensional measurement
//!
//! Main entry point: runs measurement passes against a configured rig and
//! prints each pass as JSON.

use anyhow::Context;
use clap::Parser;
use specimen_rig::config::{self, RigConfig};
use specimen_rig::input::{ConsoleInput, InputProvider, ScriptedInput};
use specimen_rig::MeasurementSession;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Measure a specimen with the laser and check it against the camera.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the rig configuration TOML file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read values from a script file instead of prompting.
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Number of measurement passes to run.
    #[arg(short = 'n', long, default_value_t = 1)]
    cycles: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let rig: RigConfig = match &cli.config {
        Some(path) => config::load_config_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => config::load_config().context("loading default config")?,
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&rig.logging.filter))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Specimen Rig v{}", env!("CARGO_PKG_VERSION"));

    let mut input: Box<dyn InputProvider> = match &cli.script {
        Some(path) => Box::new(
            ScriptedInput::from_path(path)
                .with_context(|| format!("reading script {}", path.display()))?,
        ),
        None => Box::new(ConsoleInput::stdio(rig.input.max_attempts)),
    };

    let mut session =
        MeasurementSession::from_config(&rig).context("setting up the measurement rig")?;

    for pass in 1..=cli.cycles {
        let summary = session
            .run(input.as_mut())
            .with_context(|| format!("measurement pass {}", pass))?;
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}
