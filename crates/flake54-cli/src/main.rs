#![doc = include_str!("../README.md")]

mod commands;
mod config;
mod telemetry;

use std::io::{self, Write};

use clap::Parser;
use config::{CliArgs, Config};
use telemetry::init_telemetry;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = Config::try_from(args)?;

    init_telemetry()?;
    tracing::info!(
        machine_id = %config.machine_id,
        raw = config.machine_id.to_raw(),
        "resolved machine id"
    );

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    commands::run(&config, &mut out)?;
    out.flush()?;
    Ok(())
}
