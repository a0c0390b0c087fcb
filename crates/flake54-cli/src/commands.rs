use std::io::Write;

use anyhow::Context;
use chrono::{DateTime, SecondsFormat};
use flake54::{FlakeId, LockFlakeGenerator, MonotonicClock, decode_base54, encode_base54};

use crate::config::{Command, Config};

/// Runs the configured command, writing its output to `out`.
pub fn run(config: &Config, out: &mut impl Write) -> anyhow::Result<()> {
    match &config.command {
        Command::Generate { count, raw, json } => generate(config, *count, *raw, *json, out),
        Command::Encode { value } => {
            writeln!(out, "{}", encode_base54(*value)?)?;
            Ok(())
        }
        Command::Decode { encoded } => {
            let raw = decode_base54(encoded).with_context(|| format!("decoding {encoded:?}"))?;
            writeln!(out, "{raw}")?;
            Ok(())
        }
        Command::Inspect { encoded } => {
            let id = FlakeId::decode(encoded).with_context(|| format!("decoding {encoded:?}"))?;
            inspect(id, out)
        }
    }
}

fn generate(
    config: &Config,
    count: usize,
    raw: bool,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let clock = MonotonicClock::new()?;
    let generator =
        LockFlakeGenerator::new(config.machine_id, clock).with_spin_limit(config.spin_limit);

    for _ in 0..count {
        let id = generator.try_next_id()?;
        if raw {
            writeln!(out, "{}", id.to_raw())?;
        } else if json {
            writeln!(out, "{}", id.to_json()?)?;
        } else {
            writeln!(out, "{id}")?;
        }
    }
    tracing::debug!(count, machine_id = %config.machine_id, "generated ids");
    Ok(())
}

fn inspect(id: FlakeId, out: &mut impl Write) -> anyhow::Result<()> {
    let machine_id = id.machine_id();
    let created = i64::try_from(id.unix_millis())
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .context("timestamp out of range")?;
    let continent = machine_id
        .continent()
        .map_or("unknown", |continent| continent.name());

    writeln!(out, "id:         {}", id.to_raw())?;
    writeln!(out, "encoded:    {id}")?;
    writeln!(
        out,
        "created:    {}",
        created.to_rfc3339_opts(SecondsFormat::Millis, true)
    )?;
    writeln!(out, "timestamp:  {}", id.timestamp())?;
    writeln!(out, "machine id: {}", machine_id.to_raw())?;
    writeln!(out, "continent:  {continent}")?;
    writeln!(out, "index:      {}", machine_id.index())?;
    writeln!(out, "sequence:   {}", id.sequence())?;
    Ok(())
}
