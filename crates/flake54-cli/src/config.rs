use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use flake54::{Continent, MachineId};

/// Command line interface of the `flake54` binary.
///
/// The machine identity is read from flags or the environment (a `.env` file
/// is honoured). It only matters for `generate`; the other commands work on
/// IDs minted anywhere.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "flake54",
    version,
    about = "Generate, encode, decode and inspect flake54 IDs"
)]
pub struct CliArgs {
    /// Deployment region the process runs in, e.g. `fra` or `sin`.
    ///
    /// Resolved to a continent, which makes up the top 3 bits of the
    /// machine ID.
    ///
    /// Environment variable: `FLAKE_REGION`
    #[arg(long, env = "FLAKE_REGION", default_value_t = String::from("fra"), global = true)]
    pub region: String,

    /// Index of this process within its continent (0 to 63).
    ///
    /// Must be unique among all generators running on the same continent.
    ///
    /// Environment variable: `FLAKE_MACHINE_INDEX`
    #[arg(
        long,
        env = "FLAKE_MACHINE_INDEX",
        default_value_t = 0,
        allow_negative_numbers = true,
        global = true
    )]
    pub machine_index: i64,

    /// Longest time in milliseconds to wait for the clock when a millisecond
    /// runs out of sequence numbers.
    ///
    /// Environment variable: `FLAKE_SPIN_LIMIT_MS`
    #[arg(long, env = "FLAKE_SPIN_LIMIT_MS", default_value_t = 1_000, global = true)]
    pub spin_limit_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Generate new IDs, one per line.
    Generate {
        /// How many IDs to generate.
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,

        /// Print the raw integers instead of the base 54 form.
        #[arg(long, conflicts_with = "json")]
        raw: bool,

        /// Print each ID as a JSON string.
        #[arg(long)]
        json: bool,
    },
    /// Encode a raw integer ID.
    Encode {
        #[arg(allow_negative_numbers = true)]
        value: i64,
    },
    /// Decode a base 54 ID to its raw integer.
    Decode { encoded: String },
    /// Break a base 54 ID down into its fields.
    Inspect { encoded: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub machine_id: MachineId,
    pub spin_limit: Duration,
    pub command: Command,
}

impl TryFrom<CliArgs> for Config {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if Continent::from_region(&args.region).is_none() {
            bail!("FLAKE_REGION ({:?}) is not a known region", args.region);
        }

        let max_index = i64::from(MachineId::MAX_INDEX);
        if !(0..=max_index).contains(&args.machine_index) {
            bail!(
                "FLAKE_MACHINE_INDEX ({}) is out of range (0..={})",
                args.machine_index,
                max_index
            );
        }

        if args.spin_limit_ms == 0 {
            bail!("FLAKE_SPIN_LIMIT_MS must be greater than 0");
        }

        if let Command::Generate { count: 0, .. } = args.command {
            bail!("--count must be greater than 0");
        }

        let machine_id = MachineId::from_region(&args.region, args.machine_index)
            .with_context(|| format!("invalid machine id for region {:?}", args.region))?;

        Ok(Self {
            machine_id,
            spin_limit: Duration::from_millis(args.spin_limit_ms),
            command: args.command,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("flake54").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn cli_definition_is_consistent() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn resolves_machine_id_from_region() {
        let args = parse(&["--region", "arn", "--machine-index", "35", "generate"]);
        let config = Config::try_from(args).unwrap();
        assert_eq!(config.machine_id.to_raw(), 355);
        assert_eq!(config.machine_id.continent(), Some(Continent::Europe));
        assert_eq!(
            config.command,
            Command::Generate {
                count: 1,
                raw: false,
                json: false
            }
        );
    }

    #[test]
    fn global_flags_after_subcommand() {
        let args = parse(&["generate", "-n", "3", "--region", "syd", "--machine-index", "63"]);
        let config = Config::try_from(args).unwrap();
        assert_eq!(config.machine_id.continent(), Some(Continent::Oceania));
        assert_eq!(config.machine_id.index(), 63);
    }

    #[test]
    fn rejects_unknown_region() {
        let args = parse(&["--region", "xyz", "decode", "6vF"]);
        let err = Config::try_from(args).unwrap_err();
        assert!(err.to_string().contains("FLAKE_REGION"), "{err}");
    }

    #[test]
    fn rejects_out_of_range_index() {
        for index in ["64", "-1"] {
            let args = parse(&["--region", "fra", "--machine-index", index, "generate"]);
            let err = Config::try_from(args).unwrap_err();
            assert!(err.to_string().contains("FLAKE_MACHINE_INDEX"), "{err}");
        }
    }

    #[test]
    fn rejects_zero_count_and_spin_limit() {
        let args = parse(&["--region", "fra", "generate", "--count", "0"]);
        assert!(Config::try_from(args).is_err());

        let args = parse(&["--region", "fra", "--spin-limit-ms", "0", "generate"]);
        assert!(Config::try_from(args).is_err());
    }

    #[test]
    fn raw_and_json_conflict() {
        let res = CliArgs::try_parse_from(["flake54", "generate", "--raw", "--json"]);
        assert!(res.is_err());
    }

    #[test]
    fn encode_accepts_negative_values() {
        let args = parse(&["encode", "-5"]);
        assert_eq!(args.command, Command::Encode { value: -5 });
    }
}
