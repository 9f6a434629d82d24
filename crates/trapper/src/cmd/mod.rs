use clap::{Args, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use trapper_frame::DEFAULT_MAX_PAYLOAD;
use trapper_transport::DEFAULT_PORT;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send samples to a collector.
    Send(SendArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Send(args) => send::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Collector (server or proxy) host name or address.
    #[arg(long, short = 'z', env = "TRAPPER_SERVER")]
    pub server: String,
    /// Collector trapper port.
    #[arg(long, short = 'p', env = "TRAPPER_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
    /// Monitored host name; also substitutes `-` hosts in the input file.
    #[arg(long = "host", short = 's', env = "TRAPPER_HOST")]
    pub host: Option<String>,
    /// Item key of a single sample.
    #[arg(long, short = 'k', requires_all = ["value", "host"], conflicts_with = "input_file")]
    pub key: Option<String>,
    /// Value of a single sample.
    #[arg(long, short = 'o', requires = "key", allow_hyphen_values = true)]
    pub value: Option<String>,
    /// Unix timestamp of a single sample.
    #[arg(long, requires = "key", allow_negative_numbers = true)]
    pub clock: Option<i64>,
    /// Nanoseconds of a single sample's timestamp.
    #[arg(long, requires = "key", allow_negative_numbers = true)]
    pub ns: Option<i64>,
    /// Read samples from a file, one per line (`-` for stdin).
    #[arg(long, short = 'i', required_unless_present = "key")]
    pub input_file: Option<PathBuf>,
    /// Input file lines carry a timestamp column before the value.
    #[arg(long, short = 'T', requires = "input_file")]
    pub with_timestamps: bool,
    /// Unix timestamp applied to the whole batch.
    #[arg(long, allow_negative_numbers = true)]
    pub batch_clock: Option<i64>,
    /// Nanoseconds of the batch timestamp (sent as 0 when omitted).
    #[arg(long, requires = "batch_clock", allow_negative_numbers = true)]
    pub batch_ns: Option<i64>,
    /// Connect/read/write timeout (e.g. 5s, 500ms). Blocks indefinitely when unset.
    #[arg(long, value_name = "DURATION", value_parser = parse_timeout)]
    pub timeout: Option<Duration>,
    /// Largest request or reply payload, in bytes (at most 1 GiB).
    #[arg(
        long,
        value_name = "BYTES",
        default_value_t = DEFAULT_MAX_PAYLOAD,
        value_parser = parse_payload_size
    )]
    pub max_payload_size: usize,
}

/// Upper bound for `--max-payload-size`.
pub const MAX_PAYLOAD_CEILING: usize = 1024 * 1024 * 1024;

/// Accepts a whole number of seconds (`5`, `5s`) or milliseconds (`500ms`).
fn parse_timeout(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    let unit_at = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    let (amount, unit) = input.split_at(unit_at);

    let amount: u64 = amount
        .parse()
        .map_err(|_| format!("'{input}' is not a duration such as 5s or 500ms"))?;
    let timeout = match unit {
        "" | "s" => Duration::from_secs(amount),
        "ms" => Duration::from_millis(amount),
        other => return Err(format!("unknown duration unit '{other}' (use s or ms)")),
    };

    if timeout.is_zero() {
        return Err("timeout must be greater than zero".to_string());
    }
    Ok(timeout)
}

fn parse_payload_size(input: &str) -> Result<usize, String> {
    let size: usize = input
        .trim()
        .parse()
        .map_err(|_| format!("'{input}' is not a byte count"))?;
    if size == 0 || size > MAX_PAYLOAD_CEILING {
        return Err(format!(
            "payload size must be between 1 and {MAX_PAYLOAD_CEILING} bytes"
        ));
    }
    Ok(size)
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
