use std::time::Duration;

use agnoc_protocol::OpcodeBand;
use agnoc_robot::domain::DeviceModel;
use clap::{Args, Subcommand, ValueEnum};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod decode;
pub mod lookup;
pub mod opcodes;
pub mod serve;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Accept device links and print telemetry as it arrives.
    Serve(ServeArgs),
    /// List the opcode registry.
    Opcodes(OpcodesArgs),
    /// Look up one opcode by name or code.
    Lookup(LookupArgs),
    /// Decode captured frames from hex.
    Decode(DecodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Serve(args) => serve::run(args, format),
        Command::Opcodes(args) => opcodes::run(args, format),
        Command::Lookup(args) => lookup::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind.
    #[arg(env = "AGNOC_BIND", default_value = "0.0.0.0:4010")]
    pub addr: String,
    /// User id the sessions are authorized for. Packets from other users are
    /// rejected.
    #[arg(long, env = "AGNOC_USER_ID", default_value_t = 0)]
    pub user_id: u32,
    /// Model assumed for new devices (c3090, c3490, unknown).
    #[arg(long, env = "AGNOC_MODEL", default_value = "unknown")]
    pub model: DeviceModel,
    /// Drop a link after this long without a frame (e.g. 60s, 500ms).
    #[arg(long, default_value = "60s")]
    pub idle_timeout: String,
    /// Bound on each awaited device response.
    #[arg(long, default_value = "10s")]
    pub response_timeout: String,
    /// How long composite commands wait for a mode change.
    #[arg(long, default_value = "5s")]
    pub mode_timeout: String,
}

/// Opcode band filter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Band {
    Client,
    User,
    Device,
    Query,
    Agent,
    Unbanded,
}

impl Band {
    pub fn matches(self, band: OpcodeBand) -> bool {
        matches!(
            (self, band),
            (Band::Client, OpcodeBand::Client)
                | (Band::User, OpcodeBand::User)
                | (Band::Device, OpcodeBand::Device)
                | (Band::Query, OpcodeBand::Query)
                | (Band::Agent, OpcodeBand::Agent)
                | (Band::Unbanded, OpcodeBand::Unbanded)
        )
    }
}

#[derive(Args, Debug)]
pub struct OpcodesArgs {
    /// Only list opcodes in this band.
    #[arg(long)]
    pub band: Option<Band>,
}

#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Wire name (e.g. CLIENT_HEARTBEAT_REQ) or code (0x0fa1 or decimal).
    pub key: String,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Hex-encoded frames; whitespace is ignored. Use `-` to read stdin.
    pub hex: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub(crate) fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, millis) = match input.strip_suffix("ms") {
        Some(number) => (number, true),
        None => (input.strip_suffix('s').unwrap_or(input), false),
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    Ok(if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    })
}
