mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "agnoc", version, about = "Robot vacuum session server and protocol tools")]
struct Cli {
    /// Output format (stdout).
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", env = "AGNOC_LOG_LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    match cmd::run(cli.command, format) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use agnoc_robot::domain::DeviceModel;

    use super::*;

    #[test]
    fn parses_serve_with_defaults() {
        let cli = Cli::try_parse_from(["agnoc", "serve", "127.0.0.1:0", "--model", "c3090"])
            .expect("serve args should parse");

        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.addr, "127.0.0.1:0");
        assert_eq!(args.model, DeviceModel::C3090);
        assert_eq!(
            cmd::parse_duration(&args.response_timeout).unwrap(),
            Duration::from_secs(10)
        );
    }

    #[test]
    fn rejects_unknown_model() {
        let err = Cli::try_parse_from(["agnoc", "serve", "--model", "roomba"])
            .expect_err("unknown model should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn global_format_after_subcommand() {
        let cli = Cli::try_parse_from(["agnoc", "opcodes", "--band", "agent", "--format", "pretty"])
            .expect("opcodes args should parse");
        assert_eq!(cli.format, Some(OutputFormat::Pretty));
        assert!(matches!(cli.command, Command::Opcodes(_)));
    }
}
