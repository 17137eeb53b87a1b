use agnoc_protocol::{lookup_name, OpName};

use crate::cmd::LookupArgs;
use crate::exit::{registry_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_record, OpcodeRecord, OutputFormat};

pub fn run(args: LookupArgs, format: OutputFormat) -> CliResult<i32> {
    let opname = resolve(&args.key)?;
    print_record(&OpcodeRecord::from(opname), format);
    Ok(SUCCESS)
}

/// `0x`-prefixed hex or decimal digits are codes; anything else is a name.
fn resolve(key: &str) -> CliResult<OpName> {
    let key = key.trim();
    let code = if let Some(hex) = key.strip_prefix("0x").or_else(|| key.strip_prefix("0X")) {
        Some(u16::from_str_radix(hex, 16))
    } else if !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit()) {
        Some(key.parse())
    } else {
        None
    };

    match code {
        Some(Ok(code)) => lookup_name(code).map_err(|err| registry_error("lookup failed", err)),
        Some(Err(_)) => Err(CliError::new(USAGE, format!("invalid opcode: {key}"))),
        None => key
            .to_ascii_uppercase()
            .parse::<OpName>()
            .map_err(|err| registry_error("lookup failed", err)),
    }
}
