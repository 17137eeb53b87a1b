use agnoc_protocol::{OpName, OpcodeBand};

use crate::cmd::OpcodesArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_records, OpcodeRecord, OutputFormat};

pub fn run(args: OpcodesArgs, format: OutputFormat) -> CliResult<i32> {
    let records: Vec<OpcodeRecord> = OpName::ALL
        .iter()
        .copied()
        .filter(|opname| {
            args.band
                .map_or(true, |band| band.matches(OpcodeBand::of(opname.code())))
        })
        .map(OpcodeRecord::from)
        .collect();

    print_records(&records, format);
    Ok(SUCCESS)
}
