use std::io::Read;

use agnoc_frame::FrameReader;
use agnoc_protocol::{JsonCodec, Packet};

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, io_error, protocol_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_records, OutputFormat, PacketRecord};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let input = if args.hex == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|err| io_error("read stdin failed", err))?;
        buf
    } else {
        args.hex
    };

    let packets = decode_packets(&decode_hex(&input)?)?;
    let records: Vec<PacketRecord> = packets.iter().map(PacketRecord::from).collect();
    print_records(&records, format);
    Ok(SUCCESS)
}

fn decode_hex(input: &str) -> CliResult<Vec<u8>> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let compact = compact.strip_prefix("0x").unwrap_or(&compact);
    if compact.is_empty() {
        return Err(CliError::new(DATA_INVALID, "no input bytes"));
    }
    hex::decode(compact).map_err(|err| CliError::new(DATA_INVALID, format!("invalid hex input: {err}")))
}

fn decode_packets(bytes: &[u8]) -> CliResult<Vec<Packet>> {
    let codec = JsonCodec::new();
    FrameReader::new(bytes)
        .map(|frame| {
            let frame = frame.map_err(|err| frame_error("decode failed", err))?;
            Packet::from_frame(frame, &codec).map_err(|err| protocol_error("decode failed", err))
        })
        .collect()
}
