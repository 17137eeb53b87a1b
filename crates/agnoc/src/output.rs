use std::io::IsTerminal;
use std::time::{SystemTime, UNIX_EPOCH};

use agnoc_protocol::{OpName, OpcodeBand, Packet};
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// A row the CLI can print in any [`OutputFormat`].
pub trait Record: Serialize {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;

    fn pretty(&self) -> String;
}

/// JSON prints one object per line; tables collect every record.
pub fn print_records<R: Record>(records: &[R], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            for record in records {
                println!("{}", to_json_line(record));
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(R::HEADERS.to_vec());
            for record in records {
                table.add_row(record.cells());
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for record in records {
                println!("{}", record.pretty());
            }
        }
    }
}

pub fn print_record<R: Record>(record: &R, format: OutputFormat) {
    print_records(std::slice::from_ref(record), format);
}

fn to_json_line<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
}

pub fn hex_code(code: u16) -> String {
    format!("{code:#06x}")
}

#[derive(Debug, Serialize)]
pub struct OpcodeRecord {
    pub name: &'static str,
    pub code: u16,
    pub hex: String,
    pub band: &'static str,
}

impl From<OpName> for OpcodeRecord {
    fn from(opname: OpName) -> Self {
        let code = opname.code();
        Self {
            name: opname.as_str(),
            code,
            hex: hex_code(code),
            band: OpcodeBand::of(code).as_str(),
        }
    }
}

impl Record for OpcodeRecord {
    const HEADERS: &'static [&'static str] = &["NAME", "CODE", "BAND"];

    fn cells(&self) -> Vec<String> {
        vec![self.name.to_string(), self.hex.clone(), self.band.to_string()]
    }

    fn pretty(&self) -> String {
        format!("{} {} ({})", self.hex, self.name, self.band)
    }
}

#[derive(Debug, Serialize)]
pub struct PacketRecord {
    pub opcode: u16,
    pub name: String,
    pub user_id: u32,
    pub device_id: u32,
    pub payload: Value,
}

impl From<&Packet> for PacketRecord {
    fn from(packet: &Packet) -> Self {
        Self {
            opcode: packet.opcode().code(),
            name: packet.opcode().to_string(),
            user_id: packet.user_id().value(),
            device_id: packet.device_id().value(),
            payload: serde_json::to_value(packet.payload()).unwrap_or(Value::Null),
        }
    }
}

impl Record for PacketRecord {
    const HEADERS: &'static [&'static str] = &["OPCODE", "NAME", "USER", "DEVICE", "PAYLOAD"];

    fn cells(&self) -> Vec<String> {
        vec![
            hex_code(self.opcode),
            self.name.clone(),
            self.user_id.to_string(),
            self.device_id.to_string(),
            to_json_line(&self.payload),
        ]
    }

    fn pretty(&self) -> String {
        format!(
            "{} user={} device={} payload={}",
            self.name,
            self.user_id,
            self.device_id,
            to_json_line(&self.payload)
        )
    }
}

/// One line of `serve` output: listener lifecycle or a device change.
#[derive(Debug, Serialize)]
pub struct TelemetryRecord {
    pub event: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<u32>,
    pub detail: Value,
    pub timestamp: String,
}

impl TelemetryRecord {
    pub fn new(event: &'static str, device_id: Option<u32>, detail: Value) -> Self {
        Self {
            event,
            device_id,
            detail,
            timestamp: now_unix_seconds(),
        }
    }
}

impl Record for TelemetryRecord {
    const HEADERS: &'static [&'static str] = &["EVENT", "DEVICE", "DETAIL"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.event.to_string(),
            self.device_id.map(|id| id.to_string()).unwrap_or_default(),
            to_json_line(&self.detail),
        ]
    }

    fn pretty(&self) -> String {
        let detail = to_json_line(&self.detail);
        match self.device_id {
            Some(id) => format!("[{}] {} device={id} {detail}", self.timestamp, self.event),
            None => format!("[{}] {} {detail}", self.timestamp, self.event),
        }
    }
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}

#[cfg(test)]
mod tests {
    use agnoc_protocol::{Id, Payload};

    use super::*;

    #[test]
    fn opcode_record_carries_band_and_hex() {
        let record = OpcodeRecord::from(OpName::ClientHeartbeatReq);
        assert_eq!(record.name, "CLIENT_HEARTBEAT_REQ");
        assert_eq!(record.hex, hex_code(OpName::ClientHeartbeatReq.code()));
        assert_eq!(record.cells().len(), OpcodeRecord::HEADERS.len());
    }

    #[test]
    fn packet_record_flattens_envelope() {
        let packet = Packet::new(Id::new(1), Id::new(7), OpName::ClientHeartbeatReq, Payload::Empty);
        let record = PacketRecord::from(&packet);

        assert_eq!(record.name, "CLIENT_HEARTBEAT_REQ");
        assert_eq!((record.user_id, record.device_id), (1, 7));
        assert_eq!(record.payload, Value::Null);
        assert!(record.pretty().starts_with("CLIENT_HEARTBEAT_REQ user=1 device=7"));
    }

    #[test]
    fn telemetry_json_omits_missing_device() {
        let record = TelemetryRecord::new("listening", None, serde_json::json!({"addr": "127.0.0.1:1"}));
        let line = to_json_line(&record);
        assert!(!line.contains("device_id"));
        assert!(line.contains("\"event\":\"listening\""));
    }
}
