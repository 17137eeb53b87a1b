//! Typed payload variants.
//!
//! Only the payloads the session layer itself produces or inspects get a
//! struct; everything else travels as [`Payload::Generic`] (registered code,
//! shape not modelled) or [`Payload::Raw`] (unregistered code).

use bytes::Bytes;
use serde::{Deserialize, Serialize, Serializer};

use crate::id::Id;

/// Decoded payload of one packet.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// Zero-length body.
    #[default]
    Empty,
    ErrorReply(ErrorReply),
    GetTime(GetTimeRsp),
    WorkStatus(WorkStatusPush),
    MapInfo(Box<MapInfo>),
    Pose(Pose),
    VersionInfo(VersionInfo),
    AgentSetting(AgentSetting),
    BatteryInfo(BatteryInfo),
    Consumables(ConsumablesRsp),
    Wlan(WlanRsp),
    OrderList(OrderListRsp),
    QuietHours(QuietHoursSetting),
    CleanmapReport(CleanmapReport),
    Ack(ResultAck),
    EventReportRsp(EventReportRsp),
    BinDataReportRsp(BinDataReportRsp),
    Unk(UnkAck),
    AutoClean(AutoCleanReq),
    AreaClean(AreaCleanReq),
    Charge(ChargeReq),
    CleanPreference(CleanPreferenceReq),
    GlobalInfo(GlobalInfoReq),
    AllGlobalMapInfo(AllGlobalMapInfoReq),
    ManualCtrl(ManualCtrlReq),
    Navigation(NavigationReq),
    AreaList(AreaListReq),
    OrderSet(OrderSetReq),
    OrderDelete(OrderDeleteReq),
    CarpetMode(CarpetModeReq),
    SaveWaitingMap(SaveWaitingMapReq),
    WithRoomsClean(WithRoomsCleanReq),
    /// Registered opcode whose shape is not modelled here.
    Generic(serde_json::Value),
    /// Body of an unregistered opcode, kept verbatim.
    Raw(#[serde(serialize_with = "serialize_hex")] Bytes),
}

impl Payload {
    pub fn is_empty(&self) -> bool {
        matches!(self, Payload::Empty)
    }
}

fn serialize_hex<S: Serializer>(bytes: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}

macro_rules! payload_from {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for Payload {
                fn from(value: $ty) -> Self {
                    Payload::$variant(value)
                }
            }
        )+
    };
}

payload_from! {
    ErrorReply => ErrorReply,
    GetTimeRsp => GetTime,
    WorkStatusPush => WorkStatus,
    Pose => Pose,
    VersionInfo => VersionInfo,
    AgentSetting => AgentSetting,
    BatteryInfo => BatteryInfo,
    ConsumablesRsp => Consumables,
    WlanRsp => Wlan,
    OrderListRsp => OrderList,
    QuietHoursSetting => QuietHours,
    CleanmapReport => CleanmapReport,
    ResultAck => Ack,
    EventReportRsp => EventReportRsp,
    BinDataReportRsp => BinDataReportRsp,
    UnkAck => Unk,
    AutoCleanReq => AutoClean,
    AreaCleanReq => AreaClean,
    ChargeReq => Charge,
    CleanPreferenceReq => CleanPreference,
    GlobalInfoReq => GlobalInfo,
    AllGlobalMapInfoReq => AllGlobalMapInfo,
    ManualCtrlReq => ManualCtrl,
    NavigationReq => Navigation,
    AreaListReq => AreaList,
    OrderSetReq => OrderSet,
    OrderDeleteReq => OrderDelete,
    CarpetModeReq => CarpetMode,
    SaveWaitingMapReq => SaveWaitingMap,
    WithRoomsCleanReq => WithRoomsClean,
}

impl From<MapInfo> for Payload {
    fn from(value: MapInfo) -> Self {
        Payload::MapInfo(Box::new(value))
    }
}

// --- replies and pushes from the device ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReply {
    pub result: i32,
    pub error: String,
    pub opcode: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceTimeBody {
    /// Seconds since the Unix epoch.
    pub device_time: u64,
    pub device_timezone: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTimeRsp {
    pub body: DeviceTimeBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkStatusPush {
    /// Raw battery reading, 0..=200.
    pub battery: u32,
    /// Fault type.
    #[serde(rename = "type")]
    pub fault_type: u32,
    pub work_mode: u32,
    pub charge_status: bool,
    pub clean_preference: u32,
    pub clean_size: u32,
    pub clean_time: u32,
    pub fault_code: Option<u32>,
    pub water_level: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusInfo {
    pub battery_percent: u32,
    pub fault_type: u32,
    pub working_mode: u32,
    pub charge_state: bool,
    pub clean_preference: u32,
    pub clean_size: u32,
    pub clean_time: u32,
    pub water_level: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapHeadInfo {
    pub map_head_id: Id,
    pub size_x: f32,
    pub size_y: f32,
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pose {
    pub pose_x: f32,
    pub pose_y: f32,
    pub pose_phi: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanRoom {
    pub room_id: Id,
    pub room_name: String,
    pub room_x: f32,
    pub room_y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSegment {
    pub room_id: Id,
    pub room_pixel_list: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanArea {
    pub clean_area_id: Id,
    pub unk1: u32,
    pub coordinate_length: u32,
    pub coordinate_list: Vec<Point>,
}

impl CleanArea {
    /// A freshly identified polygon for an outbound area request.
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            clean_area_id: Id::generate(),
            unk1: 0,
            coordinate_length: points.len() as u32,
            coordinate_list: points,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallListInfo {
    pub clean_area_list: Vec<CleanArea>,
}

/// Full or partial map push. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapInfo {
    pub status_info: Option<StatusInfo>,
    pub map_head_info: Option<MapHeadInfo>,
    pub map_grid: Option<Vec<u8>>,
    pub robot_pose_info: Option<Pose>,
    pub robot_charge_info: Option<Pose>,
    pub spot_info: Option<Pose>,
    pub wall_list_info: Option<WallListInfo>,
    pub clean_room_list: Option<Vec<CleanRoom>>,
    pub room_segment_list: Option<Vec<RoomSegment>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub software_version: String,
    pub hardware_version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSetting {
    pub voice_mode: bool,
    pub volume: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuietHoursSetting {
    pub is_open: bool,
    /// Minutes since midnight.
    pub begin_time: u32,
    pub end_time: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanPreferenceFlags {
    pub eco_mode: Option<bool>,
    pub repeat_clean: Option<bool>,
    pub clean_broken: Option<bool>,
    pub carpet_turbo: Option<bool>,
    pub history_map: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSetting {
    pub voice: VoiceSetting,
    pub quiet_hours: QuietHoursSetting,
    pub clean_preference: CleanPreferenceFlags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatteryLevel {
    pub level: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatteryInfo {
    pub battery: BatteryLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumablesRsp {
    pub main_brush_time: u32,
    pub side_brush_time: u32,
    pub filter_time: u32,
    pub dishcloth_time: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WlanBody {
    pub ipv4: String,
    pub ssid: String,
    pub port: u16,
    pub mask: String,
    pub mac: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WlanRsp {
    pub body: WlanBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCleanInfo {
    pub map_head_id: Id,
    pub plan_id: u32,
    pub clean_mode: u32,
    pub wind_power: u32,
    pub water_level: u32,
    pub twice_clean: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEntry {
    pub order_id: Id,
    pub enable: bool,
    pub repeat: bool,
    /// Bitmask of weekdays, bit 0 = Sunday.
    pub week_day: u32,
    /// Minutes since midnight.
    pub day_time: u32,
    pub clean_info: OrderCleanInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListRsp {
    pub order_list: Option<Vec<OrderEntry>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanmapReport {
    pub clean_id: u32,
}

// --- acks and requests sent by the session ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultAck {
    pub result: i32,
}

impl ResultAck {
    pub const OK: ResultAck = ResultAck { result: 0 };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventReportRsp {
    pub result: i32,
    pub body: CleanmapReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinDataReportRsp {
    pub result: i32,
    pub clean_id: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnkAck {
    pub unk1: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoCleanReq {
    pub ctrl_value: u32,
    pub clean_type: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaCleanReq {
    pub ctrl_value: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeReq {
    pub enable: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanPreferenceReq {
    pub mode: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalInfoReq {
    pub mask: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllGlobalMapInfoReq {
    pub unk1: u32,
    pub unk2: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualCtrlReq {
    pub command: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationReq {
    pub map_head_id: Id,
    pub pose_x: f32,
    pub pose_y: f32,
    pub pose_phi: f32,
    pub ctrl_value: u32,
}

/// Area polygons, used for both area cleaning and restricted zones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaListReq {
    pub map_head_id: Id,
    pub unk1: u32,
    pub clean_area_length: u32,
    pub clean_area_list: Vec<CleanArea>,
}

impl AreaListReq {
    pub fn new(map_head_id: Id, areas: Vec<CleanArea>) -> Self {
        Self {
            map_head_id,
            unk1: 0,
            clean_area_length: areas.len() as u32,
            clean_area_list: areas,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSetReq {
    pub mode: u32,
    #[serde(flatten)]
    pub order: OrderEntry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDeleteReq {
    pub order_id: Id,
    pub mode: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarpetModeReq {
    pub carpet_turbo: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveWaitingMapReq {
    pub mode: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithRoomsCleanReq {
    pub ctrl_value: u32,
    pub clean_type: u32,
    pub room_number: u32,
    pub room_id_list: Vec<u8>,
}
