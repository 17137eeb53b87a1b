use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::CodecError;
use crate::opcodes::OpName;
use crate::payload::Payload;

/// Payload codec for registered opcodes.
///
/// Implementations must be total over [`OpName`] and fail explicitly on
/// malformed input; they never default a missing field or truncate.
pub trait Codec: Send + Sync {
    fn decode(&self, opname: OpName, bytes: &[u8]) -> Result<Payload, CodecError>;

    fn encode(&self, opname: OpName, payload: &Payload) -> Result<Bytes, CodecError>;
}

/// JSON bodies over the typed [`Payload`] variants.
///
/// Opcodes without a modelled shape decode to [`Payload::Generic`], or to
/// [`Payload::Empty`] when the body has no bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    pub fn new() -> Self {
        Self
    }
}

fn typed<T, F>(opname: OpName, bytes: &[u8], wrap: F) -> Result<Payload, CodecError>
where
    T: DeserializeOwned,
    F: FnOnce(T) -> Payload,
{
    serde_json::from_slice(bytes)
        .map(wrap)
        .map_err(|source| CodecError::Decode { opname, source })
}

impl Codec for JsonCodec {
    fn decode(&self, opname: OpName, bytes: &[u8]) -> Result<Payload, CodecError> {
        use OpName::*;

        match opname {
            CommonErrorReply => typed(opname, bytes, Payload::ErrorReply),
            DeviceGettimeRsp => typed(opname, bytes, Payload::GetTime),
            DeviceMapidWorkStatusPushReq => typed(opname, bytes, Payload::WorkStatus),
            DeviceMapidGetGlobalInfoRsp | DeviceMapidPushMapInfo => {
                typed(opname, bytes, |map| Payload::MapInfo(Box::new(map)))
            }
            DeviceMapidPushPositionInfo | DeviceMapidPushChargePositionInfo => {
                typed(opname, bytes, Payload::Pose)
            }
            DeviceVersionInfoUpdateReq => typed(opname, bytes, Payload::VersionInfo),
            PushDeviceAgentSettingReq => typed(opname, bytes, Payload::AgentSetting),
            PushDeviceBatteryInfoReq => typed(opname, bytes, Payload::BatteryInfo),
            DeviceMapidGetConsumablesParamRsp => typed(opname, bytes, Payload::Consumables),
            DeviceWlanInfoGettingRsp => typed(opname, bytes, Payload::Wlan),
            DeviceOrderlistGettingRsp => typed(opname, bytes, Payload::OrderList),
            UserGetDeviceQuiethoursRsp | UserSetDeviceQuiethoursReq => {
                typed(opname, bytes, Payload::QuietHours)
            }
            DeviceEventReportCleanmap | DeviceCleanmapBindataReportReq => {
                typed(opname, bytes, Payload::CleanmapReport)
            }
            DeviceVersionInfoUpdateRsp
            | PushDeviceAgentSettingRsp
            | PushDeviceBatteryInfoRsp
            | PushDevicePackageUpgradeInfoRsp
            | DeviceWorkstatusReportRsp => typed(opname, bytes, Payload::Ack),
            DeviceEventReportRsp => typed(opname, bytes, Payload::EventReportRsp),
            DeviceCleanmapBindataReportRsp => typed(opname, bytes, Payload::BinDataReportRsp),
            Unk11a4 | Unk11a7 => typed(opname, bytes, Payload::Unk),
            DeviceAutoCleanReq => typed(opname, bytes, Payload::AutoClean),
            DeviceAreaCleanReq => typed(opname, bytes, Payload::AreaClean),
            DeviceChargeReq => typed(opname, bytes, Payload::Charge),
            DeviceSetCleanPreferenceReq => typed(opname, bytes, Payload::CleanPreference),
            DeviceMapidGetGlobalInfoReq => typed(opname, bytes, Payload::GlobalInfo),
            DeviceGetAllGlobalMapInfoReq => typed(opname, bytes, Payload::AllGlobalMapInfo),
            DeviceManualCtrlReq => typed(opname, bytes, Payload::ManualCtrl),
            DeviceMapidSetNavigationReq => typed(opname, bytes, Payload::Navigation),
            DeviceMapidSetAreaCleanInfoReq | DeviceMapidSetAreaRestrictedInfoReq => {
                typed(opname, bytes, Payload::AreaList)
            }
            UserSetDeviceCleanpreferenceReq => typed(opname, bytes, Payload::CarpetMode),
            DeviceMapidSetSavewaitingmapInfoReq => typed(opname, bytes, Payload::SaveWaitingMap),
            DeviceWithroomsCleanReq => typed(opname, bytes, Payload::WithRoomsClean),
            // Setting and deleting an order share one opcode; the mode
            // field tells them apart.
            DeviceOrderlistSettingReq => {
                let value: serde_json::Value = serde_json::from_slice(bytes)
                    .map_err(|source| CodecError::Decode { opname, source })?;
                if value.get("mode").and_then(serde_json::Value::as_u64) == Some(1) {
                    serde_json::from_value(value)
                        .map(Payload::OrderDelete)
                        .map_err(|source| CodecError::Decode { opname, source })
                } else {
                    serde_json::from_value(value)
                        .map(Payload::OrderSet)
                        .map_err(|source| CodecError::Decode { opname, source })
                }
            }
            _ if bytes.is_empty() => Ok(Payload::Empty),
            _ => typed(opname, bytes, Payload::Generic),
        }
    }

    fn encode(&self, opname: OpName, payload: &Payload) -> Result<Bytes, CodecError> {
        match payload {
            Payload::Empty => Ok(Bytes::new()),
            Payload::Raw(bytes) => Ok(bytes.clone()),
            other => serde_json::to_vec(other)
                .map(Bytes::from)
                .map_err(|source| CodecError::Encode { opname, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{DeviceTimeBody, GetTimeRsp, OrderDeleteReq, ResultAck};
    use crate::Id;

    #[test]
    fn decodes_typed_get_time() {
        let payload = JsonCodec
            .decode(
                OpName::DeviceGettimeRsp,
                br#"{"body":{"deviceTime":1700000000,"deviceTimezone":2}}"#,
            )
            .unwrap();
        assert_eq!(
            payload,
            Payload::GetTime(GetTimeRsp {
                body: DeviceTimeBody {
                    device_time: 1_700_000_000,
                    device_timezone: 2,
                }
            })
        );
    }

    #[test]
    fn malformed_typed_body_fails_explicitly() {
        let err = JsonCodec
            .decode(OpName::DeviceGettimeRsp, br#"{"body":{"deviceTime":1}}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            CodecError::Decode {
                opname: OpName::DeviceGettimeRsp,
                ..
            }
        ));

        // An empty body is not a valid typed payload either.
        assert!(JsonCodec.decode(OpName::DeviceGettimeRsp, b"").is_err());
    }

    #[test]
    fn unmodelled_opcodes_decode_generically() {
        assert_eq!(
            JsonCodec.decode(OpName::ClientHeartbeatReq, b"").unwrap(),
            Payload::Empty
        );
        let generic = JsonCodec
            .decode(OpName::DeviceAutoCleanRsp, br#"{"result":0}"#)
            .unwrap();
        assert!(matches!(generic, Payload::Generic(v) if v["result"] == 0));
        assert!(JsonCodec.decode(OpName::DeviceAutoCleanRsp, b"{").is_err());
    }

    #[test]
    fn order_setting_distinguishes_delete() {
        let bytes = JsonCodec
            .encode(
                OpName::DeviceOrderlistSettingReq,
                &Payload::OrderDelete(OrderDeleteReq {
                    order_id: Id::new(4),
                    mode: 1,
                }),
            )
            .unwrap();
        let payload = JsonCodec
            .decode(OpName::DeviceOrderlistSettingReq, &bytes)
            .unwrap();
        assert!(matches!(payload, Payload::OrderDelete(req) if req.order_id == Id::new(4)));
    }

    #[test]
    fn encodes_empty_and_structured() {
        assert!(JsonCodec
            .encode(OpName::ClientHeartbeatRsp, &Payload::Empty)
            .unwrap()
            .is_empty());
        let bytes = JsonCodec
            .encode(OpName::DeviceWorkstatusReportRsp, &ResultAck::OK.into())
            .unwrap();
        assert_eq!(bytes.as_ref(), br#"{"result":0}"#);
    }
}
