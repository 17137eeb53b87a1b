//! Static opcode registry: symbolic name ↔ 16-bit code.
//!
//! The table below is the single source of truth. It expands into the
//! [`OpName`] enum with explicit discriminants, so a duplicated variant or a
//! duplicated code fails the build.

use std::fmt;
use std::str::FromStr;

use crate::error::RegistryError;

macro_rules! opcodes {
    ($($variant:ident = $code:literal => $name:literal,)+) => {
        /// Symbolic name of a registered opcode.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u16)]
        pub enum OpName {
            $($variant = $code,)+
        }

        impl OpName {
            /// Every registered opcode, in code order.
            pub const ALL: &'static [OpName] = &[$(OpName::$variant,)+];

            /// Numeric wire code.
            pub const fn code(self) -> u16 {
                self as u16
            }

            /// Wire name, e.g. `DEVICE_GETTIME_REQ`.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(OpName::$variant => $name,)+
                }
            }

            /// Resolve a numeric code, `None` if unregistered.
            pub const fn from_code(code: u16) -> Option<Self> {
                match code {
                    $($code => Some(OpName::$variant),)+
                    _ => None,
                }
            }

            // A repeated name would leave an arm unreachable.
            #[deny(unreachable_patterns)]
            fn from_wire_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(OpName::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

opcodes! {
    CommonErrorReply = 0x0001 => "COMMON_ERROR_REPLY",
    ClientIdleTimeout = 0x0002 => "CLIENT_IDLE_TIMEOUT",
    Unk0044 = 0x0044 => "UNK_0044",
    ClientCmdBegin = 0x07D0 => "CLIENT_CMD_BEGIN",
    ClientOnlineReq = 0x07D1 => "CLIENT_ONLINE_REQ",
    ClientOnlineRsp = 0x07D2 => "CLIENT_ONLINE_RSP",
    ClientOfflineReq = 0x07D3 => "CLIENT_OFFLINE_REQ",
    ClientOfflineRsp = 0x07D4 => "CLIENT_OFFLINE_RSP",
    ClientHeartbeatReq = 0x07D5 => "CLIENT_HEARTBEAT_REQ",
    ClientHeartbeatRsp = 0x07D6 => "CLIENT_HEARTBEAT_RSP",
    ClientCmdEnd = 0x0833 => "CLIENT_CMD_END",
    UserCmdBegin = 0x0BB8 => "USER_CMD_BEGIN",
    UserLoginRsp = 0x0BBA => "USER_LOGIN_RSP",
    UserLoginReq = 0x0BBB => "USER_LOGIN_REQ",
    UserLogoutRsp = 0x0BBC => "USER_LOGOUT_RSP",
    UserLogoutReq = 0x0BBD => "USER_LOGOUT_REQ",
    UserChangePasswordRsp = 0x0BBE => "USER_CHANGE_PASSWORD_RSP",
    UserChangePasswordReq = 0x0BBF => "USER_CHANGE_PASSWORD_REQ",
    UserGetProfileRsp = 0x0BC0 => "USER_GET_PROFILE_RSP",
    UserGetProfileReq = 0x0BC1 => "USER_GET_PROFILE_REQ",
    UserModifyProfileRsp = 0x0BC2 => "USER_MODIFY_PROFILE_RSP",
    UserModifyProfileReq = 0x0BC3 => "USER_MODIFY_PROFILE_REQ",
    UserRegisterAuthRsp = 0x0BC4 => "USER_REGISTER_AUTH_RSP",
    UserRegisterAuthReq = 0x0BC5 => "USER_REGISTER_AUTH_REQ",
    UserRegisterRsp = 0x0BC6 => "USER_REGISTER_RSP",
    UserRegisterReq = 0x0BC7 => "USER_REGISTER_REQ",
    UserAddDeviceRsp = 0x0BC8 => "USER_ADD_DEVICE_RSP",
    UserAddDeviceReq = 0x0BC9 => "USER_ADD_DEVICE_REQ",
    UserDelDeviceRsp = 0x0BCA => "USER_DEL_DEVICE_RSP",
    UserDelDeviceReq = 0x0BCB => "USER_DEL_DEVICE_REQ",
    UserGetDeviceListRsp = 0x0BCC => "USER_GET_DEVICE_LIST_RSP",
    UserGetDeviceListReq = 0x0BCD => "USER_GET_DEVICE_LIST_REQ",
    UserCheckNameExistsRsp = 0x0BCE => "USER_CHECK_NAME_EXISTS_RSP",
    UserCheckNameExistsReq = 0x0BCF => "USER_CHECK_NAME_EXISTS_REQ",
    UserCheckOnlineRsp = 0x0BD0 => "USER_CHECK_ONLINE_RSP",
    UserCheckOnlineReq = 0x0BD1 => "USER_CHECK_ONLINE_REQ",
    UserModifyDeviceAliasRsp = 0x0BD2 => "USER_MODIFY_DEVICE_ALIAS_RSP",
    UserModifyDeviceAliasReq = 0x0BD3 => "USER_MODIFY_DEVICE_ALIAS_REQ",
    UserChangeDefaultDeviceRsp = 0x0BD4 => "USER_CHANGE_DEFAULT_DEVICE_RSP",
    UserChangeDefaultDeviceReq = 0x0BD5 => "USER_CHANGE_DEFAULT_DEVICE_REQ",
    UserResetPasswordRsp = 0x0BD6 => "USER_RESET_PASSWORD_RSP",
    UserResetPasswordReq = 0x0BD7 => "USER_RESET_PASSWORD_REQ",
    UserLoginByAuthcodeRsp = 0x0BD8 => "USER_LOGIN_BY_AUTHCODE_RSP",
    UserLoginByAuthcodeReq = 0x0BD9 => "USER_LOGIN_BY_AUTHCODE_REQ",
    UserRequestAuthcodeRsp = 0x0BDA => "USER_REQUEST_AUTHCODE_RSP",
    UserRequestAuthcodeReq = 0x0BDB => "USER_REQUEST_AUTHCODE_REQ",
    UserDeletingRsp = 0x0BDC => "USER_DELETING_RSP",
    UserDeletingReq = 0x0BDD => "USER_DELETING_REQ",
    UserGetDeviceOnlineStatusRsp = 0x0BDE => "USER_GET_DEVICE_ONLINE_STATUS_RSP",
    UserGetDeviceOnlineStatusReq = 0x0BDF => "USER_GET_DEVICE_ONLINE_STATUS_REQ",
    UserVerifyEmailAddressRsp = 0x0BE0 => "USER_VERIFY_EMAIL_ADDRESS_RSP",
    UserVerifyEmailAddressReq = 0x0BE1 => "USER_VERIFY_EMAIL_ADDRESS_REQ",
    UserVerifyPhoneNumberRsp = 0x0BE2 => "USER_VERIFY_PHONE_NUMBER_RSP",
    UserVerifyPhoneNumberReq = 0x0BE3 => "USER_VERIFY_PHONE_NUMBER_REQ",
    UserDeleteCleaninfoRsp = 0x0BE4 => "USER_DELETE_CLEANINFO_RSP",
    UserDeleteCleaninfoReq = 0x0BE5 => "USER_DELETE_CLEANINFO_REQ",
    UserGetAppLatestVersionRsp = 0x0BE6 => "USER_GET_APP_LATEST_VERSION_RSP",
    UserGetAppLatestVersionReq = 0x0BE7 => "USER_GET_APP_LATEST_VERSION_REQ",
    UserKickoutCmd = 0x0C12 => "USER_KICKOUT_CMD",
    UserCmdEnd = 0x0C1B => "USER_CMD_END",
    DeviceCmdBegin = 0x0FA0 => "DEVICE_CMD_BEGIN",
    DeviceRegisterReq = 0x0FA1 => "DEVICE_REGISTER_REQ",
    DeviceRegisterRsp = 0x0FA2 => "DEVICE_REGISTER_RSP",
    DeviceTimeSyncReq = 0x0FA3 => "DEVICE_TIME_SYNC_REQ",
    DeviceTimeSyncRsp = 0x0FA4 => "DEVICE_TIME_SYNC_RSP",
    DeviceSnGettingReq = 0x1005 => "DEVICE_SN_GETTING_REQ",
    DeviceSnGettingRsp = 0x1006 => "DEVICE_SN_GETTING_RSP",
    DeviceInfoGettingReq = 0x1007 => "DEVICE_INFO_GETTING_REQ",
    DeviceInfoGettingRsp = 0x1008 => "DEVICE_INFO_GETTING_RSP",
    DeviceStatusGettingReq = 0x1009 => "DEVICE_STATUS_GETTING_REQ",
    DeviceStatusGettingRsp = 0x100A => "DEVICE_STATUS_GETTING_RSP",
    DeviceWlanInfoGettingReq = 0x100B => "DEVICE_WLAN_INFO_GETTING_REQ",
    DeviceWlanInfoGettingRsp = 0x100C => "DEVICE_WLAN_INFO_GETTING_RSP",
    DeviceFaultGettingReq = 0x100D => "DEVICE_FAULT_GETTING_REQ",
    DeviceFaultGettingRsp = 0x100E => "DEVICE_FAULT_GETTING_RSP",
    DeviceGettimeReq = 0x1011 => "DEVICE_GETTIME_REQ",
    DeviceGettimeRsp = 0x1012 => "DEVICE_GETTIME_RSP",
    DeviceChargeReq = 0x1069 => "DEVICE_CHARGE_REQ",
    DeviceChargeRsp = 0x106A => "DEVICE_CHARGE_RSP",
    DeviceAreaCleanReq = 0x106B => "DEVICE_AREA_CLEAN_REQ",
    DeviceAreaCleanRsp = 0x106C => "DEVICE_AREA_CLEAN_RSP",
    DeviceAutoCleanReq = 0x106D => "DEVICE_AUTO_CLEAN_REQ",
    DeviceAutoCleanRsp = 0x106E => "DEVICE_AUTO_CLEAN_RSP",
    DeviceManualCtrlReq = 0x106F => "DEVICE_MANUAL_CTRL_REQ",
    DeviceManualCtrlRsp = 0x1070 => "DEVICE_MANUAL_CTRL_RSP",
    DeviceNavigateMoveReq = 0x1071 => "DEVICE_NAVIGATE_MOVE_REQ",
    DeviceNavigateMoveRsp = 0x1072 => "DEVICE_NAVIGATE_MOVE_RSP",
    DevicePointCleanReq = 0x1073 => "DEVICE_POINT_CLEAN_REQ",
    DevicePointCleanRsp = 0x1074 => "DEVICE_POINT_CLEAN_RSP",
    DeviceConfigResetReq = 0x1075 => "DEVICE_CONFIG_RESET_REQ",
    DeviceConfigResetRsp = 0x1076 => "DEVICE_CONFIG_RESET_RSP",
    DeviceWifiCtrlReq = 0x1077 => "DEVICE_WIFI_CTRL_REQ",
    DeviceWifiCtrlRsp = 0x1078 => "DEVICE_WIFI_CTRL_RSP",
    DeviceControlLockReq = 0x1079 => "DEVICE_CONTROL_LOCK_REQ",
    DeviceControlLockRsp = 0x107A => "DEVICE_CONTROL_LOCK_RSP",
    DeviceControlUnlockReq = 0x107B => "DEVICE_CONTROL_UNLOCK_REQ",
    DeviceControlUnlockRsp = 0x107C => "DEVICE_CONTROL_UNLOCK_RSP",
    DeviceWithroomsCleanReq = 0x1085 => "DEVICE_WITHROOMS_CLEAN_REQ",
    DeviceWithroomsCleanRsp = 0x1086 => "DEVICE_WITHROOMS_CLEAN_RSP",
    DeviceAutoEcoCleanReq = 0x1087 => "DEVICE_AUTO_ECO_CLEAN_REQ",
    DeviceAutoEcoCleanRsp = 0x1088 => "DEVICE_AUTO_ECO_CLEAN_RSP",
    DeviceOrderlistGettingReq = 0x10CD => "DEVICE_ORDERLIST_GETTING_REQ",
    DeviceOrderlistGettingRsp = 0x10CE => "DEVICE_ORDERLIST_GETTING_RSP",
    DeviceOrderlistSettingReq = 0x10CF => "DEVICE_ORDERLIST_SETTING_REQ",
    DeviceOrderlistSettingRsp = 0x10D0 => "DEVICE_ORDERLIST_SETTING_RSP",
    DeviceVwallListGettingReq = 0x10D1 => "DEVICE_VWALL_LIST_GETTING_REQ",
    DeviceVwallListGettingRsp = 0x10D2 => "DEVICE_VWALL_LIST_GETTING_RSP",
    DeviceVwallListSettingReq = 0x10D3 => "DEVICE_VWALL_LIST_SETTING_REQ",
    DeviceVwallListSettingRsp = 0x10D4 => "DEVICE_VWALL_LIST_SETTING_RSP",
    DeviceSetCleanPreferenceReq = 0x10D9 => "DEVICE_SET_CLEAN_PREFERENCE_REQ",
    DeviceSetCleanPreferenceRsp = 0x10DA => "DEVICE_SET_CLEAN_PREFERENCE_RSP",
    DeviceOrderlistModefyReq = 0x10DB => "DEVICE_ORDERLIST_MODEFY_REQ",
    DeviceOrderlistModefyRsp = 0x10DC => "DEVICE_ORDERLIST_MODEFY_RSP",
    DeviceOrderlistDeleteReq = 0x10DD => "DEVICE_ORDERLIST_DELETE_REQ",
    DeviceOrderlistDeleteRsp = 0x10DE => "DEVICE_ORDERLIST_DELETE_RSP",
    DeviceGlobalinfoGettingReq = 0x10DF => "DEVICE_GLOBALINFO_GETTING_REQ",
    DeviceGlobalinfoGettingRsp = 0x10E0 => "DEVICE_GLOBALINFO_GETTING_RSP",
    DeviceCtrlinfoSettingReq = 0x10E1 => "DEVICE_CTRLINFO_SETTING_REQ",
    DeviceCtrlinfoSettingRsp = 0x10E2 => "DEVICE_CTRLINFO_SETTING_RSP",
    DeviceZeroCalibrationReq = 0x10E7 => "DEVICE_ZERO_CALIBRATION_REQ",
    DeviceZeroCalibrationRsp = 0x10E8 => "DEVICE_ZERO_CALIBRATION_RSP",
    DeviceVirwallAllListSettingReq = 0x10E9 => "DEVICE_VIRWALL_ALL_LIST_SETTING_REQ",
    DeviceVirwallAllListSettingRsp = 0x10EA => "DEVICE_VIRWALL_ALL_LIST_SETTING_RSP",
    DeviceSeekLocationReq = 0x10EB => "DEVICE_SEEK_LOCATION_REQ",
    DeviceSeekLocationRsp = 0x10EC => "DEVICE_SEEK_LOCATION_RSP",
    DeviceAreacleanInfoGettingReq = 0x10ED => "DEVICE_AREACLEAN_INFO_GETTING_REQ",
    DeviceAreacleanInfoGettingRsp = 0x10EE => "DEVICE_AREACLEAN_INFO_GETTING_RSP",
    DeviceOrderlistSettingRoomsReq = 0x10F7 => "DEVICE_ORDERLIST_SETTING_ROOMS_REQ",
    DeviceOrderlistSettingRoomsRsp = 0x10F8 => "DEVICE_ORDERLIST_SETTING_ROOMS_RSP",
    DeviceOrderlistGettingRoomsReq = 0x10F9 => "DEVICE_ORDERLIST_GETTING_ROOMS_REQ",
    DeviceOrderlistGettingRoomsRsp = 0x10FA => "DEVICE_ORDERLIST_GETTING_ROOMS_RSP",
    DeviceMapidWorkStatusPushReq = 0x10FE => "DEVICE_MAPID_WORK_STATUS_PUSH_REQ",
    DeviceMapidSetAreaRestrictedInfoReq = 0x10FF => "DEVICE_MAPID_SET_AREA_RESTRICTED_INFO_REQ",
    DeviceMapidSetAreaRestrictedInfoRsp = 0x1100 => "DEVICE_MAPID_SET_AREA_RESTRICTED_INFO_RSP",
    DeviceMapidSetAreaCleanInfoReq = 0x1101 => "DEVICE_MAPID_SET_AREA_CLEAN_INFO_REQ",
    DeviceMapidSetAreaCleanInfoRsp = 0x1102 => "DEVICE_MAPID_SET_AREA_CLEAN_INFO_RSP",
    DeviceMapidSetNavigationReq = 0x1103 => "DEVICE_MAPID_SET_NAVIGATION_REQ",
    DeviceMapidSetNavigationRsp = 0x1104 => "DEVICE_MAPID_SET_NAVIGATION_RSP",
    DeviceMapidSetPlanParamsReq = 0x1107 => "DEVICE_MAPID_SET_PLAN_PARAMS_REQ",
    DeviceMapidSetPlanParamsRsp = 0x1108 => "DEVICE_MAPID_SET_PLAN_PARAMS_RSP",
    DeviceMapidSetNameParamsReq = 0x1109 => "DEVICE_MAPID_SET_NAME_PARAMS_REQ",
    DeviceMapidSetNameParamsRsp = 0x110A => "DEVICE_MAPID_SET_NAME_PARAMS_RSP",
    DeviceMapidSelectMapPlanReq = 0x110B => "DEVICE_MAPID_SELECT_MAP_PLAN_REQ",
    DeviceMapidSelectMapPlanRsp = 0x110C => "DEVICE_MAPID_SELECT_MAP_PLAN_RSP",
    DeviceMapidGetConsumablesParamReq = 0x1113 => "DEVICE_MAPID_GET_CONSUMABLES_PARAM_REQ",
    DeviceMapidGetConsumablesParamRsp = 0x1114 => "DEVICE_MAPID_GET_CONSUMABLES_PARAM_RSP",
    DeviceMapidSetArrangeroomInfoReq = 0x1117 => "DEVICE_MAPID_SET_ARRANGEROOM_INFO_REQ",
    DeviceMapidSetArrangeroomInfoRsp = 0x1118 => "DEVICE_MAPID_SET_ARRANGEROOM_INFO_RSP",
    DeviceMapidSetSavewaitingmapInfoReq = 0x111B => "DEVICE_MAPID_SET_SAVEWAITINGMAP_INFO_REQ",
    DeviceMapidSetSavewaitingmapInfoRsp = 0x111C => "DEVICE_MAPID_SET_SAVEWAITINGMAP_INFO_RSP",
    DeviceMapidSetForceRebuildInfoReq = 0x111D => "DEVICE_MAPID_SET_FORCE_REBUILD_INFO_REQ",
    DeviceMapidSetForceRebuildInfoRsp = 0x111E => "DEVICE_MAPID_SET_FORCE_REBUILD_INFO_RSP",
    DeviceGetAllGlobalMapInfoReq = 0x111F => "DEVICE_GET_ALL_GLOBAL_MAP_INFO_REQ",
    DeviceGetAllGlobalMapInfoRsp = 0x1120 => "DEVICE_GET_ALL_GLOBAL_MAP_INFO_RSP",
    DeviceMapidIntoModeidleInfoReq = 0x1121 => "DEVICE_MAPID_INTO_MODEIDLE_INFO_REQ",
    DeviceMapidIntoModeidleInfoRsp = 0x1122 => "DEVICE_MAPID_INTO_MODEIDLE_INFO_RSP",
    DeviceMapCtrlReq = 0x1131 => "DEVICE_MAP_CTRL_REQ",
    DeviceMapLidarCtrlReq = 0x1132 => "DEVICE_MAP_LIDAR_CTRL_REQ",
    DeviceMapLidarCtrlRsp = 0x1133 => "DEVICE_MAP_LIDAR_CTRL_RSP",
    DeviceMapLocalData = 0x1134 => "DEVICE_MAP_LOCAL_DATA",
    DeviceMapPathData = 0x1135 => "DEVICE_MAP_PATH_DATA",
    DeviceMapPositionData = 0x1136 => "DEVICE_MAP_POSITION_DATA",
    DeviceMapNavigateData = 0x1137 => "DEVICE_MAP_NAVIGATE_DATA",
    DeviceMapCoverHistory = 0x1138 => "DEVICE_MAP_COVER_HISTORY",
    DeviceMapCoverPoseData = 0x113A => "DEVICE_MAP_COVER_POSE_DATA",
    DeviceMapGlobalDataReq = 0x113B => "DEVICE_MAP_GLOBAL_DATA_REQ",
    DeviceMapGlobalDataRsp = 0x113C => "DEVICE_MAP_GLOBAL_DATA_RSP",
    DeviceMapLocalDataExt = 0x113D => "DEVICE_MAP_LOCAL_DATA_EXT",
    DeviceMapCoverPathDataExt = 0x113F => "DEVICE_MAP_COVER_PATH_DATA_EXT",
    DeviceMapidGetGlobalInfoReq = 0x1162 => "DEVICE_MAPID_GET_GLOBAL_INFO_REQ",
    DeviceMapidGetGlobalInfoRsp = 0x1163 => "DEVICE_MAPID_GET_GLOBAL_INFO_RSP",
    DeviceMapidPushMapInfo = 0x1164 => "DEVICE_MAPID_PUSH_MAP_INFO",
    DeviceMapidPushPositionInfo = 0x1166 => "DEVICE_MAPID_PUSH_POSITION_INFO",
    DeviceMapidPushChargePositionInfo = 0x1168 => "DEVICE_MAPID_PUSH_CHARGE_POSITION_INFO",
    DeviceMapidPushHasWaitingBeSaved = 0x1169 => "DEVICE_MAPID_PUSH_HAS_WAITING_BE_SAVED",
    DeviceMapidPushAllMemoryMapInfo = 0x116A => "DEVICE_MAPID_PUSH_ALL_MEMORY_MAP_INFO",
    DeviceEventReportBegin = 0x1194 => "DEVICE_EVENT_REPORT_BEGIN",
    DeviceEventReportCleantask = 0x1195 => "DEVICE_EVENT_REPORT_CLEANTASK",
    DeviceEventReportCleanmap = 0x1196 => "DEVICE_EVENT_REPORT_CLEANMAP",
    DeviceEventReportKey = 0x1197 => "DEVICE_EVENT_REPORT_KEY",
    DeviceEventReportReq = 0x1198 => "DEVICE_EVENT_REPORT_REQ",
    DeviceEventReportRsp = 0x1199 => "DEVICE_EVENT_REPORT_RSP",
    DeviceWorkstatusReportReq = 0x119A => "DEVICE_WORKSTATUS_REPORT_REQ",
    DeviceWorkstatusReportRsp = 0x119B => "DEVICE_WORKSTATUS_REPORT_RSP",
    DeviceVersionInfoUpdateReq = 0x119C => "DEVICE_VERSION_INFO_UPDATE_REQ",
    DeviceVersionInfoUpdateRsp = 0x119D => "DEVICE_VERSION_INFO_UPDATE_RSP",
    DeviceDeletingReq = 0x119E => "DEVICE_DELETING_REQ",
    DeviceDeletingRsp = 0x119F => "DEVICE_DELETING_RSP",
    DeviceCleanmapBindataReportReq = 0x11A0 => "DEVICE_CLEANMAP_BINDATA_REPORT_REQ",
    DeviceCleanmapBindataReportRsp = 0x11A1 => "DEVICE_CLEANMAP_BINDATA_REPORT_RSP",
    Unk11a4 = 0x11A4 => "UNK_11A4",
    Unk11a7 = 0x11A7 => "UNK_11A7",
    DeviceEventReportEnd = 0x11F7 => "DEVICE_EVENT_REPORT_END",
    DeviceAuxStmData = 0x11F9 => "DEVICE_AUX_STM_DATA",
    DeviceAuxStatus = 0x11FB => "DEVICE_AUX_STATUS",
    DeviceNetworkStatusReq = 0x11FD => "DEVICE_NETWORK_STATUS_REQ",
    DeviceNetworkStatusRsp = 0x11FE => "DEVICE_NETWORK_STATUS_RSP",
    DeviceSoundStatusPlay = 0x11FF => "DEVICE_SOUND_STATUS_PLAY",
    DeviceSoundPlayState = 0x1200 => "DEVICE_SOUND_PLAY_STATE",
    DeviceSleepCtrlReq = 0x1201 => "DEVICE_SLEEP_CTRL_REQ",
    DeviceSleepCtrlRsp = 0x1202 => "DEVICE_SLEEP_CTRL_RSP",
    DeviceWakeupCtrlReq = 0x1203 => "DEVICE_WAKEUP_CTRL_REQ",
    DeviceWakeupCtrlRsp = 0x1204 => "DEVICE_WAKEUP_CTRL_RSP",
    DeviceCtrlVersionReq = 0x1205 => "DEVICE_CTRL_VERSION_REQ",
    DeviceCtrlVersionRsp = 0x1206 => "DEVICE_CTRL_VERSION_RSP",
    DeviceStm32ResetCtrlReq = 0x1207 => "DEVICE_STM32_RESET_CTRL_REQ",
    DeviceStm32ResetCtrlRsp = 0x1208 => "DEVICE_STM32_RESET_CTRL_RSP",
    DeviceNetworkCtrlRsp = 0x1209 => "DEVICE_NETWORK_CTRL_RSP",
    DeviceGetMachineId = 0x120A => "DEVICE_GET_MACHINE_ID",
    DeviceSoundInit = 0x120D => "DEVICE_SOUND_INIT",
    DeviceEnableSystemSleep = 0x120E => "DEVICE_ENABLE_SYSTEM_SLEEP",
    DeviceNetworkWakeUp = 0x1211 => "DEVICE_NETWORK_WAKE_UP",
    DeviceMapClear = 0x1212 => "DEVICE_MAP_CLEAR",
    DeviceCleanRecordSendResult = 0x1214 => "DEVICE_CLEAN_RECORD_SEND_RESULT",
    DeviceMapReloadGoCharge = 0x1216 => "DEVICE_MAP_RELOAD_GO_CHARGE",
    DeviceUpgradeDownloadInfoReq = 0x1219 => "DEVICE_UPGRADE_DOWNLOAD_INFO_REQ",
    DeviceUpgradeDownloadInfoRsp = 0x121A => "DEVICE_UPGRADE_DOWNLOAD_INFO_RSP",
    DeviceTestSerarchReq = 0x121B => "DEVICE_TEST_SERARCH_REQ",
    DeviceTestSerarchRsp = 0x121C => "DEVICE_TEST_SERARCH_RSP",
    DeviceSystemSleepState = 0x121F => "DEVICE_SYSTEM_SLEEP_STATE",
    DeviceQuietHoursState = 0x1227 => "DEVICE_QUIET_HOURS_STATE",
    DeviceAppendSetPerfernceReq = 0x1236 => "DEVICE_APPEND_SET_PERFERNCE_REQ",
    DeviceAppendSetPerfernceRsp = 0x1237 => "DEVICE_APPEND_SET_PERFERNCE_RSP",
    DeviceAppendGetPerfernceReq = 0x1238 => "DEVICE_APPEND_GET_PERFERNCE_REQ",
    DeviceAppendGetPerfernceRsp = 0x1239 => "DEVICE_APPEND_GET_PERFERNCE_RSP",
    DeviceWorkStatusPushNewReq = 0x123F => "DEVICE_WORK_STATUS_PUSH_NEW_REQ",
    DeviceWorkStatusPushNewRsp = 0x1240 => "DEVICE_WORK_STATUS_PUSH_NEW_RSP",
    DeviceUpgradeCtrlReq = 0x125D => "DEVICE_UPGRADE_CTRL_REQ",
    DeviceUpgradePackageInfoReq = 0x125E => "DEVICE_UPGRADE_PACKAGE_INFO_REQ",
    DeviceUpgradePackageInfoRsp = 0x125F => "DEVICE_UPGRADE_PACKAGE_INFO_RSP",
    DeviceUpgradeWorkSuccess = 0x1261 => "DEVICE_UPGRADE_WORK_SUCCESS",
    DeviceSearchCtrlReq = 0x12C1 => "DEVICE_SEARCH_CTRL_REQ",
    DeviceSearchCtrlRsp = 0x12C2 => "DEVICE_SEARCH_CTRL_RSP",
    DeviceOfflineCmd = 0x1325 => "DEVICE_OFFLINE_CMD",
    DeviceNotcontrolByuserCmd = 0x1326 => "DEVICE_NOTCONTROL_BYUSER_CMD",
    UserForceUpgradeCheckReq = 0x1327 => "USER_FORCE_UPGRADE_CHECK_REQ",
    UserForceUpgradeCheckRsp = 0x1328 => "USER_FORCE_UPGRADE_CHECK_RSP",
    DeviceCmdEnd = 0x1387 => "DEVICE_CMD_END",
    QueryCmdBegin = 0x1388 => "QUERY_CMD_BEGIN",
    QueryDeviceCleaninfoReq = 0x1389 => "QUERY_DEVICE_CLEANINFO_REQ",
    QueryDeviceCleaninfoRsp = 0x138A => "QUERY_DEVICE_CLEANINFO_RSP",
    QueryDeviceCleanmapReq = 0x138B => "QUERY_DEVICE_CLEANMAP_REQ",
    QueryDeviceCleanmapRsp = 0x138C => "QUERY_DEVICE_CLEANMAP_RSP",
    QueryDeviceKeyEventReq = 0x138D => "QUERY_DEVICE_KEY_EVENT_REQ",
    QueryDeviceKeyEventRsp = 0x138E => "QUERY_DEVICE_KEY_EVENT_RSP",
    QueryDeviceFaultEventReq = 0x138F => "QUERY_DEVICE_FAULT_EVENT_REQ",
    QueryDeviceFaultEventRsp = 0x1390 => "QUERY_DEVICE_FAULT_EVENT_RSP",
    QueryDeviceCleanmapBindataReq = 0x1391 => "QUERY_DEVICE_CLEANMAP_BINDATA_REQ",
    QueryDeviceCleanmapBindataRsp = 0x1392 => "QUERY_DEVICE_CLEANMAP_BINDATA_RSP",
    QueryCmdEnd = 0x13EB => "QUERY_CMD_END",
    UserOnlineStatusReport = 0x13ED => "USER_ONLINE_STATUS_REPORT",
    UserOfflineStatusReport = 0x13EE => "USER_OFFLINE_STATUS_REPORT",
    DeviceOnlineStatusReport = 0x13EF => "DEVICE_ONLINE_STATUS_REPORT",
    DeviceOfflineStatusReport = 0x13F0 => "DEVICE_OFFLINE_STATUS_REPORT",
    DeviceAgentCmdBegin = 0x1450 => "DEVICE_AGENT_CMD_BEGIN",
    UserGetDeviceOrderlistReq = 0x1451 => "USER_GET_DEVICE_ORDERLIST_REQ",
    UserGetDeviceOrderlistRsp = 0x1452 => "USER_GET_DEVICE_ORDERLIST_RSP",
    UserSetDeviceOrderReq = 0x1453 => "USER_SET_DEVICE_ORDER_REQ",
    UserSetDeviceOrderRsp = 0x1454 => "USER_SET_DEVICE_ORDER_RSP",
    UserDeleteDeviceOrderReq = 0x1455 => "USER_DELETE_DEVICE_ORDER_REQ",
    UserDeleteDeviceOrderRsp = 0x1456 => "USER_DELETE_DEVICE_ORDER_RSP",
    UserGetDeviceCleanpreferenceReq = 0x1457 => "USER_GET_DEVICE_CLEANPREFERENCE_REQ",
    UserGetDeviceCleanpreferenceRsp = 0x1458 => "USER_GET_DEVICE_CLEANPREFERENCE_RSP",
    UserSetDeviceCleanpreferenceReq = 0x1459 => "USER_SET_DEVICE_CLEANPREFERENCE_REQ",
    UserSetDeviceCleanpreferenceRsp = 0x145A => "USER_SET_DEVICE_CLEANPREFERENCE_RSP",
    UserGetDeviceCtrlSettingReq = 0x145B => "USER_GET_DEVICE_CTRL_SETTING_REQ",
    UserGetDeviceCtrlSettingRsp = 0x145C => "USER_GET_DEVICE_CTRL_SETTING_RSP",
    UserSetDeviceCtrlSettingReq = 0x145D => "USER_SET_DEVICE_CTRL_SETTING_REQ",
    UserSetDeviceCtrlSettingRsp = 0x145E => "USER_SET_DEVICE_CTRL_SETTING_RSP",
    PullDevicePackageUpgradeInfoReq = 0x145F => "PULL_DEVICE_PACKAGE_UPGRADE_INFO_REQ",
    PullDevicePackageUpgradeInfoRsp = 0x1460 => "PULL_DEVICE_PACKAGE_UPGRADE_INFO_RSP",
    PushDevicePackageUpgradeInfoReq = 0x1461 => "PUSH_DEVICE_PACKAGE_UPGRADE_INFO_REQ",
    PushDevicePackageUpgradeInfoRsp = 0x1462 => "PUSH_DEVICE_PACKAGE_UPGRADE_INFO_RSP",
    PullDeviceAgentSettingReq = 0x1463 => "PULL_DEVICE_AGENT_SETTING_REQ",
    PullDeviceAgentSettingRsp = 0x1464 => "PULL_DEVICE_AGENT_SETTING_RSP",
    PushDeviceAgentSettingReq = 0x1465 => "PUSH_DEVICE_AGENT_SETTING_REQ",
    PushDeviceAgentSettingRsp = 0x1466 => "PUSH_DEVICE_AGENT_SETTING_RSP",
    UserGetDeviceQuiethoursReq = 0x146B => "USER_GET_DEVICE_QUIETHOURS_REQ",
    UserGetDeviceQuiethoursRsp = 0x146C => "USER_GET_DEVICE_QUIETHOURS_RSP",
    UserSetDeviceQuiethoursReq = 0x146D => "USER_SET_DEVICE_QUIETHOURS_REQ",
    UserSetDeviceQuiethoursRsp = 0x146E => "USER_SET_DEVICE_QUIETHOURS_RSP",
    PushDeviceBatteryInfoReq = 0x146F => "PUSH_DEVICE_BATTERY_INFO_REQ",
    PushDeviceBatteryInfoRsp = 0x1470 => "PUSH_DEVICE_BATTERY_INFO_RSP",
    DeviceAgentCmdEnd = 0x14B3 => "DEVICE_AGENT_CMD_END",
}

/// Look up the numeric code for a wire name.
pub fn lookup_code(name: &str) -> Result<u16, RegistryError> {
    name.parse::<OpName>().map(OpName::code)
}

/// Look up the symbolic name for a numeric code.
///
/// `UnknownCode` is a soft condition: the receive path keeps the raw code
/// and carries on.
pub fn lookup_name(code: u16) -> Result<OpName, RegistryError> {
    OpName::from_code(code).ok_or(RegistryError::UnknownCode(code))
}

impl FromStr for OpName {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OpName::from_wire_name(s).ok_or_else(|| RegistryError::UnknownName(s.to_string()))
    }
}

impl TryFrom<u16> for OpName {
    type Error = RegistryError;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        lookup_name(code)
    }
}

impl fmt::Display for OpName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Informal opcode bands observed in firmware traffic.
///
/// Documentation only: nothing rejects a code for sitting in the "wrong" band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpcodeBand {
    /// Session and client control.
    Client,
    /// Account management.
    User,
    /// Device commands and telemetry.
    Device,
    /// History queries.
    Query,
    /// Agent/cloud pairing.
    Agent,
    Unbanded,
}

impl OpcodeBand {
    pub fn of(code: u16) -> Self {
        match code {
            0x0BB8..=0x0C1B => Self::User,
            0x0FA0..=0x1387 => Self::Device,
            0x1388..=0x13EB => Self::Query,
            0x1450..=0x14B3 => Self::Agent,
            0x0000..=0x0FFF => Self::Client,
            _ => Self::Unbanded,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::User => "user",
            Self::Device => "device",
            Self::Query => "query",
            Self::Agent => "agent",
            Self::Unbanded => "unbanded",
        }
    }
}
