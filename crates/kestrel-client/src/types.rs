//! 领域类型与线级翻译
//!
//! 应用端看到的遥测值。每个 `From<wire>` 翻译都是纯函数：逐字段
//! 搬运，不舍入、不丢字段、不重排；枚举走全量转换，未知值已在
//! 线级退化为 `Unknown` 类变体。

use kestrel_proto::telemetry as wire;

/// 全球位置
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// 纬度，单位度
    pub latitude_deg: f64,
    /// 经度，单位度
    pub longitude_deg: f64,
    /// 海拔高度（AMSL），单位米
    pub absolute_altitude_m: f32,
    /// 相对起飞点高度，单位米
    pub relative_altitude_m: f32,
}

impl From<wire::Position> for Position {
    fn from(value: wire::Position) -> Self {
        Self {
            latitude_deg: value.latitude_deg,
            longitude_deg: value.longitude_deg,
            absolute_altitude_m: value.absolute_altitude_m,
            relative_altitude_m: value.relative_altitude_m,
        }
    }
}

/// 欧拉角姿态
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EulerAngle {
    pub roll_deg: f32,
    pub pitch_deg: f32,
    pub yaw_deg: f32,
}

impl From<wire::AttitudeEuler> for EulerAngle {
    fn from(value: wire::AttitudeEuler) -> Self {
        Self {
            roll_deg: value.roll_deg,
            pitch_deg: value.pitch_deg,
            yaw_deg: value.yaw_deg,
        }
    }
}

/// 飞行器健康状态：七个独立的校准/就绪标志
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Health {
    pub is_gyrometer_calibration_ok: bool,
    pub is_accelerometer_calibration_ok: bool,
    pub is_magnetometer_calibration_ok: bool,
    pub is_level_calibration_ok: bool,
    pub is_local_position_ok: bool,
    pub is_global_position_ok: bool,
    pub is_home_position_ok: bool,
}

impl From<wire::Health> for Health {
    fn from(value: wire::Health) -> Self {
        Self {
            is_gyrometer_calibration_ok: value.is_gyrometer_calibration_ok,
            is_accelerometer_calibration_ok: value.is_accelerometer_calibration_ok,
            is_magnetometer_calibration_ok: value.is_magnetometer_calibration_ok,
            is_level_calibration_ok: value.is_level_calibration_ok,
            is_local_position_ok: value.is_local_position_ok,
            is_global_position_ok: value.is_global_position_ok,
            is_home_position_ok: value.is_home_position_ok,
        }
    }
}

/// 电池状态
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Battery {
    /// 电压，单位伏
    pub voltage_v: f32,
    /// 剩余电量，0.0 到 1.0
    pub remaining_percent: f32,
}

impl From<wire::Battery> for Battery {
    fn from(value: wire::Battery) -> Self {
        Self {
            voltage_v: value.voltage_v,
            remaining_percent: value.remaining_percent,
        }
    }
}

/// GPS 定位类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FixType {
    /// 没有 GPS 硬件
    NoGps,
    /// 有 GPS 但尚未定位
    NoFix,
    Fix2D,
    Fix3D,
    FixDgps,
    RtkFloat,
    RtkFixed,
}

impl From<wire::FixType> for FixType {
    fn from(value: wire::FixType) -> Self {
        match value {
            wire::FixType::NoGps => Self::NoGps,
            wire::FixType::NoFix => Self::NoFix,
            wire::FixType::Fix2D => Self::Fix2D,
            wire::FixType::Fix3D => Self::Fix3D,
            wire::FixType::FixDgps => Self::FixDgps,
            wire::FixType::RtkFloat => Self::RtkFloat,
            wire::FixType::RtkFixed => Self::RtkFixed,
        }
    }
}

/// GPS 信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GpsInfo {
    /// 可见卫星数
    pub num_satellites: i32,
    pub fix_type: FixType,
}

impl From<wire::GpsInfo> for GpsInfo {
    fn from(value: wire::GpsInfo) -> Self {
        Self {
            num_satellites: value.num_satellites,
            fix_type: value.fix_type.into(),
        }
    }
}

/// 飞行模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlightMode {
    Unknown,
    Ready,
    Takeoff,
    Hold,
    Mission,
    ReturnToLaunch,
    Land,
    Offboard,
    FollowMe,
}

impl From<wire::FlightMode> for FlightMode {
    fn from(value: wire::FlightMode) -> Self {
        match value {
            wire::FlightMode::Unknown => Self::Unknown,
            wire::FlightMode::Ready => Self::Ready,
            wire::FlightMode::Takeoff => Self::Takeoff,
            wire::FlightMode::Hold => Self::Hold,
            wire::FlightMode::Mission => Self::Mission,
            wire::FlightMode::ReturnToLaunch => Self::ReturnToLaunch,
            wire::FlightMode::Land => Self::Land,
            wire::FlightMode::Offboard => Self::Offboard,
            wire::FlightMode::FollowMe => Self::FollowMe,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_translation_is_lossless() {
        let raw = wire::Position {
            latitude_deg: -50.995944711358824,
            longitude_deg: -72.99892046835936,
            absolute_altitude_m: 1217.12,
            relative_altitude_m: 2.52,
        };
        let pos = Position::from(raw);
        assert_eq!(pos.latitude_deg, -50.995944711358824);
        assert_eq!(pos.longitude_deg, -72.99892046835936);
        assert_eq!(pos.absolute_altitude_m, 1217.12);
        assert_eq!(pos.relative_altitude_m, 2.52);
    }

    #[test]
    fn test_health_translation_keeps_every_flag() {
        let raw = wire::Health {
            is_gyrometer_calibration_ok: true,
            is_accelerometer_calibration_ok: false,
            is_magnetometer_calibration_ok: true,
            is_level_calibration_ok: false,
            is_local_position_ok: true,
            is_global_position_ok: false,
            is_home_position_ok: true,
        };
        let health = Health::from(raw);
        assert!(health.is_gyrometer_calibration_ok);
        assert!(!health.is_accelerometer_calibration_ok);
        assert!(health.is_magnetometer_calibration_ok);
        assert!(!health.is_level_calibration_ok);
        assert!(health.is_local_position_ok);
        assert!(!health.is_global_position_ok);
        assert!(health.is_home_position_ok);
    }

    #[test]
    fn test_attitude_translation() {
        let raw = wire::AttitudeEuler {
            roll_deg: -1.5,
            pitch_deg: 2.25,
            yaw_deg: 179.5,
        };
        let euler = EulerAngle::from(raw);
        assert_eq!(euler.roll_deg, -1.5);
        assert_eq!(euler.pitch_deg, 2.25);
        assert_eq!(euler.yaw_deg, 179.5);
    }

    #[test]
    fn test_gps_info_translation() {
        let raw = wire::GpsInfo {
            num_satellites: 11,
            fix_type: wire::FixType::Fix3D,
        };
        let info = GpsInfo::from(raw);
        assert_eq!(info.num_satellites, 11);
        assert_eq!(info.fix_type, FixType::Fix3D);
    }

    #[test]
    fn test_flight_mode_translation() {
        assert_eq!(
            FlightMode::from(wire::FlightMode::ReturnToLaunch),
            FlightMode::ReturnToLaunch
        );
        assert_eq!(FlightMode::from(wire::FlightMode::Offboard), FlightMode::Offboard);
        // 线级未知值在解码处已退化为 Unknown
        assert_eq!(
            FlightMode::from(wire::FlightMode::from(42)),
            FlightMode::Unknown
        );
    }

    #[test]
    fn test_battery_translation() {
        let raw = wire::Battery {
            voltage_v: 11.4,
            remaining_percent: 0.63,
        };
        let battery = Battery::from(raw);
        assert_eq!(battery.voltage_v, 11.4);
        assert_eq!(battery.remaining_percent, 0.63);
    }
}
