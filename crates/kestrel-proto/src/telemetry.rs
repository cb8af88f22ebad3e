//! 遥测流消息
//!
//! 每个遥测主题（位置、健康状态、电池等）对应一种流消息。守护进程按
//! 传输顺序推送，SDK 侧逐条翻译为领域类型，不做合并或去重。

// ============================================================================
// 位置与姿态
// ============================================================================

/// 全球位置（也用于 home 位置流）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
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

/// 欧拉角姿态
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttitudeEuler {
    pub roll_deg: f32,
    pub pitch_deg: f32,
    pub yaw_deg: f32,
}

// ============================================================================
// 健康与电源
// ============================================================================

/// 飞行器健康状态：七个独立的校准/就绪标志
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
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

/// 电池状态
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Battery {
    /// 电压，单位伏
    pub voltage_v: f32,
    /// 剩余电量，0.0 到 1.0
    pub remaining_percent: f32,
}

// ============================================================================
// GPS 与飞行模式
// ============================================================================

/// GPS 定位类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, num_enum::FromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i32)]
pub enum FixType {
    /// 没有 GPS 硬件
    #[default]
    NoGps = 0,
    /// 有 GPS 但尚未定位
    NoFix = 1,
    Fix2D = 2,
    Fix3D = 3,
    FixDgps = 4,
    RtkFloat = 5,
    RtkFixed = 6,
}

/// GPS 信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GpsInfo {
    /// 可见卫星数
    pub num_satellites: i32,
    pub fix_type: FixType,
}

/// 飞行模式
///
/// 未知的线级值退化为 `Unknown`，不会导致解码失败。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, num_enum::FromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i32)]
pub enum FlightMode {
    #[default]
    Unknown = 0,
    Ready = 1,
    Takeoff = 2,
    Hold = 3,
    Mission = 4,
    ReturnToLaunch = 5,
    Land = 6,
    Offboard = 7,
    FollowMe = 8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_type_from_wire() {
        assert_eq!(FixType::from(0), FixType::NoGps);
        assert_eq!(FixType::from(3), FixType::Fix3D);
        assert_eq!(FixType::from(6), FixType::RtkFixed);
        assert_eq!(FixType::from(42), FixType::NoGps); // 未知值退化
    }

    #[test]
    fn test_flight_mode_from_wire() {
        assert_eq!(FlightMode::from(1), FlightMode::Ready);
        assert_eq!(FlightMode::from(5), FlightMode::ReturnToLaunch);
        assert_eq!(FlightMode::from(8), FlightMode::FollowMe);
        assert_eq!(FlightMode::from(-3), FlightMode::Unknown);
    }

    #[test]
    fn test_position_precision() {
        let pos = Position {
            latitude_deg: -50.995944711358824,
            longitude_deg: -72.99892046835936,
            absolute_altitude_m: 1217.12,
            relative_altitude_m: 2.52,
        };
        // f64 字段不得有隐式舍入
        assert_eq!(pos.latitude_deg, -50.995944711358824);
        assert_eq!(pos.longitude_deg, -72.99892046835936);
    }

    #[test]
    fn test_health_default_all_false() {
        let health = Health::default();
        assert!(!health.is_gyrometer_calibration_ok);
        assert!(!health.is_home_position_ok);
    }
}
