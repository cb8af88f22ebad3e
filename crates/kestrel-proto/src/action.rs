//! 指令/查询应答消息
//!
//! 守护进程对每个一元调用（arm、takeoff、参数读写等）返回一个应答，
//! 应答内嵌一个结果码和可选的文本说明。查询类应答在此之外再携带一个
//! 标量载荷。

// ============================================================================
// 结果码
// ============================================================================

/// 一元调用的服务端结果码
///
/// 线级编码为 i32。`Success` 是唯一的成功哨兵值，其余全部是失败原因。
/// 超出枚举范围的值（未来协议版本新增的码）退化为 `Unknown`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, num_enum::FromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i32)]
pub enum ResultCode {
    /// 未知结果（协议扩展的兜底值）
    #[default]
    Unknown = 0,
    /// 成功
    Success = 1,
    /// 没有连接的飞行器
    NoSystem = 2,
    /// 与飞行器的连接出错
    ConnectionError = 3,
    /// 飞行器忙，稍后重试
    Busy = 4,
    /// 指令被拒绝
    CommandDenied = 5,
    /// 指令被拒绝：着陆状态未知
    CommandDeniedLandedStateUnknown = 6,
    /// 指令被拒绝：飞行器未着陆
    CommandDeniedNotLanded = 7,
    /// 守护进程等待飞行器应答超时
    Timeout = 8,
    /// 尚不知道飞行器是否支持 VTOL 切换
    VtolTransitionSupportUnknown = 9,
    /// 飞行器不支持 VTOL 切换
    NoVtolTransitionSupport = 10,
}

impl ResultCode {
    /// 是否为成功哨兵值
    pub fn is_success(self) -> bool {
        self == ResultCode::Success
    }
}

// ============================================================================
// 应答消息
// ============================================================================

/// 一元调用应答的公共信封
///
/// 每个指令/查询应答都内嵌一个 `Ack`。`message` 是守护进程附带的
/// 人类可读说明，成功时通常为空。
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ack {
    pub code: ResultCode,
    pub message: String,
}

impl Ack {
    /// 构造成功应答
    pub fn ok() -> Self {
        Self {
            code: ResultCode::Success,
            message: String::new(),
        }
    }

    /// 构造失败应答
    pub fn fail(code: ResultCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// 高度查询应答（起飞高度 / 返航高度）
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AltitudeReply {
    pub ack: Ack,
    /// 相对高度，单位米
    pub altitude_m: f32,
}

impl AltitudeReply {
    /// 构造成功应答
    pub fn ok(altitude_m: f32) -> Self {
        Self {
            ack: Ack::ok(),
            altitude_m,
        }
    }
}

/// 速度查询应答（最大巡航速度）
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpeedReply {
    pub ack: Ack,
    /// 速度，单位米每秒
    pub speed_m_s: f32,
}

impl SpeedReply {
    /// 构造成功应答
    pub fn ok(speed_m_s: f32) -> Self {
        Self {
            ack: Ack::ok(),
            speed_m_s,
        }
    }
}
