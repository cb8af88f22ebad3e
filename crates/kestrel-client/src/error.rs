//! 错误类型体系
//!
//! SDK 的统一失败类别。守护进程返回的结果码在这里翻译成
//! [`VehicleError`]，传输失败和本地等待失败也汇入同一类型，应用端
//! 只需要处理一种错误。
//!
//! # 设计目标
//!
//! - **全量映射**: 每个结果码都有确定的归宿，未知码归入 `Unknown` 而不是被吞掉
//! - **两类失败分明**: 守护进程明确拒绝（结果码）与调用根本没完成（传输失败）可判别
//! - **可判别**: 提供分类谓词（is_denied / is_unsupported / is_retryable / ...）
//!
//! # 示例
//!
//! ```rust
//! use kestrel_client::VehicleError;
//!
//! fn handle_error(err: VehicleError) {
//!     if err.is_retryable() {
//!         eprintln!("稍后重试: {}", err);
//!     } else if err.is_transport() {
//!         eprintln!("连接故障: {}", err);
//!     } else {
//!         eprintln!("操作失败: {}", err);
//!     }
//! }
//! ```

use kestrel_proto::{Ack, ResultCode};
use kestrel_rpc::TransportError;
use thiserror::Error;

/// 飞行器操作错误
///
/// 指令、查询与遥测订阅共用的失败类别。
#[derive(Debug, Error)]
pub enum VehicleError {
    // ==================== 结果码映射（守护进程返回的业务失败） ====================
    /// 飞行器忙
    #[error("Vehicle is busy")]
    Busy,

    /// 指令被拒绝（一般原因）
    #[error("Command denied: {reason}")]
    CommandDenied {
        /// 守护进程附带的说明
        reason: String,
    },

    /// 指令被拒绝：飞行器未着陆
    #[error("Command denied: vehicle is not landed")]
    CommandDeniedNotLanded,

    /// 指令被拒绝：着陆状态未知
    #[error("Command denied: landed state is unknown")]
    CommandDeniedLandedStateUnknown,

    /// 没有连接的飞行器
    #[error("No vehicle is connected")]
    NoSystem,

    /// 与飞行器的连接出错
    #[error("Connection to the vehicle was lost")]
    ConnectionError,

    /// 守护进程等待飞行器应答超时
    #[error("Daemon timed out waiting for the vehicle")]
    Timeout,

    /// 飞行器不支持 VTOL 切换
    #[error("Vehicle does not support VTOL transitions")]
    VtolTransitionUnsupported,

    /// 尚不知道飞行器是否支持 VTOL 切换
    #[error("VTOL transition support is unknown")]
    VtolTransitionSupportUnknown,

    /// 未识别的失败结果码
    #[error("Unknown failure: {reason}")]
    Unknown {
        /// 守护进程附带的说明
        reason: String,
    },

    // ==================== 传输失败（远程调用没有完成） ====================
    /// 远程调用没有完成：连接断开、调用被拒绝或 IO 故障
    #[error("Transport failure: {0}")]
    Transport(#[from] TransportError),

    // ==================== 本地失败 ====================
    /// 限时等待内没有等到终结事件
    #[error("No result within {timeout_ms}ms")]
    WaitTimeout {
        /// 等待时长（毫秒）
        timeout_ms: u64,
    },

    /// 事件通道在终结事件交付前关闭（或句柄已被消费）
    #[error("Result channel closed before a terminal event")]
    ChannelClosed,
}

impl VehicleError {
    /// 结果码到失败类别的纯映射
    ///
    /// `Success` 返回 `None`，其余码返回对应类别。`message` 是守护进程
    /// 附带的说明文本，只有携带文本的类别会保留它。不做 I/O，不会失败。
    pub fn from_result_code(code: ResultCode, message: impl Into<String>) -> Option<Self> {
        let kind = match code {
            ResultCode::Success => return None,
            ResultCode::Busy => Self::Busy,
            ResultCode::CommandDenied => Self::command_denied(message),
            ResultCode::CommandDeniedNotLanded => Self::CommandDeniedNotLanded,
            ResultCode::CommandDeniedLandedStateUnknown => Self::CommandDeniedLandedStateUnknown,
            ResultCode::NoSystem => Self::NoSystem,
            ResultCode::ConnectionError => Self::ConnectionError,
            ResultCode::Timeout => Self::Timeout,
            ResultCode::NoVtolTransitionSupport => Self::VtolTransitionUnsupported,
            ResultCode::VtolTransitionSupportUnknown => Self::VtolTransitionSupportUnknown,
            ResultCode::Unknown => Self::unknown(message),
        };
        Some(kind)
    }

    /// 是否为守护进程的明确拒绝
    pub fn is_denied(&self) -> bool {
        matches!(
            self,
            Self::CommandDenied { .. }
                | Self::CommandDeniedNotLanded
                | Self::CommandDeniedLandedStateUnknown
        )
    }

    /// 是否为"飞行器不支持该操作"
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            Self::VtolTransitionUnsupported | Self::VtolTransitionSupportUnknown
        )
    }

    /// 是否为传输失败（调用根本没有完成）
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// 是否可重试
    ///
    /// 可重试表示同一操作稍后重新发起可能成功。
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Busy | Self::Timeout | Self::WaitTimeout { .. }
        )
    }

    /// 创建一般拒绝错误
    pub fn command_denied(reason: impl Into<String>) -> Self {
        let reason = non_empty(reason.into());
        Self::CommandDenied { reason }
    }

    /// 创建未知失败错误
    pub fn unknown(reason: impl Into<String>) -> Self {
        let reason = non_empty(reason.into());
        Self::Unknown { reason }
    }

    /// 创建本地等待超时错误
    pub fn wait_timeout(timeout_ms: u64) -> Self {
        Self::WaitTimeout { timeout_ms }
    }
}

/// 校验一元应答：成功返回 `Ok(())`，失败翻译为 [`VehicleError`]
pub fn check_ack(ack: &Ack) -> Result<()> {
    match VehicleError::from_result_code(ack.code, ack.message.as_str()) {
        None => Ok(()),
        Some(err) => Err(err),
    }
}

// 守护进程可能不附带说明文本；显示时用占位说明
fn non_empty(reason: String) -> String {
    if reason.is_empty() {
        "unspecified".to_string()
    } else {
        reason
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, VehicleError>;
