//! # Kestrel RPC
//!
//! 守护进程 RPC 接口的抽象层：一元服务 trait、流式调用句柄与传输错误。
//!
//! # 设计目标
//!
//! 上层（`kestrel-client`）只通过本 crate 的 trait 与守护进程交互，
//! 不感知具体传输（真实网络连接或 mock 后端）。调用约定：
//!
//! - 一元调用是阻塞的：在工作线程上发起，返回应答或传输错误。
//! - 流式调用返回 [`StreamCall`] 句柄，按带超时的轮询读取；丢弃句柄
//!   即取消底层调用。
//!
//! 真实的网络客户端由外部协作方提供；本仓库内置的 [`mock`] 后端
//! （feature `mock`）用脚本化应答实现同一组 trait。

use std::time::Duration;

use thiserror::Error;

pub mod service;

#[cfg(feature = "mock")]
pub mod mock;

pub use service::{ActionService, TelemetryService};

#[cfg(feature = "mock")]
pub use mock::{
    MockActionService, MockDaemon, MockStream, MockTelemetryService, StreamEnd, StreamProbe,
    StreamScript,
};

/// 传输层统一错误类型
///
/// 表示"远程调用根本没有完成"：连接断开、调用被拒绝、IO 故障。
/// 守护进程返回的结果码是另一类失败：那是调用完成后的业务结果。
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Connection closed")]
    ConnectionClosed,
    #[error("Call rejected: {0}")]
    Rejected(String),
    #[error("Read timeout")]
    Timeout,
}

impl TransportError {
    /// 是否只是轮询窗口超时（流上暂无数据，不是失败）
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout)
    }
}

/// 一次流式调用的接收端
///
/// # 约定
///
/// - `Ok(Some(v))`: 下一条流消息，按传输顺序交付
/// - `Ok(None)`: 服务端正常结束了流，之后不会再有消息
/// - `Err(e)` 且 `e.is_timeout()`: 本轮询窗口内无数据，流仍存活
/// - 其他 `Err(e)`: 流失败，之后不会再有消息
///
/// 丢弃句柄即取消底层调用并释放资源。
pub trait StreamCall<T>: Send {
    /// 在给定轮询窗口内等待下一条流消息
    fn recv_timeout(&mut self, timeout: Duration) -> Result<Option<T>, TransportError>;

    /// 阻塞等待下一条消息，内部吞掉轮询超时
    fn recv(&mut self) -> Result<Option<T>, TransportError> {
        loop {
            match self.recv_timeout(Duration::from_millis(100)) {
                Err(e) if e.is_timeout() => continue,
                other => return other,
            }
        }
    }
}
