//! # Kestrel Proto
//!
//! 飞行器控制守护进程 RPC 接口的线级消息定义（无传输依赖）
//!
//! ## 模块
//!
//! - `action`: 指令/查询应答消息与结果码
//! - `telemetry`: 遥测流消息
//!
//! ## 设计约定
//!
//! 本 crate 只包含纯数据类型：没有 I/O，没有错误类型，没有业务逻辑。
//! 所有枚举通过 `num_enum` 提供全量转换，未知的线级值退化为 `Unknown`
//! 变体而不是解码失败（守护进程的协议版本可能比 SDK 新）。

pub mod action;
pub mod telemetry;

// 重新导出常用类型
pub use action::*;
pub use telemetry::*;
