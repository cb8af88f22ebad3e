//! Prelude - 常用类型的便捷导入
//!
//! 大多数用户应该使用这个模块来导入常用类型：
//!
//! ```rust
//! use kestrel_sdk::prelude::*;
//! ```

// 入口与构建器
pub use crate::{Drone, DroneBuilder};

// 插件与事件句柄
pub use kestrel_client::{Action, FeedConfig, Pending, Subscription, Telemetry};

// 领域类型
pub use kestrel_client::types::*;

// 错误类型
pub use kestrel_client::VehicleError;
pub use kestrel_rpc::TransportError;

// 服务 trait（注入服务实现时使用）
pub use kestrel_rpc::{ActionService, TelemetryService};
