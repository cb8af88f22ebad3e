//! # Kestrel SDK
//!
//! 飞行器控制守护进程的统一客户端 SDK。
//!
//! # 架构设计
//!
//! 本 SDK 采用分层架构，从底层到高层：
//!
//! - **消息层** (`kestrel-proto`): 线级消息与结果码
//! - **接口层** (`kestrel-rpc`): 服务 trait、流式调用句柄、mock 后端
//! - **客户端层** (`kestrel-client`): 结果映射、事件适配、领域翻译、插件门面
//! - **入口** (本 crate): [`Drone`] 把插件组装在一个句柄下
//!
//! # 快速开始
//!
//! ```rust
//! use std::sync::Arc;
//! use kestrel_rpc::MockDaemon;
//! use kestrel_sdk::prelude::*;
//!
//! let daemon = Arc::new(MockDaemon::new());
//! daemon.action.push_ok();
//!
//! let drone = Drone::connect(daemon);
//! drone.action().arm().wait()?;
//! # Ok::<(), kestrel_sdk::VehicleError>(())
//! ```
//!
//! 真实部署时把 `MockDaemon` 换成实现了 [`ActionService`] 和
//! [`TelemetryService`] 的网络客户端即可，SDK 的行为不变。

use std::sync::Arc;

mod builder;

pub mod prelude;

pub use builder::DroneBuilder;

// 客户端层（推荐入口）
pub use kestrel_client::types;
pub use kestrel_client::{
    Action, FeedConfig, Pending, Result, Subscription, Telemetry, VehicleError,
};

// 服务 trait（接入真实传输时实现）
pub use kestrel_rpc::{ActionService, StreamCall, TelemetryService, TransportError};

// 线级消息（高级用户使用）
pub use kestrel_proto as proto;

/// 一台已连接飞行器的句柄
///
/// 持有各插件门面；插件可克隆后独立使用，共享同一个服务连接与
/// 调度器。
pub struct Drone {
    pub(crate) action: Action,
    pub(crate) telemetry: Telemetry,
}

impl Drone {
    /// 用默认配置绑定服务实现
    ///
    /// 等价于 `DroneBuilder::new().connect(service)`。
    pub fn connect<C>(service: Arc<C>) -> Self
    where
        C: ActionService + TelemetryService + 'static,
    {
        DroneBuilder::new().connect(service)
    }

    /// 指令/查询插件
    pub fn action(&self) -> &Action {
        &self.action
    }

    /// 遥测插件
    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }
}
