//! # Kestrel Client
//!
//! 飞行器控制守护进程的类型安全客户端层：指令、查询与遥测订阅。
//!
//! # 架构设计
//!
//! 本 crate 是 SDK 的翻译/分发核心，压在 `kestrel-rpc` 的服务 trait
//! 之上：
//!
//! - **结果映射** (`error`): 守护进程结果码 → 统一失败类别 [`VehicleError`]
//! - **一元适配** (`call`): 一次调用 → 恰好一个终结事件（[`Pending`]）
//! - **流式适配** (`subscription`): 一次流式调用 → 惰性保序事件序列（[`Subscription`]）
//! - **领域翻译** (`types`): 线级消息 → 应用可见的领域值
//! - **插件门面** (`action` / `telemetry`): 一方法一操作，组装以上各层
//!
//! # 事件契约
//!
//! 指令/查询恰好交付一个终结事件；订阅交付零或多条值加恰好一个
//! 终结事件，顺序与传输一致。没有自动重试，没有共享可变状态。

pub mod action;
pub mod call;
pub mod error;
pub mod scheduler;
pub mod subscription;
pub mod telemetry;
pub mod types;

// 插件门面（推荐入口）
pub use action::Action;
pub use telemetry::Telemetry;

// 事件句柄
pub use call::Pending;
pub use subscription::{FeedConfig, Subscription};

// 错误类型与结果别名
pub use error::{Result, VehicleError, check_ack};

// 调度器（构建门面时注入）
pub use scheduler::Scheduler;
