//! SDK 构建器
//!
//! 绑定服务实现之前配置调度与订阅行为。

use std::sync::Arc;

use kestrel_client::{Action, FeedConfig, Scheduler, Telemetry};
use kestrel_rpc::{ActionService, TelemetryService};
use tracing::debug;

use crate::Drone;

/// [`Drone`] 构建器
///
/// # 示例
///
/// ```rust
/// use std::sync::Arc;
/// use kestrel_rpc::MockDaemon;
/// use kestrel_sdk::DroneBuilder;
///
/// let drone = DroneBuilder::new()
///     .thread_prefix("uav1")
///     .feed_poll_timeout_ms(20)
///     .connect(Arc::new(MockDaemon::new()));
/// ```
#[derive(Debug, Clone)]
pub struct DroneBuilder {
    thread_prefix: String,
    feed: FeedConfig,
}

impl DroneBuilder {
    pub fn new() -> Self {
        Self {
            thread_prefix: "kestrel".to_string(),
            feed: FeedConfig::default(),
        }
    }

    /// 工作线程名前缀
    ///
    /// 线程名形如 `{prefix}-{操作名}-{序号}`；多机场景用前缀区分。
    pub fn thread_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_prefix = prefix.into();
        self
    }

    /// 订阅轮询窗口（毫秒）
    ///
    /// 也是取消订阅延迟的上界量级；默认 50ms。
    pub fn feed_poll_timeout_ms(mut self, poll_timeout_ms: u64) -> Self {
        self.feed.poll_timeout_ms = poll_timeout_ms;
        self
    }

    /// 绑定服务实现，完成构建
    ///
    /// `service` 同时服务指令与遥测两个插件；插件共享这一个连接，
    /// 并发调用由服务实现支持。
    pub fn connect<C>(self, service: Arc<C>) -> Drone
    where
        C: ActionService + TelemetryService + 'static,
    {
        let scheduler = Arc::new(Scheduler::new(self.thread_prefix));
        let action_service: Arc<dyn ActionService> = service.clone();
        let telemetry_service: Arc<dyn TelemetryService> = service;

        debug!(poll_timeout_ms = self.feed.poll_timeout_ms, "client assembled");
        Drone {
            action: Action::new(action_service, scheduler.clone()),
            telemetry: Telemetry::with_config(telemetry_service, scheduler, self.feed),
        }
    }
}

impl Default for DroneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_rpc::MockDaemon;

    #[test]
    fn test_builder_defaults() {
        let builder = DroneBuilder::new();
        assert_eq!(builder.thread_prefix, "kestrel");
        assert_eq!(builder.feed.poll_timeout_ms, 50);
    }

    #[test]
    fn test_builder_setters() {
        let builder = DroneBuilder::new()
            .thread_prefix("uav7")
            .feed_poll_timeout_ms(10);
        assert_eq!(builder.thread_prefix, "uav7");
        assert_eq!(builder.feed.poll_timeout_ms, 10);
    }

    #[test]
    fn test_connect_assembles_both_plugins() {
        let daemon = Arc::new(MockDaemon::new());
        daemon.action.push_ok();

        let drone = DroneBuilder::new().connect(daemon.clone());
        assert!(drone.action().disarm().wait().is_ok());

        // 未脚本化的遥测订阅得到空流并正常完成
        let mut sub = drone.telemetry().in_air();
        assert!(sub.next().is_none());
    }
}
