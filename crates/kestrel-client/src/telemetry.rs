//! 遥测插件
//!
//! 一方法一主题：发起订阅并委托给流式适配器。每次调用都是一次
//! 全新的远程流式调用（冷语义），订阅之间互不影响。
//!
//! # 示例
//!
//! ```rust,no_run
//! # use kestrel_client::Telemetry;
//! # fn demo(telemetry: &Telemetry) {
//! for event in telemetry.position().take(5) {
//!     match event {
//!         Ok(pos) => println!("纬度 {:.6}", pos.latitude_deg),
//!         Err(err) => eprintln!("位置流终结: {err}"),
//!     }
//! }
//! # }
//! ```

use std::sync::Arc;

use kestrel_rpc::TelemetryService;

use crate::scheduler::Scheduler;
use crate::subscription::{FeedConfig, Subscription, open_feed};
use crate::types::{Battery, EulerAngle, FlightMode, GpsInfo, Health, Position};

/// 遥测插件句柄
///
/// 共享底层服务引用，可随意克隆；每个订阅独立持有自己的工作线程
/// 和事件通道。
#[derive(Clone)]
pub struct Telemetry {
    service: Arc<dyn TelemetryService>,
    scheduler: Arc<Scheduler>,
    config: FeedConfig,
}

impl Telemetry {
    /// 用默认订阅配置构造
    pub fn new(service: Arc<dyn TelemetryService>, scheduler: Arc<Scheduler>) -> Self {
        Self::with_config(service, scheduler, FeedConfig::default())
    }

    /// 用给定订阅配置构造
    pub fn with_config(
        service: Arc<dyn TelemetryService>,
        scheduler: Arc<Scheduler>,
        config: FeedConfig,
    ) -> Self {
        Self {
            service,
            scheduler,
            config,
        }
    }

    /// 订阅全球位置
    pub fn position(&self) -> Subscription<Position> {
        let service = self.service.clone();
        open_feed(
            &self.scheduler,
            &self.config,
            "position",
            move || service.subscribe_position(),
            Position::from,
        )
    }

    /// 订阅 home 位置（返航点）
    pub fn home(&self) -> Subscription<Position> {
        let service = self.service.clone();
        open_feed(
            &self.scheduler,
            &self.config,
            "home",
            move || service.subscribe_home(),
            Position::from,
        )
    }

    /// 订阅是否在空中
    pub fn in_air(&self) -> Subscription<bool> {
        let service = self.service.clone();
        open_feed(
            &self.scheduler,
            &self.config,
            "in_air",
            move || service.subscribe_in_air(),
            |v| v,
        )
    }

    /// 订阅是否已解锁
    pub fn armed(&self) -> Subscription<bool> {
        let service = self.service.clone();
        open_feed(
            &self.scheduler,
            &self.config,
            "armed",
            move || service.subscribe_armed(),
            |v| v,
        )
    }

    /// 订阅欧拉角姿态
    pub fn attitude_euler(&self) -> Subscription<EulerAngle> {
        let service = self.service.clone();
        open_feed(
            &self.scheduler,
            &self.config,
            "attitude_euler",
            move || service.subscribe_attitude_euler(),
            EulerAngle::from,
        )
    }

    /// 订阅电池状态
    pub fn battery(&self) -> Subscription<Battery> {
        let service = self.service.clone();
        open_feed(
            &self.scheduler,
            &self.config,
            "battery",
            move || service.subscribe_battery(),
            Battery::from,
        )
    }

    /// 订阅 GPS 信息
    pub fn gps_info(&self) -> Subscription<GpsInfo> {
        let service = self.service.clone();
        open_feed(
            &self.scheduler,
            &self.config,
            "gps_info",
            move || service.subscribe_gps_info(),
            GpsInfo::from,
        )
    }

    /// 订阅健康状态
    pub fn health(&self) -> Subscription<Health> {
        let service = self.service.clone();
        open_feed(
            &self.scheduler,
            &self.config,
            "health",
            move || service.subscribe_health(),
            Health::from,
        )
    }

    /// 订阅飞行模式
    pub fn flight_mode(&self) -> Subscription<FlightMode> {
        let service = self.service.clone();
        open_feed(
            &self.scheduler,
            &self.config,
            "flight_mode",
            move || service.subscribe_flight_mode(),
            FlightMode::from,
        )
    }
}
