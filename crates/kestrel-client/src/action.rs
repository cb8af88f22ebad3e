//! 指令/查询插件
//!
//! 一方法一操作：构造请求并委托给一元调用适配器。这里没有业务
//! 逻辑：不缓存、不重试、不重排，策略全部在适配器或调用方。
//!
//! # 示例
//!
//! ```rust,no_run
//! # use kestrel_client::Action;
//! # fn demo(action: &Action) -> kestrel_client::Result<()> {
//! action.arm().wait()?;
//! let altitude = action.get_takeoff_altitude().wait()?;
//! println!("起飞高度 {altitude} 米");
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use kestrel_rpc::ActionService;

use crate::call::{Pending, invoke_command, invoke_query};
use crate::scheduler::Scheduler;

/// 指令/查询插件句柄
///
/// 共享底层服务引用，可随意克隆；每次调用独立交付事件。
#[derive(Clone)]
pub struct Action {
    service: Arc<dyn ActionService>,
    scheduler: Arc<Scheduler>,
}

impl Action {
    /// 用给定服务与调度器构造
    pub fn new(service: Arc<dyn ActionService>, scheduler: Arc<Scheduler>) -> Self {
        Self { service, scheduler }
    }

    /// 解锁（允许电机旋转）
    pub fn arm(&self) -> Pending<()> {
        let service = self.service.clone();
        invoke_command(&self.scheduler, "arm", move || service.arm())
    }

    /// 加锁（只在地面状态允许）
    pub fn disarm(&self) -> Pending<()> {
        let service = self.service.clone();
        invoke_command(&self.scheduler, "disarm", move || service.disarm())
    }

    /// 起飞到设定的起飞高度
    pub fn takeoff(&self) -> Pending<()> {
        let service = self.service.clone();
        invoke_command(&self.scheduler, "takeoff", move || service.takeoff())
    }

    /// 原地降落
    pub fn land(&self) -> Pending<()> {
        let service = self.service.clone();
        invoke_command(&self.scheduler, "land", move || service.land())
    }

    /// 立即切断电机输出
    ///
    /// 飞行中会坠机；只用于紧急情况。
    pub fn kill(&self) -> Pending<()> {
        let service = self.service.clone();
        invoke_command(&self.scheduler, "kill", move || service.kill())
    }

    /// 返航并降落
    pub fn return_to_launch(&self) -> Pending<()> {
        let service = self.service.clone();
        invoke_command(&self.scheduler, "return_to_launch", move || {
            service.return_to_launch()
        })
    }

    /// VTOL：切换到固定翼形态
    pub fn transition_to_fixed_wing(&self) -> Pending<()> {
        let service = self.service.clone();
        invoke_command(&self.scheduler, "transition_to_fixed_wing", move || {
            service.transition_to_fixed_wing()
        })
    }

    /// VTOL：切换到多旋翼形态
    pub fn transition_to_multicopter(&self) -> Pending<()> {
        let service = self.service.clone();
        invoke_command(&self.scheduler, "transition_to_multicopter", move || {
            service.transition_to_multicopter()
        })
    }

    /// 设定起飞高度（米）
    pub fn set_takeoff_altitude(&self, altitude_m: f32) -> Pending<()> {
        let service = self.service.clone();
        invoke_command(&self.scheduler, "set_takeoff_altitude", move || {
            service.set_takeoff_altitude(altitude_m)
        })
    }

    /// 读取当前起飞高度（米）
    pub fn get_takeoff_altitude(&self) -> Pending<f32> {
        let service = self.service.clone();
        invoke_query(&self.scheduler, "get_takeoff_altitude", move || {
            service.get_takeoff_altitude()
        })
    }

    /// 设定最大巡航速度（米每秒）
    pub fn set_maximum_speed(&self, speed_m_s: f32) -> Pending<()> {
        let service = self.service.clone();
        invoke_command(&self.scheduler, "set_maximum_speed", move || {
            service.set_maximum_speed(speed_m_s)
        })
    }

    /// 读取最大巡航速度（米每秒）
    pub fn get_maximum_speed(&self) -> Pending<f32> {
        let service = self.service.clone();
        invoke_query(&self.scheduler, "get_maximum_speed", move || {
            service.get_maximum_speed()
        })
    }

    /// 设定返航高度（米）
    pub fn set_return_to_launch_altitude(&self, altitude_m: f32) -> Pending<()> {
        let service = self.service.clone();
        invoke_command(&self.scheduler, "set_return_to_launch_altitude", move || {
            service.set_return_to_launch_altitude(altitude_m)
        })
    }

    /// 读取返航高度（米）
    pub fn get_return_to_launch_altitude(&self) -> Pending<f32> {
        let service = self.service.clone();
        invoke_query(&self.scheduler, "get_return_to_launch_altitude", move || {
            service.get_return_to_launch_altitude()
        })
    }
}
