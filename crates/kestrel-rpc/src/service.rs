//! 守护进程服务 trait
//!
//! 每个远程操作对应一个方法。实现方（真实网络客户端或 mock）负责
//! 编解码与传输；方法签名只暴露语义字段。两个 trait 都要求
//! `Send + Sync`：同一连接上的并发调用由实现方支持，适配层通过
//! `Arc` 共享服务引用。

use std::time::Duration;

use kestrel_proto::{
    Ack, AltitudeReply, AttitudeEuler, Battery, FlightMode, GpsInfo, Health, Position, SpeedReply,
};

use crate::{StreamCall, TransportError};

/// 指令/查询服务（一元调用）
///
/// 每个方法发起恰好一次远程调用并阻塞到应答或传输失败。应答内嵌
/// 结果码（[`Ack`]），由上层翻译为 SDK 失败类别；传输失败直接以
/// [`TransportError`] 返回，不经过结果码。
pub trait ActionService: Send + Sync {
    /// 解锁（允许电机旋转）
    fn arm(&self) -> Result<Ack, TransportError>;

    /// 加锁（只在地面状态允许）
    fn disarm(&self) -> Result<Ack, TransportError>;

    /// 起飞到设定的起飞高度
    fn takeoff(&self) -> Result<Ack, TransportError>;

    /// 原地降落
    fn land(&self) -> Result<Ack, TransportError>;

    /// 立即切断电机输出（飞行中会坠机）
    fn kill(&self) -> Result<Ack, TransportError>;

    /// 返航并降落
    fn return_to_launch(&self) -> Result<Ack, TransportError>;

    /// VTOL：切换到固定翼形态
    fn transition_to_fixed_wing(&self) -> Result<Ack, TransportError>;

    /// VTOL：切换到多旋翼形态
    fn transition_to_multicopter(&self) -> Result<Ack, TransportError>;

    /// 设定起飞高度（米）
    fn set_takeoff_altitude(&self, altitude_m: f32) -> Result<Ack, TransportError>;

    /// 读取当前起飞高度（米）
    fn get_takeoff_altitude(&self) -> Result<AltitudeReply, TransportError>;

    /// 设定最大巡航速度（米每秒）
    fn set_maximum_speed(&self, speed_m_s: f32) -> Result<Ack, TransportError>;

    /// 读取最大巡航速度（米每秒）
    fn get_maximum_speed(&self) -> Result<SpeedReply, TransportError>;

    /// 设定返航高度（米）
    fn set_return_to_launch_altitude(&self, altitude_m: f32) -> Result<Ack, TransportError>;

    /// 读取返航高度（米）
    fn get_return_to_launch_altitude(&self) -> Result<AltitudeReply, TransportError>;
}

/// 遥测服务（服务端流式调用）
///
/// 每个方法对应一个遥测主题，发起一次新的流式调用并返回接收句柄。
/// 冷语义由调用方保证成立：每次订阅都必须走到这里拿一条新流，
/// 实现方不得在多个订阅间共享或回放消息。
pub trait TelemetryService: Send + Sync {
    /// 全球位置
    fn subscribe_position(&self) -> Result<Box<dyn StreamCall<Position>>, TransportError>;

    /// Home 位置（返航点）
    fn subscribe_home(&self) -> Result<Box<dyn StreamCall<Position>>, TransportError>;

    /// 是否在空中
    fn subscribe_in_air(&self) -> Result<Box<dyn StreamCall<bool>>, TransportError>;

    /// 是否已解锁
    fn subscribe_armed(&self) -> Result<Box<dyn StreamCall<bool>>, TransportError>;

    /// 欧拉角姿态
    fn subscribe_attitude_euler(&self)
    -> Result<Box<dyn StreamCall<AttitudeEuler>>, TransportError>;

    /// 电池状态
    fn subscribe_battery(&self) -> Result<Box<dyn StreamCall<Battery>>, TransportError>;

    /// GPS 信息
    fn subscribe_gps_info(&self) -> Result<Box<dyn StreamCall<GpsInfo>>, TransportError>;

    /// 健康状态（七个校准/就绪标志）
    fn subscribe_health(&self) -> Result<Box<dyn StreamCall<Health>>, TransportError>;

    /// 飞行模式
    fn subscribe_flight_mode(&self) -> Result<Box<dyn StreamCall<FlightMode>>, TransportError>;
}

/// 把一条已结束的流读干：收集全部消息与终结方式
///
/// 只用于测试和诊断工具；正常订阅路径使用 `kestrel-client` 的
/// 订阅适配器。
pub fn drain_stream<T>(
    call: &mut dyn StreamCall<T>,
    poll: Duration,
) -> (Vec<T>, Result<(), TransportError>) {
    let mut items = Vec::new();
    loop {
        match call.recv_timeout(poll) {
            Ok(Some(item)) => items.push(item),
            Ok(None) => return (items, Ok(())),
            Err(e) if e.is_timeout() => continue,
            Err(e) => return (items, Err(e)),
        }
    }
}
