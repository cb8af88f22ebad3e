//! Mock RPC 后端
//!
//! 无网络依赖的脚本化服务实现，用于测试和演示。每类一元应答持有
//! 一个预置队列，每个遥测主题持有一个预置流脚本队列；测试先压入
//! 应答/脚本，再通过正常的 SDK 入口消费，断言观察到的事件序列。

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use kestrel_proto::{
    Ack, AltitudeReply, AttitudeEuler, Battery, FlightMode, GpsInfo, Health, Position, ResultCode,
    SpeedReply,
};

use crate::service::{ActionService, TelemetryService};
use crate::{StreamCall, TransportError};

// ============================================================================
// 一元服务 Mock
// ============================================================================

/// 脚本化的指令/查询服务
///
/// 应答按压入顺序弹出。队列为空时返回 `Rejected`，避免未脚本化的
/// 调用被误判为成功。所有调用（连同 set 类调用的参数）按顺序记录，
/// 供测试断言。
#[derive(Default)]
pub struct MockActionService {
    ack_replies: Mutex<VecDeque<Result<Ack, TransportError>>>,
    altitude_replies: Mutex<VecDeque<Result<AltitudeReply, TransportError>>>,
    speed_replies: Mutex<VecDeque<Result<SpeedReply, TransportError>>>,
    calls: Mutex<Vec<&'static str>>,
    set_calls: Mutex<Vec<(&'static str, f32)>>,
}

impl MockActionService {
    pub fn new() -> Self {
        Self::default()
    }

    /// 压入一条指令应答
    pub fn push_ack(&self, reply: Result<Ack, TransportError>) {
        self.ack_replies.lock().push_back(reply);
    }

    /// 压入一条成功应答
    pub fn push_ok(&self) {
        self.push_ack(Ok(Ack::ok()));
    }

    /// 压入一条失败应答
    pub fn push_fail(&self, code: ResultCode) {
        self.push_ack(Ok(Ack::fail(code, "")));
    }

    /// 压入一条带说明文本的失败应答
    pub fn push_fail_with_message(&self, code: ResultCode, message: impl Into<String>) {
        self.push_ack(Ok(Ack::fail(code, message)));
    }

    /// 压入一条高度查询应答
    pub fn push_altitude(&self, reply: Result<AltitudeReply, TransportError>) {
        self.altitude_replies.lock().push_back(reply);
    }

    /// 压入一条速度查询应答
    pub fn push_speed(&self, reply: Result<SpeedReply, TransportError>) {
        self.speed_replies.lock().push_back(reply);
    }

    /// 已发出的调用名记录（按顺序）
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    /// set 类调用记录：（调用名，参数）
    pub fn set_calls(&self) -> Vec<(&'static str, f32)> {
        self.set_calls.lock().clone()
    }

    fn pop_ack(&self, op: &'static str) -> Result<Ack, TransportError> {
        self.calls.lock().push(op);
        self.ack_replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Rejected(format!("no scripted reply for {op}"))))
    }

    fn pop_altitude(&self, op: &'static str) -> Result<AltitudeReply, TransportError> {
        self.calls.lock().push(op);
        self.altitude_replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Rejected(format!("no scripted reply for {op}"))))
    }

    fn pop_speed(&self, op: &'static str) -> Result<SpeedReply, TransportError> {
        self.calls.lock().push(op);
        self.speed_replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Rejected(format!("no scripted reply for {op}"))))
    }
}

impl ActionService for MockActionService {
    fn arm(&self) -> Result<Ack, TransportError> {
        self.pop_ack("arm")
    }

    fn disarm(&self) -> Result<Ack, TransportError> {
        self.pop_ack("disarm")
    }

    fn takeoff(&self) -> Result<Ack, TransportError> {
        self.pop_ack("takeoff")
    }

    fn land(&self) -> Result<Ack, TransportError> {
        self.pop_ack("land")
    }

    fn kill(&self) -> Result<Ack, TransportError> {
        self.pop_ack("kill")
    }

    fn return_to_launch(&self) -> Result<Ack, TransportError> {
        self.pop_ack("return_to_launch")
    }

    fn transition_to_fixed_wing(&self) -> Result<Ack, TransportError> {
        self.pop_ack("transition_to_fixed_wing")
    }

    fn transition_to_multicopter(&self) -> Result<Ack, TransportError> {
        self.pop_ack("transition_to_multicopter")
    }

    fn set_takeoff_altitude(&self, altitude_m: f32) -> Result<Ack, TransportError> {
        self.set_calls.lock().push(("set_takeoff_altitude", altitude_m));
        self.pop_ack("set_takeoff_altitude")
    }

    fn get_takeoff_altitude(&self) -> Result<AltitudeReply, TransportError> {
        self.pop_altitude("get_takeoff_altitude")
    }

    fn set_maximum_speed(&self, speed_m_s: f32) -> Result<Ack, TransportError> {
        self.set_calls.lock().push(("set_maximum_speed", speed_m_s));
        self.pop_ack("set_maximum_speed")
    }

    fn get_maximum_speed(&self) -> Result<SpeedReply, TransportError> {
        self.pop_speed("get_maximum_speed")
    }

    fn set_return_to_launch_altitude(&self, altitude_m: f32) -> Result<Ack, TransportError> {
        self.set_calls
            .lock()
            .push(("set_return_to_launch_altitude", altitude_m));
        self.pop_ack("set_return_to_launch_altitude")
    }

    fn get_return_to_launch_altitude(&self) -> Result<AltitudeReply, TransportError> {
        self.pop_altitude("get_return_to_launch_altitude")
    }
}

// ============================================================================
// 流式调用 Mock
// ============================================================================

/// 脚本化流的收尾方式
#[derive(Debug)]
pub enum StreamEnd {
    /// 服务端正常结束
    Complete,
    /// 流失败
    Fail(TransportError),
    /// 保持静默打开，直到订阅方丢弃句柄
    StayOpen,
}

/// 一次流式调用的脚本：先逐条交付 `items`，再按 `end` 收尾
pub struct StreamScript<T> {
    items: Vec<T>,
    end: StreamEnd,
}

impl<T> StreamScript<T> {
    pub fn new(items: Vec<T>, end: StreamEnd) -> Self {
        Self { items, end }
    }

    /// 交付 `items` 后正常结束
    pub fn complete(items: Vec<T>) -> Self {
        Self::new(items, StreamEnd::Complete)
    }

    /// 不交付任何消息，立即正常结束
    pub fn empty() -> Self {
        Self::new(Vec::new(), StreamEnd::Complete)
    }

    /// 交付 `items` 后以 `err` 失败
    pub fn fail_after(items: Vec<T>, err: TransportError) -> Self {
        Self::new(items, StreamEnd::Fail(err))
    }

    /// 交付 `items` 后保持静默打开
    pub fn stay_open(items: Vec<T>) -> Self {
        Self::new(items, StreamEnd::StayOpen)
    }
}

/// 观察一次流式调用生命周期的探针
///
/// 压入脚本时获得；对应的流句柄被丢弃（订阅取消或正常收尾后释放）
/// 时置位。
#[derive(Clone)]
pub struct StreamProbe {
    cancelled: Arc<AtomicBool>,
}

impl StreamProbe {
    /// 对应的流调用是否已被释放
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// 脚本化的流式调用句柄
pub struct MockStream<T> {
    items: VecDeque<T>,
    end: Option<StreamEnd>,
    cancelled: Arc<AtomicBool>,
}

impl<T> MockStream<T> {
    fn from_script(script: StreamScript<T>, cancelled: Arc<AtomicBool>) -> Self {
        Self {
            items: script.items.into(),
            end: Some(script.end),
            cancelled,
        }
    }
}

impl<T: Send> StreamCall<T> for MockStream<T> {
    fn recv_timeout(&mut self, timeout: Duration) -> Result<Option<T>, TransportError> {
        if let Some(item) = self.items.pop_front() {
            return Ok(Some(item));
        }
        match self.end.take() {
            // 已结束的流重复读取仍然是正常结束
            None | Some(StreamEnd::Complete) => Ok(None),
            Some(StreamEnd::Fail(e)) => Err(e),
            Some(StreamEnd::StayOpen) => {
                self.end = Some(StreamEnd::StayOpen);
                std::thread::sleep(timeout);
                Err(TransportError::Timeout)
            }
        }
    }
}

impl<T> Drop for MockStream<T> {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Release);
        tracing::trace!("mock stream dropped");
    }
}

// ============================================================================
// 遥测服务 Mock
// ============================================================================

type ScriptQueue<T> = Mutex<VecDeque<Result<(StreamScript<T>, Arc<AtomicBool>), TransportError>>>;

/// 脚本化的遥测服务
///
/// 每个主题一个脚本队列：订阅一次弹出一个脚本，天然满足冷语义
/// （重复订阅消耗不同脚本，对应不同的底层调用）。未脚本化的订阅
/// 得到一条空流并立即正常结束。
#[derive(Default)]
pub struct MockTelemetryService {
    position: ScriptQueue<Position>,
    home: ScriptQueue<Position>,
    in_air: ScriptQueue<bool>,
    armed: ScriptQueue<bool>,
    attitude_euler: ScriptQueue<AttitudeEuler>,
    battery: ScriptQueue<Battery>,
    gps_info: ScriptQueue<GpsInfo>,
    health: ScriptQueue<Health>,
    flight_mode: ScriptQueue<FlightMode>,
    subscriptions: Mutex<Vec<&'static str>>,
}

impl MockTelemetryService {
    pub fn new() -> Self {
        Self::default()
    }

    /// 某个主题到目前为止被订阅的次数
    pub fn subscribe_count(&self, topic: &str) -> usize {
        self.subscriptions.lock().iter().filter(|t| **t == topic).count()
    }

    /// 压入一条位置流脚本
    pub fn script_position(&self, script: StreamScript<Position>) -> StreamProbe {
        Self::push(&self.position, script)
    }

    /// 让下一次位置订阅在建立阶段就失败
    pub fn script_position_error(&self, err: TransportError) {
        self.position.lock().push_back(Err(err));
    }

    /// 压入一条 home 位置流脚本
    pub fn script_home(&self, script: StreamScript<Position>) -> StreamProbe {
        Self::push(&self.home, script)
    }

    pub fn script_home_error(&self, err: TransportError) {
        self.home.lock().push_back(Err(err));
    }

    /// 压入一条在空中标志流脚本
    pub fn script_in_air(&self, script: StreamScript<bool>) -> StreamProbe {
        Self::push(&self.in_air, script)
    }

    pub fn script_in_air_error(&self, err: TransportError) {
        self.in_air.lock().push_back(Err(err));
    }

    /// 压入一条解锁标志流脚本
    pub fn script_armed(&self, script: StreamScript<bool>) -> StreamProbe {
        Self::push(&self.armed, script)
    }

    pub fn script_armed_error(&self, err: TransportError) {
        self.armed.lock().push_back(Err(err));
    }

    /// 压入一条姿态流脚本
    pub fn script_attitude_euler(&self, script: StreamScript<AttitudeEuler>) -> StreamProbe {
        Self::push(&self.attitude_euler, script)
    }

    pub fn script_attitude_euler_error(&self, err: TransportError) {
        self.attitude_euler.lock().push_back(Err(err));
    }

    /// 压入一条电池流脚本
    pub fn script_battery(&self, script: StreamScript<Battery>) -> StreamProbe {
        Self::push(&self.battery, script)
    }

    pub fn script_battery_error(&self, err: TransportError) {
        self.battery.lock().push_back(Err(err));
    }

    /// 压入一条 GPS 信息流脚本
    pub fn script_gps_info(&self, script: StreamScript<GpsInfo>) -> StreamProbe {
        Self::push(&self.gps_info, script)
    }

    pub fn script_gps_info_error(&self, err: TransportError) {
        self.gps_info.lock().push_back(Err(err));
    }

    /// 压入一条健康状态流脚本
    pub fn script_health(&self, script: StreamScript<Health>) -> StreamProbe {
        Self::push(&self.health, script)
    }

    pub fn script_health_error(&self, err: TransportError) {
        self.health.lock().push_back(Err(err));
    }

    /// 压入一条飞行模式流脚本
    pub fn script_flight_mode(&self, script: StreamScript<FlightMode>) -> StreamProbe {
        Self::push(&self.flight_mode, script)
    }

    pub fn script_flight_mode_error(&self, err: TransportError) {
        self.flight_mode.lock().push_back(Err(err));
    }

    fn push<T>(queue: &ScriptQueue<T>, script: StreamScript<T>) -> StreamProbe {
        let cancelled = Arc::new(AtomicBool::new(false));
        queue.lock().push_back(Ok((script, cancelled.clone())));
        StreamProbe { cancelled }
    }

    fn pop<T>(
        &self,
        queue: &ScriptQueue<T>,
        topic: &'static str,
    ) -> Result<Box<dyn StreamCall<T>>, TransportError>
    where
        T: Send + 'static,
    {
        self.subscriptions.lock().push(topic);
        match queue.lock().pop_front() {
            Some(Ok((script, cancelled))) => Ok(Box::new(MockStream::from_script(script, cancelled))),
            Some(Err(e)) => Err(e),
            None => Ok(Box::new(MockStream::from_script(
                StreamScript::empty(),
                Arc::new(AtomicBool::new(false)),
            ))),
        }
    }
}

impl TelemetryService for MockTelemetryService {
    fn subscribe_position(&self) -> Result<Box<dyn StreamCall<Position>>, TransportError> {
        self.pop(&self.position, "position")
    }

    fn subscribe_home(&self) -> Result<Box<dyn StreamCall<Position>>, TransportError> {
        self.pop(&self.home, "home")
    }

    fn subscribe_in_air(&self) -> Result<Box<dyn StreamCall<bool>>, TransportError> {
        self.pop(&self.in_air, "in_air")
    }

    fn subscribe_armed(&self) -> Result<Box<dyn StreamCall<bool>>, TransportError> {
        self.pop(&self.armed, "armed")
    }

    fn subscribe_attitude_euler(
        &self,
    ) -> Result<Box<dyn StreamCall<AttitudeEuler>>, TransportError> {
        self.pop(&self.attitude_euler, "attitude_euler")
    }

    fn subscribe_battery(&self) -> Result<Box<dyn StreamCall<Battery>>, TransportError> {
        self.pop(&self.battery, "battery")
    }

    fn subscribe_gps_info(&self) -> Result<Box<dyn StreamCall<GpsInfo>>, TransportError> {
        self.pop(&self.gps_info, "gps_info")
    }

    fn subscribe_health(&self) -> Result<Box<dyn StreamCall<Health>>, TransportError> {
        self.pop(&self.health, "health")
    }

    fn subscribe_flight_mode(&self) -> Result<Box<dyn StreamCall<FlightMode>>, TransportError> {
        self.pop(&self.flight_mode, "flight_mode")
    }
}

// ============================================================================
// 组合守护进程 Mock
// ============================================================================

/// 脚本化的完整守护进程：一元服务加遥测服务
///
/// SDK 入口用同一个连接对象同时服务指令和遥测两个插件；测试里用
/// 本类型一次性注入。两部分各自独立脚本。
#[derive(Default)]
pub struct MockDaemon {
    pub action: MockActionService,
    pub telemetry: MockTelemetryService,
}

impl MockDaemon {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ActionService for MockDaemon {
    fn arm(&self) -> Result<Ack, TransportError> {
        self.action.arm()
    }

    fn disarm(&self) -> Result<Ack, TransportError> {
        self.action.disarm()
    }

    fn takeoff(&self) -> Result<Ack, TransportError> {
        self.action.takeoff()
    }

    fn land(&self) -> Result<Ack, TransportError> {
        self.action.land()
    }

    fn kill(&self) -> Result<Ack, TransportError> {
        self.action.kill()
    }

    fn return_to_launch(&self) -> Result<Ack, TransportError> {
        self.action.return_to_launch()
    }

    fn transition_to_fixed_wing(&self) -> Result<Ack, TransportError> {
        self.action.transition_to_fixed_wing()
    }

    fn transition_to_multicopter(&self) -> Result<Ack, TransportError> {
        self.action.transition_to_multicopter()
    }

    fn set_takeoff_altitude(&self, altitude_m: f32) -> Result<Ack, TransportError> {
        self.action.set_takeoff_altitude(altitude_m)
    }

    fn get_takeoff_altitude(&self) -> Result<AltitudeReply, TransportError> {
        self.action.get_takeoff_altitude()
    }

    fn set_maximum_speed(&self, speed_m_s: f32) -> Result<Ack, TransportError> {
        self.action.set_maximum_speed(speed_m_s)
    }

    fn get_maximum_speed(&self) -> Result<SpeedReply, TransportError> {
        self.action.get_maximum_speed()
    }

    fn set_return_to_launch_altitude(&self, altitude_m: f32) -> Result<Ack, TransportError> {
        self.action.set_return_to_launch_altitude(altitude_m)
    }

    fn get_return_to_launch_altitude(&self) -> Result<AltitudeReply, TransportError> {
        self.action.get_return_to_launch_altitude()
    }
}

impl TelemetryService for MockDaemon {
    fn subscribe_position(&self) -> Result<Box<dyn StreamCall<Position>>, TransportError> {
        self.telemetry.subscribe_position()
    }

    fn subscribe_home(&self) -> Result<Box<dyn StreamCall<Position>>, TransportError> {
        self.telemetry.subscribe_home()
    }

    fn subscribe_in_air(&self) -> Result<Box<dyn StreamCall<bool>>, TransportError> {
        self.telemetry.subscribe_in_air()
    }

    fn subscribe_armed(&self) -> Result<Box<dyn StreamCall<bool>>, TransportError> {
        self.telemetry.subscribe_armed()
    }

    fn subscribe_attitude_euler(
        &self,
    ) -> Result<Box<dyn StreamCall<AttitudeEuler>>, TransportError> {
        self.telemetry.subscribe_attitude_euler()
    }

    fn subscribe_battery(&self) -> Result<Box<dyn StreamCall<Battery>>, TransportError> {
        self.telemetry.subscribe_battery()
    }

    fn subscribe_gps_info(&self) -> Result<Box<dyn StreamCall<GpsInfo>>, TransportError> {
        self.telemetry.subscribe_gps_info()
    }

    fn subscribe_health(&self) -> Result<Box<dyn StreamCall<Health>>, TransportError> {
        self.telemetry.subscribe_health()
    }

    fn subscribe_flight_mode(&self) -> Result<Box<dyn StreamCall<FlightMode>>, TransportError> {
        self.telemetry.subscribe_flight_mode()
    }
}
