//! 一元调用适配器
//!
//! 把一次阻塞的远程调用包装成单事件句柄：工作线程发起调用并把应答
//! 归一化，结果经容量为 1 的通道交付。
//!
//! # 事件约定
//!
//! 每次调用恰好产生一个终结事件：成功（指令为 `()`，查询为标量）
//! 或失败。不会是零个，也不会超过一个。传输失败直接成为失败事件；
//! 收到应答则校验其中的结果码。不等待就丢弃句柄也是允许的：事件被
//! 丢弃，之后不会再有任何交付。

use std::cell::Cell;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError, bounded};
use tracing::{debug, warn};

use kestrel_proto::{Ack, AltitudeReply, SpeedReply};
use kestrel_rpc::TransportError;

use crate::error::{Result, VehicleError, check_ack};
use crate::scheduler::Scheduler;

/// 一次指令/查询调用的结果句柄
///
/// 终结事件恰好交付一次；交付后句柄即耗尽，再等待返回
/// [`VehicleError::ChannelClosed`]。
#[must_use = "a pending call delivers its result through this handle"]
pub struct Pending<T> {
    rx: Receiver<Result<T>>,
    op: &'static str,
    done: Cell<bool>,
}

impl<T> Pending<T> {
    /// 阻塞等待终结事件
    pub fn wait(self) -> Result<T> {
        if self.done.get() {
            return Err(VehicleError::ChannelClosed);
        }
        debug!(op = self.op, "waiting for call result");
        match self.rx.recv() {
            Ok(outcome) => outcome,
            // 工作线程在交付前消失，属于本地故障
            Err(_) => Err(VehicleError::ChannelClosed),
        }
    }

    /// 限时等待终结事件
    ///
    /// 超时返回 [`VehicleError::WaitTimeout`]；调用本身仍在进行，
    /// 之后可以继续等待同一个句柄。
    pub fn wait_timeout(&self, timeout: Duration) -> Result<T> {
        if self.done.get() {
            return Err(VehicleError::ChannelClosed);
        }
        match self.rx.recv_timeout(timeout) {
            Ok(outcome) => {
                self.done.set(true);
                outcome
            }
            Err(RecvTimeoutError::Timeout) => {
                Err(VehicleError::wait_timeout(timeout.as_millis() as u64))
            }
            Err(RecvTimeoutError::Disconnected) => {
                self.done.set(true);
                Err(VehicleError::ChannelClosed)
            }
        }
    }

    /// 非阻塞查看终结事件是否已到达
    ///
    /// `None` 表示事件尚未到达（或此前已被取走）。
    pub fn try_wait(&self) -> Option<Result<T>> {
        if self.done.get() {
            return None;
        }
        match self.rx.try_recv() {
            Ok(outcome) => {
                self.done.set(true);
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.done.set(true);
                Some(Err(VehicleError::ChannelClosed))
            }
        }
    }

    /// 该句柄对应的操作名
    pub fn op(&self) -> &'static str {
        self.op
    }
}

/// 查询应答：内嵌结果码信封与标量载荷
pub(crate) trait Reply {
    type Payload;

    fn into_parts(self) -> (Ack, Self::Payload);
}

impl Reply for AltitudeReply {
    type Payload = f32;

    fn into_parts(self) -> (Ack, f32) {
        (self.ack, self.altitude_m)
    }
}

impl Reply for SpeedReply {
    type Payload = f32;

    fn into_parts(self) -> (Ack, f32) {
        (self.ack, self.speed_m_s)
    }
}

/// 在工作线程上发起一元调用并建立单事件交付
///
/// `call` 在工作线程上执行，返回已归一化的结果；无论成功失败，恰好
/// 发送一个终结事件。线程起不来时用失败事件兜底，调用方不感知差别。
pub(crate) fn invoke<T, F>(scheduler: &Scheduler, op: &'static str, call: F) -> Pending<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let (tx, rx) = bounded(1);
    debug!(op, "issuing unary call");

    let spawned = scheduler.spawn(op, move || {
        let outcome = call();
        if let Err(err) = &outcome {
            warn!(op, %err, "unary call failed");
        }
        // 接收端可能已放弃等待；交付失败直接丢弃
        let _ = tx.send(outcome);
    });

    match spawned {
        Ok(_) => Pending {
            rx,
            op,
            done: Cell::new(false),
        },
        Err(err) => {
            warn!(op, %err, "failed to spawn call worker");
            let (tx, rx) = bounded(1);
            let _ = tx.send(Err(VehicleError::Transport(TransportError::Io(err))));
            Pending {
                rx,
                op,
                done: Cell::new(false),
            }
        }
    }
}

/// 指令调用：应答只含结果码信封，成功即完成
pub(crate) fn invoke_command<F>(scheduler: &Scheduler, op: &'static str, call: F) -> Pending<()>
where
    F: FnOnce() -> std::result::Result<Ack, TransportError> + Send + 'static,
{
    invoke(scheduler, op, move || {
        let ack = call()?;
        if !ack.message.is_empty() {
            debug!(op, message = %ack.message, "daemon attached a message");
        }
        check_ack(&ack)
    })
}

/// 查询调用：应答含结果码信封与标量，成功交付标量
pub(crate) fn invoke_query<R, F>(
    scheduler: &Scheduler,
    op: &'static str,
    call: F,
) -> Pending<R::Payload>
where
    R: Reply,
    R::Payload: Send + 'static,
    F: FnOnce() -> std::result::Result<R, TransportError> + Send + 'static,
{
    invoke(scheduler, op, move || {
        let reply = call()?;
        let (ack, payload) = reply.into_parts();
        check_ack(&ack)?;
        Ok(payload)
    })
}
