//! 遥测订阅适配器
//!
//! 把一次服务端流式调用包装成惰性事件序列。
//!
//! # 事件约定
//!
//! 每个订阅交付零或多条遥测值，然后恰好一个终结事件（正常完成或
//! 失败）。交付顺序就是传输顺序：不重排、不合并、不去重。失败之后
//! 不会再有值。
//!
//! # 冷语义
//!
//! 远程流式调用在工作线程上、订阅建立之后才发出：没有订阅就没有
//! 调用，重新订阅就是一次全新的调用。多个订阅（即使同一主题）互不
//! 共享状态，彼此独立终结。
//!
//! # 取消
//!
//! [`Subscription::unsubscribe`] 或丢弃句柄都会停止交付并释放底层
//! 流调用。工作线程按轮询窗口读流，取消延迟与窗口同阶。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, TryRecvError, unbounded};
use tracing::{debug, trace, warn};

use kestrel_rpc::{StreamCall, TransportError};

use crate::error::{Result, VehicleError};
use crate::scheduler::Scheduler;

/// 订阅行为配置
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// 工作线程轮询底层流的窗口（毫秒）
    ///
    /// 取消订阅的延迟上界与此同阶：窗口越短取消越快，空转越多。
    pub poll_timeout_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self { poll_timeout_ms: 50 }
    }
}

/// 订阅的内部事件
enum FeedEvent<T> {
    Next(T),
    Completed,
    Failed(VehicleError),
}

/// 一个遥测主题的订阅句柄
///
/// 迭代器语义：`Some(Ok(v))` 是一条遥测值；`Some(Err(e))` 是终结
/// 失败，之后必然 `None`；`None` 是正常完成。[`Iterator::next`] 会
/// 阻塞到下一个事件；非阻塞路径用 [`Subscription::try_next`]。
pub struct Subscription<T> {
    rx: Receiver<FeedEvent<T>>,
    cancel: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    topic: &'static str,
    finished: bool,
}

impl<T> Subscription<T> {
    /// 非阻塞拉取下一个事件
    ///
    /// `None` 表示暂时没有新事件；订阅是否已终结用
    /// [`Subscription::is_finished`] 区分。
    pub fn try_next(&mut self) -> Option<Result<T>> {
        if self.finished {
            return None;
        }
        match self.rx.try_recv() {
            Ok(FeedEvent::Next(value)) => Some(Ok(value)),
            Ok(FeedEvent::Completed) => {
                self.finished = true;
                None
            }
            Ok(FeedEvent::Failed(err)) => {
                self.finished = true;
                Some(Err(err))
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.finished = true;
                Some(Err(VehicleError::ChannelClosed))
            }
        }
    }

    /// 订阅是否已终结（正常完成或失败）
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// 该订阅的主题名
    pub fn topic(&self) -> &'static str {
        self.topic
    }

    /// 取消订阅：停止交付并释放底层流调用
    ///
    /// 阻塞到工作线程退出；延迟上界约为一个轮询窗口。取消后不会再
    /// 观察到任何事件。
    pub fn unsubscribe(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.cancel.store(true, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!(topic = self.topic, "feed worker panicked");
            }
            debug!(topic = self.topic, "feed closed");
        }
    }
}

impl<T> Iterator for Subscription<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.rx.recv() {
            Ok(FeedEvent::Next(value)) => Some(Ok(value)),
            Ok(FeedEvent::Completed) => {
                self.finished = true;
                None
            }
            Ok(FeedEvent::Failed(err)) => {
                self.finished = true;
                Some(Err(err))
            }
            // 工作线程在终结事件前消失，属于本地故障
            Err(_) => {
                self.finished = true;
                Some(Err(VehicleError::ChannelClosed))
            }
        }
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// 发起一次流式调用并建立订阅
///
/// `open` 在工作线程上执行：调用方先拿到句柄，远程调用随后才发出，
/// 订阅建立不阻塞调用方。`translate` 把线级消息翻译为领域值，逐条
/// 保序交付。
pub(crate) fn open_feed<W, T, O, X>(
    scheduler: &Scheduler,
    config: &FeedConfig,
    topic: &'static str,
    open: O,
    translate: X,
) -> Subscription<T>
where
    W: Send + 'static,
    T: Send + 'static,
    O: FnOnce() -> std::result::Result<Box<dyn StreamCall<W>>, TransportError> + Send + 'static,
    X: Fn(W) -> T + Send + 'static,
{
    let (tx, rx) = unbounded();
    let cancel = Arc::new(AtomicBool::new(false));
    let poll = Duration::from_millis(config.poll_timeout_ms);

    debug!(topic, "opening telemetry feed");
    let worker_cancel = cancel.clone();
    let spawned = scheduler.spawn(topic, move || {
        let mut call = match open() {
            Ok(call) => call,
            Err(err) => {
                warn!(topic, %err, "telemetry call setup failed");
                let _ = tx.send(FeedEvent::Failed(VehicleError::Transport(err)));
                return;
            }
        };
        loop {
            if worker_cancel.load(Ordering::Acquire) {
                debug!(topic, "feed unsubscribed, dropping stream call");
                return; // call 随作用域释放，不再交付任何事件
            }
            match call.recv_timeout(poll) {
                Ok(Some(wire)) => {
                    trace!(topic, "feed item");
                    if tx.send(FeedEvent::Next(translate(wire))).is_err() {
                        return; // 订阅方已丢弃句柄
                    }
                }
                Ok(None) => {
                    debug!(topic, "feed completed by server");
                    let _ = tx.send(FeedEvent::Completed);
                    return;
                }
                Err(err) if err.is_timeout() => continue, // 轮询窗口空转
                Err(err) => {
                    warn!(topic, %err, "feed failed");
                    let _ = tx.send(FeedEvent::Failed(VehicleError::Transport(err)));
                    return;
                }
            }
        }
    });

    match spawned {
        Ok(handle) => Subscription {
            rx,
            cancel,
            worker: Some(handle),
            topic,
            finished: false,
        },
        Err(err) => {
            // 线程起不来也要保证恰好一个终结事件
            warn!(topic, %err, "failed to spawn feed worker");
            let (tx, rx) = unbounded();
            let _ = tx.send(FeedEvent::Failed(VehicleError::Transport(
                TransportError::Io(err),
            )));
            Subscription {
                rx,
                cancel,
                worker: None,
                topic,
                finished: false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_proto::Position;
    use kestrel_rpc::service::TelemetryService;
    use kestrel_rpc::{MockTelemetryService, StreamScript};
    use std::sync::Arc;
    use std::time::Instant;

    fn fast_config() -> FeedConfig {
        FeedConfig { poll_timeout_ms: 5 }
    }

    fn subscribe_position(
        mock: &Arc<MockTelemetryService>,
        scheduler: &Scheduler,
    ) -> Subscription<Position> {
        let svc = mock.clone();
        open_feed(
            scheduler,
            &fast_config(),
            "position",
            move || svc.subscribe_position(),
            |wire| wire,
        )
    }

    fn position(lat: f64) -> Position {
        Position {
            latitude_deg: lat,
            ..Position::default()
        }
    }

    #[test]
    fn test_items_in_order_then_completed() {
        let mock = Arc::new(MockTelemetryService::new());
        mock.script_position(StreamScript::complete(vec![
            position(1.0),
            position(2.0),
            position(3.0),
        ]));

        let scheduler = Scheduler::new("sub-test");
        let sub = subscribe_position(&mock, &scheduler);

        let events: Vec<_> = sub.collect();
        assert_eq!(events.len(), 3);
        for (i, event) in events.iter().enumerate() {
            assert_eq!(event.as_ref().unwrap().latitude_deg, (i + 1) as f64);
        }
    }

    #[test]
    fn test_zero_items_single_terminal() {
        let mock = Arc::new(MockTelemetryService::new());
        mock.script_position(StreamScript::empty());

        let scheduler = Scheduler::new("sub-test");
        let mut sub = subscribe_position(&mock, &scheduler);

        assert!(sub.next().is_none());
        assert!(sub.is_finished());
        // 终结后反复拉取仍然是 None
        assert!(sub.next().is_none());
        assert!(sub.try_next().is_none());
    }

    #[test]
    fn test_failure_is_terminal() {
        let mock = Arc::new(MockTelemetryService::new());
        mock.script_position(StreamScript::fail_after(
            vec![position(1.0)],
            TransportError::ConnectionClosed,
        ));

        let scheduler = Scheduler::new("sub-test");
        let mut sub = subscribe_position(&mock, &scheduler);

        assert!(sub.next().unwrap().is_ok());
        let err = sub.next().unwrap().unwrap_err();
        assert!(err.is_transport());
        // 失败之后不会再有值
        assert!(sub.next().is_none());
    }

    #[test]
    fn test_setup_failure_single_terminal() {
        let mock = Arc::new(MockTelemetryService::new());
        mock.script_position_error(TransportError::Rejected("no daemon".into()));

        let scheduler = Scheduler::new("sub-test");
        let mut sub = subscribe_position(&mock, &scheduler);

        let err = sub.next().unwrap().unwrap_err();
        assert!(err.is_transport());
        assert!(sub.next().is_none());
    }

    #[test]
    fn test_unsubscribe_drops_stream_promptly() {
        let mock = Arc::new(MockTelemetryService::new());
        let probe = mock.script_position(StreamScript::stay_open(vec![position(1.0)]));

        let scheduler = Scheduler::new("sub-test");
        let mut sub = subscribe_position(&mock, &scheduler);

        assert!(sub.next().unwrap().is_ok());
        assert!(!probe.is_cancelled());

        let start = Instant::now();
        sub.unsubscribe();
        // 取消延迟与轮询窗口同阶
        assert!(start.elapsed() < Duration::from_millis(500));
        assert!(probe.is_cancelled());
    }

    #[test]
    fn test_drop_releases_stream() {
        let mock = Arc::new(MockTelemetryService::new());
        let probe = mock.script_position(StreamScript::stay_open(Vec::new()));

        let scheduler = Scheduler::new("sub-test");
        let sub = subscribe_position(&mock, &scheduler);
        drop(sub);

        assert!(probe.is_cancelled());
    }

    #[test]
    fn test_translation_applies_per_item() {
        let mock = Arc::new(MockTelemetryService::new());
        mock.script_in_air(StreamScript::complete(vec![false, true]));

        let scheduler = Scheduler::new("sub-test");
        let svc = mock.clone();
        // 翻译闭包逐条生效
        let sub = open_feed(
            &scheduler,
            &fast_config(),
            "in_air",
            move || svc.subscribe_in_air(),
            |v: bool| if v { 1u8 } else { 0u8 },
        );

        let values: Vec<_> = sub.map(|e| e.unwrap()).collect();
        assert_eq!(values, vec![0u8, 1u8]);
    }

    #[test]
    fn test_cold_resubscribe_issues_new_call() {
        let mock = Arc::new(MockTelemetryService::new());
        mock.script_position(StreamScript::complete(vec![position(1.0)]));
        mock.script_position(StreamScript::complete(vec![position(2.0)]));

        let scheduler = Scheduler::new("sub-test");

        let first: Vec<_> = subscribe_position(&mock, &scheduler).collect();
        let second: Vec<_> = subscribe_position(&mock, &scheduler).collect();

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].as_ref().unwrap().latitude_deg, 2.0);
        assert_eq!(mock.subscribe_count("position"), 2);
    }

    #[test]
    fn test_feed_config_default() {
        let config = FeedConfig::default();
        assert_eq!(config.poll_timeout_ms, 50);
    }
}
