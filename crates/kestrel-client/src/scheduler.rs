//! 工作线程调度
//!
//! 每次一元调用和每个遥测订阅都在独立的命名工作线程上执行，事件
//! 经通道交付给调用方。调度器只负责起线程和命名，不持有任何调用
//! 状态；线程的回收由各自的句柄（等待或取消时）完成。

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

/// 命名工作线程的派生器
///
/// 线程名形如 `{prefix}-{label}-{seq}`，方便在调试器和日志里区分
/// 不同调用的工作线程。
#[derive(Debug)]
pub struct Scheduler {
    name_prefix: String,
    seq: AtomicUsize,
}

impl Scheduler {
    /// 用给定线程名前缀创建调度器
    pub fn new(name_prefix: impl Into<String>) -> Self {
        Self {
            name_prefix: name_prefix.into(),
            seq: AtomicUsize::new(0),
        }
    }

    /// 派生一个工作线程
    ///
    /// 返回 `Err` 表示操作系统拒绝创建线程；调用方必须把它转成该次
    /// 调用的终结失败事件，而不是 panic。
    pub(crate) fn spawn<F>(&self, label: &str, f: F) -> io::Result<JoinHandle<()>>
    where
        F: FnOnce() + Send + 'static,
    {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let name = format!("{}-{}-{}", self.name_prefix, label, seq);
        thread::Builder::new().name(name).spawn(f)
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new("kestrel")
    }
}
