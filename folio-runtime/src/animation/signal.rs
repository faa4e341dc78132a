//! # Signal 模块
//!
//! 一次性完成信号。动画组结束时触发且只触发一次，调用方 `.await` 它来
//! 串联 "show → 切换视图 → hide" 这样的顺序。

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::error::{MotionError, MotionResult};

/// 完成信号的发送端（由动画系统持有）
#[derive(Debug)]
pub(crate) struct CompletionTrigger(oneshot::Sender<()>);

impl CompletionTrigger {
    /// 触发信号；接收端已被丢弃时静默忽略
    pub(crate) fn fire(self) {
        let _ = self.0.send(());
    }
}

/// 完成信号（接收端）
///
/// - 正常结束：`Ok(())`
/// - 发送端在触发前被丢弃（例如动画系统被清空）：`Err(MotionError::TransitionAbandoned)`
#[derive(Debug)]
#[must_use = "完成信号需要被 await 才能观察到动画结束"]
pub struct CompletionSignal {
    rx: oneshot::Receiver<()>,
}

impl CompletionSignal {
    pub(crate) fn pair() -> (CompletionTrigger, CompletionSignal) {
        let (tx, rx) = oneshot::channel();
        (CompletionTrigger(tx), CompletionSignal { rx })
    }

    /// 非阻塞查询：信号是否已经触发
    ///
    /// 只适合在测试或调试中轮询；正常流程应当 `.await`。
    pub fn try_complete(&mut self) -> Option<MotionResult<()>> {
        match self.rx.try_recv() {
            Ok(()) => Some(Ok(())),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(MotionError::TransitionAbandoned)),
        }
    }
}

impl Future for CompletionSignal {
    type Output = MotionResult<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|result| result.map_err(|_| MotionError::TransitionAbandoned))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_once() {
        let (trigger, mut signal) = CompletionSignal::pair();
        assert!(signal.try_complete().is_none());
        trigger.fire();
        assert_eq!(signal.try_complete(), Some(Ok(())));
    }

    #[test]
    fn test_dropped_trigger_is_abandoned() {
        let (trigger, mut signal) = CompletionSignal::pair();
        drop(trigger);
        assert_eq!(
            signal.try_complete(),
            Some(Err(MotionError::TransitionAbandoned))
        );
    }

    #[tokio::test]
    async fn test_await_signal() {
        let (trigger, signal) = CompletionSignal::pair();
        trigger.fire();
        assert_eq!(signal.await, Ok(()));
    }
}
