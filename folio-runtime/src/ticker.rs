//! # Ticker 模块
//!
//! 每帧调度：宿主层每个动画帧调用一次 [`Ticker::tick`]，Ticker 把同一帧
//! 分发给所有订阅者（补间系统、光标、平滑滚动），订阅者彼此不知道对方存在。

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

use crate::animation::AnimationSystem;

/// 默认帧间隔上限（秒）
pub const DEFAULT_MAX_FRAME_DT: f32 = 0.05;

/// 一帧
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// 距上一帧的时间（秒，已截断）
    pub dt: f32,
    /// 宿主提供的时间戳（毫秒）
    pub timestamp: f64,
}

/// 帧订阅者
pub trait FrameListener {
    fn on_frame(&mut self, frame: &Frame);
}

impl FrameListener for AnimationSystem {
    fn on_frame(&mut self, frame: &Frame) {
        let events = self.update(frame.dt);
        if !events.is_empty() {
            trace!(count = events.len(), "补间事件");
        }
    }
}

/// 订阅句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// 帧调度器
pub struct Ticker {
    listeners: Vec<(ListenerId, Rc<RefCell<dyn FrameListener>>)>,
    next_id: u64,
    last_timestamp: Option<f64>,
    max_frame_dt: f32,
}

impl Ticker {
    pub fn new(max_frame_dt: f32) -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 1,
            last_timestamp: None,
            max_frame_dt,
        }
    }

    /// 订阅；按订阅顺序分发
    pub fn add(&mut self, listener: Rc<RefCell<dyn FrameListener>>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// 忘记上一帧时间戳（页面从后台恢复时调用，避免一次巨大的 dt）
    pub fn reset(&mut self) {
        self.last_timestamp = None;
    }

    /// 推进一帧。`timestamp` 为毫秒；第一帧 dt 为 0。
    pub fn tick(&mut self, timestamp: f64) -> Frame {
        let dt = match self.last_timestamp {
            Some(last) => (((timestamp - last) / 1000.0) as f32).clamp(0.0, self.max_frame_dt),
            None => 0.0,
        };
        self.last_timestamp = Some(timestamp);

        let frame = Frame { dt, timestamp };
        for (_, listener) in &self.listeners {
            listener.borrow_mut().on_frame(&frame);
        }
        frame
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FRAME_DT)
    }
}
