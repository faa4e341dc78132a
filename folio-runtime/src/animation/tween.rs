//! # Tween 模块
//!
//! 单个补间实例：只关注一个 f32 值在时间轴上的变化，不假设对象类型。

use super::EasingFunction;

/// 补间 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenId(pub u64);

impl TweenId {
    /// 创建新的补间 ID
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

/// 补间状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TweenState {
    /// 等待开始（有延迟）
    #[default]
    Pending,
    /// 正在播放
    Playing,
    /// 已完成
    Completed,
    /// 已跳过
    Skipped,
}

impl TweenState {
    /// 是否为活跃状态（需要更新）
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Playing)
    }

    /// 是否已结束
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Completed | Self::Skipped)
    }
}

/// 补间实例
///
/// 管理单个 f32 值从 `from` 到 `to` 在 `duration` 时间内的变化。
#[derive(Debug, Clone)]
pub struct Tween {
    /// 补间 ID
    pub id: TweenId,
    /// 起始值
    pub from: f32,
    /// 目标值
    pub to: f32,
    /// 时长（秒）
    pub duration: f32,
    /// 缓动函数
    pub easing: EasingFunction,
    /// 延迟启动（秒）
    pub delay: f32,
    /// 当前状态
    pub state: TweenState,
    /// 当前进度（已应用缓动）
    pub progress: f32,
    /// 已经过的时间
    elapsed: f32,
}

impl Tween {
    /// 创建新的补间
    ///
    /// 时长为 0 时不会立即完成：仍需经过延迟，并在第一次 `update` 时落到终值。
    pub fn new(id: TweenId, from: f32, to: f32, duration: f32) -> Self {
        Self {
            id,
            from,
            to,
            duration: duration.max(0.0),
            easing: EasingFunction::default(),
            delay: 0.0,
            state: TweenState::Pending,
            progress: 0.0,
            elapsed: 0.0,
        }
    }

    /// 设置缓动函数
    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// 设置延迟
    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    /// 更新补间
    ///
    /// # 返回
    /// - `true`: 仍在进行中
    /// - `false`: 已结束
    pub fn update(&mut self, dt: f32) -> bool {
        match self.state {
            TweenState::Pending => {
                self.elapsed += dt;
                if self.elapsed >= self.delay {
                    self.state = TweenState::Playing;
                    self.elapsed -= self.delay;
                    self.update_playing()
                } else {
                    true
                }
            }
            TweenState::Playing => {
                self.elapsed += dt;
                self.update_playing()
            }
            TweenState::Completed | TweenState::Skipped => false,
        }
    }

    fn update_playing(&mut self) -> bool {
        if self.duration <= 0.0 {
            self.progress = 1.0;
            self.state = TweenState::Completed;
            return false;
        }

        let raw_progress = self.elapsed / self.duration;
        if raw_progress >= 1.0 {
            self.progress = 1.0;
            self.state = TweenState::Completed;
            false
        } else {
            self.progress = self.easing.apply(raw_progress);
            true
        }
    }

    /// 跳过补间，直接到终值
    pub fn skip(&mut self) {
        if self.state.is_active() {
            self.progress = 1.0;
            self.state = TweenState::Skipped;
        }
    }

    /// 获取当前值
    pub fn current_value(&self) -> f32 {
        self.from + (self.to - self.from) * self.progress
    }

    /// 获取最终值
    pub fn final_value(&self) -> f32 {
        self.to
    }

    /// 是否已结束
    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// 是否为活跃状态
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }
}
