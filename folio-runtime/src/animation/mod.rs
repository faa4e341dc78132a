//! # Animation 模块
//!
//! 通用补间系统，负责遮罩格子、光标缩放、悬停元素位移等所有时间轴动画。
//!
//! ## 核心设计理念
//!
//! 补间系统只负责 **时间轴管理**：
//! - 知道某个属性从 A 到 B 需要在 duration 内变化
//! - 每帧把当前值写回对象（通过 `Animatable` trait）
//! - **不假设对象类型**，对象自己决定如何使用这些值（写 CSS、记录到测试桩……）
//!
//! ## 核心概念
//!
//! - `Tween`: 单个补间实例
//! - `AnimationSystem`: 补间系统管理器，支持补间组和一次性完成信号
//! - `EasingFunction`: 缓动函数
//! - `Stagger`: 一组元素的延迟分配策略

mod easing;
mod signal;
mod stagger;
mod system;
mod traits;
mod tween;

pub use easing::{EasingFunction, UnknownEasing};
pub use signal::CompletionSignal;
pub use stagger::{Stagger, StaggerFrom};
pub use system::{
    AnimationEvent, AnimationSystem, GroupCallback, GroupId, TweenRequest, TweenSpec,
};
pub use traits::{AnimPropertyKey, Animatable, ObjectId};
pub use tween::{Tween, TweenId, TweenState};
