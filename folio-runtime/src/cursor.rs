//! # Cursor 模块
//!
//! 自定义光标：带惯性的跟随、沿运动方向的拉伸，以及悬停可交互元素时的磁吸。
//!
//! ## 状态机
//!
//! ```text
//!            hover_enter(target)
//!   Free ───────────────────────────► Hovering(Drift | Snap)
//!    ▲                                        │
//!    └──────────── hover_exit() ◄─────────────┘
//! ```
//!
//! - **Free**：目标位置 = 指针坐标，目标缩放 = 1；每帧指数平滑，
//!   并按帧间位移旋转、拉伸（彗星尾效果）
//! - **Drift**（卡片、图库）：不磁吸，旋转归零，元素本身被指针轻微牵引
//! - **Snap**（按钮、链接）：目标位置 = 元素中心 + 15% 的指针偏移，缩放直接补间到 2
//!
//! 悬停目标和悬停标志合并为一个 `Option`，进入/离开在同一次调用中整体替换，
//! 帧更新永远不会看到"标志已清除但引用还在"的中间状态。

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::animation::{
    AnimationSystem, EasingFunction, ObjectId, Tween, TweenId, TweenSpec,
};
use crate::error::AnimationError;
use crate::ticker::{Frame, FrameListener};
use crate::vec2::{Rect, Vec2};

/// 悬停元素位移属性名
pub const PROP_X: &str = "x";
pub const PROP_Y: &str = "y";

/// 光标初始位置（视口外）
pub const INITIAL_POSITION: Vec2 = Vec2::new(-100.0, -100.0);

/// 悬停元素类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverCategory {
    /// 卡片/图库：弱牵引，元素跟随指针
    Drift,
    /// 按钮/链接：强磁吸，光标放大
    Snap,
}

/// 可悬停元素（宿主层为 DOM 元素实现）
pub trait HoverTarget {
    /// 元素当前的视口矩形
    fn bounds(&self) -> Rect;

    /// 元素类别
    fn category(&self) -> HoverCategory;

    /// 元素在补间系统中的对象 ID（需暴露 `x`、`y` 属性），不可位移时返回 `None`
    fn nudge_object(&self) -> Option<ObjectId>;
}

/// 元素牵引参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NudgeConfig {
    /// 牵引系数：元素位移 = 指针相对中心的偏移 × pull
    pub pull: f32,
    /// 追随时长（秒）
    pub duration: f32,
    pub ease: EasingFunction,
}

impl NudgeConfig {
    fn spec(&self) -> TweenSpec {
        TweenSpec::new(self.duration).with_easing(self.ease)
    }
}

/// 光标参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CursorConfig {
    /// 位置平滑系数
    #[serde(default = "default_lerp")]
    pub position_lerp: f32,
    /// 缩放平滑系数
    #[serde(default = "default_lerp")]
    pub scale_lerp: f32,
    /// 位移长度到拉伸量的换算系数
    #[serde(default = "default_stretch_factor")]
    pub stretch_factor: f32,
    /// 运动方向上的最大拉伸
    #[serde(default = "default_stretch_cap")]
    pub stretch_cap: f32,
    /// 垂直方向上的最大压缩
    #[serde(default = "default_squash_cap")]
    pub squash_cap: f32,
    /// Snap 时保留的指针偏移比例
    #[serde(default = "default_snap_pull")]
    pub snap_pull: f32,
    /// Snap 时的光标缩放
    #[serde(default = "default_snap_scale")]
    pub snap_scale: f32,
    /// Snap 缩放补间时长（秒）
    #[serde(default = "default_snap_scale_duration")]
    pub snap_scale_duration: f32,
    /// Snap 缩放补间缓动
    #[serde(default = "default_snap_scale_ease")]
    pub snap_scale_ease: EasingFunction,
    /// Drift 元素牵引
    #[serde(default = "default_drift_nudge")]
    pub drift_nudge: NudgeConfig,
    /// Snap 元素牵引
    #[serde(default = "default_snap_nudge")]
    pub snap_nudge: NudgeConfig,
}

fn default_lerp() -> f32 {
    0.1
}

fn default_stretch_factor() -> f32 {
    0.04
}

fn default_stretch_cap() -> f32 {
    1.0
}

fn default_squash_cap() -> f32 {
    0.3
}

fn default_snap_pull() -> f32 {
    0.15
}

fn default_snap_scale() -> f32 {
    2.0
}

fn default_snap_scale_duration() -> f32 {
    0.3
}

fn default_snap_scale_ease() -> EasingFunction {
    EasingFunction::EaseOutCubic
}

fn default_drift_nudge() -> NudgeConfig {
    NudgeConfig {
        pull: 0.08,
        duration: 0.5,
        ease: EasingFunction::EaseOutQuart,
    }
}

fn default_snap_nudge() -> NudgeConfig {
    NudgeConfig {
        pull: 0.3,
        duration: 1.0,
        ease: EasingFunction::EaseOutElastic,
    }
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            position_lerp: default_lerp(),
            scale_lerp: default_lerp(),
            stretch_factor: default_stretch_factor(),
            stretch_cap: default_stretch_cap(),
            squash_cap: default_squash_cap(),
            snap_pull: default_snap_pull(),
            snap_scale: default_snap_scale(),
            snap_scale_duration: default_snap_scale_duration(),
            snap_scale_ease: default_snap_scale_ease(),
            drift_nudge: default_drift_nudge(),
            snap_nudge: default_snap_nudge(),
        }
    }
}

impl CursorConfig {
    fn nudge(&self, category: HoverCategory) -> NudgeConfig {
        match category {
            HoverCategory::Drift => self.drift_nudge,
            HoverCategory::Snap => self.snap_nudge,
        }
    }
}

/// 位置平滑状态
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionState {
    pub previous: Vec2,
    pub current: Vec2,
    pub target: Vec2,
    pub lerp: f32,
}

/// 缩放平滑状态
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleState {
    pub previous: f32,
    pub current: f32,
    pub target: f32,
    pub lerp: f32,
}

/// 每帧输出给宿主层的光标变换
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorTransform {
    pub x: f32,
    pub y: f32,
    /// 旋转（度）
    pub rotation: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

struct Hover<H> {
    target: H,
    category: HoverCategory,
}

/// 磁吸光标
pub struct Cursor<H: HoverTarget> {
    config: CursorConfig,
    position: PositionState,
    scale: ScaleState,
    hover: Option<Hover<H>>,
    rotation: f32,
    /// Snap 时直接驱动的缩放补间
    scale_tween: Option<Tween>,
    next_tween_id: u64,
    last_transform: CursorTransform,
    tweens: Rc<RefCell<AnimationSystem>>,
}

impl<H: HoverTarget> Cursor<H> {
    pub fn new(config: CursorConfig, tweens: Rc<RefCell<AnimationSystem>>) -> Self {
        Self {
            config,
            position: PositionState {
                previous: INITIAL_POSITION,
                current: INITIAL_POSITION,
                target: INITIAL_POSITION,
                lerp: config.position_lerp,
            },
            scale: ScaleState {
                previous: 1.0,
                current: 1.0,
                target: 1.0,
                lerp: config.scale_lerp,
            },
            hover: None,
            rotation: 0.0,
            scale_tween: None,
            next_tween_id: 1,
            last_transform: CursorTransform {
                x: INITIAL_POSITION.x,
                y: INITIAL_POSITION.y,
                rotation: 0.0,
                scale_x: 1.0,
                scale_y: 1.0,
            },
            tweens,
        }
    }

    pub fn position(&self) -> &PositionState {
        &self.position
    }

    pub fn scale(&self) -> &ScaleState {
        &self.scale
    }

    pub fn is_hovered(&self) -> bool {
        self.hover.is_some()
    }

    /// 当前悬停元素
    pub fn hovered(&self) -> Option<&H> {
        self.hover.as_ref().map(|hover| &hover.target)
    }

    pub fn hover_category(&self) -> Option<HoverCategory> {
        self.hover.as_ref().map(|hover| hover.category)
    }

    /// 最近一次 `update` 的输出
    pub fn transform(&self) -> CursorTransform {
        self.last_transform
    }

    // ========== 事件 ==========

    /// 指针进入可交互元素
    pub fn hover_enter(&mut self, target: H) {
        let category = target.category();
        debug!(?category, "光标进入悬停");
        self.hover = Some(Hover { target, category });
    }

    /// 指针离开可交互元素：清除悬停，目标缩放回到 1，元素位移归零
    ///
    /// 光标自身的状态总会复位；元素归位补间启动失败时返回错误。
    pub fn hover_exit(&mut self) -> Result<(), AnimationError> {
        let Some(hover) = self.hover.take() else {
            return Ok(());
        };
        self.scale.target = 1.0;
        self.scale_tween = None;

        match hover.target.nudge_object() {
            Some(object) => self.nudge(object, hover.category, Vec2::zero()),
            None => Ok(()),
        }
    }

    /// 指针在悬停元素内移动：按类别牵引元素本身
    pub fn hover_move(&mut self, x: f32, y: f32) -> Result<(), AnimationError> {
        let Some(hover) = self.hover.as_ref() else {
            return Ok(());
        };
        let Some(object) = hover.target.nudge_object() else {
            return Ok(());
        };
        let category = hover.category;
        let pull = self.config.nudge(category).pull;
        let offset = (Vec2::new(x, y) - hover.target.bounds().center()).scaled(pull);
        self.nudge(object, category, offset)
    }

    fn nudge(
        &self,
        object: ObjectId,
        category: HoverCategory,
        offset: Vec2,
    ) -> Result<(), AnimationError> {
        let spec = self.config.nudge(category).spec();
        let mut tweens = self.tweens.borrow_mut();
        tweens.animate(object, PROP_X, None, offset.x, spec)?;
        tweens.animate(object, PROP_Y, None, offset.y, spec)?;
        Ok(())
    }

    /// 全局指针移动：更新目标位置与目标缩放
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        let pointer = Vec2::new(x, y);
        let Some(hover) = self.hover.as_ref() else {
            self.position.target = pointer;
            self.scale.target = 1.0;
            return;
        };

        match hover.category {
            HoverCategory::Drift => {
                self.position.target = pointer;
                self.scale.target = 1.0;
                self.rotation = 0.0;
            }
            HoverCategory::Snap => {
                let center = hover.target.bounds().center();
                let offset = (pointer - center).scaled(self.config.snap_pull);
                self.position.target = center + offset;
                self.scale.target = self.config.snap_scale;
                self.rotation = 0.0;
                self.start_snap_scale();
            }
        }
    }

    fn start_snap_scale(&mut self) {
        let heading_to_snap = self
            .scale_tween
            .as_ref()
            .is_some_and(|tween| tween.final_value() == self.config.snap_scale);
        if heading_to_snap {
            return;
        }
        let from = self.last_transform.scale_x;
        let id = TweenId::new(self.next_tween_id);
        self.next_tween_id += 1;
        self.scale_tween = Some(
            Tween::new(id, from, self.config.snap_scale, self.config.snap_scale_duration)
                .with_easing(self.config.snap_scale_ease),
        );
    }

    // ========== 帧更新 ==========

    /// 推进一帧
    pub fn update(&mut self, dt: f32) -> CursorTransform {
        self.position
            .current
            .lerp(self.position.target, self.position.lerp);
        self.scale.previous = self.scale.current;
        self.scale.current += (self.scale.target - self.scale.current) * self.scale.lerp;

        let transform = match self.hover.as_ref().map(|hover| hover.category) {
            None => {
                let mut delta = self.position.current;
                delta.sub(self.position.previous);
                self.position.previous.copy_from(self.position.current);

                let distance = delta.length() * self.config.stretch_factor;
                self.rotation = delta.angle_degrees();
                CursorTransform {
                    x: self.position.current.x,
                    y: self.position.current.y,
                    rotation: self.rotation,
                    scale_x: self.scale.current + distance.min(self.config.stretch_cap),
                    scale_y: self.scale.current - distance.min(self.config.squash_cap),
                }
            }
            Some(HoverCategory::Drift) => CursorTransform {
                x: self.position.current.x,
                y: self.position.current.y,
                rotation: self.rotation,
                scale_x: self.scale.current,
                scale_y: self.scale.current,
            },
            Some(HoverCategory::Snap) => {
                let scale = match self.scale_tween.as_mut() {
                    Some(tween) => {
                        tween.update(dt);
                        tween.current_value()
                    }
                    None => self.scale.current,
                };
                CursorTransform {
                    x: self.position.current.x,
                    y: self.position.current.y,
                    rotation: 0.0,
                    scale_x: scale,
                    scale_y: scale,
                }
            }
        };

        self.last_transform = transform;
        transform
    }
}

impl<H: HoverTarget> FrameListener for Cursor<H> {
    fn on_frame(&mut self, frame: &Frame) {
        self.update(frame.dt);
    }
}
