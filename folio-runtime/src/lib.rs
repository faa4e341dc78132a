//! # Folio Runtime
//!
//! 作品集站点动效层的核心库。
//!
//! ## 架构概述
//!
//! `folio-runtime` 是纯逻辑核心，不依赖 DOM 或任何 IO。
//! 它与宿主层（`folio-web`）之间遵循 **核心决定、宿主执行** 的分工：
//!
//! ```text
//! Host (folio-web)                     Runtime
//!   │                                      │
//!   │──── 事件（指针、滚动、点击）──────────►│ Cursor / ScrollDriver / ViewController
//!   │──── Ticker::tick(timestamp) ────────►│ AnimationSystem / Cursor / SmoothScroll
//!   │                                      │
//!   │◄─── 属性写入（Animatable）、变换、视图切换 ──│
//! ```
//!
//! 宿主层通过几个小 trait 暴露 DOM：[`Animatable`]、[`OverlayRoot`]、
//! [`HoverTarget`]、[`ScrollSurface`]、[`ViewSurface`]。
//!
//! ## 使用示例
//!
//! ```ignore
//! let tweens = Rc::new(RefCell::new(AnimationSystem::new()));
//! let overlay = Overlay::new(root, config.overlay, tweens.clone());
//! let views = ViewController::new(overlay, surface, scroll, config.transitions);
//!
//! // 点击导航
//! if let Navigation::Started(task) = views.enter_portfolio(Some("#work")) {
//!     spawn_local(async move {
//!         if let Err(e) = task.await {
//!             warn!(error = %e, "导航失败");
//!         }
//!     });
//! }
//!
//! // 每帧
//! ticker.tick(timestamp);
//! ```
//!
//! ## 模块结构
//!
//! - [`vec2`]：二维向量与矩形
//! - [`animation`]：补间系统、缓动、交错延迟、完成信号
//! - [`overlay`]：格子遮罩转场
//! - [`cursor`]：磁吸光标
//! - [`scroll`]：平滑滚动与视差
//! - [`view`]：导航编排
//! - [`ticker`]：每帧调度
//! - [`chrome`]：主题、菜单、弹窗状态
//! - [`config`]：配置
//! - [`error`]：错误类型定义

pub mod animation;
pub mod chrome;
pub mod config;
pub mod cursor;
pub mod error;
pub mod overlay;
pub mod scroll;
pub mod ticker;
pub mod vec2;
pub mod view;

// 重导出核心类型
pub use animation::{
    Animatable, AnimationEvent, AnimationSystem, CompletionSignal, EasingFunction, ObjectId,
    Stagger, StaggerFrom, TweenSpec,
};
pub use chrome::{MenuState, ModalState, ThemeState};
pub use config::MotionConfig;
pub use cursor::{
    Cursor, CursorConfig, CursorTransform, HoverCategory, HoverTarget, NudgeConfig,
};
pub use error::{AnimationError, ConfigError, MotionError, MotionResult};
pub use overlay::{CellNode, Overlay, OverlayOptions, OverlayRoot, TransitionConfig};
pub use scroll::{CardMetrics, ScrollConfig, ScrollDriver, ScrollSurface, SmoothScroll, parallax_offset};
pub use ticker::{Frame, FrameListener, Ticker};
pub use vec2::{Rect, Vec2};
pub use view::{
    ActiveView, Navigation, NavigationTask, TransitionPresets, ViewController, ViewSurface,
    is_page_target, section_visible,
};
