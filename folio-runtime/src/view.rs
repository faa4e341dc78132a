//! # View 模块
//!
//! 导航编排：在遮罩后面切换落地页/作品集视图与作品集分区。
//!
//! ## 状态机
//!
//! ```text
//! idle ──click──► show 进行中 ──show 完成──► 切换视图（同步）──► hide 进行中 ──hide 完成──► idle
//! ```
//!
//! 整个过程由一个 `is_animating` 标志保护：标志为真时收到的导航一律忽略，不排队。
//! show 完成、切换视图、调用 hide 三者的先后由 `async` 续体保证。
//!
//! 遮罩信号永远不完成时标志会一直保持为真，导航从此失效；这里不做超时恢复。

use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::animation::{EasingFunction, Stagger};
use crate::error::{MotionError, MotionResult};
use crate::overlay::{Overlay, OverlayRoot, TransitionConfig};
use crate::scroll::ScrollDriver;

/// 宿主层的视图表面
pub trait ViewSurface {
    /// 隐藏落地页，显示作品集
    fn show_portfolio(&self);

    /// 隐藏作品集，显示落地页
    fn show_landing(&self);

    /// 作品集分区过滤：`Some("#id")` 只显示该分区，`None` 显示全部
    fn filter_sections(&self, target: Option<&str>);

    /// 按内容重新计算 body 高度
    fn sync_body_height(&self);

    /// 真实滚动回到顶部
    fn scroll_to_top(&self);

    /// 整页跳转
    fn navigate(&self, url: &str);
}

/// 分区 `section_id` 在过滤目标 `target` 下是否可见
pub fn section_visible(section_id: &str, target: Option<&str>) -> bool {
    match target {
        None | Some("") => true,
        Some(target) => target.strip_prefix('#') == Some(section_id),
    }
}

/// 整页跳转目标是否有效（空串与 `#` 无效）
pub fn is_page_target(url: &str) -> bool {
    !url.is_empty() && url != "#"
}

/// 当前显示的视图
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Landing,
    Portfolio,
}

/// 导航续体：show → 切换 → hide 整条链
pub type NavigationTask = Pin<Box<dyn Future<Output = MotionResult<()>>>>;

/// 一次导航请求的结果
#[must_use = "导航续体需要被 spawn 才会切换视图"]
pub enum Navigation {
    /// 已开始，遮罩已经呈现；续体需要被驱动
    Started(NavigationTask),
    /// 转场进行中或目标无效，被忽略
    Ignored,
}

impl Navigation {
    pub fn is_started(&self) -> bool {
        matches!(self, Navigation::Started(_))
    }

    pub fn into_task(self) -> Option<NavigationTask> {
        match self {
            Navigation::Started(task) => Some(task),
            Navigation::Ignored => None,
        }
    }
}

impl fmt::Debug for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Navigation::Started(_) => f.write_str("Navigation::Started(..)"),
            Navigation::Ignored => f.write_str("Navigation::Ignored"),
        }
    }
}

/// 各导航使用的遮罩参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionPresets {
    /// 页面加载时揭开
    #[serde(default = "default_reveal")]
    pub reveal: TransitionConfig,
    #[serde(default = "default_enter_portfolio_show")]
    pub enter_portfolio_show: TransitionConfig,
    #[serde(default = "default_enter_portfolio_hide")]
    pub enter_portfolio_hide: TransitionConfig,
    #[serde(default = "default_leave_portfolio_show")]
    pub leave_portfolio_show: TransitionConfig,
    #[serde(default = "default_leave_portfolio_hide")]
    pub leave_portfolio_hide: TransitionConfig,
    /// 整页跳转前盖住
    #[serde(default = "default_page_leave")]
    pub page_leave: TransitionConfig,
}

fn preset(origin: &str, duration: f32, ease: EasingFunction) -> TransitionConfig {
    TransitionConfig::new(origin, duration, ease, Some(Stagger::Each(0.005)))
}

fn default_reveal() -> TransitionConfig {
    preset("50% 100%", 0.5, EasingFunction::EaseOutCubic)
}

fn default_enter_portfolio_show() -> TransitionConfig {
    preset("50% 0%", 0.2, EasingFunction::EaseInOutQuart)
}

fn default_enter_portfolio_hide() -> TransitionConfig {
    preset("50% 100%", 0.2, EasingFunction::EaseOutCubic)
}

fn default_leave_portfolio_show() -> TransitionConfig {
    preset("50% 100%", 0.2, EasingFunction::EaseInOutQuart)
}

fn default_leave_portfolio_hide() -> TransitionConfig {
    preset("50% 0%", 0.2, EasingFunction::EaseOutCubic)
}

fn default_page_leave() -> TransitionConfig {
    preset("50% 50%", 0.25, EasingFunction::EaseInOutCubic)
}

impl Default for TransitionPresets {
    fn default() -> Self {
        Self {
            reveal: default_reveal(),
            enter_portfolio_show: default_enter_portfolio_show(),
            enter_portfolio_hide: default_enter_portfolio_hide(),
            leave_portfolio_show: default_leave_portfolio_show(),
            leave_portfolio_hide: default_leave_portfolio_hide(),
            page_leave: default_page_leave(),
        }
    }
}

struct Inner<R: OverlayRoot, V> {
    overlay: Overlay<R>,
    surface: V,
    scroll: Rc<RefCell<ScrollDriver>>,
    presets: TransitionPresets,
    is_animating: Cell<bool>,
    active_view: Cell<ActiveView>,
    active_section: RefCell<Option<String>>,
}

impl<R: OverlayRoot + 'static, V: ViewSurface> Inner<R, V> {
    /// 新视图从顶部开始：body 高度、真实滚动、虚拟滚动一起归位
    fn settle_scroll(&self) {
        self.surface.sync_body_height();
        self.surface.scroll_to_top();
        self.scroll.borrow_mut().reset();
    }
}

/// 视图控制器
///
/// 克隆只复制句柄，所有克隆共享同一个 `is_animating` 标志。
pub struct ViewController<R: OverlayRoot, V> {
    inner: Rc<Inner<R, V>>,
}

impl<R: OverlayRoot, V> Clone for ViewController<R, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<R: OverlayRoot + 'static, V: ViewSurface + 'static> ViewController<R, V> {
    pub fn new(
        overlay: Overlay<R>,
        surface: V,
        scroll: Rc<RefCell<ScrollDriver>>,
        presets: TransitionPresets,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                overlay,
                surface,
                scroll,
                presets,
                is_animating: Cell::new(false),
                active_view: Cell::new(ActiveView::Landing),
                active_section: RefCell::new(None),
            }),
        }
    }

    pub fn is_animating(&self) -> bool {
        self.inner.is_animating.get()
    }

    pub fn active_view(&self) -> ActiveView {
        self.inner.active_view.get()
    }

    /// 当前分区过滤目标，`None` 表示显示全部
    pub fn active_section(&self) -> Option<String> {
        self.inner.active_section.borrow().clone()
    }

    pub fn overlay(&self) -> &Overlay<R> {
        &self.inner.overlay
    }

    pub fn surface(&self) -> &V {
        &self.inner.surface
    }

    fn begin(&self, operation: &'static str) -> bool {
        if self.inner.is_animating.get() {
            debug!(operation, "转场进行中，忽略导航");
            return false;
        }
        self.inner.is_animating.set(true);
        true
    }

    // ========== 导航 ==========

    /// 落地页 → 作品集，可选只显示某个分区
    pub fn enter_portfolio(&self, target_section: Option<&str>) -> Navigation {
        if !self.begin("enter_portfolio") {
            return Navigation::Ignored;
        }
        let target = target_section
            .filter(|target| !target.is_empty())
            .map(str::to_owned);
        info!(section = target.as_deref().unwrap_or("*"), "进入作品集");

        let inner = Rc::clone(&self.inner);
        let show = inner.overlay.show(&inner.presets.enter_portfolio_show);
        Navigation::Started(Box::pin(async move {
            show?.await?;

            inner.surface.show_portfolio();
            inner.active_view.set(ActiveView::Portfolio);
            inner.surface.filter_sections(target.as_deref());
            *inner.active_section.borrow_mut() = target;
            inner.settle_scroll();

            inner
                .overlay
                .hide(&inner.presets.enter_portfolio_hide)?
                .await?;
            inner.is_animating.set(false);
            debug!("进入作品集完成");
            Ok::<_, MotionError>(())
        }))
    }

    /// 作品集 → 落地页
    pub fn leave_portfolio(&self) -> Navigation {
        if !self.begin("leave_portfolio") {
            return Navigation::Ignored;
        }
        info!("返回落地页");

        let inner = Rc::clone(&self.inner);
        let show = inner.overlay.show(&inner.presets.leave_portfolio_show);
        Navigation::Started(Box::pin(async move {
            show?.await?;

            inner.surface.show_landing();
            inner.active_view.set(ActiveView::Landing);
            inner.settle_scroll();

            inner
                .overlay
                .hide(&inner.presets.leave_portfolio_hide)?
                .await?;
            inner.is_animating.set(false);
            debug!("返回落地页完成");
            Ok::<_, MotionError>(())
        }))
    }

    /// 盖住视口后整页跳转。页面随即卸载，标志不再复位。
    pub fn leave_page(&self, url: &str) -> Navigation {
        if !is_page_target(url) {
            debug!(url, "跳转目标无效，忽略");
            return Navigation::Ignored;
        }
        if !self.begin("leave_page") {
            return Navigation::Ignored;
        }

        let url = url.to_owned();
        let inner = Rc::clone(&self.inner);
        let show = inner.overlay.show(&inner.presets.page_leave);
        Navigation::Started(Box::pin(async move {
            show?.await?;
            info!(url = %url, "离开页面");
            inner.surface.navigate(&url);
            Ok::<_, MotionError>(())
        }))
    }

    /// 页面加载：遮罩先盖住视口，再揭开
    pub fn reveal(&self) -> Navigation {
        if !self.begin("reveal") {
            return Navigation::Ignored;
        }

        let inner = Rc::clone(&self.inner);
        inner.overlay.set_opaque();
        let hide = inner.overlay.hide(&inner.presets.reveal);
        Navigation::Started(Box::pin(async move {
            hide?.await?;
            inner.is_animating.set(false);
            debug!("页面揭开完成");
            Ok::<_, MotionError>(())
        }))
    }
}
