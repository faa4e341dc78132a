//! 视图切换的 DOM 实现与导航触发器
//!
//! | 触发器 | 导航 |
//! |---|---|
//! | `.trigger-transition`（`data-target`） | 进入作品集 |
//! | `.back-to-home-trigger` | 返回落地页 |
//! | `[data-page-transition]` | 整页跳转 |

use std::cell::RefCell;
use std::rc::Rc;

use folio_runtime::{
    Navigation, SmoothScroll, ViewController, ViewSurface, is_page_target, section_visible,
};
use gloo::events::EventListener;
use tracing::{debug, warn};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Window};

use crate::dom;
use crate::overlay::DomOverlay;
use crate::scroll::PageScroll;

pub type PageViews = ViewController<DomOverlay, DomViews>;

const VIEW_HIDDEN_CLASS: &str = "view--hidden";
const VIEW_ACTIVE_CLASS: &str = "view--active";
const SECTION_HIDDEN_CLASS: &str = "is-hidden";

/// 落地页与作品集两个视图容器
pub struct DomViews {
    window: Window,
    landing: Option<Element>,
    portfolio: Option<Element>,
    sections: Vec<Element>,
    scroll: Rc<RefCell<SmoothScroll<PageScroll>>>,
}

impl DomViews {
    pub fn new(
        window: Window,
        document: &Document,
        scroll: Rc<RefCell<SmoothScroll<PageScroll>>>,
    ) -> Self {
        Self {
            window,
            landing: dom::query_all(document, ".landing-view").into_iter().next(),
            portfolio: dom::query_all(document, ".portfolio-view").into_iter().next(),
            sections: dom::query_all(document, ".portfolio-section"),
            scroll,
        }
    }

    /// 页面同时拥有两个视图时才启用单页切换
    pub fn has_views(&self) -> bool {
        self.landing.is_some() && self.portfolio.is_some()
    }
}

impl ViewSurface for DomViews {
    fn show_portfolio(&self) {
        set_view_classes(self.landing.as_ref(), self.portfolio.as_ref(), true);
    }

    fn show_landing(&self) {
        set_view_classes(self.landing.as_ref(), self.portfolio.as_ref(), false);
    }

    fn filter_sections(&self, target: Option<&str>) {
        filter_section_elements(&self.sections, target);
    }

    fn sync_body_height(&self) {
        self.scroll.borrow().sync_height();
    }

    fn scroll_to_top(&self) {
        self.window.scroll_to_with_x_and_y(0.0, 0.0);
    }

    fn navigate(&self, url: &str) {
        if let Err(e) = self.window.location().set_href(url) {
            warn!(url, error = ?e, "页面跳转失败");
        }
    }
}

/// 作品集激活时隐藏落地页，反之亦然
fn set_view_classes(landing: Option<&Element>, portfolio: Option<&Element>, portfolio_active: bool) {
    if let Some(landing) = landing {
        dom::set_class(landing, VIEW_HIDDEN_CLASS, portfolio_active);
    }
    if let Some(portfolio) = portfolio {
        dom::set_class(portfolio, VIEW_ACTIVE_CLASS, portfolio_active);
    }
}

/// 按元素 ID 只保留目标分区；没有目标时全部显示
fn filter_section_elements(sections: &[Element], target: Option<&str>) {
    for section in sections {
        let visible = section_visible(&section.id(), target);
        dom::set_class(section, SECTION_HIDDEN_CLASS, !visible);
    }
}

/// 驱动导航续体
pub fn spawn_navigation(navigation: Navigation) {
    let Some(task) = navigation.into_task() else {
        return;
    };
    spawn_local(async move {
        if let Err(e) = task.await {
            warn!(error = %e, "导航未完成");
        }
    });
}

/// 绑定所有导航触发器
pub fn bind_triggers(document: &Document, views: &PageViews) {
    // 整页跳转在所有页面都可用
    for link in dom::query_all(document, "[data-page-transition]") {
        let views = views.clone();
        let target = link.get_attribute("data-page-transition");
        EventListener::new(&link, "click", move |event| {
            // 无效目标保留链接默认行为
            let Some(target) = target.as_deref().filter(|target| is_page_target(target)) else {
                return;
            };
            event.prevent_default();
            spawn_navigation(views.leave_page(target));
        })
        .forget();
    }

    if !views.surface().has_views() {
        debug!("页面没有落地页/作品集视图，跳过单页切换");
        return;
    }

    for trigger in dom::query_all(document, ".trigger-transition") {
        let views = views.clone();
        let target = trigger.get_attribute("data-target");
        EventListener::new(&trigger, "click", move |event| {
            event.prevent_default();
            spawn_navigation(views.enter_portfolio(target.as_deref()));
        })
        .forget();
    }

    for trigger in dom::query_all(document, ".back-to-home-trigger") {
        let views = views.clone();
        EventListener::new(&trigger, "click", move |event| {
            event.prevent_default();
            spawn_navigation(views.leave_portfolio());
        })
        .forget();
    }
}
