//! 平滑滚动的 DOM 实现
//!
//! `.scroll-content` 被平移，body 高度跟随内容高度；`.grid--item` 卡片内的
//! `.preview-image` 做视差。

use std::cell::RefCell;
use std::rc::Rc;

use folio_runtime::{CardMetrics, ScrollConfig, ScrollDriver, ScrollSurface, SmoothScroll};
use gloo::events::EventListener;
use js_sys::Function;
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, HtmlElement, ResizeObserver, Window};

use crate::dom;

/// 视差卡片
pub struct ParallaxCard {
    card: HtmlElement,
    image: Option<HtmlElement>,
}

/// 页面滚动表面
pub struct PageScroll {
    window: Window,
    body: Option<HtmlElement>,
    content: Option<HtmlElement>,
    cards: Vec<ParallaxCard>,
}

impl PageScroll {
    pub fn new(window: Window, document: &Document) -> Self {
        let cards = dom::query_all_html(document, ".grid--item")
            .into_iter()
            .map(|card| {
                let image = dom::query_html(&*card, ".preview-image");
                ParallaxCard { card, image }
            })
            .collect();
        Self {
            window,
            body: document.body(),
            content: dom::query_html(document, ".scroll-content"),
            cards,
        }
    }

    pub fn content(&self) -> Option<&HtmlElement> {
        self.content.as_ref()
    }
}

impl ScrollSurface for PageScroll {
    type Card = ParallaxCard;

    fn scroll_offset(&self) -> f32 {
        self.window.scroll_y().unwrap_or(0.0) as f32
    }

    fn translate_content(&self, y: f32) {
        if let Some(content) = &self.content {
            dom::set_style(content, "transform", &format!("translate3d(0, -{y}px, 0)"));
        }
    }

    fn content_height(&self) -> Option<f32> {
        self.content
            .as_ref()
            .map(|content| content.client_height() as f32)
    }

    fn set_body_height(&self, height: f32) {
        if let Some(body) = &self.body {
            dom::set_style(body, "height", &format!("{height}px"));
        }
    }

    fn viewport_height(&self) -> f32 {
        self.window
            .inner_height()
            .ok()
            .and_then(|height| height.as_f64())
            .unwrap_or(0.0) as f32
    }

    fn cards(&self) -> &[ParallaxCard] {
        &self.cards
    }

    fn card_metrics(&self, card: &ParallaxCard) -> CardMetrics {
        let rect = card.card.get_bounding_client_rect();
        CardMetrics {
            top: rect.top() as f32,
            height: rect.height() as f32,
            offset_height: card.card.offset_height() as f32,
        }
    }

    fn set_card_offset(&self, card: &ParallaxCard, y: f32) {
        if let Some(image) = &card.image {
            dom::set_style(image, "transform", &format!("translate3d(0, {y}px, 0)"));
        }
    }
}

/// 创建平滑滚动并绑定 scroll 事件与 ResizeObserver
pub fn mount(
    window: &Window,
    document: &Document,
    config: ScrollConfig,
    driver: &Rc<RefCell<ScrollDriver>>,
) -> Rc<RefCell<SmoothScroll<PageScroll>>> {
    let surface = PageScroll::new(window.clone(), document);
    let content = surface.content().cloned();
    let scroll = Rc::new(RefCell::new(SmoothScroll::new(
        Rc::clone(driver),
        surface,
        config.parallax_range,
    )));

    let on_scroll = Rc::clone(&scroll);
    EventListener::new(window, "scroll", move |_| {
        on_scroll.borrow().on_scroll();
    })
    .forget();

    let Some(content) = content else {
        debug!("页面没有 .scroll-content，跳过高度同步");
        return scroll;
    };

    let on_resize = Rc::clone(&scroll);
    let callback = Closure::<dyn FnMut()>::new(move || {
        on_resize.borrow().sync_height();
    });
    match ResizeObserver::new(callback.as_ref().unchecked_ref::<Function>()) {
        Ok(observer) => {
            observer.observe(&content);
            callback.forget();
        }
        Err(e) => warn!(error = ?e, "ResizeObserver 创建失败"),
    }

    scroll
}
