//! # Folio Web
//!
//! 作品集站点动效层的浏览器宿主。
//!
//! 负责把 DOM 接到 [`folio_runtime`] 上：查询元素、绑定事件、实现各个
//! 宿主 trait，并用 `requestAnimationFrame` 驱动 [`Ticker`]。页面上缺失的
//! 元素只会让对应功能跳过，不会中断启动。
//!
//! ## 启动顺序
//!
//! 1. panic hook 与控制台日志
//! 2. 读取 `#folio-config` 内嵌配置，调整日志级别
//! 3. 遮罩、光标、平滑滚动、视图控制器
//! 4. Ticker 订阅顺序：补间系统 → 光标 → 平滑滚动
//! 5. 导航触发器与页面外壳
//! 6. `load` 之后揭开遮罩，并开始帧循环

mod chrome;
mod cursor;
mod dom;
mod frame_loop;
mod logging;
mod overlay;
mod scroll;
mod views;

use std::cell::RefCell;
use std::rc::Rc;

use folio_runtime::{AnimationSystem, MotionConfig, Overlay, ScrollDriver, Ticker, ViewController};
use gloo::events::EventListener;
use tracing::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{Document, Window};

use crate::frame_loop::FrameLoop;
use crate::overlay::DomOverlay;
use crate::views::{DomViews, PageViews};

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let log_level = match logging::init() {
        Ok(level) => Some(level),
        Err(e) => {
            gloo::console::warn!("日志订阅者安装失败", e.to_string());
            None
        }
    };

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let config = MotionConfig::load_or_default(dom::embedded_config(&document).as_deref());
    if let Some(level) = &log_level {
        level.set(&config.log_level);
    }

    mount(window, document, config);
    Ok(())
}

fn mount(window: Window, document: Document, config: MotionConfig) {
    let tweens = Rc::new(RefCell::new(AnimationSystem::new()));
    let driver = Rc::new(RefCell::new(ScrollDriver::new(config.scroll.easing)));

    let mut ticker = Ticker::new(config.max_frame_dt);
    ticker.add(tweens.clone());

    if let Some(cursor) = cursor::mount(&window, &document, config.cursor, &tweens) {
        ticker.add(cursor);
    }

    let smooth_scroll = scroll::mount(&window, &document, config.scroll, &driver);
    ticker.add(smooth_scroll.clone());

    let views = match dom::query_html(&document, ".overlay") {
        Some(root) => {
            let overlay = Overlay::new(
                Rc::new(DomOverlay::new(document.clone(), root)),
                config.overlay,
                Rc::clone(&tweens),
            );
            let surface = DomViews::new(window.clone(), &document, Rc::clone(&smooth_scroll));
            let views: PageViews =
                ViewController::new(overlay, surface, driver, config.transitions.clone());
            views::bind_triggers(&document, &views);
            Some(views)
        }
        None => {
            warn!("页面没有 .overlay，导航转场不可用");
            None
        }
    };

    chrome::bind(&document);

    let on_load = move || {
        smooth_scroll.borrow().sync_height();
        if let Some(views) = &views {
            views::spawn_navigation(views.reveal());
        }
    };
    if document.ready_state() == "complete" {
        on_load();
    } else {
        EventListener::once(&window, "load", move |_| on_load()).forget();
    }

    FrameLoop::new(ticker).start(&document);
    info!(
        rows = config.overlay.rows,
        columns = config.overlay.columns,
        "动效层已启动"
    );
}
