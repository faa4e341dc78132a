//! 光标的 DOM 绑定
//!
//! - `window` 的 `pointermove` → [`Cursor::pointer_move`]
//! - 每个 `[data-hover]` 元素的 `mouseenter`/`mouseleave`/`mousemove`
//! - 每帧把 [`CursorTransform`] 写到 `.cursor` 元素上

use std::cell::RefCell;
use std::rc::Rc;

use folio_runtime::{
    AnimationSystem, Cursor, CursorConfig, CursorTransform, Frame, FrameListener, HoverCategory,
    HoverTarget, ObjectId, Rect,
};
use gloo::events::EventListener;
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, MouseEvent, Window};

use crate::dom::{self, TranslateNode};

/// 可悬停元素选择器
pub const HOVER_SELECTOR: &str = "[data-hover]";

/// 带有这些类名的元素属于 Drift 类别
pub const DRIFT_CLASSES: &[&str] = &["grid--item", "gallery-item"];

/// 按类名判断悬停类别：命中任一 [`DRIFT_CLASSES`] 为 Drift，否则 Snap
fn hover_category(has_class: impl Fn(&str) -> bool) -> HoverCategory {
    if DRIFT_CLASSES.iter().any(|class| has_class(class)) {
        HoverCategory::Drift
    } else {
        HoverCategory::Snap
    }
}

/// 一个 `[data-hover]` 元素
#[derive(Clone)]
pub struct HoverElement {
    el: Element,
    category: HoverCategory,
    nudge: Option<ObjectId>,
}

impl HoverElement {
    fn new(el: Element, nudge: Option<ObjectId>) -> Self {
        let category = hover_category(|class| dom::has_class(&el, class));
        Self {
            el,
            category,
            nudge,
        }
    }
}

impl HoverTarget for HoverElement {
    fn bounds(&self) -> Rect {
        dom::bounds(&self.el)
    }

    fn category(&self) -> HoverCategory {
        self.category
    }

    fn nudge_object(&self) -> Option<ObjectId> {
        self.nudge
    }
}

/// 光标元素 + 状态，作为帧订阅者运行
pub struct CursorView {
    el: HtmlElement,
    cursor: Rc<RefCell<Cursor<HoverElement>>>,
}

impl CursorView {
    fn apply(&self, t: CursorTransform) {
        dom::set_style(&self.el, "transform", &transform_css(t));
    }
}

/// 光标元素的 CSS `transform`
fn transform_css(t: CursorTransform) -> String {
    format!(
        "translate3d({}px, {}px, 0) rotate({}deg) scale({}, {})",
        t.x, t.y, t.rotation, t.scale_x, t.scale_y
    )
}

impl FrameListener for CursorView {
    fn on_frame(&mut self, frame: &Frame) {
        let transform = self.cursor.borrow_mut().update(frame.dt);
        self.apply(transform);
    }
}

fn client_position(event: &Event) -> Option<(f32, f32)> {
    let event = event.dyn_ref::<MouseEvent>()?;
    Some((event.client_x() as f32, event.client_y() as f32))
}

/// 绑定光标；页面没有 `.cursor` 元素时返回 `None`
pub fn mount(
    window: &Window,
    document: &Document,
    config: CursorConfig,
    tweens: &Rc<RefCell<AnimationSystem>>,
) -> Option<Rc<RefCell<CursorView>>> {
    let Some(el) = dom::query_html(document, ".cursor") else {
        debug!("页面没有 .cursor，跳过光标");
        return None;
    };
    let cursor = Rc::new(RefCell::new(Cursor::new(config, Rc::clone(tweens))));

    let pointer = Rc::clone(&cursor);
    EventListener::new(window, "pointermove", move |event| {
        if let Some((x, y)) = client_position(event) {
            pointer.borrow_mut().pointer_move(x, y);
        }
    })
    .forget();

    let targets = dom::query_all(document, HOVER_SELECTOR);
    for target in &targets {
        let nudge = target
            .clone()
            .dyn_into::<HtmlElement>()
            .ok()
            .map(|html| tweens.borrow_mut().register(Rc::new(TranslateNode::new(html))));
        let hover = HoverElement::new(target.clone(), nudge);

        let enter = Rc::clone(&cursor);
        EventListener::new(target, "mouseenter", move |_| {
            enter.borrow_mut().hover_enter(hover.clone());
        })
        .forget();

        let leave = Rc::clone(&cursor);
        EventListener::new(target, "mouseleave", move |_| {
            if let Err(e) = leave.borrow_mut().hover_exit() {
                warn!(error = %e, "悬停元素归位失败");
            }
        })
        .forget();

        let moving = Rc::clone(&cursor);
        EventListener::new(target, "mousemove", move |event| {
            let Some((x, y)) = client_position(event) else {
                return;
            };
            let mut cursor = moving.borrow_mut();
            if let Err(e) = cursor.hover_move(x, y) {
                warn!(category = ?cursor.hover_category(), error = %e, "悬停元素牵引失败");
            }
        })
        .forget();
    }
    debug!(targets = targets.len(), "光标已绑定");

    Some(Rc::new(RefCell::new(CursorView { el, cursor })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hover_category_from_classes() {
        assert_eq!(hover_category(|c| c == "grid--item"), HoverCategory::Drift);
        assert_eq!(hover_category(|c| c == "gallery-item"), HoverCategory::Drift);
        assert_eq!(hover_category(|c| c == "menu-link"), HoverCategory::Snap);
        assert_eq!(hover_category(|_| false), HoverCategory::Snap);
    }

    #[test]
    fn test_transform_css() {
        let t = CursorTransform {
            x: 12.5,
            y: -4.0,
            rotation: 45.0,
            scale_x: 1.2,
            scale_y: 0.8,
        };
        assert_eq!(
            transform_css(t),
            "translate3d(12.5px, -4px, 0) rotate(45deg) scale(1.2, 0.8)"
        );
    }
}
