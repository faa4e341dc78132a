//! DOM 查询与样式写入的小工具
//!
//! 找不到元素不算错误：查询函数返回 `Option`/空列表，调用方直接跳过。

use std::cell::Cell;

use folio_runtime::Animatable;
use folio_runtime::cursor::{PROP_X, PROP_Y};
use folio_runtime::vec2::Rect;
use tracing::debug;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, NodeList};

/// 内嵌配置脚本的元素 ID
pub const CONFIG_ELEMENT_ID: &str = "folio-config";

/// 可以做选择器查询的节点（文档或元素）
pub trait Queryable {
    fn select(&self, selector: &str) -> Option<Element>;
    fn select_all(&self, selector: &str) -> Option<NodeList>;
}

impl Queryable for Document {
    fn select(&self, selector: &str) -> Option<Element> {
        self.query_selector(selector).ok().flatten()
    }

    fn select_all(&self, selector: &str) -> Option<NodeList> {
        self.query_selector_all(selector).ok()
    }
}

impl Queryable for Element {
    fn select(&self, selector: &str) -> Option<Element> {
        self.query_selector(selector).ok().flatten()
    }

    fn select_all(&self, selector: &str) -> Option<NodeList> {
        self.query_selector_all(selector).ok()
    }
}

/// 第一个匹配的 `HtmlElement`
pub fn query_html(root: &impl Queryable, selector: &str) -> Option<HtmlElement> {
    root.select(selector)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

/// 所有匹配的元素（文档顺序）
pub fn query_all(root: &impl Queryable, selector: &str) -> Vec<Element> {
    let Some(list) = root.select_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// 所有匹配的 `HtmlElement`
pub fn query_all_html(root: &impl Queryable, selector: &str) -> Vec<HtmlElement> {
    query_all(root, selector)
        .into_iter()
        .filter_map(|el| el.dyn_into::<HtmlElement>().ok())
        .collect()
}

/// 内嵌 JSON 配置的文本
pub fn embedded_config(document: &Document) -> Option<String> {
    document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
}

/// 写一条内联样式
pub fn set_style(el: &HtmlElement, property: &str, value: &str) {
    if let Err(e) = el.style().set_property(property, value) {
        debug!(property, error = ?e, "样式写入失败");
    }
}

/// 元素的视口矩形
pub fn bounds(el: &Element) -> Rect {
    let rect = el.get_bounding_client_rect();
    Rect::new(
        rect.x() as f32,
        rect.y() as f32,
        rect.width() as f32,
        rect.height() as f32,
    )
}

pub fn has_class(el: &Element, class: &str) -> bool {
    el.class_list().contains(class)
}

/// 按布尔值添加或移除类名
pub fn set_class(el: &Element, class: &str, on: bool) {
    if let Err(e) = el.class_list().toggle_with_force(class, on) {
        debug!(class, error = ?e, "类名切换失败");
    }
}

/// 可位移元素：`x`、`y` 以 `translate3d` 写入
#[derive(Debug)]
pub struct TranslateNode {
    el: HtmlElement,
    x: Cell<f32>,
    y: Cell<f32>,
}

impl TranslateNode {
    pub fn new(el: HtmlElement) -> Self {
        Self {
            el,
            x: Cell::new(0.0),
            y: Cell::new(0.0),
        }
    }

    fn apply(&self) {
        let transform = format!("translate3d({}px, {}px, 0)", self.x.get(), self.y.get());
        set_style(&self.el, "transform", &transform);
    }
}

impl Animatable for TranslateNode {
    fn get_property(&self, property_id: &str) -> Option<f32> {
        match property_id {
            PROP_X => Some(self.x.get()),
            PROP_Y => Some(self.y.get()),
            _ => None,
        }
    }

    fn set_property(&self, property_id: &str, value: f32) -> bool {
        match property_id {
            PROP_X => self.x.set(value),
            PROP_Y => self.y.set(value),
            _ => return false,
        }
        self.apply();
        true
    }

    fn property_list(&self) -> &'static [&'static str] {
        &[PROP_X, PROP_Y]
    }
}
