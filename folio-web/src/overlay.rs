//! 遮罩的 DOM 实现：根元素 `.overlay`，格子为 `div`

use std::cell::Cell;
use std::rc::Rc;

use folio_runtime::overlay::{PROP_OPACITY, PROP_SCALE};
use folio_runtime::{Animatable, CellNode, OverlayRoot};
use tracing::warn;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use crate::dom::set_style;

/// 遮罩根元素
pub struct DomOverlay {
    document: Document,
    root: HtmlElement,
}

impl DomOverlay {
    pub fn new(document: Document, root: HtmlElement) -> Self {
        Self { document, root }
    }
}

impl OverlayRoot for DomOverlay {
    type Cell = DomCell;

    fn set_columns(&self, columns: usize) {
        set_style(&self.root, "--columns", &columns.to_string());
    }

    fn create_cell(&self, row: usize, column: usize) -> Rc<DomCell> {
        let el = self
            .document
            .create_element("div")
            .ok()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        if el.is_none() {
            warn!(row, column, "遮罩格子创建失败");
        }
        Rc::new(DomCell::new(el))
    }

    fn append_cell(&self, cell: &DomCell) {
        let Some(el) = &cell.el else {
            return;
        };
        if let Err(e) = self.root.append_child(el) {
            warn!(error = ?e, "遮罩格子追加失败");
        }
    }

    fn set_presented(&self, presented: bool) {
        for (property, value) in presented_styles(presented) {
            set_style(&self.root, property, value);
        }
    }

    fn set_opaque(&self) {
        set_style(&self.root, "opacity", "1");
    }
}

/// 呈现状态对应的根元素样式
fn presented_styles(presented: bool) -> [(&'static str, &'static str); 2] {
    if presented {
        [("opacity", "1"), ("pointer-events", "auto")]
    } else {
        [("opacity", "0"), ("pointer-events", "none")]
    }
}

/// 遮罩格子
///
/// 页面初始时格子由 CSS 铺满，因此缩放与不透明度都从 1 开始。
pub struct DomCell {
    el: Option<HtmlElement>,
    scale: Cell<f32>,
    opacity: Cell<f32>,
}

impl DomCell {
    fn new(el: Option<HtmlElement>) -> Self {
        if let Some(el) = &el {
            set_style(el, "will-change", "opacity, transform");
        }
        Self {
            el,
            scale: Cell::new(1.0),
            opacity: Cell::new(1.0),
        }
    }
}

impl Animatable for DomCell {
    fn get_property(&self, property_id: &str) -> Option<f32> {
        match property_id {
            PROP_SCALE => Some(self.scale.get()),
            PROP_OPACITY => Some(self.opacity.get()),
            _ => None,
        }
    }

    fn set_property(&self, property_id: &str, value: f32) -> bool {
        match property_id {
            PROP_SCALE => {
                self.scale.set(value);
                if let Some(el) = &self.el {
                    set_style(el, "transform", &format!("scale({value})"));
                }
            }
            PROP_OPACITY => {
                self.opacity.set(value);
                if let Some(el) = &self.el {
                    set_style(el, "opacity", &value.to_string());
                }
            }
            _ => return false,
        }
        true
    }

    fn property_list(&self) -> &'static [&'static str] {
        &[PROP_SCALE, PROP_OPACITY]
    }
}

impl CellNode for DomCell {
    fn set_transform_origin(&self, origin: &str) {
        if let Some(el) = &self.el {
            set_style(el, "transform-origin", origin);
        }
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn overlay() -> (DomOverlay, HtmlElement) {
        let document = web_sys::window().unwrap().document().unwrap();
        let root: HtmlElement = document.create_element("div").unwrap().dyn_into().unwrap();
        (DomOverlay::new(document, root.clone()), root)
    }

    fn style(el: &HtmlElement, property: &str) -> String {
        el.style().get_property_value(property).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_set_presented_writes_styles() {
        let (overlay, root) = overlay();
        overlay.set_presented(true);
        assert_eq!(style(&root, "opacity"), "1");
        assert_eq!(style(&root, "pointer-events"), "auto");

        overlay.set_presented(false);
        assert_eq!(style(&root, "opacity"), "0");
        assert_eq!(style(&root, "pointer-events"), "none");
    }

    #[wasm_bindgen_test]
    fn test_set_opaque_keeps_pointer_events() {
        let (overlay, root) = overlay();
        overlay.set_presented(false);
        overlay.set_opaque();
        assert_eq!(style(&root, "opacity"), "1");
        assert_eq!(style(&root, "pointer-events"), "none");
    }

    #[wasm_bindgen_test]
    fn test_cells_append_with_columns() {
        let (overlay, root) = overlay();
        overlay.set_columns(14);
        assert_eq!(style(&root, "--columns"), "14");

        let cell = overlay.create_cell(0, 3);
        overlay.append_cell(&cell);
        assert_eq!(root.child_element_count(), 1);

        assert!(cell.set_property(PROP_SCALE, 0.5));
        assert_eq!(cell.get_property(PROP_SCALE), Some(0.5));
        assert!(!cell.set_property("rotation", 1.0));
    }
}
