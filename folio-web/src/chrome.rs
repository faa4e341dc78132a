//! 页面外壳：主题切换、汉堡菜单、Process Book 弹窗、预览图点击转发
//!
//! 状态判断都在 [`folio_runtime::chrome`]，这里只负责读写 DOM。

use std::cell::Cell;
use std::rc::Rc;

use folio_runtime::chrome::{BURGER_OPEN_CLASS, MODAL_OPEN_CLASS, NAV_OPEN_CLASS};
use folio_runtime::{MenuState, ModalState, ThemeState};
use gloo::events::EventListener;
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, EventTarget, HtmlElement};

use crate::dom;

/// 绑定全部外壳交互；缺失的元素直接跳过
pub fn bind(document: &Document) {
    bind_theme_toggle(document);
    bind_menu(document);
    bind_modal(document);
    bind_preview_links(document);
}

// ========== 主题 ==========

fn bind_theme_toggle(document: &Document) {
    let Some(button) = dom::query_all(document, ".theme-toggle").into_iter().next() else {
        return;
    };
    let root = document.document_element();
    let target = button.clone();
    EventListener::new(&button, "click", move |_| {
        let state = toggle_theme(&target, root.as_ref());
        debug!(dark = state.is_dark(), "主题切换");
    })
    .forget();
}

/// 翻转按钮的 `aria-pressed`，并把 `data-dark` 写到根元素
fn toggle_theme(button: &Element, root: Option<&Element>) -> ThemeState {
    let state = ThemeState::from_aria(button.get_attribute("aria-pressed").as_deref()).toggled();
    set_attribute(button, "aria-pressed", state.aria_pressed());
    if let Some(root) = root {
        set_attribute(root, "data-dark", state.data_dark());
    }
    state
}

fn set_attribute(el: &Element, name: &str, value: &str) {
    if let Err(e) = el.set_attribute(name, value) {
        warn!(name, error = ?e, "属性写入失败");
    }
}

// ========== 菜单 ==========

fn bind_menu(document: &Document) {
    let burger = dom::query_all(document, ".burger-menu").into_iter().next();
    let nav = dom::query_all(document, ".header-nav").into_iter().next();
    let (Some(burger), Some(nav)) = (burger, nav) else {
        return;
    };
    let state = Rc::new(Cell::new(MenuState::default()));

    let apply = {
        let burger = burger.clone();
        let nav = nav.clone();
        move |menu: MenuState| {
            dom::set_class(&burger, BURGER_OPEN_CLASS, menu.is_open());
            dom::set_class(&nav, NAV_OPEN_CLASS, menu.is_open());
        }
    };

    {
        let state = Rc::clone(&state);
        let apply = apply.clone();
        EventListener::new(&burger, "click", move |_| {
            let mut menu = state.get();
            menu.toggle();
            state.set(menu);
            apply(menu);
        })
        .forget();
    }

    for link in dom::query_all(document, ".nav-item") {
        let state = Rc::clone(&state);
        let apply = apply.clone();
        EventListener::new(&link, "click", move |_| {
            let mut menu = state.get();
            menu.close();
            state.set(menu);
            apply(menu);
        })
        .forget();
    }
}

// ========== 弹窗 ==========

struct Modal {
    root: HtmlElement,
    state: Cell<ModalState>,
}

impl Modal {
    fn apply(&self) {
        let open = self.state.get().is_open();
        self.root.set_hidden(!open);
        dom::set_class(&self.root, MODAL_OPEN_CLASS, open);
    }

    fn update(&self, f: impl FnOnce(&mut ModalState)) {
        let mut state = self.state.get();
        f(&mut state);
        self.state.set(state);
        self.apply();
    }
}

fn bind_modal(document: &Document) {
    let Some(root) = document
        .get_element_by_id("pdfModal")
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };
    let close_button = dom::query_all(&*root, ".pdf-modal__close").into_iter().next();
    let modal = Rc::new(Modal {
        root,
        state: Cell::new(ModalState::default()),
    });

    if let Some(trigger) = dom::query_all(document, ".process-book-trigger").into_iter().next() {
        let modal = Rc::clone(&modal);
        EventListener::new(&trigger, "click", move |_| {
            modal.update(ModalState::open);
        })
        .forget();
    }

    let Some(close_button) = close_button else {
        return;
    };
    {
        let modal = Rc::clone(&modal);
        EventListener::new(&close_button, "click", move |_| {
            modal.update(ModalState::close);
        })
        .forget();
    }

    let backdrop = Rc::clone(&modal);
    EventListener::new(&modal.root, "click", move |event| {
        let root: &EventTarget = backdrop.root.as_ref();
        let on_root = event.target().as_ref() == Some(root);
        backdrop.update(|state| {
            state.click(on_root);
        });
    })
    .forget();
}

// ========== 预览图 ==========

/// 点击预览图等同于点击卡片标题链接
fn bind_preview_links(document: &Document) {
    for preview in dom::query_all(document, ".grid--item .preview--container") {
        let source = preview.clone();
        EventListener::new(&preview, "click", move |_| {
            let link = source
                .closest(".grid--item")
                .ok()
                .flatten()
                .and_then(|card| dom::query_html(&card, ".title--container a"));
            if let Some(link) = link {
                link.click();
            }
        })
        .forget();
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn element(tag: &str) -> Element {
        web_sys::window()
            .unwrap()
            .document()
            .unwrap()
            .create_element(tag)
            .unwrap()
    }

    #[wasm_bindgen_test]
    fn test_theme_toggle_writes_attributes() {
        let button = element("button");
        let root = element("html");

        // 没有 aria-pressed 时视为未按下，第一次点击进入浅色
        let state = toggle_theme(&button, Some(&root));
        assert!(!state.is_dark());
        assert_eq!(button.get_attribute("aria-pressed").as_deref(), Some("true"));
        assert_eq!(root.get_attribute("data-dark").as_deref(), Some("false"));

        let state = toggle_theme(&button, Some(&root));
        assert!(state.is_dark());
        assert_eq!(button.get_attribute("aria-pressed").as_deref(), Some("false"));
        assert_eq!(root.get_attribute("data-dark").as_deref(), Some("true"));
    }

    #[wasm_bindgen_test]
    fn test_theme_toggle_without_root() {
        let button = element("button");
        button.set_attribute("aria-pressed", "true").unwrap();
        let state = toggle_theme(&button, None);
        assert_eq!(state, ThemeState { pressed: false });
        assert_eq!(button.get_attribute("aria-pressed").as_deref(), Some("false"));
    }
}
