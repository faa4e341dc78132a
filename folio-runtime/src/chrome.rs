//! # Chrome 模块
//!
//! 页面外壳上的小状态机：主题切换、汉堡菜单、Process Book 弹窗。
//! 宿主层负责把状态写回 DOM（属性、类名、`hidden`）。

/// 汉堡按钮展开时的类名
pub const BURGER_OPEN_CLASS: &str = "open";
/// 导航展开时的类名
pub const NAV_OPEN_CLASS: &str = "nav-open";
/// 弹窗打开时的类名
pub const MODAL_OPEN_CLASS: &str = "is-open";

/// 主题切换按钮状态
///
/// `aria-pressed` 是唯一的真相来源；`data-dark` 总是它的取反。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThemeState {
    pub pressed: bool,
}

impl ThemeState {
    /// 从 `aria-pressed` 属性值读取；缺失或非 `"true"` 视为未按下
    pub fn from_aria(value: Option<&str>) -> Self {
        Self {
            pressed: value == Some("true"),
        }
    }

    /// 点击一次后的状态
    pub fn toggled(self) -> Self {
        Self {
            pressed: !self.pressed,
        }
    }

    pub fn is_dark(self) -> bool {
        !self.pressed
    }

    pub fn aria_pressed(self) -> &'static str {
        bool_attr(self.pressed)
    }

    pub fn data_dark(self) -> &'static str {
        bool_attr(self.is_dark())
    }
}

fn bool_attr(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// 汉堡菜单
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MenuState {
    open: bool,
}

impl MenuState {
    pub fn is_open(self) -> bool {
        self.open
    }

    /// 汉堡按钮点击
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// 导航链接点击
    pub fn close(&mut self) {
        self.open = false;
    }
}

/// 弹窗
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModalState {
    open: bool,
}

impl ModalState {
    pub fn is_open(self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// 弹窗区域内的点击。只有点在弹窗根元素本身（背景）上才关闭；
    /// 返回是否关闭了弹窗。
    pub fn click(&mut self, target_is_root: bool) -> bool {
        if target_is_root && self.open {
            self.open = false;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_toggle_flips_each_click() {
        let state = ThemeState::from_aria(Some("false"));
        assert!(state.is_dark());

        let state = state.toggled();
        assert_eq!(state.aria_pressed(), "true");
        assert_eq!(state.data_dark(), "false");

        let state = state.toggled();
        assert_eq!(state.aria_pressed(), "false");
        assert_eq!(state.data_dark(), "true");
    }

    #[test]
    fn test_theme_missing_attribute() {
        assert_eq!(ThemeState::from_aria(None), ThemeState { pressed: false });
        assert_eq!(ThemeState::from_aria(Some("yes")).pressed, false);
    }

    #[test]
    fn test_menu() {
        let mut menu = MenuState::default();
        assert!(menu.toggle());
        assert!(!menu.toggle());
        menu.toggle();
        menu.close();
        assert!(!menu.is_open());
    }

    #[test]
    fn test_modal_backdrop_click() {
        let mut modal = ModalState::default();
        modal.open();
        // 点击弹窗内容不关闭
        assert!(!modal.click(false));
        assert!(modal.is_open());
        assert!(modal.click(true));
        assert!(!modal.is_open());
        // 已关闭时不重复关闭
        assert!(!modal.click(true));
    }
}
