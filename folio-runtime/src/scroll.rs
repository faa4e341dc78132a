//! # Scroll 模块
//!
//! 平滑虚拟滚动与卡片视差。
//!
//! 原生滚动条仍然存在（body 高度 = 内容自然高度），但内容本身不随之滚动：
//! 每帧把渲染偏移 `start_y` 向真实滚动偏移 `end_y` 插值，再对内容施加
//! `translate(0, -start_y)`。

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ticker::{Frame, FrameListener};

/// 滚动参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// 每帧插值系数
    #[serde(default = "default_easing")]
    pub easing: f32,
    /// 视差幅度（卡片高度的比例）
    #[serde(default = "default_parallax_range")]
    pub parallax_range: f32,
}

fn default_easing() -> f32 {
    0.08
}

fn default_parallax_range() -> f32 {
    0.2
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            easing: default_easing(),
            parallax_range: default_parallax_range(),
        }
    }
}

/// 平滑滚动状态
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollDriver {
    /// 渲染偏移
    pub start_y: f32,
    /// 真实滚动偏移
    pub end_y: f32,
    pub easing: f32,
}

impl ScrollDriver {
    pub fn new(easing: f32) -> Self {
        Self {
            start_y: 0.0,
            end_y: 0.0,
            easing,
        }
    }

    /// 记录真实滚动偏移
    pub fn on_scroll(&mut self, scroll_y: f32) {
        self.end_y = scroll_y;
    }

    /// 推进一帧，返回新的渲染偏移
    pub fn update(&mut self) -> f32 {
        self.start_y = self.start_y * (1.0 - self.easing) + self.end_y * self.easing;
        self.start_y
    }

    /// 两个偏移同时归零
    pub fn reset(&mut self) {
        self.start_y = 0.0;
        self.end_y = 0.0;
    }
}

impl Default for ScrollDriver {
    fn default() -> Self {
        Self::new(default_easing())
    }
}

/// 卡片几何信息
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardMetrics {
    /// 视口内的上边缘
    pub top: f32,
    /// 视口内的可见高度（边界框）
    pub height: f32,
    /// 布局高度
    pub offset_height: f32,
}

/// 卡片内图片的视差偏移；卡片不在视口内时返回 `None`（保持上次的偏移）
pub fn parallax_offset(card: CardMetrics, viewport_height: f32, range: f32) -> Option<f32> {
    let CardMetrics {
        top,
        height,
        offset_height,
    } = card;
    if top + height <= 0.0 || top >= viewport_height {
        return None;
    }
    let movement = offset_height * range;
    let progress = (top + height) / (viewport_height + height);
    Some(movement * (progress - 0.5))
}

/// 宿主层的滚动表面
pub trait ScrollSurface {
    type Card;

    /// 真实滚动偏移（`window.scrollY`）
    fn scroll_offset(&self) -> f32;

    /// 平移滚动内容；内容不存在时什么也不做
    fn translate_content(&self, y: f32);

    /// 内容的自然高度；内容不存在时返回 `None`
    fn content_height(&self) -> Option<f32>;

    fn set_body_height(&self, height: f32);

    fn viewport_height(&self) -> f32;

    fn cards(&self) -> &[Self::Card];

    fn card_metrics(&self, card: &Self::Card) -> CardMetrics;

    /// 设置卡片内图片的纵向偏移；卡片没有图片时什么也不做
    fn set_card_offset(&self, card: &Self::Card, y: f32);
}

/// 平滑滚动 + 视差，作为帧订阅者运行
pub struct SmoothScroll<S: ScrollSurface> {
    driver: Rc<RefCell<ScrollDriver>>,
    surface: S,
    parallax_range: f32,
}

impl<S: ScrollSurface> SmoothScroll<S> {
    pub fn new(driver: Rc<RefCell<ScrollDriver>>, surface: S, parallax_range: f32) -> Self {
        Self {
            driver,
            surface,
            parallax_range,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn driver(&self) -> &Rc<RefCell<ScrollDriver>> {
        &self.driver
    }

    /// 原生 scroll 事件
    pub fn on_scroll(&self) {
        self.driver
            .borrow_mut()
            .on_scroll(self.surface.scroll_offset());
    }

    /// 把 body 高度同步为内容高度，使原生滚动条长度正确
    pub fn sync_height(&self) {
        if let Some(height) = self.surface.content_height() {
            debug!(height, "同步 body 高度");
            self.surface.set_body_height(height);
        }
    }

    /// 推进一帧：平移内容并更新视口内卡片的视差
    pub fn update(&mut self) {
        let y = self.driver.borrow_mut().update();
        self.surface.translate_content(y);

        let viewport = self.surface.viewport_height();
        for card in self.surface.cards() {
            let metrics = self.surface.card_metrics(card);
            if let Some(offset) = parallax_offset(metrics, viewport, self.parallax_range) {
                self.surface.set_card_offset(card, offset);
            }
        }
    }
}

impl<S: ScrollSurface> FrameListener for SmoothScroll<S> {
    fn on_frame(&mut self, _frame: &Frame) {
        self.update();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_one_frame_from_zero() {
        let mut driver = ScrollDriver::new(0.08);
        driver.on_scroll(1000.0);
        assert!((driver.update() - 80.0).abs() < 1e-3);
    }

    #[test]
    fn test_monotonic_without_overshoot() {
        let mut driver = ScrollDriver::new(0.08);
        driver.on_scroll(1000.0);
        let mut last = driver.start_y;
        for _ in 0..500 {
            let y = driver.update();
            // f32 舍入容差
            assert!(y >= last - 1e-3);
            assert!(y <= 1000.0 + 1e-3);
            last = y;
        }
        assert!((last - 1000.0).abs() < 0.01);
    }

    #[test]
    fn test_reset() {
        let mut driver = ScrollDriver::default();
        driver.on_scroll(500.0);
        driver.update();
        driver.reset();
        assert_eq!((driver.start_y, driver.end_y), (0.0, 0.0));
        assert_eq!(driver.update(), 0.0);
    }

    #[test]
    fn test_centered_card_has_zero_offset() {
        // top + height == viewport / 2 + height / 2
        let card = CardMetrics {
            top: 300.0,
            height: 200.0,
            offset_height: 200.0,
        };
        assert_eq!(parallax_offset(card, 800.0, 0.2), Some(0.0));
    }

    #[test]
    fn test_parallax_range() {
        let viewport = 800.0;
        // 刚进入视口底部：progress → 1
        let entering = CardMetrics {
            top: 799.0,
            height: 200.0,
            offset_height: 200.0,
        };
        let offset = parallax_offset(entering, viewport, 0.2).unwrap();
        assert!(offset > 0.0 && offset <= 20.0);

        // 即将离开顶部：progress → 0
        let leaving = CardMetrics {
            top: -199.0,
            height: 200.0,
            offset_height: 200.0,
        };
        let offset = parallax_offset(leaving, viewport, 0.2).unwrap();
        assert!(offset < 0.0 && offset >= -20.0);
    }

    #[test]
    fn test_cards_outside_viewport_untouched() {
        let above = CardMetrics {
            top: -300.0,
            height: 200.0,
            offset_height: 200.0,
        };
        let below = CardMetrics {
            top: 800.0,
            height: 200.0,
            offset_height: 200.0,
        };
        assert_eq!(parallax_offset(above, 800.0, 0.2), None);
        assert_eq!(parallax_offset(below, 800.0, 0.2), None);
    }

    struct FakeSurface {
        scroll_y: Cell<f32>,
        translated: Cell<Option<f32>>,
        content_height: Option<f32>,
        body_height: Cell<Option<f32>>,
        cards: Vec<CardMetrics>,
        offsets: RefCell<Vec<Option<f32>>>,
    }

    impl ScrollSurface for FakeSurface {
        type Card = usize;

        fn scroll_offset(&self) -> f32 {
            self.scroll_y.get()
        }

        fn translate_content(&self, y: f32) {
            self.translated.set(Some(y));
        }

        fn content_height(&self) -> Option<f32> {
            self.content_height
        }

        fn set_body_height(&self, height: f32) {
            self.body_height.set(Some(height));
        }

        fn viewport_height(&self) -> f32 {
            800.0
        }

        fn cards(&self) -> &[usize] {
            &[0, 1]
        }

        fn card_metrics(&self, card: &usize) -> CardMetrics {
            self.cards[*card]
        }

        fn set_card_offset(&self, card: &usize, y: f32) {
            self.offsets.borrow_mut()[*card] = Some(y);
        }
    }

    fn surface(content_height: Option<f32>) -> FakeSurface {
        FakeSurface {
            scroll_y: Cell::new(0.0),
            translated: Cell::new(None),
            content_height,
            body_height: Cell::new(None),
            cards: vec![
                CardMetrics {
                    top: 100.0,
                    height: 200.0,
                    offset_height: 200.0,
                },
                CardMetrics {
                    top: 2000.0,
                    height: 200.0,
                    offset_height: 200.0,
                },
            ],
            offsets: RefCell::new(vec![None, None]),
        }
    }

    #[test]
    fn test_smooth_scroll_frame() {
        let driver = Rc::new(RefCell::new(ScrollDriver::new(0.08)));
        let mut scroll = SmoothScroll::new(driver.clone(), surface(Some(3200.0)), 0.2);

        scroll.surface().scroll_y.set(1000.0);
        scroll.on_scroll();
        scroll.update();

        assert!((scroll.surface().translated.get().unwrap() - 80.0).abs() < 1e-3);
        let offsets = scroll.surface().offsets.borrow().clone();
        assert!(offsets[0].is_some());
        assert_eq!(offsets[1], None);

        scroll.sync_height();
        assert_eq!(scroll.surface().body_height.get(), Some(3200.0));
    }

    #[test]
    fn test_missing_content_skips_height_sync() {
        let driver = Rc::new(RefCell::new(ScrollDriver::default()));
        let scroll = SmoothScroll::new(driver, surface(None), 0.2);
        scroll.sync_height();
        assert_eq!(scroll.surface().body_height.get(), None);
    }
}
