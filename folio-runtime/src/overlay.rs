//! # Overlay 模块
//!
//! 全屏格子遮罩，用作视图之间的擦除转场。
//!
//! ## 生命周期
//!
//! - 构造时按行优先顺序一次性创建 `rows × columns` 个格子并追加到根元素，
//!   同时在根元素上发布 `--columns`，由外部 CSS grid 排版
//! - `show`：根元素立即变为不透明且接收指针事件，然后所有格子从
//!   {scale 0, opacity 0} 交错动画到 {scale 1.01, opacity 1}
//! - `hide`：所有格子从当前状态动画到 {scale 0, opacity 0}，
//!   结束后根元素变为透明且不接收指针事件，然后信号才完成
//!
//! 组件不串行化重叠调用：前一个转场的信号完成前再次调用属于调用方错误，
//! 这里只记录一条警告。

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::animation::{
    Animatable, AnimationSystem, CompletionSignal, EasingFunction, ObjectId, Stagger,
    TweenRequest, TweenSpec,
};
use crate::error::MotionResult;

/// 显示时的目标缩放，略大于 1 以避免亚像素缝隙
pub const SHOW_SCALE: f32 = 1.01;

/// 遮罩每个方向上允许的最大格数
pub const MAX_GRID_SIZE: usize = 64;

/// 格子属性名
pub const PROP_SCALE: &str = "scale";
pub const PROP_OPACITY: &str = "opacity";

/// 遮罩格子节点（宿主层为 DOM 元素实现）
///
/// 需要暴露 `scale` 与 `opacity` 两个可动画属性。
pub trait CellNode: Animatable {
    /// 设置缩放轴心，例如 `"50% 100%"`
    fn set_transform_origin(&self, origin: &str);
}

/// 遮罩根元素
pub trait OverlayRoot {
    type Cell: CellNode;

    /// 发布列数（CSS 自定义属性 `--columns`）
    fn set_columns(&self, columns: usize);

    /// 创建第 `row` 行第 `column` 列的格子节点
    fn create_cell(&self, row: usize, column: usize) -> Rc<Self::Cell>;

    /// 把格子节点追加为根元素的子节点
    fn append_cell(&self, cell: &Self::Cell);

    /// 呈现状态：`true` = 不透明 + 接收指针事件，`false` = 透明 + 穿透
    fn set_presented(&self, presented: bool);

    /// 只把根元素设为不透明，指针事件保持页面样式的设定
    fn set_opaque(&self);
}

/// 遮罩网格尺寸
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayOptions {
    #[serde(default = "default_grid_size")]
    pub rows: usize,
    #[serde(default = "default_grid_size")]
    pub columns: usize,
}

fn default_grid_size() -> usize {
    10
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            rows: default_grid_size(),
            columns: default_grid_size(),
        }
    }
}

/// 单次转场的参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionConfig {
    /// 每个格子缩放的轴心
    #[serde(default = "default_transform_origin")]
    pub transform_origin: String,
    /// 每个格子自身的动画时长（秒）
    #[serde(default = "default_duration")]
    pub duration: f32,
    /// 缓动
    #[serde(default)]
    pub ease: EasingFunction,
    /// 延迟分配策略；`None` 时使用按网格从索引 0 开始、每格 0.005 秒的线性波浪
    #[serde(default)]
    pub stagger: Option<Stagger>,
}

fn default_transform_origin() -> String {
    "50% 50%".to_string()
}

fn default_duration() -> f32 {
    0.2
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            transform_origin: default_transform_origin(),
            duration: default_duration(),
            ease: EasingFunction::Linear,
            stagger: None,
        }
    }
}

impl TransitionConfig {
    pub fn new(
        transform_origin: impl Into<String>,
        duration: f32,
        ease: EasingFunction,
        stagger: Option<Stagger>,
    ) -> Self {
        Self {
            transform_origin: transform_origin.into(),
            duration,
            ease,
            stagger,
        }
    }
}

/// 遮罩中的一个格子
#[derive(Debug)]
pub struct OverlayCell<C> {
    pub row: usize,
    pub column: usize,
    /// 在补间系统中的对象 ID
    pub object: ObjectId,
    pub node: Rc<C>,
}

/// 格子遮罩
pub struct Overlay<R: OverlayRoot> {
    root: Rc<R>,
    options: OverlayOptions,
    cells: Vec<OverlayCell<R::Cell>>,
    tweens: Rc<RefCell<AnimationSystem>>,
    presented: Rc<Cell<bool>>,
    in_flight: Rc<Cell<bool>>,
}

impl<R: OverlayRoot + 'static> Overlay<R> {
    /// 构建遮罩：发布列数，按行优先创建并追加所有格子
    pub fn new(root: Rc<R>, options: OverlayOptions, tweens: Rc<RefCell<AnimationSystem>>) -> Self {
        root.set_columns(options.columns);

        let mut cells = Vec::with_capacity(options.rows * options.columns);
        {
            let mut system = tweens.borrow_mut();
            for row in 0..options.rows {
                for column in 0..options.columns {
                    let node = root.create_cell(row, column);
                    root.append_cell(&node);
                    let object = system.register(node.clone());
                    cells.push(OverlayCell {
                        row,
                        column,
                        object,
                        node,
                    });
                }
            }
        }
        debug!(rows = options.rows, columns = options.columns, "遮罩格子创建完成");

        Self {
            root,
            options,
            cells,
            tweens,
            presented: Rc::new(Cell::new(false)),
            in_flight: Rc::new(Cell::new(false)),
        }
    }

    /// 所有格子（行优先）
    pub fn cells(&self) -> &[OverlayCell<R::Cell>] {
        &self.cells
    }

    pub fn options(&self) -> OverlayOptions {
        self.options
    }

    /// 根元素当前是否处于呈现状态
    pub fn is_presented(&self) -> bool {
        self.presented.get()
    }

    /// 是否有转场在进行
    pub fn is_transitioning(&self) -> bool {
        self.in_flight.get()
    }

    /// 直接设置呈现状态（不动画）
    fn set_presented(&self, presented: bool) {
        self.root.set_presented(presented);
        self.presented.set(presented);
    }

    /// 页面加载时让遮罩先盖住视口
    ///
    /// 只改不透明度，不进入呈现状态，页面在揭开期间仍可接收指针事件。
    pub fn set_opaque(&self) {
        self.root.set_opaque();
    }

    /// 盖住视口
    ///
    /// 根元素的呈现状态在返回前同步设置；返回的信号在最慢的格子结束后完成。
    pub fn show(&self, config: &TransitionConfig) -> MotionResult<CompletionSignal> {
        self.note_overlap("show");
        self.set_presented(true);

        let in_flight = Rc::clone(&self.in_flight);
        let requests = self.requests(config, Some(0.0), SHOW_SCALE, Some(0.0), 1.0);
        let signal = self
            .tweens
            .borrow_mut()
            .animate_group(requests, Some(Box::new(move || in_flight.set(false))))?;
        self.in_flight.set(true);
        debug!(
            duration = config.duration,
            span = self.stagger(config).max_delay(self.cells.len()),
            ease = %config.ease,
            "遮罩 show 开始"
        );
        Ok(signal)
    }

    /// 揭开视口
    ///
    /// 格子从当前状态收拢；全部结束后根元素变为透明且不接收指针事件，随后信号完成。
    pub fn hide(&self, config: &TransitionConfig) -> MotionResult<CompletionSignal> {
        self.note_overlap("hide");

        let root = Rc::clone(&self.root);
        let presented = Rc::clone(&self.presented);
        let in_flight = Rc::clone(&self.in_flight);
        let requests = self.requests(config, None, 0.0, None, 0.0);
        let signal = self.tweens.borrow_mut().animate_group(
            requests,
            Some(Box::new(move || {
                root.set_presented(false);
                presented.set(false);
                in_flight.set(false);
            })),
        )?;
        self.in_flight.set(true);
        debug!(
            duration = config.duration,
            span = self.stagger(config).max_delay(self.cells.len()),
            ease = %config.ease,
            "遮罩 hide 开始"
        );
        Ok(signal)
    }

    fn note_overlap(&self, operation: &'static str) {
        if self.in_flight.get() {
            warn!(operation, "上一个遮罩转场尚未结束，两个转场将同时驱动格子");
        }
    }

    /// 未指定交错时按网格尺寸从第一个格子展开
    fn stagger(&self, config: &TransitionConfig) -> Stagger {
        config
            .stagger
            .unwrap_or_else(|| Stagger::grid(self.options.rows, self.options.columns))
    }

    fn requests(
        &self,
        config: &TransitionConfig,
        scale_from: Option<f32>,
        scale_to: f32,
        opacity_from: Option<f32>,
        opacity_to: f32,
    ) -> Vec<TweenRequest> {
        let delays = self.stagger(config).delays(self.cells.len());

        let mut requests = Vec::with_capacity(self.cells.len() * 2);
        for (cell, delay) in self.cells.iter().zip(delays) {
            cell.node.set_transform_origin(&config.transform_origin);
            let spec = TweenSpec::new(config.duration)
                .with_delay(delay)
                .with_easing(config.ease);
            requests.push(TweenRequest {
                object: cell.object,
                property: PROP_SCALE,
                from: scale_from,
                to: scale_to,
                spec,
            });
            requests.push(TweenRequest {
                object: cell.object,
                property: PROP_OPACITY,
                from: opacity_from,
                to: opacity_to,
                spec,
            });
        }
        requests
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! 测试用的遮罩根与格子

    use super::*;

    #[derive(Debug, Default)]
    pub struct FakeCell {
        pub row: usize,
        pub column: usize,
        pub scale: Cell<f32>,
        pub opacity: Cell<f32>,
        pub origin: RefCell<String>,
    }

    impl Animatable for FakeCell {
        fn get_property(&self, property_id: &str) -> Option<f32> {
            match property_id {
                PROP_SCALE => Some(self.scale.get()),
                PROP_OPACITY => Some(self.opacity.get()),
                _ => None,
            }
        }

        fn set_property(&self, property_id: &str, value: f32) -> bool {
            match property_id {
                PROP_SCALE => self.scale.set(value),
                PROP_OPACITY => self.opacity.set(value),
                _ => return false,
            }
            true
        }

        fn property_list(&self) -> &'static [&'static str] {
            &[PROP_SCALE, PROP_OPACITY]
        }
    }

    impl CellNode for FakeCell {
        fn set_transform_origin(&self, origin: &str) {
            *self.origin.borrow_mut() = origin.to_string();
        }
    }

    #[derive(Debug, Default)]
    pub struct FakeRoot {
        pub columns_property: Cell<Option<usize>>,
        pub children: RefCell<Vec<(usize, usize)>>,
        pub presented: Cell<bool>,
        pub presented_changes: Cell<usize>,
        pub opaque: Cell<bool>,
    }

    impl OverlayRoot for FakeRoot {
        type Cell = FakeCell;

        fn set_columns(&self, columns: usize) {
            self.columns_property.set(Some(columns));
        }

        fn create_cell(&self, row: usize, column: usize) -> Rc<FakeCell> {
            Rc::new(FakeCell {
                row,
                column,
                ..FakeCell::default()
            })
        }

        fn append_cell(&self, cell: &FakeCell) {
            self.children.borrow_mut().push((cell.row, cell.column));
        }

        fn set_presented(&self, presented: bool) {
            self.presented.set(presented);
            self.presented_changes.set(self.presented_changes.get() + 1);
            self.opaque.set(presented);
        }

        fn set_opaque(&self) {
            self.opaque.set(true);
        }
    }

    /// 把补间系统推进到所有转场结束
    pub fn run_until_idle(tweens: &Rc<RefCell<AnimationSystem>>) {
        for _ in 0..10_000 {
            tweens.borrow_mut().update(1.0 / 60.0);
            let system = tweens.borrow();
            if !system.has_active_animations() && system.pending_groups() == 0 {
                return;
            }
        }
        panic!("动画在预期帧数内没有结束");
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    fn build(rows: usize, columns: usize) -> (Overlay<FakeRoot>, Rc<FakeRoot>, Rc<RefCell<AnimationSystem>>) {
        let root = Rc::new(FakeRoot::default());
        let tweens = Rc::new(RefCell::new(AnimationSystem::new()));
        let overlay = Overlay::new(root.clone(), OverlayOptions { rows, columns }, tweens.clone());
        (overlay, root, tweens)
    }

    #[test]
    fn test_construction_is_row_major() {
        for (rows, columns) in [(1, 1), (2, 3), (4, 1), (10, 10)] {
            let (overlay, root, _) = build(rows, columns);
            let children = root.children.borrow();
            assert_eq!(children.len(), rows * columns);
            assert_eq!(overlay.cells().len(), rows * columns);

            let expected: Vec<(usize, usize)> = (0..rows)
                .flat_map(|r| (0..columns).map(move |c| (r, c)))
                .collect();
            assert_eq!(*children, expected);
            let cell_order: Vec<(usize, usize)> =
                overlay.cells().iter().map(|c| (c.row, c.column)).collect();
            assert_eq!(cell_order, expected);
        }
    }

    #[test]
    fn test_eight_by_fourteen() {
        let (_overlay, root, _) = build(8, 14);
        assert_eq!(root.children.borrow().len(), 112);
        assert_eq!(root.columns_property.get(), Some(14));
    }

    #[test]
    fn test_default_options() {
        let options = OverlayOptions::default();
        assert_eq!((options.rows, options.columns), (10, 10));
    }

    #[test]
    fn test_show_presents_root_synchronously() {
        let (overlay, root, tweens) = build(2, 2);
        let mut signal = overlay.show(&TransitionConfig::default()).unwrap();

        assert!(root.presented.get());
        assert!(overlay.is_presented());
        assert!(overlay.is_transitioning());
        assert!(signal.try_complete().is_none());

        run_until_idle(&tweens);
        assert_eq!(signal.try_complete(), Some(Ok(())));
        assert!(!overlay.is_transitioning());
        for cell in overlay.cells() {
            assert_eq!(cell.node.scale.get(), SHOW_SCALE);
            assert_eq!(cell.node.opacity.get(), 1.0);
            assert_eq!(*cell.node.origin.borrow(), "50% 50%");
        }
    }

    #[test]
    fn test_hide_unpresents_on_completion() {
        let (overlay, root, tweens) = build(3, 3);
        overlay.set_presented(true);
        let config = TransitionConfig::new("50% 100%", 0.5, EasingFunction::EaseOutCubic, None);
        let mut signal = overlay.hide(&config).unwrap();

        // 动画期间仍然呈现
        tweens.borrow_mut().update(0.1);
        assert!(root.presented.get());
        assert!(signal.try_complete().is_none());

        run_until_idle(&tweens);
        assert!(!root.presented.get());
        assert!(!overlay.is_presented());
        assert_eq!(signal.try_complete(), Some(Ok(())));
        for cell in overlay.cells() {
            assert_eq!(cell.node.scale.get(), 0.0);
            assert_eq!(cell.node.opacity.get(), 0.0);
            assert_eq!(*cell.node.origin.borrow(), "50% 100%");
        }
    }

    #[test]
    fn test_set_opaque_leaves_pointer_events_alone() {
        let (overlay, root, tweens) = build(2, 2);
        overlay.set_opaque();
        assert!(root.opaque.get());
        assert!(!root.presented.get());
        assert_eq!(root.presented_changes.get(), 0);
        assert!(!overlay.is_presented());

        // 揭开结束后统一回到透明 + 穿透
        let mut signal = overlay.hide(&TransitionConfig::default()).unwrap();
        run_until_idle(&tweens);
        assert_eq!(signal.try_complete(), Some(Ok(())));
        assert!(!root.opaque.get());
        assert_eq!(root.presented_changes.get(), 1);
    }

    #[test]
    fn test_show_then_hide_flips_state() {
        let (overlay, root, tweens) = build(2, 5);
        let start = root.presented.get();

        let mut shown = overlay.show(&TransitionConfig::default()).unwrap();
        run_until_idle(&tweens);
        assert_eq!(shown.try_complete(), Some(Ok(())));
        assert_ne!(root.presented.get(), start);

        let mut hidden = overlay.hide(&TransitionConfig::default()).unwrap();
        run_until_idle(&tweens);
        assert_eq!(hidden.try_complete(), Some(Ok(())));
        assert_eq!(root.presented.get(), start);
    }

    #[test]
    fn test_signal_waits_for_slowest_cell() {
        let (overlay, _root, tweens) = build(1, 4);
        let config = TransitionConfig::new("50% 50%", 0.2, EasingFunction::Linear, Some(Stagger::Each(0.1)));
        let mut signal = overlay.show(&config).unwrap();

        // 最后一个格子在 0.3 秒开始，0.5 秒结束
        tweens.borrow_mut().update(0.45);
        assert!(signal.try_complete().is_none());
        assert_eq!(overlay.cells()[0].node.opacity.get(), 1.0);
        assert!(overlay.cells()[3].node.opacity.get() < 1.0);

        tweens.borrow_mut().update(0.1);
        assert_eq!(signal.try_complete(), Some(Ok(())));
    }

    #[test]
    fn test_config_defaults_from_json() {
        let config: TransitionConfig = serde_json::from_str(r#"{"duration":0.5}"#).unwrap();
        assert_eq!(config.transform_origin, "50% 50%");
        assert_eq!(config.duration, 0.5);
        assert_eq!(config.ease, EasingFunction::Linear);
        assert_eq!(config.stagger, None);
    }
}
