//! # System 模块
//!
//! 补间系统管理器。
//!
//! 对象实现 `Animatable` trait，系统直接设置属性值：
//! ```rust,ignore
//! let id = system.register(cell);
//! system.animate(id, "opacity", Some(0.0), 1.0, TweenSpec::new(0.2))?;
//! // 值在每帧 update 时自动写回对象
//! ```
//!
//! 一组补间可以共享一个完成信号（[`AnimationSystem::animate_group`]），
//! 最后一个成员结束时先执行组回调，再触发信号。

use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use super::signal::{CompletionSignal, CompletionTrigger};
use super::traits::{AnimPropertyKey, Animatable, ObjectId};
use super::{EasingFunction, Tween, TweenId, TweenState};
use crate::error::AnimationError;

/// 动画事件
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationEvent {
    /// 补间开始
    Started(TweenId),
    /// 补间完成
    Completed(TweenId),
    /// 补间被跳过
    Skipped(TweenId),
    /// 补间组全部结束
    GroupCompleted(GroupId),
}

/// 补间组 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(pub u64);

/// 补间时间参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenSpec {
    /// 时长（秒）
    pub duration: f32,
    /// 延迟（秒）
    pub delay: f32,
    /// 缓动
    pub easing: EasingFunction,
}

impl TweenSpec {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            delay: 0.0,
            easing: EasingFunction::Linear,
        }
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }
}

/// 补间组中的单个请求
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenRequest {
    pub object: ObjectId,
    pub property: &'static str,
    /// 起始值；`None` 表示从属性当前值开始
    pub from: Option<f32>,
    pub to: f32,
    pub spec: TweenSpec,
}

/// 组完成回调
pub type GroupCallback = Box<dyn FnOnce()>;

struct ActiveTween {
    tween: Tween,
    group: Option<GroupId>,
}

struct Group {
    remaining: usize,
    on_complete: Option<GroupCallback>,
    trigger: Option<CompletionTrigger>,
}

/// 补间系统
///
/// 管理所有补间实例，提供统一的更新和查询接口。
/// 同一属性上的新补间会替换旧补间（旧补间视为已结束）。
pub struct AnimationSystem {
    /// 已注册的对象
    objects: HashMap<ObjectId, Rc<dyn Animatable>>,
    /// 活跃补间（属性键 -> 补间）
    tweens: HashMap<AnimPropertyKey, ActiveTween>,
    /// 进行中的补间组
    groups: HashMap<GroupId, Group>,
    next_tween_id: u64,
    next_object_id: u64,
    next_group_id: u64,
    /// 待处理的事件队列
    events: Vec<AnimationEvent>,
}

impl Default for AnimationSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AnimationSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationSystem")
            .field("objects", &self.objects.len())
            .field("tweens", &self.tweens.len())
            .field("groups", &self.groups.len())
            .finish()
    }
}

impl AnimationSystem {
    /// 创建新的补间系统
    pub fn new() -> Self {
        Self {
            objects: HashMap::new(),
            tweens: HashMap::new(),
            groups: HashMap::new(),
            next_tween_id: 1,
            next_object_id: 1,
            next_group_id: 1,
            events: Vec::new(),
        }
    }

    fn next_tween_id(&mut self) -> TweenId {
        let id = TweenId::new(self.next_tween_id);
        self.next_tween_id += 1;
        id
    }

    // ========== 对象管理 ==========

    /// 注册可动画对象，返回系统分配的唯一 `ObjectId`
    pub fn register<T: Animatable>(&mut self, object: Rc<T>) -> ObjectId {
        let id = ObjectId::new(self.next_object_id);
        self.next_object_id += 1;
        self.objects.insert(id, object as Rc<dyn Animatable>);
        id
    }

    /// 注销对象，同时移除它的所有补间
    pub fn unregister(&mut self, object_id: ObjectId) {
        self.objects.remove(&object_id);
        let keys: Vec<AnimPropertyKey> = self
            .tweens
            .keys()
            .filter(|key| key.object_id == object_id)
            .copied()
            .collect();
        for key in keys {
            self.retire(key);
        }
    }

    /// 检查对象是否已注册
    pub fn is_registered(&self, object_id: ObjectId) -> bool {
        self.objects.contains_key(&object_id)
    }

    /// 已注册对象数量
    pub fn registered_count(&self) -> usize {
        self.objects.len()
    }

    fn resolve(
        &self,
        object_id: ObjectId,
        property_id: &'static str,
    ) -> Result<(&Rc<dyn Animatable>, f32), AnimationError> {
        let object = self
            .objects
            .get(&object_id)
            .ok_or(AnimationError::NotRegistered { object: object_id })?;
        let current = object
            .get_property(property_id)
            .ok_or(AnimationError::UnknownProperty {
                object: object_id,
                property: property_id,
            })?;
        Ok((object, current))
    }

    // ========== 补间控制 ==========

    /// 立即设置属性值，并终止该属性上的补间
    pub fn set_property(
        &mut self,
        object_id: ObjectId,
        property_id: &'static str,
        value: f32,
    ) -> Result<(), AnimationError> {
        let (object, _) = self.resolve(object_id, property_id)?;
        object.set_property(property_id, value);
        self.retire(AnimPropertyKey::new(object_id, property_id));
        Ok(())
    }

    /// 读取属性当前值
    pub fn get_property(&self, object_id: ObjectId, property_id: &'static str) -> Option<f32> {
        self.resolve(object_id, property_id)
            .ok()
            .map(|(_, value)| value)
    }

    /// 启动单个属性补间
    ///
    /// `from` 为 `None` 时从属性当前值开始。
    pub fn animate(
        &mut self,
        object_id: ObjectId,
        property_id: &'static str,
        from: Option<f32>,
        to: f32,
        spec: TweenSpec,
    ) -> Result<TweenId, AnimationError> {
        let request = TweenRequest {
            object: object_id,
            property: property_id,
            from,
            to,
            spec,
        };
        self.resolve(object_id, property_id)?;
        Ok(self.start(request, None))
    }

    /// 启动一组补间，返回共享的完成信号
    ///
    /// 所有请求先统一校验，任一失败则整组都不启动。
    /// 空组在下一次 `update` 时完成。
    /// `on_complete` 在信号触发前执行，回调中不得再访问本系统。
    pub fn animate_group(
        &mut self,
        requests: Vec<TweenRequest>,
        on_complete: Option<GroupCallback>,
    ) -> Result<CompletionSignal, AnimationError> {
        for request in &requests {
            self.resolve(request.object, request.property)?;
        }

        let group_id = GroupId(self.next_group_id);
        self.next_group_id += 1;
        let (trigger, signal) = CompletionSignal::pair();
        self.groups.insert(
            group_id,
            Group {
                remaining: requests.len(),
                on_complete,
                trigger: Some(trigger),
            },
        );

        for request in requests {
            self.start(request, Some(group_id));
        }

        debug!(group = group_id.0, "补间组启动");
        Ok(signal)
    }

    fn start(&mut self, request: TweenRequest, group: Option<GroupId>) -> TweenId {
        let key = AnimPropertyKey::new(request.object, request.property);
        // 覆盖同一属性上的旧补间
        self.retire(key);

        let mut from = request.from;
        if let Some(object) = self.objects.get(&request.object) {
            match from {
                Some(value) => {
                    object.set_property(request.property, value);
                }
                None => from = object.get_property(request.property),
            }
        }

        let id = self.next_tween_id();
        let tween = Tween::new(id, from.unwrap_or(request.to), request.to, request.spec.duration)
            .with_delay(request.spec.delay)
            .with_easing(request.spec.easing);
        self.tweens.insert(key, ActiveTween { tween, group });
        self.events.push(AnimationEvent::Started(id));
        id
    }

    /// 移除一个补间，并结算它所在的组
    fn retire(&mut self, key: AnimPropertyKey) {
        if let Some(active) = self.tweens.remove(&key) {
            if let Some(group) = active.group {
                self.settle(group);
            }
        }
    }

    /// 组内一个成员结束
    fn settle(&mut self, group_id: GroupId) {
        let Some(group) = self.groups.get_mut(&group_id) else {
            return;
        };
        group.remaining = group.remaining.saturating_sub(1);
        if group.remaining == 0 {
            self.finish_group(group_id);
        }
    }

    fn finish_group(&mut self, group_id: GroupId) {
        if let Some(mut group) = self.groups.remove(&group_id) {
            if let Some(callback) = group.on_complete.take() {
                callback();
            }
            if let Some(trigger) = group.trigger.take() {
                trigger.fire();
            }
            self.events.push(AnimationEvent::GroupCompleted(group_id));
            debug!(group = group_id.0, "补间组完成");
        }
    }

    /// 更新所有补间
    ///
    /// # 返回
    /// 本帧产生的事件列表
    pub fn update(&mut self, dt: f32) -> Vec<AnimationEvent> {
        let mut finished: Vec<AnimPropertyKey> = Vec::new();

        for (key, active) in &mut self.tweens {
            if active.tween.is_active() {
                active.tween.update(dt);
                if let Some(object) = self.objects.get(&key.object_id) {
                    object.set_property(key.property_id, active.tween.current_value());
                }
            }
            if active.tween.is_finished() {
                finished.push(*key);
            }
        }

        for key in finished {
            if let Some(active) = self.tweens.remove(&key) {
                let event = if active.tween.state == TweenState::Skipped {
                    AnimationEvent::Skipped(active.tween.id)
                } else {
                    AnimationEvent::Completed(active.tween.id)
                };
                self.events.push(event);
                if let Some(group) = active.group {
                    self.settle(group);
                }
            }
        }

        // 空组
        let empty: Vec<GroupId> = self
            .groups
            .iter()
            .filter(|(_, group)| group.remaining == 0)
            .map(|(id, _)| *id)
            .collect();
        for group in empty {
            self.finish_group(group);
        }

        std::mem::take(&mut self.events)
    }

    /// 跳过所有补间，立即写入终值
    ///
    /// 组信号在下一次 `update` 时触发。
    pub fn skip_all(&mut self) {
        for (key, active) in &mut self.tweens {
            if active.tween.is_active() {
                active.tween.skip();
                if let Some(object) = self.objects.get(&key.object_id) {
                    object.set_property(key.property_id, active.tween.final_value());
                }
            }
        }
    }

    // ========== 查询方法 ==========

    /// 是否有活跃的补间
    pub fn has_active_animations(&self) -> bool {
        self.tweens.values().any(|a| a.tween.is_active())
    }

    /// 对象是否有活跃的补间
    pub fn has_object_animations(&self, object_id: ObjectId) -> bool {
        self.tweens
            .iter()
            .any(|(key, a)| key.object_id == object_id && a.tween.is_active())
    }

    /// 活跃补间数量
    pub fn active_count(&self) -> usize {
        self.tweens.values().filter(|a| a.tween.is_active()).count()
    }

    /// 进行中的补间组数量
    pub fn pending_groups(&self) -> usize {
        self.groups.len()
    }

    /// 清空所有补间和组
    ///
    /// 未完成的组信号会以 `TransitionAbandoned` 结束；已注册对象保留。
    pub fn clear(&mut self) {
        self.tweens.clear();
        self.groups.clear();
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    use crate::error::MotionError;

    /// 测试用的可动画对象
    struct TestAnimatable {
        alpha: Cell<f32>,
        scale: Cell<f32>,
    }

    impl TestAnimatable {
        fn new() -> Self {
            Self {
                alpha: Cell::new(1.0),
                scale: Cell::new(1.0),
            }
        }
    }

    impl Animatable for TestAnimatable {
        fn get_property(&self, property_id: &str) -> Option<f32> {
            match property_id {
                "alpha" => Some(self.alpha.get()),
                "scale" => Some(self.scale.get()),
                _ => None,
            }
        }

        fn set_property(&self, property_id: &str, value: f32) -> bool {
            match property_id {
                "alpha" => self.alpha.set(value),
                "scale" => self.scale.set(value),
                _ => return false,
            }
            true
        }

        fn property_list(&self) -> &'static [&'static str] {
            &["alpha", "scale"]
        }
    }

    fn setup() -> (AnimationSystem, Rc<TestAnimatable>, ObjectId) {
        let mut system = AnimationSystem::new();
        let obj = Rc::new(TestAnimatable::new());
        let id = system.register(obj.clone());
        (system, obj, id)
    }

    fn request(object: ObjectId, property: &'static str, to: f32, delay: f32) -> TweenRequest {
        TweenRequest {
            object,
            property,
            from: Some(0.0),
            to,
            spec: TweenSpec::new(1.0).with_delay(delay),
        }
    }

    #[test]
    fn test_register_multiple_objects() {
        let mut system = AnimationSystem::new();
        let id1 = system.register(Rc::new(TestAnimatable::new()));
        let id2 = system.register(Rc::new(TestAnimatable::new()));

        assert_ne!(id1, id2);
        assert_eq!(system.registered_count(), 2);
    }

    #[test]
    fn test_animate_writes_values() {
        let (mut system, obj, id) = setup();

        system
            .animate(id, "alpha", Some(0.0), 1.0, TweenSpec::new(1.0))
            .unwrap();
        assert_eq!(obj.alpha.get(), 0.0);

        system.update(0.5);
        let alpha = obj.alpha.get();
        assert!(alpha > 0.0 && alpha < 1.0);

        system.update(0.6);
        assert_eq!(obj.alpha.get(), 1.0);
        assert!(!system.has_active_animations());
    }

    #[test]
    fn test_animate_from_current_value() {
        let (mut system, obj, id) = setup();
        obj.scale.set(0.4);

        system
            .animate(id, "scale", None, 0.0, TweenSpec::new(1.0))
            .unwrap();
        system.update(0.5);
        assert!((obj.scale.get() - 0.2).abs() < 1e-4);
    }

    #[test]
    fn test_animate_errors() {
        let (mut system, _obj, id) = setup();

        let err = system
            .animate(id, "unknown", None, 1.0, TweenSpec::new(1.0))
            .unwrap_err();
        assert_eq!(
            err,
            AnimationError::UnknownProperty {
                object: id,
                property: "unknown"
            }
        );

        let missing = ObjectId::new(999);
        assert!(
            system
                .animate(missing, "alpha", None, 1.0, TweenSpec::new(1.0))
                .is_err()
        );
    }

    #[test]
    fn test_set_property_kills_tween() {
        let (mut system, obj, id) = setup();
        system
            .animate(id, "alpha", Some(0.0), 1.0, TweenSpec::new(1.0))
            .unwrap();
        system.set_property(id, "alpha", 0.25).unwrap();
        system.update(0.5);
        assert_eq!(obj.alpha.get(), 0.25);
        assert!(!system.has_object_animations(id));
    }

    #[test]
    fn test_group_resolves_after_slowest_member() {
        let mut system = AnimationSystem::new();
        let a = Rc::new(TestAnimatable::new());
        let b = Rc::new(TestAnimatable::new());
        let id_a = system.register(a.clone());
        let id_b = system.register(b.clone());

        let mut signal = system
            .animate_group(
                vec![request(id_a, "alpha", 1.0, 0.0), request(id_b, "alpha", 1.0, 0.5)],
                None,
            )
            .unwrap();

        system.update(1.0);
        assert_eq!(a.alpha.get(), 1.0);
        assert!(signal.try_complete().is_none());

        let events = system.update(0.6);
        assert_eq!(b.alpha.get(), 1.0);
        assert!(events.iter().any(|e| matches!(e, AnimationEvent::GroupCompleted(_))));
        assert_eq!(signal.try_complete(), Some(Ok(())));
    }

    #[test]
    fn test_group_callback_runs_before_signal() {
        let (mut system, _obj, id) = setup();
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_cb = log.clone();

        let mut signal = system
            .animate_group(
                vec![request(id, "scale", 0.0, 0.0)],
                Some(Box::new(move || log_cb.borrow_mut().push("callback"))),
            )
            .unwrap();

        system.update(2.0);
        assert_eq!(*log.borrow(), vec!["callback"]);
        assert_eq!(signal.try_complete(), Some(Ok(())));
    }

    #[test]
    fn test_empty_group_completes_on_next_update() {
        let mut system = AnimationSystem::new();
        let mut signal = system.animate_group(Vec::new(), None).unwrap();
        assert!(signal.try_complete().is_none());
        system.update(0.0);
        assert_eq!(signal.try_complete(), Some(Ok(())));
    }

    #[test]
    fn test_overwritten_member_settles_group() {
        let (mut system, _obj, id) = setup();
        let mut signal = system
            .animate_group(vec![request(id, "alpha", 1.0, 0.0)], None)
            .unwrap();

        system
            .animate(id, "alpha", None, 0.0, TweenSpec::new(1.0))
            .unwrap();
        assert_eq!(signal.try_complete(), Some(Ok(())));
    }

    #[test]
    fn test_invalid_group_starts_nothing() {
        let (mut system, _obj, id) = setup();
        let result = system.animate_group(
            vec![request(id, "alpha", 1.0, 0.0), request(id, "nope", 1.0, 0.0)],
            None,
        );
        assert!(result.is_err());
        assert_eq!(system.active_count(), 0);
        assert_eq!(system.pending_groups(), 0);
    }

    #[test]
    fn test_clear_abandons_groups() {
        let (mut system, _obj, id) = setup();
        let mut signal = system
            .animate_group(vec![request(id, "alpha", 1.0, 0.0)], None)
            .unwrap();
        system.clear();
        assert_eq!(
            signal.try_complete(),
            Some(Err(MotionError::TransitionAbandoned))
        );
    }

    #[test]
    fn test_skip_all() {
        let (mut system, obj, id) = setup();
        let mut signal = system
            .animate_group(vec![request(id, "alpha", 1.0, 0.0)], None)
            .unwrap();
        system.update(0.1);
        system.skip_all();
        assert_eq!(obj.alpha.get(), 1.0);

        let events = system.update(0.0);
        assert!(events.iter().any(|e| matches!(e, AnimationEvent::Skipped(_))));
        assert_eq!(signal.try_complete(), Some(Ok(())));
    }

    #[test]
    fn test_unregister_removes_animations() {
        let (mut system, _obj, id) = setup();
        system
            .animate(id, "alpha", Some(0.0), 1.0, TweenSpec::new(1.0))
            .unwrap();
        assert!(system.has_object_animations(id));

        system.unregister(id);
        assert!(!system.is_registered(id));
        assert!(!system.has_object_animations(id));
    }
}
