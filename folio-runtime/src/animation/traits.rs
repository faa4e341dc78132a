//! # Traits 模块
//!
//! 动画系统与被动画对象之间的接口。
//!
//! - `ObjectId`: 由 AnimationSystem 分配的唯一对象标识符
//! - `Animatable`: 可动画对象接口，宿主层为 DOM 元素实现它

use std::fmt;

/// 对象唯一标识符
///
/// 由 `AnimationSystem` 在对象注册时分配，使用内部计数器生成，不会重复。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) u64);

impl ObjectId {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// 获取内部 ID 值
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.0)
    }
}

/// 属性键：`ObjectId + property_id`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimPropertyKey {
    /// 对象实例 ID
    pub object_id: ObjectId,
    /// 属性名称
    pub property_id: &'static str,
}

impl AnimPropertyKey {
    pub fn new(object_id: ObjectId, property_id: &'static str) -> Self {
        Self {
            object_id,
            property_id,
        }
    }
}

impl fmt::Display for AnimPropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.object_id, self.property_id)
    }
}

/// 可动画对象接口
///
/// 对象声明自己有哪些属性可以被动画，系统通过 `set_property` 直接写值。
/// 使用 `&self` 而不是 `&mut self`：实现方自行用 `Cell`/`RefCell`
/// 或直接写 DOM 样式，这样同一对象可以同时被多个属性补间驱动。
pub trait Animatable: 'static {
    /// 获取属性的当前值，属性不存在时返回 `None`
    fn get_property(&self, property_id: &str) -> Option<f32>;

    /// 设置属性的新值，属性不存在时返回 `false`
    fn set_property(&self, property_id: &str, value: f32) -> bool;

    /// 所有可动画属性的列表
    fn property_list(&self) -> &'static [&'static str];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id() {
        let id1 = ObjectId::new(1);
        let id2 = ObjectId::new(2);

        assert_eq!(id1, ObjectId::new(1));
        assert_ne!(id1, id2);
        assert_eq!(id1.value(), 1);
        assert_eq!(id1.to_string(), "ObjectId(1)");
    }

    #[test]
    fn test_anim_property_key() {
        let id = ObjectId::new(7);
        let key = AnimPropertyKey::new(id, "scale");
        assert_eq!(key, AnimPropertyKey::new(id, "scale"));
        assert_ne!(key, AnimPropertyKey::new(id, "opacity"));
        assert_eq!(key.to_string(), "ObjectId(7):scale");
    }
}
