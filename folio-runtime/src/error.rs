//! # Error 模块
//!
//! 定义 folio-runtime 中使用的错误类型。
//!
//! 缺失的 DOM 元素不算错误：宿主层直接跳过。这里只覆盖动画系统、
//! 配置和转场信号三类真正会失败的地方。

use thiserror::Error;

use crate::animation::ObjectId;

/// 动画系统错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// 对象未注册
    #[error("对象 {object} 未注册")]
    NotRegistered { object: ObjectId },

    /// 属性不存在
    #[error("对象 {object} 上不存在属性 '{property}'")]
    UnknownProperty {
        object: ObjectId,
        property: &'static str,
    },
}

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// JSON 解析失败
    #[error("配置解析失败: {0}")]
    Parse(String),

    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    Serialize(String),

    /// 验证失败
    #[error("配置验证失败: {0}")]
    Validation(String),
}

/// folio-runtime 统一错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MotionError {
    /// 动画错误
    #[error("动画错误: {0}")]
    Animation(#[from] AnimationError),

    /// 配置错误
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// 转场完成信号在触发前被丢弃（动画系统被清空或销毁）
    #[error("转场完成信号被丢弃，动画未正常结束")]
    TransitionAbandoned,
}

/// Result 类型别名
pub type MotionResult<T> = Result<T, MotionError>;
