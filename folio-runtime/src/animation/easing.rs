//! # Easing 模块
//!
//! 缓动函数库，用于动画的时间插值。
//!
//! 页面标记和配置里使用的是 `power2.out`、`power3.inOut`、`elastic.out(1, 0.3)`
//! 这种命名，这里通过 `FromStr` 解析成 [`EasingFunction`]：
//!
//! | 名称 | 曲线 |
//! |---|---|
//! | `none` / `linear` | 线性 |
//! | `power1` | 二次 |
//! | `power2` | 三次 |
//! | `power3` | 四次 |
//! | `power4` | 五次 |
//! | `sine` | 正弦 |
//! | `elastic` | 弹性（仅出） |
//! | `bounce` | 弹跳（仅出） |
//!
//! 不带后缀的名称等同于 `.out`。

use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 缓动函数类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EasingFunction {
    /// 线性（匀速）
    #[default]
    Linear,
    /// 二次缓入
    EaseInQuad,
    /// 二次缓出
    EaseOutQuad,
    /// 二次缓入缓出
    EaseInOutQuad,
    /// 三次缓入
    EaseInCubic,
    /// 三次缓出
    EaseOutCubic,
    /// 三次缓入缓出
    EaseInOutCubic,
    /// 四次缓入
    EaseInQuart,
    /// 四次缓出
    EaseOutQuart,
    /// 四次缓入缓出
    EaseInOutQuart,
    /// 五次缓入
    EaseInQuint,
    /// 五次缓出
    EaseOutQuint,
    /// 五次缓入缓出
    EaseInOutQuint,
    /// 正弦缓入
    EaseInSine,
    /// 正弦缓出
    EaseOutSine,
    /// 正弦缓入缓出
    EaseInOutSine,
    /// 弹性缓出（振幅 1，周期 0.3）
    EaseOutElastic,
    /// 弹跳缓出
    EaseOutBounce,
}

impl EasingFunction {
    /// 计算缓动值
    ///
    /// # 参数
    /// - `t`: 时间进度 (0.0 - 1.0)
    ///
    /// # 返回
    /// - 缓动后的进度值（弹性曲线会短暂超过 1.0）
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            EasingFunction::Linear => t,
            EasingFunction::EaseInQuad => ease_in_pow(t, 2),
            EasingFunction::EaseOutQuad => ease_out_pow(t, 2),
            EasingFunction::EaseInOutQuad => ease_in_out_pow(t, 2),
            EasingFunction::EaseInCubic => ease_in_pow(t, 3),
            EasingFunction::EaseOutCubic => ease_out_pow(t, 3),
            EasingFunction::EaseInOutCubic => ease_in_out_pow(t, 3),
            EasingFunction::EaseInQuart => ease_in_pow(t, 4),
            EasingFunction::EaseOutQuart => ease_out_pow(t, 4),
            EasingFunction::EaseInOutQuart => ease_in_out_pow(t, 4),
            EasingFunction::EaseInQuint => ease_in_pow(t, 5),
            EasingFunction::EaseOutQuint => ease_out_pow(t, 5),
            EasingFunction::EaseInOutQuint => ease_in_out_pow(t, 5),
            EasingFunction::EaseInSine => 1.0 - (t * PI / 2.0).cos(),
            EasingFunction::EaseOutSine => (t * PI / 2.0).sin(),
            EasingFunction::EaseInOutSine => -((PI * t).cos() - 1.0) / 2.0,
            EasingFunction::EaseOutElastic => ease_out_elastic(t),
            EasingFunction::EaseOutBounce => ease_out_bounce(t),
        }
    }

    /// 规范名称（`FromStr` 的逆操作）
    pub fn name(&self) -> &'static str {
        match self {
            EasingFunction::Linear => "none",
            EasingFunction::EaseInQuad => "power1.in",
            EasingFunction::EaseOutQuad => "power1.out",
            EasingFunction::EaseInOutQuad => "power1.inOut",
            EasingFunction::EaseInCubic => "power2.in",
            EasingFunction::EaseOutCubic => "power2.out",
            EasingFunction::EaseInOutCubic => "power2.inOut",
            EasingFunction::EaseInQuart => "power3.in",
            EasingFunction::EaseOutQuart => "power3.out",
            EasingFunction::EaseInOutQuart => "power3.inOut",
            EasingFunction::EaseInQuint => "power4.in",
            EasingFunction::EaseOutQuint => "power4.out",
            EasingFunction::EaseInOutQuint => "power4.inOut",
            EasingFunction::EaseInSine => "sine.in",
            EasingFunction::EaseOutSine => "sine.out",
            EasingFunction::EaseInOutSine => "sine.inOut",
            EasingFunction::EaseOutElastic => "elastic.out",
            EasingFunction::EaseOutBounce => "bounce.out",
        }
    }
}

/// 缓动名称解析错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("未知的缓动名称 '{0}'")]
pub struct UnknownEasing(pub String);

impl FromStr for EasingFunction {
    type Err = UnknownEasing;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // elastic.out(1, 0.3) 之类的参数只接受默认形状，参数部分忽略
        let base = trimmed.split('(').next().unwrap_or(trimmed).trim();
        let (family, direction) = match base.split_once('.') {
            Some((family, direction)) => (family, direction),
            None => (base, "out"),
        };

        use EasingFunction::*;
        let easing = match (family, direction) {
            ("none" | "linear", _) => Linear,
            ("power0", _) => Linear,
            ("power1" | "quad", "in") => EaseInQuad,
            ("power1" | "quad", "out") => EaseOutQuad,
            ("power1" | "quad", "inOut") => EaseInOutQuad,
            ("power2" | "cubic", "in") => EaseInCubic,
            ("power2" | "cubic", "out") => EaseOutCubic,
            ("power2" | "cubic", "inOut") => EaseInOutCubic,
            ("power3" | "quart", "in") => EaseInQuart,
            ("power3" | "quart", "out") => EaseOutQuart,
            ("power3" | "quart", "inOut") => EaseInOutQuart,
            ("power4" | "quint", "in") => EaseInQuint,
            ("power4" | "quint", "out") => EaseOutQuint,
            ("power4" | "quint", "inOut") => EaseInOutQuint,
            ("sine", "in") => EaseInSine,
            ("sine", "out") => EaseOutSine,
            ("sine", "inOut") => EaseInOutSine,
            ("elastic", "out") => EaseOutElastic,
            ("bounce", "out") => EaseOutBounce,
            _ => return Err(UnknownEasing(s.to_string())),
        };
        Ok(easing)
    }
}

impl TryFrom<String> for EasingFunction {
    type Error = UnknownEasing;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EasingFunction> for String {
    fn from(value: EasingFunction) -> Self {
        value.name().to_string()
    }
}

impl fmt::Display for EasingFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn ease_in_pow(t: f32, n: i32) -> f32 {
    t.powi(n)
}

fn ease_out_pow(t: f32, n: i32) -> f32 {
    1.0 - (1.0 - t).powi(n)
}

fn ease_in_out_pow(t: f32, n: i32) -> f32 {
    if t < 0.5 {
        2.0_f32.powi(n - 1) * t.powi(n)
    } else {
        1.0 - (-2.0 * t + 2.0).powi(n) / 2.0
    }
}

/// 弹性缓出
fn ease_out_elastic(t: f32) -> f32 {
    if t == 0.0 {
        0.0
    } else if t == 1.0 {
        1.0
    } else {
        let c4 = (2.0 * PI) / 3.0;
        2.0_f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * c4).sin() + 1.0
    }
}

/// 弹跳缓出
fn ease_out_bounce(t: f32) -> f32 {
    let n1 = 7.5625;
    let d1 = 2.75;

    if t < 1.0 / d1 {
        n1 * t * t
    } else if t < 2.0 / d1 {
        let t = t - 1.5 / d1;
        n1 * t * t + 0.75
    } else if t < 2.5 / d1 {
        let t = t - 2.25 / d1;
        n1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / d1;
        n1 * t * t + 0.984375
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear() {
        let easing = EasingFunction::Linear;
        assert_eq!(easing.apply(0.0), 0.0);
        assert_eq!(easing.apply(0.5), 0.5);
        assert_eq!(easing.apply(1.0), 1.0);
    }

    #[test]
    fn test_endpoints() {
        let all = [
            EasingFunction::EaseInOutQuad,
            EasingFunction::EaseOutCubic,
            EasingFunction::EaseInOutQuart,
            EasingFunction::EaseOutQuint,
            EasingFunction::EaseInOutSine,
            EasingFunction::EaseOutElastic,
            EasingFunction::EaseOutBounce,
        ];
        for easing in all {
            assert!(easing.apply(0.0).abs() < 1e-4, "{easing}");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-3, "{easing}");
        }
    }

    #[test]
    fn test_in_out_midpoint() {
        for easing in [
            EasingFunction::EaseInOutQuad,
            EasingFunction::EaseInOutCubic,
            EasingFunction::EaseInOutQuart,
        ] {
            assert!((easing.apply(0.5) - 0.5).abs() < 1e-4);
        }
    }

    #[test]
    fn test_clamp() {
        let easing = EasingFunction::Linear;
        assert_eq!(easing.apply(-0.5), 0.0);
        assert_eq!(easing.apply(1.5), 1.0);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("none".parse(), Ok(EasingFunction::Linear));
        assert_eq!("power2".parse(), Ok(EasingFunction::EaseOutCubic));
        assert_eq!("power2.out".parse(), Ok(EasingFunction::EaseOutCubic));
        assert_eq!("power3.inOut".parse(), Ok(EasingFunction::EaseInOutQuart));
        assert_eq!("power3.out".parse(), Ok(EasingFunction::EaseOutQuart));
        assert_eq!(
            "elastic.out(1, 0.3)".parse(),
            Ok(EasingFunction::EaseOutElastic)
        );
        assert!("wobble".parse::<EasingFunction>().is_err());
    }

    #[test]
    fn test_name_roundtrip() {
        let easing = EasingFunction::EaseInOutQuart;
        assert_eq!(easing.name().parse(), Ok(easing));
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&EasingFunction::EaseOutCubic).unwrap();
        assert_eq!(json, "\"power2.out\"");
        let parsed: EasingFunction = serde_json::from_str("\"power3.inOut\"").unwrap();
        assert_eq!(parsed, EasingFunction::EaseInOutQuart);
    }
}
