//! # Config 模块
//!
//! 动效配置，集中管理所有可调参数。
//!
//! ## 配置优先级
//!
//! 1. 页面内嵌 JSON（`<script type="application/json" id="folio-config">`）
//! 2. 默认值（最低）
//!
//! 每个字段都有默认值，JSON 里只需写要覆盖的部分。

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cursor::CursorConfig;
use crate::error::ConfigError;
use crate::overlay::{MAX_GRID_SIZE, OverlayOptions, TransitionConfig};
use crate::scroll::ScrollConfig;
use crate::ticker::DEFAULT_MAX_FRAME_DT;
use crate::view::TransitionPresets;

/// 允许的日志级别
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// 动效配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionConfig {
    /// 日志级别（trace/debug/info/warn/error）
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// 遮罩网格
    #[serde(default = "default_overlay")]
    pub overlay: OverlayOptions,

    /// 光标
    #[serde(default)]
    pub cursor: CursorConfig,

    /// 平滑滚动
    #[serde(default)]
    pub scroll: ScrollConfig,

    /// 各导航的遮罩参数
    #[serde(default)]
    pub transitions: TransitionPresets,

    /// 帧间隔上限（秒），页面从后台恢复时避免动画跳跃
    #[serde(default = "default_max_frame_dt")]
    pub max_frame_dt: f32,
}

// 默认值函数
fn default_log_level() -> String {
    "info".to_string()
}

fn default_overlay() -> OverlayOptions {
    OverlayOptions {
        rows: 8,
        columns: 14,
    }
}

fn default_max_frame_dt() -> f32 {
    DEFAULT_MAX_FRAME_DT
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            overlay: default_overlay(),
            cursor: CursorConfig::default(),
            scroll: ScrollConfig::default(),
            transitions: TransitionPresets::default(),
            max_frame_dt: default_max_frame_dt(),
        }
    }
}

impl MotionConfig {
    /// 从 JSON 解析并验证
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 加载内嵌配置
    ///
    /// 没有内嵌配置时使用默认值；解析或验证失败时打印警告并使用默认值。
    pub fn load_or_default(json: Option<&str>) -> Self {
        let Some(json) = json.filter(|json| !json.trim().is_empty()) else {
            info!("未找到内嵌配置，使用默认配置");
            return Self::default();
        };

        match Self::from_json(json) {
            Ok(config) => {
                info!("内嵌配置加载成功");
                config
            }
            Err(e) => {
                warn!(error = %e, "内嵌配置无效，使用默认配置");
                Self::default()
            }
        }
    }

    /// 序列化为格式化 JSON
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "未知的日志级别 '{}'",
                self.log_level
            )));
        }

        for (name, value) in [
            ("overlay.rows", self.overlay.rows),
            ("overlay.columns", self.overlay.columns),
        ] {
            if !(1..=MAX_GRID_SIZE).contains(&value) {
                return Err(ConfigError::Validation(format!(
                    "{name} 必须在 1..={MAX_GRID_SIZE} 之间，当前为 {value}"
                )));
            }
        }

        // 平滑系数
        for (name, value) in [
            ("cursor.position_lerp", self.cursor.position_lerp),
            ("cursor.scale_lerp", self.cursor.scale_lerp),
            ("scroll.easing", self.scroll.easing),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::Validation(format!(
                    "{name} 必须在 (0, 1] 之间，当前为 {value}"
                )));
            }
        }

        // 时长
        let transitions = [
            ("transitions.reveal", &self.transitions.reveal),
            (
                "transitions.enter_portfolio_show",
                &self.transitions.enter_portfolio_show,
            ),
            (
                "transitions.enter_portfolio_hide",
                &self.transitions.enter_portfolio_hide,
            ),
            (
                "transitions.leave_portfolio_show",
                &self.transitions.leave_portfolio_show,
            ),
            (
                "transitions.leave_portfolio_hide",
                &self.transitions.leave_portfolio_hide,
            ),
            ("transitions.page_leave", &self.transitions.page_leave),
        ];
        for (name, transition) in transitions {
            validate_transition(name, transition)?;
        }
        for (name, value) in [
            ("cursor.snap_scale_duration", self.cursor.snap_scale_duration),
            ("cursor.drift_nudge.duration", self.cursor.drift_nudge.duration),
            ("cursor.snap_nudge.duration", self.cursor.snap_nudge.duration),
        ] {
            validate_duration(name, value)?;
        }

        // 其余数值只要求有限
        for (name, value) in [
            ("cursor.stretch_factor", self.cursor.stretch_factor),
            ("cursor.stretch_cap", self.cursor.stretch_cap),
            ("cursor.squash_cap", self.cursor.squash_cap),
            ("cursor.snap_pull", self.cursor.snap_pull),
            ("cursor.snap_scale", self.cursor.snap_scale),
            ("cursor.drift_nudge.pull", self.cursor.drift_nudge.pull),
            ("cursor.snap_nudge.pull", self.cursor.snap_nudge.pull),
            ("scroll.parallax_range", self.scroll.parallax_range),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::Validation(format!("{name} 必须是有限数值")));
            }
        }

        if !(self.max_frame_dt.is_finite() && self.max_frame_dt > 0.0) {
            return Err(ConfigError::Validation(
                "max_frame_dt 必须大于 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn validate_duration(name: &str, value: f32) -> Result<(), ConfigError> {
    if !(value.is_finite() && value >= 0.0) {
        return Err(ConfigError::Validation(format!(
            "{name} 必须是非负有限数值，当前为 {value}"
        )));
    }
    Ok(())
}

fn validate_transition(name: &str, transition: &TransitionConfig) -> Result<(), ConfigError> {
    validate_duration(&format!("{name}.duration"), transition.duration)
}
