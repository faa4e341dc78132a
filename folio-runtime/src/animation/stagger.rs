//! # Stagger 模块
//!
//! 把一组元素的启动延迟分散开，产生波浪效果。
//!
//! - `Stagger::Each(each)`: 第 i 个元素延迟 `each * i`
//! - `Stagger::Grid { .. }`: 按网格中到起点的欧氏距离（单位：格）分配延迟。
//!   距离先归一化为 `t = (d - min) / (max - min)`，总跨度为
//!   `each * max(columns, count / columns)`（元素不足一行时为 `each * (count - 1)`），
//!   `delay = ease(t) * 总跨度`。8×14 网格、`each = 0.005` 时最后一格在 0.07 秒开始。
//! - `Edges`：从中心量距离，再把 `t` 反转，四周先动、中心最后
//!
//! 无论起点在哪，所有元素都参与；起点只决定距离的度量方式。

use serde::{Deserialize, Serialize};

use super::EasingFunction;

/// 波浪起点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFrom", into = "RawFrom")]
pub enum StaggerFrom {
    /// 指定索引（行优先）
    Index(usize),
    /// 第一个元素
    Start,
    /// 网格中心
    Center,
    /// 最后一个元素
    End,
    /// 从四周向中心
    Edges,
}

impl Default for StaggerFrom {
    fn default() -> Self {
        Self::Index(0)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawFrom {
    Index(usize),
    Name(String),
}

impl TryFrom<RawFrom> for StaggerFrom {
    type Error = String;

    fn try_from(raw: RawFrom) -> Result<Self, Self::Error> {
        match raw {
            RawFrom::Index(index) => Ok(Self::Index(index)),
            RawFrom::Name(name) => match name.as_str() {
                "start" => Ok(Self::Start),
                "center" => Ok(Self::Center),
                "end" => Ok(Self::End),
                "edges" => Ok(Self::Edges),
                other => Err(format!("未知的 stagger 起点 '{other}'")),
            },
        }
    }
}

impl From<StaggerFrom> for RawFrom {
    fn from(from: StaggerFrom) -> Self {
        match from {
            StaggerFrom::Index(index) => RawFrom::Index(index),
            StaggerFrom::Start => RawFrom::Name("start".into()),
            StaggerFrom::Center => RawFrom::Name("center".into()),
            StaggerFrom::End => RawFrom::Name("end".into()),
            StaggerFrom::Edges => RawFrom::Name("edges".into()),
        }
    }
}

/// 延迟分配策略
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Stagger {
    /// 每个元素固定递增
    Each(f32),
    /// 网格感知
    Grid {
        /// `[rows, columns]`
        grid: [usize; 2],
        #[serde(default)]
        from: StaggerFrom,
        each: f32,
        #[serde(default)]
        ease: EasingFunction,
    },
}

impl Stagger {
    /// 默认网格策略：从索引 0 开始，每格 0.005 秒，线性
    pub fn grid(rows: usize, columns: usize) -> Self {
        Self::Grid {
            grid: [rows, columns],
            from: StaggerFrom::Index(0),
            each: 0.005,
            ease: EasingFunction::Linear,
        }
    }

    /// 为 `count` 个元素（行优先）计算延迟
    pub fn delays(&self, count: usize) -> Vec<f32> {
        match *self {
            Stagger::Each(each) => (0..count).map(|i| each * i as f32).collect(),
            Stagger::Grid {
                grid,
                from,
                each,
                ease,
            } => grid_delays(count, grid, from, each, ease),
        }
    }

    /// 最后一个元素开始的时间（整组的交错跨度）
    pub fn max_delay(&self, count: usize) -> f32 {
        self.delays(count).into_iter().fold(0.0, f32::max)
    }
}

fn grid_delays(
    count: usize,
    [rows, columns]: [usize; 2],
    from: StaggerFrom,
    each: f32,
    ease: EasingFunction,
) -> Vec<f32> {
    let columns = columns.max(1);
    let rows = rows.max(1).max(count.div_ceil(columns));

    let cell = |index: usize| ((index % columns) as f32, (index / columns) as f32);
    let last_x = (columns - 1) as f32;
    let last_y = (rows - 1) as f32;
    let origin = match from {
        StaggerFrom::Index(index) => cell(index),
        StaggerFrom::Start => (0.0, 0.0),
        StaggerFrom::End => (last_x, last_y),
        StaggerFrom::Center | StaggerFrom::Edges => (last_x / 2.0, last_y / 2.0),
    };

    let distances: Vec<f32> = (0..count)
        .map(|index| {
            let (x, y) = cell(index);
            let (dx, dy) = (x - origin.0, y - origin.1);
            (dx * dx + dy * dy).sqrt()
        })
        .collect();

    let max = distances.iter().copied().fold(0.0, f32::max);
    let min = distances.iter().copied().fold(f32::INFINITY, f32::min);
    let range = max - min;
    if count == 0 || range <= 0.0 {
        return vec![0.0; count];
    }

    let span = if columns > count {
        (count - 1) as f32
    } else {
        (columns as f32).max(count as f32 / columns as f32)
    };
    let amount = each * span;
    distances
        .into_iter()
        .map(|d| {
            let t = (d - min) / range;
            let t = if from == StaggerFrom::Edges { 1.0 - t } else { t };
            ease.apply(t) * amount
        })
        .collect()
}
