//! # Vec2 模块
//!
//! 二维向量与矩形，光标和磁吸计算的基础值类型。

/// 二维向量
///
/// 可变的 (x, y) 对，相等性按字段比较。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    /// 创建新的向量
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// 零向量
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// 原地线性插值：`self += (other - self) * t`
    pub fn lerp(&mut self, other: Vec2, t: f32) -> &mut Self {
        self.x += (other.x - self.x) * t;
        self.y += (other.y - self.y) * t;
        self
    }

    /// 返回插值后的新向量
    pub fn lerped(self, other: Vec2, t: f32) -> Self {
        let mut out = self;
        out.lerp(other, t);
        out
    }

    /// 原地相减
    pub fn sub(&mut self, other: Vec2) -> &mut Self {
        self.x -= other.x;
        self.y -= other.y;
        self
    }

    /// 从另一个向量复制
    pub fn copy_from(&mut self, other: Vec2) -> &mut Self {
        self.x = other.x;
        self.y = other.y;
        self
    }

    /// 长度
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// 方向角（度），`atan2(y, x)`
    pub fn angle_degrees(self) -> f32 {
        self.y.atan2(self.x).to_degrees()
    }

    /// 按标量缩放
    pub fn scaled(self, k: f32) -> Self {
        Self::new(self.x * k, self.y * k)
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// 轴对齐矩形（视口坐标）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// 中心点
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_in_place() {
        let mut v = Vec2::new(0.0, 0.0);
        v.lerp(Vec2::new(10.0, 20.0), 0.5);
        assert_eq!(v, Vec2::new(5.0, 10.0));
    }

    #[test]
    fn test_lerped_leaves_source_untouched() {
        let v = Vec2::new(-100.0, -100.0);
        assert_eq!(v.lerped(Vec2::zero(), 0.1), Vec2::new(-90.0, -90.0));
        assert_eq!(v, Vec2::new(-100.0, -100.0));
    }

    #[test]
    fn test_sub_and_copy() {
        let mut v = Vec2::new(3.0, 4.0);
        v.sub(Vec2::new(1.0, 1.0));
        assert_eq!(v, Vec2::new(2.0, 3.0));

        let mut w = Vec2::zero();
        w.copy_from(v);
        assert_eq!(w, v);
    }

    #[test]
    fn test_angle_and_length() {
        let v = Vec2::new(3.0, 4.0);
        assert_eq!(v.length(), 5.0);
        assert!((Vec2::new(0.0, 1.0).angle_degrees() - 90.0).abs() < 1e-4);
        assert!((Vec2::new(-1.0, 0.0).angle_degrees() - 180.0).abs() < 1e-4);
    }

    #[test]
    fn test_rect_center() {
        let r = Rect::new(10.0, 20.0, 100.0, 40.0);
        assert_eq!(r.center(), Vec2::new(60.0, 40.0));
    }
}
