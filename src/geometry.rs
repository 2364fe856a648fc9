//! World-space geometry primitives
//!
//! Entities live in floating-point world coordinates. Screen-space drawing goes
//! through [`ScreenRect`](crate::render::ScreenRect) once the camera has been applied.

use std::ops::{Add, AddAssign, Mul, Sub};

/// A 2D vector in world units (pixels)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }

    pub fn length(&self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Unit vector in the same direction, or `ZERO` for the zero vector
    pub fn normalized(&self) -> Vec2 {
        let len = self.length();
        if len <= f32::EPSILON {
            Vec2::ZERO
        } else {
            Vec2::new(self.x / len, self.y / len)
        }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn distance(&self, other: Vec2) -> f32 {
        (other - *self).length()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl From<[f32; 2]> for Vec2 {
    fn from(value: [f32; 2]) -> Self {
        Vec2::new(value[0], value[1])
    }
}

/// Axis-aligned rectangle in world coordinates
///
/// `x`/`y` is the top-left corner. Edges are half-open: two rectangles that
/// only share an edge do not intersect.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    /// Creates a rectangle of the given size centred on `center`
    pub fn from_center(center: Vec2, w: f32, h: f32) -> Self {
        Rect::new(center.x - w / 2.0, center.y - h / 2.0, w, h)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.x = center.x - self.w / 2.0;
        self.y = center.y - self.h / 2.0;
    }

    pub fn translated(&self, delta: Vec2) -> Rect {
        Rect::new(self.x + delta.x, self.y + delta.y, self.w, self.h)
    }

    /// Strict overlap test (touching edges do not count)
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Same centre, both dimensions multiplied by `ratio`
    pub fn scaled_about_center(&self, ratio: f32) -> Rect {
        Rect::from_center(self.center(), self.w * ratio, self.h * ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_zero_vector_stays_zero() {
        assert_eq!(Vec2::ZERO.normalized(), Vec2::ZERO);
        let n = Vec2::new(3.0, 4.0).normalized();
        assert!((n.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rect_edges_and_center() {
        let r = Rect::from_center(Vec2::new(100.0, 100.0), 20.0, 10.0);
        assert_eq!(r.left(), 90.0);
        assert_eq!(r.right(), 110.0);
        assert_eq!(r.top(), 95.0);
        assert_eq!(r.bottom(), 105.0);
        assert_eq!(r.center(), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_touching_rects_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 16.0, 16.0);
        let b = Rect::new(16.0, 0.0, 16.0, 16.0);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&Rect::new(15.0, 15.0, 4.0, 4.0)));
    }

    #[test]
    fn test_scaled_about_center() {
        let r = Rect::new(0.0, 0.0, 40.0, 20.0).scaled_about_center(0.5);
        assert_eq!(r, Rect::new(10.0, 5.0, 20.0, 10.0));
    }
}
