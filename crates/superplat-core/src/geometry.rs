use serde::{Deserialize, Serialize};

pub use glam::Vec2;

/// Axis-aligned rectangle in world units, origin at the top-left corner.
///
/// World space follows screen conventions: +Y points down, so `top() < bottom()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
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

    /// Collision rectangle of a body at `position` with the given size, inset by `padding`.
    ///
    /// Horizontal padding is applied on both sides, vertical padding only at the top,
    /// so the bottom edge always sits at `position.y + height` (feet stay on the ground).
    pub fn inset(position: Vec2, width: u32, height: u32, padding: Vec2) -> Self {
        Self {
            x: position.x + padding.x,
            y: position.y + padding.y,
            width: width as f32 - padding.x * 2.0,
            height: height as f32 - padding.y,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Strict overlap test. Rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        other.left() < self.right()
            && self.left() < other.right()
            && other.top() < self.bottom()
            && self.top() < other.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_follow_screen_space() {
        let r = Rect::new(2.0, 3.0, 4.0, 5.0);
        assert_eq!(r.left(), 2.0);
        assert_eq!(r.right(), 6.0);
        assert_eq!(r.top(), 3.0);
        assert_eq!(r.bottom(), 8.0);
    }

    #[test]
    fn inset_keeps_bottom_edge() {
        let r = Rect::inset(Vec2::new(10.0, 20.0), 16, 22, Vec2::new(3.0, 3.0));
        assert_eq!(r.left(), 13.0);
        assert_eq!(r.right(), 23.0);
        assert_eq!(r.top(), 23.0);
        assert_eq!(r.bottom(), 42.0, "bottom must equal position.y + height");
    }

    #[test]
    fn touching_rects_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 4.0, 4.0);
        let b = Rect::new(4.0, 0.0, 4.0, 4.0);
        let c = Rect::new(0.0, 4.0, 4.0, 4.0);
        assert!(!a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn overlapping_rects_intersect_symmetrically() {
        let a = Rect::new(0.0, 0.0, 4.0, 4.0);
        let b = Rect::new(3.5, 3.5, 4.0, 4.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }
}
