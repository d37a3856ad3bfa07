pub mod animation;
pub mod collision;
pub mod events;
pub mod geometry;
pub mod time;
pub mod timer;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::geometry::{Rect, Vec2};

    /// Default tolerance for float comparisons in physics tests.
    pub const EPSILON: f32 = 1e-4;

    /// Rectangle from its left/top/right/bottom edges.
    pub fn rect_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Rect {
        Rect::new(left, top, right - left, bottom - top)
    }

    /// Assert two floats are within [`EPSILON`] of each other.
    #[track_caller]
    pub fn assert_approx(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() <= EPSILON,
            "expected {expected}, got {actual}"
        );
    }

    /// Assert two vectors are component-wise within [`EPSILON`].
    #[track_caller]
    pub fn assert_vec_approx(actual: Vec2, expected: Vec2) {
        assert!(
            (actual - expected).abs().max_element() <= EPSILON,
            "expected {expected:?}, got {actual:?}"
        );
    }

    /// Run `n` fixed steps of `dt` through `step`, collecting whatever it yields.
    pub fn run_ticks<T>(n: usize, dt: f32, mut step: impl FnMut(f32) -> Vec<T>) -> Vec<T> {
        let mut out = Vec::new();
        for _ in 0..n {
            out.extend(step(dt));
        }
        out
    }

}
