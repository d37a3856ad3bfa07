use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Side of the moving body that made contact.
///
/// Discriminants follow the clockwise cycle TOP → RIGHT → BOTTOM → LEFT; the
/// order doubles as the tie-break when two penetrations are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Top = 0,
    Right = 1,
    Bottom = 2,
    Left = 3,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    /// The side as seen from the other participant: a half turn around the cycle.
    pub fn opposite(self) -> Side {
        Side::ALL[(self as usize + 2) % 4]
    }
}

/// Axis a movement phase (and therefore a collision test) runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

/// Outcome of a positive pairwise test.
///
/// Valid only for the dispatch that produced it; never stored across frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult<C> {
    pub candidate: C,
    /// Overlap depth along the shallowest side (>= 0).
    pub penetration: f32,
    /// Contact side relative to the mover.
    pub side: Side,
    /// Contact side relative to the candidate.
    pub opposite_side: Side,
}

/// Penetration depth per side, indexed by `Side as usize`.
pub fn penetrations(mover: &Rect, candidate: &Rect) -> [f32; 4] {
    [
        (mover.top() - candidate.bottom()).abs(),
        (candidate.left() - mover.right()).abs(),
        (mover.bottom() - candidate.top()).abs(),
        (mover.left() - candidate.right()).abs(),
    ]
}

/// Test the mover's bounds against a candidate's bounds.
///
/// Returns `None` when the rectangles do not intersect. On intersection the
/// contact side is the side with the smallest penetration, first one wins.
pub fn test_aabb<C>(
    mover: &Rect,
    candidate: C,
    candidate_bounds: &Rect,
) -> Option<CollisionResult<C>> {
    if !mover.intersects(candidate_bounds) {
        return None;
    }

    let depths = penetrations(mover, candidate_bounds);
    let mut side = Side::Top;
    let mut penetration = depths[0];
    for s in &Side::ALL[1..] {
        let depth = depths[*s as usize];
        if depth < penetration {
            penetration = depth;
            side = *s;
        }
    }

    Some(CollisionResult {
        candidate,
        penetration,
        side,
        opposite_side: side.opposite(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_half_turn() {
        assert_eq!(Side::Top.opposite(), Side::Bottom);
        assert_eq!(Side::Right.opposite(), Side::Left);
        assert_eq!(Side::Bottom.opposite(), Side::Top);
        assert_eq!(Side::Left.opposite(), Side::Right);
    }

    #[test]
    fn disjoint_rects_report_nothing() {
        let mover = Rect::new(0.0, 0.0, 4.0, 4.0);
        let far = Rect::new(10.0, 10.0, 4.0, 4.0);
        assert!(test_aabb(&mover, 7u32, &far).is_none());
    }

    #[test]
    fn landing_reports_bottom() {
        // Mover's feet sink 0.5 into a floor below it.
        let mover = Rect::new(10.0, 10.0, 4.0, 4.0);
        let floor = Rect::new(0.0, 13.5, 32.0, 16.0);
        let hit = test_aabb(&mover, "floor", &floor).expect("should intersect");
        assert_eq!(hit.candidate, "floor");
        assert_eq!(hit.side, Side::Bottom);
        assert_eq!(hit.opposite_side, Side::Top);
        assert_eq!(hit.penetration, 0.5);
    }

    #[test]
    fn head_bump_reports_top() {
        let mover = Rect::new(10.0, 10.0, 4.0, 6.0);
        let ceiling = Rect::new(8.0, -6.0, 16.0, 16.5);
        let hit = test_aabb(&mover, (), &ceiling).expect("should intersect");
        assert_eq!(hit.side, Side::Top);
        assert_eq!(hit.penetration, 0.5);
    }

    #[test]
    fn walking_into_wall_reports_right_and_left() {
        let mover = Rect::new(10.0, 10.0, 4.0, 4.0);
        let wall_right = Rect::new(13.0, 0.0, 16.0, 32.0);
        let hit = test_aabb(&mover, (), &wall_right).expect("should intersect");
        assert_eq!(hit.side, Side::Right);
        assert_eq!(hit.penetration, 1.0);

        let wall_left = Rect::new(-5.0, 0.0, 16.0, 32.0);
        let hit = test_aabb(&mover, (), &wall_left).expect("should intersect");
        assert_eq!(hit.side, Side::Left);
        assert_eq!(hit.penetration, 1.0);
    }

    #[test]
    fn ties_resolve_in_cycle_order() {
        // Identical rectangles: every penetration equals the size, TOP wins.
        let a = Rect::new(0.0, 0.0, 4.0, 4.0);
        let hit = test_aabb(&a, (), &a).expect("should intersect");
        assert_eq!(hit.side, Side::Top);

        // Corner overlap of equal depth on RIGHT and BOTTOM: RIGHT comes first.
        let mover = Rect::new(0.0, 0.0, 4.0, 4.0);
        let corner = Rect::new(3.0, 3.0, 4.0, 4.0);
        let hit = test_aabb(&mover, (), &corner).expect("should intersect");
        assert_eq!(hit.side, Side::Right);
        assert_eq!(hit.penetration, 1.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn rect() -> impl Strategy<Value = Rect> {
            (
                -50.0f32..50.0,
                -50.0f32..50.0,
                1.0f32..30.0,
                1.0f32..30.0,
            )
                .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
        }

        proptest! {
            #[test]
            fn side_is_minimum_penetration(a in rect(), b in rect()) {
                if let Some(hit) = test_aabb(&a, (), &b) {
                    let depths = penetrations(&a, &b);
                    let min = depths.iter().copied().fold(f32::INFINITY, f32::min);
                    prop_assert_eq!(hit.penetration, min);
                    prop_assert_eq!(depths[hit.side as usize], min);
                    // No earlier side in the cycle shares the minimum.
                    for s in &Side::ALL[..hit.side as usize] {
                        prop_assert!(depths[*s as usize] > min);
                    }
                    prop_assert!(hit.penetration >= 0.0);
                }
            }

            #[test]
            fn opposite_side_is_rotated_by_two(a in rect(), b in rect()) {
                if let Some(hit) = test_aabb(&a, (), &b) {
                    prop_assert_eq!(hit.opposite_side as usize, (hit.side as usize + 2) % 4);
                }
            }

            #[test]
            fn no_hit_without_intersection(a in rect(), b in rect()) {
                prop_assert_eq!(test_aabb(&a, (), &b).is_some(), a.intersects(&b));
            }
        }
    }
}
