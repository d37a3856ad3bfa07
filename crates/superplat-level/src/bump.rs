use serde::{Deserialize, Serialize};

use superplat_core::geometry::Vec2;

use crate::body::Body;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BumpState {
    #[default]
    Idle,
    /// Rest position is captured on the next update.
    BumpStart,
    BumpingUp,
    BumpingDown,
}

/// Scripted up-and-back displacement of a block hit from below.
#[derive(Debug, Clone, PartialEq)]
pub struct Bump {
    state: BumpState,
    rest: Vec2,
    distance: f32,
    speed: f32,
}

impl Bump {
    pub fn new(distance: f32, speed: f32) -> Self {
        Self {
            state: BumpState::Idle,
            rest: Vec2::ZERO,
            distance: distance.abs(),
            speed: speed.abs(),
        }
    }

    pub fn state(&self) -> BumpState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == BumpState::Idle
    }

    /// Start a bump. Ignored while one is already in progress, so the rest
    /// position is never recaptured from a displaced block.
    pub fn trigger(&mut self) -> bool {
        if self.is_idle() {
            self.state = BumpState::BumpStart;
            true
        } else {
            false
        }
    }

    /// Step the machine and move `body` directly by `dt` seconds.
    ///
    /// Motion is clamped to the peak and to rest, so the block never rises more
    /// than the bump distance and always settles exactly where it started.
    pub fn update(&mut self, body: &mut Body, dt: f32) {
        match self.state {
            BumpState::Idle => {
                body.velocity.y = 0.0;
            },
            BumpState::BumpStart => {
                self.rest = body.position;
                self.state = BumpState::BumpingUp;
            },
            BumpState::BumpingUp => {
                let peak = self.rest.y - self.distance;
                body.velocity.y = -self.speed;
                body.position.y = (body.position.y - self.speed * dt).max(peak);
                if body.position.y <= peak {
                    self.state = BumpState::BumpingDown;
                }
            },
            BumpState::BumpingDown => {
                body.velocity.y = self.speed;
                body.position.y = (body.position.y + self.speed * dt).min(self.rest.y);
                if body.position.y >= self.rest.y {
                    body.position = self.rest;
                    body.velocity.y = 0.0;
                    self.state = BumpState::Idle;
                }
            },
        }
        body.sync_bounds();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block() -> Body {
        Body::new(Vec2::new(32.0, 64.0), 16, 16)
    }

    #[test]
    fn idle_holds_still() {
        let mut bump = Bump::new(5.0, 70.0);
        let mut body = block();
        body.velocity.y = 12.0;
        bump.update(&mut body, 0.016);
        assert_eq!(body.velocity.y, 0.0);
        assert_eq!(body.position, Vec2::new(32.0, 64.0));
    }

    #[test]
    fn full_cycle_rises_by_distance_and_returns() {
        let mut bump = Bump::new(5.0, 70.0);
        let mut body = block();
        assert!(bump.trigger());

        bump.update(&mut body, 0.016);
        assert_eq!(bump.state(), BumpState::BumpingUp);
        assert_eq!(body.position.y, 64.0, "start step only records rest");

        let mut highest = body.position.y;
        for _ in 0..100 {
            bump.update(&mut body, 0.016);
            highest = highest.min(body.position.y);
            if bump.is_idle() {
                break;
            }
        }
        assert!(bump.is_idle());
        assert_eq!(highest, 59.0);
        assert_eq!(body.position, Vec2::new(32.0, 64.0));
        assert_eq!(body.velocity.y, 0.0);
        assert_eq!(body.bounds().top(), 64.0);
    }

    #[test]
    fn trigger_is_ignored_mid_bump() {
        let mut bump = Bump::new(5.0, 70.0);
        let mut body = block();
        bump.trigger();
        bump.update(&mut body, 0.016);
        bump.update(&mut body, 0.016);
        assert!(!bump.trigger());
        assert_eq!(bump.state(), BumpState::BumpingUp);
    }

    #[test]
    fn re_entrant_once_idle() {
        let mut bump = Bump::new(5.0, 70.0);
        let mut body = block();
        for _ in 0..2 {
            assert!(bump.trigger());
            for _ in 0..50 {
                bump.update(&mut body, 0.02);
            }
            assert!(bump.is_idle());
            assert_eq!(body.position.y, 64.0);
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn rises_monotonically_then_returns(
                distance in 1.0f32..20.0,
                speed in 40.0f32..200.0,
                dts in prop::collection::vec(0.005f32..0.041, 400),
            ) {
                let mut bump = Bump::new(distance, speed);
                let mut body = block();
                let rest = body.position.y;
                bump.trigger();

                let mut last = rest;
                let mut highest = rest;
                for dt in dts {
                    let rising = matches!(
                        bump.state(),
                        BumpState::BumpStart | BumpState::BumpingUp
                    );
                    bump.update(&mut body, dt);
                    let y = body.position.y;
                    if rising {
                        prop_assert!(y <= last, "moved down while rising");
                    } else {
                        prop_assert!(y >= last, "moved up while returning");
                    }
                    prop_assert!(y >= rest - distance, "overshot the peak");
                    prop_assert!(y <= rest, "sank below rest");
                    highest = highest.min(y);
                    last = y;
                    if bump.is_idle() {
                        break;
                    }
                }
                prop_assert!(bump.is_idle());
                prop_assert_eq!(highest, rest - distance);
                prop_assert_eq!(body.position.y, rest);
                prop_assert_eq!(body.velocity.y, 0.0);
            }
        }
    }
}
