use serde::{Deserialize, Serialize};

use superplat_core::collision::Side;
use superplat_core::geometry::{Rect, Vec2};

use crate::config::PhysicsConfig;

/// Horizontal facing of a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn flipped(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// -1 for left, +1 for right.
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Physical state shared by every object in a level.
///
/// Tiles, blocks, enemies, items and the player all carry one of these; what
/// differs between them lives in their behavior, never in the record itself.
/// `bounds` is derived from position, size and padding and is only refreshed by
/// [`Body::sync_bounds`]; every mutator that moves the body resyncs it.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub width: u32,
    pub height: u32,
    pub padding: Vec2,
    bounds: Rect,
    previous_bounds: Rect,
    pub velocity: Vec2,
    pub gravity: f32,
    pub terminal_velocity: Vec2,
    pub jump_impulse: f32,
    pub collidable: bool,
    pub solid: bool,
    /// Whether integrating this body runs broad-phase tests for it.
    pub checks_own_collisions: bool,
    pub grounded: bool,
    pub invulnerable: bool,
    pub facing: Facing,
    destroyed: bool,
}

impl Body {
    /// A static, solid, collidable body with no padding and no gravity.
    pub fn new(position: Vec2, width: u32, height: u32) -> Self {
        let bounds = Rect::inset(position, width, height, Vec2::ZERO);
        Self {
            position,
            width,
            height,
            padding: Vec2::ZERO,
            bounds,
            previous_bounds: bounds,
            velocity: Vec2::ZERO,
            gravity: 0.0,
            terminal_velocity: Vec2::ZERO,
            jump_impulse: 0.0,
            collidable: true,
            solid: true,
            checks_own_collisions: true,
            grounded: false,
            invulnerable: false,
            facing: Facing::Right,
            destroyed: false,
        }
    }

    /// A body that falls and moves under `physics` defaults, padded by one unit.
    pub fn moving(position: Vec2, width: u32, height: u32, physics: &PhysicsConfig) -> Self {
        Self {
            gravity: physics.gravity,
            terminal_velocity: physics.terminal_velocity,
            jump_impulse: physics.jump_impulse,
            ..Self::new(position, width, height)
        }
        .with_padding(Vec2::new(1.0, 1.0))
    }

    pub fn with_padding(mut self, padding: Vec2) -> Self {
        self.padding = padding;
        self.sync_bounds();
        self.snapshot_bounds();
        self
    }

    pub fn with_terminal_velocity(mut self, terminal_velocity: Vec2) -> Self {
        self.terminal_velocity = terminal_velocity;
        self
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Bounds as they were at the start of the current integration step.
    pub fn previous_bounds(&self) -> Rect {
        self.previous_bounds
    }

    /// Recompute `bounds` from position, size and padding.
    pub fn sync_bounds(&mut self) {
        self.bounds = Rect::inset(self.position, self.width, self.height, self.padding);
    }

    pub fn snapshot_bounds(&mut self) {
        self.previous_bounds = self.bounds;
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.sync_bounds();
    }

    /// Change size keeping the bottom edge where it is.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.position.y += self.height as f32 - height as f32;
        self.width = width;
        self.height = height;
        self.sync_bounds();
    }

    /// Default response to a contact: push out of solid bodies along `side`.
    ///
    /// `side` is the side of this body that touched `other`. A bottom contact
    /// lands the body.
    pub fn resolve_collision(&mut self, other_solid: bool, penetration: f32, side: Side) {
        if !other_solid {
            return;
        }
        match side {
            Side::Top => {
                self.position.y += penetration;
                self.velocity.y = 0.0;
            },
            Side::Right => {
                self.position.x -= penetration;
                self.velocity.x = 0.0;
            },
            Side::Bottom => {
                self.position.y -= penetration;
                self.velocity.y = 0.0;
                self.grounded = true;
            },
            Side::Left => {
                self.position.x += penetration;
                self.velocity.x = 0.0;
            },
        }
        self.sync_bounds();
    }

    pub fn jump(&mut self) {
        self.velocity.y = -self.jump_impulse;
        self.grounded = false;
    }

    pub fn turn_around(&mut self) {
        self.facing = self.facing.flipped();
        self.velocity.x = -self.velocity.x;
    }

    /// Flag for removal at the end of the tick. Also stops the body taking part
    /// in any further broad-phase tests this tick.
    pub fn destroy(&mut self) {
        self.destroyed = true;
        self.collidable = false;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}
