use serde::{Deserialize, Serialize};

use superplat_core::collision::Axis;
use superplat_core::geometry::{Rect, Vec2};

use crate::behavior::Kind;
use crate::body::Body;

/// Which edge of a run of ground a tile sits on; only affects sprite choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Corner {
    #[default]
    None,
    Left,
    Right,
}

/// Static geometry variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    /// Blocks from every side.
    Solid,
    /// One-way: walkable from above, passable from below, and optionally
    /// blocking horizontally at its left or right edge.
    Platform {
        collide_left: bool,
        collide_right: bool,
    },
}

/// A piece of level geometry. Tiles never move and never check their own
/// collisions; they only show up as candidates for moving bodies.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub body: Body,
    pub kind: TileKind,
    pub corner: Corner,
}

impl Tile {
    pub fn new(position: Vec2, size: u32, kind: TileKind, collidable: bool) -> Self {
        let mut body = Body::new(position, size, size);
        body.collidable = collidable;
        body.checks_own_collisions = false;
        Self {
            body,
            kind,
            corner: Corner::None,
        }
    }

    pub fn solid(position: Vec2, size: u32) -> Self {
        Self::new(position, size, TileKind::Solid, true)
    }

    pub fn platform(position: Vec2, size: u32, collide_left: bool, collide_right: bool) -> Self {
        Self::new(
            position,
            size,
            TileKind::Platform {
                collide_left,
                collide_right,
            },
            true,
        )
    }

    pub fn with_corner(mut self, corner: Corner) -> Self {
        self.corner = corner;
        self
    }

    pub fn entity_kind(&self) -> Kind {
        match self.kind {
            TileKind::Solid => Kind::Tile,
            TileKind::Platform { .. } => Kind::Platform,
        }
    }

    /// Whether `mover` can hit this tile on `axis`.
    pub fn is_collidable(&self, mover: &Body, axis: Axis) -> bool {
        match self.kind {
            TileKind::Solid => self.body.collidable,
            TileKind::Platform {
                collide_left,
                collide_right,
            } => {
                self.body.collidable
                    && platform_blocks(
                        &self.body.bounds(),
                        &mover.previous_bounds(),
                        axis,
                        collide_left,
                        collide_right,
                    )
            },
        }
    }
}

/// One-way platform rule.
///
/// Judged on where the mover was before this step (`from`), never where it is
/// now: current bounds already include the motion being tested.
pub fn platform_blocks(
    platform: &Rect,
    from: &Rect,
    axis: Axis,
    collide_left: bool,
    collide_right: bool,
) -> bool {
    match axis {
        Axis::Y => from.bottom() <= platform.top(),
        Axis::X => {
            let above_base = from.bottom() <= platform.bottom();
            let from_left = collide_left && from.right() <= platform.left() && above_base;
            let from_right = collide_right && from.left() >= platform.right() && above_base;
            from_left || from_right
        },
    }
}
