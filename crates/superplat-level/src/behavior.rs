use std::fmt;

use serde::{Deserialize, Serialize};

use superplat_core::animation::{AnimationId, AnimationSequencer};
use superplat_core::collision::{Axis, Side};
use superplat_core::geometry::{Rect, Vec2};

use crate::body::Body;
use crate::context::TickContext;

/// Coarse entity category, visible to the other side of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    Tile,
    Platform,
    Player,
    Enemy,
    /// The kickable shell; also an enemy.
    Shell,
    PowerUp,
    Coin,
    Block,
    Finish,
}

impl Kind {
    pub fn is_enemy(self) -> bool {
        matches!(self, Kind::Enemy | Kind::Shell)
    }
}

/// Whether the level should integrate a body after its update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Integrate,
    Static,
}

/// Effect a handler asks the dispatcher to apply to the other participant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reaction {
    /// Rebound off a stomped enemy.
    Bounce,
    /// Touched something harmful.
    Hurt,
    Kill {
        by: Kind,
    },
    /// Collected a power-up.
    Grow,
    /// Reached the finish line.
    Celebrate,
    Respawn {
        at: Vec2,
    },
}

/// One side of a positive collision test, as seen by the receiver.
#[derive(Debug, Clone, Copy)]
pub struct Contact<'a> {
    pub other: &'a Body,
    pub other_kind: Kind,
    pub penetration: f32,
    /// Side of the receiver that was touched.
    pub side: Side,
    pub axis: Axis,
    /// The other participant's bounds before its current step.
    pub from_bounds: Rect,
}

/// Mutable parts of an entity a behavior may touch.
pub struct Actor<'a> {
    pub body: &'a mut Body,
    pub animations: &'a mut AnimationSequencer,
}

impl Actor<'_> {
    /// Loop an animation. Unknown ids are already logged by the sequencer.
    pub fn play(&mut self, id: AnimationId) {
        self.animations.play(id).ok();
    }

    pub fn play_once(&mut self, id: AnimationId) {
        self.animations.play_once(id).ok();
    }

    /// Default response: push out of solid bodies.
    pub fn resolve(&mut self, contact: &Contact<'_>) {
        self.body
            .resolve_collision(contact.other.solid, contact.penetration, contact.side);
    }
}

/// Per-variant logic layered over the shared [`Body`] record.
///
/// The level calls `update`, integrates the body if asked to, then calls
/// `after_physics`. Collision callbacks arrive in between, during integration
/// of this or another body.
pub trait Behavior: fmt::Debug {
    fn kind(&self) -> Kind;

    /// Whether the entity should be drawn this tick.
    fn is_visible(&self) -> bool {
        true
    }

    fn update(&mut self, actor: Actor<'_>, ctx: &mut TickContext) -> Motion;

    fn after_physics(&mut self, _actor: Actor<'_>, _ctx: &mut TickContext) {}

    /// Called once per positive test involving this entity. The returned
    /// reaction is applied to the other participant right away.
    fn on_collision(
        &mut self,
        mut actor: Actor<'_>,
        contact: &Contact<'_>,
        _ctx: &mut TickContext,
    ) -> Option<Reaction> {
        actor.resolve(contact);
        None
    }

    fn react(&mut self, _actor: Actor<'_>, _reaction: Reaction, _ctx: &mut TickContext) {}
}

/// A level object: body, sprite animation state and variant behavior.
#[derive(Debug)]
pub struct Entity {
    pub body: Body,
    pub animations: AnimationSequencer,
    behavior: Box<dyn Behavior>,
}

impl Entity {
    pub fn new(
        body: Body,
        animations: AnimationSequencer,
        behavior: impl Behavior + 'static,
    ) -> Self {
        Self {
            body,
            animations,
            behavior: Box::new(behavior),
        }
    }

    pub fn kind(&self) -> Kind {
        self.behavior.kind()
    }

    pub fn is_visible(&self) -> bool {
        self.behavior.is_visible()
    }

    /// Borrow the behavior alongside the state it drives.
    pub fn split(&mut self) -> (&mut dyn Behavior, Actor<'_>) {
        (
            self.behavior.as_mut(),
            Actor {
                body: &mut self.body,
                animations: &mut self.animations,
            },
        )
    }
}
