use superplat_core::animation::{Animation, AnimationId, AnimationSequencer};
use superplat_core::geometry::Vec2;

use crate::behavior::{Actor, Behavior, Contact, Entity, Kind, Motion, Reaction};
use crate::body::Body;
use crate::context::TickContext;
use crate::event::LevelEvent;

const OPEN: AnimationId = 0;
const CLOSED: AnimationId = 1;

/// Goal post. Closes the first time the player passes through it.
#[derive(Debug, Clone, Default)]
pub struct FinishLine {
    closed: bool,
}

pub fn finish_line(position: Vec2) -> Entity {
    let mut body = Body::new(position, 32, 64).with_padding(Vec2::new(8.0, 3.0));
    body.solid = false;
    body.checks_own_collisions = false;
    let frame = Vec2::new(32.0, 64.0);
    let mut animations = AnimationSequencer::new()
        .with(Animation::strip(OPEN, Vec2::ZERO, frame, 4, 150))
        .with(Animation::strip(CLOSED, Vec2::Y * 64.0, frame, 4, 150));
    animations.play(OPEN).ok();
    Entity::new(body, animations, FinishLine::default())
}

impl FinishLine {
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Behavior for FinishLine {
    fn kind(&self) -> Kind {
        Kind::Finish
    }

    fn update(&mut self, _actor: Actor<'_>, _ctx: &mut TickContext) -> Motion {
        Motion::Static
    }

    fn on_collision(
        &mut self,
        mut actor: Actor<'_>,
        contact: &Contact<'_>,
        ctx: &mut TickContext,
    ) -> Option<Reaction> {
        if contact.other_kind != Kind::Player || self.closed {
            return None;
        }
        self.closed = true;
        actor.play(CLOSED);
        tracing::info!("finish line reached");
        ctx.emit(LevelEvent::LevelClosed);
        None
    }
}
