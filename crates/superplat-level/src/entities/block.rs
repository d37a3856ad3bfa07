//! Blocks the player can hit from below.

use superplat_core::animation::{Animation, AnimationId, AnimationSequencer};
use superplat_core::collision::{Axis, Side};
use superplat_core::geometry::Vec2;

use crate::behavior::{Actor, Behavior, Contact, Entity, Kind, Motion, Reaction};
use crate::body::Body;
use crate::bump::Bump;
use crate::config::LevelConfig;
use crate::context::TickContext;
use crate::entities::item;

const FULL: AnimationId = 0;
const USED: AnimationId = 1;

fn block_body(position: Vec2, size: u32) -> Body {
    let mut body = Body::new(position, size, size);
    body.checks_own_collisions = false;
    body
}

/// The player's head struck the block's underside.
fn hit_from_below(contact: &Contact<'_>) -> bool {
    contact.other_kind == Kind::Player && contact.side == Side::Bottom && contact.axis == Axis::Y
}

/// Block that pays out one coin per hit and bumps up while doing so.
#[derive(Debug, Clone)]
pub struct CoinBlock {
    coins: u32,
    bump: Bump,
}

pub fn coin_block(position: Vec2, size: u32, coins: u32, config: &LevelConfig) -> Entity {
    let frame = Vec2::splat(size as f32);
    let mut animations = AnimationSequencer::new()
        .with(Animation::strip(FULL, Vec2::new(0.0, 16.0), frame, 1, 125))
        .with(Animation::strip(USED, Vec2::new(64.0, 0.0), frame, 1, 50));
    animations.play(FULL).ok();
    let behavior = CoinBlock {
        coins,
        bump: Bump::new(config.bump_distance, config.bump_speed),
    };
    Entity::new(block_body(position, size), animations, behavior)
}

impl Behavior for CoinBlock {
    fn kind(&self) -> Kind {
        Kind::Block
    }

    fn update(&mut self, mut actor: Actor<'_>, ctx: &mut TickContext) -> Motion {
        if self.coins == 0 {
            actor.play(USED);
        }
        self.bump.update(actor.body, ctx.dt);
        Motion::Static
    }

    fn on_collision(
        &mut self,
        actor: Actor<'_>,
        contact: &Contact<'_>,
        ctx: &mut TickContext,
    ) -> Option<Reaction> {
        if hit_from_below(contact) && self.coins > 0 {
            self.coins -= 1;
            let body = &*actor.body;
            let above = body.position.y - (body.height / 2) as f32;
            let at = Vec2::new(body.position.x + 2.0, above);
            let coin = item::freed_coin(at, ctx);
            ctx.spawn(coin);
            self.bump.trigger();
            tracing::debug!(left = self.coins, "coin block hit");
        }
        None
    }
}

/// Block holding a single power-up.
#[derive(Debug, Clone)]
pub struct GiftBlock {
    has_item: bool,
}

pub fn gift_block(position: Vec2, size: u32) -> Entity {
    let frame = Vec2::splat(size as f32);
    let mut animations = AnimationSequencer::new()
        .with(Animation::strip(FULL, Vec2::ZERO, frame, 4, 150))
        .with(Animation::strip(USED, Vec2::new(64.0, 0.0), frame, 1, 50));
    animations.play(FULL).ok();
    let block = GiftBlock { has_item: true };
    Entity::new(block_body(position, size), animations, block)
}

impl Behavior for GiftBlock {
    fn kind(&self) -> Kind {
        Kind::Block
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
        if hit_from_below(contact) && self.has_item {
            self.has_item = false;
            let power_up = item::emerging_power_up(actor.body.position, ctx);
            ctx.spawn(power_up);
            actor.play(USED);
        }
        None
    }
}
