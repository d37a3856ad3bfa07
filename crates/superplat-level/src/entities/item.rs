//! Collectibles: coins and the growth power-up.

use rand::Rng;

use superplat_core::animation::{Animation, AnimationId, AnimationSequencer};
use superplat_core::collision::Axis;
use superplat_core::geometry::Vec2;

use crate::behavior::{Actor, Behavior, Contact, Entity, Kind, Motion, Reaction};
use crate::body::{Body, Facing};
use crate::config::LevelConfig;
use crate::context::TickContext;
use crate::event::LevelEvent;
use crate::score::POWER_UP_SCORE;

const ROTATING: AnimationId = 0;
const SPINNING_UP: AnimationId = 1;
/// How far a coin freed from a block rises before it vanishes.
const FREED_RISE: f32 = 20.0;
const FREED_SPEED: f32 = 100.0;

const POWER_UP_SIZE: u32 = 16;
const POWER_UP_TERMINAL: Vec2 = Vec2::new(70.0, 350.0);
/// Speed of a power-up emerging from a block or dropping from reserve.
const POWER_UP_SPAWN_SPEED: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum CoinState {
    /// Floating in place, waiting for the player.
    Idle,
    /// Knocked out of a block, rising until it disappears.
    Freed {
        start_y: f32,
    },
}

#[derive(Debug, Clone)]
pub struct Coin {
    state: CoinState,
}

fn coin_body(position: Vec2) -> Body {
    let mut body = Body::new(position, 12, 16);
    body.solid = false;
    body.checks_own_collisions = false;
    body
}

fn coin_animations(first: AnimationId) -> AnimationSequencer {
    let frame = Vec2::new(12.0, 16.0);
    let mut animations = AnimationSequencer::new()
        .with(Animation::strip(ROTATING, Vec2::ZERO, frame, 4, 125))
        .with(Animation::strip(SPINNING_UP, Vec2::ZERO, frame, 1, 0));
    animations.play(first).ok();
    animations
}

/// A coin placed in the level, collected on contact with the player.
pub fn coin(position: Vec2) -> Entity {
    let coin = Coin {
        state: CoinState::Idle,
    };
    Entity::new(coin_body(position), coin_animations(ROTATING), coin)
}

/// A coin knocked out of a block. Counted as collected right away; it only
/// rises out of the block and vanishes.
pub fn freed_coin(position: Vec2, ctx: &mut TickContext) -> Entity {
    let mut body = coin_body(position).with_terminal_velocity(Vec2::new(0.0, FREED_SPEED));
    body.velocity.y = -FREED_SPEED;
    body.collidable = false;
    ctx.score.collect_coin();
    ctx.emit(LevelEvent::CoinCollected);
    let state = CoinState::Freed {
        start_y: position.y,
    };
    Entity::new(body, coin_animations(SPINNING_UP), Coin { state })
}

impl Behavior for Coin {
    fn kind(&self) -> Kind {
        Kind::Coin
    }

    fn update(&mut self, actor: Actor<'_>, _ctx: &mut TickContext) -> Motion {
        match self.state {
            CoinState::Idle => Motion::Static,
            CoinState::Freed { start_y } => {
                if (actor.body.position.y - start_y).abs() > FREED_RISE {
                    actor.body.destroy();
                    return Motion::Static;
                }
                Motion::Integrate
            },
        }
    }

    fn on_collision(
        &mut self,
        actor: Actor<'_>,
        contact: &Contact<'_>,
        ctx: &mut TickContext,
    ) -> Option<Reaction> {
        if contact.other_kind == Kind::Player && !actor.body.is_destroyed() {
            ctx.score.collect_coin();
            ctx.emit(LevelEvent::CoinCollected);
            actor.body.destroy();
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PowerUpState {
    /// Rising out of a block.
    Spawning {
        start_y: f32,
    },
    /// Picks a direction and starts walking.
    MoveStart,
    /// Falling straight down from the reserve slot.
    Dropping,
    Moving,
}

/// The growth mushroom.
#[derive(Debug, Clone)]
pub struct PowerUp {
    state: PowerUpState,
}

fn power_up_entity(position: Vec2, state: PowerUpState, config: &LevelConfig) -> Entity {
    let mut body = Body::moving(position, POWER_UP_SIZE, POWER_UP_SIZE, &config.physics)
        .with_padding(Vec2::ZERO)
        .with_terminal_velocity(POWER_UP_TERMINAL);
    body.solid = false;
    body.collidable = false;
    let mut animations = AnimationSequencer::new().with(Animation::strip(
        ROTATING,
        Vec2::ZERO,
        Vec2::new(16.0, 16.0),
        1,
        0,
    ));
    animations.play(ROTATING).ok();
    Entity::new(body, animations, PowerUp { state })
}

/// A power-up emerging from the block at `position`. Awards its points now.
pub fn emerging_power_up(position: Vec2, ctx: &mut TickContext) -> Entity {
    let state = PowerUpState::Spawning {
        start_y: position.y,
    };
    let mut entity = power_up_entity(position, state, &ctx.config);
    entity.body.velocity.y = -POWER_UP_SPAWN_SPEED;
    entity.body.gravity = 0.0;
    ctx.score.add_score(POWER_UP_SCORE);
    entity
}

/// The reserve power-up, falling in at `position`.
pub fn dropped_power_up(position: Vec2, config: &LevelConfig) -> Entity {
    power_up_entity(position, PowerUpState::Dropping, config)
}

impl Behavior for PowerUp {
    fn kind(&self) -> Kind {
        Kind::PowerUp
    }

    fn update(&mut self, actor: Actor<'_>, ctx: &mut TickContext) -> Motion {
        let body = &mut *actor.body;
        match self.state {
            PowerUpState::Spawning { start_y } => {
                body.gravity = 0.0;
                if body.position.y <= start_y - body.height as f32 {
                    self.state = PowerUpState::MoveStart;
                }
            },
            PowerUpState::MoveStart => {
                body.gravity = ctx.gravity();
                body.facing = if ctx.rng.random_bool(0.5) {
                    Facing::Right
                } else {
                    Facing::Left
                };
                body.velocity.x = body.terminal_velocity.x * body.facing.sign();
                body.collidable = true;
                self.state = PowerUpState::Moving;
            },
            PowerUpState::Dropping => {
                body.velocity = Vec2::new(0.0, POWER_UP_SPAWN_SPEED);
                body.gravity = 0.0;
                body.collidable = true;
                if body.grounded {
                    self.state = PowerUpState::Moving;
                }
            },
            PowerUpState::Moving => {
                body.velocity.x = body.terminal_velocity.x * body.facing.sign();
                body.gravity = ctx.gravity();
            },
        }
        Motion::Integrate
    }

    fn on_collision(
        &mut self,
        mut actor: Actor<'_>,
        contact: &Contact<'_>,
        ctx: &mut TickContext,
    ) -> Option<Reaction> {
        if contact.other_kind == Kind::Player {
            if actor.body.is_destroyed() {
                return None;
            }
            actor.body.solid = false;
            actor.body.destroy();
            ctx.score.add_score(POWER_UP_SCORE);
            return Some(Reaction::Grow);
        }
        if contact.other_kind.is_enemy() {
            return None;
        }
        actor.resolve(contact);
        if contact.other.solid && contact.axis == Axis::X {
            actor.body.turn_around();
            self.state = PowerUpState::Moving;
        }
        None
    }
}
