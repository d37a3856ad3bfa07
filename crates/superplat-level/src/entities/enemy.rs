//! Hostile entities: walkers, the kickable shell, the biting flower and the
//! plunger that rises out of pipes.

use superplat_core::animation::{Animation, AnimationId, AnimationSequencer};
use superplat_core::collision::{Axis, Side};
use superplat_core::geometry::Vec2;
use superplat_core::timer::Timer;

use crate::behavior::{Actor, Behavior, Contact, Entity, Kind, Motion, Reaction};
use crate::body::{Body, Facing};
use crate::config::LevelConfig;
use crate::context::TickContext;

const WALKER_TERMINAL: Vec2 = Vec2::new(70.0, 350.0);
const SHELL_TERMINAL: Vec2 = Vec2::new(110.0, 150.0);
/// Plunger turn period in milliseconds.
const PLUNGER_TURN_MS: u32 = 2250;
/// Plunger spawn offset above the pipe it lives in.
const PLUNGER_RISE: f32 = 20.0;

const WALKING: AnimationId = 0;
const TURNING: AnimationId = 1;
const DEATH: AnimationId = 2;
const SHELL_IDLE: AnimationId = 0;
const SHELL_MOVING: AnimationId = 1;
const BITING: AnimationId = 0;

/// Whether `contact` is a stomp: the other body came down onto this one's
/// top edge from above during the Y pass.
fn stomped(actor: &Actor<'_>, contact: &Contact<'_>) -> bool {
    contact.side == Side::Top
        && contact.axis == Axis::Y
        && contact.from_bounds.bottom() <= actor.body.bounds().top()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkerKind {
    /// Leaves a shell behind when stomped.
    Chicken,
    /// Flattens when stomped.
    Gum,
}

/// Ground enemy that walks until it meets something solid, then turns.
#[derive(Debug, Clone)]
pub struct Walker {
    variant: WalkerKind,
    allow_movement: bool,
    dead: bool,
    remove: Timer,
}

pub fn chicken(position: Vec2, config: &LevelConfig) -> Entity {
    let body = Body::moving(position, 16, 27, &config.physics)
        .with_padding(Vec2::new(1.0, 10.0))
        .with_terminal_velocity(WALKER_TERMINAL);
    let frame = Vec2::new(16.0, 27.0);
    let squashed = Vec2::new(16.0, 15.0);
    let mut animations = AnimationSequencer::new()
        .with(Animation::strip(WALKING, Vec2::X * 16.0, frame, 2, 150))
        .with(Animation::strip(TURNING, Vec2::ZERO, frame, 1, 175))
        .with(Animation::strip(DEATH, Vec2::X * 48.0, squashed, 1, 175));
    animations.play(WALKING).ok();
    Entity::new(body, animations, Walker::new(WalkerKind::Chicken, config))
}

pub fn gum(position: Vec2, config: &LevelConfig) -> Entity {
    let body = Body::moving(position, 16, 16, &config.physics)
        .with_padding(Vec2::new(0.0, 1.0))
        .with_terminal_velocity(WALKER_TERMINAL);
    let frame = Vec2::new(16.0, 16.0);
    let squashed = Vec2::new(17.0, 8.0);
    let squashed_at = Vec2::new(32.0, 8.0);
    let mut animations = AnimationSequencer::new()
        .with(Animation::strip(WALKING, Vec2::ZERO, frame, 2, 150))
        .with(Animation::strip(DEATH, squashed_at, squashed, 1, 175));
    animations.play(WALKING).ok();
    Entity::new(body, animations, Walker::new(WalkerKind::Gum, config))
}

impl Walker {
    fn new(variant: WalkerKind, config: &LevelConfig) -> Self {
        Self {
            variant,
            allow_movement: true,
            dead: false,
            remove: Timer::new(config.enemy_remove_delay_ms),
        }
    }

    fn turn(&mut self, actor: &mut Actor<'_>) {
        actor.body.turn_around();
        if self.variant == WalkerKind::Chicken {
            actor.play_once(TURNING);
        }
    }

    fn die(&mut self, actor: &mut Actor<'_>, by: Kind, ctx: &mut TickContext) {
        if self.dead {
            return;
        }
        self.dead = true;
        self.remove.start();
        tracing::debug!(variant = ?self.variant, ?by, "enemy killed");

        let body = &mut *actor.body;
        body.solid = false;
        body.collidable = false;
        match self.variant {
            WalkerKind::Chicken => {
                if by != Kind::Shell {
                    let at = Vec2::new(body.position.x, body.position.y + 11.0);
                    ctx.spawn(shell(at, &ctx.config));
                }
                body.jump();
                body.resize(15, 16);
            },
            WalkerKind::Gum => {
                let width = body.width;
                body.resize(width, 8);
                body.gravity = 0.0;
                body.velocity = Vec2::ZERO;
                self.allow_movement = false;
            },
        }
        actor.play(DEATH);
        actor.animations.lock();
    }
}

impl Behavior for Walker {
    fn kind(&self) -> Kind {
        Kind::Enemy
    }

    fn update(&mut self, actor: Actor<'_>, ctx: &mut TickContext) -> Motion {
        if self.remove.update(ctx.dt) {
            actor.body.destroy();
            return Motion::Static;
        }
        actor.body.velocity.x = if self.allow_movement {
            actor.body.terminal_velocity.x * actor.body.facing.sign()
        } else {
            0.0
        };
        Motion::Integrate
    }

    fn on_collision(
        &mut self,
        mut actor: Actor<'_>,
        contact: &Contact<'_>,
        ctx: &mut TickContext,
    ) -> Option<Reaction> {
        let mut reaction = None;
        if contact.other_kind == Kind::Player {
            if stomped(&actor, contact) && !contact.other.invulnerable {
                self.die(&mut actor, Kind::Player, ctx);
                return Some(Reaction::Bounce);
            }
            if actor.body.solid {
                reaction = Some(Reaction::Hurt);
            }
        } else if contact.other.solid && contact.axis == Axis::X {
            self.turn(&mut actor);
        }

        if contact.other_kind != Kind::PowerUp && !self.dead {
            actor.resolve(contact);
        }
        reaction
    }

    fn react(&mut self, mut actor: Actor<'_>, reaction: Reaction, ctx: &mut TickContext) {
        if let Reaction::Kill { by } = reaction {
            self.die(&mut actor, by, ctx);
        }
    }
}

/// Shell left by a stomped chicken. Kicked by the player, it slides and
/// takes out other enemies in its way.
#[derive(Debug, Clone, Default)]
pub struct Shell {
    moving: bool,
}

pub fn shell(position: Vec2, config: &LevelConfig) -> Entity {
    let mut body = Body::moving(position, 16, 16, &config.physics)
        .with_padding(Vec2::new(0.0, 1.0))
        .with_terminal_velocity(SHELL_TERMINAL);
    body.invulnerable = true;
    let frame = Vec2::new(16.0, 16.0);
    let mut animations = AnimationSequencer::new()
        .with(Animation::strip(SHELL_IDLE, Vec2::ZERO, frame, 1, 85))
        .with(Animation::strip(SHELL_MOVING, Vec2::ZERO, frame, 4, 85));
    animations.play(SHELL_IDLE).ok();
    Entity::new(body, animations, Shell::default())
}

impl Behavior for Shell {
    fn kind(&self) -> Kind {
        Kind::Shell
    }

    fn update(&mut self, mut actor: Actor<'_>, _ctx: &mut TickContext) -> Motion {
        actor.body.velocity.x = if self.moving {
            actor.body.terminal_velocity.x * actor.body.facing.sign()
        } else {
            0.0
        };
        actor.play(if self.moving { SHELL_MOVING } else { SHELL_IDLE });
        Motion::Integrate
    }

    fn on_collision(
        &mut self,
        mut actor: Actor<'_>,
        contact: &Contact<'_>,
        _ctx: &mut TickContext,
    ) -> Option<Reaction> {
        if contact.other_kind == Kind::Player {
            let vulnerable = !contact.other.invulnerable;
            if stomped(&actor, contact) && vulnerable {
                self.moving = !self.moving;
                actor.body.turn_around();
                return Some(Reaction::Bounce);
            }
            if actor.body.velocity.x.abs() > 0.0 && vulnerable {
                return Some(Reaction::Hurt);
            }
            if actor.body.velocity.x as i32 == 0 && contact.axis == Axis::X {
                // Kicked: slide away from the player.
                self.moving = true;
                actor.body.facing = if contact.other.position.x < actor.body.position.x {
                    Facing::Right
                } else {
                    Facing::Left
                };
            }
            return None;
        }

        actor.resolve(contact);
        if contact.axis == Axis::X && contact.other.solid {
            if contact.other_kind == Kind::Enemy && self.moving {
                if !contact.other.invulnerable {
                    return Some(Reaction::Kill { by: Kind::Shell });
                }
                actor.body.turn_around();
            } else {
                actor.body.turn_around();
            }
        }
        None
    }
}

/// Stationary biting plant. Cannot be killed.
#[derive(Debug, Clone, Default)]
pub struct Biter;

pub fn biter(position: Vec2) -> Entity {
    let mut body = Body::new(position, 16, 16);
    body.invulnerable = true;
    let mut animations = AnimationSequencer::new().with(Animation::strip(
        BITING,
        Vec2::ZERO,
        Vec2::new(16.0, 16.0),
        2,
        150,
    ));
    animations.play(BITING).ok();
    Entity::new(body, animations, Biter)
}

impl Behavior for Biter {
    fn kind(&self) -> Kind {
        Kind::Enemy
    }

    fn update(&mut self, _actor: Actor<'_>, _ctx: &mut TickContext) -> Motion {
        Motion::Static
    }

    fn on_collision(
        &mut self,
        _actor: Actor<'_>,
        contact: &Contact<'_>,
        _ctx: &mut TickContext,
    ) -> Option<Reaction> {
        (contact.other_kind == Kind::Player).then_some(Reaction::Hurt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Travel {
    Down,
    Up,
}

/// Pipe plant that sinks into its pipe and rises again on a fixed period.
///
/// The body's height tracks the part still above the pipe, so a fully sunk
/// plunger has no hitbox left.
#[derive(Debug, Clone)]
pub struct Plunger {
    spawn: Vec2,
    start_height: u32,
    travel: Travel,
    turn: Timer,
}

/// A plunger living in the pipe tile whose top-left corner is `pipe`.
pub fn plunger(pipe: Vec2) -> Entity {
    let spawn = Vec2::new(pipe.x, pipe.y - PLUNGER_RISE);
    let mut body = Body::new(spawn, 16, 21).with_padding(Vec2::new(3.0, 3.0));
    body.solid = false;
    body.checks_own_collisions = false;
    body.invulnerable = true;
    let mut animations = AnimationSequencer::new().with(Animation::strip(
        BITING,
        Vec2::ZERO,
        Vec2::new(16.0, 21.0),
        2,
        150,
    ));
    animations.play(BITING).ok();
    let behavior = Plunger {
        spawn,
        start_height: 21,
        travel: Travel::Down,
        turn: Timer::started(PLUNGER_TURN_MS),
    };
    Entity::new(body, animations, behavior)
}

impl Behavior for Plunger {
    fn kind(&self) -> Kind {
        Kind::Enemy
    }

    fn update(&mut self, actor: Actor<'_>, ctx: &mut TickContext) -> Motion {
        if self.turn.update(ctx.dt) {
            self.travel = match self.travel {
                Travel::Down => Travel::Up,
                Travel::Up => Travel::Down,
            };
            self.turn.start();
        }

        let start_height = self.start_height as f32;
        let step = start_height * ctx.dt;
        let body = &mut *actor.body;
        let mut y = body.position.y;
        match self.travel {
            Travel::Up => y = (y - step).max(self.spawn.y),
            Travel::Down => y = (y + step).min(self.spawn.y + start_height),
        }
        body.height = (start_height - (y - self.spawn.y)).round().max(0.0) as u32;
        body.snapshot_bounds();
        body.set_position(Vec2::new(body.position.x, y));
        Motion::Static
    }

    fn on_collision(
        &mut self,
        _actor: Actor<'_>,
        contact: &Contact<'_>,
        _ctx: &mut TickContext,
    ) -> Option<Reaction> {
        (contact.other_kind == Kind::Player).then_some(Reaction::Hurt)
    }

    fn react(&mut self, actor: Actor<'_>, reaction: Reaction, _ctx: &mut TickContext) {
        if reaction == (Reaction::Kill { by: Kind::Shell }) {
            actor.body.destroy();
        }
    }
}
