use serde::{Deserialize, Serialize};

use superplat_core::animation::{Animation, AnimationId, AnimationSequencer};
use superplat_core::geometry::Vec2;
use superplat_core::timer::Timer;

use crate::behavior::{Actor, Behavior, Entity, Kind, Motion, Reaction};
use crate::body::{Body, Facing};
use crate::config::LevelConfig;
use crate::context::TickContext;
use crate::event::{LevelEvent, SizeState};

pub const SMALL_SIZE: (u32, u32) = (16, 22);
pub const BIG_SIZE: (u32, u32) = (16, 32);
pub const SMALL_JUMP_IMPULSE: f32 = 270.0;
pub const BIG_JUMP_IMPULSE: f32 = 290.0;
pub const ACCELERATION: f32 = 290.0;
/// Horizontal speeds at or below this snap to zero while coasting.
const STOP_SPEED: f32 = 6.0;
const FLICKER_MS: u32 = 80;
const FLICKER_COUNT: u32 = 16;
const PEACE_SMALL: (u32, u32) = (16, 21);
const PEACE_BIG: (u32, u32) = (16, 28);

/// Input from the player for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput {
    /// -1.0 (left) to 1.0 (right).
    pub move_dir: f32,
    /// Jump pressed this tick.
    pub jump: bool,
    pub look_up: bool,
    pub duck: bool,
}

impl PlayerInput {
    /// Clamp `move_dir` into range; NaN counts as no movement.
    pub fn sanitized(self) -> Self {
        let move_dir = if self.move_dir.is_nan() {
            0.0
        } else {
            self.move_dir.clamp(-1.0, 1.0)
        };
        Self { move_dir, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pose {
    LookUp = 0,
    Idle = 1,
    Walk = 2,
    Duck = 3,
    Jump = 4,
    Fall = 5,
    Peace = 6,
}

const POSES: u32 = 7;
const DEATH: AnimationId = 2 * POSES;

fn pose_id(pose: Pose, size: SizeState) -> AnimationId {
    match size {
        SizeState::Small => pose as AnimationId,
        SizeState::Big => pose as AnimationId + POSES,
    }
}

fn animations() -> AnimationSequencer {
    let small = Vec2::new(16.0, 22.0);
    let big = Vec2::new(16.0, 32.0);
    let peace_small = Vec2::new(16.0, 21.0);
    let peace_big = Vec2::new(16.0, 28.0);
    let s = |pose| pose_id(pose, SizeState::Small);
    let b = |pose| pose_id(pose, SizeState::Big);
    // (id, sheet origin, frame size, frames, ms per frame)
    let strips = [
        (s(Pose::LookUp), Vec2::new(114.0, 10.0), small, 1, 50),
        (s(Pose::Idle), Vec2::new(0.0, 10.0), small, 1, 50),
        (s(Pose::Walk), Vec2::new(0.0, 10.0), small, 2, 110),
        (s(Pose::Duck), Vec2::new(96.0, 10.0), small, 1, 175),
        (s(Pose::Jump), Vec2::new(64.0, 10.0), small, 1, 175),
        (s(Pose::Fall), Vec2::new(80.0, 10.0), small, 1, 175),
        (s(Pose::Peace), Vec2::new(162.0, 10.0), peace_small, 1, 0),
        (b(Pose::LookUp), Vec2::new(145.0, 32.0), big, 1, 50),
        (b(Pose::Idle), Vec2::new(0.0, 32.0), big, 1, 175),
        (b(Pose::Walk), Vec2::new(0.0, 32.0), big, 2, 110),
        (b(Pose::Duck), Vec2::new(128.0, 32.0), big, 1, 175),
        (b(Pose::Jump), Vec2::new(96.0, 32.0), big, 1, 175),
        (b(Pose::Fall), Vec2::new(112.0, 32.0), big, 1, 175),
        (b(Pose::Peace), Vec2::new(162.0, 36.0), peace_big, 1, 0),
        (DEATH, Vec2::new(131.0, 8.0), Vec2::new(15.0, 24.0), 2, 135),
    ];
    strips
        .into_iter()
        .fold(AnimationSequencer::new(), |animations, (id, origin, frame, frames, ms)| {
            animations.with(Animation::strip(id, origin, frame, frames, ms))
        })
}

/// The player character.
#[derive(Debug, Clone)]
pub struct Player {
    size: SizeState,
    lives: u32,
    input_enabled: bool,
    allow_walking: bool,
    friction: f32,
    flicker: Timer,
    flickers: u32,
    visible: bool,
}

/// Build the player entity, small and facing right, at `position`.
pub fn player(position: Vec2, config: &LevelConfig) -> Entity {
    let (width, height) = SMALL_SIZE;
    let mut body = Body::moving(position, width, height, &config.physics)
        .with_padding(Vec2::new(3.0, 3.0))
        .with_terminal_velocity(Vec2::new(150.0, 350.0));
    body.jump_impulse = SMALL_JUMP_IMPULSE;

    let mut animations = animations();
    animations.play(pose_id(Pose::Idle, SizeState::Small)).ok();

    let behavior = Player {
        size: SizeState::Small,
        lives: config.player_lives,
        input_enabled: true,
        allow_walking: true,
        friction: config.physics.friction,
        flicker: Timer::new(FLICKER_MS),
        flickers: 0,
        visible: true,
    };
    Entity::new(body, animations, behavior)
}

impl Player {
    fn pose(&self, actor: &mut Actor<'_>, pose: Pose) {
        actor.play(pose_id(pose, self.size));
    }

    fn control(&mut self, actor: &mut Actor<'_>, input: PlayerInput, dt: f32) {
        let body = &mut *actor.body;
        if input.jump && body.grounded {
            body.jump();
        }

        let steering = input.move_dir != 0.0;
        if self.allow_walking && !input.look_up && steering {
            body.facing = if input.move_dir < 0.0 {
                Facing::Left
            } else {
                Facing::Right
            };
            body.velocity.x += ACCELERATION * input.move_dir * dt;
        }

        if !self.allow_walking || !steering {
            body.velocity.x *= self.friction.powf(dt);
            if body.velocity.x.abs() <= STOP_SPEED {
                body.velocity.x = 0.0;
            }
        }

        let grounded = body.grounded;
        let rising = body.velocity.y < 0.0;
        if input.look_up && grounded {
            self.allow_walking = false;
            self.pose(actor, Pose::LookUp);
        }
        if !grounded {
            self.pose(actor, if rising { Pose::Jump } else { Pose::Fall });
        }
        if input.duck && grounded {
            self.allow_walking = false;
            self.pose(actor, Pose::Duck);
        }
        self.allow_walking = !input.duck && !input.look_up;
    }

    fn set_size(&mut self, actor: &mut Actor<'_>, size: SizeState, ctx: &mut TickContext) {
        self.size = size;
        let ((width, height), impulse) = match size {
            SizeState::Small => (SMALL_SIZE, SMALL_JUMP_IMPULSE),
            SizeState::Big => (BIG_SIZE, BIG_JUMP_IMPULSE),
        };
        actor.body.resize(width, height);
        actor.body.jump_impulse = impulse;
        ctx.emit(LevelEvent::SizeChanged(size));
        self.flicker.reset();
        self.flickers = 0;
        self.flicker.start();
    }

    fn grow(&mut self, actor: &mut Actor<'_>, ctx: &mut TickContext) {
        tracing::debug!("player grows");
        self.set_size(actor, SizeState::Big, ctx);
    }

    fn shrink(&mut self, actor: &mut Actor<'_>, ctx: &mut TickContext) {
        tracing::debug!("player shrinks");
        actor.body.invulnerable = true;
        actor.body.solid = false;
        self.set_size(actor, SizeState::Small, ctx);
    }

    fn die(&mut self, actor: &mut Actor<'_>, ctx: &mut TickContext) {
        let body = &mut *actor.body;
        body.velocity = Vec2::ZERO;
        body.collidable = false;
        body.solid = false;
        body.invulnerable = true;
        let (width, height) = SMALL_SIZE;
        body.resize(width, height);
        body.jump();

        self.lives = self.lives.saturating_sub(1);
        self.input_enabled = false;
        actor.animations.unlock();
        actor.play(DEATH);
        actor.animations.lock();

        tracing::debug!(lives_left = self.lives, "player died");
        ctx.emit(LevelEvent::PlayerDied {
            lives_left: self.lives,
        });
    }

    fn hurt(&mut self, actor: &mut Actor<'_>, ctx: &mut TickContext) {
        if actor.body.invulnerable {
            return;
        }
        actor.body.jump();
        match self.size {
            SizeState::Big => self.shrink(actor, ctx),
            SizeState::Small => self.die(actor, ctx),
        }
    }

    fn celebrate(&mut self, actor: &mut Actor<'_>) {
        self.pose(actor, Pose::Peace);
        actor.animations.lock();
        let (width, height) = match self.size {
            SizeState::Small => PEACE_SMALL,
            SizeState::Big => PEACE_BIG,
        };
        actor.body.resize(width, height);
        actor.body.velocity.x = 0.0;
        actor.body.invulnerable = true;
        self.input_enabled = false;
    }

    fn respawn(&mut self, actor: &mut Actor<'_>, at: Vec2, ctx: &mut TickContext) {
        actor.body.velocity = Vec2::ZERO;
        actor.body.collidable = true;
        actor.body.solid = true;
        actor.body.grounded = false;
        actor.body.facing = Facing::Right;
        self.shrink(actor, ctx);
        actor.body.set_position(at);
        actor.body.snapshot_bounds();
        self.input_enabled = true;
        self.allow_walking = true;
        actor.animations.unlock();
        self.pose(actor, Pose::Idle);
        tracing::debug!(x = at.x, y = at.y, "player respawned");
        ctx.emit(LevelEvent::PlayerRespawned);
    }

    /// One blink of the post-hit invulnerability window.
    fn flicker_step(&mut self, actor: &mut Actor<'_>) {
        self.flickers += 1;
        self.visible = self.flickers % 2 == 0;
        if self.flickers >= FLICKER_COUNT {
            self.flickers = 0;
            self.visible = true;
            actor.body.invulnerable = false;
            actor.body.solid = true;
        } else {
            self.flicker.start();
        }
    }
}

impl Behavior for Player {
    fn kind(&self) -> Kind {
        Kind::Player
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn update(&mut self, mut actor: Actor<'_>, ctx: &mut TickContext) -> Motion {
        let moving = actor.body.velocity.x as i32 != 0;
        self.pose(&mut actor, if moving { Pose::Walk } else { Pose::Idle });

        if self.input_enabled {
            self.control(&mut actor, ctx.input, ctx.dt);
        }
        if self.flicker.update(ctx.dt) {
            self.flicker_step(&mut actor);
        }
        Motion::Integrate
    }

    fn after_physics(&mut self, mut actor: Actor<'_>, ctx: &mut TickContext) {
        if actor.body.collidable && actor.body.position.y > ctx.bounds.height {
            self.die(&mut actor, ctx);
        }
    }

    fn react(&mut self, mut actor: Actor<'_>, reaction: Reaction, ctx: &mut TickContext) {
        match reaction {
            Reaction::Bounce => actor.body.jump(),
            Reaction::Hurt => self.hurt(&mut actor, ctx),
            Reaction::Kill { .. } => {
                if actor.body.collidable {
                    self.die(&mut actor, ctx);
                }
            },
            Reaction::Grow => match self.size {
                SizeState::Small => self.grow(&mut actor, ctx),
                SizeState::Big => ctx.emit(LevelEvent::PowerUpStored),
            },
            Reaction::Celebrate => self.celebrate(&mut actor),
            Reaction::Respawn { at } => self.respawn(&mut actor, at, ctx),
        }
    }
}
