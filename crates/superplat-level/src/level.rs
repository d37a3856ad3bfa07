use superplat_core::collision::Axis;
use superplat_core::events::EventQueue;
use superplat_core::geometry::Vec2;
use superplat_core::timer::Timer;

use crate::behavior::{Entity, Kind, Motion, Reaction};
use crate::broadphase::{BroadPhase, Handle, Scene};
use crate::config::LevelConfig;
use crate::context::{LevelBounds, TickContext};
use crate::entities::item;
use crate::entities::player::{self, PlayerInput};
use crate::event::{LevelEvent, SizeState};
use crate::layout::LevelLayout;
use crate::physics::{CollisionWorld, apply_physics};
use crate::score::ScoreCollector;
use crate::tile::Tile;

/// One playable level: static tiles, the entity registry, level timers and
/// the per-tick broad-phase cache.
///
/// Entities update in registration order. Anything spawned during a tick joins
/// the registry at the end of it, and destroyed entities are dropped at the
/// same point, so handles stay valid for the whole tick.
#[derive(Debug)]
pub struct Level {
    layout: LevelLayout,
    tiles: Vec<Tile>,
    entities: Vec<Entity>,
    broadphase: BroadPhase,
    ctx: TickContext,
    outbound: EventQueue<LevelEvent>,
    clock: Timer,
    time_left: u32,
    respawn: Timer,
    end: Timer,
    lives: u32,
    reserve: bool,
    closed: bool,
    paused: bool,
}

impl Level {
    pub fn new(layout: LevelLayout, config: LevelConfig) -> Self {
        let tiles = layout.build_tiles();
        let mut entities = layout.build_entities(&config);
        entities.push(player::player(layout.spawn_position(), &config));

        tracing::info!(
            tiles = tiles.len(),
            entities = entities.len(),
            width = layout.bounds().width,
            height = layout.bounds().height,
            "level loaded"
        );

        Self {
            tiles,
            entities,
            broadphase: BroadPhase::new(config.physics.broadphase_neighbors),
            outbound: EventQueue::new(),
            clock: Timer::started(config.time_tick_ms),
            time_left: layout.time_limit,
            respawn: Timer::new(config.respawn_delay_ms),
            end: Timer::new(config.end_delay_ms),
            lives: config.player_lives,
            reserve: false,
            closed: false,
            paused: false,
            ctx: TickContext::new(config, layout.bounds()),
            layout,
        }
    }

    /// Advance the level by `dt` seconds.
    ///
    /// `dt` is clamped to the configured frame-time ceiling; a non-finite `dt`
    /// counts as zero.
    pub fn update(&mut self, dt: f32) {
        if self.paused {
            return;
        }
        let dt = if dt.is_finite() { dt } else { 0.0 };
        let dt = dt.clamp(0.0, self.ctx.config.max_frame_time().as_secs_f32());
        self.ctx.dt = dt;

        self.update_timers(dt);

        for i in 0..self.entities.len() {
            let (behavior, actor) = self.entities[i].split();
            let motion = behavior.update(actor, &mut self.ctx);
            if motion == Motion::Integrate && !self.entities[i].body.is_destroyed() {
                let mut scene = self.scene();
                apply_physics(&mut scene, Handle::Entity(i), dt);
            }
            let entity = &mut self.entities[i];
            let (behavior, actor) = entity.split();
            behavior.after_physics(actor, &mut self.ctx);
            entity.animations.update(dt);
        }

        self.handle_events();
        self.entities.extend(self.ctx.take_spawned());
        self.entities.retain(|e| !e.body.is_destroyed());
        self.broadphase.clear();
        self.ctx.input.jump = false;
    }

    fn scene(&mut self) -> Scene<'_> {
        Scene {
            tiles: &self.tiles,
            entities: &mut self.entities,
            broadphase: &mut self.broadphase,
            ctx: &mut self.ctx,
        }
    }

    fn update_timers(&mut self, dt: f32) {
        if self.clock.update(dt) {
            self.time_left = self.time_left.saturating_sub(1);
            if self.time_left == 0 {
                tracing::info!("time up");
                self.ctx.emit(LevelEvent::TimeUp);
            } else {
                self.clock.start();
            }
        }
        if self.respawn.update(dt) {
            self.respawn_player();
        }
        if self.end.update(dt) {
            self.ctx.emit(LevelEvent::LevelComplete);
        }
    }

    /// Handle this tick's events, then pass them on. Handling can raise more
    /// events (a respawn reports a size change); those are handled too.
    fn handle_events(&mut self) {
        loop {
            let events = self.ctx.drain_events();
            if events.is_empty() {
                break;
            }
            for event in events {
                self.handle(event);
                self.outbound.push(event);
            }
        }
    }

    fn handle(&mut self, event: LevelEvent) {
        match event {
            LevelEvent::PlayerDied { lives_left } => {
                self.lives = lives_left;
                self.respawn.reset();
                self.respawn.start();
            },
            LevelEvent::LevelClosed => {
                self.closed = true;
                self.clock.stop();
                self.react_player(Reaction::Celebrate);
                self.end.reset();
                self.end.start();
            },
            LevelEvent::TimeUp => self.clock.stop(),
            LevelEvent::PowerUpStored => self.reserve = true,
            LevelEvent::SizeChanged(SizeState::Small) if self.reserve => {
                let x = self.player().map_or(0.0, |p| p.body.position.x);
                self.drop_power_up(Vec2::new(x, 0.0));
            },
            _ => {},
        }
    }

    fn respawn_player(&mut self) {
        if self.lives == 0 {
            tracing::info!("game over");
            self.ctx.emit(LevelEvent::GameOver);
            return;
        }
        let Some(index) = self.player_index() else {
            return;
        };
        tracing::info!(lives = self.lives, "restarting level");

        let player = self.entities.swap_remove(index);
        self.entities = self.layout.build_entities(&self.ctx.config);
        self.entities.push(player);
        self.ctx.take_spawned();
        self.ctx.score.reset();
        self.time_left = self.layout.time_limit;
        self.clock.reset();
        self.clock.start();
        self.broadphase.clear();

        let at = self.layout.spawn_position();
        self.react_player(Reaction::Respawn { at });
    }

    fn react_player(&mut self, reaction: Reaction) {
        let Some(index) = self.player_index() else {
            return;
        };
        let (behavior, actor) = self.entities[index].split();
        behavior.react(actor, reaction, &mut self.ctx);
    }

    fn player_index(&self) -> Option<usize> {
        self.entities.iter().position(|e| e.kind() == Kind::Player)
    }

    /// Queue an entity; it joins the level at the end of the current tick.
    pub fn add_entity(&mut self, entity: Entity) {
        self.ctx.spawn(entity);
    }

    /// Release the stored power-up, falling in at `at`.
    pub fn drop_power_up(&mut self, at: Vec2) {
        self.reserve = false;
        let power_up = item::dropped_power_up(at, &self.ctx.config);
        self.add_entity(power_up);
    }

    /// Run a broad-phase test for one body outside the regular update.
    pub fn test_collisions(&mut self, handle: Handle, axis: Axis) {
        let mut scene = self.scene();
        scene.test_collisions(handle, axis);
        self.broadphase.clear();
    }

    pub fn set_input(&mut self, input: PlayerInput) {
        self.ctx.input = input.sanitized();
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Events raised since the last call, oldest first.
    pub fn drain_events(&mut self) -> Vec<LevelEvent> {
        self.outbound.drain().collect()
    }

    pub fn gravity(&self) -> f32 {
        self.ctx.gravity()
    }

    pub fn bounds(&self) -> LevelBounds {
        self.ctx.bounds
    }

    pub fn config(&self) -> &LevelConfig {
        &self.ctx.config
    }

    pub fn score(&self) -> &ScoreCollector {
        &self.ctx.score
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn player(&self) -> Option<&Entity> {
        self.player_index().map(|i| &self.entities[i])
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn has_reserve(&self) -> bool {
        self.reserve
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
