use rand::SeedableRng;
use rand::rngs::StdRng;

use superplat_core::events::EventQueue;

use crate::behavior::Entity;
use crate::config::LevelConfig;
use crate::entities::player::PlayerInput;
use crate::event::LevelEvent;
use crate::score::ScoreCollector;

/// Pixel extent of a level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelBounds {
    pub width: f32,
    pub height: f32,
}

impl LevelBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Level services handed to behaviors while they run.
///
/// Spawned entities and raised events are only collected here; the level
/// applies them after every body has been updated.
#[derive(Debug)]
pub struct TickContext {
    /// Seconds covered by the current tick.
    pub dt: f32,
    pub config: LevelConfig,
    pub bounds: LevelBounds,
    pub input: PlayerInput,
    pub score: ScoreCollector,
    pub rng: StdRng,
    spawned: Vec<Entity>,
    events: EventQueue<LevelEvent>,
}

impl TickContext {
    pub fn new(config: LevelConfig, bounds: LevelBounds) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            dt: 0.0,
            config,
            bounds,
            input: PlayerInput::default(),
            score: ScoreCollector::new(),
            rng,
            spawned: Vec::new(),
            events: EventQueue::new(),
        }
    }

    pub fn gravity(&self) -> f32 {
        self.config.physics.gravity
    }

    /// Queue an entity; it joins the level at the end of the tick.
    pub fn spawn(&mut self, entity: Entity) {
        tracing::debug!(
            kind = ?entity.kind(),
            x = entity.body.position.x,
            y = entity.body.position.y,
            "spawn queued"
        );
        self.spawned.push(entity);
    }

    pub fn emit(&mut self, event: LevelEvent) {
        self.events.push(event);
    }

    pub fn spawned(&self) -> &[Entity] {
        &self.spawned
    }

    pub fn take_spawned(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.spawned)
    }

    pub fn drain_events(&mut self) -> Vec<LevelEvent> {
        self.events.drain().collect()
    }
}
