use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;

/// Identifier of an animation within one sequencer.
pub type AnimationId = u32;

/// Immutable description of a sprite-sheet animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub id: AnimationId,
    /// Sheet coordinate of the first frame (top-left).
    pub base_frame: Vec2,
    pub frame_size: Vec2,
    pub rows: u32,
    pub columns: u32,
    pub ms_per_frame: u32,
}

impl Animation {
    pub fn new(
        id: AnimationId,
        base_frame: Vec2,
        frame_size: Vec2,
        rows: u32,
        columns: u32,
        ms_per_frame: u32,
    ) -> Self {
        Self {
            id,
            base_frame,
            frame_size,
            rows,
            columns,
            ms_per_frame,
        }
    }

    /// Single-row strip of `columns` frames.
    pub fn strip(
        id: AnimationId,
        base_frame: Vec2,
        frame_size: Vec2,
        columns: u32,
        ms_per_frame: u32,
    ) -> Self {
        Self::new(id, base_frame, frame_size, 1, columns, ms_per_frame)
    }
}

/// Lookup failure when asking a sequencer for an animation it does not have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationError {
    Unknown(AnimationId),
}

impl fmt::Display for AnimationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(id) => write!(f, "no animation registered with id {id}"),
        }
    }
}

impl std::error::Error for AnimationError {}

/// Frame/time state machine that plays one animation at a time.
#[derive(Debug, Clone, Default)]
pub struct AnimationSequencer {
    animations: HashMap<AnimationId, Animation>,
    current: Option<AnimationId>,
    /// Resumed after one full cycle of a `play_once` animation.
    next: Option<AnimationId>,
    row: u32,
    column: u32,
    accumulator_ms: f64,
    running: bool,
    locked: bool,
}

impl AnimationSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an animation, replacing any previous one with the same id.
    pub fn add(&mut self, animation: Animation) {
        self.animations.insert(animation.id, animation);
    }

    pub fn with(mut self, animation: Animation) -> Self {
        self.add(animation);
        self
    }

    pub fn current(&self) -> Option<AnimationId> {
        self.current
    }

    pub fn queued(&self) -> Option<AnimationId> {
        self.next
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Current (column, row) within the playing animation.
    pub fn cell(&self) -> (u32, u32) {
        (self.column, self.row)
    }

    /// Sheet coordinate of the frame being shown, if anything is playing.
    pub fn current_frame(&self) -> Option<Vec2> {
        let anim = self.animations.get(&self.current?)?;
        Some(Vec2::new(
            anim.base_frame.x + self.column as f32 * anim.frame_size.x,
            anim.base_frame.y + self.row as f32 * anim.frame_size.y,
        ))
    }

    /// Freeze the current animation: `play`/`play_once` become no-ops until `unlock`.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn resume(&mut self) {
        if self.current.is_some() {
            self.running = true;
        }
    }

    /// Rewind the current animation to its first frame.
    pub fn reset(&mut self) {
        self.row = 0;
        self.column = 0;
        self.accumulator_ms = 0.0;
    }

    /// Switch to `id` and loop it.
    ///
    /// No-op while locked or when `id` is already current.
    pub fn play(&mut self, id: AnimationId) -> Result<(), AnimationError> {
        if !self.accepts(id) {
            return Ok(());
        }
        self.lookup(id)?;
        self.current = Some(id);
        self.reset();
        self.resume();
        Ok(())
    }

    /// Play `id` for one full cycle, then go back to what was playing before.
    pub fn play_once(&mut self, id: AnimationId) -> Result<(), AnimationError> {
        if !self.accepts(id) {
            return Ok(());
        }
        self.lookup(id)?;
        self.next = self.current;
        self.current = Some(id);
        self.reset();
        self.resume();
        Ok(())
    }

    /// Advance playback by `dt` seconds. At most one frame step per call.
    pub fn update(&mut self, dt: f32) {
        if !self.running {
            return;
        }
        let Some((ms_per_frame, rows, columns)) = self
            .current
            .and_then(|id| self.animations.get(&id))
            .map(|a| (a.ms_per_frame, a.rows, a.columns))
        else {
            return;
        };

        self.accumulator_ms += f64::from(dt) * 1000.0;
        if self.accumulator_ms < f64::from(ms_per_frame) {
            return;
        }

        self.accumulator_ms = 0.0;
        self.column += 1;
        if self.column >= columns {
            self.column = 0;
            self.row += 1;
            if self.row >= rows {
                self.row = 0;
                if let Some(next) = self.next.take() {
                    self.current = Some(next);
                }
            }
        }
    }

    fn accepts(&self, id: AnimationId) -> bool {
        !self.locked && self.current != Some(id)
    }

    fn lookup(&self, id: AnimationId) -> Result<&Animation, AnimationError> {
        self.animations.get(&id).ok_or_else(|| {
            tracing::warn!("AnimationSequencer: no animation with id {id}");
            AnimationError::Unknown(id)
        })
    }
}
