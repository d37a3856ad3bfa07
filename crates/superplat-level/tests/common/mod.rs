use superplat_core::test_helpers::run_ticks;
use superplat_level::layout::TileSpec;
use superplat_level::{Level, LevelConfig, LevelEvent, LevelLayout, PlayerInput};

/// Fixed step used by the scenario tests (~60 FPS).
pub const DT: f32 = 0.016;

/// A 20x10 level with a stone floor on row 7 and the player spawning at (2, 5).
pub fn floor_layout() -> LevelLayout {
    LevelLayout::new(20, 10, 16)
        .with_spawn(2, 5)
        .row(0, 20, 7, TileSpec::Stone)
}

pub fn level(layout: LevelLayout) -> Level {
    Level::new(layout, LevelConfig::default())
}

/// Run `ticks` updates with `input` held, collecting every event.
pub fn run(level: &mut Level, ticks: usize, input: PlayerInput) -> Vec<LevelEvent> {
    run_ticks(ticks, DT, |dt| {
        level.set_input(input);
        level.update(dt);
        level.drain_events()
    })
}

/// Let the player drop onto the ground.
pub fn settle(level: &mut Level) -> Vec<LevelEvent> {
    run(level, 60, PlayerInput::default())
}

pub fn jump() -> PlayerInput {
    PlayerInput {
        jump: true,
        ..PlayerInput::default()
    }
}

pub fn walk_right() -> PlayerInput {
    PlayerInput {
        move_dir: 1.0,
        ..PlayerInput::default()
    }
}
