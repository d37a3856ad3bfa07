use std::time::Duration;

use superplat_core::time::delta_seconds;
use superplat_level::{Level, LevelConfig, LevelEvent, LevelLayout, PlayerInput};
use tracing_subscriber::EnvFilter;

const FRAME: Duration = Duration::from_millis(16);
const DEFAULT_TICKS: u32 = 3600;

/// Input held from `from` until the next step starts.
struct Step {
    from: u32,
    input: PlayerInput,
}

fn step(from: u32, input: PlayerInput) -> Step {
    Step { from, input }
}

fn script() -> Vec<Step> {
    let run = |move_dir| PlayerInput {
        move_dir,
        ..PlayerInput::default()
    };
    let hop = |move_dir| PlayerInput {
        move_dir,
        jump: true,
        ..PlayerInput::default()
    };
    vec![
        step(0, PlayerInput::default()),
        step(60, run(1.0)),
        step(100, hop(1.0)),
        step(101, run(1.0)),
        step(140, hop(0.0)),
        step(141, run(0.0)),
        step(200, hop(1.0)),
        step(201, run(1.0)),
        step(300, hop(1.0)),
        step(301, run(1.0)),
        step(420, hop(1.0)),
        step(421, run(1.0)),
    ]
}

fn input_at(script: &[Step], tick: u32) -> PlayerInput {
    script
        .iter()
        .rev()
        .find(|step| step.from <= tick)
        .map(|step| step.input)
        .unwrap_or_default()
}

fn load_layout(path: Option<String>) -> LevelLayout {
    let Some(path) = path else {
        return LevelLayout::demo();
    };
    match LevelLayout::from_path(&path) {
        Ok(layout) => layout,
        Err(e) => {
            tracing::warn!("{path}: {e}, running the demo course");
            LevelLayout::demo()
        },
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let layout = load_layout(args.next());
    let ticks = args
        .next()
        .and_then(|t| t.parse().ok())
        .unwrap_or(DEFAULT_TICKS);

    let config = LevelConfig::load();
    let dt = delta_seconds(FRAME, config.max_frame_time());
    let mut level = Level::new(layout, config);
    let script = script();

    tracing::info!(ticks, dt, "superplat sim starting");
    for tick in 0..ticks {
        level.set_input(input_at(&script, tick));
        level.update(dt);

        let mut finished = false;
        for event in level.drain_events() {
            tracing::info!(tick, ?event, "level event");
            finished |= matches!(event, LevelEvent::LevelComplete | LevelEvent::GameOver);
        }
        if finished {
            break;
        }
    }

    let score = level.score();
    let position = level.player().map(|p| p.body.position);
    let visible = level.player().is_some_and(|p| p.is_visible());
    tracing::info!(
        score = score.score(),
        coins = score.coins(),
        lives = level.lives(),
        time_left = level.time_left(),
        ?position,
        visible,
        "superplat sim finished"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_holds_input_until_next_step() {
        let script = script();
        assert_eq!(input_at(&script, 10), PlayerInput::default());
        assert_eq!(input_at(&script, 70).move_dir, 1.0);
        assert!(input_at(&script, 100).jump);
        assert!(!input_at(&script, 101).jump);
    }

    #[test]
    fn demo_runs_without_panicking() {
        let mut level = Level::new(LevelLayout::demo(), LevelConfig::default());
        let script = script();
        for tick in 0..600 {
            level.set_input(input_at(&script, tick));
            level.update(0.016);
            level.drain_events();
        }
        assert!(level.player().is_some());
    }
}
