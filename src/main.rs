//! Floe Run headless runner
//!
//! Plays runs with a simple autopilot at 60 fps and reports how far they got.
//! Usage: `floe-run [seed] [runs]`; set `FLOE_RUN_TUNING` to a JSON file to
//! override balance.

use floe_run::Tuning;
use floe_run::sim::{GameEvent, GamePhase, GameState, Geometry, GridProbe, Rect, TickInput, frame};
use glam::Vec2;

const FRAME_MS: f64 = 1000.0 / 60.0;
/// Ten minutes of play per run
const MAX_FRAMES: u32 = 60 * 60 * 10;

const FIELD_SIZE: Vec2 = Vec2::new(100.0, 80.0);
const HITBOX_SIZE: Vec2 = Vec2::new(4.0, 4.0);
const HITBOX_TOP: f32 = 58.0;

fn load_tuning() -> Tuning {
    let Ok(path) = std::env::var("FLOE_RUN_TUNING") else {
        return Tuning::default();
    };

    let loaded = std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()));

    match loaded {
        Ok(tuning) => {
            log::info!("Loaded tuning from {}", path);
            tuning
        }
        Err(e) => {
            log::warn!("Could not load tuning from {}: {}", path, e);
            Tuning::default()
        }
    }
}

/// Pick a column that is safe now and in the row about to scroll under the player
fn autopilot_x(state: &GameState, grid: &GridProbe, hitbox: &Rect, lookahead: f32) -> Option<f32> {
    let field = state.field();
    let y = hitbox.center().y - grid.bounds.min.y;
    let current = field.position_at(y).and_then(|p| field.row(p));
    let upcoming = field.position_at(y - lookahead).and_then(|p| field.row(p))?;

    let safe_now = |column: usize| current.is_none_or(|row| row.pattern()[column].is_passable());
    let x = hitbox.center().x;
    let by_distance = |column: &usize| (grid.column_center(*column) - x).abs() as u32;

    upcoming
        .safe_columns()
        .filter(|&c| safe_now(c))
        .min_by_key(by_distance)
        .or_else(|| upcoming.safe_columns().min_by_key(by_distance))
        .map(|column| grid.column_center(column))
}

fn play(state: &mut GameState) -> u32 {
    let mut geometry = Geometry {
        field: Rect::from_origin_size(Vec2::ZERO, FIELD_SIZE),
        hitbox: Rect::from_origin_size(Vec2::new(FIELD_SIZE.x / 2.0, HITBOX_TOP), HITBOX_SIZE),
    };
    let grid = GridProbe::new(geometry.field);

    let mut input = TickInput {
        press: true,
        geometry: Some(geometry),
        ..Default::default()
    };

    let mut frames = 0;
    while frames < MAX_FRAMES && state.phase() != GamePhase::Dead {
        frame(state, &input, frames as f64 * FRAME_MS);
        frames += 1;

        for event in state.drain_events() {
            if let GameEvent::Died { id } = event {
                log::debug!("Hit iceberg {:?}", id);
            }
        }

        let lookahead = state.speed() * (FRAME_MS / 1000.0) as f32 * 2.0;
        input = TickInput::default();
        if let Some(x) = autopilot_x(state, &grid, &geometry.hitbox, lookahead) {
            geometry.hitbox = geometry.hitbox.centered_at_x(x);
            input.geometry = Some(geometry);
        }
    }
    frames
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(rand::random::<u64>);
    let runs = args.next().and_then(|s| s.parse::<u32>().ok()).unwrap_or(1);

    let tuning = load_tuning();
    log::info!("Floe Run (headless) seed {} tuning {:?}", seed, tuning);

    let mut state = GameState::new(seed, tuning);
    for run in 1..=runs {
        let frames = play(&mut state);
        let score = state.score();
        println!(
            "run {}: {} after {:.1}s, distance {}, fish {}, rows {}",
            run,
            if state.phase() == GamePhase::Dead { "died" } else { "survived" },
            frames as f64 / 60.0,
            score.displayed_distance(),
            score.items_collected,
            state.field().row_counter()
        );

        if state.phase() == GamePhase::Dead {
            state.restart();
        } else {
            state.reset();
        }
    }
}
