//! Per-frame simulation tick
//!
//! The host calls [`frame`] once per animation frame with its timestamp. Time
//! that passes outside `Running` is dropped rather than banked, so resuming
//! never produces a jump.

use super::collision::{EntityProbe, GridProbe};
use super::state::{GameState, Geometry};

/// Gestures and layout updates gathered since the previous frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer went down on the controller
    pub press: bool,
    /// Pointer released
    pub release: bool,
    /// Play-again button
    pub restart: bool,
    /// Latest layout, if it changed
    pub geometry: Option<Geometry>,
}

/// Turns monotonically increasing frame timestamps into deltas
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    /// Seconds since the previous call; the first call only sets the baseline
    pub fn delta(&mut self, timestamp_ms: f64) -> f32 {
        let delta = match self.last_ms {
            Some(last) => ((timestamp_ms - last) / 1000.0).max(0.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(timestamp_ms);
        delta
    }
}

fn apply_input(state: &mut GameState, input: &TickInput) {
    if let Some(geometry) = input.geometry {
        state.set_geometry(geometry);
    }
    if input.restart {
        state.restart();
    }
    if input.press {
        state.press();
    }
    if input.release {
        state.release();
    }
}

/// Advance the game by `dt` seconds using the grid layout from the current geometry
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    apply_input(state, input);
    let probe = state.geometry().map(|g| GridProbe::new(g.field));
    simulate(state, dt, probe.as_ref().map(|p| p as &dyn EntityProbe));
}

/// Advance the game by `dt` seconds, asking `probe` what sits under the player
pub fn tick_with_probe(state: &mut GameState, input: &TickInput, dt: f32, probe: &dyn EntityProbe) {
    apply_input(state, input);
    simulate(state, dt, Some(probe));
}

/// Frame callback entry point: derive `dt` from the timestamp, then tick
pub fn frame(state: &mut GameState, input: &TickInput, timestamp_ms: f64) {
    let dt = state.clock.delta(timestamp_ms);
    tick(state, input, dt);
}

fn simulate(state: &mut GameState, dt: f32, probe: Option<&dyn EntityProbe>) {
    // Frames outside Running still consumed their dt via the clock; drop it here
    if !state.is_running() {
        return;
    }
    let distance = dt.max(0.0) * state.speed();
    state.step(distance, probe);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::rect::Rect;
    use crate::sim::row::CellKind;
    use crate::sim::state::GamePhase;
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn geometry_at(x: f32) -> Geometry {
        Geometry {
            field: Rect::from_origin_size(Vec2::ZERO, Vec2::new(100.0, 80.0)),
            hitbox: Rect::from_origin_size(Vec2::new(x - 2.0, 58.0), Vec2::new(4.0, 4.0)),
        }
    }

    #[test]
    fn test_clock_baseline() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.delta(5000.0), 0.0);
        assert!((clock.delta(5500.0) - 0.5).abs() < 1e-6);
        assert_eq!(clock.delta(5400.0), 0.0);
    }

    #[test]
    fn test_idle_frames_do_not_simulate() {
        let mut state = GameState::new(1, Tuning::default());
        let input = TickInput::default();
        frame(&mut state, &input, 0.0);
        frame(&mut state, &input, 10_000.0);
        assert_eq!(state.field().row_counter(), 0);
        assert_eq!(state.score().total_distance, 0.0);
    }

    #[test]
    fn test_paused_time_is_not_banked() {
        let mut state = GameState::new(1, Tuning::default());
        let press = TickInput {
            press: true,
            ..Default::default()
        };
        frame(&mut state, &press, 0.0);
        let speed = state.speed() as f64;
        frame(&mut state, &TickInput::default(), 1000.0);
        let after_running = state.score().total_distance;
        assert!((after_running - speed).abs() < 1e-4);

        let release = TickInput {
            release: true,
            ..Default::default()
        };
        frame(&mut state, &release, 2000.0);
        frame(&mut state, &TickInput::default(), 60_000.0);
        assert_eq!(state.score().total_distance, after_running);

        // Resume via layout push: the next frame only sees its own delta
        let resume = TickInput {
            geometry: Some(geometry_at(5.0)),
            ..Default::default()
        };
        frame(&mut state, &resume, 60_000.0);
        assert_eq!(state.phase(), GamePhase::Running);
        frame(&mut state, &TickInput::default(), 60_100.0);
        let gained = state.score().total_distance - after_running;
        assert!(gained < 2.0, "gained {gained}");
    }

    #[test]
    fn test_speed_ramps_with_rows() {
        let mut state = GameState::new(9, Tuning::default());
        tick(&mut state, &TickInput { press: true, ..Default::default() }, 0.0);
        let initial = state.speed();
        for _ in 0..200 {
            tick(&mut state, &TickInput::default(), 0.1);
        }
        assert!(state.field().row_counter() > 2);
        assert!(state.speed() > initial);
        assert_eq!(state.field().len(), VISIBLE_ROWS);
    }

    #[test]
    fn test_grid_probe_collects_over_first_row() {
        let mut state = GameState::new(3, Tuning::default());
        let start = TickInput {
            press: true,
            geometry: Some(geometry_at(5.0)),
            ..Default::default()
        };
        // A zero-length first step only materializes row 1 (all fish) at y 0..40;
        // the hitbox probes sit at y 60, below it.
        tick(&mut state, &start, 0.0);
        assert_eq!(state.field().row_counter(), 1);
        assert_eq!(state.score().items_collected, 0);

        // Move the hitbox up over row 1, column 0
        let over_fish = Geometry {
            hitbox: Rect::from_origin_size(Vec2::new(3.0, 18.0), Vec2::new(4.0, 4.0)),
            ..geometry_at(5.0)
        };
        tick(&mut state, &TickInput { geometry: Some(over_fish), ..Default::default() }, 0.0);
        assert_eq!(state.score().items_collected, 1);
        assert_eq!(state.phase(), GamePhase::Running);
    }

    #[test]
    fn test_grid_probe_kills_over_iceberg() {
        let mut state = GameState::new(3, Tuning::default());
        // Half a second at base speed scrolls 5 units: row 2 spans y -35..5 and
        // its column 1 is an iceberg
        let geometry = Geometry {
            field: Rect::from_origin_size(Vec2::ZERO, Vec2::new(100.0, 80.0)),
            hitbox: Rect::from_origin_size(Vec2::new(12.0, -22.0), Vec2::new(4.0, 4.0)),
        };
        let start = TickInput {
            press: true,
            geometry: Some(geometry),
            ..Default::default()
        };
        tick(&mut state, &start, 0.5);
        assert_eq!(state.field().row_counter(), 2);
        assert_eq!(state.field().row(0).unwrap().pattern()[1], CellKind::Lethal);
        assert_eq!(state.phase(), GamePhase::Dead);
        assert_eq!(state.score().items_collected, 0);

        // Dead freezes everything
        let rows = state.field().row_counter();
        tick(&mut state, &TickInput { release: true, ..Default::default() }, 10.0);
        assert_eq!(state.field().row_counter(), rows);
        assert_eq!(state.phase(), GamePhase::Dead);

        tick(&mut state, &TickInput { restart: true, ..Default::default() }, 0.0);
        assert_eq!(state.phase(), GamePhase::Idle);
        assert!(state.field().is_empty());
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(99999, Tuning::default());
        let mut b = GameState::new(99999, Tuning::default());
        let press = TickInput {
            press: true,
            ..Default::default()
        };
        tick(&mut a, &press, 0.0);
        tick(&mut b, &press, 0.0);
        for _ in 0..300 {
            tick(&mut a, &TickInput::default(), 0.05);
            tick(&mut b, &TickInput::default(), 0.05);
        }
        let rows_a: Vec<_> = a.field().rows().map(|r| *r.pattern()).collect();
        let rows_b: Vec<_> = b.field().rows().map(|r| *r.pattern()).collect();
        assert_eq!(rows_a, rows_b);
        assert_eq!(a.field().row_counter(), b.field().row_counter());
    }
}
