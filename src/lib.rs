//! Floe Run - endless scrolling ice-floe avoidance game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (row generation, scrolling, collisions, game state)
//! - `tuning`: Data-driven game balance

pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Cells per row
    pub const ROW_WIDTH: usize = 10;
    /// Rows kept materialized at once
    pub const VISIBLE_ROWS: usize = 3;
    /// Height of one row in field units (one row of scroll)
    pub const ROW_HEIGHT: f32 = 40.0;

    /// Scroll speed with no rows generated (units/s)
    pub const BASE_SPEED: f32 = 10.0;
    /// Speed added per generated row (units/s)
    pub const RAMP_FACTOR: f32 = 0.2;

    /// Widest stride checked by the solvability constraint
    pub const MAX_STRIDE: u8 = 5;
    /// Stride assumed satisfied before the first generated row
    pub const INITIAL_OK_WIDTH: u8 = MAX_STRIDE;
    /// Rejection-sampling ceiling before falling back to an all-safe row
    pub const MAX_ROW_ATTEMPTS: u32 = 10_000;
}
