//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only enters through `tick`/`frame`
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod field;
pub mod rect;
pub mod row;
pub mod state;
pub mod tick;

pub use collision::{EntityProbe, GridProbe, probe_points, sample};
pub use field::{FieldChange, FieldWindow};
pub use rect::Rect;
pub use row::{Cell, CellId, CellKind, Pattern, Row, RowIndex, generate_row, satisfied_width, stride_is_clear};
pub use state::{GameEvent, GamePhase, GameState, Geometry, Score};
pub use tick::{FrameClock, TickInput, frame, tick, tick_with_probe};
