//! Collision sampling under the player hitbox
//!
//! Rather than intersecting the whole hitbox with every cell, two probe points
//! are sampled: a quarter and three quarters of the way across the hitbox, both
//! at its vertical center. Narrow cells can slip between the probes; the game's
//! difficulty is balanced around that.

use glam::Vec2;

use super::field::FieldWindow;
use super::rect::Rect;
use super::row::CellId;
use crate::consts::ROW_WIDTH;

/// Answers "which cells occupy this point?"
///
/// Usually backed by whatever lays cells out on screen; [`GridProbe`] is the
/// plain grid layout.
pub trait EntityProbe {
    fn entities_at(&self, field: &FieldWindow, point: Vec2) -> Vec<CellId>;
}

/// Lays the field out as a uniform grid inside `bounds`
///
/// Columns split `bounds` evenly; the newest row's top edge sits at
/// `bounds.min.y + field.offset()` and older rows stack below it.
#[derive(Debug, Clone, Copy)]
pub struct GridProbe {
    pub bounds: Rect,
}

impl GridProbe {
    pub fn new(bounds: Rect) -> Self {
        Self { bounds }
    }

    /// Column spanning absolute `x`, if inside the field
    pub fn column_at(&self, x: f32) -> Option<usize> {
        let width = self.bounds.width();
        if width <= 0.0 || x < self.bounds.min.x || x >= self.bounds.max.x {
            return None;
        }
        let column = ((x - self.bounds.min.x) / width * ROW_WIDTH as f32) as usize;
        Some(column.min(ROW_WIDTH - 1))
    }

    /// Absolute x of a column's center
    pub fn column_center(&self, column: usize) -> f32 {
        let cell_width = self.bounds.width() / ROW_WIDTH as f32;
        self.bounds.min.x + (column as f32 + 0.5) * cell_width
    }
}

impl EntityProbe for GridProbe {
    fn entities_at(&self, field: &FieldWindow, point: Vec2) -> Vec<CellId> {
        let Some(column) = self.column_at(point.x) else {
            return Vec::new();
        };
        // Rows are laid out relative to the field's top edge; empty slots
        // (collected fish) report nothing
        field
            .position_at(point.y - self.bounds.min.y)
            .and_then(|position| field.row(position))
            .and_then(|row| row.cell(column))
            .map(|cell| vec![cell.id])
            .unwrap_or_default()
    }
}

/// The two sample points for a hitbox
pub fn probe_points(hitbox: &Rect) -> [Vec2; 2] {
    let y = (hitbox.min.y + hitbox.max.y) / 2.0;
    [
        Vec2::new((hitbox.min.x * 3.0 + hitbox.max.x) / 4.0, y),
        Vec2::new((hitbox.min.x + hitbox.max.x * 3.0) / 4.0, y),
    ]
}

/// Distinct cells under the hitbox probes, in first-seen order
pub fn sample(field: &FieldWindow, hitbox: &Rect, probe: &dyn EntityProbe) -> Vec<CellId> {
    let mut hits = Vec::new();
    for point in probe_points(hitbox) {
        for id in probe.entities_at(field, point) {
            // Both probes usually land in the same cell
            if !hits.contains(&id) {
                hits.push(id);
            }
        }
    }
    hits
}
