//! Scrolling window of visible rows
//!
//! The field scrolls toward the player. `offset` is the top edge of the newest
//! row relative to the field origin; once scrolling pushes it past zero a new
//! row is spliced in above and the offset drops back by one row height. Rows
//! falling off the trailing edge are discarded.

use std::collections::VecDeque;

use rand::Rng;

use super::row::{Cell, CellId, Row, RowIndex, generate_row};
use crate::consts::*;

/// Rows that entered and left during one `advance`
#[derive(Debug, Default)]
pub struct FieldChange {
    /// Newly generated rows, in creation order
    pub entered: Vec<RowIndex>,
    /// Rows scrolled out of view (oldest first)
    pub left: Vec<Row>,
}

impl FieldChange {
    pub fn is_empty(&self) -> bool {
        self.entered.is_empty() && self.left.is_empty()
    }
}

/// The materialized rows plus the scroll state that produces them
#[derive(Debug, Clone)]
pub struct FieldWindow {
    /// Newest row at the front, oldest at the back
    rows: VecDeque<Row>,
    offset: f32,
    row_height: f32,
    /// Rows generated so far (index of the newest row)
    row_counter: RowIndex,
    last_ok_width: u8,
    max_row_attempts: u32,
    next_cell_id: u32,
}

impl FieldWindow {
    pub fn new(row_height: f32, max_row_attempts: u32) -> Self {
        Self {
            rows: VecDeque::with_capacity(VISIBLE_ROWS + 1),
            offset: row_height,
            row_height,
            row_counter: 0,
            last_ok_width: INITIAL_OK_WIDTH,
            max_row_attempts,
            next_cell_id: 1,
        }
    }

    /// Scroll by `delta` field units, generating and recycling rows
    ///
    /// Rows generated and discarded within the same call are never reported:
    /// they were never visible.
    pub fn advance<R: Rng + ?Sized>(&mut self, delta: f32, rng: &mut R) -> FieldChange {
        let mut change = FieldChange::default();
        if !delta.is_finite() {
            log::warn!("Ignoring non-finite scroll delta {}", delta);
            return change;
        }
        self.offset += delta;
        if self.offset <= 0.0 {
            return change;
        }

        // Rows needed to pull the offset back to (-row_height, 0]. Counted up
        // front so a huge offset still terminates even where f32 subtraction
        // would no longer move it.
        let pending = (self.offset / self.row_height).ceil() as u64;
        let previous_counter = self.row_counter;

        for _ in 0..pending {
            let index = self.row_counter + 1;
            let (pattern, width) = generate_row(index, self.last_ok_width, rng, self.max_row_attempts);
            self.row_counter = index;
            self.last_ok_width = width;

            let row = Row::new(index, pattern, self.next_cell_id);
            self.next_cell_id = self.next_cell_id.wrapping_add(ROW_WIDTH as u32);
            log::debug!("Row {} (stride {})", row, width);
            self.rows.push_front(row);

            // Trim as we go so the window never holds more than one extra row
            if self.rows.len() > VISIBLE_ROWS {
                if let Some(old) = self.rows.pop_back() {
                    if old.index() <= previous_counter {
                        change.left.push(old);
                    }
                }
            }
        }
        self.offset -= pending as f32 * self.row_height;

        change.entered = self
            .rows
            .iter()
            .rev()
            .map(Row::index)
            .filter(|&index| index > previous_counter)
            .collect();
        change
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Visible row by position (0 = newest)
    pub fn row(&self, position: usize) -> Option<&Row> {
        self.rows.get(position)
    }

    /// Position of the visible row spanning field-relative `y`
    pub fn position_at(&self, y: f32) -> Option<usize> {
        let rel = y - self.offset;
        if rel < 0.0 {
            return None;
        }
        let position = (rel / self.row_height) as usize;
        (position < self.rows.len()).then_some(position)
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    pub fn row_counter(&self) -> RowIndex {
        self.row_counter
    }

    pub fn last_ok_width(&self) -> u8 {
        self.last_ok_width
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.rows.iter().find_map(|row| row.find(id))
    }

    /// Remove a cell from whichever row holds it
    pub fn remove_cell(&mut self, id: CellId) -> Option<Cell> {
        self.rows.iter_mut().find_map(|row| row.remove(id))
    }
}
