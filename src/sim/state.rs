//! Game state and run-phase transitions
//!
//! Everything that changes during a run lives in [`GameState`] so a restart
//! is a single `reset()`.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{EntityProbe, sample};
use super::field::{FieldChange, FieldWindow};
use super::rect::Rect;
use super::row::{CellId, CellKind, RowIndex};
use super::tick::FrameClock;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first press
    Idle,
    /// Field scrolling, collisions live
    Running,
    /// Released mid-run; simulation frozen
    Paused,
    /// Hit an iceberg; waiting for restart
    Dead,
}

impl GamePhase {
    /// Status line shown to the player
    pub fn prompt(&self) -> &'static str {
        match self {
            GamePhase::Idle => "Click and drag to move",
            GamePhase::Running => "",
            GamePhase::Paused => "Click and drag to resume",
            GamePhase::Dead => "Game over!",
        }
    }
}

/// Distance travelled and fish collected
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Score {
    pub total_distance: f64,
    pub items_collected: u32,
}

impl Score {
    /// Distance as shown on the HUD
    pub fn displayed_distance(&self) -> u64 {
        self.total_distance.floor() as u64
    }
}

/// Layout pushed by the host whenever the viewport changes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Area the rows are laid out in
    pub field: Rect,
    /// Player's collidable extent
    pub hitbox: Rect,
}

impl Geometry {
    pub fn is_valid(&self) -> bool {
        self.field.is_valid() && self.hitbox.is_valid()
    }
}

/// Notifications for the renderer/UI, drained once per frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    CellSpawned {
        id: CellId,
        kind: CellKind,
        row: RowIndex,
        column: u8,
    },
    CellDespawned {
        id: CellId,
        row: RowIndex,
        column: u8,
    },
    CellCollected {
        id: CellId,
    },
    PhaseChanged {
        from: GamePhase,
        to: GamePhase,
    },
    Died {
        id: CellId,
    },
}

/// Complete state of one play session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the session RNG started from
    pub seed: u64,
    pub tuning: Tuning,
    rng: Pcg32,
    phase: GamePhase,
    /// A press has happened since the last reset
    engaged: bool,
    score: Score,
    field: FieldWindow,
    geometry: Option<Geometry>,
    pub(crate) clock: FrameClock,
    events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            engaged: false,
            score: Score::default(),
            field: FieldWindow::new(tuning.row_height, tuning.max_row_attempts),
            geometry: None,
            clock: FrameClock::default(),
            events: Vec::new(),
            tuning,
        }
    }

    /// Reinitialize everything run-related
    ///
    /// The RNG keeps its stream so the next run gets a fresh field; geometry
    /// belongs to the host and is kept.
    pub fn reset(&mut self) {
        self.phase = GamePhase::Idle;
        self.engaged = false;
        self.score = Score::default();
        self.field = FieldWindow::new(self.tuning.row_height, self.tuning.max_row_attempts);
        self.clock = FrameClock::default();
        self.events.clear();
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn field(&self) -> &FieldWindow {
        &self.field
    }

    pub fn geometry(&self) -> Option<&Geometry> {
        self.geometry.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Current scroll speed (units/s)
    pub fn speed(&self) -> f32 {
        self.tuning.speed(self.field.row_counter())
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from != to {
            self.phase = to;
            self.events.push(GameEvent::PhaseChanged { from, to });
        }
    }

    /// Pointer pressed on the controller
    pub fn press(&mut self) {
        match self.phase {
            GamePhase::Idle => {
                self.engaged = true;
                log::info!("Run started (seed {})", self.seed);
                self.set_phase(GamePhase::Running);
            }
            GamePhase::Paused => self.engaged = true,
            _ => log::debug!("press ignored in {:?}", self.phase),
        }
    }

    /// Pointer released anywhere
    pub fn release(&mut self) {
        if self.phase == GamePhase::Running {
            self.set_phase(GamePhase::Paused);
        } else {
            log::debug!("release ignored in {:?}", self.phase);
        }
    }

    /// Resume signal (the player dragged the controller again)
    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused && self.engaged {
            self.set_phase(GamePhase::Running);
        } else {
            log::debug!("resume ignored in {:?}", self.phase);
        }
    }

    /// Restart after death; a no-op in any other phase
    pub fn restart(&mut self) {
        if self.phase != GamePhase::Dead {
            log::debug!("restart ignored in {:?}", self.phase);
            return;
        }
        log::info!(
            "Restarting after {} distance, {} fish",
            self.score.displayed_distance(),
            self.score.items_collected
        );
        let from = self.phase;
        self.reset();
        self.events.push(GameEvent::PhaseChanged {
            from,
            to: GamePhase::Idle,
        });
    }

    /// Store new layout; a valid layout also acts as a resume signal
    pub fn set_geometry(&mut self, geometry: Geometry) {
        self.geometry = Some(geometry);
        if geometry.is_valid() {
            if self.phase == GamePhase::Paused {
                self.resume();
            }
        } else {
            log::warn!("Ignoring resume for invalid geometry {:?}", geometry);
        }
    }

    /// Scroll `distance` units and resolve contacts under the hitbox
    ///
    /// Does nothing unless the run is live.
    pub fn step(&mut self, distance: f32, probe: Option<&dyn EntityProbe>) {
        if !self.is_running() {
            return;
        }
        if !distance.is_finite() {
            log::warn!("Ignoring non-finite step distance {}", distance);
            return;
        }

        let distance = distance.max(0.0);
        self.score.total_distance += distance as f64;
        let change = self.field.advance(distance, &mut self.rng);
        self.record_field_change(change);

        if let (Some(probe), Some(geometry)) = (probe, self.geometry) {
            let hits = sample(&self.field, &geometry.hitbox, probe);
            self.resolve_contacts(&hits);
        }
    }

    fn record_field_change(&mut self, change: FieldChange) {
        // Only cells that are still live need despawning; collected ones are already gone
        for row in &change.left {
            for cell in row.cells() {
                self.events.push(GameEvent::CellDespawned {
                    id: cell.id,
                    row: cell.row,
                    column: cell.column,
                });
            }
        }
        // Entered rows are the newest ones, all still in the window
        for row in self.field.rows().take(change.entered.len()) {
            for cell in row.cells() {
                self.events.push(GameEvent::CellSpawned {
                    id: cell.id,
                    kind: cell.kind,
                    row: cell.row,
                    column: cell.column,
                });
            }
        }
    }

    /// Apply sampled contacts in the order they were seen
    ///
    /// Fish are collected until an iceberg turns up; the iceberg ends the run
    /// and anything sampled after it is left in place.
    pub fn resolve_contacts(&mut self, hits: &[CellId]) {
        for &id in hits {
            if !self.is_running() {
                break;
            }
            // Cells already collected or scrolled away are stale hits
            let Some(kind) = self.field.cell(id).map(|c| c.kind) else {
                continue;
            };
            match kind {
                CellKind::Passable => {
                    self.field.remove_cell(id);
                    self.score.items_collected += 1;
                    self.events.push(GameEvent::CellCollected { id });
                }
                CellKind::Lethal => {
                    log::info!(
                        "Died on row {:?} after {} distance, {} fish",
                        self.field.cell(id).map(|c| c.row),
                        self.score.displayed_distance(),
                        self.score.items_collected
                    );
                    self.events.push(GameEvent::Died { id });
                    self.set_phase(GamePhase::Dead);
                }
            }
        }
    }
}
