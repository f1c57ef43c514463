//! Reel Animation Scheduler
//!
//! Drives the reveal of an already-decided outcome. While a spin is in
//! flight the view grid is cosmetic: unsettled columns are redrawn with
//! random symbols every step, and each column switches to its final symbols
//! once reveal progress crosses that column's threshold. Columns never
//! un-settle, and they settle strictly left to right.
//!
//! ```text
//!   Idle ──start──► Revealing ──progress ≥ 1──► Settled ──take_outcome──► Idle
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::grid::{Grid, REELS, ROWS};
use crate::outcome::SpinOutcome;
use crate::symbols::SymbolCatalog;
use crate::timing::{RevealClock, RevealTiming};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReelPhase {
    #[default]
    Idle,
    Revealing,
    /// Every column shows its final symbols; outcome not yet handed over
    Settled,
}

/// What one `advance` call changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleStep {
    /// Columns that settled during this step, ascending
    pub newly_settled: Vec<usize>,
    /// Reveal reached completion during this step
    pub finished: bool,
}

#[derive(Debug, Clone)]
pub struct ReelScheduler {
    timing: RevealTiming,
    phase: ReelPhase,
    elapsed_ms: f64,
    /// Tick clocks: time not yet worth a whole tick
    pending_ms: f64,
    ticks: u32,
    settled: [bool; REELS],
    outcome: Option<SpinOutcome>,
    view: Grid,
}

impl ReelScheduler {
    pub fn new(timing: RevealTiming, initial_grid: Grid) -> Self {
        Self {
            timing,
            phase: ReelPhase::Idle,
            elapsed_ms: 0.0,
            pending_ms: 0.0,
            ticks: 0,
            settled: [true; REELS],
            outcome: None,
            view: initial_grid,
        }
    }

    pub fn timing(&self) -> &RevealTiming {
        &self.timing
    }

    pub fn phase(&self) -> ReelPhase {
        self.phase
    }

    pub fn is_revealing(&self) -> bool {
        self.phase == ReelPhase::Revealing
    }

    /// What the renderer should draw right now
    pub fn view_grid(&self) -> &Grid {
        &self.view
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn progress(&self) -> f64 {
        match self.phase {
            ReelPhase::Idle => 0.0,
            ReelPhase::Revealing => self.timing.progress(self.elapsed_ms),
            ReelPhase::Settled => 1.0,
        }
    }

    /// Columns currently showing final symbols
    pub fn settled_columns(&self) -> usize {
        self.settled.iter().filter(|&&s| s).count()
    }

    /// Time left until the last column settles
    pub fn remaining_ms(&self) -> f64 {
        match self.phase {
            ReelPhase::Revealing => (self.timing.total_duration_ms - self.elapsed_ms).max(0.0),
            _ => 0.0,
        }
    }

    /// Begin revealing `outcome`; every column starts unsettled
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        outcome: SpinOutcome,
        catalog: &SymbolCatalog,
        rng: &mut R,
    ) {
        self.phase = ReelPhase::Revealing;
        self.elapsed_ms = 0.0;
        self.pending_ms = 0.0;
        self.ticks = 0;
        self.settled = [false; REELS];
        self.outcome = Some(outcome);
        for col in 0..REELS {
            self.scramble_column(col, catalog, rng);
        }
        log::trace!("Reveal started ({:?})", self.timing.clock);
    }

    /// Feed `delta_ms` of wall time into the reveal.
    ///
    /// Continuous clocks use the time as-is. Tick clocks only move in whole
    /// ticks and carry the remainder to the next call. A zero-length reveal
    /// completes on the first call regardless of `delta_ms`.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        delta_ms: f64,
        catalog: &SymbolCatalog,
        rng: &mut R,
    ) -> ScheduleStep {
        let mut step = ScheduleStep::default();
        if self.phase != ReelPhase::Revealing {
            return step;
        }
        let Some(final_grid) = self.outcome.map(|o| o.final_grid) else {
            return step;
        };

        let delta_ms = if delta_ms.is_finite() { delta_ms.max(0.0) } else { 0.0 };
        let moved = match self.timing.clock {
            RevealClock::Continuous => {
                self.elapsed_ms += delta_ms;
                true
            }
            RevealClock::Ticks { interval_ms } => {
                self.pending_ms += delta_ms;
                let whole = (self.pending_ms / interval_ms).floor();
                if whole >= 1.0 {
                    // Never count past the final tick.
                    let limit = self.timing.tick_count().unwrap_or(u32::MAX);
                    self.ticks = self.ticks.saturating_add(whole as u32).min(limit);
                    self.pending_ms = if self.ticks == limit {
                        0.0
                    } else {
                        (self.pending_ms - whole * interval_ms).max(0.0)
                    };
                    self.elapsed_ms = self.ticks as f64 * interval_ms;
                }
                whole >= 1.0
            }
        };

        let progress = self.timing.progress(self.elapsed_ms);
        for col in 0..REELS {
            if !self.settled[col] && progress >= self.timing.column_threshold(col) {
                self.settled[col] = true;
                self.view.set_column(col, final_grid.column(col));
                step.newly_settled.push(col);
            }
        }

        if progress >= 1.0 {
            // Thresholds of the last column and full progress coincide, but
            // the finished view must equal the final grid exactly.
            self.view = final_grid;
            self.settled = [true; REELS];
            self.phase = ReelPhase::Settled;
            step.finished = true;
            return step;
        }

        if moved {
            for col in 0..REELS {
                if !self.settled[col] {
                    self.scramble_column(col, catalog, rng);
                }
            }
        }
        step
    }

    /// Hand over the settled outcome and return to idle
    pub fn take_outcome(&mut self) -> Option<SpinOutcome> {
        if self.phase != ReelPhase::Settled {
            return None;
        }
        self.phase = ReelPhase::Idle;
        self.outcome.take()
    }

    fn scramble_column<R: Rng + ?Sized>(
        &mut self,
        col: usize,
        catalog: &SymbolCatalog,
        rng: &mut R,
    ) {
        let column: [_; ROWS] = std::array::from_fn(|_| catalog.pick(rng));
        self.view.set_column(col, column);
    }
}
