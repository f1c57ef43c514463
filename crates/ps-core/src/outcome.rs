//! Outcome Generator — the final grid of a spin, fixed before any animation

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};
use crate::evaluator::payline_match;
use crate::grid::{Grid, PAYLINE_ROW, REELS, ROWS};
use crate::symbols::{SymbolCatalog, SymbolId};

/// How the win bias is applied to the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeModel {
    /// Bias steers the payline only: one Bernoulli draw decides whether the
    /// whole middle row copies the winning symbol.
    #[default]
    BiasedPayline,
    /// Every row: column 0 is uniform, each later cell copies it with
    /// probability `win_bias`.
    RowEcho,
}

/// The final grid of one spin and its verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinOutcome {
    pub final_grid: Grid,
    /// Recomputed from the payline, never copied from `will_win`
    pub is_win: bool,
    /// Symbol placed at (1, 0)
    pub winning_symbol: SymbolId,
    /// The bias draw
    pub will_win: bool,
}

impl SpinOutcome {
    pub fn from_grid(final_grid: Grid, winning_symbol: SymbolId, will_win: bool) -> Self {
        Self {
            is_win: payline_match(&final_grid).is_some(),
            final_grid,
            winning_symbol,
            will_win,
        }
    }

    /// Payline matched even though the bias draw said lose
    pub fn is_accidental_win(&self) -> bool {
        self.is_win && !self.will_win
    }
}

/// Every random draw behind a `BiasedPayline` outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomePlan {
    pub winning_symbol: SymbolId,
    pub will_win: bool,
    /// Cells (1, 1) and (1, 2); ignored when `will_win`
    pub free_cells: [SymbolId; 2],
    pub top_row: [SymbolId; REELS],
    pub bottom_row: [SymbolId; REELS],
}

impl OutcomePlan {
    pub fn realize(&self) -> SpinOutcome {
        let w = self.winning_symbol;
        let payline = if self.will_win {
            [w, w, w]
        } else {
            [w, self.free_cells[0], self.free_cells[1]]
        };
        let mut rows = [[0; REELS]; ROWS];
        rows[0] = self.top_row;
        rows[PAYLINE_ROW] = payline;
        rows[2] = self.bottom_row;
        SpinOutcome::from_grid(Grid::from_rows(rows), w, self.will_win)
    }
}

/// Pinned outcomes for tests and demos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForcedOutcome {
    /// Bias draw succeeds
    Win,
    /// Bias draw fails and both free cells avoid the winning symbol
    Lose,
    /// Bias draw fails but both free cells land on the winning symbol
    AccidentalWin,
    /// Every draw supplied by the caller
    Plan(OutcomePlan),
}

#[derive(Debug, Clone)]
pub struct OutcomeGenerator {
    win_bias: f64,
    model: OutcomeModel,
}

impl OutcomeGenerator {
    pub fn new(win_bias: f64, model: OutcomeModel) -> SlotResult<Self> {
        if !(0.0..=1.0).contains(&win_bias) {
            return Err(SlotError::InvalidParam(format!(
                "win bias must be within [0, 1], got {}",
                win_bias
            )));
        }
        Ok(Self { win_bias, model })
    }

    pub fn win_bias(&self) -> f64 {
        self.win_bias
    }

    pub fn model(&self) -> OutcomeModel {
        self.model
    }

    /// Draw one spin's outcome
    pub fn generate<R: Rng + ?Sized>(&self, catalog: &SymbolCatalog, rng: &mut R) -> SpinOutcome {
        match self.model {
            OutcomeModel::BiasedPayline => self.draw_plan(catalog, rng).realize(),
            OutcomeModel::RowEcho => self.generate_row_echo(catalog, rng),
        }
    }

    /// Draw order: winning symbol, bias, free cells (loss only), top row,
    /// bottom row.
    pub fn draw_plan<R: Rng + ?Sized>(&self, catalog: &SymbolCatalog, rng: &mut R) -> OutcomePlan {
        let winning_symbol = catalog.pick(rng);
        let will_win = rng.random_bool(self.win_bias);
        let free_cells = if will_win {
            [winning_symbol; 2]
        } else {
            [catalog.pick(rng), catalog.pick(rng)]
        };
        OutcomePlan {
            winning_symbol,
            will_win,
            free_cells,
            top_row: std::array::from_fn(|_| catalog.pick(rng)),
            bottom_row: std::array::from_fn(|_| catalog.pick(rng)),
        }
    }

    /// Outcome with some draws pinned; the rest stay random.
    ///
    /// Forced outcomes always follow the `BiasedPayline` layout.
    pub fn generate_forced<R: Rng + ?Sized>(
        &self,
        forced: ForcedOutcome,
        catalog: &SymbolCatalog,
        rng: &mut R,
    ) -> SpinOutcome {
        let plan = match forced {
            ForcedOutcome::Plan(plan) => plan,
            ForcedOutcome::Win => {
                let mut plan = self.draw_plan(catalog, rng);
                plan.will_win = true;
                plan.free_cells = [plan.winning_symbol; 2];
                plan
            }
            ForcedOutcome::Lose => {
                let mut plan = self.draw_plan(catalog, rng);
                let w = plan.winning_symbol;
                plan.will_win = false;
                plan.free_cells = [catalog.pick_other(rng, w), catalog.pick_other(rng, w)];
                plan
            }
            ForcedOutcome::AccidentalWin => {
                let mut plan = self.draw_plan(catalog, rng);
                plan.will_win = false;
                plan.free_cells = [plan.winning_symbol; 2];
                plan
            }
        };
        plan.realize()
    }

    fn generate_row_echo<R: Rng + ?Sized>(
        &self,
        catalog: &SymbolCatalog,
        rng: &mut R,
    ) -> SpinOutcome {
        let mut grid = Grid::filled(catalog.first());
        let mut payline_echoed = true;
        for row in 0..ROWS {
            let lead = catalog.pick(rng);
            grid.set(row, 0, lead);
            for col in 1..REELS {
                let echo = rng.random_bool(self.win_bias);
                let id = if echo { lead } else { catalog.pick(rng) };
                grid.set(row, col, id);
                if row == PAYLINE_ROW {
                    payline_echoed &= echo;
                }
            }
        }
        SpinOutcome::from_grid(grid, grid.get(PAYLINE_ROW, 0), payline_echoed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn generator() -> OutcomeGenerator {
        OutcomeGenerator::new(0.8, OutcomeModel::BiasedPayline).unwrap()
    }

    #[test]
    fn test_rejects_bias_out_of_range() {
        assert!(OutcomeGenerator::new(1.2, OutcomeModel::BiasedPayline).is_err());
        assert!(OutcomeGenerator::new(-0.1, OutcomeModel::RowEcho).is_err());
        assert!(OutcomeGenerator::new(f64::NAN, OutcomeModel::BiasedPayline).is_err());
    }

    #[test]
    fn test_plan_realize_win() {
        let plan = OutcomePlan {
            winning_symbol: 3,
            will_win: true,
            free_cells: [1, 2],
            top_row: [1, 2, 4],
            bottom_row: [5, 6, 7],
        };
        let outcome = plan.realize();
        assert_eq!(outcome.final_grid.payline(), [3, 3, 3]);
        assert_eq!(outcome.final_grid.row(0), [1, 2, 4]);
        assert!(outcome.is_win);
        assert!(!outcome.is_accidental_win());
    }

    #[test]
    fn test_plan_realize_loss_uses_free_cells() {
        let plan = OutcomePlan {
            winning_symbol: 3,
            will_win: false,
            free_cells: [1, 2],
            top_row: [3, 3, 3],
            bottom_row: [3, 3, 3],
        };
        let outcome = plan.realize();
        assert_eq!(outcome.final_grid.payline(), [3, 1, 2]);
        assert!(!outcome.is_win);
    }

    #[test]
    fn test_accidental_win_is_a_win() {
        let plan = OutcomePlan {
            winning_symbol: 6,
            will_win: false,
            free_cells: [6, 6],
            top_row: [1, 2, 3],
            bottom_row: [4, 5, 7],
        };
        let outcome = plan.realize();
        assert!(outcome.is_win);
        assert!(outcome.is_accidental_win());
    }

    #[test]
    fn test_generate_is_reproducible() {
        let catalog = SymbolCatalog::piano();
        let mut a = ChaCha8Rng::seed_from_u64(42);
        let mut b = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..50 {
            assert_eq!(
                generator().generate(&catalog, &mut a),
                generator().generate(&catalog, &mut b)
            );
        }
    }

    #[test]
    fn test_win_draw_always_fills_payline() {
        let catalog = SymbolCatalog::piano();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..200 {
            let outcome = generator().generate(&catalog, &mut rng);
            assert_eq!(outcome.final_grid.get(1, 0), outcome.winning_symbol);
            if outcome.will_win {
                assert!(outcome.is_win);
            }
            for &id in outcome.final_grid.cells() {
                assert!(catalog.contains(id));
            }
        }
    }

    #[test]
    fn test_forced_outcomes() {
        let catalog = SymbolCatalog::piano();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let generator = generator();
        for _ in 0..100 {
            let win = generator.generate_forced(ForcedOutcome::Win, &catalog, &mut rng);
            assert!(win.is_win && win.will_win);

            let lose = generator.generate_forced(ForcedOutcome::Lose, &catalog, &mut rng);
            assert!(!lose.is_win && !lose.will_win);
            let [w, b, c] = lose.final_grid.payline();
            assert!(b != w && c != w);

            let accidental =
                generator.generate_forced(ForcedOutcome::AccidentalWin, &catalog, &mut rng);
            assert!(accidental.is_accidental_win());
        }
    }

    #[test]
    fn test_zero_bias_never_forces() {
        let catalog = SymbolCatalog::piano();
        let generator = OutcomeGenerator::new(0.0, OutcomeModel::BiasedPayline).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..200 {
            assert!(!generator.generate(&catalog, &mut rng).will_win);
        }
    }

    #[test]
    fn test_row_echo_full_bias_matches_every_row() {
        let catalog = SymbolCatalog::piano();
        let generator = OutcomeGenerator::new(1.0, OutcomeModel::RowEcho).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        for _ in 0..50 {
            let outcome = generator.generate(&catalog, &mut rng);
            for row in 0..ROWS {
                let [a, b, c] = outcome.final_grid.row(row);
                assert!(a == b && b == c);
            }
            assert!(outcome.is_win && outcome.will_win);
        }
    }
}
