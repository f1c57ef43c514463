//! Win Evaluator & Payout
//!
//! Reads the middle row of a settled grid and credits the balance. This is
//! the only code path that increases the balance.

use serde::{Deserialize, Serialize};

use crate::grid::{Grid, PAYLINE_ROW};
use crate::state::{GameState, SpinPhase};
use crate::symbols::SymbolId;

/// Symbol on the payline when all three cells share it
pub fn payline_match(grid: &Grid) -> Option<SymbolId> {
    let [a, b, c] = grid.payline();
    (a == b && b == c).then_some(a)
}

/// Result of evaluating one settled grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Row that matched (only ever the payline row)
    pub winning_line: Option<u8>,
    /// Matched symbol
    pub symbol: Option<SymbolId>,
    /// Stake that was debited for this spin
    pub bet: u64,
    /// Amount credited back (`bet * multiplier` on a win)
    pub win_amount: u64,
}

impl Evaluation {
    pub fn is_win(&self) -> bool {
        self.winning_line.is_some()
    }

    /// Balance change over the whole spin, stake included
    pub fn net(&self) -> i64 {
        self.win_amount as i64 - self.bet as i64
    }
}

#[derive(Debug, Clone)]
pub struct WinEvaluator {
    multiplier: u64,
}

impl WinEvaluator {
    pub fn new(multiplier: u64) -> Self {
        Self { multiplier }
    }

    pub fn multiplier(&self) -> u64 {
        self.multiplier
    }

    /// Pure evaluation, no state change
    pub fn evaluate(&self, grid: &Grid, bet: u64) -> Evaluation {
        match payline_match(grid) {
            Some(symbol) => Evaluation {
                winning_line: Some(PAYLINE_ROW as u8),
                symbol: Some(symbol),
                bet,
                win_amount: bet.saturating_mul(self.multiplier),
            },
            None => Evaluation {
                winning_line: None,
                symbol: None,
                bet,
                win_amount: 0,
            },
        }
    }

    /// Publish the settled grid, set the winning line, credit, return to idle.
    ///
    /// The verdict is recomputed from `final_grid`; the generator's bias draw
    /// plays no part here.
    pub fn settle(&self, state: &mut GameState, final_grid: Grid) -> Evaluation {
        let evaluation = self.evaluate(&final_grid, state.bet);
        state.grid = final_grid;
        state.winning_line = evaluation.winning_line;
        state.balance = state.balance.saturating_add(evaluation.win_amount);
        state.phase = SpinPhase::Idle;
        evaluation
    }
}

impl Default for WinEvaluator {
    fn default() -> Self {
        Self::new(3)
    }
}
