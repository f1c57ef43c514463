//! Session statistics

use serde::{Deserialize, Serialize};

use crate::evaluator::Evaluation;
use crate::outcome::SpinOutcome;

/// Running totals across settled spins
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_spins: u64,
    pub wins: u64,
    pub losses: u64,
    /// Wins the bias draw did not ask for
    pub accidental_wins: u64,
    pub total_bet: u64,
    pub total_win: u64,
    /// Largest single credit
    pub max_win: u64,
}

impl SessionStats {
    pub fn record(&mut self, outcome: &SpinOutcome, evaluation: &Evaluation) {
        self.total_spins += 1;
        self.total_bet = self.total_bet.saturating_add(evaluation.bet);
        self.total_win = self.total_win.saturating_add(evaluation.win_amount);
        self.max_win = self.max_win.max(evaluation.win_amount);
        if evaluation.is_win() {
            self.wins += 1;
            if outcome.is_accidental_win() {
                self.accidental_wins += 1;
            }
        } else {
            self.losses += 1;
        }
    }

    /// Calculate RTP (percent)
    pub fn rtp(&self) -> f64 {
        if self.total_bet > 0 {
            (self.total_win as f64 / self.total_bet as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Calculate hit rate (percent)
    pub fn hit_rate(&self) -> f64 {
        if self.total_spins > 0 {
            (self.wins as f64 / self.total_spins as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Balance change over the session
    pub fn net(&self) -> i64 {
        self.total_win as i64 - self.total_bet as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::WinEvaluator;
    use crate::outcome::OutcomePlan;

    fn plan(will_win: bool, free_cells: [u32; 2]) -> SpinOutcome {
        OutcomePlan {
            winning_symbol: 2,
            will_win,
            free_cells,
            top_row: [1, 1, 1],
            bottom_row: [3, 3, 3],
        }
        .realize()
    }

    #[test]
    fn test_empty_stats() {
        let stats = SessionStats::default();
        assert_eq!(stats.rtp(), 0.0);
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_record() {
        let evaluator = WinEvaluator::default();
        let mut stats = SessionStats::default();

        for outcome in [plan(true, [2, 2]), plan(false, [2, 2]), plan(false, [5, 6])] {
            let eval = evaluator.evaluate(&outcome.final_grid, 10);
            stats.record(&outcome, &eval);
        }

        assert_eq!(stats.total_spins, 3);
        assert_eq!(stats.wins, 2);
        assert_eq!(stats.losses, 1);
        assert_eq!(stats.accidental_wins, 1);
        assert_eq!(stats.total_bet, 30);
        assert_eq!(stats.total_win, 60);
        assert_eq!(stats.max_win, 30);
        assert_eq!(stats.net(), 30);
        assert!((stats.rtp() - 200.0).abs() < 1e-9);
        assert!((stats.hit_rate() - 200.0 / 3.0).abs() < 1e-9);
    }
}
