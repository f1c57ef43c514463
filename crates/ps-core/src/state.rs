//! Game State — balance, stake, phase and the last winning row
//!
//! Fields are crate-private: only the wager controller, the evaluator and the
//! machine's spin transition write them. Collaborators read snapshots.

use serde::{Deserialize, Serialize};

use crate::grid::Grid;

/// Spin phase as seen by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpinPhase {
    /// Accepts bet changes and spin requests
    #[default]
    Idle,
    /// A spin is in flight; commands are refused
    Spinning,
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) balance: u64,
    pub(crate) bet: u64,
    pub(crate) phase: SpinPhase,
    pub(crate) winning_line: Option<u8>,
    /// Last settled grid
    pub(crate) grid: Grid,
}

impl GameState {
    pub fn new(balance: u64, bet: u64, grid: Grid) -> Self {
        Self {
            balance,
            bet,
            phase: SpinPhase::Idle,
            winning_line: None,
            grid,
        }
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn bet(&self) -> u64 {
        self.bet
    }

    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    pub fn winning_line(&self) -> Option<u8> {
        self.winning_line
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Idle and able to cover the stake
    pub fn can_spin(&self) -> bool {
        self.phase == SpinPhase::Idle && self.balance >= self.bet
    }

    /// Debit the stake and enter `Spinning`. Caller checks `can_spin` first.
    pub(crate) fn begin_spin(&mut self) {
        debug_assert!(self.can_spin());
        self.balance -= self.bet;
        self.winning_line = None;
        self.phase = SpinPhase::Spinning;
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            balance: self.balance,
            bet: self.bet,
            phase: self.phase,
            winning_line: self.winning_line,
            can_spin: self.can_spin(),
        }
    }
}

/// Read-only view handed to UI collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub balance: u64,
    pub bet: u64,
    pub phase: SpinPhase,
    pub winning_line: Option<u8>,
    /// Spin button enabled state
    pub can_spin: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_spin_debits_and_clears() {
        let mut state = GameState::new(1000, 10, Grid::filled(1));
        state.winning_line = Some(1);

        state.begin_spin();
        assert_eq!(state.balance(), 990);
        assert_eq!(state.phase(), SpinPhase::Spinning);
        assert_eq!(state.winning_line(), None);
        assert!(!state.can_spin());
    }

    #[test]
    fn test_cannot_spin_without_funds() {
        let state = GameState::new(5, 10, Grid::filled(1));
        assert!(!state.can_spin());
        assert!(!state.snapshot().can_spin);
    }

    #[test]
    fn test_snapshot_serializes_phase_lowercase() {
        let state = GameState::new(1000, 10, Grid::filled(1));
        let json = serde_json::to_string(&state.snapshot()).unwrap();
        assert!(json.contains("\"phase\":\"idle\""));
        assert!(json.contains("\"winning_line\":null"));
    }
}
