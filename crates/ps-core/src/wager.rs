//! Wager Controller — stake rules and bet adjustment

use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};
use crate::state::{GameState, SpinPhase};

/// Allowed stakes: `min, min + step, …, max`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetRules {
    pub min: u64,
    pub max: u64,
    pub step: u64,
    /// Stake at startup
    pub initial: u64,
}

impl BetRules {
    pub fn validate(&self) -> SlotResult<()> {
        if self.step == 0 {
            return Err(SlotError::InvalidBetRules("step must be positive".into()));
        }
        if self.min == 0 {
            return Err(SlotError::InvalidBetRules("minimum bet must be positive".into()));
        }
        if self.min > self.max {
            return Err(SlotError::InvalidBetRules(format!(
                "min {} > max {}",
                self.min, self.max
            )));
        }
        if (self.max - self.min) % self.step != 0 {
            return Err(SlotError::InvalidBetRules(format!(
                "range {}..={} is not a multiple of step {}",
                self.min, self.max, self.step
            )));
        }
        if !self.contains(self.initial) {
            return Err(SlotError::InvalidBetRules(format!(
                "initial bet {} is not an allowed level",
                self.initial
            )));
        }
        Ok(())
    }

    /// Is `bet` one of the allowed levels?
    pub fn contains(&self, bet: u64) -> bool {
        bet >= self.min && bet <= self.max && (bet - self.min) % self.step == 0
    }

    /// All allowed levels, ascending
    pub fn levels(&self) -> impl Iterator<Item = u64> + '_ {
        (self.min..=self.max).step_by(self.step as usize)
    }

    /// Next level in `direction`, clamped to the range
    pub fn adjusted(&self, bet: u64, direction: BetDirection) -> u64 {
        match direction {
            BetDirection::Up => bet.saturating_add(self.step).min(self.max),
            BetDirection::Down => bet.saturating_sub(self.step).max(self.min),
        }
    }
}

impl Default for BetRules {
    fn default() -> Self {
        Self {
            min: 10,
            max: 100,
            step: 10,
            initial: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetDirection {
    Up,
    Down,
}

impl BetDirection {
    /// `+1` → Up, `-1` → Down; zero has no direction
    pub fn from_step(step: i32) -> Option<Self> {
        match step.signum() {
            1 => Some(Self::Up),
            -1 => Some(Self::Down),
            _ => None,
        }
    }
}

/// What a bet command did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BetResponse {
    Changed { from: u64, to: u64 },
    /// Already at the bound in that direction (or no direction given)
    Unchanged { bet: u64 },
    /// A spin is in flight
    Locked,
}

impl BetResponse {
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }
}

/// Applies bet commands to the game state
#[derive(Debug, Clone)]
pub struct WagerController {
    rules: BetRules,
}

impl WagerController {
    pub fn new(rules: BetRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &BetRules {
        &self.rules
    }

    pub fn increase(&self, state: &mut GameState) -> BetResponse {
        self.adjust(state, BetDirection::Up)
    }

    pub fn decrease(&self, state: &mut GameState) -> BetResponse {
        self.adjust(state, BetDirection::Down)
    }

    /// Step the stake; ignored while spinning
    pub fn adjust(&self, state: &mut GameState, direction: BetDirection) -> BetResponse {
        if state.phase() == SpinPhase::Spinning {
            return BetResponse::Locked;
        }
        let from = state.bet();
        let to = self.rules.adjusted(from, direction);
        if to == from {
            return BetResponse::Unchanged { bet: from };
        }
        state.bet = to;
        BetResponse::Changed { from, to }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    fn idle_state(bet: u64) -> GameState {
        GameState::new(1000, bet, Grid::filled(1))
    }

    #[test]
    fn test_default_levels() {
        let rules = BetRules::default();
        assert!(rules.validate().is_ok());
        let levels: Vec<u64> = rules.levels().collect();
        assert_eq!(levels, vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
        assert!(rules.contains(40));
        assert!(!rules.contains(45));
        assert!(!rules.contains(110));
    }

    #[test]
    fn test_invalid_rules() {
        let zero_step = BetRules {
            step: 0,
            ..Default::default()
        };
        assert!(zero_step.validate().is_err());

        let ragged = BetRules {
            max: 105,
            ..Default::default()
        };
        assert!(ragged.validate().is_err());

        let off_grid_initial = BetRules {
            initial: 15,
            ..Default::default()
        };
        assert!(off_grid_initial.validate().is_err());
    }

    #[test]
    fn test_clamped_adjustment() {
        let wager = WagerController::new(BetRules::default());

        let mut state = idle_state(10);
        assert_eq!(wager.decrease(&mut state), BetResponse::Unchanged { bet: 10 });
        assert_eq!(
            wager.increase(&mut state),
            BetResponse::Changed { from: 10, to: 20 }
        );

        let mut state = idle_state(100);
        assert_eq!(wager.increase(&mut state), BetResponse::Unchanged { bet: 100 });
        assert_eq!(state.bet(), 100);
    }

    #[test]
    fn test_locked_while_spinning() {
        let wager = WagerController::new(BetRules::default());
        let mut state = idle_state(50);
        state.phase = SpinPhase::Spinning;

        assert_eq!(wager.increase(&mut state), BetResponse::Locked);
        assert_eq!(wager.decrease(&mut state), BetResponse::Locked);
        assert_eq!(state.bet(), 50);
    }

    #[test]
    fn test_direction_from_step() {
        assert_eq!(BetDirection::from_step(1), Some(BetDirection::Up));
        assert_eq!(BetDirection::from_step(-1), Some(BetDirection::Down));
        assert_eq!(BetDirection::from_step(0), None);
    }
}
