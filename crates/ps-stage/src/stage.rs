//! Stage — The enum defining every phase of a spin
//!
//! A Stage is NOT an animation frame and NOT a sound.
//! It is the meaning of a moment in the game flow.

use serde::{Deserialize, Serialize};

/// Canonical game stage
///
/// Audio and rendering collaborators respond to stages, never to the
/// machine's internal state transitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Stage {
    // ═══════════════════════════════════════════════════════════════════════
    // SPIN LIFECYCLE
    // ═══════════════════════════════════════════════════════════════════════
    /// Stake debited, outcome fixed, reels about to spin
    SpinStart,

    /// Reel is spinning and showing transient symbols
    ReelSpinning {
        /// Which reel (0-indexed, left to right)
        reel_index: u8,
    },

    /// Reel has settled on its final symbols
    ReelStop {
        /// Which reel stopped (0-indexed)
        reel_index: u8,
        /// Symbol ids on this reel (top to bottom)
        #[serde(default)]
        symbols: Vec<u32>,
    },

    /// All reels stopped, payline being evaluated
    EvaluateWins,

    /// Spin fully settled, machine back to idle
    SpinSettled {
        /// Whether the payline matched
        is_win: bool,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // WIN LIFECYCLE
    // ═══════════════════════════════════════════════════════════════════════
    /// Payline matched, credit applied
    WinPresent {
        /// Amount credited to the balance
        #[serde(default)]
        win_amount: u64,
        /// Row that matched
        #[serde(default)]
        line_index: u8,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // UI
    // ═══════════════════════════════════════════════════════════════════════
    /// Stake changed while idle
    BetChanged {
        /// New stake
        bet: u64,
    },

    /// Spin request refused by policy (already spinning, low balance)
    SpinRejected {
        /// Short reason tag
        #[serde(default)]
        reason: String,
    },
}

impl Stage {
    /// Category this stage belongs to
    pub fn category(&self) -> StageCategory {
        match self {
            Stage::SpinStart
            | Stage::ReelSpinning { .. }
            | Stage::ReelStop { .. }
            | Stage::EvaluateWins
            | Stage::SpinSettled { .. } => StageCategory::SpinLifecycle,

            Stage::WinPresent { .. } => StageCategory::WinLifecycle,

            Stage::BetChanged { .. } | Stage::SpinRejected { .. } => StageCategory::UI,
        }
    }

    /// Stable snake_case name (matches the serde tag)
    pub fn type_name(&self) -> &'static str {
        match self {
            Stage::SpinStart => "spin_start",
            Stage::ReelSpinning { .. } => "reel_spinning",
            Stage::ReelStop { .. } => "reel_stop",
            Stage::EvaluateWins => "evaluate_wins",
            Stage::SpinSettled { .. } => "spin_settled",
            Stage::WinPresent { .. } => "win_present",
            Stage::BetChanged { .. } => "bet_changed",
            Stage::SpinRejected { .. } => "spin_rejected",
        }
    }

    /// Stages that audio should treat as loops until a matching stop
    pub fn is_looping(&self) -> bool {
        matches!(self, Stage::ReelSpinning { .. })
    }

    /// All known type names
    pub fn all_type_names() -> &'static [&'static str] {
        &[
            "spin_start",
            "reel_spinning",
            "reel_stop",
            "evaluate_wins",
            "spin_settled",
            "win_present",
            "bet_changed",
            "spin_rejected",
        ]
    }

    /// Check if a type name is known
    pub fn is_valid_type_name(name: &str) -> bool {
        Self::all_type_names().contains(&name)
    }

    /// Reel index carried by this stage, if any
    pub fn reel_index(&self) -> Option<u8> {
        match self {
            Stage::ReelSpinning { reel_index } | Stage::ReelStop { reel_index, .. } => {
                Some(*reel_index)
            }
            _ => None,
        }
    }
}

/// Stage category for grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageCategory {
    SpinLifecycle,
    WinLifecycle,
    UI,
}

impl StageCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::SpinLifecycle => "Spin Lifecycle",
            Self::WinLifecycle => "Win Lifecycle",
            Self::UI => "UI",
        }
    }
}
