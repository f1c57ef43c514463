//! Game configuration
//!
//! Every field has a default matching the shipped game, so a config file only
//! needs the keys it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};
use crate::outcome::OutcomeModel;
use crate::symbols::SymbolCatalog;
use crate::timing::RevealTiming;
use crate::wager::BetRules;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Balance at startup
    pub starting_balance: u64,

    /// Stake levels
    pub bet: BetRules,

    /// Probability that the bias draw succeeds
    pub win_bias: f64,

    /// Credit on a win = bet * multiplier
    pub payout_multiplier: u64,

    pub outcome_model: OutcomeModel,

    pub timing: RevealTiming,

    pub symbols: SymbolCatalog,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_balance: 1000,
            bet: BetRules::default(),
            win_bias: 0.8,
            payout_multiplier: 3,
            outcome_model: OutcomeModel::default(),
            timing: RevealTiming::default(),
            symbols: SymbolCatalog::default(),
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> SlotResult<()> {
        self.bet.validate()?;
        self.timing.validate()?;
        if !(0.0..=1.0).contains(&self.win_bias) {
            return Err(SlotError::InvalidParam(format!(
                "win_bias must be within [0, 1], got {}",
                self.win_bias
            )));
        }
        if self.payout_multiplier == 0 {
            return Err(SlotError::InvalidParam(
                "payout_multiplier must be positive".into(),
            ));
        }
        // Catalog emptiness and duplicates are rejected while deserializing.
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> SlotResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SlotError::Serialization(format!("Invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a YAML config
    pub fn from_yaml(yaml: &str) -> SlotResult<Self> {
        let config: Self = serde_yml::from_str(yaml)
            .map_err(|e| SlotError::Serialization(format!("Invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from disk; `.yaml`/`.yml` parse as YAML, anything else as JSON
    pub fn load(path: impl AsRef<Path>) -> SlotResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

        let config = if is_yaml {
            Self::from_yaml(&text)?
        } else {
            Self::from_json(&text)?
        };
        log::info!(
            "Loaded game config from {} ({} symbols, bias {})",
            path.display(),
            config.symbols.len(),
            config.win_bias
        );
        Ok(config)
    }

    /// Export as pretty JSON
    pub fn to_json(&self) -> SlotResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SlotError::Serialization(e.to_string()))
    }
}
