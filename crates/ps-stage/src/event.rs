//! StageEvent — A stage occurrence with metadata
//!
//! Wraps a Stage with timing and payload.

use serde::{Deserialize, Serialize};

use crate::stage::Stage;

/// A stage event with full metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageEvent {
    /// The canonical stage
    pub stage: Stage,

    /// Timestamp in milliseconds on the machine's session clock
    pub timestamp_ms: f64,

    /// Additional payload data
    #[serde(default)]
    pub payload: StagePayload,

    /// Custom tags for filtering/routing
    #[serde(default)]
    pub tags: Vec<String>,
}

impl StageEvent {
    pub fn new(stage: Stage, timestamp_ms: f64) -> Self {
        Self {
            stage,
            timestamp_ms,
            payload: StagePayload::default(),
            tags: Vec::new(),
        }
    }

    /// Create with payload
    pub fn with_payload(stage: Stage, timestamp_ms: f64, payload: StagePayload) -> Self {
        Self {
            stage,
            timestamp_ms,
            payload,
            tags: Vec::new(),
        }
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Get stage type name
    pub fn type_name(&self) -> &'static str {
        self.stage.type_name()
    }
}

/// Additional payload data for a stage event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StagePayload {
    // ═══ WIN DATA ═══
    /// Amount credited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win_amount: Option<u64>,

    /// Stake for this spin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bet_amount: Option<u64>,

    // ═══ SYMBOL DATA ═══
    /// Matched payline symbol id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_id: Option<u32>,

    /// Full 3×3 grid, row-major symbol ids
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reel_grid: Option<Vec<u32>>,

    // ═══ GAME STATE ═══
    /// Balance after the transition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<u64>,

    /// Sequential spin number within the session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spin_id: Option<u64>,
}

impl StagePayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with win data
    pub fn with_win(win_amount: u64, bet_amount: Option<u64>) -> Self {
        Self {
            win_amount: Some(win_amount),
            bet_amount,
            ..Default::default()
        }
    }

    /// Builder: set bet amount
    pub fn bet_amount(mut self, amount: u64) -> Self {
        self.bet_amount = Some(amount);
        self
    }

    /// Builder: set balance
    pub fn balance(mut self, balance: u64) -> Self {
        self.balance = Some(balance);
        self
    }

    /// Builder: set spin id
    pub fn spin_id(mut self, spin_id: u64) -> Self {
        self.spin_id = Some(spin_id);
        self
    }

    /// Builder: set matched symbol
    pub fn symbol_id(mut self, symbol_id: u32) -> Self {
        self.symbol_id = Some(symbol_id);
        self
    }

    /// Builder: set the full grid
    pub fn reel_grid(mut self, grid: Vec<u32>) -> Self {
        self.reel_grid = Some(grid);
        self
    }

    /// Win-to-bet ratio if both amounts are present
    pub fn calculate_ratio(&self) -> Option<f64> {
        match (self.win_amount, self.bet_amount) {
            (Some(win), Some(bet)) if bet > 0 => Some(win as f64 / bet as f64),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_event_creation() {
        let event = StageEvent::new(Stage::SpinStart, 0.0).with_tag("user_initiated");

        assert_eq!(event.stage, Stage::SpinStart);
        assert_eq!(event.timestamp_ms, 0.0);
        assert_eq!(event.type_name(), "spin_start");
        assert!(event.tags.contains(&"user_initiated".to_string()));
    }

    #[test]
    fn test_payload_win_ratio() {
        let payload = StagePayload::with_win(30, Some(10));
        assert_eq!(payload.calculate_ratio(), Some(3.0));
        assert_eq!(StagePayload::new().calculate_ratio(), None);
    }

    #[test]
    fn test_payload_serialization() {
        let payload = StagePayload::with_win(60, Some(20)).balance(1040).spin_id(3);

        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("win_amount"));
        assert!(json.contains("balance"));

        // Empty fields should be skipped
        assert!(!json.contains("symbol_id"));
        assert!(!json.contains("reel_grid"));
    }
}
