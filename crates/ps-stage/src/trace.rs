//! StageTrace — The sequence of stage events for one spin
//!
//! A trace captures the full timeline of a spin and can check that the
//! lifecycle ran in order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::StageEvent;
use crate::stage::{Stage, StageCategory};

/// A complete trace of stage events for one spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTrace {
    /// Unique identifier for this trace
    pub trace_id: String,

    /// Spin number within the session
    #[serde(default)]
    pub spin_id: Option<u64>,

    /// All events in chronological order
    pub events: Vec<StageEvent>,

    /// When this trace was started
    pub recorded_at: DateTime<Utc>,

    /// Free-form context (bet, model, forced outcome, ...)
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl StageTrace {
    pub fn new(trace_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            spin_id: None,
            events: Vec::new(),
            recorded_at: Utc::now(),
            metadata: serde_json::Map::new(),
        }
    }

    /// Set spin ID
    pub fn with_spin(mut self, spin_id: u64) -> Self {
        self.spin_id = Some(spin_id);
        self
    }

    /// Attach a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Add an event to the trace
    pub fn push(&mut self, event: StageEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Total duration in milliseconds
    pub fn duration_ms(&self) -> f64 {
        match (self.events.first(), self.events.last()) {
            (Some(first), Some(last)) => last.timestamp_ms - first.timestamp_ms,
            _ => 0.0,
        }
    }

    /// Get events by category
    pub fn events_by_category(&self, category: StageCategory) -> Vec<&StageEvent> {
        self.events
            .iter()
            .filter(|e| e.stage.category() == category)
            .collect()
    }

    /// Get events by stage type name
    pub fn events_by_type(&self, type_name: &str) -> Vec<&StageEvent> {
        self.events
            .iter()
            .filter(|e| e.stage.type_name() == type_name)
            .collect()
    }

    /// Check if trace contains a specific stage type
    pub fn has_stage(&self, type_name: &str) -> bool {
        self.events.iter().any(|e| e.stage.type_name() == type_name)
    }

    /// All reel stop events, in recorded order
    pub fn reel_stops(&self) -> Vec<&StageEvent> {
        self.events_by_type("reel_stop")
    }

    /// Total credited amount
    pub fn total_win(&self) -> u64 {
        self.events
            .iter()
            .filter_map(|e| match e.stage {
                Stage::WinPresent { win_amount, .. } => Some(win_amount),
                _ => None,
            })
            .sum()
    }

    /// Verdict carried by the settle event, if the spin settled
    pub fn settled_win(&self) -> Option<bool> {
        self.events.iter().rev().find_map(|e| match e.stage {
            Stage::SpinSettled { is_win } => Some(is_win),
            _ => None,
        })
    }

    /// Check the lifecycle ordering of a single recorded spin
    pub fn validate_spin(&self) -> TraceValidation {
        let position = |name: &str| self.events.iter().position(|e| e.type_name() == name);

        let stops: Vec<(usize, &StageEvent)> = self
            .events
            .iter()
            .enumerate()
            .filter(|(_, e)| matches!(e.stage, Stage::ReelStop { .. }))
            .collect();

        let reels_in_order = stops
            .iter()
            .enumerate()
            .all(|(expected, (_, e))| e.stage.reel_index() == Some(expected as u8))
            && stops
                .windows(2)
                .all(|w| w[0].1.timestamp_ms <= w[1].1.timestamp_ms);

        let last_stop = stops.last().map(|(i, _)| *i);
        let evaluate_after_stops = match (position("evaluate_wins"), last_stop) {
            (Some(eval), Some(stop)) => eval > stop,
            _ => false,
        };

        let settled_last = self
            .events
            .last()
            .is_some_and(|e| matches!(e.stage, Stage::SpinSettled { .. }));

        let win_presented = self.has_stage("win_present");
        let win_consistent = self.settled_win().is_none_or(|w| w == win_presented);

        TraceValidation {
            starts_with_spin_start: self
                .events
                .first()
                .is_some_and(|e| e.stage == Stage::SpinStart),
            reel_stop_count: stops.len() as u8,
            reels_in_order,
            evaluate_after_stops,
            settled_last,
            win_consistent,
        }
    }
}

/// Validation result for a spin trace
#[derive(Debug, Clone, Default)]
pub struct TraceValidation {
    pub starts_with_spin_start: bool,
    pub reel_stop_count: u8,
    pub reels_in_order: bool,
    pub evaluate_after_stops: bool,
    pub settled_last: bool,
    pub win_consistent: bool,
}

impl TraceValidation {
    /// Check if the trace is a complete, well-ordered spin of `reels` reels
    pub fn is_valid(&self, reels: u8) -> bool {
        self.starts_with_spin_start
            && self.reel_stop_count == reels
            && self.reels_in_order
            && self.evaluate_after_stops
            && self.settled_last
            && self.win_consistent
    }

    /// Get list of warnings
    pub fn warnings(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();

        if !self.starts_with_spin_start {
            warnings.push("Missing leading SPIN_START event");
        }
        if !self.reels_in_order {
            warnings.push("Reels stopped out of left-to-right order");
        }
        if !self.evaluate_after_stops {
            warnings.push("EVALUATE_WINS not after the last REEL_STOP");
        }
        if !self.settled_last {
            warnings.push("SPIN_SETTLED is not the final event");
        }
        if !self.win_consistent {
            warnings.push("WIN_PRESENT does not match the settled verdict");
        }

        warnings
    }
}
