//! Spin observers — audio, rendering and logging hooks
//!
//! Observers are notified synchronously from inside the machine's command
//! and frame calls. They only ever see values, never the machine itself.

use ps_stage::StageEvent;

/// Receives stage events and the two audio cues of a spin.
///
/// All methods default to no-ops so an implementor picks what it needs.
///
/// ```ignore
/// struct Sfx;
///
/// impl SpinObserver for Sfx {
///     fn on_spin_start(&mut self) {
///         play("reels_spin");
///     }
///     fn on_spin_settled(&mut self, is_win: bool) {
///         play(if is_win { "win" } else { "lose" });
///     }
/// }
/// ```
pub trait SpinObserver {
    // ═══════════════════════════════════════════════════════════════════════════
    // AUDIO CUES
    // ═══════════════════════════════════════════════════════════════════════════

    /// Stake debited and reels started
    fn on_spin_start(&mut self) {}

    /// Grid published and payout applied; fires exactly once per spin
    fn on_spin_settled(&mut self, _is_win: bool) {}

    // ═══════════════════════════════════════════════════════════════════════════
    // STAGES
    // ═══════════════════════════════════════════════════════════════════════════

    /// Every stage event, in emission order
    fn on_stage(&mut self, _event: &StageEvent) {}
}

/// Writes every stage to the `log` facade at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl SpinObserver for LogObserver {
    fn on_spin_settled(&mut self, is_win: bool) {
        log::debug!("Spin settled: {}", if is_win { "win" } else { "loss" });
    }

    fn on_stage(&mut self, event: &StageEvent) {
        log::debug!("{}", stage_line(event));
    }
}

/// One log line per stage: time, type, category, then win ratio and tags
pub fn stage_line(event: &StageEvent) -> String {
    let mut line = format!(
        "[{:>8.1} ms] {} ({})",
        event.timestamp_ms,
        event.type_name(),
        event.stage.category().display_name()
    );
    if let Some(ratio) = event.payload.calculate_ratio() {
        line.push_str(&format!(" x{:.1}", ratio));
    }
    if !event.tags.is_empty() {
        line.push_str(&format!(" #{}", event.tags.join(" #")));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use ps_stage::{Stage, StagePayload};

    #[test]
    fn test_stage_line_plain() {
        let event = StageEvent::new(Stage::EvaluateWins, 12.5);
        let line = stage_line(&event);
        assert!(line.starts_with("[    12.5 ms] evaluate_wins ("));
        assert!(!line.contains(" x"));
        assert!(!line.contains('#'));
    }

    #[test]
    fn test_stage_line_win_ratio_and_tags() {
        let event = StageEvent::with_payload(
            Stage::WinPresent {
                win_amount: 30,
                line_index: 0,
            },
            3000.0,
            StagePayload::with_win(30, Some(10)),
        )
        .with_tag("forced");
        let line = stage_line(&event);
        assert!(line.contains("win_present"));
        assert!(line.ends_with(" x3.0 #forced"));
    }
}
