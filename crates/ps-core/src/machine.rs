//! Slot Machine — the game state machine
//!
//! Owns the game state and wires the collaborators together:
//!
//! ```text
//!   spin() ─► WagerController / GameState (debit)
//!          ─► OutcomeGenerator (final grid fixed)
//!          ─► ReelScheduler (reveal, driven by advance/tick)
//!          ─► WinEvaluator (publish grid, credit, back to Idle)
//! ```
//!
//! The machine never reads a clock. The host calls [`SlotMachine::advance`]
//! (or [`SlotMachine::tick`]) from its frame or interval callback.

use ps_stage::{Stage, StageEvent, StagePayload, StageTrace};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::SlotResult;
use crate::evaluator::{Evaluation, WinEvaluator};
use crate::grid::{Grid, REELS};
use crate::observer::SpinObserver;
use crate::outcome::{ForcedOutcome, OutcomeGenerator, SpinOutcome};
use crate::scheduler::ReelScheduler;
use crate::state::{GameState, SpinPhase, StateSnapshot};
use crate::stats::SessionStats;
use crate::wager::{BetDirection, BetResponse, WagerController};

/// Tag on every stage event of a spin started with `spin_forced`
pub const FORCED_TAG: &str = "forced";

/// Tag on stages audio should loop until the matching stop
pub const LOOP_TAG: &str = "loop";

/// Why a spin request was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SpinRejection {
    AlreadySpinning,
    InsufficientBalance { balance: u64, bet: u64 },
}

impl SpinRejection {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::AlreadySpinning => "already_spinning",
            Self::InsufficientBalance { .. } => "insufficient_balance",
        }
    }
}

/// What a spin command did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinResponse {
    Accepted { spin_id: u64 },
    /// No-op; state unchanged
    Rejected(SpinRejection),
}

impl SpinResponse {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderFrame {
    /// Mix of transient and settled symbols while revealing
    pub view_grid: Grid,
    pub winning_line: Option<u8>,
    pub phase: SpinPhase,
}

impl RenderFrame {
    /// Draw the payline marker?
    pub fn show_payline(&self) -> bool {
        self.phase == SpinPhase::Idle && self.winning_line.is_some()
    }
}

/// Single-payline 3×3 slot machine
pub struct SlotMachine<R = ChaCha8Rng> {
    config: GameConfig,
    state: GameState,
    wager: WagerController,
    generator: OutcomeGenerator,
    scheduler: ReelScheduler,
    evaluator: WinEvaluator,
    /// Outcome draws
    rng: R,
    /// Cosmetic reel draws; kept apart so animation never shifts outcomes
    reel_rng: ChaCha8Rng,
    observers: Vec<Box<dyn SpinObserver>>,
    trace: StageTrace,
    clock_ms: f64,
    spin_count: u64,
    /// Current spin came from `spin_forced`
    forced_spin: bool,
    stats: SessionStats,
    last_outcome: Option<SpinOutcome>,
    last_evaluation: Option<Evaluation>,
}

impl SlotMachine<ChaCha8Rng> {
    /// Machine seeded from the OS
    pub fn new(config: GameConfig) -> SlotResult<Self> {
        Self::with_rng(config, ChaCha8Rng::from_os_rng())
    }

    /// Reproducible machine
    pub fn seeded(config: GameConfig, seed: u64) -> SlotResult<Self> {
        Self::with_rng(config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> SlotMachine<R> {
    /// Build a machine around a caller-supplied RNG. Fails fast on invalid
    /// configuration.
    pub fn with_rng(config: GameConfig, mut rng: R) -> SlotResult<Self> {
        config.validate()?;
        let generator = OutcomeGenerator::new(config.win_bias, config.outcome_model)?;
        let reel_rng = ChaCha8Rng::seed_from_u64(rng.next_u64());
        let initial_grid = Grid::filled(config.symbols.first());

        log::info!(
            "Slot machine ready: balance {}, bet {}..={} step {}, bias {}, {:?}",
            config.starting_balance,
            config.bet.min,
            config.bet.max,
            config.bet.step,
            config.win_bias,
            config.outcome_model
        );

        Ok(Self {
            state: GameState::new(config.starting_balance, config.bet.initial, initial_grid),
            wager: WagerController::new(config.bet),
            scheduler: ReelScheduler::new(config.timing, initial_grid),
            evaluator: WinEvaluator::new(config.payout_multiplier),
            generator,
            rng,
            reel_rng,
            observers: Vec::new(),
            trace: StageTrace::new("idle"),
            clock_ms: 0.0,
            spin_count: 0,
            forced_spin: false,
            stats: SessionStats::default(),
            last_outcome: None,
            last_evaluation: None,
            config,
        })
    }

    pub fn add_observer(&mut self, observer: impl SpinObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // READ SURFACE
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Read-only snapshot for UI collaborators
    pub fn state(&self) -> StateSnapshot {
        self.state.snapshot()
    }

    /// Last settled grid (not the animated view)
    pub fn settled_grid(&self) -> &Grid {
        self.state.grid()
    }

    /// Current view grid; equals the settled grid whenever idle
    pub fn view_grid(&self) -> &Grid {
        self.scheduler.view_grid()
    }

    pub fn frame(&self) -> RenderFrame {
        RenderFrame {
            view_grid: *self.scheduler.view_grid(),
            winning_line: self.state.winning_line(),
            phase: self.state.phase(),
        }
    }

    pub fn can_spin(&self) -> bool {
        self.state.can_spin()
    }

    pub fn is_spinning(&self) -> bool {
        self.state.phase() == SpinPhase::Spinning
    }

    /// Reveal progress of the current spin in [0, 1]
    pub fn reveal_progress(&self) -> f64 {
        self.scheduler.progress()
    }

    pub fn spin_count(&self) -> u64 {
        self.spin_count
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = SessionStats::default();
    }

    /// Stage trace of the current or most recent spin
    pub fn last_trace(&self) -> &StageTrace {
        &self.trace
    }

    pub fn last_outcome(&self) -> Option<&SpinOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn last_evaluation(&self) -> Option<&Evaluation> {
        self.last_evaluation.as_ref()
    }

    /// Current configuration as pretty JSON
    pub fn export_config(&self) -> SlotResult<String> {
        self.config.to_json()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // BET COMMANDS
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn increase_bet(&mut self) -> BetResponse {
        self.apply_bet(BetDirection::Up)
    }

    pub fn decrease_bet(&mut self) -> BetResponse {
        self.apply_bet(BetDirection::Down)
    }

    /// `+1` raises, `-1` lowers the stake by one step
    pub fn adjust_bet(&mut self, direction: i32) -> BetResponse {
        match BetDirection::from_step(direction) {
            Some(direction) => self.apply_bet(direction),
            None => BetResponse::Unchanged {
                bet: self.state.bet(),
            },
        }
    }

    fn apply_bet(&mut self, direction: BetDirection) -> BetResponse {
        let response = self.wager.adjust(&mut self.state, direction);
        match response {
            BetResponse::Changed { from, to } => {
                log::debug!("Bet {} -> {}", from, to);
                let event = StageEvent::with_payload(
                    Stage::BetChanged { bet: to },
                    self.clock_ms,
                    StagePayload::new().bet_amount(to).balance(self.state.balance()),
                );
                self.notify(&event);
            }
            BetResponse::Locked => log::debug!("Bet change ignored while spinning"),
            BetResponse::Unchanged { .. } => {}
        }
        response
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SPIN
    // ═══════════════════════════════════════════════════════════════════════════

    /// Start a spin: debit the stake, fix the outcome, start the reveal
    pub fn spin(&mut self) -> SpinResponse {
        self.start_spin(None)
    }

    /// Spin with pinned outcome draws
    pub fn spin_forced(&mut self, forced: ForcedOutcome) -> SpinResponse {
        self.start_spin(Some(forced))
    }

    fn spin_rejection(&self) -> Option<SpinRejection> {
        if self.state.phase() == SpinPhase::Spinning {
            return Some(SpinRejection::AlreadySpinning);
        }
        if self.state.balance() < self.state.bet() {
            return Some(SpinRejection::InsufficientBalance {
                balance: self.state.balance(),
                bet: self.state.bet(),
            });
        }
        None
    }

    fn start_spin(&mut self, forced: Option<ForcedOutcome>) -> SpinResponse {
        if let Some(rejection) = self.spin_rejection() {
            log::debug!("Spin rejected: {}", rejection.reason());
            let event = StageEvent::with_payload(
                Stage::SpinRejected {
                    reason: rejection.reason().to_string(),
                },
                self.clock_ms,
                StagePayload::new()
                    .bet_amount(self.state.bet())
                    .balance(self.state.balance()),
            );
            self.notify(&event);
            return SpinResponse::Rejected(rejection);
        }

        let bet = self.state.bet();
        self.state.begin_spin();
        self.spin_count += 1;
        self.forced_spin = forced.is_some();
        let spin_id = self.spin_count;

        let catalog = &self.config.symbols;
        let outcome = match forced {
            Some(forced) => self.generator.generate_forced(forced, catalog, &mut self.rng),
            None => self.generator.generate(catalog, &mut self.rng),
        };
        self.scheduler.start(outcome, catalog, &mut self.reel_rng);

        log::debug!(
            "Spin #{} started: bet {}, balance {}, payline {:?}{}",
            spin_id,
            bet,
            self.state.balance(),
            outcome.final_grid.payline(),
            if forced.is_some() { " (forced)" } else { "" }
        );

        self.trace = StageTrace::new(format!("spin-{:06}", spin_id))
            .with_spin(spin_id)
            .with_metadata("bet", serde_json::json!(bet))
            .with_metadata("forced", serde_json::json!(forced.is_some()));
        self.emit(
            Stage::SpinStart,
            StagePayload::new()
                .bet_amount(bet)
                .balance(self.state.balance())
                .spin_id(spin_id),
        );
        for reel in 0..REELS {
            self.emit(
                Stage::ReelSpinning {
                    reel_index: reel as u8,
                },
                StagePayload::new().spin_id(spin_id),
            );
        }
        for observer in self.observers.iter_mut() {
            observer.on_spin_start();
        }

        SpinResponse::Accepted { spin_id }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // FRAME DRIVE
    // ═══════════════════════════════════════════════════════════════════════════

    /// Feed elapsed wall time; settles the spin once the reveal completes
    pub fn advance(&mut self, delta_ms: f64) -> SpinPhase {
        if delta_ms.is_finite() && delta_ms > 0.0 {
            self.clock_ms += delta_ms;
        }
        if !self.scheduler.is_revealing() {
            return self.state.phase();
        }

        let step = self
            .scheduler
            .advance(delta_ms, &self.config.symbols, &mut self.reel_rng);
        for col in step.newly_settled {
            let symbols = self.scheduler.view_grid().column(col).to_vec();
            self.emit(
                Stage::ReelStop {
                    reel_index: col as u8,
                    symbols,
                },
                StagePayload::new().spin_id(self.spin_count),
            );
        }
        if step.finished {
            self.settle();
        }
        self.state.phase()
    }

    /// One frame (continuous clock) or one tick (tick clock)
    pub fn tick(&mut self) -> SpinPhase {
        self.advance(self.config.timing.frame_interval_ms())
    }

    /// Play the current reveal out frame by frame and return its evaluation
    pub fn finish_spin(&mut self) -> Option<Evaluation> {
        if !self.scheduler.is_revealing() {
            return None;
        }
        while self.scheduler.is_revealing() {
            self.tick();
        }
        self.last_evaluation
    }

    fn settle(&mut self) {
        let Some(outcome) = self.scheduler.take_outcome() else {
            return;
        };
        let spin_id = self.spin_count;

        self.emit(
            Stage::EvaluateWins,
            StagePayload::new()
                .spin_id(spin_id)
                .reel_grid(outcome.final_grid.to_vec()),
        );

        let evaluation = self.evaluator.settle(&mut self.state, outcome.final_grid);
        self.stats.record(&outcome, &evaluation);

        if let (Some(line), Some(symbol)) = (evaluation.winning_line, evaluation.symbol) {
            self.emit(
                Stage::WinPresent {
                    win_amount: evaluation.win_amount,
                    line_index: line,
                },
                StagePayload::with_win(evaluation.win_amount, Some(evaluation.bet))
                    .symbol_id(symbol)
                    .balance(self.state.balance())
                    .spin_id(spin_id),
            );
        }
        self.emit(
            Stage::SpinSettled {
                is_win: evaluation.is_win(),
            },
            StagePayload::new()
                .balance(self.state.balance())
                .spin_id(spin_id),
        );

        log::debug!(
            "Spin #{} settled: {} (net {}), balance {}{}",
            spin_id,
            if evaluation.is_win() { "win" } else { "loss" },
            evaluation.net(),
            self.state.balance(),
            if outcome.is_accidental_win() { " [accidental]" } else { "" }
        );

        let is_win = evaluation.is_win();
        for observer in self.observers.iter_mut() {
            observer.on_spin_settled(is_win);
        }
        self.last_outcome = Some(outcome);
        self.last_evaluation = Some(evaluation);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // EVENTS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Record into the spin trace and notify observers
    fn emit(&mut self, stage: Stage, payload: StagePayload) {
        let mut event = StageEvent::with_payload(stage, self.clock_ms, payload);
        if event.stage.is_looping() {
            event = event.with_tag(LOOP_TAG);
        }
        if self.forced_spin {
            event = event.with_tag(FORCED_TAG);
        }
        self.notify(&event);
        self.trace.push(event);
    }

    fn notify(&mut self, event: &StageEvent) {
        for observer in self.observers.iter_mut() {
            observer.on_stage(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::RevealTiming;

    fn machine(timing: RevealTiming) -> SlotMachine {
        let config = GameConfig {
            timing,
            ..Default::default()
        };
        SlotMachine::seeded(config, 7).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let m = machine(RevealTiming::continuous());
        let state = m.state();
        assert_eq!(state.balance, 1000);
        assert_eq!(state.bet, 10);
        assert_eq!(state.phase, SpinPhase::Idle);
        assert_eq!(state.winning_line, None);
        assert!(state.can_spin);
        assert_eq!(m.view_grid(), &Grid::filled(1));
    }

    #[test]
    fn test_spin_debits_immediately() {
        let mut m = machine(RevealTiming::continuous());
        assert_eq!(m.spin(), SpinResponse::Accepted { spin_id: 1 });
        assert_eq!(m.state().balance, 990);
        assert!(m.is_spinning());
        assert!(!m.can_spin());
    }

    #[test]
    fn test_advance_settles_after_duration() {
        let mut m = machine(RevealTiming::continuous());
        m.spin_forced(ForcedOutcome::Win);

        assert_eq!(m.advance(2999.0), SpinPhase::Spinning);
        assert_eq!(m.advance(1.0), SpinPhase::Idle);
        assert_eq!(m.state().balance, 1020);
        assert_eq!(m.view_grid(), m.settled_grid());
    }

    #[test]
    fn test_finish_spin_when_idle() {
        let mut m = machine(RevealTiming::instant());
        assert!(m.finish_spin().is_none());
        m.spin();
        assert!(m.finish_spin().is_some());
        assert_eq!(m.state().phase, SpinPhase::Idle);
    }

    #[test]
    fn test_frame_hides_payline_while_spinning() {
        let mut m = machine(RevealTiming::continuous());
        m.spin_forced(ForcedOutcome::Win);
        assert!(!m.frame().show_payline());
        m.finish_spin();
        assert!(m.frame().show_payline());
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let config = GameConfig {
            win_bias: 2.0,
            ..Default::default()
        };
        assert!(SlotMachine::seeded(config, 1).is_err());
    }

    #[test]
    fn test_trace_metadata() {
        let mut m = machine(RevealTiming::instant());
        m.increase_bet();
        m.spin_forced(ForcedOutcome::Lose);
        let trace = m.last_trace();
        assert_eq!(trace.trace_id, "spin-000001");
        assert_eq!(trace.metadata.get("bet"), Some(&serde_json::json!(20)));
        assert_eq!(trace.metadata.get("forced"), Some(&serde_json::json!(true)));
    }

    #[test]
    fn test_forced_spin_events_are_tagged() {
        let mut m = machine(RevealTiming::instant());
        m.spin_forced(ForcedOutcome::Win);
        m.finish_spin();
        let trace = m.last_trace();
        assert!(!trace.is_empty());
        assert!(trace.events.iter().all(|e| e.tags.iter().any(|t| t == FORCED_TAG)));

        m.spin();
        m.finish_spin();
        let trace = m.last_trace();
        assert!(trace.events.iter().all(|e| !e.tags.iter().any(|t| t == FORCED_TAG)));
        for event in &trace.events {
            let looped = event.tags.iter().any(|t| t == LOOP_TAG);
            assert_eq!(looped, event.type_name() == "reel_spinning");
        }
    }

    #[test]
    fn test_adjust_bet_zero_is_noop() {
        let mut m = machine(RevealTiming::instant());
        assert_eq!(m.adjust_bet(0), BetResponse::Unchanged { bet: 10 });
        assert!(m.adjust_bet(1).is_changed());
        assert_eq!(m.state().bet, 20);
    }
}
