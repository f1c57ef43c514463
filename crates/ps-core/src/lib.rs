//! # ps-core — Piano Slots game core
//!
//! A single-payline 3×3 slot machine. The outcome of a spin is decided the
//! moment the spin is accepted; the reel reveal that follows is cosmetic and
//! the payout is computed only after the last reel stops.
//!
//! ## Features
//!
//! - **Wager Controller**: stake levels 10..=100 in steps of 10, locked while spinning
//! - **Outcome Generator**: win-biased final grid, verdict recomputed from the payline
//! - **Reel Scheduler**: staggered left-to-right reveal, frame- or tick-driven
//! - **Win Evaluator**: three of a kind on the middle row pays bet × 3
//! - **Stage Events**: every transition surfaces as a `ps_stage::StageEvent`
//!
//! ## Architecture
//!
//! ```text
//! SlotMachine
//!     │
//!     ├── GameState (balance, bet, phase, winning line)
//!     ├── WagerController (BetRules)
//!     ├── OutcomeGenerator (SymbolCatalog, win bias)
//!     ├── ReelScheduler (RevealTiming, view grid)
//!     └── WinEvaluator (payout multiplier)
//!           │
//!           v
//!     StageEvent → SpinObserver (audio, renderer, logging)
//! ```

pub mod config;
pub mod error;
pub mod evaluator;
pub mod grid;
pub mod machine;
pub mod observer;
pub mod outcome;
pub mod scheduler;
pub mod state;
pub mod stats;
pub mod symbols;
pub mod timing;
pub mod wager;

pub use config::*;
pub use error::*;
pub use evaluator::*;
pub use grid::*;
pub use machine::*;
pub use observer::*;
pub use outcome::*;
pub use scheduler::*;
pub use state::*;
pub use stats::*;
pub use symbols::*;
pub use timing::*;
pub use wager::*;
