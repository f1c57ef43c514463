//! # ps-stage — Piano Slots Stage System
//!
//! Defines the canonical phases a spin passes through. The game core emits
//! them; renderers and audio collaborators listen to them.
//!
//! ## Spin lifecycle
//!
//! ```text
//! SpinStart → ReelSpinning ×3 → ReelStop 0 → ReelStop 1 → ReelStop 2
//!           → EvaluateWins → (WinPresent) → SpinSettled
//! ```
//!
//! UI commands outside a spin surface as `BetChanged` or `SpinRejected`.

pub mod event;
pub mod stage;
pub mod trace;

pub use event::*;
pub use stage::*;
pub use trace::*;
