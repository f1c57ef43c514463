//! Reveal timing profiles
//!
//! Column `c` settles at progress `1 - (REELS - 1 - c) * column_stagger`, so
//! reels stop left to right and the last one stops exactly when the reveal
//! ends.

use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};
use crate::grid::REELS;

/// Frame interval used when a continuous clock is ticked (60 fps)
pub const FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0;

/// How elapsed time reaches the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RevealClock {
    /// Progress follows elapsed time directly (animation-frame driven)
    #[default]
    Continuous,
    /// Progress moves in whole ticks of `interval_ms` (interval-timer driven)
    Ticks { interval_ms: f64 },
}

/// Reveal timing configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevealTiming {
    pub clock: RevealClock,

    /// Spin start to final reel stop (ms)
    pub total_duration_ms: f64,

    /// Progress fraction between consecutive reel stops
    pub column_stagger: f64,
}

impl RevealTiming {
    /// 3 s frame-driven reveal
    pub fn continuous() -> Self {
        Self {
            clock: RevealClock::Continuous,
            total_duration_ms: 3000.0,
            column_stagger: 0.2,
        }
    }

    /// 20 ticks of 100 ms
    pub fn ticks() -> Self {
        Self {
            clock: RevealClock::Ticks { interval_ms: 100.0 },
            total_duration_ms: 2000.0,
            column_stagger: 0.2,
        }
    }

    /// Zero-length reveal for headless runs; all reels stop on the first frame
    pub fn instant() -> Self {
        Self {
            clock: RevealClock::Continuous,
            total_duration_ms: 0.0,
            column_stagger: 0.2,
        }
    }

    /// Scale durations by factor (< 1.0 = faster)
    pub fn scaled(&self, factor: f64) -> Self {
        let clock = match self.clock {
            RevealClock::Continuous => RevealClock::Continuous,
            RevealClock::Ticks { interval_ms } => RevealClock::Ticks {
                interval_ms: interval_ms * factor,
            },
        };
        Self {
            clock,
            total_duration_ms: self.total_duration_ms * factor,
            column_stagger: self.column_stagger,
        }
    }

    pub fn validate(&self) -> SlotResult<()> {
        if !self.total_duration_ms.is_finite() || self.total_duration_ms < 0.0 {
            return Err(SlotError::InvalidTiming(format!(
                "total duration must be finite and non-negative, got {}",
                self.total_duration_ms
            )));
        }
        // Leftmost reel must settle strictly after the start.
        let max_stagger = 1.0 / (REELS - 1) as f64;
        if !(self.column_stagger > 0.0 && self.column_stagger < max_stagger) {
            return Err(SlotError::InvalidTiming(format!(
                "column stagger must be within (0, {:.3}), got {}",
                max_stagger, self.column_stagger
            )));
        }
        if let RevealClock::Ticks { interval_ms } = self.clock {
            if !interval_ms.is_finite() || interval_ms <= 0.0 {
                return Err(SlotError::InvalidTiming(format!(
                    "tick interval must be positive, got {}",
                    interval_ms
                )));
            }
            // Coarser ticks would stop several reels on the same tick.
            let stop_gap_ms = self.column_stagger * self.total_duration_ms;
            if self.total_duration_ms > 0.0 && interval_ms > stop_gap_ms {
                return Err(SlotError::InvalidTiming(format!(
                    "tick interval {} exceeds the {} ms gap between reel stops",
                    interval_ms, stop_gap_ms
                )));
            }
        }
        Ok(())
    }

    /// Progress fraction at which `col` settles
    pub fn column_threshold(&self, col: usize) -> f64 {
        1.0 - (REELS - 1 - col) as f64 * self.column_stagger
    }

    /// Elapsed time at which `col` settles
    pub fn column_settle_ms(&self, col: usize) -> f64 {
        self.column_threshold(col) * self.total_duration_ms
    }

    /// Reveal progress in [0, 1]; a zero-length reveal is always complete
    pub fn progress(&self, elapsed_ms: f64) -> f64 {
        if self.total_duration_ms <= 0.0 {
            return 1.0;
        }
        (elapsed_ms / self.total_duration_ms).clamp(0.0, 1.0)
    }

    /// Ticks needed to finish, for tick clocks
    pub fn tick_count(&self) -> Option<u32> {
        match self.clock {
            RevealClock::Continuous => None,
            RevealClock::Ticks { interval_ms } => {
                Some((self.total_duration_ms / interval_ms).ceil() as u32)
            }
        }
    }

    /// Natural step for one `tick()` of the machine
    pub fn frame_interval_ms(&self) -> f64 {
        match self.clock {
            RevealClock::Continuous => FRAME_INTERVAL_MS,
            RevealClock::Ticks { interval_ms } => interval_ms,
        }
    }
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self::continuous()
    }
}
