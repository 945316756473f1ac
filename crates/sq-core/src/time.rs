//! Simulation time model.
//!
//! The squad advances in frames.  Each frame has a `Tick` number (used for
//! logging and observer callbacks) and a delta time in seconds (used by the
//! agents' timers and movement).  A fixed-step run uses the same delta every
//! frame:
//!
//!   elapsed_secs = Σ frame deltas   (= tick * frame_secs for fixed steps)
//!
//! Frame deltas stay `f32` because they come straight from the game loop.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute frame counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SquadClock ────────────────────────────────────────────────────────────────

/// Tracks the current frame and the accumulated simulated time.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SquadClock {
    /// The frame being (or about to be) processed.
    pub current_tick: Tick,
    /// Simulated seconds accumulated over all completed frames.
    pub elapsed_secs: f32,
}

impl SquadClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close the current frame, which lasted `dt` seconds.
    #[inline]
    pub fn advance(&mut self, dt: f32) {
        self.current_tick = self.current_tick + 1;
        self.elapsed_secs += dt.max(0.0);
    }

    /// Break elapsed time into (minutes, seconds) for log lines.
    pub fn elapsed_ms(&self) -> (u32, f32) {
        let total = self.elapsed_secs.max(0.0);
        let minutes = (total / 60.0).floor();
        (minutes as u32, total - minutes * 60.0)
    }
}

impl fmt::Display for SquadClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (m, s) = self.elapsed_ms();
        write!(f, "{} ({:02}:{:05.2})", self.current_tick, m, s)
    }
}
