//! Run configuration and behavior tunables.
//!
//! Applications typically load a [`SquadConfig`] from a JSON file (with the
//! `serde` feature) and hand it to `sq_sim::SquadBuilder`.  Every agent in a
//! squad reads the same [`Tunables`].

use crate::{CoreError, CoreResult};

// ── HeuristicKind ─────────────────────────────────────────────────────────────

/// A* distance estimate between two cells.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HeuristicKind {
    /// `|dx| + |dz|`, admissible on a 4-connected unit-cost grid.
    #[default]
    Manhattan,
    /// `(|dx| + |dz|) * min(dx, dz)` with signed deltas.
    ///
    /// Not admissible: it can overestimate, and it is negative whenever the
    /// smaller delta is negative.  Paths found with it are valid but may be
    /// longer than necessary.  Kept so older tuning data can be replayed.
    LegacyProduct,
}

impl HeuristicKind {
    /// Estimate the remaining cost for the signed cell deltas `dx`, `dz`.
    #[inline]
    pub fn estimate(self, dx: i32, dz: i32) -> i32 {
        let manhattan = dx.abs() + dz.abs();
        match self {
            HeuristicKind::Manhattan     => manhattan,
            HeuristicKind::LegacyProduct => manhattan * dx.min(dz),
        }
    }
}

// ── Tunables ──────────────────────────────────────────────────────────────────

/// Per-agent behavior constants shared by the whole squad.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Tunables {
    /// Movement speed in world units per second.
    pub move_speed: f32,

    /// Fraction of a normal step used when the first step attempt is
    /// rejected (obstacle or foreign reservation).
    pub retry_step_scale: f32,

    /// Distance to a cell centre that counts as having arrived.
    pub arrival_radius: f32,

    /// Health strictly below this sends the agent looking for cover.
    pub low_health_threshold: f32,

    /// Starting and maximum health.
    pub max_health: f32,

    /// The player is "in range" when visible within this distance.
    pub detection_range: f32,

    /// Minimum seconds between two shots.
    pub shot_cooldown_secs: f32,

    /// Length of the taking-damage flinch.
    pub flinch_secs: f32,

    /// Length of the dying window before the agent is dead.
    pub dying_secs: f32,

    /// How long suppression fire lasts once raised by an ally's damage.
    pub suppression_secs: f32,

    /// Distance from the player a macro-policy Retreat aims for.
    pub retreat_distance: f32,

    /// Consecutive blocked ticks before the agent re-plans around cells
    /// reserved by others.
    pub max_blocked_ticks: u32,

    /// Weight of distance(cover, player) in the cover score.
    pub cover_player_weight: f32,

    /// Score bonus for cover the player cannot see.
    pub cover_hidden_bonus: f32,

    /// Height above the ground that visibility rays start from.
    pub eye_height: f32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            move_speed:           4.0,
            retry_step_scale:     0.1,
            arrival_radius:       0.15,
            low_health_threshold: 50.0,
            max_health:           100.0,
            detection_range:      30.0,
            shot_cooldown_secs:   1.0,
            flinch_secs:          0.5,
            dying_secs:           2.0,
            suppression_secs:     6.0,
            retreat_distance:     10.0,
            max_blocked_ticks:    8,
            cover_player_weight:  0.5,
            cover_hidden_bonus:   20.0,
            eye_height:           1.6,
        }
    }
}

// ── SquadConfig ───────────────────────────────────────────────────────────────

/// Top-level run configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SquadConfig {
    /// Seconds per frame for fixed-step runs (`Squad::run`).
    pub frame_secs: f32,

    /// Frames to simulate in `Squad::run`.
    pub total_ticks: u64,

    /// Cells per grid side.
    pub grid_size: usize,

    /// World units per cell side.
    pub cell_size: f32,

    /// A* heuristic used by every agent's movement.
    pub heuristic: HeuristicKind,

    /// Seconds between macro-policy decisions.
    pub policy_interval_secs: f32,

    pub tunables: Tunables,
}

impl Default for SquadConfig {
    fn default() -> Self {
        Self {
            frame_secs:           1.0 / 60.0,
            total_ticks:          3_600,
            grid_size:            100,
            cell_size:            1.0,
            heuristic:            HeuristicKind::Manhattan,
            policy_interval_secs: 0.5,
            tunables:             Tunables::default(),
        }
    }
}

impl SquadConfig {
    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.frame_secs > 0.0) {
            return Err(CoreError::Config(format!(
                "frame_secs must be positive, got {}", self.frame_secs
            )));
        }
        if self.grid_size == 0 {
            return Err(CoreError::Config("grid_size must be at least 1".into()));
        }
        if !(self.cell_size > 0.0) {
            return Err(CoreError::Config(format!(
                "cell_size must be positive, got {}", self.cell_size
            )));
        }
        let t = &self.tunables;
        if !(t.move_speed > 0.0) || !(t.retry_step_scale > 0.0 && t.retry_step_scale < 1.0) {
            return Err(CoreError::Config(
                "move_speed must be positive and retry_step_scale in (0, 1)".into(),
            ));
        }
        if t.max_health <= 0.0 {
            return Err(CoreError::Config("max_health must be positive".into()));
        }
        Ok(())
    }
}
