//! Per-agent mutable state.

use std::fmt;

use sq_core::{AgentId, CoverId, Tunables, Vec3};
use sq_policy::MacroAction;
use sq_spatial::CellCoord;

use crate::AnimationState;

// ── Branch ────────────────────────────────────────────────────────────────────

/// Which part of the decision logic currently drives the agent.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Branch {
    #[default]
    Idle,
    Dying,
    Dead,
    TakingDamage,
    SeekingCover,
    InCover,
    Suppressing,
    Attacking,
    Patrolling,
    Advancing,
    Retreating,
}

impl Branch {
    /// Human-readable label for debug overlays.
    pub fn label(self) -> &'static str {
        match self {
            Branch::Idle         => "Idle",
            Branch::Dying        => "Dying",
            Branch::Dead         => "Dead",
            Branch::TakingDamage => "Taking Damage",
            Branch::SeekingCover => "Seeking Cover",
            Branch::InCover      => "In Cover",
            Branch::Suppressing  => "Suppression Fire",
            Branch::Attacking    => "Attacking",
            Branch::Patrolling   => "Patrolling",
            Branch::Advancing    => "Advancing",
            Branch::Retreating   => "Retreating",
        }
    }

    /// Animation played when the branch is entered; `None` keeps whatever
    /// is running.
    pub fn animation(self) -> Option<AnimationState> {
        match self {
            Branch::Idle         => Some(AnimationState::Idle),
            Branch::Dying        => Some(AnimationState::Dying),
            Branch::Dead         => None,
            Branch::TakingDamage => Some(AnimationState::Hit),
            Branch::SeekingCover
            | Branch::Advancing
            | Branch::Retreating => Some(AnimationState::Run),
            Branch::InCover      => Some(AnimationState::Crouch),
            Branch::Suppressing
            | Branch::Attacking  => Some(AnimationState::Aim),
            Branch::Patrolling   => Some(AnimationState::Walk),
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── AgentState ────────────────────────────────────────────────────────────────

/// Everything one NPC knows and remembers between frames.
///
/// Written only by the agent's own update, its own conditions and actions,
/// and its own event handlers.
#[derive(Clone, Debug)]
pub struct AgentState {
    pub id:       AgentId,
    pub position: Vec3,
    pub health:   f32,

    // ── Flags ─────────────────────────────────────────────────────────────
    /// Latched the first time the player is seen.
    pub is_player_detected:       bool,
    /// Line of sight to the player within detection range, this frame.
    pub is_player_visible:        bool,
    pub is_in_cover:              bool,
    pub is_seeking_cover:         bool,
    pub is_taking_cover:          bool,
    pub is_attacking:             bool,
    pub is_patrolling:            bool,
    pub provide_suppression_fire: bool,
    pub is_dead:                  bool,
    pub is_dying:                 bool,
    pub is_taking_damage:         bool,

    // ── Navigation ────────────────────────────────────────────────────────
    /// Last path computed by movement, start cell first.
    pub current_path:   Vec<CellCoord>,
    /// Index into `current_path` of the cell being stepped into.
    pub path_index:     usize,
    /// Cells held on the grid: the current cell, plus at most one ahead.
    pub reserved:       Vec<CellCoord>,
    pub selected_cover: Option<CoverId>,
    /// Covers found unreachable since the agent last entered cover.
    pub unreachable_covers: Vec<CoverId>,
    pub waypoints:      Vec<Vec3>,
    pub waypoint_index: usize,
    /// Consecutive frames a step was refused.
    pub blocked_ticks:  u32,
    /// Side cell the agent is stepping into to let a head-on agent pass.
    pub give_way:       Option<CellCoord>,

    // ── Timers (seconds remaining) ────────────────────────────────────────
    pub flinch_timer:      f32,
    pub dying_timer:       f32,
    pub shot_cooldown:     f32,
    pub suppression_timer: f32,
    pub policy_timer:      f32,

    // ── Bookkeeping ───────────────────────────────────────────────────────
    pub branch:       Branch,
    pub macro_action: Option<MacroAction>,
    pub dead_allies:  u32,
    pub shots_fired:  u32,
}

impl AgentState {
    pub fn new(id: AgentId, position: Vec3, tunables: &Tunables) -> Self {
        Self {
            id,
            position,
            health: tunables.max_health,
            is_player_detected: false,
            is_player_visible: false,
            is_in_cover: false,
            is_seeking_cover: false,
            is_taking_cover: false,
            is_attacking: false,
            is_patrolling: false,
            provide_suppression_fire: false,
            is_dead: false,
            is_dying: false,
            is_taking_damage: false,
            current_path: Vec::new(),
            path_index: 0,
            reserved: Vec::new(),
            selected_cover: None,
            unreachable_covers: Vec::new(),
            waypoints: Vec::new(),
            waypoint_index: 0,
            blocked_ticks: 0,
            give_way: None,
            flinch_timer: 0.0,
            dying_timer: 0.0,
            shot_cooldown: 0.0,
            suppression_timer: 0.0,
            policy_timer: 0.0,
            branch: Branch::Idle,
            macro_action: None,
            dead_allies: 0,
            shots_fired: 0,
        }
    }

    /// Alive and not on the way out.
    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.is_dead && !self.is_dying && self.health > 0.0
    }

    #[inline]
    pub fn state_label(&self) -> &'static str {
        self.branch.label()
    }

    /// Step down every countdown by `dt`.
    pub fn advance_timers(&mut self, dt: f32) {
        self.shot_cooldown = (self.shot_cooldown - dt).max(0.0);
        self.policy_timer = (self.policy_timer - dt).max(0.0);
        if self.is_taking_damage {
            self.flinch_timer = (self.flinch_timer - dt).max(0.0);
        }
        if self.is_dying {
            self.dying_timer = (self.dying_timer - dt).max(0.0);
        }
        if self.provide_suppression_fire {
            self.suppression_timer -= dt;
            if self.suppression_timer <= 0.0 {
                self.suppression_timer = 0.0;
                self.provide_suppression_fire = false;
            }
        }
    }

    /// Apply a hit: lose health and start flinching.
    pub fn take_damage(&mut self, amount: f32, tunables: &Tunables) {
        self.health = (self.health - amount).max(0.0);
        self.is_taking_damage = true;
        self.flinch_timer = tunables.flinch_secs;
    }
}
