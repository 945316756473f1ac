//! `NpcContext`: one agent's view of the world for the length of its update.
//!
//! The context mutably borrows the agent's own state and the shared grid,
//! and holds the rest of the squad through a [`SubscriberSet`] so events it
//! publishes are handled by the other agents before the call returns.

use sq_behavior::{Behaviors, Status};
use sq_core::geo::{at_eye_height, planar_distance};
use sq_core::Tunables;
use sq_event::{EventBus, SquadEvent, SubscriberSet};
use sq_policy::PolicyTable;
use sq_spatial::{Grid, Pathfinder};
use tracing::{debug, info, trace};

use crate::cover::score_cover_excluding;
use crate::{
    AgentState, AnimationState, Branch, Environment, MoveOutcome, NpcAction, NpcCondition, World,
};

pub struct NpcContext<'a> {
    pub state:      &'a mut AgentState,
    pub grid:       &'a mut Grid,
    pub bus:        &'a EventBus<AgentState>,
    pub roster:     &'a mut dyn SubscriberSet<AgentState>,
    pub env:        &'a mut dyn Environment,
    pub pathfinder: &'a dyn Pathfinder,
    pub policy:     Option<&'a PolicyTable>,
    pub tunables:   &'a Tunables,
    /// Seconds between macro-policy decisions.
    pub policy_interval_secs: f32,
    /// Frame duration.
    pub dt: f32,
    /// Branch whose guard condition most recently passed.
    pub(crate) guard: Branch,
}

impl<'a> NpcContext<'a> {
    /// Borrow `state` and the shared `world` for one update of `dt` seconds.
    pub fn new(
        state: &'a mut AgentState,
        world: &'a mut World<'_>,
        roster: &'a mut dyn SubscriberSet<AgentState>,
        env: &'a mut dyn Environment,
        dt: f32,
    ) -> Self {
        let guard = state.branch;
        Self {
            state,
            grid:                 &mut *world.grid,
            bus:                  world.bus,
            roster,
            env,
            pathfinder:           world.pathfinder,
            policy:               world.policy,
            tunables:             world.tunables,
            policy_interval_secs: world.policy_interval_secs,
            dt,
            guard,
        }
    }
}

impl NpcContext<'_> {
    // ── Perception ────────────────────────────────────────────────────────

    /// Refresh visibility of the player and latch detection.
    ///
    /// Publishes `PlayerDetected` on the first frame the player is seen.
    pub fn perceive(&mut self) {
        if !self.state.is_alive() {
            self.state.is_player_visible = false;
            return;
        }
        let player = self.env.player_position();
        let origin = at_eye_height(self.state.position, self.tunables.eye_height);
        let direction = (player - origin).normalize_or_zero();
        let hit = self.env.cast_ray(origin, direction, self.state.id);
        let distance = planar_distance(self.state.position, player);

        self.state.is_player_visible = hit.visible && distance <= self.tunables.detection_range;
        if self.state.is_player_visible && !self.state.is_player_detected {
            self.state.is_player_detected = true;
            debug!(agent = %self.state.id, distance, "player detected");
            self.publish(SquadEvent::PlayerDetected(self.state.id));
        }
    }

    // ── Events ────────────────────────────────────────────────────────────

    /// Deliver `event` to the rest of the squad now.
    pub fn publish(&mut self, event: SquadEvent) -> usize {
        self.bus.publish(&event, &mut *self.roster)
    }

    // ── Branches ──────────────────────────────────────────────────────────

    /// Switch the active branch.  No-op when already in `branch`.
    ///
    /// Leaving a branch drops every reservation except the current cell
    /// and plays the new branch's animation.
    pub fn enter_branch(&mut self, branch: Branch) {
        let from = self.state.branch;
        if from == branch {
            return;
        }
        debug!(agent = %self.state.id, %from, to = %branch, "branch");
        self.state.branch = branch;
        self.state.is_patrolling = branch == Branch::Patrolling;
        if !matches!(branch, Branch::Attacking | Branch::InCover | Branch::Suppressing) {
            self.state.is_attacking = false;
        }
        if from == Branch::SeekingCover {
            self.state.is_seeking_cover = false;
        }
        if !matches!(branch, Branch::Dying | Branch::Dead) {
            self.hold_position();
        }
        if let Some(animation) = branch.animation() {
            self.env.play_animation(self.state.id, animation);
        }
    }

    // ── Actions ───────────────────────────────────────────────────────────

    fn die(&mut self) -> Status {
        let id = self.state.id;
        if !self.state.is_dying && !self.state.is_dead {
            self.state.is_dying = true;
            self.state.dying_timer = self.tunables.dying_secs;
            self.state.is_attacking = false;
            self.state.is_in_cover = false;
            self.state.is_taking_cover = false;
            self.state.current_path.clear();
            self.release_all();
            info!(agent = %id, "dying");
            return Status::Running;
        }
        if self.state.dying_timer > 0.0 {
            return Status::Running;
        }
        self.state.is_dying = false;
        self.state.is_dead = true;
        self.enter_branch(Branch::Dead);
        info!(agent = %id, "dead");
        self.publish(SquadEvent::NpcDied(id));
        Status::Success
    }

    fn flinch(&mut self) -> Status {
        if self.state.flinch_timer > 0.0 {
            return Status::Running;
        }
        self.state.is_taking_damage = false;
        Status::Success
    }

    fn pick_cover(&mut self) -> Status {
        let id = self.state.id;
        if let Some(cover) = self.state.selected_cover {
            let still_free = self
                .grid
                .cover(cover)
                .is_some_and(|loc| !self.grid.is_occupied_by_other(loc.cell, id));
            if still_free {
                return Status::Success;
            }
            self.state.selected_cover = None;
        }

        let player = self.env.player_position();
        let best = score_cover_excluding(
            &*self.grid,
            id,
            self.state.position,
            player,
            &*self.env,
            self.tunables,
            &self.state.unreachable_covers,
        );
        match best {
            Some(cover) => {
                self.state.selected_cover = Some(cover);
                self.state.is_seeking_cover = true;
                if let Some(loc) = self.grid.cover(cover) {
                    debug!(agent = %id, %cover, cell = %loc.cell, "cover selected");
                }
                Status::Success
            }
            None => {
                self.state.is_seeking_cover = false;
                Status::Failure
            }
        }
    }

    fn move_to_cover(&mut self) -> Status {
        let id = self.state.id;
        let Some(cover) = self.state.selected_cover else {
            return Status::Failure;
        };
        let Some(loc) = self.grid.cover(cover).copied() else {
            return Status::Failure;
        };
        if self.grid.is_occupied_by_other(loc.cell, id) {
            debug!(agent = %id, cell = %loc.cell, "cover taken");
            self.state.selected_cover = None;
            return Status::Failure;
        }
        match self.move_toward(loc.cell) {
            MoveOutcome::Arrived => Status::Success,
            MoveOutcome::Moving | MoveOutcome::Blocked => Status::Running,
            MoveOutcome::NoPath => {
                debug!(agent = %id, %cover, cell = %loc.cell, "cover unreachable");
                self.state.unreachable_covers.push(cover);
                self.state.selected_cover = None;
                self.state.is_seeking_cover = false;
                Status::Failure
            }
        }
    }

    fn enter_cover(&mut self) -> Status {
        self.state.is_in_cover = true;
        self.state.is_taking_cover = true;
        self.state.is_seeking_cover = false;
        self.state.unreachable_covers.clear();
        self.publish(SquadEvent::NpcTakingCover(self.state.id));
        Status::Success
    }

    fn hold_cover(&mut self) -> Status {
        if self.state.provide_suppression_fire {
            return Status::Success;
        }
        self.hold_position();
        Status::Running
    }

    pub(crate) fn attack(&mut self) -> Status {
        if !self.state.is_player_visible {
            self.state.is_attacking = false;
            return Status::Failure;
        }
        self.state.is_attacking = true;
        self.hold_position();
        if self.state.shot_cooldown <= 0.0 {
            let id = self.state.id;
            self.state.shot_cooldown = self.tunables.shot_cooldown_secs;
            self.state.shots_fired += 1;
            self.env.play_animation(id, AnimationState::Shoot);
            self.env.play_sound(id, "gunshot");
            trace!(agent = %id, shots = self.state.shots_fired, "fire");
        }
        Status::Running
    }

    fn chase(&mut self) -> Status {
        if self.state.is_player_visible {
            return Status::Success;
        }
        let goal = self.grid.world_to_cell_clamped(self.env.player_position());
        self.move_toward(goal);
        Status::Running
    }

    fn patrol(&mut self) -> Status {
        let count = self.state.waypoints.len();
        if count == 0 {
            return Status::Failure;
        }
        self.state.is_patrolling = true;
        let index = self.state.waypoint_index % count;
        let goal = self.grid.world_to_cell_clamped(self.state.waypoints[index]);
        match self.move_toward(goal) {
            MoveOutcome::Arrived => {
                self.state.waypoint_index = (index + 1) % count;
                trace!(agent = %self.state.id, next = self.state.waypoint_index, "waypoint reached");
            }
            // Unreachable waypoint: skip it.
            MoveOutcome::NoPath => {
                self.state.waypoint_index = (index + 1) % count;
                debug!(agent = %self.state.id, %goal, "waypoint unreachable");
            }
            MoveOutcome::Moving | MoveOutcome::Blocked => {}
        }
        Status::Running
    }
}

// ── Behaviors ─────────────────────────────────────────────────────────────────

impl Behaviors for NpcContext<'_> {
    type Condition = NpcCondition;
    type Action    = NpcAction;

    fn check(&mut self, condition: NpcCondition) -> bool {
        let s = &*self.state;
        let low_health = s.health < self.tunables.low_health_threshold;
        let (passed, guard) = match condition {
            NpcCondition::IsDeadOrDying => {
                (!s.is_dead && (s.health <= 0.0 || s.is_dying), Some(Branch::Dying))
            }
            NpcCondition::IsTakingDamage => {
                (s.is_alive() && s.is_taking_damage, Some(Branch::TakingDamage))
            }
            NpcCondition::ShouldSeekCover => (
                s.is_alive() && !s.is_in_cover && !s.provide_suppression_fire && low_health,
                Some(Branch::SeekingCover),
            ),
            NpcCondition::IsInCover => (s.is_alive() && s.is_in_cover, Some(Branch::InCover)),
            NpcCondition::IsSuppressing => {
                (s.is_alive() && s.provide_suppression_fire, Some(Branch::Suppressing))
            }
            NpcCondition::PlayerDetected => (s.is_player_detected, Some(Branch::Attacking)),
            NpcCondition::PlayerVisible => (s.is_player_visible, None),
            NpcCondition::ShouldPatrol => (
                s.is_alive() && !s.is_player_visible && !low_health && !s.is_attacking,
                Some(Branch::Patrolling),
            ),
        };
        if passed {
            if let Some(branch) = guard {
                self.guard = branch;
            }
        }
        passed
    }

    fn act(&mut self, action: NpcAction) -> Status {
        let branch = match action {
            NpcAction::Die => Branch::Dying,
            NpcAction::Flinch => Branch::TakingDamage,
            NpcAction::PickCover | NpcAction::MoveToCover | NpcAction::EnterCover => {
                Branch::SeekingCover
            }
            NpcAction::HoldCover => Branch::InCover,
            NpcAction::Patrol => Branch::Patrolling,
            NpcAction::Retreat => Branch::Retreating,
            NpcAction::Attack | NpcAction::Chase => self.guard,
        };
        if !self.state.is_dead {
            self.enter_branch(branch);
        }

        let status = match action {
            NpcAction::Die         => self.die(),
            NpcAction::Flinch      => self.flinch(),
            NpcAction::PickCover   => self.pick_cover(),
            NpcAction::MoveToCover => self.move_to_cover(),
            NpcAction::EnterCover  => self.enter_cover(),
            NpcAction::HoldCover   => self.hold_cover(),
            NpcAction::Attack      => self.attack(),
            NpcAction::Chase       => self.chase(),
            NpcAction::Patrol      => self.patrol(),
            NpcAction::Retreat     => self.retreat(),
        };
        trace!(agent = %self.state.id, ?action, %status, "act");
        status
    }
}
