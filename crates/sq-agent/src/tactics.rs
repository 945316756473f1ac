//! Macro-policy execution.
//!
//! In [`DecisionMode::MacroPolicy`][crate::DecisionMode] the behavior tree
//! is bypassed: the agent re-selects a [`MacroAction`] every
//! `policy_interval_secs` and carries it out each frame with the same
//! primitives the tree uses.  Dying and flinching still come first.

use sq_behavior::{Behaviors, Status};
use sq_core::geo::{direction_to, planar_distance};
use sq_policy::{MacroAction, PolicyState};
use tracing::debug;

use crate::{Branch, MoveOutcome, NpcAction, NpcContext};

impl NpcContext<'_> {
    /// One frame of macro-policy control.
    pub fn run_macro(&mut self) -> Status {
        let s = &*self.state;
        if !s.is_dead && (s.health <= 0.0 || s.is_dying) {
            return self.act(NpcAction::Die);
        }
        if s.is_taking_damage {
            return self.act(NpcAction::Flinch);
        }

        let action = match self.state.macro_action {
            Some(current) if self.state.policy_timer > 0.0 => current,
            previous => {
                let chosen = self.select_macro();
                self.state.policy_timer = self.policy_interval_secs;
                if previous != Some(chosen) {
                    debug!(agent = %self.state.id, from = ?previous, to = %chosen, "macro action");
                }
                self.state.macro_action = Some(chosen);
                chosen
            }
        };

        match action {
            MacroAction::Attack => {
                self.guard = Branch::Attacking;
                match self.act(NpcAction::Attack) {
                    Status::Failure => {
                        self.hold_position();
                        Status::Running
                    }
                    status => status,
                }
            }
            MacroAction::Advance => {
                self.guard = Branch::Advancing;
                self.act(NpcAction::Chase)
            }
            MacroAction::Retreat => self.act(NpcAction::Retreat),
            MacroAction::Patrol => self.act(NpcAction::Patrol),
        }
    }

    /// Table lookup for the current observations; `Patrol` without a table.
    pub fn select_macro(&self) -> MacroAction {
        let Some(table) = self.policy else {
            return MacroAction::Patrol;
        };
        let s = &*self.state;
        let state = PolicyState::discretize(
            s.is_player_detected,
            s.is_player_visible,
            planar_distance(s.position, self.env.player_position()),
            s.health,
            s.provide_suppression_fire,
        );
        table.select(&state)
    }

    /// Head for a point `retreat_distance` from the player, directly away
    /// from it.
    pub(crate) fn retreat(&mut self) -> Status {
        let player = self.env.player_position();
        let away = direction_to(player, self.state.position);
        let target = player + away * self.tunables.retreat_distance;
        let goal = self.grid.world_to_cell_clamped(target);
        if self.move_toward(goal) == MoveOutcome::Arrived {
            self.hold_position();
        }
        Status::Running
    }
}
