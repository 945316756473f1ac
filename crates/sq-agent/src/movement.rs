//! Cell-by-cell movement with reservations.
//!
//! # Reservation protocol
//!
//! An agent holds the cell it stands in and at most one more: the next
//! cell on its path.  Each call to [`NpcContext::move_toward`]:
//!
//! 1. plans from the current cell (paths are not cached);
//! 2. releases every held cell except the current one and the next one;
//! 3. tries to reserve the next cell;
//! 4. steps `move_speed * dt` toward the next cell's centre.  A step that
//!    stays in the current cell is always taken; a step into the next cell
//!    needs the reservation, and entering vacates the previous cell;
//! 5. a refused step is retried at `retry_step_scale` of its length, and if
//!    that also crosses, the agent stays put and counts a blocked tick.
//!
//! After `max_blocked_ticks` consecutive blocked ticks the planner routes
//! around cells held by other agents until the agent enters a new cell.
//!
//! # Giving way
//!
//! When no detour exists and the blocker wants the agent's own cell, the
//! two are head-on.  One of them steps into a free side cell off the
//! other's remaining path: the only one that has such a cell, or the
//! higher id when both do.  If neither has one, the higher id backs off
//! into any free neighbour.  Both agents reach the same verdict from the
//! same grid, so exactly one moves.
//!
//! Two adjacent cells always form a convex rectangle, so a step toward the
//! next cell's centre can only land in the current or the next cell.

use sq_core::geo::planar_distance;
use sq_core::{AgentId, Vec3};
use sq_event::SubscriberSet;
use sq_spatial::{CellCoord, GridPath};
use tracing::{debug, trace};

use crate::NpcContext;

/// Result of one movement step.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum MoveOutcome {
    /// Within `arrival_radius` of the goal cell's centre.
    Arrived,
    Moving,
    /// The step was refused; the agent did not move.
    Blocked,
    /// No path to the goal; the agent did not move.
    NoPath,
}

impl NpcContext<'_> {
    /// Cell the agent currently stands in.
    pub fn current_cell(&self) -> CellCoord {
        self.grid.world_to_cell_clamped(self.state.position)
    }

    /// Take one step toward `goal`.
    pub fn move_toward(&mut self, goal: CellCoord) -> MoveOutcome {
        let current = self.current_cell();
        self.claim(current);

        if let Some(side) = self.state.give_way {
            if side != current {
                return self.step_aside(current, side);
            }
            self.state.give_way = None;
        }

        if current == goal {
            self.release_except(&[current]);
            self.state.current_path = vec![goal];
            self.state.path_index = 0;
            let centre = self.grid.cell_to_world(goal);
            if planar_distance(self.state.position, centre) <= self.tunables.arrival_radius {
                self.state.blocked_ticks = 0;
                return MoveOutcome::Arrived;
            }
            let step = self.tunables.move_speed * self.dt;
            self.state.position = self.grid.clamp_world(step_toward(self.state.position, centre, step));
            trace!(agent = %self.state.id, cell = %current, "settle");
            return MoveOutcome::Moving;
        }

        let path = self.plan(current, goal);
        if path.len() < 2 {
            self.release_except(&[current]);
            self.state.current_path.clear();
            self.state.path_index = 0;
            trace!(agent = %self.state.id, from = %current, to = %goal, "no path");
            return MoveOutcome::NoPath;
        }

        let next = path.cells[1];
        if self.state.current_path != path.cells {
            self.release_except(&[current]);
        }
        self.state.current_path = path.into_cells();
        self.state.path_index = 1;

        let ahead = self.claim(next);
        self.release_except(&[current, next]);

        let full = self.tunables.move_speed * self.dt;
        if self.try_step(current, next, ahead, full)
            || self.try_step(current, next, ahead, full * self.tunables.retry_step_scale)
        {
            return MoveOutcome::Moving;
        }

        self.state.blocked_ticks += 1;
        trace!(agent = %self.state.id, cell = %current, next = %next, blocked = self.state.blocked_ticks, "blocked");
        if self.state.blocked_ticks > self.tunables.max_blocked_ticks {
            if let Some(side) = self.give_way_cell(current, next) {
                debug!(agent = %self.state.id, cell = %current, %side, "giving way");
                self.state.give_way = Some(side);
                return self.step_aside(current, side);
            }
        }
        MoveOutcome::Blocked
    }

    /// Drop every reservation except the current cell.
    pub fn hold_position(&mut self) {
        self.state.give_way = None;
        let current = self.current_cell();
        self.claim(current);
        self.release_except(&[current]);
    }

    /// Drop every reservation, current cell included.
    pub fn release_all(&mut self) {
        self.release_except(&[]);
    }

    fn plan(&self, current: CellCoord, goal: CellCoord) -> GridPath {
        let grid = &*self.grid;
        if self.state.blocked_ticks >= self.tunables.max_blocked_ticks {
            let id = self.state.id;
            let detour = self
                .pathfinder
                .find_path_avoiding(grid, current, goal, &|c| grid.is_occupied_by_other(c, id));
            if !detour.is_empty() {
                return detour;
            }
        }
        self.pathfinder.find_path(grid, current, goal)
    }

    /// Cell to step into so a head-on agent holding `next` can pass, or
    /// `None` if this agent should keep waiting.
    fn give_way_cell(&mut self, current: CellCoord, next: CellCoord) -> Option<CellCoord> {
        let id = self.state.id;
        let other = self.grid.occupant(next).filter(|&o| o != id)?;
        let (their_path, their_index) = {
            let s = self.roster.state_mut(other)?;
            (s.current_path.clone(), s.path_index)
        };
        let theirs = their_path.get(their_index..).unwrap_or_default();
        if theirs.first() != Some(&current) {
            return None;
        }
        let ours = self.state.current_path.get(self.state.path_index..).unwrap_or_default();

        let mine = self.side_cell(current, id, theirs);
        let their_side = self.side_cell(next, other, ours);
        match (mine, their_side) {
            (Some(_), None) => mine,
            (Some(_), Some(_)) if id > other => mine,
            (None, None) if id > other => current
                .neighbours()
                .into_iter()
                .find(|&c| self.grid.can_enter(c, id)),
            _ => None,
        }
    }

    /// First free neighbour of `from` for `agent` that is not on `avoid`.
    fn side_cell(&self, from: CellCoord, agent: AgentId, avoid: &[CellCoord]) -> Option<CellCoord> {
        from.neighbours()
            .into_iter()
            .find(|c| self.grid.can_enter(*c, agent) && !avoid.contains(c))
    }

    fn step_aside(&mut self, current: CellCoord, side: CellCoord) -> MoveOutcome {
        self.state.current_path = vec![current, side];
        self.state.path_index = 1;
        let ahead = self.claim(side);
        self.release_except(&[current, side]);

        let full = self.tunables.move_speed * self.dt;
        if ahead
            && (self.try_step(current, side, ahead, full)
                || self.try_step(current, side, ahead, full * self.tunables.retry_step_scale))
        {
            return MoveOutcome::Moving;
        }
        // Side cell taken meanwhile: plan normally next frame.
        self.state.give_way = None;
        MoveOutcome::Blocked
    }

    /// Try a step of length `distance` toward the centre of `next`.
    fn try_step(&mut self, current: CellCoord, next: CellCoord, ahead: bool, distance: f32) -> bool {
        let target = self.grid.cell_to_world(next);
        let moved = self.grid.clamp_world(step_toward(self.state.position, target, distance));
        let landed = self.grid.world_to_cell_clamped(moved);

        if landed == current {
            self.state.position = moved;
            trace!(agent = %self.state.id, cell = %current, "step");
            return true;
        }
        if landed == next && ahead {
            let id = self.state.id;
            self.state.position = moved;
            self.grid.vacate(current, id);
            self.state.reserved.retain(|c| *c != current);
            self.state.blocked_ticks = 0;
            trace!(agent = %id, from = %current, to = %next, "enter cell");
            return true;
        }
        false
    }

    /// Reserve `cell` for this agent; `true` if it is now held.
    fn claim(&mut self, cell: CellCoord) -> bool {
        if self.grid.occupy(cell, self.state.id).is_err() {
            return false;
        }
        if !self.state.reserved.contains(&cell) {
            self.state.reserved.push(cell);
        }
        true
    }

    fn release_except(&mut self, keep: &[CellCoord]) {
        let id = self.state.id;
        let grid = &mut *self.grid;
        self.state.reserved.retain(|cell| {
            if keep.contains(cell) {
                true
            } else {
                grid.vacate(*cell, id);
                false
            }
        });
    }
}

/// `from` moved up to `distance` toward `to` on the ground plane, never past it.
fn step_toward(from: Vec3, to: Vec3, distance: f32) -> Vec3 {
    let delta = Vec3::new(to.x - from.x, 0.0, to.z - from.z);
    let length = delta.length();
    if length <= distance || length == 0.0 {
        return Vec3::new(to.x, from.y, to.z);
    }
    from + delta * (distance / length)
}
