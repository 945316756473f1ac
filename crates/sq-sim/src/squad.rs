//! The `Squad` struct and its per-frame update.

use sq_agent::{AgentState, Environment, Npc, Roster, World};
use sq_core::{AgentId, SquadClock, SquadConfig, Tick, Vec3};
use sq_event::{EventBus, SquadEvent};
use sq_policy::PolicyTable;
use sq_spatial::{Grid, Pathfinder};
use tracing::{debug, trace};

use crate::{NoopObserver, SimError, SimResult, SquadObserver};

/// A squad of NPCs sharing one grid and one event bus.
///
/// Each frame the agents update one after another in ascending `AgentId`
/// order.  An agent's update runs to completion (timers, perception,
/// decision, and delivery of every event it raised) before the next agent
/// starts, so reservations and alerts are visible to later agents in the
/// same frame.  Dead agents are skipped.
///
/// Create via [`SquadBuilder`][crate::SquadBuilder].
pub struct Squad {
    pub config: SquadConfig,

    /// Current frame and accumulated simulated time.
    pub clock: SquadClock,

    pub(crate) grid:       Grid,
    pub(crate) bus:        EventBus<AgentState>,
    pub(crate) pathfinder: Box<dyn Pathfinder>,
    pub(crate) policy:     Option<PolicyTable>,
    /// Indexed by `AgentId`.
    pub(crate) agents:     Vec<Npc>,
}

impl Squad {
    // ── Frame loop ────────────────────────────────────────────────────────

    /// Per-frame entry point for a host game loop.  Returns the number of
    /// agents that were updated.
    pub fn update(&mut self, dt: f32, env: &mut dyn Environment) -> usize {
        self.step(dt, env, &mut NoopObserver)
    }

    /// Run exactly `n` fixed frames of `config.frame_secs`.
    pub fn run_ticks<O: SquadObserver>(&mut self, n: u64, env: &mut dyn Environment, observer: &mut O) {
        for _ in 0..n {
            self.frame(env, observer);
        }
    }

    /// Run fixed frames until the clock reaches `config.total_ticks`.
    pub fn run<O: SquadObserver>(&mut self, env: &mut dyn Environment, observer: &mut O) {
        let end = Tick(self.config.total_ticks);
        while self.clock.current_tick < end {
            self.frame(env, observer);
        }
        debug!(clock = %self.clock, alive = self.alive_count(), "run finished");
        observer.on_run_end(self.clock.current_tick);
    }

    fn frame<O: SquadObserver>(&mut self, env: &mut dyn Environment, observer: &mut O) {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);
        self.step(self.config.frame_secs, env, observer);
        observer.on_tick_end(now, self);
    }

    fn step<O: SquadObserver + ?Sized>(
        &mut self,
        dt:       f32,
        env:      &mut dyn Environment,
        observer: &mut O,
    ) -> usize {
        let now = self.clock.current_tick;
        let Squad { config, grid, bus, pathfinder, policy, agents, .. } = self;
        let mut world = World {
            grid,
            bus:                  &*bus,
            pathfinder:           &**pathfinder,
            policy:               policy.as_ref(),
            tunables:             &config.tunables,
            policy_interval_secs: config.policy_interval_secs,
        };

        let mut updated = 0;
        for i in 0..agents.len() {
            let Some((npc, mut roster)) = Roster::split(agents, i) else {
                break;
            };
            if npc.state.is_dead {
                continue;
            }
            let before = npc.state.branch;
            let status = npc.update(dt, &mut world, &mut roster, env);
            trace!(tick = %now, agent = %npc.id(), %status, "agent updated");
            if npc.state.branch != before {
                observer.on_branch_change(now, npc.id(), before, npc.state.branch);
            }
            updated += 1;
        }

        self.clock.advance(dt);
        updated
    }

    // ── External input ────────────────────────────────────────────────────

    /// Apply `amount` damage to `id` from outside the frame loop (the
    /// player's weapon).  The agent starts flinching and `NpcDamaged` is
    /// delivered to the squad before this returns.  Hits on dying or dead
    /// agents are ignored.
    ///
    /// # Errors
    ///
    /// [`SimError::UnknownAgent`] if `id` is not in the squad.
    pub fn damage_agent(&mut self, id: AgentId, amount: f32) -> SimResult<()> {
        let tunables = &self.config.tunables;
        let npc = self.agents.get_mut(id.index()).ok_or(SimError::UnknownAgent(id))?;
        if !npc.state.is_alive() {
            debug!(agent = %id, amount, "hit ignored");
            return Ok(());
        }
        npc.state.take_damage(amount, tunables);
        debug!(agent = %id, amount, health = npc.state.health, "damaged");

        let event = SquadEvent::NpcDamaged(id);
        self.bus.publish(&event, &mut Roster::full(&mut self.agents));
        Ok(())
    }

    /// Replace an agent's patrol route.
    pub fn set_waypoints(&mut self, id: AgentId, waypoints: Vec<Vec3>) -> SimResult<()> {
        let npc = self.agents.get_mut(id.index()).ok_or(SimError::UnknownAgent(id))?;
        npc.state.waypoints = waypoints;
        npc.state.waypoint_index = 0;
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn agent(&self, id: AgentId) -> Option<&Npc> {
        self.agents.get(id.index())
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Npc> {
        self.agents.get_mut(id.index())
    }

    pub fn agents(&self) -> &[Npc] {
        &self.agents
    }

    /// Debug label of the agent's current branch ("Patrolling", "In Cover", ...).
    pub fn state_label(&self, id: AgentId) -> Option<&'static str> {
        self.agent(id).map(|npc| npc.state.state_label())
    }

    pub fn health(&self, id: AgentId) -> Option<f32> {
        self.agent(id).map(|npc| npc.state.health)
    }

    pub fn position(&self, id: AgentId) -> Option<Vec3> {
        self.agent(id).map(|npc| npc.state.position)
    }

    pub fn alive_count(&self) -> usize {
        self.agents.iter().filter(|npc| !npc.state.is_dead).count()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn bus(&self) -> &EventBus<AgentState> {
        &self.bus
    }

    pub fn policy(&self) -> Option<&PolicyTable> {
        self.policy.as_ref()
    }
}
