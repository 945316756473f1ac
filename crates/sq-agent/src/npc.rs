//! `Npc` and its per-frame update.

use sq_behavior::Status;
use sq_core::{AgentId, Tunables, Vec3};
use sq_event::{EventBus, SubscriberSet};
use sq_policy::PolicyTable;
use sq_spatial::{Grid, Pathfinder};

use crate::{build_npc_tree, AgentResult, AgentState, Branch, Environment, NpcContext, NpcTree};

/// How an agent chooses what to do each frame.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecisionMode {
    /// Tick the behavior tree.
    #[default]
    BehaviorTree,
    /// Follow the squad's macro-policy table.
    MacroPolicy,
}

/// Shared world the squad lends to each agent in turn.
pub struct World<'a> {
    pub grid:                 &'a mut Grid,
    pub bus:                  &'a EventBus<AgentState>,
    pub pathfinder:           &'a dyn Pathfinder,
    pub policy:               Option<&'a PolicyTable>,
    pub tunables:             &'a Tunables,
    pub policy_interval_secs: f32,
}

/// One squad member: its state and the tree that drives it.
#[derive(Clone, Debug)]
pub struct Npc {
    pub state: AgentState,
    tree:      NpcTree,
    mode:      DecisionMode,
}

impl Npc {
    /// New agent at full health with the standard tree.
    pub fn new(id: AgentId, position: Vec3, mode: DecisionMode, tunables: &Tunables) -> AgentResult<Self> {
        Ok(Self::with_tree(AgentState::new(id, position, tunables), build_npc_tree()?, mode))
    }

    pub fn with_tree(state: AgentState, tree: NpcTree, mode: DecisionMode) -> Self {
        Self { state, tree, mode }
    }

    #[inline]
    pub fn id(&self) -> AgentId {
        self.state.id
    }

    pub fn mode(&self) -> DecisionMode {
        self.mode
    }

    pub fn tree(&self) -> &NpcTree {
        &self.tree
    }

    /// Run one frame: timers, perception, then decision.
    ///
    /// Dead agents are left untouched and report `Success`.  When nothing
    /// in the tree applies the agent goes `Idle`.
    pub fn update(
        &mut self,
        dt: f32,
        world: &mut World<'_>,
        roster: &mut dyn SubscriberSet<AgentState>,
        env: &mut dyn Environment,
    ) -> Status {
        if self.state.is_dead {
            return Status::Success;
        }
        self.state.advance_timers(dt);

        let mut ctx = NpcContext::new(&mut self.state, world, roster, env, dt);
        ctx.perceive();
        let status = match self.mode {
            DecisionMode::BehaviorTree => self.tree.tick(&mut ctx),
            DecisionMode::MacroPolicy  => ctx.run_macro(),
        };
        if status == Status::Failure {
            ctx.enter_branch(Branch::Idle);
        }
        status
    }
}
