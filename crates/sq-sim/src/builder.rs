//! Fluent builder for constructing a [`Squad`].

use std::path::Path;

use sq_agent::{subscribe_npc, AgentState, DecisionMode, Npc};
use sq_core::{AgentId, SquadClock, SquadConfig, Vec3};
use sq_event::EventBus;
use sq_policy::{load_policy_csv, PolicyTable};
use sq_spatial::{AStarPathfinder, Grid, GridBuilder, Pathfinder, SpatialError};
use tracing::{info, warn};

use crate::{SimError, SimResult, Squad};

// ── Spawn ─────────────────────────────────────────────────────────────────────

/// One agent to place when the squad is built.
#[derive(Clone, Debug)]
pub struct Spawn {
    pub position:  Vec3,
    pub mode:      DecisionMode,
    pub waypoints: Vec<Vec3>,
}

impl Spawn {
    /// Behavior-tree agent at `position` with no patrol route.
    pub fn at(position: Vec3) -> Self {
        Self { position, mode: DecisionMode::default(), waypoints: Vec::new() }
    }

    pub fn mode(mut self, mode: DecisionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn waypoints(mut self, waypoints: Vec<Vec3>) -> Self {
        self.waypoints = waypoints;
        self
    }
}

// ── SquadBuilder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Squad`].
///
/// # Optional inputs (have defaults)
///
/// | Method             | Default                                           |
/// |--------------------|---------------------------------------------------|
/// | `.grid(g)`         | open `grid_size × grid_size` grid from the config |
/// | `.pathfinder(p)`   | `AStarPathfinder` with the config's heuristic     |
/// | `.policy(t)`       | none: macro-policy agents patrol                  |
/// | `.agent(spawn)`    | no agents                                         |
///
/// Agents get `AgentId`s in the order they are added.
///
/// # Example
///
/// ```rust,ignore
/// let mut squad = SquadBuilder::new(config)
///     .grid(grid)
///     .agent(Spawn::at(Vec3::new(2.5, 0.0, 2.5)).waypoints(route))
///     .build()?;
/// squad.run(&mut env, &mut NoopObserver);
/// ```
pub struct SquadBuilder {
    config:     SquadConfig,
    grid:       Option<Grid>,
    pathfinder: Option<Box<dyn Pathfinder>>,
    policy:     Option<PolicyTable>,
    spawns:     Vec<Spawn>,
}

impl SquadBuilder {
    pub fn new(config: SquadConfig) -> Self {
        Self { config, grid: None, pathfinder: None, policy: None, spawns: Vec::new() }
    }

    /// Use a prepared grid (obstacles, cover) instead of an open one.
    pub fn grid(mut self, grid: Grid) -> Self {
        self.grid = Some(grid);
        self
    }

    pub fn pathfinder(mut self, pathfinder: impl Pathfinder + 'static) -> Self {
        self.pathfinder = Some(Box::new(pathfinder));
        self
    }

    pub fn policy(mut self, table: PolicyTable) -> Self {
        self.policy = Some(table);
        self
    }

    /// Load the macro-policy table from a CSV file.
    pub fn policy_csv(self, path: impl AsRef<Path>) -> SimResult<Self> {
        let table = load_policy_csv(path.as_ref())?;
        Ok(self.policy(table))
    }

    pub fn agent(mut self, spawn: Spawn) -> Self {
        self.spawns.push(spawn);
        self
    }

    pub fn agents(mut self, spawns: impl IntoIterator<Item = Spawn>) -> Self {
        self.spawns.extend(spawns);
        self
    }

    /// Validate the config, place every agent on the grid, wire the event
    /// subscriptions, and return a ready-to-run [`Squad`].
    ///
    /// # Errors
    ///
    /// - [`SimError::Core`] for an invalid config.
    /// - [`SimError::Spawn`] when a spawn point is outside the grid, on an
    ///   obstacle, or shares a cell with an earlier spawn.
    pub fn build(self) -> SimResult<Squad> {
        self.config.validate()?;
        let tunables = &self.config.tunables;

        let mut grid = match self.grid {
            Some(g) => g,
            None => GridBuilder::from_config(&self.config).build()?,
        };
        let pathfinder = self
            .pathfinder
            .unwrap_or_else(|| Box::new(AStarPathfinder::new(self.config.heuristic)));

        let mut bus = EventBus::<AgentState>::new();
        let mut agents = Vec::with_capacity(self.spawns.len());

        for (i, spawn) in self.spawns.into_iter().enumerate() {
            let id = AgentId(i as u32);
            let placed = grid
                .world_to_cell(spawn.position)
                .ok_or_else(|| SpatialError::OutOfBounds(grid.world_to_cell_clamped(spawn.position)))
                .and_then(|cell| grid.occupy(cell, id).map(|()| cell));
            let cell = match placed {
                Ok(cell) => cell,
                Err(source) => {
                    warn!(agent = %id, position = %spawn.position, %source, "spawn rejected");
                    return Err(SimError::Spawn { agent: id, position: spawn.position, source });
                }
            };

            let mut npc = Npc::new(id, grid.snap_to_grid(spawn.position), spawn.mode, tunables)?;
            npc.state.reserved.push(cell);
            npc.state.waypoints = spawn.waypoints;
            subscribe_npc(&mut bus, id, tunables);
            agents.push(npc);
        }

        info!(
            agents    = agents.len(),
            grid_size = grid.size(),
            covers    = grid.covers().len(),
            policy    = self.policy.as_ref().map_or(0, PolicyTable::len),
            "squad built"
        );

        Ok(Squad {
            clock: SquadClock::new(),
            config: self.config,
            grid,
            bus,
            pathfinder,
            policy: self.policy,
            agents,
        })
    }
}
