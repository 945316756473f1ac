//! Squad observer trait for progress reporting and debug overlays.

use sq_agent::Branch;
use sq_core::{AgentId, Tick};

use crate::Squad;

/// Callbacks invoked by [`Squad::run`][crate::Squad::run] and
/// [`Squad::run_ticks`][crate::Squad::run_ticks].
///
/// All methods default to no-ops.
///
/// # Example: branch logger
///
/// ```rust,ignore
/// struct BranchLog;
///
/// impl SquadObserver for BranchLog {
///     fn on_branch_change(&mut self, tick: Tick, agent: AgentId, from: Branch, to: Branch) {
///         println!("{tick} {agent}: {from} -> {to}");
///     }
/// }
/// ```
pub trait SquadObserver {
    /// Called at the very start of each frame.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called right after `agent`'s update if its branch changed.
    fn on_branch_change(&mut self, _tick: Tick, _agent: AgentId, _from: Branch, _to: Branch) {}

    /// Called at the end of each frame with read access to the whole squad.
    fn on_tick_end(&mut self, _tick: Tick, _squad: &Squad) {}

    /// Called once after `run` finishes.
    fn on_run_end(&mut self, _final_tick: Tick) {}
}

/// A [`SquadObserver`] that does nothing.
pub struct NoopObserver;

impl SquadObserver for NoopObserver {}
