//! The `Behaviors` trait: the extension point leaves dispatch into.

use std::fmt::Debug;

use crate::Status;

/// Capability object that gives meaning to a tree's leaf keys.
///
/// A tree built over `Condition = C, Action = A` can be ticked against any
/// `Behaviors<Condition = C, Action = A>`.  The NPC layer implements it on
/// a short-lived context that borrows the agent's state and the shared
/// world for the duration of one update; tests implement it on scripted
/// recorders.
///
/// # Contract
///
/// - [`check`][Self::check] must not have side effects a later tick relies
///   on; conditions are re-evaluated from the root every frame.
/// - [`act`][Self::act] may mutate freely and return `Running` to ask for
///   another tick next frame.  Any progress it needs to remember must be
///   stored on `self`'s state, never in the tree.
///
/// # Example
///
/// ```rust,ignore
/// impl Behaviors for GuardContext<'_> {
///     type Condition = GuardCond;
///     type Action    = GuardAct;
///
///     fn check(&mut self, c: GuardCond) -> bool {
///         match c { GuardCond::Alarmed => self.state.alarmed }
///     }
///
///     fn act(&mut self, a: GuardAct) -> Status {
///         match a { GuardAct::Walk => self.walk() }
///     }
/// }
/// ```
pub trait Behaviors {
    /// Condition key stored in `Node::Condition`.
    type Condition: Copy + Debug;

    /// Action key stored in `Node::Action`.
    type Action: Copy + Debug;

    /// Evaluate a predicate.
    fn check(&mut self, condition: Self::Condition) -> bool;

    /// Run one step of an action.
    fn act(&mut self, action: Self::Action) -> Status;
}
