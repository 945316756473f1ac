//! Split borrow of the squad's agents for synchronous event delivery.

use sq_core::AgentId;
use sq_event::SubscriberSet;

use crate::{AgentState, Npc};

/// Every agent's state except (optionally) one that is checked out for its
/// own update.
///
/// Agents are stored in `AgentId` order, so an id is its index.  While agent
/// `i` updates, the squad splits its list around `i` and lends the two
/// halves here; events `i` publishes reach everyone else, and `i`'s own
/// subscription resolves to `None`.
pub struct Roster<'a> {
    before:      &'a mut [Npc],
    after:       &'a mut [Npc],
    checked_out: Option<usize>,
}

impl<'a> Roster<'a> {
    /// The whole squad, nobody checked out.
    pub fn full(agents: &'a mut [Npc]) -> Self {
        Self { before: agents, after: &mut [], checked_out: None }
    }

    /// Split `agents` around index `i`, returning the checked-out agent and
    /// a roster of the rest.  `None` if `i` is out of range.
    pub fn split(agents: &'a mut [Npc], i: usize) -> Option<(&'a mut Npc, Self)> {
        if i >= agents.len() {
            return None;
        }
        let (before, rest) = agents.split_at_mut(i);
        let (me, after) = rest.split_first_mut()?;
        Some((me, Self { before, after, checked_out: Some(i) }))
    }
}

impl SubscriberSet<AgentState> for Roster<'_> {
    fn state_mut(&mut self, id: AgentId) -> Option<&mut AgentState> {
        let i = id.index();
        if i < self.before.len() {
            return Some(&mut self.before[i].state);
        }
        match self.checked_out {
            Some(out) if i > out => self.after.get_mut(i - out - 1).map(|npc| &mut npc.state),
            _ => None,
        }
    }
}
