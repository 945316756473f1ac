//! How an agent reacts to what happens to its squad mates.
//!
//! | Event            | Effect on every *other* live agent                      |
//! |------------------|---------------------------------------------------------|
//! | `PlayerDetected` | `is_player_detected = true`                             |
//! | `NpcDamaged`     | if in cover: leave it, raise suppression fire for `suppression_secs` |
//! | `NpcDied`        | `dead_allies += 1`                                      |
//!
//! `NpcTakingCover` has no default reaction.

use sq_core::{AgentId, Tunables};
use sq_event::{EventBus, EventKind, SquadEvent};
use tracing::trace;

use crate::AgentState;

/// Register `agent`'s handlers on `bus`.
pub fn subscribe_npc(bus: &mut EventBus<AgentState>, agent: AgentId, tunables: &Tunables) {
    let suppression_secs = tunables.suppression_secs;
    bus.subscribe(EventKind::PlayerDetected, agent, on_player_detected);
    bus.subscribe(EventKind::NpcDamaged, agent, move |event: &SquadEvent, state: &mut AgentState| {
        on_npc_damaged(event, state, suppression_secs)
    });
    bus.subscribe(EventKind::NpcDied, agent, on_npc_died);
}

fn concerns(event: &SquadEvent, state: &AgentState) -> bool {
    event.source() != state.id && !state.is_dead
}

pub fn on_player_detected(event: &SquadEvent, state: &mut AgentState) {
    if !concerns(event, state) {
        return;
    }
    state.is_player_detected = true;
    trace!(agent = %state.id, %event, "alerted");
}

pub fn on_npc_damaged(event: &SquadEvent, state: &mut AgentState, suppression_secs: f32) {
    if !concerns(event, state) || !state.is_in_cover {
        return;
    }
    state.is_in_cover = false;
    state.is_taking_cover = false;
    state.provide_suppression_fire = true;
    state.suppression_timer = suppression_secs;
    trace!(agent = %state.id, %event, "suppression fire");
}

pub fn on_npc_died(event: &SquadEvent, state: &mut AgentState) {
    if !concerns(event, state) {
        return;
    }
    state.dead_allies += 1;
    trace!(agent = %state.id, dead_allies = state.dead_allies, "ally down");
}
