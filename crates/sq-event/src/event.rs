use std::fmt;

use sq_core::AgentId;

/// Something that happened to one squad member, broadcast to the rest.
///
/// Every variant carries the id of the agent it happened to.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SquadEvent {
    /// The source agent's perception picked up the player.
    PlayerDetected(AgentId),
    /// The source agent was hit.
    NpcDamaged(AgentId),
    /// The source agent reached cover.
    NpcTakingCover(AgentId),
    /// The source agent finished dying.
    NpcDied(AgentId),
}

impl SquadEvent {
    pub fn kind(self) -> EventKind {
        match self {
            SquadEvent::PlayerDetected(_) => EventKind::PlayerDetected,
            SquadEvent::NpcDamaged(_)     => EventKind::NpcDamaged,
            SquadEvent::NpcTakingCover(_) => EventKind::NpcTakingCover,
            SquadEvent::NpcDied(_)        => EventKind::NpcDied,
        }
    }

    /// The agent the event is about.
    pub fn source(self) -> AgentId {
        match self {
            SquadEvent::PlayerDetected(id)
            | SquadEvent::NpcDamaged(id)
            | SquadEvent::NpcTakingCover(id)
            | SquadEvent::NpcDied(id) => id,
        }
    }
}

impl fmt::Display for SquadEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind(), self.source())
    }
}

/// Discriminant of [`SquadEvent`], used as the subscription key.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    PlayerDetected,
    NpcDamaged,
    NpcTakingCover,
    NpcDied,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::PlayerDetected,
        EventKind::NpcDamaged,
        EventKind::NpcTakingCover,
        EventKind::NpcDied,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::PlayerDetected => "PlayerDetected",
            EventKind::NpcDamaged     => "NpcDamaged",
            EventKind::NpcTakingCover => "NpcTakingCover",
            EventKind::NpcDied        => "NpcDied",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
