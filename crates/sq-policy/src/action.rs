use std::fmt;

use crate::{PolicyError, PolicyResult};

/// High-level tactic an agent commits to between policy decisions.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum MacroAction {
    Attack,
    Advance,
    Retreat,
    Patrol,
}

impl MacroAction {
    /// Every action, in tie-break priority order.
    pub const ALL: [MacroAction; 4] = [
        MacroAction::Attack,
        MacroAction::Advance,
        MacroAction::Retreat,
        MacroAction::Patrol,
    ];

    /// Integer id used in the `action` column of policy files.
    pub fn csv_id(self) -> i64 {
        match self {
            MacroAction::Patrol  => 0,
            MacroAction::Retreat => 1,
            MacroAction::Advance => 2,
            MacroAction::Attack  => 3,
        }
    }

    pub fn from_csv_id(id: i64) -> PolicyResult<Self> {
        match id {
            0 => Ok(MacroAction::Patrol),
            1 => Ok(MacroAction::Retreat),
            2 => Ok(MacroAction::Advance),
            3 => Ok(MacroAction::Attack),
            other => Err(PolicyError::UnknownAction(other)),
        }
    }

    /// Position in [`ALL`][Self::ALL]; used to index per-action arrays.
    #[inline]
    pub(crate) fn slot(self) -> usize {
        match self {
            MacroAction::Attack  => 0,
            MacroAction::Advance => 1,
            MacroAction::Retreat => 2,
            MacroAction::Patrol  => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MacroAction::Attack  => "Attack",
            MacroAction::Advance => "Advance",
            MacroAction::Retreat => "Retreat",
            MacroAction::Patrol  => "Patrol",
        }
    }
}

impl fmt::Display for MacroAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
