//! Typed indices.
//!
//! Every id is a `u32` slot into some `Vec`: the squad roster, the grid's
//! cover registry, or a behavior-tree arena.  `Display` prints a short
//! prefix and the slot (`agent#3`), which keeps log lines compact.

use std::fmt;

macro_rules! typed_id {
    ($(#[$attr:meta])* $name:ident, $prefix:literal) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub u32);

        impl $name {
            /// Unassigned slot.
            pub const INVALID: $name = $name(u32::MAX);

            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

typed_id! {
    /// Index of an NPC in the squad roster.  Also the id carried by squad
    /// events and stored as a cell's occupant.
    AgentId, "agent"
}

typed_id! {
    /// Index into the grid's cover-location registry.
    CoverId, "cover"
}

typed_id! {
    /// Slot of a node in a behavior-tree arena.
    NodeId, "node"
}
