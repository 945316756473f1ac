//! `sq-policy` — macro-action selection from a precomputed value table.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`action`]  | `MacroAction` and its CSV ids                               |
//! | [`state`]   | `DistanceBucket`, `HealthBucket`, `PolicyState`             |
//! | [`table`]   | `PolicyTable` (per-state mean value of each action)         |
//! | [`loader`]  | `load_policy_csv`, `load_policy_reader`                     |
//! | [`error`]   | `PolicyError`, `PolicyResult<T>`                            |
//!
//! # Decision model (summary)
//!
//! ```text
//! state   = discretize(detected, visible, distance, health, suppressing)
//! action  = argmax_a mean_value(state, a)      ties: Attack, Advance, Retreat, Patrol
//! miss    = Patrol
//! ```
//!
//! The table is read once at startup and never written back.

pub mod action;
pub mod error;
pub mod loader;
pub mod state;
pub mod table;


pub use action::MacroAction;
pub use error::{PolicyError, PolicyResult};
pub use loader::{load_policy_csv, load_policy_reader};
pub use state::{DistanceBucket, HealthBucket, PolicyState};
pub use table::PolicyTable;
