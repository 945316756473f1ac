//! `sq-core` — foundational types for the squad NPC workspace.
//!
//! This crate is a dependency of every other `sq-*` crate.  It has no
//! `sq-*` dependencies and only two external ones (`glam` and `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `AgentId`, `CoverId`, `NodeId`                            |
//! | [`geo`]     | `Vec3` re-export, planar helpers, `direction_to`          |
//! | [`time`]    | `Tick`, `SquadClock`                                      |
//! | [`config`]  | `Tunables`, `SquadConfig`, `HeuristicKind`                |
//! | [`error`]   | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types; needed |
//! |         | to load a `SquadConfig` from JSON.                         |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{HeuristicKind, SquadConfig, Tunables};
pub use error::{CoreError, CoreResult};
pub use geo::Vec3;
pub use ids::{AgentId, CoverId, NodeId};
pub use time::{SquadClock, Tick};
