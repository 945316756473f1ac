//! `sq-sim` — the squad: agents, shared grid, event bus, and the frame loop.
//!
//! # Frame loop
//!
//! ```text
//! for agent in agents (ascending AgentId, dead agents skipped):
//!   ① timers      flinch, dying, shot cooldown, suppression, policy
//!   ② perception  ray toward the player; first sighting publishes PlayerDetected
//!   ③ decide      behavior tree tick (or macro action)
//!   ④ events      handlers of the other agents run inside the publish call
//! clock.advance(dt)
//! ```
//!
//! Reservations made by an agent are visible to every agent updated after
//! it in the same frame.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use sq_core::{SquadConfig, Vec3};
//! use sq_sim::{NoopObserver, Spawn, SquadBuilder};
//!
//! let mut squad = SquadBuilder::new(SquadConfig::default())
//!     .agent(Spawn::at(Vec3::new(2.5, 0.0, 2.5)))
//!     .build()?;
//! squad.run_ticks(600, &mut env, &mut NoopObserver);
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod squad;

#[cfg(test)]
mod tests;

pub use builder::{Spawn, SquadBuilder};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SquadObserver};
pub use squad::Squad;
