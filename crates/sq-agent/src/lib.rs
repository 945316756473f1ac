//! `sq-agent` — the NPC: state, decision logic, movement, and squad reactions.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                      |
//! |-----------------|---------------------------------------------------------------|
//! | [`environment`] | `Environment` collaborator trait, `RayHit`, `AnimationState`  |
//! | [`state`]       | `AgentState`, `Branch`                                        |
//! | [`tree`]        | `NpcCondition`, `NpcAction`, `build_npc_tree`                 |
//! | [`context`]     | `NpcContext` — `Behaviors` impl binding tree keys to logic    |
//! | [`movement`]    | `MoveOutcome`, stepping with current + one-ahead reservations |
//! | [`cover`]       | `score_cover`, `score_cover_excluding`                        |
//! | [`handlers`]    | squad event handlers and `subscribe_npc`                      |
//! | [`tactics`]     | macro-policy execution (`DecisionMode::MacroPolicy`)          |
//! | [`roster`]      | `Roster` — split borrow of the squad for event delivery       |
//! | [`npc`]         | `Npc`, `DecisionMode`, `World`, the per-frame `update`        |
//! | [`error`]       | `AgentError`, `AgentResult<T>`                                |
//!
//! # Per-frame update (summary)
//!
//! ```text
//! timers      flinch, dying, shot cooldown, suppression, policy
//! perception  ray toward the player → visible / in range / detected
//! decide      tick the behavior tree  (or run the macro action)
//! ```
//!
//! Events raised while deciding are delivered to the other agents before
//! `update` returns.

pub mod context;
pub mod cover;
pub mod environment;
pub mod error;
pub mod handlers;
pub mod movement;
pub mod npc;
pub mod roster;
pub mod state;
pub mod tactics;
pub mod tree;


pub use context::NpcContext;
pub use cover::{score_cover, score_cover_excluding};
pub use environment::{AnimationState, Environment, RayHit};
pub use error::{AgentError, AgentResult};
pub use handlers::subscribe_npc;
pub use movement::MoveOutcome;
pub use npc::{DecisionMode, Npc, World};
pub use roster::Roster;
pub use state::{AgentState, Branch};
pub use tree::{build_npc_tree, NpcAction, NpcCondition, NpcTree};
