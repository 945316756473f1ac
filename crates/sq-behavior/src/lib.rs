//! `sq-behavior` — a small behavior-tree interpreter.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                    |
//! |----------------|-------------------------------------------------------------|
//! | [`node`]       | `Status`, `Node<C, A>` (Sequence, Selector, Action, Condition) |
//! | [`behaviors`]  | `Behaviors` — the capability object leaves dispatch into    |
//! | [`tree`]       | `BehaviorTree<C, A>` — arena + root, `tick`                 |
//! | [`builder`]    | `TreeBuilder<C, A>` — bottom-up construction and validation |
//! | [`error`]      | `BehaviorError`, `BehaviorResult<T>`                        |
//!
//! # Design notes
//!
//! Nodes live in a flat arena and composites refer to their children by
//! [`NodeId`][sq_core::NodeId].  Leaves carry a *key* (a small `Copy` enum
//! chosen by the user) instead of a closure; ticking a leaf calls
//! [`Behaviors::check`] or [`Behaviors::act`] on whatever capability object
//! is passed to [`BehaviorTree::tick`].  As a result:
//!
//! - a tree has no lifetime and no pointer back to its agent, so it can be
//!   built and tested without a live agent;
//! - nodes are stateless; anything "in progress" (timers, paths) lives in
//!   the capability object's state;
//! - every tick walks from the root; there is no running-node cursor, so
//!   conditions near the root decide which branch is re-entered.
//!
//! ```rust,ignore
//! let mut b = TreeBuilder::new();
//! let alive  = b.condition(Cond::Alive);
//! let wander = b.action(Act::Wander);
//! let root   = b.sequence("wander", vec![alive, wander]);
//! let tree   = b.build(root)?;
//! let status = tree.tick(&mut my_agent_context);
//! ```

pub mod behaviors;
pub mod builder;
pub mod error;
pub mod node;
pub mod tree;


pub use behaviors::Behaviors;
pub use builder::TreeBuilder;
pub use error::{BehaviorError, BehaviorResult};
pub use node::{Node, Status};
pub use tree::BehaviorTree;
