//! `sq-event` — squad-wide events and their synchronous bus.
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | [`event`]   | `SquadEvent`, `EventKind`                             |
//! | [`bus`]     | `EventBus<S>`, `SubscriberSet<S>`, `Handler<S>`       |
//!
//! The bus is generic over the subscriber state `S` so it can be tested
//! with plain structs; the NPC layer instantiates it as
//! `EventBus<AgentState>`.  Delivery is synchronous: `publish` returns only
//! after every handler for the event's kind has run, in subscription order.

pub mod bus;
pub mod event;


pub use bus::{EventBus, Handler, SubscriberSet};
pub use event::{EventKind, SquadEvent};
