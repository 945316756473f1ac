//! Synchronous publish/subscribe.

use std::fmt;

use rustc_hash::FxHashMap;
use sq_core::AgentId;
use tracing::{debug, trace};

use crate::{EventKind, SquadEvent};

/// Handler invoked with the event and the subscriber's own state.
pub type Handler<S> = Box<dyn Fn(&SquadEvent, &mut S) + Send + Sync>;

/// Resolves a subscriber id to its mutable state at delivery time.
///
/// The squad implements this on a split borrow of its roster so that an
/// agent can publish while its own state is already mutably borrowed; that
/// agent's id simply resolves to `None` and its handler is skipped.
pub trait SubscriberSet<S> {
    fn state_mut(&mut self, id: AgentId) -> Option<&mut S>;
}

impl<S> SubscriberSet<S> for FxHashMap<AgentId, S> {
    fn state_mut(&mut self, id: AgentId) -> Option<&mut S> {
        self.get_mut(&id)
    }
}

/// `Vec` indexed by `AgentId`, the layout the squad roster uses.
impl<S> SubscriberSet<S> for Vec<S> {
    fn state_mut(&mut self, id: AgentId) -> Option<&mut S> {
        self.get_mut(id.index())
    }
}

struct Subscription<S> {
    subscriber: AgentId,
    handler:    Handler<S>,
}

/// Per-kind ordered subscription lists.
///
/// Subscriptions are appended at agent construction and never removed;
/// delivery order is subscription order.
pub struct EventBus<S> {
    subscriptions: FxHashMap<EventKind, Vec<Subscription<S>>>,
}

impl<S> Default for EventBus<S> {
    fn default() -> Self {
        Self { subscriptions: FxHashMap::default() }
    }
}

impl<S> fmt::Debug for EventBus<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for kind in EventKind::ALL {
            map.entry(&kind, &self.subscriber_count(kind));
        }
        map.finish()
    }
}

impl<S> EventBus<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for every future event of `kind`, on behalf of
    /// `subscriber`.
    pub fn subscribe<F>(&mut self, kind: EventKind, subscriber: AgentId, handler: F)
    where
        F: Fn(&SquadEvent, &mut S) + Send + Sync + 'static,
    {
        self.subscriptions
            .entry(kind)
            .or_default()
            .push(Subscription { subscriber, handler: Box::new(handler) });
    }

    /// Deliver `event` to every subscriber of its kind, in order.
    ///
    /// Subscribers whose state `targets` cannot resolve are skipped.
    /// Returns the number of handlers that ran.
    pub fn publish<T>(&self, event: &SquadEvent, targets: &mut T) -> usize
    where
        T: SubscriberSet<S> + ?Sized,
    {
        let Some(subs) = self.subscriptions.get(&event.kind()) else {
            debug!(%event, delivered = 0, "publish");
            return 0;
        };

        let mut delivered = 0;
        for sub in subs {
            match targets.state_mut(sub.subscriber) {
                Some(state) => {
                    (sub.handler)(event, state);
                    delivered += 1;
                }
                None => trace!(%event, subscriber = %sub.subscriber, "subscriber unavailable"),
            }
        }
        debug!(%event, delivered, "publish");
        delivered
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.subscriptions.get(&kind).map_or(0, Vec::len)
    }

    /// Subscribers of `kind`, in delivery order.
    pub fn subscribers(&self, kind: EventKind) -> impl Iterator<Item = AgentId> + '_ {
        self.subscriptions
            .get(&kind)
            .into_iter()
            .flatten()
            .map(|s| s.subscriber)
    }
}
