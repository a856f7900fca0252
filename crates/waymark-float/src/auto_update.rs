#![forbid(unsafe_code)]

//! Continuous reposition subscriptions.
//!
//! A subscription binds a (reference, floating) pair to a payload. The host
//! reports layout changes as [`LayoutTrigger`]s; [`AutoUpdate::affected`]
//! answers which subscriptions must recompute.
//!
//! # Invariants
//!
//! 1. [`AutoUpdateHandle`] is move-only. Cancelling consumes it, so a handle
//!    cannot be cancelled twice.
//! 2. Cancellation is synchronous: once [`AutoUpdate::cancel`] or
//!    [`AutoUpdate::retire`] returns, the subscription is never reported
//!    again.
//! 3. Trigger fan-out is deterministic (subscription creation order).

use std::collections::BTreeMap;

use waymark_core::ElementId;

/// Identifier of a live subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Owning handle to one subscription. Dropping it does **not** cancel the
/// subscription; hand it back to [`AutoUpdate::cancel`].
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a dropped handle leaves its subscription running"]
pub struct AutoUpdateHandle {
    id: SubscriptionId,
}

impl AutoUpdateHandle {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

/// A layout change that may move the reference or floating element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutTrigger {
    /// The page or an ancestor scrolled.
    Scroll,
    /// The viewport changed size.
    Resize,
    /// This element's box or subtree changed.
    Mutation(ElementId),
}

#[derive(Debug)]
struct Subscription<T> {
    reference: ElementId,
    floating: ElementId,
    payload: T,
}

/// Registry of live reposition subscriptions.
#[derive(Debug)]
pub struct AutoUpdate<T> {
    next_id: u64,
    subscriptions: BTreeMap<SubscriptionId, Subscription<T>>,
}

impl<T> Default for AutoUpdate<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> AutoUpdate<T> {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            subscriptions: BTreeMap::new(),
        }
    }

    /// Start tracking `floating` against `reference`.
    pub fn subscribe(
        &mut self,
        reference: ElementId,
        floating: ElementId,
        payload: T,
    ) -> AutoUpdateHandle {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.insert(
            id,
            Subscription {
                reference,
                floating,
                payload,
            },
        );
        tracing::trace!(sub = id.raw(), %reference, %floating, "auto-update subscribed");
        AutoUpdateHandle { id }
    }

    /// Cancel the subscription behind `handle`. Returns `false` when it had
    /// already retired itself.
    pub fn cancel(&mut self, handle: AutoUpdateHandle) -> bool {
        self.retire(handle.id)
    }

    /// Cancel by id. Used by the update callback to end its own subscription
    /// while the owning handle is elsewhere.
    pub fn retire(&mut self, id: SubscriptionId) -> bool {
        let removed = self.subscriptions.remove(&id).is_some();
        if removed {
            tracing::trace!(sub = id.raw(), "auto-update cancelled");
        }
        removed
    }

    pub fn is_active(&self, id: SubscriptionId) -> bool {
        self.subscriptions.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// The (reference, floating) pair and payload of a live subscription.
    pub fn get(&self, id: SubscriptionId) -> Option<(ElementId, ElementId, &T)> {
        self.subscriptions
            .get(&id)
            .map(|s| (s.reference, s.floating, &s.payload))
    }

    /// Subscriptions that must recompute after `trigger`.
    pub fn affected(&self, trigger: LayoutTrigger) -> Vec<SubscriptionId> {
        self.subscriptions
            .iter()
            .filter(|(_, s)| match trigger {
                LayoutTrigger::Scroll | LayoutTrigger::Resize => true,
                LayoutTrigger::Mutation(el) => s.reference == el || s.floating == el,
            })
            .map(|(&id, _)| id)
            .collect()
    }
}
