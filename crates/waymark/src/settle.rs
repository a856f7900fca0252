#![forbid(unsafe_code)]

//! Deferred focus after positioning.
//!
//! Time is driven by the host through [`SettleQueue::advance`]; nothing here
//! reads a clock.

use std::time::Duration;

use waymark_core::ElementId;

#[derive(Debug, Clone, Copy)]
struct Pending {
    due: Duration,
    element: ElementId,
}

/// Elements waiting to receive focus once their delay has elapsed.
#[derive(Debug, Default)]
pub struct SettleQueue {
    now: Duration,
    pending: Vec<Pending>,
}

impl SettleQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Focus `element` once `delay` has passed. Rescheduling an element
    /// that is already waiting replaces its deadline.
    pub fn schedule(&mut self, element: ElementId, delay: Duration) {
        self.pending.retain(|p| p.element != element);
        self.pending.push(Pending {
            due: self.now + delay,
            element,
        });
    }

    /// Move time forward and drain every entry that came due, oldest first.
    pub fn advance(&mut self, dt: Duration) -> Vec<ElementId> {
        self.now += dt;
        let now = self.now;
        let (due, waiting): (Vec<_>, Vec<_>) = self.pending.drain(..).partition(|p| p.due <= now);
        self.pending = waiting;
        due.into_iter().map(|p| p.element).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Time elapsed since the queue was created.
    pub fn now(&self) -> Duration {
        self.now
    }
}
