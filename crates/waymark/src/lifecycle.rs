#![forbid(unsafe_code)]

//! Ownership of a step's auto-update subscription.
//!
//! A step holds at most one live subscription. Binding a new one cancels the
//! previous one first; unbinding is safe to repeat.

use waymark_float::{AutoUpdate, AutoUpdateHandle};

use crate::step::Step;

/// Store `handle` in the step, cancelling whatever it held before.
pub(crate) fn bind<T>(step: &mut Step, updates: &mut AutoUpdate<T>, handle: AutoUpdateHandle) {
    unbind(step, updates);
    step.cleanup = Some(handle);
}

/// Cancel the step's subscription, if any. Returns whether a live
/// subscription was stopped.
pub(crate) fn unbind<T>(step: &mut Step, updates: &mut AutoUpdate<T>) -> bool {
    match step.cleanup.take() {
        Some(handle) => updates.cancel(handle),
        None => false,
    }
}

/// Whether the step's subscription is still running. A subscription that
/// retired itself leaves the handle in place but reports `false`.
pub(crate) fn is_bound<T>(step: &Step, updates: &AutoUpdate<T>) -> bool {
    step.cleanup
        .as_ref()
        .is_some_and(|handle| updates.is_active(handle.id()))
}
