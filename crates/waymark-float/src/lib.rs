#![forbid(unsafe_code)]

//! Floating element placement.
//!
//! # Role in Waymark
//! `waymark-float` turns two element boxes and a [`FloatingOptions`] into
//! concrete coordinates, and keeps track of which (reference, floating) pairs
//! must be recomputed when the layout changes.
//!
//! # Primary responsibilities
//! - **Middleware**: `offset`, `flip`, `shift` (with `limit_shift`), `arrow`.
//! - **compute_position**: run a middleware chain over the base placement.
//! - **Options**: computed options plus explicit caller overrides.
//! - **AutoUpdate**: cancelable reposition subscriptions.

pub mod auto_update;
pub mod compute;
pub mod middleware;
pub mod options;

pub use auto_update::{AutoUpdate, AutoUpdateHandle, LayoutTrigger, SubscriptionId};
pub use compute::{ComputeError, ComputedPosition, compute_position};
pub use middleware::{
    Arrow, ArrowData, Flip, LimitShift, Middleware, MiddlewareData, Offset, Shift,
    coords_for_placement,
};
pub use options::{
    ArrowPatch, FlipPatch, FloatingOptions, FloatingOptionsOverride, LimitShiftPatch,
    LimiterPatch, MiddlewareOverride, MiddlewarePatch, OffsetPatch, ShiftPatch, Strategy,
};
