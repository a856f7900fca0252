#![forbid(unsafe_code)]

//! Waymark: tooltip attachment and positioning for guided tours.
//!
//! # Role in Waymark
//! This is the user-facing crate. A tour step declares which element its
//! tooltip points at and from which side ([`AttachTo`]); the
//! [`PositionEngine`] resolves that against a [`Document`], places the
//! tooltip with [`waymark_float`], keeps it placed while the page changes
//! and hands focus to it once it has settled.
//!
//! # Quick start
//!
//! ```
//! use std::time::Duration;
//! use waymark::{AttachTo, Page, Placement, PositionEngine, Rect, Step, StepOptions};
//! use waymark::{Document, LayoutTrigger};
//!
//! let mut page = Page::new(1024.0, 768.0);
//! let body = page.body();
//! let button = page.append(body, "button");
//! page.set_id(button, "start");
//! page.set_rect(button, Rect::new(400.0, 300.0, 100.0, 40.0));
//! let tooltip = page.append(body, "div");
//! page.set_rect(tooltip, Rect::from_size(200.0, 80.0));
//!
//! let mut step = Step::new(
//!     StepOptions::default().attach_to(AttachTo::selector("#start", Placement::BOTTOM)),
//! );
//! step.el = Some(tooltip);
//!
//! let mut engine = PositionEngine::new(page);
//! engine.setup_tooltip(&mut step);
//! assert_eq!(engine.document().style(tooltip, "top"), Some("340px"));
//!
//! engine.handle_trigger(LayoutTrigger::Resize);
//! engine.advance(Duration::from_millis(300));
//! assert_eq!(engine.document().focused(), Some(tooltip));
//!
//! engine.destroy_tooltip(&mut step);
//! ```

pub mod arrow;
pub mod attach;
pub mod config;
pub mod engine;
mod lifecycle;
#[cfg(feature = "logging")]
pub mod logging;
pub mod placement_options;
pub mod settle;
pub mod step;
pub mod util;

pub use arrow::{place_arrow, static_side};
pub use attach::{ResolvedAttachment, resolve_attach_to, should_center_step};
pub use config::{ConfigError, EngineConfig};
pub use engine::PositionEngine;
pub use placement_options::get_floating_ui_options;
pub use settle::SettleQueue;
pub use step::{AttachElement, AttachTo, ElementCallback, ElementTarget, Step, StepOptions};
pub use util::{normalize_prefix, uuid, uuid_from_seed};

pub use waymark_core::{
    Alignment, Document, ElementId, FocusOptions, Page, Placement, PlacementParseError, Rect,
    Selector, SelectorError, Side,
};
pub use waymark_float::{
    FloatingOptions, FloatingOptionsOverride, LayoutTrigger, Middleware, MiddlewareData,
    MiddlewareOverride, MiddlewarePatch, Strategy, SubscriptionId,
};
