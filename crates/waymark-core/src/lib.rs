#![forbid(unsafe_code)]

//! Core: geometry, placement tokens, and the document capability.
//!
//! # Role in Waymark
//! `waymark-core` is the bottom layer. It owns the value types every other
//! crate speaks (`Rect`, `Placement`, `ElementId`) and the [`Document`]
//! trait through which the engine reads geometry and writes styles.
//!
//! # Primary responsibilities
//! - **Geometry**: page-space rectangles, axes, and per-side values.
//! - **Placement**: `top`/`right`/`bottom`/`left` with optional alignment.
//! - **Document**: the injected page capability, plus [`Page`], an in-memory
//!   implementation with a CSS selector subset.
//!
//! # How it fits in the system
//! `waymark-float` computes coordinates from rectangles obtained through a
//! `Document`; `waymark` drives the whole attachment lifecycle on top of both.

pub mod document;
pub mod geometry;
pub mod page;
pub mod placement;
pub mod selector;

pub use document::{Document, ElementId, FocusOptions};
pub use geometry::{Axis, Point, Rect, Sides};
pub use page::Page;
pub use placement::{Alignment, Placement, PlacementParseError, Side};
pub use selector::{Selector, SelectorError};
