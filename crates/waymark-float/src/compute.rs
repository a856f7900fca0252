#![forbid(unsafe_code)]

//! Coordinate computation for one floating element.

use std::fmt;

use waymark_core::{Document, ElementId, Placement, Point, Rect};

use crate::middleware::{MiddlewareData, MiddlewareState, coords_for_placement};
use crate::options::{FloatingOptions, Strategy};

/// Upper bound on middleware chain restarts per computation.
const MAX_RESETS: usize = 50;

/// Result of [`compute_position`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComputedPosition {
    pub x: f64,
    pub y: f64,
    /// Final placement; differs from the requested one after a flip.
    pub placement: Placement,
    pub middleware_data: MiddlewareData,
}

/// Why a position could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeError {
    /// The reference element has no box (unknown or detached).
    ReferenceMissing(ElementId),
    /// The floating element has no box (unknown or detached).
    FloatingMissing(ElementId),
}

impl fmt::Display for ComputeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReferenceMissing(el) => write!(f, "reference element {el} is not in the document"),
            Self::FloatingMissing(el) => write!(f, "floating element {el} is not in the document"),
        }
    }
}

impl std::error::Error for ComputeError {}

/// Compute where `floating` should go relative to `reference`.
///
/// With [`Strategy::Absolute`] the result is in page coordinates; with
/// [`Strategy::Fixed`] it is relative to the viewport. Without an explicit
/// placement the element goes to the bottom, centered.
pub fn compute_position<D: Document + ?Sized>(
    doc: &D,
    reference: ElementId,
    floating: ElementId,
    options: &FloatingOptions,
) -> Result<ComputedPosition, ComputeError> {
    let mut reference_rect = doc
        .bounding_rect(reference)
        .ok_or(ComputeError::ReferenceMissing(reference))?;
    let floating_rect = doc
        .bounding_rect(floating)
        .ok_or(ComputeError::FloatingMissing(floating))?;

    let mut clip = doc.viewport();
    if options.strategy == Strategy::Fixed {
        reference_rect = Rect::new(
            reference_rect.x - clip.x,
            reference_rect.y - clip.y,
            reference_rect.width,
            reference_rect.height,
        );
        clip = Rect::from_size(clip.width, clip.height);
    }

    let mut placement = options.placement.unwrap_or(Placement::BOTTOM);
    let mut coords = coords_for_placement(&reference_rect, &floating_rect, placement);
    let mut data = MiddlewareData::default();
    let mut resets = 0;

    let mut i = 0;
    while let Some(middleware) = options.middleware.get(i) {
        let snapshot = data;
        let state = MiddlewareState {
            coords,
            placement,
            reference: reference_rect,
            floating: floating_rect,
            clip,
            data: &snapshot,
        };
        let outcome = middleware.apply(&state, &mut data, doc);
        if let Some(next) = outcome.coords {
            coords = next;
        }

        if let Some(reset) = outcome.reset
            && resets < MAX_RESETS
        {
            resets += 1;
            if let Some(next) = reset.placement {
                placement = next;
                coords = coords_for_placement(&reference_rect, &floating_rect, placement);
            }
            tracing::trace!(
                middleware = middleware.name(),
                %placement,
                resets,
                "middleware chain reset"
            );
            i = 0;
            continue;
        }
        i += 1;
    }

    let Point { x, y } = coords;
    Ok(ComputedPosition {
        x,
        y,
        placement,
        middleware_data: data,
    })
}
