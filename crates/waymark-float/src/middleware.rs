#![forbid(unsafe_code)]

//! Placement middleware.
//!
//! A middleware is one adjustment step in a position computation. Each one
//! sees the coordinates produced so far and may move them, record data for
//! later consumers (the arrow offset, the applied shift), or ask for the
//! whole chain to restart with a different placement.
//!
//! Order matters: `shift` before `arrow` means the arrow is centered against
//! the already-shifted floating element.

use waymark_core::geometry::clamp;
use waymark_core::{Axis, Document, ElementId, Placement, Point, Rect, Sides};

/// Moves the floating element away from the reference along the side axis
/// (`main_axis`) and along the alignment axis (`cross_axis`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub main_axis: f64,
    pub cross_axis: f64,
}

impl Offset {
    pub fn new(main_axis: f64) -> Self {
        Self {
            main_axis,
            cross_axis: 0.0,
        }
    }
}

/// Switches to the opposite side when the preferred side overflows the
/// viewport and the opposite side overflows less.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Flip {
    pub padding: f64,
}

/// Keeps the floating element inside the viewport by sliding it.
///
/// `main_axis` slides along the alignment axis (e.g. horizontally for a
/// `top` placement), `cross_axis` along the side axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shift {
    pub main_axis: bool,
    pub cross_axis: bool,
    pub padding: f64,
    pub limiter: Option<LimitShift>,
}

impl Default for Shift {
    fn default() -> Self {
        Self {
            main_axis: true,
            cross_axis: false,
            padding: 0.0,
            limiter: None,
        }
    }
}

impl Shift {
    #[must_use]
    pub fn cross_axis(mut self, enabled: bool) -> Self {
        self.cross_axis = enabled;
        self
    }

    #[must_use]
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn limiter(mut self, limiter: LimitShift) -> Self {
        self.limiter = Some(limiter);
        self
    }
}

/// Limits [`Shift`] so the floating element never slides past the far edge
/// of its reference: once the two would stop touching, shifting stops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimitShift {
    /// How far before the edge the limit kicks in, along the main axis.
    pub offset: f64,
    pub main_axis: bool,
    pub cross_axis: bool,
}

impl Default for LimitShift {
    fn default() -> Self {
        Self {
            offset: 0.0,
            main_axis: true,
            cross_axis: true,
        }
    }
}

/// Computes where an arrow element should sit to point at the reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrow {
    pub element: ElementId,
    /// Minimum distance between the arrow and the floating element's corners.
    pub padding: f64,
}

impl Arrow {
    pub fn new(element: ElementId) -> Self {
        Self {
            element,
            padding: 0.0,
        }
    }
}

/// One entry of a middleware chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Middleware {
    Offset(Offset),
    Flip(Flip),
    Shift(Shift),
    Arrow(Arrow),
}

impl Middleware {
    /// Short name used in logs and data keys.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Offset(_) => "offset",
            Self::Flip(_) => "flip",
            Self::Shift(_) => "shift",
            Self::Arrow(_) => "arrow",
        }
    }

    pub fn is_arrow(&self) -> bool {
        matches!(self, Self::Arrow(_))
    }

    pub fn is_shift(&self) -> bool {
        matches!(self, Self::Shift(_))
    }
}

impl From<Offset> for Middleware {
    fn from(value: Offset) -> Self {
        Self::Offset(value)
    }
}

impl From<Flip> for Middleware {
    fn from(value: Flip) -> Self {
        Self::Flip(value)
    }
}

impl From<Shift> for Middleware {
    fn from(value: Shift) -> Self {
        Self::Shift(value)
    }
}

impl From<Arrow> for Middleware {
    fn from(value: Arrow) -> Self {
        Self::Arrow(value)
    }
}

/// Arrow position reported by the [`Arrow`] middleware.
///
/// Exactly one of `x`/`y` is set: the one along the placement's alignment
/// axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ArrowData {
    pub x: Option<f64>,
    pub y: Option<f64>,
    /// Distance between the ideal (centered) and the clamped arrow position.
    pub center_offset: f64,
    /// Set when the floating element itself was moved so the arrow can reach
    /// a small reference.
    pub alignment_offset: Option<f64>,
}

/// Data accumulated by a middleware chain, keyed by middleware.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MiddlewareData {
    /// Displacement applied by [`Offset`].
    pub offset: Option<Point>,
    /// Displacement applied by [`Shift`].
    pub shift: Option<Point>,
    pub arrow: Option<ArrowData>,
    /// Placement the chain flipped away from.
    pub flip: Option<Placement>,
}

/// Input to one middleware.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MiddlewareState<'a> {
    pub coords: Point,
    pub placement: Placement,
    pub reference: Rect,
    pub floating: Rect,
    pub clip: Rect,
    pub data: &'a MiddlewareData,
}

impl MiddlewareState<'_> {
    fn overflow_at(&self, coords: Point, padding: f64) -> Sides {
        self.floating
            .at(coords)
            .overflow_within(&self.clip, Sides::all(padding))
    }
}

/// Output of one middleware.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct MiddlewareOutcome {
    pub coords: Option<Point>,
    pub reset: Option<Reset>,
}

/// Restart request. `placement` switches sides and recomputes the base
/// coordinates; `None` restarts with the current coordinates.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Reset {
    pub placement: Option<Placement>,
}

/// Base coordinates for `placement` before any middleware runs.
pub fn coords_for_placement(reference: &Rect, floating: &Rect, placement: Placement) -> Point {
    let center_x = reference.x + reference.width / 2.0 - floating.width / 2.0;
    let center_y = reference.y + reference.height / 2.0 - floating.height / 2.0;
    let mut coords = match placement.side() {
        waymark_core::Side::Top => Point::new(center_x, reference.y - floating.height),
        waymark_core::Side::Bottom => Point::new(center_x, reference.bottom()),
        waymark_core::Side::Right => Point::new(reference.right(), center_y),
        waymark_core::Side::Left => Point::new(reference.x - floating.width, center_y),
    };
    let axis = placement.alignment_axis();
    let align = reference.length(axis) / 2.0 - floating.length(axis) / 2.0;
    match placement.alignment() {
        Some(waymark_core::Alignment::Start) => coords.set(axis, coords.get(axis) - align),
        Some(waymark_core::Alignment::End) => coords.set(axis, coords.get(axis) + align),
        None => {}
    }
    coords
}

impl Middleware {
    pub(crate) fn apply<D: Document + ?Sized>(
        &self,
        state: &MiddlewareState<'_>,
        data: &mut MiddlewareData,
        doc: &D,
    ) -> MiddlewareOutcome {
        match self {
            Self::Offset(offset) => offset.apply(state, data),
            Self::Flip(flip) => flip.apply(state, data),
            Self::Shift(shift) => shift.apply(state, data),
            Self::Arrow(arrow) => arrow.apply(state, data, doc),
        }
    }
}

impl Offset {
    fn apply(&self, state: &MiddlewareState<'_>, data: &mut MiddlewareData) -> MiddlewareOutcome {
        let side = state.placement.side();
        let main = if side.is_origin() {
            -self.main_axis
        } else {
            self.main_axis
        };
        let cross = match state.placement.alignment() {
            Some(waymark_core::Alignment::End) => -self.cross_axis,
            _ => self.cross_axis,
        };
        let mut delta = Point::default();
        delta.set(side.axis(), main);
        delta.set(side.axis().opposite(), cross);
        data.offset = Some(delta);
        MiddlewareOutcome {
            coords: Some(Point::new(state.coords.x + delta.x, state.coords.y + delta.y)),
            reset: None,
        }
    }
}

fn side_value(sides: &Sides, side: waymark_core::Side) -> f64 {
    match side {
        waymark_core::Side::Top => sides.top,
        waymark_core::Side::Right => sides.right,
        waymark_core::Side::Bottom => sides.bottom,
        waymark_core::Side::Left => sides.left,
    }
}

impl Flip {
    fn apply(&self, state: &MiddlewareState<'_>, data: &mut MiddlewareData) -> MiddlewareOutcome {
        if data.flip.is_some() {
            return MiddlewareOutcome::default();
        }
        let side = state.placement.side();
        let overflow = side_value(&state.overflow_at(state.coords, self.padding), side);
        if overflow <= 0.0 {
            return MiddlewareOutcome::default();
        }
        let flipped = state.placement.flipped();
        let flipped_coords = coords_for_placement(&state.reference, &state.floating, flipped);
        let flipped_overflow = side_value(
            &state.overflow_at(flipped_coords, self.padding),
            flipped.side(),
        );
        if flipped_overflow >= overflow {
            return MiddlewareOutcome::default();
        }
        data.flip = Some(state.placement);
        MiddlewareOutcome {
            coords: None,
            reset: Some(Reset {
                placement: Some(flipped),
            }),
        }
    }
}

impl Shift {
    fn apply(&self, state: &MiddlewareState<'_>, data: &mut MiddlewareData) -> MiddlewareOutcome {
        let cross_axis = state.placement.side_axis();
        let main_axis = cross_axis.opposite();
        let overflow = state.overflow_at(state.coords, self.padding);

        let mut coords = state.coords;
        if self.main_axis {
            let value = coords.get(main_axis);
            let min = value + overflow.min_side(main_axis);
            let max = value - overflow.max_side(main_axis);
            coords.set(main_axis, clamp(min, value, max));
        }
        if self.cross_axis {
            let value = coords.get(cross_axis);
            let min = value + overflow.min_side(cross_axis);
            let max = value - overflow.max_side(cross_axis);
            coords.set(cross_axis, clamp(min, value, max));
        }

        if let Some(limiter) = &self.limiter {
            coords = limiter.limit(state, coords);
        }

        data.shift = Some(Point::new(
            coords.x - state.coords.x,
            coords.y - state.coords.y,
        ));
        MiddlewareOutcome {
            coords: Some(coords),
            reset: None,
        }
    }
}

impl LimitShift {
    fn limit(&self, state: &MiddlewareState<'_>, mut coords: Point) -> Point {
        let cross_axis = state.placement.side_axis();
        let main_axis = cross_axis.opposite();
        let reference = &state.reference;
        let floating = &state.floating;

        if self.main_axis {
            let limit_min =
                reference.start(main_axis) - floating.length(main_axis) + self.offset;
            let limit_max =
                reference.start(main_axis) + reference.length(main_axis) - self.offset;
            coords.set(main_axis, clamp(limit_min, coords.get(main_axis), limit_max));
        }

        if self.cross_axis {
            let offset = state
                .data
                .offset
                .map_or(0.0, |delta| delta.get(cross_axis));
            let is_origin = state.placement.side().is_origin();
            let limit_min = reference.start(cross_axis) - floating.length(cross_axis)
                + if is_origin { offset } else { 0.0 };
            let limit_max = reference.start(cross_axis)
                + reference.length(cross_axis)
                + if is_origin { 0.0 } else { offset };
            coords.set(cross_axis, clamp(limit_min, coords.get(cross_axis), limit_max));
        }

        coords
    }
}

impl Arrow {
    fn apply<D: Document + ?Sized>(
        &self,
        state: &MiddlewareState<'_>,
        data: &mut MiddlewareData,
        doc: &D,
    ) -> MiddlewareOutcome {
        let Some(arrow_rect) = doc.bounding_rect(self.element) else {
            return MiddlewareOutcome::default();
        };
        let axis = state.placement.alignment_axis();
        let arrow_len = arrow_rect.length(axis);
        let reference = &state.reference;
        let floating = &state.floating;
        let coord = state.coords.get(axis);

        let end_diff = reference.length(axis) + reference.start(axis) - coord - floating.length(axis);
        let start_diff = coord - reference.start(axis);
        let client_size = floating.length(axis);

        let center_to_reference = end_diff / 2.0 - start_diff / 2.0;
        let largest_padding = client_size / 2.0 - arrow_len / 2.0 - 1.0;
        let padding = self.padding.min(largest_padding);
        let min = padding;
        let max = client_size - arrow_len - padding;
        let center = client_size / 2.0 - arrow_len / 2.0 + center_to_reference;
        let offset = clamp(min, center, max);

        // A small reference can leave the arrow pinned to a corner. Nudge the
        // floating element itself once so the arrow still reaches it.
        let should_add_offset = data.arrow.is_none()
            && state.placement.alignment().is_some()
            && center != offset
            && reference.length(axis) / 2.0 - padding - arrow_len / 2.0 < 0.0;
        let alignment_offset = if should_add_offset {
            if center < min { center - min } else { center - max }
        } else {
            0.0
        };

        let mut arrow = ArrowData {
            center_offset: center - offset - alignment_offset,
            alignment_offset: should_add_offset.then_some(alignment_offset),
            ..ArrowData::default()
        };
        match axis {
            Axis::X => arrow.x = Some(offset),
            Axis::Y => arrow.y = Some(offset),
        }
        data.arrow = Some(arrow);

        let mut coords = state.coords;
        coords.set(axis, coord + alignment_offset);
        MiddlewareOutcome {
            coords: Some(coords),
            reset: should_add_offset.then_some(Reset { placement: None }),
        }
    }
}
