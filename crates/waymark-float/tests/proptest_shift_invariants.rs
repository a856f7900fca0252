//! Property-based invariant tests for position computation.
//!
//! 1. Without middleware the floating box touches the reference on the
//!    requested side
//! 2. Shift on both axes keeps a box that fits the viewport inside it
//! 3. Limited shift never moves the box out of contact with the reference
//! 4. Arrow offsets stay within the floating box

use proptest::prelude::*;
use waymark_core::{Alignment, Document, Page, Placement, Rect, Side};
use waymark_float::{Arrow, FloatingOptions, LimitShift, Shift, compute_position};

const VIEW_W: f64 = 1024.0;
const VIEW_H: f64 = 768.0;
const EPS: f64 = 1e-6;

fn placement_strategy() -> impl Strategy<Value = Placement> {
    let side = prop_oneof![
        Just(Side::Top),
        Just(Side::Right),
        Just(Side::Bottom),
        Just(Side::Left)
    ];
    let alignment = prop_oneof![
        Just(None),
        Just(Some(Alignment::Start)),
        Just(Some(Alignment::End))
    ];
    (side, alignment).prop_map(|(side, alignment)| match alignment {
        Some(a) => Placement::aligned(side, a),
        None => Placement::new(side),
    })
}

fn reference_strategy() -> impl Strategy<Value = Rect> {
    (-200.0f64..1100.0, -200.0f64..900.0, 4.0f64..300.0, 4.0f64..200.0)
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

fn floating_strategy() -> impl Strategy<Value = Rect> {
    (20.0f64..400.0, 20.0f64..300.0).prop_map(|(w, h)| Rect::from_size(w, h))
}

struct Scene {
    page: Page,
    reference: waymark_core::ElementId,
    floating: waymark_core::ElementId,
    arrow: waymark_core::ElementId,
}

fn scene(reference: Rect, floating: Rect) -> Scene {
    let mut page = Page::new(VIEW_W, VIEW_H);
    let body = page.body();
    let r = page.append(body, "button");
    page.set_rect(r, reference);
    let f = page.append(body, "div");
    page.set_rect(f, floating);
    let a = page.append(f, "div");
    page.set_rect(a, Rect::from_size(10.0, 10.0));
    Scene {
        page,
        reference: r,
        floating: f,
        arrow: a,
    }
}

fn touches(side: Side, reference: &Rect, floating: &Rect) -> bool {
    match side {
        Side::Top => (floating.bottom() - reference.top()).abs() < EPS,
        Side::Bottom => (floating.top() - reference.bottom()).abs() < EPS,
        Side::Left => (floating.right() - reference.left()).abs() < EPS,
        Side::Right => (floating.left() - reference.right()).abs() < EPS,
    }
}

proptest! {
    #[test]
    fn bare_placement_touches_reference(
        placement in placement_strategy(),
        reference in reference_strategy(),
        floating in floating_strategy(),
    ) {
        let s = scene(reference, floating);
        let options = FloatingOptions { placement: Some(placement), ..FloatingOptions::default() };
        let pos = compute_position(&s.page, s.reference, s.floating, &options).unwrap();
        let placed = Rect::new(pos.x, pos.y, floating.width, floating.height);
        prop_assert!(touches(placement.side(), &reference, &placed));
    }

    #[test]
    fn two_axis_shift_contains(
        placement in placement_strategy(),
        reference in reference_strategy(),
        floating in floating_strategy(),
    ) {
        let s = scene(reference, floating);
        let options = FloatingOptions {
            middleware: vec![Shift::default().cross_axis(true).into()],
            placement: Some(placement),
            ..FloatingOptions::default()
        };
        let pos = compute_position(&s.page, s.reference, s.floating, &options).unwrap();
        let placed = Rect::new(pos.x, pos.y, floating.width, floating.height);
        let view = s.page.viewport();
        prop_assert!(placed.x >= view.x - EPS && placed.right() <= view.right() + EPS);
        prop_assert!(placed.y >= view.y - EPS && placed.bottom() <= view.bottom() + EPS);
    }

    #[test]
    fn limited_shift_keeps_contact(
        placement in placement_strategy(),
        reference in reference_strategy(),
        floating in floating_strategy(),
    ) {
        let s = scene(reference, floating);
        let options = FloatingOptions {
            middleware: vec![Shift::default().cross_axis(true).limiter(LimitShift::default()).into()],
            placement: Some(placement),
            ..FloatingOptions::default()
        };
        let pos = compute_position(&s.page, s.reference, s.floating, &options).unwrap();
        let placed = Rect::new(pos.x, pos.y, floating.width, floating.height);
        prop_assert!(placed.right() >= reference.left() - EPS);
        prop_assert!(placed.left() <= reference.right() + EPS);
        prop_assert!(placed.bottom() >= reference.top() - EPS);
        prop_assert!(placed.top() <= reference.bottom() + EPS);
    }

    #[test]
    fn arrow_offset_within_floating(
        placement in placement_strategy(),
        reference in reference_strategy(),
        floating in floating_strategy(),
    ) {
        let s = scene(reference, floating);
        let options = FloatingOptions {
            middleware: vec![
                Shift::default().cross_axis(true).limiter(LimitShift::default()).into(),
                Arrow::new(s.arrow).into(),
            ],
            placement: Some(placement),
            ..FloatingOptions::default()
        };
        let pos = compute_position(&s.page, s.reference, s.floating, &options).unwrap();
        let arrow = pos.middleware_data.arrow.expect("arrow data");
        let (offset, len) = match (arrow.x, arrow.y) {
            (Some(x), None) => (x, floating.width),
            (None, Some(y)) => (y, floating.height),
            other => panic!("exactly one arrow axis expected, got {other:?}"),
        };
        prop_assert!(offset >= -EPS && offset + 10.0 <= len + EPS);
    }
}
