#![forbid(unsafe_code)]

//! Arrow placement after a positioning pass.

use waymark_core::{Document, ElementId, Placement, Side};
use waymark_float::MiddlewareData;

use crate::config::EngineConfig;

/// The side of the tooltip the arrow sticks out of: opposite the placement
/// side, alignment ignored.
pub fn static_side(placement: Placement) -> Side {
    placement.side().opposite()
}

/// The arrow element inside `floating`, if the markup has one.
pub(crate) fn find_arrow<D: Document + ?Sized>(
    doc: &D,
    floating: ElementId,
    config: &EngineConfig,
) -> Option<ElementId> {
    let selector = config.arrow_selector();
    match doc.query_selector_within(floating, &selector) {
        Ok(found) => found,
        Err(err) => {
            tracing::debug!(%selector, %err, "arrow selector rejected");
            None
        }
    }
}

/// Write the arrow's inline position from the last computation.
///
/// Offsets the arrow middleware produced go to `left`/`top`; a missing axis
/// is cleared, as are `right` and `bottom`. The static side is then pushed
/// out by `config.arrow_offset_px`. No-op when the tooltip has no arrow or
/// no arrow middleware ran; the markup keeps whatever styles it had.
pub fn place_arrow<D: Document + ?Sized>(
    doc: &mut D,
    floating: ElementId,
    placement: Placement,
    data: &MiddlewareData,
    config: &EngineConfig,
) {
    let Some(arrow_data) = data.arrow else {
        return;
    };
    let Some(arrow) = find_arrow(doc, floating, config) else {
        return;
    };
    let (x, y) = (arrow_data.x, arrow_data.y);
    let px = |v: f64| format!("{v}px");

    doc.set_style(arrow, "left", x.map(px).as_deref());
    doc.set_style(arrow, "top", y.map(px).as_deref());
    doc.set_style(arrow, "right", None);
    doc.set_style(arrow, "bottom", None);

    let side = static_side(placement);
    let offset = format!("-{}px", config.arrow_offset_px);
    doc.set_style(arrow, side.as_str(), Some(&offset));
    tracing::trace!(%arrow, side = side.as_str(), ?x, ?y, "arrow placed");
}

#[cfg(test)]
mod tests {
    use waymark_core::{Alignment, Page, Rect};
    use waymark_float::ArrowData;

    use super::*;

    fn tooltip() -> (Page, ElementId, ElementId) {
        let mut page = Page::new(800.0, 600.0);
        let body = page.body();
        let floating = page.append(body, "div");
        page.set_rect(floating, Rect::from_size(200.0, 80.0));
        let arrow = page.append(floating, "div");
        page.add_class(arrow, "shepherd-arrow");
        (page, floating, arrow)
    }

    fn data(x: Option<f64>, y: Option<f64>) -> MiddlewareData {
        MiddlewareData {
            arrow: Some(ArrowData {
                x,
                y,
                center_offset: 0.0,
                alignment_offset: None,
            }),
            ..MiddlewareData::default()
        }
    }

    #[test]
    fn static_side_ignores_alignment() {
        assert_eq!(static_side(Placement::TOP), Side::Bottom);
        assert_eq!(static_side(Placement::aligned(Side::Top, Alignment::Start)), Side::Bottom);
        assert_eq!(static_side(Placement::LEFT), Side::Right);
        assert_eq!(static_side(Placement::aligned(Side::Right, Alignment::End)), Side::Left);
        assert_eq!(static_side(Placement::BOTTOM), Side::Top);
    }

    #[test]
    fn bottom_placement_writes_left_and_top_offset() {
        let (mut page, floating, arrow) = tooltip();
        page.set_style(arrow, "bottom", Some("3px"));
        let config = EngineConfig::default();
        place_arrow(&mut page, floating, Placement::BOTTOM, &data(Some(92.0), None), &config);
        assert_eq!(page.style(arrow, "left"), Some("92px"));
        assert_eq!(page.style(arrow, "top"), Some("-35px"));
        assert_eq!(page.style(arrow, "right"), None);
        assert_eq!(page.style(arrow, "bottom"), None);
    }

    #[test]
    fn left_placement_pushes_right_side() {
        let (mut page, floating, arrow) = tooltip();
        let config = EngineConfig::default();
        place_arrow(&mut page, floating, Placement::LEFT, &data(None, Some(20.5)), &config);
        assert_eq!(page.style(arrow, "left"), None);
        assert_eq!(page.style(arrow, "top"), Some("20.5px"));
        assert_eq!(page.style(arrow, "right"), Some("-35px"));
    }

    #[test]
    fn missing_arrow_data_leaves_markup_untouched() {
        let (mut page, floating, arrow) = tooltip();
        page.set_style(arrow, "left", Some("4px"));
        let config = EngineConfig::default();
        place_arrow(&mut page, floating, Placement::TOP, &MiddlewareData::default(), &config);
        assert_eq!(page.style(arrow, "left"), Some("4px"));
        assert_eq!(page.style(arrow, "top"), None);
        assert_eq!(page.style(arrow, "bottom"), None);
    }

    #[test]
    fn no_arrow_element_is_a_no_op() {
        let mut page = Page::new(800.0, 600.0);
        let body = page.body();
        let floating = page.append(body, "div");
        let config = EngineConfig::default();
        place_arrow(&mut page, floating, Placement::TOP, &data(Some(1.0), None), &config);
        assert_eq!(page.style(floating, "bottom"), None);
    }
}
