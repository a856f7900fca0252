#![forbid(unsafe_code)]

//! Building the placement options for a step.

use waymark_core::Document;
use waymark_float::{Arrow, FloatingOptions, LimitShift, Shift, Strategy};

use crate::arrow::find_arrow;
use crate::attach::{ResolvedAttachment, should_center_step};
use crate::config::EngineConfig;
use crate::step::Step;

/// Options for positioning `step` against `resolved`.
///
/// The chain always starts with a two-axis, limited `shift`. An `arrow`
/// follows when the step wants one and its markup has an arrow element.
/// Anchored steps carry their requested placement; centered steps leave it
/// unset. The step's own overrides are merged last and win.
pub fn get_floating_ui_options<D: Document + ?Sized>(
    resolved: Option<&ResolvedAttachment>,
    step: &Step,
    doc: &D,
    config: &EngineConfig,
) -> FloatingOptions {
    let mut options = FloatingOptions {
        middleware: vec![
            Shift::default()
                .cross_axis(true)
                .limiter(LimitShift::default())
                .into(),
        ],
        strategy: Strategy::Absolute,
        placement: None,
    };

    if step.options.arrow
        && let Some(floating) = step.el
        && let Some(arrow) = find_arrow(doc, floating, config)
    {
        options.middleware.push(Arrow::new(arrow).into());
    }

    if !should_center_step(resolved) {
        options.placement = resolved.and_then(|r| r.on);
    }

    if let Some(patch) = &step.options.floating_ui_options {
        options.merge(patch);
    }

    options
}

#[cfg(test)]
mod tests {
    use waymark_core::{ElementId, Page, Placement};
    use waymark_float::{
        FloatingOptionsOverride, Middleware, MiddlewareOverride, MiddlewarePatch, Offset,
        ShiftPatch,
    };

    use super::*;
    use crate::step::StepOptions;

    struct Fixture {
        page: Page,
        button: ElementId,
        floating: ElementId,
        arrow: ElementId,
    }

    fn fixture() -> Fixture {
        let mut page = Page::new(1024.0, 768.0);
        let body = page.body();
        let button = page.append(body, "button");
        let floating = page.append(body, "div");
        let arrow = page.append(floating, "div");
        page.add_class(arrow, "shepherd-arrow");
        Fixture {
            page,
            button,
            floating,
            arrow,
        }
    }

    fn anchored(button: ElementId) -> ResolvedAttachment {
        ResolvedAttachment {
            element: Some(button),
            on: Some(Placement::RIGHT),
        }
    }

    fn step(f: &Fixture, options: StepOptions) -> Step {
        let mut step = Step::with_id("s", options);
        step.el = Some(f.floating);
        step
    }

    #[test]
    fn anchored_step_gets_shift_arrow_and_placement() {
        let f = fixture();
        let s = step(&f, StepOptions::default());
        let config = EngineConfig::default();
        let options = get_floating_ui_options(Some(&anchored(f.button)), &s, &f.page, &config);

        assert_eq!(options.strategy, Strategy::Absolute);
        assert_eq!(options.placement, Some(Placement::RIGHT));
        assert_eq!(options.middleware.len(), 2);
        assert!(matches!(
            &options.middleware[0],
            Middleware::Shift(shift) if shift.cross_axis && shift.limiter.is_some()
        ));
        assert_eq!(options.middleware[1], Middleware::Arrow(Arrow::new(f.arrow)));
    }

    #[test]
    fn centered_step_has_no_placement() {
        let f = fixture();
        let s = step(&f, StepOptions::default());
        let config = EngineConfig::default();
        assert_eq!(get_floating_ui_options(None, &s, &f.page, &config).placement, None);
        let half = ResolvedAttachment {
            element: Some(f.button),
            on: None,
        };
        assert_eq!(get_floating_ui_options(Some(&half), &s, &f.page, &config).placement, None);
    }

    #[test]
    fn arrow_needs_flag_and_element() {
        let f = fixture();
        let config = EngineConfig::default();
        let off = step(&f, StepOptions::default().arrow(false));
        assert!(!get_floating_ui_options(None, &off, &f.page, &config).has_middleware(Middleware::is_arrow));

        let prefixed = EngineConfig::default().with_class_prefix("acme");
        let on = step(&f, StepOptions::default());
        assert!(!get_floating_ui_options(None, &on, &f.page, &prefixed).has_middleware(Middleware::is_arrow));

        let no_el = Step::with_id("s", StepOptions::default());
        assert!(!get_floating_ui_options(None, &no_el, &f.page, &config).has_middleware(Middleware::is_arrow));
    }

    #[test]
    fn overrides_win() {
        let f = fixture();
        let config = EngineConfig::default();
        let patch = FloatingOptionsOverride::default()
            .strategy(Strategy::Fixed)
            .placement(Placement::TOP)
            .middleware(MiddlewareOverride::Patch(vec![MiddlewarePatch::Shift(ShiftPatch {
                cross_axis: Some(false),
                ..ShiftPatch::default()
            })]));
        let s = step(&f, StepOptions::default().floating_ui_options(patch));
        let options = get_floating_ui_options(Some(&anchored(f.button)), &s, &f.page, &config);

        assert_eq!(options.strategy, Strategy::Fixed);
        assert_eq!(options.placement, Some(Placement::TOP));
        assert!(matches!(
            &options.middleware[0],
            Middleware::Shift(shift) if !shift.cross_axis && shift.limiter.is_some()
        ));
        assert!(options.has_middleware(Middleware::is_arrow));
    }

    #[test]
    fn replacing_middleware_drops_computed_chain() {
        let f = fixture();
        let config = EngineConfig::default();
        let patch = FloatingOptionsOverride::default()
            .middleware(MiddlewareOverride::Replace(vec![Offset::new(8.0).into()]));
        let s = step(&f, StepOptions::default().floating_ui_options(patch));
        let options = get_floating_ui_options(Some(&anchored(f.button)), &s, &f.page, &config);
        assert_eq!(options.middleware, vec![Middleware::Offset(Offset::new(8.0))]);
    }
}
