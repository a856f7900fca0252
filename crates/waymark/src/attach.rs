#![forbid(unsafe_code)]

//! Resolving a step's declared attachment into a concrete element.

use waymark_core::{Document, ElementId, Placement};

use crate::step::{AttachElement, ElementTarget, Step};

/// An attachment after element lookup. Valid for one positioning pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolvedAttachment {
    pub element: Option<ElementId>,
    pub on: Option<Placement>,
}

/// Resolve `step.options.attach_to` against `doc`.
///
/// Callbacks run exactly once, with the step as context. Selectors that
/// match nothing or fail to parse resolve to no element; neither is an error
/// for the caller, the step is simply centered.
pub fn resolve_attach_to<D: Document + ?Sized>(step: &Step, doc: &D) -> ResolvedAttachment {
    let Some(attach_to) = &step.options.attach_to else {
        return ResolvedAttachment::default();
    };

    let candidate = match &attach_to.element {
        None => None,
        Some(AttachElement::Callback(f)) => f(step),
        Some(AttachElement::Selector(selector)) => Some(ElementTarget::Selector(selector.clone())),
        Some(AttachElement::Node(el)) => Some(ElementTarget::Node(*el)),
    };

    ResolvedAttachment {
        element: candidate.and_then(|target| lookup(step, doc, target)),
        on: attach_to.on,
    }
}

fn lookup<D: Document + ?Sized>(step: &Step, doc: &D, target: ElementTarget) -> Option<ElementId> {
    match target {
        ElementTarget::Selector(selector) => match doc.query_selector(&selector) {
            Ok(Some(el)) => Some(el),
            Ok(None) => {
                tracing::warn!(
                    step = step.id(),
                    %selector,
                    "the element for this step was not found"
                );
                None
            }
            Err(err) => {
                tracing::debug!(step = step.id(), %selector, %err, "invalid attachment selector");
                None
            }
        },
        ElementTarget::Node(el) if doc.is_connected(el) => Some(el),
        ElementTarget::Node(el) => {
            tracing::warn!(step = step.id(), element = %el, "attachment element is not in the document");
            None
        }
    }
}

/// Whether a step with this attachment is shown centered instead of
/// anchored. Pure: never resolves anything itself.
pub fn should_center_step(resolved: Option<&ResolvedAttachment>) -> bool {
    resolved.is_none_or(|r| r.element.is_none() || r.on.is_none())
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use waymark_core::Page;

    use super::*;
    use crate::step::{AttachTo, StepOptions};

    fn page() -> (Page, ElementId) {
        let mut page = Page::new(1024.0, 768.0);
        let body = page.body();
        let button = page.append(body, "button");
        page.set_id(button, "start");
        (page, button)
    }

    fn step(attach_to: AttachTo) -> Step {
        Step::with_id("intro", StepOptions::default().attach_to(attach_to))
    }

    #[test]
    fn absent_attachment_resolves_empty() {
        let (page, _) = page();
        let s = Step::with_id("intro", StepOptions::default());
        assert_eq!(resolve_attach_to(&s, &page), ResolvedAttachment::default());
    }

    #[test]
    fn selector_resolves_first_match() {
        let (page, button) = page();
        let resolved = resolve_attach_to(&step(AttachTo::selector("#start", Placement::TOP)), &page);
        assert_eq!(resolved.element, Some(button));
        assert_eq!(resolved.on, Some(Placement::TOP));
    }

    #[test]
    fn unmatched_and_invalid_selectors_resolve_to_none() {
        let (page, _) = page();
        let missing = resolve_attach_to(&step(AttachTo::selector("#nope", Placement::TOP)), &page);
        assert_eq!(missing.element, None);
        assert_eq!(missing.on, Some(Placement::TOP));
        let invalid = resolve_attach_to(&step(AttachTo::selector("!!", Placement::TOP)), &page);
        assert_eq!(invalid.element, None);
    }

    #[test]
    fn callback_runs_once_with_step_context() {
        let (page, button) = page();
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let s = step(AttachTo::callback(
            move |step| {
                seen.set(seen.get() + 1);
                assert_eq!(step.id(), "intro");
                Some(ElementTarget::Node(ElementId::new(button.raw())))
            },
            Placement::RIGHT,
        ));
        let resolved = resolve_attach_to(&s, &page);
        assert_eq!(calls.get(), 1);
        assert_eq!(resolved.element, Some(button));
    }

    #[test]
    fn callback_may_return_selector() {
        let (page, button) = page();
        let s = step(AttachTo::callback(
            |_| Some(ElementTarget::Selector("button".into())),
            Placement::LEFT,
        ));
        assert_eq!(resolve_attach_to(&s, &page).element, Some(button));
    }

    #[test]
    fn detached_node_is_unresolved() {
        let (mut page, button) = page();
        page.remove(button);
        let resolved = resolve_attach_to(&step(AttachTo::node(button, Placement::TOP)), &page);
        assert_eq!(resolved.element, None);
    }

    #[test]
    fn centering_predicate() {
        let el = Some(ElementId::new(3));
        assert!(should_center_step(None));
        assert!(should_center_step(Some(&ResolvedAttachment::default())));
        assert!(should_center_step(Some(&ResolvedAttachment {
            element: el,
            on: None
        })));
        assert!(should_center_step(Some(&ResolvedAttachment {
            element: None,
            on: Some(Placement::TOP)
        })));
        assert!(!should_center_step(Some(&ResolvedAttachment {
            element: el,
            on: Some(Placement::TOP)
        })));
    }
}
