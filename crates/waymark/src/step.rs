#![forbid(unsafe_code)]

//! The tooltip instance a tour step owns, and how it declares its anchor.

use std::fmt;
use std::rc::Rc;

use waymark_core::{ElementId, Placement};
use waymark_float::{AutoUpdateHandle, FloatingOptionsOverride, SubscriptionId};

use crate::attach::ResolvedAttachment;
use crate::util::uuid;

/// Produces the anchor for a step on demand. Receives the step itself so it
/// can read step state.
pub type ElementCallback = Rc<dyn Fn(&Step) -> Option<ElementTarget>>;

/// What an [`ElementCallback`] may return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementTarget {
    /// Queried against the document like a literal selector.
    Selector(String),
    Node(ElementId),
}

/// The `element` half of an attachment.
#[derive(Clone)]
pub enum AttachElement {
    /// Evaluated once per resolution with the step as context.
    Callback(ElementCallback),
    Selector(String),
    Node(ElementId),
}

impl fmt::Debug for AttachElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callback(_) => f.write_str("Callback(..)"),
            Self::Selector(s) => f.debug_tuple("Selector").field(s).finish(),
            Self::Node(el) => f.debug_tuple("Node").field(el).finish(),
        }
    }
}

/// Which element a step's tooltip points at, and from which side. Either
/// half missing means the tooltip is centered on the page.
#[derive(Debug, Clone, Default)]
pub struct AttachTo {
    pub element: Option<AttachElement>,
    pub on: Option<Placement>,
}

impl AttachTo {
    /// Attach to the first element matching `selector`.
    pub fn selector(selector: impl Into<String>, on: Placement) -> Self {
        Self {
            element: Some(AttachElement::Selector(selector.into())),
            on: Some(on),
        }
    }

    /// Attach to a known element.
    pub fn node(element: ElementId, on: Placement) -> Self {
        Self {
            element: Some(AttachElement::Node(element)),
            on: Some(on),
        }
    }

    /// Attach to whatever `f` returns at resolution time.
    pub fn callback(f: impl Fn(&Step) -> Option<ElementTarget> + 'static, on: Placement) -> Self {
        Self {
            element: Some(AttachElement::Callback(Rc::new(f))),
            on: Some(on),
        }
    }
}

/// Per-step options the positioning engine reads.
#[derive(Debug, Clone)]
pub struct StepOptions {
    pub attach_to: Option<AttachTo>,
    /// Show the directional arrow when the tooltip markup has one.
    pub arrow: bool,
    /// Author overrides merged over the computed placement options.
    pub floating_ui_options: Option<FloatingOptionsOverride>,
}

impl Default for StepOptions {
    fn default() -> Self {
        Self {
            attach_to: None,
            arrow: true,
            floating_ui_options: None,
        }
    }
}

impl StepOptions {
    #[must_use]
    pub fn attach_to(mut self, attach_to: AttachTo) -> Self {
        self.attach_to = Some(attach_to);
        self
    }

    #[must_use]
    pub fn arrow(mut self, arrow: bool) -> Self {
        self.arrow = arrow;
        self
    }

    #[must_use]
    pub fn floating_ui_options(mut self, options: FloatingOptionsOverride) -> Self {
        self.floating_ui_options = Some(options);
        self
    }
}

/// A tour step's tooltip instance.
///
/// The host renders the markup and fills in `el` (the floating tooltip) and
/// `content` (its content box); the engine fills in `target` and owns the
/// subscription stored in the cleanup slot.
#[derive(Debug)]
pub struct Step {
    id: String,
    pub options: StepOptions,
    /// The floating tooltip element.
    pub el: Option<ElementId>,
    /// The content element inside the tooltip.
    pub content: Option<ElementId>,
    /// Reference the tooltip was last positioned against (body when centered).
    pub target: Option<ElementId>,
    pub(crate) cleanup: Option<AutoUpdateHandle>,
    pub(crate) resolved: Option<ResolvedAttachment>,
}

impl Step {
    /// A step with a generated `step-<uuid>` id.
    pub fn new(options: StepOptions) -> Self {
        Self::with_id(format!("step-{}", uuid()), options)
    }

    pub fn with_id(id: impl Into<String>, options: StepOptions) -> Self {
        Self {
            id: id.into(),
            options,
            el: None,
            content: None,
            target: None,
            cleanup: None,
            resolved: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The content element, where presentation classes go.
    pub fn content_element(&self) -> Option<ElementId> {
        self.content
    }

    /// Attachment resolved by the last positioning pass.
    pub fn resolved_attach_to(&self) -> Option<&ResolvedAttachment> {
        self.resolved.as_ref()
    }

    /// Subscription last bound to this step, if any. A subscription that
    /// stopped itself because its tooltip left the document stays recorded
    /// here until the next setup or destroy; ask
    /// [`PositionEngine::cleanup`](crate::PositionEngine::cleanup) for the
    /// live id.
    pub fn cleanup(&self) -> Option<SubscriptionId> {
        self.cleanup.as_ref().map(AutoUpdateHandle::id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_prefixed_and_distinct() {
        let a = Step::new(StepOptions::default());
        let b = Step::new(StepOptions::default());
        assert!(a.id().starts_with("step-"));
        assert_eq!(a.id().len(), "step-".len() + 36);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn arrow_defaults_on() {
        assert!(StepOptions::default().arrow);
        assert!(!StepOptions::default().arrow(false).arrow);
    }

    #[test]
    fn fresh_step_has_no_cleanup() {
        let step = Step::with_id("intro", StepOptions::default());
        assert_eq!(step.cleanup(), None);
        assert!(step.resolved_attach_to().is_none());
    }

    #[test]
    fn debug_hides_callback() {
        let attach = AttachTo::callback(|_| None, Placement::TOP);
        assert!(format!("{attach:?}").contains("Callback(..)"));
    }
}
