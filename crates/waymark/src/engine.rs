#![forbid(unsafe_code)]

//! The positioning engine: attach a step's tooltip, keep it placed, tear it
//! down.
//!
//! # Model
//!
//! The engine is driven entirely by its host:
//!
//! - [`PositionEngine::setup_tooltip`] resolves the attachment, positions the
//!   tooltip once and subscribes it to layout changes.
//! - [`PositionEngine::handle_trigger`] recomputes every subscription a
//!   scroll, resize or element mutation affects.
//! - [`PositionEngine::advance`] moves the engine clock; tooltips receive
//!   focus once the settle delay has elapsed after positioning.
//! - [`PositionEngine::destroy_tooltip`] stops a step's subscription.
//!
//! # Invariants
//!
//! 1. A step owns at most one live subscription; setting up twice leaves one.
//! 2. Once `destroy_tooltip` returns the step is never repositioned again.
//! 3. A subscription whose floating element left the document cancels
//!    itself on its next recomputation.
//! 4. Focus is only moved to elements still in the document.

use std::time::Duration;

use waymark_core::{Document, ElementId, FocusOptions};
use waymark_float::{
    AutoUpdate, ComputeError, ComputedPosition, FloatingOptions, LayoutTrigger, SubscriptionId,
    compute_position,
};

use crate::arrow::place_arrow;
use crate::attach::{ResolvedAttachment, resolve_attach_to, should_center_step};
use crate::config::EngineConfig;
use crate::lifecycle;
use crate::placement_options::get_floating_ui_options;
use crate::settle::SettleQueue;
use crate::step::Step;

/// What a subscription needs to recompute on its own.
#[derive(Debug, Clone)]
struct Reposition {
    step_id: String,
    options: FloatingOptions,
}

/// Positions step tooltips inside a [`Document`].
#[derive(Debug)]
pub struct PositionEngine<D> {
    doc: D,
    config: EngineConfig,
    updates: AutoUpdate<Reposition>,
    settle: SettleQueue,
}

impl<D: Document> PositionEngine<D> {
    pub fn new(doc: D) -> Self {
        Self::with_config(doc, EngineConfig::default())
    }

    pub fn with_config(doc: D, config: EngineConfig) -> Self {
        Self {
            doc,
            config,
            updates: AutoUpdate::new(),
            settle: SettleQueue::new(),
        }
    }

    pub fn document(&self) -> &D {
        &self.doc
    }

    /// Mutable access for the host to change the page between triggers.
    pub fn document_mut(&mut self) -> &mut D {
        &mut self.doc
    }

    pub fn into_document(self) -> D {
        self.doc
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Live subscriptions across all steps.
    pub fn active_subscriptions(&self) -> usize {
        self.updates.len()
    }

    /// Whether `step` is currently kept positioned.
    pub fn is_tooltip_active(&self, step: &Step) -> bool {
        lifecycle::is_bound(step, &self.updates)
    }

    /// The step's subscription id while it is still running. `None` once it
    /// was destroyed or stopped itself.
    pub fn cleanup(&self, step: &Step) -> Option<SubscriptionId> {
        step.cleanup().filter(|&id| self.updates.is_active(id))
    }

    /// Focus requests not yet delivered.
    pub fn pending_focus(&self) -> usize {
        self.settle.len()
    }

    /// See [`resolve_attach_to`](crate::attach::resolve_attach_to).
    pub fn resolve_attach_to(&self, step: &Step) -> ResolvedAttachment {
        resolve_attach_to(step, &self.doc)
    }

    /// See [`get_floating_ui_options`](crate::placement_options::get_floating_ui_options).
    pub fn get_floating_ui_options(
        &self,
        resolved: Option<&ResolvedAttachment>,
        step: &Step,
    ) -> FloatingOptions {
        get_floating_ui_options(resolved, step, &self.doc, &self.config)
    }

    /// Attach `step`'s tooltip and keep it positioned until
    /// [`destroy_tooltip`](Self::destroy_tooltip).
    ///
    /// Returns the options the tooltip is positioned with. Never fails: an
    /// attachment that cannot be resolved centers the tooltip on the body.
    pub fn setup_tooltip(&mut self, step: &mut Step) -> FloatingOptions {
        let _span = tracing::info_span!("waymark.setup_tooltip", step = step.id()).entered();

        self.destroy_tooltip(step);

        let resolved = resolve_attach_to(step, &self.doc);
        let options = get_floating_ui_options(Some(&resolved), step, &self.doc, &self.config);

        let target = match resolved.element.filter(|_| !should_center_step(Some(&resolved))) {
            Some(element) => element,
            None => {
                if let Some(content) = step.content_element() {
                    self.doc.add_class(content, &self.config.centered_class_name());
                }
                self.doc.body()
            }
        };
        step.resolved = Some(resolved);
        step.target = Some(target);

        match step.el {
            Some(floating) => {
                let handle = self.updates.subscribe(
                    target,
                    floating,
                    Reposition {
                        step_id: step.id().to_owned(),
                        options: options.clone(),
                    },
                );
                let id = handle.id();
                lifecycle::bind(step, &mut self.updates, handle);
                self.reposition(id);
            }
            None => tracing::debug!("step has no tooltip element; nothing to position"),
        }

        tracing::debug!(
            %target,
            placement = ?options.placement,
            middleware = options.middleware.len(),
            "tooltip set up"
        );
        options
    }

    /// Stop keeping `step` positioned. Safe to call any number of times.
    pub fn destroy_tooltip(&mut self, step: &mut Step) {
        if lifecycle::unbind(step, &mut self.updates) {
            tracing::debug!(step = step.id(), "tooltip auto-update stopped");
        }
    }

    /// Recompute every subscription `trigger` affects.
    pub fn handle_trigger(&mut self, trigger: LayoutTrigger) {
        let affected = self.updates.affected(trigger);
        tracing::trace!(?trigger, count = affected.len(), "layout trigger");
        for id in affected {
            self.reposition(id);
        }
    }

    /// Advance the engine clock by `dt`, delivering focus that came due.
    pub fn advance(&mut self, dt: Duration) {
        for element in self.settle.advance(dt) {
            if self.doc.is_connected(element) {
                self.doc.focus(
                    element,
                    FocusOptions {
                        prevent_scroll: true,
                    },
                );
            } else {
                tracing::trace!(%element, "skipping focus for removed tooltip");
            }
        }
    }

    fn reposition(&mut self, id: SubscriptionId) {
        let Some((reference, floating, payload)) = self.updates.get(id) else {
            return;
        };
        let Reposition { step_id, options } = payload.clone();

        if !self.doc.is_connected(floating) {
            self.updates.retire(id);
            tracing::debug!(step = %step_id, sub = id.raw(), "tooltip left the document; auto-update stopped");
            return;
        }

        match compute_position(&self.doc, reference, floating, &options) {
            Ok(position) => self.apply(floating, &options, &position),
            Err(err @ ComputeError::FloatingMissing(_)) => {
                self.updates.retire(id);
                tracing::debug!(step = %step_id, %err, "auto-update stopped");
            }
            Err(err @ ComputeError::ReferenceMissing(_)) => {
                tracing::debug!(step = %step_id, %err, "keeping last position");
            }
        }
    }

    fn apply(&mut self, floating: ElementId, options: &FloatingOptions, position: &ComputedPosition) {
        let doc = &mut self.doc;
        doc.set_style(floating, "position", Some(options.strategy.as_css()));
        doc.set_style(floating, "left", Some(&format!("{}px", position.x)));
        doc.set_style(floating, "top", Some(&format!("{}px", position.y)));
        doc.set_attribute(
            floating,
            &self.config.placement_attribute,
            &position.placement.to_string(),
        );
        place_arrow(
            doc,
            floating,
            position.placement,
            &position.middleware_data,
            &self.config,
        );
        self.settle.schedule(floating, self.config.settle_delay());
        tracing::trace!(
            %floating,
            x = position.x,
            y = position.y,
            placement = %position.placement,
            "tooltip positioned"
        );
    }
}

#[cfg(test)]
mod tests {
    use waymark_core::{Page, Placement, Rect};

    use super::*;
    use crate::step::{AttachTo, StepOptions};

    fn engine() -> (PositionEngine<Page>, Step) {
        let mut page = Page::new(1024.0, 768.0);
        let body = page.body();
        let button = page.append(body, "button");
        page.set_id(button, "start");
        page.set_rect(button, Rect::new(400.0, 300.0, 100.0, 40.0));
        let floating = page.append(body, "div");
        page.set_rect(floating, Rect::from_size(200.0, 80.0));

        let mut step = Step::with_id(
            "intro",
            StepOptions::default().attach_to(AttachTo::selector("#start", Placement::BOTTOM)),
        );
        step.el = Some(floating);
        (PositionEngine::new(page), step)
    }

    #[test]
    fn setup_positions_below_reference() {
        let (mut engine, mut step) = engine();
        let options = engine.setup_tooltip(&mut step);
        let floating = step.el.unwrap();

        assert_eq!(options.placement, Some(Placement::BOTTOM));
        let page = engine.document();
        assert_eq!(page.style(floating, "position"), Some("absolute"));
        assert_eq!(page.style(floating, "left"), Some("350px"));
        assert_eq!(page.style(floating, "top"), Some("340px"));
        assert_eq!(page.attribute(floating, "data-popper-placement"), Some("bottom"));
        assert!(engine.is_tooltip_active(&step));
    }

    #[test]
    fn reposition_skips_while_reference_is_detached() {
        let (mut engine, mut step) = engine();
        engine.setup_tooltip(&mut step);
        let target = step.target.unwrap();
        engine.document_mut().remove(target);
        engine.handle_trigger(LayoutTrigger::Scroll);

        assert!(engine.is_tooltip_active(&step));
        assert_eq!(engine.cleanup(&step), step.cleanup());
        assert_eq!(engine.document().style(step.el.unwrap(), "left"), Some("350px"));
    }

    #[test]
    fn destroy_without_setup_is_a_no_op() {
        let (mut engine, mut step) = engine();
        engine.destroy_tooltip(&mut step);
        engine.destroy_tooltip(&mut step);
        assert_eq!(engine.active_subscriptions(), 0);
    }
}
