#![forbid(unsafe_code)]

//! Placement options and caller overrides.
//!
//! [`FloatingOptions`] is what the engine computes for a step.
//! [`FloatingOptionsOverride`] is what a step author supplies to adjust it.
//! [`FloatingOptions::merged`] folds the override in, field by field, with
//! the override winning at every depth:
//!
//! | field          | rule                                                       |
//! |----------------|------------------------------------------------------------|
//! | `strategy`     | replaced when set                                          |
//! | `placement`    | replaced when set                                          |
//! | `middleware`   | see [`MiddlewareOverride`]                                 |
//! | middleware[i]  | same kind: per-field patch; other kind: replaced           |
//! | shift.limiter  | see [`LimiterPatch`]                                       |

use serde::{Deserialize, Serialize};
use waymark_core::{ElementId, Placement};

use crate::middleware::{Arrow, Flip, LimitShift, Middleware, Offset, Shift};

/// CSS positioning strategy of the floating element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Absolute,
    Fixed,
}

impl Strategy {
    /// Value for the CSS `position` property.
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Absolute => "absolute",
            Self::Fixed => "fixed",
        }
    }
}

/// Everything [`compute_position`](crate::compute_position) needs besides the
/// two elements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FloatingOptions {
    /// Applied in order.
    pub middleware: Vec<Middleware>,
    pub strategy: Strategy,
    /// `None` lets the computation pick its default side.
    pub placement: Option<Placement>,
}

impl FloatingOptions {
    /// Whether any middleware of the chain satisfies `pred`.
    pub fn has_middleware(&self, pred: impl Fn(&Middleware) -> bool) -> bool {
        self.middleware.iter().any(pred)
    }

    /// Apply `patch` on top of these options.
    #[must_use]
    pub fn merged(mut self, patch: &FloatingOptionsOverride) -> Self {
        self.merge(patch);
        self
    }

    /// In-place form of [`merged`](Self::merged).
    pub fn merge(&mut self, patch: &FloatingOptionsOverride) {
        if let Some(strategy) = patch.strategy {
            self.strategy = strategy;
        }
        if let Some(placement) = patch.placement {
            self.placement = Some(placement);
        }
        if let Some(middleware) = &patch.middleware {
            middleware.apply_to(&mut self.middleware);
        }
    }
}

/// Caller-supplied adjustments. Unset fields keep the computed value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FloatingOptionsOverride {
    pub middleware: Option<MiddlewareOverride>,
    pub strategy: Option<Strategy>,
    pub placement: Option<Placement>,
}

impl FloatingOptionsOverride {
    #[must_use]
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    #[must_use]
    pub fn placement(mut self, placement: Placement) -> Self {
        self.placement = Some(placement);
        self
    }

    #[must_use]
    pub fn middleware(mut self, middleware: MiddlewareOverride) -> Self {
        self.middleware = Some(middleware);
        self
    }
}

/// How an override changes the middleware list.
#[derive(Debug, Clone, PartialEq)]
pub enum MiddlewareOverride {
    /// Use exactly this list.
    Replace(Vec<Middleware>),
    /// Append after the computed list.
    Extend(Vec<Middleware>),
    /// Patch the computed list index by index. Entries past the end are
    /// appended when they can stand on their own.
    Patch(Vec<MiddlewarePatch>),
}

impl MiddlewareOverride {
    fn apply_to(&self, list: &mut Vec<Middleware>) {
        match self {
            Self::Replace(items) => *list = items.clone(),
            Self::Extend(items) => list.extend(items.iter().copied()),
            Self::Patch(patches) => {
                for (i, patch) in patches.iter().enumerate() {
                    match list.get_mut(i) {
                        Some(existing) => patch.apply_to(existing),
                        None => match patch.materialize() {
                            Some(m) => list.push(m),
                            None => tracing::debug!(
                                index = i,
                                "dropping middleware patch without a base entry"
                            ),
                        },
                    }
                }
            }
        }
    }
}

/// Field-level patch for one middleware entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MiddlewarePatch {
    Offset(OffsetPatch),
    Flip(FlipPatch),
    Shift(ShiftPatch),
    Arrow(ArrowPatch),
}

impl MiddlewarePatch {
    fn apply_to(&self, target: &mut Middleware) {
        let patched = match (self, &mut *target) {
            (Self::Offset(p), Middleware::Offset(m)) => {
                p.apply_to(m);
                true
            }
            (Self::Flip(p), Middleware::Flip(m)) => {
                p.apply_to(m);
                true
            }
            (Self::Shift(p), Middleware::Shift(m)) => {
                p.apply_to(m);
                true
            }
            (Self::Arrow(p), Middleware::Arrow(m)) => {
                p.apply_to(m);
                true
            }
            _ => false,
        };
        if patched {
            return;
        }
        match self.materialize() {
            Some(m) => *target = m,
            None => tracing::debug!(
                replacing = target.name(),
                "arrow patch without element cannot replace middleware"
            ),
        }
    }

    /// Build a full middleware from defaults plus this patch. Arrow patches
    /// need an element to stand alone.
    fn materialize(&self) -> Option<Middleware> {
        Some(match self {
            Self::Offset(p) => {
                let mut m = Offset::default();
                p.apply_to(&mut m);
                m.into()
            }
            Self::Flip(p) => {
                let mut m = Flip::default();
                p.apply_to(&mut m);
                m.into()
            }
            Self::Shift(p) => {
                let mut m = Shift::default();
                p.apply_to(&mut m);
                m.into()
            }
            Self::Arrow(p) => {
                let mut m = Arrow::new(p.element?);
                p.apply_to(&mut m);
                m.into()
            }
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OffsetPatch {
    pub main_axis: Option<f64>,
    pub cross_axis: Option<f64>,
}

impl OffsetPatch {
    fn apply_to(&self, m: &mut Offset) {
        if let Some(v) = self.main_axis {
            m.main_axis = v;
        }
        if let Some(v) = self.cross_axis {
            m.cross_axis = v;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlipPatch {
    pub padding: Option<f64>,
}

impl FlipPatch {
    fn apply_to(&self, m: &mut Flip) {
        if let Some(v) = self.padding {
            m.padding = v;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShiftPatch {
    pub main_axis: Option<bool>,
    pub cross_axis: Option<bool>,
    pub padding: Option<f64>,
    pub limiter: Option<LimiterPatch>,
}

impl ShiftPatch {
    fn apply_to(&self, m: &mut Shift) {
        if let Some(v) = self.main_axis {
            m.main_axis = v;
        }
        if let Some(v) = self.cross_axis {
            m.cross_axis = v;
        }
        if let Some(v) = self.padding {
            m.padding = v;
        }
        match self.limiter {
            None => {}
            Some(LimiterPatch::Disable) => m.limiter = None,
            Some(LimiterPatch::Patch(p)) => {
                let limiter = m.limiter.get_or_insert_with(LimitShift::default);
                p.apply_to(limiter);
            }
        }
    }
}

/// Change to a shift's limiter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LimiterPatch {
    /// Remove the limiter.
    Disable,
    /// Patch the limiter, creating a default one first if absent.
    Patch(LimitShiftPatch),
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LimitShiftPatch {
    pub offset: Option<f64>,
    pub main_axis: Option<bool>,
    pub cross_axis: Option<bool>,
}

impl LimitShiftPatch {
    fn apply_to(&self, m: &mut LimitShift) {
        if let Some(v) = self.offset {
            m.offset = v;
        }
        if let Some(v) = self.main_axis {
            m.main_axis = v;
        }
        if let Some(v) = self.cross_axis {
            m.cross_axis = v;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ArrowPatch {
    pub element: Option<ElementId>,
    pub padding: Option<f64>,
}

impl ArrowPatch {
    fn apply_to(&self, m: &mut Arrow) {
        if let Some(v) = self.element {
            m.element = v;
        }
        if let Some(v) = self.padding {
            m.padding = v;
        }
    }
}
