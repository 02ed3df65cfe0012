//! Proxies decorate a single subject element.
//!
//! A proxy implements [`Element::subject`] and inherits forwarding for everything else from the
//! trait's default methods. It adjusts what its subject sees by overriding
//! [`Element::subject_bounds`] and [`Element::limits`], and intercepts events by overriding the
//! corresponding methods and calling on to the subject where appropriate.

use crate::context::{BasicContext, Context};
use crate::element::{Element, ElementPtr};
use crate::limits::ViewLimits;
use crate::rect::{Extent, Rect};
use core::any::Any;

/// Adds space around its subject.
#[derive(Debug)]
pub struct Margin {
    margin: Rect,
    subject: ElementPtr,
}

impl Margin {
    /// `margin` holds the space on each side, in the corresponding field.
    pub fn new(margin: Rect, subject: ElementPtr) -> Margin {
        Margin { margin, subject }
    }

    pub fn uniform(amount: f64, subject: ElementPtr) -> Margin {
        Margin::new(Rect::new(amount, amount, amount, amount), subject)
    }
}

impl Element for Margin {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn subject(&self) -> Option<&ElementPtr> {
        Some(&self.subject)
    }

    fn subject_bounds(&self, ctx: &Context) -> Rect {
        let b = ctx.bounds;
        Rect::new(
            b.left + self.margin.left,
            b.top + self.margin.top,
            b.right - self.margin.right,
            b.bottom - self.margin.bottom,
        )
    }

    fn limits(&self, ctx: &BasicContext) -> ViewLimits {
        self.subject.limits(ctx).grow(Extent::new(
            self.margin.left + self.margin.right,
            self.margin.top + self.margin.bottom,
        ))
    }
}
