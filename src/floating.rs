use crate::context::{BasicContext, Context};
use crate::element::{Element, ElementPtr};
use crate::limits::ViewLimits;
use crate::rect::Rect;
use core::any::Any;
use parking_lot::Mutex;

/// A proxy that places its subject at bounds of its own, independent of the bounds it is given.
///
/// Floating elements are meant to be layers of the view: windows, popups and drag images.
#[derive(Debug)]
pub struct Floating {
    bounds: Mutex<Rect>,
    subject: ElementPtr,
}

impl Floating {
    pub fn new(bounds: Rect, subject: ElementPtr) -> Floating {
        Floating {
            bounds: Mutex::new(bounds),
            subject,
        }
    }

    pub fn bounds(&self) -> Rect {
        *self.bounds.lock()
    }

    pub fn set_bounds(&self, bounds: Rect) {
        *self.bounds.lock() = bounds;
    }

    /// Limits of the floating content.
    pub fn subject_limits(&self, ctx: &BasicContext) -> ViewLimits {
        self.subject.limits(ctx)
    }
}

impl Element for Floating {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn subject(&self) -> Option<&ElementPtr> {
        Some(&self.subject)
    }

    fn subject_bounds(&self, _: &Context) -> Rect {
        self.bounds()
    }

    fn limits(&self, _: &BasicContext) -> ViewLimits {
        ViewLimits::default()
    }
}
