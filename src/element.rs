//! The element protocol.

use crate::color::Color;
use crate::composite::Composite;
use crate::context::{BasicContext, Context};
use crate::events::{CursorTracking, DropInfo, KeyInfo, MouseButton, TextInfo};
use crate::limits::ViewLimits;
use crate::rect::{Extent, Point, Rect};
use core::any::Any;
use core::fmt;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A shared element handle.
pub type ElementPtr = Arc<dyn Element>;

/// The result of a successful hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Bounds of the element that was hit.
    pub bounds: Rect,

    /// Whether the element that was hit accepts keyboard focus.
    pub wants_focus: bool,
}

/// How an element that is about to receive focus should pick its focused descendant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusRequest {
    FromTop,
    FromBottom,
    RestorePrevious,
}

/// Elements are the nodes of the UI tree.
///
/// An element has no position or size of its own; every operation receives a [`Context`] that
/// carries its bounds and the chain of ancestors it was reached through. All methods have
/// defaults, so an element only implements what it cares about.
///
/// Proxies (elements that decorate a single subject) only need to return their subject from
/// [`Element::subject`]: the default methods then forward to it, through
/// [`Element::subject_bounds`]. Composites implement their methods with
/// [`impl_composite`](crate::impl_composite).
///
/// Event methods return true if the event was consumed. None of them fail; a miss is not an
/// error.
pub trait Element: Any + fmt::Debug + Send + Sync {
    /// For downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Returns the wrapped element if this is a proxy.
    fn subject(&self) -> Option<&ElementPtr> {
        None
    }

    /// Returns this element as a composite, if it is one.
    fn as_composite(&self) -> Option<&dyn Composite> {
        None
    }

    /// Returns this element as a selectable item, if it is one.
    fn as_selectable(&self) -> Option<&dyn Selectable> {
        None
    }

    /// Bounds given to the subject of a proxy.
    fn subject_bounds(&self, ctx: &Context) -> Rect {
        ctx.bounds
    }

    fn limits(&self, ctx: &BasicContext) -> ViewLimits {
        match self.subject() {
            Some(subject) => subject.limits(ctx),
            None => ViewLimits::default(),
        }
    }

    /// Returns a hit if `p` falls on this element.
    ///
    /// If `control` is set, only elements that want control may be hit. If `leaf` is set, the
    /// innermost element is reported.
    fn hit_test(&self, ctx: &Context, p: Point, leaf: bool, control: bool) -> Option<Hit> {
        if let Some(subject) = self.subject() {
            let sctx = ctx.sub(&**subject, self.subject_bounds(ctx));
            return subject.hit_test(&sctx, p, leaf, control);
        }
        if ctx.bounds.includes(p) && (!control || self.wants_control()) {
            Some(Hit {
                bounds: ctx.bounds,
                wants_focus: self.wants_focus(),
            })
        } else {
            None
        }
    }

    fn draw(&self, ctx: &Context) {
        if let Some(subject) = self.subject() {
            subject.draw(&ctx.sub(&**subject, self.subject_bounds(ctx)));
        }
    }

    fn layout(&self, ctx: &Context) {
        if let Some(subject) = self.subject() {
            subject.layout(&ctx.sub(&**subject, self.subject_bounds(ctx)));
        }
    }

    /// Finds `target` below this element and calls `f` with its context.
    ///
    /// Returns true if `target` was found.
    fn in_context_do(
        &self,
        ctx: &Context,
        target: &dyn Element,
        f: &mut dyn FnMut(&Context),
    ) -> bool {
        if same_element(ctx.element, target) {
            f(ctx);
            return true;
        }
        match self.subject() {
            Some(subject) => {
                let sctx = ctx.sub(&**subject, self.subject_bounds(ctx));
                subject.in_context_do(&sctx, target, f)
            }
            None => false,
        }
    }

    fn click(&self, ctx: &Context, btn: MouseButton) -> bool {
        match self.subject() {
            Some(subject) => subject.click(&ctx.sub(&**subject, self.subject_bounds(ctx)), btn),
            None => false,
        }
    }

    fn drag(&self, ctx: &Context, btn: MouseButton) -> bool {
        match self.subject() {
            Some(subject) => subject.drag(&ctx.sub(&**subject, self.subject_bounds(ctx)), btn),
            None => false,
        }
    }

    fn key(&self, ctx: &Context, k: KeyInfo) -> bool {
        match self.subject() {
            Some(subject) => subject.key(&ctx.sub(&**subject, self.subject_bounds(ctx)), k),
            None => false,
        }
    }

    fn text(&self, ctx: &Context, info: TextInfo) -> bool {
        match self.subject() {
            Some(subject) => subject.text(&ctx.sub(&**subject, self.subject_bounds(ctx)), info),
            None => false,
        }
    }

    fn cursor(&self, ctx: &Context, p: Point, status: CursorTracking) -> bool {
        match self.subject() {
            Some(subject) => {
                subject.cursor(&ctx.sub(&**subject, self.subject_bounds(ctx)), p, status)
            }
            None => false,
        }
    }

    fn scroll(&self, ctx: &Context, dir: Extent, p: Point) -> bool {
        match self.subject() {
            Some(subject) => {
                subject.scroll(&ctx.sub(&**subject, self.subject_bounds(ctx)), dir, p)
            }
            None => false,
        }
    }

    fn track_drop(&self, ctx: &Context, info: &DropInfo, status: CursorTracking) -> bool {
        match self.subject() {
            Some(subject) => {
                let sctx = ctx.sub(&**subject, self.subject_bounds(ctx));
                subject.track_drop(&sctx, info, status)
            }
            None => false,
        }
    }

    /// Receives dropped data. Returns true if the drop was accepted.
    fn accept_drop(&self, ctx: &Context, info: &DropInfo) -> bool {
        match self.subject() {
            Some(subject) => {
                let sctx = ctx.sub(&**subject, self.subject_bounds(ctx));
                subject.accept_drop(&sctx, info)
            }
            None => false,
        }
    }

    fn wants_control(&self) -> bool {
        self.subject().map_or(false, |s| s.wants_control())
    }

    fn wants_focus(&self) -> bool {
        self.subject().map_or(false, |s| s.wants_focus())
    }

    fn is_enabled(&self) -> bool {
        self.subject().map_or(true, |s| s.is_enabled())
    }

    fn enable(&self, state: bool) {
        if let Some(subject) = self.subject() {
            subject.enable(state);
        }
    }

    fn begin_focus(&self, req: FocusRequest) {
        if let Some(subject) = self.subject() {
            subject.begin_focus(req);
        }
    }

    /// Ends focus. Returns false if the element refuses to give it up.
    fn end_focus(&self) -> bool {
        self.subject().map_or(true, |s| s.end_focus())
    }
}

/// Elements that can be part of a selection, such as list items.
pub trait Selectable {
    fn is_selected(&self) -> bool;
    fn select(&self, state: bool);
}

/// Returns true if both references point to the same element.
pub fn same_element(a: &dyn Element, b: &dyn Element) -> bool {
    core::ptr::eq(
        a as *const dyn Element as *const u8,
        b as *const dyn Element as *const u8,
    )
}

/// A leaf element that fills its bounds with a color.
pub struct BoxElement {
    color: Color,
    limits: Mutex<ViewLimits>,
    enabled: AtomicBool,
}

impl BoxElement {
    pub fn new(color: Color) -> BoxElement {
        BoxElement {
            color,
            limits: Mutex::new(ViewLimits::default()),
            enabled: AtomicBool::new(true),
        }
    }

    /// A box that only accepts the given size.
    pub fn fixed(color: Color, size: Extent) -> BoxElement {
        BoxElement::new(color).with_limits(ViewLimits::fixed(size))
    }

    pub fn with_limits(self, limits: ViewLimits) -> BoxElement {
        *self.limits.lock() = limits;
        self
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

impl fmt::Debug for BoxElement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("BoxElement")
            .field("color", &self.color)
            .field("limits", &*self.limits.lock())
            .finish()
    }
}

impl Element for BoxElement {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn limits(&self, _: &BasicContext) -> ViewLimits {
        *self.limits.lock()
    }

    fn draw(&self, ctx: &Context) {
        ctx.canvas.fill_rect(ctx.bounds, self.color);
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    fn enable(&self, state: bool) {
        self.enabled.store(state, Ordering::Relaxed);
    }
}
