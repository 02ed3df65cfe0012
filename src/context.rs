//! Traversal contexts.

use crate::canvas::Canvas;
use crate::element::Element;
use crate::rect::{Point, Rect};
use crate::view::View;
use core::fmt;

/// The view and canvas, which is all an element needs to report its limits.
#[derive(Clone, Copy)]
pub struct BasicContext<'a> {
    pub view: &'a View,
    pub canvas: &'a dyn Canvas,
}

impl<'a> BasicContext<'a> {
    pub fn new(view: &'a View, canvas: &'a dyn Canvas) -> BasicContext<'a> {
        BasicContext { view, canvas }
    }
}

/// One link in the chain of elements a traversal passed through.
///
/// A context lives on the stack for the duration of a single call and borrows everything it
/// refers to. Each composite or proxy creates a child context for the element it forwards to,
/// so the chain from any context back to the root mirrors the path through the tree.
pub struct Context<'a> {
    pub view: &'a View,
    pub canvas: &'a dyn Canvas,

    /// The element this context was created for.
    pub element: &'a dyn Element,

    pub parent: Option<&'a Context<'a>>,

    /// Bounds of `element`, in view coordinates.
    pub bounds: Rect,

    /// False if this element or any of its ancestors is disabled.
    pub enabled: bool,
}

impl<'a> Context<'a> {
    /// Creates a root context.
    pub fn new(
        view: &'a View,
        canvas: &'a dyn Canvas,
        element: &'a dyn Element,
        bounds: Rect,
    ) -> Context<'a> {
        Context {
            view,
            canvas,
            element,
            parent: None,
            bounds,
            enabled: element.is_enabled(),
        }
    }

    /// Creates a child context for `element`.
    pub fn sub<'b>(&'b self, element: &'b dyn Element, bounds: Rect) -> Context<'b> {
        Context {
            view: self.view,
            canvas: self.canvas,
            element,
            parent: Some(self),
            bounds,
            enabled: self.enabled && element.is_enabled(),
        }
    }

    pub fn basic(&self) -> BasicContext<'a> {
        BasicContext {
            view: self.view,
            canvas: self.canvas,
        }
    }

    /// Iterates over the ancestors of this context, innermost first.
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors { next: self.parent }
    }

    /// The part of the view that is currently visible.
    pub fn port_bounds(&self) -> Rect {
        self.canvas.clip_extent()
    }

    pub fn view_bounds(&self) -> Rect {
        self.view.bounds()
    }

    pub fn cursor_pos(&self) -> Point {
        self.view.cursor_pos()
    }

    /// Asks the view to repaint this context's bounds.
    pub fn refresh(&self) {
        self.view.refresh_area(self.bounds);
    }
}

impl<'a> fmt::Debug for Context<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Context")
            .field("element", &self.element)
            .field("bounds", &self.bounds)
            .field("enabled", &self.enabled)
            .field("depth", &self.ancestors().count())
            .finish()
    }
}

pub struct Ancestors<'a> {
    next: Option<&'a Context<'a>>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Context<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent;
        Some(current)
    }
}
