//! Child windows, and the trackers that move and resize them.

use crate::context::{BasicContext, Context};
use crate::element::{same_element, Element, ElementPtr, Hit};
use crate::events::{CursorTracking, MouseButton};
use crate::floating::Floating;
use crate::host::CursorType;
use crate::limits::ViewLimits;
use crate::rect::{Extent, Point, Rect};
use crate::tracker::{Track, Tracker, TrackerInfo};
use crate::traversal::find_parent;
use core::any::Any;
use std::sync::Arc;
use tracing::debug;

/// A floating window that comes to the front when clicked.
///
/// Add it to the view with [`View::add`](crate::View::add).
#[derive(Debug)]
pub struct ChildWindow {
    window: Arc<Floating>,
    subject: ElementPtr,
}

impl ChildWindow {
    pub fn new(bounds: Rect, subject: ElementPtr) -> ChildWindow {
        let window = Arc::new(Floating::new(bounds, subject));
        ChildWindow {
            subject: window.clone(),
            window,
        }
    }

    /// The floating element holding the window's bounds.
    pub fn window(&self) -> &Arc<Floating> {
        &self.window
    }

    pub fn bounds(&self) -> Rect {
        self.window.bounds()
    }
}

impl Element for ChildWindow {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn subject(&self) -> Option<&ElementPtr> {
        Some(&self.subject)
    }

    fn limits(&self, ctx: &BasicContext) -> ViewLimits {
        self.window.limits(ctx)
    }

    fn click(&self, ctx: &Context, btn: MouseButton) -> bool {
        if btn.down {
            let layers = ctx.view.layers();
            let is_front = layers.last().map_or(false, |e| same_element(&**e, self));
            if !is_front && ctx.view.move_to_front(self) {
                debug!("child window brought to front");
                // replay the press on the new layer order
                ctx.view.post(move |view| {
                    view.click(btn);
                });
                return true;
            }
        }
        let sctx = ctx.sub(&*self.subject, self.subject_bounds(ctx));
        self.subject.click(&sctx, btn)
    }
}

/// Removes the window enclosing `ctx` from the view.
///
/// Returns false if `ctx` is not inside a window.
pub fn close_window(ctx: &Context) -> bool {
    let window = ctx
        .ancestors()
        .find(|p| p.element.as_any().downcast_ref::<ChildWindow>().is_some());
    match window {
        Some(p) => {
            let removed = ctx.view.remove(p.element);
            if removed {
                ctx.view.refresh();
            }
            removed
        }
        None => false,
    }
}

/// Closes the enclosing window when its subject is clicked.
#[derive(Debug)]
pub struct Closable {
    subject: ElementPtr,
}

impl Closable {
    pub fn new(subject: ElementPtr) -> Closable {
        Closable { subject }
    }
}

impl Element for Closable {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn subject(&self) -> Option<&ElementPtr> {
        Some(&self.subject)
    }

    fn wants_control(&self) -> bool {
        true
    }

    fn hit_test(&self, ctx: &Context, p: Point, _: bool, _: bool) -> Option<Hit> {
        if ctx.enabled && ctx.bounds.includes(p) {
            Some(Hit {
                bounds: ctx.bounds,
                wants_focus: false,
            })
        } else {
            None
        }
    }

    fn click(&self, ctx: &Context, btn: MouseButton) -> bool {
        let sctx = ctx.sub(&*self.subject, ctx.bounds);
        let handled = self.subject.click(&sctx, btn);
        if !btn.down && ctx.bounds.includes(btn.pos) {
            return close_window(ctx) || handled;
        }
        handled || btn.down
    }
}

fn clamp(v: f64, min: f64, max: f64) -> f64 {
    v.max(min).min(max)
}

#[derive(Debug, Default)]
pub struct MoverState {
    offs_top: f64,
    offs_bottom: f64,
}

/// Makes its subject (usually a title bar) drag the enclosing [`Floating`] around.
#[derive(Debug)]
pub struct Movable {
    subject: ElementPtr,
    tracker: Tracker<MoverState>,
}

impl Movable {
    pub fn new(subject: ElementPtr) -> Movable {
        Movable {
            subject,
            tracker: Tracker::new(),
        }
    }
}

impl Track<MoverState> for Movable {
    fn begin_tracking(&self, ctx: &Context, info: &mut TrackerInfo<MoverState>) {
        info.ext.offs_top = info.first.y - ctx.bounds.top;
        info.ext.offs_bottom = ctx.bounds.bottom - info.first.y;
        info.processed = true;
    }

    fn keep_tracking(&self, ctx: &Context, info: &mut TrackerInfo<MoverState>) {
        if info.current == info.previous {
            return;
        }
        if let Some(floating) = find_parent::<Floating>(ctx) {
            let d = info.movement();
            floating.set_bounds(floating.bounds().move_by(d.x, d.y));
            ctx.view.refresh();
        }
    }
}

impl Element for Movable {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn subject(&self) -> Option<&ElementPtr> {
        Some(&self.subject)
    }

    fn wants_control(&self) -> bool {
        true
    }

    fn hit_test(&self, ctx: &Context, p: Point, _: bool, _: bool) -> Option<Hit> {
        if ctx.enabled && ctx.bounds.includes(p) {
            Some(Hit {
                bounds: ctx.bounds,
                wants_focus: false,
            })
        } else {
            None
        }
    }

    fn click(&self, ctx: &Context, btn: MouseButton) -> bool {
        let sctx = ctx.sub(&*self.subject, ctx.bounds);
        if self.subject.click(&sctx, btn) {
            return true;
        }
        self.tracker.click(self, ctx, btn)
    }

    fn drag(&self, ctx: &Context, mut btn: MouseButton) -> bool {
        if !self.tracker.is_tracking() {
            let sctx = ctx.sub(&*self.subject, ctx.bounds);
            return self.subject.drag(&sctx, btn);
        }

        // keep the grabbed part inside the view, so the window can always be moved back
        let offsets = self.tracker_offsets();
        let mut b = ctx.view_bounds();
        b.top += offsets.0;
        b.bottom -= offsets.1;
        btn.pos = Point::new(
            clamp(btn.pos.x, b.left, b.right),
            clamp(btn.pos.y, b.top, b.bottom),
        );
        self.tracker.drag(self, ctx, btn)
    }
}

impl Movable {
    fn tracker_offsets(&self) -> (f64, f64) {
        self.tracker
            .with_state(|info| (info.ext.offs_top, info.ext.offs_bottom))
            .unwrap_or((0., 0.))
    }
}

/// Edges grabbed by a resize gesture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResizeHandle(pub u8);

impl ResizeHandle {
    pub const TOP: u8 = 1;
    pub const LEFT: u8 = 2;
    pub const BOTTOM: u8 = 4;
    pub const RIGHT: u8 = 8;

    pub fn has(self, edge: u8) -> bool {
        self.0 & edge != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The handle at `p`, given the element's bounds and the width of the resize band.
    pub fn at(bounds: Rect, p: Point, margin: f64) -> ResizeHandle {
        let mut handle = 0;
        if p.x > bounds.left && p.x < bounds.left + margin {
            handle = ResizeHandle::LEFT;
        } else if p.x > bounds.right - margin && p.x < bounds.right {
            handle = ResizeHandle::RIGHT;
        }
        if p.y > bounds.top && p.y < bounds.top + margin {
            handle |= ResizeHandle::TOP;
        } else if p.y > bounds.bottom - margin && p.y < bounds.bottom {
            handle |= ResizeHandle::BOTTOM;
        }
        ResizeHandle(handle)
    }
}

/// Adds a band around its subject that resizes the enclosing [`Floating`].
///
/// The band is [`Settings::resize_margin`](crate::Settings::resize_margin) wide.
#[derive(Debug)]
pub struct Resizable {
    subject: ElementPtr,
    tracker: Tracker<ResizeHandle>,
}

impl Resizable {
    pub fn new(subject: ElementPtr) -> Resizable {
        Resizable {
            subject,
            tracker: Tracker::new(),
        }
    }

    fn in_band(&self, ctx: &Context, p: Point) -> bool {
        let margin = ctx.view.settings().resize_margin;
        ctx.enabled && ctx.bounds.includes(p) && !ctx.bounds.inset(margin, margin).includes(p)
    }
}

impl Track<ResizeHandle> for Resizable {
    fn begin_tracking(&self, ctx: &Context, info: &mut TrackerInfo<ResizeHandle>) {
        if self.in_band(ctx, info.first) {
            let margin = ctx.view.settings().resize_margin;
            info.ext = ResizeHandle::at(ctx.bounds, info.first, margin);
        }
        info.processed = true;
    }

    fn keep_tracking(&self, ctx: &Context, info: &mut TrackerInfo<ResizeHandle>) {
        let handle = info.ext;
        if info.current == info.previous || handle.is_empty() {
            return;
        }
        let floating = match find_parent::<Floating>(ctx) {
            Some(floating) => floating,
            None => return,
        };

        let p = info.current;
        let ob = floating.bounds();
        let mut b = ob;
        if handle.has(ResizeHandle::LEFT) {
            b.left = p.x;
        } else if handle.has(ResizeHandle::RIGHT) {
            b.right = p.x;
        }
        if handle.has(ResizeHandle::TOP) {
            b.top = p.y;
        } else if handle.has(ResizeHandle::BOTTOM) {
            b.bottom = p.y;
        }

        // an edge whose move would break the limits stays put for this frame
        let limits = floating.subject_limits(&ctx.basic());
        let (width, height) = (b.width(), b.height());
        if width < limits.min.x || width > limits.max.x {
            b.left = ob.left;
            b.right = ob.right;
        }
        if height < limits.min.y || height > limits.max.y {
            b.top = ob.top;
            b.bottom = ob.bottom;
        }

        if b != ob {
            floating.set_bounds(b);
            ctx.view.refresh();
        }
    }
}

impl Element for Resizable {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn subject(&self) -> Option<&ElementPtr> {
        Some(&self.subject)
    }

    fn subject_bounds(&self, ctx: &Context) -> Rect {
        let margin = ctx.view.settings().resize_margin;
        ctx.bounds.inset(margin, margin)
    }

    fn limits(&self, ctx: &BasicContext) -> ViewLimits {
        let margin = ctx.view.settings().resize_margin;
        self.subject
            .limits(ctx)
            .grow(Extent::new(margin * 2., margin * 2.))
    }

    fn wants_control(&self) -> bool {
        true
    }

    fn hit_test(&self, ctx: &Context, p: Point, leaf: bool, control: bool) -> Option<Hit> {
        if self.in_band(ctx, p) {
            return Some(Hit {
                bounds: ctx.bounds,
                wants_focus: false,
            });
        }
        let sctx = ctx.sub(&*self.subject, self.subject_bounds(ctx));
        self.subject.hit_test(&sctx, p, leaf, control)
    }

    fn cursor(&self, ctx: &Context, p: Point, status: CursorTracking) -> bool {
        let sctx = ctx.sub(&*self.subject, self.subject_bounds(ctx));
        if self.subject.cursor(&sctx, p, status) {
            return true;
        }
        if status != CursorTracking::Leaving && self.in_band(ctx, p) {
            let margin = ctx.view.settings().resize_margin;
            let handle = ResizeHandle::at(ctx.bounds, p, margin);
            let horizontal = handle.has(ResizeHandle::LEFT) || handle.has(ResizeHandle::RIGHT);
            let vertical = handle.has(ResizeHandle::TOP) || handle.has(ResizeHandle::BOTTOM);
            if horizontal != vertical {
                ctx.view.set_cursor(if horizontal {
                    CursorType::HResize
                } else {
                    CursorType::VResize
                });
            }
            return true;
        }
        false
    }

    fn click(&self, ctx: &Context, btn: MouseButton) -> bool {
        let sctx = ctx.sub(&*self.subject, self.subject_bounds(ctx));
        if self.subject.click(&sctx, btn) {
            return true;
        }
        if !ctx.enabled {
            return false;
        }
        self.tracker.click(self, ctx, btn)
    }

    fn drag(&self, ctx: &Context, btn: MouseButton) -> bool {
        if self.tracker.is_tracking() {
            self.tracker.drag(self, ctx, btn)
        } else {
            let sctx = ctx.sub(&*self.subject, self.subject_bounds(ctx));
            self.subject.drag(&sctx, btn)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composite::Composite;
    use crate::element::BoxElement;
    use crate::testing::{test_view, Probe};

    fn resizable_window() -> (Arc<ChildWindow>, ElementPtr) {
        let content: ElementPtr = Arc::new(BoxElement::new(Default::default()).with_limits(
            ViewLimits::new(Extent::new(100., 50.), Extent::new(1000., 1000.)),
        ));
        let resizable: ElementPtr = Arc::new(Resizable::new(content));
        let window = Arc::new(ChildWindow::new(
            Rect::new(100., 100., 400., 300.),
            resizable.clone(),
        ));
        (window, resizable)
    }

    #[test]
    fn resize_stops_at_min_width() {
        let (view, _) = test_view();
        let (window, _) = resizable_window();
        view.add(window.clone());

        assert!(view.click(MouseButton::press(Point::new(102., 200.))));
        view.drag(MouseButton::press(Point::new(280., 200.)));
        assert_eq!(window.bounds().left, 280., "left edge follows the pointer");

        // 100 wide plus the resize band on both sides
        view.drag(MouseButton::press(Point::new(300., 200.)));
        assert_eq!(window.bounds().left, 280., "narrower than the limits is rolled back");
        assert_eq!(window.bounds().right, 400.);

        view.drag(MouseButton::press(Point::new(150., 200.)));
        view.click(MouseButton::release(Point::new(150., 200.)));
        assert_eq!(window.bounds(), Rect::new(150., 100., 400., 300.));
    }

    #[test]
    fn band_sets_resize_cursor() {
        let (view, host) = test_view();
        let (window, _) = resizable_window();
        view.add(window);

        view.cursor(Point::new(250., 102.), CursorTracking::Hovering);
        assert_eq!(host.cursor(), CursorType::VResize);
        view.cursor(Point::new(398., 200.), CursorTracking::Hovering);
        assert_eq!(host.cursor(), CursorType::HResize);
    }

    #[test]
    fn title_bar_moves_window() {
        let (view, _) = test_view();
        let title: ElementPtr = Arc::new(Movable::new(Arc::new(BoxElement::new(Default::default()))));
        let window = Arc::new(ChildWindow::new(Rect::new(100., 100., 300., 130.), title));
        view.add(window.clone());

        view.click(MouseButton::press(Point::new(150., 110.)));
        view.drag(MouseButton::press(Point::new(170., 140.)));
        assert_eq!(window.bounds(), Rect::new(120., 130., 320., 160.));

        // the pointer is clamped so the grabbed part stays in view
        view.drag(MouseButton::press(Point::new(170., -500.)));
        assert_eq!(window.bounds().top, 0.);
        view.click(MouseButton::release(Point::new(170., -500.)));
    }

    #[test]
    fn click_brings_window_to_front_and_replays() {
        let (view, _) = test_view();
        let back_probe = Arc::new(Probe::control());
        let back = Arc::new(ChildWindow::new(
            Rect::new(0., 0., 200., 200.),
            back_probe.clone(),
        ));
        let front = Arc::new(ChildWindow::new(
            Rect::new(150., 150., 300., 300.),
            Arc::new(Probe::control()),
        ));
        view.add(back.clone());
        view.add(front.clone());

        assert!(view.click(MouseButton::press(Point::new(50., 50.))));
        let layers = view.layers();
        assert!(
            same_element(&**layers.last().unwrap(), &*back),
            "clicked window is in front"
        );
        assert_eq!(back_probe.presses(), 0, "the press is replayed later");

        assert_eq!(view.poll(), 1);
        assert_eq!(back_probe.presses(), 1, "replayed press reaches the content");
    }

    #[test]
    fn drags_before_the_replay_reach_no_window() {
        let (view, _) = test_view();
        let back_probe = Arc::new(Probe::control());
        let front_probe = Arc::new(Probe::control());
        let back = Arc::new(ChildWindow::new(
            Rect::new(0., 0., 200., 200.),
            back_probe.clone(),
        ));
        let front = Arc::new(ChildWindow::new(
            Rect::new(150., 150., 300., 300.),
            front_probe.clone(),
        ));
        view.add(back);
        view.add(front);

        assert!(view.click(MouseButton::press(Point::new(50., 50.))));
        assert_eq!(
            view.content().composite_state().click_tracking(),
            None,
            "the window moved away from the index it was pressed at"
        );
        assert!(!view.drag(MouseButton::press(Point::new(60., 60.))));
        assert_eq!(front_probe.drags(), 0, "the window now behind gets no drag");
        assert_eq!(back_probe.drags(), 0);

        assert_eq!(view.poll(), 1);
        assert_eq!(view.content().composite_state().click_tracking(), Some(1));
        assert!(view.drag(MouseButton::press(Point::new(60., 60.))));
        assert_eq!(back_probe.drags(), 1, "after the replay the front window tracks the press");
    }

    #[test]
    fn closable_removes_window() {
        let (view, _) = test_view();
        let close: ElementPtr = Arc::new(Closable::new(Arc::new(BoxElement::new(Default::default()))));
        let window = Arc::new(ChildWindow::new(Rect::new(0., 0., 20., 20.), close));
        view.add(window);
        assert_eq!(view.layers().len(), 1);

        view.click(MouseButton::press(Point::new(10., 10.)));
        view.click(MouseButton::release(Point::new(10., 10.)));
        assert!(view.layers().is_empty(), "releasing on the close box closes the window");
    }
}
