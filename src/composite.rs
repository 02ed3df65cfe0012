//! Composites: elements with indexed children, and the event dispatch they share.

use crate::context::Context;
use crate::element::{same_element, Element, ElementPtr, FocusRequest, Hit};
use crate::events::{CursorTracking, DropInfo, KeyCode, KeyInfo, MouseButton, TextInfo};
use crate::rect::{Extent, Point, Rect};
use crate::traversal::{find_composite, find_selectable};
use core::fmt;
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

/// Implements the `Element` trait for a type implementing [`Composite`].
///
/// Event dispatch, hit testing and focus handling are routed through the functions in this
/// module. Drawing, layout and limits differ between composites, so they are passed in as extra
/// items.
///
/// Syntax:
///
/// ```text
/// impl_composite! {
///     StructName;
///     fn limits(&self, ctx: &BasicContext) -> ViewLimits { ... }
///     fn draw(&self, ctx: &Context) { ... }
///     (more element methods, using normal rust syntax)
/// }
/// ```
#[macro_export]
macro_rules! impl_composite {
    (
        $(#[$attr:meta])*
        $struct:ty;
        $($extra:tt)*
    ) => {
        $(#[$attr])*
        impl $crate::Element for $struct {
            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            fn as_composite(&self) -> Option<&dyn $crate::Composite> {
                Some(self)
            }

            fn hit_test(
                &self,
                ctx: &$crate::Context,
                p: $crate::Point,
                leaf: bool,
                control: bool,
            ) -> Option<$crate::Hit> {
                $crate::composite::hit_test(self, ctx, p, leaf, control)
            }

            fn in_context_do(
                &self,
                ctx: &$crate::Context,
                target: &dyn $crate::Element,
                f: &mut dyn FnMut(&$crate::Context),
            ) -> bool {
                $crate::composite::in_context_do(self, ctx, target, f)
            }

            fn click(&self, ctx: &$crate::Context, btn: $crate::events::MouseButton) -> bool {
                $crate::composite::click(self, ctx, btn)
            }

            fn drag(&self, ctx: &$crate::Context, btn: $crate::events::MouseButton) -> bool {
                $crate::composite::drag(self, ctx, btn)
            }

            fn key(&self, ctx: &$crate::Context, k: $crate::events::KeyInfo) -> bool {
                $crate::composite::key(self, ctx, k)
            }

            fn text(&self, ctx: &$crate::Context, info: $crate::events::TextInfo) -> bool {
                $crate::composite::text(self, ctx, info)
            }

            fn cursor(
                &self,
                ctx: &$crate::Context,
                p: $crate::Point,
                status: $crate::events::CursorTracking,
            ) -> bool {
                $crate::composite::cursor(self, ctx, p, status)
            }

            fn scroll(&self, ctx: &$crate::Context, dir: $crate::Extent, p: $crate::Point) -> bool {
                $crate::composite::scroll(self, ctx, dir, p)
            }

            fn track_drop(
                &self,
                ctx: &$crate::Context,
                info: &$crate::events::DropInfo,
                status: $crate::events::CursorTracking,
            ) -> bool {
                $crate::composite::track_drop(self, ctx, info, status)
            }

            fn accept_drop(&self, ctx: &$crate::Context, info: &$crate::events::DropInfo) -> bool {
                $crate::composite::accept_drop(self, ctx, info)
            }

            fn wants_control(&self) -> bool {
                $crate::Composite::children_want_control(self)
            }

            fn wants_focus(&self) -> bool {
                $crate::Composite::children_want_focus(self)
            }

            fn is_enabled(&self) -> bool {
                $crate::Composite::composite_state(self).is_enabled()
            }

            fn enable(&self, state: bool) {
                $crate::Composite::composite_state(self).enable(state)
            }

            fn begin_focus(&self, req: $crate::FocusRequest) {
                $crate::composite::begin_focus(self, req)
            }

            fn end_focus(&self) -> bool {
                $crate::composite::end_focus(self)
            }

            $($extra)*
        }
    };
}

/// An element with children addressed by index.
pub trait Composite: Element {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the child at `ix`, or `None` if `ix` is out of range.
    fn at(&self, ix: usize) -> Option<ElementPtr>;

    /// Bounds of the child at `ix`, given the composite's context.
    fn bounds_of(&self, ctx: &Context, ix: usize) -> Rect;

    /// True if the front-most child is the last one, so hit testing must go back to front.
    fn reverse_index(&self) -> bool {
        false
    }

    fn composite_state(&self) -> &CompositeState;

    /// Calls `f` with every child whose bounds intersect the visible part of the view, until `f`
    /// returns true.
    fn for_each_visible(
        &self,
        ctx: &Context,
        reverse: bool,
        f: &mut dyn FnMut(&ElementPtr, usize, Rect) -> bool,
    ) {
        let port = ctx.port_bounds();
        if !ctx.bounds.intersects(port) {
            return;
        }

        let len = self.len();
        let mut visit = |ix: usize| -> bool {
            let bounds = self.bounds_of(ctx, ix);
            if !bounds.intersects(port) {
                return false;
            }
            match self.at(ix) {
                Some(e) => f(&e, ix, bounds),
                None => false,
            }
        };
        if reverse {
            for ix in (0..len).rev() {
                if visit(ix) {
                    break;
                }
            }
        } else {
            for ix in 0..len {
                if visit(ix) {
                    break;
                }
            }
        }
    }

    fn children_want_control(&self) -> bool {
        (0..self.len()).any(|ix| self.at(ix).map_or(false, |e| e.wants_control()))
    }

    fn children_want_focus(&self) -> bool {
        (0..self.len()).any(|ix| self.at(ix).map_or(false, |e| e.wants_focus()))
    }

    /// Whether the child at `ix` is a selected [`Selectable`](crate::Selectable).
    fn is_child_selected(&self, ix: usize) -> bool {
        self.at(ix)
            .map_or(false, |e| find_selectable(&*e).map_or(false, |s| s.is_selected()))
    }

    /// Selects or deselects the child at `ix`, if it is selectable.
    fn select_child(&self, ix: usize, state: bool) {
        if let Some(e) = self.at(ix) {
            if let Some(s) = find_selectable(&*e) {
                s.select(state);
            }
        }
    }

    /// Index of the focused child, if it is still in range.
    fn focus_index(&self) -> Option<usize> {
        self.composite_state().focus().filter(|&ix| ix < self.len())
    }

    /// The focused child.
    fn focus(&self) -> Option<ElementPtr> {
        self.focus_index().and_then(|ix| self.at(ix))
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Tracking {
    pub(crate) focus: Option<usize>,
    pub(crate) saved_focus: Option<usize>,
    pub(crate) click_tracking: Option<usize>,
    pub(crate) cursor_tracking: Option<usize>,
    pub(crate) cursor_hovering: BTreeSet<usize>,
}

/// Transient dispatch state every composite carries.
pub struct CompositeState {
    tracking: Mutex<Tracking>,
    enabled: AtomicBool,
}

impl CompositeState {
    pub fn new() -> CompositeState {
        CompositeState {
            tracking: Mutex::new(Tracking::default()),
            enabled: AtomicBool::new(true),
        }
    }

    pub(crate) fn lock(&self) -> parking_lot::MutexGuard<'_, Tracking> {
        self.tracking.lock()
    }

    /// The focus index as stored, without range checks.
    pub fn focus(&self) -> Option<usize> {
        self.tracking.lock().focus
    }

    pub fn saved_focus(&self) -> Option<usize> {
        self.tracking.lock().saved_focus
    }

    /// Index of the child that received the last press, until the matching release.
    pub fn click_tracking(&self) -> Option<usize> {
        self.tracking.lock().click_tracking
    }

    pub fn cursor_tracking(&self) -> Option<usize> {
        self.tracking.lock().cursor_tracking
    }

    /// Indices of all children the cursor is currently over.
    pub fn hovering(&self) -> Vec<usize> {
        self.tracking.lock().cursor_hovering.iter().copied().collect()
    }

    /// Clears focus, tracking and hover state.
    pub fn reset(&self) {
        let mut tracking = self.tracking.lock();
        tracking.focus = None;
        tracking.click_tracking = None;
        tracking.cursor_tracking = None;
        tracking.cursor_hovering.clear();
    }

    /// Rewrites every stored child index through `f`, forgetting those it maps to `None`.
    pub fn remap(&self, f: impl Fn(usize) -> Option<usize>) {
        let mut tracking = self.tracking.lock();
        tracking.focus = tracking.focus.and_then(&f);
        tracking.saved_focus = tracking.saved_focus.and_then(&f);
        tracking.click_tracking = tracking.click_tracking.and_then(&f);
        tracking.cursor_tracking = tracking.cursor_tracking.and_then(&f);
        tracking.cursor_hovering = tracking
            .cursor_hovering
            .iter()
            .filter_map(|&ix| f(ix))
            .collect();
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn enable(&self, state: bool) {
        self.enabled.store(state, Ordering::Relaxed);
    }
}

impl Default for CompositeState {
    fn default() -> Self {
        CompositeState::new()
    }
}

impl fmt::Debug for CompositeState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let tracking = self.tracking.lock();
        f.debug_struct("CompositeState")
            .field("focus", &tracking.focus)
            .field("click_tracking", &tracking.click_tracking)
            .field("hovering", &tracking.cursor_hovering)
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

/// A plain vector of children, shared by the composites that own their elements.
#[derive(Debug, Default)]
pub struct Container {
    elements: RwLock<Vec<ElementPtr>>,
}

impl Container {
    pub fn new(elements: Vec<ElementPtr>) -> Container {
        Container {
            elements: RwLock::new(elements),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.read().is_empty()
    }

    pub fn at(&self, ix: usize) -> Option<ElementPtr> {
        self.elements.read().get(ix).cloned()
    }

    /// Returns a copy of the children.
    pub fn elements(&self) -> Vec<ElementPtr> {
        self.elements.read().clone()
    }

    pub fn push(&self, e: ElementPtr) {
        self.elements.write().push(e);
    }

    /// Index of `e`, compared by address.
    pub fn position(&self, e: &dyn Element) -> Option<usize> {
        self.elements
            .read()
            .iter()
            .position(|item| same_element(&**item, e))
    }

    /// Removes `e`. Returns false if it is not a child.
    pub fn remove(&self, e: &dyn Element) -> bool {
        let mut elements = self.elements.write();
        match elements.iter().position(|item| same_element(&**item, e)) {
            Some(ix) => {
                elements.remove(ix);
                true
            }
            None => false,
        }
    }

    /// Moves `e` to the end. Returns false if it is not a child.
    pub fn move_to_back(&self, e: &dyn Element) -> bool {
        let mut elements = self.elements.write();
        match elements.iter().position(|item| same_element(&**item, e)) {
            Some(ix) => {
                let item = elements.remove(ix);
                elements.push(item);
                true
            }
            None => false,
        }
    }
}

/// A hit on one of a composite's children.
#[derive(Debug, Clone)]
pub struct HitInfo {
    pub index: usize,

    /// The child that was hit.
    pub element: ElementPtr,

    /// Bounds of the child.
    pub bounds: Rect,

    /// The innermost element that was hit.
    pub leaf: Hit,
}

/// Finds the child under `p`, front-most first.
pub fn hit_element(c: &dyn Composite, ctx: &Context, p: Point, control: bool) -> Option<HitInfo> {
    let mut info = None;
    c.for_each_visible(ctx, c.reverse_index(), &mut |e, ix, bounds| {
        if (!control || e.wants_control()) && bounds.includes(p) {
            let ectx = ctx.sub(&**e, bounds);
            if let Some(leaf) = e.hit_test(&ectx, p, true, control) {
                info = Some(HitInfo {
                    index: ix,
                    element: e.clone(),
                    bounds,
                    leaf,
                });
                return true;
            }
        }
        false
    });
    info
}

pub fn hit_test(c: &dyn Composite, ctx: &Context, p: Point, leaf: bool, control: bool) -> Option<Hit> {
    if c.is_empty() {
        return None;
    }
    let info = hit_element(c, ctx, p, control)?;
    if leaf {
        Some(info.leaf)
    } else {
        Some(Hit {
            bounds: info.bounds,
            wants_focus: info.element.wants_focus(),
        })
    }
}

/// Draws every visible child.
pub fn draw(c: &dyn Composite, ctx: &Context) {
    c.for_each_visible(ctx, false, &mut |e, _, bounds| {
        e.draw(&ctx.sub(&**e, bounds));
        false
    });
}

/// Lays out every child.
pub fn layout(c: &dyn Composite, ctx: &Context) {
    for ix in 0..c.len() {
        if let Some(e) = c.at(ix) {
            let bounds = c.bounds_of(ctx, ix);
            e.layout(&ctx.sub(&*e, bounds));
        }
    }
}

pub fn in_context_do(
    c: &dyn Composite,
    ctx: &Context,
    target: &dyn Element,
    f: &mut dyn FnMut(&Context),
) -> bool {
    if same_element(ctx.element, target) {
        f(ctx);
        return true;
    }
    let mut found = false;
    c.for_each_visible(ctx, false, &mut |e, _, bounds| {
        found = e.in_context_do(&ctx.sub(&**e, bounds), target, &mut *f);
        found
    });
    found
}

/// Calls `f` with the child at `ix` and its context, if `ix` is still valid.
fn with_child<R>(
    c: &dyn Composite,
    ctx: &Context,
    ix: usize,
    f: impl FnOnce(&dyn Element, &Context) -> R,
) -> Option<R> {
    if ix >= c.len() {
        warn!(index = ix, len = c.len(), "dropping event for stale child index");
        return None;
    }
    let e = c.at(ix)?;
    let bounds = c.bounds_of(ctx, ix);
    let ectx = ctx.sub(&*e, bounds);
    Some(f(&*e, &ectx))
}

pub fn click(c: &dyn Composite, ctx: &Context, btn: MouseButton) -> bool {
    let state = c.composite_state();
    if !c.is_empty() {
        if btn.down {
            state.lock().click_tracking = None;
            if let Some(info) = hit_element(c, ctx, btn.pos, true) {
                let leaf_wants_focus = info.leaf.wants_focus;
                let mut process_click = true;
                if state.focus() != Some(info.index) {
                    let index = if leaf_wants_focus {
                        Some(info.index)
                    } else {
                        None
                    };
                    // a focus that refuses to yield swallows the click
                    process_click = new_focus(c, ctx, index, FocusRequest::RestorePrevious);
                }

                if process_click {
                    if info.element.wants_control() {
                        let ectx = ctx.sub(&*info.element, info.bounds);
                        if info.element.click(&ectx, btn) {
                            // the child may have moved itself, e.g. to the front of a layer
                            let stayed = c
                                .at(info.index)
                                .map_or(false, |e| same_element(&*e, &*info.element));
                            state.lock().click_tracking = stayed.then(|| info.index);
                            if !leaf_wants_focus {
                                relinquish_focus(c, ctx);
                            }
                            return true;
                        }
                    } else {
                        relinquish_focus(c, ctx);
                    }
                }
            }
        } else {
            let tracking = state.lock().click_tracking;
            if let Some(ix) = tracking {
                if with_child(c, ctx, ix, |e, ectx| e.click(ectx, btn)) == Some(true) {
                    state.lock().click_tracking = None;
                    return true;
                }
            }
        }
    }
    state.lock().click_tracking = None;
    false
}

/// Forwards a drag to the child that received the press, wherever the pointer is now.
pub fn drag(c: &dyn Composite, ctx: &Context, btn: MouseButton) -> bool {
    let tracking = c.composite_state().click_tracking();
    match tracking {
        Some(ix) => with_child(c, ctx, ix, |e, ectx| e.drag(ectx, btn)).unwrap_or(false),
        None => false,
    }
}

/// Moves focus to `index`, ending focus on the previous holder first.
///
/// Returns false if the current focus refuses to yield. A target that does not want focus
/// leaves the composite without focus.
pub fn new_focus(
    c: &dyn Composite,
    ctx: &Context,
    index: Option<usize>,
    req: FocusRequest,
) -> bool {
    if let Some(current) = c.focus() {
        if current.end_focus() {
            ctx.refresh();
        } else {
            return false;
        }
    }

    let target = index.and_then(|ix| c.at(ix).map(|e| (ix, e)));
    let target = match target {
        Some((ix, e)) if e.wants_focus() => Some((ix, e)),
        Some((ix, _)) => {
            debug!(index = ix, "focus target does not accept focus");
            None
        }
        None => None,
    };

    c.composite_state().lock().focus = target.as_ref().map(|(ix, _)| *ix);
    if let Some((ix, e)) = target {
        debug!(index = ix, "focus moved");
        e.begin_focus(req);
        ctx.refresh();
    }
    true
}

pub fn key(c: &dyn Composite, ctx: &Context, k: KeyInfo) -> bool {
    let try_key = |ix: usize| -> bool {
        let bounds = c.bounds_of(ctx, ix);
        // only visible children get a chance to handle keys
        if !bounds.intersects(ctx.view_bounds()) {
            return false;
        }
        match c.at(ix) {
            Some(e) => e.key(&ctx.sub(&*e, bounds), k),
            None => false,
        }
    };

    let focus = c.focus_index();
    if let Some(ix) = focus {
        if try_key(ix) {
            return true;
        }
    }

    let len = c.len();
    if k.is_down() && k.code == KeyCode::Tab && len > 0 {
        let reverse = k.modifiers.shift ^ c.reverse_index();
        let (candidates, req): (Vec<usize>, _) = if reverse {
            (
                (0..focus.unwrap_or(len)).rev().collect(),
                FocusRequest::FromBottom,
            )
        } else {
            (
                (focus.map_or(0, |ix| ix + 1)..len).collect(),
                FocusRequest::FromTop,
            )
        };
        for ix in candidates {
            if c.at(ix).map_or(false, |e| e.wants_focus()) {
                // handled either way: a focus that does not yield keeps the key too
                new_focus(c, ctx, Some(ix), req);
                return true;
            }
        }
    }
    false
}

pub fn text(c: &dyn Composite, ctx: &Context, info: TextInfo) -> bool {
    match c.focus_index() {
        Some(ix) => with_child(c, ctx, ix, |e, ectx| e.text(ectx, info)).unwrap_or(false),
        None => false,
    }
}

/// Sends `leaving` to every hovered child that is no longer under `p`, then returns the child
/// now under `p` and whether it was already hovered.
fn update_hover(
    c: &dyn Composite,
    ctx: &Context,
    p: Point,
    mut leave: impl FnMut(&dyn Element, &Context),
) -> Option<(HitInfo, CursorTracking)> {
    let hovering: Vec<usize> = c.composite_state().hovering();
    for ix in hovering {
        if ix >= c.len() {
            c.composite_state().lock().cursor_hovering.remove(&ix);
            continue;
        }
        let still_hit = with_child(c, ctx, ix, |e, ectx| {
            if ectx.bounds.includes(p) && e.hit_test(ectx, p, false, true).is_some() {
                true
            } else {
                leave(e, ectx);
                false
            }
        });
        if still_hit != Some(true) {
            c.composite_state().lock().cursor_hovering.remove(&ix);
        }
    }

    let info = hit_element(c, ctx, p, true);
    let mut tracking = c.composite_state().lock();
    match info {
        Some(info) => {
            tracking.cursor_tracking = Some(info.index);
            let status = if tracking.cursor_hovering.insert(info.index) {
                CursorTracking::Entering
            } else {
                CursorTracking::Hovering
            };
            Some((info, status))
        }
        None => {
            tracking.cursor_tracking = None;
            None
        }
    }
}

/// Sends `leaving` to every hovered child.
fn leave_all(c: &dyn Composite, ctx: &Context, mut leave: impl FnMut(&dyn Element, &Context)) {
    let hovering: Vec<usize> = {
        let mut tracking = c.composite_state().lock();
        tracking.cursor_tracking = None;
        std::mem::take(&mut tracking.cursor_hovering)
            .into_iter()
            .collect()
    };
    for ix in hovering {
        if ix < c.len() {
            with_child(c, ctx, ix, |e, ectx| leave(e, ectx));
        }
    }
}

/// Dispatches cursor movement to every child the cursor enters, hovers over or leaves.
///
/// Several children may be hovered at once when they overlap.
pub fn cursor(c: &dyn Composite, ctx: &Context, p: Point, status: CursorTracking) -> bool {
    if status == CursorTracking::Leaving {
        leave_all(c, ctx, |e, ectx| {
            e.cursor(ectx, p, CursorTracking::Leaving);
        });
        return false;
    }

    let hit = update_hover(c, ctx, p, |e, ectx| {
        e.cursor(ectx, p, CursorTracking::Leaving);
    });
    match hit {
        Some((info, status)) => {
            let ectx = ctx.sub(&*info.element, info.bounds);
            info.element.cursor(&ectx, p, status)
        }
        None => false,
    }
}

pub fn scroll(c: &dyn Composite, ctx: &Context, dir: Extent, p: Point) -> bool {
    if c.is_empty() {
        return false;
    }
    match hit_element(c, ctx, p, true) {
        Some(info) if info.bounds.intersects(ctx.view_bounds()) => {
            let ectx = ctx.sub(&*info.element, info.bounds);
            info.element.scroll(&ectx, dir, p)
        }
        _ => false,
    }
}

/// Dispatches a drag-and-drop hover with the same bookkeeping as [`cursor`].
pub fn track_drop(c: &dyn Composite, ctx: &Context, info: &DropInfo, status: CursorTracking) -> bool {
    if status == CursorTracking::Leaving {
        leave_all(c, ctx, |e, ectx| {
            e.track_drop(ectx, info, CursorTracking::Leaving);
        });
        return false;
    }

    let hit = update_hover(c, ctx, info.location, |e, ectx| {
        e.track_drop(ectx, info, CursorTracking::Leaving);
    });
    match hit {
        Some((hit, status)) => {
            let ectx = ctx.sub(&*hit.element, hit.bounds);
            hit.element.track_drop(&ectx, info, status)
        }
        None => false,
    }
}

/// Delivers a drop to the child the drop was last tracked over.
pub fn accept_drop(c: &dyn Composite, ctx: &Context, info: &DropInfo) -> bool {
    match c.composite_state().cursor_tracking() {
        Some(ix) => with_child(c, ctx, ix, |e, ectx| e.accept_drop(ectx, info)).unwrap_or(false),
        None => false,
    }
}

/// Gives focus to a child when the composite itself gains focus.
pub fn begin_focus(c: &dyn Composite, req: FocusRequest) {
    let len = c.len();
    let mut focus = c.composite_state().focus();
    if focus.is_none() {
        focus = match req {
            FocusRequest::RestorePrevious => c.composite_state().saved_focus(),
            FocusRequest::FromTop | FocusRequest::FromBottom => {
                let top_down = (req == FocusRequest::FromTop) ^ c.reverse_index();
                let wants_focus = |ix: &usize| c.at(*ix).map_or(false, |e| e.wants_focus());
                if top_down {
                    (0..len).find(wants_focus)
                } else {
                    (0..len).rev().find(wants_focus)
                }
            }
        };
        c.composite_state().lock().focus = focus;
    }

    if let Some(e) = focus.filter(|&ix| ix < len).and_then(|ix| c.at(ix)) {
        e.begin_focus(req);
    }
}

/// Ends focus on the focused child and remembers it for [`FocusRequest::RestorePrevious`].
pub fn end_focus(c: &dyn Composite) -> bool {
    let yields = c.focus().map_or(true, |e| e.end_focus());
    if yields {
        let mut tracking = c.composite_state().lock();
        tracking.saved_focus = tracking.focus.take();
    }
    yields
}

/// Clears focus in `c` and in every enclosing composite, then tells the view.
pub fn relinquish_focus(c: &dyn Composite, ctx: &Context) {
    if c.composite_state().focus().is_some() {
        if let Some(e) = c.focus() {
            e.end_focus();
        }
        c.composite_state().lock().focus = None;
        relinquish_parent_focus(ctx);
    }
    c.composite_state().lock().saved_focus = None;
}

/// Relinquishes focus in the composite enclosing `ctx`, or in the view at the root.
pub(crate) fn relinquish_parent_focus(ctx: &Context) {
    match find_composite(ctx) {
        Some((parent, pctx)) => relinquish_focus(parent, pctx),
        None => ctx.view.relinquish_focus(),
    }
}

/// Focuses the child at `ix` directly, without notifying any child.
pub fn set_focus(c: &dyn Composite, ix: usize) {
    if ix < c.len() {
        c.composite_state().lock().focus = Some(ix);
    }
}

#[cfg(test)]
mod tests {
    use crate::composer::static_cell_composer;
    use crate::composite::{hit_element, Composite};
    use crate::events::{CursorTracking, KeyCode, KeyInfo, KeyModifiers, MouseButton};
    use crate::floating::Floating;
    use crate::layer::Layer;
    use crate::limits::AxisLimits;
    use crate::list::List;
    use crate::rect::{Point, Rect};
    use crate::testing::{test_view, Probe};
    use crate::tile::Tile;
    use crate::{Context, Element, ElementPtr, NullCanvas};
    use std::sync::Arc;

    fn column(probes: &[Arc<Probe>]) -> Tile {
        let elements: Vec<ElementPtr> = probes.iter().map(|p| p.clone() as ElementPtr).collect();
        Tile::vertical(elements)
    }

    fn rows() -> Vec<Arc<Probe>> {
        (0..3).map(|_| Arc::new(Probe::focusable().sized(100., 20.))).collect()
    }

    #[test]
    fn click_tracking_survives_pointer_leaving() {
        let (view, _) = test_view();
        let canvas = NullCanvas::new(view.bounds());
        let probes = rows();
        let tile = column(&probes);
        let ctx = Context::new(&view, &canvas, &tile, Rect::new(0., 0., 100., 60.));

        assert!(tile.click(&ctx, MouseButton::press(Point::new(10., 25.))));
        assert_eq!(tile.composite_state().click_tracking(), Some(1));

        tile.drag(&ctx, MouseButton::press(Point::new(300., 300.)));
        assert_eq!(
            probes[1].drags(),
            1,
            "drag goes to the pressed child even outside its bounds"
        );

        tile.click(&ctx, MouseButton::release(Point::new(300., 300.)));
        assert_eq!(probes[1].releases(), 1, "release goes to the tracked child");
        assert_eq!(
            tile.composite_state().click_tracking(),
            None,
            "release clears tracking"
        );
    }

    #[test]
    fn focus_is_exclusive() {
        let (view, _) = test_view();
        let canvas = NullCanvas::new(view.bounds());
        let probes = rows();
        let tile = column(&probes);
        let ctx = Context::new(&view, &canvas, &tile, Rect::new(0., 0., 100., 60.));

        tile.click(&ctx, MouseButton::press(Point::new(10., 5.)));
        tile.click(&ctx, MouseButton::release(Point::new(10., 5.)));
        assert!(probes[0].has_focus());

        tile.click(&ctx, MouseButton::press(Point::new(10., 45.)));
        assert!(!probes[0].has_focus(), "previous focus ended");
        assert!(probes[2].has_focus());
        assert_eq!(
            probes.iter().filter(|p| p.has_focus()).count(),
            1,
            "exactly one child holds focus"
        );
        assert!(
            probes[0].last_focus_event_order() < probes[2].last_focus_event_order(),
            "end_focus happens before begin_focus"
        );
    }

    #[test]
    fn refusing_focus_swallows_click() {
        let (view, _) = test_view();
        let canvas = NullCanvas::new(view.bounds());
        let probes = rows();
        probes[0].refuse_to_yield(true);
        let tile = column(&probes);
        let ctx = Context::new(&view, &canvas, &tile, Rect::new(0., 0., 100., 60.));

        tile.click(&ctx, MouseButton::press(Point::new(10., 5.)));
        let presses_before = probes[1].presses();
        assert!(!tile.click(&ctx, MouseButton::press(Point::new(10., 25.))));
        assert_eq!(probes[1].presses(), presses_before, "click was not processed");
        assert_eq!(tile.focus_index(), Some(0));
    }

    #[test]
    fn tab_moves_focus_both_ways() {
        let (view, _) = test_view();
        let canvas = NullCanvas::new(view.bounds());
        let probes = rows();
        let tile = column(&probes);
        let ctx = Context::new(&view, &canvas, &tile, Rect::new(0., 0., 100., 60.));

        assert!(tile.key(&ctx, KeyInfo::press(KeyCode::Tab)));
        assert_eq!(tile.focus_index(), Some(0));
        tile.key(&ctx, KeyInfo::press(KeyCode::Tab));
        assert_eq!(tile.focus_index(), Some(1));
        tile.key(
            &ctx,
            KeyInfo::press(KeyCode::Tab).with_modifiers(KeyModifiers::SHIFT),
        );
        assert_eq!(tile.focus_index(), Some(0));
        assert!(
            !tile.key(
                &ctx,
                KeyInfo::press(KeyCode::Tab).with_modifiers(KeyModifiers::SHIFT)
            ),
            "no focusable child before the first"
        );
    }

    #[test]
    fn cursor_enters_and_leaves() {
        let (view, _) = test_view();
        let canvas = NullCanvas::new(view.bounds());
        let probes = rows();
        let tile = column(&probes);
        let ctx = Context::new(&view, &canvas, &tile, Rect::new(0., 0., 100., 60.));

        tile.cursor(&ctx, Point::new(5., 5.), CursorTracking::Hovering);
        tile.cursor(&ctx, Point::new(6., 6.), CursorTracking::Hovering);
        assert_eq!(
            probes[0].cursor_events(),
            vec![CursorTracking::Entering, CursorTracking::Hovering]
        );

        tile.cursor(&ctx, Point::new(5., 25.), CursorTracking::Hovering);
        assert_eq!(
            probes[0].cursor_events().last(),
            Some(&CursorTracking::Leaving),
            "moving away sends leaving"
        );
        assert_eq!(tile.composite_state().hovering(), vec![1]);

        tile.cursor(&ctx, Point::new(5., 25.), CursorTracking::Leaving);
        assert_eq!(probes[1].cursor_events().last(), Some(&CursorTracking::Leaving));
        assert!(tile.composite_state().hovering().is_empty());
    }

    #[test]
    fn hits_are_contained_in_child_bounds() {
        let (view, _) = test_view();
        let canvas = NullCanvas::new(view.bounds());
        let probes = rows();
        let tile = column(&probes);
        let ctx = Context::new(&view, &canvas, &tile, Rect::new(0., 0., 100., 60.));

        for y in 0..70 {
            for x in [0., 50., 99., 120.].iter() {
                let p = Point::new(*x, y as f64);
                if let Some(info) = hit_element(&tile, &ctx, p, true) {
                    assert!(info.bounds.includes(p), "hit {:?} does not include {:?}", info, p);
                    assert_eq!(info.bounds, tile.bounds_of(&ctx, info.index));
                }
            }
        }
    }

    #[test]
    fn list_hits_stay_inside_cells() {
        let (view, _) = test_view();
        let canvas = NullCanvas::new(view.bounds());
        let list = List::new(static_cell_composer(
            AxisLimits::default(),
            20.,
            3,
            |_| Arc::new(Probe::control()) as ElementPtr,
        ));
        let ctx = Context::new(&view, &canvas, &list, Rect::new(0., 0., 100., 200.));
        list.layout(&ctx);

        for y in 0..200 {
            let p = Point::new(50., y as f64);
            match hit_element(&list, &ctx, p, true) {
                Some(info) => {
                    assert!(info.bounds.includes(p), "hit {:?} does not include {:?}", info, p);
                    assert_eq!(info.bounds, list.bounds_of(&ctx, info.index));
                }
                None => assert!(p.y > 60., "{:?} is on a cell", p),
            }
        }
        assert!(
            hit_element(&list, &ctx, Point::new(50., 61.), true).is_none(),
            "the gap past the last cell hits nothing"
        );

        // a new size lays the cells out again
        let narrow = Context::new(&view, &canvas, &list, Rect::new(0., 0., 40., 200.));
        list.layout(&narrow);
        assert!(hit_element(&list, &narrow, Point::new(50., 10.), true).is_none());
        let info = hit_element(&list, &narrow, Point::new(30., 10.), true).expect("first cell");
        assert_eq!(info.bounds, Rect::new(0., 0., 40., 20.));

        list.erase(&[0]).expect("index in range");
        list.layout(&narrow);
        assert!(
            hit_element(&list, &narrow, Point::new(30., 50.), true).is_none(),
            "the erased cell's space is gone"
        );
        let info = hit_element(&list, &narrow, Point::new(30., 30.), true).expect("second cell");
        assert_eq!(info.index, 1);
        assert_eq!(info.bounds, Rect::new(0., 20., 40., 40.));
    }

    #[test]
    fn layer_hits_go_to_the_front_most_child_under_the_point() {
        let (view, _) = test_view();
        let canvas = NullCanvas::new(view.bounds());
        let back_bounds = Rect::new(0., 0., 100., 100.);
        let front_bounds = Rect::new(50., 50., 150., 150.);
        let layer = Layer::new(vec![
            Arc::new(Floating::new(back_bounds, Arc::new(Probe::control()))) as ElementPtr,
            Arc::new(Floating::new(front_bounds, Arc::new(Probe::control()))) as ElementPtr,
        ]);
        let ctx = Context::new(&view, &canvas, &layer, Rect::new(0., 0., 200., 200.));

        for y in (0..200).step_by(5) {
            for x in (0..200).step_by(5) {
                let p = Point::new(x as f64, y as f64);
                let (in_back, in_front) = (back_bounds.includes(p), front_bounds.includes(p));
                match hit_element(&layer, &ctx, p, true) {
                    Some(info) => {
                        assert!(info.leaf.bounds.includes(p), "hit {:?} does not include {:?}", info, p);
                        assert_eq!(info.index, if in_front { 1 } else { 0 }, "at {:?}", p);
                    }
                    None => assert!(!in_back && !in_front, "{:?} is inside a window", p),
                }
            }
        }
    }
}
