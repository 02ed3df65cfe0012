//! Drop targets, reorderable lists and draggable items.
//!
//! A drag inside the view never leaves it: a [`Draggable`] item shows a [`DragImage`] layer and
//! feeds drop tracking events to the view itself, carrying a private MIME type that only the
//! [`DropInserter`] it belongs to accepts. Drops from outside arrive through
//! [`View::track_drop`](crate::View::track_drop) and [`View::drop`](crate::View::drop) with the
//! MIME types of their payload.

use crate::composite::{self, hit_element};
use crate::context::{BasicContext, Context};
use crate::element::{Element, ElementPtr, Hit, Selectable};
use crate::error::Result;
use crate::events::{CursorTracking, DropInfo, KeyCode, KeyInfo, MouseButton};
use crate::floating::Floating;
use crate::limits::{ViewLimits, FULL_EXTENT};
use crate::list::{Axis, List};
use crate::rect::{Extent, Point, Rect};
use crate::selection::SelectionList;
use crate::tracker::{Track, Tracker, TrackerInfo};
use crate::traversal::{find_composite, find_parent, find_subject, with_composite};
use core::any::Any;
use core::fmt;
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, trace, warn};
use uuid::Uuid;

/// MIME type prefix of the payload that identifies an in-view drag.
pub const DROP_TARGET_MIME: &str = "x-plume/drop-target";

/// The MIME filter and hover state shared by drop targets.
#[derive(Debug)]
pub struct DropBase {
    mime_types: BTreeSet<String>,
    key: String,
    tracking: AtomicBool,
}

impl DropBase {
    /// Creates a target that accepts `mime_types` and its own unique key.
    pub fn new<I, S>(mime_types: I) -> DropBase
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let key = format!("{};{}", DROP_TARGET_MIME, Uuid::new_v4());
        let mut mime_types: BTreeSet<String> = mime_types.into_iter().map(Into::into).collect();
        mime_types.insert(key.clone());
        DropBase {
            mime_types,
            key,
            tracking: AtomicBool::new(false),
        }
    }

    /// The MIME type that only this target accepts.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn mime_types(&self) -> impl Iterator<Item = &str> {
        self.mime_types.iter().map(String::as_str)
    }

    /// True if the payload carries any accepted MIME type.
    pub fn accepts(&self, info: &DropInfo) -> bool {
        info.data.keys().any(|mime| self.mime_types.contains(mime))
    }

    /// Updates the hover state. Returns true while an acceptable payload hovers over the target.
    pub fn track(&self, ctx: &Context, info: &DropInfo, status: CursorTracking) -> bool {
        let tracking = status != CursorTracking::Leaving && self.accepts(info);
        if self.tracking.swap(tracking, Ordering::SeqCst) != tracking {
            trace!(tracking, "drop hover changed");
            ctx.refresh();
        }
        tracking
    }

    pub fn reset(&self) {
        self.tracking.store(false, Ordering::SeqCst);
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking.load(Ordering::SeqCst)
    }
}

/// Hit test that claims the whole of `ctx.bounds`, preferring whatever the subject reports.
fn hit_own_bounds(subject: &ElementPtr, ctx: &Context, p: Point, leaf: bool) -> Option<Hit> {
    if !ctx.bounds.includes(p) {
        return None;
    }
    let sctx = ctx.sub(&**subject, ctx.bounds);
    subject.hit_test(&sctx, p, leaf, false).or(Some(Hit {
        bounds: ctx.bounds,
        wants_focus: subject.wants_focus(),
    }))
}

pub type OnDrop = Arc<dyn Fn(&DropInfo) -> bool + Send + Sync>;

/// Accepts drops of the given MIME types anywhere over its subject, and outlines itself while
/// an acceptable payload hovers over it.
pub struct DropBox {
    subject: ElementPtr,
    base: DropBase,
    on_drop: Option<OnDrop>,
}

impl DropBox {
    pub fn new<I, S>(subject: ElementPtr, mime_types: I) -> DropBox
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DropBox {
            subject,
            base: DropBase::new(mime_types),
            on_drop: None,
        }
    }

    /// Sets the drop handler, which returns whether it took the data.
    pub fn on_drop(mut self, f: impl Fn(&DropInfo) -> bool + Send + Sync + 'static) -> Self {
        self.on_drop = Some(Arc::new(f));
        self
    }

    pub fn base(&self) -> &DropBase {
        &self.base
    }
}

impl fmt::Debug for DropBox {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("DropBox")
            .field("subject", &self.subject)
            .field("base", &self.base)
            .finish()
    }
}

impl Element for DropBox {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn subject(&self) -> Option<&ElementPtr> {
        Some(&self.subject)
    }

    fn wants_control(&self) -> bool {
        true
    }

    fn hit_test(&self, ctx: &Context, p: Point, leaf: bool, _: bool) -> Option<Hit> {
        hit_own_bounds(&self.subject, ctx, p, leaf)
    }

    fn draw(&self, ctx: &Context) {
        self.subject.draw(&ctx.sub(&*self.subject, ctx.bounds));
        if self.base.is_tracking() {
            let color = ctx.view.settings().indicator_color;
            ctx.canvas.stroke_rect(ctx.bounds.inset(1.5, 1.5), 3., color);
        }
    }

    fn track_drop(&self, ctx: &Context, info: &DropInfo, status: CursorTracking) -> bool {
        self.base.track(ctx, info, status)
    }

    fn accept_drop(&self, ctx: &Context, info: &DropInfo) -> bool {
        if !self.base.accepts(info) {
            return false;
        }
        self.base.reset();
        let accepted = self.on_drop.as_ref().map_or(false, |f| f(info));
        debug!(accepted, "drop delivered");
        ctx.refresh();
        accepted
    }
}

pub type OnInsert = Arc<dyn Fn(&DropInfo, usize) -> bool + Send + Sync>;
pub type OnMove = Arc<dyn Fn(usize, &[usize]) + Send + Sync>;
pub type OnErase = Arc<dyn Fn(&[usize]) + Send + Sync>;
pub type OnSelectItems = Arc<dyn Fn(&[usize], Option<usize>) + Send + Sync>;

/// Makes a [`List`] a drop target that inserts between its cells, and lets its [`Draggable`]
/// items be reordered or deleted.
///
/// The list is wrapped in a multi-selection [`SelectionList`]. While a payload hovers over the
/// list, an insertion line marks the gap the drop would go to. Changes are reported through
/// callbacks; the list itself is only moved or erased for drags of its own items, everything
/// else is up to the owner of the data.
pub struct DropInserter {
    selection: Arc<SelectionList>,
    subject: ElementPtr,
    base: DropBase,
    insertion: Mutex<Option<usize>>,
    line: Mutex<Option<(Point, Point)>>,
    on_drop: Option<OnInsert>,
    on_move: Option<OnMove>,
    on_erase: Option<OnErase>,
    on_select: Option<OnSelectItems>,
}

impl DropInserter {
    /// Wraps `list`, which should contain a [`List`], accepting drops of `mime_types`.
    pub fn new<I, S>(list: ElementPtr, mime_types: I) -> DropInserter
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let selection = Arc::new(SelectionList::new(list, true));
        DropInserter {
            subject: selection.clone(),
            selection,
            base: DropBase::new(mime_types),
            insertion: Mutex::new(None),
            line: Mutex::new(None),
            on_drop: None,
            on_move: None,
            on_erase: None,
            on_select: None,
        }
    }

    /// Called with external payloads dropped into the list, and the insertion position.
    pub fn on_drop(mut self, f: impl Fn(&DropInfo, usize) -> bool + Send + Sync + 'static) -> Self {
        self.on_drop = Some(Arc::new(f));
        self
    }

    /// Called after items of the list were dragged to a new position.
    pub fn on_move(mut self, f: impl Fn(usize, &[usize]) + Send + Sync + 'static) -> Self {
        self.on_move = Some(Arc::new(f));
        self
    }

    /// Called after selected items were deleted.
    pub fn on_erase(mut self, f: impl Fn(&[usize]) + Send + Sync + 'static) -> Self {
        self.on_erase = Some(Arc::new(f));
        self
    }

    /// Called with the selection and its end anchor whenever a click or key changed it.
    pub fn on_select(mut self, f: impl Fn(&[usize], Option<usize>) + Send + Sync + 'static) -> Self {
        self.on_select = Some(Arc::new(f));
        self
    }

    pub fn selection(&self) -> &Arc<SelectionList> {
        &self.selection
    }

    pub fn base(&self) -> &DropBase {
        &self.base
    }

    /// The MIME type that identifies drags of this list's own items.
    pub fn key(&self) -> &str {
        self.base.key()
    }

    /// Where a drop would currently be inserted.
    pub fn insertion_pos(&self) -> Option<usize> {
        *self.insertion.lock()
    }

    fn list(&self) -> Option<&List> {
        find_subject::<List>(self)
    }

    fn axis(&self) -> Axis {
        self.list().map_or(Axis::Vertical, List::axis)
    }

    /// Finds the gap closest to `p`, and the line that marks it.
    fn insertion_at(&self, ctx: &Context, p: Point) -> Option<(usize, (Point, Point))> {
        let axis = self.axis();
        let mut result = None;
        with_composite(ctx, &mut |c, cctx| {
            let hit = hit_element(c, cctx, p, false);
            let len = c.len();
            let (pos, bounds, before) = match hit {
                Some(hit) => {
                    let (start, end) = axis.main_range(hit.bounds);
                    if axis.coord(p) < (start + end) / 2. {
                        (hit.index, hit.bounds, true)
                    } else {
                        (hit.index + 1, hit.bounds, false)
                    }
                }
                None if len == 0 => (0, cctx.bounds, true),
                None => {
                    let first = c.bounds_of(cctx, 0);
                    if axis.coord(p) < axis.main_range(first).0 {
                        (0, first, true)
                    } else {
                        (len, c.bounds_of(cctx, len - 1), false)
                    }
                }
            };
            let (start, end) = axis.main_range(bounds);
            let edge = if before { start } else { end };
            let line = match axis {
                Axis::Vertical => (Point::new(bounds.left, edge), Point::new(bounds.right, edge)),
                Axis::Horizontal => (Point::new(edge, bounds.top), Point::new(edge, bounds.bottom)),
            };
            result = Some((pos, line));
        });
        result
    }

    /// Moves the items at `indices` to the current insertion position, and selects them there.
    ///
    /// Does nothing if no drop is being tracked.
    pub fn move_items(&self, indices: &[usize]) -> Result<()> {
        let pos = match self.insertion.lock().take() {
            Some(pos) => pos,
            None => return Ok(()),
        };
        *self.line.lock() = None;
        let list = match self.list() {
            Some(list) => list,
            None => {
                warn!("drop inserter has no list to move items in");
                return Ok(());
            }
        };
        list.move_items(pos, indices)?;
        debug!(pos, count = indices.len(), "moving dragged items");
        if let Some(f) = &self.on_move {
            f(pos, indices);
        }
        if !indices.is_empty() {
            let start = pos - indices.iter().filter(|&&ix| ix < pos).count();
            self.selection.update_selection(start, start + indices.len() - 1);
        }
        Ok(())
    }

    /// Erases the items at `indices` and clears the selection.
    pub fn erase(&self, indices: &[usize]) -> Result<()> {
        if let Some(list) = self.list() {
            list.erase(indices)?;
        }
        debug!(count = indices.len(), "erasing items");
        if let Some(f) = &self.on_erase {
            f(indices);
        }
        self.selection.select_none();
        Ok(())
    }

    fn notify_select(&self) {
        if let Some(f) = &self.on_select {
            f(&self.selection.get_selection(), self.selection.get_select_end());
        }
    }
}

impl fmt::Debug for DropInserter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("DropInserter")
            .field("selection", &self.selection)
            .field("base", &self.base)
            .field("insertion", &*self.insertion.lock())
            .finish()
    }
}

impl Element for DropInserter {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn subject(&self) -> Option<&ElementPtr> {
        Some(&self.subject)
    }

    fn wants_control(&self) -> bool {
        true
    }

    fn wants_focus(&self) -> bool {
        true
    }

    fn hit_test(&self, ctx: &Context, p: Point, leaf: bool, _: bool) -> Option<Hit> {
        hit_own_bounds(&self.subject, ctx, p, leaf)
    }

    fn draw(&self, ctx: &Context) {
        self.subject.draw(&ctx.sub(&*self.subject, ctx.bounds));
        if !self.base.is_tracking() {
            return;
        }
        if let Some((from, to)) = *self.line.lock() {
            let settings = ctx.view.settings();
            ctx.canvas
                .line(from, to, settings.insertion_line_width, settings.indicator_color);
        }
    }

    fn click(&self, ctx: &Context, btn: MouseButton) -> bool {
        let sctx = ctx.sub(&*self.subject, ctx.bounds);
        let handled = self.subject.click(&sctx, btn);
        if handled && btn.down {
            self.notify_select();
        }
        handled
    }

    fn key(&self, ctx: &Context, k: KeyInfo) -> bool {
        let sctx = ctx.sub(&*self.subject, ctx.bounds);
        let handled = self.subject.key(&sctx, k);
        if handled && k.is_down() {
            self.notify_select();
        }
        handled
    }

    fn track_drop(&self, ctx: &Context, info: &DropInfo, status: CursorTracking) -> bool {
        let was_tracking = self.base.is_tracking();
        if !self.base.track(ctx, info, status) {
            return false;
        }
        // the last position is kept after leaving, for the drag that is about to end
        if let Some((pos, line)) = self.insertion_at(ctx, info.location) {
            let moved = self.insertion.lock().replace(pos) != Some(pos);
            *self.line.lock() = Some(line);
            if moved && was_tracking {
                ctx.refresh();
            }
        }
        true
    }

    fn accept_drop(&self, ctx: &Context, info: &DropInfo) -> bool {
        if !self.base.accepts(info) {
            return false;
        }
        self.base.reset();
        *self.line.lock() = None;
        let pos = match self.insertion.lock().take() {
            Some(pos) => Some(pos),
            None => self.insertion_at(ctx, info.location).map(|(pos, _)| pos),
        };
        let accepted = match (pos, &self.on_drop) {
            (Some(pos), Some(f)) => f(info, pos),
            _ => false,
        };
        debug!(?pos, accepted, "drop delivered to list");
        ctx.refresh();
        accepted
    }
}

/// Proxy drawing a stack of boxes behind its subject, one per dragged item.
#[derive(Debug)]
pub struct DragImage {
    subject: ElementPtr,
    boxes: usize,
}

impl DragImage {
    pub fn new(subject: ElementPtr, boxes: usize) -> DragImage {
        DragImage {
            subject,
            boxes: boxes.max(1),
        }
    }

    fn spread(&self, ctx: &BasicContext) -> f64 {
        ctx.view.settings().drag_image_offset * (self.boxes - 1) as f64
    }
}

impl Element for DragImage {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn subject(&self) -> Option<&ElementPtr> {
        Some(&self.subject)
    }

    fn subject_bounds(&self, ctx: &Context) -> Rect {
        let spread = self.spread(&ctx.basic());
        let mut b = ctx.bounds;
        b.right -= spread;
        b.bottom -= spread;
        b
    }

    fn limits(&self, ctx: &BasicContext) -> ViewLimits {
        let spread = self.spread(ctx);
        let mut limits = self.subject.limits(ctx).grow(Extent::new(spread, spread));
        limits.min.x = limits.min.x.max(32.);
        limits.max.x = limits.max.x.max(limits.min.x);
        limits
    }

    fn draw(&self, ctx: &Context) {
        let settings = ctx.view.settings();
        let color = settings.indicator_color;
        let first = self.subject_bounds(ctx);
        for ix in (0..self.boxes).rev() {
            let offset = settings.drag_image_offset * ix as f64;
            ctx.canvas.fill_round_rect(
                first.move_by(offset, offset),
                2.,
                color.opacity(color.a * 0.6),
            );
        }
        self.subject.draw(&ctx.sub(&*self.subject, first));
    }
}

#[derive(Debug, Default)]
pub struct DragState {
    /// Set when the press started a drag of the selection.
    dragging: bool,

    /// Key of the enclosing [`DropInserter`].
    key: Option<String>,
}

/// A selectable list item that can be dragged to reorder the list, or deleted with the
/// keyboard.
///
/// Pressing a selected item starts a drag; after
/// [`Settings::drag_image_delay`](crate::Settings::drag_image_delay) a drag image of the
/// selection follows the pointer. Releasing it farther than
/// [`Settings::drag_threshold`](crate::Settings::drag_threshold) from where it was pressed moves
/// the selection to the gap under the pointer. Escape cancels the drag, Delete erases the
/// selection.
pub struct Draggable {
    this: Weak<Draggable>,
    subject: ElementPtr,
    tracker: Tracker<DragState>,
    selected: AtomicBool,
    drag_image: Mutex<Option<Arc<Floating>>>,
}

impl Draggable {
    pub fn new(subject: ElementPtr) -> Arc<Draggable> {
        Arc::new_cyclic(|this| Draggable {
            this: this.clone(),
            subject,
            tracker: Tracker::new(),
            selected: AtomicBool::new(false),
            drag_image: Mutex::new(None),
        })
    }

    /// True while the drag image is shown.
    pub fn is_dragging(&self) -> bool {
        self.drag_image.lock().is_some()
    }

    fn remove_drag_image(&self, ctx: &Context) {
        let image = self.drag_image.lock().take();
        if let Some(image) = image {
            ctx.view.remove(&*image);
            ctx.view.refresh();
        }
    }

    fn send_drop(ctx: &Context, key: &Option<String>, p: Point, status: CursorTracking) {
        if let Some(key) = key {
            let info = DropInfo::new(p).with(key.clone(), Vec::new());
            ctx.view.track_drop(&info, status);
        }
    }

    /// Schedules the drag image of `boxes` items, starting at `bounds`.
    fn show_drag_image_later(&self, ctx: &Context, bounds: Rect, boxes: usize, key: Option<String>) {
        let this = self.this.clone();
        let delay = ctx.view.settings().drag_image_delay;
        ctx.view.post_after(delay, move |view| {
            let this = match this.upgrade() {
                Some(this) => this,
                None => return,
            };
            let pointer = this.tracker.with_state(|info| (info.first, info.current));
            let (first, current) = match pointer {
                Some(pointer) if this.tracker.is_tracking() => pointer,
                _ => return,
            };
            let d = current - first;
            let image = Arc::new(Floating::new(
                bounds.move_by(d.x, d.y),
                Arc::new(DragImage::new(this.subject.clone(), boxes)),
            ));
            *this.drag_image.lock() = Some(image.clone());
            view.add(image);
            view.refresh();
            debug!(boxes, "drag image shown");
            if let Some(key) = key {
                let info = DropInfo::new(current).with(key, Vec::new());
                view.track_drop(&info, CursorTracking::Entering);
            }
        });
    }
}

impl fmt::Debug for Draggable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Draggable")
            .field("subject", &self.subject)
            .field("selected", &self.is_selected())
            .field("tracker", &self.tracker)
            .finish()
    }
}

impl Selectable for Draggable {
    fn is_selected(&self) -> bool {
        self.selected.load(Ordering::SeqCst)
    }

    fn select(&self, state: bool) {
        self.selected.store(state, Ordering::SeqCst);
    }
}

impl Track<DragState> for Draggable {
    fn begin_tracking(&self, ctx: &Context, info: &mut TrackerInfo<DragState>) {
        if info.modifiers.shift || info.modifiers.action() || !self.is_selected() {
            return;
        }
        let selection = match find_parent::<SelectionList>(ctx) {
            Some(selection) => selection,
            None => return,
        };

        let settings = ctx.view.settings();
        let boxes = selection
            .get_selection()
            .len()
            .clamp(1, settings.max_drag_boxes.max(1));
        let spread = settings.drag_image_offset * (boxes - 1) as f64;
        let mut bounds = ctx.bounds;
        bounds.right += spread;
        bounds.bottom += spread;

        info.ext.dragging = true;
        info.ext.key = find_parent::<DropInserter>(ctx).map(|di| di.key().to_owned());
        self.show_drag_image_later(ctx, bounds, boxes, info.ext.key.clone());
        info.processed = true;
    }

    fn keep_tracking(&self, ctx: &Context, info: &mut TrackerInfo<DragState>) {
        if !info.ext.dragging || info.current == info.previous {
            return;
        }
        let image = match self.drag_image.lock().clone() {
            Some(image) => image,
            None => return,
        };
        let d = info.movement();
        image.set_bounds(image.bounds().move_by(d.x, d.y));
        ctx.view.refresh();
        Self::send_drop(ctx, &info.ext.key, info.current, CursorTracking::Hovering);
    }

    fn end_tracking(&self, ctx: &Context, info: &mut TrackerInfo<DragState>) {
        // nothing was dragged unless the drag image came up
        if !self.is_dragging() {
            return;
        }
        self.remove_drag_image(ctx);
        if !info.ext.dragging {
            return;
        }
        Self::send_drop(ctx, &info.ext.key, info.current, CursorTracking::Leaving);

        let threshold = ctx.view.settings().drag_threshold;
        let d = info.current - info.first;
        if d.x.abs() <= threshold && d.y.abs() <= threshold {
            return;
        }
        if let Some(di) = find_parent::<DropInserter>(ctx) {
            let selection = di.selection().get_selection();
            if let Err(err) = di.move_items(&selection) {
                warn!(%err, "could not move dragged items");
            }
        }
    }
}

impl Element for Draggable {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn subject(&self) -> Option<&ElementPtr> {
        Some(&self.subject)
    }

    fn as_selectable(&self) -> Option<&dyn Selectable> {
        Some(self)
    }

    fn limits(&self, ctx: &BasicContext) -> ViewLimits {
        let mut limits = self.subject.limits(ctx);
        limits.max.x = FULL_EXTENT;
        limits
    }

    fn wants_control(&self) -> bool {
        true
    }

    fn wants_focus(&self) -> bool {
        true
    }

    fn hit_test(&self, ctx: &Context, p: Point, _: bool, _: bool) -> Option<Hit> {
        if ctx.bounds.includes(p) {
            Some(Hit {
                bounds: ctx.bounds,
                wants_focus: true,
            })
        } else {
            None
        }
    }

    fn draw(&self, ctx: &Context) {
        if self.is_selected() && ctx.enabled {
            let color = ctx.view.settings().indicator_color;
            ctx.canvas
                .fill_round_rect(ctx.bounds, 2., color.opacity(0.6));
        }
        self.subject.draw(&ctx.sub(&*self.subject, ctx.bounds));
    }

    fn click(&self, ctx: &Context, btn: MouseButton) -> bool {
        let sctx = ctx.sub(&*self.subject, ctx.bounds);
        if self.subject.click(&sctx, btn) {
            return true;
        }
        let handled = self.tracker.click(self, ctx, btn);
        if btn.down && !handled {
            self.tracker.cancel();
        }
        handled
    }

    fn drag(&self, ctx: &Context, btn: MouseButton) -> bool {
        if self.tracker.is_tracking() {
            return self.tracker.drag(self, ctx, btn);
        }
        let sctx = ctx.sub(&*self.subject, ctx.bounds);
        self.subject.drag(&sctx, btn)
    }

    fn key(&self, ctx: &Context, k: KeyInfo) -> bool {
        let sctx = ctx.sub(&*self.subject, ctx.bounds);
        if self.subject.key(&sctx, k) {
            return true;
        }
        if !k.is_down() {
            return false;
        }
        match k.code {
            KeyCode::Escape if self.tracker.is_tracking() => {
                if let Some(info) = self.tracker.cancel() {
                    Self::send_drop(ctx, &info.ext.key, info.current, CursorTracking::Leaving);
                }
                self.remove_drag_image(ctx);
                debug!("drag cancelled");
                true
            }
            KeyCode::Delete | KeyCode::ForwardDelete => {
                let di = match find_parent::<DropInserter>(ctx) {
                    Some(di) => di,
                    None => return false,
                };
                let selection = di.selection().get_selection();
                if selection.is_empty() {
                    return false;
                }
                if let Some((c, cctx)) = find_composite(ctx) {
                    if c.focus_index().map_or(false, |ix| selection.contains(&ix)) {
                        composite::relinquish_focus(c, cctx);
                    }
                }
                if let Err(err) = di.erase(&selection) {
                    warn!(%err, "could not erase selected items");
                }
                ctx.view.refresh();
                true
            }
            _ => false,
        }
    }
}
