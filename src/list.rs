//! Virtualized lists with deferred structural mutation.

use crate::composer::CellComposer;
use crate::composite::{self, Composite, CompositeState};
use crate::context::{BasicContext, Context};
use crate::element::ElementPtr;
use crate::error::{Error, Result};
use crate::limits::ViewLimits;
use crate::rect::{Extent, Point, Rect};
use crate::traversal::find_selectable;
use core::fmt;
use core::mem;
use core::ops::Range;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, warn};

/// The direction a list or tile runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Vertical,
    Horizontal,
}

impl Axis {
    /// Component of `e` along the axis.
    pub fn main(self, e: Extent) -> f64 {
        match self {
            Axis::Vertical => e.y,
            Axis::Horizontal => e.x,
        }
    }

    /// Coordinate of `p` along the axis.
    pub fn coord(self, p: Point) -> f64 {
        match self {
            Axis::Vertical => p.y,
            Axis::Horizontal => p.x,
        }
    }

    /// Component of `e` across the axis.
    pub fn cross(self, e: Extent) -> f64 {
        match self {
            Axis::Vertical => e.x,
            Axis::Horizontal => e.y,
        }
    }

    /// Builds an extent from its components along and across the axis.
    pub fn extent(self, main: f64, cross: f64) -> Extent {
        match self {
            Axis::Vertical => Extent::new(cross, main),
            Axis::Horizontal => Extent::new(main, cross),
        }
    }

    /// Start and end of `r` along the axis.
    pub fn main_range(self, r: Rect) -> (f64, f64) {
        match self {
            Axis::Vertical => (r.top, r.bottom),
            Axis::Horizontal => (r.left, r.right),
        }
    }

    /// `r` with its extent along the axis replaced.
    pub fn with_main(self, mut r: Rect, start: f64, size: f64) -> Rect {
        match self {
            Axis::Vertical => {
                r.top = start;
                r.set_height(size);
            }
            Axis::Horizontal => {
                r.left = start;
                r.set_width(size);
            }
        }
        r
    }
}

/// Checks that `indices` is strictly ascending and in range for a sequence of length `len`.
pub(crate) fn check_indices(indices: &[usize], len: usize) -> Result<()> {
    if indices.windows(2).any(|w| w[0] >= w[1]) {
        return Err(Error::UnsortedIndices);
    }
    match indices.last() {
        Some(&index) if index >= len => Err(Error::InvalidIndex { index, len }),
        _ => Ok(()),
    }
}

/// Moves the items at `indices` so they end up just before the item that was at `pos`.
///
/// The moved items keep their relative order, and so do the others. `indices` must be strictly
/// ascending.
pub fn move_indices<T>(v: &mut Vec<T>, pos: usize, indices: &[usize]) -> Result<()> {
    check_indices(indices, v.len())?;
    if pos > v.len() {
        return Err(Error::InvalidIndex {
            index: pos,
            len: v.len(),
        });
    }

    let mut pos = pos;
    let mut moved = Vec::with_capacity(indices.len());
    for &i in indices.iter().rev() {
        moved.push(v.remove(i));
        if pos > i {
            pos -= 1;
        }
    }
    let pos = pos.min(v.len());
    v.splice(pos..pos, moved.into_iter().rev());
    Ok(())
}

/// Removes the items at `indices`, which must be strictly ascending.
pub fn erase_indices<T>(v: &mut Vec<T>, indices: &[usize]) -> Result<()> {
    check_indices(indices, v.len())?;
    for &i in indices.iter().rev() {
        v.remove(i);
    }
    Ok(())
}

#[derive(Clone, Default)]
struct Cell {
    /// Offset from the start of the list.
    pos: f64,
    main_axis_size: f64,
    element: Option<ElementPtr>,
    /// Layout generation the element was last laid out in.
    layout_id: Option<u64>,
    /// Survives recycling; applied to the element whenever the cell is composed.
    selected: bool,
}

/// Pending structural changes, committed together.
#[derive(Debug, Clone, Default)]
struct Request {
    erase: Option<Vec<usize>>,
    insert: Option<(usize, usize)>,
    move_items: Option<(usize, Vec<usize>)>,
}

impl Request {
    fn is_empty(&self) -> bool {
        self.erase.is_none() && self.insert.is_none() && self.move_items.is_none()
    }
}

struct ListState {
    cells: Vec<Cell>,
    previous_size: Option<Extent>,
    previous_window: Range<usize>,
    main_axis_full_size: f64,
    layout_id: u64,
    update_request: bool,
    request: Request,
    relinquish_focus_request: bool,
}

/// A composite over a possibly huge sequence of cells supplied by a [`CellComposer`].
///
/// Only cells that intersect the visible part of the view are composed and laid out. With
/// recycling enabled (the default), cells that scroll out of view drop their element when the
/// list is drawn.
///
/// Structural changes never happen immediately: [`List::insert`], [`List::erase`] and
/// [`List::move_items`] record a request, and the next call to `limits`, `layout` or `draw`
/// commits all pending requests at once, erasing first, then inserting, then moving. Each
/// request's indices refer to the sequence as it is when that request is applied. Recording a
/// second request of the same kind before a commit replaces the first.
pub struct List {
    axis: Axis,
    composer: Arc<dyn CellComposer>,
    recycle: bool,
    inner: Mutex<ListState>,
    state: CompositeState,
}

impl List {
    /// Creates a vertical list.
    pub fn new(composer: Arc<dyn CellComposer>) -> List {
        List::with_axis(Axis::Vertical, composer)
    }

    /// Creates a horizontal list.
    pub fn hlist(composer: Arc<dyn CellComposer>) -> List {
        List::with_axis(Axis::Horizontal, composer)
    }

    pub fn with_axis(axis: Axis, composer: Arc<dyn CellComposer>) -> List {
        List {
            axis,
            composer,
            recycle: true,
            inner: Mutex::new(ListState {
                cells: Vec::new(),
                previous_size: None,
                previous_window: 0..0,
                main_axis_full_size: 0.,
                layout_id: 0,
                update_request: true,
                request: Request::default(),
                relinquish_focus_request: false,
            }),
            state: CompositeState::new(),
        }
    }

    /// Sets whether cells that leave the visible window drop their elements.
    pub fn recycle(mut self, recycle: bool) -> List {
        self.recycle = recycle;
        self
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn composer(&self) -> &Arc<dyn CellComposer> {
        &self.composer
    }

    /// Total size of all cells along the list, as of the last commit.
    pub fn main_axis_full_size(&self) -> f64 {
        self.inner.lock().main_axis_full_size
    }

    /// Number of cells currently holding an element.
    pub fn realized(&self) -> usize {
        self.inner
            .lock()
            .cells
            .iter()
            .filter(|cell| cell.element.is_some())
            .count()
    }

    /// True if structural changes are waiting for the next commit.
    pub fn has_pending_changes(&self) -> bool {
        let st = self.inner.lock();
        st.update_request || !st.request.is_empty()
    }

    /// Rebuilds every cell from the composer on the next commit.
    ///
    /// Pending requests are discarded, since their indices refer to the old cells.
    pub fn update(&self) {
        let mut st = self.inner.lock();
        if !st.request.is_empty() {
            debug!("discarding pending list requests on update");
        }
        st.update_request = true;
        st.request = Request::default();
        st.cells.clear();
        st.main_axis_full_size = 0.;
    }

    /// Removes all cells.
    pub fn clear(&self) {
        self.composer.resize(0);
        self.update();
    }

    /// Resizes the composer and rebuilds every cell.
    pub fn resize(&self, len: usize) {
        self.composer.resize(len);
        self.update();
    }

    fn base_len(&self, st: &ListState) -> usize {
        if st.update_request {
            self.composer.len()
        } else {
            st.cells.len()
        }
    }

    /// Requests erasing the cells at `indices`, which must be strictly ascending.
    pub fn erase(&self, indices: &[usize]) -> Result<()> {
        let mut st = self.inner.lock();
        check_indices(indices, self.base_len(&st))?;
        if st.request.erase.is_some() {
            debug!("replacing pending erase request");
        }
        st.request.erase = Some(indices.to_vec());
        Ok(())
    }

    /// Requests inserting `count` new cells before `pos`.
    ///
    /// `pos` refers to the sequence after any pending erase.
    pub fn insert(&self, pos: usize, count: usize) -> Result<()> {
        let mut st = self.inner.lock();
        let len = self.base_len(&st) - st.request.erase.as_ref().map_or(0, Vec::len);
        if pos > len {
            return Err(Error::InvalidIndex { index: pos, len });
        }
        if st.request.insert.is_some() {
            debug!("replacing pending insert request");
        }
        st.request.insert = Some((pos, count));
        Ok(())
    }

    /// Requests moving the cells at `indices` to just before the cell at `pos`.
    ///
    /// Indices refer to the sequence after any pending erase and insert.
    pub fn move_items(&self, pos: usize, indices: &[usize]) -> Result<()> {
        let mut st = self.inner.lock();
        let len = self.base_len(&st) - st.request.erase.as_ref().map_or(0, Vec::len)
            + st.request.insert.map_or(0, |(_, count)| count);
        check_indices(indices, len)?;
        if pos > len {
            return Err(Error::InvalidIndex { index: pos, len });
        }
        if st.request.move_items.is_some() {
            debug!("replacing pending move request");
        }
        st.request.move_items = Some((pos, indices.to_vec()));
        Ok(())
    }

    /// Commits pending requests.
    fn sync(&self, ctx: &BasicContext) {
        let (update, request, mut cells) = {
            let mut st = self.inner.lock();
            if !st.update_request && st.request.is_empty() {
                return;
            }
            (
                mem::replace(&mut st.update_request, false),
                mem::take(&mut st.request),
                mem::take(&mut st.cells),
            )
        };

        if update {
            cells = vec![Cell::default(); self.composer.len()];
        }

        // position of every cell in the pre-commit sequence, for remapping the focus
        let mut origin: Vec<Option<usize>> = (0..cells.len()).map(Some).collect();

        if let Some(indices) = request.erase {
            match erase_indices(&mut cells, &indices) {
                Ok(()) => {
                    erase_indices(&mut origin, &indices).ok();
                    self.composer
                        .resize(self.composer.len().saturating_sub(indices.len()));
                    debug!(count = indices.len(), "erased list cells");
                }
                Err(err) => warn!(%err, "skipping stale erase request"),
            }
        }

        if let Some((pos, count)) = request.insert {
            if pos <= cells.len() {
                cells.splice(pos..pos, (0..count).map(|_| Cell::default()));
                origin.splice(pos..pos, (0..count).map(|_| None));
                self.composer.resize(self.composer.len() + count);
                debug!(pos, count, "inserted list cells");
            } else {
                warn!(pos, len = cells.len(), "skipping stale insert request");
            }
        }

        if let Some((pos, indices)) = request.move_items {
            match move_indices(&mut cells, pos, &indices) {
                Ok(()) => {
                    move_indices(&mut origin, pos, &indices).ok();
                    debug!(pos, count = indices.len(), "moved list cells");
                }
                Err(err) => warn!(%err, "skipping stale move request"),
            }
        }

        let mut offset = 0.;
        for (ix, cell) in cells.iter_mut().enumerate() {
            let size = self.composer.main_axis_size(ix, ctx);
            cell.pos = offset;
            cell.main_axis_size = size;
            offset += size;
        }

        {
            let mut st = self.inner.lock();
            st.cells = cells;
            st.main_axis_full_size = offset;
            st.layout_id += 1;
        }

        if !update {
            self.remap_focus(&origin);
        }
    }

    /// Follows the focused cell to its new index after a commit.
    fn remap_focus(&self, origin: &[Option<usize>]) {
        let mut tracking = self.state.lock();
        if let Some(focus) = tracking.focus {
            match origin.iter().position(|&o| o == Some(focus)) {
                Some(ix) => tracking.focus = Some(ix),
                None => {
                    debug!(index = focus, "focused cell was erased");
                    tracking.focus = None;
                    drop(tracking);
                    self.inner.lock().relinquish_focus_request = true;
                }
            }
        }
    }

    /// Tells enclosing composites when the focused cell went away.
    fn handle_relinquish_request(&self, ctx: &Context) {
        let requested = mem::replace(&mut self.inner.lock().relinquish_focus_request, false);
        if requested {
            self.state.lock().saved_focus = None;
            composite::relinquish_parent_focus(ctx);
        }
    }

    /// Composes and lays out the cells intersecting `port`, returning their indices, bounds and
    /// elements in order.
    fn realize_window(&self, ctx: &Context, port: Rect) -> Vec<(usize, Rect, ElementPtr)> {
        let (start, _) = self.axis.main_range(ctx.bounds);
        let (port_start, port_end) = self.axis.main_range(port);

        let (window, layout_id) = {
            let st = self.inner.lock();
            let first = st
                .cells
                .partition_point(|cell| cell.pos + cell.main_axis_size < port_start - start);
            let mut window = Vec::new();
            for (ix, cell) in st.cells.iter().enumerate().skip(first) {
                let bounds = self
                    .axis
                    .with_main(ctx.bounds, start + cell.pos, cell.main_axis_size);
                if self.axis.main_range(bounds).0 > port_end {
                    break;
                }
                if bounds.intersects(port) {
                    let stale = cell.layout_id != Some(st.layout_id);
                    window.push((ix, bounds, cell.element.clone(), cell.selected, stale));
                }
            }
            (window, st.layout_id)
        };

        window
            .into_iter()
            .map(|(ix, bounds, element, selected, stale)| {
                let element = element.unwrap_or_else(|| self.compose(ix, selected));
                if stale {
                    element.layout(&ctx.sub(&*element, bounds));
                    let mut st = self.inner.lock();
                    if st.layout_id == layout_id {
                        if let Some(cell) = st.cells.get_mut(ix) {
                            cell.element = Some(element.clone());
                            cell.layout_id = Some(layout_id);
                        }
                    }
                }
                (ix, bounds, element)
            })
            .collect()
    }

    fn compose(&self, ix: usize, selected: bool) -> ElementPtr {
        let element = self.composer.compose(ix);
        if selected {
            if let Some(s) = find_selectable(&*element) {
                s.select(true);
            }
        }
        element
    }

    /// Drops the elements of cells that were visible last time but are not anymore.
    fn recycle_window(&self, window: Range<usize>) {
        let mut st = self.inner.lock();
        if st.previous_window != window {
            let previous = st.previous_window.clone();
            for ix in previous {
                if !window.contains(&ix) {
                    if let Some(cell) = st.cells.get_mut(ix) {
                        cell.element = None;
                        cell.layout_id = None;
                    }
                }
            }
        }
        st.previous_window = window;
    }
}

impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let st = self.inner.lock();
        f.debug_struct("List")
            .field("axis", &self.axis)
            .field("len", &st.cells.len())
            .field("main_axis_full_size", &st.main_axis_full_size)
            .field("layout_id", &st.layout_id)
            .field("pending", &st.request)
            .field("state", &self.state)
            .finish()
    }
}

impl Composite for List {
    fn len(&self) -> usize {
        self.inner.lock().cells.len()
    }

    fn at(&self, ix: usize) -> Option<ElementPtr> {
        let selected = {
            let st = self.inner.lock();
            match st.cells.get(ix) {
                None => return None,
                Some(Cell {
                    element: Some(element),
                    ..
                }) => return Some(element.clone()),
                Some(cell) => cell.selected,
            }
        };
        let element = self.compose(ix, selected);
        if let Some(cell) = self.inner.lock().cells.get_mut(ix) {
            cell.element = Some(element.clone());
        }
        Some(element)
    }

    fn bounds_of(&self, ctx: &Context, ix: usize) -> Rect {
        self.sync(&ctx.basic());
        let st = self.inner.lock();
        let (start, _) = self.axis.main_range(ctx.bounds);
        match st.cells.get(ix) {
            Some(cell) => self
                .axis
                .with_main(ctx.bounds, start + cell.pos, cell.main_axis_size),
            None => self
                .axis
                .with_main(ctx.bounds, start + st.main_axis_full_size, 0.),
        }
    }

    fn composite_state(&self) -> &CompositeState {
        &self.state
    }

    fn for_each_visible(
        &self,
        ctx: &Context,
        reverse: bool,
        f: &mut dyn FnMut(&ElementPtr, usize, Rect) -> bool,
    ) {
        self.sync(&ctx.basic());
        let port = ctx.port_bounds();
        if !ctx.bounds.intersects(port) {
            return;
        }
        let window = self.realize_window(ctx, port);
        if reverse {
            for (ix, bounds, element) in window.iter().rev() {
                if f(element, *ix, *bounds) {
                    break;
                }
            }
        } else {
            for (ix, bounds, element) in window.iter() {
                if f(element, *ix, *bounds) {
                    break;
                }
            }
        }
    }

    fn is_child_selected(&self, ix: usize) -> bool {
        self.inner.lock().cells.get(ix).map_or(false, |cell| cell.selected)
    }

    /// Records the selection in the cell, so cells that are not composed stay that way.
    fn select_child(&self, ix: usize, state: bool) {
        let element = match self.inner.lock().cells.get_mut(ix) {
            Some(cell) => {
                cell.selected = state;
                cell.element.clone()
            }
            None => return,
        };
        if let Some(element) = element {
            if let Some(s) = find_selectable(&*element) {
                s.select(state);
            }
        }
    }

    fn children_want_control(&self) -> bool {
        self.children_want(|e| e.wants_control())
    }

    fn children_want_focus(&self) -> bool {
        self.children_want(|e| e.wants_focus())
    }
}

impl List {
    /// Asks realized cells, or the first cell if none is realized, since cells are usually
    /// alike.
    fn children_want(&self, f: impl Fn(&ElementPtr) -> bool) -> bool {
        let realized: Vec<ElementPtr> = self
            .inner
            .lock()
            .cells
            .iter()
            .filter_map(|cell| cell.element.clone())
            .collect();
        if realized.is_empty() {
            return self.at(0).map_or(false, |e| f(&e));
        }
        realized.iter().any(f)
    }
}

impl_composite! {
    List;

    fn limits(&self, ctx: &BasicContext) -> ViewLimits {
        self.sync(ctx);
        let secondary = self.composer.secondary_axis_limits(ctx);
        let main = self.main_axis_full_size();
        ViewLimits::new(
            self.axis.extent(main, secondary.min),
            self.axis.extent(main, secondary.max),
        )
    }

    fn layout(&self, ctx: &Context) {
        self.sync(&ctx.basic());
        self.handle_relinquish_request(ctx);
        let size = ctx.bounds.size();
        let mut st = self.inner.lock();
        if st.previous_size != Some(size) {
            st.previous_size = Some(size);
            st.layout_id += 1;
        }
    }

    fn draw(&self, ctx: &Context) {
        self.sync(&ctx.basic());
        self.handle_relinquish_request(ctx);

        let clip = ctx.canvas.clip_extent();
        if !ctx.bounds.intersects(clip) {
            return;
        }
        let window = self.realize_window(ctx, clip);
        for (_, bounds, element) in &window {
            element.draw(&ctx.sub(&**element, *bounds));
        }

        if self.recycle {
            let range = match (window.first(), window.last()) {
                (Some(first), Some(last)) => first.0..last.0 + 1,
                _ => 0..0,
            };
            self.recycle_window(range);
        }
        self.inner.lock().previous_size = Some(ctx.bounds.size());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{NullCanvas, RecordingCanvas};
    use crate::composer::{basic_cell_composer, static_cell_composer};
    use crate::element::{same_element, Element};
    use crate::limits::AxisLimits;
    use crate::testing::{test_view, Label};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn labels(len: usize) -> Arc<dyn CellComposer> {
        static_cell_composer(AxisLimits::default(), 20., len, |ix| {
            Arc::new(Label::new(ix)) as ElementPtr
        })
    }

    #[test]
    fn erase_indices_removes_exactly_those() {
        let mut v: Vec<char> = "abcdefg".chars().collect();
        erase_indices(&mut v, &[0, 3, 6]).unwrap();
        assert_eq!(v, vec!['b', 'c', 'e', 'f'], "remaining items keep their order");

        assert_eq!(
            erase_indices(&mut v, &[4]),
            Err(Error::InvalidIndex { index: 4, len: 4 })
        );
        assert_eq!(erase_indices(&mut v, &[2, 1]), Err(Error::UnsortedIndices));
        assert_eq!(v.len(), 4, "a rejected erase leaves the sequence alone");
    }

    #[test]
    fn move_indices_keeps_relative_order() {
        let mut v: Vec<usize> = (0..6).collect();
        move_indices(&mut v, 5, &[1, 2]).unwrap();
        assert_eq!(v, vec![0, 3, 4, 1, 2, 5]);

        move_indices(&mut v, 1, &[3, 4]).unwrap();
        assert_eq!(v, (0..6).collect::<Vec<_>>(), "moving back round-trips");

        let mut v: Vec<usize> = (0..5).collect();
        move_indices(&mut v, 2, &[0]).unwrap();
        assert_eq!(
            v,
            vec![1, 0, 2, 3, 4],
            "item 0 lands just before the item formerly at index 2"
        );

        let mut v: Vec<usize> = (0..5).collect();
        move_indices(&mut v, 5, &[0, 2]).unwrap();
        assert_eq!(v, vec![1, 3, 4, 0, 2], "moving to the end");
    }

    #[test]
    fn requests_commit_together_in_order() {
        let (view, _) = test_view();
        let canvas = NullCanvas::new(view.bounds());
        let composer = labels(5);
        let list = List::new(composer.clone());
        let ctx = Context::new(&view, &canvas, &list, Rect::new(0., 0., 100., 600.));

        list.limits(&ctx.basic());
        assert_eq!(list.len(), 5);
        let originals: Vec<ElementPtr> = (0..5).map(|ix| list.at(ix).unwrap()).collect();

        list.erase(&[4]).unwrap();
        list.insert(0, 1).unwrap();
        list.move_items(0, &[4]).unwrap();
        assert_eq!(list.len(), 5, "nothing changes before the next commit");
        assert!(same_element(&*list.at(4).unwrap(), &*originals[4]));

        list.limits(&ctx.basic());
        assert!(!list.has_pending_changes());
        assert_eq!(list.len(), 5);
        assert_eq!(composer.len(), 5, "composer follows erase and insert");

        // erase 4 -> [0 1 2 3]; insert at 0 -> [_ 0 1 2 3]; move 4 to 0 -> [3 _ 0 1 2]
        let expect = [Some(3), None, Some(0), Some(1), Some(2)];
        for (ix, original) in expect.iter().enumerate() {
            let e = list.at(ix).unwrap();
            match original {
                Some(o) => assert!(
                    same_element(&*e, &*originals[*o]),
                    "cell {} should hold original item {}",
                    ix,
                    o
                ),
                None => assert!(
                    originals.iter().all(|o| !same_element(&*e, &**o)),
                    "cell {} should be newly composed",
                    ix
                ),
            }
        }
    }

    #[test]
    fn invalid_requests_are_rejected() {
        let (view, _) = test_view();
        let canvas = NullCanvas::new(view.bounds());
        let list = List::new(labels(5));
        let ctx = Context::new(&view, &canvas, &list, Rect::new(0., 0., 100., 600.));
        list.limits(&ctx.basic());

        assert_eq!(
            list.erase(&[1, 7]),
            Err(Error::InvalidIndex { index: 7, len: 5 })
        );
        assert_eq!(list.erase(&[3, 3]), Err(Error::UnsortedIndices));
        assert_eq!(
            list.insert(6, 1),
            Err(Error::InvalidIndex { index: 6, len: 5 })
        );

        list.erase(&[0, 1]).unwrap();
        assert_eq!(
            list.move_items(0, &[3]),
            Err(Error::InvalidIndex { index: 3, len: 3 }),
            "moves see the sequence after the pending erase"
        );
        assert!(list.has_pending_changes());
    }

    #[test]
    fn inserted_cells_stack_without_gaps() {
        let (view, _) = test_view();
        let canvas = NullCanvas::new(view.bounds());
        let list = List::new(labels(0));
        let ctx = Context::new(&view, &canvas, &list, Rect::new(0., 0., 100., 600.));

        list.limits(&ctx.basic());
        assert_eq!(list.len(), 0);
        list.insert(0, 3).unwrap();
        list.layout(&ctx);

        assert_eq!(list.len(), 3);
        let first = list.bounds_of(&ctx, 0);
        let second = list.bounds_of(&ctx, 1);
        assert_eq!(second.top, first.bottom, "cell 1 sits directly below cell 0");
        assert_eq!(second.left, first.left);
        assert_eq!(list.main_axis_full_size(), 60.);
    }

    #[test]
    fn only_visible_cells_are_composed() {
        let composed = Arc::new(AtomicUsize::new(0));
        let counter = composed.clone();
        let composer = basic_cell_composer(1000, move |ix| {
            counter.fetch_add(1, Ordering::SeqCst);
            Arc::new(Label::new(ix)) as ElementPtr
        });
        let list = List::new(composer);

        let (view, _) = test_view();
        let top = RecordingCanvas::new(Rect::new(0., 0., 100., 100.));
        let bounds = Rect::new(0., 0., 100., 20_000.);
        let ctx = Context::new(&view, &top, &list, bounds);
        list.draw(&ctx);

        // one element measured by the composer, plus the visible cells
        let visible = list.realized();
        assert!(visible >= 5 && visible <= 6, "{} cells realized", visible);
        assert_eq!(composed.load(Ordering::SeqCst), visible + 1);

        let further = RecordingCanvas::new(Rect::new(0., 1000., 100., 1100.));
        let ctx = Context::new(&view, &further, &list, bounds);
        list.draw(&ctx);
        assert!(
            list.realized() <= 6,
            "cells scrolled out of view are recycled"
        );
        assert!(list.at(0).is_some(), "recycled cells can be composed again");
    }

    #[test]
    fn focus_follows_structural_changes() {
        let (view, _) = test_view();
        let canvas = NullCanvas::new(view.bounds());
        let list = List::new(labels(5));
        let ctx = Context::new(&view, &canvas, &list, Rect::new(0., 0., 100., 600.));
        list.limits(&ctx.basic());

        composite::set_focus(&list, 3);
        list.erase(&[0]).unwrap();
        list.limits(&ctx.basic());
        assert_eq!(list.focus_index(), Some(2), "erasing above the focus shifts it");

        list.erase(&[2]).unwrap();
        list.limits(&ctx.basic());
        assert_eq!(list.focus_index(), None, "erasing the focused cell clears focus");
    }

    #[test]
    fn horizontal_lists_run_left_to_right() {
        let (view, _) = test_view();
        let canvas = NullCanvas::new(view.bounds());
        let list = List::hlist(labels(3));
        let ctx = Context::new(&view, &canvas, &list, Rect::new(10., 0., 600., 50.));
        let limits = list.limits(&ctx.basic());
        assert_eq!(limits.min.x, 60.);
        assert_eq!(list.bounds_of(&ctx, 2), Rect::new(50., 0., 70., 50.));
    }
}
