use crate::composite::{hit_element, Composite};
use crate::context::Context;
use crate::element::{Element, ElementPtr};
use crate::events::{KeyCode, KeyInfo, KeyModifiers, MouseButton};
use crate::traversal::{find_composite_in, with_composite};
use core::any::Any;
use core::fmt;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::trace;

/// Called with the selection anchors whenever the user changes the selection.
pub type OnSelect = Arc<dyn Fn(Option<usize>, Option<usize>) + Send + Sync>;

#[derive(Debug, Clone, Copy, Default)]
struct Anchors {
    start: Option<usize>,
    end: Option<usize>,
}

/// Manages the selection of the [`Selectable`](crate::Selectable) items of a composite subject.
///
/// Supports click selection, shift-click to extend, action-click (command on macOS, control
/// elsewhere) to toggle, and Up/Down navigation with shift to extend. The subject is expected to
/// contain a composite; without one, the selection list does nothing.
///
/// The selection itself lives in the items. The list only keeps the anchors of the last range
/// selection.
pub struct SelectionList {
    subject: ElementPtr,
    multi_select: bool,
    anchors: Mutex<Anchors>,
    on_select: Option<OnSelect>,
}

impl SelectionList {
    pub fn new(subject: ElementPtr, multi_select: bool) -> SelectionList {
        SelectionList {
            subject,
            multi_select,
            anchors: Mutex::new(Anchors::default()),
            on_select: None,
        }
    }

    pub fn on_select(mut self, f: impl Fn(Option<usize>, Option<usize>) + Send + Sync + 'static) -> Self {
        self.on_select = Some(Arc::new(f));
        self
    }

    pub fn is_multi_select(&self) -> bool {
        self.multi_select
    }

    fn composite(&self) -> Option<&dyn Composite> {
        find_composite_in(&*self.subject)
    }

    fn set_selected(c: &dyn Composite, ix: usize, state: bool) {
        c.select_child(ix, state);
    }

    fn is_selected(c: &dyn Composite, ix: usize) -> bool {
        c.is_child_selected(ix)
    }

    /// Indices of the selected items, in ascending order.
    pub fn get_selection(&self) -> Vec<usize> {
        match self.composite() {
            Some(c) => (0..c.len()).filter(|&ix| Self::is_selected(c, ix)).collect(),
            None => Vec::new(),
        }
    }

    /// Selects exactly the items at `selection`.
    pub fn set_selection(&self, selection: &[usize]) {
        if let Some(c) = self.composite() {
            for ix in 0..c.len() {
                Self::set_selected(c, ix, selection.contains(&ix));
            }
        }
        let mut anchors = self.anchors.lock();
        anchors.start = selection.first().copied();
        anchors.end = selection.last().copied();
    }

    /// Sets the anchors of the current range selection, without touching the items.
    pub fn update_selection(&self, start: usize, end: usize) {
        *self.anchors.lock() = Anchors {
            start: Some(start),
            end: Some(end),
        };
    }

    pub fn get_select_start(&self) -> Option<usize> {
        self.anchors.lock().start
    }

    pub fn get_select_end(&self) -> Option<usize> {
        self.anchors.lock().end
    }

    pub fn select_all(&self) {
        if let Some(c) = self.composite() {
            let len = c.len();
            for ix in 0..len {
                Self::set_selected(c, ix, true);
            }
            let mut anchors = self.anchors.lock();
            anchors.start = if len > 0 { Some(0) } else { None };
            anchors.end = len.checked_sub(1);
        }
    }

    pub fn select_none(&self) {
        if let Some(c) = self.composite() {
            for ix in 0..c.len() {
                Self::set_selected(c, ix, false);
            }
        }
        *self.anchors.lock() = Anchors::default();
    }

    /// Selects the range between the start anchor and `end`, and nothing else.
    fn select_range(&self, c: &dyn Composite, end: usize) {
        let start = self.anchors.lock().start.unwrap_or(end);
        let (lo, hi) = (start.min(end), start.max(end));
        for ix in 0..c.len() {
            Self::set_selected(c, ix, ix >= lo && ix <= hi);
        }
        *self.anchors.lock() = Anchors {
            start: Some(start),
            end: Some(end),
        };
    }

    fn select_only(&self, c: &dyn Composite, ix: usize) {
        for i in 0..c.len() {
            Self::set_selected(c, i, i == ix);
        }
        self.update_selection(ix, ix);
    }

    /// Applies a click on the item at `ix`. Returns true if anything changed.
    fn click_item(&self, c: &dyn Composite, ix: usize, modifiers: KeyModifiers) -> bool {
        if self.multi_select && modifiers.shift {
            self.select_range(c, ix);
        } else if self.multi_select && modifiers.action() {
            Self::set_selected(c, ix, !Self::is_selected(c, ix));
            self.update_selection(ix, ix);
        } else if !Self::is_selected(c, ix) {
            // clicking a selected item keeps the selection, so several items can be dragged
            self.select_only(c, ix);
        } else {
            self.update_selection(ix, ix);
            return false;
        }
        true
    }

    fn notify(&self) {
        let anchors = *self.anchors.lock();
        trace!(start = ?anchors.start, end = ?anchors.end, "selection changed");
        if let Some(f) = &self.on_select {
            f(anchors.start, anchors.end);
        }
    }

    fn key_item(&self, c: &dyn Composite, k: KeyInfo) -> bool {
        let len = c.len();
        if len == 0 {
            return false;
        }
        match k.code {
            KeyCode::A if k.modifiers.action() && self.multi_select => {
                self.select_all();
                true
            }
            KeyCode::UpArrow | KeyCode::DownArrow => {
                let end = self.anchors.lock().end;
                let next = match (k.code, end) {
                    (KeyCode::UpArrow, Some(end)) => end.saturating_sub(1),
                    (KeyCode::UpArrow, None) => len - 1,
                    (_, Some(end)) => (end + 1).min(len - 1),
                    (_, None) => 0,
                };
                if self.multi_select && k.modifiers.shift {
                    self.select_range(c, next);
                } else {
                    self.select_only(c, next);
                }
                true
            }
            _ => false,
        }
    }
}

impl fmt::Debug for SelectionList {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SelectionList")
            .field("subject", &self.subject)
            .field("multi_select", &self.multi_select)
            .field("anchors", &*self.anchors.lock())
            .finish()
    }
}

impl Element for SelectionList {
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

    fn click(&self, ctx: &Context, btn: MouseButton) -> bool {
        let mut changed = false;
        if btn.down {
            with_composite(ctx, &mut |c, cctx| {
                if let Some(hit) = hit_element(c, cctx, btn.pos, false) {
                    changed = self.click_item(c, hit.index, btn.modifiers);
                }
            });
            if changed {
                self.notify();
                ctx.refresh();
            }
        }
        let sctx = ctx.sub(&*self.subject, ctx.bounds);
        self.subject.click(&sctx, btn) || changed
    }

    fn key(&self, ctx: &Context, k: KeyInfo) -> bool {
        let sctx = ctx.sub(&*self.subject, ctx.bounds);
        if self.subject.key(&sctx, k) {
            return true;
        }
        if !k.is_down() {
            return false;
        }
        let handled = match self.composite() {
            Some(c) => self.key_item(c, k),
            None => false,
        };
        if handled {
            self.notify();
            ctx.refresh();
        }
        handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::NullCanvas;
    use crate::composer::static_cell_composer;
    use crate::limits::AxisLimits;
    use crate::list::List;
    use crate::rect::{Point, Rect};
    use crate::testing::{test_view, Label};
    use crate::traversal::find_selectable;

    fn labels(len: usize) -> ElementPtr {
        Arc::new(List::new(static_cell_composer(
            AxisLimits::default(),
            20.,
            len,
            |ix| Arc::new(Label::new(ix)) as ElementPtr,
        )))
    }

    fn at(ix: usize) -> Point {
        Point::new(10., ix as f64 * 20. + 10.)
    }

    #[test]
    fn click_shift_and_toggle() {
        let (view, _) = test_view();
        let canvas = NullCanvas::new(view.bounds());
        let calls = Arc::new(Mutex::new(Vec::new()));
        let record = calls.clone();
        let sel = SelectionList::new(labels(6), true)
            .on_select(move |start, end| record.lock().push((start, end)));
        let ctx = Context::new(&view, &canvas, &sel, Rect::new(0., 0., 100., 120.));
        sel.layout(&ctx);

        assert!(sel.click(&ctx, MouseButton::press(at(2))));
        assert_eq!(sel.get_selection(), vec![2]);

        sel.click(
            &ctx,
            MouseButton::press(at(4)).with_modifiers(KeyModifiers::SHIFT),
        );
        assert_eq!(sel.get_selection(), vec![2, 3, 4], "shift extends from the anchor");
        assert_eq!(sel.get_select_start(), Some(2));
        assert_eq!(sel.get_select_end(), Some(4));

        let toggle = KeyModifiers {
            command: true,
            control: true,
            ..KeyModifiers::default()
        };
        sel.click(&ctx, MouseButton::press(at(3)).with_modifiers(toggle));
        assert_eq!(sel.get_selection(), vec![2, 4], "action-click toggles");

        sel.click(&ctx, MouseButton::press(at(4)));
        assert_eq!(
            sel.get_selection(),
            vec![2, 4],
            "clicking a selected item keeps the selection"
        );

        sel.click(&ctx, MouseButton::press(at(0)));
        assert_eq!(sel.get_selection(), vec![0]);
        assert_eq!(calls.lock().last(), Some(&(Some(0), Some(0))));
        assert_eq!(calls.lock().len(), 4, "unchanged selections are not reported");
    }

    #[test]
    fn arrow_keys_move_and_extend() {
        let (view, _) = test_view();
        let canvas = NullCanvas::new(view.bounds());
        let sel = SelectionList::new(labels(4), true);
        let ctx = Context::new(&view, &canvas, &sel, Rect::new(0., 0., 100., 80.));
        sel.layout(&ctx);

        assert!(sel.key(&ctx, KeyInfo::press(KeyCode::DownArrow)));
        assert_eq!(sel.get_selection(), vec![0], "first Down selects the first item");
        sel.key(&ctx, KeyInfo::press(KeyCode::DownArrow));
        sel.key(
            &ctx,
            KeyInfo::press(KeyCode::DownArrow).with_modifiers(KeyModifiers::SHIFT),
        );
        assert_eq!(sel.get_selection(), vec![1, 2]);
        sel.key(&ctx, KeyInfo::press(KeyCode::DownArrow));
        sel.key(&ctx, KeyInfo::press(KeyCode::DownArrow));
        assert_eq!(sel.get_selection(), vec![3], "Down stops at the last item");

        sel.key(
            &ctx,
            KeyInfo::press(KeyCode::A).with_modifiers(KeyModifiers::COMMAND),
        );
        assert_eq!(sel.get_selection(), vec![0, 1, 2, 3]);
        sel.select_none();
        assert!(sel.get_selection().is_empty());
        assert_eq!(sel.get_select_end(), None);
    }

    #[test]
    fn single_selection_ignores_modifiers() {
        let (view, _) = test_view();
        let canvas = NullCanvas::new(view.bounds());
        let sel = SelectionList::new(labels(4), false);
        let ctx = Context::new(&view, &canvas, &sel, Rect::new(0., 0., 100., 80.));
        sel.layout(&ctx);

        sel.click(&ctx, MouseButton::press(at(1)));
        sel.click(
            &ctx,
            MouseButton::press(at(3)).with_modifiers(KeyModifiers::SHIFT),
        );
        assert_eq!(sel.get_selection(), vec![3]);
    }

    #[test]
    fn selecting_everything_composes_nothing_new() {
        let (view, _) = test_view();
        let list = Arc::new(List::new(static_cell_composer(
            AxisLimits::default(),
            20.,
            1000,
            |ix| Arc::new(Label::new(ix)) as ElementPtr,
        )));
        let sel = SelectionList::new(list.clone(), true);
        let bounds = Rect::new(0., 0., 100., 20_000.);
        let top = NullCanvas::new(Rect::new(0., 0., 100., 100.));
        let ctx = Context::new(&view, &top, &sel, bounds);
        sel.layout(&ctx);
        sel.draw(&ctx);
        let visible = list.realized();
        assert!(visible <= 6, "{} cells realized", visible);

        sel.select_all();
        assert_eq!(sel.get_selection().len(), 1000);
        assert_eq!(list.realized(), visible, "only the visible cells hold elements");

        let further = NullCanvas::new(Rect::new(0., 1000., 100., 1100.));
        let ctx = Context::new(&view, &further, &sel, bounds);
        sel.draw(&ctx);
        let selected = list
            .at(52)
            .and_then(|e| find_selectable(&*e).map(|s| s.is_selected()));
        assert_eq!(selected, Some(true), "cells composed later come up selected");
    }
}
