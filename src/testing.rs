//! Fixtures shared by the unit tests.

use crate::context::{BasicContext, Context};
use crate::element::{Element, FocusRequest, Selectable};
use crate::events::{CursorTracking, KeyInfo, MouseButton};
use crate::host::HeadlessHost;
use crate::limits::ViewLimits;
use crate::rect::{Extent, Rect};
use crate::settings::Settings;
use crate::view::View;
use core::any::Any;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// An 800×600 view with a headless host.
pub(crate) fn test_view() -> (View, Arc<HeadlessHost>) {
    test_view_with(Settings::default())
}

pub(crate) fn test_view_with(settings: Settings) -> (View, Arc<HeadlessHost>) {
    let host = Arc::new(HeadlessHost::new());
    let view = View::with_settings(host.clone(), Rect::new(0., 0., 800., 600.), settings);
    (view, host)
}

/// Orders focus events across all probes.
static FOCUS_EVENTS: AtomicUsize = AtomicUsize::new(0);

/// A control that records what happens to it.
#[derive(Debug, Default)]
pub(crate) struct Probe {
    focusable: bool,
    size: Option<Extent>,
    presses: AtomicUsize,
    releases: AtomicUsize,
    drags: AtomicUsize,
    focused: AtomicBool,
    refuse: AtomicBool,
    last_focus_event: AtomicUsize,
    cursor_events: Mutex<Vec<CursorTracking>>,
}

impl Probe {
    pub(crate) fn focusable() -> Probe {
        Probe {
            focusable: true,
            ..Probe::default()
        }
    }

    /// A control that does not take focus.
    pub(crate) fn control() -> Probe {
        Probe::default()
    }

    pub(crate) fn sized(mut self, width: f64, height: f64) -> Probe {
        self.size = Some(Extent::new(width, height));
        self
    }

    pub(crate) fn presses(&self) -> usize {
        self.presses.load(Ordering::SeqCst)
    }

    pub(crate) fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    pub(crate) fn drags(&self) -> usize {
        self.drags.load(Ordering::SeqCst)
    }

    pub(crate) fn has_focus(&self) -> bool {
        self.focused.load(Ordering::SeqCst)
    }

    /// Sequence number of the last focus event this probe saw.
    pub(crate) fn last_focus_event_order(&self) -> usize {
        self.last_focus_event.load(Ordering::SeqCst)
    }

    /// Makes the probe keep its focus when asked to give it up.
    pub(crate) fn refuse_to_yield(&self, refuse: bool) {
        self.refuse.store(refuse, Ordering::SeqCst);
    }

    pub(crate) fn cursor_events(&self) -> Vec<CursorTracking> {
        self.cursor_events.lock().clone()
    }

    fn focus_event(&self) {
        let order = FOCUS_EVENTS.fetch_add(1, Ordering::SeqCst) + 1;
        self.last_focus_event.store(order, Ordering::SeqCst);
    }
}

impl Element for Probe {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn limits(&self, _: &BasicContext) -> ViewLimits {
        match self.size {
            Some(size) => ViewLimits::fixed(size),
            None => ViewLimits::default(),
        }
    }

    fn click(&self, _: &Context, btn: MouseButton) -> bool {
        if btn.down {
            self.presses.fetch_add(1, Ordering::SeqCst);
        } else {
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
        true
    }

    fn drag(&self, _: &Context, _: MouseButton) -> bool {
        self.drags.fetch_add(1, Ordering::SeqCst);
        true
    }

    fn key(&self, _: &Context, _: KeyInfo) -> bool {
        false
    }

    fn cursor(&self, _: &Context, _: crate::rect::Point, status: CursorTracking) -> bool {
        self.cursor_events.lock().push(status);
        true
    }

    fn wants_control(&self) -> bool {
        true
    }

    fn wants_focus(&self) -> bool {
        self.focusable
    }

    fn begin_focus(&self, _: FocusRequest) {
        self.focus_event();
        self.focused.store(true, Ordering::SeqCst);
    }

    fn end_focus(&self) -> bool {
        if self.refuse.load(Ordering::SeqCst) {
            return false;
        }
        self.focus_event();
        self.focused.store(false, Ordering::SeqCst);
        true
    }
}

/// A 20 pixel high, selectable list item that remembers where it was composed.
#[derive(Debug)]
pub(crate) struct Label {
    index: usize,
    selected: AtomicBool,
}

impl Label {
    pub(crate) fn new(index: usize) -> Label {
        Label {
            index,
            selected: AtomicBool::new(false),
        }
    }

    pub(crate) fn index(&self) -> usize {
        self.index
    }
}

impl Selectable for Label {
    fn is_selected(&self) -> bool {
        self.selected.load(Ordering::SeqCst)
    }

    fn select(&self, state: bool) {
        self.selected.store(state, Ordering::SeqCst);
    }
}

impl Element for Label {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_selectable(&self) -> Option<&dyn Selectable> {
        Some(self)
    }

    fn limits(&self, _: &BasicContext) -> ViewLimits {
        let mut limits = ViewLimits::default();
        limits.min.y = 20.;
        limits.max.y = 20.;
        limits
    }
}
