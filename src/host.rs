//! The platform side of a view.

use crate::rect::Rect;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::trace;

/// Mouse cursor shapes a host can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorType {
    Arrow,
    IBeam,
    CrossHair,
    Hand,
    HResize,
    VResize,
}

impl Default for CursorType {
    fn default() -> Self {
        CursorType::Arrow
    }
}

/// Connects a view to the native backend.
///
/// The host owns the window and the event pump; the view only calls back into it to request
/// repaints and to change platform state.
pub trait Host: Send + Sync {
    /// Requests a repaint of `area`, or of everything if `None`.
    fn refresh(&self, area: Option<Rect>);

    fn set_cursor(&self, cursor: CursorType) {
        let _ = cursor;
    }

    /// Whether the platform scrolls content in the direction of finger movement.
    ///
    /// May be slow to query; [`PlatformState`] caches it.
    fn natural_scroll(&self) -> bool {
        false
    }

    /// Called when no element in the view holds keyboard focus anymore.
    fn relinquish_focus(&self) {}
}

/// A host without a window, which keeps a record of what was asked of it.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    refreshes: AtomicUsize,
    last_area: Mutex<Option<Rect>>,
    cursor: Mutex<CursorType>,
    natural_scroll: AtomicBool,
    focus_relinquished: AtomicBool,
}

impl HeadlessHost {
    pub fn new() -> HeadlessHost {
        HeadlessHost::default()
    }

    /// Number of refresh requests so far.
    pub fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    /// The area of the most recent refresh request; `None` if it covered the whole view.
    pub fn last_refresh_area(&self) -> Option<Rect> {
        *self.last_area.lock()
    }

    pub fn cursor(&self) -> CursorType {
        *self.cursor.lock()
    }

    pub fn set_natural_scroll(&self, natural: bool) {
        self.natural_scroll.store(natural, Ordering::SeqCst);
    }

    pub fn focus_relinquished(&self) -> bool {
        self.focus_relinquished.load(Ordering::SeqCst)
    }
}

impl Host for HeadlessHost {
    fn refresh(&self, area: Option<Rect>) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        *self.last_area.lock() = area;
    }

    fn set_cursor(&self, cursor: CursorType) {
        *self.cursor.lock() = cursor;
    }

    fn natural_scroll(&self) -> bool {
        self.natural_scroll.load(Ordering::SeqCst)
    }

    fn relinquish_focus(&self) {
        self.focus_relinquished.store(true, Ordering::SeqCst);
    }
}

/// Platform state that is expensive to query, cached per view.
#[derive(Debug, Clone, Default)]
pub struct PlatformState {
    natural_scroll: bool,
    last_checked: Option<Instant>,
}

impl PlatformState {
    /// Returns the cached scroll direction, asking the host again once `max_age` has passed.
    pub fn natural_scroll(&mut self, host: &dyn Host, max_age: Duration) -> bool {
        let now = Instant::now();
        let stale = self
            .last_checked
            .map_or(true, |checked| now.duration_since(checked) >= max_age);
        if stale {
            self.natural_scroll = host.natural_scroll();
            self.last_checked = Some(now);
            trace!(natural_scroll = self.natural_scroll, "queried platform scroll direction");
        }
        self.natural_scroll
    }

    /// When the cached state was last refreshed.
    pub fn last_checked(&self) -> Option<Instant> {
        self.last_checked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_state_caches_until_stale() {
        let host = HeadlessHost::new();
        let mut state = PlatformState::default();
        assert_eq!(state.last_checked(), None, "nothing is cached initially");
        assert!(!state.natural_scroll(&host, Duration::from_secs(60)));

        host.set_natural_scroll(true);
        assert!(
            !state.natural_scroll(&host, Duration::from_secs(60)),
            "a fresh cache should not query the host again"
        );
        assert!(
            state.natural_scroll(&host, Duration::from_secs(0)),
            "a zero max age always re-queries"
        );
    }
}
