//! Press-drag-release gesture tracking.

use crate::context::Context;
use crate::events::{KeyModifiers, MouseButton};
use crate::rect::{Extent, Point};
use core::fmt;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// State of one gesture.
#[derive(Debug, Clone)]
pub struct TrackerInfo<S> {
    /// Where the button was pressed.
    pub first: Point,
    pub current: Point,
    pub previous: Point,
    pub modifiers: KeyModifiers,

    /// Set by the hooks when they handled the gesture; the initial press is consumed only if
    /// this is set after `begin_tracking`.
    pub processed: bool,

    /// Per-tracker extension state.
    pub ext: S,
}

impl<S> TrackerInfo<S> {
    fn new(btn: MouseButton, ext: S) -> TrackerInfo<S> {
        TrackerInfo {
            first: btn.pos,
            current: btn.pos,
            previous: btn.pos,
            modifiers: btn.modifiers,
            processed: false,
            ext,
        }
    }

    /// Pointer movement since the previous event.
    pub fn movement(&self) -> Extent {
        self.current - self.previous
    }

    /// Distance between the press and the current pointer position.
    pub fn distance(&self) -> f64 {
        let d = self.current - self.first;
        (d.x * d.x + d.y * d.y).sqrt()
    }
}

/// Gesture hooks of an element that uses a [`Tracker`].
pub trait Track<S> {
    fn begin_tracking(&self, ctx: &Context, info: &mut TrackerInfo<S>);

    fn keep_tracking(&self, ctx: &Context, info: &mut TrackerInfo<S>) {
        let _ = (ctx, info);
    }

    fn end_tracking(&self, ctx: &Context, info: &mut TrackerInfo<S>) {
        let _ = (ctx, info);
    }
}

/// Runs a [`Track`] implementation through the click and drag events of one gesture.
///
/// The gesture state is taken out of the tracker while a hook runs, so hooks may freely call
/// back into the element.
pub struct Tracker<S> {
    state: Mutex<Option<TrackerInfo<S>>>,
    active: AtomicBool,
}

impl<S: Default> Tracker<S> {
    pub fn new() -> Tracker<S> {
        Tracker {
            state: Mutex::new(None),
            active: AtomicBool::new(false),
        }
    }

    /// Handles a press or release. Returns true if the event was consumed.
    pub fn click<T: Track<S> + ?Sized>(&self, owner: &T, ctx: &Context, btn: MouseButton) -> bool {
        if btn.down {
            let mut info = TrackerInfo::new(btn, S::default());
            self.active.store(true, Ordering::SeqCst);
            owner.begin_tracking(ctx, &mut info);
            let processed = info.processed;
            if self.active.load(Ordering::SeqCst) {
                *self.state.lock() = Some(info);
            }
            processed
        } else {
            self.release(owner, ctx, btn)
        }
    }
}

impl<S> Tracker<S> {
    fn release<T: Track<S> + ?Sized>(&self, owner: &T, ctx: &Context, btn: MouseButton) -> bool {
        self.active.store(false, Ordering::SeqCst);
        let info = self.state.lock().take();
        match info {
            Some(mut info) => {
                info.previous = info.current;
                info.current = btn.pos;
                info.modifiers = btn.modifiers;
                owner.end_tracking(ctx, &mut info);
                true
            }
            None => false,
        }
    }

    /// Handles pointer movement while the button is held.
    pub fn drag<T: Track<S> + ?Sized>(&self, owner: &T, ctx: &Context, btn: MouseButton) -> bool {
        let info = self.state.lock().take();
        match info {
            Some(mut info) => {
                info.previous = info.current;
                info.current = btn.pos;
                info.modifiers = btn.modifiers;
                owner.keep_tracking(ctx, &mut info);
                // the hook may have cancelled the gesture
                if self.active.load(Ordering::SeqCst) {
                    *self.state.lock() = Some(info);
                }
                true
            }
            None => false,
        }
    }

    /// Calls `f` with the gesture state, unless no gesture is in progress or a hook is running.
    pub fn with_state<R>(&self, f: impl FnOnce(&TrackerInfo<S>) -> R) -> Option<R> {
        self.state.lock().as_ref().map(f)
    }

    pub fn is_tracking(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Abandons the current gesture without calling `end_tracking`.
    ///
    /// Returns the gesture state unless a hook is running.
    pub fn cancel(&self) -> Option<TrackerInfo<S>> {
        self.active.store(false, Ordering::SeqCst);
        self.state.lock().take()
    }
}

impl<S: Default> Default for Tracker<S> {
    fn default() -> Self {
        Tracker::new()
    }
}

impl<S> fmt::Debug for Tracker<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Tracker")
            .field("tracking", &self.is_tracking())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::NullCanvas;
    use crate::element::BoxElement;
    use crate::testing::test_view;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn tracker_follows_a_gesture() {
        struct Counter {
            keeps: AtomicUsize,
            last_movement: Mutex<Extent>,
            total: Mutex<f64>,
        }

        impl Track<usize> for Counter {
            fn begin_tracking(&self, _: &Context, info: &mut TrackerInfo<usize>) {
                info.processed = true;
            }

            fn keep_tracking(&self, _: &Context, info: &mut TrackerInfo<usize>) {
                info.ext += 1;
                self.keeps.fetch_add(1, Ordering::SeqCst);
                *self.last_movement.lock() = info.movement();
            }

            fn end_tracking(&self, _: &Context, info: &mut TrackerInfo<usize>) {
                assert_eq!(info.ext, 2, "extension state survives between events");
                *self.total.lock() = info.distance();
            }
        }

        let (view, _) = test_view();
        let canvas = NullCanvas::new(view.bounds());
        let leaf = BoxElement::new(Default::default());
        let ctx = Context::new(&view, &canvas, &leaf, view.bounds());

        let counter = Counter {
            keeps: AtomicUsize::new(0),
            last_movement: Mutex::new(Extent::new(0., 0.)),
            total: Mutex::new(0.),
        };
        let tracker = Tracker::<usize>::new();
        assert!(!tracker.drag(&counter, &ctx, MouseButton::press(Point::new(1., 1.))), "no gesture yet");

        assert!(tracker.click(&counter, &ctx, MouseButton::press(Point::new(0., 0.))));
        assert!(tracker.is_tracking());
        tracker.drag(&counter, &ctx, MouseButton::press(Point::new(3., 0.)));
        tracker.drag(&counter, &ctx, MouseButton::press(Point::new(3., 4.)));
        assert_eq!(*counter.last_movement.lock(), Extent::new(0., 4.));

        assert!(tracker.click(&counter, &ctx, MouseButton::release(Point::new(3., 4.))));
        assert!(!tracker.is_tracking(), "release ends the gesture");
        assert_eq!(counter.keeps.load(Ordering::SeqCst), 2);
        assert_eq!(*counter.total.lock(), 5.);
    }

    #[derive(Debug)]
    struct Grip(u8);

    #[test]
    fn trackers_without_default_state_can_be_inspected() {
        let tracker = Tracker::<Grip> {
            state: Mutex::new(None),
            active: AtomicBool::new(false),
        };
        assert_eq!(format!("{:?}", tracker), "Tracker { tracking: false }");
        assert!(tracker.with_state(|info| info.ext.0).is_none());
        assert!(tracker.cancel().is_none());
    }
}
