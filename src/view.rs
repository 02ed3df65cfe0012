//! The view: root of the element tree and the boundary to the host.

use crate::canvas::{Canvas, NullCanvas};
use crate::context::Context;
use crate::element::{Element, ElementPtr};
use crate::events::{CursorTracking, DropInfo, KeyInfo, MouseButton, TextInfo};
use crate::host::{CursorType, Host, PlatformState};
use crate::layer::Layer;
use crate::rect::{Extent, Point, Rect};
use crate::settings::Settings;
use crossbeam::channel::{self, Receiver, Sender, TryRecvError};
use core::fmt;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

type TaskFn = Box<dyn FnOnce(&View) + Send>;

struct Task {
    deadline: Option<Instant>,
    f: TaskFn,
}

/// Hosts a stack of layers and dispatches host events into them.
///
/// Every event entry point builds a fresh root [`Context`] over the view bounds and hands it to
/// the layers, front-most first. Layers are added with [`View::add`]; windows, popups and drag
/// images are all just layers.
///
/// Work that must not run in the middle of a dispatch is posted with [`View::post`] and runs on
/// the next [`View::poll`].
pub struct View {
    host: Arc<dyn Host>,
    settings: Settings,
    content: Arc<Layer>,
    bounds: Mutex<Rect>,
    cursor_pos: Mutex<Point>,
    task_send: Sender<Task>,
    task_recv: Receiver<Task>,
    delayed: Mutex<Vec<Task>>,
    platform: Mutex<PlatformState>,
}

impl View {
    pub fn new(host: Arc<dyn Host>, bounds: Rect) -> View {
        View::with_settings(host, bounds, Settings::default())
    }

    pub fn with_settings(host: Arc<dyn Host>, bounds: Rect, settings: Settings) -> View {
        let (task_send, task_recv) = channel::unbounded();
        View {
            host,
            settings,
            content: Arc::new(Layer::default()),
            bounds: Mutex::new(bounds),
            cursor_pos: Mutex::new(Point::new(0., 0.)),
            task_send,
            task_recv,
            delayed: Mutex::new(Vec::new()),
            platform: Mutex::new(PlatformState::default()),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn host(&self) -> &Arc<dyn Host> {
        &self.host
    }

    pub fn bounds(&self) -> Rect {
        *self.bounds.lock()
    }

    /// Resizes the view. Layers are laid out again on the next [`View::layout`].
    pub fn set_bounds(&self, bounds: Rect) {
        *self.bounds.lock() = bounds;
        self.refresh();
    }

    /// Last pointer position reported through [`View::cursor`].
    pub fn cursor_pos(&self) -> Point {
        *self.cursor_pos.lock()
    }

    /// Asks the host to repaint the whole view.
    pub fn refresh(&self) {
        trace!("refresh view");
        self.host.refresh(None);
    }

    pub fn refresh_area(&self, area: Rect) {
        trace!(?area, "refresh area");
        self.host.refresh(Some(area));
    }

    pub fn refresh_context(&self, ctx: &Context) {
        self.refresh_area(ctx.bounds);
    }

    /// Tells the host that no element holds the keyboard focus anymore.
    pub fn relinquish_focus(&self) {
        debug!("view relinquished focus");
        self.host.relinquish_focus();
    }

    pub fn set_cursor(&self, cursor: CursorType) {
        self.host.set_cursor(cursor);
    }

    /// Whether scroll deltas follow the content, as reported by the host.
    ///
    /// The answer is cached for [`Settings::platform_refresh_interval`].
    pub fn natural_scroll(&self) -> bool {
        self.platform
            .lock()
            .natural_scroll(&*self.host, self.settings.platform_refresh_interval)
    }

    /// Runs `f` on the next [`View::poll`].
    pub fn post(&self, f: impl FnOnce(&View) + Send + 'static) {
        self.send_task(None, Box::new(f));
    }

    /// Runs `f` on the first [`View::poll`] after `delay` has passed.
    pub fn post_after(&self, delay: Duration, f: impl FnOnce(&View) + Send + 'static) {
        self.send_task(Some(Instant::now() + delay), Box::new(f));
    }

    fn send_task(&self, deadline: Option<Instant>, f: TaskFn) {
        trace!(?deadline, "task posted");
        // the view owns the receiver, so the channel cannot be disconnected here
        let _ = self.task_send.send(Task { deadline, f });
    }

    /// Runs every posted task that is due. Returns how many ran.
    ///
    /// Tasks posted while polling run on the next poll.
    pub fn poll(&self) -> usize {
        let now = Instant::now();
        let mut due = Vec::new();
        loop {
            match self.task_recv.try_recv() {
                Ok(task) => match task.deadline {
                    Some(deadline) if deadline > now => self.delayed.lock().push(task),
                    _ => due.push(task),
                },
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        {
            let mut delayed = self.delayed.lock();
            let (mut ready, later): (Vec<_>, Vec<_>) = delayed
                .drain(..)
                .partition(|task| task.deadline.map_or(true, |d| d <= now));
            *delayed = later;
            ready.sort_by_key(|task| task.deadline);
            due.extend(ready);
        }

        let count = due.len();
        for task in due {
            (task.f)(self);
        }
        if count > 0 {
            trace!(count, "ran posted tasks");
        }
        count
    }

    /// The root layer stack.
    pub fn content(&self) -> &Arc<Layer> {
        &self.content
    }

    /// A copy of the layers, back to front.
    pub fn layers(&self) -> Vec<ElementPtr> {
        self.content.layers()
    }

    /// Adds `e` in front of all layers.
    ///
    /// Gestures in progress keep going to the layer they started on.
    pub fn add(&self, e: ElementPtr) {
        self.content.push(e);
    }

    /// Removes the layer `e`. Returns false if it is not a layer of this view.
    pub fn remove(&self, e: &dyn Element) -> bool {
        self.content.remove(e)
    }

    /// Brings the layer `e` to the front. Returns false if it is not a layer of this view.
    pub fn move_to_front(&self, e: &dyn Element) -> bool {
        self.content.move_to_front(e)
    }

    /// Calls `f` with the layer stack and a root context over the view bounds.
    fn dispatch<R>(&self, f: impl FnOnce(&Layer, &Context) -> R) -> R {
        let content = self.content.clone();
        let bounds = self.bounds();
        let canvas = NullCanvas::new(bounds);
        let ctx = Context::new(self, &canvas, &*content, bounds);
        f(&content, &ctx)
    }

    pub fn draw(&self, canvas: &dyn Canvas) {
        let content = self.content.clone();
        let ctx = Context::new(self, canvas, &*content, self.bounds());
        content.draw(&ctx);
    }

    pub fn layout(&self) {
        self.dispatch(|content, ctx| content.layout(ctx));
    }

    pub fn click(&self, btn: MouseButton) -> bool {
        self.dispatch(|content, ctx| content.click(ctx, btn))
    }

    pub fn drag(&self, btn: MouseButton) -> bool {
        self.dispatch(|content, ctx| content.drag(ctx, btn))
    }

    pub fn key(&self, k: KeyInfo) -> bool {
        self.dispatch(|content, ctx| content.key(ctx, k))
    }

    pub fn text(&self, info: TextInfo) -> bool {
        self.dispatch(|content, ctx| content.text(ctx, info))
    }

    pub fn cursor(&self, p: Point, status: CursorTracking) -> bool {
        *self.cursor_pos.lock() = p;
        self.dispatch(|content, ctx| content.cursor(ctx, p, status))
    }

    pub fn scroll(&self, dir: Extent, p: Point) -> bool {
        self.dispatch(|content, ctx| content.scroll(ctx, dir, p))
    }

    pub fn track_drop(&self, info: &DropInfo, status: CursorTracking) -> bool {
        self.dispatch(|content, ctx| content.track_drop(ctx, info, status))
    }

    /// Delivers dropped data to the layer it was last tracked over.
    pub fn drop(&self, info: &DropInfo) -> bool {
        self.dispatch(|content, ctx| content.accept_drop(ctx, info))
    }
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("View")
            .field("bounds", &self.bounds())
            .field("settings", &self.settings)
            .field("content", &self.content)
            .field("delayed_tasks", &self.delayed.lock().len())
            .finish()
    }
}
