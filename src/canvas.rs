//! The drawing surface elements paint onto.

use crate::color::Color;
use crate::rect::{Point, Rect};
use parking_lot::Mutex;

/// Drawing primitives consumed by elements.
///
/// Methods take `&self` because a canvas is shared by every context of a traversal; backends
/// keep their own interior state.
pub trait Canvas: Send + Sync {
    /// The region that will actually be painted.
    fn clip_extent(&self) -> Rect;

    fn fill_rect(&self, rect: Rect, color: Color);

    fn fill_round_rect(&self, rect: Rect, radius: f64, color: Color);

    fn stroke_rect(&self, rect: Rect, line_width: f64, color: Color);

    fn line(&self, from: Point, to: Point, line_width: f64, color: Color);
}

/// A canvas that paints nothing, used for event dispatch.
#[derive(Debug, Clone, Copy)]
pub struct NullCanvas {
    clip: Rect,
}

impl NullCanvas {
    pub fn new(clip: Rect) -> NullCanvas {
        NullCanvas { clip }
    }
}

impl Canvas for NullCanvas {
    fn clip_extent(&self) -> Rect {
        self.clip
    }
    fn fill_rect(&self, _: Rect, _: Color) {}
    fn fill_round_rect(&self, _: Rect, _: f64, _: Color) {}
    fn stroke_rect(&self, _: Rect, _: f64, _: Color) {}
    fn line(&self, _: Point, _: Point, _: f64, _: Color) {}
}

/// A single recorded drawing operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    FillRect(Rect, Color),
    FillRoundRect(Rect, f64, Color),
    StrokeRect(Rect, f64, Color),
    Line(Point, Point, f64, Color),
}

/// A canvas that records every operation, for backends that replay them and for tests.
#[derive(Debug)]
pub struct RecordingCanvas {
    clip: Rect,
    commands: Mutex<Vec<DrawCommand>>,
}

impl RecordingCanvas {
    pub fn new(clip: Rect) -> RecordingCanvas {
        RecordingCanvas {
            clip,
            commands: Mutex::new(Vec::new()),
        }
    }

    /// Returns the recorded commands, leaving the canvas empty.
    pub fn take(&self) -> Vec<DrawCommand> {
        std::mem::take(&mut *self.commands.lock())
    }

    pub fn commands(&self) -> Vec<DrawCommand> {
        self.commands.lock().clone()
    }
}

impl Canvas for RecordingCanvas {
    fn clip_extent(&self) -> Rect {
        self.clip
    }

    fn fill_rect(&self, rect: Rect, color: Color) {
        self.commands.lock().push(DrawCommand::FillRect(rect, color));
    }

    fn fill_round_rect(&self, rect: Rect, radius: f64, color: Color) {
        self.commands
            .lock()
            .push(DrawCommand::FillRoundRect(rect, radius, color));
    }

    fn stroke_rect(&self, rect: Rect, line_width: f64, color: Color) {
        self.commands
            .lock()
            .push(DrawCommand::StrokeRect(rect, line_width, color));
    }

    fn line(&self, from: Point, to: Point, line_width: f64, color: Color) {
        self.commands
            .lock()
            .push(DrawCommand::Line(from, to, line_width, color));
    }
}
