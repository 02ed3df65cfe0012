//! A retained-mode element toolkit core.
//!
//! Elements form a tree of shared [`ElementPtr`]s. Composites own indexed children and route
//! events to them; proxies wrap a single subject. A [`View`] holds a stack of layers and turns
//! host events into traversals, each of which carries a [`Context`] chain from the root down to
//! the element being visited.

#[macro_use]
pub mod composite;
pub mod canvas;
pub mod child_window;
pub mod color;
pub mod composer;
mod context;
pub mod drag_and_drop;
pub mod element;
mod error;
pub mod events;
mod floating;
mod host;
mod layer;
pub mod limits;
pub mod list;
pub mod proxy;
mod rect;
pub mod selection;
mod settings;
pub mod tile;
pub mod tracker;
pub mod traversal;
mod view;

#[cfg(test)]
mod testing;

pub use canvas::{Canvas, NullCanvas, RecordingCanvas};
pub use child_window::{ChildWindow, Closable, Movable, Resizable};
pub use composite::{Composite, CompositeState};
pub use context::{Ancestors, BasicContext, Context};
pub use drag_and_drop::{DropBox, DropInserter, Draggable};
pub use element::{BoxElement, Element, ElementPtr, FocusRequest, Hit, Selectable};
pub use error::{Error, Result};
pub use floating::Floating;
pub use host::{CursorType, HeadlessHost, Host, PlatformState};
pub use layer::Layer;
pub use limits::ViewLimits;
pub use list::{Axis, List};
pub use rect::{Extent, Point, Rect};
pub use selection::SelectionList;
pub use settings::Settings;
pub use tile::Tile;
pub use view::View;
