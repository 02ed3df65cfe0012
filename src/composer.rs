//! Cell composers map list indices to elements and sizes.

use crate::context::BasicContext;
use crate::element::ElementPtr;
use crate::limits::AxisLimits;
use crate::list::Axis;
use core::fmt;
use parking_lot::Mutex;
use std::sync::Arc;

/// The data side of a [`List`](crate::List).
///
/// `len` must always describe the same domain the list's insert, erase and move requests act
/// on. The list resizes the composer itself when it commits inserts and erases.
pub trait CellComposer: Send + Sync {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn resize(&self, len: usize);

    /// Creates the element for the cell at `index`.
    fn compose(&self, index: usize) -> ElementPtr;

    /// Limits across the list.
    fn secondary_axis_limits(&self, ctx: &BasicContext) -> AxisLimits;

    /// Size of the cell at `index` along the list.
    fn main_axis_size(&self, index: usize, ctx: &BasicContext) -> f64;
}

/// How a [`BasicCellComposer`] sizes its cells.
#[derive(Debug)]
pub enum CellLimits {
    /// Every cell has the same, given size.
    Static {
        secondary: AxisLimits,
        main_axis_size: f64,
    },

    /// Every cell has the size of the first element, measured once.
    Derived {
        axis: Axis,
        cache: Mutex<Option<(f64, AxisLimits)>>,
    },
}

impl CellLimits {
    pub fn derived(axis: Axis) -> CellLimits {
        CellLimits::Derived {
            axis,
            cache: Mutex::new(None),
        }
    }
}

/// A composer with a resizable length and a function that composes cells.
pub struct BasicCellComposer<F> {
    len: Mutex<usize>,
    compose: F,
    limits: CellLimits,
}

impl<F> BasicCellComposer<F>
where
    F: Fn(usize) -> ElementPtr + Send + Sync,
{
    pub fn new(len: usize, limits: CellLimits, compose: F) -> BasicCellComposer<F> {
        BasicCellComposer {
            len: Mutex::new(len),
            compose,
            limits,
        }
    }

    fn derived_limits(&self, ctx: &BasicContext) -> (f64, AxisLimits) {
        match &self.limits {
            CellLimits::Static {
                secondary,
                main_axis_size,
            } => (*main_axis_size, *secondary),
            CellLimits::Derived { axis, cache } => {
                if let Some(cached) = *cache.lock() {
                    return cached;
                }
                if self.is_empty() {
                    return (0., AxisLimits::default());
                }
                let limits = (self.compose)(0).limits(ctx);
                let measured = (
                    axis.main(limits.min),
                    AxisLimits {
                        min: axis.cross(limits.min),
                        max: axis.cross(limits.max),
                    },
                );
                *cache.lock() = Some(measured);
                measured
            }
        }
    }
}

impl<F> fmt::Debug for BasicCellComposer<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("BasicCellComposer")
            .field("len", &*self.len.lock())
            .field("limits", &self.limits)
            .finish()
    }
}

impl<F> CellComposer for BasicCellComposer<F>
where
    F: Fn(usize) -> ElementPtr + Send + Sync,
{
    fn len(&self) -> usize {
        *self.len.lock()
    }

    fn resize(&self, len: usize) {
        *self.len.lock() = len;
    }

    fn compose(&self, index: usize) -> ElementPtr {
        (self.compose)(index)
    }

    fn secondary_axis_limits(&self, ctx: &BasicContext) -> AxisLimits {
        self.derived_limits(ctx).1
    }

    fn main_axis_size(&self, _index: usize, ctx: &BasicContext) -> f64 {
        self.derived_limits(ctx).0
    }
}

/// A composer for vertical lists that sizes cells after the first element.
pub fn basic_cell_composer<F>(len: usize, compose: F) -> Arc<BasicCellComposer<F>>
where
    F: Fn(usize) -> ElementPtr + Send + Sync,
{
    Arc::new(BasicCellComposer::new(
        len,
        CellLimits::derived(Axis::Vertical),
        compose,
    ))
}

/// A composer for horizontal lists that sizes cells after the first element.
pub fn basic_hcell_composer<F>(len: usize, compose: F) -> Arc<BasicCellComposer<F>>
where
    F: Fn(usize) -> ElementPtr + Send + Sync,
{
    Arc::new(BasicCellComposer::new(
        len,
        CellLimits::derived(Axis::Horizontal),
        compose,
    ))
}

/// A composer with fixed cell sizes.
pub fn static_cell_composer<F>(
    secondary: AxisLimits,
    main_axis_size: f64,
    len: usize,
    compose: F,
) -> Arc<BasicCellComposer<F>>
where
    F: Fn(usize) -> ElementPtr + Send + Sync,
{
    Arc::new(BasicCellComposer::new(
        len,
        CellLimits::Static {
            secondary,
            main_axis_size,
        },
        compose,
    ))
}
