//! Layout constraints.

use crate::rect::Extent;

/// The largest extent an element can ask for.
pub const FULL_EXTENT: f64 = 1e6;

/// Minimum and maximum size an element accepts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewLimits {
    pub min: Extent,
    pub max: Extent,
}

impl ViewLimits {
    pub fn new(min: Extent, max: Extent) -> ViewLimits {
        ViewLimits { min, max }
    }

    /// Limits that only accept exactly `size`.
    pub fn fixed(size: Extent) -> ViewLimits {
        ViewLimits {
            min: size,
            max: size,
        }
    }

    /// Limits along the horizontal axis.
    pub fn horizontal(&self) -> AxisLimits {
        AxisLimits {
            min: self.min.x,
            max: self.max.x,
        }
    }

    /// Limits along the vertical axis.
    pub fn vertical(&self) -> AxisLimits {
        AxisLimits {
            min: self.min.y,
            max: self.max.y,
        }
    }

    /// Grows both bounds by `amount`, keeping the maximum within [`FULL_EXTENT`].
    pub fn grow(&self, amount: Extent) -> ViewLimits {
        ViewLimits {
            min: self.min + amount,
            max: Extent::new(
                (self.max.x + amount.x).min(FULL_EXTENT),
                (self.max.y + amount.y).min(FULL_EXTENT),
            ),
        }
    }
}

impl Default for ViewLimits {
    fn default() -> Self {
        ViewLimits {
            min: Extent::new(0., 0.),
            max: Extent::new(FULL_EXTENT, FULL_EXTENT),
        }
    }
}

/// Limits along a single axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisLimits {
    pub min: f64,
    pub max: f64,
}

impl Default for AxisLimits {
    fn default() -> Self {
        AxisLimits {
            min: 0.,
            max: FULL_EXTENT,
        }
    }
}
