//! Interaction settings.

use crate::color::Color;
use std::time::Duration;

/// Tunable interaction constants, owned by the [`View`](crate::View).
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Width of the band around a resizable window that grabs its edges.
    pub resize_margin: f64,

    /// How far the pointer must travel before a press counts as a drag.
    pub drag_threshold: f64,

    /// Delay between pressing a selected item and showing its drag image.
    pub drag_image_delay: Duration,

    /// Offset between the stacked boxes of a multi-item drag image.
    pub drag_image_offset: f64,

    /// Upper bound on the number of stacked boxes in a drag image.
    pub max_drag_boxes: usize,

    pub insertion_line_width: f64,

    /// Color of selection highlights, drop outlines and insertion lines.
    pub indicator_color: Color,

    /// How long cached platform state (such as the scroll direction) stays valid.
    pub platform_refresh_interval: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            resize_margin: 5.,
            drag_threshold: 10.,
            drag_image_delay: Duration::from_millis(250),
            drag_image_offset: 10.,
            max_drag_boxes: 20,
            insertion_line_width: 2.,
            indicator_color: Color::rgba(0., 0.5, 1., 0.8),
            platform_refresh_interval: Duration::from_secs(1),
        }
    }
}
