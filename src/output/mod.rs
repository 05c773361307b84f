//! Display boundary: frame snapshots, sinks, and SVG encoding.

mod chart_svg;
mod sink;
mod svg;

pub use chart_svg::{format_dollars, ChartSvg, X_TICK_VALUES};
pub use sink::{FrameSink, SvgFileSink, SvgFrameDirSink};
pub use svg::{CircleAnimation, SvgDocument, SvgElement, TextAnchor, TextStyle};

use std::time::Duration;

use crate::chart::CircleAttrs;
use crate::color::Rgba;

/// One circle as handed to the display: `(key, cx, cy, r, fill)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleFrame {
    /// Country identifier.
    pub key: String,
    /// Center x in plot-area pixels.
    pub cx: f64,
    /// Center y in plot-area pixels.
    pub cy: f64,
    /// Radius in pixels.
    pub r: f64,
    /// Fill color.
    pub fill: Rgba,
    /// Where the circle moves from, when it is transitioning this frame.
    pub from: Option<CircleAttrs>,
}

/// Everything on screen after one render.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    /// Calendar year label.
    pub time_label: String,
    /// Duration of this frame's transitions.
    pub transition_duration: Duration,
    /// Circles in draw order.
    pub circles: Vec<CircleFrame>,
}

impl Frame {
    /// Circle for `key`, if present.
    #[must_use]
    pub fn circle(&self, key: &str) -> Option<&CircleFrame> {
        self.circles.iter().find(|c| c.key == key)
    }
}
