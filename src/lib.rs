//! # Gapminder-Viz
//!
//! Animated Gapminder-style scatter plot: one circle per country, positioned
//! by income (log x) and life expectancy (linear y), sized by population and
//! colored by continent, stepping through two centuries of yearly data.
//!
//! ## Pipeline
//!
//! - [`data`] loads the JSON dataset into a [`data::Timeline`], dropping
//!   countries with missing income or life expectancy.
//! - [`driver`] owns the wrapping time cursor and ticks it on a fixed period.
//! - [`chart`] reconciles each year's slice against the circles on screen,
//!   keyed by country: enter, update (with a transition), exit.
//! - [`output`] hands [`output::Frame`] snapshots to a [`output::FrameSink`],
//!   for example an SVG file rewritten on every tick.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gapminder_viz::prelude::*;
//!
//! let timeline = load("data/data.json")?;
//! let layout = ChartLayout::default();
//! let renderer = ChartRenderer::new(ChartScales::new(&layout)?, Duration::from_millis(100));
//! let mut driver = FrameDriver::start(timeline, renderer)?;
//!
//! let mut sink = SvgFileSink::new(ChartSvg::new(layout)?, "gapminder.svg");
//! let (_handle, stop) = stop_channel();
//! driver.run(Duration::from_millis(100), &mut sink, stop, None).await?;
//! ```

#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color types and the continent palette.
pub mod color;

/// Scale functions for data-to-visual mappings.
pub mod scale;

/// Error types.
pub mod error;

// ============================================================================
// Animation
// ============================================================================

/// Dataset model and loader.
pub mod data;

/// Chart scales, keyed reconciliation and transitions.
pub mod chart;

/// Time cursor and tick loop.
pub mod driver;

/// Frame snapshots, sinks and SVG encoding.
pub mod output;

/// YAML configuration.
pub mod config;

pub use error::{Error, ErrorKind, Result};

/// Commonly used types.
pub mod prelude {
    pub use crate::chart::{ChartLayout, ChartRenderer, ChartScales, Margin, Reconciliation};
    pub use crate::color::{Rgba, PASTEL1};
    pub use crate::config::Config;
    pub use crate::data::{load, load_with_timeout, CountryRecord, Timeline, YearDataset};
    pub use crate::driver::{stop_channel, FrameCursor, FrameDriver, RunSummary, StopHandle};
    pub use crate::error::{Error, ErrorKind, Result};
    pub use crate::output::{ChartSvg, Frame, FrameSink, SvgFileSink, SvgFrameDirSink};
    pub use crate::scale::{LinearScale, LogScale, OrdinalScale, Scale};
    pub use std::time::Duration;
}
