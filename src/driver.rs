//! Frame driver: owns the time cursor and advances it on a fixed cadence.
//!
//! The driver paints `Timeline[0]` when it starts, so the display is never
//! blank while waiting for the first period to elapse. Each tick advances the
//! cursor by one year (wrapping from the last year back to the first) and
//! renders that year's slice.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::chart::{ChartRenderer, Reconciliation};
use crate::data::{Timeline, YearDataset};
use crate::error::{Error, Result};
use crate::output::{Frame, FrameSink};

/// Wrapping cursor over the timeline indices `0..len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCursor {
    index: usize,
    len: usize,
}

impl FrameCursor {
    /// Create a cursor at index 0.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTimeline`] if `len` is 0.
    pub fn new(len: usize) -> Result<Self> {
        if len == 0 {
            return Err(Error::EmptyTimeline);
        }
        Ok(Self { index: 0, len })
    }

    /// Current index.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of indices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; a cursor cannot be built over nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Step to the next index, wrapping past the last one to 0.
    pub fn advance(&mut self) -> usize {
        self.index = if self.index + 1 < self.len { self.index + 1 } else { 0 };
        self.index
    }

    /// Calendar year at the cursor, saturating at `i32::MAX`.
    #[must_use]
    pub fn year(&self, base_year: i32) -> i32 {
        i32::try_from(self.index).map_or(i32::MAX, |i| base_year.saturating_add(i))
    }
}

/// Requests a running [`FrameDriver::run`] loop to stop.
#[derive(Debug, Clone)]
pub struct StopHandle {
    tx: watch::Sender<bool>,
}

impl StopHandle {
    /// Stop the loop after the tick in progress, if any.
    pub fn stop(&self) {
        let _ = self.tx.send(true);
    }
}

/// The loop's side of a stop channel.
#[derive(Debug, Clone)]
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

impl StopSignal {
    /// Whether a stop was requested.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once a stop is requested. Never resolves if every handle is
    /// dropped without stopping.
    pub async fn stopped(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Create a linked stop handle and signal.
#[must_use]
pub fn stop_channel() -> (StopHandle, StopSignal) {
    let (tx, rx) = watch::channel(false);
    (StopHandle { tx }, StopSignal { rx })
}

/// Outcome of [`FrameDriver::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks performed (the initial paint is not a tick).
    pub ticks: u64,
    /// Cursor index when the loop ended.
    pub index: usize,
    /// Calendar year shown when the loop ended.
    pub year: i32,
    /// Whether the loop ended because of a stop request.
    pub stopped: bool,
}

/// Drives a [`ChartRenderer`] through a [`Timeline`].
#[derive(Debug)]
pub struct FrameDriver {
    timeline: Timeline,
    cursor: FrameCursor,
    renderer: ChartRenderer,
}

impl FrameDriver {
    /// Create a driver and paint the first year.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTimeline`] if the timeline has no years.
    pub fn start(timeline: Timeline, renderer: ChartRenderer) -> Result<Self> {
        let cursor = FrameCursor::new(timeline.len())?;
        let mut driver = Self { timeline, cursor, renderer };
        let initial = driver.paint();
        tracing::info!(
            years = driver.timeline.len(),
            base_year = driver.timeline.base_year(),
            circles = initial.entered.len(),
            "frame driver started"
        );
        Ok(driver)
    }

    /// Advance one year and render it.
    pub fn tick(&mut self) -> Reconciliation {
        self.cursor.advance();
        let rec = self.paint();
        tracing::trace!(
            index = self.cursor.index(),
            entered = rec.entered.len(),
            updated = rec.updated.len(),
            exited = rec.exited.len(),
            membership_changed = rec.membership_changed(),
            "tick"
        );
        rec
    }

    fn paint(&mut self) -> Reconciliation {
        let year = self.cursor.year(self.timeline.base_year());
        let dataset: &YearDataset = self
            .timeline
            .get(self.cursor.index())
            .expect("cursor index is always within the timeline");
        self.renderer.render(dataset, year.to_string())
    }

    /// Cursor state.
    #[must_use]
    pub fn cursor(&self) -> FrameCursor {
        self.cursor
    }

    /// Calendar year currently displayed.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.cursor.year(self.timeline.base_year())
    }

    /// The timeline being animated.
    #[must_use]
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// The renderer and its entities.
    #[must_use]
    pub fn renderer(&self) -> &ChartRenderer {
        &self.renderer
    }

    /// Snapshot of the display.
    #[must_use]
    pub fn frame(&self) -> Frame {
        self.renderer.frame()
    }

    /// Present the current frame, then tick every `period` until stopped,
    /// until `max_ticks` ticks have run, or until the sink fails.
    ///
    /// Update transitions are given exactly `period`, so each one finishes as
    /// the next tick arrives. Late ticks are skipped rather than bunched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigInvalid`] for a zero period, or the sink's error.
    pub async fn run<S: FrameSink + ?Sized>(
        &mut self,
        period: Duration,
        sink: &mut S,
        mut stop: StopSignal,
        max_ticks: Option<u64>,
    ) -> Result<RunSummary> {
        if period.is_zero() {
            return Err(Error::ConfigInvalid {
                key: "tick_ms".to_string(),
                message: "tick period must be greater than zero".to_string(),
            });
        }
        if self.renderer.transition_duration() != period {
            tracing::debug!(?period, "aligning transition duration with tick period");
            self.renderer.set_transition_duration(period);
        }

        sink.present(&self.frame())?;

        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut ticks = 0u64;
        let mut stopped = false;
        tracing::info!(?period, ?max_ticks, "animation running");

        loop {
            if max_ticks.is_some_and(|max| ticks >= max) {
                break;
            }

            tokio::select! {
                biased;
                () = stop.stopped() => {
                    stopped = true;
                    break;
                }
                _ = interval.tick() => {
                    self.tick();
                    ticks += 1;
                    if let Err(e) = sink.present(&self.frame()) {
                        tracing::warn!(error = %e, ticks, "frame sink failed, stopping");
                        return Err(e);
                    }
                }
            }
        }

        let summary = RunSummary { ticks, index: self.cursor.index(), year: self.year(), stopped };
        tracing::info!(ticks, year = summary.year, stopped, "animation ended");
        Ok(summary)
    }
}
