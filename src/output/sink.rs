//! Frame sinks: where rendered frames go.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

use super::chart_svg::ChartSvg;
use super::Frame;

/// Consumer of rendered frames. Called once for the initial paint and once
/// per tick, never concurrently.
pub trait FrameSink {
    /// Present one frame.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Output`] if the frame cannot be presented.
    fn present(&mut self, frame: &Frame) -> Result<()>;
}

/// Collects frames in memory.
impl FrameSink for Vec<Frame> {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        self.push(frame.clone());
        Ok(())
    }
}

fn output_error(path: &Path, err: &io::Error) -> Error {
    Error::Output(format!("{}: {err}", path.display()))
}

/// Rewrites a single SVG file on every frame.
///
/// Each frame is written to a sibling temp file and renamed into place, so a
/// viewer polling the file never reads a partial document.
#[derive(Debug, Clone)]
pub struct SvgFileSink {
    chart: ChartSvg,
    path: PathBuf,
    frames: u64,
}

impl SvgFileSink {
    /// Create a sink writing to `path`.
    #[must_use]
    pub fn new(chart: ChartSvg, path: impl Into<PathBuf>) -> Self {
        Self { chart, path: path.into(), frames: 0 }
    }

    /// Target path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Frames written so far.
    #[must_use]
    pub fn frames_written(&self) -> u64 {
        self.frames
    }
}

impl FrameSink for SvgFileSink {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, self.chart.render(frame)).map_err(|e| output_error(&tmp, &e))?;
        fs::rename(&tmp, &self.path).map_err(|e| output_error(&self.path, &e))?;
        self.frames += 1;
        Ok(())
    }
}

/// Writes every frame to its own numbered file: `frame-00000.svg`, ...
#[derive(Debug, Clone)]
pub struct SvgFrameDirSink {
    chart: ChartSvg,
    dir: PathBuf,
    next: u64,
}

impl SvgFrameDirSink {
    /// Create a sink writing into `dir`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Output`] if the directory cannot be created.
    pub fn new(chart: ChartSvg, dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| output_error(&dir, &e))?;
        Ok(Self { chart, dir, next: 0 })
    }

    /// Path of the `index`-th frame.
    #[must_use]
    pub fn frame_path(&self, index: u64) -> PathBuf {
        self.dir.join(format!("frame-{index:05}.svg"))
    }
}

impl FrameSink for SvgFrameDirSink {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        let path = self.frame_path(self.next);
        fs::write(&path, self.chart.render(frame)).map_err(|e| output_error(&path, &e))?;
        self.next += 1;
        Ok(())
    }
}
