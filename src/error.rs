//! Error types for gapminder-viz operations.

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, configuring, or driving the chart.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while reading the dataset.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The dataset is not valid JSON or does not have the expected shape.
    #[error("malformed dataset: {0}")]
    Json(#[from] serde_json::Error),

    /// A year label could not be read as an integer calendar year.
    #[error("invalid year label at index {index}: {label}")]
    InvalidYear {
        /// Position of the year in the dataset.
        index: usize,
        /// The offending label.
        label: String,
    },

    /// Years in the dataset are not consecutive.
    #[error("year gap at index {index}: expected {expected}, found {found}")]
    YearGap {
        /// Position of the year in the dataset.
        index: usize,
        /// Year implied by the first entry and the index.
        expected: i32,
        /// Year actually present.
        found: i32,
    },

    /// The same country appears twice in one year.
    #[error("duplicate country '{country}' in year {year}")]
    DuplicateCountry {
        /// Calendar year.
        year: i32,
        /// Country identifier.
        country: String,
    },

    /// A required numeric field holds a value that does not coerce to a number.
    #[error("non-numeric '{field}' for '{country}' in year {year}: {value}")]
    NonNumericField {
        /// Calendar year.
        year: i32,
        /// Country identifier.
        country: String,
        /// Field name (`income`, `life_exp`, `population`).
        field: &'static str,
        /// Raw JSON value as text.
        value: String,
    },

    /// The dataset did not arrive within the load timeout.
    #[error("dataset load timed out after {0:?}")]
    LoadTimeout(Duration),

    /// The timeline has no years, so there is nothing to animate.
    #[error("timeline is empty: the frame driver cannot start")]
    EmptyTimeline,

    /// Configuration file not found.
    #[error("configuration file not found: {0}")]
    ConfigNotFound(String),

    /// Configuration parsing error with line number.
    #[error("configuration error at line {line}: {message}")]
    ConfigParse {
        /// Line number where the error occurred (1-indexed).
        line: usize,
        /// Error message describing the issue.
        message: String,
    },

    /// Invalid configuration value.
    #[error("invalid configuration value for '{key}': {message}")]
    ConfigInvalid {
        /// The configuration key with invalid value.
        key: String,
        /// Error message describing why the value is invalid.
        message: String,
    },

    /// Chart dimensions leave no room for the plot area.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Scale domain error (e.g., log of non-positive value).
    #[error("Scale domain error: {0}")]
    ScaleDomain(String),

    /// A frame sink failed to present a frame.
    #[error("output error: {0}")]
    Output(String),
}

/// Coarse classification of [`Error`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The dataset is unreachable, malformed, or has invalid fields.
    Load,
    /// The program is configured in a way that cannot run.
    Configuration,
    /// A scale was constructed with an invalid domain.
    Scale,
    /// Presenting a frame failed.
    Output,
}

impl Error {
    /// Returns the class this error belongs to.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_)
            | Self::Json(_)
            | Self::InvalidYear { .. }
            | Self::YearGap { .. }
            | Self::DuplicateCountry { .. }
            | Self::NonNumericField { .. }
            | Self::LoadTimeout(_) => ErrorKind::Load,
            Self::EmptyTimeline
            | Self::ConfigNotFound(_)
            | Self::ConfigParse { .. }
            | Self::ConfigInvalid { .. }
            | Self::InvalidDimensions { .. } => ErrorKind::Configuration,
            Self::ScaleDomain(_) => ErrorKind::Scale,
            Self::Output(_) => ErrorKind::Output,
        }
    }

    /// Whether this error means the dataset could not be loaded.
    #[must_use]
    pub fn is_load_error(&self) -> bool {
        self.kind() == ErrorKind::Load
    }
}
