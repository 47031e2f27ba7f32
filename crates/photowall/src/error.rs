//! Error types for the gallery crate.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the waterfall layout.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// The container is too narrow (or unmeasured) for the configured
    /// column count and gap. No positions were changed.
    #[error(
        "layout precondition failed: container width {container_width:?} cannot fit \
         {column_count} columns with gap {gap}"
    )]
    Precondition {
        container_width: Option<f32>,
        column_count: usize,
        gap: f32,
    },

    /// A column index outside `[0, column_count)` was used.
    ///
    /// This indicates a bug in the caller, not a user-facing condition.
    #[error("invalid column index {index} (column count {column_count})")]
    InvalidColumnIndex { index: usize, column_count: usize },

    /// The layout needs at least one column.
    #[error("invalid column count: {0}")]
    InvalidColumnCount(usize),

    /// The gap between columns must be finite and non-negative.
    #[error("invalid gap: {0}")]
    InvalidGap(f32),
}

/// Result type for layout operations.
pub type LayoutResult<T> = Result<T, LayoutError>;

/// Errors raised while loading or validating gallery settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The settings document is not valid TOML for [`GallerySettings`](crate::GallerySettings).
    #[error("invalid settings document: {0}")]
    Parse(#[from] toml::de::Error),

    /// The settings could not be written as TOML.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A setting is outside its accepted range.
    #[error("setting `{field}` out of range: {value}")]
    OutOfRange { field: &'static str, value: String },
}

/// Result type for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;
