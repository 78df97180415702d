//! Output formatters for decoded measurements and activity events.
//!
//! This module provides a trait for formatting output lines and the JSON
//! implementation used by the iot proxy and backend.

pub mod json;

use crate::measurement::Measurement;
use crate::tracker::ActivityEvent;
use thiserror::Error;

/// Errors returned while formatting an output line.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Trait for formatting measurements and events into output lines.
///
/// Implementations return a single line without the trailing newline.
pub trait OutputFormatter: Send + Sync {
    /// Format a recognized measurement.
    fn format_measurement(&self, measurement: &Measurement) -> Result<String, FormatError>;

    /// Format an activity event.
    ///
    /// # Arguments
    /// * `event` - The status flip to report
    /// * `name` - Human-readable name of the source (alias or address)
    fn format_event(&self, event: &ActivityEvent, name: &str) -> Result<String, FormatError>;
}
