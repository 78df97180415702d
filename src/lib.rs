//! `kiuas-monitor` library.
//!
//! Turns RuuviTag manufacturer data into typed measurements and a debounced
//! "stove is heating" status. The binary (`src/main.rs`) is responsible for CLI
//! parsing and process exit codes; the run loop lives in [`crate::app`] where
//! it can be tested with an injected advertisement source and output streams.

pub mod activity;
pub mod alias;
pub mod app;
pub mod decoder;
pub mod input;
pub mod measurement;
pub mod output;
pub mod throttle;
pub mod tracker;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types at the crate root
pub use activity::{ActivityConfig, ActivityDetector, ActivityState, PendingPolicy, Transition};
pub use alias::{Alias, AliasMap, parse_alias, resolve_name, to_map};
pub use decoder::{VENDOR_PREFIX, decode, detect_format};
pub use input::{Advertisement, AdvertisementResult, AdvertisementSource, InputError, StdinSource};
pub use measurement::{Acceleration, DataFormat, Measurement};
pub use output::OutputFormatter;
pub use output::json::{FieldNames, JsonFormatter};
pub use throttle::{Throttle, parse_duration};
pub use tracker::{ActivityEvent, ActivityTracker};
