//! Core application runner (business logic) for `kiuas-monitor`.
//!
//! This module is decoupled from CLI parsing and process exit codes so the
//! whole decode → detect → output pipeline can be tested deterministically.

use crate::activity::{ActivityConfig, ActivityDetector, PendingPolicy};
use crate::alias::{Alias, AliasMap};
use crate::decoder::decode;
use crate::input::{AdvertisementSource, InputError};
use crate::output::json::{FieldNames, JsonFormatter};
use crate::output::{FormatError, OutputFormatter};
use crate::throttle::Throttle;
use crate::tracker::ActivityTracker;
use clap::Parser;
use log::{debug, info};
use std::io;
use std::io::Write;
use std::time::Duration;
use thiserror::Error;

/// Configuration for the core run loop.
#[derive(Parser, Debug, Clone)]
#[command(author, about, version)]
pub struct Options {
    /// Key style of the JSON measurement objects.
    #[arg(long, default_value_t, value_enum)]
    pub field_names: FieldNames,

    /// Specify human-readable alias for a RuuviTag address.
    /// Format: --alias DE:AD:BE:EF:00:00=Sauna
    #[arg(long = "alias", value_parser = crate::alias::parse_alias, value_name = "ALIAS")]
    pub aliases: Vec<Alias>,

    /// Verbose output, print unreadable lines and unrecognized payloads
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Write at most one measurement line per tag per interval.
    /// Accepts duration with suffix: 3s, 1m, 500ms, 2h.
    /// Without suffix, value is interpreted as seconds.
    #[arg(long, value_parser = crate::throttle::parse_duration)]
    pub throttle: Option<Duration>,

    /// Minimum temperature change in °C that starts a candidate change.
    #[arg(long, default_value_t = 2.0)]
    pub change_threshold: f64,

    /// How long a change must persist before the status may flip.
    #[arg(long, default_value = "3m", value_parser = crate::throttle::parse_duration)]
    pub confirm_duration: Duration,

    /// Confirmed temperatures above this mean the stove is on.
    #[arg(long, default_value_t = 70.0)]
    pub activate_temperature: f64,

    /// Confirmed temperatures below this mean the stove is off again.
    #[arg(long, default_value_t = 40.0)]
    pub deactivate_temperature: f64,

    /// Drop a pending change as soon as a reading settles back near the stable
    /// temperature. Stricter than the stove controller's original behaviour.
    #[arg(long)]
    pub reset_on_settle: bool,
}

impl Options {
    pub fn activity_config(&self) -> ActivityConfig {
        ActivityConfig {
            change_threshold: self.change_threshold,
            confirm_duration: self.confirm_duration,
            activate_temperature: self.activate_temperature,
            deactivate_temperature: self.deactivate_temperature,
            pending_policy: if self.reset_on_settle {
                PendingPolicy::ResetOnSettle
            } else {
                PendingPolicy::Linger
            },
        }
    }
}

/// Errors returned by the core run loop.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Format(#[from] FormatError),
}

fn report(verbose: bool, err: &mut dyn Write, error: &InputError) -> io::Result<()> {
    debug!("skipping input: {error}");
    if verbose {
        writeln!(err, "{error}")?;
    }
    Ok(())
}

/// Run the core processing loop, writing JSON lines to `out` and verbose errors to `err`.
///
/// - Every advertisement is decoded; unrecognized payloads are reported to
///   `err` only when `options.verbose` is true and go no further.
/// - Recognized measurements feed the activity tracker, then are written to
///   `out` unless throttled.
/// - Status flips are logged and written to `out` as event lines. Events are
///   never throttled.
pub async fn run_with_io(
    options: Options,
    source: &dyn AdvertisementSource,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), RunError> {
    let aliases: AliasMap = crate::alias::to_map(&options.aliases);
    let formatter = JsonFormatter::new(options.field_names);
    let mut tracker = ActivityTracker::new(ActivityDetector::new(options.activity_config()));
    let mut throttle = options.throttle.map(Throttle::new);

    let mut advertisements = source.start().await?;

    while let Some(result) = advertisements.recv().await {
        let advertisement = match result {
            Ok(advertisement) => advertisement,
            Err(input_err) => {
                report(options.verbose, err, &input_err)?;
                continue;
            }
        };

        let measurement = decode(
            &advertisement.payload,
            &advertisement.source_id,
            advertisement.captured_at,
        );
        if !measurement.is_recognized() {
            debug!(
                "unrecognized payload from {}: {} bytes",
                measurement.source_id,
                advertisement.payload.len()
            );
            if options.verbose {
                writeln!(err, "{}: unrecognized payload", measurement.source_id)?;
            }
            continue;
        }

        let event = tracker.observe(&measurement);

        let should_emit = throttle
            .as_mut()
            .is_none_or(|t| t.should_emit(&measurement.source_id, measurement.captured_at));
        if should_emit {
            writeln!(out, "{}", formatter.format_measurement(&measurement)?)?;
        }

        if let Some(event) = event {
            let name = crate::alias::resolve_name(&event.source_id, &aliases);
            info!(
                "{} turned {} at {:.1} °C",
                name,
                if event.transition.to { "on" } else { "off" },
                event.transition.temperature
            );
            writeln!(out, "{}", formatter.format_event(&event, &name)?)?;
        }
    }

    Ok(())
}
