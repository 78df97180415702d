//! Compact JSON output.
//!
//! Measurements keep the key set consumed by the backend, either spelled out
//! or shortened to single letters for constrained links.

use crate::measurement::Measurement;
use crate::output::{FormatError, OutputFormatter};
use crate::tracker::ActivityEvent;
use serde::Serialize;

/// Key style for measurement objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum FieldNames {
    /// `mac`, `temperature`, `pressure`, ...
    #[default]
    Full,
    /// `a`, `t`, `p`, ...
    Short,
}

#[derive(Serialize)]
struct FullMeasurement<'a> {
    mac: &'a str,
    temperature: f64,
    pressure: f64,
    humidity: f64,
    #[serde(rename = "accelX")]
    accel_x: i16,
    #[serde(rename = "accelY")]
    accel_y: i16,
    #[serde(rename = "accelZ")]
    accel_z: i16,
    battery: i32,
    epoch: i64,
    txdbm: i8,
    #[serde(rename = "move")]
    movement: u32,
    sequence: u32,
}

impl<'a> From<&'a Measurement> for FullMeasurement<'a> {
    fn from(m: &'a Measurement) -> Self {
        Self {
            mac: &m.source_id,
            temperature: m.temperature,
            pressure: m.pressure,
            humidity: m.humidity,
            accel_x: m.acceleration.x,
            accel_y: m.acceleration.y,
            accel_z: m.acceleration.z,
            battery: m.battery_mv,
            epoch: m.captured_at,
            txdbm: m.tx_power_dbm,
            movement: m.movement_count,
            sequence: m.sequence,
        }
    }
}

#[derive(Serialize)]
struct ShortMeasurement<'a> {
    a: &'a str,
    t: f64,
    p: f64,
    h: f64,
    x: i16,
    y: i16,
    z: i16,
    b: i32,
    e: i64,
    l: i8,
    m: u32,
    s: u32,
}

impl<'a> From<&'a Measurement> for ShortMeasurement<'a> {
    fn from(m: &'a Measurement) -> Self {
        Self {
            a: &m.source_id,
            t: m.temperature,
            p: m.pressure,
            h: m.humidity,
            x: m.acceleration.x,
            y: m.acceleration.y,
            z: m.acceleration.z,
            b: m.battery_mv,
            e: m.captured_at,
            l: m.tx_power_dbm,
            m: m.movement_count,
            s: m.sequence,
        }
    }
}

#[derive(Serialize)]
struct EventLine<'a> {
    event: &'static str,
    mac: &'a str,
    name: &'a str,
    active: bool,
    temperature: f64,
    epoch: i64,
}

/// JSON formatter writing one object per line.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    field_names: FieldNames,
}

impl JsonFormatter {
    pub fn new(field_names: FieldNames) -> Self {
        Self { field_names }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_measurement(&self, measurement: &Measurement) -> Result<String, FormatError> {
        let line = match self.field_names {
            FieldNames::Full => serde_json::to_string(&FullMeasurement::from(measurement))?,
            FieldNames::Short => serde_json::to_string(&ShortMeasurement::from(measurement))?,
        };
        Ok(line)
    }

    fn format_event(&self, event: &ActivityEvent, name: &str) -> Result<String, FormatError> {
        let line = EventLine {
            event: "activity",
            mac: &event.source_id,
            name,
            active: event.transition.to,
            temperature: event.transition.temperature,
            epoch: event.transition.at,
        };
        Ok(serde_json::to_string(&line)?)
    }
}
