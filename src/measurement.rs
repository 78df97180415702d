//! Decoded RuuviTag measurement.

/// Payload layout a measurement was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataFormat {
    /// Wrong vendor prefix, unknown version or truncated payload.
    #[default]
    Unrecognized,
    /// Legacy 14-byte RAWv1 layout.
    V3,
    /// RAWv2 layout.
    V5,
}

/// Raw acceleration readings in milli-g.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Acceleration {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

/// A measurement from a RuuviTag sensor.
///
/// Units follow the sensor rather than SI:
/// - Temperature in Celsius
/// - Humidity in percent (0-100)
/// - Pressure in hectopascals
/// - Battery voltage in millivolts
/// - TX power in dBm
/// - Acceleration in milli-g
///
/// Fields a format does not carry stay at zero. Use [`Measurement::is_recognized`]
/// rather than inspecting values to tell a decoded reading from the sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Address of the tag the payload came from
    pub source_id: String,
    /// Seconds since epoch when the payload was observed
    pub captured_at: i64,
    /// Layout the payload was decoded from
    pub format: DataFormat,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Relative humidity in percent
    pub humidity: f64,
    /// Atmospheric pressure in hPa
    pub pressure: f64,
    /// Acceleration per axis in milli-g
    pub acceleration: Acceleration,
    /// Battery voltage in millivolts
    pub battery_mv: i32,
    /// TX power in dBm
    pub tx_power_dbm: i8,
    /// Movement counter
    pub movement_count: u32,
    /// Measurement sequence number
    pub sequence: u32,
}

impl Measurement {
    /// The "no data" value returned for payloads that match no known layout.
    pub fn unrecognized(source_id: impl Into<String>, captured_at: i64) -> Self {
        Self {
            source_id: source_id.into(),
            captured_at,
            format: DataFormat::Unrecognized,
            temperature: 0.0,
            humidity: 0.0,
            pressure: 0.0,
            acceleration: Acceleration::default(),
            battery_mv: 0,
            tx_power_dbm: 0,
            movement_count: 0,
            sequence: 0,
        }
    }

    pub fn is_recognized(&self) -> bool {
        self.format != DataFormat::Unrecognized
    }
}
