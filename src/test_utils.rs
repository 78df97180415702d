use crate::decoder::VENDOR_PREFIX;
use crate::measurement::{Acceleration, DataFormat, Measurement};

/// A stable source address for unit tests.
pub const TEST_SOURCE: &str = "AA:BB:CC:DD:EE:FF";

/// Example format 5 payload from the Ruuvi protocol documentation.
pub fn v5_payload() -> Vec<u8> {
    vec![
        0x99, 0x04, // Manufacturer ID
        0x05, // Format 5
        0x12, 0xFC, // Temperature: 24.30°C (0x12FC = 4860, 4860 * 0.005 = 24.30)
        0x53, 0x94, // Humidity: 53.49% (0x5394 = 21396, 21396 * 0.0025 = 53.49)
        0xC3, 0x7C, // Pressure: 1000.44 hPa (0xC37C = 50044, 500.44 + 500)
        0x00, 0x04, // Acceleration X: 4 mG
        0xFF, 0xFC, // Acceleration Y: -4 mG
        0x04, 0x0C, // Acceleration Z: 1036 mG
        0xAC, 0x36, // Battery: 2977 mV, TX Power: 4 dBm
        0x42, // Movement counter: 66
        0x00, 0xCD, // Sequence: 205
        0xCB, 0xB8, 0x33, 0x4C, 0x88, 0x4F, // MAC address (ignored in decode)
    ]
}

/// Example format 3 payload from the Ruuvi protocol documentation.
pub fn v3_payload() -> Vec<u8> {
    vec![
        0x99, 0x04, // Manufacturer ID
        0x03, // Format 3
        0x29, // Humidity: 20.5%
        0x1A, 0x1E, // Temperature: 26.30°C
        0xCE, 0x1E, // Pressure: 1027.66 hPa
        0xFC, 0x18, // Acceleration X: -1000 mG
        0xF9, 0x42, // Acceleration Y: -1726 mG
        0x02, 0xCA, // Acceleration Z: 714 mG
        0x0B, 0x53, // Battery: 2899 mV
    ]
}

/// Raw (undecoded) field values of a format 5 record.
#[derive(Debug, Clone, PartialEq)]
pub struct V5Fields {
    pub temperature: i16,
    pub humidity: u16,
    pub pressure: u16,
    pub acceleration: (i16, i16, i16),
    /// 11-bit battery value above 1600 mV
    pub battery: u16,
    /// 5-bit TX power step
    pub tx_power: u8,
    pub movement_count: u8,
    pub sequence: u16,
}

impl V5Fields {
    pub fn from_measurement(m: &Measurement) -> Self {
        assert_eq!(m.format, DataFormat::V5);
        Self {
            temperature: (m.temperature / 0.005).round() as i16,
            humidity: (m.humidity / 0.0025).round() as u16,
            pressure: ((m.pressure - 500.0) * 100.0).round() as u16,
            acceleration: split(m.acceleration),
            battery: (m.battery_mv - 1600) as u16,
            tx_power: ((i16::from(m.tx_power_dbm) + 40) / 2) as u8,
            movement_count: m.movement_count as u8,
            sequence: m.sequence as u16,
        }
    }
}

/// Raw (undecoded) field values of a format 3 record.
#[derive(Debug, Clone, PartialEq)]
pub struct V3Fields {
    pub humidity: u8,
    pub negative: bool,
    pub whole_degrees: u8,
    pub hundredths: u8,
    pub pressure: u16,
    pub acceleration: (i16, i16, i16),
    pub battery: i16,
}

impl V3Fields {
    pub fn from_measurement(m: &Measurement) -> Self {
        assert_eq!(m.format, DataFormat::V3);
        let magnitude = m.temperature.abs();
        let whole = magnitude.trunc();
        Self {
            humidity: (m.humidity / 0.5).round() as u8,
            negative: m.temperature.is_sign_negative(),
            whole_degrees: whole as u8,
            hundredths: ((magnitude - whole) * 100.0).round() as u8,
            pressure: ((m.pressure - 500.0) * 100.0).round() as u16,
            acceleration: split(m.acceleration),
            battery: m.battery_mv as i16,
        }
    }
}

fn split(a: Acceleration) -> (i16, i16, i16) {
    (a.x, a.y, a.z)
}

fn push_acceleration(out: &mut Vec<u8>, (x, y, z): (i16, i16, i16)) {
    out.extend_from_slice(&x.to_be_bytes());
    out.extend_from_slice(&y.to_be_bytes());
    out.extend_from_slice(&z.to_be_bytes());
}

/// Encode a format 5 payload, vendor prefix included.
pub fn encode_v5(fields: &V5Fields) -> Vec<u8> {
    let mut out = VENDOR_PREFIX.to_vec();
    out.push(5);
    out.extend_from_slice(&fields.temperature.to_be_bytes());
    out.extend_from_slice(&fields.humidity.to_be_bytes());
    out.extend_from_slice(&fields.pressure.to_be_bytes());
    push_acceleration(&mut out, fields.acceleration);
    let power_info = (fields.battery << 5) | u16::from(fields.tx_power & 0x1F);
    out.extend_from_slice(&power_info.to_be_bytes());
    out.push(fields.movement_count);
    out.extend_from_slice(&fields.sequence.to_be_bytes());
    out
}

/// Encode a format 3 payload, vendor prefix included.
pub fn encode_v3(fields: &V3Fields) -> Vec<u8> {
    let mut out = VENDOR_PREFIX.to_vec();
    out.push(3);
    out.push(fields.humidity);
    let sign = if fields.negative { 0x80 } else { 0x00 };
    out.push(sign | (fields.whole_degrees & 0x7F));
    out.push(fields.hundredths);
    out.extend_from_slice(&fields.pressure.to_be_bytes());
    push_acceleration(&mut out, fields.acceleration);
    out.extend_from_slice(&fields.battery.to_be_bytes());
    out
}

/// Build a recognized format 5 measurement with the given temperature.
pub fn measurement_at(source_id: &str, temperature: f64, captured_at: i64) -> Measurement {
    Measurement {
        format: DataFormat::V5,
        temperature,
        ..Measurement::unrecognized(source_id, captured_at)
    }
}

/// Encode a plausible format 5 payload reporting `celsius`.
pub fn v5_payload_with_temperature(celsius: f64) -> Vec<u8> {
    encode_v5(&V5Fields {
        temperature: (celsius / 0.005).round() as i16,
        humidity: 20_000,
        pressure: 50_000,
        acceleration: (0, 0, 1000),
        battery: 1400,
        tx_power: 22,
        movement_count: 0,
        sequence: 0,
    })
}
