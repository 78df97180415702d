//! RuuviTag manufacturer data decoding.
//!
//! Decoding is best-effort: anything that is not a complete RAWv1 (format 3)
//! or RAWv2 (format 5) payload yields [`Measurement::unrecognized`] instead of
//! an error.

use crate::measurement::{Acceleration, DataFormat, Measurement};

/// Ruuvi Innovations manufacturer ID (0x0499) as it appears on the wire.
///
/// See: https://github.com/ruuvi/ruuvi-sensor-protocols
pub const VENDOR_PREFIX: [u8; 2] = [0x99, 0x04];

/// Offset of the data format byte.
const FORMAT_OFFSET: usize = 2;

/// Payloads must be strictly longer than this to hold a full format 3 record.
const V3_MIN_LEN_EXCLUSIVE: usize = 15;

/// Payloads must be strictly longer than this to hold a full format 5 record.
const V5_MIN_LEN_EXCLUSIVE: usize = 19;

/// Battery voltage offset of format 5, in millivolts.
const V5_BATTERY_BASE_MV: i32 = 1600;

/// TX power offset of format 5, in dBm.
const V5_TX_POWER_BASE_DBM: i8 = -40;

/// Detect the payload layout without decoding it.
pub fn detect_format(payload: &[u8]) -> DataFormat {
    if payload.len() <= FORMAT_OFFSET || payload[..2] != VENDOR_PREFIX {
        return DataFormat::Unrecognized;
    }

    match payload[FORMAT_OFFSET] {
        3 if payload.len() > V3_MIN_LEN_EXCLUSIVE => DataFormat::V3,
        5 if payload.len() > V5_MIN_LEN_EXCLUSIVE => DataFormat::V5,
        _ => DataFormat::Unrecognized,
    }
}

/// Decode the manufacturer-specific data field of an advertisement.
///
/// # Arguments
/// * `payload` - Manufacturer data including the two byte vendor prefix
/// * `source_id` - Address of the advertising tag, copied into the result
/// * `captured_at` - Observation time in seconds since epoch, copied into the result
///
/// # Returns
/// The decoded measurement, or the unrecognized sentinel. Never fails.
pub fn decode(payload: &[u8], source_id: &str, captured_at: i64) -> Measurement {
    let mut measurement = Measurement::unrecognized(source_id, captured_at);

    match detect_format(payload) {
        DataFormat::V3 => decode_v3(payload, &mut measurement),
        DataFormat::V5 => decode_v5(payload, &mut measurement),
        DataFormat::Unrecognized => {}
    }

    measurement
}

#[inline]
fn read_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([data[offset], data[offset + 1]])
}

#[inline]
fn read_i16(data: &[u8], offset: usize) -> i16 {
    i16::from_be_bytes([data[offset], data[offset + 1]])
}

fn read_acceleration(data: &[u8], offset: usize) -> Acceleration {
    Acceleration {
        x: read_i16(data, offset),
        y: read_i16(data, offset + 2),
        z: read_i16(data, offset + 4),
    }
}

fn pressure_hpa(raw: u16) -> f64 {
    f64::from(raw) / 100.0 + 500.0
}

fn decode_v3(data: &[u8], m: &mut Measurement) {
    // Sign-magnitude: bit 7 is the sign, low 7 bits whole degrees, next byte hundredths.
    let whole = data[4] & 0x7F;
    let magnitude = f64::from(whole) + f64::from(data[5]) / 100.0;
    m.temperature = if data[4] & 0x80 != 0 {
        -magnitude
    } else {
        magnitude
    };
    m.humidity = f64::from(data[3]) * 0.5;
    m.pressure = pressure_hpa(read_u16(data, 6));
    m.acceleration = read_acceleration(data, 8);
    m.battery_mv = i32::from(read_i16(data, 14));
    m.format = DataFormat::V3;
}

fn decode_v5(data: &[u8], m: &mut Measurement) {
    m.temperature = f64::from(read_i16(data, 3)) * 0.005;
    m.humidity = f64::from(read_u16(data, 5)) * 0.0025;
    m.pressure = pressure_hpa(read_u16(data, 7));
    m.acceleration = read_acceleration(data, 9);

    // 11 bits of battery voltage followed by 5 bits of TX power.
    let power_info = read_u16(data, 15);
    let battery = power_info >> 5;
    let tx_power = (power_info & 0x1F) as i8;
    m.battery_mv = i32::from(battery) + V5_BATTERY_BASE_MV;
    m.tx_power_dbm = tx_power * 2 + V5_TX_POWER_BASE_DBM;

    m.movement_count = u32::from(data[17]);
    m.sequence = u32::from(read_u16(data, 18));
    m.format = DataFormat::V5;
}
