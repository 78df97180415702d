//! Advertisement input.
//!
//! Radio scanning happens elsewhere (an ESP32 proxy or `btmon` pipe). This
//! crate reads what the scanner captured as text, one advertisement per line:
//!
//! ```text
//! SOURCE_ID HEX_PAYLOAD [EPOCH_SECONDS]
//! ```
//!
//! `HEX_PAYLOAD` is the manufacturer data field including the vendor prefix.
//! Without `EPOCH_SECONDS` the time the line was read is used. Blank lines and
//! lines starting with `#` are skipped.

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::time::SystemTime;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// Channel buffer size for parsed advertisements.
pub const ADVERTISEMENT_CHANNEL_BUFFER_SIZE: usize = 100;

/// Raw manufacturer data captured from one advertisement.
#[derive(Debug, Clone, PartialEq)]
pub struct Advertisement {
    pub source_id: String,
    pub payload: Vec<u8>,
    /// Seconds since epoch
    pub captured_at: i64,
}

/// Errors for input lines that cannot be turned into an [`Advertisement`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("line {line}: expected SOURCE_ID HEX_PAYLOAD [EPOCH_SECONDS]")]
    MissingPayload { line: usize },
    #[error("line {line}: invalid hex payload: {reason}")]
    InvalidHex { line: usize, reason: String },
    #[error("line {line}: invalid timestamp: {value}")]
    InvalidTimestamp { line: usize, value: String },
    #[error("line {line}: unexpected trailing field: {value}")]
    TrailingField { line: usize, value: String },
    #[error("Read error: {0}")]
    Read(String),
}

/// Convenience alias for parsed advertisements or input errors.
pub type AdvertisementResult = Result<Advertisement, InputError>;

/// Current time in seconds since epoch.
pub fn now_epoch() -> i64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}

/// Decode a hex string, with or without a `0x` prefix.
pub fn decode_hex(src: &str) -> Result<Vec<u8>, String> {
    let src = src
        .strip_prefix("0x")
        .or_else(|| src.strip_prefix("0X"))
        .unwrap_or(src);

    if src.len() % 2 != 0 {
        return Err(format!("odd number of digits ({})", src.len()));
    }

    src.as_bytes()
        .chunks(2)
        .map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|digits| u8::from_str_radix(digits, 16).ok())
                .ok_or_else(|| format!("'{}' is not valid hex", String::from_utf8_lossy(pair)))
        })
        .collect()
}

/// Parse one input line.
///
/// # Arguments
/// * `line` - 1-based line number, used in error messages
/// * `text` - The line content
/// * `now` - Timestamp to use when the line carries none
///
/// # Returns
/// `None` for blank and comment lines.
pub fn parse_line(line: usize, text: &str, now: i64) -> Option<AdvertisementResult> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return None;
    }

    let mut fields = text.split_whitespace();
    let source_id = fields.next()?;
    Some(parse_fields(line, source_id, fields, now))
}

fn parse_fields<'a>(
    line: usize,
    source_id: &str,
    mut fields: impl Iterator<Item = &'a str>,
    now: i64,
) -> AdvertisementResult {
    let hex = fields.next().ok_or(InputError::MissingPayload { line })?;
    let payload = decode_hex(hex).map_err(|reason| InputError::InvalidHex { line, reason })?;

    let captured_at = match fields.next() {
        Some(value) => value
            .parse::<i64>()
            .map_err(|_| InputError::InvalidTimestamp {
                line,
                value: value.to_string(),
            })?,
        None => now,
    };

    if let Some(value) = fields.next() {
        return Err(InputError::TrailingField {
            line,
            value: value.to_string(),
        });
    }

    Ok(Advertisement {
        source_id: source_id.to_string(),
        payload,
        captured_at,
    })
}

/// Spawn a task that parses lines from `reader` until end of input.
///
/// The channel closes when the reader is exhausted or fails; a read failure is
/// delivered as [`InputError::Read`] first.
pub fn spawn_reader<R>(reader: R) -> mpsc::Receiver<AdvertisementResult>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(ADVERTISEMENT_CHANNEL_BUFFER_SIZE);

    tokio::spawn(async move {
        let mut lines = reader.lines();
        let mut line_number = 0;

        loop {
            match lines.next_line().await {
                Ok(Some(text)) => {
                    line_number += 1;
                    if let Some(result) = parse_line(line_number, &text, now_epoch())
                        && tx.send(result).await.is_err()
                    {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    let _ = tx.send(Err(InputError::Read(e.to_string()))).await;
                    break;
                }
            }
        }
    });

    rx
}

/// Source abstraction so the run loop can be tested without stdin.
pub trait AdvertisementSource: Send + Sync {
    fn start(
        &self,
    ) -> Pin<
        Box<dyn Future<Output = Result<mpsc::Receiver<AdvertisementResult>, io::Error>> + Send + '_>,
    >;
}

/// Reads advertisement lines from standard input.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinSource;

impl AdvertisementSource for StdinSource {
    fn start(
        &self,
    ) -> Pin<
        Box<dyn Future<Output = Result<mpsc::Receiver<AdvertisementResult>, io::Error>> + Send + '_>,
    > {
        Box::pin(async move { Ok(spawn_reader(BufReader::new(tokio::io::stdin()))) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_hex() {
        assert_eq!(decode_hex("9904").unwrap(), vec![0x99, 0x04]);
        assert_eq!(decode_hex("0x99aAff").unwrap(), vec![0x99, 0xAA, 0xFF]);
        assert_eq!(decode_hex("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_decode_hex_invalid() {
        assert!(decode_hex("990").unwrap_err().contains("odd number"));
        assert!(decode_hex("99zz").unwrap_err().contains("'zz'"));
        assert!(decode_hex("ää").is_err());
    }

    #[test]
    fn test_parse_line_with_timestamp() {
        let adv = parse_line(1, "AA:BB:CC:DD:EE:FF 99040512 1700000000", 5)
            .unwrap()
            .unwrap();
        assert_eq!(adv.source_id, "AA:BB:CC:DD:EE:FF");
        assert_eq!(adv.payload, vec![0x99, 0x04, 0x05, 0x12]);
        assert_eq!(adv.captured_at, 1_700_000_000);
    }

    #[test]
    fn test_parse_line_defaults_timestamp() {
        let adv = parse_line(1, "  sauna 9904  ", 42).unwrap().unwrap();
        assert_eq!(adv.source_id, "sauna");
        assert_eq!(adv.captured_at, 42);
    }

    #[test]
    fn test_parse_line_skips_blank_and_comments() {
        assert_eq!(parse_line(1, "", 0), None);
        assert_eq!(parse_line(2, "   ", 0), None);
        assert_eq!(parse_line(3, "# captured at the lake", 0), None);
    }

    #[test]
    fn test_parse_line_errors() {
        assert_eq!(
            parse_line(4, "AA:BB:CC:DD:EE:FF", 0),
            Some(Err(InputError::MissingPayload { line: 4 }))
        );
        assert!(matches!(
            parse_line(5, "AA:BB:CC:DD:EE:FF 99x4", 0),
            Some(Err(InputError::InvalidHex { line: 5, .. }))
        ));
        assert_eq!(
            parse_line(6, "AA:BB:CC:DD:EE:FF 9904 soon", 0),
            Some(Err(InputError::InvalidTimestamp {
                line: 6,
                value: "soon".to_string()
            }))
        );
        assert_eq!(
            parse_line(7, "AA:BB:CC:DD:EE:FF 9904 1 2", 0),
            Some(Err(InputError::TrailingField {
                line: 7,
                value: "2".to_string()
            }))
        );
    }

    #[test]
    fn test_input_error_display() {
        let err = InputError::MissingPayload { line: 3 };
        assert_eq!(
            format!("{}", err),
            "line 3: expected SOURCE_ID HEX_PAYLOAD [EPOCH_SECONDS]"
        );
    }

    #[tokio::test]
    async fn test_spawn_reader_numbers_lines() {
        let input: &'static [u8] = b"# header\nAA 9904 1\n\nBB zz 2\n";
        let mut rx = spawn_reader(input);

        let first = rx.recv().await.unwrap().unwrap();
        assert_eq!(first.source_id, "AA");
        assert_eq!(first.captured_at, 1);

        let second = rx.recv().await.unwrap();
        assert!(matches!(second, Err(InputError::InvalidHex { line: 4, .. })));

        assert!(rx.recv().await.is_none());
    }
}
