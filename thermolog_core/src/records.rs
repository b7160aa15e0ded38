//! Raw log parsing.
//!
//! The device appends `timestamp,adc1,adc2` lines without a header. Power loss
//! and clock trouble leave truncated, merged or non-numeric lines behind; the
//! parser keeps every well-formed row and reports every other one.

use std::fmt;
use std::io::Read;

use serde::Serialize;

use crate::error::Result;

/// Fields per log line: timestamp and two ADC channels.
pub const LOG_COLUMNS: usize = 3;

/// A log row after numeric coercion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RawRecord {
    /// 1-based line in the source file.
    pub line: u64,
    /// Seconds since the device epoch.
    pub timestamp: i64,
    /// Averaged ADC counts per channel.
    pub adc: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    ColumnCount { found: usize },
    NotNumeric { column: &'static str },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::ColumnCount { found } => {
                write!(f, "expected {LOG_COLUMNS} columns, found {found}")
            }
            SkipReason::NotNumeric { column } => write!(f, "{column} is not numeric"),
        }
    }
}

/// A line the parser refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub line: u64,
    pub reason: SkipReason,
    pub content: String,
}

/// Parser output: accepted rows plus diagnostics for the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedLog {
    pub rows: Vec<RawRecord>,
    pub skipped: Vec<SkippedRow>,
}

impl ParsedLog {
    /// Lines seen, accepted or not.
    pub fn total_lines(&self) -> usize {
        self.rows.len() + self.skipped.len()
    }
}

/// Parse a headerless `timestamp,adc1,adc2` log.
///
/// Only I/O failures are errors; malformed lines end up in `skipped`.
pub fn parse_log<R: Read>(reader: R) -> Result<ParsedLog> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut out = ParsedLog::default();
    let mut record = csv::ByteRecord::new();
    while rdr.read_byte_record(&mut record)? {
        let line = record.position().map_or(0, |p| p.line());
        match coerce(&record, line) {
            Ok(row) => out.rows.push(row),
            Err(reason) => {
                let content = record
                    .iter()
                    .map(String::from_utf8_lossy)
                    .collect::<Vec<_>>()
                    .join(",");
                tracing::warn!(line, reason = %reason, content = %content, "skipping malformed log line");
                out.skipped.push(SkippedRow {
                    line,
                    reason,
                    content,
                });
            }
        }
    }

    tracing::debug!(
        rows = out.rows.len(),
        skipped = out.skipped.len(),
        "log parsed"
    );
    Ok(out)
}

fn coerce(record: &csv::ByteRecord, line: u64) -> std::result::Result<RawRecord, SkipReason> {
    if record.len() != LOG_COLUMNS {
        return Err(SkipReason::ColumnCount {
            found: record.len(),
        });
    }
    let timestamp = parse_timestamp(&record[0]).ok_or(SkipReason::NotNumeric {
        column: "timestamp",
    })?;
    let adc1 = parse_reading(&record[1]).ok_or(SkipReason::NotNumeric { column: "adc1" })?;
    let adc2 = parse_reading(&record[2]).ok_or(SkipReason::NotNumeric { column: "adc2" })?;
    Ok(RawRecord {
        line,
        timestamp,
        adc: [adc1, adc2],
    })
}

/// Integer seconds; `1234.0` is accepted since some firmware writes floats.
fn parse_timestamp(field: &[u8]) -> Option<i64> {
    let s = std::str::from_utf8(field).ok()?;
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 {
        Some(f as i64)
    } else {
        None
    }
}

fn parse_reading(field: &[u8]) -> Option<f64> {
    let v = std::str::from_utf8(field).ok()?.parse::<f64>().ok()?;
    v.is_finite().then_some(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_timestamps_with_zero_fraction_are_accepted() {
        assert_eq!(parse_timestamp(b"780000000.0"), Some(780_000_000));
        assert_eq!(parse_timestamp(b"780000000.5"), None);
        assert_eq!(parse_timestamp(b""), None);
    }

    #[test]
    fn readings_must_be_finite() {
        assert_eq!(parse_reading(b"2048.25"), Some(2048.25));
        assert_eq!(parse_reading(b"nan"), None);
        assert_eq!(parse_reading(b"inf"), None);
        assert_eq!(parse_reading(b""), None);
    }
}
