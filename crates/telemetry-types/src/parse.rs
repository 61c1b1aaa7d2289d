//! Plain-text ingestion format and query instant parsing.
//!
//! A request body holds one reading per line:
//!
//! ```text
//! 1649941817 Voltage 1.34
//! 1649941818 Current 12.0
//! ```
//!
//! Lines are separated by `\n`, trimmed, and split on single spaces. A line
//! with the wrong number of fields rejects the whole body; a line whose
//! timestamp or value is not numeric is skipped.

use time::macros::format_description;
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset,
    format_description::well_known::Rfc3339,
};

use crate::error::{ParseError, ParseResult};
use crate::types::Reading;

/// Number of space-separated fields in a line.
pub const FIELDS_PER_LINE: usize = 3;

/// The outcome of parsing a structurally valid request body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    /// Readings ready to be stored, in input order.
    pub readings: Vec<Reading>,
    /// Lines dropped because their timestamp or value did not parse.
    pub skipped: Vec<ParseError>,
}

impl Batch {
    /// Total number of lines in the body.
    #[must_use]
    pub fn lines(&self) -> usize {
        self.readings.len() + self.skipped.len()
    }
}

/// Parse a single `"<timestamp> <name> <value>"` line.
///
/// `line_no` is 1-based and only used for error reporting. The field count is
/// checked before either number is parsed, so a malformed line always yields
/// [`ParseError::FieldCount`].
///
/// # Examples
///
/// ```
/// use telemetry_types::{Reading, parse_line};
///
/// let reading = parse_line("1649941817 Voltage 1.34", 1).unwrap();
/// assert_eq!(reading, Reading::new(1649941817, "Voltage", 1.34));
///
/// assert!(parse_line("1649941817 Voltage", 1).unwrap_err().is_structural());
/// assert!(!parse_line("abc Voltage 1.34", 1).unwrap_err().is_structural());
/// ```
pub fn parse_line(line: &str, line_no: usize) -> ParseResult<Reading> {
    let fields: Vec<&str> = line.trim().split(' ').collect();

    let [timestamp, name, value] = fields.as_slice() else {
        return Err(ParseError::FieldCount {
            line: line_no,
            found: fields.len(),
        });
    };

    let timestamp = parse_timestamp(timestamp).ok_or_else(|| ParseError::InvalidTimestamp {
        line: line_no,
        token: (*timestamp).to_string(),
    })?;

    let value = value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::InvalidValue {
            line: line_no,
            token: (*value).to_string(),
        })?;

    Ok(Reading::new(timestamp, *name, value))
}

/// Parse a timestamp token as whole Unix seconds.
///
/// Integers are taken exactly. Other numeric forms (`1649941817.0`,
/// `1.649941817e9`) are accepted when they are finite, have no fractional part
/// and fit in an `i64`.
fn parse_timestamp(token: &str) -> Option<i64> {
    if let Ok(seconds) = token.parse::<i64>() {
        return Some(seconds);
    }

    let seconds = token.parse::<f64>().ok()?;
    let in_range = seconds >= i64::MIN as f64 && seconds < i64::MAX as f64;
    (seconds.is_finite() && seconds.fract() == 0.0 && in_range).then_some(seconds as i64)
}

/// Parse a whole request body.
///
/// Every line is validated before anything is returned: the first line with
/// the wrong field count fails the whole batch. Lines with a bad timestamp or
/// value are collected in [`Batch::skipped`] and do not fail the batch.
///
/// An empty body is a single empty line and therefore structurally invalid.
pub fn parse_batch(body: &str) -> ParseResult<Batch> {
    let mut batch = Batch::default();

    for (index, line) in body.split('\n').enumerate() {
        match parse_line(line, index + 1) {
            Ok(reading) => batch.readings.push(reading),
            Err(e) if e.is_structural() => return Err(e),
            Err(e) => batch.skipped.push(e),
        }
    }

    Ok(batch)
}

/// Parse a query bound into an instant.
///
/// Accepted forms:
/// - RFC 3339 date-times (`2022-04-14T10:00:00Z`, `2022-04-14T12:00:00.5+02:00`)
/// - Dates (`2022-04-14`), meaning midnight UTC
/// - ISO 8601 date-times with minute, second or fractional precision, separated
///   by `T` or a space, optionally followed by `Z`, `+HH:MM` or `+HHMM`
///   (`2022-04-14T10:00Z`, `2022-04-14 10:00:00`, `2022-04-14T12:00:00+0200`).
///   Without a zone the instant is interpreted as UTC.
///
/// # Examples
///
/// ```
/// use telemetry_types::parse_instant;
///
/// let from = parse_instant("2022-04-14").unwrap();
/// assert_eq!(from.unix_timestamp(), 1649894400);
/// assert_eq!(parse_instant("2022-04-14T00:00Z").unwrap(), from);
/// assert!(parse_instant("invalid").is_err());
/// ```
pub fn parse_instant(input: &str) -> ParseResult<OffsetDateTime> {
    let input = input.trim();

    if let Ok(instant) = OffsetDateTime::parse(input, &Rfc3339) {
        return Ok(instant);
    }

    if let Ok(date) = Date::parse(input, format_description!("[year]-[month]-[day]")) {
        return Ok(date.midnight().assume_utc());
    }

    parse_date_time(input).ok_or_else(|| ParseError::InvalidInstant(input.to_string()))
}

fn parse_date_time(input: &str) -> Option<OffsetDateTime> {
    let (date, rest) = input.split_once(['T', 't', ' '])?;
    let date = Date::parse(date, format_description!("[year]-[month]-[day]")).ok()?;
    let (clock, offset) = split_zone(rest)?;

    let time = Time::parse(clock, format_description!("[hour]:[minute]:[second].[subsecond]"))
        .or_else(|_| Time::parse(clock, format_description!("[hour]:[minute]:[second]")))
        .or_else(|_| Time::parse(clock, format_description!("[hour]:[minute]")))
        .ok()?;

    Some(PrimitiveDateTime::new(date, time).assume_offset(offset))
}

/// Split a trailing zone designator off a time of day. No designator means UTC.
fn split_zone(input: &str) -> Option<(&str, UtcOffset)> {
    if let Some(clock) = input.strip_suffix(['Z', 'z']) {
        return Some((clock, UtcOffset::UTC));
    }

    let Some(at) = input.rfind(['+', '-']) else {
        return Some((input, UtcOffset::UTC));
    };

    let (clock, zone) = input.split_at(at);
    let offset = UtcOffset::parse(
        zone,
        format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
    )
    .or_else(|_| {
        UtcOffset::parse(
            zone,
            format_description!("[offset_hour sign:mandatory][offset_minute]"),
        )
    })
    .ok()?;

    Some((clock, offset))
}
