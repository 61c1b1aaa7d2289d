//! Core types for telemetry readings.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

/// Metrics the service knows how to aggregate.
///
/// Readings may carry any name; only these are recognised by the daily power
/// calculation. Names are matched exactly and case-sensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Metric {
    /// Electrical current.
    Current,
    /// Electrical voltage.
    Voltage,
    /// Derived daily power (average voltage times average current).
    Power,
}

impl Metric {
    /// The wire name of this metric.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Metric::Current => "Current",
            Metric::Voltage => "Voltage",
            Metric::Power => "Power",
        }
    }

    /// Look up a metric by its exact wire name.
    ///
    /// # Examples
    ///
    /// ```
    /// use telemetry_types::Metric;
    ///
    /// assert_eq!(Metric::from_name("Voltage"), Some(Metric::Voltage));
    /// assert_eq!(Metric::from_name("voltage"), None);
    /// assert_eq!(Metric::from_name("Temperature"), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Current" => Some(Metric::Current),
            "Voltage" => Some(Metric::Voltage),
            "Power" => Some(Metric::Power),
            _ => None,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the composite store key for a timestamp and metric name.
///
/// The key is `"<timestamp>-<name>"` with the timestamp in canonical decimal
/// form, so every writer and reader derives the same string.
///
/// ```
/// assert_eq!(telemetry_types::composite_key(1649941817, "Voltage"), "1649941817-Voltage");
/// ```
#[must_use]
pub fn composite_key(timestamp: i64, name: &str) -> String {
    format!("{timestamp}-{name}")
}

/// A single observed measurement.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Reading {
    /// Unix timestamp in seconds.
    pub timestamp: i64,
    /// Metric name, e.g. `Voltage` or `Current`.
    pub name: String,
    /// Measured value.
    pub value: f64,
}

impl Reading {
    /// Create a new reading.
    pub fn new(timestamp: i64, name: impl Into<String>, value: f64) -> Self {
        Self {
            timestamp,
            name: name.into(),
            value,
        }
    }

    /// The composite key this reading is stored under.
    #[must_use]
    pub fn key(&self) -> String {
        composite_key(self.timestamp, &self.name)
    }

    /// The reading's timestamp as an instant.
    ///
    /// Returns `None` when the timestamp lies outside the representable range,
    /// in which case the reading never matches a time range.
    #[must_use]
    pub fn instant(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::from_unix_timestamp(self.timestamp).ok()
    }

    /// The recognised metric for this reading, if any.
    #[must_use]
    pub fn metric(&self) -> Option<Metric> {
        Metric::from_name(&self.name)
    }
}

/// Derived daily power value.
///
/// Serializes as `{"name": "Power", "time": "2022-04-14T00:00:00.000Z", "value": ...}`.
/// A NaN value (a day missing either voltage or current) serializes as `null`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PowerSample {
    /// Always [`Metric::Power`].
    pub name: Metric,
    /// Midnight UTC of the day this sample covers.
    #[cfg_attr(feature = "serde", serde(serialize_with = "day_start::serialize"))]
    pub time: OffsetDateTime,
    /// Average voltage multiplied by average current.
    pub value: f64,
}

impl PowerSample {
    /// Create a power sample for the given UTC calendar day.
    #[must_use]
    pub fn new(day: Date, value: f64) -> Self {
        Self {
            name: Metric::Power,
            time: day.midnight().assume_utc(),
            value,
        }
    }

    /// The UTC calendar day this sample covers.
    #[must_use]
    pub fn day(&self) -> Date {
        self.time.date()
    }
}

/// Millisecond-precision ISO 8601 timestamps with a literal `Z` designator.
#[cfg(feature = "serde")]
pub mod day_start {
    use serde::{Serializer, ser::Error as _};
    use time::macros::format_description;
    use time::{OffsetDateTime, UtcOffset};

    pub fn serialize<S: Serializer>(time: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        let formatted = time
            .to_offset(UtcOffset::UTC)
            .format(format_description!(
                "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
            ))
            .map_err(S::Error::custom)?;
        serializer.serialize_str(&formatted)
    }
}
