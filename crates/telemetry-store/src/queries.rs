//! Query builder for stored readings.
//!
//! [`ReadingQuery`] describes which readings a range query or a power
//! aggregation should consider. Both bounds are inclusive, and both
//! [`Store::query_readings`](crate::Store::query_readings) and
//! [`Store::daily_power`](crate::Store::daily_power) use the same
//! [`ReadingQuery::matches`] predicate, so raw output and power buckets always
//! agree on membership.
//!
//! # Example
//!
//! ```
//! use telemetry_store::{ReadingQuery, Store};
//! use time::macros::datetime;
//!
//! let store = Store::new();
//!
//! let query = ReadingQuery::new()
//!     .since(datetime!(2022-04-14 00:00 UTC))
//!     .until(datetime!(2022-04-15 00:00 UTC));
//!
//! assert!(store.query_readings(&query).is_empty());
//! ```

use telemetry_types::Reading;
use time::OffsetDateTime;

/// Fluent query builder for readings.
///
/// All filters are optional. A query with no filters matches every reading
/// whose timestamp is representable as an instant.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReadingQuery {
    /// Include only readings at or after this instant.
    pub since: Option<OffsetDateTime>,
    /// Include only readings at or before this instant.
    pub until: Option<OffsetDateTime>,
}

impl ReadingQuery {
    /// Create a query that matches everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an inclusive `[from, to]` range query.
    pub fn range(from: OffsetDateTime, to: OffsetDateTime) -> Self {
        Self::new().since(from).until(to)
    }

    /// Filter to readings captured at or after this time.
    pub fn since(mut self, time: OffsetDateTime) -> Self {
        self.since = Some(time);
        self
    }

    /// Filter to readings captured at or before this time.
    pub fn until(mut self, time: OffsetDateTime) -> Self {
        self.until = Some(time);
        self
    }

    /// Whether `reading` falls inside this query.
    ///
    /// Readings whose timestamp cannot be represented as an instant never match.
    pub fn matches(&self, reading: &Reading) -> bool {
        let Some(instant) = reading.instant() else {
            return false;
        };

        self.since.is_none_or(|since| instant >= since)
            && self.until.is_none_or(|until| instant <= until)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_reading_query_new_defaults() {
        let query = ReadingQuery::new();
        assert!(query.since.is_none());
        assert!(query.until.is_none());
    }

    #[test]
    fn test_reading_query_builder_chain() {
        let from = datetime!(2022-04-14 00:00 UTC);
        let to = datetime!(2022-04-15 00:00 UTC);

        let query = ReadingQuery::new().since(from).until(to);
        assert_eq!(query.since, Some(from));
        assert_eq!(query.until, Some(to));

        assert_eq!(ReadingQuery::range(from, to), ReadingQuery::new().since(from).until(to));
    }

    #[test]
    fn test_matches_bounds_are_inclusive() {
        let query = ReadingQuery::range(
            OffsetDateTime::from_unix_timestamp(100).unwrap(),
            OffsetDateTime::from_unix_timestamp(200).unwrap(),
        );

        assert!(!query.matches(&Reading::new(99, "Voltage", 1.0)));
        assert!(query.matches(&Reading::new(100, "Voltage", 1.0)));
        assert!(query.matches(&Reading::new(150, "Voltage", 1.0)));
        assert!(query.matches(&Reading::new(200, "Voltage", 1.0)));
        assert!(!query.matches(&Reading::new(201, "Voltage", 1.0)));
    }

    #[test]
    fn test_matches_sub_second_bounds() {
        // A bound half a second after the reading excludes it.
        let query = ReadingQuery::new().since(datetime!(1970-01-01 00:01:40.5 UTC));
        assert!(!query.matches(&Reading::new(100, "Voltage", 1.0)));
        assert!(query.matches(&Reading::new(101, "Voltage", 1.0)));
    }

    #[test]
    fn test_matches_inverted_range_is_empty() {
        let query = ReadingQuery::range(
            datetime!(2022-04-15 00:00 UTC),
            datetime!(2022-04-14 00:00 UTC),
        );
        assert!(!query.matches(&Reading::new(1649941817, "Voltage", 1.0)));
    }

    #[test]
    fn test_matches_unrepresentable_timestamp() {
        assert!(!ReadingQuery::new().matches(&Reading::new(i64::MAX, "Voltage", 1.0)));
    }
}
