//! In-memory storage for telemetry readings.
//!
//! This crate keeps readings in a map keyed by `"<timestamp>-<name>"` and
//! answers the two queries the service needs: raw readings in an inclusive
//! time range, and per-day average power over the same range.
//!
//! # Features
//!
//! - Last-write-wins upserts per timestamp and metric
//! - Inclusive range queries via [`ReadingQuery`]
//! - Daily power aggregation bucketed by UTC calendar day
//!
//! # Example
//!
//! ```
//! use telemetry_store::{ReadingQuery, Store};
//! use telemetry_types::Reading;
//! use time::macros::datetime;
//!
//! let mut store = Store::new();
//! store.insert(Reading::new(1649941817, "Voltage", 1.34));
//! store.insert(Reading::new(1649941818, "Current", 12.0));
//!
//! let query = ReadingQuery::range(
//!     datetime!(2022-04-14 00:00 UTC),
//!     datetime!(2022-04-15 00:00 UTC),
//! );
//! assert_eq!(store.query_readings(&query).len(), 2);
//! assert_eq!(store.daily_power(&query).len(), 1);
//! ```

pub mod power;
mod queries;
mod store;

pub use power::{Accumulator, DailyTotals, daily_power};
pub use queries::ReadingQuery;
pub use store::Store;
