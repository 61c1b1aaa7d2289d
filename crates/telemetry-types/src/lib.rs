//! Types and plain-text parsing for the telemetry service.
//!
//! This crate provides the shared value types used by the store and the HTTP
//! service, plus the line format readings are ingested in.
//!
//! # Features
//!
//! - [`Reading`] and derived [`PowerSample`] values
//! - The [`Metric`] names the power calculation understands
//! - Line and batch parsing with all-or-nothing structural validation
//! - Query bound parsing for dates and RFC 3339 instants
//!
//! # Example
//!
//! ```
//! use telemetry_types::{Reading, parse_batch};
//!
//! let batch = parse_batch("1649941817 Voltage 1.34\n1649941818 Current 12.0")?;
//! assert_eq!(batch.readings[0], Reading::new(1649941817, "Voltage", 1.34));
//! # Ok::<(), telemetry_types::ParseError>(())
//! ```

pub mod error;
pub mod parse;
pub mod types;

pub use error::{ParseError, ParseResult};
pub use parse::{Batch, FIELDS_PER_LINE, parse_batch, parse_instant, parse_line};
pub use types::{Metric, PowerSample, Reading, composite_key};
