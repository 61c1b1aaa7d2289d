//! HTTP ingestion and query service for telemetry readings.
//!
//! This crate provides a service that:
//! - Accepts plain-text readings (`"<timestamp> <name> <value>"` per line)
//! - Keeps them in an in-memory store, last write wins per timestamp and metric
//! - Answers range queries with the raw readings plus daily average power
//!
//! # REST API Endpoints
//!
//! - `POST /data` - Ingest readings, responds `{"success": bool}`
//! - `GET /data?from=<date>&to=<date>` - Readings and daily power in range
//!
//! # Configuration
//!
//! The service reads configuration from `~/.config/telemetry/server.toml`:
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:3000"
//! max_body_bytes = 102400
//!
//! [security]
//! headers = true
//! ```
//!
//! The `PORT` environment variable (or `--port`) overrides the port of
//! `server.bind`.

pub mod api;
pub mod config;
pub mod middleware;
pub mod state;

pub use config::{Config, ConfigError, SecurityConfig, ServerConfig};
pub use state::AppState;
