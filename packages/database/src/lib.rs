#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Database connection, configuration and queries for the food map.
//!
//! Uses `switchy_database` so the same read-only queries run against the
//! production `Postgres` database and a local `SQLite` file. Every filter
//! value is bound with `query_raw_params()`; nothing user-supplied is ever
//! spliced into SQL text.

pub mod db;
#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;
pub mod queries;

/// Errors that can occur during database operations.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// The database could not be reached or the connection was refused.
    #[error("Connection error: {message}")]
    Connection {
        /// Description of what went wrong.
        message: String,
    },

    /// Database query error.
    #[error("Database error: {0}")]
    Database(#[from] switchy_database::DatabaseError),

    /// The query did not finish within the configured timeout.
    #[error("Query timed out after {seconds}s")]
    Timeout {
        /// Configured timeout in seconds.
        seconds: u64,
    },

    /// Data conversion error.
    #[error("Data conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}
