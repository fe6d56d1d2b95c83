#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Turns raw inspection rows into what the map and list views display.
//!
//! - [`mapper`] names each positional row, decodes violation codes to
//!   labels or colors, and folds the category flag columns into one
//!   `Category` string.
//! - [`aggregate`] computes the map center of a result set.
//! - [`present`] bundles the mapped rows with their column-keyed table form.

pub mod aggregate;
pub mod mapper;
pub mod present;

use std::collections::BTreeMap;

use food_map_inspection_models::InvalidViolationCodeError;

/// One mapped inspection row: column name to display value.
pub type MappedRecord = BTreeMap<String, String>;

/// Errors raised while decoding a raw inspection row.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The row does not have the table's column count.
    #[error("Row has {actual} values, expected {expected}")]
    Arity {
        /// Column count of the table layout.
        expected: usize,
        /// Values actually present in the row.
        actual: usize,
    },

    /// A violation code column held something that is not a number.
    #[error("Column {column} holds non-numeric violation code {value:?}")]
    NotNumeric {
        /// Column name.
        column: String,
        /// The offending value as displayed.
        value: String,
    },

    /// A violation code column held a number outside 0-16.
    #[error("Column {column}: {source}")]
    OutOfRange {
        /// Column name.
        column: String,
        /// The underlying lookup failure.
        source: InvalidViolationCodeError,
    },
}
