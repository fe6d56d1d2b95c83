#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Raw row types, table layouts and query parameter definitions.
//!
//! These types represent data as retrieved from the inspection database,
//! before any decoding. They are distinct from the mapped records produced
//! by `food_map_inspection` and the API types in `food_map_server_models`.

use std::fmt;

use food_map_inspection_models::CategoryFlag;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A single cell value as returned by the database driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Null,
    Int(i64),
    Real(f64),
    Text(String),
    Bool(bool),
}

impl RawValue {
    /// Numeric view of the value. Text is accepted when it parses as a
    /// number (tables exported from spreadsheets store codes as `"3.0"`).
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Null => None,
            #[allow(clippy::cast_precision_loss)]
            Self::Int(v) => Some(*v as f64),
            Self::Real(v) => Some(*v),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        }
    }

    /// Whether the value compares equal to integer `1`.
    ///
    /// Text is never equal to an integer, so a flag stored as `"1"` is not
    /// set.
    #[must_use]
    pub fn is_one(&self) -> bool {
        match self {
            Self::Int(v) => *v == 1,
            #[allow(clippy::float_cmp)]
            Self::Real(v) => *v == 1.0,
            Self::Bool(b) => *b,
            Self::Null | Self::Text(_) => false,
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Int(v) => write!(f, "{v}"),
            Self::Real(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:.1}"),
            Self::Real(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// One positional row. Values appear in [`InspectionTable::select_columns`]
/// order for inspection queries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    /// Cell values in column order.
    pub values: Vec<RawValue>,
}

impl RawRow {
    #[must_use]
    pub const fn new(values: Vec<RawValue>) -> Self {
        Self { values }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Inspection tables the application knows how to read.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum InspectionTable {
    /// One row per restaurant, latest inspection only.
    #[default]
    #[strum(serialize = "singleInsp")]
    #[serde(rename = "singleInsp")]
    SingleInsp,
    /// Oversampled training table, which also carries the street address.
    #[strum(serialize = "smote")]
    #[serde(rename = "smote")]
    Smote,
}

/// Field columns of `singleInsp`, before the category flags.
const SINGLE_INSP_COLUMNS: &[&str] = &[
    "Index",
    "Name",
    "VioLevel",
    "VioType",
    "VioLevel_pred",
    "VioType_pred",
    "Rating",
    "PropValue",
    "Zip",
    "locLong",
    "locLati",
];

/// Field columns of `smote`, before the category flags.
const SMOTE_COLUMNS: &[&str] = &[
    "Index",
    "Name",
    "VioLevel",
    "VioType",
    "VioLevel_pred",
    "VioType_pred",
    "Rating",
    "PropValue",
    "Address",
    "Zip",
    "locLong",
    "locLati",
];

impl InspectionTable {
    /// Table name as it appears in the database.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SingleInsp => "singleInsp",
            Self::Smote => "smote",
        }
    }

    /// Named field columns, excluding the trailing category flags.
    #[must_use]
    pub const fn field_columns(self) -> &'static [&'static str] {
        match self {
            Self::SingleInsp => SINGLE_INSP_COLUMNS,
            Self::Smote => SMOTE_COLUMNS,
        }
    }

    /// Every selected column: field columns followed by one column per
    /// [`CategoryFlag`].
    #[must_use]
    pub fn select_columns(self) -> Vec<String> {
        self.field_columns()
            .iter()
            .map(|c| (*c).to_string())
            .chain(CategoryFlag::all().iter().map(ToString::to_string))
            .collect()
    }

    /// Number of values in a row of this table.
    #[must_use]
    pub const fn arity(self) -> usize {
        self.field_columns().len() + CategoryFlag::all().len()
    }
}

/// Parameters for querying inspection rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionQuery {
    /// Table to read from.
    pub table: InspectionTable,
    /// Postal code filter (`None` = every row).
    pub zip: Option<String>,
}

/// A row from the legacy `City` demo table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityRow {
    /// City name.
    pub name: String,
    /// Three-letter country code.
    pub country_code: String,
    /// Population.
    pub population: i64,
}
