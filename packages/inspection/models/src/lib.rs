#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Violation code taxonomy, category flags and rendering modes.
//!
//! Inspection tables store violation classifications as small integers
//! (0-16). This crate holds the two fixed lookup tables that turn those
//! codes into display labels and map marker colors, plus the ordered set
//! of business category flag columns.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A health-inspection violation category, coded 0-16 in the source tables.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationCode {
    /// No violation found
    Pass = 0,
    /// Certified food protection manager missing or lapsed
    FoodProtectionManagement = 1,
    /// Food source and condition
    Food = 2,
    /// Time and temperature control for safety
    TimeTemperatureControl = 3,
    /// Contamination prevention
    FoodContamination = 4,
    /// Employee health and hygiene
    Personnel = 5,
    /// Equipment and utensils
    EquipmentUtensils = 6,
    /// Water supply
    Water = 7,
    /// Sewage disposal
    Sewage = 8,
    /// Plumbing
    Plumbing = 9,
    /// Toilet and handwashing facilities
    ToiletHandwashing = 10,
    /// Refuse disposal
    RefuseDisposal = 11,
    /// Insect, rodent and animal control
    InsectAnimalControl = 12,
    /// Physical facilities
    PhysicalFacilities = 13,
    /// Other operational issues
    OtherOperations = 14,
    /// Highly susceptible populations
    SusceptiblePopulations = 15,
    /// Anything not classified above
    Others = 16,
}

impl ViolationCode {
    /// Returns the numeric code stored in the inspection tables.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Creates a violation code from its stored integer value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not in the range 0-16.
    pub const fn from_value(value: i64) -> Result<Self, InvalidViolationCodeError> {
        Ok(match value {
            0 => Self::Pass,
            1 => Self::FoodProtectionManagement,
            2 => Self::Food,
            3 => Self::TimeTemperatureControl,
            4 => Self::FoodContamination,
            5 => Self::Personnel,
            6 => Self::EquipmentUtensils,
            7 => Self::Water,
            8 => Self::Sewage,
            9 => Self::Plumbing,
            10 => Self::ToiletHandwashing,
            11 => Self::RefuseDisposal,
            12 => Self::InsectAnimalControl,
            13 => Self::PhysicalFacilities,
            14 => Self::OtherOperations,
            15 => Self::SusceptiblePopulations,
            16 => Self::Others,
            _ => return Err(InvalidViolationCodeError { value }),
        })
    }

    /// Human-readable label shown in the restaurant list.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pass => "Pass",
            Self::FoodProtectionManagement => "Food Protection Management",
            Self::Food => "Food",
            Self::TimeTemperatureControl => "Time & Temperature Ctrl",
            Self::FoodContamination => "FoodContamination",
            Self::Personnel => "Personnel",
            Self::EquipmentUtensils => "Equipment and Utensils",
            Self::Water => "Water",
            Self::Sewage => "Sewage",
            Self::Plumbing => "Plumbing",
            Self::ToiletHandwashing => "Toilet/Handwashing",
            Self::RefuseDisposal => "Refuse Disposal",
            Self::InsectAnimalControl => "Insect/Animal Ctrl",
            Self::PhysicalFacilities => "Physical Facilities",
            Self::OtherOperations => "Other Operations",
            Self::SusceptiblePopulations => "Susceptible Populations",
            Self::Others => "Others",
        }
    }

    /// Hex marker color used when styling the map.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Pass => "#1a9850",
            Self::FoodProtectionManagement => "#fdae61",
            Self::Food => "#f46d43",
            Self::TimeTemperatureControl => "#d73027",
            Self::FoodContamination => "#a50026",
            Self::Personnel => "#fee08b",
            Self::EquipmentUtensils => "#e6f598",
            Self::Water => "#3288bd",
            Self::Sewage => "#5e4fa2",
            Self::Plumbing => "#66c2a5",
            Self::ToiletHandwashing => "#abdda4",
            Self::RefuseDisposal => "#8c510a",
            Self::InsectAnimalControl => "#c51b7d",
            Self::PhysicalFacilities => "#7f7f7f",
            Self::OtherOperations => "#bababa",
            Self::SusceptiblePopulations => "#762a83",
            Self::Others => "#404040",
        }
    }

    /// Returns all variants of this enum, ordered by code.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Pass,
            Self::FoodProtectionManagement,
            Self::Food,
            Self::TimeTemperatureControl,
            Self::FoodContamination,
            Self::Personnel,
            Self::EquipmentUtensils,
            Self::Water,
            Self::Sewage,
            Self::Plumbing,
            Self::ToiletHandwashing,
            Self::RefuseDisposal,
            Self::InsectAnimalControl,
            Self::PhysicalFacilities,
            Self::OtherOperations,
            Self::SusceptiblePopulations,
            Self::Others,
        ]
    }
}

/// Error returned when attempting to create a [`ViolationCode`] from an
/// integer outside 0-16.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidViolationCodeError {
    /// The out-of-range value that was provided.
    pub value: i64,
}

impl std::fmt::Display for InvalidViolationCodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid violation code {}: expected 0-16", self.value)
    }
}

impl std::error::Error for InvalidViolationCodeError {}

/// Business category flag columns trailing every inspection row.
///
/// Declaration order is the column order in the tables and the order in
/// which set flags appear in the derived `Category` label.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CategoryFlag {
    Arts,
    Food,
    Nightlife,
    HotelsTravel,
    Restaurants,
    EventServices,
}

impl CategoryFlag {
    /// Returns all flags in column order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Arts,
            Self::Food,
            Self::Nightlife,
            Self::HotelsTravel,
            Self::Restaurants,
            Self::EventServices,
        ]
    }
}

/// How coded violation columns are rendered for the display layer.
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RenderMode {
    /// Codes are left as stored.
    Raw,
    /// Codes become [`ViolationCode::label`] strings.
    #[default]
    Text,
    /// Codes become [`ViolationCode::color`] hex strings.
    Color,
}

/// Centroid used to initialize the map view for a result set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapCenter {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
    /// `true` when no coordinates were available and the configured
    /// default center was used instead.
    pub fallback: bool,
}

impl MapCenter {
    /// Downtown Boston, where the inspection dataset was collected.
    pub const BOSTON: Self = Self::fallback(42.3598, -71.0851);

    /// Creates a center computed from actual coordinates.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            fallback: false,
        }
    }

    /// Creates a default center to use when no coordinates are available.
    #[must_use]
    pub const fn fallback(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            fallback: true,
        }
    }
}
