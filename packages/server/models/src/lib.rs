#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the food map server.
//!
//! These types are serialized to JSON for the map and list pages. They are
//! separate from the raw database rows and the view shaping in
//! `food_map_inspection` so the page contract can evolve on its own.

use food_map_database_models::{CityRow, InspectionTable};
use food_map_inspection::present::InspectionView;
use food_map_inspection_models::{RenderMode, ViolationCode};
use serde::{Deserialize, Serialize};

/// Query parameters for the `/input` and `/output` views.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InspectionQueryParams {
    /// Postal code typed into the search box.
    #[serde(rename = "ID")]
    pub zip: Option<String>,
    /// Render only this variant instead of text and color.
    pub mode: Option<RenderMode>,
}

impl InspectionQueryParams {
    /// The postal code, trimmed, or `None` when absent or blank.
    #[must_use]
    pub fn zip(&self) -> Option<String> {
        self.zip
            .as_deref()
            .map(str::trim)
            .filter(|z| !z.is_empty())
            .map(ToString::to_string)
    }

    /// Rendering variants to produce, in response order.
    #[must_use]
    pub fn modes(&self) -> Vec<RenderMode> {
        self.mode
            .map_or_else(|| vec![RenderMode::Text, RenderMode::Color], |m| vec![m])
    }
}

/// Inspection results for one search, as returned to the page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiInspectionView {
    /// Table the rows were read from.
    pub source: InspectionTable,
    /// Postal code filter, if any.
    pub zip: Option<String>,
    /// Text to show instead of the list when nothing matched.
    pub message: Option<String>,
    /// Records, tables and map center.
    #[serde(flatten)]
    pub view: InspectionView,
}

impl ApiInspectionView {
    /// Wraps a rendered view, adding the "no results" message when empty.
    #[must_use]
    pub fn new(source: InspectionTable, zip: Option<String>, view: InspectionView) -> Self {
        let message = view.empty.then(|| {
            zip.as_deref().map_or_else(
                || "No restaurants found".to_string(),
                |zip| format!("No restaurants found in {zip}"),
            )
        });
        Self {
            source,
            zip,
            message,
            view,
        }
    }
}

/// A violation code with its display forms.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiViolation {
    /// Stored integer code.
    pub code: u8,
    /// Enum name.
    pub name: ViolationCode,
    /// List label.
    pub label: &'static str,
    /// Marker color.
    pub color: &'static str,
}

impl From<ViolationCode> for ApiViolation {
    fn from(code: ViolationCode) -> Self {
        Self {
            code: code.value(),
            name: code,
            label: code.label(),
            color: code.color(),
        }
    }
}

/// A city in the legacy demo listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiCity {
    /// City name.
    pub name: String,
    /// Country code.
    pub country: String,
    /// Population.
    pub population: i64,
}

impl From<CityRow> for ApiCity {
    fn from(row: CityRow) -> Self {
        Self {
            name: row.name,
            country: row.country_code,
            population: row.population,
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

#[cfg(test)]
mod tests {
    use food_map_inspection_models::MapCenter;

    use super::*;

    fn empty_view() -> InspectionView {
        InspectionView {
            count: 0,
            empty: true,
            center: MapCenter::BOSTON,
            sets: Vec::new(),
        }
    }

    #[test]
    fn blank_zip_is_no_filter() {
        let params = InspectionQueryParams {
            zip: Some("  ".to_string()),
            mode: None,
        };
        assert_eq!(params.zip(), None);
        assert_eq!(params.modes(), [RenderMode::Text, RenderMode::Color]);
    }

    #[test]
    fn explicit_mode_renders_one_variant() {
        let params = InspectionQueryParams {
            zip: Some(" 02115 ".to_string()),
            mode: Some(RenderMode::Raw),
        };
        assert_eq!(params.zip().as_deref(), Some("02115"));
        assert_eq!(params.modes(), [RenderMode::Raw]);
    }

    #[test]
    fn empty_view_gets_message() {
        let api = ApiInspectionView::new(
            InspectionTable::SingleInsp,
            Some("02115".to_string()),
            empty_view(),
        );
        assert_eq!(api.message.as_deref(), Some("No restaurants found in 02115"));

        let json = serde_json::to_value(&api).unwrap();
        assert_eq!(json["source"], "singleInsp");
        assert_eq!(json["count"], 0);
        assert_eq!(json["empty"], true);
        assert_eq!(json["center"]["fallback"], true);
    }

    #[test]
    fn violation_carries_label_and_color() {
        let json = serde_json::to_value(ApiViolation::from(ViolationCode::Water)).unwrap();
        assert_eq!(json["code"], 7);
        assert_eq!(json["name"], "WATER");
        assert_eq!(json["label"], "Water");
        assert_eq!(json["color"], ViolationCode::Water.color());
    }
}
