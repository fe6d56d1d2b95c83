//! View-model shaping for the display layer.
//!
//! Each rendering variant is delivered twice: as a list of records in query
//! order, and as a column-keyed table (`column -> row index -> value`) for
//! client-side scripting. The two forms always agree cell for cell.

use std::collections::BTreeMap;

use food_map_database_models::{InspectionTable, RawRow};
use food_map_inspection_models::{MapCenter, RenderMode};
use serde::Serialize;

use crate::aggregate::map_center;
use crate::mapper::map_rows;
use crate::{DecodeError, MappedRecord};

/// Column-keyed table: column name to (row index to value). Row indices are
/// decimal strings so the table serializes to a plain JSON object.
pub type Table = BTreeMap<String, BTreeMap<String, String>>;

/// Transposes records into a column-keyed [`Table`].
#[must_use]
pub fn to_table(records: &[MappedRecord]) -> Table {
    let mut table = Table::new();
    for (i, record) in records.iter().enumerate() {
        let index = i.to_string();
        for (column, value) in record {
            table
                .entry(column.clone())
                .or_default()
                .insert(index.clone(), value.clone());
        }
    }
    table
}

/// One rendering variant of a result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedSet {
    /// How coded columns were rendered.
    pub mode: RenderMode,
    /// Records in query order.
    pub records: Vec<MappedRecord>,
    /// The same records, transposed.
    pub table: Table,
}

impl RenderedSet {
    /// Renders `rows` of `table` in `mode`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if any row fails to map.
    pub fn new(
        table: InspectionTable,
        rows: &[RawRow],
        mode: RenderMode,
    ) -> Result<Self, DecodeError> {
        let records = map_rows(table, rows, mode)?;
        let table = to_table(&records);
        Ok(Self {
            mode,
            records,
            table,
        })
    }
}

/// Everything a map/list page needs for one result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionView {
    /// Number of rows returned by the query.
    pub count: usize,
    /// `true` when the query matched nothing.
    pub empty: bool,
    /// Initial map center.
    pub center: MapCenter,
    /// One entry per requested rendering mode, in request order.
    pub sets: Vec<RenderedSet>,
}

/// Builds the view for a result set in each of `modes`.
///
/// # Errors
///
/// Returns [`DecodeError`] if any row fails to map in any mode.
pub fn render(
    table: InspectionTable,
    rows: &[RawRow],
    modes: &[RenderMode],
    default_center: MapCenter,
) -> Result<InspectionView, DecodeError> {
    let sets = modes
        .iter()
        .map(|mode| RenderedSet::new(table, rows, *mode))
        .collect::<Result<Vec<_>, _>>()?;

    // Coordinates are never decoded, so any variant can be averaged.
    let center = match sets.first() {
        Some(set) => map_center(&set.records, default_center),
        None => map_center(&map_rows(table, rows, RenderMode::Raw)?, default_center),
    };

    Ok(InspectionView {
        count: rows.len(),
        empty: rows.is_empty(),
        center,
        sets,
    })
}

#[cfg(test)]
mod tests {
    use food_map_database_models::RawValue;

    use super::*;

    fn row(index: i64, name: &str, zip: &str, vio_type: i64, lat: f64, lng: f64) -> RawRow {
        let mut values = vec![
            RawValue::Int(index),
            RawValue::Text(name.to_string()),
            RawValue::Real(1.0),
            RawValue::Int(vio_type),
            RawValue::Real(2.0),
            RawValue::Int(vio_type),
            RawValue::Real(4.0),
            RawValue::Real(500_000.0),
            RawValue::Text(zip.to_string()),
            RawValue::Real(lng),
            RawValue::Real(lat),
        ];
        values.extend([1, 0, 0, 0, 1, 0].map(RawValue::Int));
        RawRow::new(values)
    }

    fn rows() -> Vec<RawRow> {
        vec![
            row(3, "Mike's Pastry", "02113", 4, 42.3638, -71.0544),
            row(9, "Neptune Oyster", "02113", 0, 42.3632, -71.0554),
            row(12, "Regina Pizzeria", "02113", 13, 42.3653, -71.0568),
        ]
    }

    #[test]
    fn table_agrees_with_records() {
        let set = RenderedSet::new(InspectionTable::SingleInsp, &rows(), RenderMode::Text).unwrap();

        for (i, record) in set.records.iter().enumerate() {
            for (column, value) in record {
                assert_eq!(&set.table[column][&i.to_string()], value, "{column} row {i}");
            }
        }
        for column in set.table.values() {
            assert_eq!(column.len(), set.records.len());
        }
    }

    #[test]
    fn table_serializes_column_then_row_index() {
        let set = RenderedSet::new(InspectionTable::SingleInsp, &rows(), RenderMode::Text).unwrap();
        let json = serde_json::to_value(&set.table).unwrap();

        assert_eq!(json["Name"]["0"], "Mike's Pastry");
        assert_eq!(json["Name"]["2"], "Regina Pizzeria");
        assert_eq!(json["VioType"]["1"], "Pass");
        assert_eq!(json["Category"]["0"], "arts, restaurants, ");
    }

    #[test]
    fn records_keep_query_order() {
        let set = RenderedSet::new(InspectionTable::SingleInsp, &rows(), RenderMode::Raw).unwrap();
        let indices: Vec<&str> = set.records.iter().map(|r| r["Index"].as_str()).collect();
        assert_eq!(indices, ["3", "9", "12"]);
    }

    #[test]
    fn renders_each_requested_mode() {
        let view = render(
            InspectionTable::SingleInsp,
            &rows(),
            &[RenderMode::Text, RenderMode::Color],
            MapCenter::BOSTON,
        )
        .unwrap();

        assert_eq!(view.count, 3);
        assert!(!view.empty);
        assert_eq!(view.sets.len(), 2);
        assert_eq!(view.sets[0].records[2]["VioType"], "Physical Facilities");
        assert_eq!(view.sets[1].records[2]["VioType"], "#7f7f7f");
        assert!(!view.center.fallback);
        assert!((view.center.lat - 42.3641).abs() < 1e-9);
    }

    #[test]
    fn empty_result_has_defined_state() {
        let view = render(
            InspectionTable::SingleInsp,
            &[],
            &[RenderMode::Text],
            MapCenter::BOSTON,
        )
        .unwrap();

        assert_eq!(view.count, 0);
        assert!(view.empty);
        assert!(view.center.fallback);
        assert!(view.sets[0].records.is_empty());
        assert!(view.sets[0].table.is_empty());
    }

    #[test]
    fn decode_failure_surfaces() {
        let bad = vec![row(1, "Bad Data Cafe", "02113", 17, 42.0, -71.0)];
        let err = render(
            InspectionTable::SingleInsp,
            &bad,
            &[RenderMode::Color],
            MapCenter::BOSTON,
        )
        .unwrap_err();
        assert!(matches!(err, DecodeError::OutOfRange { .. }));
    }
}
