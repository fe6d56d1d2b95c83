//! Positional row to named record mapping.

use food_map_database_models::{InspectionTable, RawRow, RawValue};
use food_map_inspection_models::{CategoryFlag, RenderMode, ViolationCode};

use crate::{DecodeError, MappedRecord};

/// Name of the derived category column.
pub const CATEGORY_COLUMN: &str = "Category";

/// Appended after every set flag, including the last one.
pub const CATEGORY_SEPARATOR: &str = ", ";

/// Columns holding violation codes that are decoded for display.
pub const CODED_COLUMNS: &[&str] = &["VioType", "VioType_pred"];

/// Parses a stored violation code. The value is read as a float and
/// truncated toward zero, so `"4.0"`, `4.7` and `4` all give code 4.
///
/// # Errors
///
/// Returns [`DecodeError::NotNumeric`] for non-numeric values and
/// [`DecodeError::OutOfRange`] for codes outside 0-16.
pub fn parse_code(column: &str, value: &RawValue) -> Result<ViolationCode, DecodeError> {
    let Some(number) = value.as_f64().filter(|n| n.is_finite()) else {
        return Err(DecodeError::NotNumeric {
            column: column.to_string(),
            value: value.to_string(),
        });
    };

    #[allow(clippy::cast_possible_truncation)]
    let code = number.trunc() as i64;

    ViolationCode::from_value(code).map_err(|source| DecodeError::OutOfRange {
        column: column.to_string(),
        source,
    })
}

/// Renders a coded value for the given mode.
///
/// # Errors
///
/// Returns [`DecodeError`] if the mode needs a lookup and the value is not
/// a valid code. [`RenderMode::Raw`] never fails.
pub fn decode(column: &str, value: &RawValue, mode: RenderMode) -> Result<String, DecodeError> {
    match mode {
        RenderMode::Raw => Ok(value.to_string()),
        RenderMode::Text => parse_code(column, value).map(|code| code.label().to_string()),
        RenderMode::Color => parse_code(column, value).map(|code| code.color().to_string()),
    }
}

/// Builds the category label from the flag columns, in [`CategoryFlag`]
/// order. Every set flag is followed by [`CATEGORY_SEPARATOR`], so
/// `[1, 0, 1, 0, 0, 0]` gives `"arts, nightlife, "`.
#[must_use]
pub fn category_label(flags: &[RawValue]) -> String {
    CategoryFlag::all()
        .iter()
        .zip(flags)
        .filter(|(_, value)| value.is_one())
        .fold(String::new(), |mut label, (flag, _)| {
            label.push_str(flag.as_ref());
            label.push_str(CATEGORY_SEPARATOR);
            label
        })
}

/// Maps one row of `table` to a named record.
///
/// # Errors
///
/// Returns [`DecodeError`] if the row has the wrong arity or a coded
/// column cannot be decoded in `mode`.
pub fn map_row(
    table: InspectionTable,
    row: &RawRow,
    mode: RenderMode,
) -> Result<MappedRecord, DecodeError> {
    if row.len() != table.arity() {
        return Err(DecodeError::Arity {
            expected: table.arity(),
            actual: row.len(),
        });
    }

    let columns = table.field_columns();
    let (fields, flags) = row.values.split_at(columns.len());

    let mut record = MappedRecord::new();
    for (column, value) in columns.iter().zip(fields) {
        let display = if CODED_COLUMNS.contains(column) {
            decode(column, value, mode)?
        } else {
            value.to_string()
        };
        record.insert((*column).to_string(), display);
    }
    record.insert(CATEGORY_COLUMN.to_string(), category_label(flags));

    Ok(record)
}

/// Maps every row, keeping query order. Fails on the first bad row.
///
/// # Errors
///
/// Returns the first [`DecodeError`] encountered.
pub fn map_rows(
    table: InspectionTable,
    rows: &[RawRow],
    mode: RenderMode,
) -> Result<Vec<MappedRecord>, DecodeError> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            map_row(table, row, mode).inspect_err(|e| {
                log::error!("Failed to decode {table} row {i} in {mode} mode: {e}");
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(bits: [i64; 6]) -> Vec<RawValue> {
        bits.into_iter().map(RawValue::Int).collect()
    }

    fn single_insp_row(vio_type: RawValue, vio_type_pred: RawValue) -> RawRow {
        let mut values = vec![
            RawValue::Int(7),
            RawValue::Text("Tasty Burger".to_string()),
            RawValue::Real(2.0),
            vio_type,
            RawValue::Real(3.0),
            vio_type_pred,
            RawValue::Real(3.5),
            RawValue::Real(455_000.0),
            RawValue::Text("02115".to_string()),
            RawValue::Real(-71.0972),
            RawValue::Real(42.3467),
        ];
        values.extend(flags([0, 1, 1, 0, 1, 0]));
        RawRow::new(values)
    }

    #[test]
    fn every_code_decodes_in_text_and_color_mode() {
        for code in ViolationCode::all() {
            let value = RawValue::Int(i64::from(code.value()));
            assert_eq!(
                decode("VioType", &value, RenderMode::Text).unwrap(),
                code.label()
            );
            assert_eq!(
                decode("VioType", &value, RenderMode::Color).unwrap(),
                code.color()
            );
        }
    }

    #[test]
    fn codes_outside_table_fail() {
        for value in [RawValue::Int(17), RawValue::Int(-1), RawValue::Real(99.0)] {
            let err = decode("VioType_pred", &value, RenderMode::Text).unwrap_err();
            assert!(
                matches!(err, DecodeError::OutOfRange { ref column, .. } if column == "VioType_pred"),
                "{err:?}"
            );
        }
    }

    #[test]
    fn non_numeric_codes_fail() {
        for value in [RawValue::Null, RawValue::Text("n/a".to_string())] {
            assert!(matches!(
                decode("VioType", &value, RenderMode::Color),
                Err(DecodeError::NotNumeric { .. })
            ));
        }
    }

    #[test]
    fn numeric_strings_are_truncated() {
        let value = RawValue::Text("4.0".to_string());
        assert_eq!(
            parse_code("VioType", &value).unwrap(),
            ViolationCode::FoodContamination
        );
        assert_eq!(
            parse_code("VioType", &RawValue::Real(3.9)).unwrap(),
            ViolationCode::TimeTemperatureControl
        );
    }

    #[test]
    fn raw_mode_never_decodes() {
        assert_eq!(
            decode("VioType", &RawValue::Int(42), RenderMode::Raw).unwrap(),
            "42"
        );
    }

    #[test]
    fn category_label_keeps_trailing_separator() {
        assert_eq!(category_label(&flags([1, 0, 1, 0, 0, 0])), "arts, nightlife, ");
        assert_eq!(category_label(&flags([0, 0, 0, 0, 0, 0])), "");
        assert_eq!(
            category_label(&flags([0, 0, 0, 1, 0, 1])),
            "hotelstravel, eventservices, "
        );
    }

    #[test]
    fn category_flags_need_integer_one() {
        let values = vec![
            RawValue::Int(2),
            RawValue::Text("1".to_string()),
            RawValue::Real(1.0),
            RawValue::Bool(true),
            RawValue::Null,
            RawValue::Int(1),
        ];
        assert_eq!(
            category_label(&values),
            "nightlife, hotelstravel, eventservices, "
        );
    }

    #[test]
    fn maps_text_row() {
        let row = single_insp_row(RawValue::Text("4.0".to_string()), RawValue::Int(12));
        let record = map_row(InspectionTable::SingleInsp, &row, RenderMode::Text).unwrap();

        assert_eq!(record["Index"], "7");
        assert_eq!(record["Name"], "Tasty Burger");
        assert_eq!(record["VioLevel"], "2.0");
        assert_eq!(record["VioType"], "FoodContamination");
        assert_eq!(record["VioType_pred"], "Insect/Animal Ctrl");
        assert_eq!(record["Zip"], "02115");
        assert_eq!(record["locLati"], "42.3467");
        assert_eq!(record["Category"], "food, nightlife, restaurants, ");
        assert_eq!(record.len(), InspectionTable::SingleInsp.field_columns().len() + 1);
    }

    #[test]
    fn maps_color_row() {
        let row = single_insp_row(RawValue::Int(0), RawValue::Int(16));
        let record = map_row(InspectionTable::SingleInsp, &row, RenderMode::Color).unwrap();

        assert_eq!(record["VioType"], ViolationCode::Pass.color());
        assert_eq!(record["VioType_pred"], ViolationCode::Others.color());
        assert_eq!(record["VioLevel_pred"], "3.0");
    }

    #[test]
    fn mapping_is_deterministic() {
        let row = single_insp_row(RawValue::Int(5), RawValue::Int(6));
        let first = map_row(InspectionTable::SingleInsp, &row, RenderMode::Text).unwrap();
        let second = map_row(InspectionTable::SingleInsp, &row, RenderMode::Text).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_wrong_arity() {
        let row = single_insp_row(RawValue::Int(1), RawValue::Int(1));
        let err = map_row(InspectionTable::Smote, &row, RenderMode::Raw).unwrap_err();
        assert_eq!(
            err,
            DecodeError::Arity {
                expected: InspectionTable::Smote.arity(),
                actual: InspectionTable::SingleInsp.arity(),
            }
        );
    }

    #[test]
    fn map_rows_stops_at_bad_row() {
        let rows = vec![
            single_insp_row(RawValue::Int(1), RawValue::Int(2)),
            single_insp_row(RawValue::Int(1), RawValue::Int(20)),
        ];
        assert!(map_rows(InspectionTable::SingleInsp, &rows, RenderMode::Text).is_err());
        assert_eq!(
            map_rows(InspectionTable::SingleInsp, &rows, RenderMode::Raw)
                .unwrap()
                .len(),
            2
        );
    }
}
