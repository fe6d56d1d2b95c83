//! Read-only queries against the inspection and legacy city tables.
//!
//! Column and table names come from the fixed layouts in
//! `food_map_database_models`; the only caller-supplied values are bound
//! as parameters.

use food_map_database_models::{CityRow, InspectionQuery, RawRow, RawValue};
use moosicbox_json_utils::database::ToValue as _;
use moosicbox_json_utils::{MissingValue, ToValueType};
use switchy_database::{Database, DatabaseValue, Row};

use crate::DbError;

/// Fetches inspection rows, optionally filtered by postal code, ordered by
/// predicted violation level (highest first).
///
/// Each returned row holds the table's select columns in order.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a column holds a value type
/// the row model cannot represent.
pub async fn query_inspections(
    db: &dyn Database,
    query: &InspectionQuery,
) -> Result<Vec<RawRow>, DbError> {
    let columns = query.table.select_columns();
    let select_list = columns
        .iter()
        .map(|c| format!("\"{c}\""))
        .collect::<Vec<_>>()
        .join(", ");

    let mut sql = format!("SELECT {select_list} FROM \"{}\"", query.table.name());
    let mut params = Vec::new();

    if let Some(zip) = &query.zip {
        sql.push_str(" WHERE \"Zip\" = $1");
        params.push(DatabaseValue::String(zip.clone()));
    }

    sql.push_str(" ORDER BY \"VioLevel_pred\" DESC");

    let rows = db.query_raw_params(&sql, &params).await?;

    log::debug!(
        "{} rows from {} (zip filter: {:?})",
        rows.len(),
        query.table,
        query.zip
    );

    rows.iter().map(|row| to_raw_row(row, &columns)).collect()
}

/// Returns the names of the first `limit` cities.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub async fn query_city_names(db: &dyn Database, limit: u32) -> Result<Vec<String>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT \"Name\" FROM \"City\" LIMIT $1",
            &[DatabaseValue::Int64(i64::from(limit))],
        )
        .await?;

    rows.iter().map(|row| city_field(row, "Name")).collect()
}

/// Returns the `limit` least-populous cities.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a row cannot be converted.
pub async fn query_cities_by_population(
    db: &dyn Database,
    limit: u32,
) -> Result<Vec<CityRow>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT \"Name\", \"CountryCode\", \"Population\" FROM \"City\"
             ORDER BY \"Population\"
             LIMIT $1",
            &[DatabaseValue::Int64(i64::from(limit))],
        )
        .await?;

    rows.iter()
        .map(|row| {
            Ok(CityRow {
                name: city_field(row, "Name")?,
                country_code: city_field(row, "CountryCode")?,
                population: city_field(row, "Population")?,
            })
        })
        .collect()
}

fn city_field<T>(row: &Row, column: &str) -> Result<T, DbError>
where
    DatabaseValue: ToValueType<T>,
    for<'a> &'a Row: MissingValue<T>,
{
    row.to_value(column).map_err(|e| DbError::Conversion {
        message: format!("Failed to parse city {column}: {e}"),
    })
}

/// Copies a driver row into a positional [`RawRow`].
fn to_raw_row(row: &Row, columns: &[String]) -> Result<RawRow, DbError> {
    let values = columns
        .iter()
        .map(|column| {
            let value = row.get(column).ok_or_else(|| DbError::Conversion {
                message: format!("Missing column {column}"),
            })?;
            to_raw_value(column, value)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RawRow::new(values))
}

fn to_raw_value(column: &str, value: DatabaseValue) -> Result<RawValue, DbError> {
    use DatabaseValue as V;

    Ok(match value {
        V::Null
        | V::StringOpt(None)
        | V::BoolOpt(None)
        | V::Int8Opt(None)
        | V::Int16Opt(None)
        | V::Int32Opt(None)
        | V::Int64Opt(None)
        | V::UInt8Opt(None)
        | V::UInt16Opt(None)
        | V::UInt32Opt(None)
        | V::UInt64Opt(None)
        | V::Real32Opt(None)
        | V::Real64Opt(None) => RawValue::Null,
        V::String(s) | V::StringOpt(Some(s)) => RawValue::Text(s),
        V::Bool(b) | V::BoolOpt(Some(b)) => RawValue::Bool(b),
        V::Int8(v) | V::Int8Opt(Some(v)) => RawValue::Int(i64::from(v)),
        V::Int16(v) | V::Int16Opt(Some(v)) => RawValue::Int(i64::from(v)),
        V::Int32(v) | V::Int32Opt(Some(v)) => RawValue::Int(i64::from(v)),
        V::Int64(v) | V::Int64Opt(Some(v)) => RawValue::Int(v),
        V::UInt8(v) | V::UInt8Opt(Some(v)) => RawValue::Int(i64::from(v)),
        V::UInt16(v) | V::UInt16Opt(Some(v)) => RawValue::Int(i64::from(v)),
        V::UInt32(v) | V::UInt32Opt(Some(v)) => RawValue::Int(i64::from(v)),
        V::UInt64(v) | V::UInt64Opt(Some(v)) => {
            RawValue::Int(i64::try_from(v).map_err(|_| DbError::Conversion {
                message: format!("Value in column {column} out of range: {v}"),
            })?)
        }
        V::Real32(v) | V::Real32Opt(Some(v)) => RawValue::Real(f64::from(v)),
        V::Real64(v) | V::Real64Opt(Some(v)) => RawValue::Real(v),
        other => {
            return Err(DbError::Conversion {
                message: format!("Unsupported value in column {column}: {other:?}"),
            });
        }
    })
}

#[cfg(test)]
mod tests {
    use food_map_database_models::InspectionTable;

    use super::*;
    use crate::fixtures::{self, FixtureRestaurant};

    #[tokio::test]
    async fn filters_by_zip_and_orders_by_predicted_level() {
        let (db, path) = fixtures::seeded_db(InspectionTable::SingleInsp).await.unwrap();

        let rows = query_inspections(
            db.as_ref(),
            &InspectionQuery {
                table: InspectionTable::SingleInsp,
                zip: Some("94110".to_string()),
            },
        )
        .await
        .unwrap();

        assert_eq!(rows.len(), 2);
        let columns = InspectionTable::SingleInsp.select_columns();
        let zip_idx = columns.iter().position(|c| c == "Zip").unwrap();
        let pred_idx = columns.iter().position(|c| c == "VioLevel_pred").unwrap();
        for row in &rows {
            assert_eq!(row.len(), InspectionTable::SingleInsp.arity());
            assert_eq!(row.values[zip_idx], RawValue::Text("94110".to_string()));
        }
        let preds: Vec<f64> = rows
            .iter()
            .map(|r| r.values[pred_idx].as_f64().unwrap())
            .collect();
        assert!(preds[0] >= preds[1], "not descending: {preds:?}");

        drop(db);
        fixtures::remove(&path);
    }

    #[tokio::test]
    async fn no_filter_returns_every_row() {
        let (db, path) = fixtures::seeded_db(InspectionTable::SingleInsp).await.unwrap();

        let rows = query_inspections(db.as_ref(), &InspectionQuery::default())
            .await
            .unwrap();
        assert_eq!(rows.len(), 3);

        drop(db);
        fixtures::remove(&path);
    }

    #[tokio::test]
    async fn quote_in_zip_is_bound_not_spliced() {
        let (db, path) = fixtures::seeded_db(InspectionTable::SingleInsp).await.unwrap();

        for zip in ["94110' OR '1'='1", "'; DROP TABLE \"singleInsp\"; --"] {
            let rows = query_inspections(
                db.as_ref(),
                &InspectionQuery {
                    table: InspectionTable::SingleInsp,
                    zip: Some(zip.to_string()),
                },
            )
            .await
            .unwrap();
            assert!(rows.is_empty(), "{zip} matched rows");
        }

        let all = query_inspections(db.as_ref(), &InspectionQuery::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 3);

        drop(db);
        fixtures::remove(&path);
    }

    #[tokio::test]
    async fn smote_rows_carry_address() {
        let (db, path) = fixtures::seeded_db(InspectionTable::Smote).await.unwrap();

        let rows = query_inspections(
            db.as_ref(),
            &InspectionQuery {
                table: InspectionTable::Smote,
                zip: Some("02134".to_string()),
            },
        )
        .await
        .unwrap();

        assert_eq!(rows.len(), 1);
        let columns = InspectionTable::Smote.select_columns();
        let addr_idx = columns.iter().position(|c| c == "Address").unwrap();
        assert_eq!(
            rows[0].values[addr_idx],
            RawValue::Text(FixtureRestaurant::sample()[2].address.clone().unwrap())
        );

        drop(db);
        fixtures::remove(&path);
    }

    #[tokio::test]
    async fn city_queries_respect_limit_and_order() {
        let (db, path) = fixtures::seeded_city_db().await.unwrap();

        let names = query_city_names(db.as_ref(), 2).await.unwrap();
        assert_eq!(names.len(), 2);

        let cities = query_cities_by_population(db.as_ref(), 15).await.unwrap();
        assert_eq!(cities.len(), 3);
        assert_eq!(cities[0].name, "Adamstown");
        assert!(cities.windows(2).all(|w| w[0].population <= w[1].population));

        drop(db);
        fixtures::remove(&path);
    }

    #[test]
    fn converts_every_scalar_driver_value() {
        let cases = [
            (DatabaseValue::Real32(42.5), RawValue::Real(42.5)),
            (DatabaseValue::Real32Opt(Some(-71.25)), RawValue::Real(-71.25)),
            (DatabaseValue::Real64Opt(Some(3.0)), RawValue::Real(3.0)),
            (DatabaseValue::Int8(1), RawValue::Int(1)),
            (DatabaseValue::Int16Opt(Some(12)), RawValue::Int(12)),
            (DatabaseValue::Int32Opt(Some(94_110)), RawValue::Int(94_110)),
            (DatabaseValue::Int64Opt(Some(7)), RawValue::Int(7)),
            (DatabaseValue::UInt8(16), RawValue::Int(16)),
            (DatabaseValue::UInt16Opt(Some(2)), RawValue::Int(2)),
            (DatabaseValue::UInt32(589_141), RawValue::Int(589_141)),
            (DatabaseValue::UInt64Opt(Some(4)), RawValue::Int(4)),
            (DatabaseValue::BoolOpt(Some(true)), RawValue::Bool(true)),
            (
                DatabaseValue::StringOpt(Some("02134".to_string())),
                RawValue::Text("02134".to_string()),
            ),
            (DatabaseValue::StringOpt(None), RawValue::Null),
            (DatabaseValue::Real32Opt(None), RawValue::Null),
            (DatabaseValue::UInt64Opt(None), RawValue::Null),
        ];

        for (value, expected) in cases {
            let label = format!("{value:?}");
            assert_eq!(to_raw_value("locLati", value).unwrap(), expected, "{label}");
        }
    }

    #[test]
    fn rejects_values_without_a_scalar_form() {
        assert!(matches!(
            to_raw_value("Index", DatabaseValue::UInt64(u64::MAX)),
            Err(DbError::Conversion { .. })
        ));
        assert!(matches!(
            to_raw_value("Rating", DatabaseValue::Now),
            Err(DbError::Conversion { .. })
        ));
    }

    #[tokio::test]
    async fn null_city_field_is_a_conversion_error() {
        let path = fixtures::temp_db_path("null_city");
        let db = switchy_database_connection::init_sqlite_rusqlite(Some(path.as_path())).unwrap();
        db.exec_raw(
            "CREATE TABLE \"City\" (
                \"Name\" TEXT NOT NULL,
                \"CountryCode\" TEXT,
                \"Population\" INTEGER NOT NULL
            )",
        )
        .await
        .unwrap();
        db.exec_raw(
            "INSERT INTO \"City\" (\"Name\", \"CountryCode\", \"Population\")
             VALUES ('Nowhere', NULL, 1)",
        )
        .await
        .unwrap();

        let result = query_cities_by_population(db.as_ref(), 15).await;
        assert!(matches!(result, Err(DbError::Conversion { .. })));

        drop(db);
        fixtures::remove(&path);
    }
}
