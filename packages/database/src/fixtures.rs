//! Throwaway `SQLite` databases seeded with inspection and city rows.
//!
//! Used by this crate's tests and, through the `fixtures` feature, by the
//! server's HTTP tests.

use std::path::{Path, PathBuf};

use food_map_database_models::InspectionTable;
use food_map_inspection_models::CategoryFlag;
use switchy_database::{Database, DatabaseValue};
use switchy_database_connection::init_sqlite_rusqlite;

use crate::DbError;

/// One restaurant row to insert into an inspection table.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureRestaurant {
    pub index: i64,
    pub name: String,
    pub vio_level: f64,
    pub vio_type: f64,
    pub vio_level_pred: f64,
    pub vio_type_pred: f64,
    pub rating: f64,
    pub prop_value: f64,
    /// Only written to tables that have an `Address` column.
    pub address: Option<String>,
    pub zip: String,
    pub loc_long: f64,
    pub loc_lati: f64,
    /// One entry per [`CategoryFlag`], in column order.
    pub flags: [bool; 6],
}

impl FixtureRestaurant {
    /// Two restaurants in 94110 and one in 02134.
    #[must_use]
    pub fn sample() -> Vec<Self> {
        vec![
            Self {
                index: 0,
                name: "La Taqueria".to_string(),
                vio_level: 1.0,
                vio_type: 2.0,
                vio_level_pred: 1.0,
                vio_type_pred: 3.0,
                rating: 4.5,
                prop_value: 812_000.0,
                address: Some("2889 Mission St".to_string()),
                zip: "94110".to_string(),
                loc_long: -122.418,
                loc_lati: 37.751,
                flags: [false, true, false, false, true, false],
            },
            Self {
                index: 1,
                name: "Foreign Cinema".to_string(),
                vio_level: 3.0,
                vio_type: 4.0,
                vio_level_pred: 2.0,
                vio_type_pred: 4.0,
                rating: 4.0,
                prop_value: 1_250_000.0,
                address: Some("2534 Mission St".to_string()),
                zip: "94110".to_string(),
                loc_long: -122.420,
                loc_lati: 37.757,
                flags: [true, false, true, false, false, false],
            },
            Self {
                index: 2,
                name: "Grendel's Den".to_string(),
                vio_level: 0.0,
                vio_type: 0.0,
                vio_level_pred: 3.0,
                vio_type_pred: 12.0,
                rating: 3.5,
                prop_value: 640_000.0,
                address: Some("89 Winthrop St".to_string()),
                zip: "02134".to_string(),
                loc_long: -71.121,
                loc_lati: 42.372,
                flags: [false, false, true, false, true, false],
            },
        ]
    }
}

/// Returns a unique path in the system temp directory.
#[must_use]
pub fn temp_db_path(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!("food_map_{label}_{}.db", uuid::Uuid::new_v4()))
}

/// Best-effort removal of a fixture database file.
pub fn remove(path: &Path) {
    let _ = std::fs::remove_file(path);
}

/// Creates an inspection table with the layout of `table`. Violation type
/// columns are `TEXT` so decoding has to cope with numeric strings.
///
/// # Errors
///
/// Returns [`DbError`] if the statement fails.
pub async fn create_inspection_table(
    db: &dyn Database,
    table: InspectionTable,
) -> Result<(), DbError> {
    let mut columns: Vec<String> = table
        .field_columns()
        .iter()
        .map(|column| {
            let ty = match *column {
                "Index" => "INTEGER",
                "Name" | "Address" | "Zip" | "VioType" | "VioType_pred" => "TEXT",
                _ => "REAL",
            };
            format!("\"{column}\" {ty}")
        })
        .collect();
    columns.extend(
        CategoryFlag::all()
            .iter()
            .map(|flag| format!("\"{flag}\" INTEGER")),
    );

    db.exec_raw(&format!(
        "CREATE TABLE IF NOT EXISTS \"{}\" ({})",
        table.name(),
        columns.join(", ")
    ))
    .await?;

    Ok(())
}

/// Inserts one restaurant into `table`.
///
/// # Errors
///
/// Returns [`DbError`] if the insert fails.
pub async fn insert_restaurant(
    db: &dyn Database,
    table: InspectionTable,
    restaurant: &FixtureRestaurant,
) -> Result<(), DbError> {
    let columns = table.select_columns();
    let mut params: Vec<DatabaseValue> = table
        .field_columns()
        .iter()
        .map(|column| match *column {
            "Index" => DatabaseValue::Int64(restaurant.index),
            "Name" => DatabaseValue::String(restaurant.name.clone()),
            "VioLevel" => DatabaseValue::Real64(restaurant.vio_level),
            "VioType" => DatabaseValue::String(format!("{:.1}", restaurant.vio_type)),
            "VioLevel_pred" => DatabaseValue::Real64(restaurant.vio_level_pred),
            "VioType_pred" => DatabaseValue::String(format!("{:.1}", restaurant.vio_type_pred)),
            "Rating" => DatabaseValue::Real64(restaurant.rating),
            "PropValue" => DatabaseValue::Real64(restaurant.prop_value),
            "Address" => restaurant
                .address
                .clone()
                .map_or(DatabaseValue::Null, DatabaseValue::String),
            "Zip" => DatabaseValue::String(restaurant.zip.clone()),
            "locLong" => DatabaseValue::Real64(restaurant.loc_long),
            "locLati" => DatabaseValue::Real64(restaurant.loc_lati),
            _ => DatabaseValue::Null,
        })
        .collect();
    params.extend(
        restaurant
            .flags
            .iter()
            .map(|set| DatabaseValue::Int64(i64::from(*set))),
    );

    let column_list = columns
        .iter()
        .map(|c| format!("\"{c}\""))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=params.len())
        .map(|i| format!("${i}"))
        .collect::<Vec<_>>()
        .join(", ");

    db.exec_raw_params(
        &format!(
            "INSERT INTO \"{}\" ({column_list}) VALUES ({placeholders})",
            table.name()
        ),
        &params,
    )
    .await?;

    Ok(())
}

/// Opens a fresh `SQLite` file containing `table` seeded with
/// [`FixtureRestaurant::sample`].
///
/// # Errors
///
/// Returns [`DbError`] if the file cannot be created or seeded.
pub async fn seeded_db(table: InspectionTable) -> Result<(Box<dyn Database>, PathBuf), DbError> {
    let path = temp_db_path(table.name());
    let db = init_sqlite_rusqlite(Some(path.as_path())).map_err(|e| DbError::Connection {
        message: e.to_string(),
    })?;

    create_inspection_table(db.as_ref(), table).await?;
    for restaurant in FixtureRestaurant::sample() {
        insert_restaurant(db.as_ref(), table, &restaurant).await?;
    }

    Ok((db, path))
}

/// Creates and fills the legacy `City` table with three rows.
///
/// # Errors
///
/// Returns [`DbError`] if a statement fails.
pub async fn create_city_table(db: &dyn Database) -> Result<(), DbError> {
    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS \"City\" (
            \"ID\"          INTEGER PRIMARY KEY,
            \"Name\"        TEXT NOT NULL,
            \"CountryCode\" TEXT NOT NULL,
            \"District\"    TEXT,
            \"Population\"  INTEGER NOT NULL
        )",
    )
    .await?;

    for (name, country, population) in [
        ("Boston", "USA", 589_141_i64),
        ("Adamstown", "PCN", 42),
        ("Cambridge", "USA", 101_355),
    ] {
        db.exec_raw_params(
            "INSERT INTO \"City\" (\"Name\", \"CountryCode\", \"Population\")
             VALUES ($1, $2, $3)",
            &[
                DatabaseValue::String(name.to_string()),
                DatabaseValue::String(country.to_string()),
                DatabaseValue::Int64(population),
            ],
        )
        .await?;
    }

    Ok(())
}

/// Opens a fresh `SQLite` file containing the seeded `City` table.
///
/// # Errors
///
/// Returns [`DbError`] if the file cannot be created or seeded.
pub async fn seeded_city_db() -> Result<(Box<dyn Database>, PathBuf), DbError> {
    let path = temp_db_path("city");
    let db = init_sqlite_rusqlite(Some(path.as_path())).map_err(|e| DbError::Connection {
        message: e.to_string(),
    })?;

    create_city_table(db.as_ref()).await?;

    Ok((db, path))
}
