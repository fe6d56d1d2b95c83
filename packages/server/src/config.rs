//! Server settings read from the environment at startup.

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use food_map_database_models::InspectionTable;
use food_map_inspection_models::MapCenter;

/// Settings for the HTTP server and the inspection views.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Address to bind (`BIND_ADDR`).
    pub bind_addr: String,
    /// Port to listen on (`PORT`).
    pub port: u16,
    /// Directory holding the HTML pages and `static/` assets (`STATIC_DIR`).
    pub static_dir: PathBuf,
    /// Table the inspection views read (`INSPECTION_TABLE`).
    pub inspection_table: InspectionTable,
    /// Map center for result sets without coordinates (`MAP_DEFAULT_LAT`,
    /// `MAP_DEFAULT_LNG`).
    pub default_center: MapCenter,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            static_dir: PathBuf::from("app"),
            inspection_table: InspectionTable::default(),
            default_center: MapCenter::BOSTON,
        }
    }
}

impl ServerConfig {
    /// Builds the configuration from process environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup. Unset or
    /// unparseable values keep their defaults.
    #[must_use]
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let lat = parse_or(&var, "MAP_DEFAULT_LAT", defaults.default_center.lat);
        let lng = parse_or(&var, "MAP_DEFAULT_LNG", defaults.default_center.lng);

        Self {
            bind_addr: var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: parse_or(&var, "PORT", defaults.port),
            static_dir: var("STATIC_DIR").map_or(defaults.static_dir, PathBuf::from),
            inspection_table: parse_or(&var, "INSPECTION_TABLE", defaults.inspection_table),
            default_center: MapCenter::fallback(lat, lng),
        }
    }
}

fn parse_or<T>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(raw) = var(key) else {
        return default;
    };
    raw.trim().parse().unwrap_or_else(|e| {
        log::warn!("Invalid {key} value {raw:?} ({e}), using default: {default}");
        default
    })
}
