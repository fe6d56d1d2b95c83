//! Map centering for a result set.

use food_map_inspection_models::MapCenter;

use crate::MappedRecord;

/// Latitude column of an inspection record.
pub const LATITUDE_COLUMN: &str = "locLati";

/// Longitude column of an inspection record.
pub const LONGITUDE_COLUMN: &str = "locLong";

/// Arithmetic mean of the records' coordinates.
///
/// Records whose coordinates are missing or do not parse as finite numbers
/// are left out of the mean. When no record has usable coordinates (in
/// particular for an empty result set) `default` is returned with its
/// `fallback` flag set.
#[must_use]
pub fn map_center(records: &[MappedRecord], default: MapCenter) -> MapCenter {
    let coords: Vec<(f64, f64)> = records.iter().filter_map(coordinates).collect();

    if coords.is_empty() {
        log::debug!(
            "No usable coordinates in {} records, using default center",
            records.len()
        );
        return MapCenter::fallback(default.lat, default.lng);
    }

    if coords.len() < records.len() {
        log::warn!(
            "{} of {} records have no usable coordinates",
            records.len() - coords.len(),
            records.len()
        );
    }

    #[allow(clippy::cast_precision_loss)]
    let n = coords.len() as f64;
    let (lat_sum, lng_sum) = coords
        .iter()
        .fold((0.0, 0.0), |(lat, lng), (la, lo)| (lat + la, lng + lo));

    MapCenter::new(lat_sum / n, lng_sum / n)
}

fn coordinates(record: &MappedRecord) -> Option<(f64, f64)> {
    let lat: f64 = record.get(LATITUDE_COLUMN)?.trim().parse().ok()?;
    let lng: f64 = record.get(LONGITUDE_COLUMN)?.trim().parse().ok()?;
    (lat.is_finite() && lng.is_finite()).then_some((lat, lng))
}
