//! HTTP handler functions for the food map.

use actix_files::NamedFile;
use actix_web::{HttpResponse, web};
use food_map_database::{db, queries};
use food_map_database_models::InspectionQuery;
use food_map_inspection::present;
use food_map_inspection_models::ViolationCode;
use food_map_server_models::{
    ApiCity, ApiHealth, ApiInspectionView, ApiViolation, InspectionQueryParams,
};

use crate::AppState;
use crate::error::ApiError;

/// Rows shown by the legacy city listings.
const CITY_LIMIT: u32 = 15;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/violations`
///
/// Returns the violation code table with labels and marker colors, for
/// building the map legend.
pub async fn violations() -> HttpResponse {
    let codes: Vec<ApiViolation> = ViolationCode::all()
        .iter()
        .copied()
        .map(ApiViolation::from)
        .collect();
    HttpResponse::Ok().json(codes)
}

/// `GET /`, `GET /index`
pub async fn index(state: web::Data<AppState>) -> Result<NamedFile, ApiError> {
    page(&state, "index.html").await
}

/// `GET /mapexample`
pub async fn map_example(state: web::Data<AppState>) -> Result<NamedFile, ApiError> {
    page(&state, "mapexample.html").await
}

/// `GET /momap`
pub async fn momap(state: web::Data<AppState>) -> Result<NamedFile, ApiError> {
    page(&state, "momap.html").await
}

async fn page(state: &AppState, name: &'static str) -> Result<NamedFile, ApiError> {
    NamedFile::open_async(state.config.static_dir.join(name))
        .await
        .map_err(|source| ApiError::Page { page: name, source })
}

/// `GET /input`
///
/// Inspection view for an optional postal code. Without `ID` every row of
/// the configured table is listed.
pub async fn input(
    state: web::Data<AppState>,
    params: web::Query<InspectionQueryParams>,
) -> Result<HttpResponse, ApiError> {
    inspection_view(&state, &params).await
}

/// `GET /output`, `GET /safefoodmap`
///
/// Inspection view for the postal code in `ID`, which is required.
pub async fn output(
    state: web::Data<AppState>,
    params: web::Query<InspectionQueryParams>,
) -> Result<HttpResponse, ApiError> {
    if params.zip().is_none() {
        return Err(ApiError::MissingParameter("ID"));
    }
    inspection_view(&state, &params).await
}

async fn inspection_view(
    state: &AppState,
    params: &InspectionQueryParams,
) -> Result<HttpResponse, ApiError> {
    let query = InspectionQuery {
        table: state.config.inspection_table,
        zip: params.zip(),
    };

    let rows = {
        let conn = db::connect(&state.db).await?;
        db::with_timeout(
            state.db.query_timeout,
            queries::query_inspections(conn.as_ref(), &query),
        )
        .await?
    };

    log::info!(
        "{} restaurants found in {} (zip: {:?})",
        rows.len(),
        query.table,
        query.zip
    );

    let view = present::render(
        query.table,
        &rows,
        &params.modes(),
        state.config.default_center,
    )?;

    Ok(HttpResponse::Ok().json(ApiInspectionView::new(query.table, query.zip, view)))
}

/// `GET /db`
///
/// Legacy demo: the first city names, one per line.
pub async fn cities(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let names = {
        let conn = db::connect(&state.db).await?;
        db::with_timeout(
            state.db.query_timeout,
            queries::query_city_names(conn.as_ref(), CITY_LIMIT),
        )
        .await?
    };

    let body: String = names
        .iter()
        .map(|name| format!("{}<br>", escape_html(name)))
        .collect();

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body))
}

/// `GET /db_fancy`
///
/// Legacy demo: the least-populous cities with country and population.
pub async fn cities_fancy(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let rows = {
        let conn = db::connect(&state.db).await?;
        db::with_timeout(
            state.db.query_timeout,
            queries::query_cities_by_population(conn.as_ref(), CITY_LIMIT),
        )
        .await?
    };

    let cities: Vec<ApiCity> = rows.into_iter().map(ApiCity::from).collect();
    Ok(HttpResponse::Ok().json(cities))
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
