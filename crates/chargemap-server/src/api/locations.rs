use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use chargemap_core::{Location, LocationFilter};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_catalog_error, normalize_limit, ApiError, AppState};

/// Query string for `GET /api/locations`, in the map client's camelCase.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LocationsQuery {
    pub city: Option<String>,
    pub min_power_kw: Option<i32>,
    pub operator: Option<String>,
    pub include_unknown: Option<bool>,
    pub limit: Option<usize>,
}

impl From<LocationsQuery> for LocationFilter {
    fn from(query: LocationsQuery) -> Self {
        Self {
            city: query.city,
            min_power_kw: query.min_power_kw,
            operator: query.operator,
            include_unknown: query.include_unknown.unwrap_or(false),
            limit: normalize_limit(query.limit),
        }
    }
}

pub(super) async fn list_locations(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<LocationsQuery>, QueryRejection>,
) -> Result<Json<Vec<Location>>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        tracing::warn!(error = %rejection, "rejected locations query");
        ApiError::new(req_id.0.clone(), "bad_request", rejection.body_text())
    })?;
    let filter = LocationFilter::from(query);
    let data = state
        .catalog
        .list_locations(&filter)
        .await
        .map_err(|e| map_catalog_error(req_id.0, "Locations", &e))?;

    tracing::debug!(count = data.len(), ?filter, "listed locations");

    Ok(Json(data))
}

pub(super) async fn list_operators(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<Vec<String>>, ApiError> {
    let data = state
        .catalog
        .list_operators()
        .await
        .map_err(|e| map_catalog_error(req_id.0, "Operators", &e))?;

    Ok(Json(data))
}

pub(super) async fn list_powers(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<Vec<i32>>, ApiError> {
    let data = state
        .catalog
        .list_powers()
        .await
        .map_err(|e| map_catalog_error(req_id.0, "Powers", &e))?;

    Ok(Json(data))
}
