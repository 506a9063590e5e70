mod locations;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chargemap_core::{CorsOrigins, DEFAULT_LIMIT};
use chargemap_ocm::{CatalogError, LocationCatalog};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<LocationCatalog>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    dataset: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "bad_request" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn normalize_limit(limit: Option<usize>) -> usize {
    limit.unwrap_or(DEFAULT_LIMIT)
}

/// The data layer is unusable until restart, so every catalog failure is a 500
/// carrying the underlying cause.
pub(super) fn map_catalog_error(
    request_id: String,
    operation: &str,
    error: &CatalogError,
) -> ApiError {
    tracing::error!(error = %error, operation, "catalog query failed");
    ApiError::new(
        request_id,
        "internal_error",
        format!("{operation} failed: {error}"),
    )
}

fn build_cors(origins: &CorsOrigins) -> CorsLayer {
    let allow_origin = match origins {
        CorsOrigins::Any => AllowOrigin::any(),
        CorsOrigins::List(list) => AllowOrigin::list(list.iter().filter_map(|origin| {
            HeaderValue::from_str(origin)
                .inspect_err(|e| tracing::warn!(origin = %origin, error = %e, "ignoring invalid CORS origin"))
                .ok()
        })),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

/// The list and facet routes answer with bare JSON arrays, which is what the
/// map client reads. Failures and `/api/health` use the `{.., meta}` envelopes.
pub fn build_app(state: AppState, cors: &CorsOrigins) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/locations", get(locations::list_locations))
        .route("/api/locations/operators", get(locations::list_operators))
        .route("/api/locations/powers", get(locations::list_powers))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors(cors))
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

/// Liveness plus whether the dataset has been imported yet. Never triggers
/// the import itself.
async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let dataset = if state.catalog.is_loaded() {
        "loaded"
    } else {
        "pending"
    };

    Json(ApiResponse {
        data: HealthData {
            status: "ok",
            dataset,
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

#[cfg(test)]
mod tests {
    use super::locations::LocationsQuery;
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use chargemap_core::LocationFilter;
    use tower::ServiceExt;

    fn sample_export() -> serde_json::Value {
        serde_json::json!([
            {
                "AddressInfo": { "Title": "Kauppakeskus Trio", "Town": "Lahti", "Latitude": 60.9827, "Longitude": 25.6615 },
                "OperatorInfo": { "Title": "K-Lataus" },
                "Connections": [{ "PowerKW": 50 }]
            },
            {
                "AddressInfo": { "Title": "Matkakeskus", "Town": "Lahti", "Latitude": 60.9769, "Longitude": 25.6544 },
                "OperatorInfo": { "Title": "Tesla" },
                "Connections": [{ "PowerKW": 7.4 }, { "PowerKW": 22.0 }, { "PowerKW": 11 }]
            },
            {
                "AddressInfo": { "Title": "Kamppi", "Town": "Helsinki", "Latitude": 24.9322, "Longitude": 60.1686 },
                "OperatorInfo": null
            },
            {
                "AddressInfo": { "Title": "Stockholm", "Latitude": 59.3293, "Longitude": 18.0686 }
            }
        ])
    }

    fn app_with_fixture(dir: &tempfile::TempDir) -> (Router, Arc<LocationCatalog>) {
        let path = dir.path().join("ocm_finland_raw.json");
        std::fs::write(&path, sample_export().to_string()).expect("write fixture");
        let catalog = Arc::new(LocationCatalog::new(path));
        let app = build_app(
            AppState {
                catalog: Arc::clone(&catalog),
            },
            &CorsOrigins::Any,
        );
        (app, catalog)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[test]
    fn normalize_limit_defaults_to_500() {
        assert_eq!(normalize_limit(None), 500);
        assert_eq!(normalize_limit(Some(0)), 0);
        assert_eq!(normalize_limit(Some(25)), 25);
    }

    #[test]
    fn locations_query_defaults_exclude_unknown_power() {
        let filter = LocationFilter::from(LocationsQuery::default());
        assert_eq!(filter, LocationFilter::default());
    }

    #[test]
    fn api_error_status_follows_code() {
        let response = ApiError::new("req-1", "bad_request", "invalid input").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let response = ApiError::new("req-1", "internal_error", "boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn health_reports_pending_without_importing() {
        let dir = tempfile::tempdir().unwrap();
        let (app, catalog) = app_with_fixture(&dir);

        let (status, json) = get_json(app, "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "ok");
        assert_eq!(json["data"]["dataset"], "pending");
        assert_eq!(catalog.import_count(), 0);
    }

    #[tokio::test]
    async fn list_locations_returns_all_retained_records() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = app_with_fixture(&dir);

        let (status, json) = get_json(app, "/api/locations").await;
        assert_eq!(status, StatusCode::OK);
        let data = json.as_array().expect("bare location array");
        assert_eq!(data.len(), 3);
        assert_eq!(data[1]["powerKw"].as_i64(), Some(22));
        assert_eq!(data[2]["name"], "Kamppi");
        assert_eq!(data[2]["operator"], "Unknown");
        assert!(data[2]["powerKw"].is_null());
        assert!((data[2]["lat"].as_f64().unwrap() - 60.1686).abs() < 1e-9);
    }

    #[tokio::test]
    async fn list_locations_applies_query_filters() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = app_with_fixture(&dir);

        let (status, json) = get_json(app.clone(), "/api/locations?minPowerKw=20").await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<i64> = json
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|l| l["id"].as_i64())
            .collect();
        assert_eq!(ids, vec![1, 2]);

        let (_, json) = get_json(
            app.clone(),
            "/api/locations?minPowerKw=30&includeUnknown=true",
        )
        .await;
        let ids: Vec<i64> = json
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|l| l["id"].as_i64())
            .collect();
        assert_eq!(ids, vec![1, 3]);

        let (_, json) = get_json(app.clone(), "/api/locations?operator=tesla").await;
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["name"], "Matkakeskus");

        let (_, json) = get_json(app.clone(), "/api/locations?city=lahti&limit=1").await;
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["id"].as_i64(), Some(1));
    }

    #[tokio::test]
    async fn invalid_query_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = app_with_fixture(&dir);

        let (status, json) = get_json(app, "/api/locations?minPowerKw=fast").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "bad_request");
        assert!(json["error"]["message"]
            .as_str()
            .expect("message")
            .starts_with("Failed to deserialize query string"));
        assert!(json["meta"]["request_id"].is_string());
    }

    #[tokio::test]
    async fn facets_are_sorted_and_distinct() {
        let dir = tempfile::tempdir().unwrap();
        let (app, catalog) = app_with_fixture(&dir);

        let (status, json) = get_json(app.clone(), "/api/locations/operators").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!(["K-Lataus", "Tesla"]));

        let (status, json) = get_json(app.clone(), "/api/locations/powers").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!([22, 50]));

        let (_, json) = get_json(app, "/api/health").await;
        assert_eq!(json["data"]["dataset"], "loaded");
        assert_eq!(catalog.import_count(), 1);
    }

    #[tokio::test]
    async fn missing_dataset_maps_to_internal_error() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Arc::new(LocationCatalog::new(dir.path().join("missing.json")));
        let app = build_app(AppState { catalog }, &CorsOrigins::Any);

        let (status, json) = get_json(app.clone(), "/api/locations").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"]["code"], "internal_error");
        let message = json["error"]["message"].as_str().expect("message");
        assert!(
            message.starts_with("Locations failed: OCM file not found"),
            "message: {message}"
        );

        let (status, json) = get_json(app, "/api/locations/powers").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Powers failed:"));
    }

    #[tokio::test]
    async fn cors_allows_configured_origin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ocm.json");
        std::fs::write(&path, "[]").unwrap();
        let app = build_app(
            AppState {
                catalog: Arc::new(LocationCatalog::new(path)),
            },
            &CorsOrigins::List(vec!["http://localhost:5173".to_string()]),
        );

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/locations")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .expect("allow-origin header"),
            "http://localhost:5173"
        );
    }
}
