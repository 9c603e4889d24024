use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{parse_origin, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct LocateQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct LocateData {
    locality: Option<String>,
}

pub(super) async fn locate(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<LocateQuery>,
) -> Result<Json<ApiResponse<LocateData>>, ApiError> {
    let at = parse_origin(query.lat.as_deref(), query.lon.as_deref())
        .map_err(|message| ApiError::new(req_id.0.clone(), "validation_error", message))?
        .ok_or_else(|| {
            ApiError::new(req_id.0.clone(), "validation_error", "lat and lon are required")
        })?;

    let locality = state.geocoder.locality(at).await.map_err(|e| {
        tracing::warn!(%at, error = %e, "reverse geocode failed");
        ApiError::new(
            req_id.0.clone(),
            "upstream_error",
            "Error fetching name of your location",
        )
    })?;

    Ok(Json(ApiResponse {
        data: LocateData { locality },
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::super::test_support::{app, app_with_geocoder, get_json};

    #[tokio::test]
    async fn returns_locality_from_geocoder() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/reverse-geocode-client"))
            .and(query_param("latitude", "12.97"))
            .and(query_param("longitude", "77.59"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "locality": "Bengaluru" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let app = app_with_geocoder(&format!("{}/data/reverse-geocode-client", server.uri()));
        let (status, body) = get_json(app, "/api/v1/locate?lat=12.97&lon=77.59").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["locality"], "Bengaluru");
    }

    #[tokio::test]
    async fn unknown_locality_is_null() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/reverse-geocode-client"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let app = app_with_geocoder(&format!("{}/data/reverse-geocode-client", server.uri()));
        let (status, body) = get_json(app, "/api/v1/locate?lat=0&lon=0").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["locality"].is_null());
    }

    #[tokio::test]
    async fn geocoder_failure_is_an_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/reverse-geocode-client"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let app = app_with_geocoder(&format!("{}/data/reverse-geocode-client", server.uri()));
        let (status, body) = get_json(app, "/api/v1/locate?lat=0&lon=0").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "upstream_error");
        assert_eq!(
            body["error"]["message"],
            "Error fetching name of your location"
        );
    }

    #[tokio::test]
    async fn missing_coordinates_are_a_validation_error() {
        let (status, body) = get_json(app(), "/api/v1/locate").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "validation_error");
    }
}
