use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use nearby_core::Category;
use nearby_search::{DisplayRecord, FacetEntry, NearbySession};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{parse_origin, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct NearbyQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    /// Comma-separated category labels to deselect.
    pub hidden: Option<String>,
    /// Deselect results that have no category.
    #[serde(default)]
    pub hide_uncategorized: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct NearbyData {
    searched: bool,
    results: Vec<DisplayRecord>,
    facets: Vec<FacetEntry>,
}

/// An empty `hidden` hides nothing; an empty segment inside a list names the
/// empty-string category.
fn hidden_categories(hidden: Option<&str>, uncategorized: bool) -> Vec<Category> {
    let mut categories: Vec<Category> = match hidden {
        None | Some("") => Vec::new(),
        Some(raw) => raw
            .split(',')
            .map(|label| Category::Named(label.to_owned()))
            .collect(),
    };
    if uncategorized {
        categories.push(Category::Missing);
    }
    categories
}

pub(super) async fn nearby(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<ApiResponse<NearbyData>>, ApiError> {
    let origin = parse_origin(query.lat.as_deref(), query.lon.as_deref())
        .map_err(|message| ApiError::new(req_id.0.clone(), "validation_error", message))?;

    let mut session = NearbySession::with_dataset(state.plan, Arc::clone(&state.dataset));
    if let Some(origin) = origin {
        session.set_origin(origin);
    }
    for category in hidden_categories(query.hidden.as_deref(), query.hide_uncategorized) {
        if !session.toggle(&category) {
            tracing::debug!(%category, "hidden category not in results");
        }
    }

    Ok(Json(ApiResponse {
        data: NearbyData {
            searched: session.has_searched(),
            results: session.view(),
            facets: session.facets().to_vec(),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
