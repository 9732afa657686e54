use axum::{
    extract::{rejection::QueryRejection, Extension, Query},
    Json,
};

use crate::domains::catalog::{Category, ResultPage, SearchError, SearchParams};
use crate::server::app::AxumAppState;
use crate::server::error::ApiError;

/// `GET /resources?search=&category=&platform=&tags=a,b&sort=recency&page=1&pageSize=20`
///
/// The query string is taken as raw pairs so that every malformed request,
/// repeated keys included, comes back as an `InvalidFilter` body.
pub async fn search_resources_handler(
    Extension(state): Extension<AxumAppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<ResultPage>, ApiError> {
    let Query(pairs) = query.map_err(|e| SearchError::invalid("query", e.body_text()))?;
    let spec = SearchParams::from_pairs(pairs)?
        .into_filter_spec(state.engine.limits().default_page_size)?;
    let page = state.engine.search(&spec).await?;
    Ok(Json(page))
}

/// `GET /categories`
pub async fn list_categories_handler(
    Extension(state): Extension<AxumAppState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.engine.categories().await?))
}
