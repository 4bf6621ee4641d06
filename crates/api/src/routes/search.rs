//! # 证券搜索路由控制器
//!
//! 仅在内置的十只标的中做子串匹配。

use axum::Json;
use axum::extract::State;
use dalal_core::query::entity::parse_search_query;

use crate::error::ApiError;
use crate::extract::QueryParams;
use crate::server::AppState;
use crate::types::{ApiErrorResponse, SearchQuery, SearchResponse};

/// 搜索证券
#[utoipa::path(
    get,
    path = "/search",
    tag = "搜索 (Search)",
    params(SearchQuery),
    responses(
        (status = 200, description = "匹配结果，可能为空", body = SearchResponse),
        (status = 400, description = "缺少关键字", body = ApiErrorResponse)
    )
)]
pub async fn search_stocks(
    State(state): State<AppState>,
    params: QueryParams,
) -> Result<Json<SearchResponse>, ApiError> {
    let q = parse_search_query(params.first("q"))?;
    tracing::info!("Searching for stocks matching: {}", q);

    let result = state.catalog.search(q).into_iter().map(Into::into).collect();
    Ok(Json(SearchResponse { result }))
}
