//! # 行情路由控制器
//!
//! - `GET /stock_data`: 校验参数 → 拉取历史 K 线 → 归一化为双时间戳序列
//! - `GET /debug/{symbol}`: 拉取证券快照，指数与个股返回不同字段集

use axum::Json;
use axum::extract::{Path, State};
use dalal_core::query::entity::QuerySpec;

use crate::error::ApiError;
use crate::extract::QueryParams;
use crate::server::AppState;
use crate::types::{ApiErrorResponse, SnapshotResponse, StockDataPoint, StockDataQuery};

/// 获取历史时间序列
///
/// 每个点同时给出上游原生时间 (`Date`) 与 IST 时间 (`Converted_Date`)。
#[utoipa::path(
    get,
    path = "/stock_data",
    tag = "行情 (Market)",
    params(StockDataQuery),
    responses(
        (status = 200, description = "时间序列，顺序与上游一致", body = Vec<StockDataPoint>),
        (status = 400, description = "缺少 ticker 或 period/interval 不合法", body = ApiErrorResponse),
        (status = 404, description = "该证券在请求区间内无数据", body = ApiErrorResponse),
        (status = 500, description = "上游故障", body = ApiErrorResponse)
    )
)]
pub async fn get_stock_data(
    State(state): State<AppState>,
    params: QueryParams,
) -> Result<Json<Vec<StockDataPoint>>, ApiError> {
    let spec = QuerySpec::parse(
        params.first("ticker"),
        params.first("period"),
        params.first("interval"),
    )?;

    let points = state
        .market
        .stock_data(&spec)
        .await
        .map_err(|e| ApiError::from_market(e, "Failed to fetch stock data"))?;

    Ok(Json(points.into_iter().map(Into::into).collect()))
}

/// 获取证券快照
///
/// 以 `^` 开头的代码按指数处理：价格取自最新日线，并计算 `percentChange`，`marketCap` 恒为 null。
#[utoipa::path(
    get,
    path = "/debug/{symbol}",
    tag = "行情 (Market)",
    params(
        ("symbol" = String, Path, description = "证券或指数代码", example = "^NSEI")
    ),
    responses(
        (status = 200, description = "快照，缺失字段为 null", body = SnapshotResponse),
        (status = 404, description = "指数无最新日线数据", body = ApiErrorResponse),
        (status = 500, description = "上游故障", body = ApiErrorResponse)
    )
)]
pub async fn get_debug_snapshot(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<SnapshotResponse>, ApiError> {
    let record = state
        .market
        .snapshot(&symbol)
        .await
        .map_err(|e| ApiError::from_market(e, "Failed to fetch debug data"))?;

    Ok(Json(record.into()))
}
