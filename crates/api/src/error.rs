//! # API 统一错误处理
//!
//! 将领域层的校验错误与行情错误统一映射到 HTTP 状态码与 JSON 响应体。

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dalal_core::market::error::MarketError;
use dalal_core::query::error::QueryError;
use thiserror::Error;

use crate::types::ApiErrorResponse;

/// API 层统一错误枚举
#[derive(Error, Debug)]
pub enum ApiError {
    /// 请求参数错误 (400)
    #[error("{0}")]
    BadRequest(String),

    /// 资源未找到 (404)
    #[error("{0}")]
    NotFound(String),

    /// 上游或内部故障 (500)，`message` 为底层错误信息
    #[error("{error}: {message}")]
    Internal { error: String, message: String },
}

impl ApiError {
    /// # Summary
    /// 按请求上下文转换行情错误。
    ///
    /// # Logic
    /// 1. `NotFound` → 404，沿用领域层的描述。
    /// 2. 其余 (网络、解析、未知) 属于上游故障 → 500，`context` 作为 `error` 字段。
    pub fn from_market(err: MarketError, context: &str) -> Self {
        match err {
            MarketError::NotFound(msg) => ApiError::NotFound(msg),
            other => ApiError::Internal {
                error: context.to_string(),
                message: other.to_string(),
            },
        }
    }
}

/// 将 `ApiError` 转换为 axum 的 HTTP 响应
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, ApiErrorResponse::from_msg(msg))
            }
            ApiError::NotFound(msg) => {
                tracing::warn!("Not found: {}", msg);
                (StatusCode::NOT_FOUND, ApiErrorResponse::from_msg(msg))
            }
            ApiError::Internal { error, message } => {
                // 面向内部开发者的服务，故障细节直接透传给调用方
                tracing::error!("{}: {}", error, message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorResponse::from_msg(error).with_message(message),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// 从 `QueryError` 转换，缺参与越界取值都是 400
impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}
