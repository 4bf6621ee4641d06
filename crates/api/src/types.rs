//! # DTO (Data Transfer Object) 层
//!
//! 将内部领域模型转化为面向前端 JSON 输出的轻量结构体。
//! 字段名即对外契约 (例如 `Date` / `Converted_Date`)，不得随意调整。
//! 所有 DTO 必须派生 `utoipa::ToSchema` 以自动进入 Swagger 文档。

use dalal_core::catalog::entity::InstrumentRef;
use dalal_core::common::time::format_timestamp;
use dalal_core::market::entity::{SnapshotRecord, TimeSeriesPoint};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

// ============================================================
//  查询参数
// ============================================================

/// `/stock_data` 查询参数的文档描述。全部可缺省，由领域层决定缺省值与必填项；
/// 实际提取见 `extract::QueryParams`，重复的键取第一个值
#[derive(Debug, Clone, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StockDataQuery {
    /// 证券代码 (必填)
    #[param(example = "TCS.NS")]
    pub ticker: Option<String>,
    /// 回溯区间: 1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, ytd, max (缺省 1d)
    #[param(example = "5d")]
    pub period: Option<String>,
    /// K 线周期: 1m, 2m, 5m, 15m, 30m, 60m, 90m, 1h, 1d, 5d, 1wk, 1mo (缺省 1d)
    #[param(example = "15m")]
    pub interval: Option<String>,
}

/// `/search` 查询参数的文档描述
#[derive(Debug, Clone, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// 搜索关键字 (必填，匹配代码或名称，不区分大小写)
    #[param(example = "TCS")]
    pub q: Option<String>,
}

// ============================================================
//  行情相关 DTO
// ============================================================

/// 时间序列点 DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StockDataPoint {
    /// 上游原生时区下的时间
    #[serde(rename = "Date")]
    #[schema(example = "2024-05-02 09:15:00")]
    pub date: String,
    #[serde(rename = "Open")]
    #[schema(example = 3850.0)]
    pub open: f64,
    #[serde(rename = "High")]
    #[schema(example = 3860.0)]
    pub high: f64,
    #[serde(rename = "Low")]
    #[schema(example = 3845.0)]
    pub low: f64,
    #[serde(rename = "Close")]
    #[schema(example = 3855.5)]
    pub close: f64,
    #[serde(rename = "Volume")]
    #[schema(example = 12000)]
    pub volume: i64,
    /// 目标时区 (IST) 下的时间
    #[serde(rename = "Converted_Date")]
    #[schema(example = "2024-05-02 14:45:00")]
    pub converted_date: String,
}

/// 证券快照 DTO。缺失字段输出为 null；`percentChange` 仅指数返回
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotResponse {
    #[schema(example = "^NSEI")]
    pub symbol: String,
    pub current_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub open: Option<f64>,
    pub day_high: Option<f64>,
    pub day_low: Option<f64>,
    pub regular_market_price: Option<f64>,
    pub regular_market_day_high: Option<f64>,
    pub regular_market_day_low: Option<f64>,
    pub regular_market_open: Option<f64>,
    pub regular_market_volume: Option<i64>,
    pub market_cap: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent_change: Option<f64>,
}

// ============================================================
//  搜索相关 DTO
// ============================================================

/// 证券目录条目 DTO
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct InstrumentResponse {
    #[schema(example = "TCS.NS")]
    pub symbol: String,
    #[schema(example = "Tata Consultancy Services Ltd")]
    pub name: String,
}

/// 搜索结果包装
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchResponse {
    pub result: Vec<InstrumentResponse>,
}

// ============================================================
//  通用响应 DTO
// ============================================================

/// 失败响应。4xx 仅含 `error`；5xx 附带 `message`，panic 兜底额外附带 `stack`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 错误描述信息
    pub error: String,
    /// 底层故障信息 (仅 5xx)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// 调用栈 (仅 panic 兜底)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ApiErrorResponse {
    /// 从错误信息构建
    pub fn from_msg(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            message: None,
            stack: None,
        }
    }

    /// 附带底层故障信息
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// 附带调用栈
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

// ============================================================
//  领域模型 → DTO 惯用转换 (impl From<T>)
// ============================================================

impl From<TimeSeriesPoint> for StockDataPoint {
    fn from(p: TimeSeriesPoint) -> Self {
        Self {
            date: format_timestamp(&p.timestamp_native),
            converted_date: format_timestamp(&p.timestamp_target()),
            open: p.open,
            high: p.high,
            low: p.low,
            close: p.close,
            volume: p.volume,
        }
    }
}

impl From<SnapshotRecord> for SnapshotResponse {
    fn from(r: SnapshotRecord) -> Self {
        Self {
            symbol: r.symbol,
            current_price: r.current_price,
            previous_close: r.previous_close,
            open: r.open,
            day_high: r.day_high,
            day_low: r.day_low,
            regular_market_price: r.regular_market_price,
            regular_market_day_high: r.regular_market_day_high,
            regular_market_day_low: r.regular_market_day_low,
            regular_market_open: r.regular_market_open,
            regular_market_volume: r.regular_market_volume,
            market_cap: r.market_cap,
            percent_change: r.percent_change,
        }
    }
}

impl From<InstrumentRef> for InstrumentResponse {
    fn from(i: InstrumentRef) -> Self {
        Self {
            symbol: i.symbol,
            name: i.name,
        }
    }
}
