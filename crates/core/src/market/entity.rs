use crate::common::time::to_target_zone;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// # Summary
/// 上游返回的单根 K 线。
///
/// # Invariants
/// - `time` 为上游报告时区 (交易所偏移) 下的时间。
/// - 缺失成交量的行由数据源按 0 填充。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    // K 线开始时间 (上游原生时区)
    pub time: DateTime<FixedOffset>,
    // 开盘价
    pub open: f64,
    // 最高价
    pub high: f64,
    // 最低价
    pub low: f64,
    // 收盘价
    pub close: f64,
    // 成交量
    pub volume: f64,
}

/// # Summary
/// 上游报价/描述快照，字段与上游命名一一对应。
///
/// # Invariants
/// - 上游未提供的字段保持 `None`，不做任何默认填充。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteInfo {
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
}

/// # Summary
/// 归一化后的时间序列点。
///
/// # Invariants
/// - 只存储原生时间；目标时区时间始终由 `timestamp_target()` 即时换算得出。
/// - 序列顺序与上游保持一致，不排序、不去重。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    pub timestamp_native: DateTime<FixedOffset>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl TimeSeriesPoint {
    /// 目标时区 (IST) 下的时间
    pub fn timestamp_target(&self) -> DateTime<FixedOffset> {
        to_target_zone(&self.timestamp_native)
    }
}

/// # Summary
/// 归一化后的证券快照。
///
/// # Invariants
/// - 缺失字段为 `None` (序列化为 null)，绝不伪造默认值。
/// - `percent_change` 仅对指数计算；个股恒为 `None`。
/// - 指数的 `market_cap` 恒为 `None`。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRecord {
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_change: Option<f64>,
}
