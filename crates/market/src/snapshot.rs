use crate::series::volume_to_i64;
use dalal_core::market::entity::{Bar, QuoteInfo, SnapshotRecord};
use dalal_core::market::error::MarketError;
use tracing::{info, warn};

/// # Summary
/// 个股快照：按固定字段清单原样拷贝。
///
/// # Logic
/// 1. 上游缺失的字段保持 `None`，不默认、不报错。
/// 2. 不计算涨跌幅。
pub fn normalize_equity(symbol: &str, info: &QuoteInfo) -> SnapshotRecord {
    SnapshotRecord {
        symbol: symbol.to_string(),
        current_price: info.current_price,
        previous_close: info.previous_close,
        open: info.open,
        day_high: info.day_high,
        day_low: info.day_low,
        regular_market_price: info.regular_market_price,
        regular_market_day_high: info.regular_market_day_high,
        regular_market_day_low: info.regular_market_day_low,
        regular_market_open: info.regular_market_open,
        regular_market_volume: info.regular_market_volume,
        market_cap: info.market_cap,
        percent_change: None,
    }
}

/// # Summary
/// 指数快照：以最新日内 K 线为准并计算涨跌幅。
///
/// # Logic
/// 1. 无最新 K 线 → `NotFound`。
/// 2. 现价取最新收盘价；昨收取快照的 `previous_close`，缺失时回退为现价。
/// 3. 日内高低开与成交量取自最新 K 线。
/// 4. 指数没有市值，`market_cap` 恒为 None。
///
/// # Arguments
/// * `symbol`: 指数代码。
/// * `info`: 上游快照。
/// * `latest`: 最新一根日线。
///
/// # Returns
/// 成功返回快照记录。
pub fn normalize_index(
    symbol: &str,
    info: &QuoteInfo,
    latest: Option<&Bar>,
) -> Result<SnapshotRecord, MarketError> {
    let Some(bar) = latest else {
        warn!("No data found for index: {}", symbol);
        return Err(MarketError::NotFound(format!(
            "No data found for index: {}",
            symbol
        )));
    };

    let current_price = bar.close;
    // 昨收缺失时回退为现价，此时涨跌幅为 0
    let previous_close = info.previous_close.unwrap_or(current_price);

    Ok(SnapshotRecord {
        symbol: symbol.to_string(),
        current_price: Some(current_price),
        previous_close: Some(previous_close),
        open: Some(bar.open),
        day_high: Some(bar.high),
        day_low: Some(bar.low),
        regular_market_price: Some(current_price),
        regular_market_day_high: Some(bar.high),
        regular_market_day_low: Some(bar.low),
        regular_market_open: Some(bar.open),
        regular_market_volume: Some(volume_to_i64(bar.volume)),
        market_cap: None,
        percent_change: Some(percent_change(current_price, previous_close)),
    })
}

/// # Summary
/// 涨跌幅 (百分比)。
///
/// # Invariants
/// - `previous` 为 0 时返回 0，不做除法。
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    (current - previous) / previous * 100.0
}

/// 以缩进 JSON 记录快照，序列化失败时退化为 Debug 输出
pub(crate) fn log_snapshot(record: &SnapshotRecord) {
    match serde_json::to_string_pretty(record) {
        Ok(json) => info!("Debug info for {}: {}", record.symbol, json),
        Err(_) => info!("Debug info for {}: {:?}", record.symbol, record),
    }
}
