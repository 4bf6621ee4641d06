use dalal_core::common::time::format_timestamp;
use dalal_core::market::entity::{Bar, TimeSeriesPoint};
use dalal_core::market::error::MarketError;
use tracing::info;

/// # Summary
/// 将上游 K 线序列一对一投影为时间序列点。
///
/// # Logic
/// 1. 空序列视为该证券在请求区间内无数据，返回 `NotFound`。
/// 2. 逐行转换：OHLC 保持 f64，成交量转为整数，原生时间原样保留。
/// 3. 不插值、不补缺、不重采样，顺序与上游一致。
/// 4. 记录最新一个点的收盘价与换算后时间，仅用于运维排查。
///
/// # Arguments
/// * `symbol`: 证券代码，用于错误提示与日志。
/// * `bars`: 上游 K 线。
///
/// # Returns
/// 与输入等长的时间序列点列表。
pub fn normalize_series(symbol: &str, bars: &[Bar]) -> Result<Vec<TimeSeriesPoint>, MarketError> {
    if bars.is_empty() {
        info!("No data found for ticker: {}", symbol);
        return Err(MarketError::NotFound(format!(
            "No data found for ticker: {}",
            symbol
        )));
    }

    let points: Vec<TimeSeriesPoint> = bars.iter().map(to_point).collect();

    if let Some(latest) = points.last() {
        info!(
            "Latest data for {}: Close={}, Date={}",
            symbol,
            latest.close,
            format_timestamp(&latest.timestamp_target())
        );
    }

    Ok(points)
}

fn to_point(bar: &Bar) -> TimeSeriesPoint {
    TimeSeriesPoint {
        timestamp_native: bar.time,
        open: bar.open,
        high: bar.high,
        low: bar.low,
        close: bar.close,
        volume: volume_to_i64(bar.volume),
    }
}

/// 成交量取整 (向零截断，越界饱和，NaN 记为 0)
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn volume_to_i64(volume: f64) -> i64 {
    volume as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn bar(hour: u32, close: f64, volume: f64) -> Bar {
        let tz = FixedOffset::east_opt(19800).unwrap();
        Bar {
            time: tz.with_ymd_and_hms(2024, 5, 2, hour, 15, 0).unwrap(),
            open: close - 1.0,
            high: close + 2.0,
            low: close - 2.0,
            close,
            volume,
        }
    }

    #[test]
    fn test_empty_series_is_not_found() {
        let err = normalize_series("NOPE.NS", &[]).unwrap_err();
        assert_eq!(
            err,
            MarketError::NotFound("No data found for ticker: NOPE.NS".into())
        );
    }

    #[test]
    fn test_preserves_count_and_order() {
        // 故意乱序，验证不做重排
        let bars = vec![bar(11, 3.0, 30.0), bar(9, 1.0, 10.0), bar(10, 2.0, 20.0), bar(10, 2.0, 20.0)];
        let points = normalize_series("X", &bars).unwrap();
        assert_eq!(points.len(), bars.len());
        for (p, b) in points.iter().zip(&bars) {
            assert_eq!(p.timestamp_native, b.time);
            assert_eq!(p.close, b.close);
        }
    }

    #[test]
    fn test_target_timestamp_derived_from_native() {
        let points = normalize_series("X", &[bar(9, 100.0, 1.0)]).unwrap();
        assert_eq!(format_timestamp(&points[0].timestamp_native), "2024-05-02 09:15:00");
        assert_eq!(format_timestamp(&points[0].timestamp_target()), "2024-05-02 14:45:00");
    }

    #[test]
    fn test_volume_truncates() {
        assert_eq!(volume_to_i64(1234.9), 1234);
        assert_eq!(volume_to_i64(0.0), 0);
        assert_eq!(volume_to_i64(f64::NAN), 0);
    }
}
