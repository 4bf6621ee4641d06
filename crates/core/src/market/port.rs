use crate::common::{Interval, Period};
use crate::market::entity::{Bar, QuoteInfo, SnapshotRecord, TimeSeriesPoint};
use crate::market::error::MarketError;
use crate::query::entity::QuerySpec;
use async_trait::async_trait;

/// # Summary
/// 上游行情数据提供者接口（原始数据源）。
///
/// # Invariants
/// - 每次调用至多发起一次上游请求，不做重试与缓存。
/// - 返回的 K 线保持上游的时间顺序。
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// # Summary
    /// 获取特定证券在指定回溯区间与周期下的 K 线序列。
    ///
    /// # Arguments
    /// * `symbol`: 证券代码。
    /// * `period`: 回溯区间。
    /// * `interval`: K 线周期。
    ///
    /// # Returns
    /// 成功返回 K 线列表 (可能为空)，上游故障返回 MarketError。
    async fn fetch_history(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
    ) -> Result<Vec<Bar>, MarketError>;

    /// # Summary
    /// 获取证券的报价/描述快照。
    ///
    /// # Returns
    /// 成功返回快照，缺失字段为 None。
    async fn fetch_info(&self, symbol: &str) -> Result<QuoteInfo, MarketError>;

    /// # Summary
    /// 获取最近一个交易日的最新 K 线。
    ///
    /// # Logic
    /// 1. 以 (1d, 1d) 拉取历史。
    /// 2. 取最后一根；无数据时返回 None。
    async fn fetch_latest_bar(&self, symbol: &str) -> Result<Option<Bar>, MarketError> {
        let mut bars = self
            .fetch_history(symbol, Period::Day1, Interval::Day1)
            .await?;
        Ok(bars.pop())
    }
}

/// # Summary
/// Market 领域服务契约：校验后的查询 → 归一化结果。
///
/// # Invariants
/// - 无跨请求状态，实现必须可重入。
#[async_trait]
pub trait Market: Send + Sync {
    /// # Summary
    /// 拉取并归一化时间序列。
    ///
    /// # Returns
    /// 非空序列；上游无数据时返回 `MarketError::NotFound`。
    async fn stock_data(&self, query: &QuerySpec) -> Result<Vec<TimeSeriesPoint>, MarketError>;

    /// # Summary
    /// 拉取并归一化证券快照，指数与个股走不同路径。
    async fn snapshot(&self, symbol: &str) -> Result<SnapshotRecord, MarketError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use std::sync::Mutex;

    /// 记录请求参数并按预设返回 K 线
    struct Recorder {
        bars: Vec<Bar>,
        seen: Mutex<Vec<(Period, Interval)>>,
    }

    #[async_trait]
    impl MarketDataProvider for Recorder {
        async fn fetch_history(
            &self,
            _symbol: &str,
            period: Period,
            interval: Interval,
        ) -> Result<Vec<Bar>, MarketError> {
            self.seen.lock().unwrap().push((period, interval));
            Ok(self.bars.clone())
        }

        async fn fetch_info(&self, _symbol: &str) -> Result<QuoteInfo, MarketError> {
            Ok(QuoteInfo::default())
        }
    }

    fn bar(day: u32, close: f64) -> Bar {
        Bar {
            time: FixedOffset::east_opt(19800)
                .unwrap()
                .with_ymd_and_hms(2024, 5, day, 0, 0, 0)
                .unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 0.0,
        }
    }

    #[tokio::test]
    async fn test_latest_bar_uses_daily_window() {
        let provider = Recorder {
            bars: vec![bar(1, 10.0), bar(2, 11.0)],
            seen: Mutex::new(vec![]),
        };
        let latest = provider.fetch_latest_bar("^NSEI").await.unwrap();
        assert_eq!(latest.map(|b| b.close), Some(11.0));
        assert_eq!(
            *provider.seen.lock().unwrap(),
            vec![(Period::Day1, Interval::Day1)]
        );
    }

    #[tokio::test]
    async fn test_latest_bar_absent_when_empty() {
        let provider = Recorder {
            bars: vec![],
            seen: Mutex::new(vec![]),
        };
        assert_eq!(provider.fetch_latest_bar("^GONE").await.unwrap(), None);
    }
}
