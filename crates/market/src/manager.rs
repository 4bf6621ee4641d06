use crate::series::normalize_series;
use crate::snapshot::{log_snapshot, normalize_equity, normalize_index};
use async_trait::async_trait;
use dalal_core::common::is_index_symbol;
use dalal_core::market::entity::{SnapshotRecord, TimeSeriesPoint};
use dalal_core::market::error::MarketError;
use dalal_core::market::port::{Market, MarketDataProvider};
use dalal_core::query::entity::QuerySpec;
use std::sync::Arc;
use tracing::{debug, info};

/// # Summary
/// Market 领域服务的具体实现类。
///
/// # Invariants
/// - 除上游驱动外不持有任何状态，每次请求独立完成 抓取 → 归一化。
/// - 时间序列请求只调用一次上游；指数快照恰好两次 (快照 + 最新日线)。
pub struct MarketImpl {
    // 原始行情数据源驱动
    provider: Arc<dyn MarketDataProvider>,
}

impl MarketImpl {
    /// # Summary
    /// 初始化 Market 领域服务。
    ///
    /// # Arguments
    /// * `provider`: 满足 MarketDataProvider 接口的数据源驱动。
    ///
    /// # Returns
    /// 返回 MarketImpl 的共享指针。
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Arc<Self> {
        Arc::new(Self { provider })
    }
}

#[async_trait]
impl Market for MarketImpl {
    /// # Logic
    /// 1. 以校验后的 (symbol, period, interval) 调用上游。
    /// 2. 交给 `normalize_series` 做一对一投影，空序列即 NotFound。
    async fn stock_data(&self, query: &QuerySpec) -> Result<Vec<TimeSeriesPoint>, MarketError> {
        info!(
            "Fetching data for {} with period={} and interval={}",
            query.symbol, query.period, query.interval
        );

        let bars = self
            .provider
            .fetch_history(&query.symbol, query.period, query.interval)
            .await?;

        let points = normalize_series(&query.symbol, &bars)?;
        info!("Retrieved {} data points for {}", points.len(), query.symbol);
        Ok(points)
    }

    /// # Logic
    /// 1. 先拉取快照 (指数与个股都需要)。
    /// 2. 指数额外拉取最新日线并走指数路径；个股直接拷贝字段。
    /// 3. 记录完整的归一化结果。
    async fn snapshot(&self, symbol: &str) -> Result<SnapshotRecord, MarketError> {
        let info = self.provider.fetch_info(symbol).await?;

        let record = if is_index_symbol(symbol) {
            debug!("{} is an index, using latest daily bar", symbol);
            let latest = self.provider.fetch_latest_bar(symbol).await?;
            normalize_index(symbol, &info, latest.as_ref())?
        } else {
            normalize_equity(symbol, &info)
        };

        log_snapshot(&record);
        Ok(record)
    }
}
