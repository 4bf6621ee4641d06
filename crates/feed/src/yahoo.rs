use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, TimeZone};
use dalal_core::common::{Interval, Period};
use dalal_core::config::FeedConfig;
use dalal_core::market::entity::{Bar, QuoteInfo};
use dalal_core::market::error::MarketError;
use dalal_core::market::port::MarketDataProvider;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// 快照所需的 quoteSummary 模块
const SUMMARY_MODULES: &str = "price,summaryDetail,financialData";

/// # Summary
/// Yahoo Finance 行情提供者实现。
///
/// # Invariants
/// - 使用 `reqwest` 异步客户端进行通讯，开启 Cookie 存储以完成 crumb 握手。
/// - crumb 申请一次后复用，克隆实例之间共享；被上游拒绝 (401/403) 时丢弃，下一次请求重新握手。
/// - 证券代码只作为单个 URL 路径段出现，不会改写查询参数。
/// - 不重试，超时由客户端配置决定。
#[derive(Clone)]
pub struct YahooProvider {
    /// 内部使用的 HTTP 客户端
    client: Client,
    /// API 根地址，如 `https://query1.finance.yahoo.com`
    base_url: Url,
    /// 换取会话 Cookie 的入口
    cookie_url: String,
    /// quoteSummary 接口需要的 crumb，None 表示尚未握手或已失效
    crumb: Arc<Mutex<Option<String>>>,
}

impl YahooProvider {
    /// # Summary
    /// 创建一个新的 YahooProvider 实例。
    ///
    /// # Logic
    /// 1. 安装 rustls 的 ring 加密后端 (已安装则跳过)。
    /// 2. 按配置设置超时与伪装浏览器 User-Agent。
    /// 3. 初始化 reqwest 客户端。
    /// 4. 解析 API 根地址，后续所有请求都在其上追加路径段。
    ///
    /// # Arguments
    /// * `config`: 上游配置。
    ///
    /// # Returns
    /// 成功返回 YahooProvider；根地址非法返回 `MarketError::Unknown`，客户端构建失败返回 `MarketError::Network`。
    pub fn new(config: &FeedConfig) -> Result<Self, MarketError> {
        if rustls::crypto::ring::default_provider()
            .install_default()
            .is_err()
        {
            debug!("rustls crypto provider already installed");
        }

        let mut headers = reqwest::header::HeaderMap::new();
        let user_agent = config
            .user_agent
            .parse()
            .map_err(|e| MarketError::Unknown(format!("Invalid user agent: {}", e)))?;
        headers.insert(reqwest::header::USER_AGENT, user_agent);

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .cookie_store(true)
            .build()
            .map_err(|e| MarketError::Network(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| MarketError::Unknown(format!("Invalid base url {}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(MarketError::Unknown(format!(
                "Invalid base url: {}",
                config.base_url
            )));
        }

        Ok(Self {
            client,
            base_url,
            cookie_url: config.cookie_url.clone(),
            crumb: Arc::new(Mutex::new(None)),
        })
    }

    /// # Summary
    /// 在根地址后追加路径段。
    ///
    /// # Invariants
    /// - 每个段单独做百分号编码，段内的 `?`、`#`、`/` 不会变成查询串或新的路径层级。
    fn api_url(&self, segments: &[&str]) -> Result<Url, MarketError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| MarketError::Unknown(format!("Invalid base url: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// # Summary
    /// 获取 quoteSummary 所需的 crumb，缓存为空时先完成握手。
    ///
    /// # Logic
    /// 1. 持锁检查缓存，命中直接返回。
    /// 2. 未命中时握手并写回缓存；并发请求在锁上等待，同一时刻只握手一次。
    async fn crumb(&self) -> Result<String, MarketError> {
        let mut cached = self.crumb.lock().await;
        if let Some(crumb) = cached.as_ref() {
            return Ok(crumb.clone());
        }

        let crumb = self.request_crumb().await?;
        *cached = Some(crumb.clone());
        Ok(crumb)
    }

    /// # Summary
    /// 丢弃被上游拒绝的 crumb。
    ///
    /// # Logic
    /// 1. 仅当缓存仍是被拒绝的那个值时才清空，避免覆盖其他请求刚刷新的 crumb。
    async fn invalidate_crumb(&self, rejected: &str) {
        let mut cached = self.crumb.lock().await;
        if cached.as_deref() == Some(rejected) {
            debug!("Dropping rejected crumb");
            *cached = None;
        }
    }

    /// # Summary
    /// 与上游握手，申请新的 crumb。
    ///
    /// # Logic
    /// 1. 访问 Cookie 入口写入会话 Cookie，该请求的状态码无意义。
    /// 2. 调用 `/v1/test/getcrumb` 取得 crumb 文本。
    async fn request_crumb(&self) -> Result<String, MarketError> {
        if let Err(e) = self.client.get(&self.cookie_url).send().await {
            debug!("Cookie handshake failed: {}", e);
        }

        let resp = self
            .client
            .get(self.api_url(&["v1", "test", "getcrumb"])?)
            .send()
            .await
            .map_err(|e| MarketError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(MarketError::Network(format!(
                "crumb request failed: HTTP {}",
                resp.status()
            )));
        }

        let crumb = resp
            .text()
            .await
            .map_err(|e| MarketError::Parse(e.to_string()))?;
        let crumb = crumb.trim();
        if crumb.is_empty() {
            return Err(MarketError::Parse("empty crumb".into()));
        }
        Ok(crumb.to_string())
    }
}

// ============================================================
//  v8 chart 接口
// ============================================================

/// Yahoo chart 响应顶层结构
#[derive(Deserialize, Debug)]
struct YahooResponse {
    chart: YahooChart,
}

#[derive(Deserialize, Debug)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

/// Yahoo API 错误详情 (chart 与 quoteSummary 共用)
#[derive(Deserialize, Debug)]
struct YahooError {
    code: Option<String>,
    description: Option<String>,
}

impl YahooError {
    fn is_not_found(&self) -> bool {
        self.code.as_deref() == Some("Not Found")
    }

    fn describe(&self) -> String {
        self.description
            .clone()
            .or_else(|| self.code.clone())
            .unwrap_or_else(|| "unknown upstream error".to_string())
    }
}

/// 单个时间序列结果。无数据时上游会省略 `timestamp`
#[derive(Deserialize, Debug)]
struct YahooResult {
    meta: YahooMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: YahooIndicators,
}

#[derive(Deserialize, Debug)]
struct YahooMeta {
    /// 交易所相对 UTC 的秒数偏移
    #[serde(default)]
    gmtoffset: i32,
}

#[derive(Deserialize, Debug)]
struct YahooIndicators {
    #[serde(default)]
    quote: Vec<YahooQuote>,
}

/// Yahoo API 原始报价数据，缺失值为 null
#[derive(Deserialize, Debug, Default)]
struct YahooQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// # Summary
/// 将 chart 响应体解析为 K 线序列。
///
/// # Logic
/// 1. `chart.error` 为 "Not Found" 或结果为空 → 空序列，由归一化层判定 NotFound。
/// 2. 其他 `chart.error` → `MarketError::Unknown`。
/// 3. OHLC 任一缺失的行被丢弃；缺失成交量记为 0。
/// 4. 时间戳按交易所偏移 (`meta.gmtoffset`) 呈现；非日内周期对齐到本地零点。
fn parse_chart(body: &str, interval: Interval) -> Result<Vec<Bar>, MarketError> {
    let json: YahooResponse =
        serde_json::from_str(body).map_err(|e| MarketError::Parse(e.to_string()))?;

    if let Some(err) = json.chart.error {
        if err.is_not_found() {
            debug!("chart reports no data: {}", err.describe());
            return Ok(Vec::new());
        }
        return Err(MarketError::Unknown(err.describe()));
    }

    let Some(result) = json.chart.result.and_then(|mut r| r.pop()) else {
        return Ok(Vec::new());
    };

    let offset = FixedOffset::east_opt(result.meta.gmtoffset)
        .ok_or_else(|| MarketError::Parse(format!("Invalid gmtoffset: {}", result.meta.gmtoffset)))?;
    let empty = YahooQuote::default();
    let quote = result.indicators.quote.first().unwrap_or(&empty);

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let (Some(open), Some(high), Some(low), Some(close)) = (
            quote.open.get(i).copied().flatten(),
            quote.high.get(i).copied().flatten(),
            quote.low.get(i).copied().flatten(),
            quote.close.get(i).copied().flatten(),
        ) else {
            continue;
        };

        let time = bar_time(ts, offset, interval.is_intraday())
            .ok_or_else(|| MarketError::Parse(format!("Invalid timestamp: {}", ts)))?;

        bars.push(Bar {
            time,
            open,
            high,
            low,
            close,
            volume: quote.volume.get(i).copied().flatten().unwrap_or(0.0),
        });
    }

    Ok(bars)
}

/// 秒级时间戳 → 交易所时区时间；日线及以上截断到本地零点
fn bar_time(ts: i64, offset: FixedOffset, intraday: bool) -> Option<DateTime<FixedOffset>> {
    let local = DateTime::from_timestamp(ts, 0)?.with_timezone(&offset);
    if intraday {
        return Some(local);
    }
    let midnight = local.date_naive().and_hms_opt(0, 0, 0)?;
    offset.from_local_datetime(&midnight).single()
}

// ============================================================
//  v10 quoteSummary 接口
// ============================================================

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct SummaryResponse {
    quote_summary: SummaryEnvelope,
}

#[derive(Deserialize, Debug)]
struct SummaryEnvelope {
    result: Option<Vec<SummaryResult>>,
    error: Option<YahooError>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct SummaryResult {
    #[serde(default)]
    price: SummaryModule,
    #[serde(default)]
    summary_detail: SummaryModule,
    #[serde(default)]
    financial_data: SummaryModule,
}

/// 三个模块共用的字段集合，模块之间字段名不冲突
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct SummaryModule {
    current_price: Option<RawValue>,
    previous_close: Option<RawValue>,
    regular_market_previous_close: Option<RawValue>,
    open: Option<RawValue>,
    day_high: Option<RawValue>,
    day_low: Option<RawValue>,
    regular_market_price: Option<RawValue>,
    regular_market_day_high: Option<RawValue>,
    regular_market_day_low: Option<RawValue>,
    regular_market_open: Option<RawValue>,
    regular_market_volume: Option<RawValue>,
    market_cap: Option<RawValue>,
}

/// `{"raw": 1.0, "fmt": "1.00"}`；缺失值为 `{}`
#[derive(Deserialize, Debug, Default, Clone, Copy)]
struct RawValue {
    raw: Option<f64>,
}

fn raw(v: Option<RawValue>) -> Option<f64> {
    v.and_then(|v| v.raw)
}

/// 整数字段 (成交量、市值) 的取整
#[allow(clippy::cast_possible_truncation)]
fn raw_int(v: Option<RawValue>) -> Option<i64> {
    raw(v).filter(|x| x.is_finite()).map(|x| x as i64)
}

/// # Summary
/// 将 quoteSummary 响应体解析为报价快照。
///
/// # Logic
/// 1. `error` 为 "Not Found" 或无结果 → 全空快照 (调用方按字段缺失处理)。
/// 2. 字段优先取 `summaryDetail`，缺失时回落到 `price` 模块；`currentPrice` 来自 `financialData`。
fn parse_quote_summary(body: &str) -> Result<QuoteInfo, MarketError> {
    let json: SummaryResponse =
        serde_json::from_str(body).map_err(|e| MarketError::Parse(e.to_string()))?;

    if let Some(err) = json.quote_summary.error {
        if err.is_not_found() {
            debug!("quoteSummary reports no data: {}", err.describe());
            return Ok(QuoteInfo::default());
        }
        return Err(MarketError::Unknown(err.describe()));
    }

    let Some(r) = json.quote_summary.result.and_then(|mut r| r.pop()) else {
        return Ok(QuoteInfo::default());
    };
    let (detail, price, financial) = (&r.summary_detail, &r.price, &r.financial_data);

    Ok(QuoteInfo {
        current_price: raw(financial.current_price),
        previous_close: raw(detail.previous_close).or(raw(price.regular_market_previous_close)),
        open: raw(detail.open),
        day_high: raw(detail.day_high),
        day_low: raw(detail.day_low),
        regular_market_price: raw(price.regular_market_price),
        regular_market_day_high: raw(detail.regular_market_day_high).or(raw(price.regular_market_day_high)),
        regular_market_day_low: raw(detail.regular_market_day_low).or(raw(price.regular_market_day_low)),
        regular_market_open: raw(detail.regular_market_open).or(raw(price.regular_market_open)),
        regular_market_volume: raw_int(detail.regular_market_volume).or(raw_int(price.regular_market_volume)),
        market_cap: raw_int(detail.market_cap).or(raw_int(price.market_cap)),
    })
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    /// # Summary
    /// 从 Yahoo Finance 抓取 K 线历史数据。
    ///
    /// # Logic
    /// 1. 以 `range` / `interval` 参数调用 v8 chart 接口。
    /// 2. HTTP 404 视为无数据，返回空序列。
    /// 3. 其他非 2xx 状态视为网络故障。
    /// 4. 解析响应体。
    async fn fetch_history(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
    ) -> Result<Vec<Bar>, MarketError> {
        let url = self.api_url(&["v8", "finance", "chart", symbol])?;
        debug!("GET {} range={} interval={}", url, period, interval);

        let resp = self
            .client
            .get(url)
            .query(&[
                ("range", period.as_str()),
                ("interval", interval.as_str()),
                ("includePrePost", "false"),
                ("events", "div,splits"),
            ])
            .send()
            .await
            .map_err(|e| MarketError::Network(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            debug!("chart returned 404 for {}", symbol);
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(MarketError::Network(format!("HTTP {}", status)));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| MarketError::Parse(e.to_string()))?;
        parse_chart(&body, interval)
    }

    /// # Summary
    /// 从 quoteSummary 接口抓取报价快照。
    ///
    /// # Logic
    /// 1. 获取 crumb (首次调用时完成握手)。
    /// 2. 请求 price / summaryDetail / financialData 三个模块。
    /// 3. HTTP 401/403 表示 crumb 失效：丢弃缓存后按上游故障返回，不在本次请求内重试。
    /// 4. HTTP 404 视为无快照，返回全空字段。
    async fn fetch_info(&self, symbol: &str) -> Result<QuoteInfo, MarketError> {
        let crumb = self.crumb().await?;
        let url = self.api_url(&["v10", "finance", "quoteSummary", symbol])?;
        debug!("GET {} modules={}", url, SUMMARY_MODULES);

        let resp = self
            .client
            .get(url)
            .query(&[("modules", SUMMARY_MODULES), ("crumb", crumb.as_str())])
            .send()
            .await
            .map_err(|e| MarketError::Network(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!("quoteSummary rejected crumb for {}: HTTP {}", symbol, status);
            self.invalidate_crumb(&crumb).await;
            return Err(MarketError::Network(format!("HTTP {}", status)));
        }
        if status == StatusCode::NOT_FOUND {
            debug!("quoteSummary returned 404 for {}", symbol);
            return Ok(QuoteInfo::default());
        }
        if !status.is_success() {
            return Err(MarketError::Network(format!("HTTP {}", status)));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| MarketError::Parse(e.to_string()))?;
        parse_quote_summary(&body)
    }
}
