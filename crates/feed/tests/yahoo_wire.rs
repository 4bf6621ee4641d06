use dalal_core::common::{Interval, Period};
use dalal_core::config::FeedConfig;
use dalal_core::market::error::MarketError;
use dalal_core::market::port::MarketDataProvider;
use dalal_feed::yahoo::YahooProvider;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// quoteSummary 对该代码返回 200，其余代码一律 401
const ACCEPTED_SYMBOL: &str = "TCS.NS";

/// # Summary
/// 本地假上游，记录每个请求行并按路径返回固定响应。
///
/// - Cookie 入口 (`/cookie`): 200 空响应
/// - `/v1/test/getcrumb`: 依次返回 `CRUMB1`, `CRUMB2`, ...
/// - `/v10/...`: `ACCEPTED_SYMBOL` 返回空快照，其余 401
/// - `/v8/...`: 404 (无数据)
struct FakeUpstream {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeUpstream {
    async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));

        let log = requests.clone();
        tokio::spawn(async move {
            let mut crumbs_issued = 0;
            while let Ok((mut stream, _)) = listener.accept().await {
                let mut head = Vec::new();
                let mut chunk = [0_u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = stream.read(&mut chunk).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    head.extend_from_slice(&chunk[..n]);
                }

                let head = String::from_utf8_lossy(&head);
                let line = head.lines().next().unwrap_or_default().to_string();
                let target = line.split(' ').nth(1).unwrap_or_default().to_string();
                log.lock().unwrap().push(line);

                let (status, body) = if target.starts_with("/v1/test/getcrumb") {
                    crumbs_issued += 1;
                    ("200 OK", format!("CRUMB{}", crumbs_issued))
                } else if target.starts_with("/v10/") {
                    if target.contains(&format!("/{}?", ACCEPTED_SYMBOL)) {
                        ("200 OK", r#"{"quoteSummary":{"result":[{}],"error":null}}"#.to_string())
                    } else {
                        ("401 Unauthorized", String::new())
                    }
                } else if target.starts_with("/v8/") {
                    ("404 Not Found", String::new())
                } else {
                    ("200 OK", String::new())
                };

                let resp = format!(
                    "HTTP/1.1 {}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                stream.write_all(resp.as_bytes()).await.unwrap();
                stream.shutdown().await.ok();
            }
        });

        Self { base_url, requests }
    }

    fn provider(&self) -> YahooProvider {
        YahooProvider::new(&FeedConfig {
            base_url: self.base_url.clone(),
            cookie_url: format!("{}/cookie", self.base_url),
            timeout_secs: 5,
            ..FeedConfig::default()
        })
        .unwrap()
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn requests_to(&self, prefix: &str) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|line| line.starts_with(&format!("GET {}", prefix)))
            .collect()
    }
}

/// 请求行 `GET <path>?<query> HTTP/1.1` 拆为 (path, query)
fn split_target(line: &str) -> (String, String) {
    let target = line.split(' ').nth(1).unwrap_or_default();
    match target.split_once('?') {
        Some((path, query)) => (path.to_string(), query.to_string()),
        None => (target.to_string(), String::new()),
    }
}

#[tokio::test]
async fn test_symbol_cannot_rewrite_chart_query() {
    let upstream = FakeUpstream::spawn().await;
    let provider = upstream.provider();

    let bars = provider
        .fetch_history("X?range=max&interval=1m&", Period::Day1, Interval::Day1)
        .await
        .unwrap();
    assert!(bars.is_empty());

    let lines = upstream.requests_to("/v8/");
    assert_eq!(lines.len(), 1);
    let (path, query) = split_target(&lines[0]);
    assert_eq!(path, "/v8/finance/chart/X%3Frange=max&interval=1m&");

    let params: Vec<&str> = query.split('&').collect();
    assert_eq!(params[0], "range=1d");
    assert_eq!(params[1], "interval=1d");
    assert!(!params.contains(&"range=max"));
    assert!(!params.contains(&"interval=1m"));
}

#[tokio::test]
async fn test_symbol_with_slash_stays_one_segment() {
    let upstream = FakeUpstream::spawn().await;
    let provider = upstream.provider();

    provider
        .fetch_history("A/B#frag", Period::Day5, Interval::Minute15)
        .await
        .unwrap();

    let (path, query) = split_target(&upstream.requests_to("/v8/")[0]);
    assert_eq!(path, "/v8/finance/chart/A%2FB%23frag");
    assert!(query.starts_with("range=5d&interval=15m"));
}

#[tokio::test]
async fn test_rejected_crumb_is_refreshed_on_next_call() {
    let upstream = FakeUpstream::spawn().await;
    let provider = upstream.provider();

    for _ in 0..2 {
        let err = provider.fetch_info("INFY.NS").await.unwrap_err();
        assert_eq!(err, MarketError::Network("HTTP 401 Unauthorized".into()));
    }

    // 每次被拒绝后都重新握手，且每次请求只访问一次 quoteSummary
    assert_eq!(upstream.requests_to("/v1/test/getcrumb").len(), 2);
    let summaries = upstream.requests_to("/v10/");
    assert_eq!(summaries.len(), 2);
    assert!(split_target(&summaries[0]).1.contains("crumb=CRUMB1"));
    assert!(split_target(&summaries[1]).1.contains("crumb=CRUMB2"));
}

#[tokio::test]
async fn test_accepted_crumb_is_reused() {
    let upstream = FakeUpstream::spawn().await;
    let provider = upstream.provider();

    for _ in 0..3 {
        let info = provider.fetch_info(ACCEPTED_SYMBOL).await.unwrap();
        assert_eq!(info.current_price, None);
    }

    assert_eq!(upstream.requests_to("/cookie").len(), 1);
    assert_eq!(upstream.requests_to("/v1/test/getcrumb").len(), 1);
    for line in upstream.requests_to("/v10/") {
        assert!(split_target(&line).1.contains("crumb=CRUMB1"));
    }
}

#[tokio::test]
async fn test_clones_share_the_crumb() {
    let upstream = FakeUpstream::spawn().await;
    let provider = upstream.provider();
    let clone = provider.clone();

    provider.fetch_info(ACCEPTED_SYMBOL).await.unwrap();
    clone.fetch_info(ACCEPTED_SYMBOL).await.unwrap();

    assert_eq!(upstream.requests_to("/v1/test/getcrumb").len(), 1);
}
