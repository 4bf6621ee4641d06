mod settings;

use std::sync::Arc;

use dalal_api::middleware::panic::install_panic_hook;
use dalal_api::server::{AppState, start_server};
use dalal_feed::yahoo::YahooProvider;
use dalal_market::catalog::StaticCatalog;
use dalal_market::manager::MarketImpl;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
/// 负责加载配置、实例化具体实现并通过 Arc<dyn Trait> 注入到 HTTP 层。
///
/// # Logic
/// 1. 加载分层配置。
/// 2. 初始化全局日志 (非阻塞写 stdout)。
/// 3. 安装 panic 钩子，供 500 响应携带调用栈。
/// 4. 实例化基础设施层 (Feed) 与领域实现层 (Market、Catalog)。
/// 5. 启动 HTTP 服务，收到 Ctrl-C 后优雅退出。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 加载配置
    let config = settings::load_config()?;

    // 2. 初始化日志，RUST_LOG 优先于配置文件
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    let (writer, _guard) = tracing_appender::non_blocking(std::io::stdout());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .init();
    info!("Dalal market gateway starting...");

    // 3. panic 钩子
    install_panic_hook();

    // 4. 实例化各层
    let feed = Arc::new(YahooProvider::new(&config.feed)?);
    let market = MarketImpl::new(feed);
    let catalog = Arc::new(StaticCatalog::new());
    info!("Instrument catalog loaded with {} entries", catalog.len());

    let state = AppState { market, catalog };

    // 5. 启动服务
    let bind_addr = config.server.bind_addr();
    start_server(state, &bind_addr, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            // 无法监听信号时保持运行，由外部进程管理终止
            warn!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received. Exiting...");
    })
    .await?;

    Ok(())
}
