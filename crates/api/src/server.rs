//! # API 服务启动器
//!
//! 组装 axum 路由、挂载 Swagger UI、配置 CORS 与 panic 兜底并绑定 TCP 端口对外提供服务。
//! 本模块不直接启动 `main()`, 而是由 `crates/app` 的 DI 容器持有并调用。

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use utoipa_swagger_ui::SwaggerUi;

use dalal_core::catalog::port::InstrumentCatalog;
use dalal_core::market::port::Market;

use crate::middleware::panic::handle_panic;
use crate::routes::{market, search};

// ============================================================
//  共享应用状态
// ============================================================

/// 全局应用状态，通过 axum 的 `State` 提取器注入到每个 Handler 中。
///
/// # Invariants
/// - 两个端口均为无状态或只读实现，在并发请求间共享无需加锁。
#[derive(Clone)]
pub struct AppState {
    /// 行情领域服务 (抓取 + 归一化)
    pub market: Arc<dyn Market>,
    /// 静态证券目录
    pub catalog: Arc<dyn InstrumentCatalog>,
}

// ============================================================
//  OpenAPI 文档定义
// ============================================================

/// 全局 OpenAPI 文档结构
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Dalal 行情网关 API",
        version = "0.1.0",
        description = "面向客户端的归一化行情接口：历史时间序列 (原生时区 + IST)、证券快照与静态搜索。",
        license(name = "MIT")
    ),
    tags(
        (name = "行情 (Market)", description = "时间序列与证券快照"),
        (name = "搜索 (Search)", description = "内置证券目录检索")
    )
)]
pub struct ApiDoc;

// ============================================================
//  服务构建与启动
// ============================================================

/// 构建完整的 axum 应用路由树。
///
/// # Logic
/// 1. 注册三个业务路由并收集 OpenAPI 文档。
/// 2. 挂载 Swagger UI (`/swagger-ui`)。
/// 3. 内层套 panic 兜底，外层套 CORS，保证兜底响应同样带跨域头。
pub fn build_router(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(market::get_stock_data))
        .routes(routes!(search::search_stocks))
        .routes(routes!(market::get_debug_snapshot))
        .with_state(state)
        .split_for_parts();

    // 允许任意来源、方法、请求头
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
}

/// 绑定端口并启动 HTTP 监听，直到 `shutdown` 完成。
///
/// # Arguments
/// * `state` - 由外部 DI 容器注入的共享状态
/// * `bind_addr` - 监听的地址与端口，如 `"127.0.0.1:5001"`
/// * `shutdown` - 完成时触发优雅退出
pub async fn start_server<F>(
    state: AppState,
    bind_addr: &str,
    shutdown: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state);

    tracing::info!("🚀 Dalal API Server listening on {}", bind_addr);
    tracing::info!("📖 Swagger UI: http://{}/swagger-ui/", bind_addr);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
