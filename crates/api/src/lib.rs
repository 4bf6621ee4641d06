//! # `dalal-api` - HTTP API 网关
//!
//! 使用 `axum` 构建路由与控制器，通过 `utoipa` 自动生成 OpenAPI 3.0 Swagger 文档。
//!
//! ## 架构职责
//! - 接收来自前端或浏览器的 HTTP 请求 (允许任意来源跨域)
//! - 校验查询参数后调用下层 `Market` / `InstrumentCatalog` 端口
//! - 将领域模型转换为固定的 JSON 契约返回给前端
//! - 兜底捕获处理器中的 panic，转换为 500 响应

pub mod error;
pub mod extract;
pub mod middleware {
    pub mod panic;
}
pub mod routes {
    pub mod market;
    pub mod search;
}
pub mod server;
pub mod types;
