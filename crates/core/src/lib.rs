//! # `dalal-core` - 领域契约层
//!
//! 不包含任何 I/O。上游数据源、归一化实现与 HTTP 网关都只依赖这里定义的
//! 实体、错误与端口 (Port) trait。

pub mod common;
pub mod config;

/// 行情域：上游 K 线 / 报价快照及其归一化结果
pub mod market {
    pub mod entity;
    pub mod error;
    pub mod port;
}

/// 请求参数域：查询词表校验
pub mod query {
    pub mod entity;
    pub mod error;
}

/// 证券目录域：静态标的检索
pub mod catalog {
    pub mod entity;
    pub mod port;
}
