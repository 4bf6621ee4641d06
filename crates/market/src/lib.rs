//! # `dalal-market` - 行情归一化层
//!
//! 把上游原始 K 线与报价快照整形为稳定的输出契约：
//! - `series`: K 线 → 带双时间戳的时间序列点
//! - `snapshot`: 报价快照 → 固定字段摘要 (指数单独处理)
//! - `manager`: `Market` 端口的实现，编排上游调用与归一化
//! - `catalog`: 静态证券目录

pub mod catalog;
pub mod manager;
pub mod series;
pub mod snapshot;
