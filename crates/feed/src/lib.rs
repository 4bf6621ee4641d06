//! # `dalal-feed` - 上游行情适配器
//!
//! 以 HTTP 方式对接 Yahoo Finance，实现 `dalal_core` 中的 `MarketDataProvider`。

pub mod yahoo;
