use thiserror::Error;

/// # Summary
/// 市场数据域错误枚举，处理网络、解析及数据缺失等问题。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
/// - 除 `NotFound` 外的变体均属于上游故障 (UpstreamFault)。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketError {
    // 网络层错误，包含底层 HTTP 客户端错误信息
    #[error("Network error: {0}")]
    Network(String),
    // 数据解析错误，如 JSON 格式不匹配
    #[error("Parse error: {0}")]
    Parse(String),
    // 证券在请求区间内无数据，携带面向调用方的描述
    #[error("{0}")]
    NotFound(String),
    // 未知或未分类的错误
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl MarketError {
    /// 是否属于上游故障 (而非数据缺失)
    pub fn is_upstream_fault(&self) -> bool {
        !matches!(self, MarketError::NotFound(_))
    }
}
