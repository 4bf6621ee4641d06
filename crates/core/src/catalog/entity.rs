use serde::{Deserialize, Serialize};

/// # Summary
/// 证券目录条目 (搜索结果)。
///
/// # Invariants
/// - 进程生命周期内只读。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentRef {
    // 证券代码 (例如: TCS.NS)
    pub symbol: String,
    // 公司全称
    pub name: String,
}
