use crate::catalog::entity::InstrumentRef;

/// # Summary
/// 证券目录检索接口。
///
/// # Invariants
/// - 只读，实现者不得在运行期修改目录内容。
pub trait InstrumentCatalog: Send + Sync {
    /// # Summary
    /// 按关键字检索目录。
    ///
    /// # Logic
    /// 1. 关键字与代码、名称做大小写不敏感的子串匹配。
    /// 2. 结果保持目录原有顺序。
    ///
    /// # Arguments
    /// * `query`: 非空关键字。
    ///
    /// # Returns
    /// 命中的条目列表，可能为空。
    fn search(&self, query: &str) -> Vec<InstrumentRef>;
}
