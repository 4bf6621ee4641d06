use thiserror::Error;

/// # Summary
/// 请求参数校验错误。
///
/// # Invariants
/// - 校验不做任何 I/O，错误在上游调用之前产生。
/// - 两个变体在网关层都映射为 400。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// 必填参数缺失或为空
    #[error("{message}")]
    MissingParameter {
        name: &'static str,
        message: &'static str,
    },
    /// 参数不在封闭词表内，提示中列出全部合法取值
    #[error("Invalid {name}. Must be one of: {}", render_allowed(.allowed))]
    InvalidEnumeration {
        name: &'static str,
        value: String,
        allowed: Vec<&'static str>,
    },
}

/// 渲染为 `['1d', '5d', ...]`
fn render_allowed(allowed: &[&'static str]) -> String {
    let quoted: Vec<String> = allowed.iter().map(|v| format!("'{}'", v)).collect();
    format!("[{}]", quoted.join(", "))
}
