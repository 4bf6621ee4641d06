use crate::common::{Interval, Period};
use crate::query::error::QueryError;

/// # Summary
/// 校验通过的时间序列查询。
///
/// # Invariants
/// - `symbol` 非空。
/// - `period` / `interval` 必属于各自的封闭词表；缺省时均为 `1d`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub symbol: String,
    pub period: Period,
    pub interval: Interval,
}

impl QuerySpec {
    /// # Summary
    /// 由原始查询参数构造 QuerySpec，失败即返回。
    ///
    /// # Logic
    /// 1. `symbol` 缺失或为空串 → `MissingParameter`。
    /// 2. `period` 缺省取 `1d`，否则必须精确命中词表，否则 `InvalidEnumeration`。
    /// 3. `interval` 同上。
    ///
    /// # Arguments
    /// * `symbol`: 证券代码 (对应 `ticker` 参数)。
    /// * `period`: 回溯区间文本。
    /// * `interval`: 周期文本。
    ///
    /// # Returns
    /// 成功返回 QuerySpec，失败返回 QueryError。
    pub fn parse(
        symbol: Option<&str>,
        period: Option<&str>,
        interval: Option<&str>,
    ) -> Result<Self, QueryError> {
        let symbol = match symbol {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => {
                return Err(QueryError::MissingParameter {
                    name: "ticker",
                    message: "Ticker symbol is required",
                });
            }
        };

        let period = match period {
            None => Period::default(),
            Some(p) => p.parse().map_err(|_| QueryError::InvalidEnumeration {
                name: "period",
                value: p.to_string(),
                allowed: Period::allowed(),
            })?,
        };

        let interval = match interval {
            None => Interval::default(),
            Some(i) => i.parse().map_err(|_| QueryError::InvalidEnumeration {
                name: "interval",
                value: i.to_string(),
                allowed: Interval::allowed(),
            })?,
        };

        Ok(Self {
            symbol,
            period,
            interval,
        })
    }
}

/// # Summary
/// 校验搜索关键字。
///
/// # Returns
/// 非空关键字原样返回；缺失或空串返回 `MissingParameter`。
pub fn parse_search_query(q: Option<&str>) -> Result<&str, QueryError> {
    match q {
        Some(q) if !q.is_empty() => Ok(q),
        _ => Err(QueryError::MissingParameter {
            name: "q",
            message: "Search query is required",
        }),
    }
}
