use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub mod time;

/// 指数代码的词法前缀 (例如 `^NSEI`, `^BSESN`)
pub const INDEX_PREFIX: char = '^';

/// # Summary
/// 判断证券代码是否代表市场指数。
///
/// # Logic
/// 1. 纯词法判断：以 `^` 开头即视为指数，不依赖任何上游查询。
///
/// # Arguments
/// * `symbol`: 证券代码。
///
/// # Returns
/// 指数返回 true，个股返回 false。
pub fn is_index_symbol(symbol: &str) -> bool {
    symbol.starts_with(INDEX_PREFIX)
}

/// # Summary
/// 历史数据回溯区间，对应上游的 `range` 参数。
///
/// # Invariants
/// - 取值封闭，仅允许 `Period::ALL` 中列出的十种。
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Period {
    // 1日
    #[default]
    #[serde(rename = "1d")]
    Day1,
    // 5日
    #[serde(rename = "5d")]
    Day5,
    // 1月
    #[serde(rename = "1mo")]
    Month1,
    // 3月
    #[serde(rename = "3mo")]
    Month3,
    // 6月
    #[serde(rename = "6mo")]
    Month6,
    // 1年
    #[serde(rename = "1y")]
    Year1,
    // 2年
    #[serde(rename = "2y")]
    Year2,
    // 5年
    #[serde(rename = "5y")]
    Year5,
    // 年初至今
    #[serde(rename = "ytd")]
    YearToDate,
    // 全部历史
    #[serde(rename = "max")]
    Max,
}

impl Period {
    /// 合法取值，顺序即错误提示中的展示顺序
    pub const ALL: [Period; 10] = [
        Period::Day1,
        Period::Day5,
        Period::Month1,
        Period::Month3,
        Period::Month6,
        Period::Year1,
        Period::Year2,
        Period::Year5,
        Period::YearToDate,
        Period::Max,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day1 => "1d",
            Period::Day5 => "5d",
            Period::Month1 => "1mo",
            Period::Month3 => "3mo",
            Period::Month6 => "6mo",
            Period::Year1 => "1y",
            Period::Year2 => "2y",
            Period::Year5 => "5y",
            Period::YearToDate => "ytd",
            Period::Max => "max",
        }
    }

    /// 全部合法取值的文本形式
    pub fn allowed() -> Vec<&'static str> {
        Self::ALL.iter().map(Period::as_str).collect()
    }
}

impl FromStr for Period {
    type Err = String;

    /// 区分大小写的精确匹配，与上游词表保持一致
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("Unknown Period: {}", s))
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// # Summary
/// K 线采样周期，对应上游的 `interval` 参数。
///
/// # Invariants
/// - 取值封闭，仅允许 `Interval::ALL` 中列出的十二种。
/// - `60m` 与 `1h` 在上游语义相同，但作为两个独立取值保留，原样透传。
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Interval {
    #[serde(rename = "1m")]
    Minute1,
    #[serde(rename = "2m")]
    Minute2,
    #[serde(rename = "5m")]
    Minute5,
    #[serde(rename = "15m")]
    Minute15,
    #[serde(rename = "30m")]
    Minute30,
    #[serde(rename = "60m")]
    Minute60,
    #[serde(rename = "90m")]
    Minute90,
    #[serde(rename = "1h")]
    Hour1,
    #[default]
    #[serde(rename = "1d")]
    Day1,
    #[serde(rename = "5d")]
    Day5,
    #[serde(rename = "1wk")]
    Week1,
    #[serde(rename = "1mo")]
    Month1,
}

impl Interval {
    /// 合法取值，顺序即错误提示中的展示顺序
    pub const ALL: [Interval; 12] = [
        Interval::Minute1,
        Interval::Minute2,
        Interval::Minute5,
        Interval::Minute15,
        Interval::Minute30,
        Interval::Minute60,
        Interval::Minute90,
        Interval::Hour1,
        Interval::Day1,
        Interval::Day5,
        Interval::Week1,
        Interval::Month1,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Minute1 => "1m",
            Interval::Minute2 => "2m",
            Interval::Minute5 => "5m",
            Interval::Minute15 => "15m",
            Interval::Minute30 => "30m",
            Interval::Minute60 => "60m",
            Interval::Minute90 => "90m",
            Interval::Hour1 => "1h",
            Interval::Day1 => "1d",
            Interval::Day5 => "5d",
            Interval::Week1 => "1wk",
            Interval::Month1 => "1mo",
        }
    }

    /// 全部合法取值的文本形式
    pub fn allowed() -> Vec<&'static str> {
        Self::ALL.iter().map(Interval::as_str).collect()
    }

    /// # Summary
    /// 是否为日内周期。
    ///
    /// # Logic
    /// 1. 分钟与小时级别为日内周期；日线及以上不是。
    /// 2. 上游对非日内周期的时间戳按交易所本地零点对齐。
    pub fn is_intraday(&self) -> bool {
        matches!(
            self,
            Interval::Minute1
                | Interval::Minute2
                | Interval::Minute5
                | Interval::Minute15
                | Interval::Minute30
                | Interval::Minute60
                | Interval::Minute90
                | Interval::Hour1
        )
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|i| i.as_str() == s)
            .ok_or_else(|| format!("Unknown Interval: {}", s))
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
