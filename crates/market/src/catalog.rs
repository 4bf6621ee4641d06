use dalal_core::catalog::entity::InstrumentRef;
use dalal_core::catalog::port::InstrumentCatalog;

/// 内置的十只 NSE 标的 (代码, 名称)
const INSTRUMENTS: [(&str, &str); 10] = [
    ("RELIANCE.NS", "Reliance Industries Ltd"),
    ("TCS.NS", "Tata Consultancy Services Ltd"),
    ("INFY.NS", "Infosys Ltd"),
    ("HDFCBANK.NS", "HDFC Bank Ltd"),
    ("ICICIBANK.NS", "ICICI Bank Ltd"),
    ("HINDUNILVR.NS", "Hindustan Unilever Ltd"),
    ("BAJFINANCE.NS", "Bajaj Finance Ltd"),
    ("SBIN.NS", "State Bank of India"),
    ("BHARTIARTL.NS", "Bharti Airtel Ltd"),
    ("ITC.NS", "ITC Ltd"),
];

/// # Summary
/// 编译期固定的证券目录，只做子串匹配，不是搜索引擎。
///
/// # Invariants
/// - 无可变状态，可在并发请求间直接共享。
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCatalog;

impl StaticCatalog {
    pub fn new() -> Self {
        Self
    }

    /// 目录条目总数
    pub fn len(&self) -> usize {
        INSTRUMENTS.len()
    }

    pub fn is_empty(&self) -> bool {
        INSTRUMENTS.is_empty()
    }
}

impl InstrumentCatalog for StaticCatalog {
    fn search(&self, query: &str) -> Vec<InstrumentRef> {
        let needle = query.to_lowercase();
        INSTRUMENTS
            .iter()
            .filter(|(symbol, name)| {
                name.to_lowercase().contains(&needle) || symbol.to_lowercase().contains(&needle)
            })
            .map(|(symbol, name)| InstrumentRef {
                symbol: (*symbol).to_string(),
                name: (*name).to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tcs_matches_exactly_one() {
        let hits = StaticCatalog::new().search("TCS");
        assert_eq!(
            hits,
            vec![InstrumentRef {
                symbol: "TCS.NS".into(),
                name: "Tata Consultancy Services Ltd".into(),
            }]
        );
    }

    #[test]
    fn test_case_insensitive_on_name_and_symbol() {
        let catalog = StaticCatalog::new();
        assert_eq!(catalog.search("bank").len(), 3);
        assert_eq!(catalog.search("hdfcbank")[0].symbol, "HDFCBANK.NS");
        assert_eq!(catalog.search("INFOSYS")[0].symbol, "INFY.NS");
    }

    #[test]
    fn test_common_suffix_returns_whole_catalog_in_order() {
        let catalog = StaticCatalog::new();
        let hits = catalog.search(".ns");
        assert_eq!(hits.len(), catalog.len());
        assert_eq!(hits[0].symbol, "RELIANCE.NS");
        assert_eq!(hits[9].symbol, "ITC.NS");
    }

    #[test]
    fn test_no_match() {
        assert!(StaticCatalog::new().search("AAPL").is_empty());
    }
}
