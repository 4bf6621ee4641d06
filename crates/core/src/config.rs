use serde::{Deserialize, Serialize};

/// 全局应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub feed: FeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 默认日志级别，`RUST_LOG` 优先
    pub log_level: String,
}

/// 上游行情源配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    pub base_url: String,
    /// 写入会话 Cookie 的入口，crumb 握手的第一步
    pub cookie_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl ServerConfig {
    /// 监听地址，如 `127.0.0.1:5001`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5001,
                log_level: "info".to_string(),
            },
            feed: FeedConfig::default(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            cookie_url: "https://fc.yahoo.com".to_string(),
            timeout_secs: 10,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 5001);
        assert_eq!(config.server.bind_addr(), "127.0.0.1:5001");
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.feed.base_url, "https://query1.finance.yahoo.com");
        assert_eq!(config.feed.cookie_url, "https://fc.yahoo.com");
        assert_eq!(config.feed.timeout_secs, 10);
    }
}
