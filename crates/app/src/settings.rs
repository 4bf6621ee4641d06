use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use dalal_core::config::AppConfig;
use thiserror::Error;

/// 可选的本地配置文件 (扩展名由 config 自动探测)
const CONFIG_FILE: &str = "config/dalal";
/// 环境变量前缀，层级用 `__` 分隔，如 `DALAL__SERVER__PORT`
const ENV_PREFIX: &str = "DALAL";
const ENV_SEPARATOR: &str = "__";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

/// # Summary
/// 按层加载应用配置。
///
/// # Logic
/// 1. 以 `AppConfig::default()` 为最底层。
/// 2. 若存在 `config/dalal.toml` 则覆盖。
/// 3. `DALAL__` 前缀的环境变量最后覆盖。
pub fn load_config() -> Result<AppConfig, SettingsError> {
    let config = with_defaults()?
        .add_source(File::with_name(CONFIG_FILE).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator(ENV_SEPARATOR)
                .try_parsing(true),
        )
        .build()?;
    Ok(config.try_deserialize()?)
}

fn with_defaults() -> Result<ConfigBuilder<DefaultState>, SettingsError> {
    let defaults = Config::try_from(&AppConfig::default())?;
    Ok(Config::builder().add_source(defaults))
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn load_from_toml(toml: &str) -> Result<AppConfig, SettingsError> {
        let config = with_defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    #[test]
    fn test_empty_file_keeps_defaults() {
        let config = load_from_toml("").unwrap();
        assert_eq!(config.server.bind_addr(), "127.0.0.1:5001");
        assert_eq!(config.feed.timeout_secs, 10);
    }

    #[test]
    fn test_partial_file_overrides_single_key() {
        let config = load_from_toml(
            r#"
            [server]
            port = 8080

            [feed]
            base_url = "http://localhost:9000"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.feed.base_url, "http://localhost:9000");
        assert_eq!(config.feed.timeout_secs, 10);
    }

    #[test]
    fn test_invalid_value_is_rejected() {
        let err = load_from_toml("[server]\nport = \"not-a-port\"").unwrap_err();
        assert!(err.to_string().starts_with("Config error"));
    }
}
