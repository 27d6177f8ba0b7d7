//! Application configuration module / 应用配置模块
//!
//! Manages application configuration loaded from config.json
//! Creates default config file on first run / 首次运行时创建默认配置文件

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::error::{Result, SearchError};

/// Global configuration instance / 全局配置实例
static CONFIG: OnceCell<Arc<RwLock<AppConfig>>> = OnceCell::new();

/// Search index file name under the site root / 搜索索引文件名
pub const SEARCH_INDEX_FILE_NAME: &str = "search.json";

/// Application configuration / 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration / 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// Search configuration / 搜索配置
    #[serde(default)]
    pub search: SearchConfig,
}

/// Server configuration / 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address / 服务器监听地址
    pub host: String,
    /// Server port / 服务器端口
    pub port: u16,
}

/// Search configuration / 搜索配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Whether search is enabled / 是否启用搜索
    pub enabled: bool,
    /// Results per page / 每页结果数
    pub page_size: usize,
    /// Site root serving search.json and record pages / 站点根地址
    pub site_url: String,
    /// Local index file, overrides site_url for the index when set / 本地索引文件
    pub index_file: String,
    /// HTTP request timeout (seconds) / 请求超时
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8180,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            page_size: 10,
            site_url: "http://localhost:8080/".to_string(),
            index_file: "".to_string(), // Empty means fetch from site_url
            request_timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Page size, never zero / 每页结果数（至少为1）
    pub fn page_size(&self) -> usize {
        self.search.page_size.max(1)
    }

    /// Parsed site root, always ending with `/` / 站点根地址
    pub fn site_url(&self) -> Result<Url> {
        let mut raw = self.search.site_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Url::parse(&raw).map_err(|e| SearchError::Config(format!("invalid site_url {:?}: {}", raw, e)))
    }

    /// Full URL of search.json / 索引地址
    pub fn index_url(&self) -> Result<Url> {
        self.site_url()?
            .join(SEARCH_INDEX_FILE_NAME)
            .map_err(|e| SearchError::Config(e.to_string()))
    }

    /// Local index file if configured / 本地索引文件
    pub fn index_file(&self) -> Option<PathBuf> {
        if self.search.index_file.is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.search.index_file))
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.search.request_timeout_secs)
    }

    /// Get the server bind address / 获取服务器绑定地址
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Get the config file path / 获取配置文件路径
fn get_config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("config.json")
}

/// Load configuration from file, or create default if not exists / 加载配置文件，不存在则创建默认配置
pub fn load_config() -> Result<AppConfig> {
    load_config_from(&get_config_path())
}

/// Load configuration from a specific path / 从指定路径加载配置
pub fn load_config_from(config_path: &Path) -> Result<AppConfig> {
    if config_path.exists() {
        // Load existing config / 加载现有配置
        let content = std::fs::read_to_string(config_path)
            .map_err(|e| SearchError::Config(format!("Failed to read config file: {}", e)))?;

        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| SearchError::Config(format!("Failed to parse config file: {}", e)))?;

        tracing::info!("Loaded configuration from {:?}", config_path);
        Ok(config)
    } else {
        // Create default config / 创建默认配置
        let config = AppConfig::default();
        save_config_to(&config, config_path)?;
        tracing::info!("Created default configuration at {:?}", config_path);
        Ok(config)
    }
}

/// Save configuration to file / 保存配置到文件
fn save_config_to(config: &AppConfig, config_path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| SearchError::Config(format!("Failed to serialize config: {}", e)))?;

    std::fs::write(config_path, content)
        .map_err(|e| SearchError::Config(format!("Failed to write config file: {}", e)))?;

    Ok(())
}

/// Initialize global configuration / 初始化全局配置
pub fn init_config() -> Result<Arc<RwLock<AppConfig>>> {
    let config = load_config()?;

    let config_arc = Arc::new(RwLock::new(config));

    CONFIG
        .set(config_arc.clone())
        .map_err(|_| SearchError::Config("Config already initialized".to_string()))?;

    Ok(config_arc)
}

/// Get global configuration instance / 获取全局配置实例
pub fn get_config() -> Arc<RwLock<AppConfig>> {
    CONFIG
        .get_or_init(|| {
            let config = load_config().unwrap_or_default();
            Arc::new(RwLock::new(config))
        })
        .clone()
}

/// Get a read-only snapshot of current config / 获取当前配置的只读快照
pub fn config() -> AppConfig {
    get_config().read().clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.search.enabled);
        assert_eq!(config.page_size(), 10);
        assert_eq!(config.get_bind_address(), "0.0.0.0:8180");
        assert_eq!(config.index_url().unwrap().as_str(), "http://localhost:8080/search.json");
        assert!(config.index_file().is_none());
    }

    #[test]
    fn test_first_load_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = load_config_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.search.page_size, 10);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"search": {"page_size": 0, "site_url": "https://blog.example.com/sub"}}"#,
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.page_size(), 1);
        assert_eq!(config.server.port, 8180);
        assert_eq!(config.search.request_timeout_secs, 30);
        assert_eq!(
            config.index_url().unwrap().as_str(),
            "https://blog.example.com/sub/search.json"
        );
    }

    #[test]
    fn test_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_config_from(&path), Err(SearchError::Config(_))));

        let mut config = AppConfig::default();
        config.search.site_url = "not a url".to_string();
        assert!(matches!(config.site_url(), Err(SearchError::Config(_))));
    }
}
