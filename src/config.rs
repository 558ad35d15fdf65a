//! Application configuration module / 应用配置模块
//!
//! Manages application configuration loaded from config.json
//! Creates default config file on first run / 首次运行时创建默认配置文件

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration / 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration / 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration / 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Search configuration / 搜索配置
    #[serde(default)]
    pub search: SearchConfig,
    /// Admin link configuration / 后台链接配置
    #[serde(default)]
    pub admin: AdminConfig,
    /// Admin menu cache configuration / 后台菜单缓存配置
    #[serde(default)]
    pub admin_menu: AdminMenuConfig,
}

/// Server configuration / 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address / 服务器监听地址
    pub host: String,
    /// Server port / 服务器端口
    pub port: u16,
}

/// Database configuration / 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Data directory path / 数据目录路径
    pub data_dir: String,
    /// Main database file path (relative to data_dir) / 主数据库文件路径
    pub db_file: String,
}

/// Search configuration / 搜索配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum ranked results per keyword search / 最大结果数
    #[serde(default = "default_results_max")]
    pub results_max: usize,
    /// Per-source time budget in milliseconds / 单个数据源超时（毫秒）
    #[serde(default = "default_source_timeout_ms")]
    pub source_timeout_ms: u64,
    /// Post types searched by default, empty means every public type / 默认搜索的文章类型
    #[serde(default)]
    pub included_post_types: Vec<String>,
    /// Taxonomies searched by default, empty means every public taxonomy / 默认搜索的分类法
    #[serde(default)]
    pub included_taxonomies: Vec<String>,
}

/// Admin link configuration / 后台链接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Prefix of every edit/action link / 链接前缀
    pub base_url: String,
    /// Secret used to sign action nonces / 随机数签名密钥
    pub nonce_secret: String,
    /// Nonce lifetime in seconds / 随机数有效期（秒）
    #[serde(default = "default_nonce_lifetime")]
    pub nonce_lifetime_secs: u64,
}

/// Admin menu cache configuration / 后台菜单缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminMenuConfig {
    /// Snapshot lifetime in seconds / 快照有效期（秒）
    pub ttl_secs: u64,
    /// Optional JSON file with a raw menu loaded at startup / 启动时加载的菜单文件
    #[serde(default)]
    pub seed_file: String,
}

fn default_results_max() -> usize { 10 }
fn default_source_timeout_ms() -> u64 { 3000 }
fn default_nonce_lifetime() -> u64 { 86400 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8180,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            db_file: "acp.db".to_string(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            results_max: default_results_max(),
            source_timeout_ms: default_source_timeout_ms(),
            included_post_types: Vec::new(),
            included_taxonomies: Vec::new(),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            base_url: "/wp-admin/".to_string(),
            nonce_secret: generate_secret(32),
            nonce_lifetime_secs: default_nonce_lifetime(),
        }
    }
}

impl Default for AdminMenuConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 24 * 60 * 60,
            seed_file: String::new(),
        }
    }
}

/// Generate random hex secret / 生成随机密钥
fn generate_secret(bytes: usize) -> String {
    let mut rng = rand::thread_rng();
    let buf: Vec<u8> = (0..bytes).map(|_| rng.gen()).collect();
    hex::encode(buf)
}

impl SearchConfig {
    pub fn source_timeout(&self) -> Duration {
        Duration::from_millis(self.source_timeout_ms)
    }
}

impl AdminMenuConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl AppConfig {
    /// Get the full database URL / 获取完整的数据库URL
    pub fn get_database_url(&self) -> String {
        let db_path = Path::new(&self.database.data_dir).join(&self.database.db_file);
        format!("sqlite:{}?mode=rwc", db_path.to_string_lossy())
    }

    /// Get the full data directory path / 获取完整的数据目录路径
    pub fn get_data_dir(&self) -> PathBuf {
        PathBuf::from(&self.database.data_dir)
    }

    /// Get the admin menu seed file, if configured / 获取菜单种子文件路径
    pub fn get_admin_menu_seed(&self) -> Option<PathBuf> {
        if self.admin_menu.seed_file.is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.admin_menu.seed_file))
        }
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

/// Load configuration from ./config.json / 加载配置文件
pub fn load_config() -> Result<AppConfig, String> {
    load_config_from(&get_config_path())
}

/// Load configuration from file, or create default if not exists / 加载配置文件，不存在则创建默认配置
pub fn load_config_from(config_path: &Path) -> Result<AppConfig, String> {
    if config_path.exists() {
        // Load existing config / 加载现有配置
        let content = std::fs::read_to_string(config_path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;

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
pub fn save_config_to(config: &AppConfig, config_path: &Path) -> Result<(), String> {
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    std::fs::write(config_path, content)
        .map_err(|e| format!("Failed to write config file: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.search.results_max, 10);
        assert_eq!(config.admin_menu.ttl(), Duration::from_secs(86400));
        assert_eq!(config.admin.nonce_secret.len(), 64);
        assert_eq!(config.get_bind_address(), "0.0.0.0:8180");
        assert!(config.get_admin_menu_seed().is_none());
    }

    #[test]
    fn test_first_run_creates_file_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let created = load_config_from(&path).unwrap();
        assert!(path.exists());

        let reloaded = load_config_from(&path).unwrap();
        assert_eq!(created.admin.nonce_secret, reloaded.admin.nonce_secret);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"search": {"included_post_types": ["page"]}}"#).unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.search.included_post_types, vec!["page"]);
        assert_eq!(config.search.results_max, 10);
        assert_eq!(config.server.port, 8180);
    }
}
