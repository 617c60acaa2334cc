use serde::{Deserialize, Serialize};

use crate::errors::{Result, SnaplinkError};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 环境变量前缀，示例：SNAPLINK__SERVER__PORT=3001
pub const ENV_PREFIX: &str = "SNAPLINK";

/// Application configuration
///
/// Loaded once at startup and handed to the server; nothing reads it from a
/// global afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub links: LinksConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub request_log: RequestLogConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

impl AppConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config file > 默认值
    pub fn load(path: Option<&str>) -> Result<Self> {
        use config::{Config, Environment, File};

        let explicit = path.is_some();
        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

        let settings = Config::builder()
            // An explicitly requested file must exist; the default one is optional
            .add_source(File::with_name(path).required(explicit))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("request_log.exclude_paths")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.links.code_length == 0 {
            return Err(SnaplinkError::config("links.code_length must be at least 1"));
        }
        if self.links.max_generate_attempts == 0 {
            return Err(SnaplinkError::config(
                "links.max_generate_attempts must be at least 1",
            ));
        }
        if self.links.max_custom_code_length == 0 {
            return Err(SnaplinkError::config(
                "links.max_custom_code_length must be at least 1",
            ));
        }
        if self.server.workers == 0 {
            return Err(SnaplinkError::config("server.workers must be at least 1"));
        }
        if !matches!(self.logging.format.as_str(), "text" | "json") {
            return Err(SnaplinkError::config(format!(
                "Invalid logging.format '{}'. Valid: text, json",
                self.logging.format
            )));
        }
        Ok(())
    }

    /// Base used to build `shortUrl` values
    pub fn public_url(&self) -> String {
        match self.server.public_url.as_deref() {
            Some(url) if !url.trim().is_empty() => url.trim_end_matches('/').to_string(),
            _ => format!("http://localhost:{}", self.server.port),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Public origin used for `shortUrl`, e.g. `https://s.example.com`
    #[serde(default)]
    pub public_url: Option<String>,
    /// Linked from the 404 page
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    #[serde(default = "default_code_length")]
    pub code_length: usize,
    #[serde(default = "default_max_custom_code_length")]
    pub max_custom_code_length: usize,
    #[serde(default = "default_max_generate_attempts")]
    pub max_generate_attempts: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Console format: `text` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub log_to_file: bool,
    #[serde(default = "default_log_dir")]
    pub dir: String,
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestLogConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub include_body: bool,
    #[serde(default = "default_exclude_paths")]
    pub exclude_paths: Vec<String>,
    #[serde(default = "default_slow_request_threshold_ms")]
    pub slow_request_threshold_ms: u64,
    #[serde(default)]
    pub log_all_requests: bool,
    /// Emit url_created / url_accessed / url_deleted events
    #[serde(default = "default_true")]
    pub log_link_events: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_cors_max_age")]
    pub max_age: usize,
}

// ============================================================
// Default value functions
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    3001
}

fn default_workers() -> usize {
    num_cpus::get()
}

fn default_frontend_url() -> String {
    "http://localhost:5173".to_string()
}

fn default_code_length() -> usize {
    8
}

fn default_max_custom_code_length() -> usize {
    64
}

fn default_max_generate_attempts() -> usize {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_dir() -> String {
    "./logs".to_string()
}

fn default_file_prefix() -> String {
    "snaplink".to_string()
}

fn default_max_files() -> usize {
    30
}

fn default_true() -> bool {
    true
}

fn default_exclude_paths() -> Vec<String> {
    vec!["/api/health".to_string(), "/favicon.ico".to_string()]
}

fn default_slow_request_threshold_ms() -> u64 {
    1000
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_cors_max_age() -> usize {
    3600
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            workers: default_workers(),
            public_url: None,
            frontend_url: default_frontend_url(),
        }
    }
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            code_length: default_code_length(),
            max_custom_code_length: default_max_custom_code_length(),
            max_generate_attempts: default_max_generate_attempts(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_to_file: false,
            dir: default_log_dir(),
            file_prefix: default_file_prefix(),
            max_files: default_max_files(),
        }
    }
}

impl Default for RequestLogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            include_body: false,
            exclude_paths: default_exclude_paths(),
            slow_request_threshold_ms: default_slow_request_threshold_ms(),
            log_all_requests: false,
            log_link_events: true,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
            max_age: default_cors_max_age(),
        }
    }
}
