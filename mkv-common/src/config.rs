use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// 默认配置文件内容，首次启动时写入 `config/default.toml`
pub const DEFAULT_CONFIG: &str = r#"[server]
# 服务器IP地址
host = "127.0.0.1"
# 服务器监听端口
port = 6379

[storage]
# 键空间分片数量，1 表示单一全局锁
shards = 16

[expiry]
# 是否启用后台主动过期清理
active_expiry = true
# 清理间隔(毫秒)
sweep_interval_ms = 5000
# 每个分片每次最多清理的键数
sweep_batch = 200

[logging]
# 日志文件路径
log_file = "logs/server.log"
# 日志级别: "error", "warn", "info", "debug", "trace"
level = "info"
"#;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub shards: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExpiryConfig {
    pub active_expiry: bool,
    pub sweep_interval_ms: u64,
    pub sweep_batch: usize,
}

impl ExpiryConfig {
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms.max(1))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub log_file: String,
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub expiry: ExpiryConfig,
    pub logging: LoggingConfig,
}

impl Settings {
    /// 读取 `config/default.toml`，文件不存在时先写入默认配置
    pub fn new() -> Result<Self, ConfigError> {
        let default_config_path = Path::new("config").join("default.toml");
        Self::ensure_default_file(&default_config_path)?;
        Self::from_file(&default_config_path)
    }

    /// 从指定文件加载，`MKV__SECTION__KEY` 形式的环境变量优先
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(File::from(path))
            .add_source(
                Environment::with_prefix("MKV")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// 仅使用内置默认值
    pub fn defaults() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    fn ensure_default_file(path: &Path) -> Result<(), ConfigError> {
        if path.exists() {
            return Ok(());
        }
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .map_err(|e| ConfigError::Message(format!("无法创建配置目录: {}", e)))?;
        }
        fs::write(path, DEFAULT_CONFIG)
            .map_err(|e| ConfigError::Message(format!("无法写入配置文件: {}", e)))
    }
}
