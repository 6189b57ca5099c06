use log::{LevelFilter, SetLoggerError};
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode, WriteLogger};
use std::fs::{self, OpenOptions};
use std::path::Path;
use thiserror::Error;

/// 日志初始化错误
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("无法打开日志文件 {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("日志系统已初始化: {0}")]
    SetLogger(#[from] SetLoggerError),
}

/// 解析日志级别，无法识别时使用 info
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// 同时输出到终端和日志文件
pub fn init_logger(log_file: &str, level: &str) -> Result<(), LoggerError> {
    let io_error = |source| LoggerError::Io {
        path: log_file.to_string(),
        source,
    };

    // 确保日志目录存在
    if let Some(parent) = Path::new(log_file).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map_err(io_error)?;

    let level_filter = parse_level(level);

    CombinedLogger::init(vec![
        TermLogger::new(
            level_filter,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(level_filter, Config::default(), file),
    ])?;
    Ok(())
}
