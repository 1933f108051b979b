//! 错误类型
//!
//! 每个外部协作者一个错误枚举；所有错误在会话中都可恢复，最终以提示条的形式呈现

use std::io;
use std::path::PathBuf;

/// 搜索失败
#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("search service answered with status {0}")]
    Status(u16),
    #[error("malformed search response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("no results: {0}")]
    NotFound(String),
}

/// 持久化失败
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] io::Error),
    #[error("storage encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// 配置加载失败
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("no OMDb API key configured (use --api-key, OMDB_API_KEY or api_key in config.toml)")]
    MissingApiKey,
    #[error("cannot determine the user {0} directory")]
    NoDirectory(&'static str),
}

impl From<ConfigError> for io::Error {
    fn from(err: ConfigError) -> Self {
        let kind = match &err {
            ConfigError::Read { source, .. } => source.kind(),
            ConfigError::NoDirectory(_) => io::ErrorKind::NotFound,
            _ => io::ErrorKind::InvalidInput,
        };
        io::Error::new(kind, err)
    }
}
