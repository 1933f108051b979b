//! 运行配置
//!
//! 优先级：默认值 < 配置文件 (config.toml) < 环境变量 / 命令行参数

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cli::Cli;
use crate::error::ConfigError;
use crate::search::DEFAULT_ENDPOINT;

/// 配置文件结构
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub data_file: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

/// 解析后的配置
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_key: String,
    pub endpoint: String,
    pub data_file: PathBuf,
    pub log_file: PathBuf,
}

/// 默认配置文件路径 (~/.config/shoppies/config.toml)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("shoppies").join("config.toml"))
}

/// 读取配置文件；`required` 为 false 时文件不存在视为空配置
pub fn read_config_file(path: &Path, required: bool) -> Result<FileConfig, ConfigError> {
    if !required && !path.exists() {
        return Ok(FileConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl Settings {
    /// 从命令行参数和配置文件加载
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => read_config_file(path, true)?,
            None => match default_config_path() {
                Some(path) => read_config_file(&path, false)?,
                None => FileConfig::default(),
            },
        };

        let data_dir = dirs::data_dir()
            .map(|dir| dir.join("shoppies"))
            .ok_or(ConfigError::NoDirectory("data"))?;

        Self::resolve(cli, file, &data_dir)
    }

    /// 合并各来源
    pub fn resolve(cli: &Cli, file: FileConfig, data_dir: &Path) -> Result<Self, ConfigError> {
        let api_key = cli
            .api_key
            .clone()
            .or(file.api_key)
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        Ok(Self {
            api_key,
            endpoint: cli
                .endpoint
                .clone()
                .or(file.endpoint)
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            data_file: cli
                .data_file
                .clone()
                .or(file.data_file)
                .unwrap_or_else(|| data_dir.join("storage.json")),
            log_file: cli
                .log_file
                .clone()
                .or(file.log_file)
                .unwrap_or_else(|| data_dir.join("shoppies.log")),
        })
    }
}
