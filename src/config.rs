//! 配置加载
//!
//! 优先级：环境变量 > 配置文件 (~/.config/newscheck/config.toml) > 默认值

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::models::VerdictSet;

pub const ENDPOINT_ENV: &str = "NEWSCHECK_ENDPOINT";
pub const TIMEOUT_ENV: &str = "NEWSCHECK_TIMEOUT_SECS";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("no validation endpoint configured; set NEWSCHECK_ENDPOINT or [transport].endpoint")]
    MissingEndpoint,
    #[error("endpoint {0:?} is not an absolute http(s) URL")]
    InvalidEndpoint(String),
    #[error("timeout {0:?} must be a positive number of seconds")]
    InvalidTimeout(String),
}

/// TOML 文件结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub transport: TransportSection,
    #[serde(default)]
    pub verdicts: VerdictSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransportSection {
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerdictSection {
    pub truthy: Option<Vec<String>>,
}

/// 运行时配置
#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: reqwest::Url,
    pub timeout: Duration,
    pub verdicts: VerdictSet,
}

impl Config {
    /// 默认配置文件路径
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("newscheck").join("config.toml"))
    }

    /// 从默认位置和进程环境加载
    pub fn load() -> Result<Self, ConfigError> {
        let file = match Self::path() {
            Some(path) => load_file(&path)?,
            None => ConfigFile::default(),
        };
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// 合并文件内容与环境变量
    pub fn resolve(
        file: ConfigFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let endpoint = env(ENDPOINT_ENV)
            .filter(|v| !v.trim().is_empty())
            .or(file.transport.endpoint)
            .ok_or(ConfigError::MissingEndpoint)?;
        let endpoint = parse_endpoint(endpoint.trim())?;

        let timeout_secs = match env(TIMEOUT_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?,
            None => file.transport.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(timeout_secs.to_string()));
        }

        let verdicts = file
            .verdicts
            .truthy
            .map(VerdictSet::new)
            .unwrap_or_default();

        Ok(Self {
            endpoint,
            timeout: Duration::from_secs(timeout_secs),
            verdicts,
        })
    }
}

/// 读取配置文件；文件不存在时返回空配置
pub fn load_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    if !path.exists() {
        return Ok(ConfigFile::default());
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

fn parse_endpoint(raw: &str) -> Result<reqwest::Url, ConfigError> {
    let url = reqwest::Url::parse(raw).map_err(|_| ConfigError::InvalidEndpoint(raw.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ConfigError::InvalidEndpoint(raw.to_string())),
    }
}
