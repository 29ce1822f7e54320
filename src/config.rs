use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::MigrateError;
use crate::grafana::target::DEFAULT_MESSAGE;

pub const DEFAULT_SOURCE_URL: &str = "http://old-grafana:3000";
pub const DEFAULT_TARGET_URL: &str = "http://new-grafana:3000";
pub const SOURCE_TOKEN_VAR: &str = "SOURCE_TOKEN";
pub const TARGET_TOKEN_VAR: &str = "TARGET_TOKEN";

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    pub source: Option<InstanceSection>,
    pub target: Option<InstanceSection>,
    pub request_timeout_secs: Option<u64>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct InstanceSection {
    pub url: Option<String>,
}

/// Values given on the command line (or their env fallbacks), which win
/// over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub source_url: Option<String>,
    pub target_url: Option<String>,
    pub message: Option<String>,
}

pub struct InstanceConfig {
    pub url: String,
    pub token: String,
}

impl fmt::Debug for InstanceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceConfig")
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug)]
pub struct MigrateConfig {
    pub source: InstanceConfig,
    pub target: InstanceConfig,
    pub request_timeout: Option<Duration>,
    pub message: String,
}

pub fn config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".grafana-migrate")
        .join("config.toml")
}

pub fn load_file(path: &Path) -> Result<FileConfig> {
    if !path.exists() {
        return Ok(FileConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: FileConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(config)
}

/// Loads the config file (explicit path or the default location) and merges
/// it with overrides and credentials from the process environment.
pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<MigrateConfig> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(config_path);
    let file = load_file(&path)?;
    let config = resolve(file, overrides, |var| std::env::var(var).ok())?;
    Ok(config)
}

/// Tokens are checked first so a missing credential is reported before
/// anything else.
pub fn resolve(
    file: FileConfig,
    overrides: &Overrides,
    env: impl Fn(&str) -> Option<String>,
) -> std::result::Result<MigrateConfig, MigrateError> {
    let source_token = required_token(&env, SOURCE_TOKEN_VAR)?;
    let target_token = required_token(&env, TARGET_TOKEN_VAR)?;

    let source_url = pick_url(
        overrides.source_url.as_deref(),
        file.source.and_then(|s| s.url),
        DEFAULT_SOURCE_URL,
    )?;
    let target_url = pick_url(
        overrides.target_url.as_deref(),
        file.target.and_then(|s| s.url),
        DEFAULT_TARGET_URL,
    )?;

    let request_timeout = match file.request_timeout_secs {
        Some(0) => {
            return Err(MigrateError::InvalidConfig(
                "request_timeout_secs must be greater than zero".into(),
            ))
        }
        Some(secs) => Some(Duration::from_secs(secs)),
        None => None,
    };

    let message = overrides
        .message
        .clone()
        .or(file.message)
        .unwrap_or_else(|| DEFAULT_MESSAGE.to_string());

    Ok(MigrateConfig {
        source: InstanceConfig {
            url: source_url,
            token: source_token,
        },
        target: InstanceConfig {
            url: target_url,
            token: target_token,
        },
        request_timeout,
        message,
    })
}

fn required_token(
    env: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> std::result::Result<String, MigrateError> {
    env(var)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(MigrateError::MissingCredential { var })
}

fn pick_url(
    flag: Option<&str>,
    file: Option<String>,
    default: &str,
) -> std::result::Result<String, MigrateError> {
    let raw = flag
        .map(String::from)
        .or(file)
        .unwrap_or_else(|| default.to_string());
    let parsed = reqwest::Url::parse(&raw)
        .map_err(|e| MigrateError::InvalidConfig(format!("invalid URL {raw}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(MigrateError::InvalidConfig(format!(
            "URL {raw} must use http or https"
        )));
    }
    Ok(raw.trim_end_matches('/').to_string())
}
