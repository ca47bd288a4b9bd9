// File and environment configuration for the render engine

use crate::config::DEFAULT_STATE_GLOBAL;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

type Result<T> = std::result::Result<T, ConfigError>;

/// Default prefix for environment variables.
pub const DEFAULT_ENV_PREFIX: &str = "ROUTER_ENGINE";

/// Render settings that can live outside of code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub with_ids: bool,
    pub profile_render_time: bool,
    /// Global the serialized state is assigned to, e.g. `__PRELOADED_STATE__`.
    pub state_global: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            with_ids: false,
            profile_render_time: false,
            state_global: DEFAULT_STATE_GLOBAL.to_string(),
        }
    }
}

/// Trait for validating configuration
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

impl Validate for EngineSettings {
    fn validate(&self) -> Result<()> {
        let valid = !self.state_global.is_empty()
            && self.state_global.split('.').all(|segment| {
                let mut chars = segment.chars();
                matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
                    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
            });

        if !valid {
            return Err(ConfigError::ValidationError(format!(
                "state_global must be a JavaScript identifier path, got {:?}",
                self.state_global
            )));
        }
        Ok(())
    }
}

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Toml,
    Env,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(FileFormat::Json),
            "toml" => Some(FileFormat::Toml),
            "env" => Some(FileFormat::Env),
            _ => None,
        }
    }
}

/// Loads [`EngineSettings`] from files or the environment.
pub struct SettingsLoader;

impl SettingsLoader {
    /// Load settings from a file, detecting the format by extension.
    pub fn load_file(path: impl AsRef<Path>) -> Result<EngineSettings> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ConfigError::LoadError("No file extension found".to_string()))?;

        let format = FileFormat::from_extension(ext)
            .ok_or_else(|| ConfigError::LoadError(format!("Unsupported format: {}", ext)))?;

        let content = fs::read_to_string(path)?;
        Self::parse(&content, format)
    }

    /// Parse settings from a string.
    pub fn parse(content: &str, format: FileFormat) -> Result<EngineSettings> {
        let settings: EngineSettings = match format {
            FileFormat::Json => serde_json::from_str(content)
                .map_err(|e| ConfigError::ParseError(format!("JSON parse error: {}", e)))?,
            FileFormat::Toml => toml::from_str(content)
                .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?,
            FileFormat::Env => Self::from_pairs(parse_env_lines(content), "")?,
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Read `<PREFIX>_WITH_IDS`, `<PREFIX>_PROFILE_RENDER_TIME` and
    /// `<PREFIX>_STATE_GLOBAL` from the process environment.
    pub fn from_env(prefix: Option<&str>) -> Result<EngineSettings> {
        let prefix = prefix.unwrap_or(DEFAULT_ENV_PREFIX);
        let vars = env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)));
        let settings = Self::from_pairs(vars, prefix)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load a `.env` file into the process environment, then read it.
    pub fn load_dotenv(path: Option<&str>, prefix: Option<&str>) -> Result<EngineSettings> {
        match path {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| ConfigError::LoadError(e.to_string()))?;
            }
            None => {
                // A missing .env file is fine
                dotenvy::dotenv().ok();
            }
        }
        Self::from_env(prefix)
    }

    fn from_pairs<I>(pairs: I, prefix: &str) -> Result<EngineSettings>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut settings = EngineSettings::default();

        for (key, value) in pairs {
            let key = key.to_uppercase();
            let name = if prefix.is_empty() {
                key.as_str()
            } else {
                match key
                    .strip_prefix(&prefix.to_uppercase())
                    .and_then(|rest| rest.strip_prefix('_'))
                {
                    Some(name) => name,
                    None => continue,
                }
            };

            match name {
                "WITH_IDS" => settings.with_ids = parse_bool(name, &value)?,
                "PROFILE_RENDER_TIME" => settings.profile_render_time = parse_bool(name, &value)?,
                "STATE_GLOBAL" => settings.state_global = value,
                _ => {}
            }
        }

        Ok(settings)
    }
}

fn parse_env_lines(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            (key.trim().to_string(), value.to_string())
        })
        .collect()
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::ParseError(format!(
            "{} expects a boolean, got {:?}",
            name, value
        ))),
    }
}
