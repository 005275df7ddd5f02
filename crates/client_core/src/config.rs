use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use shared::domain::{DEFAULT_INFERENCE_URL, DEFAULT_SPRITE_URL};
use thiserror::Error;
use url::Url;

pub const SETTINGS_FILE_NAME: &str = "storygen.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub inference_url: String,
    pub inference_token: Option<String>,
    pub sprite_url: String,
    pub frame_interval_ms: u64,
    pub espeak_bin: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            inference_url: DEFAULT_INFERENCE_URL.into(),
            inference_token: None,
            sprite_url: DEFAULT_SPRITE_URL.into(),
            frame_interval_ms: 16,
            espeak_bin: "espeak-ng".into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid {field} '{value}': {source}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        source: url::ParseError,
    },
    #[error("frame_interval_ms must be greater than zero")]
    ZeroFrameInterval,
}

impl Settings {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        parse_url("inference_url", &self.inference_url)?;
        parse_url("sprite_url", &self.sprite_url)?;
        if self.frame_interval_ms == 0 {
            return Err(SettingsError::ZeroFrameInterval);
        }
        Ok(())
    }
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, SettingsError> {
    Url::parse(value).map_err(|source| SettingsError::InvalidUrl {
        field,
        value: value.to_string(),
        source,
    })
}

/// Settings file lookup: working directory first, then the per-user config dir.
pub fn default_settings_path() -> Option<PathBuf> {
    let local = PathBuf::from(SETTINGS_FILE_NAME);
    if local.exists() {
        return Some(local);
    }
    dirs::config_dir().map(|dir| dir.join("storygen").join(SETTINGS_FILE_NAME))
}

pub fn load_settings(path: Option<&Path>) -> Settings {
    let path = path.map(Path::to_path_buf).or_else(default_settings_path);
    load_settings_with(path.as_deref(), |key| std::env::var(key).ok())
}

pub fn load_settings_with(path: Option<&Path>, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = path.and_then(|path| fs::read_to_string(path).ok()) {
        match toml::from_str::<SettingsFile>(&raw) {
            Ok(file_cfg) => file_cfg.apply(&mut settings),
            Err(err) => tracing::warn!("ignoring unreadable settings file: {err}"),
        }
    }

    if let Some(v) = env("APP__INFERENCE_URL") {
        settings.inference_url = v;
    }

    if let Some(v) = env("HF_API_TOKEN") {
        settings.inference_token = Some(v);
    }
    if let Some(v) = env("APP__INFERENCE_TOKEN") {
        settings.inference_token = Some(v);
    }

    if let Some(v) = env("APP__SPRITE_URL") {
        settings.sprite_url = v;
    }

    if let Some(v) = env("APP__FRAME_INTERVAL_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.frame_interval_ms = parsed;
        }
    }

    if let Some(v) = env("ESPEAK_BIN") {
        settings.espeak_bin = v;
    }

    settings.inference_token = settings
        .inference_token
        .filter(|token| !token.trim().is_empty());
    settings
}

/// On-disk shape of `storygen.toml`; every key is optional and unknown keys
/// are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsFile {
    inference_url: Option<String>,
    inference_token: Option<String>,
    sprite_url: Option<String>,
    frame_interval_ms: Option<u64>,
    espeak_bin: Option<String>,
}

impl SettingsFile {
    fn apply(self, settings: &mut Settings) {
        if let Some(v) = self.inference_url {
            settings.inference_url = v;
        }
        if let Some(v) = self.inference_token {
            settings.inference_token = Some(v);
        }
        if let Some(v) = self.sprite_url {
            settings.sprite_url = v;
        }
        if let Some(v) = self.frame_interval_ms {
            settings.frame_interval_ms = v;
        }
        if let Some(v) = self.espeak_bin {
            settings.espeak_bin = v;
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
