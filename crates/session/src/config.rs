use std::fmt;
use std::fs;
use std::path::Path;

use animation::AnimationConfig;
use camera::CameraConfig;
use navigation::NavigationConfig;
use racks::{Highlight, LayoutConfig, LayoutSpec};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// All tunables for one retrieval session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub layout: LayoutConfig,
    pub navigation: NavigationConfig,
    pub animation: AnimationConfig,
    pub camera: CameraConfig,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "I/O error: {err}"),
            ConfigError::Parse(err) => write!(f, "JSON parse error: {err}"),
            ConfigError::Invalid(reason) => write!(f, "Invalid configuration: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl RetrievalConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: RetrievalConfig = read_json(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        let config: RetrievalConfig =
            serde_json::from_str(payload).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sections = [
            ("layout", self.layout.validate()),
            ("navigation", self.navigation.validate()),
            ("animation", self.animation.validate()),
            ("camera", self.camera.validate()),
        ];
        for (section, result) in sections {
            result.map_err(|reason| ConfigError::Invalid(format!("{section}: {reason}")))?;
        }
        Ok(())
    }

    /// Every section validated, invalid ones replaced by defaults.
    pub fn sanitized(self) -> Self {
        Self {
            layout: self.layout.sanitized(),
            navigation: self.navigation.sanitized(),
            animation: self.animation.sanitized(),
            camera: self.camera.sanitized(),
        }
    }
}

/// Bay/row mapping exported by the location-profile records.
pub fn load_layout_spec(path: impl AsRef<Path>) -> Result<LayoutSpec, ConfigError> {
    read_json(path)
}

/// Search result handed over by the locator; JSON `null` means no result.
pub fn load_highlight(path: impl AsRef<Path>) -> Result<Option<Highlight>, ConfigError> {
    read_json(path)
}

fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let payload = fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
    serde_json::from_str(&payload).map_err(ConfigError::Parse)
}
