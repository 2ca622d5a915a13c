//! Drill configuration loaded from TOML.
//!
//! ```toml
//! [session]
//! length = 10
//! locale = "en"
//! mode = "focus:makeTen"   # "mixed", "focus:<skill>" or "<skill>"
//! seed = "classroom-1"     # optional
//!
//! [progress]
//! path = "progress.json"   # optional; progress is not persisted without it
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{error, info};

use crate::practice_engine::{
    error::ConfigError,
    i18n::Locale,
    models::{SessionMode, SessionRequest},
};

pub const CONFIG_PATH_ENV: &str = "DRILL_CONFIG_PATH";

#[derive(Clone, Debug, Deserialize, Default, PartialEq)]
pub struct DrillConfig {
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub progress: ProgressSettings,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionSettings {
    pub length: usize,
    pub locale: Locale,
    pub mode: SessionMode,
    pub seed: Option<String>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            length: 5,
            locale: Locale::default(),
            mode: SessionMode::Mixed,
            seed: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ProgressSettings {
    pub path: Option<PathBuf>,
}

impl DrillConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&raw)
    }

    /// Load from `DRILL_CONFIG_PATH`. Unset, unreadable or invalid config
    /// falls back to defaults.
    pub fn from_env() -> Self {
        let Ok(path) = std::env::var(CONFIG_PATH_ENV) else {
            return Self::default();
        };
        match Self::load(&path) {
            Ok(cfg) => {
                info!(%path, "loaded drill config");
                cfg
            }
            Err(e) => {
                error!(%path, error = %e, "failed to load drill config, using defaults");
                Self::default()
            }
        }
    }

    pub fn session_request(&self) -> SessionRequest {
        SessionRequest {
            length: self.session.length,
            mode: self.session.mode,
            seed: self.session.seed.clone(),
            locale: self.session.locale,
        }
    }
}
