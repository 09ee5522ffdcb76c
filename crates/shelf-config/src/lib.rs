//! # shelf-config
//!
//! Layered configuration loading for Shelf using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`SHELF_*` prefix, `__` as separator)
//! 2. Project-level `.shelf/config.toml`
//! 3. User-level `~/.config/shelf/config.toml`
//! 4. Built-in defaults
//!
//! Figment maps `SHELF_DRAFT__DEBOUNCE_MS` -> `draft.debounce_ms`,
//! `SHELF_MEDIA__MAX_SLOTS` -> `media.max_slots`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use shelf_config::ShelfConfig;
//!
//! let config = ShelfConfig::load_with_dotenv().expect("config");
//! println!("drafts autosave after {:?}", config.draft.debounce());
//! ```

mod api;
mod draft;
mod error;
mod media;
mod tenant;

pub use api::ApiConfig;
pub use draft::DraftConfig;
pub use error::ConfigError;
pub use media::MediaConfig;
pub use tenant::TenantConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ShelfConfig {
    #[serde(default)]
    pub draft: DraftConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub tenant: TenantConfig,
}

impl ShelfConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] for `.env` loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source cannot be parsed and
    /// [`ConfigError::InvalidValue`] if a loaded value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Extract and validate from an arbitrary figment (tests layer their own).
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".shelf/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("SHELF_").split("__"))
    }

    /// Reject values the wizard cannot operate with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &str, reason: &str| {
            Err(ConfigError::InvalidValue {
                field: field.to_string(),
                reason: reason.to_string(),
            })
        };

        if self.draft.ttl_days == 0 {
            return invalid("draft.ttl_days", "must be at least 1 day");
        }
        if self.media.max_slots == 0 {
            return invalid("media.max_slots", "must allow at least one image");
        }
        if self.media.max_file_mb == 0 {
            return invalid("media.max_file_mb", "must be at least 1 MiB");
        }
        if self.media.upload_timeout_secs == 0 {
            return invalid("media.upload_timeout_secs", "must be positive");
        }
        Ok(())
    }

    /// Fail unless the backend and tenant sections are filled in.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] for the first missing section.
    pub fn require_remote(&self) -> Result<(), ConfigError> {
        if !self.api.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "api".into(),
            });
        }
        if !self.tenant.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "tenant".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("shelf").join("config.toml"))
    }
}
