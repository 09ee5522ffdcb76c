//! Errors raised while loading Shelf settings.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file or environment value could not be read into `ShelfConfig`.
    #[error("cannot load shelf settings: {0}")]
    Figment(#[from] figment::Error),

    /// The backend or tenant settings are missing.
    #[error(
        "the [{section}] settings are missing; add them to .shelf/config.toml or set SHELF_{}__* variables",
        section.to_uppercase()
    )]
    NotConfigured { section: String },

    /// A loaded value is outside what the wizard can work with.
    #[error("setting '{field}' {reason}")]
    InvalidValue { field: String, reason: String },
}
