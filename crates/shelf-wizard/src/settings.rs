//! Tunables a controller is opened with.

use std::time::Duration;

use shelf_config::ShelfConfig;
use shelf_draft::{DEFAULT_DEBOUNCE, DEFAULT_TTL};
use shelf_media::MediaLimits;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardSettings {
    /// Tenant the entry belongs to; part of the draft key and upload scope.
    pub scope: String,
    pub debounce: Duration,
    pub ttl: Duration,
    /// Storage bucket passed to the upload endpoint.
    pub asset_category: String,
    /// Most assets a submitted entry may carry.
    pub max_slots: usize,
}

impl WizardSettings {
    #[must_use]
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            debounce: DEFAULT_DEBOUNCE,
            ttl: DEFAULT_TTL,
            asset_category: "products".to_string(),
            max_slots: MediaLimits::default().max_slots,
        }
    }

    #[must_use]
    pub fn from_config(config: &ShelfConfig) -> Self {
        Self {
            scope: config.tenant.scope.clone(),
            debounce: config.draft.debounce(),
            ttl: config.draft.ttl(),
            asset_category: config.media.asset_category.clone(),
            max_slots: config.media.max_slots,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_match_builtin_defaults() {
        let mut config = ShelfConfig::default();
        config.tenant.scope = "vendor-3".into();
        let settings = WizardSettings::from_config(&config);
        assert_eq!(settings, WizardSettings::new("vendor-3"));
    }

    #[test]
    fn slot_cap_follows_media_config() {
        let mut config = ShelfConfig::default();
        config.media.max_slots = 6;
        assert_eq!(WizardSettings::from_config(&config).max_slots, 6);
    }
}
