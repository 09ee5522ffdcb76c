//! Local draft autosave configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const fn default_debounce_ms() -> u64 {
    1000
}

const fn default_ttl_days() -> u32 {
    7
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DraftConfig {
    /// Quiet period after the last edit before a draft is written.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Drafts older than this are discarded when read.
    #[serde(default = "default_ttl_days")]
    pub ttl_days: u32,

    /// Directory holding draft files. Empty means the platform data dir.
    #[serde(default)]
    pub dir: String,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            ttl_days: default_ttl_days(),
            dir: String::new(),
        }
    }
}

impl DraftConfig {
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(u64::from(self.ttl_days) * 24 * 60 * 60)
    }

    /// Resolve the draft directory: explicit `dir`, else `<data_dir>/shelf/drafts`.
    #[must_use]
    pub fn draft_dir(&self) -> Option<PathBuf> {
        if self.dir.is_empty() {
            dirs::data_dir().map(|p| p.join("shelf").join("drafts"))
        } else {
            Some(PathBuf::from(&self.dir))
        }
    }
}
