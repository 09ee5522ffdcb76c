use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use shelf_config::ShelfConfig;
use shelf_draft::FileStorage;

use crate::cli::GlobalFlags;

/// Load layered config (with `.env`) and apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<ShelfConfig> {
    let mut config = ShelfConfig::load_with_dotenv().context("failed to load shelf config")?;
    apply_overrides(&mut config, flags);
    Ok(config)
}

fn apply_overrides(config: &mut ShelfConfig, flags: &GlobalFlags) {
    if let Some(scope) = &flags.scope {
        config.tenant.scope.clone_from(scope);
    }
    if let Some(dir) = &flags.draft_dir {
        config.draft.dir.clone_from(dir);
    }
}

/// Tenant scope, required by every command that touches drafts or uploads.
pub fn require_scope(config: &ShelfConfig) -> anyhow::Result<&str> {
    if config.tenant.is_configured() {
        Ok(&config.tenant.scope)
    } else {
        anyhow::bail!("no tenant scope: set tenant.scope, SHELF_TENANT__SCOPE or pass --scope")
    }
}

pub fn open_storage(config: &ShelfConfig) -> anyhow::Result<Arc<FileStorage>> {
    let dir: PathBuf = config
        .draft
        .draft_dir()
        .context("no data directory available; set draft.dir")?;
    let storage = FileStorage::open(&dir)
        .with_context(|| format!("cannot open draft directory {}", dir.display()))?;
    Ok(Arc::new(storage))
}
