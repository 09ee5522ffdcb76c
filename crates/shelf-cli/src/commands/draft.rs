use shelf_config::ShelfConfig;
use shelf_draft::{DraftKey, DraftStorage, DraftStore};

use crate::bootstrap;
use crate::cli::{DraftCommands, GlobalFlags};
use crate::output::output;

pub fn handle(action: &DraftCommands, config: &ShelfConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let storage = bootstrap::open_storage(config)?;

    match action {
        DraftCommands::List => {
            let keys = storage.keys()?;
            output(&keys, flags.format)
        }
        DraftCommands::Show { entity } => {
            let key = draft_key(config, entity.as_deref())?;
            let store = DraftStore::new(storage, key.clone()).with_ttl(config.draft.ttl());
            match store.read() {
                Some(record) => output(&record, flags.format),
                None => output(
                    &serde_json::json!({ "key": key.to_string(), "draft": null }),
                    flags.format,
                ),
            }
        }
        DraftCommands::Discard { entity } => {
            let key = draft_key(config, entity.as_deref())?;
            let mut store = DraftStore::new(storage, key.clone());
            store.clear();
            output(
                &serde_json::json!({ "key": key.to_string(), "discarded": true }),
                flags.format,
            )
        }
    }
}

fn draft_key(config: &ShelfConfig, entity: Option<&str>) -> anyhow::Result<DraftKey> {
    let scope = bootstrap::require_scope(config)?;
    Ok(entity.map_or_else(
        || DraftKey::new_entity(scope),
        |id| DraftKey::existing(scope, id),
    ))
}
