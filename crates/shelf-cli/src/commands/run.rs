use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use shelf_config::ShelfConfig;
use shelf_core::{FormState, StepPlan};
use shelf_draft::DraftStorage;
use shelf_media::{HttpAssetUploader, MediaUploadPipeline, SourceFile};
use shelf_taxonomy::HttpTaxonomyClient;
use shelf_wizard::{HttpCatalogApi, StepController, WizardError, WizardSettings};

use crate::bootstrap;
use crate::cli::{GlobalFlags, RunArgs};
use crate::output::output;
use crate::progress::Progress;

pub async fn handle(args: &RunArgs, config: &ShelfConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    config.require_remote()?;
    let storage: Arc<dyn DraftStorage> = bootstrap::open_storage(config)?;
    let api = HttpCatalogApi::from_config(config)?;
    let lookup = HttpTaxonomyClient::from_config(config)?;
    let settings = WizardSettings::from_config(config);
    let plan = StepPlan::catalog();

    let mut wizard = match &args.id {
        Some(id) => StepController::open_remote(plan, storage, settings, &api, id)
            .await
            .with_context(|| format!("cannot load entity {id}"))?,
        None => StepController::open(plan, storage, settings),
    };

    if let Some(draft) = wizard.available_draft() {
        if args.restore {
            tracing::info!(saved_at = %draft.saved_at, "restoring draft");
            wizard.restore_draft()?;
        } else if !flags.quiet {
            eprintln!(
                "a draft saved at {} exists for {}; pass --restore to use it",
                draft.saved_at,
                wizard.draft_key()
            );
        }
    }

    if let Some(path) = &args.form {
        let merged = merge_form_file(wizard.form(), path)?;
        wizard.update(|form| *form = merged)?;
    }

    let mut form = wizard.form().clone();
    let matched =
        shelf_taxonomy::reconcile_form(&mut form, &lookup, &config.tenant.allowed_categories)
            .await
            .context("cannot load taxonomy lists")?;
    if matched > 0 {
        wizard.update(|f| *f = form)?;
    }

    if let Err(error) = walk_to_last_step(&mut wizard) {
        let key = wizard.save_and_exit()?;
        anyhow::bail!("{error}; draft saved as {key}");
    }

    if !args.images.is_empty() {
        let files = args
            .images
            .iter()
            .map(|path| {
                SourceFile::from_path(path)
                    .with_context(|| format!("cannot read {}", path.display()))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        let pipeline =
            MediaUploadPipeline::from_config(HttpAssetUploader::from_config(config)?, &config.media);

        let progress = Progress::spinner("uploading images", flags.quiet);
        let report = wizard.attach_files(&pipeline, files).await?;
        progress.finish_ok(&format!("{} image(s) attached", report.accepted.len()));
        for rejection in &report.rejected {
            eprintln!("skipped {rejection}");
        }
    }

    if args.save_only {
        let key = wizard.save_and_exit()?;
        return output(
            &serde_json::json!({ "draft": key.to_string(), "step": wizard.current_step() }),
            flags.format,
        );
    }

    let progress = Progress::spinner("saving catalog entry", flags.quiet);
    match wizard.submit(&api, &lookup).await {
        Ok(entity) => {
            progress.finish_ok(&format!("saved {}", entity.id));
            output(&entity, flags.format)
        }
        Err(error) => {
            progress.finish_err("save failed");
            anyhow::bail!("{error}; draft kept as {}", wizard.draft_key())
        }
    }
}

/// Press "next" until the last step or the first gate failure.
fn walk_to_last_step(wizard: &mut StepController) -> Result<(), WizardError> {
    let last = wizard.plan().last();
    while let Some(step) = wizard.current_step() {
        if step == last {
            break;
        }
        wizard.next()?;
    }
    Ok(())
}

/// Overlay the JSON object in `path` onto `current`.
fn merge_form_file(current: &FormState, path: &Path) -> anyhow::Result<FormState> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read form file {}", path.display()))?;
    let patch: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    merge_form(current, patch)
}

fn merge_form(current: &FormState, patch: serde_json::Value) -> anyhow::Result<FormState> {
    let serde_json::Value::Object(fields) = patch else {
        anyhow::bail!("form file must contain a JSON object");
    };
    let mut base = serde_json::to_value(current)?;
    if let serde_json::Value::Object(map) = &mut base {
        map.extend(fields);
    }
    serde_json::from_value(base).context("form file has fields of the wrong type")
}
