use anyhow::Context;
use shelf_config::ShelfConfig;
use shelf_media::{HttpAssetUploader, MediaUploadPipeline, SourceFile, UploadScope};

use crate::bootstrap;
use crate::cli::{GlobalFlags, UploadArgs};
use crate::output::output;
use crate::progress::Progress;

pub async fn handle(args: &UploadArgs, config: &ShelfConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    config.require_remote()?;
    let scope = UploadScope::new(
        bootstrap::require_scope(config)?,
        config.media.asset_category.clone(),
    );

    let files = args
        .files
        .iter()
        .map(|path| {
            SourceFile::from_path(path).with_context(|| format!("cannot read {}", path.display()))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let uploader = HttpAssetUploader::from_config(config)?;
    let pipeline = MediaUploadPipeline::from_config(uploader, &config.media);

    let progress = Progress::spinner(&format!("uploading {} file(s)", files.len()), flags.quiet);
    let mut assets = Vec::new();
    let report = pipeline.upload_batch(&mut assets, files, &scope).await;
    progress.finish_ok(&format!(
        "{} accepted, {} inline, {} rejected",
        report.accepted.len(),
        report.inline_count(),
        report.rejected.len()
    ));

    let rejected: Vec<_> = report
        .rejected
        .iter()
        .map(|r| serde_json::json!({ "file": r.file, "reason": r.reason.to_string() }))
        .collect();
    output(
        &serde_json::json!({ "accepted": report.accepted, "rejected": rejected }),
        flags.format,
    )
}
