//! End-to-end wizard flows against scripted collaborators.

mod common;

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use shelf_core::{AssetUploadResult, CatalogRecord, FieldKey, StepId, StepPlan, TaxonomyKind, TaxonomyTerm};
use shelf_draft::{DraftStorage, MemoryStorage};
use shelf_media::{MediaLimits, MediaUploadPipeline, RejectReason};
use shelf_wizard::{StepController, WizardError, WizardSettings, WizardState};

use common::{Call, FakeApi, FakeLookup, FakeUploader, fill_basic, fill_description, fill_pricing, image};

fn step(n: u8) -> StepId {
    StepId::new(n).unwrap()
}

fn open(storage: &Arc<MemoryStorage>) -> StepController {
    StepController::open(
        StepPlan::catalog(),
        Arc::clone(storage) as Arc<dyn DraftStorage>,
        WizardSettings::new("vendor-7"),
    )
}

fn pipeline(uploader: FakeUploader) -> MediaUploadPipeline<FakeUploader> {
    MediaUploadPipeline::new(
        uploader,
        MediaLimits {
            max_slots: 4,
            max_file_bytes: 20 * 1024 * 1024,
        },
        Duration::from_secs(20),
    )
}

/// Walk a fresh wizard to the media step with every field filled.
fn advance_to_media(wizard: &mut StepController) {
    wizard.update(fill_basic).unwrap();
    assert_eq!(wizard.next().unwrap(), step(2));
    wizard.update(fill_description).unwrap();
    assert_eq!(wizard.next().unwrap(), step(3));
    wizard.update(fill_pricing).unwrap();
    assert_eq!(wizard.next().unwrap(), step(4));
}

#[tokio::test(start_paused = true)]
async fn full_entry_with_overflowing_upload_batch() {
    let storage = Arc::new(MemoryStorage::new());
    let mut wizard = open(&storage);
    advance_to_media(&mut wizard);

    let first = pipeline(FakeUploader::default());
    let report = wizard
        .attach_files(&first, vec![image("front.png"), image("back.png")])
        .await
        .unwrap();
    assert_eq!(report.accepted.len(), 2);

    let flaky = pipeline(FakeUploader::failing(&["side.png"]));
    let report = wizard
        .attach_files(
            &flaky,
            vec![image("top.png"), image("side.png"), image("label.png")],
        )
        .await
        .unwrap();

    assert_eq!(report.accepted.len(), 2);
    assert!(report.accepted[1].is_inline());
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].file, "label.png");
    assert_eq!(report.rejected[0].reason, RejectReason::SlotsExhausted { max: 4 });
    assert_eq!(wizard.form().assets.len(), 4);

    let api = FakeApi::default();
    let lookup = FakeLookup::default();
    let entity = wizard.submit(&api, &lookup).await.unwrap();

    assert_eq!(wizard.state(), WizardState::Done);
    assert_eq!(entity.id, "prod-new");
    assert!(storage.keys().unwrap().is_empty(), "draft cleared on success");

    let calls = api.calls();
    let [Call::Create { scope, record }] = calls.as_slice() else {
        panic!("expected exactly one create call");
    };
    assert_eq!(scope, "vendor-7");
    assert_eq!(record.price, record.selling_price);
    assert_eq!(record.images.len(), 4);
    assert!(record.images[3].starts_with("data:image/png;base64,"));
    assert_eq!(
        record.image_keys,
        vec![
            "products/front.png".to_string(),
            "products/back.png".to_string(),
            "products/top.png".to_string(),
        ]
    );

    // Let any stray timer fire: nothing may recreate the draft.
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(storage.keys().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn done_is_terminal() {
    let storage = Arc::new(MemoryStorage::new());
    let mut wizard = open(&storage);
    advance_to_media(&mut wizard);
    wizard
        .submit(&FakeApi::default(), &FakeLookup::default())
        .await
        .unwrap();

    assert!(matches!(wizard.update(|f| f.name.clear()), Err(WizardError::Finished)));
    assert!(matches!(wizard.next(), Err(WizardError::Finished)));
    assert!(matches!(wizard.back(), Err(WizardError::Finished)));
    assert!(matches!(wizard.save_and_exit(), Err(WizardError::Finished)));
    assert!(matches!(
        wizard.submit(&FakeApi::default(), &FakeLookup::default()).await,
        Err(WizardError::Finished)
    ));
    assert_eq!(wizard.current_step(), None);
}

#[tokio::test(start_paused = true)]
async fn submit_is_only_offered_on_the_last_step() {
    let storage = Arc::new(MemoryStorage::new());
    let mut wizard = open(&storage);
    wizard.update(fill_basic).unwrap();
    wizard.next().unwrap();

    let err = wizard
        .submit(&FakeApi::default(), &FakeLookup::default())
        .await
        .unwrap_err();
    assert!(matches!(err, WizardError::NotAtFinalStep { current } if current == step(2)));
    assert_eq!(wizard.state(), WizardState::Step(step(2)));
}

#[tokio::test(start_paused = true)]
async fn submit_revalidates_earlier_steps() {
    let storage = Arc::new(MemoryStorage::new());
    let mut wizard = open(&storage);
    advance_to_media(&mut wizard);
    wizard.update(|f| f.description = "  ".into()).unwrap();

    let api = FakeApi::default();
    let err = wizard.submit(&api, &FakeLookup::default()).await.unwrap_err();

    assert!(matches!(err, WizardError::Validation { step: s, .. } if s == step(2)));
    assert_eq!(wizard.state(), WizardState::Step(step(4)));
    assert_eq!(wizard.field_error(FieldKey::Description), Some("Description is required"));
    assert!(api.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn failed_submit_keeps_draft_and_retry_does_not_recreate_terms() {
    let storage = Arc::new(MemoryStorage::new());
    let mut wizard = open(&storage);
    advance_to_media(&mut wizard);
    wizard
        .update(|f| {
            f.set_category(Some(TaxonomyTerm::pending("Wellness Drinks")));
            f.brand = Some(TaxonomyTerm::pending("Amrut Farms"));
        })
        .unwrap();

    let api = FakeApi::failing(1);
    let lookup = FakeLookup::default();

    let err = wizard.submit(&api, &lookup).await.unwrap_err();
    assert!(matches!(err, WizardError::Api(ref e) if e.status == 503));
    assert_eq!(wizard.state(), WizardState::Step(step(4)));

    // The retained draft already carries the created ids.
    let raw = storage.get("vendor-7:new").unwrap().expect("draft kept");
    let draft: shelf_core::DraftRecord = serde_json::from_str(&raw).unwrap();
    assert_eq!(draft.step, step(4));
    assert_eq!(
        draft.data.category,
        Some(TaxonomyTerm::resolved("custom-1", "Wellness Drinks"))
    );

    let entity = wizard.submit(&api, &lookup).await.unwrap();
    assert_eq!(entity.record.category_id, "custom-1");
    assert_eq!(entity.record.brand_id.as_deref(), Some("custom-2"));
    assert_eq!(
        lookup.created(),
        vec![
            (TaxonomyKind::Category, "Wellness Drinks".to_string()),
            (TaxonomyKind::Brand, "Amrut Farms".to_string()),
        ]
    );
    assert_eq!(api.calls().len(), 2);
    assert!(storage.keys().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn saved_draft_is_offered_and_restored_at_step_one() {
    let storage = Arc::new(MemoryStorage::new());
    let saved_form = {
        let mut wizard = open(&storage);
        advance_to_media(&mut wizard);
        let key = wizard.save_and_exit().unwrap();
        assert_eq!(key.to_string(), "vendor-7:new");
        wizard.form().clone()
    };

    let mut wizard = open(&storage);
    let offered = wizard.available_draft().expect("draft offered");
    assert_eq!(offered.step, step(4));

    assert!(wizard.restore_draft().unwrap());
    assert_eq!(wizard.form(), &saved_form);
    assert_eq!(wizard.state(), WizardState::Step(StepId::FIRST));
    assert!(wizard.available_draft().is_none());
    assert!(!wizard.restore_draft().unwrap());
}

#[tokio::test(start_paused = true)]
async fn discarded_draft_is_gone() {
    let storage = Arc::new(MemoryStorage::new());
    {
        let mut wizard = open(&storage);
        wizard.update(fill_basic).unwrap();
        wizard.save_and_exit().unwrap();
    }

    let mut wizard = open(&storage);
    assert!(wizard.available_draft().is_some());
    wizard.discard_draft().unwrap();
    assert!(wizard.available_draft().is_none());
    assert!(storage.keys().unwrap().is_empty());
    assert!(open(&storage).available_draft().is_none());
}

#[tokio::test(start_paused = true)]
async fn edits_are_debounced_into_one_write() {
    let storage = Arc::new(MemoryStorage::new());
    let mut wizard = open(&storage);

    for name in ["A", "Am", "Aml", "Amla"] {
        wizard.update(|f| f.name = name.into()).unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
    }
    assert_eq!(storage.write_count(), 0);

    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert_eq!(storage.write_count(), 1);
    let raw = storage.get("vendor-7:new").unwrap().unwrap();
    assert!(raw.contains("\"Amla\""));
}

#[tokio::test(start_paused = true)]
async fn teardown_flushes_unfired_autosave() {
    let storage = Arc::new(MemoryStorage::new());
    let mut wizard = open(&storage);
    wizard.update(|f| f.name = "Neem comb".into()).unwrap();

    assert!(wizard.teardown());
    assert_eq!(storage.write_count(), 1);
    assert!(open(&storage).available_draft().is_some());
}

#[tokio::test(start_paused = true)]
async fn teardown_keeps_uploads_from_an_abandoned_batch() {
    let storage = Arc::new(MemoryStorage::new());
    let mut wizard = open(&storage);
    advance_to_media(&mut wizard);

    // Upload timeout is 20s; give up on the batch well before that.
    let uploads = pipeline(FakeUploader::hanging(&["stuck.png"]));
    let attempt = tokio::time::timeout(
        Duration::from_secs(1),
        wizard.attach_files(&uploads, vec![image("first.png"), image("stuck.png")]),
    )
    .await;
    assert!(attempt.is_err(), "batch was abandoned");
    assert_eq!(wizard.form().assets.len(), 1);

    assert!(wizard.teardown());
    let raw = storage.get("vendor-7:new").unwrap().expect("draft written");
    let draft: shelf_core::DraftRecord = serde_json::from_str(&raw).unwrap();
    assert_eq!(draft.step, step(4));
    assert_eq!(draft.data.assets.len(), 1);
    assert_eq!(draft.data.assets[0].src(), "https://cdn.test/first.png");
}

#[tokio::test(start_paused = true)]
async fn untouched_wizard_leaves_the_offered_draft_alone() {
    let storage = Arc::new(MemoryStorage::new());
    {
        let mut wizard = open(&storage);
        wizard.update(fill_basic).unwrap();
        wizard.save_and_exit().unwrap();
    }
    let writes = storage.write_count();

    let wizard = open(&storage);
    assert!(wizard.available_draft().is_some());
    assert!(!wizard.teardown());
    assert_eq!(storage.write_count(), writes);
    assert!(open(&storage).available_draft().is_some());
}

#[tokio::test(start_paused = true)]
async fn submit_rejects_more_assets_than_slots() {
    let storage = Arc::new(MemoryStorage::new());
    let mut wizard = open(&storage);
    advance_to_media(&mut wizard);
    wizard
        .update(|f| {
            for n in 0..6 {
                f.assets.push(AssetUploadResult::inline(
                    format!("{n}.png"),
                    "data:image/png;base64,AA",
                ));
            }
        })
        .unwrap();

    let api = FakeApi::default();
    let err = wizard.submit(&api, &FakeLookup::default()).await.unwrap_err();
    assert!(matches!(err, WizardError::Validation { step: s, .. } if s == step(4)));
    assert_eq!(
        wizard.field_error(FieldKey::Assets),
        Some("You can upload up to 4 images")
    );
    assert!(api.calls().is_empty());
    assert_eq!(wizard.state(), WizardState::Step(step(4)));

    wizard.remove_asset(5).unwrap();
    wizard.remove_asset(4).unwrap();
    wizard.submit(&api, &FakeLookup::default()).await.unwrap();
    assert_eq!(wizard.state(), WizardState::Done);
}

#[tokio::test(start_paused = true)]
async fn interrupted_submit_can_be_resumed() {
    let storage = Arc::new(MemoryStorage::new());
    let mut wizard = open(&storage);
    advance_to_media(&mut wizard);

    let stuck = FakeApi::hanging();
    let lookup = FakeLookup::default();
    let attempt = tokio::time::timeout(Duration::from_secs(30), wizard.submit(&stuck, &lookup)).await;
    assert!(attempt.is_err(), "submit future was abandoned");
    assert_eq!(wizard.state(), WizardState::Submitting);
    assert_eq!(wizard.current_step(), Some(step(4)));

    let entity = wizard.submit(&FakeApi::default(), &lookup).await.unwrap();
    assert_eq!(entity.id, "prod-new");
    assert_eq!(wizard.state(), WizardState::Done);
}

#[tokio::test(start_paused = true)]
async fn editing_an_existing_entity_updates_it() {
    let record = {
        let mut form = shelf_core::FormState::default();
        fill_basic(&mut form);
        fill_description(&mut form);
        fill_pricing(&mut form);
        CatalogRecord::from_form(&form, "vendor-7").unwrap()
    };
    let api = FakeApi::with_entity(shelf_core::CatalogEntity {
        id: "prod-42".into(),
        record,
    });
    let storage = Arc::new(MemoryStorage::new());

    let mut wizard = StepController::open_remote(
        StepPlan::catalog(),
        Arc::clone(&storage) as Arc<dyn DraftStorage>,
        WizardSettings::new("vendor-7"),
        &api,
        "prod-42",
    )
    .await
    .unwrap();
    assert_eq!(wizard.draft_key().to_string(), "vendor-7:prod-42");
    assert_eq!(wizard.form().name, "Amla juice");

    wizard.update(|f| f.stock = Some(5)).unwrap();
    wizard.next().unwrap();
    wizard.next().unwrap();
    wizard.next().unwrap();
    let entity = wizard.submit(&api, &FakeLookup::default()).await.unwrap();

    assert_eq!(entity.id, "prod-42");
    assert!(matches!(
        api.calls().as_slice(),
        [Call::Update { id, record }] if id == "prod-42" && record.stock == 5
    ));
}

#[tokio::test(start_paused = true)]
async fn missing_entity_cannot_be_opened() {
    let storage = Arc::new(MemoryStorage::new());
    let err = StepController::open_remote(
        StepPlan::catalog(),
        storage as Arc<dyn DraftStorage>,
        WizardSettings::new("vendor-7"),
        &FakeApi::default(),
        "ghost",
    )
    .await
    .unwrap_err();
    assert!(matches!(err, WizardError::Api(ref e) if e.status == 404));
}
