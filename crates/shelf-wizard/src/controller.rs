//! The wizard state machine.
//!
//! ```text
//! Step(1) ─next✓─► Step(2) ─next✓─► … ─► Step(N) ─submit─► Submitting ─ok─► Done
//!    ▲               │  ▲                       ▲              │
//!    └──────back─────┘  └─── next✗ stays put    └───── err ────┘
//! ```
//!
//! The controller owns the only live `FormState`. Edits schedule a debounced
//! draft write; step changes write immediately; a successful submit clears
//! the draft. A submit future dropped mid-flight leaves the controller in
//! `Submitting`, from which navigation and a fresh submit are still allowed.

use std::collections::BTreeMap;
use std::sync::Arc;

use shelf_core::{
    AssetUploadResult, CatalogEntity, CatalogRecord, DraftRecord, FieldKey, FormState, StepId,
    StepPlan,
};
use shelf_draft::{DraftKey, DraftStorage, DraftStore};
use shelf_media::{AssetUploader, BatchReport, MediaUploadPipeline, SourceFile, UploadScope};
use shelf_taxonomy::TaxonomyLookup;

use crate::api::CatalogApi;
use crate::error::WizardError;
use crate::settings::WizardSettings;
use crate::validation::ValidationGate;

/// Where the wizard is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    Step(StepId),
    Submitting,
    Done,
}

/// Drives one catalog entry from first step to saved entity.
#[derive(Debug)]
pub struct StepController {
    plan: StepPlan,
    settings: WizardSettings,
    state: WizardState,
    form: FormState,
    errors: BTreeMap<FieldKey, String>,
    entity_id: Option<String>,
    drafts: DraftStore,
    offered: Option<DraftRecord>,
    /// Set by any form edit; cleared by every immediate write.
    edited: bool,
}

impl StepController {
    /// Start a wizard for a new entity.
    #[must_use]
    pub fn open(plan: StepPlan, storage: Arc<dyn DraftStorage>, settings: WizardSettings) -> Self {
        let key = DraftKey::new_entity(settings.scope.clone());
        Self::start(plan, storage, settings, key, FormState::default(), None)
    }

    /// Start a wizard that edits `entity`.
    #[must_use]
    pub fn open_existing(
        plan: StepPlan,
        storage: Arc<dyn DraftStorage>,
        settings: WizardSettings,
        entity: &CatalogEntity,
    ) -> Self {
        let key = DraftKey::existing(settings.scope.clone(), entity.id.clone());
        Self::start(
            plan,
            storage,
            settings,
            key,
            entity.to_form(),
            Some(entity.id.clone()),
        )
    }

    /// Fetch entity `id` and start a wizard that edits it.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::Api`] if the entity cannot be fetched.
    pub async fn open_remote<A: CatalogApi>(
        plan: StepPlan,
        storage: Arc<dyn DraftStorage>,
        settings: WizardSettings,
        api: &A,
        id: &str,
    ) -> Result<Self, WizardError> {
        let entity = api.fetch(id).await?;
        Ok(Self::open_existing(plan, storage, settings, &entity))
    }

    fn start(
        plan: StepPlan,
        storage: Arc<dyn DraftStorage>,
        settings: WizardSettings,
        key: DraftKey,
        form: FormState,
        entity_id: Option<String>,
    ) -> Self {
        let drafts = DraftStore::new(storage, key)
            .with_debounce(settings.debounce)
            .with_ttl(settings.ttl);
        let offered = drafts.read().filter(DraftRecord::is_restorable);
        if let Some(record) = &offered {
            tracing::debug!(key = %drafts.key(), saved_at = %record.saved_at, "draft available");
        }
        Self {
            plan,
            settings,
            state: WizardState::Step(StepId::FIRST),
            form,
            errors: BTreeMap::new(),
            entity_id,
            drafts,
            offered,
            edited: false,
        }
    }

    // ── Accessors ──────────────────────────────────────────────────

    #[must_use]
    pub const fn state(&self) -> WizardState {
        self.state
    }

    /// The step on screen; `None` once done.
    #[must_use]
    pub fn current_step(&self) -> Option<StepId> {
        self.active_step().ok()
    }

    #[must_use]
    pub const fn form(&self) -> &FormState {
        &self.form
    }

    #[must_use]
    pub const fn plan(&self) -> &StepPlan {
        &self.plan
    }

    #[must_use]
    pub const fn field_errors(&self) -> &BTreeMap<FieldKey, String> {
        &self.errors
    }

    #[must_use]
    pub fn field_error(&self, field: FieldKey) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Id of the entity being edited, or of the one just created.
    #[must_use]
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    #[must_use]
    pub const fn draft_key(&self) -> &DraftKey {
        self.drafts.key()
    }

    /// A saved draft found at open time that the user may restore.
    #[must_use]
    pub const fn available_draft(&self) -> Option<&DraftRecord> {
        self.offered.as_ref()
    }

    // ── Draft recovery ─────────────────────────────────────────────

    /// Replace the form with the offered draft. The position stays where it
    /// is. Returns `false` if there was nothing to restore.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::Finished`] after a successful submit.
    pub fn restore_draft(&mut self) -> Result<bool, WizardError> {
        self.active_step()?;
        let Some(record) = self.offered.take() else {
            return Ok(false);
        };
        tracing::info!(key = %self.drafts.key(), saved_step = %record.step, "draft restored");
        self.form = record.data;
        self.errors.clear();
        self.edited = true;
        Ok(true)
    }

    /// Drop the offered draft and delete it from storage.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::Finished`] after a successful submit.
    pub fn discard_draft(&mut self) -> Result<(), WizardError> {
        self.active_step()?;
        self.offered = None;
        self.drafts.clear();
        Ok(())
    }

    // ── Editing ────────────────────────────────────────────────────

    /// Apply an edit and schedule a debounced draft write.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::Finished`] after a successful submit.
    pub fn update<F>(&mut self, edit: F) -> Result<(), WizardError>
    where
        F: FnOnce(&mut FormState),
    {
        let step = self.active_step()?;
        edit(&mut self.form);
        self.edited = true;
        self.drafts.schedule(&self.form, step);
        Ok(())
    }

    /// Upload `files` straight into the asset list.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::Finished`] after a successful submit. Upload
    /// failures are never errors; see [`BatchReport`].
    pub async fn attach_files<U: AssetUploader>(
        &mut self,
        pipeline: &MediaUploadPipeline<U>,
        files: Vec<SourceFile>,
    ) -> Result<BatchReport, WizardError> {
        let step = self.active_step()?;
        let scope = UploadScope::new(
            self.settings.scope.clone(),
            self.settings.asset_category.clone(),
        );
        // Results land in the form as each file resolves.
        self.edited = true;
        let report = pipeline
            .upload_batch(&mut self.form.assets, files, &scope)
            .await;
        if !self.form.assets.is_empty() {
            self.errors.remove(&FieldKey::Assets);
        }
        self.drafts.schedule(&self.form, step);
        Ok(report)
    }

    /// Remove one asset by position. No network call is made.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::Finished`] after a successful submit.
    pub fn remove_asset(&mut self, index: usize) -> Result<Option<AssetUploadResult>, WizardError> {
        let step = self.active_step()?;
        let removed = self.form.remove_asset(index);
        if removed.is_some() {
            self.edited = true;
            self.drafts.schedule(&self.form, step);
        }
        Ok(removed)
    }

    // ── Navigation ─────────────────────────────────────────────────

    /// Validate the current step and move forward.
    ///
    /// On failure the position is unchanged and only this step's field
    /// errors are replaced.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::Validation`] when the gate rejects the step
    /// and [`WizardError::Finished`] after a successful submit.
    pub fn next(&mut self) -> Result<StepId, WizardError> {
        let step = self.active_step()?;
        for field in self.step_fields(step) {
            self.errors.remove(&field);
        }

        if let Err(errors) = self.gate().check(step, &self.form) {
            tracing::debug!(%step, errors = %errors, "step gate rejected");
            self.errors
                .extend(errors.iter().map(|(field, msg)| (field, msg.to_string())));
            return Err(WizardError::Validation { step, errors });
        }

        let next = self.plan.next_after(step);
        self.state = WizardState::Step(next);
        self.save_now(next);
        Ok(next)
    }

    /// Move back one step without validating.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::Finished`] after a successful submit.
    pub fn back(&mut self) -> Result<StepId, WizardError> {
        let step = self.active_step()?;
        let previous = self.plan.before(step);
        self.state = WizardState::Step(previous);
        self.save_now(previous);
        Ok(previous)
    }

    // ── Submit / exit ──────────────────────────────────────────────

    /// Validate everything, create pending taxonomy terms and persist.
    ///
    /// Success clears the draft and finishes the wizard. Any failure returns
    /// to the last step with the draft kept, so the call can be retried.
    /// Terms created before a failure stay resolved in the form.
    ///
    /// # Errors
    ///
    /// [`WizardError::NotAtFinalStep`], [`WizardError::Finished`],
    /// [`WizardError::Validation`], [`WizardError::Taxonomy`],
    /// [`WizardError::Record`] or [`WizardError::Api`].
    pub async fn submit<A, L>(&mut self, api: &A, lookup: &L) -> Result<CatalogEntity, WizardError>
    where
        A: CatalogApi,
        L: TaxonomyLookup,
    {
        let last = self.plan.last();
        match self.state {
            WizardState::Done => return Err(WizardError::Finished),
            WizardState::Step(current) if current != last => {
                return Err(WizardError::NotAtFinalStep { current });
            }
            WizardState::Step(_) | WizardState::Submitting => {}
        }

        self.state = WizardState::Submitting;
        // Finalization writes created term ids into the form.
        self.edited = true;
        match self.persist(api, lookup).await {
            Ok(entity) => {
                tracing::info!(id = %entity.id, key = %self.drafts.key(), "catalog entry saved");
                self.drafts.clear();
                self.offered = None;
                self.entity_id = Some(entity.id.clone());
                self.state = WizardState::Done;
                Ok(entity)
            }
            Err(error) => {
                tracing::warn!(%error, "submit failed; draft kept");
                self.state = WizardState::Step(last);
                self.save_now(last);
                Err(error)
            }
        }
    }

    async fn persist<A, L>(&mut self, api: &A, lookup: &L) -> Result<CatalogEntity, WizardError>
    where
        A: CatalogApi,
        L: TaxonomyLookup,
    {
        if let Err((step, errors)) = self.gate().check_all(&self.form) {
            self.errors = errors.clone().into_inner();
            return Err(WizardError::Validation { step, errors });
        }
        self.errors.clear();

        shelf_taxonomy::finalize_form(&mut self.form, lookup).await?;
        let record = CatalogRecord::from_form(&self.form, &self.settings.scope)?;

        let entity = match &self.entity_id {
            Some(id) => api.update(id, &record).await?,
            None => api.create(&self.settings.scope, &record).await?,
        };
        Ok(entity)
    }

    /// Write the draft now and hand back its key.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::Finished`] after a successful submit.
    pub fn save_and_exit(&mut self) -> Result<DraftKey, WizardError> {
        let step = self.active_step()?;
        self.save_now(step);
        tracing::debug!(key = %self.drafts.key(), %step, "draft saved on exit");
        Ok(self.drafts.key().clone())
    }

    /// Close the wizard, writing the current form if it was edited.
    ///
    /// This also covers results an abandoned [`Self::attach_files`] already
    /// put into the form. Returns whether a draft was written.
    pub fn teardown(mut self) -> bool {
        self.write_on_close()
    }

    // ── Internals ──────────────────────────────────────────────────

    fn active_step(&self) -> Result<StepId, WizardError> {
        match self.state {
            WizardState::Step(step) => Ok(step),
            WizardState::Submitting => Ok(self.plan.last()),
            WizardState::Done => Err(WizardError::Finished),
        }
    }

    /// Fields whose errors `step` owns.
    fn step_fields(&self, step: StepId) -> Vec<FieldKey> {
        let Some(definition) = self.plan.get(step) else {
            return Vec::new();
        };
        let mut fields: Vec<FieldKey> = definition.required_fields.iter().copied().collect();
        if definition.required_fields.contains(&FieldKey::SellingPrice) {
            fields.push(FieldKey::Mrp);
        }
        if step == self.plan.last() {
            fields.push(FieldKey::Assets);
        }
        fields
    }

    fn gate(&self) -> ValidationGate<'_> {
        ValidationGate::new(&self.plan).with_max_assets(self.settings.max_slots)
    }

    /// Write the form unless the wizard finished or nothing was edited.
    fn write_on_close(&mut self) -> bool {
        let Ok(step) = self.active_step() else {
            return false;
        };
        if !self.edited {
            return false;
        }
        self.save_now(step);
        true
    }

    fn save_now(&mut self, step: StepId) {
        self.drafts.write(&self.form, step);
        self.edited = false;
    }
}

impl Drop for StepController {
    fn drop(&mut self) {
        self.write_on_close();
    }
}
