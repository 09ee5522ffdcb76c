//! Scripted collaborators shared by the wizard integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use shelf_core::{CatalogEntity, CatalogRecord, FormState, MasterEntry, TaxonomyKind, TaxonomyTerm};
use shelf_media::{AssetUploader, SourceFile, UploadError, UploadScope, UploadedAsset};
use shelf_taxonomy::{TaxonomyError, TaxonomyLookup};
use shelf_wizard::{ApiError, CatalogApi};

// ── Catalog API ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create { scope: String, record: CatalogRecord },
    Update { id: String, record: CatalogRecord },
}

/// Fails the first `failures` writes with a 503, then succeeds.
#[derive(Default)]
pub struct FakeApi {
    pub failures: AtomicUsize,
    pub hang: bool,
    pub calls: Mutex<Vec<Call>>,
    pub stored: Mutex<Option<CatalogEntity>>,
}

impl FakeApi {
    pub fn failing(times: usize) -> Self {
        Self {
            failures: AtomicUsize::new(times),
            ..Self::default()
        }
    }

    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::default()
        }
    }

    pub fn with_entity(entity: CatalogEntity) -> Self {
        Self {
            stored: Mutex::new(Some(entity)),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    async fn respond(&self, call: Call, id: String, record: CatalogRecord) -> Result<CatalogEntity, ApiError> {
        if self.hang {
            std::future::pending::<()>().await;
        }
        self.calls.lock().unwrap().push(call);
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(ApiError::new(503, "catalog service unavailable"));
        }
        Ok(CatalogEntity { id, record })
    }
}

impl CatalogApi for FakeApi {
    async fn create(&self, scope: &str, record: &CatalogRecord) -> Result<CatalogEntity, ApiError> {
        let call = Call::Create {
            scope: scope.to_string(),
            record: record.clone(),
        };
        self.respond(call, "prod-new".into(), record.clone()).await
    }

    async fn update(&self, id: &str, record: &CatalogRecord) -> Result<CatalogEntity, ApiError> {
        let call = Call::Update {
            id: id.to_string(),
            record: record.clone(),
        };
        self.respond(call, id.to_string(), record.clone()).await
    }

    async fn fetch(&self, id: &str) -> Result<CatalogEntity, ApiError> {
        self.stored
            .lock()
            .unwrap()
            .clone()
            .filter(|e| e.id == id)
            .ok_or_else(|| ApiError::new(404, "not found"))
    }
}

// ── Taxonomy ───────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeLookup {
    pub created: Mutex<Vec<(TaxonomyKind, String)>>,
}

impl FakeLookup {
    pub fn created(&self) -> Vec<(TaxonomyKind, String)> {
        self.created.lock().unwrap().clone()
    }
}

impl TaxonomyLookup for FakeLookup {
    async fn list(&self, _kind: TaxonomyKind) -> Result<Vec<MasterEntry>, TaxonomyError> {
        Ok(Vec::new())
    }

    async fn create(
        &self,
        kind: TaxonomyKind,
        name: &str,
        _parent: Option<&str>,
    ) -> Result<MasterEntry, TaxonomyError> {
        let mut created = self.created.lock().unwrap();
        created.push((kind, name.to_string()));
        Ok(MasterEntry::new(format!("custom-{}", created.len()), name))
    }
}

// ── Uploads ────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeUploader {
    pub failing: HashSet<String>,
    pub hanging: HashSet<String>,
}

impl FakeUploader {
    pub fn failing(names: &[&str]) -> Self {
        Self {
            failing: names.iter().map(|n| (*n).to_string()).collect(),
            ..Self::default()
        }
    }

    /// Never answers for `names`.
    pub fn hanging(names: &[&str]) -> Self {
        Self {
            hanging: names.iter().map(|n| (*n).to_string()).collect(),
            ..Self::default()
        }
    }
}

impl AssetUploader for FakeUploader {
    async fn upload(&self, file: &SourceFile, scope: &UploadScope) -> Result<UploadedAsset, UploadError> {
        if self.hanging.contains(&file.name) {
            std::future::pending::<()>().await;
        }
        if self.failing.contains(&file.name) {
            return Err(UploadError::Malformed("no url in response".into()));
        }
        Ok(UploadedAsset {
            url: format!("https://cdn.test/{}", file.name),
            key: Some(format!("{}/{}", scope.category, file.name)),
        })
    }
}

pub fn image(name: &str) -> SourceFile {
    SourceFile::new(name, "image/png", vec![0x89, 0x50, 0x4e, 0x47])
}

// ── Forms ──────────────────────────────────────────────────────────

pub fn fill_basic(form: &mut FormState) {
    form.name = "Amla juice".into();
    form.category = Some(TaxonomyTerm::resolved("c-grocery", "Grocery"));
    form.unit = Some(TaxonomyTerm::resolved("u-bottle", "bottle"));
}

pub fn fill_description(form: &mut FormState) {
    form.description = "Cold pressed, no added sugar".into();
    form.add_specification("500 ml");
}

pub fn fill_pricing(form: &mut FormState) {
    form.selling_price = Some(180.0);
    form.mrp = Some(220.0);
    form.stock = Some(30);
}
