//! Submit-time creation of custom taxonomy terms.

use std::sync::Mutex;

use pretty_assertions::assert_eq;
use shelf_core::{FormState, MasterEntry, TaxonomyKind, TaxonomyTerm};
use shelf_taxonomy::{TaxonomyError, TaxonomyLookup, finalize, finalize_form};

/// Records every create call; fails creates for `refuse`.
#[derive(Default)]
struct RecordingLookup {
    refuse: Option<TaxonomyKind>,
    created: Mutex<Vec<(TaxonomyKind, String, Option<String>)>>,
}

impl RecordingLookup {
    fn created(&self) -> Vec<(TaxonomyKind, String, Option<String>)> {
        self.created.lock().unwrap().clone()
    }
}

impl TaxonomyLookup for RecordingLookup {
    async fn list(&self, _kind: TaxonomyKind) -> Result<Vec<MasterEntry>, TaxonomyError> {
        Ok(Vec::new())
    }

    async fn create(
        &self,
        kind: TaxonomyKind,
        name: &str,
        parent: Option<&str>,
    ) -> Result<MasterEntry, TaxonomyError> {
        if self.refuse == Some(kind) {
            return Err(TaxonomyError::Api {
                status: 409,
                message: "duplicate".into(),
            });
        }
        let mut created = self.created.lock().unwrap();
        created.push((kind, name.to_string(), parent.map(str::to_string)));
        let id = format!("{}-{}", kind.as_str(), created.len());
        Ok(MasterEntry::new(id, name))
    }
}

fn form_with_custom_terms() -> FormState {
    FormState {
        name: "Millet cookies".into(),
        category: Some(TaxonomyTerm::pending("Healthy Snacks")),
        subcategory: Some(TaxonomyTerm::pending("Cookies")),
        brand: Some(TaxonomyTerm::resolved("b-1", "Nature's Own")),
        unit: Some(TaxonomyTerm::pending("Jar")),
        ..FormState::default()
    }
}

#[tokio::test]
async fn resolved_term_passes_through_without_calls() {
    let lookup = RecordingLookup::default();
    let term = TaxonomyTerm::resolved("c1", "Grocery");
    let out = finalize(&term, TaxonomyKind::Category, None, &lookup)
        .await
        .unwrap();
    assert_eq!(out, term);
    assert!(lookup.created().is_empty());
}

#[tokio::test]
async fn pending_terms_are_created_in_dependency_order() {
    let lookup = RecordingLookup::default();
    let mut form = form_with_custom_terms();

    let created = finalize_form(&mut form, &lookup).await.unwrap();

    assert_eq!(created, 3);
    assert_eq!(
        lookup.created(),
        vec![
            (TaxonomyKind::Category, "Healthy Snacks".to_string(), None),
            (
                TaxonomyKind::Subcategory,
                "Cookies".to_string(),
                Some("category-1".to_string())
            ),
            (TaxonomyKind::Unit, "Jar".to_string(), None),
        ]
    );
    assert_eq!(form.pending_terms().count(), 0);
    assert_eq!(
        form.category,
        Some(TaxonomyTerm::resolved("category-1", "Healthy Snacks"))
    );
    assert_eq!(form.brand, Some(TaxonomyTerm::resolved("b-1", "Nature's Own")));
}

#[tokio::test]
async fn partial_failure_keeps_created_ids_for_retry() {
    let failing = RecordingLookup {
        refuse: Some(TaxonomyKind::Unit),
        ..RecordingLookup::default()
    };
    let mut form = form_with_custom_terms();

    let err = finalize_form(&mut form, &failing).await.unwrap_err();
    assert!(matches!(err, TaxonomyError::Api { status: 409, .. }));
    assert_eq!(failing.created().len(), 2);
    assert!(!form.category.as_ref().unwrap().is_custom_pending());
    assert!(form.unit.as_ref().unwrap().is_custom_pending());

    // Retry against a healthy service only creates what is still pending.
    let healthy = RecordingLookup::default();
    let created = finalize_form(&mut form, &healthy).await.unwrap();
    assert_eq!(created, 1);
    assert_eq!(healthy.created()[0].0, TaxonomyKind::Unit);
}
