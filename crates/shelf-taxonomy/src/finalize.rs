//! Turning pending custom terms into real master entries at submit time.

use shelf_core::{FormState, TaxonomyKind, TaxonomyTerm};

use crate::error::TaxonomyError;
use crate::lookup::TaxonomyLookup;

/// Creation order: children need their category's id.
pub const FINALIZE_ORDER: [TaxonomyKind; 4] = [
    TaxonomyKind::Category,
    TaxonomyKind::Subcategory,
    TaxonomyKind::Brand,
    TaxonomyKind::Unit,
];

/// Resolved terms pass through; a pending term is created via `lookup`.
///
/// # Errors
///
/// Propagates the lookup's [`TaxonomyError`].
pub async fn finalize<L: TaxonomyLookup>(
    term: &TaxonomyTerm,
    kind: TaxonomyKind,
    parent: Option<&str>,
    lookup: &L,
) -> Result<TaxonomyTerm, TaxonomyError> {
    match term {
        TaxonomyTerm::Resolved { .. } => Ok(term.clone()),
        TaxonomyTerm::Pending { name } => {
            let entry = lookup.create(kind, name, parent).await?;
            tracing::info!(%kind, name = %entry.name, id = %entry.id, "created custom term");
            Ok(TaxonomyTerm::from(&entry))
        }
    }
}

/// Finalize every pending term of `form` in [`FINALIZE_ORDER`].
///
/// Each created term is written back into `form` before the next one is
/// attempted, so a failure partway leaves the earlier ids in place and a
/// retry does not create them twice. Returns how many terms were created.
///
/// # Errors
///
/// Returns the first [`TaxonomyError`] from the lookup.
pub async fn finalize_form<L: TaxonomyLookup>(
    form: &mut FormState,
    lookup: &L,
) -> Result<usize, TaxonomyError> {
    let mut created = 0;
    for kind in FINALIZE_ORDER {
        let Some(term) = form.term(kind).filter(|t| t.is_custom_pending()).cloned() else {
            continue;
        };
        let parent = if kind.has_parent() {
            form.category
                .as_ref()
                .and_then(TaxonomyTerm::resolved_id)
                .map(str::to_string)
        } else {
            None
        };
        let resolved = finalize(&term, kind, parent.as_deref(), lookup).await?;
        *form.term_mut(kind) = Some(resolved);
        created += 1;
    }
    Ok(created)
}
