//! Match free-text terms in a form against the live master lists.

use shelf_core::{FormState, TaxonomyKind, TaxonomyTerm};

use crate::error::TaxonomyError;
use crate::finalize::FINALIZE_ORDER;
use crate::lookup::TaxonomyLookup;
use crate::resolve::{TaxonomyFilter, candidates, resolve};

/// Resolve every pending term of `form` that names an existing entry.
///
/// Categories are matched within `allowed_categories` (empty means all);
/// subcategories and brands only under the form's resolved category. Names
/// with no match stay pending. Nothing is created. Returns how many terms
/// were resolved.
///
/// # Errors
///
/// Returns the first [`TaxonomyError`] from listing a master list.
pub async fn reconcile_form<L: TaxonomyLookup>(
    form: &mut FormState,
    lookup: &L,
    allowed_categories: &[String],
) -> Result<usize, TaxonomyError> {
    let mut resolved = 0;
    for kind in FINALIZE_ORDER {
        let Some(name) = form
            .term(kind)
            .filter(|t| t.is_custom_pending())
            .map(|t| t.name().to_string())
        else {
            continue;
        };

        let filter = match kind {
            TaxonomyKind::Category => TaxonomyFilter::allowing(allowed_categories.iter().cloned()),
            TaxonomyKind::Subcategory | TaxonomyKind::Brand => {
                match form.category.as_ref().and_then(TaxonomyTerm::resolved_id) {
                    Some(parent) => TaxonomyFilter::under(parent),
                    None => continue,
                }
            }
            TaxonomyKind::Unit => TaxonomyFilter::default(),
        };

        let master = lookup.list(kind).await?;
        let offered = candidates(&master, &filter);
        if let Some(term @ TaxonomyTerm::Resolved { .. }) = resolve(&name, &offered) {
            tracing::debug!(%kind, %name, id = ?term.resolved_id(), "matched existing term");
            *form.term_mut(kind) = Some(term);
            resolved += 1;
        }
    }
    Ok(resolved)
}
