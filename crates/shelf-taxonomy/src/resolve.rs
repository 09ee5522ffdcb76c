//! Pure matching of user selections against master lists.

use std::collections::HashSet;

use shelf_core::{MasterEntry, TaxonomyTerm};

/// Narrowing applied to a master list before it is offered to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxonomyFilter {
    /// Ids the tenant may use. `None` offers the full list.
    pub allowed: Option<HashSet<String>>,
    /// Keep only entries under this parent (subcategories and brands).
    pub parent: Option<String>,
}

impl TaxonomyFilter {
    /// Restrict to `ids`; an empty list means no restriction.
    #[must_use]
    pub fn allowing<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let allowed: HashSet<String> = ids.into_iter().map(Into::into).collect();
        Self {
            allowed: (!allowed.is_empty()).then_some(allowed),
            parent: None,
        }
    }

    #[must_use]
    pub fn under(parent: impl Into<String>) -> Self {
        Self {
            allowed: None,
            parent: Some(parent.into()),
        }
    }

    fn admits(&self, entry: &MasterEntry) -> bool {
        let allowed = self
            .allowed
            .as_ref()
            .is_none_or(|ids| ids.contains(&entry.id));
        let parent = self
            .parent
            .as_deref()
            .is_none_or(|p| entry.parent_id.as_deref() == Some(p));
        allowed && parent
    }
}

/// Entries of `master` admitted by `filter`, in master-list order.
#[must_use]
pub fn candidates(master: &[MasterEntry], filter: &TaxonomyFilter) -> Vec<MasterEntry> {
    master.iter().filter(|e| filter.admits(e)).cloned().collect()
}

/// Turn a typed or picked name into a term.
///
/// Matching is trimmed and case-insensitive. A name absent from `candidates`
/// becomes a pending custom term; a blank selection yields `None`.
#[must_use]
pub fn resolve(selection: &str, candidates: &[MasterEntry]) -> Option<TaxonomyTerm> {
    let wanted = selection.trim();
    if wanted.is_empty() {
        return None;
    }
    let needle = wanted.to_lowercase();
    let found = candidates
        .iter()
        .find(|e| e.name.trim().to_lowercase() == needle);
    Some(found.map_or_else(|| TaxonomyTerm::pending(wanted), TaxonomyTerm::from))
}

/// Resolve a dropdown pick by id.
#[must_use]
pub fn select_id(id: &str, candidates: &[MasterEntry]) -> Option<TaxonomyTerm> {
    candidates.iter().find(|e| e.id == id).map(TaxonomyTerm::from)
}
