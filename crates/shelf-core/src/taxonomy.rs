//! Taxonomy kinds, master-list entries and the terms a form holds.
//!
//! A term is either a known master-list entry (`Resolved`) or a free-text
//! value the user typed that does not exist yet (`Pending`). Pending terms are
//! created by an external service at submit time and only then carry an id.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// TaxonomyKind
// ---------------------------------------------------------------------------

/// The four master lists a catalog item is classified against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaxonomyKind {
    Category,
    Subcategory,
    Brand,
    Unit,
}

impl TaxonomyKind {
    /// Return the lowercase identifier used in logs and payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Subcategory => "subcategory",
            Self::Brand => "brand",
            Self::Unit => "unit",
        }
    }

    /// Whether entries of this kind hang off a parent category.
    #[must_use]
    pub const fn has_parent(self) -> bool {
        matches!(self, Self::Subcategory | Self::Brand)
    }
}

impl fmt::Display for TaxonomyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// MasterEntry
// ---------------------------------------------------------------------------

/// One row of a master list as returned by the taxonomy lookup service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterEntry {
    pub id: String,
    pub name: String,
    /// Owning category for subcategories and brands.
    #[serde(default, alias = "categoryId")]
    pub parent_id: Option<String>,
}

impl MasterEntry {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_id: None,
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }
}

// ---------------------------------------------------------------------------
// TaxonomyTerm
// ---------------------------------------------------------------------------

/// A taxonomy selection held in the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TaxonomyTerm {
    /// Matches a master-list entry.
    Resolved { id: String, name: String },
    /// Ad-hoc value absent from the offered master list; created on submit.
    Pending { name: String },
}

impl TaxonomyTerm {
    #[must_use]
    pub fn resolved(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Resolved {
            id: id.into(),
            name: name.into(),
        }
    }

    #[must_use]
    pub fn pending(name: impl Into<String>) -> Self {
        Self::Pending { name: name.into() }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Resolved { name, .. } | Self::Pending { name } => name,
        }
    }

    /// The master-list id, only ever present for resolved terms.
    #[must_use]
    pub fn resolved_id(&self) -> Option<&str> {
        match self {
            Self::Resolved { id, .. } => Some(id),
            Self::Pending { .. } => None,
        }
    }

    #[must_use]
    pub const fn is_custom_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}

impl From<&MasterEntry> for TaxonomyTerm {
    fn from(entry: &MasterEntry) -> Self {
        Self::resolved(entry.id.clone(), entry.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pending_term_has_no_id() {
        let term = TaxonomyTerm::pending("Handmade Soap");
        assert!(term.is_custom_pending());
        assert_eq!(term.resolved_id(), None);
        assert_eq!(term.name(), "Handmade Soap");
    }

    #[test]
    fn resolved_term_exposes_id() {
        let term = TaxonomyTerm::resolved("cat-1", "Grocery");
        assert!(!term.is_custom_pending());
        assert_eq!(term.resolved_id(), Some("cat-1"));
    }

    #[test]
    fn term_serializes_with_state_tag() {
        let json = serde_json::to_value(TaxonomyTerm::pending("Box")).unwrap();
        assert_eq!(json, serde_json::json!({ "state": "pending", "name": "Box" }));
    }

    #[test]
    fn master_entry_accepts_category_id_alias() {
        let entry: MasterEntry =
            serde_json::from_str(r#"{"id":"s1","name":"Soaps","categoryId":"c1"}"#).unwrap();
        assert_eq!(entry.parent_id.as_deref(), Some("c1"));
    }

    #[test]
    fn only_subcategory_and_brand_have_parents() {
        assert!(TaxonomyKind::Subcategory.has_parent());
        assert!(TaxonomyKind::Brand.has_parent());
        assert!(!TaxonomyKind::Category.has_parent());
        assert!(!TaxonomyKind::Unit.has_parent());
    }
}
