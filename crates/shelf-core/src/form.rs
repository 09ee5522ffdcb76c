//! The canonical wizard form snapshot.
//!
//! `FormState` is owned by the step controller. Every other component reads or
//! writes it through a borrow for the duration of one call; draft records hold
//! point-in-time clones that are never authoritative once the wizard is live.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::asset::AssetUploadResult;
use crate::taxonomy::{TaxonomyKind, TaxonomyTerm};

// ---------------------------------------------------------------------------
// FieldKey
// ---------------------------------------------------------------------------

/// Fields a step can declare as required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    Name,
    Category,
    Subcategory,
    Brand,
    Unit,
    Description,
    SellingPrice,
    Mrp,
    Stock,
    Assets,
}

impl FieldKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Category => "category",
            Self::Subcategory => "subcategory",
            Self::Brand => "brand",
            Self::Unit => "unit",
            Self::Description => "description",
            Self::SellingPrice => "selling_price",
            Self::Mrp => "mrp",
            Self::Stock => "stock",
            Self::Assets => "assets",
        }
    }

    /// Human label used in validation messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Product name",
            Self::Category => "Category",
            Self::Subcategory => "Subcategory",
            Self::Brand => "Brand",
            Self::Unit => "Unit",
            Self::Description => "Description",
            Self::SellingPrice => "Selling price",
            Self::Mrp => "MRP",
            Self::Stock => "Stock",
            Self::Assets => "Images",
        }
    }

    /// The taxonomy list backing this field, if any.
    #[must_use]
    pub const fn taxonomy_kind(self) -> Option<TaxonomyKind> {
        match self {
            Self::Category => Some(TaxonomyKind::Category),
            Self::Subcategory => Some(TaxonomyKind::Subcategory),
            Self::Brand => Some(TaxonomyKind::Brand),
            Self::Unit => Some(TaxonomyKind::Unit),
            _ => None,
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Variants
// ---------------------------------------------------------------------------

/// Variant dimensions a product can list options for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantKind {
    Size,
    Color,
    Material,
    Style,
    PackSize,
}

/// Variant option lists, each kept free of blanks and duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Variants {
    #[serde(default)]
    pub size: Vec<String>,
    #[serde(default)]
    pub color: Vec<String>,
    #[serde(default)]
    pub material: Vec<String>,
    #[serde(default)]
    pub style: Vec<String>,
    #[serde(default)]
    pub pack_size: Vec<String>,
}

impl Variants {
    #[must_use]
    pub fn values(&self, kind: VariantKind) -> &[String] {
        match kind {
            VariantKind::Size => &self.size,
            VariantKind::Color => &self.color,
            VariantKind::Material => &self.material,
            VariantKind::Style => &self.style,
            VariantKind::PackSize => &self.pack_size,
        }
    }

    fn values_mut(&mut self, kind: VariantKind) -> &mut Vec<String> {
        match kind {
            VariantKind::Size => &mut self.size,
            VariantKind::Color => &mut self.color,
            VariantKind::Material => &mut self.material,
            VariantKind::Style => &mut self.style,
            VariantKind::PackSize => &mut self.pack_size,
        }
    }

    /// Add a trimmed option. Returns `false` for blanks and duplicates.
    pub fn add(&mut self, kind: VariantKind, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }
        let values = self.values_mut(kind);
        if values.iter().any(|v| v == value) {
            return false;
        }
        values.push(value.to_string());
        true
    }

    pub fn remove(&mut self, kind: VariantKind, value: &str) -> bool {
        let values = self.values_mut(kind);
        let before = values.len();
        values.retain(|v| v != value);
        values.len() != before
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
            && self.color.is_empty()
            && self.material.is_empty()
            && self.style.is_empty()
            && self.pack_size.is_empty()
    }
}

// ---------------------------------------------------------------------------
// FormState
// ---------------------------------------------------------------------------

const fn default_true() -> bool {
    true
}

/// Every field the wizard collects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormState {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: Option<TaxonomyTerm>,
    #[serde(default)]
    pub subcategory: Option<TaxonomyTerm>,
    #[serde(default)]
    pub brand: Option<TaxonomyTerm>,
    #[serde(default)]
    pub unit: Option<TaxonomyTerm>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub specifications: Vec<String>,
    #[serde(default)]
    pub variants: Variants,
    #[serde(default)]
    pub mrp: Option<f64>,
    #[serde(default)]
    pub selling_price: Option<f64>,
    #[serde(default)]
    pub stock: Option<u32>,
    /// Ordered media; index 0 is the primary/display image.
    #[serde(default)]
    pub assets: Vec<AssetUploadResult>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub requires_prescription: bool,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            name: String::new(),
            category: None,
            subcategory: None,
            brand: None,
            unit: None,
            description: String::new(),
            specifications: Vec::new(),
            variants: Variants::default(),
            mrp: None,
            selling_price: None,
            stock: None,
            assets: Vec::new(),
            is_active: true,
            requires_prescription: false,
        }
    }
}

impl FormState {
    /// True when nothing user-entered is present; blank drafts are not offered.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
            && self.category.is_none()
            && self.subcategory.is_none()
            && self.brand.is_none()
            && self.unit.is_none()
            && self.description.trim().is_empty()
            && self.specifications.is_empty()
            && self.variants.is_empty()
            && self.mrp.is_none()
            && self.selling_price.is_none()
            && self.stock.is_none()
            && self.assets.is_empty()
    }

    #[must_use]
    pub fn term(&self, kind: TaxonomyKind) -> Option<&TaxonomyTerm> {
        match kind {
            TaxonomyKind::Category => self.category.as_ref(),
            TaxonomyKind::Subcategory => self.subcategory.as_ref(),
            TaxonomyKind::Brand => self.brand.as_ref(),
            TaxonomyKind::Unit => self.unit.as_ref(),
        }
    }

    pub fn term_mut(&mut self, kind: TaxonomyKind) -> &mut Option<TaxonomyTerm> {
        match kind {
            TaxonomyKind::Category => &mut self.category,
            TaxonomyKind::Subcategory => &mut self.subcategory,
            TaxonomyKind::Brand => &mut self.brand,
            TaxonomyKind::Unit => &mut self.unit,
        }
    }

    /// Change the category. Subcategory and brand depend on it and are reset
    /// when the category actually changes.
    pub fn set_category(&mut self, term: Option<TaxonomyTerm>) {
        if self.category != term {
            self.subcategory = None;
            self.brand = None;
        }
        self.category = term;
    }

    /// Append a trimmed specification line. Blank input is ignored.
    pub fn add_specification(&mut self, line: &str) -> bool {
        let line = line.trim();
        if line.is_empty() {
            return false;
        }
        self.specifications.push(line.to_string());
        true
    }

    pub fn remove_specification(&mut self, index: usize) -> Option<String> {
        (index < self.specifications.len()).then(|| self.specifications.remove(index))
    }

    /// Remove the asset at `index` without touching the others.
    pub fn remove_asset(&mut self, index: usize) -> Option<AssetUploadResult> {
        (index < self.assets.len()).then(|| self.assets.remove(index))
    }

    /// Terms that still need to be created before submit.
    pub fn pending_terms(&self) -> impl Iterator<Item = (TaxonomyKind, &TaxonomyTerm)> {
        [
            TaxonomyKind::Category,
            TaxonomyKind::Subcategory,
            TaxonomyKind::Brand,
            TaxonomyKind::Unit,
        ]
        .into_iter()
        .filter_map(|kind| self.term(kind).map(|term| (kind, term)))
        .filter(|(_, term)| term.is_custom_pending())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_form_is_blank_and_active() {
        let form = FormState::default();
        assert!(form.is_blank());
        assert!(form.is_active);
        assert!(!form.requires_prescription);
    }

    #[test]
    fn flags_alone_do_not_make_form_meaningful() {
        let form = FormState {
            is_active: false,
            requires_prescription: true,
            ..FormState::default()
        };
        assert!(form.is_blank());
    }

    #[test]
    fn whitespace_name_is_still_blank() {
        let form = FormState {
            name: "   ".into(),
            ..FormState::default()
        };
        assert!(form.is_blank());
    }

    #[test]
    fn variants_reject_blank_and_duplicate_values() {
        let mut variants = Variants::default();
        assert!(variants.add(VariantKind::Size, " M "));
        assert!(!variants.add(VariantKind::Size, "M"));
        assert!(!variants.add(VariantKind::Size, "  "));
        assert!(variants.add(VariantKind::PackSize, "6 pack"));
        assert_eq!(variants.values(VariantKind::Size), ["M".to_string()]);
        assert!(variants.remove(VariantKind::Size, "M"));
        assert!(!variants.remove(VariantKind::Size, "M"));
    }

    #[test]
    fn specifications_add_and_remove_by_index() {
        let mut form = FormState::default();
        assert!(form.add_specification(" 100% cotton "));
        assert!(!form.add_specification(""));
        assert!(form.add_specification("Machine wash"));
        assert_eq!(form.remove_specification(0), Some("100% cotton".to_string()));
        assert_eq!(form.remove_specification(5), None);
        assert_eq!(form.specifications, vec!["Machine wash".to_string()]);
    }

    #[test]
    fn changing_category_resets_dependents() {
        let mut form = FormState::default();
        form.set_category(Some(TaxonomyTerm::resolved("c1", "Grocery")));
        form.subcategory = Some(TaxonomyTerm::resolved("s1", "Rice"));
        form.brand = Some(TaxonomyTerm::pending("Local Farms"));

        form.set_category(Some(TaxonomyTerm::resolved("c1", "Grocery")));
        assert!(form.subcategory.is_some(), "same category keeps dependents");

        form.set_category(Some(TaxonomyTerm::resolved("c2", "Pharmacy")));
        assert!(form.subcategory.is_none());
        assert!(form.brand.is_none());
    }

    #[test]
    fn remove_asset_only_touches_one_index() {
        let mut form = FormState::default();
        form.assets.push(AssetUploadResult::uploaded("a.png", "https://x/a", None));
        form.assets.push(AssetUploadResult::inline("b.png", "data:image/png;base64,AA"));
        form.assets.push(AssetUploadResult::uploaded("c.png", "https://x/c", None));

        let removed = form.remove_asset(1).expect("index exists");
        assert_eq!(removed.source, "b.png");
        assert_eq!(form.assets.len(), 2);
        assert_eq!(form.assets[0].source, "a.png");
        assert_eq!(form.assets[1].source, "c.png");
        assert!(form.remove_asset(2).is_none());
    }

    #[test]
    fn pending_terms_lists_only_custom_entries() {
        let form = FormState {
            category: Some(TaxonomyTerm::resolved("c1", "Grocery")),
            brand: Some(TaxonomyTerm::pending("Local Farms")),
            unit: Some(TaxonomyTerm::pending("crate")),
            ..FormState::default()
        };
        let kinds: Vec<_> = form.pending_terms().map(|(kind, _)| kind).collect();
        assert_eq!(kinds, vec![TaxonomyKind::Brand, TaxonomyKind::Unit]);
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let form: FormState = serde_json::from_str(r#"{"name":"Tea"}"#).unwrap();
        assert_eq!(form.name, "Tea");
        assert!(form.is_active);
        assert!(form.assets.is_empty());
    }
}
