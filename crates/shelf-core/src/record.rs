//! The finalized catalog payload and the entity the backend returns.
//!
//! `CatalogRecord` can only be built from a form whose taxonomy terms are all
//! resolved, so a pending custom term never reaches the backend looking like a
//! known master-list entry.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::asset::{AssetUploadResult, DATA_URI_PREFIX};
use crate::errors::CoreError;
use crate::form::{FieldKey, FormState, Variants};
use crate::taxonomy::{TaxonomyKind, TaxonomyTerm};

/// Payload accepted by the entity persistence API (create and update).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRecord {
    /// Tenant scope the item belongs to.
    pub vendor_id: String,
    pub name: String,
    pub category_id: String,
    pub category: String,
    #[serde(default)]
    pub subcategory_id: Option<String>,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub brand_id: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    pub unit_id: String,
    pub unit: String,
    pub description: String,
    #[serde(default)]
    pub specifications: Vec<String>,
    #[serde(default)]
    pub variants: Variants,
    #[serde(default)]
    pub mrp: Option<f64>,
    pub selling_price: f64,
    /// Mirrors `selling_price`; kept for consumers that read `price`.
    pub price: f64,
    pub stock: u32,
    /// Image URLs or data URIs; the first one is the display image.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub image_keys: Vec<String>,
    pub is_active: bool,
    #[serde(default)]
    pub requires_prescription: bool,
}

impl CatalogRecord {
    /// Build the payload from a fully finalized form.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnresolvedTerm`] if any taxonomy term is still
    /// pending, and [`CoreError::Validation`] if a field the payload needs
    /// (category, unit, selling price, stock) is missing.
    pub fn from_form(form: &FormState, vendor_id: &str) -> Result<Self, CoreError> {
        let (category_id, category) = required_term(form, TaxonomyKind::Category)?;
        let (unit_id, unit) = required_term(form, TaxonomyKind::Unit)?;
        let (subcategory_id, subcategory) = optional_term(form, TaxonomyKind::Subcategory)?;
        let (brand_id, brand) = optional_term(form, TaxonomyKind::Brand)?;

        let selling_price = form.selling_price.ok_or_else(|| missing(FieldKey::SellingPrice))?;
        let stock = form.stock.ok_or_else(|| missing(FieldKey::Stock))?;

        Ok(Self {
            vendor_id: vendor_id.to_string(),
            name: form.name.trim().to_string(),
            category_id,
            category,
            subcategory_id,
            subcategory,
            brand_id,
            brand,
            unit_id,
            unit,
            description: form.description.trim().to_string(),
            specifications: form.specifications.clone(),
            variants: form.variants.clone(),
            mrp: form.mrp,
            selling_price,
            price: selling_price,
            stock,
            images: form.assets.iter().map(|a| a.src().to_string()).collect(),
            image_keys: form
                .assets
                .iter()
                .filter_map(AssetUploadResult::storage_key)
                .map(str::to_string)
                .collect(),
            is_active: form.is_active,
            requires_prescription: form.requires_prescription,
        })
    }
}

fn missing(field: FieldKey) -> CoreError {
    CoreError::Validation(format!("{} is required", field.label()))
}

fn resolved(kind: TaxonomyKind, term: &TaxonomyTerm) -> Result<(String, String), CoreError> {
    match term {
        TaxonomyTerm::Resolved { id, name } => Ok((id.clone(), name.clone())),
        TaxonomyTerm::Pending { name } => Err(CoreError::UnresolvedTerm {
            kind: kind.to_string(),
            name: name.clone(),
        }),
    }
}

fn required_term(form: &FormState, kind: TaxonomyKind) -> Result<(String, String), CoreError> {
    let term = form.term(kind).ok_or_else(|| {
        CoreError::Validation(format!("{kind} is required"))
    })?;
    resolved(kind, term)
}

fn optional_term(
    form: &FormState,
    kind: TaxonomyKind,
) -> Result<(Option<String>, Option<String>), CoreError> {
    match form.term(kind) {
        Some(term) => resolved(kind, term).map(|(id, name)| (Some(id), Some(name))),
        None => Ok((None, None)),
    }
}

/// A catalog item as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntity {
    pub id: String,
    #[serde(flatten)]
    pub record: CatalogRecord,
}

impl CatalogEntity {
    /// Seed a form for editing this entity.
    #[must_use]
    pub fn to_form(&self) -> FormState {
        let r = &self.record;
        let term = |id: Option<&String>, name: Option<&String>| match (id, name) {
            (Some(id), Some(name)) => Some(TaxonomyTerm::resolved(id, name)),
            (None, Some(name)) if !name.trim().is_empty() => Some(TaxonomyTerm::pending(name)),
            _ => None,
        };

        let hosted_count = r
            .images
            .iter()
            .filter(|image| !image.starts_with(DATA_URI_PREFIX))
            .count();
        // Position only says something when every hosted image has a key.
        let positional = hosted_count == r.image_keys.len();
        let mut hosted = 0;
        let assets = r
            .images
            .iter()
            .map(|image| {
                if image.starts_with(DATA_URI_PREFIX) {
                    return AssetUploadResult::from_existing(image, None);
                }
                let key = r
                    .image_keys
                    .iter()
                    .find(|key| image.ends_with(key.as_str()))
                    .or_else(|| r.image_keys.get(hosted).filter(|_| positional))
                    .cloned();
                hosted += 1;
                AssetUploadResult::from_existing(image, key)
            })
            .collect();

        FormState {
            name: r.name.clone(),
            category: term(Some(&r.category_id), Some(&r.category)),
            subcategory: term(r.subcategory_id.as_ref(), r.subcategory.as_ref()),
            brand: term(r.brand_id.as_ref(), r.brand.as_ref()),
            unit: term(Some(&r.unit_id), Some(&r.unit)),
            description: r.description.clone(),
            specifications: r.specifications.clone(),
            variants: r.variants.clone(),
            mrp: r.mrp,
            selling_price: Some(r.selling_price),
            stock: Some(r.stock),
            assets,
            is_active: r.is_active,
            requires_prescription: r.requires_prescription,
        }
    }
}
