//! # shelf-core
//!
//! Core types shared by every Shelf crate:
//! - `FormState`, the single owned snapshot of all wizard fields
//! - Step ordinals, step definitions and the fixed step plan
//! - Draft records persisted by `shelf-draft`
//! - Asset upload results produced by `shelf-media`
//! - Taxonomy terms (resolved vs. pending custom terms)
//! - The finalized `CatalogRecord` handed to the persistence API
//! - Cross-cutting error types

pub mod asset;
pub mod draft;
pub mod errors;
pub mod form;
pub mod record;
pub mod step;
pub mod taxonomy;

pub use asset::{AssetOutcome, AssetUploadResult};
pub use draft::DraftRecord;
pub use errors::CoreError;
pub use form::{FieldKey, FormState, VariantKind, Variants};
pub use record::{CatalogEntity, CatalogRecord};
pub use step::{StepDefinition, StepId, StepPlan};
pub use taxonomy::{MasterEntry, TaxonomyKind, TaxonomyTerm};
