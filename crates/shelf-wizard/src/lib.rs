//! # shelf-wizard
//!
//! The multi-step catalog entry wizard: a [`StepController`] that gates
//! forward navigation on per-step validation, autosaves drafts, attaches
//! media and submits the finished entry through a [`CatalogApi`].

mod api;
mod controller;
mod error;
mod settings;
mod validation;

pub use api::{ApiError, CatalogApi, HttpCatalogApi};
pub use controller::{StepController, WizardState};
pub use error::WizardError;
pub use settings::WizardSettings;
pub use validation::{FieldErrors, ValidationGate};
