//! Wizard error types.

use shelf_core::{CoreError, StepId};
use shelf_taxonomy::TaxonomyError;
use thiserror::Error;

use crate::api::ApiError;
use crate::validation::FieldErrors;

#[derive(Debug, Error)]
pub enum WizardError {
    /// The entry was saved; the wizard accepts no further changes.
    #[error("the wizard has already finished")]
    Finished,

    /// Submit was attempted before reaching the last step.
    #[error("submit is only available from the last step (currently at step {current})")]
    NotAtFinalStep { current: StepId },

    /// A step gate rejected the form.
    #[error("step {step}: {errors}")]
    Validation { step: StepId, errors: FieldErrors },

    /// Creating a custom taxonomy term failed.
    #[error("could not create custom terms: {0}")]
    Taxonomy(#[from] TaxonomyError),

    /// The form could not be turned into a catalog record.
    #[error(transparent)]
    Record(#[from] CoreError),

    /// The persistence API rejected or never received the record.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl WizardError {
    /// Field errors carried by a validation failure.
    #[must_use]
    pub const fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }
}
