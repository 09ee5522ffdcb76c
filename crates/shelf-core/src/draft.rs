//! The persisted unit of an in-progress wizard.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::form::FormState;
use crate::step::StepId;

/// A point-in-time copy of the form and the step it was saved from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRecord {
    pub data: FormState,
    pub step: StepId,
    pub saved_at: DateTime<Utc>,
}

impl DraftRecord {
    #[must_use]
    pub fn new(data: FormState, step: StepId) -> Self {
        Self {
            data,
            step,
            saved_at: Utc::now(),
        }
    }

    /// Whether the record is older than `ttl` at `now`.
    #[must_use]
    pub fn is_stale(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now.signed_duration_since(self.saved_at) > ttl
    }

    /// Blank drafts carry nothing worth offering back to the user.
    #[must_use]
    pub fn is_restorable(&self) -> bool {
        !self.data.is_blank()
    }
}
