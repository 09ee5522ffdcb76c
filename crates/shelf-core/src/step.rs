//! Wizard step ordinals and the fixed step plan.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::errors::CoreError;
use crate::form::FieldKey;

/// 1-based step ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(u8);

impl StepId {
    pub const FIRST: Self = Self(1);

    /// Build a step id. Zero is not a valid ordinal.
    #[must_use]
    pub const fn new(ordinal: u8) -> Option<Self> {
        if ordinal == 0 { None } else { Some(Self(ordinal)) }
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One wizard step and the fields it gates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDefinition {
    pub id: StepId,
    pub name: String,
    pub required_fields: BTreeSet<FieldKey>,
}

impl StepDefinition {
    #[must_use]
    pub fn new(ordinal: u8, name: impl Into<String>, required: &[FieldKey]) -> Self {
        Self {
            id: StepId(ordinal),
            name: name.into(),
            required_fields: required.iter().copied().collect(),
        }
    }
}

/// The ordered, immutable sequence of steps for one wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepPlan {
    steps: Vec<StepDefinition>,
}

impl StepPlan {
    /// Build a plan. Step ids must be exactly `1..=N` in order, `N >= 1`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] for an empty plan or out-of-order ids.
    pub fn new(steps: Vec<StepDefinition>) -> Result<Self, CoreError> {
        if steps.is_empty() {
            return Err(CoreError::Validation("step plan has no steps".into()));
        }
        for (index, step) in steps.iter().enumerate() {
            if usize::from(step.id.get()) != index + 1 {
                return Err(CoreError::Validation(format!(
                    "step '{}' has ordinal {}, expected {}",
                    step.name,
                    step.id,
                    index + 1
                )));
            }
        }
        Ok(Self { steps })
    }

    /// The catalog product plan: basic info, description, pricing, media.
    #[must_use]
    pub fn catalog() -> Self {
        Self {
            steps: vec![
                StepDefinition::new(
                    1,
                    "Basic info",
                    &[FieldKey::Name, FieldKey::Category, FieldKey::Unit],
                ),
                StepDefinition::new(2, "Description & specs", &[FieldKey::Description]),
                StepDefinition::new(
                    3,
                    "Pricing & stock",
                    &[FieldKey::SellingPrice, FieldKey::Stock],
                ),
                StepDefinition::new(4, "Media", &[]),
            ],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> StepId {
        self.steps[self.steps.len() - 1].id
    }

    #[must_use]
    pub fn get(&self, id: StepId) -> Option<&StepDefinition> {
        usize::from(id.get())
            .checked_sub(1)
            .and_then(|index| self.steps.get(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &StepDefinition> {
        self.steps.iter()
    }

    /// The following step, capped at the last one.
    #[must_use]
    pub fn next_after(&self, id: StepId) -> StepId {
        if id >= self.last() { self.last() } else { StepId(id.0 + 1) }
    }

    /// The preceding step, floored at the first one.
    #[must_use]
    pub const fn before(&self, id: StepId) -> StepId {
        if id.0 <= 1 { StepId::FIRST } else { StepId(id.0 - 1) }
    }
}

impl Default for StepPlan {
    fn default() -> Self {
        Self::catalog()
    }
}
