//! Per-step field validation.
//!
//! A step only checks the fields it declares as required; anything else is
//! left for the step that owns it. Messages are user-facing.

use std::collections::BTreeMap;
use std::fmt;

use shelf_core::{FieldKey, FormState, StepDefinition, StepId, StepPlan, TaxonomyTerm};

/// Non-empty map of field to message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<FieldKey, String>);

impl FieldErrors {
    fn from_map(map: BTreeMap<FieldKey, String>) -> Option<Self> {
        (!map.is_empty()).then_some(Self(map))
    }

    #[must_use]
    pub fn get(&self, field: FieldKey) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = FieldKey> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// One line for a toast or a log entry.
    #[must_use]
    pub fn summary(&self) -> String {
        match self.0.len() {
            1 => self.0.values().next().cloned().unwrap_or_default(),
            n => {
                let labels: Vec<&str> = self.0.keys().map(|k| k.label()).collect();
                format!("{n} fields need attention: {}", labels.join(", "))
            }
        }
    }

    #[must_use]
    pub fn into_inner(self) -> BTreeMap<FieldKey, String> {
        self.0
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// Checks a form against the steps of one plan.
#[derive(Debug, Clone, Copy)]
pub struct ValidationGate<'p> {
    plan: &'p StepPlan,
    max_assets: Option<usize>,
}

impl<'p> ValidationGate<'p> {
    #[must_use]
    pub const fn new(plan: &'p StepPlan) -> Self {
        Self {
            plan,
            max_assets: None,
        }
    }

    /// Cap the asset list. The last step of the plan owns the check.
    #[must_use]
    pub const fn with_max_assets(mut self, max: usize) -> Self {
        self.max_assets = Some(max);
        self
    }

    /// Validate the required fields of `step`. Unknown steps pass.
    ///
    /// # Errors
    ///
    /// Returns the failing fields with their messages.
    pub fn check(&self, step: StepId, form: &FormState) -> Result<(), FieldErrors> {
        self.plan
            .get(step)
            .map_or(Ok(()), |definition| self.check_step(definition, form))
    }

    /// Validate every step in order; the error names the first failing step
    /// and carries the failures of all steps.
    ///
    /// # Errors
    ///
    /// Returns `(first failing step, all field errors)`.
    pub fn check_all(&self, form: &FormState) -> Result<(), (StepId, FieldErrors)> {
        let mut first = None;
        let mut all = BTreeMap::new();
        for definition in self.plan.iter() {
            if let Err(errors) = self.check_step(definition, form) {
                first = first.or(Some(definition.id));
                all.extend(errors.into_inner());
            }
        }
        match (first, FieldErrors::from_map(all)) {
            (Some(step), Some(errors)) => Err((step, errors)),
            _ => Ok(()),
        }
    }

    fn check_step(&self, definition: &StepDefinition, form: &FormState) -> Result<(), FieldErrors> {
        let mut errors = check_definition(definition, form);
        if definition.id == self.plan.last() {
            if let Some(max) = self.max_assets.filter(|max| form.assets.len() > *max) {
                errors.insert(FieldKey::Assets, format!("You can upload up to {max} images"));
            }
        }
        FieldErrors::from_map(errors).map_or(Ok(()), Err)
    }
}

fn check_definition(definition: &StepDefinition, form: &FormState) -> BTreeMap<FieldKey, String> {
    let mut errors = BTreeMap::new();
    for &field in &definition.required_fields {
        if let Some(message) = field_error(field, form) {
            errors.insert(field, message);
        }
    }
    if definition.required_fields.contains(&FieldKey::SellingPrice)
        && !errors.contains_key(&FieldKey::Mrp)
    {
        if let Some(message) = mrp_below_price(form) {
            errors.insert(FieldKey::Mrp, message);
        }
    }
    errors
}

fn required(field: FieldKey) -> String {
    format!("{} is required", field.label())
}

fn field_error(field: FieldKey, form: &FormState) -> Option<String> {
    match field {
        FieldKey::Name => blank(&form.name).then(|| required(field)),
        FieldKey::Description => blank(&form.description).then(|| required(field)),
        FieldKey::Category | FieldKey::Subcategory | FieldKey::Brand | FieldKey::Unit => {
            let kind = field.taxonomy_kind()?;
            form.term(kind)
                .is_none_or(|term: &TaxonomyTerm| blank(term.name()))
                .then(|| required(field))
        }
        FieldKey::SellingPrice => match form.selling_price {
            None => Some(required(field)),
            Some(price) if !price.is_finite() => {
                Some("Selling price must be a valid amount".to_string())
            }
            Some(price) if price < 1.0 => Some("Selling price must be at least 1".to_string()),
            Some(_) => None,
        },
        FieldKey::Mrp => match form.mrp {
            None => Some(required(field)),
            Some(_) => mrp_below_price(form),
        },
        FieldKey::Stock => form.stock.is_none().then(|| required(field)),
        FieldKey::Assets => form
            .assets
            .is_empty()
            .then(|| "Add at least one image".to_string()),
    }
}

fn mrp_below_price(form: &FormState) -> Option<String> {
    match (form.mrp, form.selling_price) {
        (Some(mrp), _) if !mrp.is_finite() => Some("MRP must be a valid amount".to_string()),
        (Some(mrp), Some(price)) if mrp < price => {
            Some("MRP cannot be lower than the selling price".to_string())
        }
        _ => None,
    }
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}
