//! Scoped draft keys.

use std::fmt;

const NEW_ENTITY: &str = "new";

/// Identifies one draft: a tenant scope plus an entity id, or "new".
///
/// Rendered as `{scope}:{entity|"new"}`, so drafts for a new item and for
/// editing an existing one never share a slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DraftKey {
    scope: String,
    entity: Option<String>,
}

impl DraftKey {
    /// Key for creating a new entity in `scope`.
    #[must_use]
    pub fn new_entity(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            entity: None,
        }
    }

    /// Key for editing entity `id` in `scope`.
    #[must_use]
    pub fn existing(scope: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            entity: Some(id.into()),
        }
    }

    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    #[must_use]
    pub fn entity(&self) -> Option<&str> {
        self.entity.as_deref()
    }
}

impl fmt::Display for DraftKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            self.scope,
            self.entity.as_deref().unwrap_or(NEW_ENTITY)
        )
    }
}
