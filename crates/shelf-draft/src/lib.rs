//! # shelf-draft
//!
//! Resilient local persistence of in-progress wizard state.
//!
//! - [`DraftStorage`]: minimal `get/set/delete` backends ([`FileStorage`], [`MemoryStorage`])
//! - [`DraftKey`]: `{scope}:{entity|"new"}` key scheme
//! - [`DraftStore`]: debounced, coalescing autosave with TTL-bound recovery
//!
//! Autosave is best-effort: storage failures are logged and swallowed so a
//! full disk or quota never blocks the wizard.

mod error;
mod key;
mod storage;
mod store;

pub use error::DraftError;
pub use key::DraftKey;
pub use storage::{DraftStorage, FileStorage, MemoryStorage};
pub use store::{DEFAULT_DEBOUNCE, DEFAULT_TTL, DraftStore};
