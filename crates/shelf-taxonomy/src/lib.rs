//! # shelf-taxonomy
//!
//! Classification support for catalog entries:
//! - narrowing master lists to what a tenant may pick (`candidates`)
//! - resolving typed names to known entries or pending custom terms
//! - reconciling a whole form's pending names against the live lists
//! - creating pending terms through the lookup service at submit time
//!
//! Resolution is pure and never touches the network; only [`finalize`] and
//! [`finalize_form`] create entries.

mod error;
mod finalize;
mod http;
mod lookup;
mod reconcile;
mod resolve;

pub use error::TaxonomyError;
pub use finalize::{FINALIZE_ORDER, finalize, finalize_form};
pub use lookup::{HttpTaxonomyClient, TaxonomyLookup, collection};
pub use reconcile::reconcile_form;
pub use resolve::{TaxonomyFilter, candidates, resolve, select_id};
