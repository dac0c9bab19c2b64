//! Operator-authored suppressions: validated, justified exceptions that
//! silence a specific rule (optionally a specific finding) on a node or a
//! whole template unit.
//!
//! Format validation runs eagerly on every attachment and again on every
//! read-back, so tree mutations between attachment and evaluation cannot
//! bypass it.

#![forbid(unsafe_code)]

mod attach;
mod errors;
mod model;
mod store;
mod validate;

pub use attach::{
    add_resource_suppressions, add_resource_suppressions_by_path, add_stack_suppressions,
};
pub use errors::{PathNotFoundError, SuppressionError, SuppressionFormatError};
pub use model::{AppliesTo, Suppression};
pub use store::{collect, set_suppressions, suppressions_of};
pub use validate::validate;
