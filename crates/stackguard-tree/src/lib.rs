//! The narrow host-framework surface the engine consumes: template units
//! (stacks), typed resource nodes, ordered metadata bags, and the
//! deferred-reference expression graph with its flattening utility.
//!
//! The engine never creates or destroys nodes during evaluation; it only
//! reads them and appends metadata entries.

#![forbid(unsafe_code)]

mod expr;
mod flatten;
mod node;

pub use expr::Expr;
pub use flatten::flatten;
pub use node::{Metadata, MetadataEntry, ResourceNode, Stack};
