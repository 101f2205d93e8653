//! Static anatomy taxonomy browsed through chat menus.
//!
//! The tree is parsed once at startup into a closed two-variant node type,
//! so lookups never re-inspect raw JSON shapes. It is immutable afterwards
//! and shared read-only across conversations.

mod taxonomy_load;
mod taxonomy_store;

pub use taxonomy_load::TaxonomyError;
pub use taxonomy_store::{ChildEntry, Leaf, Taxonomy, TaxonomyNode, TOKEN_DELIMITER};
