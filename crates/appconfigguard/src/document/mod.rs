//! Configuration documents and the flatten/unflatten transform.
//!
//! - `tree`: the closed `ConfigTree` type parsed from JSON
//! - `flatten`: tree → dotted path map (`database.port` → `"5432"`)
//! - `unflatten`: dotted path map → tree
//! - `loader`: reading and writing documents on disk

pub mod error;
pub mod flatten;
pub mod loader;
pub mod tree;
pub mod unflatten;

pub use error::{DocumentError, Result};
pub use flatten::{flatten, flatten_and_validate, join_path, FlatConfig, PATH_SEPARATOR};
pub use loader::{load_document, parse_document, render_document, write_document};
pub use tree::{ConfigTree, Scalar};
pub use unflatten::{looks_like_json_container, parse_leaf, unflatten, MAX_LIST_INDEX};
