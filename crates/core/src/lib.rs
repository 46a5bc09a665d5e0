//! Domain rules for the page lifecycle & versioning engine.
//!
//! Nothing in this crate performs I/O; the `db` and `api` crates call into
//! it for validation, lifecycle transitions, and snapshot comparison.

pub mod content_tree;
pub mod error;
pub mod page_fields;
pub mod page_lifecycle;
pub mod page_path;
pub mod pagination;
pub mod redirect;
pub mod types;
