//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async operations that
//! accept `&PgPool` (or, for steps that must join a caller's transaction,
//! any `PgExecutor`) as the first argument.

pub mod page_repo;
pub mod page_version_repo;
pub mod redirect_repo;

pub use page_repo::PageRepo;
pub use page_version_repo::PageVersionRepo;
pub use redirect_repo::RedirectRepo;
