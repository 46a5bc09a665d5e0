//! Request extractors shared by mutating handlers.
//!
//! - [`actor::Actor`] -- Identifies who is performing a write.

pub mod actor;
