//! Row models and request DTOs.

pub mod page;
pub mod page_version;
pub mod redirect;

use serde::{Deserialize, Deserializer, Serialize};

/// A page of results plus the unpaginated total.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
}

/// Deserialize a present field as `Some`, so that an explicit JSON `null`
/// becomes `Some(None)` while an absent field (via `#[serde(default)]`)
/// stays `None`.
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
