//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! Nullable columns use `Option<Option<T>>` in update DTOs: a missing key
//! keeps the stored value, an explicit `null` clears it.

use serde::{Deserialize, Deserializer};

pub mod category;
pub mod location;
pub mod project;
pub mod record;

/// Deserialize a present key as `Some`, so `null` becomes `Some(None)`.
/// Pair with `#[serde(default)]` so a missing key stays `None`.
pub(crate) fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
