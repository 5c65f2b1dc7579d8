//! Serde helper for nullable patch fields
//!
//! Distinguishes a field that is absent from one that is explicitly `null`.
//! Pair it with `#[serde(default)]` so an absent field becomes `None`, while
//! `null` becomes `Some(None)` and a value becomes `Some(Some(v))`.
//!
//! # Example
//! ```
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Patch {
//!     #[serde(default, deserialize_with = "registry_core::common::nullable::deserialize")]
//!     city: Option<Option<String>>,
//! }
//!
//! let absent: Patch = serde_json::from_str("{}").unwrap();
//! let cleared: Patch = serde_json::from_str(r#"{"city": null}"#).unwrap();
//! assert_eq!(absent.city, None);
//! assert_eq!(cleared.city, Some(None));
//! ```

use serde::{Deserialize, Deserializer};

pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
