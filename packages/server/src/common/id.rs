//! Typed identifiers for registry entities.
//!
//! Member identifiers are content-derived strings (see
//! [`crate::domains::member::activities::identifiers`]) and family identifiers
//! are 4-digit household keys. Wrapping both keeps them from being mixed up
//! with each other or with arbitrary strings and integers at call sites.
//!
//! # Example
//!
//! ```rust
//! use registry_core::common::{FamilyId, MemberId};
//!
//! let member_id = MemberId::new("f-bra-34-560001-123");
//! let family_id = FamilyId::new(2048);
//!
//! assert_eq!(member_id.as_str(), "f-bra-34-560001-123");
//! assert_eq!(family_id.get(), 2048);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

// ============================================================================
// MemberId
// ============================================================================

/// Globally unique, immutable identifier of a member record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct MemberId(String);

impl MemberId {
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MemberId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for MemberId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for MemberId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

// ============================================================================
// FamilyId
// ============================================================================

/// Household-sharing key. Many members may carry the same value; it is never
/// a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct FamilyId(i32);

impl FamilyId {
    /// Smallest value produced by the family-id generator.
    pub const MIN: i32 = 1000;
    /// Largest value produced by the family-id generator.
    pub const MAX: i32 = 9999;

    #[inline]
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    #[inline]
    pub fn get(self) -> i32 {
        self.0
    }
}

impl Display for FamilyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for FamilyId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl FromStr for FamilyId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i32>().map(Self)
    }
}

// ============================================================================
// Tests
// ============================================================================
