// Common types and utilities shared across the application

pub mod error;
pub mod id;
pub mod nullable;

pub use error::{ErrorKind, RegistryError, RegistryResult, StoreError};
pub use id::{FamilyId, MemberId};
