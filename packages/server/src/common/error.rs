use thiserror::Error;

use super::id::{FamilyId, MemberId};

/// Failures raised by a member store implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Member not found: {0}")]
    NotFound(MemberId),

    #[error("Member already exists: {0}")]
    DuplicateKey(MemberId),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Registry errors for member identifiers and relationship consistency.
///
/// Every validation rule has its own variant so callers can report exactly
/// which rule a write violated.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Gender must be 'm', 'f', 'male', or 'female' (got '{0}')")]
    InvalidGender(String),

    #[error("Age must be a non-negative number (got {0})")]
    InvalidAge(i64),

    #[error("Pincode must be a 6-digit number (got '{0}')")]
    InvalidPincode(String),

    #[error("Field '{0}' is required")]
    MissingField(&'static str),

    #[error("Spouse ID is mandatory for married members")]
    MissingSpouseId,

    #[error("Family ID is mandatory for married members")]
    MissingFamilyId,

    #[error("Spouse not found: {0}")]
    SpouseNotFound(MemberId),

    #[error("Spouse {0} must be married")]
    SpouseNotMarried(MemberId),

    #[error("Husband and wife must have the same family_id (member: {member:?}, spouse: {spouse:?})")]
    FamilyIdMismatch {
        member: Option<FamilyId>,
        spouse: Option<FamilyId>,
    },

    #[error("Unmarried members cannot have a spouse_id")]
    SpouseIdOnUnmarried,

    #[error("Father not found: {0}")]
    FatherNotFound(MemberId),

    #[error("Unmarried members cannot be fathers ({0})")]
    FatherUnmarried(MemberId),

    #[error("Member {0} is already married")]
    AlreadyMarried(MemberId),

    #[error("A member cannot be their own spouse")]
    SelfSpouse,

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Could not draw an unused member id after {0} attempts")]
    MemberIdExhausted(u32),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Coarse classification used to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Client-correctable input.
    Validation,
    NotFound,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Internal => "internal",
        }
    }
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::InvalidGender(_)
            | RegistryError::InvalidAge(_)
            | RegistryError::InvalidPincode(_)
            | RegistryError::MissingField(_)
            | RegistryError::MissingSpouseId
            | RegistryError::MissingFamilyId
            | RegistryError::SpouseNotFound(_)
            | RegistryError::SpouseNotMarried(_)
            | RegistryError::FamilyIdMismatch { .. }
            | RegistryError::SpouseIdOnUnmarried
            | RegistryError::FatherNotFound(_)
            | RegistryError::FatherUnmarried(_)
            | RegistryError::AlreadyMarried(_)
            | RegistryError::SelfSpouse => ErrorKind::Validation,
            RegistryError::RecordNotFound(_) | RegistryError::Store(StoreError::NotFound(_)) => {
                ErrorKind::NotFound
            }
            RegistryError::MemberIdExhausted(_) | RegistryError::Store(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn member_not_found(member_id: &MemberId) -> Self {
        RegistryError::RecordNotFound(format!("member {}", member_id))
    }
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
