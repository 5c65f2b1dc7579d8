//! Member and family identifier generation
//!
//! Member ids are derived from biographical attributes plus a random 3-digit
//! suffix: `{gender}-{sub_caste[..3]}-{age}-{pincode}-{suffix}`. Uniqueness is
//! probabilistic; collisions are checked by the caller, not here.

use lazy_static::lazy_static;
use regex::Regex;

use crate::common::{FamilyId, MemberId, RegistryError, RegistryResult};
use crate::kernel::BaseRandomSource;

const ID_DELIMITER: char = '-';
const SUB_CASTE_PREFIX_LEN: usize = 3;
const SUFFIX_MIN: u32 = 100;
const SUFFIX_MAX: u32 = 999;

lazy_static! {
    static ref PINCODE_REGEX: Regex = Regex::new(r"^\d{6}$").expect("valid pincode regex");
}

/// Canonical single-letter gender code.
pub fn normalize_gender(gender: &str) -> RegistryResult<char> {
    match gender.to_lowercase().as_str() {
        "m" | "male" => Ok('m'),
        "f" | "female" => Ok('f'),
        _ => Err(RegistryError::InvalidGender(gender.to_string())),
    }
}

pub fn validate_age(age: i64) -> RegistryResult<i32> {
    if age < 0 {
        return Err(RegistryError::InvalidAge(age));
    }
    i32::try_from(age).map_err(|_| RegistryError::InvalidAge(age))
}

pub fn validate_pincode(pincode: &str) -> RegistryResult<()> {
    if PINCODE_REGEX.is_match(pincode) {
        Ok(())
    } else {
        Err(RegistryError::InvalidPincode(pincode.to_string()))
    }
}

/// Lowercased first three characters; shorter values are used as-is.
fn sub_caste_prefix(sub_caste: &str) -> String {
    sub_caste
        .chars()
        .take(SUB_CASTE_PREFIX_LEN)
        .collect::<String>()
        .to_lowercase()
}

/// Derive a member identifier.
pub fn generate_member_id(
    gender: &str,
    sub_caste: &str,
    age: i64,
    pincode: &str,
    random: &dyn BaseRandomSource,
) -> RegistryResult<MemberId> {
    let gender = normalize_gender(gender)?;
    let age = validate_age(age)?;
    validate_pincode(pincode)?;

    let suffix = random.draw(SUFFIX_MIN, SUFFIX_MAX);

    Ok(MemberId::new(format!(
        "{gender}{d}{prefix}{d}{age}{d}{pincode}{d}{suffix:03}",
        d = ID_DELIMITER,
        prefix = sub_caste_prefix(sub_caste),
    )))
}

/// Uniform random 4-digit family identifier. No registry of issued values is
/// kept; unrelated families may collide.
pub fn generate_family_id(random: &dyn BaseRandomSource) -> FamilyId {
    let value = random.draw(FamilyId::MIN as u32, FamilyId::MAX as u32);
    FamilyId::new(value as i32)
}
