//! Relationship validation gate
//!
//! Runs immediately before every persisted write and never mutates state.
//! Rules are checked in a fixed order and the first violation is returned:
//!
//! 1. Married: spouse id and family id present, spouse is another member,
//!    spouse exists, spouse is married, spouse shares the family id, spouse
//!    is not linked to someone else.
//! 2. Unmarried: no spouse id.
//! 3. Father given: father exists and is not unmarried.

use tracing::{debug, warn};

use crate::common::{FamilyId, MemberId, RegistryError, RegistryResult};
use crate::domains::member::models::{MaritalStatus, Member, NewMember};
use crate::kernel::ServerDeps;

/// Relationship fields of a proposed record.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberLinks {
    pub member_id: MemberId,
    pub marital_status: MaritalStatus,
    pub family_id: Option<FamilyId>,
    pub spouse_id: Option<MemberId>,
    pub father_id: Option<MemberId>,
}

impl From<&NewMember> for MemberLinks {
    fn from(member: &NewMember) -> Self {
        Self {
            member_id: member.member_id.clone(),
            marital_status: member.marital_status,
            family_id: member.family_id,
            spouse_id: member.spouse_id.clone(),
            father_id: member.father_id.clone(),
        }
    }
}

impl From<&Member> for MemberLinks {
    fn from(member: &Member) -> Self {
        Self {
            member_id: member.member_id.clone(),
            marital_status: member.marital_status,
            family_id: member.family_id,
            spouse_id: member.spouse_id.clone(),
            father_id: member.father_id.clone(),
        }
    }
}

/// Validate a proposed record's relationships against the store.
pub async fn validate_relationships(proposed: &MemberLinks, deps: &ServerDeps) -> RegistryResult<()> {
    let result = check(proposed, deps).await;
    match &result {
        Ok(()) => debug!(status = proposed.marital_status.as_str(), "Relationships valid"),
        Err(e) => warn!(error = %e, "Relationship validation failed"),
    }
    result
}

async fn check(proposed: &MemberLinks, deps: &ServerDeps) -> RegistryResult<()> {
    let store = &deps.member_store;

    match proposed.marital_status {
        MaritalStatus::Married => {
            let spouse_id = proposed
                .spouse_id
                .as_ref()
                .ok_or(RegistryError::MissingSpouseId)?;
            let family_id = proposed.family_id.ok_or(RegistryError::MissingFamilyId)?;

            if &proposed.member_id == spouse_id {
                return Err(RegistryError::SelfSpouse);
            }

            let spouse = store
                .find_by_member_id(spouse_id)
                .await?
                .ok_or_else(|| RegistryError::SpouseNotFound(spouse_id.clone()))?;

            if spouse.marital_status != MaritalStatus::Married {
                return Err(RegistryError::SpouseNotMarried(spouse_id.clone()));
            }
            if spouse.family_id != Some(family_id) {
                return Err(RegistryError::FamilyIdMismatch {
                    member: Some(family_id),
                    spouse: spouse.family_id,
                });
            }
            if spouse
                .spouse_id
                .as_ref()
                .is_some_and(|partner| partner != &proposed.member_id)
            {
                return Err(RegistryError::AlreadyMarried(spouse_id.clone()));
            }
        }
        MaritalStatus::Unmarried => {
            if proposed.spouse_id.is_some() {
                return Err(RegistryError::SpouseIdOnUnmarried);
            }
        }
    }

    if let Some(father_id) = &proposed.father_id {
        let father = store
            .find_by_member_id(father_id)
            .await?
            .ok_or_else(|| RegistryError::FatherNotFound(father_id.clone()))?;

        if father.marital_status == MaritalStatus::Unmarried {
            return Err(RegistryError::FatherUnmarried(father_id.clone()));
        }
    }

    Ok(())
}
