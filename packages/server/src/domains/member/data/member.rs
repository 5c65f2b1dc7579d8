use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{FamilyId, MemberId};
use crate::domains::member::models::member::{MaritalStatus, Member as MemberModel};

/// Create-member request body
///
/// `family_id` is deliberately absent: it is derived from the member's
/// relationships, never taken from the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateMemberInput {
    pub gender: Option<String>,
    pub sub_caste: Option<String>,
    pub age: Option<i64>,
    pub pincode: Option<String>,
    pub marital_status: Option<MaritalStatus>,
    pub spouse_id: Option<MemberId>,
    pub father_id: Option<MemberId>,
    pub member_name: Option<String>,
    pub caste: Option<String>,
    pub full_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub if_expired: Option<bool>,
    pub petname: Option<String>,
    pub education: Option<String>,
    pub occupation: Option<String>,
    pub occupation_specific_sector: Option<String>,
    pub occupation_category: Option<String>,
    pub mobile_number: Option<String>,
    pub email: Option<String>,
    pub aadhaar: Option<String>,
}

/// Member API data type
///
/// Public representation of a member (for HTTP responses)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberData {
    /// Database primary key
    pub id: i64,

    /// Content-derived identifier, e.g. `f-bra-34-560001-042`
    pub member_id: MemberId,

    /// Household key shared with spouse and unmarried children
    pub family_id: Option<FamilyId>,

    pub gender: String,
    pub sub_caste: String,
    pub age: i32,
    pub pincode: String,
    pub marital_status: MaritalStatus,
    pub spouse_id: Option<MemberId>,
    pub father_id: Option<MemberId>,
    pub member_name: Option<String>,
    pub caste: Option<String>,
    pub full_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub if_expired: Option<bool>,
    pub petname: Option<String>,
    pub education: Option<String>,
    pub occupation: Option<String>,
    pub occupation_specific_sector: Option<String>,
    pub occupation_category: Option<String>,
    pub mobile_number: Option<String>,
    pub email: Option<String>,
    pub aadhaar: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MemberModel> for MemberData {
    fn from(member: MemberModel) -> Self {
        Self {
            id: member.id,
            member_id: member.member_id,
            family_id: member.family_id,
            gender: member.gender,
            sub_caste: member.sub_caste,
            age: member.age,
            pincode: member.pincode,
            marital_status: member.marital_status,
            spouse_id: member.spouse_id,
            father_id: member.father_id,
            member_name: member.member_name,
            caste: member.caste,
            full_address: member.full_address,
            city: member.city,
            state: member.state,
            if_expired: member.if_expired,
            petname: member.petname,
            education: member.education,
            occupation: member.occupation,
            occupation_specific_sector: member.occupation_specific_sector,
            occupation_category: member.occupation_category,
            mobile_number: member.mobile_number,
            email: member.email,
            aadhaar: member.aadhaar,
            created_at: member.created_at,
            updated_at: member.updated_at,
        }
    }
}

/// Result of a bulk delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedCount {
    pub count: u64,
}
