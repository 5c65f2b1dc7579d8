//! Create member activity

use tracing::{debug, info, warn};

use super::determine_family_id::determine_family_id;
use super::identifiers::generate_member_id;
use super::validate_relationships::{validate_relationships, MemberLinks};
use crate::common::{MemberId, RegistryError, RegistryResult};
use crate::domains::member::data::CreateMemberInput;
use crate::domains::member::models::{Member, MemberPatch, MemberWrite, NewMember};
use crate::kernel::ServerDeps;

/// Create a new member.
///
/// This activity:
/// 1. Derives a member id not yet present in the store
/// 2. Determines the family id from spouse/father relationships
/// 3. Validates relationships
/// 4. Inserts the member and, when a spouse is named, points the spouse back
///    at the new member, both in one atomic batch
pub async fn create_member(input: CreateMemberInput, deps: &ServerDeps) -> RegistryResult<Member> {
    let gender = input.gender.ok_or(RegistryError::MissingField("gender"))?;
    let sub_caste = input.sub_caste.ok_or(RegistryError::MissingField("sub_caste"))?;
    let age = input.age.ok_or(RegistryError::MissingField("age"))?;
    let pincode = input.pincode.ok_or(RegistryError::MissingField("pincode"))?;
    let marital_status = input
        .marital_status
        .ok_or(RegistryError::MissingField("marital_status"))?;

    let member_id = draw_unused_member_id(&gender, &sub_caste, age, &pincode, deps).await?;
    info!(%member_id, status = marital_status.as_str(), "Creating member");

    let family_id = determine_family_id(
        input.spouse_id.as_ref(),
        input.father_id.as_ref(),
        marital_status,
        deps,
    )
    .await?;

    let new_member = NewMember {
        member_id: member_id.clone(),
        family_id,
        gender,
        sub_caste,
        // generate_member_id already rejected out-of-range ages
        age: i32::try_from(age).map_err(|_| RegistryError::InvalidAge(age))?,
        pincode,
        marital_status,
        spouse_id: input.spouse_id,
        father_id: input.father_id,
        member_name: input.member_name,
        caste: input.caste,
        full_address: input.full_address,
        city: input.city,
        state: input.state,
        if_expired: input.if_expired,
        petname: input.petname,
        education: input.education,
        occupation: input.occupation,
        occupation_specific_sector: input.occupation_specific_sector,
        occupation_category: input.occupation_category,
        mobile_number: input.mobile_number,
        email: input.email,
        aadhaar: input.aadhaar,
    };

    validate_relationships(&MemberLinks::from(&new_member), deps).await?;

    let spouse_id = new_member.spouse_id.clone();
    let mut writes = vec![MemberWrite::Create(new_member)];
    if let Some(spouse_id) = spouse_id {
        debug!(%member_id, %spouse_id, "Linking spouse back to new member");
        writes.push(MemberWrite::Update {
            member_id: spouse_id,
            patch: MemberPatch::spouse_link(member_id.clone(), None),
        });
    }

    let created = deps
        .member_store
        .apply(writes)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| RegistryError::member_not_found(&member_id))?;

    info!(
        member_id = %created.member_id,
        family_id = ?created.family_id,
        "Member created"
    );

    Ok(created)
}

/// Draw member ids until one is unused, up to the configured attempt limit.
async fn draw_unused_member_id(
    gender: &str,
    sub_caste: &str,
    age: i64,
    pincode: &str,
    deps: &ServerDeps,
) -> RegistryResult<MemberId> {
    for attempt in 1..=deps.member_id_attempts {
        let member_id = generate_member_id(gender, sub_caste, age, pincode, deps.random.as_ref())?;

        if deps
            .member_store
            .find_by_member_id(&member_id)
            .await?
            .is_none()
        {
            return Ok(member_id);
        }

        warn!(%member_id, attempt, "Generated member id already taken, redrawing");
    }

    Err(RegistryError::MemberIdExhausted(deps.member_id_attempts))
}
