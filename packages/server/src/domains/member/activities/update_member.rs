//! Update member activity

use tracing::{debug, info};

use super::identifiers::{normalize_gender, validate_age, validate_pincode};
use super::recompute_family_id::recompute_family_id_on_status_change;
use super::validate_relationships::{validate_relationships, MemberLinks};
use crate::common::{MemberId, RegistryError, RegistryResult};
use crate::domains::member::models::{Member, MemberPatch, MemberWrite};
use crate::kernel::ServerDeps;

/// Update an existing member.
///
/// The family id is recomputed when marital status changes, the patched
/// record is validated as a whole, and when the patch names a spouse the
/// spouse's back-reference and family id are rewritten in the same atomic
/// batch as the member itself. A former partner dropped by the patch is
/// unlinked and becomes `Unmarried` in that batch too.
pub async fn update_member(
    member_id: &MemberId,
    mut patch: MemberPatch,
    deps: &ServerDeps,
) -> RegistryResult<Member> {
    let existing = deps
        .member_store
        .find_by_member_id(member_id)
        .await?
        .ok_or_else(|| RegistryError::member_not_found(member_id))?;

    check_identifier_fields(&patch)?;

    let family_id = recompute_family_id_on_status_change(&patch, &existing, deps).await?;
    patch.family_id = Some(family_id);

    let mut proposed = existing.clone();
    patch.apply_to(&mut proposed);
    validate_relationships(&MemberLinks::from(&proposed), deps).await?;

    let mut writes = vec![MemberWrite::Update {
        member_id: member_id.clone(),
        patch: patch.clone(),
    }];
    if let Some(Some(spouse_id)) = &patch.spouse_id {
        debug!(%member_id, %spouse_id, ?family_id, "Syncing spouse back-reference");
        writes.push(MemberWrite::Update {
            member_id: spouse_id.clone(),
            patch: MemberPatch::spouse_link(member_id.clone(), Some(family_id)),
        });
    }
    if let Some(former) = former_partner(&existing, &proposed, deps).await? {
        info!(%member_id, former_spouse = %former, "Unlinking former spouse");
        writes.push(MemberWrite::Update {
            member_id: former,
            patch: MemberPatch::spouse_unlink(),
        });
    }

    let updated = deps
        .member_store
        .apply(writes)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| RegistryError::member_not_found(member_id))?;

    info!(%member_id, family_id = ?updated.family_id, "Member updated");

    Ok(updated)
}

/// Partner the stored record was linked to, when the patch drops or replaces
/// them and they still point back at this member.
async fn former_partner(
    existing: &Member,
    proposed: &Member,
    deps: &ServerDeps,
) -> RegistryResult<Option<MemberId>> {
    let Some(former) = existing.spouse_id.as_ref() else {
        return Ok(None);
    };
    if proposed.spouse_id.as_ref() == Some(former) {
        return Ok(None);
    }

    let points_back = deps
        .member_store
        .find_by_member_id(former)
        .await?
        .is_some_and(|partner| partner.spouse_id.as_ref() == Some(&existing.member_id));

    Ok(points_back.then(|| former.clone()))
}

/// The member id is never re-derived, but its source fields must stay well
/// formed.
fn check_identifier_fields(patch: &MemberPatch) -> RegistryResult<()> {
    if let Some(gender) = &patch.gender {
        normalize_gender(gender)?;
    }
    if let Some(age) = patch.age {
        validate_age(age)?;
    }
    if let Some(pincode) = &patch.pincode {
        validate_pincode(pincode)?;
    }
    Ok(())
}
