//! Link two unmarried members as spouses

use tracing::info;

use super::identifiers::generate_family_id;
use crate::common::{MemberId, RegistryError, RegistryResult};
use crate::domains::member::models::{MaritalStatus, Member, MemberPatch, MemberWrite};
use crate::kernel::ServerDeps;

/// Marry two existing members in one atomic batch.
///
/// Both become `Married`, reference each other, and share one family id:
/// the first member's existing family id, else the second's, else a fresh
/// one. Returns both updated records in argument order.
pub async fn link_spouses(
    member_id: &MemberId,
    spouse_id: &MemberId,
    deps: &ServerDeps,
) -> RegistryResult<(Member, Member)> {
    if member_id == spouse_id {
        return Err(RegistryError::SelfSpouse);
    }

    let member = find_unmarried(member_id, deps).await?;
    let spouse = find_unmarried(spouse_id, deps).await?;

    let family_id = member
        .family_id
        .or(spouse.family_id)
        .unwrap_or_else(|| generate_family_id(deps.random.as_ref()));

    let patch_for = |partner: &MemberId| MemberPatch {
        marital_status: Some(MaritalStatus::Married),
        spouse_id: Some(Some(partner.clone())),
        family_id: Some(Some(family_id)),
        ..Default::default()
    };

    let mut written = deps
        .member_store
        .apply(vec![
            MemberWrite::Update {
                member_id: member_id.clone(),
                patch: patch_for(spouse_id),
            },
            MemberWrite::Update {
                member_id: spouse_id.clone(),
                patch: patch_for(member_id),
            },
        ])
        .await?
        .into_iter();

    let (Some(member), Some(spouse)) = (written.next(), written.next()) else {
        return Err(RegistryError::member_not_found(spouse_id));
    };

    info!(%member_id, %spouse_id, %family_id, "Spouses linked");

    Ok((member, spouse))
}

async fn find_unmarried(member_id: &MemberId, deps: &ServerDeps) -> RegistryResult<Member> {
    let member = deps
        .member_store
        .find_by_member_id(member_id)
        .await?
        .ok_or_else(|| RegistryError::member_not_found(member_id))?;

    if member.marital_status == MaritalStatus::Married || member.spouse_id.is_some() {
        return Err(RegistryError::AlreadyMarried(member_id.clone()));
    }

    Ok(member)
}
