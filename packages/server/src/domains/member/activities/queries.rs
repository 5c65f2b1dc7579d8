//! Member query and delete activities
//!
//! These pass straight through to the store; bulk deletes carry no
//! per-record compensation.

use tracing::info;

use crate::common::{FamilyId, MemberId, RegistryError, RegistryResult, StoreError};
use crate::domains::member::models::Member;
use crate::kernel::ServerDeps;

pub async fn list_members(deps: &ServerDeps) -> RegistryResult<Vec<Member>> {
    Ok(deps.member_store.find_all().await?)
}

pub async fn get_member(member_id: &MemberId, deps: &ServerDeps) -> RegistryResult<Member> {
    deps.member_store
        .find_by_member_id(member_id)
        .await?
        .ok_or_else(|| RegistryError::member_not_found(member_id))
}

/// Members sharing a family id; an unknown family yields an empty list
pub async fn list_family(family_id: FamilyId, deps: &ServerDeps) -> RegistryResult<Vec<Member>> {
    Ok(deps.member_store.find_by_family_id(family_id).await?)
}

pub async fn delete_member(member_id: &MemberId, deps: &ServerDeps) -> RegistryResult<Member> {
    match deps.member_store.delete(member_id).await {
        Ok(deleted) => {
            info!(%member_id, "Member deleted");
            Ok(deleted)
        }
        Err(StoreError::NotFound(_)) => Err(RegistryError::member_not_found(member_id)),
        Err(e) => Err(e.into()),
    }
}

pub async fn delete_family(family_id: FamilyId, deps: &ServerDeps) -> RegistryResult<u64> {
    let count = deps.member_store.delete_by_family_id(family_id).await?;
    info!(%family_id, count, "Family deleted");
    Ok(count)
}
