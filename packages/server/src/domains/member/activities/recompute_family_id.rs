//! Update-time family id recomputation
//!
//! Only a marital status change triggers recomputation:
//! - to Married: always a fresh family id (the new spouse's household is not
//!   joined here, unlike the create path)
//! - to Unmarried: the supplied father's family id, or none without a father
//!
//! Without a status change the caller's `family_id` is kept: an explicit
//! value or `null` is taken as given, an absent field keeps the stored value.

use tracing::{debug, info};

use super::identifiers::generate_family_id;
use crate::common::{FamilyId, RegistryResult};
use crate::domains::member::models::{MaritalStatus, Member, MemberPatch};
use crate::kernel::ServerDeps;

pub async fn recompute_family_id_on_status_change(
    proposed: &MemberPatch,
    existing: &Member,
    deps: &ServerDeps,
) -> RegistryResult<Option<FamilyId>> {
    let Some(status) = proposed.marital_status.filter(|_| proposed.changes_status_of(existing))
    else {
        let family_id = proposed.family_id.unwrap_or(existing.family_id);
        debug!(member_id = %existing.member_id, ?family_id, "Status unchanged, keeping family id");
        return Ok(family_id);
    };

    let family_id = match status {
        MaritalStatus::Married => Some(generate_family_id(deps.random.as_ref())),
        MaritalStatus::Unmarried => match proposed.father_id.as_ref().and_then(Option::as_ref) {
            Some(father_id) => deps
                .member_store
                .find_by_member_id(father_id)
                .await?
                .and_then(|father| father.family_id),
            None => None,
        },
    };

    info!(
        member_id = %existing.member_id,
        from = existing.marital_status.as_str(),
        to = status.as_str(),
        ?family_id,
        "Marital status changed, family id recomputed"
    );

    Ok(family_id)
}
