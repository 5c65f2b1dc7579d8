//! Create-time family id decision
//!
//! A new member joins an existing household before a new one is formed:
//! - spouse given: the spouse's family id, else a fresh one
//! - no spouse, father given, Unmarried: the father's family id, else a fresh one
//! - no spouse, no father, Unmarried: no family
//! - anything else: a fresh family id

use tracing::debug;

use super::identifiers::generate_family_id;
use crate::common::{FamilyId, MemberId, RegistryResult};
use crate::domains::member::models::MaritalStatus;
use crate::kernel::ServerDeps;

pub async fn determine_family_id(
    spouse_id: Option<&MemberId>,
    father_id: Option<&MemberId>,
    marital_status: MaritalStatus,
    deps: &ServerDeps,
) -> RegistryResult<Option<FamilyId>> {
    let store = &deps.member_store;

    if let Some(spouse_id) = spouse_id {
        let spouse_family = store
            .find_by_member_id(spouse_id)
            .await?
            .and_then(|spouse| spouse.family_id);

        return Ok(Some(match spouse_family {
            Some(family_id) => {
                debug!(%spouse_id, %family_id, "Joining spouse's family");
                family_id
            }
            None => fresh(deps, "spouse has no family"),
        }));
    }

    match (father_id, marital_status) {
        (Some(father_id), MaritalStatus::Unmarried) => {
            let father_family = store
                .find_by_member_id(father_id)
                .await?
                .and_then(|father| father.family_id);

            Ok(Some(match father_family {
                Some(family_id) => {
                    debug!(%father_id, %family_id, "Joining father's family");
                    family_id
                }
                None => fresh(deps, "father has no family"),
            }))
        }
        (None, MaritalStatus::Unmarried) => {
            debug!("Unmarried member without father, no family");
            Ok(None)
        }
        _ => Ok(Some(fresh(deps, "new household"))),
    }
}

fn fresh(deps: &ServerDeps, reason: &str) -> FamilyId {
    let family_id = generate_family_id(deps.random.as_ref());
    debug!(%family_id, reason, "Generated family id");
    family_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::seed_member as seed;
    use crate::kernel::{InMemoryMemberStore, TestDependencies};

    fn deps_with(store: InMemoryMemberStore, draws: Vec<u32>) -> ServerDeps {
        TestDependencies::new()
            .with_store(store)
            .with_draws(draws)
            .into_server_deps()
    }

    #[tokio::test]
    async fn adopts_spouse_family() {
        let store = InMemoryMemberStore::new().with_member(seed(
            "f-iye-45-600001-111",
            MaritalStatus::Married,
            Some(4321),
        ));
        let deps = deps_with(store, vec![]);
        let spouse = MemberId::new("f-iye-45-600001-111");

        let family = determine_family_id(Some(&spouse), None, MaritalStatus::Married, &deps)
            .await
            .unwrap();

        assert_eq!(family, Some(FamilyId::new(4321)));
    }

    #[tokio::test]
    async fn spouse_takes_precedence_over_father() {
        let store = InMemoryMemberStore::new()
            .with_member(seed("f-iye-45-600001-111", MaritalStatus::Married, Some(4321)))
            .with_member(seed("m-iye-70-600001-222", MaritalStatus::Married, Some(7777)));
        let deps = deps_with(store, vec![]);

        let family = determine_family_id(
            Some(&MemberId::new("f-iye-45-600001-111")),
            Some(&MemberId::new("m-iye-70-600001-222")),
            MaritalStatus::Unmarried,
            &deps,
        )
        .await
        .unwrap();

        assert_eq!(family, Some(FamilyId::new(4321)));
    }

    #[tokio::test]
    async fn fresh_when_spouse_has_no_family_or_is_missing() {
        let store = InMemoryMemberStore::new().with_member(seed(
            "f-iye-45-600001-111",
            MaritalStatus::Married,
            None,
        ));
        let deps = deps_with(store, vec![5001, 5002]);

        let without_family = determine_family_id(
            Some(&MemberId::new("f-iye-45-600001-111")),
            None,
            MaritalStatus::Married,
            &deps,
        )
        .await
        .unwrap();
        let missing = determine_family_id(
            Some(&MemberId::new("nobody")),
            None,
            MaritalStatus::Married,
            &deps,
        )
        .await
        .unwrap();

        assert_eq!(without_family, Some(FamilyId::new(5001)));
        assert_eq!(missing, Some(FamilyId::new(5002)));
    }

    #[tokio::test]
    async fn unmarried_child_joins_father_family() {
        let store = InMemoryMemberStore::new().with_member(seed(
            "m-iye-70-600001-222",
            MaritalStatus::Married,
            Some(2048),
        ));
        let deps = deps_with(store, vec![]);

        let family = determine_family_id(
            None,
            Some(&MemberId::new("m-iye-70-600001-222")),
            MaritalStatus::Unmarried,
            &deps,
        )
        .await
        .unwrap();

        assert_eq!(family, Some(FamilyId::new(2048)));
    }

    #[tokio::test]
    async fn married_child_with_father_gets_fresh_family() {
        let store = InMemoryMemberStore::new().with_member(seed(
            "m-iye-70-600001-222",
            MaritalStatus::Married,
            Some(2048),
        ));
        let deps = deps_with(store, vec![6006]);

        let family = determine_family_id(
            None,
            Some(&MemberId::new("m-iye-70-600001-222")),
            MaritalStatus::Married,
            &deps,
        )
        .await
        .unwrap();

        assert_eq!(family, Some(FamilyId::new(6006)));
    }

    #[tokio::test]
    async fn unaffiliated_unmarried_member_has_no_family() {
        let deps = deps_with(InMemoryMemberStore::new(), vec![]);

        let family = determine_family_id(None, None, MaritalStatus::Unmarried, &deps)
            .await
            .unwrap();

        assert_eq!(family, None);
    }

    #[tokio::test]
    async fn married_without_spouse_gets_fresh_family() {
        let deps = deps_with(InMemoryMemberStore::new(), vec![9000]);

        let family = determine_family_id(None, None, MaritalStatus::Married, &deps)
            .await
            .unwrap();

        assert_eq!(family, Some(FamilyId::new(9000)));
    }
}
