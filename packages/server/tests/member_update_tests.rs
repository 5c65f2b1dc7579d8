//! Member updates: family id recomputation on status change, whole-record
//! validation, and spouse back-reference repair.

mod common;

use common::*;
use registry_core::common::{FamilyId, MemberId, RegistryError};
use registry_core::domains::member::activities::{
    link_spouses, update_member, validate_relationships, MemberLinks,
};
use registry_core::domains::member::{MaritalStatus, MemberPatch};
use registry_core::kernel::BaseMemberStore;

const HUSBAND: &str = "m-bra-40-560001-100";
const WIFE: &str = "f-bra-38-560001-200";
const FATHER: &str = "m-bra-65-560001-300";

fn id(value: &str) -> MemberId {
    MemberId::new(value)
}

fn patch(json: &str) -> MemberPatch {
    serde_json::from_str(json).expect("valid patch json")
}

#[tokio::test]
async fn leaving_marriage_adopts_father_household() {
    let registry = TestRegistry::new();
    registry.seed_couple(HUSBAND, WIFE, 7000);
    registry.seed_married(FATHER, Some(2048));

    let updated = update_member(
        &id(WIFE),
        patch(&format!(
            r#"{{"marital_status": "Unmarried", "spouse_id": null, "father_id": "{FATHER}"}}"#
        )),
        &registry.deps,
    )
    .await
    .unwrap();

    assert_eq!(updated.family_id, family(2048));
    assert_eq!(updated.marital_status, MaritalStatus::Unmarried);
    assert_eq!(updated.spouse_id, None);
    assert_eq!(updated.father_id, Some(id(FATHER)));
}

#[tokio::test]
async fn leaving_marriage_without_father_clears_household() {
    let registry = TestRegistry::new();
    registry.seed_couple(HUSBAND, WIFE, 7000);

    let updated = update_member(
        &id(WIFE),
        patch(r#"{"marital_status": "Unmarried", "spouse_id": null}"#),
        &registry.deps,
    )
    .await
    .unwrap();

    assert_eq!(updated.family_id, None);
}

#[tokio::test]
async fn leaving_marriage_unlinks_former_spouse() {
    let registry = TestRegistry::new();
    registry.seed_couple(HUSBAND, WIFE, 7000);

    update_member(
        &id(WIFE),
        patch(r#"{"marital_status": "Unmarried", "spouse_id": null}"#),
        &registry.deps,
    )
    .await
    .unwrap();

    let husband = registry.member(HUSBAND);
    assert_eq!(husband.spouse_id, None);
    assert_eq!(husband.marital_status, MaritalStatus::Unmarried);
    assert_eq!(husband.family_id, family(7000));
    assert_eq!(registry.store.applied_batches(), 1);

    // The former partner stays editable
    let updated = update_member(&id(HUSBAND), patch(r#"{"city": "Pune"}"#), &registry.deps)
        .await
        .unwrap();
    assert_eq!(updated.city.as_deref(), Some("Pune"));
}

#[tokio::test]
async fn replacing_spouse_unlinks_previous_partner() {
    const SECOND: &str = "f-bra-36-560001-400";
    let registry = TestRegistry::new();
    registry.seed_couple(HUSBAND, WIFE, 7000);
    registry.seed_married(SECOND, Some(7000));

    let updated = update_member(
        &id(HUSBAND),
        patch(&format!(r#"{{"spouse_id": "{SECOND}"}}"#)),
        &registry.deps,
    )
    .await
    .unwrap();

    assert_eq!(updated.spouse_id, Some(id(SECOND)));
    assert_eq!(registry.member(SECOND).spouse_id, Some(id(HUSBAND)));

    let previous = registry.member(WIFE);
    assert_eq!(previous.spouse_id, None);
    assert_eq!(previous.marital_status, MaritalStatus::Unmarried);
}

#[tokio::test]
async fn spouse_linked_to_someone_else_cannot_be_named() {
    const OTHER: &str = "m-bra-44-560001-500";
    let registry = TestRegistry::new();
    registry.seed_couple(HUSBAND, WIFE, 7000);
    registry.seed_married(OTHER, Some(7000));

    let err = update_member(
        &id(OTHER),
        patch(&format!(r#"{{"spouse_id": "{WIFE}"}}"#)),
        &registry.deps,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, RegistryError::AlreadyMarried(m) if m == id(WIFE)));
    assert_eq!(registry.member(WIFE).spouse_id, Some(id(HUSBAND)));
    assert_eq!(registry.member(OTHER).spouse_id, None);
}

#[tokio::test]
async fn leaving_marriage_must_drop_spouse_reference() {
    let registry = TestRegistry::new();
    registry.seed_couple(HUSBAND, WIFE, 7000);

    let err = update_member(
        &id(WIFE),
        patch(r#"{"marital_status": "Unmarried"}"#),
        &registry.deps,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, RegistryError::SpouseIdOnUnmarried));
    assert_eq!(registry.member(WIFE).marital_status, MaritalStatus::Married);
    assert_eq!(registry.store.applied_batches(), 0);
}

#[tokio::test]
async fn descriptive_update_keeps_household() {
    let registry = TestRegistry::new();
    registry.seed_couple(HUSBAND, WIFE, 7000);

    let updated = update_member(
        &id(HUSBAND),
        patch(r#"{"occupation": "Engineer", "city": "Mysuru", "email": null}"#),
        &registry.deps,
    )
    .await
    .unwrap();

    assert_eq!(updated.family_id, family(7000));
    assert_eq!(updated.spouse_id, Some(id(WIFE)));
    assert_eq!(updated.occupation.as_deref(), Some("Engineer"));
    assert_eq!(updated.city.as_deref(), Some("Mysuru"));
    assert_eq!(updated.member_id, id(HUSBAND));
}

#[tokio::test]
async fn becoming_married_by_update_mints_a_new_household() {
    // The update path never joins the spouse's household, so the fresh
    // family id fails the shared-family rule.
    let registry = TestRegistry::with_draws([8123]);
    registry.seed_single(HUSBAND, None);
    registry.seed_married(WIFE, Some(3000));

    let err = update_member(
        &id(HUSBAND),
        patch(&format!(r#"{{"marital_status": "Married", "spouse_id": "{WIFE}"}}"#)),
        &registry.deps,
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        RegistryError::FamilyIdMismatch { member: Some(m), spouse: Some(s) }
            if m == FamilyId::new(8123) && s == FamilyId::new(3000)
    ));
    assert_eq!(registry.member(HUSBAND).marital_status, MaritalStatus::Unmarried);
}

#[tokio::test]
async fn naming_spouse_repairs_missing_back_reference() {
    let registry = TestRegistry::new();
    registry.seed_couple(HUSBAND, WIFE, 7000);
    // Simulate a compensating write that never landed
    registry
        .store
        .update(&id(WIFE), MemberPatch {
            spouse_id: Some(None),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(registry.member(WIFE).spouse_id, None);

    update_member(
        &id(HUSBAND),
        patch(&format!(r#"{{"spouse_id": "{WIFE}"}}"#)),
        &registry.deps,
    )
    .await
    .unwrap();

    let wife = registry.member(WIFE);
    assert_eq!(wife.spouse_id, Some(id(HUSBAND)));
    assert_eq!(wife.family_id, family(7000));
}

#[tokio::test]
async fn failed_spouse_sync_leaves_member_untouched() {
    let registry = TestRegistry::new();
    registry.seed_couple(HUSBAND, WIFE, 7000);
    registry.store.fail_updates_to(&id(WIFE));

    let err = update_member(
        &id(HUSBAND),
        patch(&format!(r#"{{"spouse_id": "{WIFE}", "city": "Hubli"}}"#)),
        &registry.deps,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, RegistryError::Store(_)));
    assert_eq!(registry.member(HUSBAND).city, None);
}

#[tokio::test]
async fn member_cannot_marry_itself() {
    let registry = TestRegistry::new();
    registry.seed_couple(HUSBAND, WIFE, 7000);

    let err = update_member(
        &id(HUSBAND),
        patch(&format!(r#"{{"spouse_id": "{HUSBAND}"}}"#)),
        &registry.deps,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, RegistryError::SelfSpouse));
}

#[tokio::test]
async fn unknown_member_is_not_found() {
    let registry = TestRegistry::new();

    let err = update_member(&id("m-bra-1-560001-100"), MemberPatch::default(), &registry.deps)
        .await
        .unwrap_err();

    assert!(matches!(err, RegistryError::RecordNotFound(_)));
}

#[tokio::test]
async fn identifier_source_fields_stay_well_formed() {
    let registry = TestRegistry::new();
    registry.seed_single(HUSBAND, None);

    for (body, expected) in [
        (r#"{"pincode": "56001"}"#, "pincode"),
        (r#"{"age": -4}"#, "age"),
        (r#"{"gender": "unknown"}"#, "gender"),
    ] {
        let err = update_member(&id(HUSBAND), patch(body), &registry.deps)
            .await
            .unwrap_err();
        let matched = match expected {
            "pincode" => matches!(err, RegistryError::InvalidPincode(_)),
            "age" => matches!(err, RegistryError::InvalidAge(-4)),
            _ => matches!(err, RegistryError::InvalidGender(_)),
        };
        assert!(matched, "{body} gave {err}");
    }
}

#[tokio::test]
async fn linking_spouses_shares_first_household() {
    let registry = TestRegistry::new();
    registry.seed_single(HUSBAND, Some(2048));
    registry.seed_single(WIFE, Some(3000));

    let (husband, wife) = link_spouses(&id(HUSBAND), &id(WIFE), &registry.deps)
        .await
        .unwrap();

    assert_eq!(husband.family_id, family(2048));
    assert_eq!(wife.family_id, family(2048));
    assert_eq!(husband.spouse_id, Some(id(WIFE)));
    assert_eq!(wife.spouse_id, Some(id(HUSBAND)));
    assert_eq!(husband.marital_status, MaritalStatus::Married);
    assert_eq!(wife.marital_status, MaritalStatus::Married);

    // Both sides now pass the validation gate
    for member in [&husband, &wife] {
        validate_relationships(&MemberLinks::from(member), &registry.deps)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn linking_spouses_without_households_mints_one() {
    let registry = TestRegistry::with_draws([4321]);
    registry.seed_single(HUSBAND, None);
    registry.seed_single(WIFE, None);

    let (husband, wife) = link_spouses(&id(HUSBAND), &id(WIFE), &registry.deps)
        .await
        .unwrap();

    assert_eq!(husband.family_id, family(4321));
    assert_eq!(wife.family_id, family(4321));
}

#[tokio::test]
async fn linked_spouses_can_then_be_updated() {
    let registry = TestRegistry::with_draws([4321]);
    registry.seed_single(HUSBAND, None);
    registry.seed_single(WIFE, None);
    link_spouses(&id(HUSBAND), &id(WIFE), &registry.deps)
        .await
        .unwrap();

    let updated = update_member(
        &id(WIFE),
        patch(r#"{"member_name": "Lakshmi"}"#),
        &registry.deps,
    )
    .await
    .unwrap();

    assert_eq!(updated.member_name.as_deref(), Some("Lakshmi"));
    assert_eq!(updated.family_id, family(4321));
}

#[tokio::test]
async fn linking_rejects_married_missing_or_same_member() {
    let registry = TestRegistry::new();
    registry.seed_couple(HUSBAND, WIFE, 7000);
    registry.seed_single(FATHER, None);

    let err = link_spouses(&id(FATHER), &id(WIFE), &registry.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::AlreadyMarried(m) if m == id(WIFE)));

    let err = link_spouses(&id(FATHER), &id("f-bra-1-560001-999"), &registry.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::RecordNotFound(_)));

    let err = link_spouses(&id(FATHER), &id(FATHER), &registry.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::SelfSpouse));

    assert_eq!(registry.member(FATHER).marital_status, MaritalStatus::Unmarried);
}
