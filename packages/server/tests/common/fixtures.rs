//! Test fixtures for creating test data.
//!
//! Records are seeded straight into the in-memory store so each test starts
//! from a known household layout without going through validation.

use registry_core::common::{FamilyId, MemberId};
use registry_core::domains::member::{CreateMemberInput, MaritalStatus, Member};
use registry_core::kernel::test_dependencies::seed_member;
use registry_core::kernel::{InMemoryMemberStore, ServerDeps, TestDependencies};

/// In-memory registry: deps for activities plus a handle on the store.
pub struct TestRegistry {
    pub deps: ServerDeps,
    pub store: InMemoryMemberStore,
}

impl TestRegistry {
    /// Registry whose random source replays `draws`.
    pub fn with_draws(draws: impl IntoIterator<Item = u32>) -> Self {
        let store = InMemoryMemberStore::new();
        let deps = TestDependencies::new()
            .with_store(store.clone())
            .with_draws(draws)
            .into_server_deps();
        Self { deps, store }
    }

    pub fn new() -> Self {
        Self::with_draws([])
    }

    pub fn member(&self, member_id: &str) -> Member {
        self.store
            .get(&MemberId::new(member_id))
            .unwrap_or_else(|| panic!("member {member_id} should exist"))
    }

    /// Seed two members who already reference each other
    pub fn seed_couple(&self, husband: &str, wife: &str, family_id: i32) {
        let mut h = seed_member(husband, MaritalStatus::Married, Some(family_id));
        h.spouse_id = Some(MemberId::new(wife));
        let mut w = seed_member(wife, MaritalStatus::Married, Some(family_id));
        w.gender = "f".to_string();
        w.spouse_id = Some(MemberId::new(husband));
        self.store.insert_raw(h);
        self.store.insert_raw(w);
    }

    pub fn seed_single(&self, member_id: &str, family_id: Option<i32>) -> Member {
        self.store
            .insert_raw(seed_member(member_id, MaritalStatus::Unmarried, family_id))
    }

    pub fn seed_married(&self, member_id: &str, family_id: Option<i32>) -> Member {
        self.store
            .insert_raw(seed_member(member_id, MaritalStatus::Married, family_id))
    }
}

/// Create request with the identifier inputs filled in
pub fn create_input(
    gender: &str,
    sub_caste: &str,
    age: i64,
    pincode: &str,
    marital_status: MaritalStatus,
) -> CreateMemberInput {
    CreateMemberInput {
        gender: Some(gender.to_string()),
        sub_caste: Some(sub_caste.to_string()),
        age: Some(age),
        pincode: Some(pincode.to_string()),
        marital_status: Some(marital_status),
        ..Default::default()
    }
}

pub fn family(id: i32) -> Option<FamilyId> {
    Some(FamilyId::new(id))
}
