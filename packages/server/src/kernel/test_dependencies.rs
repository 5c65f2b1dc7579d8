// TestDependencies - in-memory implementations for testing
//
// Provides a member store and a scripted random source that can be injected
// into ServerDeps so the relationship engine runs without Postgres.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use super::{BaseMemberStore, BaseRandomSource, ServerDeps, DEFAULT_MEMBER_ID_ATTEMPTS};
use crate::common::{FamilyId, MemberId, StoreError};
use crate::domains::member::models::{MaritalStatus, Member, MemberWrite, NewMember};

// =============================================================================
// Fixtures
// =============================================================================

/// Minimal member record for seeding stores
pub fn seed_member(member_id: &str, marital_status: MaritalStatus, family_id: Option<i32>) -> NewMember {
    NewMember {
        member_id: MemberId::new(member_id),
        family_id: family_id.map(FamilyId::new),
        gender: "m".to_string(),
        sub_caste: "Iyer".to_string(),
        age: 40,
        pincode: "600001".to_string(),
        marital_status,
        spouse_id: None,
        father_id: None,
        member_name: None,
        caste: None,
        full_address: None,
        city: None,
        state: None,
        if_expired: None,
        petname: None,
        education: None,
        occupation: None,
        occupation_specific_sector: None,
        occupation_category: None,
        mobile_number: None,
        email: None,
        aadhaar: None,
    }
}

// =============================================================================
// In-memory Member Store
// =============================================================================

#[derive(Default)]
struct StoreState {
    members: Vec<Member>,
    next_id: i64,
    failing_updates: HashSet<MemberId>,
    applied_batches: usize,
}

impl StoreState {
    fn position(&self, member_id: &MemberId) -> Option<usize> {
        self.members.iter().position(|m| &m.member_id == member_id)
    }
}

/// Member store that keeps records in memory.
///
/// Batches are staged on a copy of the records and swapped in only when every
/// write succeeds, giving the same all-or-nothing behavior as the Postgres
/// store.
#[derive(Clone, Default)]
pub struct InMemoryMemberStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryMemberStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record directly, bypassing validation
    pub fn with_member(self, member: NewMember) -> Self {
        self.insert_raw(member);
        self
    }

    /// Seed a record directly, bypassing validation
    pub fn insert_raw(&self, member: NewMember) -> Member {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let stored = member.into_member(state.next_id, Utc::now());
        state.members.push(stored.clone());
        stored
    }

    /// Make every update targeting `member_id` fail with a database error
    pub fn fail_updates_to(&self, member_id: &MemberId) {
        self.state
            .lock()
            .unwrap()
            .failing_updates
            .insert(member_id.clone());
    }

    /// Snapshot of a stored record
    pub fn get(&self, member_id: &MemberId) -> Option<Member> {
        let state = self.state.lock().unwrap();
        state.position(member_id).map(|i| state.members[i].clone())
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of successfully committed write batches
    pub fn applied_batches(&self) -> usize {
        self.state.lock().unwrap().applied_batches
    }
}

#[async_trait]
impl BaseMemberStore for InMemoryMemberStore {
    async fn find_by_member_id(&self, member_id: &MemberId) -> Result<Option<Member>, StoreError> {
        Ok(self.get(member_id))
    }

    async fn find_by_family_id(&self, family_id: FamilyId) -> Result<Vec<Member>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .members
            .iter()
            .filter(|m| m.family_id == Some(family_id))
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<Member>, StoreError> {
        Ok(self.state.lock().unwrap().members.clone())
    }

    async fn apply(&self, writes: Vec<MemberWrite>) -> Result<Vec<Member>, StoreError> {
        let mut state = self.state.lock().unwrap();
        let mut staged = state.members.clone();
        let mut next_id = state.next_id;
        let mut written = Vec::with_capacity(writes.len());
        let now = Utc::now();

        for write in writes {
            match write {
                MemberWrite::Create(new_member) => {
                    if staged.iter().any(|m| m.member_id == new_member.member_id) {
                        return Err(StoreError::DuplicateKey(new_member.member_id));
                    }
                    next_id += 1;
                    let member = new_member.into_member(next_id, now);
                    staged.push(member.clone());
                    written.push(member);
                }
                MemberWrite::Update { member_id, patch } => {
                    if state.failing_updates.contains(&member_id) {
                        return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
                    }
                    let member = staged
                        .iter_mut()
                        .find(|m| m.member_id == member_id)
                        .ok_or_else(|| StoreError::NotFound(member_id.clone()))?;
                    patch.apply_to(member);
                    member.updated_at = now;
                    written.push(member.clone());
                }
            }
        }

        state.members = staged;
        state.next_id = next_id;
        state.applied_batches += 1;

        Ok(written)
    }

    async fn delete(&self, member_id: &MemberId) -> Result<Member, StoreError> {
        let mut state = self.state.lock().unwrap();
        let index = state
            .position(member_id)
            .ok_or_else(|| StoreError::NotFound(member_id.clone()))?;
        Ok(state.members.remove(index))
    }

    async fn delete_by_family_id(&self, family_id: FamilyId) -> Result<u64, StoreError> {
        let mut state = self.state.lock().unwrap();
        let before = state.members.len();
        state.members.retain(|m| m.family_id != Some(family_id));
        Ok((before - state.members.len()) as u64)
    }
}

// =============================================================================
// Scripted Random Source
// =============================================================================

/// Random source that replays a fixed sequence of draws.
///
/// Each scripted value is clamped into the requested range. Once the script
/// is exhausted every draw returns the low end of the range.
#[derive(Clone, Default)]
pub struct SequenceRandom {
    values: Arc<Mutex<VecDeque<u32>>>,
    calls: Arc<Mutex<Vec<(u32, u32)>>>,
}

impl SequenceRandom {
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            values: Arc::new(Mutex::new(values.into_iter().collect())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Ranges requested so far, in call order
    pub fn calls(&self) -> Vec<(u32, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

impl BaseRandomSource for SequenceRandom {
    fn draw(&self, low: u32, high: u32) -> u32 {
        self.calls.lock().unwrap().push((low, high));
        self.values
            .lock()
            .unwrap()
            .pop_front()
            .map(|value| value.clamp(low, high))
            .unwrap_or(low)
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Builder for ServerDeps wired to in-memory fakes
pub struct TestDependencies {
    pub store: InMemoryMemberStore,
    pub random: SequenceRandom,
    pub member_id_attempts: u32,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            store: InMemoryMemberStore::new(),
            random: SequenceRandom::default(),
            member_id_attempts: DEFAULT_MEMBER_ID_ATTEMPTS,
        }
    }

    /// Script the random draws
    pub fn with_draws(mut self, values: impl IntoIterator<Item = u32>) -> Self {
        self.random = SequenceRandom::new(values);
        self
    }

    pub fn with_store(mut self, store: InMemoryMemberStore) -> Self {
        self.store = store;
        self
    }

    pub fn with_member_id_attempts(mut self, attempts: u32) -> Self {
        self.member_id_attempts = attempts;
        self
    }

    pub fn into_server_deps(self) -> ServerDeps {
        ServerDeps::new(
            Arc::new(self.store),
            Arc::new(self.random),
            self.member_id_attempts,
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
