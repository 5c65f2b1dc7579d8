// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Relationship rules live in the member domain and reach storage and
// randomness exclusively through these traits.
//
// Naming convention: Base* for trait names (e.g., BaseMemberStore)

use async_trait::async_trait;

use crate::common::{FamilyId, MemberId, StoreError};
use crate::domains::member::models::{Member, MemberPatch, MemberWrite, NewMember};

// =============================================================================
// Member Store Trait (Infrastructure - persistence)
// =============================================================================

#[async_trait]
pub trait BaseMemberStore: Send + Sync {
    /// Look up a member by its member identifier
    async fn find_by_member_id(&self, member_id: &MemberId) -> Result<Option<Member>, StoreError>;

    /// All members sharing a family identifier, in insertion order
    async fn find_by_family_id(&self, family_id: FamilyId) -> Result<Vec<Member>, StoreError>;

    /// Every member, in insertion order
    async fn find_all(&self) -> Result<Vec<Member>, StoreError>;

    /// Apply a batch of writes atomically.
    ///
    /// Either every write is applied and one record per write is returned in
    /// order, or none is applied and the first failure is returned.
    async fn apply(&self, writes: Vec<MemberWrite>) -> Result<Vec<Member>, StoreError>;

    /// Delete one member and return the removed record
    async fn delete(&self, member_id: &MemberId) -> Result<Member, StoreError>;

    /// Delete every member of a family, returning how many were removed
    async fn delete_by_family_id(&self, family_id: FamilyId) -> Result<u64, StoreError>;

    /// Insert a single member
    async fn create(&self, member: NewMember) -> Result<Member, StoreError> {
        let member_id = member.member_id.clone();
        self.apply(vec![MemberWrite::Create(member)])
            .await?
            .pop()
            .ok_or(StoreError::NotFound(member_id))
    }

    /// Patch a single member
    async fn update(&self, member_id: &MemberId, patch: MemberPatch) -> Result<Member, StoreError> {
        self.apply(vec![MemberWrite::Update {
            member_id: member_id.clone(),
            patch,
        }])
        .await?
        .pop()
        .ok_or_else(|| StoreError::NotFound(member_id.clone()))
    }

    /// Connectivity probe for health checks
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

// =============================================================================
// Random Source Trait (Infrastructure - id draws)
// =============================================================================

/// Source of uniform integer draws for identifier generation.
///
/// No cryptographic unpredictability is required.
pub trait BaseRandomSource: Send + Sync {
    /// Draw a value uniformly from `low..=high`.
    fn draw(&self, low: u32, high: u32) -> u32;
}
