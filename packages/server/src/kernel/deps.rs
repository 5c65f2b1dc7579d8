//! Server dependencies for member activities (using traits for testability)
//!
//! This module provides the central dependency container used by the member
//! domain. Storage and randomness use trait abstractions to enable testing.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::common::{FamilyId, MemberId, StoreError};
use crate::domains::member::models::{Member, MemberWrite};
use crate::kernel::{BaseMemberStore, BaseRandomSource, StdRandomSource};

/// Default number of draws before giving up on an unused member id
pub const DEFAULT_MEMBER_ID_ATTEMPTS: u32 = 3;

// =============================================================================
// PgMemberStore (implements BaseMemberStore trait)
// =============================================================================

/// Postgres-backed member store
#[derive(Clone)]
pub struct PgMemberStore(pub PgPool);

impl PgMemberStore {
    pub fn new(pool: PgPool) -> Self {
        Self(pool)
    }
}

#[async_trait]
impl BaseMemberStore for PgMemberStore {
    async fn find_by_member_id(&self, member_id: &MemberId) -> Result<Option<Member>, StoreError> {
        Member::find_by_member_id(member_id, &self.0).await
    }

    async fn find_by_family_id(&self, family_id: FamilyId) -> Result<Vec<Member>, StoreError> {
        Member::find_by_family_id(family_id, &self.0).await
    }

    async fn find_all(&self) -> Result<Vec<Member>, StoreError> {
        Member::find_all(&self.0).await
    }

    async fn apply(&self, writes: Vec<MemberWrite>) -> Result<Vec<Member>, StoreError> {
        Member::apply_writes(writes, &self.0).await
    }

    async fn delete(&self, member_id: &MemberId) -> Result<Member, StoreError> {
        Member::delete(member_id, &self.0).await
    }

    async fn delete_by_family_id(&self, family_id: FamilyId) -> Result<u64, StoreError> {
        Member::delete_by_family_id(family_id, &self.0).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.0).await?;
        Ok(())
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to member activities
#[derive(Clone)]
pub struct ServerDeps {
    pub member_store: Arc<dyn BaseMemberStore>,
    /// Shared source for member-id suffixes and family ids
    pub random: Arc<dyn BaseRandomSource>,
    /// How many member ids to draw before reporting exhaustion
    pub member_id_attempts: u32,
}

impl ServerDeps {
    pub fn new(
        member_store: Arc<dyn BaseMemberStore>,
        random: Arc<dyn BaseRandomSource>,
        member_id_attempts: u32,
    ) -> Self {
        Self {
            member_store,
            random,
            member_id_attempts: member_id_attempts.max(1),
        }
    }

    /// Production wiring: Postgres store and an entropy-seeded random source
    pub fn postgres(pool: PgPool, member_id_attempts: u32) -> Self {
        Self::new(
            Arc::new(PgMemberStore::new(pool)),
            Arc::new(StdRandomSource::from_entropy()),
            member_id_attempts,
        )
    }
}
