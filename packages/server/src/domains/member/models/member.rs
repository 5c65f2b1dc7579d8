use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};

use crate::common::nullable;
use crate::common::{FamilyId, MemberId, StoreError};

// ============================================================================
// Enums
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "marital_status")]
pub enum MaritalStatus {
    Married,
    Unmarried,
}

impl MaritalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaritalStatus::Married => "Married",
            MaritalStatus::Unmarried => "Unmarried",
        }
    }
}

// ============================================================================
// Member
// ============================================================================

/// Member model - SQL persistence layer
///
/// `family_id` is derived by the relationship engine and never taken verbatim
/// from a create request.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub member_id: MemberId,
    pub family_id: Option<FamilyId>,

    // Identifier inputs
    pub gender: String,
    pub sub_caste: String,
    pub age: i32,
    pub pincode: String,

    // Relationships
    pub marital_status: MaritalStatus,
    pub spouse_id: Option<MemberId>,
    pub father_id: Option<MemberId>,

    // Descriptive
    pub member_name: Option<String>,
    pub caste: Option<String>,
    pub full_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub if_expired: Option<bool>,
    pub petname: Option<String>,
    pub education: Option<String>,
    pub occupation: Option<String>,
    pub occupation_specific_sector: Option<String>,
    pub occupation_category: Option<String>,
    pub mobile_number: Option<String>,
    pub email: Option<String>,
    pub aadhaar: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A member record that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMember {
    pub member_id: MemberId,
    pub family_id: Option<FamilyId>,
    pub gender: String,
    pub sub_caste: String,
    pub age: i32,
    pub pincode: String,
    pub marital_status: MaritalStatus,
    pub spouse_id: Option<MemberId>,
    pub father_id: Option<MemberId>,
    pub member_name: Option<String>,
    pub caste: Option<String>,
    pub full_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub if_expired: Option<bool>,
    pub petname: Option<String>,
    pub education: Option<String>,
    pub occupation: Option<String>,
    pub occupation_specific_sector: Option<String>,
    pub occupation_category: Option<String>,
    pub mobile_number: Option<String>,
    pub email: Option<String>,
    pub aadhaar: Option<String>,
}

impl NewMember {
    /// Materialize into a stored record with the given primary key.
    pub fn into_member(self, id: i64, now: DateTime<Utc>) -> Member {
        Member {
            id,
            member_id: self.member_id,
            family_id: self.family_id,
            gender: self.gender,
            sub_caste: self.sub_caste,
            age: self.age,
            pincode: self.pincode,
            marital_status: self.marital_status,
            spouse_id: self.spouse_id,
            father_id: self.father_id,
            member_name: self.member_name,
            caste: self.caste,
            full_address: self.full_address,
            city: self.city,
            state: self.state,
            if_expired: self.if_expired,
            petname: self.petname,
            education: self.education,
            occupation: self.occupation,
            occupation_specific_sector: self.occupation_specific_sector,
            occupation_category: self.occupation_category,
            mobile_number: self.mobile_number,
            email: self.email,
            aadhaar: self.aadhaar,
            created_at: now,
            updated_at: now,
        }
    }
}

// ============================================================================
// MemberPatch
// ============================================================================

/// Partial update of a member.
///
/// Outer `None` leaves a field untouched. For nullable fields `Some(None)`
/// clears the stored value. `member_id` and the primary key are not part of
/// the patch and can never change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberPatch {
    #[serde(deserialize_with = "nullable::deserialize", skip_serializing_if = "Option::is_none")]
    pub family_id: Option<Option<FamilyId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_caste: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<MaritalStatus>,
    #[serde(deserialize_with = "nullable::deserialize", skip_serializing_if = "Option::is_none")]
    pub spouse_id: Option<Option<MemberId>>,
    #[serde(deserialize_with = "nullable::deserialize", skip_serializing_if = "Option::is_none")]
    pub father_id: Option<Option<MemberId>>,
    #[serde(deserialize_with = "nullable::deserialize", skip_serializing_if = "Option::is_none")]
    pub member_name: Option<Option<String>>,
    #[serde(deserialize_with = "nullable::deserialize", skip_serializing_if = "Option::is_none")]
    pub caste: Option<Option<String>>,
    #[serde(deserialize_with = "nullable::deserialize", skip_serializing_if = "Option::is_none")]
    pub full_address: Option<Option<String>>,
    #[serde(deserialize_with = "nullable::deserialize", skip_serializing_if = "Option::is_none")]
    pub city: Option<Option<String>>,
    #[serde(deserialize_with = "nullable::deserialize", skip_serializing_if = "Option::is_none")]
    pub state: Option<Option<String>>,
    #[serde(deserialize_with = "nullable::deserialize", skip_serializing_if = "Option::is_none")]
    pub if_expired: Option<Option<bool>>,
    #[serde(deserialize_with = "nullable::deserialize", skip_serializing_if = "Option::is_none")]
    pub petname: Option<Option<String>>,
    #[serde(deserialize_with = "nullable::deserialize", skip_serializing_if = "Option::is_none")]
    pub education: Option<Option<String>>,
    #[serde(deserialize_with = "nullable::deserialize", skip_serializing_if = "Option::is_none")]
    pub occupation: Option<Option<String>>,
    #[serde(deserialize_with = "nullable::deserialize", skip_serializing_if = "Option::is_none")]
    pub occupation_specific_sector: Option<Option<String>>,
    #[serde(deserialize_with = "nullable::deserialize", skip_serializing_if = "Option::is_none")]
    pub occupation_category: Option<Option<String>>,
    #[serde(deserialize_with = "nullable::deserialize", skip_serializing_if = "Option::is_none")]
    pub mobile_number: Option<Option<String>>,
    #[serde(deserialize_with = "nullable::deserialize", skip_serializing_if = "Option::is_none")]
    pub email: Option<Option<String>>,
    #[serde(deserialize_with = "nullable::deserialize", skip_serializing_if = "Option::is_none")]
    pub aadhaar: Option<Option<String>>,
}

fn set<T: Clone>(slot: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *slot = value.clone();
    }
}

impl MemberPatch {
    /// Back-reference written onto a spouse record.
    pub fn spouse_link(spouse_of: MemberId, family_id: Option<Option<FamilyId>>) -> Self {
        Self {
            spouse_id: Some(Some(spouse_of)),
            family_id,
            ..Default::default()
        }
    }

    /// Written onto a former partner when a member leaves or replaces them.
    /// The partner keeps its family id.
    pub fn spouse_unlink() -> Self {
        Self {
            marital_status: Some(MaritalStatus::Unmarried),
            spouse_id: Some(None),
            ..Default::default()
        }
    }

    /// Overlay the patch onto an existing record.
    ///
    /// An `age` outside the `i32` range is ignored here; callers validate it
    /// before a patch reaches a store.
    pub fn apply_to(&self, member: &mut Member) {
        set(&mut member.family_id, &self.family_id);
        set(&mut member.gender, &self.gender);
        set(&mut member.sub_caste, &self.sub_caste);
        if let Some(age) = self.age.and_then(|age| i32::try_from(age).ok()) {
            member.age = age;
        }
        set(&mut member.pincode, &self.pincode);
        set(&mut member.marital_status, &self.marital_status);
        set(&mut member.spouse_id, &self.spouse_id);
        set(&mut member.father_id, &self.father_id);
        set(&mut member.member_name, &self.member_name);
        set(&mut member.caste, &self.caste);
        set(&mut member.full_address, &self.full_address);
        set(&mut member.city, &self.city);
        set(&mut member.state, &self.state);
        set(&mut member.if_expired, &self.if_expired);
        set(&mut member.petname, &self.petname);
        set(&mut member.education, &self.education);
        set(&mut member.occupation, &self.occupation);
        set(
            &mut member.occupation_specific_sector,
            &self.occupation_specific_sector,
        );
        set(&mut member.occupation_category, &self.occupation_category);
        set(&mut member.mobile_number, &self.mobile_number);
        set(&mut member.email, &self.email);
        set(&mut member.aadhaar, &self.aadhaar);
    }

    /// Whether the patch changes marital status relative to `existing`.
    pub fn changes_status_of(&self, existing: &Member) -> bool {
        matches!(self.marital_status, Some(status) if status != existing.marital_status)
    }
}

// ============================================================================
// MemberWrite
// ============================================================================

/// One step of an atomic write batch.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberWrite {
    Create(NewMember),
    Update {
        member_id: MemberId,
        patch: MemberPatch,
    },
}

impl MemberWrite {
    pub fn target(&self) -> &MemberId {
        match self {
            MemberWrite::Create(member) => &member.member_id,
            MemberWrite::Update { member_id, .. } => member_id,
        }
    }
}

// ============================================================================
// SQL
// ============================================================================

fn map_write_error(member_id: &MemberId, error: sqlx::Error) -> StoreError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::DuplicateKey(member_id.clone())
        }
        _ => StoreError::Database(error),
    }
}

impl Member {
    /// Find member by member_id
    pub async fn find_by_member_id(
        member_id: &MemberId,
        pool: &PgPool,
    ) -> Result<Option<Self>, StoreError> {
        sqlx::query_as::<_, Self>("SELECT * FROM members WHERE member_id = $1")
            .bind(member_id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Find all members of one household
    pub async fn find_by_family_id(
        family_id: FamilyId,
        pool: &PgPool,
    ) -> Result<Vec<Self>, StoreError> {
        sqlx::query_as::<_, Self>("SELECT * FROM members WHERE family_id = $1 ORDER BY id")
            .bind(family_id)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>, StoreError> {
        sqlx::query_as::<_, Self>("SELECT * FROM members ORDER BY id")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// Delete a member, returning the removed record
    pub async fn delete(member_id: &MemberId, pool: &PgPool) -> Result<Self, StoreError> {
        sqlx::query_as::<_, Self>("DELETE FROM members WHERE member_id = $1 RETURNING *")
            .bind(member_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(member_id.clone()))
    }

    /// Delete every member of one household
    pub async fn delete_by_family_id(family_id: FamilyId, pool: &PgPool) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM members WHERE family_id = $1")
            .bind(family_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Apply a batch of writes in a single transaction.
    ///
    /// Returns one record per write, in order. Any failure rolls back the
    /// whole batch.
    pub async fn apply_writes(
        writes: Vec<MemberWrite>,
        pool: &PgPool,
    ) -> Result<Vec<Self>, StoreError> {
        let mut tx = pool.begin().await?;
        let mut written = Vec::with_capacity(writes.len());

        for write in writes {
            let member = match write {
                MemberWrite::Create(new_member) => Self::insert(new_member, &mut tx).await?,
                MemberWrite::Update { member_id, patch } => {
                    Self::update(&member_id, &patch, &mut tx).await?
                }
            };
            written.push(member);
        }

        tx.commit().await?;

        Ok(written)
    }

    async fn insert(
        new_member: NewMember,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Self, StoreError> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO members (
                member_id, family_id, gender, sub_caste, age, pincode,
                marital_status, spouse_id, father_id,
                member_name, caste, full_address, city, state, if_expired,
                petname, education, occupation, occupation_specific_sector,
                occupation_category, mobile_number, email, aadhaar
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                    $16, $17, $18, $19, $20, $21, $22, $23)
            RETURNING *
            "#,
        )
        .bind(&new_member.member_id)
        .bind(new_member.family_id)
        .bind(&new_member.gender)
        .bind(&new_member.sub_caste)
        .bind(new_member.age)
        .bind(&new_member.pincode)
        .bind(new_member.marital_status)
        .bind(&new_member.spouse_id)
        .bind(&new_member.father_id)
        .bind(&new_member.member_name)
        .bind(&new_member.caste)
        .bind(&new_member.full_address)
        .bind(&new_member.city)
        .bind(&new_member.state)
        .bind(new_member.if_expired)
        .bind(&new_member.petname)
        .bind(&new_member.education)
        .bind(&new_member.occupation)
        .bind(&new_member.occupation_specific_sector)
        .bind(&new_member.occupation_category)
        .bind(&new_member.mobile_number)
        .bind(&new_member.email)
        .bind(&new_member.aadhaar)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| map_write_error(&new_member.member_id, e))
    }

    /// Read-modify-write under a row lock so concurrent patches serialize.
    async fn update(
        member_id: &MemberId,
        patch: &MemberPatch,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Self, StoreError> {
        let mut member =
            sqlx::query_as::<_, Self>("SELECT * FROM members WHERE member_id = $1 FOR UPDATE")
                .bind(member_id)
                .fetch_optional(&mut **tx)
                .await?
                .ok_or_else(|| StoreError::NotFound(member_id.clone()))?;

        patch.apply_to(&mut member);

        sqlx::query_as::<_, Self>(
            r#"
            UPDATE members
            SET family_id = $2,
                gender = $3,
                sub_caste = $4,
                age = $5,
                pincode = $6,
                marital_status = $7,
                spouse_id = $8,
                father_id = $9,
                member_name = $10,
                caste = $11,
                full_address = $12,
                city = $13,
                state = $14,
                if_expired = $15,
                petname = $16,
                education = $17,
                occupation = $18,
                occupation_specific_sector = $19,
                occupation_category = $20,
                mobile_number = $21,
                email = $22,
                aadhaar = $23,
                updated_at = NOW()
            WHERE member_id = $1
            RETURNING *
            "#,
        )
        .bind(&member.member_id)
        .bind(member.family_id)
        .bind(&member.gender)
        .bind(&member.sub_caste)
        .bind(member.age)
        .bind(&member.pincode)
        .bind(member.marital_status)
        .bind(&member.spouse_id)
        .bind(&member.father_id)
        .bind(&member.member_name)
        .bind(&member.caste)
        .bind(&member.full_address)
        .bind(&member.city)
        .bind(&member.state)
        .bind(member.if_expired)
        .bind(&member.petname)
        .bind(&member.education)
        .bind(&member.occupation)
        .bind(&member.occupation_specific_sector)
        .bind(&member.occupation_category)
        .bind(&member.mobile_number)
        .bind(&member.email)
        .bind(&member.aadhaar)
        .fetch_one(&mut **tx)
        .await
        .map_err(Into::into)
    }
}
