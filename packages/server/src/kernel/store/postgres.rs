//! PostgreSQL-backed case store.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use super::{CaseStore, StoreError, StoreResult};
use crate::common::{CaseId, NgoProfileId, UserId};
use crate::domains::accounts::{NgoContact, NgoProfile, Principal, User};
use crate::domains::cases::models::{Case, CasePatch, CaseStatus, NewCase};

const CASE_COLUMNS: &str = "id, title, description, kind, severity, status, latitude, longitude, \
     image_url, animal_type, animal_count, tags, reported_by_id, assigned_ngo_id, \
     created_at, updated_at";

pub struct PostgresCaseStore {
    pool: PgPool,
}

impl PostgresCaseStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn case_exists(&self, id: CaseId) -> StoreResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM cases WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Tell a lost compare-and-set apart from a vanished row.
    async fn conflict_or_missing(&self, id: CaseId) -> StoreError {
        match self.case_exists(id).await {
            Ok(true) => StoreError::Conflict,
            Ok(false) => StoreError::NotFound,
            Err(e) => e,
        }
    }
}

#[async_trait]
impl CaseStore for PostgresCaseStore {
    #[instrument(skip(self))]
    async fn get_case(&self, id: CaseId) -> StoreResult<Option<Case>> {
        let case = sqlx::query_as::<_, Case>(&format!(
            "SELECT {CASE_COLUMNS} FROM cases WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(case)
    }

    #[instrument(skip(self, new_case), fields(kind = %new_case.kind))]
    async fn create_case(&self, reported_by: UserId, new_case: NewCase) -> StoreResult<Case> {
        let case = sqlx::query_as::<_, Case>(&format!(
            "INSERT INTO cases (
                id, title, description, kind, severity, status, latitude, longitude,
                image_url, animal_type, animal_count, tags, reported_by_id
             )
             VALUES ($1, $2, $3, $4, $5, 'Reported', $6, $7, $8, $9, $10, $11, $12)
             RETURNING {CASE_COLUMNS}"
        ))
        .bind(CaseId::new())
        .bind(&new_case.title)
        .bind(&new_case.description)
        .bind(new_case.kind)
        .bind(new_case.severity)
        .bind(new_case.location.latitude)
        .bind(new_case.location.longitude)
        .bind(&new_case.image_url)
        .bind(&new_case.animal_type)
        .bind(new_case.animal_count)
        .bind(&new_case.tags)
        .bind(reported_by)
        .fetch_one(&self.pool)
        .await?;

        debug!(case_id = %case.id, "case inserted");
        Ok(case)
    }

    #[instrument(skip(self, patch))]
    async fn update_case(&self, id: CaseId, patch: CasePatch) -> StoreResult<Case> {
        let mut tx = self.pool.begin().await?;

        let mut case = sqlx::query_as::<_, Case>(&format!(
            "SELECT {CASE_COLUMNS} FROM cases WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StoreError::NotFound)?;

        // Rolled back on drop if the locked row refuses the patch
        patch.apply_checked(&mut case)?;

        let updated = sqlx::query_as::<_, Case>(&format!(
            "UPDATE cases
             SET title = $2,
                 description = $3,
                 kind = $4,
                 severity = $5,
                 latitude = $6,
                 longitude = $7,
                 animal_type = $8,
                 animal_count = $9,
                 tags = $10,
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {CASE_COLUMNS}"
        ))
        .bind(id)
        .bind(&case.title)
        .bind(&case.description)
        .bind(case.kind)
        .bind(case.severity)
        .bind(case.latitude)
        .bind(case.longitude)
        .bind(&case.animal_type)
        .bind(case.animal_count)
        .bind(&case.tags)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete_case(&self, id: CaseId) -> StoreResult<Case> {
        sqlx::query_as::<_, Case>(&format!(
            "DELETE FROM cases WHERE id = $1 RETURNING {CASE_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    #[instrument(skip(self))]
    async fn compare_and_delete(
        &self,
        id: CaseId,
        expected_assignee: Option<NgoProfileId>,
    ) -> StoreResult<Case> {
        let deleted = sqlx::query_as::<_, Case>(&format!(
            "DELETE FROM cases
             WHERE id = $1 AND assigned_ngo_id IS NOT DISTINCT FROM $2
             RETURNING {CASE_COLUMNS}"
        ))
        .bind(id)
        .bind(expected_assignee)
        .fetch_optional(&self.pool)
        .await?;

        match deleted {
            Some(case) => Ok(case),
            None => Err(self.conflict_or_missing(id).await),
        }
    }

    #[instrument(skip(self))]
    async fn compare_and_assign(
        &self,
        id: CaseId,
        expected_assignee: Option<NgoProfileId>,
        new_assignee: NgoProfileId,
        new_status: CaseStatus,
    ) -> StoreResult<Case> {
        // Single statement: the row lock taken by UPDATE serializes racing
        // claimers, and the loser re-evaluates the WHERE against the winner's row.
        let updated = sqlx::query_as::<_, Case>(&format!(
            "UPDATE cases
             SET assigned_ngo_id = $3,
                 status = $4,
                 updated_at = NOW()
             WHERE id = $1 AND assigned_ngo_id IS NOT DISTINCT FROM $2
             RETURNING {CASE_COLUMNS}"
        ))
        .bind(id)
        .bind(expected_assignee)
        .bind(new_assignee)
        .bind(new_status)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(case) => Ok(case),
            None => Err(self.conflict_or_missing(id).await),
        }
    }

    async fn list_operational_cases(&self) -> StoreResult<Vec<Case>> {
        let cases = sqlx::query_as::<_, Case>(&format!(
            "SELECT {CASE_COLUMNS} FROM cases
             WHERE kind <> 'ADOPTION'
             ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(cases)
    }

    async fn list_adoption_cases(&self) -> StoreResult<Vec<Case>> {
        let cases = sqlx::query_as::<_, Case>(&format!(
            "SELECT {CASE_COLUMNS} FROM cases
             WHERE kind = 'ADOPTION'
             ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(cases)
    }

    #[instrument(skip(self))]
    async fn get_user_with_ngo_profile(&self, user_id: UserId) -> StoreResult<Option<Principal>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, role, created_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(user) = user else {
            return Ok(None);
        };

        let ngo_profile = sqlx::query_as::<_, NgoProfile>(
            "SELECT id, user_id, name, phone, verified, created_at
             FROM ngo_profiles
             WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(Some(Principal { user, ngo_profile }))
    }

    async fn ngo_contacts(&self, ids: &[NgoProfileId]) -> StoreResult<Vec<NgoContact>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let contacts = sqlx::query_as::<_, NgoContact>(
            "SELECT p.id AS ngo_profile_id, u.id AS user_id, u.name, u.email
             FROM ngo_profiles p
             JOIN users u ON u.id = p.user_id
             WHERE p.id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(contacts)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
