//! Case storage - the persistence seam of the case core
//!
//! The lifecycle and matcher only see [`CaseStore`]. Every write that must be
//! exclusive (claiming, deleting) is a single conditional operation on the
//! store, never a read followed by an unconditional write.

mod memory;
mod postgres;

pub use memory::MemoryCaseStore;
pub use postgres::PostgresCaseStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::common::{CaseId, NgoProfileId, UserId};
use crate::domains::accounts::{NgoContact, Principal};
use crate::domains::cases::models::{Case, CasePatch, CaseStatus, NewCase, PatchRejection};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    /// A compare-and-set found a different assignee than expected.
    #[error("assignment changed concurrently")]
    Conflict,

    /// The stored case refused a patch when checked under the write lock.
    #[error("patch rejected: {0}")]
    Rejected(#[from] PatchRejection),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait CaseStore: Send + Sync {
    async fn get_case(&self, id: CaseId) -> StoreResult<Option<Case>>;

    /// Insert a new case as `Reported` and unassigned.
    async fn create_case(&self, reported_by: UserId, new_case: NewCase) -> StoreResult<Case>;

    /// Apply a descriptive-field patch through [`CasePatch::apply_checked`]
    /// on the locked current row. `NotFound` if the case is gone, `Rejected`
    /// if it is Closed or the result would be malformed.
    async fn update_case(&self, id: CaseId, patch: CasePatch) -> StoreResult<Case>;

    async fn delete_case(&self, id: CaseId) -> StoreResult<Case>;

    /// Delete the case only if its assignee still equals `expected_assignee`.
    ///
    /// `NotFound` if the case is gone, `Conflict` if the assignee differs.
    async fn compare_and_delete(
        &self,
        id: CaseId,
        expected_assignee: Option<NgoProfileId>,
    ) -> StoreResult<Case>;

    /// Set assignee and status only if the current assignee equals
    /// `expected_assignee` (`None` = still unassigned).
    ///
    /// This is the claim primitive: of N concurrent callers expecting `None`
    /// exactly one observes success, the rest get `Conflict`.
    async fn compare_and_assign(
        &self,
        id: CaseId,
        expected_assignee: Option<NgoProfileId>,
        new_assignee: NgoProfileId,
        new_status: CaseStatus,
    ) -> StoreResult<Case>;

    /// Every non-adoption case, newest first.
    async fn list_operational_cases(&self) -> StoreResult<Vec<Case>>;

    /// Every adoption listing, newest first.
    async fn list_adoption_cases(&self) -> StoreResult<Vec<Case>>;

    async fn get_user_with_ngo_profile(&self, user_id: UserId) -> StoreResult<Option<Principal>>;

    /// Contact cards for the given NGO profiles. Unknown ids are skipped.
    async fn ngo_contacts(&self, ids: &[NgoProfileId]) -> StoreResult<Vec<NgoContact>>;

    /// Cheap liveness probe for health checks.
    async fn ping(&self) -> StoreResult<()>;
}
