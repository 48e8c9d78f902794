//! In-memory case store for tests and database-less local runs.

use async_trait::async_trait;
use chrono::Utc;
use indexmap::IndexMap;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use super::{CaseStore, StoreError, StoreResult};
use crate::common::{CaseId, NgoProfileId, UserId};
use crate::domains::accounts::{NgoContact, NgoProfile, Principal, User};
use crate::domains::cases::models::{Case, CasePatch, CaseStatus, NewCase};

/// Cases are kept in insertion order so listings and rankings are
/// deterministic. All compare-and-set operations run under the write lock.
#[derive(Default)]
pub struct MemoryCaseStore {
    cases: RwLock<IndexMap<CaseId, Case>>,
    accounts: RwLock<HashMap<UserId, Principal>>,
}

impl MemoryCaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account (and its NGO profile, if any).
    pub async fn insert_account(&self, user: User, ngo_profile: Option<NgoProfile>) {
        self.accounts
            .write()
            .await
            .insert(user.id, Principal { user, ngo_profile });
    }

    /// Insert a fully-formed case, bypassing creation defaults.
    pub async fn insert_case(&self, case: Case) {
        self.cases.write().await.insert(case.id, case);
    }

    pub async fn case_count(&self) -> usize {
        self.cases.read().await.len()
    }

    async fn list_where(&self, keep: impl Fn(&Case) -> bool) -> Vec<Case> {
        let mut cases: Vec<Case> = self
            .cases
            .read()
            .await
            .values()
            .filter(|case| keep(case))
            .cloned()
            .collect();
        cases.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        cases
    }
}

#[async_trait]
impl CaseStore for MemoryCaseStore {
    async fn get_case(&self, id: CaseId) -> StoreResult<Option<Case>> {
        Ok(self.cases.read().await.get(&id).cloned())
    }

    async fn create_case(&self, reported_by: UserId, new_case: NewCase) -> StoreResult<Case> {
        let now = Utc::now();
        let case = Case {
            id: CaseId::new(),
            title: new_case.title,
            description: new_case.description,
            kind: new_case.kind,
            severity: new_case.severity,
            status: CaseStatus::Reported,
            latitude: new_case.location.latitude,
            longitude: new_case.location.longitude,
            image_url: new_case.image_url,
            animal_type: new_case.animal_type,
            animal_count: new_case.animal_count,
            tags: new_case.tags,
            reported_by_id: reported_by,
            assigned_ngo_id: None,
            created_at: now,
            updated_at: now,
        };

        self.cases.write().await.insert(case.id, case.clone());
        debug!(case_id = %case.id, "case stored in memory");
        Ok(case)
    }

    async fn update_case(&self, id: CaseId, patch: CasePatch) -> StoreResult<Case> {
        let mut cases = self.cases.write().await;
        let case = cases.get_mut(&id).ok_or(StoreError::NotFound)?;
        patch.apply_checked(case)?;
        Ok(case.clone())
    }

    async fn delete_case(&self, id: CaseId) -> StoreResult<Case> {
        self.cases
            .write()
            .await
            .shift_remove(&id)
            .ok_or(StoreError::NotFound)
    }

    async fn compare_and_delete(
        &self,
        id: CaseId,
        expected_assignee: Option<NgoProfileId>,
    ) -> StoreResult<Case> {
        let mut cases = self.cases.write().await;
        let current = cases.get(&id).ok_or(StoreError::NotFound)?;
        if current.assigned_ngo_id != expected_assignee {
            return Err(StoreError::Conflict);
        }
        cases.shift_remove(&id).ok_or(StoreError::NotFound)
    }

    async fn compare_and_assign(
        &self,
        id: CaseId,
        expected_assignee: Option<NgoProfileId>,
        new_assignee: NgoProfileId,
        new_status: CaseStatus,
    ) -> StoreResult<Case> {
        let mut cases = self.cases.write().await;
        let case = cases.get_mut(&id).ok_or(StoreError::NotFound)?;
        if case.assigned_ngo_id != expected_assignee {
            return Err(StoreError::Conflict);
        }

        case.assigned_ngo_id = Some(new_assignee);
        case.status = new_status;
        case.updated_at = Utc::now();
        Ok(case.clone())
    }

    async fn list_operational_cases(&self) -> StoreResult<Vec<Case>> {
        Ok(self.list_where(Case::is_operational).await)
    }

    async fn list_adoption_cases(&self) -> StoreResult<Vec<Case>> {
        Ok(self.list_where(Case::is_adoption).await)
    }

    async fn get_user_with_ngo_profile(&self, user_id: UserId) -> StoreResult<Option<Principal>> {
        Ok(self.accounts.read().await.get(&user_id).cloned())
    }

    async fn ngo_contacts(&self, ids: &[NgoProfileId]) -> StoreResult<Vec<NgoContact>> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .filter_map(|principal| {
                let profile = principal.ngo_profile.as_ref()?;
                ids.contains(&profile.id).then(|| NgoContact {
                    ngo_profile_id: profile.id,
                    user_id: principal.user.id,
                    name: principal.user.name.clone(),
                    email: principal.user.email.clone(),
                })
            })
            .collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
