//! Case lifecycle - status transitions, exclusive NGO assignment, and the
//! reporter/NGO write paths around them.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::errors::CaseError;
use super::models::{Case, CaseKind, CasePatch, CaseStatus, NewCase, PatchRejection};
use super::policy::CaseAccessPolicy;
use crate::common::{CaseId, NgoProfileId, UserId};
use crate::domains::accounts::Principal;
use crate::kernel::store::{CaseStore, StoreError};

/// Which listing a delete request came through. A case deleted through the
/// wrong path is reported as missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteScope {
    Case,
    Adoption,
}

impl DeleteScope {
    fn admits(&self, case: &Case) -> bool {
        match self {
            DeleteScope::Case => case.is_operational(),
            DeleteScope::Adoption => case.is_adoption(),
        }
    }

    fn not_found(&self) -> CaseError {
        match self {
            DeleteScope::Case => CaseError::case_not_found(),
            DeleteScope::Adoption => CaseError::NotFound("Adoption not found".to_string()),
        }
    }
}

pub struct CaseLifecycle {
    store: Arc<dyn CaseStore>,
}

impl CaseLifecycle {
    pub fn new(store: Arc<dyn CaseStore>) -> Self {
        Self { store }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub async fn get(&self, case_id: CaseId) -> Result<Case, CaseError> {
        self.load_case(case_id).await
    }

    /// Operational cases, newest first.
    pub async fn list(&self) -> Result<Vec<Case>, CaseError> {
        Ok(self.store.list_operational_cases().await?)
    }

    /// Adoption listings, newest first.
    pub async fn list_adoptions(&self) -> Result<Vec<Case>, CaseError> {
        Ok(self.store.list_adoption_cases().await?)
    }

    // =========================================================================
    // Reporter paths
    // =========================================================================

    /// Create an operational case reported by `acting_user`.
    #[instrument(skip(self, new_case), fields(kind = %new_case.kind))]
    pub async fn report(&self, new_case: NewCase, acting_user: UserId) -> Result<Case, CaseError> {
        if new_case.kind.is_adoption() {
            return Err(CaseError::invalid(
                "Adoption listings must be created through the adoption endpoint",
            ));
        }
        if new_case.severity.is_none() {
            return Err(CaseError::invalid("Severity is required"));
        }
        self.create(new_case, acting_user).await
    }

    /// Create an adoption listing. Kind is forced to Adoption and severity
    /// is dropped.
    #[instrument(skip(self, new_case))]
    pub async fn report_adoption(
        &self,
        mut new_case: NewCase,
        acting_user: UserId,
    ) -> Result<Case, CaseError> {
        new_case.kind = CaseKind::Adoption;
        new_case.severity = None;
        self.create(new_case, acting_user).await
    }

    async fn create(&self, new_case: NewCase, acting_user: UserId) -> Result<Case, CaseError> {
        require_text("Title", &new_case.title)?;
        require_text("Description", &new_case.description)?;
        new_case.location.validate()?;

        if self
            .store
            .get_user_with_ngo_profile(acting_user)
            .await?
            .is_none()
        {
            return Err(CaseError::NotFound("User not found".to_string()));
        }

        let case = self.store.create_case(acting_user, new_case).await?;
        info!(case_id = %case.id, reporter = %acting_user, "case reported");
        Ok(case)
    }

    /// Patch descriptive fields. Status and assignment are not reachable
    /// through here.
    #[instrument(skip(self, patch))]
    pub async fn update(
        &self,
        case_id: CaseId,
        patch: CasePatch,
        acting_user: UserId,
    ) -> Result<Case, CaseError> {
        let case = self.load_case(case_id).await?;

        if !CaseAccessPolicy::can_update(&case, acting_user) {
            return Err(CaseError::forbidden(
                "Only the case creator can update this case",
            ));
        }
        if case.status == CaseStatus::Closed {
            return Err(PatchRejection::Closed.into());
        }
        if patch.is_empty() {
            return Ok(case);
        }

        // Closed state and shape are checked again by the store against the
        // row it writes.
        let updated = self.store.update_case(case_id, patch).await?;
        info!(case_id = %updated.id, "case updated by reporter");
        Ok(updated)
    }

    // =========================================================================
    // NGO paths
    // =========================================================================

    /// Move a case to `requested`.
    ///
    /// Moving an unassigned case into InProgress claims it for the acting
    /// NGO. Every other move requires the acting NGO to already hold it.
    #[instrument(skip(self))]
    pub async fn transition(
        &self,
        case_id: CaseId,
        requested: CaseStatus,
        acting_user: UserId,
    ) -> Result<Case, CaseError> {
        let (case, ngo_id) = self.authorize_ngo(case_id, acting_user).await?;
        self.apply_transition(case, ngo_id, requested).await
    }

    /// Claim a case. Claiming a case the acting NGO already holds returns it
    /// unchanged, whatever its status.
    #[instrument(skip(self))]
    pub async fn claim(&self, case_id: CaseId, acting_user: UserId) -> Result<Case, CaseError> {
        let (case, ngo_id) = self.authorize_ngo(case_id, acting_user).await?;
        if case.assigned_ngo_id == Some(ngo_id) {
            debug!(case_id = %case.id, "claim by current assignee is a no-op");
            return Ok(case);
        }
        self.apply_transition(case, ngo_id, CaseStatus::InProgress)
            .await
    }

    pub async fn delete(&self, case_id: CaseId, acting_user: UserId) -> Result<Case, CaseError> {
        self.delete_scoped(case_id, acting_user, DeleteScope::Case)
            .await
    }

    pub async fn delete_adoption(
        &self,
        case_id: CaseId,
        acting_user: UserId,
    ) -> Result<Case, CaseError> {
        self.delete_scoped(case_id, acting_user, DeleteScope::Adoption)
            .await
    }

    #[instrument(skip(self))]
    async fn delete_scoped(
        &self,
        case_id: CaseId,
        acting_user: UserId,
        scope: DeleteScope,
    ) -> Result<Case, CaseError> {
        let principal = self.load_principal(acting_user).await?;
        let case = self
            .store
            .get_case(case_id)
            .await?
            .filter(|case| scope.admits(case))
            .ok_or_else(|| scope.not_found())?;

        if !CaseAccessPolicy::can_delete(&case, &principal) {
            return Err(delete_denied(&case, &principal));
        }

        let deleted = self
            .store
            .compare_and_delete(case_id, case.assigned_ngo_id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => scope.not_found(),
                other => other.into(),
            })?;

        info!(case_id = %deleted.id, kind = %deleted.kind, "case deleted by assigned NGO");
        Ok(deleted)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn load_case(&self, case_id: CaseId) -> Result<Case, CaseError> {
        self.store
            .get_case(case_id)
            .await?
            .ok_or_else(CaseError::case_not_found)
    }

    async fn load_principal(&self, user_id: UserId) -> Result<Principal, CaseError> {
        self.store
            .get_user_with_ngo_profile(user_id)
            .await?
            .ok_or_else(|| CaseError::forbidden("NGO role required"))
    }

    /// Resolve the acting NGO and the case it wants to act on.
    async fn authorize_ngo(
        &self,
        case_id: CaseId,
        acting_user: UserId,
    ) -> Result<(Case, NgoProfileId), CaseError> {
        let principal = self.load_principal(acting_user).await?;
        let case = self.load_case(case_id).await?;

        if !CaseAccessPolicy::can_claim(&case, &principal) {
            return Err(CaseError::forbidden("NGO role required"));
        }
        let ngo_id = principal
            .ngo_profile
            .as_ref()
            .map(|profile| profile.id)
            .ok_or_else(|| CaseError::forbidden("NGO profile not found"))?;

        Ok((case, ngo_id))
    }

    async fn apply_transition(
        &self,
        case: Case,
        ngo_id: NgoProfileId,
        requested: CaseStatus,
    ) -> Result<Case, CaseError> {
        match case.assigned_ngo_id {
            Some(holder) if holder != ngo_id => {
                warn!(case_id = %case.id, ngo = %ngo_id, "case held by another NGO");
                Err(CaseError::already_assigned())
            }
            Some(_) if case.status == requested => Ok(case),
            Some(_) => {
                let updated = self
                    .store
                    .compare_and_assign(case.id, Some(ngo_id), ngo_id, requested)
                    .await?;
                info!(case_id = %updated.id, from = %case.status, to = %requested, "case status changed");
                Ok(updated)
            }
            None if requested == CaseStatus::InProgress => {
                match self
                    .store
                    .compare_and_assign(case.id, None, ngo_id, CaseStatus::InProgress)
                    .await
                {
                    Ok(claimed) => {
                        info!(case_id = %claimed.id, ngo = %ngo_id, "case claimed");
                        Ok(claimed)
                    }
                    Err(StoreError::Conflict) => {
                        warn!(case_id = %case.id, ngo = %ngo_id, "claim lost to a concurrent NGO");
                        Err(CaseError::already_assigned())
                    }
                    Err(e) => Err(e.into()),
                }
            }
            None => Err(CaseError::forbidden(format!(
                "Case must be claimed before moving to {requested}"
            ))),
        }
    }
}

fn require_text(field: &str, value: &str) -> Result<(), CaseError> {
    if value.trim().is_empty() {
        return Err(CaseError::invalid(format!("{field} is required")));
    }
    Ok(())
}

fn delete_denied(case: &Case, principal: &Principal) -> CaseError {
    if !principal.is_ngo() {
        return CaseError::forbidden("NGO role required");
    }
    match (&principal.ngo_profile, case.assigned_ngo_id) {
        (None, _) => CaseError::forbidden("NGO profile not found"),
        (Some(_), None) => CaseError::forbidden("Only the assigned NGO can delete this case"),
        (Some(_), Some(_)) => CaseError::forbidden("Case assigned to another NGO"),
    }
}
