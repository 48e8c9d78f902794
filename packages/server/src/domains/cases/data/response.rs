use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::common::NgoProfileId;
use crate::domains::accounts::NgoContact;
use crate::domains::cases::errors::CaseError;
use crate::domains::cases::models::{Case, CaseKind, CaseSeverity, CaseStatus};
use crate::kernel::store::CaseStore;

/// API representation of a case
///
/// Same fields as [`Case`] plus `assignedNgo`, the holding NGO's user
/// identity. Clients key off the user id, not the profile id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseData {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: CaseKind,
    pub severity: Option<CaseSeverity>,
    pub status: CaseStatus,

    // Location
    pub latitude: f64,
    pub longitude: f64,

    pub image_url: Option<String>,
    pub animal_type: Option<String>,
    pub animal_count: Option<i32>,
    pub tags: Vec<String>,

    pub reported_by_id: String,
    pub assigned_ngo_id: Option<String>,
    pub assigned_ngo: Option<AssignedNgoData>,

    // Timestamps
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedNgoData {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&NgoContact> for AssignedNgoData {
    fn from(contact: &NgoContact) -> Self {
        Self {
            id: contact.user_id.to_string(),
            name: contact.name.clone(),
            email: contact.email.clone(),
        }
    }
}

impl CaseData {
    pub fn from_case(case: Case, contacts: &HashMap<NgoProfileId, NgoContact>) -> Self {
        let assigned_ngo = case
            .assigned_ngo_id
            .and_then(|id| contacts.get(&id))
            .map(AssignedNgoData::from);

        Self {
            id: case.id.to_string(),
            title: case.title,
            description: case.description,
            kind: case.kind,
            severity: case.severity,
            status: case.status,
            latitude: case.latitude,
            longitude: case.longitude,
            image_url: case.image_url,
            animal_type: case.animal_type,
            animal_count: case.animal_count,
            tags: case.tags,
            reported_by_id: case.reported_by_id.to_string(),
            assigned_ngo_id: case.assigned_ngo_id.map(|id| id.to_string()),
            assigned_ngo,
            created_at: case.created_at.to_rfc3339(),
            updated_at: case.updated_at.to_rfc3339(),
        }
    }
}

/// Denormalize a batch of cases, fetching every referenced NGO contact in
/// one store call. Order is preserved.
pub async fn present_cases(
    store: &dyn CaseStore,
    cases: Vec<Case>,
) -> Result<Vec<CaseData>, CaseError> {
    let mut ids: Vec<NgoProfileId> = cases.iter().filter_map(|c| c.assigned_ngo_id).collect();
    ids.sort();
    ids.dedup();

    let contacts: HashMap<NgoProfileId, NgoContact> = store
        .ngo_contacts(&ids)
        .await?
        .into_iter()
        .map(|contact| (contact.ngo_profile_id, contact))
        .collect();

    Ok(cases
        .into_iter()
        .map(|case| CaseData::from_case(case, &contacts))
        .collect())
}

pub async fn present_case(store: &dyn CaseStore, case: Case) -> Result<CaseData, CaseError> {
    let mut presented = present_cases(store, vec![case]).await?;
    presented.pop().ok_or_else(CaseError::case_not_found)
}
