use thiserror::Error;

use crate::common::GeoError;
use crate::domains::cases::models::PatchRejection;
use crate::kernel::store::StoreError;

/// Failures surfaced by the case lifecycle and NGO matching
///
/// The four business kinds are terminal for the request; nothing here is
/// retried. `Storage` wraps infrastructure failures and must not be shown to
/// clients verbatim.
#[derive(Error, Debug)]
pub enum CaseError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Storage failure: {0}")]
    Storage(#[source] anyhow::Error),
}

impl CaseError {
    pub fn invalid(message: impl Into<String>) -> Self {
        CaseError::InvalidArgument(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        CaseError::Forbidden(message.into())
    }

    pub fn case_not_found() -> Self {
        CaseError::NotFound("Case not found".to_string())
    }

    pub fn already_assigned() -> Self {
        CaseError::Conflict("Case already assigned to another NGO".to_string())
    }
}

impl From<GeoError> for CaseError {
    fn from(error: GeoError) -> Self {
        CaseError::InvalidArgument(error.to_string())
    }
}

impl From<PatchRejection> for CaseError {
    fn from(rejection: PatchRejection) -> Self {
        match rejection {
            PatchRejection::Closed => CaseError::Forbidden(rejection.to_string()),
            PatchRejection::InvalidShape(message) => CaseError::InvalidArgument(message),
        }
    }
}

impl From<StoreError> for CaseError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound => CaseError::case_not_found(),
            StoreError::Conflict => CaseError::already_assigned(),
            StoreError::Rejected(rejection) => rejection.into(),
            StoreError::Database(e) => CaseError::Storage(e.into()),
        }
    }
}
