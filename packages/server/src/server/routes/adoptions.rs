//! `/adoptions` routes - adoption listings

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::common::{CaseId, Role};
use crate::domains::cases::data::{new_adoption_from_body, present_case, present_cases, CaseData};
use crate::domains::cases::CaseError;
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::middleware::{require_auth, require_role, AuthUser};

pub async fn list_adoptions_handler(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<CaseData>>, ApiError> {
    let listings = state.deps.lifecycle.list_adoptions().await?;
    Ok(Json(present_cases(state.deps.store.as_ref(), listings).await?))
}

pub async fn create_adoption_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<CaseData>), ApiError> {
    let actor = require_auth(auth)?;
    let listing = new_adoption_from_body(&body)?;

    let case = state
        .deps
        .lifecycle
        .report_adoption(listing, actor.user_id())
        .await?;
    let data = present_case(state.deps.store.as_ref(), case).await?;
    Ok((StatusCode::CREATED, Json(data)))
}

pub async fn delete_adoption_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    Path(id): Path<String>,
) -> Result<Json<CaseData>, ApiError> {
    let actor = require_role(auth, Role::Ngo)?;
    let case_id = CaseId::parse(&id)
        .map_err(|_| CaseError::NotFound("Adoption not found".to_string()))?;

    let case = state
        .deps
        .lifecycle
        .delete_adoption(case_id, actor.user_id())
        .await?;
    Ok(Json(present_case(state.deps.store.as_ref(), case).await?))
}
