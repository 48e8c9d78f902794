//! `/cases` routes - operational cases

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::common::{CaseId, Role};
use crate::domains::cases::data::{
    case_patch_from_body, new_case_from_body, present_case, present_cases, status_from_body,
    CaseData,
};
use crate::domains::cases::CaseError;
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::middleware::{require_auth, require_role, AuthUser};

/// Ids that do not parse cannot name an existing case.
pub(crate) fn parse_case_id(raw: &str) -> Result<CaseId, CaseError> {
    CaseId::parse(raw).map_err(|_| CaseError::case_not_found())
}

pub async fn list_cases_handler(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<CaseData>>, ApiError> {
    let cases = state.deps.lifecycle.list().await?;
    Ok(Json(present_cases(state.deps.store.as_ref(), cases).await?))
}

pub async fn get_case_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CaseData>, ApiError> {
    let case = state.deps.lifecycle.get(parse_case_id(&id)?).await?;
    Ok(Json(present_case(state.deps.store.as_ref(), case).await?))
}

pub async fn create_case_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<CaseData>), ApiError> {
    let actor = require_auth(auth)?;
    let new_case = new_case_from_body(&body)?;

    let case = state.deps.lifecycle.report(new_case, actor.user_id()).await?;
    let data = present_case(state.deps.store.as_ref(), case).await?;
    Ok((StatusCode::CREATED, Json(data)))
}

pub async fn update_case_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<CaseData>, ApiError> {
    let actor = require_auth(auth)?;
    let case_id = parse_case_id(&id)?;
    let patch = case_patch_from_body(&body)?;

    let case = state
        .deps
        .lifecycle
        .update(case_id, patch, actor.user_id())
        .await?;
    Ok(Json(present_case(state.deps.store.as_ref(), case).await?))
}

/// Change a case's status, or claim it when the body carries no status.
pub async fn update_case_status_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    Path(id): Path<String>,
    body: Option<Json<Value>>,
) -> Result<Json<CaseData>, ApiError> {
    let actor = require_role(auth, Role::Ngo)?;
    let case_id = parse_case_id(&id)?;
    let body = body.map(|Json(value)| value).unwrap_or(Value::Null);

    let lifecycle = &state.deps.lifecycle;
    let case = match status_from_body(&body)? {
        Some(status) => lifecycle.transition(case_id, status, actor.user_id()).await?,
        None => lifecycle.claim(case_id, actor.user_id()).await?,
    };
    Ok(Json(present_case(state.deps.store.as_ref(), case).await?))
}

pub async fn delete_case_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    Path(id): Path<String>,
) -> Result<Json<CaseData>, ApiError> {
    let actor = require_role(auth, Role::Ngo)?;
    let case = state
        .deps
        .lifecycle
        .delete(parse_case_id(&id)?, actor.user_id())
        .await?;
    Ok(Json(present_case(state.deps.store.as_ref(), case).await?))
}
