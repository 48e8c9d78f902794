//! `/ngo` routes - NGO-only views

use axum::extract::{Extension, Query};
use axum::Json;
use serde::Deserialize;

use crate::common::{GeoPoint, Role};
use crate::domains::cases::data::{present_cases, CaseData};
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::middleware::{require_role, AuthUser};

/// Query strings are taken as text so that missing or malformed numbers
/// reach validation instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub radius_km: Option<String>,
}

fn number(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(f64::NAN)
}

pub async fn nearby_cases_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<Vec<CaseData>>, ApiError> {
    let actor = require_role(auth, Role::Ngo)?;

    let origin = GeoPoint {
        latitude: number(query.lat.as_deref()),
        longitude: number(query.lng.as_deref()),
    };
    let radius_km = query.radius_km.as_deref().map(|raw| number(Some(raw)));

    let cases = state
        .deps
        .matcher
        .nearby(actor.user_id(), origin, radius_km)
        .await?;
    Ok(Json(present_cases(state.deps.store.as_ref(), cases).await?))
}
