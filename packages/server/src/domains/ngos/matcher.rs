use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::common::{GeoPoint, UserId};
use crate::domains::cases::models::Case;
use crate::domains::cases::CaseError;
use crate::kernel::store::CaseStore;

/// Search radius used when the caller does not pass one.
pub const DEFAULT_RADIUS_KM: f64 = 5.0;

/// A case together with its distance from the search origin.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCase {
    pub case: Case,
    pub distance_km: f64,
}

/// Keep the cases within `radius_km` of `origin`, most severe first, nearest
/// first within a severity.
///
/// The sort is stable, so equal keys keep the input order. Cases with
/// unusable coordinates are skipped.
pub fn rank_nearby(cases: Vec<Case>, origin: GeoPoint, radius_km: f64) -> Vec<RankedCase> {
    let mut ranked: Vec<RankedCase> = cases
        .into_iter()
        .filter_map(|case| match origin.distance_km(&case.location()) {
            Ok(distance_km) => Some(RankedCase { case, distance_km }),
            Err(e) => {
                warn!(case_id = %case.id, error = %e, "skipping case with invalid location");
                None
            }
        })
        .filter(|ranked| ranked.distance_km <= radius_km)
        .collect();

    ranked.sort_by(|a, b| {
        a.case
            .severity_rank()
            .cmp(&b.case.severity_rank())
            .then(a.distance_km.total_cmp(&b.distance_km))
    });
    ranked
}

/// Finds operational cases near an NGO
pub struct NgoMatcher {
    store: Arc<dyn CaseStore>,
    default_radius_km: f64,
}

impl NgoMatcher {
    pub fn new(store: Arc<dyn CaseStore>, default_radius_km: f64) -> Self {
        Self {
            store,
            default_radius_km,
        }
    }

    pub fn default_radius_km(&self) -> f64 {
        self.default_radius_km
    }

    /// Operational cases within `radius_km` (default radius when `None`) of
    /// `origin`, ranked by severity then distance. Assigned cases are
    /// included.
    #[instrument(skip(self))]
    pub async fn nearby(
        &self,
        acting_user: UserId,
        origin: GeoPoint,
        radius_km: Option<f64>,
    ) -> Result<Vec<Case>, CaseError> {
        origin
            .validate()
            .map_err(|_| CaseError::invalid("lat and lng are required"))?;

        let radius_km = radius_km.unwrap_or(self.default_radius_km);
        if !radius_km.is_finite() || radius_km < 0.0 {
            return Err(CaseError::invalid(
                "radius must be a non-negative number of kilometers",
            ));
        }

        let principal = self.store.get_user_with_ngo_profile(acting_user).await?;
        let is_ngo_with_profile = principal
            .as_ref()
            .is_some_and(|p| p.is_ngo() && p.ngo_profile.is_some());
        if !is_ngo_with_profile {
            return Err(CaseError::forbidden("NGO account required"));
        }

        let candidates = self.store.list_operational_cases().await?;
        let total = candidates.len();
        let ranked = rank_nearby(candidates, origin, radius_km);

        debug!(total, matched = ranked.len(), radius_km, "nearby cases ranked");
        Ok(ranked.into_iter().map(|r| r.case).collect())
    }
}
