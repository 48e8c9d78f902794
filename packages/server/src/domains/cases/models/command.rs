use chrono::Utc;
use thiserror::Error;
use typed_builder::TypedBuilder;

use super::case::{Case, CaseKind, CaseSeverity, CaseStatus};
use crate::common::GeoPoint;

/// Typed input for creating a case
///
/// Built by the HTTP boundary after normalizing the raw request body; the
/// reporter comes from the authenticated caller, not from here.
#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct NewCase {
    #[builder(setter(into))]
    pub title: String,
    #[builder(setter(into))]
    pub description: String,
    pub kind: CaseKind,
    #[builder(default, setter(strip_option))]
    pub severity: Option<CaseSeverity>,
    pub location: GeoPoint,
    #[builder(default, setter(strip_option, into))]
    pub image_url: Option<String>,
    #[builder(default, setter(strip_option, into))]
    pub animal_type: Option<String>,
    #[builder(default, setter(strip_option))]
    pub animal_count: Option<i32>,
    #[builder(default)]
    pub tags: Vec<String>,
}

/// Why a patch was refused against the case as currently stored
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatchRejection {
    #[error("Closed cases cannot be updated")]
    Closed,

    #[error("{0}")]
    InvalidShape(String),
}

/// Partial update of a case's descriptive fields
///
/// Status and assignment are not patchable; they only move through the
/// lifecycle's transition/claim path. Nullable columns use a
/// nested `Option` so "clear" (`Some(None)`) differs from "leave" (`None`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CasePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub kind: Option<CaseKind>,
    pub severity: Option<Option<CaseSeverity>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub animal_type: Option<Option<String>>,
    pub animal_count: Option<Option<i32>>,
    pub tags: Option<Vec<String>>,
}

impl CasePatch {
    pub fn is_empty(&self) -> bool {
        *self == CasePatch::default()
    }

    /// Apply the patch to `case` in place and bump `updated_at`.
    pub fn apply_to(&self, case: &mut Case) {
        if let Some(title) = &self.title {
            case.title = title.clone();
        }
        if let Some(description) = &self.description {
            case.description = description.clone();
        }
        if let Some(kind) = self.kind {
            case.kind = kind;
        }
        if let Some(severity) = self.severity {
            case.severity = severity;
        }
        if let Some(latitude) = self.latitude {
            case.latitude = latitude;
        }
        if let Some(longitude) = self.longitude {
            case.longitude = longitude;
        }
        if let Some(animal_type) = &self.animal_type {
            case.animal_type = animal_type.clone();
        }
        if let Some(animal_count) = self.animal_count {
            case.animal_count = animal_count;
        }
        if let Some(tags) = &self.tags {
            case.tags = tags.clone();
        }
        case.updated_at = Utc::now();
    }

    /// Apply the patch only if `case` still accepts it: not Closed, and
    /// well-formed afterwards. Stores call this on the row they hold locked,
    /// so the check and the write see the same state. `case` is left
    /// untouched on rejection.
    pub fn apply_checked(&self, case: &mut Case) -> Result<(), PatchRejection> {
        if case.status == CaseStatus::Closed {
            return Err(PatchRejection::Closed);
        }
        let next = self.preview(case);
        next.check_shape().map_err(PatchRejection::InvalidShape)?;
        *case = next;
        Ok(())
    }

    /// The case as it would look after this patch.
    pub fn preview(&self, case: &Case) -> Case {
        let mut next = case.clone();
        self.apply_to(&mut next);
        next
    }
}
