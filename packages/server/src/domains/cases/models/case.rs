use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{CaseId, GeoPoint, NgoProfileId, UserId};

/// Severity rank given to cases without a severity; sorts after every real one.
pub const UNRANKED_SEVERITY: u16 = 999;

/// Case - a reported welfare incident or an adoption listing
///
/// `reported_by_id` and `created_at` are written once at insert and never
/// touched again. `assigned_ngo_id` only changes through the claim path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    pub id: CaseId,

    // Content
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: CaseKind,
    pub severity: Option<CaseSeverity>,
    pub status: CaseStatus,

    // Location
    pub latitude: f64,
    pub longitude: f64,

    // Animal metadata
    pub image_url: Option<String>,
    pub animal_type: Option<String>,
    pub animal_count: Option<i32>,
    pub tags: Vec<String>,

    // Ownership
    pub reported_by_id: UserId,
    pub assigned_ngo_id: Option<NgoProfileId>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Case {
    pub fn location(&self) -> GeoPoint {
        GeoPoint {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    pub fn is_adoption(&self) -> bool {
        self.kind.is_adoption()
    }

    /// Operational cases are everything NGO matching and the general
    /// listing can see.
    pub fn is_operational(&self) -> bool {
        !self.is_adoption()
    }

    /// Non-empty text, finite coordinates, and a severity that matches the
    /// kind. Returns the first violation as a client-facing message.
    pub fn check_shape(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title is required".to_string());
        }
        if self.description.trim().is_empty() {
            return Err("Description is required".to_string());
        }
        self.location().validate().map_err(|e| e.to_string())?;

        match (self.is_adoption(), self.severity) {
            (true, Some(_)) => Err("Adoption listings cannot have a severity".to_string()),
            (false, None) => Err("Severity is required".to_string()),
            _ => Ok(()),
        }
    }

    pub fn severity_rank(&self) -> u16 {
        self.severity
            .map(|severity| severity.rank())
            .unwrap_or(UNRANKED_SEVERITY)
    }
}

// =============================================================================
// Enums
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "case_kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseKind {
    Injured,
    Abuse,
    Sick,
    Stray,
    Adoption,
    Other,
}

impl CaseKind {
    pub const ALL: [CaseKind; 6] = [
        CaseKind::Injured,
        CaseKind::Abuse,
        CaseKind::Sick,
        CaseKind::Stray,
        CaseKind::Adoption,
        CaseKind::Other,
    ];

    pub fn is_adoption(&self) -> bool {
        matches!(self, CaseKind::Adoption)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CaseKind::Injured => "INJURED",
            CaseKind::Abuse => "ABUSE",
            CaseKind::Sick => "SICK",
            CaseKind::Stray => "STRAY",
            CaseKind::Adoption => "ADOPTION",
            CaseKind::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for CaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CaseKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        CaseKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow::anyhow!("Invalid case type: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "case_severity")]
pub enum CaseSeverity {
    Critical,
    Urgent,
    Moderate,
    Low,
}

impl CaseSeverity {
    /// Ordering key for matching, lower = more urgent
    pub fn rank(&self) -> u16 {
        match self {
            CaseSeverity::Critical => 1,
            CaseSeverity::Urgent => 2,
            CaseSeverity::Moderate => 3,
            CaseSeverity::Low => 4,
        }
    }
}

impl std::fmt::Display for CaseSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaseSeverity::Critical => write!(f, "Critical"),
            CaseSeverity::Urgent => write!(f, "Urgent"),
            CaseSeverity::Moderate => write!(f, "Moderate"),
            CaseSeverity::Low => write!(f, "Low"),
        }
    }
}

impl std::str::FromStr for CaseSeverity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "Critical" => Ok(CaseSeverity::Critical),
            "Urgent" => Ok(CaseSeverity::Urgent),
            "Moderate" => Ok(CaseSeverity::Moderate),
            "Low" => Ok(CaseSeverity::Low),
            _ => Err(anyhow::anyhow!("Invalid severity: {}", s)),
        }
    }
}

/// Case status. Every state can be re-entered; Resolved and Closed are end
/// states by convention only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "case_status")]
pub enum CaseStatus {
    #[default]
    Reported,
    InProgress,
    Resolved,
    Closed,
}

impl CaseStatus {
    pub const ALL: [CaseStatus; 4] = [
        CaseStatus::Reported,
        CaseStatus::InProgress,
        CaseStatus::Resolved,
        CaseStatus::Closed,
    ];
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaseStatus::Reported => write!(f, "Reported"),
            CaseStatus::InProgress => write!(f, "InProgress"),
            CaseStatus::Resolved => write!(f, "Resolved"),
            CaseStatus::Closed => write!(f, "Closed"),
        }
    }
}

impl std::str::FromStr for CaseStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "Reported" => Ok(CaseStatus::Reported),
            "InProgress" => Ok(CaseStatus::InProgress),
            "Resolved" => Ok(CaseStatus::Resolved),
            "Closed" => Ok(CaseStatus::Closed),
            _ => Err(anyhow::anyhow!(
                "Invalid status. Must be one of: Reported, InProgress, Resolved, Closed"
            )),
        }
    }
}
