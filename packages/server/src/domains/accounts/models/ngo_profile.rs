use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{NgoProfileId, UserId};

/// NGO profile, one-to-one with a user of role NGO
///
/// `verified` is carried for future policy; claims and deletes do not check it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NgoProfile {
    pub id: NgoProfileId,
    pub user_id: UserId,
    pub name: String,
    pub phone: String,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Public contact card for an NGO: the owning user's id, name and email.
///
/// This is the shape clients get for `assignedNgo`; keyed by profile id so
/// the response adapter can look it up from `Case::assigned_ngo_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NgoContact {
    pub ngo_profile_id: NgoProfileId,
    pub user_id: UserId,
    pub name: String,
    pub email: String,
}
