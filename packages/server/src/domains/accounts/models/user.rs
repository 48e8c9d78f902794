use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ngo_profile::NgoProfile;
use crate::common::{Role, UserId};

/// User account as seen by the case core
///
/// Registration and credentials live with the auth service; only the
/// identity, contact and role columns are read here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// An authenticated caller resolved from storage: the account plus its NGO
/// profile when it has one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user: User,
    pub ngo_profile: Option<NgoProfile>,
}

impl Principal {
    pub fn role(&self) -> Role {
        self.user.role
    }

    pub fn is_ngo(&self) -> bool {
        self.user.role.is_ngo()
    }
}
