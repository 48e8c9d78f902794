use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role, fixed at signup.
///
/// Citizens report cases; NGO accounts own an NGO profile and may claim,
/// progress and delete cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role")]
pub enum Role {
    Citizen,
    #[serde(rename = "NGO")]
    #[sqlx(rename = "NGO")]
    Ngo,
}

impl Role {
    pub fn is_ngo(&self) -> bool {
        matches!(self, Role::Ngo)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Citizen => write!(f, "Citizen"),
            Role::Ngo => write!(f, "NGO"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "Citizen" => Ok(Role::Citizen),
            "NGO" => Ok(Role::Ngo),
            _ => Err(anyhow::anyhow!("Invalid role: {}", s)),
        }
    }
}
