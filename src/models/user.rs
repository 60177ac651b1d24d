use crate::core::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Access level attached to an account and copied into its session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Citizen,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Citizen => "citizen",
        }
    }

    /// Whether a session holding this role may enter a route gated on `required`.
    /// Roles do not nest: an admin is not a citizen.
    pub fn satisfies(self, required: Role) -> bool {
        self == required
    }

    /// Where a freshly logged-in user lands
    pub fn home(self) -> &'static str {
        match self {
            Role::Admin => "/operator_dashboard",
            Role::Citizen => "/client_dashboard",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "citizen" => Ok(Role::Citizen),
            other => Err(ModelError::UnknownRole(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Argon2id PHC string, see `utils::auth`
    #[serde(skip)]
    pub password_hash: String,
    pub role: Role,
}
