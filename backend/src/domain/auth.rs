//! Request-scoped session context.
//!
//! Authentication itself is delegated to an external provider; the backend
//! only consumes the identity it forwards. Every service call that touches
//! organisation data takes a `SessionUser` explicitly rather than reading
//! ambient global state.

use serde::{Deserialize, Serialize};

/// Role carried by the session, ordered from most to least privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Owner,
    Admin,
    Supervisor,
    Staff,
}

impl UserRole {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "OWNER" => Some(UserRole::Owner),
            "ADMIN" => Some(UserRole::Admin),
            "SUPERVISOR" => Some(UserRole::Supervisor),
            "STAFF" => Some(UserRole::Staff),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Owner => "OWNER",
            UserRole::Admin => "ADMIN",
            UserRole::Supervisor => "SUPERVISOR",
            UserRole::Staff => "STAFF",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Owner | UserRole::Admin)
    }

    pub fn is_supervisor_or_above(&self) -> bool {
        matches!(self, UserRole::Owner | UserRole::Admin | UserRole::Supervisor)
    }
}

/// Identity attached to an authenticated request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: String,
    pub name: String,
    pub role: UserRole,
    pub organisation_id: String,
    pub organisation_name: String,
}
