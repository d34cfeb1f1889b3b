//! Shared fixtures for service tests.

use std::sync::Arc;
use tempfile::TempDir;

use crate::domain::auth::{SessionUser, UserRole};
use crate::storage::yaml::Connection;

pub fn connection() -> (Arc<Connection>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let connection = Connection::new(temp_dir.path()).unwrap();
    (Arc::new(connection), temp_dir)
}

pub fn session(role: UserRole) -> SessionUser {
    SessionUser {
        user_id: "user-1".to_string(),
        name: "Sarah Johnson".to_string(),
        role,
        organisation_id: "org-1".to_string(),
        organisation_name: "Sunshine Nursery".to_string(),
    }
}

pub fn session_for_org(role: UserRole, organisation_id: &str) -> SessionUser {
    SessionUser {
        organisation_id: organisation_id.to_string(),
        ..session(role)
    }
}
