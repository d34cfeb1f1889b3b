//! Session extraction from forwarded identity headers.
//!
//! The authenticating proxy in front of this service forwards the signed-in
//! user as `x-user-*` / `x-organisation-*` headers. A request missing or
//! mangling any of them is rejected with 401 before a handler runs.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::Response;

use crate::domain::auth::{SessionUser, UserRole};
use crate::rest::error::unauthorized;

const USER_ID: &str = "x-user-id";
const USER_NAME: &str = "x-user-name";
const USER_ROLE: &str = "x-user-role";
const ORGANISATION_ID: &str = "x-organisation-id";
const ORGANISATION_NAME: &str = "x-organisation-name";

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header(parts, USER_ID)
            .ok_or_else(|| unauthorized("Missing session"))?
            .to_string();
        let name = header(parts, USER_NAME)
            .ok_or_else(|| unauthorized("Missing session"))?
            .to_string();
        let role = header(parts, USER_ROLE)
            .and_then(UserRole::parse)
            .ok_or_else(|| unauthorized("Missing or invalid role"))?;
        let organisation_id = header(parts, ORGANISATION_ID)
            .ok_or_else(|| unauthorized("Missing organisation"))?
            .to_string();
        let organisation_name = header(parts, ORGANISATION_NAME)
            .unwrap_or(organisation_id.as_str())
            .to_string();
        Ok(SessionUser {
            user_id,
            name,
            role,
            organisation_id,
            organisation_name,
        })
    }
}
