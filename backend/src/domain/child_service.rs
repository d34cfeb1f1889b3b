//! Child records: enrolment, profile updates, removal.

use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::info;

use shared::{CreateChildRequest, UpdateChildRequest};

use crate::domain::auth::SessionUser;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::models::child::Child;
use crate::domain::models::new_id;
use crate::storage::traits::ChildStorage;
use crate::storage::yaml::{ChildRepository, Connection};

const MAX_NAME_LENGTH: usize = 100;

#[derive(Clone)]
pub struct ChildService {
    children: ChildRepository,
}

impl ChildService {
    pub fn new(connection: Arc<Connection>) -> Self {
        Self {
            children: ChildRepository::new(connection),
        }
    }

    pub fn create_child(
        &self,
        ctx: &SessionUser,
        request: CreateChildRequest,
    ) -> DomainResult<Child> {
        let first_name = validate_name(&request.first_name, "First name")?;
        let last_name = validate_name(&request.last_name, "Last name")?;
        let date_of_birth = parse_date(&request.date_of_birth, "date_of_birth")?;
        let start_date = parse_date(&request.start_date, "start_date")?;

        let now = Utc::now();
        let child = Child {
            id: new_id(),
            organisation_id: ctx.organisation_id.clone(),
            first_name,
            last_name,
            date_of_birth,
            start_date,
            room: none_if_blank(request.room),
            dietary_needs: none_if_blank(request.dietary_needs),
            medical_notes: none_if_blank(request.medical_notes),
            key_person_id: none_if_blank(request.key_person_id),
            created_by_id: ctx.user_id.clone(),
            created_at: now,
            updated_at: now,
        };
        self.children.store_child(&child)?;
        info!("Enrolled child {} ({})", child.full_name(), child.id);
        Ok(child)
    }

    pub fn get_child(&self, ctx: &SessionUser, child_id: &str) -> DomainResult<Child> {
        self.children
            .get_child(&ctx.organisation_id, child_id)?
            .ok_or_else(|| DomainError::not_found(format!("Child not found: {child_id}")))
    }

    pub fn list_children(&self, ctx: &SessionUser) -> DomainResult<Vec<Child>> {
        Ok(self.children.list_children(&ctx.organisation_id)?)
    }

    pub fn update_child(
        &self,
        ctx: &SessionUser,
        child_id: &str,
        request: UpdateChildRequest,
    ) -> DomainResult<Child> {
        let mut child = self.get_child(ctx, child_id)?;

        if let Some(first_name) = request.first_name {
            child.first_name = validate_name(&first_name, "First name")?;
        }
        if let Some(last_name) = request.last_name {
            child.last_name = validate_name(&last_name, "Last name")?;
        }
        if let Some(dob) = request.date_of_birth {
            child.date_of_birth = parse_date(&dob, "date_of_birth")?;
        }
        if let Some(room) = request.room {
            child.room = none_if_blank(Some(room));
        }
        if let Some(dietary_needs) = request.dietary_needs {
            child.dietary_needs = none_if_blank(Some(dietary_needs));
        }
        if let Some(medical_notes) = request.medical_notes {
            child.medical_notes = none_if_blank(Some(medical_notes));
        }
        if let Some(key_person_id) = request.key_person_id {
            child.key_person_id = none_if_blank(Some(key_person_id));
        }
        child.updated_at = Utc::now();

        self.children.update_child(&child)?;
        Ok(child)
    }

    pub fn delete_child(&self, ctx: &SessionUser, child_id: &str) -> DomainResult<()> {
        if !ctx.role.is_admin() {
            return Err(DomainError::forbidden(
                "Only admins can remove a child record",
            ));
        }
        if !self.children.delete_child(&ctx.organisation_id, child_id)? {
            return Err(DomainError::not_found(format!(
                "Child not found: {child_id}"
            )));
        }
        info!("Removed child {}", child_id);
        Ok(())
    }
}

fn validate_name(value: &str, field: &str) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    if trimmed.len() > MAX_NAME_LENGTH {
        return Err(DomainError::validation(format!(
            "{field} cannot exceed {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn parse_date(value: &str, field: &str) -> DomainResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| DomainError::validation(format!("{field} must be an ISO date (YYYY-MM-DD)")))
}

pub(crate) fn none_if_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
