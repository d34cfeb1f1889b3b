//! Guardians and their links to children.

use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use shared::{CreateGuardianRequest, LinkGuardianRequest};

use crate::domain::auth::SessionUser;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::models::guardian::{ChildGuardian, CommunicationChannel, Guardian};
use crate::domain::models::new_id;
use crate::storage::traits::{ChildStorage, GuardianStorage};
use crate::storage::yaml::{ChildRepository, Connection, GuardianRepository};

#[derive(Clone)]
pub struct GuardianService {
    guardians: GuardianRepository,
    children: ChildRepository,
}

impl GuardianService {
    pub fn new(connection: Arc<Connection>) -> Self {
        Self {
            guardians: GuardianRepository::new(connection.clone()),
            children: ChildRepository::new(connection),
        }
    }

    pub fn create_guardian(
        &self,
        ctx: &SessionUser,
        request: CreateGuardianRequest,
    ) -> DomainResult<Guardian> {
        let first_name = request.first_name.trim();
        let last_name = request.last_name.trim();
        if first_name.is_empty() || last_name.is_empty() {
            return Err(DomainError::validation("Guardian name cannot be empty"));
        }
        let preferred_channel = CommunicationChannel::parse(&request.preferred_channel)
            .ok_or_else(|| {
                DomainError::validation("preferred_channel must be EMAIL or WHATSAPP")
            })?;
        let email = super::child_service::none_if_blank(request.email);
        if let Some(email) = &email {
            if !looks_like_email(email) {
                return Err(DomainError::validation(format!(
                    "Invalid email address: {email}"
                )));
            }
        }

        let now = Utc::now();
        let guardian = Guardian {
            id: new_id(),
            organisation_id: ctx.organisation_id.clone(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email,
            phone: super::child_service::none_if_blank(request.phone),
            relationship: super::child_service::none_if_blank(request.relationship),
            pickup_permission: request.pickup_permission,
            preferred_channel,
            created_at: now,
            updated_at: now,
        };
        self.guardians.store_guardian(&guardian)?;
        info!(
            "Created guardian {} {} ({})",
            guardian.first_name, guardian.last_name, guardian.id
        );
        Ok(guardian)
    }

    pub fn get_guardian(&self, ctx: &SessionUser, guardian_id: &str) -> DomainResult<Guardian> {
        self.guardians
            .get_guardian(&ctx.organisation_id, guardian_id)?
            .ok_or_else(|| DomainError::not_found(format!("Guardian not found: {guardian_id}")))
    }

    pub fn list_guardians(&self, ctx: &SessionUser) -> DomainResult<Vec<Guardian>> {
        Ok(self.guardians.list_guardians(&ctx.organisation_id)?)
    }

    /// Attach a guardian to a child. Linking again just updates the primary
    /// flag.
    pub fn link_guardian(
        &self,
        ctx: &SessionUser,
        child_id: &str,
        guardian_id: &str,
        request: LinkGuardianRequest,
    ) -> DomainResult<()> {
        if self
            .children
            .get_child(&ctx.organisation_id, child_id)?
            .is_none()
        {
            return Err(DomainError::not_found(format!(
                "Child not found: {child_id}"
            )));
        }
        self.get_guardian(ctx, guardian_id)?;

        let link = ChildGuardian {
            child_id: child_id.to_string(),
            guardian_id: guardian_id.to_string(),
            is_primary: request.is_primary,
        };
        self.guardians.link_child(&ctx.organisation_id, &link)?;
        Ok(())
    }

    /// Guardians of a child with their primary flag, primary first.
    pub fn guardians_for_child(
        &self,
        ctx: &SessionUser,
        child_id: &str,
    ) -> DomainResult<Vec<(Guardian, bool)>> {
        let mut linked = self
            .guardians
            .guardians_for_child(&ctx.organisation_id, child_id)?;
        linked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.last_name.cmp(&b.0.last_name)));
        Ok(linked)
    }
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}
