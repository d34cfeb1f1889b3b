//! Per-organisation settings consumed by the daily-update dispatcher.

use chrono::NaiveTime;
use std::sync::Arc;
use tracing::info;

use shared::UpdateOrganisationSettingsRequest;

use crate::domain::auth::{SessionUser, UserRole};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::models::organisation::OrganisationSettings;
use crate::storage::traits::OrganisationStorage;
use crate::storage::yaml::{Connection, OrganisationRepository};

const WEEKDAY_ABBREVIATIONS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Clone)]
pub struct OrganisationService {
    organisations: OrganisationRepository,
}

impl OrganisationService {
    pub fn new(connection: Arc<Connection>) -> Self {
        Self {
            organisations: OrganisationRepository::new(connection),
        }
    }

    /// Stored settings, or the defaults for an organisation that has never
    /// saved any.
    pub fn get_settings(&self, ctx: &SessionUser) -> DomainResult<OrganisationSettings> {
        Ok(self
            .organisations
            .get_settings(&ctx.organisation_id)?
            .unwrap_or_else(|| {
                OrganisationSettings::defaults(&ctx.organisation_id, &ctx.organisation_name)
            }))
    }

    pub fn update_settings(
        &self,
        ctx: &SessionUser,
        request: UpdateOrganisationSettingsRequest,
    ) -> DomainResult<OrganisationSettings> {
        if !ctx.role.is_admin() {
            return Err(DomainError::forbidden(
                "Only admins can change organisation settings",
            ));
        }
        let mut settings = self.get_settings(ctx)?;

        if let Some(time) = request.daily_update_schedule_time {
            if NaiveTime::parse_from_str(&time, "%H:%M").is_err() {
                return Err(DomainError::validation(
                    "daily_update_schedule_time must be HH:MM",
                ));
            }
            settings.daily_update_schedule_time = time;
        }
        if let Some(days) = request.daily_update_schedule_days {
            if days.is_empty() {
                return Err(DomainError::validation(
                    "daily_update_schedule_days cannot be empty",
                ));
            }
            for day in &days {
                if !WEEKDAY_ABBREVIATIONS.contains(&day.as_str()) {
                    return Err(DomainError::validation(format!(
                        "Unknown weekday abbreviation: {day}"
                    )));
                }
            }
            settings.daily_update_schedule_days = days;
        }
        if let Some(role) = request.daily_update_default_approver {
            settings.daily_update_default_approver = UserRole::parse(&role)
                .ok_or_else(|| DomainError::validation(format!("Unknown role: {role}")))?;
        }

        self.organisations.save_settings(&settings)?;
        info!("Updated settings for organisation {}", ctx.organisation_id);
        Ok(settings)
    }
}
