//! Incident logs.

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use shared::CreateIncidentRequest;

use crate::domain::auth::SessionUser;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::models::incident::{IncidentLog, IncidentSeverity};
use crate::domain::models::new_id;
use crate::storage::traits::{ChildStorage, IncidentStorage};
use crate::storage::yaml::{ChildRepository, Connection, IncidentRepository};

#[derive(Clone)]
pub struct IncidentService {
    incidents: IncidentRepository,
    children: ChildRepository,
}

impl IncidentService {
    pub fn new(connection: Arc<Connection>) -> Self {
        Self {
            incidents: IncidentRepository::new(connection.clone()),
            children: ChildRepository::new(connection),
        }
    }

    pub fn report_incident(
        &self,
        ctx: &SessionUser,
        request: CreateIncidentRequest,
    ) -> DomainResult<IncidentLog> {
        if self
            .children
            .get_child(&ctx.organisation_id, &request.child_id)?
            .is_none()
        {
            return Err(DomainError::not_found(format!(
                "Child not found: {}",
                request.child_id
            )));
        }
        let description = request.description.trim();
        if description.is_empty() {
            return Err(DomainError::validation("Description cannot be empty"));
        }
        let severity = IncidentSeverity::parse(&request.severity).ok_or_else(|| {
            DomainError::validation("severity must be MINOR, MODERATE or SERIOUS")
        })?;
        if request.occurred_at > Utc::now() {
            return Err(DomainError::validation(
                "occurred_at cannot be in the future",
            ));
        }

        let now = Utc::now();
        let incident = IncidentLog {
            id: new_id(),
            organisation_id: ctx.organisation_id.clone(),
            child_id: request.child_id,
            occurred_at: request.occurred_at,
            description: description.to_string(),
            severity,
            parent_notified: false,
            parent_notified_at: None,
            reported_by_id: ctx.user_id.clone(),
            created_at: now,
            updated_at: now,
        };
        self.incidents.store_incident(&incident)?;
        if severity == IncidentSeverity::Serious {
            warn!(
                "Serious incident reported for child {} ({})",
                incident.child_id, incident.id
            );
        } else {
            info!("Incident reported for child {}", incident.child_id);
        }
        Ok(incident)
    }

    pub fn list_incidents(&self, ctx: &SessionUser) -> DomainResult<Vec<IncidentLog>> {
        Ok(self.incidents.list_incidents(&ctx.organisation_id)?)
    }

    pub fn mark_parent_notified(
        &self,
        ctx: &SessionUser,
        incident_id: &str,
    ) -> DomainResult<IncidentLog> {
        let mut incident = self
            .incidents
            .get_incident(&ctx.organisation_id, incident_id)?
            .ok_or_else(|| {
                DomainError::not_found(format!("Incident not found: {incident_id}"))
            })?;
        if incident.parent_notified {
            return Err(DomainError::conflict("Parent already notified"));
        }

        let now = Utc::now();
        incident.parent_notified = true;
        incident.parent_notified_at = Some(now);
        incident.updated_at = now;
        self.incidents.update_incident(&incident)?;
        Ok(incident)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::UserRole;
    use crate::domain::child_service::ChildService;
    use crate::domain::test_support::{connection, session};
    use shared::CreateChildRequest;

    fn enrol_child(conn: Arc<Connection>, ctx: &SessionUser) -> String {
        ChildService::new(conn)
            .create_child(
                ctx,
                CreateChildRequest {
                    first_name: "Oliver".to_string(),
                    last_name: "Smith".to_string(),
                    date_of_birth: "2023-04-12".to_string(),
                    start_date: "2025-09-01".to_string(),
                    room: None,
                    dietary_needs: None,
                    medical_notes: None,
                    key_person_id: None,
                },
            )
            .unwrap()
            .id
    }

    fn incident_request(child_id: &str, severity: &str) -> CreateIncidentRequest {
        CreateIncidentRequest {
            child_id: child_id.to_string(),
            occurred_at: Utc::now() - chrono::Duration::hours(1),
            description: "Grazed knee in the garden".to_string(),
            severity: severity.to_string(),
        }
    }

    #[test]
    fn test_report_and_notify() {
        let (conn, _tmp) = connection();
        let ctx = session(UserRole::Staff);
        let child_id = enrol_child(conn.clone(), &ctx);
        let service = IncidentService::new(conn);

        let incident = service
            .report_incident(&ctx, incident_request(&child_id, "MINOR"))
            .unwrap();
        assert!(!incident.parent_notified);

        let notified = service.mark_parent_notified(&ctx, &incident.id).unwrap();
        assert!(notified.parent_notified);
        assert!(notified.parent_notified_at.is_some());
        assert!(matches!(
            service.mark_parent_notified(&ctx, &incident.id),
            Err(DomainError::Conflict(_))
        ));
    }

    #[test]
    fn test_future_incident_rejected() {
        let (conn, _tmp) = connection();
        let ctx = session(UserRole::Staff);
        let child_id = enrol_child(conn.clone(), &ctx);
        let service = IncidentService::new(conn);

        let mut request = incident_request(&child_id, "MODERATE");
        request.occurred_at = Utc::now() + chrono::Duration::hours(2);
        assert!(matches!(
            service.report_incident(&ctx, request),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_unknown_severity_rejected() {
        let (conn, _tmp) = connection();
        let ctx = session(UserRole::Staff);
        let child_id = enrol_child(conn.clone(), &ctx);
        let service = IncidentService::new(conn);

        assert!(matches!(
            service.report_incident(&ctx, incident_request(&child_id, "CATASTROPHIC")),
            Err(DomainError::Validation(_))
        ));
    }
}
