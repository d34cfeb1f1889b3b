//! Consent templates and per-child consent records.

use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use shared::{ConsentOverview, CreateConsentTemplateRequest, UpsertConsentRequest};

use crate::domain::auth::SessionUser;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::models::consent::{ConsentRecord, ConsentStatus, ConsentTemplate};
use crate::domain::models::new_id;
use crate::storage::traits::{ChildStorage, ConsentStorage};
use crate::storage::yaml::{ChildRepository, Connection, ConsentRepository};

#[derive(Clone)]
pub struct ConsentService {
    consents: ConsentRepository,
    children: ChildRepository,
}

impl ConsentService {
    pub fn new(connection: Arc<Connection>) -> Self {
        Self {
            consents: ConsentRepository::new(connection.clone()),
            children: ChildRepository::new(connection),
        }
    }

    pub fn create_template(
        &self,
        ctx: &SessionUser,
        request: CreateConsentTemplateRequest,
    ) -> DomainResult<ConsentTemplate> {
        if !ctx.role.is_admin() {
            return Err(DomainError::forbidden(
                "Only admins can create consent templates",
            ));
        }
        let name = request.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("Template name cannot be empty"));
        }

        let template = ConsentTemplate {
            id: new_id(),
            organisation_id: ctx.organisation_id.clone(),
            name: name.to_string(),
            description: super::child_service::none_if_blank(request.description),
            requires_expiry: request.requires_expiry,
            created_at: Utc::now(),
        };
        self.consents.store_template(&template)?;
        info!("Created consent template {} ({})", template.name, template.id);
        Ok(template)
    }

    pub fn list_templates(&self, ctx: &SessionUser) -> DomainResult<Vec<ConsentTemplate>> {
        Ok(self.consents.list_templates(&ctx.organisation_id)?)
    }

    /// Record or revise a child's standing for a template. A record per
    /// (child, template) pair; upserting replaces the previous standing.
    pub fn upsert_consent(
        &self,
        ctx: &SessionUser,
        request: UpsertConsentRequest,
    ) -> DomainResult<ConsentRecord> {
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
        let template = self
            .consents
            .get_template(&ctx.organisation_id, &request.template_id)?
            .ok_or_else(|| {
                DomainError::not_found(format!(
                    "Consent template not found: {}",
                    request.template_id
                ))
            })?;
        let status = ConsentStatus::parse(&request.status).ok_or_else(|| {
            DomainError::validation("status must be SIGNED, MISSING or EXPIRED")
        })?;

        let signed_date = request
            .signed_date
            .map(|d| super::child_service::parse_date(&d, "signed_date"))
            .transpose()?;
        let expiry_date = request
            .expiry_date
            .map(|d| super::child_service::parse_date(&d, "expiry_date"))
            .transpose()?;
        if status == ConsentStatus::Signed {
            if signed_date.is_none() {
                return Err(DomainError::validation(
                    "A signed consent needs a signed_date",
                ));
            }
            if template.requires_expiry && expiry_date.is_none() {
                return Err(DomainError::validation(format!(
                    "Template {} requires an expiry date",
                    template.name
                )));
            }
        }

        let now = Utc::now();
        let existing = self.consents.find_record(
            &ctx.organisation_id,
            &request.child_id,
            &request.template_id,
        )?;
        let record = match existing {
            Some(mut record) => {
                record.status = status;
                record.signed_date = signed_date;
                record.expiry_date = expiry_date;
                record.updated_at = now;
                self.consents.update_record(&record)?;
                record
            }
            None => {
                let record = ConsentRecord {
                    id: new_id(),
                    organisation_id: ctx.organisation_id.clone(),
                    child_id: request.child_id,
                    template_id: request.template_id,
                    status,
                    signed_date,
                    expiry_date,
                    created_by_id: ctx.user_id.clone(),
                    created_at: now,
                    updated_at: now,
                };
                self.consents.store_record(&record)?;
                record
            }
        };
        Ok(record)
    }

    /// Records for a child, with signed-but-lapsed consents shown as EXPIRED.
    pub fn consents_for_child(
        &self,
        ctx: &SessionUser,
        child_id: &str,
    ) -> DomainResult<Vec<ConsentRecord>> {
        let today = Utc::now().date_naive();
        let records = self
            .consents
            .list_records_for_child(&ctx.organisation_id, child_id)?;
        Ok(records.into_iter().map(|r| derive_expiry(r, today)).collect())
    }

    /// Organisation-wide completeness counts. Children with no record at all
    /// for a template count as missing.
    pub fn overview(&self, ctx: &SessionUser) -> DomainResult<ConsentOverview> {
        let today = Utc::now().date_naive();
        let templates = self.consents.list_templates(&ctx.organisation_id)?;
        let children = self.children.list_children(&ctx.organisation_id)?;
        let records: Vec<ConsentRecord> = self
            .consents
            .list_records(&ctx.organisation_id)?
            .into_iter()
            .map(|r| derive_expiry(r, today))
            .collect();

        let total = templates.len() * children.len();
        let mut signed = 0;
        let mut expired = 0;
        for child in &children {
            for template in &templates {
                let record = records
                    .iter()
                    .find(|r| r.child_id == child.id && r.template_id == template.id);
                match record.map(|r| r.status) {
                    Some(ConsentStatus::Signed) => signed += 1,
                    Some(ConsentStatus::Expired) => expired += 1,
                    Some(ConsentStatus::Missing) | None => {}
                }
            }
        }
        let missing = total - signed - expired;
        Ok(ConsentOverview {
            total,
            signed,
            missing,
            expired,
            complete: signed,
        })
    }

    /// Count used on the dashboard: consents that need chasing.
    pub fn missing_or_expired_count(&self, ctx: &SessionUser) -> DomainResult<usize> {
        let overview = self.overview(ctx)?;
        Ok(overview.missing + overview.expired)
    }
}

fn derive_expiry(mut record: ConsentRecord, today: chrono::NaiveDate) -> ConsentRecord {
    if record.status == ConsentStatus::Signed {
        if let Some(expiry) = record.expiry_date {
            if expiry < today {
                record.status = ConsentStatus::Expired;
            }
        }
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::UserRole;
    use crate::domain::child_service::ChildService;
    use crate::domain::test_support::{connection, session};
    use shared::CreateChildRequest;

    fn enrol_child(conn: Arc<Connection>, ctx: &SessionUser, first: &str) -> String {
        ChildService::new(conn)
            .create_child(
                ctx,
                CreateChildRequest {
                    first_name: first.to_string(),
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

    fn template_request(name: &str, requires_expiry: bool) -> CreateConsentTemplateRequest {
        CreateConsentTemplateRequest {
            name: name.to_string(),
            description: None,
            requires_expiry,
        }
    }

    #[test]
    fn test_template_creation_requires_admin() {
        let (conn, _tmp) = connection();
        let service = ConsentService::new(conn);
        let staff = session(UserRole::Staff);
        assert!(matches!(
            service.create_template(&staff, template_request("Photos", false)),
            Err(DomainError::Forbidden(_))
        ));
    }

    #[test]
    fn test_signed_consent_needs_dates() {
        let (conn, _tmp) = connection();
        let ctx = session(UserRole::Admin);
        let child_id = enrol_child(conn.clone(), &ctx, "Oliver");
        let service = ConsentService::new(conn);
        let template = service
            .create_template(&ctx, template_request("Medical", true))
            .unwrap();

        let request = UpsertConsentRequest {
            child_id: child_id.clone(),
            template_id: template.id.clone(),
            status: "SIGNED".to_string(),
            signed_date: Some("2026-01-10".to_string()),
            expiry_date: None,
        };
        assert!(matches!(
            service.upsert_consent(&ctx, request.clone()),
            Err(DomainError::Validation(_))
        ));

        let ok = UpsertConsentRequest {
            expiry_date: Some("2027-01-10".to_string()),
            ..request
        };
        let record = service.upsert_consent(&ctx, ok).unwrap();
        assert_eq!(record.status, ConsentStatus::Signed);
    }

    #[test]
    fn test_lapsed_consent_reads_back_expired() {
        let (conn, _tmp) = connection();
        let ctx = session(UserRole::Admin);
        let child_id = enrol_child(conn.clone(), &ctx, "Oliver");
        let service = ConsentService::new(conn);
        let template = service
            .create_template(&ctx, template_request("Outings", true))
            .unwrap();

        service
            .upsert_consent(
                &ctx,
                UpsertConsentRequest {
                    child_id: child_id.clone(),
                    template_id: template.id,
                    status: "SIGNED".to_string(),
                    signed_date: Some("2020-01-10".to_string()),
                    expiry_date: Some("2021-01-10".to_string()),
                },
            )
            .unwrap();

        let records = service.consents_for_child(&ctx, &child_id).unwrap();
        assert_eq!(records[0].status, ConsentStatus::Expired);
    }

    #[test]
    fn test_overview_counts_unrecorded_pairs_as_missing() {
        let (conn, _tmp) = connection();
        let ctx = session(UserRole::Admin);
        let oliver = enrol_child(conn.clone(), &ctx, "Oliver");
        let _amelia = enrol_child(conn.clone(), &ctx, "Amelia");
        let service = ConsentService::new(conn);

        let photos = service
            .create_template(&ctx, template_request("Photos", false))
            .unwrap();
        service
            .upsert_consent(
                &ctx,
                UpsertConsentRequest {
                    child_id: oliver,
                    template_id: photos.id,
                    status: "SIGNED".to_string(),
                    signed_date: Some("2026-01-10".to_string()),
                    expiry_date: None,
                },
            )
            .unwrap();

        let overview = service.overview(&ctx).unwrap();
        assert_eq!(overview.total, 2);
        assert_eq!(overview.signed, 1);
        assert_eq!(overview.missing, 1);
        assert_eq!(overview.expired, 0);
        assert_eq!(service.missing_or_expired_count(&ctx).unwrap(), 1);
    }

    #[test]
    fn test_overview_complete_counts_signed_and_valid_only() {
        let (conn, _tmp) = connection();
        let ctx = session(UserRole::Admin);
        let children: Vec<String> = ["Oliver", "Amelia", "Noah", "Isla"]
            .iter()
            .map(|first| enrol_child(conn.clone(), &ctx, first))
            .collect();
        let service = ConsentService::new(conn);

        let photos = service
            .create_template(&ctx, template_request("Photos", false))
            .unwrap();
        let outings = service
            .create_template(&ctx, template_request("Outings", true))
            .unwrap();

        // Photos signed for all four children.
        for child_id in &children {
            service
                .upsert_consent(
                    &ctx,
                    UpsertConsentRequest {
                        child_id: child_id.clone(),
                        template_id: photos.id.clone(),
                        status: "SIGNED".to_string(),
                        signed_date: Some("2026-01-10".to_string()),
                        expiry_date: None,
                    },
                )
                .unwrap();
        }
        // Outings: one valid, one lapsed, one recorded missing, one never
        // recorded at all.
        service
            .upsert_consent(
                &ctx,
                UpsertConsentRequest {
                    child_id: children[0].clone(),
                    template_id: outings.id.clone(),
                    status: "SIGNED".to_string(),
                    signed_date: Some("2026-01-10".to_string()),
                    expiry_date: Some("2030-01-10".to_string()),
                },
            )
            .unwrap();
        service
            .upsert_consent(
                &ctx,
                UpsertConsentRequest {
                    child_id: children[1].clone(),
                    template_id: outings.id.clone(),
                    status: "SIGNED".to_string(),
                    signed_date: Some("2020-01-10".to_string()),
                    expiry_date: Some("2021-01-10".to_string()),
                },
            )
            .unwrap();
        service
            .upsert_consent(
                &ctx,
                UpsertConsentRequest {
                    child_id: children[2].clone(),
                    template_id: outings.id.clone(),
                    status: "MISSING".to_string(),
                    signed_date: None,
                    expiry_date: None,
                },
            )
            .unwrap();

        let overview = service.overview(&ctx).unwrap();
        assert_eq!(overview.total, 8);
        assert_eq!(overview.signed, 5);
        assert_eq!(overview.expired, 1);
        assert_eq!(overview.missing, 2);
        assert_eq!(overview.complete, 5);
    }
}
