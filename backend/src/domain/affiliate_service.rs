//! Affiliate programme: public applications and admin review.

use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::sync::Arc;
use tracing::info;

use shared::{AffiliateAction, AffiliateActionRequest, AffiliateApplyRequest};

use crate::domain::auth::SessionUser;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::models::affiliate::{AffiliateApplication, AffiliateStatus};
use crate::domain::models::new_id;
use crate::storage::traits::AffiliateStorage;
use crate::storage::yaml::{AffiliateRepository, Connection};

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 120;
const DESCRIPTION_MIN: usize = 30;
const DESCRIPTION_MAX: usize = 2000;
const REVIEW_NOTES_MAX: usize = 1000;
const CODE_RETRIES: usize = 5;

/// Result of a public application: a fresh record or a reset of a
/// previously rejected one.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationOutcome {
    pub application: AffiliateApplication,
    pub reapplication: bool,
}

#[derive(Clone)]
pub struct AffiliateService {
    affiliates: AffiliateRepository,
}

impl AffiliateService {
    pub fn new(connection: Arc<Connection>) -> Self {
        Self {
            affiliates: AffiliateRepository::new(connection),
        }
    }

    /// Public entry point, no session required.
    pub fn apply(&self, request: AffiliateApplyRequest) -> DomainResult<ApplicationOutcome> {
        let name = request.name.trim().to_string();
        if name.len() < NAME_MIN || name.len() > NAME_MAX {
            return Err(DomainError::validation(format!(
                "Name must be between {NAME_MIN} and {NAME_MAX} characters"
            )));
        }
        let email = request.email.trim().to_lowercase();
        if !looks_like_email(&email) {
            return Err(DomainError::validation("Please enter a valid email address"));
        }
        let description = request.company_description.trim().to_string();
        if description.len() < DESCRIPTION_MIN || description.len() > DESCRIPTION_MAX {
            return Err(DomainError::validation(format!(
                "Company description must be between {DESCRIPTION_MIN} and {DESCRIPTION_MAX} characters"
            )));
        }

        let now = Utc::now();
        if let Some(mut existing) = self.affiliates.find_by_email(&email)? {
            return match existing.status {
                AffiliateStatus::Approved => Err(DomainError::conflict(
                    "This email is already registered as an approved affiliate",
                )),
                AffiliateStatus::Pending => Err(DomainError::conflict(
                    "An application for this email is already under review",
                )),
                AffiliateStatus::Rejected => {
                    // A rejected applicant may try again; the old review is
                    // discarded.
                    existing.name = name;
                    existing.company_description = description;
                    existing.status = AffiliateStatus::Pending;
                    existing.reviewed_at = None;
                    existing.reviewed_by_id = None;
                    existing.review_notes = None;
                    existing.updated_at = now;
                    self.affiliates.update_application(&existing)?;
                    info!("Affiliate reapplication received from {}", existing.email);
                    Ok(ApplicationOutcome {
                        application: existing,
                        reapplication: true,
                    })
                }
            };
        }

        let application = AffiliateApplication {
            id: new_id(),
            name,
            email,
            company_description: description,
            status: AffiliateStatus::Pending,
            reviewed_at: None,
            reviewed_by_id: None,
            review_notes: None,
            referral_code: None,
            approved_at: None,
            created_at: now,
            updated_at: now,
        };
        self.affiliates.store_application(&application)?;
        info!("Affiliate application received from {}", application.email);
        Ok(ApplicationOutcome {
            application,
            reapplication: false,
        })
    }

    pub fn list_applications(&self, ctx: &SessionUser) -> DomainResult<Vec<AffiliateApplication>> {
        if !ctx.role.is_admin() {
            return Err(DomainError::forbidden(
                "Only admins can view affiliate applications",
            ));
        }
        Ok(self.affiliates.list_applications()?)
    }

    /// Approve or reject a PENDING application. Approval mints the referral
    /// code; a code collision is retried a few times and then refused,
    /// leaving the application PENDING.
    pub fn action(
        &self,
        ctx: &SessionUser,
        application_id: &str,
        request: AffiliateActionRequest,
    ) -> DomainResult<AffiliateApplication> {
        if !ctx.role.is_admin() {
            return Err(DomainError::forbidden(
                "Only admins can action affiliate applications",
            ));
        }
        let review_notes = super::child_service::none_if_blank(request.review_notes);
        if let Some(notes) = &review_notes {
            if notes.len() > REVIEW_NOTES_MAX {
                return Err(DomainError::validation(format!(
                    "Review notes cannot exceed {REVIEW_NOTES_MAX} characters"
                )));
            }
        }
        let mut application = self
            .affiliates
            .get_application(application_id)?
            .ok_or_else(|| {
                DomainError::not_found(format!("Affiliate application not found: {application_id}"))
            })?;
        if application.status != AffiliateStatus::Pending {
            return Err(DomainError::conflict(
                "Only pending applications can be actioned",
            ));
        }

        let now = Utc::now();
        match request.action {
            AffiliateAction::Approve => {
                let referral_code = self.mint_referral_code(&application.name)?;
                application.status = AffiliateStatus::Approved;
                application.referral_code = Some(referral_code);
                application.approved_at = Some(now);
            }
            AffiliateAction::Reject => {
                application.status = AffiliateStatus::Rejected;
            }
        }
        application.reviewed_at = Some(now);
        application.reviewed_by_id = Some(ctx.user_id.clone());
        application.review_notes = review_notes;
        application.updated_at = now;
        self.affiliates.update_application(&application)?;
        info!(
            "Affiliate application {} {} by {}",
            application.id,
            match request.action {
                AffiliateAction::Approve => "approved",
                AffiliateAction::Reject => "rejected",
            },
            ctx.name
        );
        Ok(application)
    }

    fn mint_referral_code(&self, name: &str) -> DomainResult<String> {
        let prefix = code_prefix(name);
        let mut rng = rand::thread_rng();
        for _ in 0..CODE_RETRIES {
            let suffix: String = (&mut rng)
                .sample_iter(Alphanumeric)
                .take(4)
                .map(|c| (c as char).to_ascii_uppercase())
                .collect();
            let code = format!("{prefix}-{suffix}");
            if self.affiliates.find_by_referral_code(&code)?.is_none() {
                return Ok(code);
            }
        }
        Err(DomainError::conflict(
            "Could not allocate a unique referral code; try again",
        ))
    }
}

/// Uppercased alphanumeric characters of the name, first 6, padded with `X`
/// to at least 4.
fn code_prefix(name: &str) -> String {
    let mut prefix: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .take(6)
        .collect();
    while prefix.len() < 4 {
        prefix.push('X');
    }
    prefix
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}
