//! Evidence vault: compliance documents and the readiness score.

use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use shared::{CreateEvidenceRequest, SetEvidenceStatusRequest};

use crate::domain::auth::SessionUser;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::models::evidence::{readiness_score, EvidenceItem, EvidenceStatus};
use crate::domain::models::new_id;
use crate::storage::traits::EvidenceStorage;
use crate::storage::yaml::{Connection, EvidenceRepository};

#[derive(Clone)]
pub struct EvidenceService {
    evidence: EvidenceRepository,
}

impl EvidenceService {
    pub fn new(connection: Arc<Connection>) -> Self {
        Self {
            evidence: EvidenceRepository::new(connection),
        }
    }

    pub fn create_item(
        &self,
        ctx: &SessionUser,
        request: CreateEvidenceRequest,
    ) -> DomainResult<EvidenceItem> {
        let name = request.name.trim();
        let category = request.category.trim();
        if name.is_empty() || category.is_empty() {
            return Err(DomainError::validation(
                "Evidence name and category cannot be empty",
            ));
        }

        let now = Utc::now();
        let item = EvidenceItem {
            id: new_id(),
            organisation_id: ctx.organisation_id.clone(),
            name: name.to_string(),
            category: category.to_string(),
            status: EvidenceStatus::NotReady,
            last_reviewed_at: None,
            created_by_id: ctx.user_id.clone(),
            created_at: now,
            updated_at: now,
        };
        self.evidence.store_item(&item)?;
        info!("Added evidence item {} ({})", item.name, item.id);
        Ok(item)
    }

    pub fn list_items(&self, ctx: &SessionUser) -> DomainResult<Vec<EvidenceItem>> {
        Ok(self.evidence.list_items(&ctx.organisation_id)?)
    }

    /// Flip an item between READY and NOT_READY; either way counts as a
    /// review.
    pub fn set_status(
        &self,
        ctx: &SessionUser,
        item_id: &str,
        request: SetEvidenceStatusRequest,
    ) -> DomainResult<EvidenceItem> {
        let status = EvidenceStatus::parse(&request.status)
            .ok_or_else(|| DomainError::validation("status must be READY or NOT_READY"))?;
        let mut item = self
            .evidence
            .get_item(&ctx.organisation_id, item_id)?
            .ok_or_else(|| DomainError::not_found(format!("Evidence item not found: {item_id}")))?;

        let now = Utc::now();
        item.status = status;
        item.last_reviewed_at = Some(now);
        item.updated_at = now;
        self.evidence.update_item(&item)?;
        Ok(item)
    }

    /// (ready, total, score) for the vault.
    pub fn readiness(&self, ctx: &SessionUser) -> DomainResult<(usize, usize, u32)> {
        let items = self.evidence.list_items(&ctx.organisation_id)?;
        let total = items.len();
        let ready = items
            .iter()
            .filter(|i| i.status == EvidenceStatus::Ready)
            .count();
        Ok((ready, total, readiness_score(ready, total)))
    }
}
