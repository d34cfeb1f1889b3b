//! Dashboard aggregation: one pass over the stores, recomputed per request.

use chrono::Utc;
use std::sync::Arc;

use shared::DashboardMetrics;

use crate::domain::auth::SessionUser;
use crate::domain::consent_service::ConsentService;
use crate::domain::daily_update_service::DailyUpdateService;
use crate::domain::error::DomainResult;
use crate::domain::evidence_service::EvidenceService;
use crate::domain::invoice_service::InvoiceService;
use crate::domain::message_sender::MessageSender;
use crate::domain::task_service::TaskService;
use crate::domain::models::attendance::AttendanceStatus;
use crate::storage::traits::{AttendanceStorage, ChildStorage};
use crate::storage::yaml::{AttendanceRepository, ChildRepository, Connection};

#[derive(Clone)]
pub struct DashboardService {
    children: ChildRepository,
    attendance: AttendanceRepository,
    invoices: InvoiceService,
    consents: ConsentService,
    updates: DailyUpdateService,
    tasks: TaskService,
    evidence: EvidenceService,
}

impl DashboardService {
    pub fn new(connection: Arc<Connection>, sender: Arc<dyn MessageSender>) -> Self {
        Self {
            children: ChildRepository::new(connection.clone()),
            attendance: AttendanceRepository::new(connection.clone()),
            invoices: InvoiceService::new(connection.clone()),
            consents: ConsentService::new(connection.clone()),
            updates: DailyUpdateService::new(connection.clone(), sender),
            tasks: TaskService::new(connection.clone()),
            evidence: EvidenceService::new(connection),
        }
    }

    pub fn metrics(&self, ctx: &SessionUser) -> DomainResult<DashboardMetrics> {
        let today = Utc::now().date_naive();

        let total_children = self.children.list_children(&ctx.organisation_id)?.len();
        let present_today = self
            .attendance
            .list_for_date(&ctx.organisation_id, today)?
            .into_iter()
            .filter(|r| r.status == AttendanceStatus::Present)
            .count();
        let overdue_invoices = self.invoices.overdue_invoices(ctx)?.len();
        let missing_or_expired_consents = self.consents.missing_or_expired_count(ctx)?;
        let updates_pending_approval = self.updates.updates_pending_approval(ctx, today)?;
        let tasks_due_today = self.tasks.due_on(ctx, today)?.len();
        let (evidence_ready, evidence_total, evidence_readiness_score) =
            self.evidence.readiness(ctx)?;

        Ok(DashboardMetrics {
            total_children,
            present_today,
            overdue_invoices,
            missing_or_expired_consents,
            updates_pending_approval,
            tasks_due_today,
            evidence_ready,
            evidence_total,
            evidence_readiness_score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::UserRole;
    use crate::domain::attendance_service::AttendanceService;
    use crate::domain::child_service::ChildService;
    use crate::domain::message_sender::testing::RecordingSender;
    use crate::domain::test_support::{connection, session};
    use shared::{CheckInRequest, CreateChildRequest, CreateInvoiceRequest, SaveDailyNoteRequest};

    #[test]
    fn test_metrics_reflect_current_state() {
        let (conn, _tmp) = connection();
        let ctx = session(UserRole::Admin);
        let sender = Arc::new(RecordingSender::default());

        let child = ChildService::new(conn.clone())
            .create_child(
                &ctx,
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
            .unwrap();
        AttendanceService::new(conn.clone())
            .check_in(
                &ctx,
                CheckInRequest {
                    child_id: child.id.clone(),
                    check_in_time: None,
                },
            )
            .unwrap();
        InvoiceService::new(conn.clone())
            .create_invoice(
                &ctx,
                CreateInvoiceRequest {
                    child_id: child.id.clone(),
                    amount: 800.0,
                    due_date: "2020-01-01".to_string(),
                    description: "Monthly fee".to_string(),
                },
            )
            .unwrap();
        DailyUpdateService::new(conn.clone(), sender.clone())
            .save_note(
                &ctx,
                &child.id,
                Utc::now().date_naive(),
                SaveDailyNoteRequest {
                    wellbeing: Some("Happy".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        let metrics = DashboardService::new(conn, sender).metrics(&ctx).unwrap();
        assert_eq!(metrics.total_children, 1);
        assert_eq!(metrics.present_today, 1);
        assert_eq!(metrics.overdue_invoices, 1);
        assert_eq!(metrics.updates_pending_approval, 1);
        assert_eq!(metrics.evidence_total, 0);
        assert_eq!(metrics.evidence_readiness_score, 0);
    }

    #[test]
    fn test_empty_organisation_has_zeroed_metrics() {
        let (conn, _tmp) = connection();
        let ctx = session(UserRole::Staff);
        let metrics = DashboardService::new(conn, Arc::new(RecordingSender::default()))
            .metrics(&ctx)
            .unwrap();
        assert_eq!(metrics.total_children, 0);
        assert_eq!(metrics.missing_or_expired_consents, 0);
        assert_eq!(metrics.tasks_due_today, 0);
    }
}
