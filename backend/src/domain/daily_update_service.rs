//! The daily-update workflow: notes, compilation, approval and dispatch.
//!
//! Status machine: DRAFT → NEEDS_APPROVAL → APPROVED → SENT, with MISSED
//! (schedule passed before approval) and FAILED (every recipient errored)
//! as side terminals.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use shared::{ApprovalQueueSummary, DispatchOutcome, DispatchReport, SaveDailyNoteRequest};

use crate::domain::auth::SessionUser;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::message_compiler::compile;
use crate::domain::message_sender::MessageSender;
use crate::domain::models::child::Child;
use crate::domain::models::daily_update::{
    DailyNote, DailyUpdate, DailyUpdateApproval, DailyUpdateStatus, DeliveryStatus,
    OutboundMessageLog,
};
use crate::domain::models::guardian::Guardian;
use crate::domain::models::new_id;
use crate::domain::models::organisation::OrganisationSettings;
use crate::domain::task_service::TaskService;
use crate::storage::traits::{
    ChildStorage, DailyUpdateStorage, GuardianStorage, OrganisationStorage,
};
use crate::storage::yaml::{
    ChildRepository, Connection, DailyUpdateRepository, GuardianRepository, OrganisationRepository,
};

/// One row of the approval-queue view.
#[derive(Debug, Clone, Serialize)]
pub struct ApprovalQueueEntry {
    pub update: DailyUpdate,
    pub child: Child,
    pub guardians: Vec<Guardian>,
    pub approval: Option<DailyUpdateApproval>,
}

#[derive(Clone)]
pub struct DailyUpdateService {
    updates: DailyUpdateRepository,
    children: ChildRepository,
    guardians: GuardianRepository,
    organisations: OrganisationRepository,
    tasks: TaskService,
    sender: Arc<dyn MessageSender>,
}

impl DailyUpdateService {
    pub fn new(connection: Arc<Connection>, sender: Arc<dyn MessageSender>) -> Self {
        Self {
            updates: DailyUpdateRepository::new(connection.clone()),
            children: ChildRepository::new(connection.clone()),
            guardians: GuardianRepository::new(connection.clone()),
            organisations: OrganisationRepository::new(connection.clone()),
            tasks: TaskService::new(connection),
            sender,
        }
    }

    /// Save the note for (child, date) and refresh the matching update.
    ///
    /// A note with any content moves a DRAFT update to NEEDS_APPROVAL.
    /// Later edits recompile the bodies as long as the update has not been
    /// sent, but never regress an APPROVED status.
    pub fn save_note(
        &self,
        ctx: &SessionUser,
        child_id: &str,
        date: NaiveDate,
        request: SaveDailyNoteRequest,
    ) -> DomainResult<(DailyNote, DailyUpdate)> {
        let child = self
            .children
            .get_child(&ctx.organisation_id, child_id)?
            .ok_or_else(|| DomainError::not_found(format!("Child not found: {child_id}")))?;

        let now = Utc::now();
        let existing_note = self
            .updates
            .find_note(&ctx.organisation_id, child_id, date)?;
        let note = DailyNote {
            id: existing_note
                .as_ref()
                .map(|n| n.id.clone())
                .unwrap_or_else(new_id),
            organisation_id: ctx.organisation_id.clone(),
            child_id: child_id.to_string(),
            date,
            wellbeing: super::child_service::none_if_blank(request.wellbeing),
            meals: super::child_service::none_if_blank(request.meals),
            naps: super::child_service::none_if_blank(request.naps),
            toileting: super::child_service::none_if_blank(request.toileting),
            activities: super::child_service::none_if_blank(request.activities),
            notable_events: super::child_service::none_if_blank(request.notable_events),
            created_by_id: existing_note
                .as_ref()
                .map(|n| n.created_by_id.clone())
                .unwrap_or_else(|| ctx.user_id.clone()),
            created_at: existing_note.as_ref().map(|n| n.created_at).unwrap_or(now),
            updated_at: now,
        };
        self.updates.upsert_note(&note)?;

        let compiled = compile(&child.first_name, &child.last_name, &note);
        let existing_update = self
            .updates
            .find_update(&ctx.organisation_id, child_id, date)?;
        let update = match existing_update {
            Some(mut update) => {
                if update.status != DailyUpdateStatus::Sent {
                    update.compiled_email_content = compiled.email;
                    update.compiled_whatsapp_content = compiled.whatsapp;
                }
                if update.status == DailyUpdateStatus::Draft && note.has_content() {
                    update.status = DailyUpdateStatus::NeedsApproval;
                }
                update.updated_at = now;
                self.updates.update_update(&update)?;
                update
            }
            None => {
                let status = if note.has_content() {
                    DailyUpdateStatus::NeedsApproval
                } else {
                    DailyUpdateStatus::Draft
                };
                let update = DailyUpdate {
                    id: new_id(),
                    organisation_id: ctx.organisation_id.clone(),
                    child_id: child_id.to_string(),
                    date,
                    status,
                    compiled_email_content: compiled.email,
                    compiled_whatsapp_content: compiled.whatsapp,
                    sent_at: None,
                    created_at: now,
                    updated_at: now,
                };
                self.updates.store_update(&update)?;
                update
            }
        };
        Ok((note, update))
    }

    /// Supervisor sign-off. Exactly one approval row per update, ever.
    pub fn approve(
        &self,
        ctx: &SessionUser,
        update_id: &str,
    ) -> DomainResult<(DailyUpdate, DailyUpdateApproval)> {
        if !ctx.role.is_supervisor_or_above() {
            return Err(DomainError::forbidden(
                "Only supervisors and above can approve daily updates",
            ));
        }
        let mut update = self
            .updates
            .get_update(&ctx.organisation_id, update_id)?
            .ok_or_else(|| {
                DomainError::not_found(format!("Daily update not found: {update_id}"))
            })?;
        match update.status {
            DailyUpdateStatus::NeedsApproval => {}
            DailyUpdateStatus::Approved => {
                return Err(DomainError::conflict("Daily update is already approved"));
            }
            other => {
                return Err(DomainError::conflict(format!(
                    "Daily update cannot be approved from status {}",
                    other.as_str()
                )));
            }
        }

        let now = Utc::now();
        let approval = DailyUpdateApproval {
            id: new_id(),
            daily_update_id: update.id.clone(),
            approved_by_id: ctx.user_id.clone(),
            approved_by_name: ctx.name.clone(),
            approved_at: now,
        };
        self.updates.store_approval(&ctx.organisation_id, &approval)?;
        update.status = DailyUpdateStatus::Approved;
        update.updated_at = now;
        self.updates.update_update(&update)?;
        info!("Daily update {} approved by {}", update.id, ctx.name);
        Ok((update, approval))
    }

    /// Today's NEEDS_APPROVAL and APPROVED updates, newest edit first.
    pub fn approval_queue(
        &self,
        ctx: &SessionUser,
        date: NaiveDate,
    ) -> DomainResult<(Vec<ApprovalQueueEntry>, ApprovalQueueSummary)> {
        let updates = self.updates.updates_for_date(&ctx.organisation_id, date)?;
        let mut entries = Vec::new();
        for update in updates {
            if !matches!(
                update.status,
                DailyUpdateStatus::NeedsApproval | DailyUpdateStatus::Approved
            ) {
                continue;
            }
            let Some(child) = self
                .children
                .get_child(&ctx.organisation_id, &update.child_id)?
            else {
                continue;
            };
            let guardians = self
                .guardians
                .guardians_for_child(&ctx.organisation_id, &update.child_id)?
                .into_iter()
                .map(|(guardian, _)| guardian)
                .collect();
            let approval = self
                .updates
                .approval_for_update(&ctx.organisation_id, &update.id)?;
            entries.push(ApprovalQueueEntry {
                update,
                child,
                guardians,
                approval,
            });
        }
        entries.sort_by(|a, b| b.update.updated_at.cmp(&a.update.updated_at));

        let needs_approval = entries
            .iter()
            .filter(|e| e.update.status == DailyUpdateStatus::NeedsApproval)
            .count();
        let approved = entries
            .iter()
            .filter(|e| e.update.status == DailyUpdateStatus::Approved)
            .count();
        let total = needs_approval + approved;
        let completion_rate = if total == 0 {
            0
        } else {
            ((approved as f64 / total as f64) * 100.0).round() as u32
        };
        Ok((
            entries,
            ApprovalQueueSummary {
                needs_approval,
                approved,
                completion_rate,
            },
        ))
    }

    /// Cron-style entry point: send today's approved updates and mark
    /// unapproved ones missed, once the organisation's send window opens.
    ///
    /// Per recipient the outcome lands in the message log; the update is
    /// SENT when at least one recipient succeeded, FAILED when every
    /// attempt failed. An approved update with no reachable guardian is
    /// blocked: nothing is sent and the status stays APPROVED.
    pub fn dispatch_due(
        &self,
        ctx: &SessionUser,
        now: DateTime<Utc>,
    ) -> DomainResult<DispatchReport> {
        if !ctx.role.is_supervisor_or_above() {
            return Err(DomainError::forbidden(
                "Only supervisors and above can dispatch daily updates",
            ));
        }
        let settings = self
            .organisations
            .get_settings(&ctx.organisation_id)?
            .unwrap_or_else(|| {
                OrganisationSettings::defaults(&ctx.organisation_id, &ctx.organisation_name)
            });

        let today = now.date_naive();
        let mut report = DispatchReport::default();
        if !settings.is_scheduled_day(today.weekday()) {
            return Ok(report);
        }
        let Some(schedule_time) = settings.schedule_time() else {
            warn!(
                "Organisation {} has an unparseable schedule time '{}'; skipping dispatch",
                ctx.organisation_id, settings.daily_update_schedule_time
            );
            return Ok(report);
        };
        if now.time() < schedule_time {
            return Ok(report);
        }

        for update in self.updates.updates_for_date(&ctx.organisation_id, today)? {
            match update.status {
                DailyUpdateStatus::Draft | DailyUpdateStatus::NeedsApproval => {
                    let outcome = self.mark_missed(ctx, update, now)?;
                    report.missed += 1;
                    report.outcomes.push(outcome);
                }
                DailyUpdateStatus::Approved => {
                    let outcome = self.send_update(ctx, update, now)?;
                    match outcome.result.as_str() {
                        "SENT" => report.sent += 1,
                        "FAILED" => report.failed += 1,
                        _ => report.blocked += 1,
                    }
                    report.outcomes.push(outcome);
                }
                // Already terminal; nothing to do.
                DailyUpdateStatus::Sent
                | DailyUpdateStatus::Missed
                | DailyUpdateStatus::Failed => {}
            }
        }
        info!(
            "Dispatch for {} on {}: {} sent, {} failed, {} missed, {} blocked",
            ctx.organisation_id, today, report.sent, report.failed, report.missed, report.blocked
        );
        Ok(report)
    }

    fn mark_missed(
        &self,
        ctx: &SessionUser,
        mut update: DailyUpdate,
        now: DateTime<Utc>,
    ) -> DomainResult<DispatchOutcome> {
        update.status = DailyUpdateStatus::Missed;
        update.updated_at = now;
        self.updates.update_update(&update)?;

        let child_name = self
            .children
            .get_child(&ctx.organisation_id, &update.child_id)?
            .map(|c| c.full_name())
            .unwrap_or_else(|| update.child_id.clone());
        self.tasks.create_missed_update_task(
            &ctx.organisation_id,
            &ctx.user_id,
            &update.child_id,
            &child_name,
            update.date,
        )?;
        warn!(
            "Daily update {} missed the send window for {}",
            update.id, child_name
        );
        Ok(DispatchOutcome {
            daily_update_id: update.id,
            child_id: update.child_id,
            result: "MISSED".to_string(),
            recipients_sent: 0,
            recipients_failed: 0,
        })
    }

    fn send_update(
        &self,
        ctx: &SessionUser,
        mut update: DailyUpdate,
        now: DateTime<Utc>,
    ) -> DomainResult<DispatchOutcome> {
        let child = self
            .children
            .get_child(&ctx.organisation_id, &update.child_id)?
            .ok_or_else(|| {
                DomainError::not_found(format!("Child not found: {}", update.child_id))
            })?;
        let recipients: Vec<(Guardian, _)> = self
            .guardians
            .guardians_for_child(&ctx.organisation_id, &update.child_id)?
            .into_iter()
            .filter_map(|(guardian, _)| {
                guardian
                    .usable_channel()
                    .map(|channel| (guardian, channel))
            })
            .collect();
        if recipients.is_empty() {
            warn!(
                "Daily update {} blocked: no reachable guardian for {}",
                update.id,
                child.full_name()
            );
            return Ok(DispatchOutcome {
                daily_update_id: update.id,
                child_id: update.child_id,
                result: "BLOCKED".to_string(),
                recipients_sent: 0,
                recipients_failed: 0,
            });
        }

        let subject = format!("Daily Update - {}", child.full_name());
        let mut sent = 0;
        let mut failed = 0;
        for (guardian, (channel, recipient)) in recipients {
            let body = match channel {
                crate::domain::models::guardian::CommunicationChannel::Email => {
                    update.compiled_email_content.clone()
                }
                crate::domain::models::guardian::CommunicationChannel::Whatsapp => {
                    update.compiled_whatsapp_content.clone()
                }
            };
            let result = self.sender.send(channel, &recipient, &subject, &body);
            let (delivery_status, error) = match result {
                Ok(()) => {
                    sent += 1;
                    (DeliveryStatus::Sent, None)
                }
                Err(err) => {
                    failed += 1;
                    warn!(
                        "Delivery to {} failed for update {}: {:#}",
                        recipient, update.id, err
                    );
                    (DeliveryStatus::Failed, Some(format!("{err:#}")))
                }
            };
            self.updates.append_message_log(&OutboundMessageLog {
                id: new_id(),
                organisation_id: ctx.organisation_id.clone(),
                daily_update_id: update.id.clone(),
                guardian_id: guardian.id.clone(),
                channel,
                recipient,
                body,
                delivery_status,
                error,
                attempted_at: now,
            })?;
        }

        let result = if sent > 0 {
            update.status = DailyUpdateStatus::Sent;
            update.sent_at = Some(now);
            "SENT"
        } else {
            update.status = DailyUpdateStatus::Failed;
            "FAILED"
        };
        update.updated_at = now;
        self.updates.update_update(&update)?;
        Ok(DispatchOutcome {
            daily_update_id: update.id,
            child_id: update.child_id,
            result: result.to_string(),
            recipients_sent: sent,
            recipients_failed: failed,
        })
    }

    pub fn updates_pending_approval(
        &self,
        ctx: &SessionUser,
        date: NaiveDate,
    ) -> DomainResult<usize> {
        Ok(self
            .updates
            .updates_for_date(&ctx.organisation_id, date)?
            .into_iter()
            .filter(|u| u.status == DailyUpdateStatus::NeedsApproval)
            .count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::UserRole;
    use crate::domain::child_service::ChildService;
    use crate::domain::guardian_service::GuardianService;
    use crate::domain::message_sender::testing::RecordingSender;
    use crate::domain::models::task::TaskCategory;
    use crate::domain::test_support::{connection, session};
    use crate::storage::traits::TaskStorage;
    use crate::storage::yaml::TaskRepository;
    use shared::{CreateChildRequest, CreateGuardianRequest, LinkGuardianRequest};

    // Friday within the default Mon-Fri schedule.
    fn dispatch_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 28).unwrap()
    }

    fn after_window() -> DateTime<Utc> {
        dispatch_day().and_hms_opt(17, 30, 0).unwrap().and_utc()
    }

    fn before_window() -> DateTime<Utc> {
        dispatch_day().and_hms_opt(9, 0, 0).unwrap().and_utc()
    }

    fn enrol_child(conn: Arc<Connection>, ctx: &SessionUser, first: &str) -> Child {
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
    }

    fn link_guardian(
        conn: Arc<Connection>,
        ctx: &SessionUser,
        child_id: &str,
        email: Option<&str>,
        phone: Option<&str>,
        channel: &str,
    ) -> Guardian {
        let service = GuardianService::new(conn);
        let guardian = service
            .create_guardian(
                ctx,
                CreateGuardianRequest {
                    first_name: "Pat".to_string(),
                    last_name: "Smith".to_string(),
                    email: email.map(String::from),
                    phone: phone.map(String::from),
                    relationship: Some("Mother".to_string()),
                    pickup_permission: true,
                    preferred_channel: channel.to_string(),
                },
            )
            .unwrap();
        service
            .link_guardian(ctx, child_id, &guardian.id, LinkGuardianRequest { is_primary: true })
            .unwrap();
        guardian
    }

    fn note_request(wellbeing: &str) -> SaveDailyNoteRequest {
        SaveDailyNoteRequest {
            wellbeing: Some(wellbeing.to_string()),
            ..Default::default()
        }
    }

    fn service_with_sender(
        conn: Arc<Connection>,
        sender: Arc<RecordingSender>,
    ) -> DailyUpdateService {
        DailyUpdateService::new(conn, sender)
    }

    #[test]
    fn test_saving_a_note_moves_draft_to_needs_approval() {
        let (conn, _tmp) = connection();
        let ctx = session(UserRole::Staff);
        let child = enrol_child(conn.clone(), &ctx, "Oliver");
        let service = service_with_sender(conn, Arc::new(RecordingSender::default()));

        let (_, update) = service
            .save_note(&ctx, &child.id, dispatch_day(), note_request("Happy"))
            .unwrap();
        assert_eq!(update.status, DailyUpdateStatus::NeedsApproval);
        assert!(update.compiled_email_content.contains("Wellbeing: Happy"));
        assert!(update.compiled_whatsapp_content.contains("\u{2713} Happy"));
    }

    #[test]
    fn test_empty_note_stays_draft() {
        let (conn, _tmp) = connection();
        let ctx = session(UserRole::Staff);
        let child = enrol_child(conn.clone(), &ctx, "Oliver");
        let service = service_with_sender(conn, Arc::new(RecordingSender::default()));

        let (note, update) = service
            .save_note(
                &ctx,
                &child.id,
                dispatch_day(),
                SaveDailyNoteRequest {
                    wellbeing: Some("   ".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(!note.has_content());
        assert_eq!(update.status, DailyUpdateStatus::Draft);
    }

    #[test]
    fn test_editing_after_approval_keeps_status_but_recompiles() {
        let (conn, _tmp) = connection();
        let staff = session(UserRole::Staff);
        let supervisor = session(UserRole::Supervisor);
        let child = enrol_child(conn.clone(), &staff, "Oliver");
        let service = service_with_sender(conn, Arc::new(RecordingSender::default()));

        let (_, update) = service
            .save_note(&staff, &child.id, dispatch_day(), note_request("Happy"))
            .unwrap();
        service.approve(&supervisor, &update.id).unwrap();

        let (_, edited) = service
            .save_note(&staff, &child.id, dispatch_day(), note_request("Tired"))
            .unwrap();
        assert_eq!(edited.status, DailyUpdateStatus::Approved);
        assert!(edited.compiled_email_content.contains("Wellbeing: Tired"));
    }

    #[test]
    fn test_approval_requires_supervisor_and_happens_once() {
        let (conn, _tmp) = connection();
        let staff = session(UserRole::Staff);
        let supervisor = session(UserRole::Supervisor);
        let child = enrol_child(conn.clone(), &staff, "Oliver");
        let service = service_with_sender(conn, Arc::new(RecordingSender::default()));

        let (_, update) = service
            .save_note(&staff, &child.id, dispatch_day(), note_request("Happy"))
            .unwrap();
        assert!(matches!(
            service.approve(&staff, &update.id),
            Err(DomainError::Forbidden(_))
        ));

        let (approved, approval) = service.approve(&supervisor, &update.id).unwrap();
        assert_eq!(approved.status, DailyUpdateStatus::Approved);
        assert_eq!(approval.approved_by_name, supervisor.name);
        assert!(matches!(
            service.approve(&supervisor, &update.id),
            Err(DomainError::Conflict(_))
        ));
    }

    #[test]
    fn test_dispatch_before_window_does_nothing() {
        let (conn, _tmp) = connection();
        let staff = session(UserRole::Staff);
        let supervisor = session(UserRole::Supervisor);
        let child = enrol_child(conn.clone(), &staff, "Oliver");
        let sender = Arc::new(RecordingSender::default());
        let service = service_with_sender(conn, sender.clone());

        service
            .save_note(&staff, &child.id, dispatch_day(), note_request("Happy"))
            .unwrap();
        let report = service.dispatch_due(&supervisor, before_window()).unwrap();
        assert_eq!(report, DispatchReport::default());
        assert!(sender.recorded().is_empty());
    }

    #[test]
    fn test_dispatch_sends_approved_update_to_usable_guardians() {
        let (conn, _tmp) = connection();
        let staff = session(UserRole::Staff);
        let supervisor = session(UserRole::Supervisor);
        let child = enrol_child(conn.clone(), &staff, "Oliver");
        link_guardian(
            conn.clone(),
            &staff,
            &child.id,
            Some("pat@example.com"),
            None,
            "EMAIL",
        );
        let sender = Arc::new(RecordingSender::default());
        let service = service_with_sender(conn.clone(), sender.clone());

        let (_, update) = service
            .save_note(&staff, &child.id, dispatch_day(), note_request("Happy"))
            .unwrap();
        service.approve(&supervisor, &update.id).unwrap();

        let report = service.dispatch_due(&supervisor, after_window()).unwrap();
        assert_eq!(report.sent, 1);
        assert_eq!(report.outcomes[0].recipients_sent, 1);

        let sends = sender.recorded();
        assert_eq!(sends.len(), 1);
        assert_eq!(sends[0].recipient, "pat@example.com");
        assert_eq!(sends[0].subject, "Daily Update - Oliver Smith");

        let refreshed = service
            .updates
            .get_update(&staff.organisation_id, &update.id)
            .unwrap()
            .unwrap();
        assert_eq!(refreshed.status, DailyUpdateStatus::Sent);
        assert!(refreshed.sent_at.is_some());
        let logs = service
            .updates
            .logs_for_update(&staff.organisation_id, &update.id)
            .unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].delivery_status, DeliveryStatus::Sent);
    }

    #[test]
    fn test_dispatch_falls_back_to_secondary_channel() {
        let (conn, _tmp) = connection();
        let staff = session(UserRole::Staff);
        let supervisor = session(UserRole::Supervisor);
        let child = enrol_child(conn.clone(), &staff, "Oliver");
        // Prefers WhatsApp but only has an email address.
        link_guardian(
            conn.clone(),
            &staff,
            &child.id,
            Some("pat@example.com"),
            None,
            "WHATSAPP",
        );
        let sender = Arc::new(RecordingSender::default());
        let service = service_with_sender(conn, sender.clone());

        let (_, update) = service
            .save_note(&staff, &child.id, dispatch_day(), note_request("Happy"))
            .unwrap();
        service.approve(&supervisor, &update.id).unwrap();
        service.dispatch_due(&supervisor, after_window()).unwrap();

        let sends = sender.recorded();
        assert_eq!(sends.len(), 1);
        assert_eq!(
            sends[0].channel,
            crate::domain::models::guardian::CommunicationChannel::Email
        );
        assert!(sends[0].body.starts_with("Daily Update - Oliver Smith"));
    }

    #[test]
    fn test_dispatch_marks_unapproved_updates_missed_and_raises_task() {
        let (conn, _tmp) = connection();
        let staff = session(UserRole::Staff);
        let supervisor = session(UserRole::Supervisor);
        let child = enrol_child(conn.clone(), &staff, "Oliver");
        let service = service_with_sender(conn.clone(), Arc::new(RecordingSender::default()));

        let (_, update) = service
            .save_note(&staff, &child.id, dispatch_day(), note_request("Happy"))
            .unwrap();
        let report = service.dispatch_due(&supervisor, after_window()).unwrap();
        assert_eq!(report.missed, 1);

        let refreshed = service
            .updates
            .get_update(&staff.organisation_id, &update.id)
            .unwrap()
            .unwrap();
        assert_eq!(refreshed.status, DailyUpdateStatus::Missed);

        let tasks = TaskRepository::new(conn)
            .list_tasks(&staff.organisation_id)
            .unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].category, TaskCategory::ParentUpdates);
        assert_eq!(tasks[0].linked_date, Some(dispatch_day()));
    }

    #[test]
    fn test_partial_failure_still_counts_as_sent() {
        let (conn, _tmp) = connection();
        let staff = session(UserRole::Staff);
        let supervisor = session(UserRole::Supervisor);
        let child = enrol_child(conn.clone(), &staff, "Oliver");
        link_guardian(
            conn.clone(),
            &staff,
            &child.id,
            Some("pat@example.com"),
            None,
            "EMAIL",
        );
        link_guardian(
            conn.clone(),
            &staff,
            &child.id,
            Some("broken@example.com"),
            None,
            "EMAIL",
        );
        let sender = Arc::new(RecordingSender::failing_for(&["broken@example.com"]));
        let service = service_with_sender(conn, sender);

        let (_, update) = service
            .save_note(&staff, &child.id, dispatch_day(), note_request("Happy"))
            .unwrap();
        service.approve(&supervisor, &update.id).unwrap();
        let report = service.dispatch_due(&supervisor, after_window()).unwrap();

        assert_eq!(report.sent, 1);
        assert_eq!(report.failed, 0);
        assert_eq!(report.outcomes[0].recipients_sent, 1);
        assert_eq!(report.outcomes[0].recipients_failed, 1);

        let refreshed = service
            .updates
            .get_update(&staff.organisation_id, &update.id)
            .unwrap()
            .unwrap();
        assert_eq!(refreshed.status, DailyUpdateStatus::Sent);
        let logs = service
            .updates
            .logs_for_update(&staff.organisation_id, &update.id)
            .unwrap();
        assert_eq!(logs.len(), 2);
        assert!(logs
            .iter()
            .any(|l| l.delivery_status == DeliveryStatus::Failed && l.error.is_some()));
    }

    #[test]
    fn test_total_failure_marks_update_failed() {
        let (conn, _tmp) = connection();
        let staff = session(UserRole::Staff);
        let supervisor = session(UserRole::Supervisor);
        let child = enrol_child(conn.clone(), &staff, "Oliver");
        link_guardian(
            conn.clone(),
            &staff,
            &child.id,
            Some("broken@example.com"),
            None,
            "EMAIL",
        );
        let sender = Arc::new(RecordingSender::failing_for(&["broken@example.com"]));
        let service = service_with_sender(conn, sender);

        let (_, update) = service
            .save_note(&staff, &child.id, dispatch_day(), note_request("Happy"))
            .unwrap();
        service.approve(&supervisor, &update.id).unwrap();
        let report = service.dispatch_due(&supervisor, after_window()).unwrap();
        assert_eq!(report.failed, 1);

        let refreshed = service
            .updates
            .get_update(&staff.organisation_id, &update.id)
            .unwrap()
            .unwrap();
        assert_eq!(refreshed.status, DailyUpdateStatus::Failed);
        assert_eq!(refreshed.sent_at, None);
    }

    #[test]
    fn test_unreachable_guardians_block_the_send() {
        let (conn, _tmp) = connection();
        let staff = session(UserRole::Staff);
        let supervisor = session(UserRole::Supervisor);
        let child = enrol_child(conn.clone(), &staff, "Oliver");
        link_guardian(conn.clone(), &staff, &child.id, None, None, "EMAIL");
        let sender = Arc::new(RecordingSender::default());
        let service = service_with_sender(conn, sender.clone());

        let (_, update) = service
            .save_note(&staff, &child.id, dispatch_day(), note_request("Happy"))
            .unwrap();
        service.approve(&supervisor, &update.id).unwrap();
        let report = service.dispatch_due(&supervisor, after_window()).unwrap();
        assert_eq!(report.blocked, 1);
        assert!(sender.recorded().is_empty());

        let refreshed = service
            .updates
            .get_update(&staff.organisation_id, &update.id)
            .unwrap()
            .unwrap();
        assert_eq!(refreshed.status, DailyUpdateStatus::Approved);
        assert!(service
            .updates
            .logs_for_update(&staff.organisation_id, &update.id)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_approval_queue_orders_and_summarises() {
        let (conn, _tmp) = connection();
        let staff = session(UserRole::Staff);
        let supervisor = session(UserRole::Supervisor);
        let oliver = enrol_child(conn.clone(), &staff, "Oliver");
        let amelia = enrol_child(conn.clone(), &staff, "Amelia");
        let service = service_with_sender(conn, Arc::new(RecordingSender::default()));

        let (_, first) = service
            .save_note(&staff, &oliver.id, dispatch_day(), note_request("Happy"))
            .unwrap();
        service
            .save_note(&staff, &amelia.id, dispatch_day(), note_request("Calm"))
            .unwrap();
        service.approve(&supervisor, &first.id).unwrap();

        let (entries, summary) = service.approval_queue(&staff, dispatch_day()).unwrap();
        assert_eq!(entries.len(), 2);
        // The approval touched Oliver's update last.
        assert_eq!(entries[0].update.child_id, oliver.id);
        assert!(entries[0].approval.is_some());
        assert_eq!(summary.needs_approval, 1);
        assert_eq!(summary.approved, 1);
        assert_eq!(summary.completion_rate, 50);
    }

    #[test]
    fn test_dispatch_requires_supervisor() {
        let (conn, _tmp) = connection();
        let staff = session(UserRole::Staff);
        let service = service_with_sender(conn, Arc::new(RecordingSender::default()));
        assert!(matches!(
            service.dispatch_due(&staff, after_window()),
            Err(DomainError::Forbidden(_))
        ));
    }
}
