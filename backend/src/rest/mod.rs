//! HTTP layer: route table, session extraction and error mapping.

pub mod error;
pub mod session;

mod affiliates;
mod attendance;
mod children;
mod consents;
mod daily_updates;
mod dashboard;
mod evidence;
mod guardians;
mod incidents;
mod invoices;
mod settings;
mod tasks;

use axum::routing::{get, patch, post, put};
use axum::Router;
use std::sync::Arc;

use crate::domain::message_sender::MessageSender;
use crate::domain::{
    AffiliateService, AttendanceService, ChildService, ConsentService, DailyUpdateService,
    DashboardService, EvidenceService, GuardianService, IncidentService, InvoiceService,
    OrganisationService, TaskService,
};
use crate::storage::yaml::Connection;

/// Shared handler state: one instance of every domain service.
#[derive(Clone)]
pub struct AppState {
    pub children: ChildService,
    pub guardians: GuardianService,
    pub attendance: AttendanceService,
    pub invoices: InvoiceService,
    pub consents: ConsentService,
    pub evidence: EvidenceService,
    pub incidents: IncidentService,
    pub tasks: TaskService,
    pub daily_updates: DailyUpdateService,
    pub dashboard: DashboardService,
    pub affiliates: AffiliateService,
    pub organisation: OrganisationService,
}

impl AppState {
    pub fn new(connection: Arc<Connection>, sender: Arc<dyn MessageSender>) -> Self {
        Self {
            children: ChildService::new(connection.clone()),
            guardians: GuardianService::new(connection.clone()),
            attendance: AttendanceService::new(connection.clone()),
            invoices: InvoiceService::new(connection.clone()),
            consents: ConsentService::new(connection.clone()),
            evidence: EvidenceService::new(connection.clone()),
            incidents: IncidentService::new(connection.clone()),
            tasks: TaskService::new(connection.clone()),
            daily_updates: DailyUpdateService::new(connection.clone(), sender.clone()),
            dashboard: DashboardService::new(connection.clone(), sender),
            affiliates: AffiliateService::new(connection.clone()),
            organisation: OrganisationService::new(connection),
        }
    }
}

/// The `/api` route table.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard::get_dashboard))
        .route("/children", get(children::list_children).post(children::create_child))
        .route(
            "/children/:id",
            get(children::get_child)
                .put(children::update_child)
                .delete(children::delete_child),
        )
        .route("/children/:id/guardians", get(guardians::guardians_for_child))
        .route("/children/:id/consents", get(consents::consents_for_child))
        .route("/guardians", post(guardians::create_guardian))
        .route(
            "/children/:id/guardians/:guardian_id",
            post(guardians::link_guardian),
        )
        .route("/registers/today", get(attendance::todays_register))
        .route("/attendance/check-in", post(attendance::check_in))
        .route("/attendance/absence", post(attendance::mark_absence))
        .route("/attendance/:id/check-out", post(attendance::check_out))
        .route("/invoices", get(invoices::list_invoices).post(invoices::create_invoice))
        .route("/invoices/:id/pay", post(invoices::mark_paid))
        .route("/consents/overview", get(consents::overview))
        .route("/consent-templates", post(consents::create_template))
        .route("/consents", post(consents::upsert_consent))
        .route("/evidence", get(evidence::list_items).post(evidence::create_item))
        .route("/evidence/:id/status", post(evidence::set_status))
        .route(
            "/incidents",
            get(incidents::list_incidents).post(incidents::report_incident),
        )
        .route("/incidents/:id/notify", post(incidents::mark_parent_notified))
        .route("/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route("/tasks/:id/status", post(tasks::set_status))
        .route("/daily-notes/:child_id/:date", put(daily_updates::save_note))
        .route(
            "/daily-updates/approval-queue",
            get(daily_updates::approval_queue),
        )
        .route("/daily-updates/:id/approve", post(daily_updates::approve))
        .route(
            "/daily-updates/dispatch-due",
            post(daily_updates::dispatch_due),
        )
        .route(
            "/settings/organisation",
            get(settings::get_settings).put(settings::update_settings),
        )
        .route("/affiliate/apply", post(affiliates::apply))
        .route("/affiliate", get(affiliates::list_applications))
        .route("/affiliate/:id", patch(affiliates::action))
}
