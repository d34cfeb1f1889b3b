//! Domain layer: services own the business rules, models are the records
//! they operate on, and everything below the services goes through the
//! storage traits.

pub mod auth;
pub mod error;
pub mod models;

pub mod affiliate_service;
pub mod attendance_service;
pub mod child_service;
pub mod consent_service;
pub mod daily_update_service;
pub mod dashboard_service;
pub mod evidence_service;
pub mod guardian_service;
pub mod incident_service;
pub mod invoice_service;
pub mod message_compiler;
pub mod message_sender;
pub mod organisation_service;
pub mod task_service;

#[cfg(test)]
pub mod test_support;

pub use affiliate_service::AffiliateService;
pub use attendance_service::AttendanceService;
pub use child_service::ChildService;
pub use consent_service::ConsentService;
pub use daily_update_service::DailyUpdateService;
pub use dashboard_service::DashboardService;
pub use evidence_service::EvidenceService;
pub use guardian_service::GuardianService;
pub use incident_service::IncidentService;
pub use invoice_service::InvoiceService;
pub use organisation_service::OrganisationService;
pub use task_service::TaskService;
