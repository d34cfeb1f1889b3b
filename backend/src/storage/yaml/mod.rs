//! YAML file storage backend.
//!
//! One file per collection per organisation, written atomically. Small
//! enough for a single-site deployment while keeping the domain layer
//! storage-agnostic behind the traits in [`crate::storage::traits`].

pub mod affiliate_repository;
pub mod attendance_repository;
pub mod child_repository;
pub mod connection;
pub mod consent_repository;
pub mod daily_update_repository;
pub mod evidence_repository;
pub mod guardian_repository;
pub mod incident_repository;
pub mod invoice_repository;
pub mod organisation_repository;
pub mod task_repository;

pub use affiliate_repository::AffiliateRepository;
pub use attendance_repository::AttendanceRepository;
pub use child_repository::ChildRepository;
pub use connection::Connection;
pub use consent_repository::ConsentRepository;
pub use daily_update_repository::DailyUpdateRepository;
pub use evidence_repository::EvidenceRepository;
pub use guardian_repository::GuardianRepository;
pub use incident_repository::IncidentRepository;
pub use invoice_repository::InvoiceRepository;
pub use organisation_repository::OrganisationRepository;
pub use task_repository::TaskRepository;
