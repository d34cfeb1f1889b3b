//! Storage abstraction traits.
//!
//! The domain layer only talks to these traits, so the YAML-file backend can
//! be swapped for a database without touching the services. Every scoped
//! method takes the organisation id of the caller; implementations must not
//! return rows belonging to any other organisation.

use anyhow::Result;
use chrono::NaiveDate;

use crate::domain::models::affiliate::AffiliateApplication;
use crate::domain::models::attendance::Attendance;
use crate::domain::models::child::Child;
use crate::domain::models::consent::{ConsentRecord, ConsentTemplate};
use crate::domain::models::daily_update::{
    DailyNote, DailyUpdate, DailyUpdateApproval, OutboundMessageLog,
};
use crate::domain::models::evidence::EvidenceItem;
use crate::domain::models::guardian::{ChildGuardian, Guardian};
use crate::domain::models::incident::IncidentLog;
use crate::domain::models::invoice::PaymentInvoice;
use crate::domain::models::organisation::OrganisationSettings;
use crate::domain::models::task::Task;

pub trait ChildStorage: Send + Sync {
    fn store_child(&self, child: &Child) -> Result<()>;
    fn get_child(&self, organisation_id: &str, child_id: &str) -> Result<Option<Child>>;
    /// Ordered by last name, then first name.
    fn list_children(&self, organisation_id: &str) -> Result<Vec<Child>>;
    fn update_child(&self, child: &Child) -> Result<()>;
    /// Returns true when a record was actually removed.
    fn delete_child(&self, organisation_id: &str, child_id: &str) -> Result<bool>;
}

pub trait GuardianStorage: Send + Sync {
    fn store_guardian(&self, guardian: &Guardian) -> Result<()>;
    fn get_guardian(&self, organisation_id: &str, guardian_id: &str) -> Result<Option<Guardian>>;
    fn list_guardians(&self, organisation_id: &str) -> Result<Vec<Guardian>>;
    fn update_guardian(&self, guardian: &Guardian) -> Result<()>;
    /// Link a guardian to a child; re-linking updates the primary flag.
    fn link_child(&self, organisation_id: &str, link: &ChildGuardian) -> Result<()>;
    /// Guardians of a child together with their primary flag.
    fn guardians_for_child(
        &self,
        organisation_id: &str,
        child_id: &str,
    ) -> Result<Vec<(Guardian, bool)>>;
}

pub trait AttendanceStorage: Send + Sync {
    fn store_attendance(&self, attendance: &Attendance) -> Result<()>;
    fn get_attendance(
        &self,
        organisation_id: &str,
        attendance_id: &str,
    ) -> Result<Option<Attendance>>;
    fn find_for_child_on_date(
        &self,
        organisation_id: &str,
        child_id: &str,
        date: NaiveDate,
    ) -> Result<Option<Attendance>>;
    fn list_for_date(&self, organisation_id: &str, date: NaiveDate) -> Result<Vec<Attendance>>;
    fn update_attendance(&self, attendance: &Attendance) -> Result<()>;
}

pub trait InvoiceStorage: Send + Sync {
    fn store_invoice(&self, invoice: &PaymentInvoice) -> Result<()>;
    fn get_invoice(
        &self,
        organisation_id: &str,
        invoice_id: &str,
    ) -> Result<Option<PaymentInvoice>>;
    /// Ordered by due date descending.
    fn list_invoices(&self, organisation_id: &str) -> Result<Vec<PaymentInvoice>>;
    fn update_invoice(&self, invoice: &PaymentInvoice) -> Result<()>;
}

pub trait ConsentStorage: Send + Sync {
    fn store_template(&self, template: &ConsentTemplate) -> Result<()>;
    fn list_templates(&self, organisation_id: &str) -> Result<Vec<ConsentTemplate>>;
    fn get_template(
        &self,
        organisation_id: &str,
        template_id: &str,
    ) -> Result<Option<ConsentTemplate>>;
    fn store_record(&self, record: &ConsentRecord) -> Result<()>;
    fn update_record(&self, record: &ConsentRecord) -> Result<()>;
    fn find_record(
        &self,
        organisation_id: &str,
        child_id: &str,
        template_id: &str,
    ) -> Result<Option<ConsentRecord>>;
    fn list_records(&self, organisation_id: &str) -> Result<Vec<ConsentRecord>>;
    fn list_records_for_child(
        &self,
        organisation_id: &str,
        child_id: &str,
    ) -> Result<Vec<ConsentRecord>>;
}

pub trait EvidenceStorage: Send + Sync {
    fn store_item(&self, item: &EvidenceItem) -> Result<()>;
    fn get_item(&self, organisation_id: &str, item_id: &str) -> Result<Option<EvidenceItem>>;
    fn list_items(&self, organisation_id: &str) -> Result<Vec<EvidenceItem>>;
    fn update_item(&self, item: &EvidenceItem) -> Result<()>;
}

pub trait IncidentStorage: Send + Sync {
    fn store_incident(&self, incident: &IncidentLog) -> Result<()>;
    fn get_incident(
        &self,
        organisation_id: &str,
        incident_id: &str,
    ) -> Result<Option<IncidentLog>>;
    /// Ordered by occurred_at descending.
    fn list_incidents(&self, organisation_id: &str) -> Result<Vec<IncidentLog>>;
    fn update_incident(&self, incident: &IncidentLog) -> Result<()>;
}

pub trait TaskStorage: Send + Sync {
    fn store_task(&self, task: &Task) -> Result<()>;
    fn get_task(&self, organisation_id: &str, task_id: &str) -> Result<Option<Task>>;
    /// Ordered by due date ascending.
    fn list_tasks(&self, organisation_id: &str) -> Result<Vec<Task>>;
    fn update_task(&self, task: &Task) -> Result<()>;
}

pub trait DailyUpdateStorage: Send + Sync {
    /// Insert or replace the note keyed by (child_id, date).
    fn upsert_note(&self, note: &DailyNote) -> Result<()>;
    fn find_note(
        &self,
        organisation_id: &str,
        child_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DailyNote>>;
    fn notes_for_date(&self, organisation_id: &str, date: NaiveDate) -> Result<Vec<DailyNote>>;

    fn store_update(&self, update: &DailyUpdate) -> Result<()>;
    fn update_update(&self, update: &DailyUpdate) -> Result<()>;
    fn get_update(&self, organisation_id: &str, update_id: &str) -> Result<Option<DailyUpdate>>;
    fn find_update(
        &self,
        organisation_id: &str,
        child_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DailyUpdate>>;
    fn updates_for_date(&self, organisation_id: &str, date: NaiveDate) -> Result<Vec<DailyUpdate>>;

    fn store_approval(&self, organisation_id: &str, approval: &DailyUpdateApproval) -> Result<()>;
    fn approval_for_update(
        &self,
        organisation_id: &str,
        daily_update_id: &str,
    ) -> Result<Option<DailyUpdateApproval>>;

    fn append_message_log(&self, entry: &OutboundMessageLog) -> Result<()>;
    fn logs_for_update(
        &self,
        organisation_id: &str,
        daily_update_id: &str,
    ) -> Result<Vec<OutboundMessageLog>>;
}

pub trait AffiliateStorage: Send + Sync {
    fn store_application(&self, application: &AffiliateApplication) -> Result<()>;
    fn get_application(&self, application_id: &str) -> Result<Option<AffiliateApplication>>;
    /// Email comparison is on the stored (lowercase) value.
    fn find_by_email(&self, email: &str) -> Result<Option<AffiliateApplication>>;
    fn find_by_referral_code(&self, code: &str) -> Result<Option<AffiliateApplication>>;
    fn update_application(&self, application: &AffiliateApplication) -> Result<()>;
    fn list_applications(&self) -> Result<Vec<AffiliateApplication>>;
}

pub trait OrganisationStorage: Send + Sync {
    fn get_settings(&self, organisation_id: &str) -> Result<Option<OrganisationSettings>>;
    fn save_settings(&self, settings: &OrganisationSettings) -> Result<()>;
}
