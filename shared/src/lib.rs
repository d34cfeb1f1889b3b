//! Wire types shared between the nursery-hub backend and its API clients.
//!
//! Request payloads and aggregate response shapes live here; full entity
//! records are serialized directly from the backend's domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Structured error body returned by every failing API route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ---------------------------------------------------------------------------
// Children & guardians
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateChildRequest {
    pub first_name: String,
    pub last_name: String,
    /// ISO 8601 date (YYYY-MM-DD)
    pub date_of_birth: String,
    /// ISO 8601 date (YYYY-MM-DD)
    pub start_date: String,
    pub room: Option<String>,
    pub dietary_needs: Option<String>,
    pub medical_notes: Option<String>,
    pub key_person_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateChildRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub room: Option<String>,
    pub dietary_needs: Option<String>,
    pub medical_notes: Option<String>,
    pub key_person_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateGuardianRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub relationship: Option<String>,
    pub pickup_permission: bool,
    /// "EMAIL" or "WHATSAPP"
    pub preferred_channel: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkGuardianRequest {
    pub is_primary: bool,
}

// ---------------------------------------------------------------------------
// Attendance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInRequest {
    pub child_id: String,
    /// Defaults to now when omitted.
    pub check_in_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckOutRequest {
    pub check_out_time: Option<DateTime<Utc>>,
}

/// Record a day off without a check-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkAbsenceRequest {
    pub child_id: String,
    /// ISO 8601 date (YYYY-MM-DD)
    pub date: String,
    /// "ABSENT", "SICK" or "HOLIDAY"
    pub status: String,
}

/// Today's register at a glance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterSummary {
    pub date: NaiveDate,
    pub total_children: usize,
    pub present: usize,
    /// Checked in and not yet checked out.
    pub checked_in: usize,
    pub checked_out: usize,
}

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateInvoiceRequest {
    pub child_id: String,
    pub amount: f64,
    /// ISO 8601 date (YYYY-MM-DD)
    pub due_date: String,
    pub description: String,
}

// ---------------------------------------------------------------------------
// Consents
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateConsentTemplateRequest {
    pub name: String,
    pub description: Option<String>,
    pub requires_expiry: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsertConsentRequest {
    pub child_id: String,
    pub template_id: String,
    /// "SIGNED", "MISSING" or "EXPIRED"
    pub status: String,
    pub signed_date: Option<String>,
    pub expiry_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsentOverview {
    pub total: usize,
    pub signed: usize,
    pub missing: usize,
    pub expired: usize,
    /// `total - (missing + expired)`
    pub complete: usize,
}

// ---------------------------------------------------------------------------
// Evidence vault
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateEvidenceRequest {
    pub name: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetEvidenceStatusRequest {
    /// "READY" or "NOT_READY"
    pub status: String,
}

// ---------------------------------------------------------------------------
// Incidents
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateIncidentRequest {
    pub child_id: String,
    pub occurred_at: DateTime<Utc>,
    pub description: String,
    /// "MINOR", "MODERATE" or "SERIOUS"
    pub severity: String,
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    /// ISO 8601 date (YYYY-MM-DD)
    pub due_date: String,
    /// "COMPLIANCE", "FINANCE", "PARENT_UPDATES" or "GENERAL"
    pub category: String,
    pub assigned_to_id: Option<String>,
    pub child_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetTaskStatusRequest {
    /// "PENDING", "IN_PROGRESS" or "COMPLETED"
    pub status: String,
}

// ---------------------------------------------------------------------------
// Daily updates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveDailyNoteRequest {
    pub wellbeing: Option<String>,
    pub meals: Option<String>,
    pub naps: Option<String>,
    pub toileting: Option<String>,
    pub activities: Option<String>,
    pub notable_events: Option<String>,
}

/// Headline numbers for the approval queue view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalQueueSummary {
    pub needs_approval: usize,
    pub approved: usize,
    /// approved / (needs_approval + approved) × 100, rounded. 0 when empty.
    pub completion_rate: u32,
}

/// Per-update outcome of a dispatch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchOutcome {
    pub daily_update_id: String,
    pub child_id: String,
    /// "SENT", "FAILED", "MISSED" or "BLOCKED"
    pub result: String,
    pub recipients_sent: usize,
    pub recipients_failed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DispatchReport {
    pub sent: usize,
    pub failed: usize,
    pub missed: usize,
    pub blocked: usize,
    pub outcomes: Vec<DispatchOutcome>,
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub total_children: usize,
    pub present_today: usize,
    pub overdue_invoices: usize,
    pub missing_or_expired_consents: usize,
    pub updates_pending_approval: usize,
    pub tasks_due_today: usize,
    pub evidence_ready: usize,
    pub evidence_total: usize,
    /// ready / total × 100, rounded. 0 when the vault is empty.
    pub evidence_readiness_score: u32,
}

// ---------------------------------------------------------------------------
// Organisation settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateOrganisationSettingsRequest {
    /// "HH:MM"
    pub daily_update_schedule_time: Option<String>,
    /// Weekday abbreviations, e.g. ["Mon", "Tue"]
    pub daily_update_schedule_days: Option<Vec<String>>,
    /// "OWNER", "ADMIN", "SUPERVISOR" or "STAFF"
    pub daily_update_default_approver: Option<String>,
}

// ---------------------------------------------------------------------------
// Affiliate programme
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffiliateApplyRequest {
    pub name: String,
    pub email: String,
    pub company_description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffiliateApplyResponse {
    pub success: bool,
    #[serde(default)]
    pub reapplication: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AffiliateAction {
    #[serde(rename = "APPROVE")]
    Approve,
    #[serde(rename = "REJECT")]
    Reject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffiliateActionRequest {
    pub action: AffiliateAction,
    pub review_notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffiliateActionResponse {
    pub success: bool,
    pub referral_code: Option<String>,
}
