use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::guardian::CommunicationChannel;

/// Raw staff observations for one child on one calendar day.
/// Key is (child_id, date); fields hold trimmed text, never blank strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyNote {
    pub id: String,
    pub organisation_id: String,
    pub child_id: String,
    pub date: NaiveDate,
    pub wellbeing: Option<String>,
    pub meals: Option<String>,
    pub naps: Option<String>,
    pub toileting: Option<String>,
    pub activities: Option<String>,
    pub notable_events: Option<String>,
    pub created_by_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DailyNote {
    /// At least one observation recorded.
    pub fn has_content(&self) -> bool {
        self.wellbeing.is_some()
            || self.meals.is_some()
            || self.naps.is_some()
            || self.toileting.is_some()
            || self.activities.is_some()
            || self.notable_events.is_some()
    }
}

/// Lifecycle of a daily update.
///
/// DRAFT → NEEDS_APPROVAL → APPROVED → SENT, with MISSED (schedule passed
/// before approval) and FAILED (every recipient errored) as side terminals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DailyUpdateStatus {
    Draft,
    NeedsApproval,
    Approved,
    Sent,
    Missed,
    Failed,
}

impl DailyUpdateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DailyUpdateStatus::Draft => "DRAFT",
            DailyUpdateStatus::NeedsApproval => "NEEDS_APPROVAL",
            DailyUpdateStatus::Approved => "APPROVED",
            DailyUpdateStatus::Sent => "SENT",
            DailyUpdateStatus::Missed => "MISSED",
            DailyUpdateStatus::Failed => "FAILED",
        }
    }
}

/// Compiled per-child, per-day message awaiting approval and sending.
/// Key is (child_id, date), same as the note it derives from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyUpdate {
    pub id: String,
    pub organisation_id: String,
    pub child_id: String,
    pub date: NaiveDate,
    pub status: DailyUpdateStatus,
    pub compiled_email_content: String,
    pub compiled_whatsapp_content: String,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Audit record for the supervisor sign-off. At most one per daily update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyUpdateApproval {
    pub id: String,
    pub daily_update_id: String,
    pub approved_by_id: String,
    pub approved_by_name: String,
    pub approved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    Sent,
    Failed,
}

/// Append-only audit row for one attempted guardian send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessageLog {
    pub id: String,
    pub organisation_id: String,
    pub daily_update_id: String,
    pub guardian_id: String,
    pub channel: CommunicationChannel,
    pub recipient: String,
    pub body: String,
    pub delivery_status: DeliveryStatus,
    pub error: Option<String>,
    pub attempted_at: DateTime<Utc>,
}
