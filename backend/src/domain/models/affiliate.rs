use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AffiliateStatus {
    Pending,
    Approved,
    Rejected,
}

/// Partner application for the referral programme. Not organisation-scoped:
/// applicants are members of the public.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffiliateApplication {
    pub id: String,
    pub name: String,
    /// Stored lowercase; uniqueness is on this field.
    pub email: String,
    pub company_description: String,
    pub status: AffiliateStatus,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by_id: Option<String>,
    pub review_notes: Option<String>,
    pub referral_code: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
