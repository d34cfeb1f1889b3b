use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsentStatus {
    Signed,
    Missing,
    Expired,
}

impl ConsentStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "SIGNED" => Some(ConsentStatus::Signed),
            "MISSING" => Some(ConsentStatus::Missing),
            "EXPIRED" => Some(ConsentStatus::Expired),
            _ => None,
        }
    }
}

/// A kind of permission the organisation collects (photo, medical, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsentTemplate {
    pub id: String,
    pub organisation_id: String,
    pub name: String,
    pub description: Option<String>,
    pub requires_expiry: bool,
    pub created_at: DateTime<Utc>,
}

/// Per-child instance of a consent template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsentRecord {
    pub id: String,
    pub organisation_id: String,
    pub child_id: String,
    pub template_id: String,
    pub status: ConsentStatus,
    pub signed_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub created_by_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
