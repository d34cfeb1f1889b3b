use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncidentSeverity {
    Minor,
    Moderate,
    Serious,
}

impl IncidentSeverity {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "MINOR" => Some(IncidentSeverity::Minor),
            "MODERATE" => Some(IncidentSeverity::Moderate),
            "SERIOUS" => Some(IncidentSeverity::Serious),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentLog {
    pub id: String,
    pub organisation_id: String,
    pub child_id: String,
    pub occurred_at: DateTime<Utc>,
    pub description: String,
    pub severity: IncidentSeverity,
    pub parent_notified: bool,
    pub parent_notified_at: Option<DateTime<Utc>>,
    pub reported_by_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
