use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A child enrolled with an organisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Child {
    pub id: String,
    pub organisation_id: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub start_date: NaiveDate,
    pub room: Option<String>,
    pub dietary_needs: Option<String>,
    pub medical_notes: Option<String>,
    /// Staff user responsible for this child.
    pub key_person_id: Option<String>,
    pub created_by_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Child {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
