use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskCategory {
    Compliance,
    Finance,
    ParentUpdates,
    General,
}

impl TaskCategory {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "COMPLIANCE" => Some(TaskCategory::Compliance),
            "FINANCE" => Some(TaskCategory::Finance),
            "PARENT_UPDATES" => Some(TaskCategory::ParentUpdates),
            "GENERAL" => Some(TaskCategory::General),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Some(TaskStatus::Pending),
            "IN_PROGRESS" => Some(TaskStatus::InProgress),
            "COMPLETED" => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub organisation_id: String,
    pub title: String,
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub category: TaskCategory,
    pub status: TaskStatus,
    pub assigned_to_id: Option<String>,
    pub child_id: Option<String>,
    /// Calendar date a task is tied to, e.g. the day of a daily update.
    pub linked_date: Option<NaiveDate>,
    pub created_by_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
