use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvidenceStatus {
    Ready,
    NotReady,
}

impl EvidenceStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "READY" => Some(EvidenceStatus::Ready),
            "NOT_READY" => Some(EvidenceStatus::NotReady),
            _ => None,
        }
    }
}

/// Compliance document tracked in the evidence vault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceItem {
    pub id: String,
    pub organisation_id: String,
    pub name: String,
    pub category: String,
    pub status: EvidenceStatus,
    pub last_reviewed_at: Option<DateTime<Utc>>,
    pub created_by_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// ready / total × 100, rounded. 0 when there are no items.
pub fn readiness_score(ready: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((ready as f64 / total as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readiness_score() {
        assert_eq!(readiness_score(0, 0), 0);
        assert_eq!(readiness_score(5, 8), 63);
        assert_eq!(readiness_score(8, 8), 100);
        assert_eq!(readiness_score(1, 3), 33);
    }
}
