use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
    Overdue,
}

impl PaymentStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "UNPAID" => Some(PaymentStatus::Unpaid),
            "PAID" => Some(PaymentStatus::Paid),
            "OVERDUE" => Some(PaymentStatus::Overdue),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentInvoice {
    pub id: String,
    pub organisation_id: String,
    pub child_id: String,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
    pub status: PaymentStatus,
    pub description: String,
    pub created_by_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PaymentInvoice {
    /// Whole days past the due date, rounded up. 0 when not yet due.
    pub fn days_overdue(&self, today: NaiveDate) -> i64 {
        (today - self.due_date).num_days().max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn invoice(due: NaiveDate) -> PaymentInvoice {
        let now = Utc::now();
        PaymentInvoice {
            id: "inv1".to_string(),
            organisation_id: "org1".to_string(),
            child_id: "c1".to_string(),
            amount: 1200.0,
            due_date: due,
            paid_date: None,
            status: PaymentStatus::Overdue,
            description: "Monthly fee".to_string(),
            created_by_id: "u1".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_days_overdue_counts_whole_days() {
        let due = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 1, 12).unwrap();
        assert_eq!(invoice(due).days_overdue(today), 7);
    }

    #[test]
    fn test_days_overdue_is_zero_before_due() {
        let due = NaiveDate::from_ymd_opt(2026, 2, 5).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 1, 12).unwrap();
        assert_eq!(invoice(due).days_overdue(today), 0);
    }
}
