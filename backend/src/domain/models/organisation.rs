use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::domain::auth::UserRole;

/// Per-organisation configuration consumed by the daily-update workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganisationSettings {
    pub organisation_id: String,
    pub name: String,
    /// "HH:MM", the earliest time dispatch may run.
    pub daily_update_schedule_time: String,
    /// Weekday abbreviations, e.g. ["Mon", "Tue", "Wed", "Thu", "Fri"].
    pub daily_update_schedule_days: Vec<String>,
    pub daily_update_default_approver: UserRole,
}

impl OrganisationSettings {
    pub fn defaults(organisation_id: &str, name: &str) -> Self {
        Self {
            organisation_id: organisation_id.to_string(),
            name: name.to_string(),
            daily_update_schedule_time: "17:00".to_string(),
            daily_update_schedule_days: ["Mon", "Tue", "Wed", "Thu", "Fri"]
                .iter()
                .map(|d| d.to_string())
                .collect(),
            daily_update_default_approver: UserRole::Supervisor,
        }
    }

    pub fn schedule_time(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(&self.daily_update_schedule_time, "%H:%M").ok()
    }

    pub fn is_scheduled_day(&self, weekday: Weekday) -> bool {
        let abbrev = match weekday {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        };
        self.daily_update_schedule_days.iter().any(|d| d == abbrev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_weekdays_only() {
        let settings = OrganisationSettings::defaults("org1", "Sunshine Nursery");
        assert!(settings.is_scheduled_day(Weekday::Mon));
        assert!(settings.is_scheduled_day(Weekday::Fri));
        assert!(!settings.is_scheduled_day(Weekday::Sat));
        assert_eq!(
            settings.schedule_time(),
            NaiveTime::from_hms_opt(17, 0, 0)
        );
    }

    #[test]
    fn test_bad_schedule_time_parses_as_none() {
        let mut settings = OrganisationSettings::defaults("org1", "n");
        settings.daily_update_schedule_time = "25:99".to_string();
        assert_eq!(settings.schedule_time(), None);
    }
}
