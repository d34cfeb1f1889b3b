//! Compiles a day's note into the per-channel message bodies.
//!
//! Compilation is a pure function of the note fields and the child's name:
//! no clock, no randomness, no storage. Identical input yields byte-identical
//! output, so bodies can be regenerated on every note edit.

use crate::domain::models::daily_update::DailyNote;

#[derive(Debug, Clone, PartialEq)]
pub struct CompiledMessages {
    pub email: String,
    pub whatsapp: String,
}

/// (label, accessor) pairs in the order sections appear in the message.
fn sections(note: &DailyNote) -> Vec<(&'static str, &str)> {
    [
        ("Wellbeing", note.wellbeing.as_deref()),
        ("Meals", note.meals.as_deref()),
        ("Naps", note.naps.as_deref()),
        ("Toileting", note.toileting.as_deref()),
        ("Activities", note.activities.as_deref()),
        ("Notable events", note.notable_events.as_deref()),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.filter(|v| !v.is_empty()).map(|v| (label, v)))
    .collect()
}

pub fn compile(first_name: &str, last_name: &str, note: &DailyNote) -> CompiledMessages {
    let sections = sections(note);

    // Plain narrative with labelled lines for email.
    let mut email = format!("Daily Update - {} {}\n", first_name, last_name);
    for (label, value) in &sections {
        email.push('\n');
        email.push_str(label);
        email.push_str(": ");
        email.push_str(value);
    }

    // Short ticked lines for WhatsApp.
    let mut whatsapp = format!("{}'s day:", first_name);
    for (_, value) in &sections {
        whatsapp.push_str("\n\u{2713} ");
        whatsapp.push_str(value);
    }

    CompiledMessages { email, whatsapp }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn note() -> DailyNote {
        let now = Utc::now();
        DailyNote {
            id: "n1".to_string(),
            organisation_id: "org1".to_string(),
            child_id: "c1".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 8, 28).unwrap(),
            wellbeing: Some("Happy and energetic".to_string()),
            meals: Some("Ate all breakfast and lunch".to_string()),
            naps: None,
            toileting: None,
            activities: Some("Painting, outdoor play".to_string()),
            notable_events: None,
            created_by_id: "u1".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_compile_includes_labelled_sections() {
        let compiled = compile("Oliver", "Smith", &note());
        assert!(compiled.email.starts_with("Daily Update - Oliver Smith\n"));
        assert!(compiled.email.contains("Wellbeing: Happy and energetic"));
        assert!(compiled.email.contains("Meals: Ate all breakfast and lunch"));
        assert!(compiled.whatsapp.starts_with("Oliver's day:"));
        assert!(compiled.whatsapp.contains("\u{2713} Painting, outdoor play"));
    }

    #[test]
    fn test_compile_omits_blank_sections() {
        let mut n = note();
        n.meals = None;
        n.activities = None;
        let compiled = compile("Oliver", "Smith", &n);
        assert!(compiled.email.contains("Wellbeing: Happy and energetic"));
        assert!(!compiled.email.contains("Meals"));
        assert!(!compiled.email.contains("Naps"));
        assert!(!compiled.email.contains("Toileting"));
        assert!(!compiled.email.contains("Activities"));
    }

    #[test]
    fn test_sections_are_separated_by_single_newlines() {
        let compiled = compile("Oliver", "Smith", &note());
        assert_eq!(
            compiled.email,
            "Daily Update - Oliver Smith\n\nWellbeing: Happy and energetic\nMeals: Ate all breakfast and lunch\nActivities: Painting, outdoor play"
        );
        assert_eq!(
            compiled.whatsapp,
            "Oliver's day:\n\u{2713} Happy and energetic\n\u{2713} Ate all breakfast and lunch\n\u{2713} Painting, outdoor play"
        );
    }

    #[test]
    fn test_compile_is_deterministic() {
        let n = note();
        let first = compile("Oliver", "Smith", &n);
        let second = compile("Oliver", "Smith", &n);
        assert_eq!(first, second);
    }

    #[test]
    fn test_compile_with_single_field() {
        let mut n = note();
        n.meals = None;
        n.activities = None;
        n.wellbeing = Some("A bit tired today".to_string());
        let compiled = compile("Amelia", "Brown", &n);
        assert_eq!(
            compiled.email,
            "Daily Update - Amelia Brown\n\nWellbeing: A bit tired today"
        );
        assert_eq!(compiled.whatsapp, "Amelia's day:\n\u{2713} A bit tired today");
    }
}
