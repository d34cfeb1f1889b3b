use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Channel a guardian prefers for daily updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommunicationChannel {
    Email,
    Whatsapp,
}

impl CommunicationChannel {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "EMAIL" => Some(CommunicationChannel::Email),
            "WHATSAPP" => Some(CommunicationChannel::Whatsapp),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CommunicationChannel::Email => "EMAIL",
            CommunicationChannel::Whatsapp => "WHATSAPP",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guardian {
    pub id: String,
    pub organisation_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub relationship: Option<String>,
    pub pickup_permission: bool,
    pub preferred_channel: CommunicationChannel,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Guardian {
    /// A guardian with neither email nor phone cannot receive anything.
    pub fn is_reachable(&self) -> bool {
        self.email.as_deref().is_some_and(|e| !e.is_empty())
            || self.phone.as_deref().is_some_and(|p| !p.is_empty())
    }

    /// The channel a message to this guardian should go out on: the
    /// preferred channel when its contact field is usable, otherwise the
    /// other channel if that one is. `None` means unreachable.
    pub fn usable_channel(&self) -> Option<(CommunicationChannel, String)> {
        let email = self.email.as_deref().filter(|e| !e.is_empty());
        let phone = self.phone.as_deref().filter(|p| !p.is_empty());
        match self.preferred_channel {
            CommunicationChannel::Email => email
                .map(|e| (CommunicationChannel::Email, e.to_string()))
                .or_else(|| phone.map(|p| (CommunicationChannel::Whatsapp, p.to_string()))),
            CommunicationChannel::Whatsapp => phone
                .map(|p| (CommunicationChannel::Whatsapp, p.to_string()))
                .or_else(|| email.map(|e| (CommunicationChannel::Email, e.to_string()))),
        }
    }
}

/// Link between a child and a guardian.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildGuardian {
    pub child_id: String,
    pub guardian_id: String,
    pub is_primary: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn guardian(email: Option<&str>, phone: Option<&str>, channel: CommunicationChannel) -> Guardian {
        let now = Utc::now();
        Guardian {
            id: "g1".to_string(),
            organisation_id: "org1".to_string(),
            first_name: "Pat".to_string(),
            last_name: "Smith".to_string(),
            email: email.map(String::from),
            phone: phone.map(String::from),
            relationship: Some("Mother".to_string()),
            pickup_permission: true,
            preferred_channel: channel,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_reachability() {
        assert!(guardian(Some("a@b.c"), None, CommunicationChannel::Email).is_reachable());
        assert!(guardian(None, Some("07123"), CommunicationChannel::Email).is_reachable());
        assert!(!guardian(None, None, CommunicationChannel::Email).is_reachable());
        assert!(!guardian(Some(""), Some(""), CommunicationChannel::Email).is_reachable());
    }

    #[test]
    fn test_usable_channel_prefers_configured_channel() {
        let g = guardian(Some("a@b.c"), Some("07123"), CommunicationChannel::Whatsapp);
        assert_eq!(
            g.usable_channel(),
            Some((CommunicationChannel::Whatsapp, "07123".to_string()))
        );
    }

    #[test]
    fn test_usable_channel_falls_back_when_contact_missing() {
        let g = guardian(Some("a@b.c"), None, CommunicationChannel::Whatsapp);
        assert_eq!(
            g.usable_channel(),
            Some((CommunicationChannel::Email, "a@b.c".to_string()))
        );
        let unreachable = guardian(None, None, CommunicationChannel::Email);
        assert_eq!(unreachable.usable_channel(), None);
    }
}
