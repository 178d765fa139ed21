//! Attendee entity
//!
//! Attendees are child records of an event. Email uniqueness is scoped
//! per event and enforced by the registration workflow, not here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub id: Uuid,
    /// Human-presentable id, format `B` + 5 digits; not guaranteed unique
    pub badge_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub organization: Option<String>,
    pub event_id: Uuid,
    pub checked_in: bool,
    /// Set iff `checked_in` is true
    pub check_in_time: Option<DateTime<Utc>>,
    /// Free-text label of where the attendee was checked in
    pub entrance: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Attendee {
    pub fn new(event_id: Uuid, badge_id: String, details: AttendeeDetails) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            badge_id,
            first_name: details.first_name,
            last_name: details.last_name,
            email: details.email,
            phone: details.phone,
            organization: details.organization,
            event_id,
            checked_in: false,
            check_in_time: None,
            entrance: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Per-attendee registration fields, shared by single and bulk registration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
}

/// Payload for `POST /attendees/register`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAttendee {
    pub event_id: Uuid,
    #[serde(flatten)]
    pub details: AttendeeDetails,
}

/// Payload for `POST /attendees/check-in`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    pub event_id: Uuid,
    pub badge_id: String,
    pub entrance: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_attendee_is_not_checked_in() {
        let details = AttendeeDetails {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            organization: Some("Analytical Engines".to_string()),
        };
        let attendee = Attendee::new(Uuid::new_v4(), "B12345".to_string(), details);

        assert!(!attendee.checked_in);
        assert!(attendee.check_in_time.is_none());
        assert!(attendee.entrance.is_none());
    }

    #[test]
    fn test_register_attendee_deserialize_flattened() {
        let json = r#"{
            "eventId": "550e8400-e29b-41d4-a716-446655440000",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com"
        }"#;

        let request: RegisterAttendee = serde_json::from_str(json).unwrap();
        assert_eq!(request.details.first_name, "Ada");
        assert!(request.details.phone.is_none());
    }
}
