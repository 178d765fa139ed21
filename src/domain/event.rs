//! Event entity
//!
//! An event is the aggregate root for a conference: attendees and
//! entrances reference it by id. `registered_count` and
//! `checked_in_count` are stored counters mutated only by the
//! registration and check-in workflows; read paths recompute them from
//! the attendee collection (see `EventRegistry`).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    /// Maximum registrations; 0 means unlimited
    pub attendee_limit: i32,
    pub registered_count: i32,
    pub checked_in_count: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn new(input: CreateEvent) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            location: input.location,
            start_date: input.start_date,
            end_date: input.end_date,
            attendee_limit: input.attendee_limit,
            registered_count: 0,
            checked_in_count: 0,
            is_active: input.is_active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_limit(&self) -> bool {
        self.attendee_limit > 0
    }

    /// Capacity check against the stored counter (not the live recount)
    pub fn at_capacity(&self) -> bool {
        self.has_limit() && self.registered_count >= self.attendee_limit
    }
}

/// Payload for creating an event
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEvent {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub attendee_limit: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Partial update; only provided fields are merged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEvent {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub attendee_limit: Option<i32>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_input(limit: i32) -> CreateEvent {
        CreateEvent {
            name: "RustConf".to_string(),
            description: None,
            location: Some("Berlin".to_string()),
            start_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            end_date: None,
            attendee_limit: limit,
            is_active: true,
        }
    }

    #[test]
    fn test_new_event_starts_with_zero_counters() {
        let event = Event::new(create_input(100));
        assert_eq!(event.registered_count, 0);
        assert_eq!(event.checked_in_count, 0);
        assert!(event.is_active);
    }

    #[test]
    fn test_zero_limit_means_unlimited() {
        let mut event = Event::new(create_input(0));
        event.registered_count = 1_000_000;
        assert!(!event.has_limit());
        assert!(!event.at_capacity());
    }

    #[test]
    fn test_at_capacity_uses_stored_counter() {
        let mut event = Event::new(create_input(2));
        assert!(!event.at_capacity());
        event.registered_count = 2;
        assert!(event.at_capacity());
    }

    #[test]
    fn test_create_event_deserialize_defaults() {
        let json = r#"{"name": "RustConf", "startDate": "2026-09-01"}"#;
        let input: CreateEvent = serde_json::from_str(json).unwrap();
        assert_eq!(input.attendee_limit, 0);
        assert!(input.is_active);
        assert!(input.end_date.is_none());
    }
}
