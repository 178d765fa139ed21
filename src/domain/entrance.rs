//! Entrance entity
//!
//! A physical access point at a venue. `scanned_count` is an
//! operator-triggered counter, deliberately decoupled from attendee
//! check-in state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Entrance {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub event_id: Uuid,
    pub scanned_count: i32,
    pub last_scan_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entrance {
    pub fn new(input: CreateEntrance) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            event_id: input.event_id,
            scanned_count: 0,
            last_scan_time: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Payload for creating an entrance
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntrance {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub event_id: Uuid,
}

/// Partial update; a provided `event_id` is validated against the
/// event registry before being applied
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntrance {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub event_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entrance_has_no_scans() {
        let entrance = Entrance::new(CreateEntrance {
            name: "North Gate".to_string(),
            description: None,
            event_id: Uuid::new_v4(),
        });
        assert_eq!(entrance.scanned_count, 0);
        assert!(entrance.last_scan_time.is_none());
    }
}
