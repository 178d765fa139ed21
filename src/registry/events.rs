//! Event registry
//!
//! Read paths return counters derived by counting the attendee
//! collection, so totals stay consistent with attendee data even if the
//! stored fields drift (attendee removal, for one, never decrements
//! them). Write paths (capacity checks, increments) consult the stored
//! fields; `load_stored` exposes the raw record for that purpose.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{CreateEvent, Event, UpdateEvent};
use crate::error::{AppError, AppResult};
use crate::store::{AttendeeStore, EventStore, Stores};

#[derive(Clone)]
pub struct EventRegistry {
    events: Arc<dyn EventStore>,
    attendees: Arc<dyn AttendeeStore>,
}

impl EventRegistry {
    pub fn new(stores: &Stores) -> Self {
        Self {
            events: stores.events.clone(),
            attendees: stores.attendees.clone(),
        }
    }

    pub async fn create(&self, input: CreateEvent) -> AppResult<Event> {
        let event = Event::new(input);
        self.events.insert(&event).await?;
        tracing::info!(event_id = %event.id, name = %event.name, "Event created");
        Ok(event)
    }

    /// All events, counters recomputed from attendee rows
    pub async fn find_all(&self) -> AppResult<Vec<Event>> {
        let mut events = self.events.fetch_all().await?;
        for event in &mut events {
            self.overlay_live_counts(event).await?;
        }
        Ok(events)
    }

    /// Single event, counters recomputed from attendee rows
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Event> {
        let mut event = self.load_stored(id).await?;
        self.overlay_live_counts(&mut event).await?;
        Ok(event)
    }

    /// Raw record with the stored counter fields, used by the
    /// registration capacity check and the counter increments
    pub async fn load_stored(&self, id: Uuid) -> AppResult<Event> {
        self.events
            .fetch(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Event with ID {id} not found")))
    }

    /// Merge provided fields into the event
    pub async fn update(&self, id: Uuid, input: UpdateEvent) -> AppResult<Event> {
        let mut event = self.load_stored(id).await?;

        if let Some(name) = input.name {
            event.name = name;
        }
        if let Some(description) = input.description {
            event.description = Some(description);
        }
        if let Some(location) = input.location {
            event.location = Some(location);
        }
        if let Some(start_date) = input.start_date {
            event.start_date = start_date;
        }
        if let Some(end_date) = input.end_date {
            event.end_date = Some(end_date);
        }
        if let Some(attendee_limit) = input.attendee_limit {
            event.attendee_limit = attendee_limit;
        }
        if let Some(is_active) = input.is_active {
            event.is_active = is_active;
        }
        event.updated_at = chrono::Utc::now();

        self.events.save(&event).await?;
        Ok(event)
    }

    pub async fn remove(&self, id: Uuid) -> AppResult<()> {
        // load first so a missing id surfaces as NotFound, not a no-op
        self.load_stored(id).await?;
        self.events.delete(id).await?;
        tracing::info!(event_id = %id, "Event removed");
        Ok(())
    }

    pub async fn increment_registered_count(&self, id: Uuid) -> AppResult<Event> {
        let mut event = self.load_stored(id).await?;
        event.registered_count += 1;
        event.updated_at = chrono::Utc::now();
        self.events.save(&event).await?;
        Ok(event)
    }

    pub async fn increment_checked_in_count(&self, id: Uuid) -> AppResult<Event> {
        let mut event = self.load_stored(id).await?;
        event.checked_in_count += 1;
        event.updated_at = chrono::Utc::now();
        self.events.save(&event).await?;
        Ok(event)
    }

    async fn overlay_live_counts(&self, event: &mut Event) -> AppResult<()> {
        event.registered_count = self.attendees.count_by_event(event.id).await? as i32;
        event.checked_in_count = self.attendees.count_checked_in(event.id).await? as i32;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Attendee, AttendeeDetails};
    use chrono::NaiveDate;

    fn registry() -> (EventRegistry, Stores) {
        let stores = Stores::in_memory();
        (EventRegistry::new(&stores), stores)
    }

    fn create_input() -> CreateEvent {
        CreateEvent {
            name: "RustConf".to_string(),
            description: None,
            location: None,
            start_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            end_date: None,
            attendee_limit: 0,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_missing_is_not_found() {
        let (registry, _) = registry();
        let err = registry.find_by_id(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_read_paths_derive_counters_from_attendees() {
        let (registry, stores) = registry();
        let event = registry.create(create_input()).await.unwrap();

        // attendee row inserted behind the registry's back; the stored
        // counter stays 0 but reads must see 1
        let attendee = Attendee::new(
            event.id,
            "B11111".to_string(),
            AttendeeDetails {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                phone: None,
                organization: None,
            },
        );
        stores.attendees.insert(&attendee).await.unwrap();

        let read = registry.find_by_id(event.id).await.unwrap();
        assert_eq!(read.registered_count, 1);
        assert_eq!(read.checked_in_count, 0);

        let stored = registry.load_stored(event.id).await.unwrap();
        assert_eq!(stored.registered_count, 0);
    }

    #[tokio::test]
    async fn test_update_merges_only_provided_fields() {
        let (registry, _) = registry();
        let event = registry.create(create_input()).await.unwrap();

        let updated = registry
            .update(
                event.id,
                UpdateEvent {
                    location: Some("Berlin".to_string()),
                    attendee_limit: Some(50),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "RustConf");
        assert_eq!(updated.location.as_deref(), Some("Berlin"));
        assert_eq!(updated.attendee_limit, 50);
    }

    #[tokio::test]
    async fn test_increment_registered_count() {
        let (registry, _) = registry();
        let event = registry.create(create_input()).await.unwrap();

        registry.increment_registered_count(event.id).await.unwrap();
        let stored = registry.load_stored(event.id).await.unwrap();
        assert_eq!(stored.registered_count, 1);
    }
}
