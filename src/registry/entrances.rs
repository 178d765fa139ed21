//! Entrance registry
//!
//! Entrance scanning is an operator-triggered counter, decoupled from
//! the check-in workflow: checking an attendee in never bumps
//! `scanned_count` here.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{CreateEntrance, Entrance, UpdateEntrance};
use crate::error::{AppError, AppResult};
use crate::store::{EntranceStore, EventStore, Stores};

#[derive(Clone)]
pub struct EntranceRegistry {
    entrances: Arc<dyn EntranceStore>,
    events: Arc<dyn EventStore>,
}

impl EntranceRegistry {
    pub fn new(stores: &Stores) -> Self {
        Self {
            entrances: stores.entrances.clone(),
            events: stores.events.clone(),
        }
    }

    pub async fn create(&self, input: CreateEntrance) -> AppResult<Entrance> {
        self.ensure_event_exists(input.event_id).await?;

        let entrance = Entrance::new(input);
        self.entrances.insert(&entrance).await?;
        tracing::info!(entrance_id = %entrance.id, name = %entrance.name, "Entrance created");
        Ok(entrance)
    }

    pub async fn find_all(&self) -> AppResult<Vec<Entrance>> {
        self.entrances.fetch_all().await
    }

    pub async fn find_by_event(&self, event_id: Uuid) -> AppResult<Vec<Entrance>> {
        self.entrances.fetch_by_event(event_id).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Entrance> {
        self.entrances
            .fetch(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Entrance with ID {id} not found")))
    }

    pub async fn update(&self, id: Uuid, input: UpdateEntrance) -> AppResult<Entrance> {
        let mut entrance = self.find_by_id(id).await?;

        if let Some(event_id) = input.event_id {
            self.ensure_event_exists(event_id).await?;
            entrance.event_id = event_id;
        }
        if let Some(name) = input.name {
            entrance.name = name;
        }
        if let Some(description) = input.description {
            entrance.description = Some(description);
        }
        entrance.updated_at = chrono::Utc::now();

        self.entrances.save(&entrance).await?;
        Ok(entrance)
    }

    pub async fn remove(&self, id: Uuid) -> AppResult<()> {
        self.find_by_id(id).await?;
        self.entrances.delete(id).await?;
        tracing::info!(entrance_id = %id, "Entrance removed");
        Ok(())
    }

    /// Bump `scanned_count` and stamp `last_scan_time`
    pub async fn increment_scan_count(&self, id: Uuid) -> AppResult<Entrance> {
        let mut entrance = self.find_by_id(id).await?;
        entrance.scanned_count += 1;
        entrance.last_scan_time = Some(chrono::Utc::now());
        entrance.updated_at = chrono::Utc::now();
        self.entrances.save(&entrance).await?;
        Ok(entrance)
    }

    async fn ensure_event_exists(&self, event_id: Uuid) -> AppResult<()> {
        self.events
            .fetch(event_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Event with ID {event_id} not found")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CreateEvent, Event};
    use chrono::NaiveDate;

    async fn seed_event(stores: &Stores) -> Event {
        let event = Event::new(CreateEvent {
            name: "RustConf".to_string(),
            description: None,
            location: None,
            start_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            end_date: None,
            attendee_limit: 0,
            is_active: true,
        });
        stores.events.insert(&event).await.unwrap();
        event
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_event() {
        let stores = Stores::in_memory();
        let registry = EntranceRegistry::new(&stores);

        let err = registry
            .create(CreateEntrance {
                name: "North Gate".to_string(),
                description: None,
                event_id: Uuid::new_v4(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_increment_scan_count_stamps_time() {
        let stores = Stores::in_memory();
        let registry = EntranceRegistry::new(&stores);
        let event = seed_event(&stores).await;

        let entrance = registry
            .create(CreateEntrance {
                name: "North Gate".to_string(),
                description: None,
                event_id: event.id,
            })
            .await
            .unwrap();

        let scanned = registry.increment_scan_count(entrance.id).await.unwrap();
        assert_eq!(scanned.scanned_count, 1);
        assert!(scanned.last_scan_time.is_some());

        let again = registry.increment_scan_count(entrance.id).await.unwrap();
        assert_eq!(again.scanned_count, 2);
    }

    #[tokio::test]
    async fn test_update_validates_new_event_id() {
        let stores = Stores::in_memory();
        let registry = EntranceRegistry::new(&stores);
        let event = seed_event(&stores).await;

        let entrance = registry
            .create(CreateEntrance {
                name: "North Gate".to_string(),
                description: None,
                event_id: event.id,
            })
            .await
            .unwrap();

        let err = registry
            .update(
                entrance.id,
                UpdateEntrance {
                    event_id: Some(Uuid::new_v4()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
