//! Attendee registry
//!
//! Lookups and removal only; capacity and duplicate-email enforcement
//! belong to the registration workflow.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::Attendee;
use crate::error::{AppError, AppResult};
use crate::store::{AttendeeStore, Stores};

#[derive(Clone)]
pub struct AttendeeRegistry {
    attendees: Arc<dyn AttendeeStore>,
}

impl AttendeeRegistry {
    pub fn new(stores: &Stores) -> Self {
        Self {
            attendees: stores.attendees.clone(),
        }
    }

    pub async fn find_all(&self) -> AppResult<Vec<Attendee>> {
        self.attendees.fetch_all().await
    }

    pub async fn find_by_event(&self, event_id: Uuid) -> AppResult<Vec<Attendee>> {
        self.attendees.fetch_by_event(event_id).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Attendee> {
        self.attendees
            .fetch(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Attendee with ID {id} not found")))
    }

    /// Global badge lookup, not scoped to an event; check-in uses the
    /// event-scoped variant instead
    pub async fn find_by_badge_id(&self, badge_id: &str) -> AppResult<Attendee> {
        self.attendees.fetch_by_badge(badge_id).await?.ok_or_else(|| {
            AppError::not_found(format!("Attendee with badge ID {badge_id} not found"))
        })
    }

    /// Direct delete. The owning event's stored counters are left
    /// untouched; read paths recompute from attendee rows anyway.
    pub async fn remove(&self, id: Uuid) -> AppResult<()> {
        self.find_by_id(id).await?;
        self.attendees.delete(id).await?;
        tracing::info!(attendee_id = %id, "Attendee removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AttendeeDetails;

    fn attendee(event_id: Uuid, badge: &str) -> Attendee {
        Attendee::new(
            event_id,
            badge.to_string(),
            AttendeeDetails {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                phone: None,
                organization: None,
            },
        )
    }

    #[tokio::test]
    async fn test_find_by_badge_id_is_global() {
        let stores = Stores::in_memory();
        let registry = AttendeeRegistry::new(&stores);

        let record = attendee(Uuid::new_v4(), "B54321");
        stores.attendees.insert(&record).await.unwrap();

        let found = registry.find_by_badge_id("B54321").await.unwrap();
        assert_eq!(found.id, record.id);

        let err = registry.find_by_badge_id("B00000").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_remove_missing_is_not_found() {
        let stores = Stores::in_memory();
        let registry = AttendeeRegistry::new(&stores);

        let err = registry.remove(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
