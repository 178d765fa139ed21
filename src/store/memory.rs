//! In-memory store
//!
//! Backs the integration tests so the full HTTP surface can be driven
//! without a database. Mirrors the read-then-write semantics of the
//! Postgres implementation; nothing here is transactional either.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Attendee, Entrance, Event, User};
use crate::error::AppResult;

use super::{AttendeeStore, EntranceStore, EventStore, SessionStore, UserStore};

#[derive(Default)]
struct Inner {
    events: HashMap<Uuid, Event>,
    attendees: HashMap<Uuid, Attendee>,
    entrances: HashMap<Uuid, Entrance>,
    users: HashMap<Uuid, User>,
    sessions: HashMap<String, Uuid>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().expect("memory store lock poisoned")
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().expect("memory store lock poisoned")
    }
}

fn sorted_by_creation<T>(
    items: impl Iterator<Item = T>,
    key: impl Fn(&T) -> (chrono::DateTime<chrono::Utc>, Uuid),
) -> Vec<T> {
    let mut out: Vec<T> = items.collect();
    out.sort_by_key(|item| key(item));
    out
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn insert(&self, event: &Event) -> AppResult<()> {
        self.write().events.insert(event.id, event.clone());
        Ok(())
    }

    async fn fetch(&self, id: Uuid) -> AppResult<Option<Event>> {
        Ok(self.read().events.get(&id).cloned())
    }

    async fn fetch_all(&self) -> AppResult<Vec<Event>> {
        Ok(sorted_by_creation(
            self.read().events.values().cloned(),
            |e| (e.created_at, e.id),
        ))
    }

    async fn save(&self, event: &Event) -> AppResult<()> {
        self.write().events.insert(event.id, event.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.write().events.remove(&id).is_some())
    }
}

#[async_trait]
impl AttendeeStore for MemoryStore {
    async fn insert(&self, attendee: &Attendee) -> AppResult<()> {
        self.write().attendees.insert(attendee.id, attendee.clone());
        Ok(())
    }

    async fn fetch(&self, id: Uuid) -> AppResult<Option<Attendee>> {
        Ok(self.read().attendees.get(&id).cloned())
    }

    async fn fetch_all(&self) -> AppResult<Vec<Attendee>> {
        Ok(sorted_by_creation(
            self.read().attendees.values().cloned(),
            |a| (a.created_at, a.id),
        ))
    }

    async fn fetch_by_event(&self, event_id: Uuid) -> AppResult<Vec<Attendee>> {
        Ok(sorted_by_creation(
            self.read()
                .attendees
                .values()
                .filter(|a| a.event_id == event_id)
                .cloned(),
            |a| (a.created_at, a.id),
        ))
    }

    async fn fetch_by_badge(&self, badge_id: &str) -> AppResult<Option<Attendee>> {
        Ok(self
            .read()
            .attendees
            .values()
            .find(|a| a.badge_id == badge_id)
            .cloned())
    }

    async fn fetch_by_badge_and_event(
        &self,
        badge_id: &str,
        event_id: Uuid,
    ) -> AppResult<Option<Attendee>> {
        Ok(self
            .read()
            .attendees
            .values()
            .find(|a| a.badge_id == badge_id && a.event_id == event_id)
            .cloned())
    }

    async fn fetch_by_email_and_event(
        &self,
        email: &str,
        event_id: Uuid,
    ) -> AppResult<Option<Attendee>> {
        Ok(self
            .read()
            .attendees
            .values()
            .find(|a| a.email == email && a.event_id == event_id)
            .cloned())
    }

    async fn count_by_event(&self, event_id: Uuid) -> AppResult<i64> {
        Ok(self
            .read()
            .attendees
            .values()
            .filter(|a| a.event_id == event_id)
            .count() as i64)
    }

    async fn count_checked_in(&self, event_id: Uuid) -> AppResult<i64> {
        Ok(self
            .read()
            .attendees
            .values()
            .filter(|a| a.event_id == event_id && a.checked_in)
            .count() as i64)
    }

    async fn fetch_checked_in(&self, event_id: Uuid, limit: i64) -> AppResult<Vec<Attendee>> {
        let mut checked_in: Vec<Attendee> = self
            .read()
            .attendees
            .values()
            .filter(|a| a.event_id == event_id && a.checked_in)
            .cloned()
            .collect();
        checked_in.sort_by(|a, b| b.check_in_time.cmp(&a.check_in_time));
        checked_in.truncate(limit.max(0) as usize);
        Ok(checked_in)
    }

    async fn save(&self, attendee: &Attendee) -> AppResult<()> {
        self.write().attendees.insert(attendee.id, attendee.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.write().attendees.remove(&id).is_some())
    }
}

#[async_trait]
impl EntranceStore for MemoryStore {
    async fn insert(&self, entrance: &Entrance) -> AppResult<()> {
        self.write().entrances.insert(entrance.id, entrance.clone());
        Ok(())
    }

    async fn fetch(&self, id: Uuid) -> AppResult<Option<Entrance>> {
        Ok(self.read().entrances.get(&id).cloned())
    }

    async fn fetch_all(&self) -> AppResult<Vec<Entrance>> {
        Ok(sorted_by_creation(
            self.read().entrances.values().cloned(),
            |e| (e.created_at, e.id),
        ))
    }

    async fn fetch_by_event(&self, event_id: Uuid) -> AppResult<Vec<Entrance>> {
        Ok(sorted_by_creation(
            self.read()
                .entrances
                .values()
                .filter(|e| e.event_id == event_id)
                .cloned(),
            |e| (e.created_at, e.id),
        ))
    }

    async fn save(&self, entrance: &Entrance) -> AppResult<()> {
        self.write().entrances.insert(entrance.id, entrance.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.write().entrances.remove(&id).is_some())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, user: &User) -> AppResult<()> {
        self.write().users.insert(user.id, user.clone());
        Ok(())
    }

    async fn fetch(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.read().users.get(&id).cloned())
    }

    async fn fetch_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .read()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn insert(&self, token_hash: &str, user_id: Uuid) -> AppResult<()> {
        self.write().sessions.insert(token_hash.to_string(), user_id);
        Ok(())
    }

    async fn find_user_id(&self, token_hash: &str) -> AppResult<Option<Uuid>> {
        Ok(self.read().sessions.get(token_hash).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AttendeeDetails, CreateEvent};
    use chrono::{Duration, NaiveDate, Utc};

    fn test_event() -> Event {
        Event::new(CreateEvent {
            name: "Test".to_string(),
            description: None,
            location: None,
            start_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            end_date: None,
            attendee_limit: 0,
            is_active: true,
        })
    }

    fn test_attendee(event_id: Uuid, email: &str) -> Attendee {
        Attendee::new(
            event_id,
            "B12345".to_string(),
            AttendeeDetails {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: email.to_string(),
                phone: None,
                organization: None,
            },
        )
    }

    #[tokio::test]
    async fn test_event_roundtrip() {
        let store = MemoryStore::default();
        let event = test_event();
        EventStore::insert(&store, &event).await.unwrap();

        let fetched = EventStore::fetch(&store, event.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Test");

        assert!(EventStore::delete(&store, event.id).await.unwrap());
        assert!(!EventStore::delete(&store, event.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_checked_in_ordering_and_limit() {
        let store = MemoryStore::default();
        let event = test_event();
        let base = Utc::now();

        for i in 0..5 {
            let mut attendee = test_attendee(event.id, &format!("a{i}@example.com"));
            attendee.checked_in = true;
            attendee.check_in_time = Some(base + Duration::seconds(i));
            AttendeeStore::insert(&store, &attendee).await.unwrap();
        }

        let recent = store.fetch_checked_in(event.id, 2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].email, "a4@example.com");
        assert_eq!(recent[1].email, "a3@example.com");
    }

    #[tokio::test]
    async fn test_counts_scoped_to_event() {
        let store = MemoryStore::default();
        let event_a = test_event();
        let event_b = test_event();

        AttendeeStore::insert(&store, &test_attendee(event_a.id, "x@example.com"))
            .await
            .unwrap();
        let mut checked = test_attendee(event_b.id, "y@example.com");
        checked.checked_in = true;
        checked.check_in_time = Some(Utc::now());
        AttendeeStore::insert(&store, &checked).await.unwrap();

        assert_eq!(store.count_by_event(event_a.id).await.unwrap(), 1);
        assert_eq!(store.count_checked_in(event_a.id).await.unwrap(), 0);
        assert_eq!(store.count_checked_in(event_b.id).await.unwrap(), 1);
    }
}
