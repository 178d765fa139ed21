//! Store layer
//!
//! Generic data-store traits the registries and workflows are written
//! against: create/find/save/delete by predicate, nothing more. The
//! Postgres implementation backs the server binary; the in-memory
//! implementation backs the integration tests.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{
    PgAttendeeStore, PgEntranceStore, PgEventStore, PgSessionStore, PgUserStore,
};

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Attendee, Entrance, Event, User};
use crate::error::AppResult;

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn insert(&self, event: &Event) -> AppResult<()>;
    async fn fetch(&self, id: Uuid) -> AppResult<Option<Event>>;
    async fn fetch_all(&self) -> AppResult<Vec<Event>>;
    /// Full-record write; counter updates are load-modify-save on purpose
    /// (the capacity limit is soft, see the registry docs)
    async fn save(&self, event: &Event) -> AppResult<()>;
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait AttendeeStore: Send + Sync {
    async fn insert(&self, attendee: &Attendee) -> AppResult<()>;
    async fn fetch(&self, id: Uuid) -> AppResult<Option<Attendee>>;
    async fn fetch_all(&self) -> AppResult<Vec<Attendee>>;
    async fn fetch_by_event(&self, event_id: Uuid) -> AppResult<Vec<Attendee>>;
    /// Global badge lookup, not scoped to an event
    async fn fetch_by_badge(&self, badge_id: &str) -> AppResult<Option<Attendee>>;
    async fn fetch_by_badge_and_event(
        &self,
        badge_id: &str,
        event_id: Uuid,
    ) -> AppResult<Option<Attendee>>;
    async fn fetch_by_email_and_event(
        &self,
        email: &str,
        event_id: Uuid,
    ) -> AppResult<Option<Attendee>>;
    async fn count_by_event(&self, event_id: Uuid) -> AppResult<i64>;
    async fn count_checked_in(&self, event_id: Uuid) -> AppResult<i64>;
    /// Checked-in attendees, most recent `check_in_time` first
    async fn fetch_checked_in(&self, event_id: Uuid, limit: i64) -> AppResult<Vec<Attendee>>;
    async fn save(&self, attendee: &Attendee) -> AppResult<()>;
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait EntranceStore: Send + Sync {
    async fn insert(&self, entrance: &Entrance) -> AppResult<()>;
    async fn fetch(&self, id: Uuid) -> AppResult<Option<Entrance>>;
    async fn fetch_all(&self) -> AppResult<Vec<Entrance>>;
    async fn fetch_by_event(&self, event_id: Uuid) -> AppResult<Vec<Entrance>>;
    async fn save(&self, entrance: &Entrance) -> AppResult<()>;
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: &User) -> AppResult<()>;
    async fn fetch(&self, id: Uuid) -> AppResult<Option<User>>;
    async fn fetch_by_email(&self, email: &str) -> AppResult<Option<User>>;
}

/// Opaque bearer-token sessions; only token hashes are stored
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, token_hash: &str, user_id: Uuid) -> AppResult<()>;
    async fn find_user_id(&self, token_hash: &str) -> AppResult<Option<Uuid>>;
}

/// Bundle of all store handles, cloned into registries and workflows
#[derive(Clone)]
pub struct Stores {
    pub events: Arc<dyn EventStore>,
    pub attendees: Arc<dyn AttendeeStore>,
    pub entrances: Arc<dyn EntranceStore>,
    pub users: Arc<dyn UserStore>,
    pub sessions: Arc<dyn SessionStore>,
}

impl Stores {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            events: Arc::new(PgEventStore::new(pool.clone())),
            attendees: Arc::new(PgAttendeeStore::new(pool.clone())),
            entrances: Arc::new(PgEntranceStore::new(pool.clone())),
            users: Arc::new(PgUserStore::new(pool.clone())),
            sessions: Arc::new(PgSessionStore::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        let store = MemoryStore::default();
        Self {
            events: Arc::new(store.clone()),
            attendees: Arc::new(store.clone()),
            entrances: Arc::new(store.clone()),
            users: Arc::new(store.clone()),
            sessions: Arc::new(store),
        }
    }
}
