//! Postgres store implementations
//!
//! Plain sqlx queries over the schema in `migrations/`. No transactions
//! wrap the workflows; read-then-write semantics are part of the
//! observable contract (capacity and duplicate checks are soft).

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Attendee, Entrance, Event, User};
use crate::error::AppResult;

use super::{AttendeeStore, EntranceStore, EventStore, SessionStore, UserStore};

pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn insert(&self, event: &Event) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO events
                (id, name, description, location, start_date, end_date,
                 attendee_limit, registered_count, checked_in_count, is_active,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(event.id)
        .bind(&event.name)
        .bind(&event.description)
        .bind(&event.location)
        .bind(event.start_date)
        .bind(event.end_date)
        .bind(event.attendee_limit)
        .bind(event.registered_count)
        .bind(event.checked_in_count)
        .bind(event.is_active)
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn fetch(&self, id: Uuid) -> AppResult<Option<Event>> {
        let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(event)
    }

    async fn fetch_all(&self) -> AppResult<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>("SELECT * FROM events ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;
        Ok(events)
    }

    async fn save(&self, event: &Event) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE events
            SET name = $2, description = $3, location = $4, start_date = $5,
                end_date = $6, attendee_limit = $7, registered_count = $8,
                checked_in_count = $9, is_active = $10, updated_at = $11
            WHERE id = $1
            "#,
        )
        .bind(event.id)
        .bind(&event.name)
        .bind(&event.description)
        .bind(&event.location)
        .bind(event.start_date)
        .bind(event.end_date)
        .bind(event.attendee_limit)
        .bind(event.registered_count)
        .bind(event.checked_in_count)
        .bind(event.is_active)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct PgAttendeeStore {
    pool: PgPool,
}

impl PgAttendeeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendeeStore for PgAttendeeStore {
    async fn insert(&self, attendee: &Attendee) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO attendees
                (id, badge_id, first_name, last_name, email, phone, organization,
                 event_id, checked_in, check_in_time, entrance, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(attendee.id)
        .bind(&attendee.badge_id)
        .bind(&attendee.first_name)
        .bind(&attendee.last_name)
        .bind(&attendee.email)
        .bind(&attendee.phone)
        .bind(&attendee.organization)
        .bind(attendee.event_id)
        .bind(attendee.checked_in)
        .bind(attendee.check_in_time)
        .bind(&attendee.entrance)
        .bind(attendee.created_at)
        .bind(attendee.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn fetch(&self, id: Uuid) -> AppResult<Option<Attendee>> {
        let attendee = sqlx::query_as::<_, Attendee>("SELECT * FROM attendees WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(attendee)
    }

    async fn fetch_all(&self) -> AppResult<Vec<Attendee>> {
        let attendees =
            sqlx::query_as::<_, Attendee>("SELECT * FROM attendees ORDER BY created_at")
                .fetch_all(&self.pool)
                .await?;
        Ok(attendees)
    }

    async fn fetch_by_event(&self, event_id: Uuid) -> AppResult<Vec<Attendee>> {
        let attendees = sqlx::query_as::<_, Attendee>(
            "SELECT * FROM attendees WHERE event_id = $1 ORDER BY created_at",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(attendees)
    }

    async fn fetch_by_badge(&self, badge_id: &str) -> AppResult<Option<Attendee>> {
        let attendee =
            sqlx::query_as::<_, Attendee>("SELECT * FROM attendees WHERE badge_id = $1 LIMIT 1")
                .bind(badge_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(attendee)
    }

    async fn fetch_by_badge_and_event(
        &self,
        badge_id: &str,
        event_id: Uuid,
    ) -> AppResult<Option<Attendee>> {
        let attendee = sqlx::query_as::<_, Attendee>(
            "SELECT * FROM attendees WHERE badge_id = $1 AND event_id = $2 LIMIT 1",
        )
        .bind(badge_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(attendee)
    }

    async fn fetch_by_email_and_event(
        &self,
        email: &str,
        event_id: Uuid,
    ) -> AppResult<Option<Attendee>> {
        let attendee = sqlx::query_as::<_, Attendee>(
            "SELECT * FROM attendees WHERE email = $1 AND event_id = $2 LIMIT 1",
        )
        .bind(email)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(attendee)
    }

    async fn count_by_event(&self, event_id: Uuid) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM attendees WHERE event_id = $1")
            .bind(event_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn count_checked_in(&self, event_id: Uuid) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM attendees WHERE event_id = $1 AND checked_in = true",
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn fetch_checked_in(&self, event_id: Uuid, limit: i64) -> AppResult<Vec<Attendee>> {
        let attendees = sqlx::query_as::<_, Attendee>(
            r#"
            SELECT * FROM attendees
            WHERE event_id = $1 AND checked_in = true
            ORDER BY check_in_time DESC
            LIMIT $2
            "#,
        )
        .bind(event_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(attendees)
    }

    async fn save(&self, attendee: &Attendee) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE attendees
            SET first_name = $2, last_name = $3, email = $4, phone = $5,
                organization = $6, checked_in = $7, check_in_time = $8,
                entrance = $9, updated_at = $10
            WHERE id = $1
            "#,
        )
        .bind(attendee.id)
        .bind(&attendee.first_name)
        .bind(&attendee.last_name)
        .bind(&attendee.email)
        .bind(&attendee.phone)
        .bind(&attendee.organization)
        .bind(attendee.checked_in)
        .bind(attendee.check_in_time)
        .bind(&attendee.entrance)
        .bind(attendee.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM attendees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct PgEntranceStore {
    pool: PgPool,
}

impl PgEntranceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntranceStore for PgEntranceStore {
    async fn insert(&self, entrance: &Entrance) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO entrances
                (id, name, description, event_id, scanned_count, last_scan_time,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(entrance.id)
        .bind(&entrance.name)
        .bind(&entrance.description)
        .bind(entrance.event_id)
        .bind(entrance.scanned_count)
        .bind(entrance.last_scan_time)
        .bind(entrance.created_at)
        .bind(entrance.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn fetch(&self, id: Uuid) -> AppResult<Option<Entrance>> {
        let entrance = sqlx::query_as::<_, Entrance>("SELECT * FROM entrances WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(entrance)
    }

    async fn fetch_all(&self) -> AppResult<Vec<Entrance>> {
        let entrances =
            sqlx::query_as::<_, Entrance>("SELECT * FROM entrances ORDER BY created_at")
                .fetch_all(&self.pool)
                .await?;
        Ok(entrances)
    }

    async fn fetch_by_event(&self, event_id: Uuid) -> AppResult<Vec<Entrance>> {
        let entrances = sqlx::query_as::<_, Entrance>(
            "SELECT * FROM entrances WHERE event_id = $1 ORDER BY created_at",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entrances)
    }

    async fn save(&self, entrance: &Entrance) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE entrances
            SET name = $2, description = $3, event_id = $4, scanned_count = $5,
                last_scan_time = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(entrance.id)
        .bind(&entrance.name)
        .bind(&entrance.description)
        .bind(entrance.event_id)
        .bind(entrance.scanned_count)
        .bind(entrance.last_scan_time)
        .bind(entrance.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM entrances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, user: &User) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.role)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn fetch(&self, id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn fetch_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}

pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn insert(&self, token_hash: &str, user_id: Uuid) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO sessions (token_hash, user_id, created_at) VALUES ($1, $2, NOW())",
        )
        .bind(token_hash)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_user_id(&self, token_hash: &str) -> AppResult<Option<Uuid>> {
        let user_id: Option<Uuid> =
            sqlx::query_scalar("SELECT user_id FROM sessions WHERE token_hash = $1")
                .bind(token_hash)
                .fetch_optional(&self.pool)
                .await?;
        Ok(user_id)
    }
}
