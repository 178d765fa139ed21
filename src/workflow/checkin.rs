//! Check-in workflow
//!
//! Badge check-in scoped to an event: badge ids are not unique enough
//! for a global lookup here. Re-checking an already-checked-in badge is
//! rejected, not silently accepted. Entrance scan counters are NOT
//! touched; scanning is a separate operator action on the entrance
//! registry.

use std::sync::Arc;

use crate::domain::{Attendee, CheckInRequest};
use crate::error::{AppError, AppResult};
use crate::registry::EventRegistry;
use crate::store::{AttendeeStore, Stores};

#[derive(Clone)]
pub struct CheckInWorkflow {
    events: EventRegistry,
    attendees: Arc<dyn AttendeeStore>,
}

impl CheckInWorkflow {
    pub fn new(stores: &Stores) -> Self {
        Self {
            events: EventRegistry::new(stores),
            attendees: stores.attendees.clone(),
        }
    }

    pub async fn check_in(&self, input: CheckInRequest) -> AppResult<Attendee> {
        let mut attendee = self
            .attendees
            .fetch_by_badge_and_event(&input.badge_id, input.event_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Attendee with badge ID {} not found for this event",
                    input.badge_id
                ))
            })?;

        if attendee.checked_in {
            return Err(AppError::conflict("Attendee is already checked in"));
        }

        attendee.checked_in = true;
        attendee.check_in_time = Some(chrono::Utc::now());
        attendee.entrance = Some(input.entrance);
        attendee.updated_at = chrono::Utc::now();
        self.attendees.save(&attendee).await?;

        self.events
            .increment_checked_in_count(input.event_id)
            .await?;

        tracing::info!(
            attendee_id = %attendee.id,
            event_id = %attendee.event_id,
            badge_id = %attendee.badge_id,
            entrance = ?attendee.entrance,
            "Attendee checked in"
        );
        Ok(attendee)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AttendeeDetails, CreateEvent, Event, RandomBadgeIds, RegisterAttendee};
    use crate::workflow::RegistrationWorkflow;
    use chrono::NaiveDate;
    use uuid::Uuid;

    async fn setup() -> (
        CheckInWorkflow,
        RegistrationWorkflow,
        EventRegistry,
        Event,
        Stores,
    ) {
        let stores = Stores::in_memory();
        let registration =
            RegistrationWorkflow::new(&stores, Arc::new(RandomBadgeIds::seeded(3)));
        let checkin = CheckInWorkflow::new(&stores);
        let events = EventRegistry::new(&stores);

        let event = events
            .create(CreateEvent {
                name: "RustConf".to_string(),
                description: None,
                location: None,
                start_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
                end_date: None,
                attendee_limit: 0,
                is_active: true,
            })
            .await
            .unwrap();

        (checkin, registration, events, event, stores)
    }

    fn register_input(event_id: Uuid, email: &str) -> RegisterAttendee {
        RegisterAttendee {
            event_id,
            details: AttendeeDetails {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: email.to_string(),
                phone: None,
                organization: None,
            },
        }
    }

    #[tokio::test]
    async fn test_check_in_sets_state_and_counter() {
        let (checkin, registration, events, event, _stores) = setup().await;
        let attendee = registration
            .register(register_input(event.id, "ada@example.com"))
            .await
            .unwrap();

        let checked = checkin
            .check_in(CheckInRequest {
                event_id: event.id,
                badge_id: attendee.badge_id.clone(),
                entrance: "North Gate".to_string(),
            })
            .await
            .unwrap();

        assert!(checked.checked_in);
        assert!(checked.check_in_time.is_some());
        assert_eq!(checked.entrance.as_deref(), Some("North Gate"));

        let stored = events.load_stored(event.id).await.unwrap();
        assert_eq!(stored.checked_in_count, 1);
    }

    #[tokio::test]
    async fn test_double_check_in_is_conflict_and_leaves_state() {
        let (checkin, registration, _, event, stores) = setup().await;
        let attendee = registration
            .register(register_input(event.id, "ada@example.com"))
            .await
            .unwrap();

        let first = checkin
            .check_in(CheckInRequest {
                event_id: event.id,
                badge_id: attendee.badge_id.clone(),
                entrance: "North Gate".to_string(),
            })
            .await
            .unwrap();

        let err = checkin
            .check_in(CheckInRequest {
                event_id: event.id,
                badge_id: attendee.badge_id.clone(),
                entrance: "South Gate".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // time and entrance from the first check-in are untouched
        let persisted = stores.attendees.fetch(attendee.id).await.unwrap().unwrap();
        assert_eq!(persisted.check_in_time, first.check_in_time);
        assert_eq!(persisted.entrance.as_deref(), Some("North Gate"));
    }

    #[tokio::test]
    async fn test_unknown_badge_for_event_is_not_found() {
        let (checkin, registration, _, event, _stores) = setup().await;
        registration
            .register(register_input(event.id, "ada@example.com"))
            .await
            .unwrap();

        let err = checkin
            .check_in(CheckInRequest {
                event_id: Uuid::new_v4(),
                badge_id: "B99999".to_string(),
                entrance: "North Gate".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
