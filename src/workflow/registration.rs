//! Registration workflow
//!
//! Single registration fails fast on capacity or duplicate email. Bulk
//! upload reconciles a whole batch with partial-failure semantics: rows
//! are processed sequentially in index order, every row-level failure is
//! captured into the result, and one bad row never aborts the batch.
//!
//! Capacity checks read the event's stored counter. The check and the
//! later increment are not wrapped in a transaction, so the limit is
//! soft under concurrency; within one batch the running success count
//! keeps the check honest.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Attendee, AttendeeDetails, BadgeIdSource, Event, RegisterAttendee};
use crate::error::{AppError, AppResult};
use crate::registry::EventRegistry;
use crate::store::{AttendeeStore, Stores};

const LIMIT_REACHED: &str = "Event has reached its attendee limit";
const DUPLICATE_EMAIL: &str = "Email is already registered for this event";

/// Payload for `POST /attendees/bulk-upload`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpload {
    pub event_id: Uuid,
    pub attendees: Vec<AttendeeDetails>,
    /// Skip duplicate emails instead of recording an error for them
    #[serde(default)]
    pub skip_duplicates: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUploadResult {
    pub success: BulkSuccess,
    pub errors: BulkErrors,
    pub summary: BulkSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkSuccess {
    pub count: usize,
    pub attendees: Vec<Attendee>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkErrors {
    pub count: usize,
    pub details: Vec<BulkRowError>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkRowError {
    pub index: usize,
    pub attendee: AttendeeDetails,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkSummary {
    pub total_processed: usize,
    pub successful_registrations: usize,
    pub failed_registrations: usize,
    pub duplicates_skipped: usize,
}

enum RowOutcome {
    Registered(Attendee),
    DuplicateSkipped,
}

#[derive(Clone)]
pub struct RegistrationWorkflow {
    events: EventRegistry,
    attendees: Arc<dyn AttendeeStore>,
    badges: Arc<dyn BadgeIdSource>,
}

impl RegistrationWorkflow {
    pub fn new(stores: &Stores, badges: Arc<dyn BadgeIdSource>) -> Self {
        Self {
            events: EventRegistry::new(stores),
            attendees: stores.attendees.clone(),
            badges,
        }
    }

    /// Register one attendee for an event
    pub async fn register(&self, input: RegisterAttendee) -> AppResult<Attendee> {
        let event = self.events.load_stored(input.event_id).await?;

        if event.at_capacity() {
            return Err(AppError::conflict(LIMIT_REACHED));
        }

        if self
            .attendees
            .fetch_by_email_and_event(&input.details.email, input.event_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(DUPLICATE_EMAIL));
        }

        let badge_id = self.badges.next_badge_id();
        let attendee = Attendee::new(input.event_id, badge_id, input.details);
        self.attendees.insert(&attendee).await?;

        self.events
            .increment_registered_count(input.event_id)
            .await?;

        tracing::info!(
            attendee_id = %attendee.id,
            event_id = %attendee.event_id,
            badge_id = %attendee.badge_id,
            "Attendee registered"
        );
        Ok(attendee)
    }

    /// Register a batch of attendees, accumulating successes, row errors
    /// and skipped duplicates
    pub async fn bulk_upload(&self, input: BulkUpload) -> AppResult<BulkUploadResult> {
        let event = self.events.load_stored(input.event_id).await?;

        let mut successful: Vec<Attendee> = Vec::new();
        let mut errors: Vec<BulkRowError> = Vec::new();
        let mut duplicates_skipped = 0usize;

        for (index, row) in input.attendees.iter().enumerate() {
            let outcome = self
                .process_row(&event, row, successful.len(), input.skip_duplicates)
                .await;

            match outcome {
                Ok(RowOutcome::Registered(attendee)) => successful.push(attendee),
                Ok(RowOutcome::DuplicateSkipped) => duplicates_skipped += 1,
                Err(err) => errors.push(BulkRowError {
                    index,
                    attendee: row.clone(),
                    error: err.to_string(),
                }),
            }
        }

        // one increment per success, after the loop, matching the single
        // registration path
        for _ in &successful {
            self.events.increment_registered_count(event.id).await?;
        }

        tracing::info!(
            event_id = %event.id,
            total = input.attendees.len(),
            successful = successful.len(),
            failed = errors.len(),
            duplicates_skipped,
            "Bulk upload processed"
        );

        Ok(BulkUploadResult {
            summary: BulkSummary {
                total_processed: input.attendees.len(),
                successful_registrations: successful.len(),
                failed_registrations: errors.len(),
                duplicates_skipped,
            },
            errors: BulkErrors {
                count: errors.len(),
                details: errors,
            },
            success: BulkSuccess {
                count: successful.len(),
                attendees: successful,
            },
        })
    }

    async fn process_row(
        &self,
        event: &Event,
        row: &AttendeeDetails,
        registered_so_far: usize,
        skip_duplicates: bool,
    ) -> AppResult<RowOutcome> {
        // stored counter plus this batch's successes so far
        if event.has_limit()
            && event.registered_count as usize + registered_so_far >= event.attendee_limit as usize
        {
            return Err(AppError::conflict(LIMIT_REACHED));
        }

        // duplicate check sees rows persisted earlier in this batch too
        if self
            .attendees
            .fetch_by_email_and_event(&row.email, event.id)
            .await?
            .is_some()
        {
            if skip_duplicates {
                return Ok(RowOutcome::DuplicateSkipped);
            }
            return Err(AppError::conflict(DUPLICATE_EMAIL));
        }

        let badge_id = self.badges.next_badge_id();
        let attendee = Attendee::new(event.id, badge_id, row.clone());
        self.attendees.insert(&attendee).await?;
        Ok(RowOutcome::Registered(attendee))
    }
}
