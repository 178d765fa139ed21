//! Statistics engine
//!
//! Read-only aggregation over events, attendees and entrances. All
//! totals come from the derived counters (attendee rows), never the
//! stored fields, so removals and drift don't skew the numbers.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::Attendee;
use crate::error::AppResult;
use crate::registry::EventRegistry;
use crate::store::{AttendeeStore, EntranceStore, Stores};

pub const DEFAULT_RECENT_LIMIT: i64 = 10;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStatistics {
    pub total_registered: i64,
    pub total_checked_in: i64,
    /// Percentage of registered attendees who have checked in; full
    /// float, unrounded
    pub check_in_rate: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntranceStatistics {
    pub entrances: Vec<EntranceStat>,
    pub total_checked_in: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntranceStat {
    pub name: String,
    pub count: i32,
    /// Share of total check-ins, rounded to 2 decimals
    pub percentage: f64,
}

#[derive(Clone)]
pub struct StatsService {
    events: EventRegistry,
    attendees: Arc<dyn AttendeeStore>,
    entrances: Arc<dyn EntranceStore>,
}

impl StatsService {
    pub fn new(stores: &Stores) -> Self {
        Self {
            events: EventRegistry::new(stores),
            attendees: stores.attendees.clone(),
            entrances: stores.entrances.clone(),
        }
    }

    pub async fn event_statistics(&self, event_id: Uuid) -> AppResult<EventStatistics> {
        let event = self.events.find_by_id(event_id).await?;

        let total_registered = event.registered_count as i64;
        let total_checked_in = event.checked_in_count as i64;
        let check_in_rate = if total_registered > 0 {
            total_checked_in as f64 / total_registered as f64 * 100.0
        } else {
            0.0
        };

        Ok(EventStatistics {
            total_registered,
            total_checked_in,
            check_in_rate,
        })
    }

    pub async fn recent_check_ins(
        &self,
        event_id: Uuid,
        limit: Option<i64>,
    ) -> AppResult<Vec<Attendee>> {
        self.attendees
            .fetch_checked_in(event_id, limit.unwrap_or(DEFAULT_RECENT_LIMIT))
            .await
    }

    pub async fn entrance_statistics(&self, event_id: Uuid) -> AppResult<EntranceStatistics> {
        let entrances = self.entrances.fetch_by_event(event_id).await?;
        let event = self.events.find_by_id(event_id).await?;
        let total_checked_in = event.checked_in_count as i64;

        let entrances = entrances
            .into_iter()
            .map(|entrance| {
                let percentage = if total_checked_in > 0 {
                    round2(entrance.scanned_count as f64 / total_checked_in as f64 * 100.0)
                } else {
                    0.0
                };
                EntranceStat {
                    name: entrance.name,
                    count: entrance.scanned_count,
                    percentage,
                }
            })
            .collect();

        Ok(EntranceStatistics {
            entrances,
            total_checked_in,
        })
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
