use super::models::CalendarEvent;
use super::window::TimeWindow;
use crate::error::CalendarResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Ordering requested for every listing
pub const ORDER_BY_START_TIME: &str = "startTime";

/// Filters for `events.list`.
///
/// Recurring events are always expanded into single instances and results
/// are ordered by start time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListEventsParams {
    pub time_min: Option<DateTime<Utc>>,
    pub time_max: Option<DateTime<Utc>>,
    pub max_results: Option<u32>,
}

impl ListEventsParams {
    /// Listing restricted to a time window
    pub fn in_window(window: &TimeWindow) -> Self {
        Self {
            time_min: Some(window.start()),
            time_max: window.end(),
            ..Default::default()
        }
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }
}

/// Request/response contract of the remote calendar
#[async_trait]
pub trait CalendarStore: Send + Sync {
    /// List events, expanded to single instances and ordered by start
    async fn list_events(
        &self,
        calendar_id: &str,
        params: &ListEventsParams,
    ) -> CalendarResult<Vec<CalendarEvent>>;

    /// Delete one event; `NotFound` if the store no longer has it
    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> CalendarResult<()>;

    /// Replace the full record of an existing event
    async fn update_event(
        &self,
        calendar_id: &str,
        event: &CalendarEvent,
    ) -> CalendarResult<CalendarEvent>;

    /// Create an event; the store assigns its id
    async fn insert_event(
        &self,
        calendar_id: &str,
        event: &CalendarEvent,
    ) -> CalendarResult<CalendarEvent>;
}
