use super::client::GoogleCalendarClient;
use super::locator::{EventLocator, EventQuery};
use super::models::CalendarEvent;
use super::mutation::{MutationEngine, ReminderRemoval};
use super::store::CalendarStore;
use super::window::{CalendarDate, SpanDirection, SpanPolicy};
use crate::config::Config;
use crate::error::CalendarResult;
use chrono::{DateTime, Utc};

/// Handle for querying and editing one calendar
pub struct GoogleCalendarHandle<S = GoogleCalendarClient> {
    locator: EventLocator<S>,
}

impl GoogleCalendarHandle<GoogleCalendarClient> {
    /// Create a handle talking to the Google Calendar API
    pub fn from_config(config: &Config) -> CalendarResult<Self> {
        let client = GoogleCalendarClient::from_config(config)?;
        Ok(Self::new(client, config.google_calendar_id.clone()).with_span_policy(config.span_policy))
    }
}

impl<S: CalendarStore> GoogleCalendarHandle<S> {
    /// Create a handle over an authenticated store
    pub fn new(store: S, calendar_id: impl Into<String>) -> Self {
        Self {
            locator: EventLocator::new(store, calendar_id),
        }
    }

    pub fn with_span_policy(mut self, span_policy: SpanPolicy) -> Self {
        self.locator = self.locator.with_span_policy(span_policy);
        self
    }

    pub fn locator(&self) -> &EventLocator<S> {
        &self.locator
    }

    fn mutations(&self) -> MutationEngine<'_, S> {
        MutationEngine::new(&self.locator)
    }

    /// Run any query
    pub async fn find(&self, query: &EventQuery) -> CalendarResult<Vec<CalendarEvent>> {
        self.locator.find(query).await
    }

    /// Get the next `count` events from `from`
    pub async fn get_upcoming_events(
        &self,
        from: DateTime<Utc>,
        count: i64,
    ) -> CalendarResult<Vec<CalendarEvent>> {
        self.find(&EventQuery::Upcoming { from, count }).await
    }

    /// Get events from the past `years` years up to `from`
    pub async fn get_past_events(
        &self,
        from: DateTime<Utc>,
        years: i32,
    ) -> CalendarResult<Vec<CalendarEvent>> {
        self.find(&EventQuery::RelativeSpan {
            from,
            years,
            direction: SpanDirection::Past,
        })
        .await
    }

    /// Get events from `from` over the next `years` years
    pub async fn get_future_events(
        &self,
        from: DateTime<Utc>,
        years: i32,
    ) -> CalendarResult<Vec<CalendarEvent>> {
        self.find(&EventQuery::RelativeSpan {
            from,
            years,
            direction: SpanDirection::Future,
        })
        .await
    }

    /// Get events in a year, month or day
    pub async fn get_events_on(&self, date: CalendarDate) -> CalendarResult<Vec<CalendarEvent>> {
        self.find(&EventQuery::CalendarDate(date)).await
    }

    /// Get events whose summary contains `keyword`
    pub async fn search_events(&self, keyword: &str) -> CalendarResult<Vec<CalendarEvent>> {
        self.find(&EventQuery::Keyword(keyword.to_string())).await
    }

    /// Delete all events matching `name`, returning how many were removed
    pub async fn delete_events_by_name(&self, name: &str) -> CalendarResult<usize> {
        self.mutations().delete_by_name(name).await
    }

    /// Remove reminders from the `index`-th event matching `name`
    pub async fn delete_event_reminder(
        &self,
        name: &str,
        index: usize,
        removal: ReminderRemoval,
    ) -> CalendarResult<CalendarEvent> {
        self.mutations().delete_reminder(name, index, removal).await
    }

    /// Create an event
    pub async fn insert_event(&self, event: &CalendarEvent) -> CalendarResult<CalendarEvent> {
        self.locator
            .store()
            .insert_event(self.locator.calendar_id(), event)
            .await
    }
}
