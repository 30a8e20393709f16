use super::models::CalendarEvent;
use super::store::{CalendarStore, ListEventsParams};
use super::window::{
    calendar_date_window, relative_span_window, upcoming_window, CalendarDate, SpanDirection,
    SpanPolicy, TimeWindow,
};
use crate::error::{invalid_argument, CalendarResult};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use tracing::debug;

/// What to look up in the calendar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventQuery {
    /// The next `count` events starting at `from`
    Upcoming { from: DateTime<Utc>, count: i64 },
    /// Events within `years` calendar years before or after `from`
    RelativeSpan {
        from: DateTime<Utc>,
        years: i32,
        direction: SpanDirection,
    },
    /// Events in a given year, month or day
    CalendarDate(CalendarDate),
    /// Events whose summary contains the text (case-sensitive)
    Keyword(String),
}

/// Runs queries against a calendar store
pub struct EventLocator<S> {
    store: S,
    calendar_id: String,
    span_policy: SpanPolicy,
}

impl<S: CalendarStore> EventLocator<S> {
    pub fn new(store: S, calendar_id: impl Into<String>) -> Self {
        Self {
            store,
            calendar_id: calendar_id.into(),
            span_policy: SpanPolicy::default(),
        }
    }

    pub fn with_span_policy(mut self, span_policy: SpanPolicy) -> Self {
        self.span_policy = span_policy;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn calendar_id(&self) -> &str {
        &self.calendar_id
    }

    pub fn span_policy(&self) -> &SpanPolicy {
        &self.span_policy
    }

    /// Run a query; the result is ordered by start time and may be empty.
    ///
    /// Parameters are validated before anything is sent to the store.
    pub async fn find(&self, query: &EventQuery) -> CalendarResult<Vec<CalendarEvent>> {
        match query {
            EventQuery::Upcoming { from, count } => {
                let window = upcoming_window(*from, *count)?;
                let max_results = u32::try_from(*count)
                    .map_err(|_| invalid_argument(&format!("Too many events requested: {}", count)))?;
                self.fetch_window(&window, Some(max_results)).await
            }
            EventQuery::RelativeSpan {
                from,
                years,
                direction,
            } => {
                let window = relative_span_window(*from, *years, *direction, &self.span_policy)?;
                self.fetch_window(&window, None).await
            }
            EventQuery::CalendarDate(date) => {
                let window = calendar_date_window(*date)?;
                self.fetch_window(&window, None).await
            }
            EventQuery::Keyword(keyword) => self.search(keyword).await,
        }
    }

    /// Events whose summary contains `keyword` as a case-sensitive substring.
    ///
    /// The filter runs locally; the API's own `q` search ignores case.
    pub async fn search(&self, keyword: &str) -> CalendarResult<Vec<CalendarEvent>> {
        let events = self
            .store
            .list_events(&self.calendar_id, &ListEventsParams::default())
            .await?;

        let mut matches: Vec<CalendarEvent> = events
            .into_iter()
            .filter(|event| event.matches_keyword(keyword))
            .collect();
        sort_by_start(&mut matches);

        debug!("{} events match '{}'", matches.len(), keyword);
        Ok(matches)
    }

    async fn fetch_window(
        &self,
        window: &TimeWindow,
        max_results: Option<u32>,
    ) -> CalendarResult<Vec<CalendarEvent>> {
        let mut params = ListEventsParams::in_window(window);
        if let Some(max_results) = max_results {
            params = params.with_max_results(max_results);
        }

        let mut events = self.store.list_events(&self.calendar_id, &params).await?;
        sort_by_start(&mut events);
        if let Some(max_results) = max_results {
            events.truncate(max_results as usize);
        }

        Ok(events)
    }
}

/// Stable sort by start; events without a start go last
pub fn sort_by_start(events: &mut [CalendarEvent]) {
    events.sort_by(|a, b| match (a.start_instant(), b.start_instant()) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
