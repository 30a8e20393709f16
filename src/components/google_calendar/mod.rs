mod client;
pub mod display;
mod handle;
pub mod locator;
pub mod models;
pub mod mutation;
pub mod store;
pub mod window;

pub use client::GoogleCalendarClient;
pub use handle::GoogleCalendarHandle;
pub use locator::{EventLocator, EventQuery};
pub use models::{CalendarEvent, EventTime, ReminderMethod, ReminderOverride, Reminders};
pub use mutation::{remove_reminder, MutationEngine, ReminderRemoval};
pub use store::{CalendarStore, ListEventsParams};
pub use window::{
    calendar_date_window, relative_span_window, upcoming_window, CalendarDate, SpanDirection,
    SpanPolicy, TimeWindow,
};
