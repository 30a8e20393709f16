use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Lead time of the calendar's implicit pop-up reminder
pub const DEFAULT_REMINDER_MINUTES: u32 = 10;

/// Calendar event as exchanged with the Google Calendar API.
///
/// Fields the client does not model are kept in `extra`, so writing an event
/// back replaces the remote record without dropping anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<EventTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<EventTime>,
    #[serde(default)]
    pub reminders: Reminders,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<Person>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<Person>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CalendarEvent {
    /// New event body suitable for inserting
    pub fn new(summary: impl Into<String>, start: EventTime, end: EventTime) -> Self {
        Self {
            summary: Some(summary.into()),
            start: Some(start),
            end: Some(end),
            ..Default::default()
        }
    }

    /// Case-sensitive substring match against the summary
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        self.summary
            .as_deref()
            .is_some_and(|summary| summary.contains(keyword))
    }

    /// Start as an instant; all-day events start at midnight UTC
    pub fn start_instant(&self) -> Option<DateTime<Utc>> {
        self.start.as_ref().map(EventTime::instant)
    }
}

/// Creator or organizer of an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Start or end of an event: either a whole date or a zoned instant.
///
/// Fields not modelled here are kept in `extra` and written back as read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventTime {
    DateTime {
        #[serde(rename = "dateTime")]
        date_time: DateTime<FixedOffset>,
        #[serde(rename = "timeZone", default, skip_serializing_if = "Option::is_none")]
        time_zone: Option<String>,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    Date {
        date: NaiveDate,
        #[serde(rename = "timeZone", default, skip_serializing_if = "Option::is_none")]
        time_zone: Option<String>,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
}

impl EventTime {
    /// Zoned instant without an explicit time zone name
    pub fn at(instant: DateTime<Utc>) -> Self {
        EventTime::DateTime {
            date_time: instant.into(),
            time_zone: None,
            extra: Map::new(),
        }
    }

    /// Whole-day value
    pub fn on(date: NaiveDate) -> Self {
        EventTime::Date {
            date,
            time_zone: None,
            extra: Map::new(),
        }
    }

    pub fn is_all_day(&self) -> bool {
        matches!(self, EventTime::Date { .. })
    }

    /// Point in time used for ordering and window checks
    pub fn instant(&self) -> DateTime<Utc> {
        match self {
            EventTime::DateTime { date_time, .. } => date_time.with_timezone(&Utc),
            EventTime::Date { date, .. } => NaiveDateTime::from(*date).and_utc(),
        }
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTime::DateTime { date_time, .. } => write!(f, "{}", date_time.to_rfc3339()),
            EventTime::Date { date, .. } => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

/// Reminder configuration of an event.
///
/// `Default` is the calendar's implicit 10-minute pop-up. An empty
/// `Overrides` list means the event has no reminders at all.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawReminders", into = "RawReminders")]
pub enum Reminders {
    #[default]
    Default,
    Overrides(Vec<ReminderOverride>),
}

impl Reminders {
    /// No reminders at all
    pub fn none() -> Self {
        Reminders::Overrides(Vec::new())
    }
}

/// Wire shape of the `reminders` object
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReminders {
    #[serde(default)]
    use_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    overrides: Option<Vec<ReminderOverride>>,
}

impl TryFrom<RawReminders> for Reminders {
    type Error = String;

    fn try_from(raw: RawReminders) -> Result<Self, Self::Error> {
        match (raw.use_default, raw.overrides) {
            (true, Some(overrides)) if !overrides.is_empty() => {
                Err("reminders cannot use the default and carry overrides".to_string())
            }
            (true, _) => Ok(Reminders::Default),
            (false, overrides) => Ok(Reminders::Overrides(overrides.unwrap_or_default())),
        }
    }
}

impl From<Reminders> for RawReminders {
    fn from(reminders: Reminders) -> Self {
        match reminders {
            Reminders::Default => RawReminders {
                use_default: true,
                overrides: None,
            },
            Reminders::Overrides(overrides) => RawReminders {
                use_default: false,
                overrides: if overrides.is_empty() {
                    None
                } else {
                    Some(overrides)
                },
            },
        }
    }
}

/// Explicit alert rule attached to an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderOverride {
    pub method: ReminderMethod,
    pub minutes: u32,
}

impl ReminderOverride {
    pub fn popup(minutes: u32) -> Self {
        Self {
            method: ReminderMethod::Popup,
            minutes,
        }
    }

    pub fn email(minutes: u32) -> Self {
        Self {
            method: ReminderMethod::Email,
            minutes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderMethod {
    Popup,
    Email,
    #[serde(untagged)]
    Other(String),
}

impl fmt::Display for ReminderMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReminderMethod::Popup => write!(f, "popup"),
            ReminderMethod::Email => write!(f, "email"),
            ReminderMethod::Other(method) => write!(f, "{}", method),
        }
    }
}

/// One page of `events.list`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EventsPage {
    #[serde(default)]
    pub items: Vec<CalendarEvent>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}
