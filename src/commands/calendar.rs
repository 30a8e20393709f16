use calnav::components::google_calendar::display::{format_details, format_listing, format_reminders};
use calnav::components::google_calendar::{CalendarEvent, EventTime, ReminderRemoval};
use calnav::components::GoogleCalendarHandle;
use calnav::error::{invalid_argument, out_of_range, CalendarResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::info;

/// Print a numbered list of events
pub fn list(events: Vec<CalendarEvent>) {
    println!("{}", format_listing(&events));
}

/// Print details of the `index`-th event matching `name`
pub async fn show(handle: &GoogleCalendarHandle, name: &str, index: usize) -> CalendarResult<()> {
    let events = handle.search_events(name).await?;
    let event = events.get(index).ok_or_else(|| {
        out_of_range(&format!(
            "Event index {} is invalid for {} match(es) of '{}'",
            index,
            events.len(),
            name
        ))
    })?;

    println!("{}", format_details(event));
    Ok(())
}

/// Delete events by name
pub async fn delete(handle: &GoogleCalendarHandle, name: &str) -> CalendarResult<()> {
    let deleted = handle.delete_events_by_name(name).await?;
    println!("Deleted {} event(s) matching '{}'", deleted, name);
    Ok(())
}

/// Delete reminders from one event
pub async fn delete_reminder(
    handle: &GoogleCalendarHandle,
    name: &str,
    index: usize,
    removal: ReminderRemoval,
) -> CalendarResult<()> {
    let event = handle.delete_event_reminder(name, index, removal).await?;
    println!(
        "Reminders of '{}' are now: {}",
        event.summary.as_deref().unwrap_or(&event.id),
        format_reminders(&event.reminders)
    );
    Ok(())
}

/// Create an event with the default reminder
pub async fn add(
    handle: &GoogleCalendarHandle,
    summary: String,
    start: &str,
    end: &str,
) -> CalendarResult<()> {
    let start = parse_event_time(start)?;
    let end = parse_event_time(end)?;
    if start.is_all_day() != end.is_all_day() {
        return Err(invalid_argument("Start and end must both be dates or both be times"));
    }
    if end.instant() < start.instant() {
        return Err(invalid_argument("Event end is before its start"));
    }

    let created = handle
        .insert_event(&CalendarEvent::new(summary, start, end))
        .await?;
    info!("Created event {}", created.id);
    println!("Created event {}", created.id);
    Ok(())
}

/// Parse `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM[:SS]` (UTC) or RFC 3339
fn parse_event_time(value: &str) -> CalendarResult<EventTime> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(EventTime::on(date));
    }
    if let Ok(date_time) = DateTime::parse_from_rfc3339(value) {
        return Ok(EventTime::DateTime {
            date_time,
            time_zone: None,
            extra: Default::default(),
        });
    }

    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| EventTime::at(naive.and_utc()))
        .ok_or_else(|| invalid_argument(&format!("Cannot parse '{}' as a date or time", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_parse_event_time() {
        assert_eq!(
            parse_event_time("2025-03-20").unwrap(),
            EventTime::on(NaiveDate::from_ymd_opt(2025, 3, 20).unwrap())
        );
        assert_eq!(
            parse_event_time("2025-03-20T15:00").unwrap().instant(),
            Utc.with_ymd_and_hms(2025, 3, 20, 15, 0, 0).unwrap()
        );
        assert_eq!(
            parse_event_time("2025-03-20T15:00:00+02:00").unwrap().instant(),
            Utc.with_ymd_and_hms(2025, 3, 20, 13, 0, 0).unwrap()
        );
        assert!(parse_event_time("next tuesday").is_err());
    }
}
