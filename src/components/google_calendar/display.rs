use super::models::{CalendarEvent, Reminders, DEFAULT_REMINDER_MINUTES};

/// Render reminders as `{Time: N minutes before, Method: M}` groups
pub fn format_reminders(reminders: &Reminders) -> String {
    match reminders {
        Reminders::Default => format!(
            "{{Time: {} minutes before, Method: pop-up}}",
            DEFAULT_REMINDER_MINUTES
        ),
        Reminders::Overrides(overrides) => overrides
            .iter()
            .map(|reminder| {
                format!(
                    "{{Time: {} minutes before, Method: {}}}",
                    reminder.minutes, reminder.method
                )
            })
            .collect(),
    }
}

/// One-line listing: start, summary and reminders
pub fn format_summary_line(event: &CalendarEvent) -> String {
    let start = event
        .start
        .as_ref()
        .map(|start| start.to_string())
        .unwrap_or_default();
    format!(
        "{} {} | Reminders -> {}",
        start,
        event.summary.as_deref().unwrap_or("(No title)"),
        format_reminders(&event.reminders)
    )
}

/// Numbered listing, or a notice when there is nothing to show
pub fn format_listing(events: &[CalendarEvent]) -> String {
    if events.is_empty() {
        return "No events found.".to_string();
    }

    events
        .iter()
        .enumerate()
        .map(|(i, event)| format!("{} : {}", i + 1, format_summary_line(event)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Detailed view of a single event
pub fn format_details(event: &CalendarEvent) -> String {
    fn field(value: Option<&str>) -> &str {
        value.unwrap_or("-")
    }

    let creator = event.creator.as_ref().and_then(|p| p.email.as_deref());
    let organizer = event.organizer.as_ref().and_then(|p| p.email.as_deref());

    let mut lines = vec![
        format!("Kind: {}", field(event.kind.as_deref())),
        format!("Id: {}", event.id),
        format!("Status: {}", field(event.status.as_deref())),
        format!("HTML Link: {}", field(event.html_link.as_deref())),
        format!("Created: {}", field(event.created.as_deref())),
        format!("Updated: {}", field(event.updated.as_deref())),
        format!("Summary: {}", field(event.summary.as_deref())),
        format!("Creator: {}", field(creator)),
        format!("Organizer: {}", field(organizer)),
    ];

    if let Some(start) = &event.start {
        lines.push(format!("Start: {}", start));
    }
    if let Some(end) = &event.end {
        lines.push(format!("End: {}", end));
    }
    lines.push(format!("Reminders: {}", format_reminders(&event.reminders)));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::google_calendar::models::{EventTime, Person, ReminderOverride};
    use chrono::NaiveDate;

    fn testing_event() -> CalendarEvent {
        let start = serde_json::from_value::<EventTime>(serde_json::json!({
            "dateTime": "2100-07-15T08:00:00+08:00"
        }))
        .unwrap();
        CalendarEvent {
            id: "abc".to_string(),
            summary: Some("__testing__".to_string()),
            start: Some(start),
            ..Default::default()
        }
    }

    #[test]
    fn test_summary_line_default_reminder() {
        assert_eq!(
            format_summary_line(&testing_event()),
            "2100-07-15T08:00:00+08:00 __testing__ | Reminders -> {Time: 10 minutes before, Method: pop-up}"
        );
    }

    #[test]
    fn test_summary_line_overrides() {
        let mut event = testing_event();
        event.start = Some(EventTime::on(NaiveDate::from_ymd_opt(2100, 7, 15).unwrap()));
        event.reminders =
            Reminders::Overrides(vec![ReminderOverride::email(1440), ReminderOverride::popup(10)]);
        assert_eq!(
            format_summary_line(&event),
            "2100-07-15 __testing__ | Reminders -> {Time: 1440 minutes before, Method: email}{Time: 10 minutes before, Method: popup}"
        );

        event.reminders = Reminders::none();
        assert!(format_summary_line(&event).ends_with("| Reminders -> "));
    }

    #[test]
    fn test_listing() {
        assert_eq!(format_listing(&[]), "No events found.");

        let listing = format_listing(&[testing_event(), testing_event()]);
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("1 : 2100-07-15"));
        assert!(lines[1].starts_with("2 : "));
    }

    #[test]
    fn test_details() {
        let mut event = testing_event();
        event.creator = Some(Person {
            email: Some("me@example.com".to_string()),
            ..Default::default()
        });
        let details = format_details(&event);
        assert!(details.contains("Summary: __testing__"));
        assert!(details.contains("Creator: me@example.com"));
        assert!(details.contains("Organizer: -"));
        assert!(details.contains("Start: 2100-07-15T08:00:00+08:00"));
        assert!(!details.contains("End:"));
    }
}
