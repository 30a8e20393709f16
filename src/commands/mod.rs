use calnav::components::google_calendar::{CalendarDate, ReminderRemoval};
use calnav::components::GoogleCalendarHandle;
use chrono::Utc;
use clap::{Parser, Subcommand};

// Export submodules
pub mod calendar;

#[derive(Parser)]
#[command(name = "calnav")]
#[command(about = "Query, search and prune events in a Google Calendar")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the next events from now
    Upcoming {
        /// Number of events to show
        #[arg(short = 'n', long, default_value_t = 10, allow_negative_numbers = true)]
        count: i64,
    },
    /// Show events from the past years up to now
    Past {
        #[arg(allow_negative_numbers = true)]
        years: i32,
    },
    /// Show events from now over the next years
    Future {
        #[arg(allow_negative_numbers = true)]
        years: i32,
    },
    /// Show events in a year, a month or a single day
    Date {
        #[arg(allow_negative_numbers = true)]
        year: i32,
        #[arg(allow_negative_numbers = true)]
        month: Option<i32>,
        #[arg(allow_negative_numbers = true)]
        day: Option<i32>,
    },
    /// Show events whose name contains a keyword (case-sensitive)
    Search { keyword: String },
    /// Show details of one event found by name
    Show {
        name: String,
        /// Which match to show, counting from 0
        #[arg(short, long, default_value_t = 0)]
        index: usize,
    },
    /// Delete every event whose name contains the given text
    Delete { name: String },
    /// Delete reminders from one event found by name
    DeleteReminder {
        name: String,
        /// Which match to edit, counting from 0
        #[arg(short, long, default_value_t = 0)]
        index: usize,
        /// Remove reminders firing this many minutes before the event
        #[arg(short, long, required_unless_present = "all", conflicts_with = "all")]
        minutes: Option<u32>,
        /// Remove all reminders
        #[arg(long)]
        all: bool,
    },
    /// Create an event
    Add {
        summary: String,
        /// Start, e.g. "2025-03-20" or "2025-03-20T15:00"
        #[arg(short, long)]
        start: String,
        /// End, same format as the start
        #[arg(short, long)]
        end: String,
    },
}

/// Run one command against the calendar
pub async fn run(command: Command, handle: &GoogleCalendarHandle) -> miette::Result<()> {
    let now = Utc::now();

    match command {
        Command::Upcoming { count } => {
            calendar::list(handle.get_upcoming_events(now, count).await?);
        }
        Command::Past { years } => {
            calendar::list(handle.get_past_events(now, years).await?);
        }
        Command::Future { years } => {
            calendar::list(handle.get_future_events(now, years).await?);
        }
        Command::Date { year, month, day } => {
            let date = CalendarDate::from_parts(year, month.unwrap_or(0), day.unwrap_or(0))?;
            calendar::list(handle.get_events_on(date).await?);
        }
        Command::Search { keyword } => {
            calendar::list(handle.search_events(&keyword).await?);
        }
        Command::Show { name, index } => calendar::show(handle, &name, index).await?,
        Command::Delete { name } => calendar::delete(handle, &name).await?,
        Command::DeleteReminder {
            name,
            index,
            minutes,
            all,
        } => {
            let removal = match minutes {
                Some(minutes) if !all => ReminderRemoval::Minutes(minutes),
                _ => ReminderRemoval::ClearAll,
            };
            calendar::delete_reminder(handle, &name, index, removal).await?
        }
        Command::Add {
            summary,
            start,
            end,
        } => calendar::add(handle, summary, &start, &end).await?,
    }

    Ok(())
}
