//! Name-addressed deletes and reminder edits.
//!
//! Events are found through the keyword search, so a name also matches every
//! summary that contains it. Once resolved, work is done by event id.

use super::locator::EventLocator;
use super::models::{CalendarEvent, Reminders, DEFAULT_REMINDER_MINUTES};
use super::store::CalendarStore;
use crate::error::{invalid_argument, not_found, out_of_range, CalendarResult};
use tracing::{info, warn};

/// Which reminders to drop from an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderRemoval {
    /// Leave the event with no reminders at all
    ClearAll,
    /// Drop every reminder firing this many minutes before the start
    Minutes(u32),
}

/// Compute the reminder set left after a removal.
///
/// Fails with `NotFound` when nothing would be removed.
pub fn remove_reminder(current: &Reminders, removal: ReminderRemoval) -> CalendarResult<Reminders> {
    let minutes = match removal {
        ReminderRemoval::ClearAll => return Ok(Reminders::none()),
        ReminderRemoval::Minutes(minutes) => minutes,
    };

    match current {
        Reminders::Overrides(overrides) => {
            let remaining: Vec<_> = overrides
                .iter()
                .filter(|reminder| reminder.minutes != minutes)
                .cloned()
                .collect();

            if remaining.len() == overrides.len() {
                return Err(not_found(&format!(
                    "No reminder {} minutes before the event to delete",
                    minutes
                )));
            }
            Ok(Reminders::Overrides(remaining))
        }
        Reminders::Default if minutes == DEFAULT_REMINDER_MINUTES => Ok(Reminders::none()),
        Reminders::Default => Err(not_found(&format!(
            "Event only has the default {}-minute reminder, not one {} minutes before",
            DEFAULT_REMINDER_MINUTES, minutes
        ))),
    }
}

/// Destructive operations on events located by name
pub struct MutationEngine<'a, S> {
    locator: &'a EventLocator<S>,
}

impl<'a, S: CalendarStore> MutationEngine<'a, S> {
    pub fn new(locator: &'a EventLocator<S>) -> Self {
        Self { locator }
    }

    /// Delete every event whose summary contains `name`.
    ///
    /// Returns how many were deleted. Deletions are independent calls, so a
    /// failure part way leaves the earlier ones in effect. A blank name would
    /// match every titled event and is rejected.
    pub async fn delete_by_name(&self, name: &str) -> CalendarResult<usize> {
        if name.trim().is_empty() {
            return Err(invalid_argument("Event name to delete must not be blank"));
        }

        let matches = self.locator.search(name).await?;
        if matches.is_empty() {
            return Err(not_found(&format!("No events with the name '{}'", name)));
        }

        let ids: Vec<String> = matches.into_iter().map(|event| event.id).collect();
        for id in &ids {
            info!("Deleting event {} matching '{}'", id, name);
            self.locator
                .store()
                .delete_event(self.locator.calendar_id(), id)
                .await?;
        }

        Ok(ids.len())
    }

    /// Remove reminders from the `index`-th event matching `name`.
    ///
    /// The whole event is written back with only its reminders changed.
    pub async fn delete_reminder(
        &self,
        name: &str,
        index: usize,
        removal: ReminderRemoval,
    ) -> CalendarResult<CalendarEvent> {
        let mut candidates = self.locator.search(name).await?;
        if index >= candidates.len() {
            return Err(out_of_range(&format!(
                "Event index {} is invalid for {} match(es) of '{}'",
                index,
                candidates.len(),
                name
            )));
        }

        let mut event = candidates.swap_remove(index);
        event.reminders = remove_reminder(&event.reminders, removal).inspect_err(|e| {
            warn!("Not updating reminders of event {}: {}", event.id, e);
        })?;

        info!("Updating reminders of event {} ({:?})", event.id, removal);
        self.locator
            .store()
            .update_event(self.locator.calendar_id(), &event)
            .await
    }
}
