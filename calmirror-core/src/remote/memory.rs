//! In-memory calendars.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, NaiveTime, Utc};

use crate::date_range::SyncWindow;
use crate::error::{MirrorError, MirrorResult};
use crate::event::{EventDateTime, EventType, RawEvent};
use crate::remote::{CalendarMutator, CalendarReader, NewEvent};

/// A set of calendars held in memory.
///
/// Clones share state, so a handle kept by the caller sees every mutation made
/// through the handle given to a sync session. Every create and delete call is
/// recorded, including failed ones.
#[derive(Debug, Clone, Default)]
pub struct MemoryCalendar {
    state: Arc<Mutex<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    calendars: HashMap<String, Vec<RawEvent>>,
    delete_calls: Vec<String>,
    create_calls: Vec<NewEvent>,
    /// Event ids whose deletion fails, and titles whose creation fails
    failing: HashSet<String>,
    unreachable: bool,
    next_id: u64,
}

impl MemoryCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a calendar with events.
    pub fn with_events(self, calendar_id: &str, events: Vec<RawEvent>) -> Self {
        self.lock()
            .calendars
            .entry(calendar_id.to_string())
            .or_default()
            .extend(events);
        self
    }

    /// Make deletes of this event id, or creates with this title, fail.
    pub fn fail_on(&self, id_or_title: &str) {
        self.lock().failing.insert(id_or_title.to_string());
    }

    /// Make every list call fail.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.lock().unreachable = unreachable;
    }

    pub fn events(&self, calendar_id: &str) -> Vec<RawEvent> {
        self.lock()
            .calendars
            .get(calendar_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn delete_calls(&self) -> Vec<String> {
        self.lock().delete_calls.clone()
    }

    pub fn create_calls(&self) -> Vec<NewEvent> {
        self.lock().create_calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // A panicking test thread can't leave the state half-written
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CalendarReader for MemoryCalendar {
    async fn list_events(
        &self,
        calendar_id: &str,
        window: &SyncWindow,
    ) -> MirrorResult<Vec<RawEvent>> {
        let state = self.lock();

        if state.unreachable {
            return Err(MirrorError::Fetch {
                calendar: calendar_id.to_string(),
                message: "calendar unreachable".into(),
            });
        }

        Ok(state
            .calendars
            .get(calendar_id)
            .map(|events| {
                events
                    .iter()
                    .filter(|e| overlaps(e, window))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

impl CalendarMutator for MemoryCalendar {
    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> MirrorResult<()> {
        let mut state = self.lock();
        state.delete_calls.push(event_id.to_string());

        if state.failing.contains(event_id) {
            return Err(MirrorError::Provider(format!("Refusing to delete {}", event_id)));
        }

        let events = state.calendars.entry(calendar_id.to_string()).or_default();
        let before = events.len();
        events.retain(|e| e.id != event_id);

        if events.len() == before {
            return Err(MirrorError::Provider(format!("Event {} not found", event_id)));
        }

        Ok(())
    }

    async fn create_event(&self, calendar_id: &str, event: &NewEvent) -> MirrorResult<RawEvent> {
        let mut state = self.lock();
        state.create_calls.push(event.clone());

        if state.failing.contains(&event.summary) {
            return Err(MirrorError::Provider(format!(
                "Refusing to create {}",
                event.summary
            )));
        }

        state.next_id += 1;
        let created = RawEvent {
            id: format!("mem-{}", state.next_id),
            start: event.start.clone(),
            end: event.end.clone(),
            summary: event.summary.clone(),
            location: event.location.clone(),
            attendees: None,
            event_type: EventType::Default,
            html_link: None,
        };

        state
            .calendars
            .entry(calendar_id.to_string())
            .or_default()
            .push(created.clone());

        Ok(created)
    }
}

/// Same rule as Google's timeMin/timeMax: the event ends after `from` and
/// starts before `to`.
fn overlaps(event: &RawEvent, window: &SyncWindow) -> bool {
    match (instant(&event.start), instant(&event.end)) {
        (Some(start), Some(end)) => end > window.from && start < window.to,
        _ => false,
    }
}

fn instant(time: &EventDateTime) -> Option<DateTime<Utc>> {
    time.date_time
        .or_else(|| time.date.map(|d| d.and_time(NaiveTime::MIN).and_utc()))
}
