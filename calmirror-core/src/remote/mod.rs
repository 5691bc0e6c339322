//! Calendar access seams.
//!
//! The sync session only talks to calendars through these traits. Provider
//! adapters (e.g. `calmirror-provider-google`) implement them against a real
//! API; [`MemoryCalendar`] implements them in memory.

mod memory;

pub use memory::MemoryCalendar;

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::anonymize::AnonymizedPayload;
use crate::date_range::SyncWindow;
use crate::error::MirrorResult;
use crate::event::{EventDateTime, RawEvent};

/// Reads single (already expanded) events from a calendar.
pub trait CalendarReader {
    fn list_events(
        &self,
        calendar_id: &str,
        window: &SyncWindow,
    ) -> impl Future<Output = MirrorResult<Vec<RawEvent>>> + Send;
}

/// Creates and deletes events in a calendar.
pub trait CalendarMutator {
    fn delete_event(
        &self,
        calendar_id: &str,
        event_id: &str,
    ) -> impl Future<Output = MirrorResult<()>> + Send;

    fn create_event(
        &self,
        calendar_id: &str,
        event: &NewEvent,
    ) -> impl Future<Output = MirrorResult<RawEvent>> + Send;
}

/// Body of an event to insert into the target calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    pub summary: String,
    pub location: Option<String>,
    pub start: EventDateTime,
    pub end: EventDateTime,
    /// Mirrored busy blocks never notify; providers must also send no overrides
    pub use_default_reminders: bool,
}

impl From<&AnonymizedPayload> for NewEvent {
    fn from(payload: &AnonymizedPayload) -> Self {
        NewEvent {
            summary: payload.title.clone(),
            location: payload.location.clone(),
            start: payload.start.clone(),
            end: payload.end.clone(),
            use_default_reminders: false,
        }
    }
}
