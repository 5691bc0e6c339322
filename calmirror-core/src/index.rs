//! Fingerprint indices for the work and personal calendars.

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::anonymize::{AnonymizedPayload, Fingerprint, anonymize};
use crate::event::{EventType, RawEvent, ResponseStatus};

pub const FOCUS_TIME_TITLE: &str = "Focus Time";
pub const WORK_EVENT_TITLE: &str = "Work Event";
pub const ONE_ON_ONE_TITLE: &str = "1:1 Meeting";

/// Fingerprint → payload for one calendar's events in one sync window.
///
/// Keeps insertion order. Inserting a fingerprint that is already present
/// replaces the payload but keeps the original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FingerprintIndex(IndexMap<Fingerprint, AnonymizedPayload>);

impl FingerprintIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, fingerprint: Fingerprint, payload: AnonymizedPayload) {
        match self.0.entry(fingerprint) {
            Entry::Occupied(mut entry) => {
                tracing::debug!(
                    fingerprint = entry.key().short(),
                    replaced = %entry.get().id,
                    by = %payload.id,
                    "Fingerprint collision, keeping the later event"
                );
                entry.insert(payload);
            }
            Entry::Vacant(entry) => {
                entry.insert(payload);
            }
        }
    }

    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.0.contains_key(fingerprint)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Fingerprint, &AnonymizedPayload)> {
        self.0.iter()
    }
}

impl FromIterator<(Fingerprint, AnonymizedPayload)> for FingerprintIndex {
    fn from_iter<I: IntoIterator<Item = (Fingerprint, AnonymizedPayload)>>(iter: I) -> Self {
        let mut index = FingerprintIndex::new();
        for (fingerprint, payload) in iter {
            index.insert(fingerprint, payload);
        }
        index
    }
}

/// Build the index of work events as they should appear once mirrored.
///
/// Out-of-office events and events the owner declined are skipped. Titles are
/// replaced by a category label.
pub fn build_work_index<'a>(events: impl IntoIterator<Item = &'a RawEvent>) -> FingerprintIndex {
    events
        .into_iter()
        .filter(|event| event.event_type != EventType::OutOfOffice)
        .filter(|event| !is_declined(event))
        .map(|event| anonymize(event, Some(&category_title(event))))
        .collect()
}

/// Build the index of the personal calendar as it currently is.
pub fn build_personal_index<'a>(events: impl IntoIterator<Item = &'a RawEvent>) -> FingerprintIndex {
    events
        .into_iter()
        .map(|event| anonymize(event, None))
        .collect()
}

/// Whether the calendar owner declined the event.
pub fn is_declined(event: &RawEvent) -> bool {
    event
        .self_attendee()
        .is_some_and(|a| a.response_status == Some(ResponseStatus::Declined))
}

/// Category label that stands in for a work event's title.
pub fn category_title(event: &RawEvent) -> String {
    if event.event_type == EventType::FocusTime {
        return FOCUS_TIME_TITLE.to_string();
    }

    match event.attendee_count() {
        2 => ONE_ON_ONE_TITLE.to_string(),
        n if n > 2 => format!("Meeting with {} people", n),
        _ => WORK_EVENT_TITLE.to_string(),
    }
}
