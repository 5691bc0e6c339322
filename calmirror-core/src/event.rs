//! Provider-neutral event types.
//!
//! Calendar adapters convert their API responses into these types, and the
//! anonymizer, index builders and differ work exclusively with them.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A calendar event as returned by a provider for the queried window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Provider-scoped identifier, unique within one calendar
    pub id: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
    pub summary: String,
    pub location: Option<String>,
    /// `None` when the provider sent no attendee list at all
    pub attendees: Option<Vec<Attendee>>,
    pub event_type: EventType,
    /// Link to the event in the provider's web UI
    pub html_link: Option<String>,
}

impl RawEvent {
    /// Attendee entry flagged as the calendar owner, if any.
    pub fn self_attendee(&self) -> Option<&Attendee> {
        self.attendees.as_ref()?.iter().find(|a| a.is_self)
    }

    pub fn attendee_count(&self) -> usize {
        self.attendees.as_ref().map_or(0, Vec::len)
    }
}

impl fmt::Display for RawEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.summary, self.start)
    }
}

/// Start or end of an event.
///
/// All-day events carry `date`; timed events carry `date_time` and usually a
/// `time_zone`. All three are hashed as-is, so a missing value is meaningful.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventDateTime {
    pub date: Option<NaiveDate>,
    pub date_time: Option<DateTime<Utc>>,
    pub time_zone: Option<String>,
}

impl EventDateTime {
    pub fn all_day(date: NaiveDate) -> Self {
        EventDateTime {
            date: Some(date),
            date_time: None,
            time_zone: None,
        }
    }

    pub fn timed(date_time: DateTime<Utc>, time_zone: Option<&str>) -> Self {
        EventDateTime {
            date: None,
            date_time: Some(date_time),
            time_zone: time_zone.map(str::to_string),
        }
    }
}

impl fmt::Display for EventDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.date_time, &self.date) {
            (Some(dt), _) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M UTC")),
            (None, Some(d)) => write!(f, "{}", d.format("%Y-%m-%d")),
            (None, None) => write!(f, "(no time)"),
        }
    }
}

/// An event attendee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendee {
    pub email: String,
    pub response_status: Option<ResponseStatus>,
    /// Whether this entry represents the owner of the calendar being read
    pub is_self: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseStatus {
    Accepted,
    Declined,
    Tentative,
    NeedsAction,
}

impl ResponseStatus {
    /// Parse the provider's camelCase status string.
    pub fn from_provider(status: &str) -> Option<Self> {
        match status {
            "accepted" => Some(ResponseStatus::Accepted),
            "declined" => Some(ResponseStatus::Declined),
            "tentative" => Some(ResponseStatus::Tentative),
            "needsAction" => Some(ResponseStatus::NeedsAction),
            _ => None,
        }
    }
}

/// Provider event classifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    #[default]
    Default,
    OutOfOffice,
    FocusTime,
    WorkingLocation,
    FromGmail,
    Birthday,
}

impl EventType {
    /// Parse the provider's camelCase type string. Unknown types are plain events.
    pub fn from_provider(event_type: &str) -> Self {
        match event_type {
            "outOfOffice" => EventType::OutOfOffice,
            "focusTime" => EventType::FocusTime,
            "workingLocation" => EventType::WorkingLocation,
            "fromGmail" => EventType::FromGmail,
            "birthday" => EventType::Birthday,
            _ => EventType::Default,
        }
    }
}
