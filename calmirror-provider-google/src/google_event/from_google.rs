use anyhow::{Result, bail};
use calmirror_core::event::{Attendee, EventDateTime, EventType, RawEvent, ResponseStatus};

use super::FromGoogle;

impl FromGoogle<google_calendar::types::Event> for RawEvent {
    fn from_google(event: google_calendar::types::Event) -> Result<Self> {
        let Some(start) = event.start.as_ref().and_then(event_time_from_google) else {
            bail!("Event {} has no start time", event.id);
        };
        let Some(end) = event.end.as_ref().and_then(event_time_from_google) else {
            bail!("Event {} has no end time", event.id);
        };

        // Google omits the list for events without guests
        let attendees = if event.attendees.is_empty() {
            None
        } else {
            Some(
                event
                    .attendees
                    .iter()
                    .map(|a| Attendee {
                        email: a.email.clone(),
                        response_status: ResponseStatus::from_provider(&a.response_status),
                        is_self: a.self_,
                    })
                    .collect(),
            )
        };

        Ok(RawEvent {
            id: event.id,
            start,
            end,
            summary: event.summary,
            location: non_empty(event.location),
            attendees,
            event_type: EventType::from_provider(&event.event_type),
            html_link: non_empty(event.html_link),
        })
    }
}

/// `None` when Google sent neither a date nor a date-time.
fn event_time_from_google(time: &google_calendar::types::EventDateTime) -> Option<EventDateTime> {
    if time.date.is_none() && time.date_time.is_none() {
        return None;
    }

    Some(EventDateTime {
        date: time.date,
        date_time: time.date_time,
        time_zone: non_empty(time.time_zone.clone()),
    })
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}
