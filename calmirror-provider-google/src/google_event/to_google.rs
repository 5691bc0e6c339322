use calmirror_core::event::EventDateTime;
use calmirror_core::remote::NewEvent;

use super::ToGoogle;

impl ToGoogle<google_calendar::types::Event> for NewEvent {
    fn to_google(&self) -> google_calendar::types::Event {
        // An explicit empty override list silences the calendar's default
        // notifications; `None` would fall back to them.
        let reminders = Some(google_calendar::types::Reminders {
            overrides: vec![],
            use_default: self.use_default_reminders,
        });

        google_calendar::types::Event {
            // Let google assign the ID
            id: String::new(),
            summary: self.summary.clone(),
            location: self.location.clone().unwrap_or_default(),
            start: Some(self.start.to_google()),
            end: Some(self.end.to_google()),
            reminders,
            ..Default::default()
        }
    }
}

impl ToGoogle<google_calendar::types::EventDateTime> for EventDateTime {
    fn to_google(&self) -> google_calendar::types::EventDateTime {
        google_calendar::types::EventDateTime {
            date: self.date,
            date_time: self.date_time,
            time_zone: self.time_zone.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn new_event() -> NewEvent {
        NewEvent {
            summary: "1:1 Meeting".into(),
            location: None,
            start: EventDateTime::timed(
                Utc.with_ymd_and_hms(2025, 4, 11, 14, 0, 0).unwrap(),
                Some("America/New_York"),
            ),
            end: EventDateTime::timed(
                Utc.with_ymd_and_hms(2025, 4, 11, 15, 0, 0).unwrap(),
                Some("America/New_York"),
            ),
            use_default_reminders: false,
        }
    }

    #[test]
    fn reminders_are_disabled() {
        let google = new_event().to_google();

        let reminders = google.reminders.unwrap();
        assert!(!reminders.use_default);
        assert!(reminders.overrides.is_empty());
    }

    #[test]
    fn times_and_zone_are_preserved() {
        let event = new_event();
        let google = event.to_google();

        assert!(google.id.is_empty());
        assert_eq!(google.summary, "1:1 Meeting");
        assert_eq!(google.location, "");

        let start = google.start.unwrap();
        assert_eq!(start.date_time, event.start.date_time);
        assert_eq!(start.date, None);
        assert_eq!(start.time_zone, "America/New_York");
    }
}
