//! Event anonymization and fingerprinting.
//!
//! A fingerprint is a SHA-256 over the scrubbed, visible content of an event
//! (time span, title, location). Provider identifiers are never hashed, so the
//! same busy block matches across calendars even though each calendar assigns
//! its own ids.

use std::fmt;
use std::sync::LazyLock;

use chrono::SecondsFormat;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::event::{EventDateTime, RawEvent};

/// Full URL with optional path, anchored at both ends.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^https?://(?:www\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b(?:[-a-zA-Z0-9()@:%_+.~#?&/=]*)$",
    )
    .expect("URL pattern is valid")
});

/// Content hash of an anonymized event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 8 hex chars, enough to tell events apart in logs.
    pub fn short(&self) -> &str {
        self.0.get(..8).unwrap_or(&self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The scrubbed, matchable representation of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnonymizedPayload {
    pub start: EventDateTime,
    pub end: EventDateTime,
    pub title: String,
    pub location: Option<String>,
    /// Source event id. Needed to delete the event later, never hashed.
    pub id: String,
}

impl fmt::Display for AnonymizedPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Anonymize an event, using `forced_title` in place of its own title if given.
pub fn anonymize(event: &RawEvent, forced_title: Option<&str>) -> (Fingerprint, AnonymizedPayload) {
    let title = forced_title.unwrap_or(&event.summary).to_string();
    let location = scrub_location(event.location.as_deref());

    let mut payload = AnonymizedPayload {
        start: event.start.clone(),
        end: event.end.clone(),
        title,
        location,
        id: String::new(),
    };

    let fingerprint = compute_fingerprint(&payload);
    payload.id = event.id.clone();

    (fingerprint, payload)
}

/// Drop locations that are meeting links.
pub fn scrub_location(location: Option<&str>) -> Option<String> {
    let location = location.map(str::trim).filter(|l| !l.is_empty())?;

    if URL_PATTERN.is_match(location) || location.to_lowercase().contains("zoom") {
        return None;
    }

    Some(location.to_string())
}

/// Hash every payload field except `id`, in a fixed order.
fn compute_fingerprint(payload: &AnonymizedPayload) -> Fingerprint {
    let mut hasher = Sha256::new();

    for time in [&payload.start, &payload.end] {
        let date = time.date.map(|d| d.format("%Y-%m-%d").to_string());
        let date_time = time
            .date_time
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true));

        absorb(&mut hasher, date.as_deref());
        absorb(&mut hasher, date_time.as_deref());
        absorb(&mut hasher, time.time_zone.as_deref());
    }

    absorb(&mut hasher, Some(&payload.title));
    absorb(&mut hasher, payload.location.as_deref());

    Fingerprint(hex::encode(hasher.finalize()))
}

/// Length-prefixed so adjacent fields can't bleed into each other, and
/// tagged so `None` differs from `Some("")`.
fn absorb(hasher: &mut Sha256, value: Option<&str>) {
    match value {
        None => hasher.update([0u8]),
        Some(v) => {
            hasher.update([1u8]);
            hasher.update((v.len() as u64).to_le_bytes());
            hasher.update(v.as_bytes());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventType;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn event(id: &str, summary: &str, location: Option<&str>) -> RawEvent {
        RawEvent {
            id: id.to_string(),
            start: EventDateTime::timed(
                Utc.with_ymd_and_hms(2025, 3, 20, 15, 0, 0).unwrap(),
                Some("Europe/Berlin"),
            ),
            end: EventDateTime::timed(
                Utc.with_ymd_and_hms(2025, 3, 20, 16, 0, 0).unwrap(),
                Some("Europe/Berlin"),
            ),
            summary: summary.to_string(),
            location: location.map(str::to_string),
            attendees: None,
            event_type: EventType::Default,
            html_link: None,
        }
    }

    #[test]
    fn fingerprint_ignores_id() {
        let (a, payload_a) = anonymize(&event("work-1", "Planning", Some("Room 4")), None);
        let (b, payload_b) = anonymize(&event("personal-9", "Planning", Some("Room 4")), None);

        assert_eq!(a, b);
        assert_eq!(payload_a.id, "work-1");
        assert_eq!(payload_b.id, "personal-9");
    }

    #[test]
    fn fingerprint_matches_forced_title_against_own_title() {
        // A mirrored event carries the category label as its real title
        let (work, _) = anonymize(&event("w", "Quarterly review", None), Some("1:1 Meeting"));
        let (mirrored, _) = anonymize(&event("p", "1:1 Meeting", None), None);

        assert_eq!(work, mirrored);
    }

    #[test]
    fn fingerprint_changes_with_visible_fields() {
        let (base, _) = anonymize(&event("a", "Work Event", None), None);
        let (retitled, _) = anonymize(&event("a", "1:1 Meeting", None), None);
        let (relocated, _) = anonymize(&event("a", "Work Event", Some("Room 4")), None);

        let mut moved = event("a", "Work Event", None);
        moved.end.date_time = Some(Utc.with_ymd_and_hms(2025, 3, 20, 16, 30, 0).unwrap());
        let (moved, _) = anonymize(&moved, None);

        let mut rezoned = event("a", "Work Event", None);
        rezoned.start.time_zone = None;
        let (rezoned, _) = anonymize(&rezoned, None);

        assert_ne!(base, retitled);
        assert_ne!(base, relocated);
        assert_ne!(base, moved);
        assert_ne!(base, rezoned);
    }

    #[test]
    fn fingerprint_distinguishes_empty_from_missing() {
        let mut empty_zone = event("a", "Work Event", None);
        empty_zone.start.time_zone = Some(String::new());
        let mut no_zone = event("a", "Work Event", None);
        no_zone.start.time_zone = None;

        assert_ne!(anonymize(&empty_zone, None).0, anonymize(&no_zone, None).0);
    }

    #[test]
    fn fingerprint_for_all_day_event() {
        let mut all_day = event("a", "Offsite", None);
        all_day.start = EventDateTime::all_day(NaiveDate::from_ymd_opt(2025, 3, 20).unwrap());
        all_day.end = EventDateTime::all_day(NaiveDate::from_ymd_opt(2025, 3, 21).unwrap());

        let (first, _) = anonymize(&all_day, None);
        let (second, _) = anonymize(&all_day, None);

        assert_eq!(first, second);
        assert_eq!(first.as_str().len(), 64);
        assert_eq!(first.short().len(), 8);
    }

    #[test]
    fn short_form_of_truncated_fingerprint() {
        let fingerprint = Fingerprint("abc".to_string());
        assert_eq!(fingerprint.short(), "abc");
    }

    #[test]
    fn url_locations_are_scrubbed() {
        for url in [
            "https://meet.google.com/abc-defg-hij",
            "http://example.com",
            "https://www.example.org/path/to?x=1&y=2",
            "https://teams.microsoft.com/l/meetup-join/19%3ameeting",
        ] {
            assert_eq!(scrub_location(Some(url)), None, "{url} should be scrubbed");
        }
    }

    #[test]
    fn zoom_locations_are_scrubbed_in_any_case() {
        for location in ["Zoom", "ZOOM call", "us02web.zoom.us/j/123", "Meet on zOoM"] {
            assert_eq!(scrub_location(Some(location)), None, "{location} should be scrubbed");
        }
    }

    #[test]
    fn plain_locations_are_kept() {
        assert_eq!(
            scrub_location(Some("Room 4, Building B")),
            Some("Room 4, Building B".to_string())
        );
        assert_eq!(
            scrub_location(Some("see https://example.com")),
            Some("see https://example.com".to_string())
        );
        assert_eq!(scrub_location(Some("   ")), None);
        assert_eq!(scrub_location(None), None);
    }

    #[test]
    fn anonymize_scrubs_payload_location() {
        let (_, payload) = anonymize(&event("a", "Sync", Some("https://zoom.us/j/42")), None);
        assert_eq!(payload.location, None);
    }
}
