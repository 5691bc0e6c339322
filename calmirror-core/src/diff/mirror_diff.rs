use serde::{Deserialize, Serialize};

use crate::anonymize::AnonymizedPayload;
use crate::index::FingerprintIndex;

/// Events to create in and delete from the target calendar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MirrorDiff {
    pub to_create: Vec<AnonymizedPayload>,
    pub to_delete: Vec<AnonymizedPayload>,
}

impl MirrorDiff {
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_delete.is_empty()
    }

    /// (created, deleted)
    pub fn counts(&self) -> (usize, usize) {
        (self.to_create.len(), self.to_delete.len())
    }
}

/// Compare `source` (what the target should contain) with `target` (what it
/// contains now).
///
/// Payloads only in `source` are returned in source order as `to_create`;
/// payloads only in `target` are returned in target order as `to_delete`.
pub fn diff(source: &FingerprintIndex, target: &FingerprintIndex) -> MirrorDiff {
    let to_create = source
        .iter()
        .filter(|(fingerprint, _)| !target.contains(fingerprint))
        .map(|(_, payload)| payload.clone())
        .collect();

    let to_delete = target
        .iter()
        .filter(|(fingerprint, _)| !source.contains(fingerprint))
        .map(|(_, payload)| payload.clone())
        .collect();

    MirrorDiff {
        to_create,
        to_delete,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventDateTime, EventType, RawEvent};
    use crate::index::build_personal_index;
    use chrono::{TimeZone, Utc};

    fn event(id: &str, title: &str, hour: u32) -> RawEvent {
        RawEvent {
            id: id.to_string(),
            start: EventDateTime::timed(Utc.with_ymd_and_hms(2025, 6, 2, hour, 0, 0).unwrap(), None),
            end: EventDateTime::timed(
                Utc.with_ymd_and_hms(2025, 6, 2, hour, 30, 0).unwrap(),
                None,
            ),
            summary: title.to_string(),
            location: None,
            attendees: None,
            event_type: EventType::Default,
            html_link: None,
        }
    }

    fn ids(payloads: &[AnonymizedPayload]) -> Vec<&str> {
        payloads.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn identical_indices_have_no_changes() {
        let index = build_personal_index(&[event("a", "Work Event", 9), event("b", "1:1 Meeting", 10)]);

        let result = diff(&index, &index);
        assert!(result.is_empty());
        assert_eq!(result.counts(), (0, 0));
    }

    #[test]
    fn empty_indices_have_no_changes() {
        assert!(diff(&FingerprintIndex::new(), &FingerprintIndex::new()).is_empty());
    }

    #[test]
    fn same_content_with_different_ids_matches() {
        let source = build_personal_index(&[event("work-1", "Work Event", 9)]);
        let target = build_personal_index(&[event("mirror-7", "Work Event", 9)]);

        assert!(diff(&source, &target).is_empty());
    }

    #[test]
    fn additions_and_removals_keep_order() {
        let source = build_personal_index(&[
            event("s1", "Work Event", 9),
            event("shared-src", "Focus Time", 10),
            event("s2", "1:1 Meeting", 11),
        ]);
        let target = build_personal_index(&[
            event("t1", "Work Event", 8),
            event("shared-tgt", "Focus Time", 10),
            event("t2", "Meeting with 3 people", 12),
        ]);

        let result = diff(&source, &target);

        assert_eq!(ids(&result.to_create), vec!["s1", "s2"]);
        assert_eq!(ids(&result.to_delete), vec!["t1", "t2"]);
    }

    #[test]
    fn changed_event_is_delete_plus_create() {
        let source = build_personal_index(&[event("w", "Work Event", 10)]);
        let target = build_personal_index(&[event("p", "Work Event", 9)]);

        let result = diff(&source, &target);
        assert_eq!(result.counts(), (1, 1));
        assert_eq!(result.to_create[0].id, "w");
        assert_eq!(result.to_delete[0].id, "p");
    }

    #[test]
    fn diff_is_antisymmetric() {
        let a = build_personal_index(&[
            event("a1", "Work Event", 9),
            event("a2", "1:1 Meeting", 10),
            event("ab", "Focus Time", 14),
        ]);
        let b = build_personal_index(&[
            event("b1", "Work Event", 11),
            event("ab", "Focus Time", 14),
        ]);

        let forward = diff(&a, &b);
        let backward = diff(&b, &a);

        assert_eq!(forward.to_create, backward.to_delete);
        assert_eq!(forward.to_delete, backward.to_create);
    }
}
