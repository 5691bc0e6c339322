//! Core of calmirror: mirror a work calendar into a personal calendar as
//! anonymized busy blocks.
//!
//! - `anonymize` turns events into content fingerprints and scrubbed payloads
//! - `index` builds fingerprint indices for the work and personal calendars
//! - `diff` computes what to create and delete in the personal calendar
//! - `reconcile` applies that diff through a `remote::CalendarMutator`
//! - `session` ties one sync pass together

pub mod anonymize;
pub mod date_range;
pub mod diff;
pub mod error;
pub mod event;
pub mod index;
pub mod mirror_config;
pub mod reconcile;
pub mod remote;
pub mod session;

pub use anonymize::{AnonymizedPayload, Fingerprint, anonymize};
pub use date_range::SyncWindow;
pub use error::{MirrorError, MirrorResult};
pub use event::{Attendee, EventDateTime, EventType, RawEvent, ResponseStatus};
pub use index::{FingerprintIndex, build_personal_index, build_work_index};
pub use mirror_config::MirrorConfig;
pub use reconcile::{FailurePolicy, ReconcileReport, Reconciler};
pub use session::{SyncPlan, SyncReport, SyncSession};
