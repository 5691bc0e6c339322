//! Error types for calmirror.

use thiserror::Error;

use crate::diff::DiffKind;

/// Errors that can occur while mirroring a calendar.
#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to fetch events from calendar '{calendar}': {message}")]
    Fetch { calendar: String, message: String },

    /// A create or delete failed and the run stopped. `deleted` and `created`
    /// count what was already applied before the failure.
    #[error(
        "Failed to {} event '{id}': {message} (stopped after {deleted} deleted, {created} created)",
        .kind.verb()
    )]
    Mutation {
        kind: DiffKind,
        id: String,
        message: String,
        deleted: usize,
        created: usize,
    },

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Provider error: {0}")]
    Provider(String),
}

/// Result type alias for calmirror operations.
pub type MirrorResult<T> = Result<T, MirrorError>;
