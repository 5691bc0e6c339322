//! Applying a [`MirrorDiff`] to the target calendar.

use serde::{Deserialize, Serialize};

use crate::anonymize::AnonymizedPayload;
use crate::diff::{DiffKind, MirrorDiff};
use crate::error::{MirrorError, MirrorResult};
use crate::remote::{CalendarMutator, NewEvent};

/// What to do when a single create or delete fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Log the failure, record it in the report and carry on with the rest
    #[default]
    Continue,
    /// Abort on the first failure
    FailFast,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileFailure {
    pub kind: DiffKind,
    pub payload: AnonymizedPayload,
    pub message: String,
}

/// Outcome of one reconcile run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileReport {
    pub deleted: Vec<AnonymizedPayload>,
    pub created: Vec<AnonymizedPayload>,
    pub failures: Vec<ReconcileFailure>,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct Reconciler<'a, M> {
    mutator: &'a M,
    calendar_id: &'a str,
    policy: FailurePolicy,
}

impl<'a, M: CalendarMutator> Reconciler<'a, M> {
    pub fn new(mutator: &'a M, calendar_id: &'a str, policy: FailurePolicy) -> Self {
        Reconciler {
            mutator,
            calendar_id,
            policy,
        }
    }

    /// Delete everything in `to_delete`, then create everything in `to_create`.
    pub async fn reconcile(&self, diff: &MirrorDiff) -> MirrorResult<ReconcileReport> {
        let mut report = ReconcileReport::default();

        for payload in &diff.to_delete {
            match self.mutator.delete_event(self.calendar_id, &payload.id).await {
                Ok(()) => {
                    tracing::info!(id = %payload.id, title = %payload.title, "Deleted event");
                    report.deleted.push(payload.clone());
                }
                Err(e) => self.record_failure(&mut report, DiffKind::Delete, payload, e)?,
            }
        }

        for payload in &diff.to_create {
            let body = NewEvent::from(payload);

            match self.mutator.create_event(self.calendar_id, &body).await {
                Ok(created) => {
                    tracing::info!(
                        id = %created.id,
                        title = %payload.title,
                        link = created.html_link.as_deref().unwrap_or(""),
                        "Created event"
                    );
                    report.created.push(payload.clone());
                }
                Err(e) => self.record_failure(&mut report, DiffKind::Create, payload, e)?,
            }
        }

        Ok(report)
    }

    fn record_failure(
        &self,
        report: &mut ReconcileReport,
        kind: DiffKind,
        payload: &AnonymizedPayload,
        error: MirrorError,
    ) -> MirrorResult<()> {
        match self.policy {
            FailurePolicy::FailFast => {
                tracing::warn!(
                    deleted = report.deleted.len(),
                    created = report.created.len(),
                    "Stopping after failed {}, personal calendar is partially updated",
                    kind.verb()
                );
                Err(MirrorError::Mutation {
                    kind,
                    id: payload.id.clone(),
                    message: error.to_string(),
                    deleted: report.deleted.len(),
                    created: report.created.len(),
                })
            }
            FailurePolicy::Continue => {
                tracing::warn!(
                    id = %payload.id,
                    title = %payload.title,
                    error = %error,
                    "Failed to {} event, continuing",
                    kind.verb()
                );
                report.failures.push(ReconcileFailure {
                    kind,
                    payload: payload.clone(),
                    message: error.to_string(),
                });
                Ok(())
            }
        }
    }
}
