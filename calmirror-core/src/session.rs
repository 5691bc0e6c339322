//! One sync pass from the work calendar into the personal calendar.

use crate::date_range::SyncWindow;
use crate::diff::{MirrorDiff, diff};
use crate::error::MirrorResult;
use crate::index::{build_personal_index, build_work_index};
use crate::mirror_config::MirrorConfig;
use crate::reconcile::{ReconcileReport, Reconciler};
use crate::remote::{CalendarMutator, CalendarReader};

/// What a sync pass would do.
#[derive(Debug, Clone)]
pub struct SyncPlan {
    pub window: SyncWindow,
    /// Distinct work events after filtering
    pub work_events: usize,
    /// Distinct events currently in the personal calendar
    pub personal_events: usize,
    pub diff: MirrorDiff,
}

/// What a sync pass did.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub plan: SyncPlan,
    pub reconcile: ReconcileReport,
}

/// Explicit configuration plus access to both calendars.
///
/// `work` only needs read access; `personal` is read and written.
pub struct SyncSession<W, P> {
    config: MirrorConfig,
    work: W,
    personal: P,
}

impl<W, P> SyncSession<W, P>
where
    W: CalendarReader,
    P: CalendarReader + CalendarMutator,
{
    pub fn new(config: MirrorConfig, work: W, personal: P) -> Self {
        SyncSession {
            config,
            work,
            personal,
        }
    }

    pub fn config(&self) -> &MirrorConfig {
        &self.config
    }

    /// Window as of now; recomputed on every call.
    pub fn window(&self) -> SyncWindow {
        self.config.window()
    }

    pub async fn plan(&self) -> MirrorResult<SyncPlan> {
        self.plan_with_window(self.window()).await
    }

    /// Fetch both calendars and diff them. A failed fetch aborts the plan:
    /// an incomplete work calendar would look like mass deletion.
    pub async fn plan_with_window(&self, window: SyncWindow) -> MirrorResult<SyncPlan> {
        tracing::debug!(from = %window.from, to = %window.to, "Sync window");

        let work_events = self
            .work
            .list_events(&self.config.work_calendar_id, &window)
            .await?;
        tracing::info!(count = work_events.len(), "Fetched work events");

        let personal_events = self
            .personal
            .list_events(&self.config.personal_calendar_id, &window)
            .await?;
        tracing::info!(count = personal_events.len(), "Fetched personal events");

        let source = build_work_index(&work_events);
        let target = build_personal_index(&personal_events);
        let mirror_diff = diff(&source, &target);

        let (to_create, to_delete) = mirror_diff.counts();
        tracing::info!(to_create, to_delete, "Computed mirror diff");

        Ok(SyncPlan {
            window,
            work_events: source.len(),
            personal_events: target.len(),
            diff: mirror_diff,
        })
    }

    pub async fn sync(&self) -> MirrorResult<SyncReport> {
        self.sync_with_window(self.window()).await
    }

    pub async fn sync_with_window(&self, window: SyncWindow) -> MirrorResult<SyncReport> {
        let plan = self.plan_with_window(window).await?;

        let reconcile = Reconciler::new(
            &self.personal,
            &self.config.personal_calendar_id,
            self.config.failure_policy,
        )
        .reconcile(&plan.diff)
        .await?;

        Ok(SyncReport { plan, reconcile })
    }
}
