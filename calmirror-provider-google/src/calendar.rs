//! Google Calendar implementation of the calendar access traits.

use calmirror_core::date_range::SyncWindow;
use calmirror_core::error::{MirrorError, MirrorResult};
use calmirror_core::event::RawEvent;
use calmirror_core::remote::{CalendarMutator, CalendarReader, NewEvent};
use google_calendar::Client;
use google_calendar::types::{OrderBy, SendUpdates};

use crate::google_event::{FromGoogle, ToGoogle};
use crate::session::{CalendarRole, Session};

/// One authenticated Google account, scoped to a calendar role.
pub struct GoogleCalendar {
    role: CalendarRole,
    client: Client,
}

impl GoogleCalendar {
    /// Load (and refresh if needed) the stored session for `role`.
    pub async fn connect(project_id: &str, role: CalendarRole) -> MirrorResult<Self> {
        let session = Session::load_valid(project_id, role)
            .await
            .map_err(|e| MirrorError::Credential(format!("{:#}", e)))?;

        Ok(GoogleCalendar {
            role,
            client: session.client(),
        })
    }
}

impl CalendarReader for GoogleCalendar {
    async fn list_events(
        &self,
        calendar_id: &str,
        window: &SyncWindow,
    ) -> MirrorResult<Vec<RawEvent>> {
        let fetch_error = |message: String| MirrorError::Fetch {
            calendar: calendar_id.to_string(),
            message,
        };

        // Recurring events are expanded into single instances by the API
        let response = self
            .client
            .events()
            .list_all(
                calendar_id,
                "",
                0,
                OrderBy::StartTime,
                &[],
                "", // search query
                &[],
                false, // show deleted
                false, // show hidden invitations
                true,  // single events
                &window.to_rfc3339(),
                &window.from_rfc3339(),
                "",
                "",
            )
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let events = response
            .body
            .into_iter()
            .filter(|e| e.status != "cancelled")
            .map(RawEvent::from_google)
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(|e| fetch_error(format!("{:#}", e)))?;

        tracing::debug!(
            role = self.role.name(),
            calendar = calendar_id,
            count = events.len(),
            "Listed Google events"
        );

        Ok(events)
    }
}

impl CalendarMutator for GoogleCalendar {
    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> MirrorResult<()> {
        let result = self
            .client
            .events()
            .delete(calendar_id, event_id, false, SendUpdates::None)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                let error_str = e.to_string();
                // Already gone counts as deleted
                if error_str.contains("410") || error_str.contains("Gone") {
                    tracing::debug!(event_id, "Event already deleted");
                    Ok(())
                } else {
                    Err(MirrorError::Provider(error_str))
                }
            }
        }
    }

    async fn create_event(&self, calendar_id: &str, event: &NewEvent) -> MirrorResult<RawEvent> {
        let google_event = event.to_google();

        let response = self
            .client
            .events()
            .insert(
                calendar_id,
                0,
                0,
                false,
                SendUpdates::None,
                false,
                &google_event,
            )
            .await
            .map_err(|e| MirrorError::Provider(e.to_string()))?;

        RawEvent::from_google(response.body)
            .map_err(|e| MirrorError::Provider(format!("{:#}", e)))
    }
}
