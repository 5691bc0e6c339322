//! Creates a valid Google session (access token) per calendar role.
//!
//! Sessions live at:
//!   ~/.config/calmirror/{project_id}/{role}_calendar_token.toml
//!
//! Obtaining the first token is an interactive OAuth flow and is not done
//! here. An expired session is refreshed and written back.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use google_calendar::{AccessToken, Client};
use serde::{Deserialize, Serialize};

use crate::app_config::{AppConfig, base_dir};

const EVENTS_SCOPE: &str = "https://www.googleapis.com/auth/calendar.events";
const EVENTS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/calendar.events.readonly";
const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";
const CALENDAR_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";

/// Which side of the mirror a session is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarRole {
    /// Read-only access to the calendar being mirrored
    Work,
    /// Read-write access to the calendar receiving the mirror
    Personal,
}

impl CalendarRole {
    pub fn name(&self) -> &'static str {
        match self {
            CalendarRole::Work => "work",
            CalendarRole::Personal => "personal",
        }
    }

    /// Scope a freshly authorized token for this role should request.
    pub fn scope(&self) -> &'static str {
        match self {
            CalendarRole::Work => EVENTS_READONLY_SCOPE,
            CalendarRole::Personal => EVENTS_SCOPE,
        }
    }

    fn accepts_scope(&self, scope: &str) -> bool {
        match self {
            CalendarRole::Work => [
                EVENTS_READONLY_SCOPE,
                EVENTS_SCOPE,
                CALENDAR_READONLY_SCOPE,
                CALENDAR_SCOPE,
            ]
            .contains(&scope),
            CalendarRole::Personal => [EVENTS_SCOPE, CALENDAR_SCOPE].contains(&scope),
        }
    }
}

impl fmt::Display for CalendarRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub struct Session {
    role: CalendarRole,
    path: PathBuf,
    app: AppConfig,
    data: SessionData,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionData {
    access_token: String,
    refresh_token: String,
    expires_at: DateTime<Utc>,
    /// Scopes granted to the token; empty when unknown
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    scopes: Vec<String>,
}

impl SessionData {
    pub fn new(access_token: String, refresh_token: String, expires_at: DateTime<Utc>) -> Self {
        SessionData {
            access_token,
            refresh_token,
            expires_at,
            scopes: Vec::new(),
        }
    }

    fn refreshed(&self, tokens: &AccessToken) -> Self {
        // Google typically doesn't return a new refresh_token on refresh
        let refresh_token = if tokens.refresh_token.is_empty() {
            self.refresh_token.clone()
        } else {
            tokens.refresh_token.clone()
        };

        SessionData {
            access_token: tokens.access_token.clone(),
            refresh_token,
            expires_at: Utc::now() + Duration::seconds(tokens.expires_in),
            scopes: self.scopes.clone(),
        }
    }
}

impl Session {
    pub fn path_for(project_id: &str, role: CalendarRole) -> Result<PathBuf> {
        let project_slug = project_id.replace(['/', '\\', ':'], "_");

        Ok(base_dir()?
            .join(project_slug)
            .join(format!("{}_calendar_token.toml", role.name())))
    }

    /// Load the session for `role`, refreshing it if expired.
    pub async fn load_valid(project_id: &str, role: CalendarRole) -> Result<Self> {
        let app = AppConfig::load()?;
        let path = Self::path_for(project_id, role)?;
        let mut session = Self::load(&path, role, app)?;

        if session.is_expired() {
            session.refresh().await.with_context(|| {
                format!(
                    "Unable to refresh the {} calendar token; replace {} with a valid token",
                    role,
                    path.display()
                )
            })?;
            tracing::info!(role = role.name(), "Refreshed Google access token");
        }

        Ok(session)
    }

    pub fn load(path: &Path, role: CalendarRole, app: AppConfig) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Google OAuth session for the {} calendar not found at {}.\n\
                Authorize with scope {} and save the tokens there.",
                role,
                path.display(),
                role.scope()
            );
        }

        let contents = std::fs::read_to_string(path).with_context(|| {
            format!("Failed to read Google OAuth session from {}", path.display())
        })?;

        let data: SessionData = toml::from_str(&contents).with_context(|| {
            format!("Failed to parse Google OAuth session from {}", path.display())
        })?;

        let session = Session {
            role,
            path: path.to_path_buf(),
            app,
            data,
        };
        session.check_scopes()?;

        Ok(session)
    }

    pub fn save(&self) -> Result<()> {
        let contents = toml::to_string_pretty(&self.data).context("Failed to serialize session")?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write session to {}", self.path.display()))?;

        // Set to owner-only (0600) since file contains OAuth tokens:
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to set permissions on {}", self.path.display()))?;
        }

        Ok(())
    }

    pub fn client(&self) -> Client {
        Client::new(
            self.app.client_id.clone(),
            self.app.client_secret.clone(),
            String::new(),
            self.data.access_token.clone(),
            self.data.refresh_token.clone(),
        )
    }

    fn is_expired(&self) -> bool {
        Utc::now() >= self.data.expires_at
    }

    fn check_scopes(&self) -> Result<()> {
        if self.data.scopes.is_empty() || self.data.scopes.iter().any(|s| self.role.accepts_scope(s)) {
            return Ok(());
        }

        anyhow::bail!(
            "The {} calendar token at {} was granted {:?}, which does not include {}",
            self.role,
            self.path.display(),
            self.data.scopes,
            self.role.scope()
        );
    }

    async fn refresh(&mut self) -> Result<()> {
        let tokens = self
            .client()
            .refresh_access_token()
            .await
            .context("Failed to refresh token")?;

        self.data = self.data.refreshed(&tokens);
        self.save()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> AppConfig {
        AppConfig {
            client_id: "id".into(),
            client_secret: "secret".into(),
        }
    }

    fn write_session(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("work_calendar_token.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("personal_calendar_token.toml");
        let expires_at = Utc::now() + Duration::hours(1);

        let session = Session {
            role: CalendarRole::Personal,
            path: path.clone(),
            app: app(),
            data: SessionData::new("access".into(), "refresh".into(), expires_at),
        };
        session.save().unwrap();

        let loaded = Session::load(&path, CalendarRole::Personal, app()).unwrap();
        assert_eq!(loaded.data, session.data);
        assert!(!loaded.is_expired());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn expired_session_is_detected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_session(
            dir.path(),
            "access_token = \"a\"\nrefresh_token = \"r\"\nexpires_at = \"2020-01-01T00:00:00Z\"\n",
        );

        let session = Session::load(&path, CalendarRole::Work, app()).unwrap();
        assert!(session.is_expired());
    }

    #[test]
    fn missing_session_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("work_calendar_token.toml");

        let err = Session::load(&path, CalendarRole::Work, app()).err().unwrap();
        assert!(err.to_string().contains("work_calendar_token.toml"));
    }

    #[test]
    fn read_only_token_is_rejected_for_personal_calendar() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_session(
            dir.path(),
            &format!(
                "access_token = \"a\"\nrefresh_token = \"r\"\nexpires_at = \"2030-01-01T00:00:00Z\"\nscopes = [\"{}\"]\n",
                EVENTS_READONLY_SCOPE
            ),
        );

        assert!(Session::load(&path, CalendarRole::Personal, app()).is_err());
        assert!(Session::load(&path, CalendarRole::Work, app()).is_ok());
    }

    #[test]
    fn path_is_namespaced_by_project() {
        let path = Session::path_for("my/project", CalendarRole::Personal).unwrap();

        assert!(path.ends_with("my_project/personal_calendar_token.toml"));
    }
}
