//! calmirror configuration.
//!
//! Read from `~/.config/calmirror/config.toml` (optional) and then from the
//! process environment, which wins:
//!
//! ```text
//! PERSONAL_CALENDAR_ID=abc123@group.calendar.google.com
//! WORK_CALENDAR_ID=primary
//! PROJECT_ID=default
//! PAST_DAYS=5
//! FUTURE_DAYS=10
//! FAILURE_POLICY=continue   # or fail-fast
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::date_range::{DEFAULT_FUTURE_DAYS, DEFAULT_PAST_DAYS, SyncWindow};
use crate::error::{MirrorError, MirrorResult};
use crate::reconcile::FailurePolicy;

/// Google's alias for the account's main calendar
pub const DEFAULT_WORK_CALENDAR_ID: &str = "primary";
pub const DEFAULT_PROJECT_ID: &str = "default";
/// Upper bound for `PAST_DAYS` and `FUTURE_DAYS`
pub const MAX_WINDOW_DAYS: i64 = 3650;

fn default_work_calendar_id() -> String {
    DEFAULT_WORK_CALENDAR_ID.to_string()
}

fn default_project_id() -> String {
    DEFAULT_PROJECT_ID.to_string()
}

fn default_past_days() -> i64 {
    DEFAULT_PAST_DAYS
}

fn default_future_days() -> i64 {
    DEFAULT_FUTURE_DAYS
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MirrorConfig {
    /// Calendar to read from
    #[serde(default = "default_work_calendar_id")]
    pub work_calendar_id: String,

    /// Calendar to mirror into
    pub personal_calendar_id: String,

    /// Namespace of the credential store
    #[serde(default = "default_project_id")]
    pub project_id: String,

    #[serde(default = "default_past_days")]
    pub past_days: i64,

    #[serde(default = "default_future_days")]
    pub future_days: i64,

    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl MirrorConfig {
    /// Config for mirroring into `personal_calendar_id` with every default.
    pub fn new(personal_calendar_id: impl Into<String>) -> Self {
        MirrorConfig {
            work_calendar_id: default_work_calendar_id(),
            personal_calendar_id: personal_calendar_id.into(),
            project_id: default_project_id(),
            past_days: DEFAULT_PAST_DAYS,
            future_days: DEFAULT_FUTURE_DAYS,
            failure_policy: FailurePolicy::default(),
        }
    }

    pub fn config_dir() -> MirrorResult<PathBuf> {
        Ok(dirs::config_dir()
            .ok_or_else(|| MirrorError::Config("Could not determine config directory".into()))?
            .join("calmirror"))
    }

    pub fn config_path() -> MirrorResult<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load from the config file and the process environment.
    pub fn load() -> MirrorResult<Self> {
        Self::load_from(&Self::config_path()?, None)
    }

    /// Load from `path` (which may not exist) and from `env`, or from the
    /// process environment when `env` is `None`.
    pub fn load_from(path: &Path, env: Option<HashMap<String, String>>) -> MirrorResult<Self> {
        let config: MirrorConfig = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::default().try_parsing(true).source(env))
            .build()
            .map_err(|e| MirrorError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| match e {
                config::ConfigError::NotFound(_) => missing_calendar_error(),
                other if other.to_string().contains("personal_calendar_id") => {
                    missing_calendar_error()
                }
                other => MirrorError::Config(other.to_string()),
            })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> MirrorResult<()> {
        if self.personal_calendar_id.trim().is_empty() {
            return Err(missing_calendar_error());
        }

        if self.personal_calendar_id == self.work_calendar_id {
            return Err(MirrorError::Config(format!(
                "Work and personal calendar are both '{}'; refusing to mirror a calendar into itself",
                self.work_calendar_id
            )));
        }

        if !(0..=MAX_WINDOW_DAYS).contains(&self.past_days)
            || !(1..=MAX_WINDOW_DAYS).contains(&self.future_days)
        {
            return Err(MirrorError::Config(format!(
                "Invalid sync window: PAST_DAYS={} FUTURE_DAYS={} \
                (need 0 <= PAST_DAYS <= {max} and 0 < FUTURE_DAYS <= {max})",
                self.past_days,
                self.future_days,
                max = MAX_WINDOW_DAYS
            )));
        }

        Ok(())
    }

    /// Sync window as of now.
    pub fn window(&self) -> SyncWindow {
        SyncWindow::current(self.past_days, self.future_days)
    }
}

fn missing_calendar_error() -> MirrorError {
    MirrorError::Config(
        "No personal calendar configured.\n\n\
        Set PERSONAL_CALENDAR_ID to the id of the calendar to mirror into, e.g.\n  \
        PERSONAL_CALENDAR_ID=abc123@group.calendar.google.com calmirror"
            .into(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn missing_file() -> PathBuf {
        tempfile::tempdir().unwrap().path().join("config.toml")
    }

    #[test]
    fn defaults_from_environment() {
        let config =
            MirrorConfig::load_from(&missing_file(), env(&[("PERSONAL_CALENDAR_ID", "mirror@group")]))
                .unwrap();

        assert_eq!(config, MirrorConfig::new("mirror@group"));
        assert_eq!(config.work_calendar_id, "primary");
        assert_eq!(config.past_days, 5);
        assert_eq!(config.future_days, 10);
        assert_eq!(config.failure_policy, FailurePolicy::Continue);
    }

    #[test]
    fn environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "personal_calendar_id = \"from-file\"\nwork_calendar_id = \"work@corp\"\nfuture_days = 14\n",
        )
        .unwrap();

        let config = MirrorConfig::load_from(
            &path,
            env(&[
                ("PERSONAL_CALENDAR_ID", "from-env"),
                ("PAST_DAYS", "2"),
                ("FAILURE_POLICY", "fail-fast"),
            ]),
        )
        .unwrap();

        assert_eq!(config.personal_calendar_id, "from-env");
        assert_eq!(config.work_calendar_id, "work@corp");
        assert_eq!(config.past_days, 2);
        assert_eq!(config.future_days, 14);
        assert_eq!(config.failure_policy, FailurePolicy::FailFast);
    }

    #[test]
    fn missing_personal_calendar_is_an_error() {
        let err = MirrorConfig::load_from(&missing_file(), env(&[])).unwrap_err();
        assert!(err.to_string().contains("PERSONAL_CALENDAR_ID"));
    }

    #[test]
    fn mirroring_into_itself_is_rejected() {
        let mut config = MirrorConfig::new("primary");
        assert!(config.validate().is_err());

        config.personal_calendar_id = "other".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn negative_window_is_rejected() {
        let mut config = MirrorConfig::new("mirror");
        config.past_days = -1;
        assert!(config.validate().is_err());

        config.past_days = 0;
        config.future_days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn oversized_window_is_rejected() {
        let mut config = MirrorConfig::new("mirror");
        config.past_days = 100_000_000_000;
        assert!(matches!(config.validate(), Err(MirrorError::Config(_))));

        config.past_days = MAX_WINDOW_DAYS;
        config.future_days = MAX_WINDOW_DAYS;
        assert!(config.validate().is_ok());
        let window = config.window();
        assert!(window.from < window.to);

        config.future_days = MAX_WINDOW_DAYS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn oversized_window_from_environment_fails_to_load() {
        let err = MirrorConfig::load_from(
            &missing_file(),
            env(&[("PERSONAL_CALENDAR_ID", "mirror@group"), ("FUTURE_DAYS", "99999999999")]),
        )
        .unwrap_err();

        assert!(err.to_string().contains("FUTURE_DAYS=99999999999"));
    }
}
