//! calmirror-provider-google - Google Calendar adapter for calmirror
//!
//! Credentials are user-provided and tokens are stored per project:
//!   ~/.config/calmirror/app_config.toml
//!   ~/.config/calmirror/{project_id}/{role}_calendar_token.toml

mod app_config;
mod calendar;
mod google_event;
mod session;

pub use app_config::AppConfig;
pub use calendar::GoogleCalendar;
pub use session::{CalendarRole, Session};
