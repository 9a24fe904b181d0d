// --- File: crates/bookify_config/src/models.rs ---

use serde::{Deserialize, Serialize};

pub const DEFAULT_CALENDAR_ID: &str = "primary";
pub const DEFAULT_TIME_ZONE: &str = "America/New_York";
pub const DEFAULT_WORK_START_HOUR: u32 = 9;
pub const DEFAULT_WORK_END_HOUR: u32 = 17;
pub const DEFAULT_SLOT_DURATION_MINUTES: u32 = 30;
pub const DEFAULT_EVENT_DESCRIPTION: &str = "Calendar booking via our scheduling app";

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the booking page and its assets.
    #[serde(default)]
    pub static_dir: Option<String>,
    /// Identity-provider page that signs the visitor in and redirects back
    /// to `/#access_token=...`. Unset disables `/auth/sign-in`.
    #[serde(default)]
    pub sign_in_url: Option<String>,
}

// --- Google Calendar Config ---
// Every field is optional; the accessors below fill in the defaults.
// The OAuth access token is never part of the config, it arrives per request.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct GcalConfig {
    pub calendar_id: Option<String>,
    /// IANA zone name, e.g. "America/New_York".
    pub time_zone: Option<String>,
    pub work_start_hour: Option<u32>,
    pub work_end_hour: Option<u32>,
    pub slot_duration_minutes: Option<u32>,
    /// Event description used when the visitor leaves no notes.
    pub default_description: Option<String>,
}

impl GcalConfig {
    pub fn calendar_id(&self) -> &str {
        self.calendar_id.as_deref().unwrap_or(DEFAULT_CALENDAR_ID)
    }

    pub fn time_zone(&self) -> &str {
        self.time_zone.as_deref().unwrap_or(DEFAULT_TIME_ZONE)
    }

    pub fn work_start_hour(&self) -> u32 {
        self.work_start_hour.unwrap_or(DEFAULT_WORK_START_HOUR)
    }

    pub fn work_end_hour(&self) -> u32 {
        self.work_end_hour.unwrap_or(DEFAULT_WORK_END_HOUR)
    }

    pub fn slot_duration_minutes(&self) -> u32 {
        self.slot_duration_minutes
            .unwrap_or(DEFAULT_SLOT_DURATION_MINUTES)
    }

    pub fn default_description(&self) -> &str {
        self.default_description
            .as_deref()
            .unwrap_or(DEFAULT_EVENT_DESCRIPTION)
    }
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_gcal: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub gcal: Option<GcalConfig>,
}
