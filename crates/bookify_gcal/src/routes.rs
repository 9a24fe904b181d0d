// --- File: crates/bookify_gcal/src/routes.rs ---

use crate::auth::create_https_client;
use crate::handlers::{book_slot_handler, get_availability_handler, GcalState};
use crate::logic::{GcalError, SchedulingSettings};
use crate::service::GoogleCalendarService;
use axum::{
    routing::{get, post},
    Router,
};
use bookify_config::{AppConfig, GcalConfig};
use std::sync::Arc;
use tracing::info;

/// Creates the router for the Google Calendar feature, backed by the real
/// Google Calendar API.
///
/// Fails when the `gcal` section holds an invalid schedule (unknown zone,
/// inverted hours) or the HTTPS client cannot be built.
pub fn routes(config: Arc<AppConfig>) -> Result<Router, GcalError> {
    let settings = match config.gcal.as_ref() {
        Some(gcal_config) => SchedulingSettings::from_config(gcal_config)?,
        None => SchedulingSettings::from_config(&GcalConfig::default())?,
    };
    let client = create_https_client()?;
    info!(
        "GCal routes ready for calendar {} in {}",
        settings.calendar_id, settings.time_zone
    );

    let gcal_state = Arc::new(GcalState {
        config,
        settings,
        calendar_service: Arc::new(GoogleCalendarService::new(client)),
    });
    Ok(router(gcal_state))
}

/// Routes over an already assembled state; tests plug a mock service in here.
pub fn router(gcal_state: Arc<GcalState>) -> Router {
    Router::new()
        .route("/availability", get(get_availability_handler))
        .route("/booking", post(book_slot_handler))
        .with_state(gcal_state)
}
