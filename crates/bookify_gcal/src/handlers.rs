// File: crates/bookify_gcal/src/handlers.rs
use crate::auth::SessionCredential;
use crate::logic::{
    get_available_time_slots, parse_query_date, submit_booking, AvailabilityQuery,
    AvailabilityResponse, BookingFormData, BookingResponse, DynCalendarService, GcalError,
    SchedulingSettings,
};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    response::Json,
};
use bookify_common::{
    config_error, external_service_error, is_gcal_enabled, log_error, map_json_error,
    missing_field, validation_error, BookifyError,
};
use bookify_config::AppConfig;
use std::sync::Arc;
use tracing::info;

// Define shared state needed by GCal handlers
#[derive(Clone)]
pub struct GcalState {
    pub config: Arc<AppConfig>,
    pub settings: SchedulingSettings,
    pub calendar_service: Arc<DynCalendarService>,
}

fn ensure_enabled(state: &GcalState) -> Result<(), BookifyError> {
    if is_gcal_enabled(&state.config) {
        Ok(())
    } else {
        Err(BookifyError::ServiceDisabled(
            "Calendar service is disabled.".to_string(),
        ))
    }
}

/// Maps a domain error to the HTTP taxonomy. Provider failures are logged
/// and replaced by `upstream_message`.
fn to_http_error(err: GcalError, upstream_message: &str) -> BookifyError {
    match err {
        GcalError::MissingField(field) => missing_field(field),
        GcalError::InvalidInput(message) => validation_error(message),
        GcalError::InvalidSchedule(message) => {
            log_error(&message, "Scheduling configuration error");
            config_error(message)
        }
        GcalError::ServiceError(e) => {
            log_error(e, upstream_message);
            external_service_error("gcal", upstream_message)
        }
    }
}

/// Handler to get the day's time slots.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Slots of the business day with availability", body = AvailabilityResponse),
        (status = 400, description = "Missing or malformed date"),
        (status = 401, description = "No session credential"),
        (status = 500, description = "Calendar provider error")
    ),
    security(("bearer" = [])),
    tag = "GCal"
))]
pub async fn get_availability_handler(
    State(state): State<Arc<GcalState>>,
    credential: SessionCredential,
    query: Result<Query<AvailabilityQuery>, QueryRejection>,
) -> Result<Json<AvailabilityResponse>, BookifyError> {
    ensure_enabled(&state)?;

    let Query(query) = query.map_err(|rejection| BookifyError::ParseError(rejection.body_text()))?;

    let date = query
        .date
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| missing_field("date"))?;
    let date = parse_query_date(date).map_err(|e| to_http_error(e, "Invalid date"))?;
    info!("Availability requested for {}", date);

    let result = get_available_time_slots(
        state.calendar_service.as_ref(),
        credential.access_token(),
        date,
        &state.settings,
    )
    .await
    .map(|time_slots| AvailabilityResponse { time_slots });

    map_json_error(result, |e| to_http_error(e, "Failed to fetch availability"))
}

/// Handler to book a time slot.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/booking",
    request_body = BookingFormData,
    responses(
        (status = 200, description = "Event created", body = BookingResponse),
        (status = 400, description = "Missing or malformed field"),
        (status = 401, description = "No session credential"),
        (status = 500, description = "Calendar provider error")
    ),
    security(("bearer" = [])),
    tag = "GCal"
))]
pub async fn book_slot_handler(
    State(state): State<Arc<GcalState>>,
    credential: SessionCredential,
    payload: Result<Json<BookingFormData>, JsonRejection>,
) -> Result<Json<BookingResponse>, BookifyError> {
    ensure_enabled(&state)?;

    let Json(form) = payload.map_err(|rejection| BookifyError::ParseError(rejection.body_text()))?;

    let result = submit_booking(
        state.calendar_service.as_ref(),
        credential.access_token(),
        &state.settings,
        &form,
    )
    .await
    .map(|event| {
        info!("Successfully created event: {:?}", event.id);
        BookingResponse {
            success: true,
            event,
        }
    });

    map_json_error(result, |e| to_http_error(e, "Failed to create booking"))
}
