// --- File: crates/bookify_gcal/src/logic.rs ---
use crate::service::GcalServiceError;
use bookify_common::services::{BusyInterval, CalendarEvent, CalendarService, EventDescriptor};
use bookify_config::{GcalConfig, DEFAULT_CALENDAR_ID, DEFAULT_EVENT_DESCRIPTION};
use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// A calendar service as the handlers hold it.
pub type DynCalendarService = dyn CalendarService<Error = GcalServiceError>;

// --- Error Handling ---
use thiserror::Error;
#[derive(Error, Debug)]
pub enum GcalError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid schedule configuration: {0}")]
    InvalidSchedule(String),
    #[error("Calendar service error: {0}")]
    ServiceError(#[from] GcalServiceError),
}

// --- Data Structures ---
#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct AvailabilityQuery {
    /// Day to check, YYYY-MM-DD
    #[cfg_attr(feature = "openapi", param(example = "2024-06-10"))]
    pub date: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub time_slots: Vec<TimeSlot>,
}

/// One candidate booking window, wall-clock times in the booking zone.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    #[cfg_attr(feature = "openapi", schema(example = "09:00"))]
    pub start_time: String,
    #[cfg_attr(feature = "openapi", schema(example = "09:30"))]
    pub end_time: String,
    pub available: bool,
}

/// Booking form as posted by the browser. Every field is optional on the
/// wire so that presence is checked here rather than by the JSON decoder.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct BookingFormData {
    pub name: Option<String>,
    pub email: Option<String>,
    /// YYYY-MM-DD, or an RFC 3339 timestamp
    #[cfg_attr(feature = "openapi", schema(example = "2024-06-10"))]
    pub date: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "10:00"))]
    pub start_time: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "10:30"))]
    pub end_time: Option<String>,
    pub notes: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookingResponse {
    pub success: bool,
    pub event: CalendarEvent,
}

/// A booking form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBooking {
    pub name: String,
    pub email: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub notes: Option<String>,
}

// --- Scheduling Settings ---

/// Business-hours window `[start_hour, end_hour)` cut into fixed slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessHours {
    pub start_hour: u32,
    /// Exclusive; 24 means midnight at the end of the day.
    pub end_hour: u32,
    pub slot_duration_minutes: u32,
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            start_hour: 9,
            end_hour: 17,
            slot_duration_minutes: 30,
        }
    }
}

impl BusinessHours {
    pub fn validate(&self) -> Result<(), GcalError> {
        if self.start_hour >= self.end_hour || self.end_hour > 24 {
            return Err(GcalError::InvalidSchedule(format!(
                "business hours {}..{} must satisfy start < end <= 24",
                self.start_hour, self.end_hour
            )));
        }
        if self.slot_duration_minutes == 0 {
            return Err(GcalError::InvalidSchedule(
                "slot duration must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn slot_duration(&self) -> Duration {
        Duration::minutes(i64::from(self.slot_duration_minutes))
    }
}

/// Everything the slot and booking logic needs from configuration.
#[derive(Debug, Clone)]
pub struct SchedulingSettings {
    pub calendar_id: String,
    pub time_zone: Tz,
    pub business_hours: BusinessHours,
    pub default_description: String,
}

impl Default for SchedulingSettings {
    fn default() -> Self {
        Self {
            calendar_id: DEFAULT_CALENDAR_ID.to_string(),
            time_zone: chrono_tz::America::New_York,
            business_hours: BusinessHours::default(),
            default_description: DEFAULT_EVENT_DESCRIPTION.to_string(),
        }
    }
}

impl SchedulingSettings {
    pub fn from_config(config: &GcalConfig) -> Result<Self, GcalError> {
        let time_zone = config.time_zone().parse::<Tz>().map_err(|e| {
            GcalError::InvalidSchedule(format!("unknown time zone {}: {}", config.time_zone(), e))
        })?;
        let business_hours = BusinessHours {
            start_hour: config.work_start_hour(),
            end_hour: config.work_end_hour(),
            slot_duration_minutes: config.slot_duration_minutes(),
        };
        business_hours.validate()?;

        Ok(Self {
            calendar_id: config.calendar_id().to_string(),
            time_zone,
            business_hours,
            default_description: config.default_description().to_string(),
        })
    }
}

// --- Slot Generation ---

/// A generated slot with its instants still attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSlot {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub available: bool,
}

impl CandidateSlot {
    pub fn to_time_slot(&self) -> TimeSlot {
        TimeSlot {
            start_time: self.start.format("%H:%M").to_string(),
            end_time: self.end.format("%H:%M").to_string(),
            available: self.available,
        }
    }
}

/// Resolves a wall-clock time in `tz`. Ambiguous times (DST fall-back) take
/// the earlier instant; times inside a DST gap move forward past the gap.
pub fn resolve_local(tz: Tz, local: NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(instant) => Some(instant),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => tz.from_local_datetime(&(local + Duration::hours(1))).earliest(),
    }
}

/// Opening and closing instants of the business day `date`.
pub fn business_window(
    date: NaiveDate,
    hours: &BusinessHours,
    tz: Tz,
) -> Result<(DateTime<Tz>, DateTime<Tz>), GcalError> {
    hours.validate()?;

    let local_at = |hour: u32| -> Option<NaiveDateTime> {
        if hour == 24 {
            date.succ_opt()?.and_hms_opt(0, 0, 0)
        } else {
            date.and_hms_opt(hour, 0, 0)
        }
    };
    let resolve = |hour: u32| {
        local_at(hour)
            .and_then(|local| resolve_local(tz, local))
            .ok_or_else(|| {
                GcalError::InvalidSchedule(format!("{:02}:00 on {} does not exist in {}", hour, date, tz))
            })
    };

    Ok((resolve(hours.start_hour)?, resolve(hours.end_hour)?))
}

/// Cuts the business day into contiguous slots of the configured duration.
///
/// A slot is emitted only when it ends at or before closing time; there is
/// never a truncated trailing slot. Every slot starts out available.
pub fn generate_slots(
    date: NaiveDate,
    hours: &BusinessHours,
    tz: Tz,
) -> Result<Vec<CandidateSlot>, GcalError> {
    let (open, close) = business_window(date, hours, tz)?;
    let step = hours.slot_duration();

    let mut slots = Vec::new();
    let mut cursor = open;
    while cursor < close {
        let slot_end = cursor + step;
        if slot_end > close {
            break;
        }
        slots.push(CandidateSlot {
            start: cursor,
            end: slot_end,
            available: true,
        });
        cursor = slot_end;
    }

    debug!(
        "Generated {} slots for {} ({} - {})",
        slots.len(),
        date,
        open,
        close
    );
    Ok(slots)
}

// --- Availability Filter ---

/// Half-open intervals `[s1, e1)` and `[s2, e2)` intersect.
///
/// Covers partial overlap on either side and containment in both
/// directions; intervals that only touch at an endpoint do not intersect.
pub fn intervals_overlap(
    s1: DateTime<Utc>,
    e1: DateTime<Utc>,
    s2: DateTime<Utc>,
    e2: DateTime<Utc>,
) -> bool {
    s1 < e2 && s2 < e1
}

/// Sets `available` on every slot: false if it intersects any busy interval.
pub fn mark_unavailable(slots: &mut [CandidateSlot], busy: &[BusyInterval]) {
    for slot in slots.iter_mut() {
        let start = slot.start.with_timezone(&Utc);
        let end = slot.end.with_timezone(&Utc);
        slot.available = !busy
            .iter()
            .any(|interval| intervals_overlap(start, end, interval.start, interval.end));
    }
}

/// Generates the day's slots and filters them against `busy`.
pub fn compute_time_slots(
    date: NaiveDate,
    settings: &SchedulingSettings,
    busy: &[BusyInterval],
) -> Result<Vec<TimeSlot>, GcalError> {
    let mut slots = generate_slots(date, &settings.business_hours, settings.time_zone)?;
    mark_unavailable(&mut slots, busy);
    Ok(slots.iter().map(CandidateSlot::to_time_slot).collect())
}

/// Parses the `date` query parameter (YYYY-MM-DD).
pub fn parse_query_date(value: &str) -> Result<NaiveDate, GcalError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| GcalError::InvalidInput("Invalid date format (YYYY-MM-DD)".to_string()))
}

/// Fetches the day's busy intervals and returns its slots.
///
/// A failed fetch fails the whole day; there are no partial results.
pub async fn get_available_time_slots(
    calendar_service: &DynCalendarService,
    access_token: &str,
    date: NaiveDate,
    settings: &SchedulingSettings,
) -> Result<Vec<TimeSlot>, GcalError> {
    let (open, close) = business_window(date, &settings.business_hours, settings.time_zone)?;

    let busy = calendar_service
        .list_busy_intervals(
            access_token,
            &settings.calendar_id,
            open.with_timezone(&Utc),
            close.with_timezone(&Utc),
        )
        .await?;

    compute_time_slots(date, settings, &busy)
}

// --- Booking Logic ---

fn required(value: &Option<String>, field: &'static str) -> Result<String, GcalError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(GcalError::MissingField(field))
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp, the latter read as a
/// calendar day in `tz`.
pub fn parse_booking_date(value: &str, tz: Tz) -> Result<NaiveDate, GcalError> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|instant| instant.with_timezone(&tz).date_naive())
        .map_err(|_| GcalError::InvalidInput("Invalid date format (YYYY-MM-DD)".to_string()))
}

fn parse_wall_clock(value: &str, field: &str) -> Result<NaiveTime, GcalError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| GcalError::InvalidInput(format!("Invalid {} format (HH:MM)", field)))
}

/// Checks presence of the required fields, in form order, then their shape.
pub fn validate_booking(form: &BookingFormData, tz: Tz) -> Result<ValidatedBooking, GcalError> {
    let name = required(&form.name, "name")?;
    let email = required(&form.email, "email")?;
    let date = required(&form.date, "date")?;
    let start_time = required(&form.start_time, "startTime")?;
    let end_time = required(&form.end_time, "endTime")?;

    let date = parse_booking_date(&date, tz)?;
    let start_time = parse_wall_clock(&start_time, "startTime")?;
    let end_time = parse_wall_clock(&end_time, "endTime")?;
    if end_time <= start_time {
        return Err(GcalError::InvalidInput(
            "endTime must be after startTime".to_string(),
        ));
    }

    let notes = form
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string);

    Ok(ValidatedBooking {
        name,
        email,
        date,
        start_time,
        end_time,
        notes,
    })
}

/// Builds the event for a validated booking in the configured zone.
pub fn build_event_descriptor(
    booking: &ValidatedBooking,
    settings: &SchedulingSettings,
) -> Result<EventDescriptor, GcalError> {
    let tz = settings.time_zone;
    let at = |time: NaiveTime| {
        resolve_local(tz, booking.date.and_time(time)).ok_or_else(|| {
            GcalError::InvalidInput(format!("{} on {} does not exist in {}", time, booking.date, tz))
        })
    };

    let start = at(booking.start_time)?;
    let end = at(booking.end_time)?;
    // a start inside a DST gap is moved forward and can land past the end
    if end <= start {
        return Err(GcalError::InvalidInput(format!(
            "{}-{} on {} is not a valid range in {}",
            booking.start_time.format("%H:%M"),
            booking.end_time.format("%H:%M"),
            booking.date,
            tz
        )));
    }

    Ok(EventDescriptor {
        summary: format!("Meeting with {}", booking.name),
        description: booking
            .notes
            .clone()
            .unwrap_or_else(|| settings.default_description.clone()),
        start,
        end,
        attendees: vec![booking.email.clone()],
        use_default_reminders: true,
        notify_attendees: true,
    })
}

/// Validates the form and creates the event. Nothing is retried.
pub async fn submit_booking(
    calendar_service: &DynCalendarService,
    access_token: &str,
    settings: &SchedulingSettings,
    form: &BookingFormData,
) -> Result<CalendarEvent, GcalError> {
    let booking = validate_booking(form, settings.time_zone)?;
    let descriptor = build_event_descriptor(&booking, settings)?;

    info!(
        "Booking {} {}-{} on {}",
        booking.date, booking.start_time, booking.end_time, settings.calendar_id
    );

    let event = calendar_service
        .create_event(access_token, &settings.calendar_id, descriptor)
        .await?;
    Ok(event)
}
