// --- File: crates/bookify_common/src/services.rs ---
//! Service abstractions for external services.
//!
//! Handlers and slot logic only talk to the remote calendar through
//! [`CalendarService`], so they can be exercised against an in-memory
//! implementation without network access.

use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Read/write capability over the owner's calendar.
///
/// Every call carries the caller's OAuth access token explicitly; an
/// implementation must not cache it between calls.
pub trait CalendarService: Send + Sync {
    /// Error type returned by calendar service operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Busy intervals of `calendar_id` that intersect `[start_time, end_time)`,
    /// sorted by start.
    fn list_busy_intervals(
        &self,
        access_token: &str,
        calendar_id: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<BusyInterval>, Self::Error>;

    /// Create an event and return what the provider stored.
    fn create_event(
        &self,
        access_token: &str,
        calendar_id: &str,
        event: EventDescriptor,
    ) -> BoxFuture<'_, CalendarEvent, Self::Error>;
}

/// A time range occupied by an existing calendar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BusyInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }
}

/// An event to be created on the remote calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDescriptor {
    pub summary: String,
    pub description: String,
    /// Start instant, carrying the zone the event is booked in.
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    /// Attendee email addresses.
    pub attendees: Vec<String>,
    /// Use the calendar's default reminders.
    pub use_default_reminders: bool,
    /// Ask the provider to email every attendee.
    pub notify_attendees: bool,
}

impl EventDescriptor {
    /// IANA name of the zone the event is booked in.
    pub fn time_zone(&self) -> &'static str {
        self.start.timezone().name()
    }
}

/// Provider-assigned view of a created event.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: Option<String>,
    pub status: Option<String>,
    pub html_link: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
    #[serde(default)]
    pub attendees: Vec<EventAttendee>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    #[cfg_attr(
        feature = "openapi",
        schema(value_type = Option<String>, example = "2024-06-10T10:00:00-04:00")
    )]
    pub date_time: Option<DateTime<FixedOffset>>,
    pub time_zone: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAttendee {
    pub email: Option<String>,
    pub display_name: Option<String>,
}
