// --- File: crates/bookify_gcal/src/service.rs ---
//! Google Calendar service implementation.
//!
//! This module provides an implementation of the CalendarService trait for
//! Google Calendar v3, plus an in-memory implementation for tests.

use bookify_common::services::{
    BoxFuture, BusyInterval, CalendarEvent, CalendarService, EventAttendee, EventDescriptor,
    EventTime,
};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use google_calendar3::api::{
    Event, EventAttendee as ApiAttendee, EventDateTime, EventReminders, Events,
};
use google_calendar3::CalendarHub;
use thiserror::Error;
use tracing::{debug, info};

use crate::auth::HttpClient;

/// Errors that can occur when interacting with Google Calendar.
#[derive(Error, Debug)]
pub enum GcalServiceError {
    #[error("Google API Error: {0}")]
    ApiError(#[from] google_calendar3::Error),
    #[error("HTTP client setup failed: {0}")]
    ClientSetup(String),
    #[error("Calendar provider unavailable: {0}")]
    Unavailable(String),
}

/// Google Calendar service implementation.
///
/// Holds only the pooled HTTPS client; a hub authorised with the caller's
/// token is built for every call.
pub struct GoogleCalendarService {
    client: HttpClient,
}

impl GoogleCalendarService {
    /// Create a new Google Calendar service.
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    fn hub(&self, access_token: &str) -> CalendarHub<crate::auth::Connector> {
        CalendarHub::new(self.client.clone(), access_token.to_string())
    }
}

impl CalendarService for GoogleCalendarService {
    type Error = GcalServiceError;

    /// Lists the timed events of `calendar_id` in `[start_time, end_time)`.
    ///
    /// Recurring events are expanded into single instances and results are
    /// ordered by start time. Every page of the listing is read, so a busy
    /// day is never truncated. All-day events have no `dateTime` and are
    /// skipped.
    fn list_busy_intervals(
        &self,
        access_token: &str,
        calendar_id: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<BusyInterval>, Self::Error> {
        let calendar_id = calendar_id.to_string();
        let hub = self.hub(access_token);

        Box::pin(async move {
            let mut busy_intervals = Vec::new();
            let mut page_token: Option<String> = None;

            loop {
                let mut call = hub
                    .events()
                    .list(&calendar_id)
                    .time_min(start_time)
                    .time_max(end_time)
                    .single_events(true)
                    .order_by("startTime");
                if let Some(token) = page_token.as_deref() {
                    call = call.page_token(token);
                }

                let (_response, events) = call.doit().await?;

                page_token = collect_page(&mut busy_intervals, events);
                if page_token.is_none() {
                    break;
                }
            }

            busy_intervals.sort_by_key(|interval| interval.start);
            info!(
                "Fetched {} busy intervals for {} between {} and {}",
                busy_intervals.len(),
                calendar_id,
                start_time,
                end_time
            );
            Ok(busy_intervals)
        })
    }

    /// Inserts the event, asking Google to email every attendee when
    /// `notify_attendees` is set. No retry on failure.
    fn create_event(
        &self,
        access_token: &str,
        calendar_id: &str,
        event: EventDescriptor,
    ) -> BoxFuture<'_, CalendarEvent, Self::Error> {
        let calendar_id = calendar_id.to_string();
        let hub = self.hub(access_token);

        Box::pin(async move {
            let zone = event.start.timezone();
            let send_updates = if event.notify_attendees { "all" } else { "none" };
            let new_event = event_to_api(&event);

            let (_response, created_event) = hub
                .events()
                .insert(new_event, &calendar_id)
                .send_updates(send_updates)
                .doit()
                .await?;

            info!("Created event {:?} on {}", created_event.id, calendar_id);
            Ok(calendar_event_from_api(created_event, zone))
        })
    }
}

/// Appends the busy intervals of one `events.list` page and returns the
/// token of the next page, if any.
pub(crate) fn collect_page(busy_intervals: &mut Vec<BusyInterval>, page: Events) -> Option<String> {
    for event in page.items.unwrap_or_default() {
        match busy_interval_from_event(&event) {
            Some(interval) => busy_intervals.push(interval),
            None => debug!("Skipping event without start/end dateTime: {:?}", event.id),
        }
    }
    page.next_page_token
}

/// Busy interval of a timed event; `None` for all-day or malformed events.
pub(crate) fn busy_interval_from_event(event: &Event) -> Option<BusyInterval> {
    let start = event.start.as_ref()?.date_time?;
    let end = event.end.as_ref()?.date_time?;
    (start < end).then(|| BusyInterval::new(start, end))
}

/// Google API representation of an event descriptor.
pub(crate) fn event_to_api(event: &EventDescriptor) -> Event {
    let time_zone = event.time_zone().to_string();

    Event {
        summary: Some(event.summary.clone()),
        description: Some(event.description.clone()),
        start: Some(EventDateTime {
            date_time: Some(event.start.with_timezone(&Utc)),
            time_zone: Some(time_zone.clone()),
            ..Default::default()
        }),
        end: Some(EventDateTime {
            date_time: Some(event.end.with_timezone(&Utc)),
            time_zone: Some(time_zone),
            ..Default::default()
        }),
        attendees: Some(
            event
                .attendees
                .iter()
                .map(|email| ApiAttendee {
                    email: Some(email.clone()),
                    ..Default::default()
                })
                .collect(),
        ),
        reminders: Some(EventReminders {
            use_default: Some(event.use_default_reminders),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Maps the provider's event back to the public view, rendering instants in
/// the event's own zone (or `fallback_zone` when it has none).
pub(crate) fn calendar_event_from_api(event: Event, fallback_zone: Tz) -> CalendarEvent {
    let to_event_time = |time: EventDateTime| {
        let zone = time
            .time_zone
            .as_deref()
            .and_then(|name| name.parse::<Tz>().ok())
            .unwrap_or(fallback_zone);
        EventTime {
            date_time: time
                .date_time
                .map(|instant| instant.with_timezone(&zone).fixed_offset()),
            time_zone: time.time_zone,
        }
    };

    CalendarEvent {
        id: event.id,
        status: event.status,
        html_link: event.html_link,
        summary: event.summary,
        description: event.description,
        start: event.start.map(to_event_time),
        end: event.end.map(to_event_time),
        attendees: event
            .attendees
            .unwrap_or_default()
            .into_iter()
            .map(|attendee| EventAttendee {
                email: attendee.email,
                display_name: attendee.display_name,
            })
            .collect(),
    }
}

/// Mock implementation of CalendarService for testing.
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// A calendar created event, as recorded by the mock.
    #[derive(Debug, Clone)]
    pub struct RecordedEvent {
        pub access_token: String,
        pub calendar_id: String,
        pub descriptor: EventDescriptor,
        pub event_id: String,
    }

    /// In-memory calendar. Busy intervals are seeded up front; created
    /// events are recorded but do not become busy.
    #[derive(Default)]
    pub struct MockCalendarService {
        busy: Mutex<Vec<BusyInterval>>,
        created: Mutex<Vec<RecordedEvent>>,
        failure: Mutex<Option<String>>,
        list_calls: AtomicUsize,
    }

    impl MockCalendarService {
        /// Create a new mock calendar service.
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_busy(busy: Vec<BusyInterval>) -> Self {
            let service = Self::new();
            *service.busy.lock().unwrap_or_else(|e| e.into_inner()) = busy;
            service
        }

        /// Every subsequent call fails with `Unavailable(message)`.
        pub fn failing(message: &str) -> Self {
            let service = Self::new();
            *service.failure.lock().unwrap_or_else(|e| e.into_inner()) =
                Some(message.to_string());
            service
        }

        pub fn created_events(&self) -> Vec<RecordedEvent> {
            self.created
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .clone()
        }

        pub fn list_calls(&self) -> usize {
            self.list_calls.load(Ordering::SeqCst)
        }

        fn check_failure(&self) -> Result<(), GcalServiceError> {
            match self.failure.lock().unwrap_or_else(|e| e.into_inner()).as_ref() {
                Some(message) => Err(GcalServiceError::Unavailable(message.clone())),
                None => Ok(()),
            }
        }
    }

    impl CalendarService for MockCalendarService {
        type Error = GcalServiceError;

        fn list_busy_intervals(
            &self,
            _access_token: &str,
            _calendar_id: &str,
            start_time: DateTime<Utc>,
            end_time: DateTime<Utc>,
        ) -> BoxFuture<'_, Vec<BusyInterval>, Self::Error> {
            Box::pin(async move {
                self.list_calls.fetch_add(1, Ordering::SeqCst);
                self.check_failure()?;

                let mut busy: Vec<BusyInterval> = self
                    .busy
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .iter()
                    .filter(|interval| interval.start < end_time && start_time < interval.end)
                    .copied()
                    .collect();
                busy.sort_by_key(|interval| interval.start);
                Ok(busy)
            })
        }

        fn create_event(
            &self,
            access_token: &str,
            calendar_id: &str,
            event: EventDescriptor,
        ) -> BoxFuture<'_, CalendarEvent, Self::Error> {
            let access_token = access_token.to_string();
            let calendar_id = calendar_id.to_string();

            Box::pin(async move {
                self.check_failure()?;

                let event_id = format!("mock-event-{}", uuid::Uuid::new_v4());
                let mut api_event = event_to_api(&event);
                api_event.id = Some(event_id.clone());
                api_event.status = Some("confirmed".to_string());
                let zone = event.start.timezone();

                self.created
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .push(RecordedEvent {
                        access_token,
                        calendar_id,
                        descriptor: event,
                        event_id,
                    });

                Ok(calendar_event_from_api(api_event, zone))
            })
        }
    }
}
