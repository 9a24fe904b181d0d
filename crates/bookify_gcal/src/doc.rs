// File: crates/bookify_gcal/src/doc.rs

#![cfg(feature = "openapi")]
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::logic::{AvailabilityResponse, BookingFormData, BookingResponse, TimeSlot};
use bookify_common::services::{CalendarEvent, EventAttendee, EventTime};

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::get_availability_handler,
        crate::handlers::book_slot_handler,
    ),
    components(
        schemas(
            AvailabilityResponse,
            TimeSlot,
            BookingFormData,
            BookingResponse,
            CalendarEvent,
            EventTime,
            EventAttendee,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "GCal", description = "Slot availability and booking on the owner's Google Calendar")
    )
)]
pub struct GcalApiDoc;
