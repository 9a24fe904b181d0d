// File: services/bookify_backend/src/views.rs
//! Server-rendered confirmation page shown after a successful booking.

use axum::extract::Query;
use axum::response::Html;
use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::Deserialize;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
pub struct ConfirmationQuery {
    pub date: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// A booking whose parameters all parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedBooking {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

const STYLE: &str = r#"
    body { font-family: system-ui, sans-serif; background: #f5f7fb; display: flex; justify-content: center; padding: 4rem 1rem; }
    .card { background: #fff; border-radius: 12px; box-shadow: 0 4px 16px rgba(0,0,0,.08); max-width: 28rem; width: 100%; padding: 2rem; }
    .card.error { border: 1px solid #f5c2c7; background: #fff5f5; }
    h1 { margin-top: 0; }
    .when { font-size: 1.15rem; font-weight: 600; }
    a.button { display: inline-block; margin-top: 1.5rem; padding: .6rem 1.2rem; border-radius: 999px; background: #4f46e5; color: #fff; text-decoration: none; }
"#;

impl ConfirmationQuery {
    /// All three parameters, parsed. `None` when any is absent or malformed.
    pub fn parse(&self) -> Option<ConfirmedBooking> {
        let date = NaiveDate::parse_from_str(self.date.as_deref()?.trim(), "%Y-%m-%d").ok()?;
        let start = NaiveTime::parse_from_str(self.start.as_deref()?.trim(), "%H:%M").ok()?;
        let end = NaiveTime::parse_from_str(self.end.as_deref()?.trim(), "%H:%M").ok()?;
        Some(ConfirmedBooking { date, start, end })
    }
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// "Monday, June 10th, 2024"
pub fn long_date(date: NaiveDate) -> String {
    format!(
        "{}, {} {}{}, {}",
        date.format("%A"),
        date.format("%B"),
        date.day(),
        ordinal_suffix(date.day()),
        date.year()
    )
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n"
    )
}

pub fn render_confirmation(booking: &ConfirmedBooking) -> String {
    let body = format!(
        "<div class=\"card\">\n\
         <h1>Booking Confirmed!</h1>\n\
         <p>Your appointment has been scheduled successfully.</p>\n\
         <p class=\"when\">{}</p>\n\
         <p>{} - {}</p>\n\
         <p>Google Meet (link will be sent in calendar invitation)</p>\n\
         <a class=\"button\" href=\"/\">Return to Calendar</a>\n\
         <a href=\"https://calendar.google.com/calendar\" target=\"_blank\" rel=\"noopener noreferrer\">View in Google Calendar</a>\n\
         </div>",
        long_date(booking.date),
        booking.start.format("%H:%M"),
        booking.end.format("%H:%M"),
    );
    page("Booking Confirmed", &body)
}

pub fn render_invalid() -> String {
    let body = "<div class=\"card error\">\n\
         <h1>Invalid Booking Details</h1>\n\
         <p>We couldn't find details about your booking. Please return to the calendar to try again.</p>\n\
         <a class=\"button\" href=\"/\">Return to Calendar</a>\n\
         </div>";
    page("Invalid Booking Details", body)
}

pub async fn confirmation_handler(Query(query): Query<ConfirmationQuery>) -> Html<String> {
    match query.parse() {
        Some(booking) => Html(render_confirmation(&booking)),
        None => {
            debug!("Confirmation requested with incomplete parameters: {:?}", query);
            Html(render_invalid())
        }
    }
}
