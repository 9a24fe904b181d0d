// File: services/bookify_backend/src/session.rs
//! Sign-in entry point for the booking page.
//!
//! The identity provider signs the visitor in and redirects back to
//! `/#access_token=<token>`; the page keeps that token for the session and
//! sends it as `Authorization: Bearer`.

use axum::extract::State;
use axum::response::Redirect;
use bookify_common::BookifyError;
use tracing::{debug, warn};

/// Redirects to the configured identity provider.
pub async fn sign_in_handler(
    State(sign_in_url): State<Option<String>>,
) -> Result<Redirect, BookifyError> {
    match sign_in_url {
        Some(url) => {
            debug!("Redirecting visitor to sign-in");
            Ok(Redirect::to(&url))
        }
        None => {
            warn!("Sign-in requested but server.sign_in_url is not set");
            Err(BookifyError::ServiceDisabled(
                "Sign-in is not configured.".to_string(),
            ))
        }
    }
}
