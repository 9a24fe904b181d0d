// File: crates/bookify_gcal/src/auth.rs
//! Credentials and the HTTPS client used to reach Google Calendar.
//!
//! Sign-in happens in front of this service. The identity layer forwards the
//! visitor's OAuth access token as `Authorization: Bearer <token>`; handlers
//! pull it out with the [`SessionCredential`] extractor and hand it to the
//! calendar service per call.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use bookify_common::{unauthorized, BookifyError};
use google_calendar3::{
    hyper_rustls::{self, HttpsConnectorBuilder},
    hyper_util::client::legacy::connect::HttpConnector,
    hyper_util::client::legacy::Client,
};
use std::fmt;
use tracing::debug;

use crate::service::GcalServiceError;

// Type aliases for clarity
pub type Connector = hyper_rustls::HttpsConnector<HttpConnector>;

pub type HttpClient = google_calendar3::common::Client<Connector>;

/// Builds the pooled HTTPS client shared by every calendar call.
pub fn create_https_client() -> Result<HttpClient, GcalServiceError> {
    let https = HttpsConnectorBuilder::new()
        .with_native_roots()
        .map_err(|e| GcalServiceError::ClientSetup(e.to_string()))?
        .https_or_http()
        .enable_http1()
        .build();

    Ok(Client::builder(hyper_util::rt::TokioExecutor::new()).build(https))
}

/// The OAuth access token of the current request.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCredential(String);

impl SessionCredential {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self(access_token.into())
    }

    pub fn access_token(&self) -> &str {
        &self.0
    }
}

// Never print the token.
impl fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionCredential(***)")
    }
}

/// Returns the token of a `Bearer` authorization header, if there is one.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl<S> FromRequestParts<S> for SessionCredential
where
    S: Send + Sync,
{
    type Rejection = BookifyError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match bearer_token(&parts.headers) {
            Some(token) => Ok(SessionCredential::new(token)),
            None => {
                debug!("Rejecting {} {}: no bearer credential", parts.method, parts.uri.path());
                Err(unauthorized())
            }
        }
    }
}
