// --- File: crates/bookify_common/src/lib.rs ---

pub mod error; // Error taxonomy shared by every crate
pub mod features; // Runtime feature checks
pub mod http; // Error-to-response mapping
pub mod logging; // Tracing subscriber setup
pub mod services; // Calendar service abstraction

pub use error::{
    config_error, external_service_error, missing_field, unauthorized, validation_error,
    BookifyError, HttpStatusCode,
};

pub use http::{map_json_error, IntoHttpResponse};

pub use logging::{init, init_with_level, log_error};

pub use features::is_feature_enabled;

#[cfg(feature = "gcal")]
pub use features::is_gcal_enabled;
