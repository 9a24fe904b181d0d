//! Runtime feature checks.
//!
//! Features are switched on twice: at compile time through cargo features
//! (`gcal`, `openapi`) and at runtime through `use_*` flags in the config.
//! A runtime feature only counts as enabled when its flag is set *and* its
//! configuration section is present.

#[cfg(any(test, feature = "gcal"))]
use bookify_config::AppConfig;

/// `true` when `use_feature` is set and the feature's config section exists.
pub fn is_feature_enabled<T>(use_feature: bool, feature_config: Option<&T>) -> bool {
    use_feature && feature_config.is_some()
}

/// Check if the Google Calendar feature is enabled at runtime.
#[cfg(feature = "gcal")]
pub fn is_gcal_enabled(config: &AppConfig) -> bool {
    is_feature_enabled(config.use_gcal, config.gcal.as_ref())
}
