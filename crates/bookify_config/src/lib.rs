use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

pub mod models;
pub use models::*;

/// Loads the application configuration from `./config`.
///
/// Sources, later ones winning:
/// 1. `config/default.{toml,json,yaml}`
/// 2. `config/{RUN_ENV}.*` (RUN_ENV defaults to "debug")
/// 3. environment variables prefixed with `PREFIX` (default "BOOKIFY"),
///    nested keys separated by `__`, e.g. `BOOKIFY__SERVER__PORT=8080`.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let config_dir = env::var("CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config"));
    load_config_from(&config_dir)
}

/// Same as [`load_config`] but with an explicit config directory.
pub fn load_config_from(config_dir: &Path) -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env::var("PREFIX").unwrap_or_else(|_| "BOOKIFY".to_string());

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(&run_env);
    debug!(
        "Loading config: default={}, env={}",
        default_path.display(),
        env_path.display()
    );

    let builder = Config::builder()
        .add_source(File::from(default_path).required(false))
        .add_source(File::from(env_path).required(false))
        .add_source(Environment::with_prefix(&prefix).separator("__"));

    builder.build()?.try_deserialize()
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Loads the dotenv file into the process environment, once.
///
/// The path comes from `DOTENV_OVERRIDE`, falling back to `.env`. A missing
/// file is not an error. Returns the path that was tried.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path = std::env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gcal_config_defaults() {
        let gcal = GcalConfig::default();
        assert_eq!(gcal.calendar_id(), "primary");
        assert_eq!(gcal.time_zone(), "America/New_York");
        assert_eq!(gcal.work_start_hour(), 9);
        assert_eq!(gcal.work_end_hour(), 17);
        assert_eq!(gcal.slot_duration_minutes(), 30);
        assert_eq!(
            gcal.default_description(),
            "Calendar booking via our scheduling app"
        );
    }

    #[test]
    fn gcal_config_overrides_win() {
        let gcal = GcalConfig {
            calendar_id: Some("owner@example.com".to_string()),
            time_zone: Some("Europe/Zurich".to_string()),
            work_start_hour: Some(8),
            work_end_hour: Some(12),
            slot_duration_minutes: Some(45),
            default_description: Some("Intro call".to_string()),
        };
        assert_eq!(gcal.calendar_id(), "owner@example.com");
        assert_eq!(gcal.time_zone(), "Europe/Zurich");
        assert_eq!(gcal.work_start_hour(), 8);
        assert_eq!(gcal.work_end_hour(), 12);
        assert_eq!(gcal.slot_duration_minutes(), 45);
        assert_eq!(gcal.default_description(), "Intro call");
    }

    #[test]
    fn app_config_deserializes_with_optional_sections_missing() {
        let config: AppConfig = Config::builder()
            .add_source(File::from_str(
                "[server]\nhost = \"127.0.0.1\"\nport = 3000\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 3000);
        assert!(config.server.static_dir.is_none());
        assert!(config.server.sign_in_url.is_none());
        assert!(!config.use_gcal);
        assert!(config.gcal.is_none());
    }

    #[test]
    fn app_config_reads_gcal_section() {
        let config: AppConfig = Config::builder()
            .add_source(File::from_str(
                r#"
use_gcal = true

[server]
host = "0.0.0.0"
port = 8080
static_dir = "static"
sign_in_url = "https://idp.example.com/authorize"

[gcal]
calendar_id = "primary"
work_start_hour = 10
"#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(config.use_gcal);
        assert_eq!(config.server.static_dir.as_deref(), Some("static"));
        assert_eq!(
            config.server.sign_in_url.as_deref(),
            Some("https://idp.example.com/authorize")
        );
        let gcal = config.gcal.unwrap();
        assert_eq!(gcal.work_start_hour(), 10);
        assert_eq!(gcal.work_end_hour(), 17);
    }
}
