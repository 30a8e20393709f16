use crate::components::google_calendar::SpanPolicy;
use crate::error::{config_error, env_error, CalendarResult};
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::fmt;
use std::fs;
use std::io::ErrorKind;

/// Calendar used when `GOOGLE_CALENDAR_ID` is not set
pub const DEFAULT_CALENDAR_ID: &str = "primary";

/// Base URL of the Google Calendar v3 REST API
pub const DEFAULT_API_URL: &str = "https://www.googleapis.com/calendar/v3";

/// Location of the optional TOML configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/calendar.toml";

/// Transport timeout applied to every API request
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Main configuration structure
#[derive(Clone)]
pub struct Config {
    /// OAuth access token with the calendar scope, issued out of band
    pub google_access_token: String,
    /// Google Calendar ID to operate on
    pub google_calendar_id: String,
    /// API base URL, overridable for proxies and test servers
    pub api_base_url: String,
    /// Request timeout handed to the HTTP client
    pub request_timeout_secs: u64,
    /// Minimum spans accepted by past/future year queries
    pub span_policy: SpanPolicy,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("google_access_token", &"<redacted>")
            .field("google_calendar_id", &self.google_calendar_id)
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("span_policy", &self.span_policy)
            .finish()
    }
}

/// Shape of `config/calendar.toml`
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    span: Option<SpanSection>,
}

#[derive(Debug, Deserialize)]
struct SpanSection {
    min_past_years: Option<u32>,
    min_future_years: Option<u32>,
}

impl Config {
    /// Create a configuration with defaults for everything but the token
    pub fn new(google_access_token: impl Into<String>) -> Self {
        Self {
            google_access_token: google_access_token.into(),
            google_calendar_id: DEFAULT_CALENDAR_ID.to_string(),
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            span_policy: SpanPolicy::default(),
        }
    }

    /// Load configuration from environment and config file
    pub fn load() -> CalendarResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let google_access_token =
            env::var("GOOGLE_ACCESS_TOKEN").map_err(|_| env_error("GOOGLE_ACCESS_TOKEN"))?;

        let mut config = Config::new(google_access_token);

        if let Ok(calendar_id) = env::var("GOOGLE_CALENDAR_ID") {
            config.google_calendar_id = calendar_id;
        }

        if let Ok(api_url) = env::var("GOOGLE_CALENDAR_API_URL") {
            config.api_base_url = api_url.trim_end_matches('/').to_string();
        }

        if let Ok(timeout) = env::var("REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = timeout
                .parse::<u64>()
                .map_err(|_| env_error("Invalid REQUEST_TIMEOUT_SECS format"))?;
        }

        let content = match env::var("CALNAV_CONFIG") {
            Ok(path) => read_config_file(&path, true)?,
            Err(_) => read_config_file(DEFAULT_CONFIG_PATH, false)?,
        };
        if let Some(content) = content {
            config.apply_toml(&content)?;
        }

        Ok(config)
    }

    /// Merge settings from a TOML document into this configuration
    pub fn apply_toml(&mut self, content: &str) -> CalendarResult<()> {
        let file: FileConfig = toml::from_str(content)?;

        if let Some(span) = file.span {
            let min_past = span
                .min_past_years
                .unwrap_or(self.span_policy.min_years_past());
            let min_future = span
                .min_future_years
                .unwrap_or(self.span_policy.min_years_future());
            self.span_policy = SpanPolicy::new(min_past, min_future)
                .map_err(|e| config_error(&format!("[span] {}", e)))?;
        }

        Ok(())
    }
}

/// Read the TOML config file. A missing file is only an error when the path
/// was given explicitly.
fn read_config_file(path: &str, explicit: bool) -> CalendarResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if !explicit && e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
