use calnav::components::GoogleCalendarHandle;
use calnav::config::Config;
use calnav::error::other_error;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn")),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| other_error(&format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Build the calendar handle the commands run against
pub fn connect(config: &Config) -> miette::Result<GoogleCalendarHandle> {
    let handle = GoogleCalendarHandle::from_config(config)?;
    info!(
        "Using calendar {} at {}",
        config.google_calendar_id, config.api_base_url
    );
    Ok(handle)
}
