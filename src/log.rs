use serde::Deserialize;
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

#[derive(Debug, Deserialize)]
pub struct Log {
    pub level: String,
    #[serde(default = "default_ansi")]
    pub ansi: bool,
}

fn default_ansi() -> bool {
    true
}

/// setup log from an optional environment filter and the config file
///
/// if the environment filter is present, then the configured level is not used
pub fn setup(
    env_filter: Result<EnvFilter, tracing_subscriber::filter::FromEnvError>,
    config: &Option<Log>,
) -> anyhow::Result<()> {
    let env_filter = match env_filter {
        Ok(env_filter) => env_filter,
        Err(_) => match config {
            Some(log) => EnvFilter::try_new(&log.level)?,
            None => EnvFilter::new("info"),
        },
    };
    let ansi = config.as_ref().map(|log| log.ansi).unwrap_or(true);

    let ss = Subscriber::builder()
        .with_timer(tracing_subscriber::fmt::time::ChronoUtc::rfc3339())
        .with_level(true)
        .with_env_filter(env_filter)
        .with_ansi(ansi)
        .finish();
    tracing::subscriber::set_global_default(ss)?;
    Ok(())
}
