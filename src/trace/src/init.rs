use std::{str::FromStr, sync::Mutex};

use tracing_subscriber::{filter::LevelFilter, prelude::*, Registry};

use crate::error::Error;

#[derive(Debug, Clone)]
pub struct TraceConfig {
    pub level: String,
    pub format: String,
    pub file: Option<String>,
}

impl Default for TraceConfig {
    fn default() -> Self {
        TraceConfig {
            level: "info".to_string(),
            format: "plain".to_string(),
            file: None,
        }
    }
}

// Logs are written to stderr. Stdout belongs to command output.
pub fn prepare_tracing(conf: TraceConfig) -> Result<(), Error> {
    let level =
        LevelFilter::from_str(&conf.level).map_err(|_| Error::InvalidLevel(conf.level.clone()))?;
    let file = match &conf.file {
        Some(path) => Some(std::fs::File::create(path).map_err(Error::LogFile)?),
        None => None,
    };

    if conf.format == "json" {
        Registry::default()
            .with(file.map(|f| {
                tracing_subscriber::fmt::Layer::new()
                    .with_writer(Mutex::new(f))
                    .json()
            }))
            .with(
                tracing_subscriber::fmt::Layer::new()
                    .with_writer(std::io::stderr)
                    .json(),
            )
            .with(level)
            .try_init()?;
    } else {
        Registry::default()
            .with(file.map(|f| {
                tracing_subscriber::fmt::Layer::new()
                    .with_ansi(false)
                    .with_writer(Mutex::new(f))
            }))
            .with(
                tracing_subscriber::fmt::Layer::new()
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .with(level)
            .try_init()?;
    }

    tracing::debug!(
        level = %level,
        format = %conf.format,
        file = ?conf.file,
        "tracing initialized"
    );
    Ok(())
}
