use std::{error::Error, fs::File, path::Path, str::FromStr, sync::Arc};
use tracing_subscriber::{
    filter::{self, LevelFilter},
    fmt::writer::BoxMakeWriter,
    prelude::*,
};

/// Dependency targets kept out of the logs whatever the level.
const MUTED_TARGETS: [&str; 6] = ["hyper", "reqwest", "rustls", "tokio", "mio", "want"];

fn is_muted(target: &str) -> bool {
    MUTED_TARGETS.iter().any(|prefix| target.starts_with(prefix))
}

/// Log to stderr and, if a path is given, to that file as well.
pub fn setup_logger(log_level: LevelFilter, log_file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let file_log = match log_file {
        Some(path) => {
            let file = File::create(path)?;
            let writer = BoxMakeWriter::new(Arc::new(file));
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_file(false),
            )
        }
        None => None,
    };

    let stderr_log = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(false);

    tracing_subscriber::registry()
        .with(
            stderr_log
                .and_then(file_log)
                .with_filter(log_level)
                .with_filter(filter::filter_fn(|metadata| !is_muted(metadata.target()))),
        )
        .try_init()?;

    Ok(())
}

/// Parse LOG_LEVEL environment variable.
pub fn parse_log_level() -> Result<Option<LevelFilter>, Box<dyn Error>> {
    if let Ok(l) = std::env::var("LOG_LEVEL") {
        Ok(Some(LevelFilter::from_str(&l)?))
    } else {
        Ok(None)
    }
}
