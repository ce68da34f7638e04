use std::fs;
use std::io;
use std::path::Path;

use clap::Parser;
use tracing::error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mzlabeler::{MZLabeler, MZLabelerError};

#[cfg(feature = "mimalloc")]
use mimalloc::MiMalloc;

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn env_filter() -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy()
}

/// The returned guard must be held until the program exits or buffered
/// log file lines are lost.
fn configure_log(log_file: Option<&Path>) -> io::Result<Option<WorkerGuard>> {
    let stderr_layer = fmt::layer()
        .compact()
        .with_timer(fmt::time::ChronoLocal::rfc_3339())
        .with_writer(io::stderr)
        .with_filter(env_filter());

    if let Some(path) = log_file {
        let (writer, guard) = tracing_appender::non_blocking(fs::File::create(path)?);
        let file_layer = fmt::layer()
            .compact()
            .with_ansi(false)
            .with_timer(fmt::time::ChronoLocal::rfc_3339())
            .with_writer(writer)
            .with_filter(env_filter());
        tracing_subscriber::registry()
            .with(stderr_layer)
            .with(file_layer)
            .init();
        Ok(Some(guard))
    } else {
        tracing_subscriber::registry().with(stderr_layer).init();
        Ok(None)
    }
}

fn main() -> Result<(), MZLabelerError> {
    let args = MZLabeler::parse().load_configuration()?;
    let _guard = configure_log(args.log_file.as_deref())?;
    if let Err(e) = args.main() {
        error!("An error occurred while labeling: {e}");
        return Err(e);
    }
    Ok(())
}
