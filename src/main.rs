use snafu::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use starlift::error::{ConfigSnafu, EtlError};
use starlift::{run_pipeline, Config};

/// Fixed location of the pipeline configuration.
const CONFIG_PATH: &str = "etl.yaml";

#[snafu::report]
#[tokio::main]
async fn main() -> Result<(), EtlError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_file(CONFIG_PATH).context(ConfigSnafu)?;
    info!(
        "Starting pipeline: {} -> {}",
        config.source.url, config.sink.url
    );

    let stats = run_pipeline(config).await?;
    info!(
        "Done: {} plays, {} works, {} contributors, {} actors, {} time rows",
        stats.plays_rows,
        stats.works_rows,
        stats.contributors_rows,
        stats.actors_rows,
        stats.time_rows
    );

    Ok(())
}
