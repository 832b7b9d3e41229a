//! Pipeline orchestration.
//!
//! Runs the two dataset passes end to end: catalog objects feed the work
//! and contributor dimensions, event objects feed the actor and time
//! dimensions, and the filtered events join against both catalog
//! dimensions to produce the play fact table. Tables are written as each
//! becomes ready, so a failure partway leaves the earlier tables already
//! replaced at the destination.

use tracing::info;

use crate::config::Config;
use crate::discover::discover;
use crate::error::{
    DiscoverySnafu, EtlError, EtlStorageSnafu, LoadSnafu, TransformSnafu, WriteSnafu,
};
use crate::sink::TableWriter;
use crate::source::DatasetLoader;
use crate::storage::StorageProvider;
use crate::tables::catalog::{build_contributor_table, build_work_table};
use crate::tables::events::{build_actor_table, build_time_table, filter_actionable};
use crate::tables::plays::build_play_table;
use snafu::prelude::*;

/// Row counts of the tables written by one run.
#[derive(Debug, Default, Clone, Copy)]
pub struct PipelineStats {
    pub works_rows: usize,
    pub contributors_rows: usize,
    pub actors_rows: usize,
    pub time_rows: usize,
    pub plays_rows: usize,
}

/// The batch ETL pipeline.
pub struct EtlPipeline {
    config: Config,
    source: StorageProvider,
    sink: StorageProvider,
}

impl EtlPipeline {
    /// Construct the pipeline, building one storage provider per side.
    pub async fn new(config: Config) -> Result<Self, EtlError> {
        let options = config.storage_options();
        let source = StorageProvider::for_url_with_options(&config.source.url, options.clone())
            .await
            .context(EtlStorageSnafu)?;
        let sink = StorageProvider::for_url_with_options(&config.sink.url, options)
            .await
            .context(EtlStorageSnafu)?;

        Ok(Self {
            config,
            source,
            sink,
        })
    }

    /// Run the full pipeline once.
    pub async fn run(&self) -> Result<PipelineStats, EtlError> {
        let loader = DatasetLoader::new(&self.source, self.config.source.batch_size);
        let writer = TableWriter::new(&self.sink, self.config.sink.compression);
        let mut stats = PipelineStats::default();

        info!(
            "Discovering catalog objects under {}",
            self.config.source.catalog_prefix
        );
        let catalog_paths = discover(&self.source, &self.config.source.catalog_prefix)
            .await
            .context(DiscoverySnafu)?;
        let catalog = loader
            .load(&catalog_paths)
            .await
            .context(LoadSnafu)?
            .to_batch()
            .context(TransformSnafu)?;

        let works = build_work_table(&catalog).context(TransformSnafu)?;
        stats.works_rows = writer
            .write_table("works_table", &works)
            .await
            .context(WriteSnafu)?;

        let contributors = build_contributor_table(&catalog).context(TransformSnafu)?;
        stats.contributors_rows = writer
            .write_table("contributors_table", &contributors)
            .await
            .context(WriteSnafu)?;

        info!(
            "Discovering event objects under {}",
            self.config.source.events_prefix
        );
        let event_paths = discover(&self.source, &self.config.source.events_prefix)
            .await
            .context(DiscoverySnafu)?;
        let events = loader
            .load(&event_paths)
            .await
            .context(LoadSnafu)?
            .to_batch()
            .context(TransformSnafu)?;
        let events = filter_actionable(&events).context(TransformSnafu)?;
        info!("{} actionable event rows after filtering", events.num_rows());

        let actors = build_actor_table(&events).context(TransformSnafu)?;
        stats.actors_rows = writer
            .write_table("actors_table", &actors)
            .await
            .context(WriteSnafu)?;

        let time = build_time_table(&events).context(TransformSnafu)?;
        stats.time_rows = writer
            .write_table("time_table", &time)
            .await
            .context(WriteSnafu)?;

        let plays = build_play_table(&events, &works, &contributors).context(TransformSnafu)?;
        stats.plays_rows = writer
            .write_table("plays_table", &plays)
            .await
            .context(WriteSnafu)?;

        info!(
            "Pipeline complete: works={} contributors={} actors={} time={} plays={}",
            stats.works_rows,
            stats.contributors_rows,
            stats.actors_rows,
            stats.time_rows,
            stats.plays_rows
        );
        Ok(stats)
    }
}

/// Convenience entry point: construct and run the pipeline once.
pub async fn run_pipeline(config: Config) -> Result<PipelineStats, EtlError> {
    EtlPipeline::new(config).await?.run().await
}
