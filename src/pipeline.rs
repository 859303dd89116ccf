//! query -> fetch -> transform -> dedup -> write.

use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::fetch::{FetchError, HttpTransport, Sleeper, fetch_with_retry};
use crate::model::SparqlResults;
use crate::query::build_sparql;
use crate::transform::{dedup_by_id, transform};
use crate::writer::write_artworks;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("malformed SPARQL response: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("{0:#}")]
    Write(anyhow::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub written: usize,
    pub out: PathBuf,
}

pub fn run_pipeline(
    config: &Config,
    transport: &dyn HttpTransport,
    sleeper: &dyn Sleeper,
) -> Result<Summary, PipelineError> {
    info!(
        "Generating {} (LIMIT={}) ...",
        config.out.display(),
        config.limit
    );

    let query = build_sparql(config.limit);
    let json = fetch_with_retry(
        transport,
        &config.endpoint,
        &query,
        &config.retry,
        sleeper,
    )?;
    let results: SparqlResults = serde_json::from_value(json).map_err(PipelineError::Malformed)?;

    let rows = transform(&results.results.bindings, config.width);
    let fetched = rows.len();
    let unique = dedup_by_id(rows);
    if unique.len() < fetched {
        info!("dropped {} duplicate rows", fetched - unique.len());
    }

    write_artworks(&config.out, &unique).map_err(PipelineError::Write)?;
    info!(
        "Done. Wrote {} items to {}",
        unique.len(),
        config.out.display()
    );

    Ok(Summary {
        written: unique.len(),
        out: config.out.clone(),
    })
}
