//! Sequential batch runner

use std::sync::Arc;

use tracing::{error, info};

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::job::{Converter, JobReport};

/// Run every job of `config` in order.
///
/// Each conversion runs on the blocking pool and the next job starts only
/// after the previous one finished. The first failure aborts the batch, so
/// later outputs are never created.
pub async fn run_batch(config: PipelineConfig) -> Result<Vec<JobReport>> {
    let converter = Arc::new(Converter::from_config(&config)?);
    let total = config.jobs.len();
    let mut reports = Vec::with_capacity(total);

    for (index, job) in config.jobs.into_iter().enumerate() {
        info!(job = %job.name, index = index + 1, total, "starting job");

        let converter = Arc::clone(&converter);
        let name = job.name.clone();
        let outcome = tokio::task::spawn_blocking(move || converter.convert(&job)).await?;

        match outcome {
            Ok(report) => reports.push(report),
            Err(e) => {
                error!(job = %name, error = %e, "job failed, aborting batch");
                return Err(e);
            }
        }
    }

    info!(jobs = reports.len(), "batch finished");
    Ok(reports)
}
