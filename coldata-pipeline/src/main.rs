//! `coldata` driver
//!
//! Runs the jobs of a JSON configuration given as the first argument, or the
//! built-in Formula 1 jobs when no argument is given.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use coldata_pipeline::{run_batch, PipelineConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match std::env::args_os().nth(1) {
        Some(path) => PipelineConfig::from_path(&path)
            .with_context(|| format!("loading configuration from {}", path.to_string_lossy()))?,
        None => PipelineConfig::default(),
    };

    let reports = run_batch(config).await.context("conversion batch failed")?;
    for report in &reports {
        info!(
            job = %report.name,
            output = %report.output.display(),
            rows = report.rows,
            columns = report.columns,
            bytes = report.bytes_written,
            secs = report.elapsed_secs,
            "converted"
        );
    }

    Ok(())
}
