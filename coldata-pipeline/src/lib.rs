//! Dataset conversion jobs
//!
//! Reads CSV, compressed Arrow and Parquet inputs through `coldata-readers`
//! and writes compressed Parquet or Arrow outputs. Jobs come from a
//! [`PipelineConfig`] and run one after another.

pub mod batch;
pub mod config;
mod error;
pub mod job;

pub use batch::run_batch;
pub use config::{ArrowSettings, CsvSettings, ParquetSettings, PipelineConfig};
pub use error::{Error, Result};
pub use job::{Converter, Job, JobReport};
