//! Error type for `churn-etl`.
//!
//! Only run-level failures are errors. Rows that fail to persist are reported
//! through [`churn_core::report::BatchReport`] instead.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("{file}: missing column {column:?}")]
  MissingColumn { file: PathBuf, column: &'static str },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
