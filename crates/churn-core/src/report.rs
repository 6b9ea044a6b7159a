//! Per-row bookkeeping for batch writes.
//!
//! Row-level persistence failures are data, not errors: a batch write returns
//! a [`BatchReport`] listing the rows that were rolled back, and the caller
//! decides how loudly to log them.

use serde::Serialize;

/// A row travelling through a batch write, tagged with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedRow<T> {
  /// Position of the source row in its staging dataset.
  pub index:       usize,
  pub customer_id: String,
  pub row:         T,
}

/// A row whose statement failed and was rolled back to its savepoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowFailure {
  pub index:       usize,
  pub customer_id: String,
  /// `Debug` rendering of the offending row, enough to reproduce it.
  pub values:      String,
  pub error:       String,
}

impl RowFailure {
  pub fn new<T: std::fmt::Debug>(
    staged: &StagedRow<T>,
    error: impl std::fmt::Display,
  ) -> Self {
    Self {
      index:       staged.index,
      customer_id: staged.customer_id.clone(),
      values:      format!("{:?}", staged.row),
      error:       error.to_string(),
    }
  }
}

/// Outcome of one batch write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
  pub attempted: usize,
  pub persisted: usize,
  pub failures:  Vec<RowFailure>,
}

impl BatchReport {
  pub fn failed(&self) -> usize { self.failures.len() }

  pub fn is_clean(&self) -> bool { self.failures.is_empty() }
}
