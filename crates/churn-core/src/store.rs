//! The `WarehouseStore` trait.
//!
//! Implemented by storage backends (e.g. `churn-store-sqlite`). The load
//! orchestrator depends on this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  customer::{CustomerKeys, DimCustomer, NewCustomer},
  fact::{ChurnFact, NewChurnFact},
  report::{BatchReport, StagedRow},
  staging::{DemographicRow, ServiceRow},
};

/// Abstraction over the warehouse: two staging relations, the customer
/// dimension and the churn fact table.
///
/// Batch writes isolate every row behind its own savepoint inside one
/// transaction per call. A failing row is rolled back and reported in the
/// returned [`BatchReport`]; it never fails the call. `Err` is reserved for
/// failures of the connection or of the surrounding transaction.
pub trait WarehouseStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Staging ───────────────────────────────────────────────────────────

  /// Bulk-insert into `stg_customer_demographics`, all or nothing.
  /// With `truncate`, the relation is cleared first in the same transaction.
  fn load_demographics(
    &self,
    rows: Vec<DemographicRow>,
    truncate: bool,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Bulk-insert into `stg_customer_services`, all or nothing.
  fn load_services(
    &self,
    rows: Vec<ServiceRow>,
    truncate: bool,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Load both staging relations in one transaction, so a failure on either
  /// side leaves staging as it was. Returns `(demographics, services)`.
  fn load_staging(
    &self,
    demographics: Vec<DemographicRow>,
    services: Vec<ServiceRow>,
    truncate: bool,
  ) -> impl Future<Output = Result<(usize, usize), Self::Error>> + Send + '_;

  /// Read `stg_customer_demographics` in insertion order.
  fn read_demographics(
    &self,
  ) -> impl Future<Output = Result<Vec<DemographicRow>, Self::Error>> + Send + '_;

  /// Read `stg_customer_services` in insertion order.
  fn read_services(
    &self,
  ) -> impl Future<Output = Result<Vec<ServiceRow>, Self::Error>> + Send + '_;

  // ── Dimension ─────────────────────────────────────────────────────────

  /// Upsert every customer by natural key and commit.
  ///
  /// The commit is complete when the future resolves, so a following
  /// [`customer_keys`](Self::customer_keys) sees every persisted row.
  fn upsert_customers(
    &self,
    rows: Vec<StagedRow<NewCustomer>>,
  ) -> impl Future<Output = Result<BatchReport, Self::Error>> + Send + '_;

  /// Read the committed dimension as a natural → surrogate key map.
  fn customer_keys(
    &self,
  ) -> impl Future<Output = Result<CustomerKeys, Self::Error>> + Send + '_;

  /// All dimension rows, ordered by surrogate key.
  fn list_customers(
    &self,
  ) -> impl Future<Output = Result<Vec<DimCustomer>, Self::Error>> + Send + '_;

  // ── Facts — append-only ───────────────────────────────────────────────

  /// Append facts tagged with `run_id` and commit. Never updates or
  /// deduplicates existing rows.
  fn append_facts(
    &self,
    run_id: Uuid,
    rows: Vec<StagedRow<NewChurnFact>>,
  ) -> impl Future<Output = Result<BatchReport, Self::Error>> + Send + '_;

  /// All fact rows, ordered by `fact_id`.
  fn list_facts(
    &self,
  ) -> impl Future<Output = Result<Vec<ChurnFact>, Self::Error>> + Send + '_;
}
