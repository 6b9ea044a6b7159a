//! Load orchestration.
//!
//! Phases run strictly in sequence over one store:
//!
//! 1. staging load (optional; `stage`)
//! 2. customer reconciliation → `dim_customer` upsert, committed
//! 3. key resolution, re-reading the committed dimension
//! 4. fact transformation → `fact_churn_events` append, committed
//!
//! Row-level failures in 2 and 4 are logged and counted; they never stop the
//! run. Any `Err` from the store is a run-level failure and aborts.

use std::path::Path;

use churn_core::{
  customer::CustomerKeys,
  reconcile::{ReconcileStats, reconcile},
  report::BatchReport,
  staging::{DemographicRow, ServiceRow},
  store::WarehouseStore,
  transform::{TransformStats, transform_services},
};
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  extract::{extract_demographics, extract_services},
};

// ─── Summaries ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
pub struct StageSummary {
  pub demographics: usize,
  pub services:     usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DimensionSummary {
  pub stats:  ReconcileStats,
  pub report: BatchReport,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FactSummary {
  pub stats:  TransformStats,
  pub report: BatchReport,
}

/// Everything a caller needs to judge data quality after a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
  pub run_id:    Uuid,
  pub staging:   Option<StageSummary>,
  pub dimension: DimensionSummary,
  /// Size of the key map the fact phase resolved against.
  pub keys:      usize,
  pub facts:     FactSummary,
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

/// The load orchestrator. Holds the run's single store handle.
pub struct Pipeline<S> {
  store: S,
}

impl<S> Pipeline<S>
where
  S: WarehouseStore,
{
  pub fn new(store: S) -> Self { Self { store } }

  pub fn store(&self) -> &S { &self.store }

  /// Extract both raw files and bulk-load them into staging.
  ///
  /// Both files are extracted before anything is written, and both relations
  /// are loaded in one store call. On any error staging is left untouched.
  #[instrument(skip(self))]
  pub async fn stage(
    &self,
    demographics_file: &Path,
    services_file: &Path,
    truncate: bool,
  ) -> Result<StageSummary> {
    let demographics = extract_demographics(demographics_file)?;
    let services = extract_services(services_file)?;

    let (demographics, services) = self
      .store
      .load_staging(demographics, services, truncate)
      .await
      .map_err(store_error)?;
    let summary = StageSummary { demographics, services };
    info!(
      demographics = summary.demographics,
      services = summary.services,
      "loaded staging"
    );
    Ok(summary)
  }

  /// Extract, stage, then transform and load the core tables.
  pub async fn run(
    &self,
    demographics_file: &Path,
    services_file: &Path,
    truncate: bool,
  ) -> Result<RunSummary> {
    let staging = self.stage(demographics_file, services_file, truncate).await?;
    let mut summary = self.transform_and_load().await?;
    summary.staging = Some(staging);
    Ok(summary)
  }

  /// Read staging and run reconciliation, key resolution and fact loading
  /// under a fresh run id.
  pub async fn transform_and_load(&self) -> Result<RunSummary> {
    self.transform_and_load_as(Uuid::new_v4()).await
  }

  #[instrument(name = "load_run", skip_all, fields(%run_id))]
  pub async fn transform_and_load_as(&self, run_id: Uuid) -> Result<RunSummary> {
    info!("starting transformation and loading into core tables");

    let demographics = self.store.read_demographics().await.map_err(store_error)?;
    let services = self.store.read_services().await.map_err(store_error)?;

    let dimension = self.reconcile_customers(&demographics, &services).await?;
    // The dimension transaction is committed at this point.
    let keys = self.resolve_keys().await?;
    let facts = self.load_facts(run_id, &services, &keys).await?;

    Ok(RunSummary {
      run_id,
      staging: None,
      dimension,
      keys: keys.len(),
      facts,
    })
  }

  /// Reconcile both staging datasets into `dim_customer`.
  pub async fn reconcile_customers(
    &self,
    demographics: &[DemographicRow],
    services: &[ServiceRow],
  ) -> Result<DimensionSummary> {
    let reconciliation = reconcile(demographics, services);
    let stats = reconciliation.stats;
    if stats.blank_ids > 0 {
      warn!(rows = stats.blank_ids, "skipped staging rows with a blank customer id");
    }

    let report = self
      .store
      .upsert_customers(reconciliation.customers)
      .await
      .map_err(store_error)?;

    for failure in &report.failures {
      warn!(
        index = failure.index,
        customer_id = %failure.customer_id,
        values = %failure.values,
        error = %failure.error,
        "error inserting or updating dim_customer"
      );
    }
    info!(
      identities = report.attempted,
      persisted = report.persisted,
      failed = report.failed(),
      merged = stats.merged,
      "loaded dim_customer"
    );

    Ok(DimensionSummary { stats, report })
  }

  /// Read the committed dimension into a lookup map.
  pub async fn resolve_keys(&self) -> Result<CustomerKeys> {
    let keys = self.store.customer_keys().await.map_err(store_error)?;
    info!(customers = keys.len(), "resolved customer keys");
    Ok(keys)
  }

  /// Transform `services` and append the resolvable rows as facts.
  pub async fn load_facts(
    &self,
    run_id: Uuid,
    services: &[ServiceRow],
    keys: &CustomerKeys,
  ) -> Result<FactSummary> {
    let batch = transform_services(services, keys);
    let stats = batch.stats;

    let report = self
      .store
      .append_facts(run_id, batch.facts)
      .await
      .map_err(store_error)?;

    for failure in &report.failures {
      warn!(
        index = failure.index,
        customer_id = %failure.customer_id,
        values = %failure.values,
        error = %failure.error,
        "error inserting fact_churn_events row"
      );
    }
    info!(
      source_rows = stats.source_rows,
      unresolved = stats.unresolved,
      persisted = report.persisted,
      failed = report.failed(),
      monthly_charges_imputed = stats.monthly_charges_imputed,
      total_charges_imputed = stats.total_charges_imputed,
      tenure_imputed = stats.tenure_imputed,
      tenure_clamped = stats.tenure_clamped,
      "loaded fact_churn_events"
    );

    Ok(FactSummary { stats, report })
  }
}

fn store_error<E>(e: E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  Error::Store(Box::new(e))
}
