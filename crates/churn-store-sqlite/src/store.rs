//! [`SqliteWarehouse`] — the SQLite implementation of [`WarehouseStore`].

use std::{path::Path, time::Duration};

use chrono::Utc;
use uuid::Uuid;

use churn_core::{
  customer::{CustomerKeys, DimCustomer, NewCustomer},
  fact::{ChurnFact, NewChurnFact},
  report::{BatchReport, RowFailure, StagedRow},
  staging::{DemographicRow, ServiceRow},
  store::WarehouseStore,
};

use crate::{
  Result,
  encode::{RawCustomer, RawFact, encode_dt, encode_gender, encode_uuid},
  schema::SCHEMA,
};

const UPSERT_CUSTOMER: &str = "
  INSERT INTO dim_customer
    (customer_id, gender, is_senior_citizen, has_partner, has_dependents, updated_at)
  VALUES (?1, ?2, ?3, ?4, ?5, ?6)
  ON CONFLICT (customer_id) DO UPDATE SET
    gender            = excluded.gender,
    is_senior_citizen = excluded.is_senior_citizen,
    has_partner       = excluded.has_partner,
    has_dependents    = excluded.has_dependents,
    updated_at        = excluded.updated_at";

const INSERT_FACT: &str = "
  INSERT INTO fact_churn_events (
    customer_pk,
    has_phone_service, has_multiple_lines, has_online_security,
    has_online_backup, has_device_protection, has_tech_support,
    has_streaming_tv, has_streaming_movies, is_paperless_billing,
    internet_service, contract_type, payment_method,
    monthly_charges, total_charges, tenure_months, churned,
    load_run_id, loaded_at
  ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
            ?14, ?15, ?16, ?17, ?18, ?19)";

const INSERT_DEMOGRAPHIC: &str = "
  INSERT INTO stg_customer_demographics
    (customerid, gender, seniorcitizen, partner, dependents)
  VALUES (?1, ?2, ?3, ?4, ?5)";

const INSERT_SERVICE: &str = "
  INSERT INTO stg_customer_services (
    customerid, phoneservice, multiplelines, internetservice,
    onlinesecurity, onlinebackup, deviceprotection, techsupport,
    streamingtv, streamingmovies, contract, paperlessbilling,
    paymentmethod, monthlycharges, totalcharges, tenure, churn
  ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
            ?14, ?15, ?16, ?17)";

/// Busy timeout used when the caller does not pick one.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// ─── Store ───────────────────────────────────────────────────────────────────

/// A churn warehouse backed by a single SQLite file.
///
/// Clones share the inner connection. A run uses
/// exactly one connection; every phase goes through it in order.
#[derive(Clone)]
pub struct SqliteWarehouse {
  conn: tokio_rusqlite::Connection,
}

impl SqliteWarehouse {
  /// Open (or create) a warehouse at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>, busy_timeout: Duration) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init(busy_timeout).await?;
    Ok(store)
  }

  /// Open an in-memory warehouse — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init(DEFAULT_BUSY_TIMEOUT).await?;
    Ok(store)
  }

  async fn init(&self, busy_timeout: Duration) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.busy_timeout(busy_timeout)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── WarehouseStore impl ─────────────────────────────────────────────────────

impl WarehouseStore for SqliteWarehouse {
  type Error = crate::Error;

  // ── Staging ───────────────────────────────────────────────────────────────

  async fn load_demographics(
    &self,
    rows: Vec<DemographicRow>,
    truncate: bool,
  ) -> Result<usize> {
    let loaded = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        insert_demographics(&tx, &rows, truncate)?;
        tx.commit()?;
        Ok(rows.len())
      })
      .await?;
    Ok(loaded)
  }

  async fn load_services(&self, rows: Vec<ServiceRow>, truncate: bool) -> Result<usize> {
    let loaded = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        insert_services(&tx, &rows, truncate)?;
        tx.commit()?;
        Ok(rows.len())
      })
      .await?;
    Ok(loaded)
  }

  async fn load_staging(
    &self,
    demographics: Vec<DemographicRow>,
    services: Vec<ServiceRow>,
    truncate: bool,
  ) -> Result<(usize, usize)> {
    let loaded = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        insert_demographics(&tx, &demographics, truncate)?;
        insert_services(&tx, &services, truncate)?;
        tx.commit()?;
        Ok((demographics.len(), services.len()))
      })
      .await?;
    Ok(loaded)
  }

  async fn read_demographics(&self) -> Result<Vec<DemographicRow>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT customerid, gender, seniorcitizen, partner, dependents
           FROM stg_customer_demographics
           ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(DemographicRow {
              customer_id:    row.get::<_, Option<String>>(0)?.unwrap_or_default(),
              gender:         row.get(1)?,
              senior_citizen: row.get(2)?,
              partner:        row.get(3)?,
              dependents:     row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn read_services(&self) -> Result<Vec<ServiceRow>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT customerid, phoneservice, multiplelines, internetservice,
                  onlinesecurity, onlinebackup, deviceprotection, techsupport,
                  streamingtv, streamingmovies, contract, paperlessbilling,
                  paymentmethod, monthlycharges, totalcharges, tenure, churn
           FROM stg_customer_services
           ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(ServiceRow {
              customer_id:       row.get::<_, Option<String>>(0)?.unwrap_or_default(),
              phone_service:     row.get(1)?,
              multiple_lines:    row.get(2)?,
              internet_service:  row.get(3)?,
              online_security:   row.get(4)?,
              online_backup:     row.get(5)?,
              device_protection: row.get(6)?,
              tech_support:      row.get(7)?,
              streaming_tv:      row.get(8)?,
              streaming_movies:  row.get(9)?,
              contract:          row.get(10)?,
              paperless_billing: row.get(11)?,
              payment_method:    row.get(12)?,
              monthly_charges:   row.get(13)?,
              total_charges:     row.get(14)?,
              tenure:            row.get(15)?,
              churn:             row.get(16)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  // ── Dimension ─────────────────────────────────────────────────────────────

  async fn upsert_customers(
    &self,
    rows: Vec<StagedRow<NewCustomer>>,
  ) -> Result<BatchReport> {
    let updated_at = encode_dt(Utc::now());

    let report = self
      .conn
      .call(move |conn| {
        let mut tx = conn.transaction()?;
        let mut report = BatchReport { attempted: rows.len(), ..BatchReport::default() };

        for staged in &rows {
          let customer = &staged.row;
          let sp = tx.savepoint()?;
          let outcome = sp.execute(
            UPSERT_CUSTOMER,
            rusqlite::params![
              customer.customer_id,
              customer.gender.map(encode_gender),
              customer.is_senior_citizen,
              customer.has_partner,
              customer.has_dependents,
              updated_at,
            ],
          );
          match outcome {
            Ok(_) => {
              sp.commit()?;
              report.persisted += 1;
            }
            // Dropping the savepoint rolls this row back.
            Err(e) => report.failures.push(RowFailure::new(staged, e)),
          }
        }

        tx.commit()?;
        Ok(report)
      })
      .await?;
    Ok(report)
  }

  async fn customer_keys(&self) -> Result<CustomerKeys> {
    let keys = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT customer_id, customer_pk FROM dim_customer")?;
        let keys = stmt
          .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
          .collect::<rusqlite::Result<CustomerKeys>>()?;
        Ok(keys)
      })
      .await?;
    Ok(keys)
  }

  async fn list_customers(&self) -> Result<Vec<DimCustomer>> {
    let raws: Vec<RawCustomer> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM dim_customer ORDER BY customer_pk",
          RawCustomer::COLUMNS
        ))?;
        let rows = stmt
          .query_map([], RawCustomer::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCustomer::into_customer).collect()
  }

  // ── Facts — append-only ───────────────────────────────────────────────────

  async fn append_facts(
    &self,
    run_id: Uuid,
    rows: Vec<StagedRow<NewChurnFact>>,
  ) -> Result<BatchReport> {
    let run_id_str = encode_uuid(run_id);
    let loaded_at = encode_dt(Utc::now());

    let report = self
      .conn
      .call(move |conn| {
        let mut tx = conn.transaction()?;
        let mut report = BatchReport { attempted: rows.len(), ..BatchReport::default() };

        for staged in &rows {
          let fact = &staged.row;
          let sp = tx.savepoint()?;
          let outcome = sp.execute(
            INSERT_FACT,
            rusqlite::params![
              fact.customer_pk,
              fact.flags.has_phone_service,
              fact.flags.has_multiple_lines,
              fact.flags.has_online_security,
              fact.flags.has_online_backup,
              fact.flags.has_device_protection,
              fact.flags.has_tech_support,
              fact.flags.has_streaming_tv,
              fact.flags.has_streaming_movies,
              fact.flags.is_paperless_billing,
              fact.internet_service,
              fact.contract_type,
              fact.payment_method,
              fact.monthly_charges,
              fact.total_charges,
              fact.tenure_months,
              fact.churned,
              run_id_str,
              loaded_at,
            ],
          );
          match outcome {
            Ok(_) => {
              sp.commit()?;
              report.persisted += 1;
            }
            Err(e) => report.failures.push(RowFailure::new(staged, e)),
          }
        }

        tx.commit()?;
        Ok(report)
      })
      .await?;
    Ok(report)
  }

  async fn list_facts(&self) -> Result<Vec<ChurnFact>> {
    let raws: Vec<RawFact> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM fact_churn_events ORDER BY fact_id",
          RawFact::COLUMNS
        ))?;
        let rows = stmt
          .query_map([], RawFact::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawFact::into_fact).collect()
  }
}

// ─── Staging helpers ─────────────────────────────────────────────────────────

fn insert_demographics(
  tx: &rusqlite::Transaction<'_>,
  rows: &[DemographicRow],
  truncate: bool,
) -> rusqlite::Result<()> {
  if truncate {
    tx.execute("DELETE FROM stg_customer_demographics", [])?;
  }
  let mut stmt = tx.prepare(INSERT_DEMOGRAPHIC)?;
  for row in rows {
    stmt.execute(rusqlite::params![
      row.customer_id,
      row.gender,
      row.senior_citizen,
      row.partner,
      row.dependents,
    ])?;
  }
  Ok(())
}

fn insert_services(
  tx: &rusqlite::Transaction<'_>,
  rows: &[ServiceRow],
  truncate: bool,
) -> rusqlite::Result<()> {
  if truncate {
    tx.execute("DELETE FROM stg_customer_services", [])?;
  }
  let mut stmt = tx.prepare(INSERT_SERVICE)?;
  for row in rows {
    stmt.execute(rusqlite::params![
      row.customer_id,
      row.phone_service,
      row.multiple_lines,
      row.internet_service,
      row.online_security,
      row.online_backup,
      row.device_protection,
      row.tech_support,
      row.streaming_tv,
      row.streaming_movies,
      row.contract,
      row.paperless_billing,
      row.payment_method,
      row.monthly_charges,
      row.total_charges,
      row.tenure,
      row.churn,
    ])?;
  }
  Ok(())
}
