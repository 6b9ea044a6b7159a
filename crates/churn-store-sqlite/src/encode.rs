//! Encoding and decoding helpers between Rust domain types and the plain
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, UUIDs hyphenated lowercase strings,
//! booleans 0/1 integers (NULL for unknown on the dimension).

use chrono::{DateTime, Utc};
use churn_core::{
  customer::{DimCustomer, Gender},
  fact::{ChurnFact, NewChurnFact, ServiceFlags},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Gender ──────────────────────────────────────────────────────────────────

pub fn encode_gender(g: Gender) -> &'static str { g.into() }

pub fn decode_gender(s: &str) -> Result<Gender> { Ok(Gender::decode(s)?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `dim_customer` row.
pub struct RawCustomer {
  pub customer_pk:       i64,
  pub customer_id:       String,
  pub gender:            Option<String>,
  pub is_senior_citizen: Option<bool>,
  pub has_partner:       Option<bool>,
  pub has_dependents:    Option<bool>,
  pub updated_at:        String,
}

impl RawCustomer {
  pub const COLUMNS: &'static str = "customer_pk, customer_id, gender, \
                                     is_senior_citizen, has_partner, \
                                     has_dependents, updated_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      customer_pk:       row.get(0)?,
      customer_id:       row.get(1)?,
      gender:            row.get(2)?,
      is_senior_citizen: row.get(3)?,
      has_partner:       row.get(4)?,
      has_dependents:    row.get(5)?,
      updated_at:        row.get(6)?,
    })
  }

  pub fn into_customer(self) -> Result<DimCustomer> {
    Ok(DimCustomer {
      customer_pk:       self.customer_pk,
      customer_id:       self.customer_id,
      gender:            self.gender.as_deref().map(decode_gender).transpose()?,
      is_senior_citizen: self.is_senior_citizen,
      has_partner:       self.has_partner,
      has_dependents:    self.has_dependents,
      updated_at:        decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from a `fact_churn_events` row.
pub struct RawFact {
  pub fact_id:     i64,
  pub load_run_id: String,
  pub loaded_at:   String,
  pub event:       NewChurnFact,
}

impl RawFact {
  pub const COLUMNS: &'static str = "fact_id, load_run_id, loaded_at, customer_pk, \
                                     has_phone_service, has_multiple_lines, \
                                     has_online_security, has_online_backup, \
                                     has_device_protection, has_tech_support, \
                                     has_streaming_tv, has_streaming_movies, \
                                     is_paperless_billing, internet_service, \
                                     contract_type, payment_method, \
                                     monthly_charges, total_charges, \
                                     tenure_months, churned";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      fact_id:     row.get(0)?,
      load_run_id: row.get(1)?,
      loaded_at:   row.get(2)?,
      event:       NewChurnFact {
        customer_pk:      row.get(3)?,
        flags:            ServiceFlags {
          has_phone_service:     row.get(4)?,
          has_multiple_lines:    row.get(5)?,
          has_online_security:   row.get(6)?,
          has_online_backup:     row.get(7)?,
          has_device_protection: row.get(8)?,
          has_tech_support:      row.get(9)?,
          has_streaming_tv:      row.get(10)?,
          has_streaming_movies:  row.get(11)?,
          is_paperless_billing:  row.get(12)?,
        },
        internet_service: row.get(13)?,
        contract_type:    row.get(14)?,
        payment_method:   row.get(15)?,
        monthly_charges:  row.get(16)?,
        total_charges:    row.get(17)?,
        tenure_months:    row.get(18)?,
        churned:          row.get(19)?,
      },
    })
  }

  pub fn into_fact(self) -> Result<ChurnFact> {
    Ok(ChurnFact {
      fact_id:     self.fact_id,
      load_run_id: decode_uuid(&self.load_run_id)?,
      loaded_at:   decode_dt(&self.loaded_at)?,
      event:       self.event,
    })
  }
}
