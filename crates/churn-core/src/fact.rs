//! Churn fact rows.
//!
//! Facts are append-only: the store never updates or deduplicates them, so
//! loading the same services batch twice yields two copies of every row.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::customer::CustomerPk;

/// The nine service flags. `churned` lives on [`NewChurnFact`] itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceFlags {
  pub has_phone_service:     bool,
  pub has_multiple_lines:    bool,
  pub has_online_security:   bool,
  pub has_online_backup:     bool,
  pub has_device_protection: bool,
  pub has_tech_support:      bool,
  pub has_streaming_tv:      bool,
  pub has_streaming_movies:  bool,
  pub is_paperless_billing:  bool,
}

/// A fully normalized fact ready to append to `fact_churn_events`.
///
/// Every field is populated: numeric columns are already imputed and clamped.
#[derive(Debug, Clone, PartialEq)]
pub struct NewChurnFact {
  pub customer_pk:      CustomerPk,
  pub flags:            ServiceFlags,
  pub internet_service: Option<String>,
  pub contract_type:    Option<String>,
  pub payment_method:   Option<String>,
  pub monthly_charges:  f64,
  pub total_charges:    f64,
  /// Never negative.
  pub tenure_months:    i64,
  pub churned:          bool,
}

/// A persisted `fact_churn_events` row.
#[derive(Debug, Clone, PartialEq)]
pub struct ChurnFact {
  pub fact_id:     i64,
  /// The load run that appended this row.
  pub load_run_id: Uuid,
  /// Server-assigned at append time.
  pub loaded_at:   DateTime<Utc>,
  pub event:       NewChurnFact,
}
