//! The conformed customer dimension.
//!
//! One [`DimCustomer`] per distinct natural key. The surrogate key is assigned
//! by the store on first insert and never changes; re-loading the same
//! `customer_id` overwrites the normalized attributes in place.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use strum::{EnumString, IntoStaticStr};

use crate::{Error, Result, normalize, staging::DemographicRow};

/// Storage-assigned surrogate key of a `dim_customer` row.
pub type CustomerPk = i64;

/// The two gender values the dimension accepts; anything else is stored as
/// NULL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr)]
pub enum Gender {
  Male,
  Female,
}

impl Gender {
  /// Decode the column value written by the store.
  pub fn decode(s: &str) -> Result<Self> {
    s.parse().map_err(|_| Error::UnknownGender(s.to_owned()))
  }
}

// ─── NewCustomer ─────────────────────────────────────────────────────────────

/// A normalized identity ready to be upserted into `dim_customer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
  pub customer_id:       String,
  pub gender:            Option<Gender>,
  pub is_senior_citizen: Option<bool>,
  pub has_partner:       Option<bool>,
  pub has_dependents:    Option<bool>,
}

impl NewCustomer {
  /// Normalize a demographics staging row.
  pub fn from_demographics(row: &DemographicRow) -> Self {
    Self {
      customer_id:       row.customer_id.clone(),
      gender:            normalize::gender(row.gender.as_deref()),
      is_senior_citizen: normalize::senior_citizen(row.senior_citizen.as_deref()),
      has_partner:       normalize::dimension_flag(row.partner.as_deref()),
      has_dependents:    normalize::dimension_flag(row.dependents.as_deref()),
    }
  }

  /// An identity seen only in the services source: demographics unknown.
  pub fn without_demographics(customer_id: impl Into<String>) -> Self {
    Self {
      customer_id:       customer_id.into(),
      gender:            None,
      is_senior_citizen: None,
      has_partner:       None,
      has_dependents:    None,
    }
  }
}

// ─── DimCustomer ─────────────────────────────────────────────────────────────

/// A persisted `dim_customer` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimCustomer {
  pub customer_pk:       CustomerPk,
  pub customer_id:       String,
  pub gender:            Option<Gender>,
  pub is_senior_citizen: Option<bool>,
  pub has_partner:       Option<bool>,
  pub has_dependents:    Option<bool>,
  /// Refreshed by every upsert, including ones that change nothing.
  pub updated_at:        DateTime<Utc>,
}

// ─── CustomerKeys ────────────────────────────────────────────────────────────

/// Natural key → surrogate key, read once per run after the dimension commit.
#[derive(Debug, Clone, Default)]
pub struct CustomerKeys(HashMap<String, CustomerPk>);

impl CustomerKeys {
  pub fn resolve(&self, customer_id: &str) -> Option<CustomerPk> {
    self.0.get(customer_id).copied()
  }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl FromIterator<(String, CustomerPk)> for CustomerKeys {
  fn from_iter<I: IntoIterator<Item = (String, CustomerPk)>>(iter: I) -> Self {
    Self(iter.into_iter().collect())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn gender_encoding_round_trips() {
    let encoded: &'static str = Gender::Male.into();
    assert_eq!(encoded, "Male");
    assert_eq!(Gender::decode("Female").unwrap(), Gender::Female);
    assert!(matches!(
      Gender::decode("female"),
      Err(Error::UnknownGender(ref s)) if s == "female"
    ));
  }

  #[test]
  fn from_demographics_normalizes_every_attribute() {
    let row = DemographicRow {
      customer_id:    "7590-VHVEG".into(),
      gender:         Some("Female".into()),
      senior_citizen: Some("0".into()),
      partner:        Some("Yes".into()),
      dependents:     Some("".into()),
    };
    let c = NewCustomer::from_demographics(&row);
    assert_eq!(c.customer_id, "7590-VHVEG");
    assert_eq!(c.gender, Some(Gender::Female));
    assert_eq!(c.is_senior_citizen, Some(false));
    assert_eq!(c.has_partner, Some(true));
    assert_eq!(c.has_dependents, None);
  }

  #[test]
  fn keys_resolve_known_ids_only() {
    let keys: CustomerKeys =
      [("C1".to_owned(), 1), ("C2".to_owned(), 7)].into_iter().collect();
    assert_eq!(keys.len(), 2);
    assert_eq!(keys.resolve("C2"), Some(7));
    assert_eq!(keys.resolve("C3"), None);
  }
}
