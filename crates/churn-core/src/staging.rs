//! Staging datasets: raw rows exactly as they sit in the staging relations.
//!
//! Nothing here is normalized. Every attribute is the literal text from the
//! source file, and `None` means the field was absent or empty on extraction.

/// One row of `stg_customer_demographics`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemographicRow {
  pub customer_id:    String,
  pub gender:         Option<String>,
  /// Free text: "Yes"/"No"/"1"/"0" in any case.
  pub senior_citizen: Option<String>,
  pub partner:        Option<String>,
  pub dependents:     Option<String>,
}

impl DemographicRow {
  /// A row with only the natural key set.
  pub fn new(customer_id: impl Into<String>) -> Self {
    Self { customer_id: customer_id.into(), ..Self::default() }
  }
}

/// One row of `stg_customer_services`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceRow {
  pub customer_id:       String,
  pub phone_service:     Option<String>,
  pub multiple_lines:    Option<String>,
  pub internet_service:  Option<String>,
  pub online_security:   Option<String>,
  pub online_backup:     Option<String>,
  pub device_protection: Option<String>,
  pub tech_support:      Option<String>,
  pub streaming_tv:      Option<String>,
  pub streaming_movies:  Option<String>,
  pub contract:          Option<String>,
  pub paperless_billing: Option<String>,
  pub payment_method:    Option<String>,
  pub monthly_charges:   Option<String>,
  pub total_charges:     Option<String>,
  pub tenure:            Option<String>,
  pub churn:             Option<String>,
}

impl ServiceRow {
  /// A row with only the natural key set.
  pub fn new(customer_id: impl Into<String>) -> Self {
    Self { customer_id: customer_id.into(), ..Self::default() }
  }
}
