//! Services staging rows → churn facts.
//!
//! Charge medians are computed over the whole services batch passed in, before
//! unresolvable rows are dropped, and are recomputed on every call.

use serde::Serialize;

use crate::{
  customer::CustomerKeys,
  fact::{NewChurnFact, ServiceFlags},
  normalize::{coerce_number, internet_service, median, service_flag},
  report::StagedRow,
  staging::ServiceRow,
};

/// Result of [`transform_services`].
#[derive(Debug, Clone, Default)]
pub struct FactBatch {
  /// One fact per resolvable services row. `index` is the row's position in
  /// the services dataset.
  pub facts: Vec<StagedRow<NewChurnFact>>,
  pub stats: TransformStats,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TransformStats {
  pub source_rows:             usize,
  /// Rows dropped because their `customer_id` has no dimension row.
  pub unresolved:              usize,
  pub monthly_charges_median:  f64,
  pub total_charges_median:    f64,
  pub monthly_charges_imputed: usize,
  pub total_charges_imputed:   usize,
  pub tenure_imputed:          usize,
  pub tenure_clamped:          usize,
}

/// Normalize `services` into facts, resolving each row's surrogate key
/// through `keys`.
pub fn transform_services(services: &[ServiceRow], keys: &CustomerKeys) -> FactBatch {
  let monthly: Vec<Option<f64>> = services
    .iter()
    .map(|row| coerce_number(row.monthly_charges.as_deref()))
    .collect();
  let total: Vec<Option<f64>> = services
    .iter()
    .map(|row| coerce_number(row.total_charges.as_deref()))
    .collect();

  let mut stats = TransformStats {
    source_rows: services.len(),
    monthly_charges_median: column_median(&monthly),
    total_charges_median: column_median(&total),
    ..TransformStats::default()
  };

  let mut facts = Vec::with_capacity(services.len());
  for (index, row) in services.iter().enumerate() {
    let Some(customer_pk) = keys.resolve(&row.customer_id) else {
      stats.unresolved += 1;
      continue;
    };

    let monthly_charges = monthly[index].unwrap_or_else(|| {
      stats.monthly_charges_imputed += 1;
      stats.monthly_charges_median
    });
    let total_charges = total[index].unwrap_or_else(|| {
      stats.total_charges_imputed += 1;
      stats.total_charges_median
    });

    let tenure_months = match coerce_number(row.tenure.as_deref()) {
      None => {
        stats.tenure_imputed += 1;
        0
      }
      Some(t) if t < 0.0 => {
        stats.tenure_clamped += 1;
        0
      }
      Some(t) => t.trunc() as i64,
    };

    facts.push(StagedRow {
      index,
      customer_id: row.customer_id.clone(),
      row: NewChurnFact {
        customer_pk,
        flags: ServiceFlags {
          has_phone_service:     service_flag(row.phone_service.as_deref()),
          has_multiple_lines:    service_flag(row.multiple_lines.as_deref()),
          has_online_security:   service_flag(row.online_security.as_deref()),
          has_online_backup:     service_flag(row.online_backup.as_deref()),
          has_device_protection: service_flag(row.device_protection.as_deref()),
          has_tech_support:      service_flag(row.tech_support.as_deref()),
          has_streaming_tv:      service_flag(row.streaming_tv.as_deref()),
          has_streaming_movies:  service_flag(row.streaming_movies.as_deref()),
          is_paperless_billing:  service_flag(row.paperless_billing.as_deref()),
        },
        internet_service: internet_service(row.internet_service.as_deref()),
        contract_type: row.contract.clone(),
        payment_method: row.payment_method.clone(),
        monthly_charges,
        total_charges,
        tenure_months,
        churned: service_flag(row.churn.as_deref()),
      },
    });
  }

  FactBatch { facts, stats }
}

/// Median of the present values; 0 when the column is entirely missing.
fn column_median(column: &[Option<f64>]) -> f64 {
  let present: Vec<f64> = column.iter().flatten().copied().collect();
  median(&present).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn keys(ids: &[&str]) -> CustomerKeys {
    ids
      .iter()
      .enumerate()
      .map(|(i, id)| ((*id).to_owned(), i as i64 + 1))
      .collect()
  }

  fn service(id: &str, monthly: Option<&str>, total: Option<&str>, tenure: Option<&str>) -> ServiceRow {
    ServiceRow {
      monthly_charges: monthly.map(Into::into),
      total_charges: total.map(Into::into),
      tenure: tenure.map(Into::into),
      ..ServiceRow::new(id)
    }
  }

  #[test]
  fn unresolved_rows_are_dropped() {
    let services = vec![ServiceRow::new("C1"), ServiceRow::new("C3"), ServiceRow::new("C2")];
    let batch = transform_services(&services, &keys(&["C1", "C2"]));

    assert_eq!(batch.facts.len(), 2);
    assert_eq!(batch.stats.unresolved, 1);
    let indexes: Vec<usize> = batch.facts.iter().map(|f| f.index).collect();
    assert_eq!(indexes, [0, 2]);
    assert_eq!(batch.facts[1].row.customer_pk, 2);
  }

  #[test]
  fn missing_monthly_charge_takes_even_median() {
    let services = vec![
      service("C1", Some("10"), Some("100"), Some("1")),
      service("C1", Some("20"), Some("200"), Some("1")),
      service("C1", None, Some("300"), Some("1")),
    ];
    let batch = transform_services(&services, &keys(&["C1"]));

    assert_eq!(batch.facts[2].row.monthly_charges, 15.0);
    assert_eq!(batch.stats.monthly_charges_imputed, 1);
    assert_eq!(batch.stats.total_charges_imputed, 0);
  }

  #[test]
  fn missing_total_charge_takes_odd_median() {
    let services = vec![
      service("C1", Some("1"), Some("100"), None),
      service("C1", Some("1"), Some("abc"), None),
      service("C1", Some("1"), Some("300"), None),
      service("C1", Some("1"), Some("200"), None),
    ];
    let batch = transform_services(&services, &keys(&["C1"]));
    assert_eq!(batch.stats.total_charges_median, 200.0);
    assert_eq!(batch.facts[1].row.total_charges, 200.0);
  }

  #[test]
  fn median_includes_unresolvable_rows() {
    let services = vec![
      service("C1", Some("10"), None, None),
      service("GHOST", Some("30"), None, None),
      service("C1", None, None, None),
    ];
    let batch = transform_services(&services, &keys(&["C1"]));
    assert_eq!(batch.facts[1].row.monthly_charges, 20.0);
    // No present totals anywhere: impute zero.
    assert_eq!(batch.facts[0].row.total_charges, 0.0);
  }

  #[test]
  fn tenure_coercion_and_clamping() {
    let services = vec![
      service("C1", None, None, Some("abc")),
      service("C1", None, None, Some("-5")),
      service("C1", None, None, Some("34")),
      service("C1", None, None, None),
      service("C1", None, None, Some("7.9")),
    ];
    let batch = transform_services(&services, &keys(&["C1"]));
    let tenures: Vec<i64> = batch.facts.iter().map(|f| f.row.tenure_months).collect();
    assert_eq!(tenures, [0, 0, 34, 0, 7]);
    assert_eq!(batch.stats.tenure_imputed, 2);
    assert_eq!(batch.stats.tenure_clamped, 1);
  }

  #[test]
  fn flags_and_categoricals() {
    let row = ServiceRow {
      phone_service: Some("Yes".into()),
      multiple_lines: Some("No phone service".into()),
      internet_service: Some("No internet service".into()),
      online_security: Some("No internet service".into()),
      streaming_tv: Some("Yes".into()),
      contract: Some("Month-to-month".into()),
      paperless_billing: Some("".into()),
      payment_method: Some("Electronic check".into()),
      churn: Some("Yes".into()),
      ..ServiceRow::new("C1")
    };
    let batch = transform_services(&[row], &keys(&["C1"]));
    let fact = &batch.facts[0].row;

    assert!(fact.flags.has_phone_service);
    assert!(!fact.flags.has_multiple_lines);
    assert!(!fact.flags.has_online_security);
    assert!(!fact.flags.has_online_backup);
    assert!(fact.flags.has_streaming_tv);
    assert!(!fact.flags.is_paperless_billing);
    assert!(fact.churned);
    assert_eq!(fact.internet_service.as_deref(), Some("No"));
    assert_eq!(fact.contract_type.as_deref(), Some("Month-to-month"));
    assert_eq!(fact.payment_method.as_deref(), Some("Electronic check"));
  }
}
