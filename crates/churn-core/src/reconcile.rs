//! Customer identity reconciliation.
//!
//! Merges the two staging sources into one deduplicated identity set. The
//! union is ordered demographics first, services second, and the first
//! occurrence of a `customer_id` wins, so a customer present in both sources
//! always takes its attributes from the demographics row.

use std::collections::HashSet;

use serde::Serialize;

use crate::{
  customer::NewCustomer,
  report::StagedRow,
  staging::{DemographicRow, ServiceRow},
};

/// Result of [`reconcile`].
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
  /// Identities to upsert. `index` is the position in the
  /// demographics-then-services union.
  pub customers: Vec<StagedRow<NewCustomer>>,
  pub stats:     ReconcileStats,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileStats {
  /// Union rows seen (demographics + services).
  pub source_rows: usize,
  /// Union rows folded into an identity that was already seen.
  pub merged:      usize,
  /// Rows skipped because the natural key was blank.
  pub blank_ids:   usize,
}

/// Build the normalized identity set from both staging sources.
pub fn reconcile(
  demographics: &[DemographicRow],
  services: &[ServiceRow],
) -> Reconciliation {
  let union = demographics
    .iter()
    .map(|row| (row.customer_id.as_str(), Some(row)))
    .chain(services.iter().map(|row| (row.customer_id.as_str(), None)));

  let mut seen: HashSet<&str> = HashSet::new();
  let mut out = Reconciliation::default();

  for (index, (customer_id, demographics)) in union.enumerate() {
    out.stats.source_rows += 1;

    if customer_id.trim().is_empty() {
      out.stats.blank_ids += 1;
      continue;
    }
    if !seen.insert(customer_id) {
      out.stats.merged += 1;
      continue;
    }

    let customer = match demographics {
      Some(row) => NewCustomer::from_demographics(row),
      None => NewCustomer::without_demographics(customer_id),
    };
    out.customers.push(StagedRow {
      index,
      customer_id: customer_id.to_owned(),
      row: customer,
    });
  }

  out
}
