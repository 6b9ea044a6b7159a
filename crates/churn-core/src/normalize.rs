//! Value-level normalization rules.
//!
//! Every function here is total: any input, including a missing one, maps to
//! a defined output. Dimension attributes keep "unknown" as `None`; fact
//! flags collapse "unknown" to `false`. The two must not be unified.

use crate::customer::Gender;

// ─── Dimension attributes ────────────────────────────────────────────────────

/// `seniorcitizen` → `is_senior_citizen`.
///
/// Trimmed and case-insensitive: "yes"/"1" → true, "no"/"0" → false,
/// anything else → unknown.
pub fn senior_citizen(raw: Option<&str>) -> Option<bool> {
  let value = raw?.trim();
  if value.eq_ignore_ascii_case("yes") || value == "1" {
    Some(true)
  } else if value.eq_ignore_ascii_case("no") || value == "0" {
    Some(false)
  } else {
    None
  }
}

/// `partner` / `dependents` → `has_partner` / `has_dependents`.
///
/// Exact match only. The empty string, a missing value and any literal not
/// listed below are all unknown.
pub fn dimension_flag(raw: Option<&str>) -> Option<bool> {
  match raw? {
    "Yes" => Some(true),
    "No" | "No internet service" | "No phone service" => Some(false),
    _ => None,
  }
}

/// Exact "Male"/"Female"; everything else, including other spellings, is
/// stored as NULL.
pub fn gender(raw: Option<&str>) -> Option<Gender> {
  match raw? {
    "Male" => Some(Gender::Male),
    "Female" => Some(Gender::Female),
    _ => None,
  }
}

// ─── Fact attributes ─────────────────────────────────────────────────────────

/// Service and churn flags. Only the exact literal "Yes" is true; "No",
/// "No internet service", "No phone service", "", missing and unrecognised
/// values are all false.
pub fn service_flag(raw: Option<&str>) -> bool { matches!(raw, Some("Yes")) }

/// Collapse "No internet service" into "No"; pass everything else through.
pub fn internet_service(raw: Option<&str>) -> Option<String> {
  match raw {
    Some("No internet service") => Some("No".to_owned()),
    other => other.map(str::to_owned),
  }
}

/// Parse a numeric literal. Non-numeric and non-finite input is missing.
pub fn coerce_number(raw: Option<&str>) -> Option<f64> {
  raw?
    .trim()
    .parse::<f64>()
    .ok()
    .filter(|v| v.is_finite())
}

/// Median of the given values, or `None` when there are none.
pub fn median(values: &[f64]) -> Option<f64> {
  if values.is_empty() {
    return None;
  }
  let mut sorted = values.to_vec();
  sorted.sort_by(f64::total_cmp);
  let mid = sorted.len() / 2;
  if sorted.len() % 2 == 0 {
    Some((sorted[mid - 1] + sorted[mid]) / 2.0)
  } else {
    Some(sorted[mid])
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn senior_citizen_variants() {
    assert_eq!(senior_citizen(Some("Yes")), Some(true));
    assert_eq!(senior_citizen(Some(" yes ")), Some(true));
    assert_eq!(senior_citizen(Some("1")), Some(true));
    assert_eq!(senior_citizen(Some("NO")), Some(false));
    assert_eq!(senior_citizen(Some("0")), Some(false));
    assert_eq!(senior_citizen(Some("maybe")), None);
    assert_eq!(senior_citizen(Some("")), None);
    assert_eq!(senior_citizen(None), None);
  }

  #[test]
  fn dimension_flag_table() {
    assert_eq!(dimension_flag(Some("Yes")), Some(true));
    assert_eq!(dimension_flag(Some("No")), Some(false));
    assert_eq!(dimension_flag(Some("No internet service")), Some(false));
    assert_eq!(dimension_flag(Some("No phone service")), Some(false));
    assert_eq!(dimension_flag(Some("")), None);
    assert_eq!(dimension_flag(None), None);
    // Outside the table: exact match only.
    assert_eq!(dimension_flag(Some("yes")), None);
    assert_eq!(dimension_flag(Some("1")), None);
  }

  #[test]
  fn gender_passes_through_known_values_only() {
    assert_eq!(gender(Some("Male")), Some(Gender::Male));
    assert_eq!(gender(Some("Female")), Some(Gender::Female));
    assert_eq!(gender(Some("")), None);
    assert_eq!(gender(None), None);
    assert_eq!(gender(Some("M")), None);
  }

  #[test]
  fn service_flag_defaults_to_false() {
    assert!(service_flag(Some("Yes")));
    assert!(!service_flag(Some("No")));
    assert!(!service_flag(Some("No internet service")));
    assert!(!service_flag(Some("No phone service")));
    assert!(!service_flag(Some("")));
    assert!(!service_flag(None));
    assert!(!service_flag(Some("garbage")));
  }

  #[test]
  fn internet_service_collapses_no_service() {
    assert_eq!(internet_service(Some("No internet service")).as_deref(), Some("No"));
    assert_eq!(internet_service(Some("Fiber optic")).as_deref(), Some("Fiber optic"));
    assert_eq!(internet_service(Some("DSL")).as_deref(), Some("DSL"));
    assert_eq!(internet_service(None), None);
  }

  #[test]
  fn coerce_number_rejects_garbage() {
    assert_eq!(coerce_number(Some("29.85")), Some(29.85));
    assert_eq!(coerce_number(Some(" 12 ")), Some(12.0));
    assert_eq!(coerce_number(Some("-5")), Some(-5.0));
    assert_eq!(coerce_number(Some("abc")), None);
    assert_eq!(coerce_number(Some(" ")), None);
    assert_eq!(coerce_number(Some("NaN")), None);
    assert_eq!(coerce_number(None), None);
  }

  #[test]
  fn median_even_and_odd() {
    assert_eq!(median(&[10.0, 20.0]), Some(15.0));
    assert_eq!(median(&[30.0, 10.0, 20.0]), Some(20.0));
    assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    assert_eq!(median(&[]), None);
  }
}
