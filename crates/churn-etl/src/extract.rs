//! Flat-file extraction into staging datasets.
//!
//! Columns are located by their Telco header names, so column order in the
//! file does not matter. Empty fields become `None`; nothing else is
//! trimmed or interpreted here.

use std::{
  fs::File,
  io,
  path::{Path, PathBuf},
};

use churn_core::staging::{DemographicRow, ServiceRow};
use tracing::{info, warn};

use crate::{Error, Result};

/// Default file names written by [`crate::split`] and read by `run`.
pub const DEMOGRAPHICS_FILE: &str = "customer_demographics_raw.csv";
pub const SERVICES_FILE: &str = "customer_services_raw.csv";

/// Header names of the raw demographics file, in output order.
pub const DEMOGRAPHIC_COLUMNS: [&str; 5] =
  ["customerID", "gender", "SeniorCitizen", "Partner", "Dependents"];

/// Header names of the raw services file, in output order.
pub const SERVICE_COLUMNS: [&str; 17] = [
  "customerID",
  "PhoneService",
  "MultipleLines",
  "InternetService",
  "OnlineSecurity",
  "OnlineBackup",
  "DeviceProtection",
  "TechSupport",
  "StreamingTV",
  "StreamingMovies",
  "Contract",
  "PaperlessBilling",
  "PaymentMethod",
  "MonthlyCharges",
  "TotalCharges",
  "tenure",
  "Churn",
];

/// Read the demographics file. A file that does not exist yields an empty
/// dataset.
pub fn extract_demographics(path: &Path) -> Result<Vec<DemographicRow>> {
  let rows = read_columns(path, DEMOGRAPHIC_COLUMNS)?
    .into_iter()
    .map(|[customer_id, gender, senior_citizen, partner, dependents]| DemographicRow {
      customer_id: customer_id.unwrap_or_default(),
      gender,
      senior_citizen,
      partner,
      dependents,
    })
    .collect();
  Ok(rows)
}

/// Read the services file. A file that does not exist yields an empty
/// dataset.
pub fn extract_services(path: &Path) -> Result<Vec<ServiceRow>> {
  let rows = read_columns(path, SERVICE_COLUMNS)?
    .into_iter()
    .map(
      |[
        customer_id,
        phone_service,
        multiple_lines,
        internet_service,
        online_security,
        online_backup,
        device_protection,
        tech_support,
        streaming_tv,
        streaming_movies,
        contract,
        paperless_billing,
        payment_method,
        monthly_charges,
        total_charges,
        tenure,
        churn,
      ]| ServiceRow {
        customer_id: customer_id.unwrap_or_default(),
        phone_service,
        multiple_lines,
        internet_service,
        online_security,
        online_backup,
        device_protection,
        tech_support,
        streaming_tv,
        streaming_movies,
        contract,
        paperless_billing,
        payment_method,
        monthly_charges,
        total_charges,
        tenure,
        churn,
      },
    )
    .collect();
  Ok(rows)
}

/// Read the named columns of every record in `path`.
fn read_columns<const N: usize>(
  path: &Path,
  columns: [&'static str; N],
) -> Result<Vec<[Option<String>; N]>> {
  let file = match File::open(path) {
    Ok(file) => file,
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      warn!(path = %path.display(), "input file not found, extracting nothing");
      return Ok(Vec::new());
    }
    Err(e) => return Err(e.into()),
  };

  let mut reader = csv::Reader::from_reader(file);
  let indexes = column_indexes(reader.headers()?, &columns, path)?;

  let mut rows = Vec::new();
  for record in reader.records() {
    let record = record?;
    rows.push(std::array::from_fn(|i| {
      record
        .get(indexes[i])
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
    }));
  }

  info!(path = %path.display(), rows = rows.len(), "extracted");
  Ok(rows)
}

/// Position of each of `columns` in `headers`.
pub(crate) fn column_indexes(
  headers: &csv::StringRecord,
  columns: &[&'static str],
  file: &Path,
) -> Result<Vec<usize>> {
  columns
    .iter()
    .map(|&column| {
      headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| Error::MissingColumn { file: PathBuf::from(file), column })
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use super::*;

  fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    let mut f = File::create(&path).unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    path
  }

  #[test]
  fn demographics_by_header_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
      dir.path(),
      "d.csv",
      "Dependents,customerID,gender,SeniorCitizen,Partner\n\
       No,7590-VHVEG,Female,0,Yes\n\
       ,5575-GNVDE,,1,\n",
    );

    let rows = extract_demographics(&path).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], DemographicRow {
      customer_id:    "7590-VHVEG".into(),
      gender:         Some("Female".into()),
      senior_citizen: Some("0".into()),
      partner:        Some("Yes".into()),
      dependents:     Some("No".into()),
    });
    assert_eq!(rows[1].gender, None);
    assert_eq!(rows[1].partner, None);
    assert_eq!(rows[1].dependents, None);
  }

  #[test]
  fn services_keep_raw_text() {
    let dir = tempfile::tempdir().unwrap();
    let header = SERVICE_COLUMNS.join(",");
    let path = write(
      dir.path(),
      "s.csv",
      &format!(
        "{header}\n3668-QPYBK,Yes,No,DSL,Yes,Yes,No,No,No,No,Month-to-month,Yes,Mailed check,53.85, ,2,Yes\n"
      ),
    );

    let rows = extract_services(&path).unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.customer_id, "3668-QPYBK");
    assert_eq!(row.internet_service.as_deref(), Some("DSL"));
    assert_eq!(row.payment_method.as_deref(), Some("Mailed check"));
    assert_eq!(row.monthly_charges.as_deref(), Some("53.85"));
    // Whitespace is not empty; coercion deals with it later.
    assert_eq!(row.total_charges.as_deref(), Some(" "));
    assert_eq!(row.tenure.as_deref(), Some("2"));
    assert_eq!(row.churn.as_deref(), Some("Yes"));
  }

  #[test]
  fn missing_file_extracts_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let rows = extract_services(&dir.path().join("absent.csv")).unwrap();
    assert!(rows.is_empty());
  }

  #[test]
  fn missing_column_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "d.csv", "customerID,gender\nC1,Male\n");
    let err = extract_demographics(&path).unwrap_err();
    assert!(matches!(err, Error::MissingColumn { column: "SeniorCitizen", .. }));
  }
}
