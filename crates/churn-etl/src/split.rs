//! Split the combined Telco churn export into the two raw input files.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::{
  Result,
  extract::{
    DEMOGRAPHIC_COLUMNS, DEMOGRAPHICS_FILE, SERVICE_COLUMNS, SERVICES_FILE,
    column_indexes,
  },
};

#[derive(Debug, Clone, Serialize)]
pub struct SplitSummary {
  pub rows:              usize,
  pub demographics_file: PathBuf,
  pub services_file:     PathBuf,
}

/// Read `source` and write [`DEMOGRAPHICS_FILE`] and [`SERVICES_FILE`] into
/// `out_dir`, each with exactly its declared columns. Existing files are
/// overwritten.
pub fn split_combined(source: &Path, out_dir: &Path) -> Result<SplitSummary> {
  let mut reader = csv::Reader::from_path(source)?;
  let headers = reader.headers()?.clone();
  let demographic_idx = column_indexes(&headers, &DEMOGRAPHIC_COLUMNS, source)?;
  let service_idx = column_indexes(&headers, &SERVICE_COLUMNS, source)?;

  let demographics_file = out_dir.join(DEMOGRAPHICS_FILE);
  let services_file = out_dir.join(SERVICES_FILE);
  let mut demographics = csv::Writer::from_path(&demographics_file)?;
  let mut services = csv::Writer::from_path(&services_file)?;
  demographics.write_record(DEMOGRAPHIC_COLUMNS)?;
  services.write_record(SERVICE_COLUMNS)?;

  let mut rows = 0;
  for record in reader.records() {
    let record = record?;
    demographics.write_record(demographic_idx.iter().map(|&i| &record[i]))?;
    services.write_record(service_idx.iter().map(|&i| &record[i]))?;
    rows += 1;
  }
  demographics.flush()?;
  services.flush()?;

  info!(source = %source.display(), rows, "split combined file");
  Ok(SplitSummary { rows, demographics_file, services_file })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::extract::{extract_demographics, extract_services};

  const COMBINED: &str = "\
customerID,gender,SeniorCitizen,Partner,Dependents,tenure,PhoneService,MultipleLines,InternetService,OnlineSecurity,OnlineBackup,DeviceProtection,TechSupport,StreamingTV,StreamingMovies,Contract,PaperlessBilling,PaymentMethod,MonthlyCharges,TotalCharges,Churn
7590-VHVEG,Female,0,Yes,No,1,No,No phone service,DSL,No,Yes,No,No,No,No,Month-to-month,Yes,Electronic check,29.85,29.85,No
5575-GNVDE,Male,0,No,No,34,Yes,No,DSL,Yes,No,Yes,No,No,No,One year,No,Mailed check,56.95,1889.5,No
";

  #[test]
  fn split_writes_both_files() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("combined.csv");
    std::fs::write(&source, COMBINED).unwrap();

    let summary = split_combined(&source, dir.path()).unwrap();
    assert_eq!(summary.rows, 2);

    let header = std::fs::read_to_string(&summary.demographics_file).unwrap();
    assert!(header.starts_with("customerID,gender,SeniorCitizen,Partner,Dependents\n"));

    let demographics = extract_demographics(&summary.demographics_file).unwrap();
    assert_eq!(demographics.len(), 2);
    assert_eq!(demographics[1].customer_id, "5575-GNVDE");
    assert_eq!(demographics[1].gender.as_deref(), Some("Male"));

    let services = extract_services(&summary.services_file).unwrap();
    assert_eq!(services.len(), 2);
    assert_eq!(services[0].multiple_lines.as_deref(), Some("No phone service"));
    assert_eq!(services[1].tenure.as_deref(), Some("34"));
    assert_eq!(services[1].total_charges.as_deref(), Some("1889.5"));
  }

  #[test]
  fn split_requires_all_columns() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("combined.csv");
    std::fs::write(&source, "customerID,gender\nC1,Male\n").unwrap();
    assert!(split_combined(&source, dir.path()).is_err());
  }
}
