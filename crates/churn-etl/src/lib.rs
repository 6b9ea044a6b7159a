//! Transform-and-load stage of the customer-churn warehouse.
//!
//! Reads the two raw files into staging, reconciles customers into
//! `dim_customer`, and appends `fact_churn_events` over any
//! [`WarehouseStore`](churn_core::store::WarehouseStore).

pub mod error;
pub mod extract;
pub mod pipeline;
pub mod settings;
pub mod split;

pub use error::{Error, Result};
pub use pipeline::{Pipeline, RunSummary};
pub use settings::EtlConfig;
