//! Core types, normalization rules and the storage trait for the churn
//! warehouse loader.
//!
//! This crate has no database or file-format dependencies.
//! Everything in here is pure: staging rows go in, dimension and fact rows
//! come out. Persistence lives behind [`store::WarehouseStore`].

pub mod customer;
pub mod error;
pub mod fact;
pub mod normalize;
pub mod reconcile;
pub mod report;
pub mod staging;
pub mod store;
pub mod transform;

pub use error::{Error, Result};
