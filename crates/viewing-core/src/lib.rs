//! Core types for viewing-history statistics.
//!
//! Holds the data model shared by the reader, the aggregation pipeline and
//! the report driver, together with the field-level parsers that turn raw
//! export strings into typed values.

pub mod data_processors;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{Result, StatsError};
