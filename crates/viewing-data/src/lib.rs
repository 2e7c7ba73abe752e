//! Data layer for viewing-history statistics.
//!
//! Responsible for locating and decoding export CSV files, normalising rows
//! into watch events, and computing the aggregates, rankings and
//! distributions that make up the result bundle.

pub mod aggregator;
pub mod analysis;
pub mod distribution;
pub mod normalizer;
pub mod ranker;
pub mod reader;

pub use viewing_core as core;
