//! Love Sandwiches — market sales ledger automation
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod input;
pub mod ledger;
pub mod calc;
pub mod engine;
