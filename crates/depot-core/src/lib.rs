//! Core types and trait definitions for the Depot asset tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod asset;
pub mod error;
pub mod export;
pub mod health;
pub mod import;
pub mod ledger;
pub mod query;
pub mod scope;
pub mod stats;
pub mod store;
pub mod user;

pub use error::{Error, Result};
