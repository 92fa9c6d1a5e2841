//! Tabitha — a browser-history intelligence engine.
//!
//! Consolidates raw browsing-history records into deduplicated,
//! time-bucketed, queryable entries and serves them to search, insights,
//! and table surfaces over a line-based RPC protocol.
//!
//! This library crate exposes all modules for use by the binaries and
//! integration tests.

pub mod app;
pub mod managers;
pub mod rpc_handler;
pub mod services;
pub mod types;
