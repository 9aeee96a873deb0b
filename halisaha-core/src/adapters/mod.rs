//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB for the durable KeyValueStore
//! - An in-memory map for tests and ephemeral sessions

pub mod duckdb;
pub mod memory;
