//! Canonical data model shared by nin-terminal crates.
//!
//! This crate defines the response envelope returned by every tool, the fixed
//! tool catalog, and the wire models of the broker APIs the tools call.

pub mod envelope;
pub mod models;
pub mod schema;

pub use envelope::*;
