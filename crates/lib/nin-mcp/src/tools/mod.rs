//! MCP tool modules.
//!
//! Tools are grouped by backend: the in-process market desk, the Groww
//! trading API and Binance.

pub mod analysis;
pub mod binance;
pub mod groww;
