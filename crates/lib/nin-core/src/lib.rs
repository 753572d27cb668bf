//! Core services for nin-terminal.
//!
//! This crate turns typed tool requests into response envelopes. It owns the
//! broker clients (Groww, Binance), the in-process market desk that backs the
//! analysis tools, the markdown formatters, and the gateway that dispatches a
//! request to its handler.

pub mod control;
pub mod format;
pub mod gateway;
pub mod market;
pub mod providers;
pub mod request;
