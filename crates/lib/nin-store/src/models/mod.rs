//! Broker wire models.

pub mod binance;
pub mod groww;
