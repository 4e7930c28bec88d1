//! TradeOps Core - Position Accounting Service
//! Derives per-instrument net positions and weighted-average cost basis
//! from an ordered stream of executed trades, using exact decimal arithmetic.

pub mod api;
pub mod config;
pub mod domain;
pub mod engine;
pub mod observability;
