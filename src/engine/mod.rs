//! Accounting Engine Module
//! Contains the position accumulator

pub mod accumulator;

pub use accumulator::{accumulate, AccumulateError, AVG_PRICE_SCALE};
