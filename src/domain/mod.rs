//! Domain Value Objects
//! Instruments, trades, and positions with validation at construction

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("symbol cannot be blank")]
    BlankSymbol,
    #[error("quantity must be greater than 0, got {0}")]
    NonPositiveQuantity(i64),
    #[error("price must be greater than 0, got {0}")]
    NonPositivePrice(Decimal),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstrumentType {
    Equity,
    Etf,
    Bond,
    Crypto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

/// A tradable name. The symbol is the unique lookup key everywhere downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    symbol: String,
    instrument_type: InstrumentType,
}

impl Instrument {
    pub fn new(symbol: impl Into<String>, instrument_type: InstrumentType) -> Result<Self, ValidationError> {
        let symbol = symbol.into();
        if symbol.trim().is_empty() {
            return Err(ValidationError::BlankSymbol);
        }
        Ok(Self { symbol, instrument_type })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn instrument_type(&self) -> InstrumentType {
        self.instrument_type
    }
}

/// One executed trade. Immutable once constructed; `new` rejects anything
/// the accumulator is not prepared to see.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    instrument: Instrument,
    side: Side,
    quantity: i64,
    price: Decimal,
    trade_time: DateTime<Utc>,
    portfolio_id: Uuid,
}

impl Trade {
    pub fn new(
        instrument: Instrument,
        side: Side,
        quantity: i64,
        price: Decimal,
        trade_time: DateTime<Utc>,
        portfolio_id: Uuid,
    ) -> Result<Self, ValidationError> {
        if quantity <= 0 {
            return Err(ValidationError::NonPositiveQuantity(quantity));
        }
        if price <= Decimal::ZERO {
            return Err(ValidationError::NonPositivePrice(price));
        }
        Ok(Self {
            instrument,
            side,
            quantity,
            price,
            trade_time,
            portfolio_id,
        })
    }

    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    pub fn symbol(&self) -> &str {
        self.instrument.symbol()
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Used only for caller-side ordering; the accumulator never sorts by it.
    pub fn trade_time(&self) -> DateTime<Utc> {
        self.trade_time
    }

    pub fn portfolio_id(&self) -> Uuid {
        self.portfolio_id
    }
}

/// Net holding for one instrument. Derived value: every accumulator update
/// produces a fresh `Position` that replaces the prior map entry, so a
/// half-applied trade can never be observed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub instrument: Instrument,
    pub net_quantity: i64,
    /// Weighted-average acquisition price at 8-digit scale. Meaningful while
    /// `net_quantity > 0`; retained unchanged once the position is flat.
    pub avg_price: Decimal,
}

impl Position {
    pub fn new(instrument: Instrument, net_quantity: i64, avg_price: Decimal) -> Self {
        Self {
            instrument,
            net_quantity,
            avg_price,
        }
    }
}
