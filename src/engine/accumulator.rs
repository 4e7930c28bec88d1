//! Position Accumulation with Weighted Average Cost
//! Folds an ordered trade stream into per-symbol net quantity and cost basis

use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;
use thiserror::Error;

use crate::domain::{Position, Side, Trade};

/// Fixed fractional scale of the weighted-average price.
pub const AVG_PRICE_SCALE: u32 = 8;

#[derive(Error, Debug, PartialEq)]
pub enum AccumulateError {
    #[error("sell of {requested} exceeds held quantity {held} for {symbol}")]
    Oversell {
        symbol: String,
        held: i64,
        requested: i64,
    },
    #[error("buy of {requested} overflows held quantity {held} for {symbol}")]
    QuantityOverflow {
        symbol: String,
        held: i64,
        requested: i64,
    },
}

/// Fold trades, in input order, into a symbol-keyed map of positions.
///
/// Pure and single-pass: no I/O, no shared state, linear in trade count.
/// Trades are trusted to arrive oldest-first; no re-sort by trade time is
/// performed, so re-ordering the input changes the result.
///
/// Buys blend the average price: `(avg * qty + price * trade_qty) / new_qty`,
/// computed exactly and rounded to [`AVG_PRICE_SCALE`] digits half-up only at
/// the division. Sells reduce quantity and leave the average untouched, even
/// when the position goes flat; realized P&L is a downstream concern.
///
/// A sell that would drive any symbol's quantity negative aborts the whole
/// run with [`AccumulateError::Oversell`]; a buy that would overflow the
/// quantity counter aborts with [`AccumulateError::QuantityOverflow`]. The
/// caller gets either a complete mapping or an error, never a partial one.
pub fn accumulate<'a, I>(trades: I) -> Result<HashMap<String, Position>, AccumulateError>
where
    I: IntoIterator<Item = &'a Trade>,
{
    let mut positions: HashMap<String, Position> = HashMap::new();

    for trade in trades {
        let symbol = trade.symbol();
        let (held, avg) = positions
            .get(symbol)
            .map(|p| (p.net_quantity, p.avg_price))
            .unwrap_or((0, Decimal::ZERO));

        let position = match trade.side() {
            Side::Buy => {
                let new_qty = held.checked_add(trade.quantity()).ok_or_else(|| {
                    AccumulateError::QuantityOverflow {
                        symbol: symbol.to_string(),
                        held,
                        requested: trade.quantity(),
                    }
                })?;
                let total_cost =
                    avg * Decimal::from(held) + trade.price() * Decimal::from(trade.quantity());
                let mut new_avg = (total_cost / Decimal::from(new_qty)).round_dp_with_strategy(
                    AVG_PRICE_SCALE,
                    RoundingStrategy::MidpointAwayFromZero,
                );
                // Fixed scale of 8, padded: "150.00000000", never "150.00".
                new_avg.rescale(AVG_PRICE_SCALE);
                Position::new(trade.instrument().clone(), new_qty, new_avg)
            }
            Side::Sell => {
                let new_qty = held - trade.quantity();
                if new_qty < 0 {
                    return Err(AccumulateError::Oversell {
                        symbol: symbol.to_string(),
                        held,
                        requested: trade.quantity(),
                    });
                }
                Position::new(trade.instrument().clone(), new_qty, avg)
            }
        };

        positions.insert(symbol.to_string(), position);
    }

    Ok(positions)
}
