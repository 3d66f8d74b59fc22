use rust_decimal::{Decimal, RoundingStrategy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Drop digits past the precision
    Truncate,
    /// Round half away from zero
    Round,
}

/// Format `value` to at most `places` decimals, without trailing zeros
pub fn decimal_to_precision(value: Decimal, rounding: Rounding, places: Option<u32>) -> String {
    let rounded = match places {
        Some(places) => {
            let strategy = match rounding {
                Rounding::Truncate => RoundingStrategy::ToZero,
                Rounding::Round => RoundingStrategy::MidpointAwayFromZero,
            };
            value.round_dp_with_strategy(places, strategy)
        }
        None => value,
    };
    rounded.normalize().to_string()
}

pub fn amount_to_precision(amount: Decimal, places: Option<u32>) -> String {
    decimal_to_precision(amount, Rounding::Truncate, places)
}

pub fn price_to_precision(price: Decimal, places: Option<u32>) -> String {
    decimal_to_precision(price, Rounding::Round, places)
}
