use crate::core::markets::{safe_currency_code, MarketIndex};
use crate::core::parsing::{
    filter_by_since_limit, filter_by_symbol, iso8601, parse8601, safe_bool, safe_decimal,
    safe_integer, safe_string, safe_value,
};
use crate::core::types::{
    Balance, Fee, Market, MarketLimits, MarketPrecision, MinMax, Order, OrderStatus, Ticker, Trade,
};
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

fn precision_field(raw: &Value, key: &str) -> Option<u32> {
    safe_integer(raw, key).and_then(|p| u32::try_from(p).ok())
}

/// Smallest step for `places` decimals, i.e. `10^-places`
fn min_step(places: Option<u32>) -> Option<Decimal> {
    places.and_then(|p| Decimal::try_new(1, p).ok())
}

/// Convert one entry of `GET markets` into a [`Market`].
///
/// Returns `None` when the market name is not of the form `BASE-QUOTE`.
pub fn parse_market(raw: &Value) -> Option<Market> {
    let id = safe_string(raw, "name")?;
    let (base_id, quote_id) = match id.split('-').collect::<Vec<_>>().as_slice() {
        [base, quote] => ((*base).to_string(), (*quote).to_string()),
        _ => return None,
    };
    let base = safe_currency_code(Some(base_id.as_str()))?;
    let quote = safe_currency_code(Some(quote_id.as_str()))?;

    let precision = MarketPrecision {
        amount: precision_field(raw, "size_precision"),
        price: precision_field(raw, "price_precision"),
    };

    Some(Market {
        symbol: format!("{}/{}", base, quote),
        id,
        base,
        quote,
        base_id,
        quote_id,
        active: true,
        precision,
        limits: MarketLimits {
            amount: MinMax {
                min: min_step(precision.amount),
                max: None,
            },
            price: MinMax {
                min: min_step(precision.price),
                max: None,
            },
            cost: MinMax::default(),
        },
        info: raw.clone(),
    })
}

pub fn parse_markets(raw: &[Value]) -> Vec<Market> {
    raw.iter()
        .filter_map(|entry| {
            let market = parse_market(entry);
            if market.is_none() {
                warn!(exchange = "coinfalcon", "Skipping malformed market: {}", entry);
            }
            market
        })
        .collect()
}

/// Build a ticker from a `GET markets` entry. The exchange reports no
/// timestamp, so `timestamp` is the time of the fetch.
pub fn parse_ticker(raw: &Value, index: &MarketIndex, timestamp: i64) -> Ticker {
    let market_id = safe_string(raw, "name");
    let last = safe_decimal(raw, "last_price");

    Ticker {
        symbol: index.safe_symbol(market_id.as_deref(), None, Some("-")),
        timestamp: Some(timestamp),
        datetime: iso8601(Some(timestamp)),
        high: None,
        low: None,
        bid: None,
        bid_volume: None,
        ask: None,
        ask_volume: None,
        vwap: None,
        open: None,
        close: last,
        last,
        previous_close: None,
        change: safe_decimal(raw, "change_in_24h"),
        percentage: None,
        average: None,
        base_volume: None,
        quote_volume: safe_decimal(raw, "volume"),
        info: raw.clone(),
    }
}

pub fn parse_trade(raw: &Value, market: &Market) -> Trade {
    let timestamp = parse8601(safe_string(raw, "created_at").as_deref());
    let price = safe_decimal(raw, "price");
    let amount = safe_decimal(raw, "size");
    let cost = price
        .zip(amount)
        .and_then(|(price, amount)| price.checked_mul(amount))
        .map(|cost| cost.normalize());

    let fee = safe_decimal(raw, "fee").map(|cost| Fee {
        cost: Some(cost),
        currency: safe_currency_code(safe_string(raw, "fee_currency_code").as_deref()),
    });

    Trade {
        id: safe_string(raw, "id"),
        timestamp,
        datetime: iso8601(timestamp),
        symbol: Some(market.symbol.clone()),
        order: safe_string(raw, "order_id"),
        trade_type: None,
        side: safe_string(raw, "side"),
        taker_or_maker: None,
        price,
        amount,
        cost,
        fee,
        info: raw.clone(),
    }
}

pub fn parse_trades(
    raw: &[Value],
    market: &Market,
    since: Option<i64>,
    limit: Option<u32>,
) -> Vec<Trade> {
    let trades: Vec<Trade> = raw.iter().map(|entry| parse_trade(entry, market)).collect();
    let trades = filter_by_since_limit(trades, since, limit);
    filter_by_symbol(trades, Some(market.symbol.as_str()))
}

pub fn parse_order_status(status: &str) -> OrderStatus {
    match status {
        "fulfilled" => OrderStatus::Closed,
        "canceled" => OrderStatus::Canceled,
        "pending" | "open" | "partially_filled" => OrderStatus::Open,
        other => OrderStatus::from(other),
    }
}

/// Convert a CoinFalcon order.
///
/// `type` is the first `_`-separated token of `operation_type`
/// (`limit_order` becomes `limit`); `side` comes from `order_type`.
pub fn parse_order(raw: &Value, market: Option<&Market>, index: &MarketIndex) -> Order {
    let market_id = safe_string(raw, "market");
    let timestamp = parse8601(safe_string(raw, "created_at").as_deref());
    let price = safe_decimal(raw, "price");
    let amount = safe_decimal(raw, "size");
    let filled = safe_decimal(raw, "size_filled");

    let order_type = safe_string(raw, "operation_type")
        .and_then(|op| op.split('_').next().map(str::to_string));

    let remaining = amount
        .zip(filled)
        .and_then(|(amount, filled)| amount.checked_sub(filled));
    let cost = price
        .zip(filled)
        .and_then(|(price, filled)| price.checked_mul(filled))
        .map(|cost| cost.normalize());

    Order {
        id: safe_string(raw, "id"),
        client_order_id: None,
        timestamp,
        datetime: iso8601(timestamp),
        last_trade_timestamp: None,
        status: safe_string(raw, "status").map(|s| parse_order_status(&s)),
        symbol: index.safe_symbol(market_id.as_deref(), market, Some("-")),
        order_type,
        time_in_force: None,
        post_only: safe_bool(raw, "post_only"),
        side: safe_string(raw, "order_type"),
        price,
        stop_price: None,
        average: None,
        cost,
        amount,
        filled,
        remaining,
        trades: None,
        fee: None,
        info: raw.clone(),
    }
}

pub fn parse_orders(
    raw: &[Value],
    market: Option<&Market>,
    index: &MarketIndex,
    since: Option<i64>,
    limit: Option<u32>,
) -> Vec<Order> {
    let orders: Vec<Order> = raw
        .iter()
        .map(|entry| parse_order(entry, market, index))
        .collect();
    let orders = filter_by_since_limit(orders, since, limit);
    filter_by_symbol(orders, market.map(|m| m.symbol.as_str()))
}

/// Keep only orders whose raw status still rests on the book
pub fn filter_open(raw: Vec<Value>, statuses: &[&str]) -> Vec<Value> {
    raw.into_iter()
        .filter(|entry| {
            safe_string(entry, "status").is_some_and(|status| statuses.contains(&status.as_str()))
        })
        .collect()
}

/// Per-currency balances from `GET user/accounts`
pub fn parse_accounts(response: &Value) -> BTreeMap<String, Balance> {
    let Some(accounts) = safe_value(response, "data").and_then(Value::as_array) else {
        return BTreeMap::new();
    };

    accounts
        .iter()
        .filter_map(|account| {
            let code = safe_currency_code(safe_string(account, "currency_code").as_deref())?;
            let balance = Balance {
                free: safe_decimal(account, "available_balance"),
                used: safe_decimal(account, "hold_balance"),
                total: safe_decimal(account, "balance"),
            };
            Some((code, balance))
        })
        .collect()
}
