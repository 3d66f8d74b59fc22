//! Lenient accessors over raw exchange JSON and the shared entity parsers.
//!
//! None of the `safe_*` helpers fail: a missing key, a `null` or a value of the
//! wrong shape all come back as `None`.

use crate::core::types::{Balance, Balances, OrderBook, OrderBookEntry, Timestamped};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::str::FromStr;

pub fn safe_value<'a>(data: &'a Value, key: &str) -> Option<&'a Value> {
    data.get(key).filter(|v| !v.is_null())
}

/// Strings are returned as-is, numbers and booleans in their JSON spelling
pub fn safe_string(data: &Value, key: &str) -> Option<String> {
    safe_value(data, key).and_then(value_to_string)
}

pub fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn safe_integer(data: &Value, key: &str) -> Option<i64> {
    let value = safe_value(data, key)?;
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s
            .parse::<i64>()
            .ok()
            .or_else(|| s.parse::<f64>().ok().map(|f| f as i64)),
        _ => None,
    }
}

pub fn safe_bool(data: &Value, key: &str) -> Option<bool> {
    match safe_value(data, key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

pub fn safe_decimal(data: &Value, key: &str) -> Option<Decimal> {
    safe_value(data, key).and_then(value_to_decimal)
}

pub fn value_to_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => parse_decimal(s),
        // JSON numbers keep their shortest textual form, so go through it
        // rather than f64 to avoid binary drift
        Value::Number(n) => parse_decimal(&n.to_string()),
        _ => None,
    }
}

pub fn parse_decimal(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Parse an ISO 8601 / RFC 3339 timestamp into epoch milliseconds
pub fn parse8601(timestamp: Option<&str>) -> Option<i64> {
    timestamp
        .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
        .map(|dt| dt.timestamp_millis())
}

/// Format epoch milliseconds as `YYYY-MM-DDTHH:MM:SS.mmmZ`
pub fn iso8601(timestamp: Option<i64>) -> Option<String> {
    timestamp
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string())
}

/// Sort ascending by timestamp, drop entries older than `since`, then keep the
/// first `limit` entries.
pub fn filter_by_since_limit<T: Timestamped>(
    mut items: Vec<T>,
    since: Option<i64>,
    limit: Option<u32>,
) -> Vec<T> {
    items.sort_by_key(|item| item.timestamp());

    if let Some(since) = since {
        items.retain(|item| item.timestamp().is_some_and(|ts| ts >= since));
    }

    if let Some(limit) = limit {
        items.truncate(limit as usize);
    }

    items
}

pub fn filter_by_symbol<T: Timestamped>(items: Vec<T>, symbol: Option<&str>) -> Vec<T> {
    match symbol {
        Some(symbol) => items
            .into_iter()
            .filter(|item| item.symbol() == Some(symbol))
            .collect(),
        None => items,
    }
}

fn parse_book_side(side: Option<&Value>, price_key: &str, amount_key: &str) -> Vec<OrderBookEntry> {
    let Some(levels) = side.and_then(Value::as_array) else {
        return Vec::new();
    };

    levels
        .iter()
        .filter_map(|level| {
            let (price, amount) = match level {
                Value::Array(pair) => {
                    let price_idx = price_key.parse::<usize>().unwrap_or(0);
                    let amount_idx = amount_key.parse::<usize>().unwrap_or(1);
                    (
                        pair.get(price_idx).and_then(value_to_decimal),
                        pair.get(amount_idx).and_then(value_to_decimal),
                    )
                }
                Value::Object(_) => (
                    safe_decimal(level, price_key),
                    safe_decimal(level, amount_key),
                ),
                _ => (None, None),
            };
            Some(OrderBookEntry {
                price: price?,
                amount: amount?,
            })
        })
        .collect()
}

/// Build an order book from a payload holding bid and ask levels.
///
/// Levels may be objects (looked up by `price_key`/`amount_key`) or positional
/// arrays (keys parsed as indices). The full depth is kept.
pub fn parse_order_book(
    data: &Value,
    symbol: Option<String>,
    timestamp: Option<i64>,
    bids_key: &str,
    asks_key: &str,
    price_key: &str,
    amount_key: &str,
) -> OrderBook {
    let mut bids = parse_book_side(data.get(bids_key), price_key, amount_key);
    let mut asks = parse_book_side(data.get(asks_key), price_key, amount_key);

    bids.sort_by_key(|entry| Reverse(entry.price));
    asks.sort_by_key(|entry| entry.price);

    OrderBook {
        symbol,
        bids,
        asks,
        timestamp,
        datetime: iso8601(timestamp),
        nonce: None,
    }
}

/// Fill in whichever of free/used/total is missing when the other two are known.
/// A result that overflows `Decimal` stays `None`.
pub fn complete_balance(balance: Balance) -> Balance {
    let Balance { free, used, total } = balance;
    match (free, used, total) {
        (Some(free), Some(used), None) => Balance {
            free: Some(free),
            used: Some(used),
            total: free.checked_add(used),
        },
        (Some(free), None, Some(total)) => Balance {
            free: Some(free),
            used: total.checked_sub(free),
            total: Some(total),
        },
        (None, Some(used), Some(total)) => Balance {
            free: total.checked_sub(used),
            used: Some(used),
            total: Some(total),
        },
        _ => balance,
    }
}

pub fn parse_balance(info: Value, accounts: BTreeMap<String, Balance>) -> Balances {
    Balances {
        info,
        currencies: accounts
            .into_iter()
            .map(|(code, balance)| (code, complete_balance(balance)))
            .collect(),
    }
}
