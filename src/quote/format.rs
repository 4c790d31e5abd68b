//! Text formatting for quote results: currency and the quote-form query string.

use serde_json::Value;

/// Shown instead of a price when the service finds no matching stones.
pub const NO_MATCH_MESSAGE: &str = "Your stone does not match the criteria of any stones in our database. \
Please contact us using the form below for a quote.";

/// Format a dollar amount with thousands separators.
///
/// Whole amounts print without cents (`$1,200`); anything else keeps two
/// decimals (`$1,200.50`).
pub fn format_currency(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let cents = (amount.abs() * 100.0).round() as u64;
    let dollars = group_thousands(cents / 100);
    match cents % 100 {
        0 => format!("{sign}${dollars}"),
        rem => format!("{sign}${dollars}.{rem:02}"),
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Flatten normalized attributes into `key=value&...` and append `price_range`.
///
/// One level of nesting is expanded as `parent_child=value`; arrays use the
/// element index as the child key. Anything deeper is written as compact
/// JSON. Null values are left out. Values are not percent-encoded: the quote
/// form reads them as-is.
pub fn query_string(attributes: &Value, price_range: &str) -> String {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for (key, value) in entries(attributes) {
        match value {
            Value::Null => {}
            Value::Object(_) | Value::Array(_) => {
                for (child, nested) in entries(value) {
                    if !nested.is_null() {
                        pairs.push((format!("{key}_{child}"), scalar_text(nested)));
                    }
                }
            }
            _ => pairs.push((key, scalar_text(value))),
        }
    }
    pairs.push(("price_range".to_string(), price_range.to_string()));

    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

fn entries(value: &Value) -> Vec<(String, &Value)> {
    match value {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        Value::Array(items) => items.iter().enumerate().map(|(i, v)| (i.to_string(), v)).collect(),
        _ => Vec::new(),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{f:.0}"),
            _ => n.to_string(),
        },
        Value::Object(_) | Value::Array(_) => value.to_string(),
    }
}

/// Join the form URL and a query string.
pub fn form_url(base: &str, query: &str) -> String {
    let sep = if base.contains('?') { '&' } else { '?' };
    format!("{base}{sep}{query}")
}
