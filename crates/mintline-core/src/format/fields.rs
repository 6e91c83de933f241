//! Field access policies for response rendering
//!
//! Every accessor is total: a missing or oddly-typed field yields a
//! placeholder, never a panic.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

pub const UNKNOWN_VENDOR: &str = "Unknown";
pub const NO_DATE: &str = "no date";
pub const NOT_AVAILABLE: &str = "N/A";
pub const UNKNOWN_AMOUNT: &str = "?";

/// Stand-in for absent payloads
pub static NULL: Value = Value::Null;

/// Array items of a list response. Accepts a bare array or an object
/// wrapping one under `items` or `data`.
pub fn items(data: &Value) -> &[Value] {
    if let Some(list) = data.as_array() {
        return list;
    }
    ["items", "data"]
        .iter()
        .find_map(|key| data.get(key).and_then(Value::as_array))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Scalar field as display text, if present
pub fn text_opt(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Scalar field as display text, or `fallback`
pub fn text(value: &Value, key: &str, fallback: &str) -> String {
    text_opt(value, key).unwrap_or_else(|| fallback.to_string())
}

/// Numeric field; numeric strings are accepted
pub fn number(value: &Value, key: &str) -> Option<f64> {
    match value.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Vendor display name: `vendor.name`, then `vendorName`, then "Unknown"
pub fn vendor_name(record: &Value) -> String {
    record
        .get("vendor")
        .and_then(|v| text_opt(v, "name"))
        .or_else(|| text_opt(record, "vendorName"))
        .unwrap_or_else(|| UNKNOWN_VENDOR.to_string())
}

/// Amount followed by its currency code, e.g. `42.50 USD`
pub fn amount_with_currency(record: &Value, amount_key: &str) -> String {
    let amount = text(record, amount_key, UNKNOWN_AMOUNT);
    match text_opt(record, "currency") {
        Some(currency) => format!("{} {}", amount, currency),
        None => amount,
    }
}

/// Date field rendered as `M/D/YYYY`, or `missing` when absent.
/// Unparseable values are shown as-is.
pub fn date(record: &Value, key: &str, missing: &str) -> String {
    match text_opt(record, key) {
        Some(raw) => format_date(&raw).unwrap_or(raw),
        None => missing.to_string(),
    }
}

fn format_date(raw: &str) -> Option<String> {
    let date = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()?;
    Some(date.format("%-m/%-d/%Y").to_string())
}

/// US-dollar formatting (`$1,234.56`, `-$12.00`) regardless of the record's
/// own currency code
pub fn usd(amount: f64) -> String {
    if !amount.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let cents = format!("{:.2}", amount.abs());
    let (whole, frac) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents != "0.00" { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, frac)
}

/// Currency field via [`usd`], "N/A" when missing
pub fn usd_field(record: &Value, key: &str) -> String {
    number(record, key)
        .map(usd)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Confidence score (0..1) as a whole percentage
pub fn percent(record: &Value, key: &str) -> String {
    number(record, key)
        .map(|score| format!("{}%", (score * 100.0).round() as i64))
        .unwrap_or_else(|| format!("{}%", UNKNOWN_AMOUNT))
}

/// Integer count, 0 when missing
pub fn count(record: &Value, key: &str) -> i64 {
    number(record, key).map(|n| n as i64).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_vendor_fallback_chain() {
        assert_eq!(
            vendor_name(&json!({"vendor": {"name": "Blue Bottle"}, "vendorName": "BB"})),
            "Blue Bottle"
        );
        assert_eq!(vendor_name(&json!({"vendorName": "Acme"})), "Acme");
        assert_eq!(vendor_name(&json!({"vendor": {}, "vendorName": "Acme"})), "Acme");
        assert_eq!(vendor_name(&json!({"vendor": null})), "Unknown");
        assert_eq!(vendor_name(&json!("not an object")), "Unknown");
    }

    #[test]
    fn test_dates() {
        let rec = json!({
            "a": "2024-01-05",
            "b": "2024-03-15T10:30:00Z",
            "c": "2024-12-01T08:00:00.000",
            "d": "sometime"
        });
        assert_eq!(date(&rec, "a", NO_DATE), "1/5/2024");
        assert_eq!(date(&rec, "b", NO_DATE), "3/15/2024");
        assert_eq!(date(&rec, "c", NO_DATE), "12/1/2024");
        assert_eq!(date(&rec, "d", NO_DATE), "sometime");
        assert_eq!(date(&rec, "missing", NO_DATE), "no date");
        assert_eq!(date(&rec, "missing", NOT_AVAILABLE), "N/A");
    }

    #[test]
    fn test_usd() {
        assert_eq!(usd(0.0), "$0.00");
        assert_eq!(usd(5.5), "$5.50");
        assert_eq!(usd(999.999), "$1,000.00");
        assert_eq!(usd(1234567.891), "$1,234,567.89");
        assert_eq!(usd(-42.1), "-$42.10");
        assert_eq!(usd(-0.001), "$0.00");
        assert_eq!(usd(f64::NAN), "N/A");
    }

    #[test]
    fn test_number_accepts_numeric_strings() {
        let rec = json!({"a": "12.50", "b": 3, "c": "x", "d": null});
        assert_eq!(number(&rec, "a"), Some(12.5));
        assert_eq!(number(&rec, "b"), Some(3.0));
        assert_eq!(number(&rec, "c"), None);
        assert_eq!(number(&rec, "d"), None);
        assert_eq!(usd_field(&rec, "d"), "N/A");
    }

    #[test]
    fn test_items_shapes() {
        assert_eq!(items(&json!([1, 2])).len(), 2);
        assert_eq!(items(&json!({"items": [1]})).len(), 1);
        assert_eq!(items(&json!({"data": [1, 2, 3]})).len(), 3);
        assert!(items(&json!({"other": 1})).is_empty());
        assert!(items(&Value::Null).is_empty());
    }

    #[test]
    fn test_amount_and_percent() {
        assert_eq!(
            amount_with_currency(&json!({"amount": 12.5, "currency": "EUR"}), "amount"),
            "12.5 EUR"
        );
        assert_eq!(amount_with_currency(&json!({}), "amount"), "?");
        assert_eq!(percent(&json!({"s": 0.876}), "s"), "88%");
        assert_eq!(percent(&json!({}), "s"), "?%");
        assert_eq!(count(&json!({"n": 4}), "n"), 4);
        assert_eq!(count(&json!({}), "n"), 0);
    }
}
