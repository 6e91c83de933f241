//! Bespoke renderers for the Mintline operations
//!
//! Each renderer receives the envelope's `data` member (`null` when absent).

use serde_json::Value;

use super::fields::{
    amount_with_currency, count, date, items, number, percent, text, text_opt, usd, usd_field,
    vendor_name, NOT_AVAILABLE, NO_DATE, NULL, UNKNOWN_AMOUNT,
};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

fn bullet_list(data: &Value, empty: &str, line: impl Fn(&Value) -> String) -> String {
    let list = items(data);
    if list.is_empty() {
        return empty.to_string();
    }
    list.iter().map(line).collect::<Vec<_>>().join("\n")
}

// =============================================================================
// Receipts
// =============================================================================

pub fn list_receipts(data: &Value) -> String {
    bullet_list(data, "No receipts found.", |r| {
        format!(
            "• {}: {} - {} ({})",
            text(r, "id", UNKNOWN_AMOUNT),
            vendor_name(r),
            amount_with_currency(r, "totalAmount"),
            date(r, "purchaseDate", NO_DATE)
        )
    })
}

pub fn get_receipt(r: &Value) -> String {
    let mut out = String::new();
    out.push_str(&format!("Receipt: {}\n", text(r, "id", NOT_AVAILABLE)));
    out.push_str(&format!("Vendor: {}\n", vendor_name(r)));
    out.push_str(&format!("Date: {}\n", date(r, "purchaseDate", NOT_AVAILABLE)));
    out.push_str(&format!("Total: {}\n", amount_with_currency(r, "totalAmount")));

    let line_items = r.get("items").map(items).unwrap_or(&[]);
    if !line_items.is_empty() {
        out.push_str("\nLine Items:\n");
        for item in line_items {
            out.push_str(&format!(
                "  • {}: {}\n",
                text(item, "description", NOT_AVAILABLE),
                text(item, "totalPrice", UNKNOWN_AMOUNT)
            ));
        }
    }

    if let Some(matched) = r.get("matchedTransaction").filter(|m| m.is_object()) {
        out.push_str(&format!(
            "\nMatched to: {} - {}",
            text(matched, "id", NOT_AVAILABLE),
            text(matched, "description", NOT_AVAILABLE)
        ));
    }

    out
}

// =============================================================================
// Transactions & statements
// =============================================================================

pub fn list_transactions(data: &Value) -> String {
    bullet_list(data, "No transactions found.", |t| {
        format!(
            "• {}: {} - {} ({})",
            text(t, "id", UNKNOWN_AMOUNT),
            text(t, "description", NOT_AVAILABLE),
            amount_with_currency(t, "amount"),
            date(t, "transactionDate", NO_DATE)
        )
    })
}

pub fn get_transaction(t: &Value) -> String {
    [
        format!("Transaction: {}", text(t, "id", NOT_AVAILABLE)),
        format!("Description: {}", text(t, "description", NOT_AVAILABLE)),
        format!("Amount: {}", amount_with_currency(t, "amount")),
        format!("Date: {}", date(t, "transactionDate", NOT_AVAILABLE)),
        format!("Type: {}", text(t, "transactionType", NOT_AVAILABLE)),
    ]
    .join("\n")
}

pub fn list_statements(data: &Value) -> String {
    bullet_list(data, "No statements found.", |s| {
        format!(
            "• {}: {} - {} ({} transactions)",
            text(s, "id", UNKNOWN_AMOUNT),
            text(s, "institutionName", NOT_AVAILABLE),
            date(s, "statementDate", NO_DATE),
            count(s, "transactionCount")
        )
    })
}

// =============================================================================
// Matches
// =============================================================================

pub fn list_matches(data: &Value) -> String {
    bullet_list(data, "No matches found.", |m| {
        format!(
            "• {}: Receipt {} ↔ Transaction {} ({} confidence) [{}]",
            text(m, "id", UNKNOWN_AMOUNT),
            text(m, "receiptId", UNKNOWN_AMOUNT),
            text(m, "transactionId", UNKNOWN_AMOUNT),
            percent(m, "confidenceScore"),
            text(m, "status", "unknown")
        )
    })
}

fn match_id(data: &Value) -> Option<String> {
    text_opt(data, "id").or_else(|| data.get("match").and_then(|m| text_opt(m, "id")))
}

pub fn confirm_match(data: &Value) -> String {
    match match_id(data) {
        Some(id) => format!("Match {} confirmed successfully.", id),
        None => "Match confirmed successfully.".to_string(),
    }
}

pub fn reject_match(data: &Value) -> String {
    let mut out = match match_id(data) {
        Some(id) => format!("Match {} rejected.", id),
        None => "Match rejected.".to_string(),
    };
    let reason = text_opt(data, "rejectionReason").or_else(|| text_opt(data, "reason"));
    if let Some(reason) = reason {
        out.push_str(&format!(" Reason: {}", reason));
    }
    out
}

// =============================================================================
// Analytics
// =============================================================================

fn period_range(data: &Value) -> String {
    let period = data.get("period").unwrap_or(&NULL);
    format!(
        "{} to {}",
        text(period, "from", UNKNOWN_AMOUNT),
        text(period, "to", UNKNOWN_AMOUNT)
    )
}

/// Grouping of a spending response: explicit `groupBy`, else inferred
fn spending_grouping(data: &Value) -> String {
    if let Some(group) = text_opt(data, "groupBy") {
        return group;
    }
    if data.get("summary").is_some_and(Value::is_object) {
        return "total".to_string();
    }
    let first = items(data.get("data").unwrap_or(&NULL)).first();
    if first.is_some_and(|item| item.get("vendorName").is_some()) {
        "vendor".to_string()
    } else {
        "period".to_string()
    }
}

pub fn spending_summary(data: &Value) -> String {
    let grouping = spending_grouping(data);

    if let Some(s) = data.get("summary").filter(|s| s.is_object()) {
        if grouping == "total" {
            return [
                format!("Spending Summary ({})", period_range(data)),
                RULE.to_string(),
                format!("Total Spent: {}", usd_field(s, "totalAmount")),
                format!("Receipt Count: {}", count(s, "receiptCount")),
                format!("Average: {}", usd_field(s, "averageAmount")),
                format!(
                    "Min: {} | Max: {}",
                    usd_field(s, "minAmount"),
                    usd_field(s, "maxAmount")
                ),
            ]
            .join("\n");
        }
    }

    let rows = items(data.get("data").unwrap_or(&NULL));
    if rows.is_empty() {
        return "No spending data found for this period.".to_string();
    }

    let mut out = format!("Spending by {} ({})\n{}\n", grouping, period_range(data), RULE);
    for (i, row) in rows.iter().enumerate() {
        let label = if grouping == "vendor" {
            format!("{}. {}", i + 1, text(row, "vendorName", "Unknown"))
        } else {
            format!("• {}", text(row, "period", UNKNOWN_AMOUNT))
        };
        out.push_str(&format!(
            "{}: {} ({} receipts)\n",
            label,
            usd_field(row, "totalAmount"),
            count(row, "receiptCount")
        ));
    }
    out
}

pub fn top_vendors(data: &Value) -> String {
    let vendors = items(data.get("vendors").unwrap_or(data));
    if vendors.is_empty() {
        return "No vendor data found.".to_string();
    }

    let mut out = format!("Top Vendors by Spending\n{}\n", RULE);
    for (i, v) in vendors.iter().enumerate() {
        out.push_str(&format!(
            "{}. {}: {} ({} receipts)\n",
            i + 1,
            text(v, "name", "Unknown"),
            usd_field(v, "total"),
            count(v, "count")
        ));
    }
    out
}

/// One block per $100, capped at 20
fn trend_bar(total: f64) -> String {
    let blocks = (total / 100.0).round().clamp(0.0, 20.0) as usize;
    "█".repeat(blocks)
}

pub fn spending_trends(data: &Value) -> String {
    let trends = items(data.get("trends").unwrap_or(data));
    if trends.is_empty() {
        return "No trend data found.".to_string();
    }

    let mut out = format!("Monthly Spending Trends\n{}\n", RULE);
    for t in trends {
        let total = number(t, "total").unwrap_or(0.0);
        out.push_str(&format!(
            "{}: {} {}\n",
            text(t, "month", UNKNOWN_AMOUNT),
            usd(total),
            trend_bar(total)
        ));
    }
    out
}

pub fn unmatched_summary(data: &Value) -> String {
    let section = |key: &str| data.get(key).cloned().unwrap_or(Value::Null);
    let proposed = section("proposedMatches");
    let receipts = section("unmatchedReceipts");
    let transactions = section("unmatchedTransactions");
    let large = section("largeUnmatchedTransactions");
    let actions = section("actionItems");

    let mut out = format!("Action Items Summary\n{}\n\n", RULE);
    out.push_str(&format!(
        "📋 Proposed Matches to Review: {}\n",
        count(&proposed, "count")
    ));
    out.push_str(&format!(
        "📄 Unmatched Receipts: {} ({})\n",
        count(&receipts, "count"),
        usd_field(&receipts, "totalAmount")
    ));
    out.push_str(&format!(
        "💳 Unmatched Transactions: {} ({})\n",
        count(&transactions, "count"),
        usd_field(&transactions, "totalAmount")
    ));
    out.push_str(&format!(
        "⚠️  Large Transactions (>{}) without receipts: {}\n",
        usd_field(&large, "threshold"),
        count(&large, "count")
    ));

    if let Some(message) = text_opt(&actions, "message") {
        out.push('\n');
        out.push_str(&message);
    }
    out
}
