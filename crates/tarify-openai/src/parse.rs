//! Lenient parsing of the model reply into an [`InvoiceRecord`].
//!
//! The envelope is strict: the reply must be a JSON object, otherwise the
//! whole call fails. The fields inside are lenient: a key that is missing,
//! null, or of an unusable type becomes `None` in the record instead of
//! failing the parse. Numbers additionally accept numeric strings in both
//! "1,234.56" and "1.234,56" styles, and dates accept the layouts commonly
//! printed on invoices.

use jiff::civil::Date;
use serde_json::Value;
use tarify_core::{ChargeLine, ConsumptionEntry, InvoiceRecord};

use crate::TRACING_TARGET_PARSE;
use crate::error::{Error, Result};

/// Date layouts accepted in addition to ISO.
const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d"];

/// Parse the model reply into an invoice record.
///
/// # Errors
///
/// Returns [`Error::MalformedResponse`] if the reply is not a JSON object.
/// Field-level problems never fail the parse.
pub fn parse_record(content: &str) -> Result<InvoiceRecord> {
    let value: Value = serde_json::from_str(content.trim())
        .map_err(|e| Error::malformed_response(format!("reply is not valid JSON: {}", e)))?;

    let object = value
        .as_object()
        .ok_or_else(|| Error::malformed_response("reply is not a JSON object"))?;

    let record = InvoiceRecord {
        customer_name: coerce_string(object.get("customer_name")),
        customer_id: coerce_string(object.get("customer_id")),
        customer_address: coerce_string(object.get("customer_address")),
        invoice_number: coerce_string(object.get("invoice_number")),
        invoice_date: coerce_date(object.get("invoice_date")),
        period_start: coerce_date(object.get("period_start")),
        period_end: coerce_date(object.get("period_end")),
        meter_number: coerce_string(object.get("meter_number")),
        previous_reading: coerce_number(object.get("previous_reading")),
        current_reading: coerce_number(object.get("current_reading")),
        consumption: coerce_number(object.get("consumption")),
        subtotal: coerce_number(object.get("subtotal")),
        taxes: coerce_number(object.get("taxes")),
        total: coerce_number(object.get("total")),
        currency: coerce_string(object.get("currency")),
        charges: coerce_charges(object.get("charges")),
        history: coerce_history(object.get("history")),
    };

    if record.is_empty() {
        tracing::warn!(
            target: TRACING_TARGET_PARSE,
            "Reply parsed but no field could be extracted"
        );
    }

    Ok(record)
}

/// String coercion: strings pass through trimmed, numbers render as text.
fn coerce_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Number coercion: JSON numbers pass through, numeric strings are parsed.
fn coerce_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

/// Parse a printed amount, tolerating currency symbols, spaces, and both
/// decimal-comma and decimal-point conventions.
fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        // Both separators: the rightmost one is the decimal separator.
        (Some(comma), Some(dot)) if comma > dot => {
            cleaned.replace('.', "").replace(',', ".")
        }
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        // Comma only: decimal separator unless it groups exactly three
        // trailing digits ("1,234" reads as one thousand two hundred
        // thirty-four).
        (Some(comma), None) => {
            let trailing = cleaned.len() - comma - 1;
            if trailing == 3 && cleaned.matches(',').count() == 1 && comma > 0 {
                cleaned.replace(',', "")
            } else if cleaned.matches(',').count() > 1 {
                cleaned.replace(',', "")
            } else {
                cleaned.replace(',', ".")
            }
        }
        _ => cleaned,
    };

    normalized.parse().ok()
}

/// Date coercion: ISO first, then the printed layouts.
fn coerce_date(value: Option<&Value>) -> Option<Date> {
    let Value::String(s) = value? else {
        return None;
    };
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(date) = s.parse::<Date>() {
        return Some(date);
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| Date::strptime(format, s).ok())
}

/// Charge-line coercion: entries without a concept are dropped.
fn coerce_charges(value: Option<&Value>) -> Vec<ChargeLine> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let object = item.as_object()?;
            let concept = coerce_string(object.get("concept")).filter(|c| !c.is_empty())?;
            Some(ChargeLine {
                concept,
                quantity: coerce_number(object.get("quantity")),
                unit_price: coerce_number(object.get("unit_price")),
                amount: coerce_number(object.get("amount")),
            })
        })
        .collect()
}

/// History coercion: entries without a period label are dropped.
fn coerce_history(value: Option<&Value>) -> Vec<ConsumptionEntry> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let object = item.as_object()?;
            let period = coerce_string(object.get("period")).filter(|p| !p.is_empty())?;
            Some(ConsumptionEntry {
                period,
                consumption: coerce_number(object.get("consumption")),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_record_parses() {
        let reply = r#"{
            "customer_name": "Ana Torres",
            "customer_id": "ES0021-4455",
            "customer_address": "Calle Mayor 12, Madrid",
            "invoice_number": "FE-2024-0193",
            "invoice_date": "2024-03-05",
            "period_start": "2024-02-01",
            "period_end": "2024-02-29",
            "meter_number": "MTR-88210",
            "previous_reading": 18250,
            "current_reading": 18497,
            "consumption": 247,
            "subtotal": 52.10,
            "taxes": 10.94,
            "total": 63.04,
            "currency": "EUR",
            "charges": [
                {"concept": "Energy consumed", "quantity": 247, "unit_price": 0.152, "amount": 37.54},
                {"concept": "Power term", "quantity": null, "unit_price": null, "amount": 14.56}
            ],
            "history": [
                {"period": "2024-01", "consumption": 231},
                {"period": "2023-12", "consumption": 260}
            ]
        }"#;

        let record = parse_record(reply).expect("valid reply");
        assert_eq!(record.customer_name.as_deref(), Some("Ana Torres"));
        assert_eq!(record.invoice_number.as_deref(), Some("FE-2024-0193"));
        assert_eq!(
            record.invoice_date,
            Some(jiff::civil::date(2024, 3, 5))
        );
        assert_eq!(record.total, Some(63.04));
        assert_eq!(record.charges.len(), 2);
        assert_eq!(record.history.len(), 2);
        assert_eq!(record.charges[1].quantity, None);
    }

    #[test]
    fn test_missing_and_mistyped_fields_become_absent() {
        let reply = r#"{
            "invoice_number": "A-1",
            "total": "not a number",
            "invoice_date": {"unexpected": "object"},
            "charges": "not an array"
        }"#;

        let record = parse_record(reply).expect("valid reply");
        assert_eq!(record.invoice_number.as_deref(), Some("A-1"));
        assert_eq!(record.total, None);
        assert_eq!(record.invoice_date, None);
        assert!(record.charges.is_empty());
        assert_eq!(record.customer_name, None);
    }

    #[test]
    fn test_non_object_reply_fails() {
        assert!(parse_record("[]").is_err());
        assert!(parse_record("plain text, not json").is_err());
        assert!(parse_record("42").is_err());
    }

    #[test]
    fn test_number_coercion_styles() {
        assert_eq!(parse_number("63,04"), Some(63.04));
        assert_eq!(parse_number("1.234,56"), Some(1234.56));
        assert_eq!(parse_number("1,234.56"), Some(1234.56));
        assert_eq!(parse_number("1,234"), Some(1234.0));
        assert_eq!(parse_number("63.04 EUR"), Some(63.04));
        assert_eq!(parse_number("-12.5"), Some(-12.5));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("n/a"), None);
    }

    #[test]
    fn test_date_coercion_layouts() {
        let expected = Some(jiff::civil::date(2024, 3, 5));

        let iso = serde_json::json!("2024-03-05");
        assert_eq!(coerce_date(Some(&iso)), expected);

        let printed = serde_json::json!("05/03/2024");
        assert_eq!(coerce_date(Some(&printed)), expected);

        let dotted = serde_json::json!("05.03.2024");
        assert_eq!(coerce_date(Some(&dotted)), expected);

        let junk = serde_json::json!("sometime in March");
        assert_eq!(coerce_date(Some(&junk)), None);
    }

    #[test]
    fn test_charge_without_concept_dropped() {
        let reply = r#"{
            "charges": [
                {"concept": "Energy", "amount": 10.0},
                {"amount": 5.0},
                {"concept": "", "amount": 1.0}
            ]
        }"#;

        let record = parse_record(reply).expect("valid reply");
        assert_eq!(record.charges.len(), 1);
        assert_eq!(record.charges[0].concept, "Energy");
    }
}
