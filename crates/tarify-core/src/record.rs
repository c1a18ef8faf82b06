//! The structured invoice record produced for one processed file.
//!
//! Every scalar field is optional: a field the structuring service did not
//! return (or returned with an unusable type) is `None`, which is distinct
//! from an empty string or a zero amount. Downstream consumers must never
//! substitute sentinel values for absent fields.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// Structured fields extracted from one utility invoice.
///
/// The schema is fixed: the same set of fields exists for every invoice,
/// regardless of which ones the extraction managed to fill in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Customer (account holder) name.
    pub customer_name: Option<String>,
    /// Customer identifier, e.g. contract or account number.
    pub customer_id: Option<String>,
    /// Supply address as printed on the invoice.
    pub customer_address: Option<String>,
    /// Invoice number assigned by the utility.
    pub invoice_number: Option<String>,
    /// Invoice issue date.
    pub invoice_date: Option<Date>,
    /// First day of the billing period.
    pub period_start: Option<Date>,
    /// Last day of the billing period.
    pub period_end: Option<Date>,
    /// Meter serial number.
    pub meter_number: Option<String>,
    /// Meter reading at the start of the period.
    pub previous_reading: Option<f64>,
    /// Meter reading at the end of the period.
    pub current_reading: Option<f64>,
    /// Billed consumption for the period (kWh or m3).
    pub consumption: Option<f64>,
    /// Sum of charges before taxes.
    pub subtotal: Option<f64>,
    /// Total taxes applied.
    pub taxes: Option<f64>,
    /// Invoice total.
    pub total: Option<f64>,
    /// Currency code or symbol as printed.
    pub currency: Option<String>,
    /// Billing concept line items.
    #[serde(default)]
    pub charges: Vec<ChargeLine>,
    /// Historical consumption entries, usually one per month.
    #[serde(default)]
    pub history: Vec<ConsumptionEntry>,
}

impl InvoiceRecord {
    /// Whether the extraction produced no usable field at all.
    pub fn is_empty(&self) -> bool {
        self.customer_name.is_none()
            && self.customer_id.is_none()
            && self.customer_address.is_none()
            && self.invoice_number.is_none()
            && self.invoice_date.is_none()
            && self.period_start.is_none()
            && self.period_end.is_none()
            && self.meter_number.is_none()
            && self.previous_reading.is_none()
            && self.current_reading.is_none()
            && self.consumption.is_none()
            && self.subtotal.is_none()
            && self.taxes.is_none()
            && self.total.is_none()
            && self.currency.is_none()
            && self.charges.is_empty()
            && self.history.is_empty()
    }
}

/// One billing concept line on an invoice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChargeLine {
    /// Concept description, e.g. "Energy consumed" or "Meter rental".
    pub concept: String,
    /// Billed quantity, if the concept is metered.
    pub quantity: Option<f64>,
    /// Price per unit.
    pub unit_price: Option<f64>,
    /// Line amount.
    pub amount: Option<f64>,
}

/// One entry of the historical consumption table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionEntry {
    /// Period label as printed, e.g. "2024-03" or "MAR 2024".
    pub period: String,
    /// Consumption for that period.
    pub consumption: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_record_has_no_fields() {
        let record = InvoiceRecord::default();
        assert!(record.is_empty());
    }

    #[test]
    fn absent_is_distinct_from_empty() {
        let absent = InvoiceRecord::default();
        let empty = InvoiceRecord {
            customer_name: Some(String::new()),
            ..Default::default()
        };

        assert!(absent.is_empty());
        assert!(!empty.is_empty());
        assert_ne!(absent, empty);
    }
}
