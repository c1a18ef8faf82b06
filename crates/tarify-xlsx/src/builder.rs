//! Workbook construction.
//!
//! Pure reduction from a [`BatchResult`] into a four-sheet workbook. The
//! column layout is fixed and schema-driven: every run produces the same
//! columns in the same order, no matter which fields the extraction
//! managed to fill in. Absent fields stay blank (never 0 or a placeholder
//! string), and a file with no line items contributes no rows to the
//! flattened sheets.

use rust_xlsxwriter::{DocProperties, Format, FormatAlign, Workbook, Worksheet};
use tarify_core::{BatchResult, FileOutcome, FileResult};

use crate::TRACING_TARGET_BUILDER;
use crate::error::Result;

/// Summary sheet columns: one row per input file, failures included.
const SUMMARY_HEADERS: &[&str] = &[
    "File",
    "Status",
    "Invoice Number",
    "Customer ID",
    "Total",
    "Failure Stage",
    "Failure Reason",
    "Retryable",
];

/// Full-detail sheet columns: one row per processed file.
const INVOICE_HEADERS: &[&str] = &[
    "File",
    "Customer Name",
    "Customer ID",
    "Customer Address",
    "Invoice Number",
    "Invoice Date",
    "Period Start",
    "Period End",
    "Meter Number",
    "Previous Reading",
    "Current Reading",
    "Consumption",
    "Subtotal",
    "Taxes",
    "Total",
    "Currency",
];

/// Charges sheet columns: one row per (file, charge line).
const CHARGE_HEADERS: &[&str] = &["File", "Concept", "Quantity", "Unit Price", "Amount"];

/// Consumption sheet columns: one row per (file, history entry).
const HISTORY_HEADERS: &[&str] = &["File", "Period", "Consumption"];

/// Builds Excel workbooks from batch results.
///
/// # Examples
///
/// ```rust,ignore
/// use tarify_xlsx::WorkbookBuilder;
///
/// let buffer = WorkbookBuilder::new().build_to_buffer(&batch)?;
/// std::fs::write("invoices.xlsx", buffer)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct WorkbookBuilder;

impl WorkbookBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self
    }

    /// Builds the in-memory workbook for a batch result.
    pub fn build(&self, batch: &BatchResult) -> Result<Workbook> {
        let mut workbook = Workbook::new();

        // Pin the document properties so identical inputs produce
        // identical bytes.
        let properties = DocProperties::new()
            .set_author("tarify")
            .set_creation_datetime(&rust_xlsxwriter::ExcelDateTime::from_ymd(2000, 1, 1)?);
        workbook.set_properties(&properties);

        let header_format = Format::new().set_bold();
        let amount_format = Format::new()
            .set_num_format("#,##0.00")
            .set_align(FormatAlign::Right);

        self.write_summary(workbook.add_worksheet(), batch, &header_format, &amount_format)?;
        self.write_invoices(workbook.add_worksheet(), batch, &header_format, &amount_format)?;
        self.write_charges(workbook.add_worksheet(), batch, &header_format, &amount_format)?;
        self.write_history(workbook.add_worksheet(), batch, &header_format, &amount_format)?;

        tracing::debug!(
            target: TRACING_TARGET_BUILDER,
            files = batch.len(),
            processed = batch.processed(),
            failed = batch.failed(),
            "Workbook built"
        );

        Ok(workbook)
    }

    /// Builds the workbook and serializes it to xlsx bytes.
    pub fn build_to_buffer(&self, batch: &BatchResult) -> Result<Vec<u8>> {
        let mut workbook = self.build(batch)?;
        Ok(workbook.save_to_buffer()?)
    }

    /// One row per input file, in submission order.
    fn write_summary(
        &self,
        worksheet: &mut Worksheet,
        batch: &BatchResult,
        header_format: &Format,
        amount_format: &Format,
    ) -> Result<()> {
        worksheet.set_name("Summary")?;
        write_headers(worksheet, SUMMARY_HEADERS, header_format)?;

        for (index, result) in batch.iter().enumerate() {
            let row = (index + 1) as u32;
            worksheet.write_string(row, 0, &result.file_name)?;

            match &result.outcome {
                FileOutcome::Processed(record) => {
                    worksheet.write_string(row, 1, "processed")?;
                    write_opt_string(worksheet, row, 2, record.invoice_number.as_deref())?;
                    write_opt_string(worksheet, row, 3, record.customer_id.as_deref())?;
                    write_opt_number(worksheet, row, 4, record.total, amount_format)?;
                }
                FileOutcome::Failed {
                    stage,
                    reason,
                    retryable,
                } => {
                    worksheet.write_string(row, 1, "failed")?;
                    worksheet.write_string(row, 5, stage.as_ref())?;
                    worksheet.write_string(row, 6, reason)?;
                    worksheet.write_string(row, 7, if *retryable { "yes" } else { "no" })?;
                }
            }
        }

        worksheet.set_freeze_panes(1, 0)?;
        Ok(())
    }

    /// One row per processed file with every scalar field as a column.
    fn write_invoices(
        &self,
        worksheet: &mut Worksheet,
        batch: &BatchResult,
        header_format: &Format,
        amount_format: &Format,
    ) -> Result<()> {
        worksheet.set_name("Invoices")?;
        write_headers(worksheet, INVOICE_HEADERS, header_format)?;

        let mut row = 1u32;
        for result in processed(batch) {
            let record = result.record().expect("processed results carry a record");

            worksheet.write_string(row, 0, &result.file_name)?;
            write_opt_string(worksheet, row, 1, record.customer_name.as_deref())?;
            write_opt_string(worksheet, row, 2, record.customer_id.as_deref())?;
            write_opt_string(worksheet, row, 3, record.customer_address.as_deref())?;
            write_opt_string(worksheet, row, 4, record.invoice_number.as_deref())?;
            write_opt_date(worksheet, row, 5, record.invoice_date)?;
            write_opt_date(worksheet, row, 6, record.period_start)?;
            write_opt_date(worksheet, row, 7, record.period_end)?;
            write_opt_string(worksheet, row, 8, record.meter_number.as_deref())?;
            write_opt_number(worksheet, row, 9, record.previous_reading, amount_format)?;
            write_opt_number(worksheet, row, 10, record.current_reading, amount_format)?;
            write_opt_number(worksheet, row, 11, record.consumption, amount_format)?;
            write_opt_number(worksheet, row, 12, record.subtotal, amount_format)?;
            write_opt_number(worksheet, row, 13, record.taxes, amount_format)?;
            write_opt_number(worksheet, row, 14, record.total, amount_format)?;
            write_opt_string(worksheet, row, 15, record.currency.as_deref())?;

            row += 1;
        }

        worksheet.set_freeze_panes(1, 0)?;
        Ok(())
    }

    /// One row per (file, charge line); empty groups contribute nothing.
    fn write_charges(
        &self,
        worksheet: &mut Worksheet,
        batch: &BatchResult,
        header_format: &Format,
        amount_format: &Format,
    ) -> Result<()> {
        worksheet.set_name("Charges")?;
        write_headers(worksheet, CHARGE_HEADERS, header_format)?;

        let mut row = 1u32;
        for result in processed(batch) {
            let record = result.record().expect("processed results carry a record");
            for charge in &record.charges {
                worksheet.write_string(row, 0, &result.file_name)?;
                worksheet.write_string(row, 1, &charge.concept)?;
                write_opt_number(worksheet, row, 2, charge.quantity, amount_format)?;
                write_opt_number(worksheet, row, 3, charge.unit_price, amount_format)?;
                write_opt_number(worksheet, row, 4, charge.amount, amount_format)?;
                row += 1;
            }
        }

        worksheet.set_freeze_panes(1, 0)?;
        Ok(())
    }

    /// One row per (file, consumption entry); empty groups contribute nothing.
    fn write_history(
        &self,
        worksheet: &mut Worksheet,
        batch: &BatchResult,
        header_format: &Format,
        amount_format: &Format,
    ) -> Result<()> {
        worksheet.set_name("Consumption")?;
        write_headers(worksheet, HISTORY_HEADERS, header_format)?;

        let mut row = 1u32;
        for result in processed(batch) {
            let record = result.record().expect("processed results carry a record");
            for entry in &record.history {
                worksheet.write_string(row, 0, &result.file_name)?;
                worksheet.write_string(row, 1, &entry.period)?;
                write_opt_number(worksheet, row, 2, entry.consumption, amount_format)?;
                row += 1;
            }
        }

        worksheet.set_freeze_panes(1, 0)?;
        Ok(())
    }
}

/// Processed results, in submission order.
fn processed(batch: &BatchResult) -> impl Iterator<Item = &FileResult> {
    batch.iter().filter(|result| result.is_processed())
}

fn write_headers(worksheet: &mut Worksheet, headers: &[&str], format: &Format) -> Result<()> {
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, format)?;
    }
    Ok(())
}

/// Absent strings leave the cell blank.
fn write_opt_string(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<&str>,
) -> Result<()> {
    if let Some(value) = value {
        worksheet.write_string(row, col, value)?;
    }
    Ok(())
}

/// Absent numbers leave the cell blank, never 0.
fn write_opt_number(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<f64>,
    format: &Format,
) -> Result<()> {
    if let Some(value) = value {
        worksheet.write_number_with_format(row, col, value, format)?;
    }
    Ok(())
}

/// Dates render as ISO strings.
fn write_opt_date(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<jiff::civil::Date>,
) -> Result<()> {
    if let Some(value) = value {
        worksheet.write_string(row, col, value.to_string())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use calamine::{Data, DataType, Range, Reader, Xlsx};
    use tarify_core::{
        BatchResult, ChargeLine, ConsumptionEntry, Error, FailureStage, FileResult, InvoiceRecord,
    };

    use super::*;

    fn sample_record() -> InvoiceRecord {
        InvoiceRecord {
            customer_name: Some("Ana Torres".into()),
            customer_id: Some("ES0021-4455".into()),
            invoice_number: Some("FE-2024-0193".into()),
            invoice_date: Some(jiff::civil::date(2024, 3, 5)),
            consumption: Some(247.0),
            total: Some(63.04),
            currency: Some("EUR".into()),
            charges: vec![
                ChargeLine {
                    concept: "Energy consumed".into(),
                    quantity: Some(247.0),
                    unit_price: Some(0.152),
                    amount: Some(37.54),
                },
                ChargeLine {
                    concept: "Power term".into(),
                    amount: Some(14.56),
                    ..Default::default()
                },
                ChargeLine {
                    concept: "Meter rental".into(),
                    amount: Some(0.81),
                    ..Default::default()
                },
            ],
            history: vec![ConsumptionEntry {
                period: "2024-01".into(),
                consumption: Some(231.0),
            }],
            ..Default::default()
        }
    }

    fn sample_batch() -> BatchResult {
        BatchResult::new(vec![
            FileResult::processed("ana.pdf", sample_record()),
            FileResult::failed("broken.pdf", FailureStage::Extraction, &Error::timeout()),
            FileResult::processed("bare.pdf", InvoiceRecord::default()),
        ])
    }

    fn read_sheet(buffer: &[u8], name: &str) -> Range<Data> {
        let mut workbook: Xlsx<_> =
            Xlsx::new(Cursor::new(buffer.to_vec())).expect("valid xlsx buffer");
        workbook.worksheet_range(name).expect("sheet exists")
    }

    fn cell_string(range: &Range<Data>, row: u32, col: u32) -> String {
        range
            .get_value((row, col))
            .and_then(|cell| cell.as_string())
            .unwrap_or_default()
    }

    #[test]
    fn summary_has_one_row_per_input() {
        let buffer = WorkbookBuilder::new()
            .build_to_buffer(&sample_batch())
            .expect("build succeeds");
        let summary = read_sheet(&buffer, "Summary");

        // Header row plus one row per file, failures included.
        assert_eq!(summary.rows().count(), 4);
        assert_eq!(cell_string(&summary, 1, 0), "ana.pdf");
        assert_eq!(cell_string(&summary, 1, 1), "processed");
        assert_eq!(cell_string(&summary, 2, 0), "broken.pdf");
        assert_eq!(cell_string(&summary, 2, 1), "failed");
        assert_eq!(cell_string(&summary, 2, 5), "extraction");
        assert_eq!(cell_string(&summary, 2, 7), "yes");
    }

    #[test]
    fn absent_fields_stay_blank() {
        let buffer = WorkbookBuilder::new()
            .build_to_buffer(&sample_batch())
            .expect("build succeeds");
        let invoices = read_sheet(&buffer, "Invoices");

        // bare.pdf is the second processed row; every field is absent.
        assert_eq!(cell_string(&invoices, 2, 0), "bare.pdf");
        for col in 1..INVOICE_HEADERS.len() as u32 {
            let cell = invoices.get_value((2, col));
            assert!(
                cell.is_none() || cell == Some(&Data::Empty),
                "column {col} should be blank, got {cell:?}"
            );
        }
    }

    #[test]
    fn charges_flatten_one_row_per_line_item() {
        let buffer = WorkbookBuilder::new()
            .build_to_buffer(&sample_batch())
            .expect("build succeeds");
        let charges = read_sheet(&buffer, "Charges");

        // Three charge lines from ana.pdf, zero from bare.pdf, none from
        // the failed file.
        assert_eq!(charges.rows().count(), 4);
        for row in 1..=3 {
            assert_eq!(cell_string(&charges, row, 0), "ana.pdf");
        }
        assert_eq!(cell_string(&charges, 1, 1), "Energy consumed");

        // Power term has no quantity: blank cell, not zero.
        let quantity = charges.get_value((2, 2));
        assert!(quantity.is_none() || quantity == Some(&Data::Empty));
    }

    #[test]
    fn history_flattens_per_entry() {
        let buffer = WorkbookBuilder::new()
            .build_to_buffer(&sample_batch())
            .expect("build succeeds");
        let history = read_sheet(&buffer, "Consumption");

        assert_eq!(history.rows().count(), 2);
        assert_eq!(cell_string(&history, 1, 0), "ana.pdf");
        assert_eq!(cell_string(&history, 1, 1), "2024-01");
    }

    #[test]
    fn build_is_deterministic() {
        let batch = sample_batch();
        let builder = WorkbookBuilder::new();

        let first = builder.build_to_buffer(&batch).expect("build succeeds");
        let second = builder.build_to_buffer(&batch).expect("build succeeds");

        assert_eq!(first, second);
    }

    #[test]
    fn headers_are_fixed_even_for_empty_batches() {
        let buffer = WorkbookBuilder::new()
            .build_to_buffer(&BatchResult::default())
            .expect("build succeeds");

        let invoices = read_sheet(&buffer, "Invoices");
        let headers: Vec<String> = (0..INVOICE_HEADERS.len() as u32)
            .map(|col| cell_string(&invoices, 0, col))
            .collect();
        let expected: Vec<String> = INVOICE_HEADERS.iter().map(|h| h.to_string()).collect();
        assert_eq!(headers, expected);

        let charges = read_sheet(&buffer, "Charges");
        assert_eq!(charges.rows().count(), 1);
    }

    #[test]
    fn dates_render_as_iso_strings() {
        let buffer = WorkbookBuilder::new()
            .build_to_buffer(&sample_batch())
            .expect("build succeeds");
        let invoices = read_sheet(&buffer, "Invoices");

        assert_eq!(cell_string(&invoices, 1, 5), "2024-03-05");
    }
}
