//! Workbook construction error types.

/// Result type alias for workbook operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Workbook construction error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The underlying spreadsheet writer rejected an operation.
    #[error("workbook write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}
