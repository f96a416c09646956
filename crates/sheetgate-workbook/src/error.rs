use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkbookError {
    #[error("workbook has no '{sheet}' sheet")]
    SheetNotFound { sheet: String },
    #[error("failed to read {origin}: {source}")]
    Read {
        origin: String,
        #[source]
        source: calamine::Error,
    },
    #[error("failed to write workbook: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),
    #[error("io error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
