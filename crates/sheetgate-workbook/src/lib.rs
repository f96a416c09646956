//! # sheetgate-workbook
//!
//! Spreadsheet access for sheetgate.
//!
//! - [`RevisionLogReader`] opens a workbook (from disk or from bytes) with
//!   `calamine` and returns the rows of its revision-log sheet.
//! - [`WorkbookBuilder`] authors workbooks with `rust_xlsxwriter`; it backs the
//!   sample generator and test fixtures.

mod error;
mod reader;
mod sample;
mod writer;

pub use error::WorkbookError;
pub use reader::{RevisionLogReader, WorkbookSource};
pub use sample::{SampleOptions, generate_samples, sample_file_name};
pub use writer::{CellValue, DataSheet, REVISION_HEADERS, WorkbookBuilder};
