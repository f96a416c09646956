use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};
use sheetgate_core::{RevisionLog, RevisionRecord};
use tracing::debug;

use crate::error::WorkbookError;

/// Number of positional revision columns: author, timestamp, description, version.
const REVISION_COLUMNS: usize = 4;

/// Where a workbook comes from.
#[derive(Debug, Clone, Copy)]
pub enum WorkbookSource<'a> {
    Path(&'a Path),
    Bytes(&'a [u8]),
}

/// Reads the revision-log sheet of a workbook.
#[derive(Debug, Clone)]
pub struct RevisionLogReader {
    sheet_name: String,
}

impl RevisionLogReader {
    #[must_use]
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
        }
    }

    #[must_use]
    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    pub fn read(&self, source: WorkbookSource<'_>) -> Result<RevisionLog, WorkbookError> {
        match source {
            WorkbookSource::Path(path) => self.read_path(path),
            WorkbookSource::Bytes(bytes) => self.read_bytes(bytes),
        }
    }

    pub fn read_path(&self, path: &Path) -> Result<RevisionLog, WorkbookError> {
        let origin = path.display().to_string();
        let workbook = open_workbook_auto(path).map_err(|source| WorkbookError::Read {
            origin: origin.clone(),
            source,
        })?;
        self.read_workbook(workbook, &origin)
    }

    /// Read a workbook held in memory, e.g. a blob fetched from git.
    ///
    /// The bytes are wrapped in a seekable cursor, so nothing touches disk.
    pub fn read_bytes(&self, bytes: &[u8]) -> Result<RevisionLog, WorkbookError> {
        let origin = "in-memory workbook".to_string();
        let workbook =
            open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|source| WorkbookError::Read {
                origin: origin.clone(),
                source,
            })?;
        self.read_workbook(workbook, &origin)
    }

    fn read_workbook<RS>(
        &self,
        mut workbook: Sheets<RS>,
        origin: &str,
    ) -> Result<RevisionLog, WorkbookError>
    where
        RS: Read + Seek,
    {
        if !workbook
            .sheet_names()
            .iter()
            .any(|name| name == &self.sheet_name)
        {
            return Err(WorkbookError::SheetNotFound {
                sheet: self.sheet_name.clone(),
            });
        }

        let range = workbook
            .worksheet_range(&self.sheet_name)
            .map_err(|source| WorkbookError::Read {
                origin: origin.to_string(),
                source,
            })?;

        let log = records_from_range(&range);
        debug!(origin, sheet = %self.sheet_name, records = log.len(), "read revision log");
        Ok(log)
    }
}

/// Collect records from every non-blank row below the header row.
///
/// `Range` coordinates are relative to its first used cell, so rows and
/// columns are shifted back to absolute sheet positions before the header
/// row and the positional columns are resolved.
fn records_from_range(range: &Range<Data>) -> RevisionLog {
    let Some((start_row, start_col)) = range.start() else {
        return RevisionLog::default();
    };
    let start_row = start_row as usize;
    let start_col = start_col as usize;

    range
        .rows()
        .enumerate()
        .filter(|(offset, _)| start_row + offset > 0)
        .filter(|(_, row)| !row.iter().all(is_blank))
        .map(|(_, row)| {
            let cells = (0..REVISION_COLUMNS).map(|column| {
                column
                    .checked_sub(start_col)
                    .and_then(|index| row.get(index))
                    .map_or_else(String::new, cell_text)
            });
            RevisionRecord::from_cells(cells)
        })
        .collect()
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(text) => text.is_empty(),
        _ => false,
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) | Data::DateTimeIso(text) | Data::DurationIso(text) => text.clone(),
        Data::Int(value) => value.to_string(),
        Data::Float(value) => float_text(*value),
        Data::Bool(value) => value.to_string(),
        Data::DateTime(value) => value.as_datetime().map_or_else(
            || float_text(value.as_f64()),
            |datetime| datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
        ),
        Data::Error(error) => error.to_string(),
    }
}

/// Whole numbers print without a fractional part, so `3.0` reads as `3`.
#[allow(clippy::cast_possible_truncation)]
fn float_text(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        (value as i64).to_string()
    } else {
        value.to_string()
    }
}
