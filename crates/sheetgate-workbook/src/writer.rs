use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};
use sheetgate_core::RevisionRecord;

use crate::error::WorkbookError;

/// Header row written above revision records.
pub const REVISION_HEADERS: [&str; 4] = ["修订人", "修订时间", "修订内容", "修订版本"];

const REVISION_COLUMN_WIDTHS: [f64; 4] = [12.0, 20.0, 40.0, 12.0];

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

/// A plain sheet: one header row followed by data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl DataSheet {
    #[must_use]
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub fn row(mut self, cells: Vec<CellValue>) -> Self {
        self.rows.push(cells);
        self
    }
}

#[derive(Debug, Clone)]
struct RevisionSheet {
    name: String,
    headers: Vec<String>,
    records: Vec<RevisionRecord>,
}

/// Builds `.xlsx` workbooks with an optional revision-log sheet first,
/// followed by data sheets in insertion order.
#[derive(Debug, Clone, Default)]
pub struct WorkbookBuilder {
    revision: Option<RevisionSheet>,
    data_sheets: Vec<DataSheet>,
}

impl WorkbookBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the revision-log sheet with the standard headers.
    #[must_use]
    pub fn revision_sheet(
        mut self,
        name: impl Into<String>,
        records: impl IntoIterator<Item = RevisionRecord>,
    ) -> Self {
        self.revision = Some(RevisionSheet {
            name: name.into(),
            headers: REVISION_HEADERS.iter().map(ToString::to_string).collect(),
            records: records.into_iter().collect(),
        });
        self
    }

    #[must_use]
    pub fn data_sheet(mut self, sheet: DataSheet) -> Self {
        self.data_sheets.push(sheet);
        self
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, WorkbookError> {
        Ok(self.build()?.save_to_buffer()?)
    }

    pub fn save(&self, path: &Path) -> Result<(), WorkbookError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| WorkbookError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes).map_err(|source| WorkbookError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn build(&self) -> Result<Workbook, WorkbookError> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();

        if let Some(revision) = &self.revision {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&revision.name)?;
            write_headers(worksheet, &revision.headers, &header_format)?;
            for (column, width) in REVISION_COLUMN_WIDTHS.iter().enumerate() {
                worksheet.set_column_width(column_index(column), *width)?;
            }
            for (offset, record) in revision.records.iter().enumerate() {
                let row = row_index(offset + 1);
                let cells = [
                    &record.author,
                    &record.timestamp,
                    &record.description,
                    &record.version_label,
                ];
                for (column, text) in cells.into_iter().enumerate() {
                    if !text.is_empty() {
                        worksheet.write_string(row, column_index(column), text)?;
                    }
                }
            }
            worksheet.set_freeze_panes(1, 0)?;
        }

        for sheet in &self.data_sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&sheet.name)?;
            write_headers(worksheet, &sheet.headers, &header_format)?;
            for (offset, cells) in sheet.rows.iter().enumerate() {
                let row = row_index(offset + 1);
                for (column, cell) in cells.iter().enumerate() {
                    match cell {
                        CellValue::Text(text) if text.is_empty() => {}
                        CellValue::Text(text) => {
                            worksheet.write_string(row, column_index(column), text)?;
                        }
                        CellValue::Number(number) => {
                            worksheet.write_number(row, column_index(column), *number)?;
                        }
                    }
                }
            }
            worksheet.set_freeze_panes(1, 0)?;
        }

        Ok(workbook)
    }
}

fn write_headers(
    worksheet: &mut Worksheet,
    headers: &[String],
    format: &Format,
) -> Result<(), WorkbookError> {
    for (column, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, column_index(column), header, format)?;
    }
    Ok(())
}

#[allow(clippy::cast_possible_truncation)]
const fn row_index(row: usize) -> u32 {
    row as u32
}

#[allow(clippy::cast_possible_truncation)]
const fn column_index(column: usize) -> u16 {
    column as u16
}
