//! Deterministic sample workbooks for demos and manual hook testing.

use std::path::{Path, PathBuf};

use sheetgate_core::RevisionRecord;
use tracing::info;

use crate::error::WorkbookError;
use crate::writer::{CellValue, DataSheet, WorkbookBuilder};

const AUTHORS: [&str; 5] = ["张三", "李四", "王五", "赵六", "钱七"];

const DESCRIPTIONS: [&str; 8] = [
    "更新了数据统计",
    "修正了公式错误",
    "添加了新的分析维度",
    "优化了表格格式",
    "补充了缺失数据",
    "调整了计算逻辑",
    "更新了图表数据",
    "修正了拼写错误",
];

const STATES: [&str; 3] = ["进行中", "已完成", "待处理"];

const DATA_HEADERS: [&str; 5] = ["序号", "项目名称", "数值", "状态", "备注"];

#[derive(Debug, Clone)]
pub struct SampleOptions {
    /// Number of workbooks to write.
    pub count: usize,
    /// Data sheets per workbook, after the revision sheet.
    pub data_sheets: usize,
    /// Name of the revision-log sheet.
    pub sheet_name: String,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            count: 100,
            data_sheets: 3,
            sheet_name: "修改记录".to_string(),
        }
    }
}

/// File name of the `index`-th sample workbook (1-based).
#[must_use]
pub fn sample_file_name(index: usize) -> String {
    format!("数据文件_{index:03}.xlsx")
}

/// Write `options.count` sample workbooks into `dir`, returning their paths.
///
/// Each workbook gets 1–5 revision records and `options.data_sheets` data
/// sheets of 10–20 rows. Content depends only on the workbook index, so
/// repeated runs produce byte-identical revision logs.
pub fn generate_samples(dir: &Path, options: &SampleOptions) -> Result<Vec<PathBuf>, WorkbookError> {
    std::fs::create_dir_all(dir).map_err(|source| WorkbookError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths = Vec::with_capacity(options.count);
    for index in 1..=options.count {
        let mut builder =
            WorkbookBuilder::new().revision_sheet(&options.sheet_name, sample_records(index));
        for sheet in 1..=options.data_sheets {
            builder = builder.data_sheet(sample_data_sheet(index, sheet));
        }

        let path = dir.join(sample_file_name(index));
        builder.save(&path)?;
        paths.push(path);

        if index % 10 == 0 {
            info!(generated = index, total = options.count, "writing sample workbooks");
        }
    }

    Ok(paths)
}

fn sample_records(index: usize) -> Vec<RevisionRecord> {
    let count = 1 + index % 5;
    (1..=count)
        .map(|row| {
            let seed = index * 7 + row * 3;
            RevisionRecord::new(
                AUTHORS[seed % AUTHORS.len()],
                format!(
                    "2024-{:02}-{:02} {:02}:{:02}:00",
                    1 + row,
                    1 + seed % 28,
                    9 + seed % 9,
                    seed % 60
                ),
                DESCRIPTIONS[seed % DESCRIPTIONS.len()],
                format!("v{row}.0"),
            )
        })
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn sample_data_sheet(index: usize, sheet: usize) -> DataSheet {
    let name = format!("数据表{sheet}");
    let headers = DATA_HEADERS.iter().map(ToString::to_string).collect();
    let rows = 10 + (index + sheet) % 11;

    (1..=rows).fold(DataSheet::new(name.clone(), headers), |data, row| {
        let seed = index * 31 + sheet * 17 + row;
        data.row(vec![
            CellValue::Number(row as f64),
            CellValue::Text(format!("{name}-项目{row}")),
            CellValue::Number((100 + seed * 97 % 9_900) as f64),
            CellValue::Text(STATES[seed % STATES.len()].to_string()),
            CellValue::Text(format!("这是{name}的备注信息{row}")),
        ])
    })
}
