// ==========================================
// 机房电脑分配管理 - 历史记录导出
// ==========================================
// 导出当前展示的行（不重新查询），固定六列
// 格式: 默认 .xlsx 工作簿（单表，首行表头）；目标以 .csv 结尾时写 CSV
// 写入流程: 目标目录内的临时文件 -> flush + fsync -> rename 覆盖目标
// 任一步失败时目标文件保持原样，临时文件随 NamedTempFile 析构删除
// ==========================================

use crate::domain::reservation::HistoryRow;
use crate::exporter::error::{ExportError, ExportResult};
use rust_xlsxwriter::Workbook;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// 导出列（顺序固定）
pub const EXPORT_COLUMNS: [&str; 6] = [
    "Student ID",
    "Name",
    "PC ID",
    "Entry Time",
    "Exit Time",
    "Duration",
];

/// 缺省扩展名（未指定受支持扩展名时追加）
pub const EXPORT_EXTENSION: &str = "xlsx";

/// 工作表名
pub const EXPORT_SHEET_NAME: &str = "History";

// ==========================================
// ExportFormat - 导出格式
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Xlsx,
    Csv,
}

impl ExportFormat {
    /// 按扩展名识别（大小写不敏感），未知扩展名返回 None
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "xlsx" => Some(ExportFormat::Xlsx),
            "csv" => Some(ExportFormat::Csv),
            _ => None,
        }
    }
}

/// 导出结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub format: ExportFormat,
    pub rows_written: usize,
}

pub struct HistoryExporter;

impl HistoryExporter {
    /// 确定目标路径与格式
    ///
    /// `.xlsx` / `.csv` 原样保留；其他情况追加 `.xlsx`。
    pub fn resolve_destination(destination: &Path) -> ExportResult<(PathBuf, ExportFormat)> {
        let file_name = destination
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ExportError::InvalidDestination(destination.display().to_string()))?;

        let known = destination
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ExportFormat::from_extension);

        match known {
            Some(format) => Ok((destination.to_path_buf(), format)),
            None => Ok((
                destination.with_file_name(format!("{}.{}", file_name, EXPORT_EXTENSION)),
                ExportFormat::Xlsx,
            )),
        }
    }

    /// 导出历史行
    pub fn export(&self, rows: &[HistoryRow], destination: &Path) -> ExportResult<ExportSummary> {
        if rows.is_empty() {
            return Err(ExportError::NoData);
        }

        let (target, format) = Self::resolve_destination(destination)?;
        let dir = match target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !dir.is_dir() {
            return Err(ExportError::InvalidDestination(format!(
                "目录不存在: {}",
                dir.display()
            )));
        }

        let mut tmp = tempfile::Builder::new()
            .prefix(".history-export-")
            .suffix(".tmp")
            .tempfile_in(&dir)?;

        match format {
            ExportFormat::Xlsx => {
                let bytes = build_workbook(rows)?;
                tmp.write_all(&bytes)?;
                tmp.flush()?;
            }
            ExportFormat::Csv => {
                let mut writer = csv::Writer::from_writer(tmp.as_file());
                writer.write_record(EXPORT_COLUMNS)?;
                for row in rows {
                    writer.write_record(row.to_cells())?;
                }
                writer.flush()?;
            }
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&target)?;

        tracing::info!(
            path = %target.display(),
            format = ?format,
            rows = rows.len(),
            "历史记录已导出"
        );

        Ok(ExportSummary {
            path: target,
            format,
            rows_written: rows.len(),
        })
    }
}

/// 生成单表工作簿：首行表头，其后每行一条记录（全部写为文本）
fn build_workbook(rows: &[HistoryRow]) -> ExportResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(EXPORT_SHEET_NAME)?;

    for (col, title) in EXPORT_COLUMNS.iter().enumerate() {
        sheet.write_string(0, col as u16, *title)?;
    }
    for (idx, row) in rows.iter().enumerate() {
        let line = (idx + 1) as u32;
        for (col, cell) in row.to_cells().iter().enumerate() {
            // 进行中的记录没有下机时间与时长，留空单元格
            if !cell.is_empty() {
                sheet.write_string(line, col as u16, cell.as_str())?;
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}
