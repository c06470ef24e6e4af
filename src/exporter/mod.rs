// ==========================================
// 机房电脑分配管理 - 导出层
// ==========================================
// 职责: 将历史记录写出为表格文件（默认 .xlsx，可选 .csv）
// ==========================================

pub mod error;
pub mod history_exporter;

pub use error::{ExportError, ExportResult};
pub use history_exporter::{
    ExportFormat, ExportSummary, HistoryExporter, EXPORT_COLUMNS, EXPORT_EXTENSION,
    EXPORT_SHEET_NAME,
};
