// ==========================================
// 机房电脑分配管理 - 导入层
// ==========================================
// 职责: 外部表格（.xlsx/.xls/.csv）导入学生登记表
// ==========================================

pub mod conflict_handler;
pub mod error;
pub mod file_parser;
pub mod student_importer;

// 重导出核心类型
pub use conflict_handler::ConflictHandler;
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawRow, RawSheet, UniversalFileParser};
pub use student_importer::{
    ImportMode, ImportReport, ImportRowIssue, RowIssueKind, StudentImporter, STUDENT_COLUMN_COUNT,
};
