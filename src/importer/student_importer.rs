// ==========================================
// 机房电脑分配管理 - 学生批量导入
// ==========================================
// 列约定（按位置）: 学号 / 姓名 / 班级 / 联系方式，首行为表头
//
// 导入模式:
// - AllOrNothing: 任一行不合格则整批拒绝，不写入任何数据（默认）
// - BestEffort:   合格行在单个事务内写入，不合格行逐条报告
// ==========================================

use crate::config::ConfigManager;
use crate::domain::student::Student;
use crate::importer::conflict_handler::ConflictHandler;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{RawRow, RawSheet, UniversalFileParser};
use crate::repository::StudentRepository;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// 学生表格必需的列数
pub const STUDENT_COLUMN_COUNT: usize = 4;

// ==========================================
// 导入模式
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportMode {
    #[default]
    AllOrNothing,
    BestEffort,
}

impl ImportMode {
    /// 配置值解析（all_or_nothing / best_effort）
    pub fn from_config_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "all_or_nothing" => Some(ImportMode::AllOrNothing),
            "best_effort" => Some(ImportMode::BestEffort),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImportMode::AllOrNothing => "all_or_nothing",
            ImportMode::BestEffort => "best_effort",
        }
    }
}

// ==========================================
// 行级问题
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowIssueKind {
    MissingField,  // 必填字段为空
    InvalidCourse, // 班级不在可选列表中
    DuplicateKey,  // 学号重复（批内或已登记）
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRowIssue {
    pub row_number: usize,
    pub student_id: Option<String>,
    pub kind: RowIssueKind,
    pub message: String,
}

// ==========================================
// 导入报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub batch_id: String,
    pub source: String,
    pub mode: ImportMode,
    pub total_rows: usize,
    pub imported: usize,
    pub skipped: Vec<ImportRowIssue>,
    pub elapsed_ms: u64,
}

// ==========================================
// StudentImporter
// ==========================================
pub struct StudentImporter {
    student_repo: Arc<StudentRepository>,
    config_manager: Arc<ConfigManager>,
}

impl StudentImporter {
    pub fn new(student_repo: Arc<StudentRepository>, config_manager: Arc<ConfigManager>) -> Self {
        Self {
            student_repo,
            config_manager,
        }
    }

    /// 只解析不导入
    pub fn preview<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<RawSheet> {
        UniversalFileParser.parse(file_path)
    }

    /// 从文件导入
    pub fn import_file<P: AsRef<Path>>(
        &self,
        file_path: P,
        mode: ImportMode,
    ) -> ImportResult<ImportReport> {
        let path = file_path.as_ref();
        let sheet = UniversalFileParser.parse(path)?;

        if sheet.headers.len() < STUDENT_COLUMN_COUNT {
            return Err(ImportError::MissingColumns {
                expected: STUDENT_COLUMN_COUNT,
                found: sheet.headers.len(),
            });
        }

        self.import_rows(&sheet.rows, mode, &path.display().to_string())
    }

    /// 导入已解析的行
    pub fn import_rows(
        &self,
        rows: &[RawRow],
        mode: ImportMode,
        source: &str,
    ) -> ImportResult<ImportReport> {
        let started = Instant::now();
        let batch_id = uuid::Uuid::new_v4().to_string();
        tracing::info!(
            batch_id = %batch_id,
            source = source,
            mode = mode.as_str(),
            rows = rows.len(),
            "开始导入学生"
        );

        let (accepted, issues) = self.validate_rows(rows)?;

        if mode == ImportMode::AllOrNothing && !issues.is_empty() {
            tracing::warn!(batch_id = %batch_id, rejected = issues.len(), "导入整批拒绝");
            return Err(ImportError::RowsRejected { issues });
        }

        let students: Vec<Student> = accepted.iter().map(|(_, s)| s.clone()).collect();
        let imported = if students.is_empty() {
            0
        } else {
            self.student_repo
                .insert_batch(&students)
                .map_err(|(idx, err)| {
                    let row_number = accepted.get(idx).map(|(row, _)| *row).unwrap_or(0);
                    ImportError::DatabaseTransactionError(format!("第 {} 行写入失败: {}", row_number, err))
                })?
        };

        let report = ImportReport {
            batch_id,
            source: source.to_string(),
            mode,
            total_rows: rows.len(),
            imported,
            skipped: issues,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };

        tracing::info!(
            batch_id = %report.batch_id,
            imported = report.imported,
            skipped = report.skipped.len(),
            "学生导入完成"
        );
        Ok(report)
    }

    /// 逐行校验，返回 (合格行, 问题列表)
    fn validate_rows(
        &self,
        rows: &[RawRow],
    ) -> ImportResult<(Vec<(usize, Student)>, Vec<ImportRowIssue>)> {
        let enforce_courses = self.config_manager.enforce_course_options()?;
        let course_options: HashSet<String> = if enforce_courses {
            self.config_manager.course_options()?.into_iter().collect()
        } else {
            HashSet::new()
        };

        let existing_ids: HashSet<String> = self
            .student_repo
            .find_all()?
            .into_iter()
            .map(|s| s.student_id)
            .collect();

        // 重复检测只覆盖通过字段/班级校验的行
        let checked: Vec<(usize, Student, Option<(RowIssueKind, String)>)> = rows
            .iter()
            .map(|row| {
                let student = Student::new(row.cell(0), row.cell(1), row.cell(2), row.cell(3));
                let issue = if let Some(field) = student.first_missing_field() {
                    Some((RowIssueKind::MissingField, format!("字段 {} 为空", field)))
                } else if enforce_courses && !course_options.contains(&student.course) {
                    Some((
                        RowIssueKind::InvalidCourse,
                        format!("班级 {} 不在可选列表中", student.course),
                    ))
                } else {
                    None
                };
                (row.row_number, student, issue)
            })
            .collect();

        let keyed: Vec<(usize, String)> = checked
            .iter()
            .filter(|(_, _, issue)| issue.is_none())
            .map(|(row_number, student, _)| (*row_number, student.student_id.clone()))
            .collect();
        let in_batch: HashSet<usize> = ConflictHandler
            .detect_duplicates(&keyed)
            .into_iter()
            .map(|(row, _)| row)
            .collect();
        let in_db: HashSet<usize> = ConflictHandler
            .detect_existing(&keyed, &existing_ids)
            .into_iter()
            .map(|(row, _)| row)
            .collect();

        let mut accepted = Vec::new();
        let mut issues = Vec::new();

        for (row_number, student, issue) in checked {
            let issue = issue.or_else(|| {
                if in_db.contains(&row_number) {
                    Some((
                        RowIssueKind::DuplicateKey,
                        format!("学号 {} 已存在", student.student_id),
                    ))
                } else if in_batch.contains(&row_number) {
                    Some((
                        RowIssueKind::DuplicateKey,
                        format!("学号 {} 在文件中重复", student.student_id),
                    ))
                } else {
                    None
                }
            });

            match issue {
                Some((kind, message)) => issues.push(ImportRowIssue {
                    row_number,
                    student_id: Some(student.student_id.clone()).filter(|id| !id.is_empty()),
                    kind,
                    message,
                }),
                None => accepted.push((row_number, student)),
            }
        }

        Ok((accepted, issues))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::config_keys;
    use crate::db::open_in_memory_shared;

    fn importer() -> (StudentImporter, Arc<StudentRepository>, Arc<ConfigManager>) {
        let conn = open_in_memory_shared().unwrap();
        let repo = Arc::new(StudentRepository::new(conn.clone()));
        let cm = Arc::new(ConfigManager::new(conn));
        (StudentImporter::new(repo.clone(), cm.clone()), repo, cm)
    }

    fn row(n: usize, cells: &[&str]) -> RawRow {
        RawRow {
            row_number: n,
            cells: cells.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn test_import_mode_parse() {
        assert_eq!(ImportMode::from_config_str("best-effort"), Some(ImportMode::BestEffort));
        assert_eq!(ImportMode::from_config_str("ALL_OR_NOTHING"), Some(ImportMode::AllOrNothing));
        assert_eq!(ImportMode::from_config_str("whatever"), None);
        assert_eq!(ImportMode::default(), ImportMode::AllOrNothing);
    }

    #[test]
    fn test_all_valid_rows_are_imported() {
        let (imp, repo, _) = importer();
        let rows = vec![
            row(2, &["101", "A", "FYBSC CS", "999"]),
            row(3, &["102", "B", "SYBSC IT", "888"]),
        ];
        let report = imp.import_rows(&rows, ImportMode::AllOrNothing, "test").unwrap();
        assert_eq!(report.imported, 2);
        assert!(report.skipped.is_empty());
        assert_eq!(repo.count().unwrap(), 2);
    }

    #[test]
    fn test_all_or_nothing_rejects_whole_batch() {
        let (imp, repo, _) = importer();
        repo.insert(&Student::new("102", "B", "SYBSC IT", "888")).unwrap();

        let rows = vec![
            row(2, &["101", "A", "FYBSC CS", "999"]),
            row(3, &["102", "B2", "SYBSC IT", "777"]),
            row(4, &["103", "", "FYBSC CS", "666"]),
        ];
        let err = imp
            .import_rows(&rows, ImportMode::AllOrNothing, "test")
            .unwrap_err();
        match err {
            ImportError::RowsRejected { issues } => {
                assert_eq!(issues.len(), 2);
                assert_eq!(issues[0].row_number, 3);
                assert_eq!(issues[0].kind, RowIssueKind::DuplicateKey);
                assert_eq!(issues[1].kind, RowIssueKind::MissingField);
            }
            other => panic!("Expected RowsRejected, got {:?}", other),
        }

        // 101 未被写入
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_best_effort_reports_skipped_rows() {
        let (imp, repo, _) = importer();
        let rows = vec![
            row(2, &["101", "A", "FYBSC CS", "999"]),
            row(3, &["101", "A again", "FYBSC CS", "999"]),
            row(4, &["104", "D", "TYBSC IT"]),
            row(5, &["105", "E", "TYBSC IT", "555"]),
        ];
        let report = imp.import_rows(&rows, ImportMode::BestEffort, "test").unwrap();
        assert_eq!(report.total_rows, 4);
        assert_eq!(report.imported, 2);
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(report.skipped[0].row_number, 3);
        assert_eq!(report.skipped[0].kind, RowIssueKind::DuplicateKey);
        assert_eq!(report.skipped[1].student_id.as_deref(), Some("104"));

        let first = repo.find_by_id("101").unwrap().unwrap();
        assert_eq!(first.name, "A");
        assert!(repo.exists("105").unwrap());
    }

    #[test]
    fn test_rejected_row_does_not_shadow_later_valid_row() {
        let (imp, repo, _) = importer();
        let rows = vec![
            row(2, &["101", "", "FYBSC CS", "999"]),
            row(3, &["101", "A", "FYBSC CS", "999"]),
        ];
        let report = imp.import_rows(&rows, ImportMode::BestEffort, "test").unwrap();
        assert_eq!(report.imported, 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].row_number, 2);
        assert_eq!(report.skipped[0].kind, RowIssueKind::MissingField);

        let stored = repo.find_by_id("101").unwrap().unwrap();
        assert_eq!(stored.name, "A");
    }

    #[test]
    fn test_enforced_course_options() {
        let (imp, repo, cm) = importer();
        cm.set(config_keys::ENFORCE_COURSE_OPTIONS, "true").unwrap();

        let rows = vec![
            row(2, &["101", "A", "FYBSC CS", "999"]),
            row(3, &["102", "B", "PHD", "888"]),
        ];
        let report = imp.import_rows(&rows, ImportMode::BestEffort, "test").unwrap();
        assert_eq!(report.imported, 1);
        assert_eq!(report.skipped[0].kind, RowIssueKind::InvalidCourse);
        assert!(!repo.exists("102").unwrap());
    }
}
