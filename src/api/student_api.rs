// ==========================================
// 机房电脑分配管理 - 学生登记 API
// ==========================================
// 职责: 学生登记、查询、批量导入
// 学生登记后不可修改、不可删除
// ==========================================

use std::sync::Arc;

use crate::api::error::{require_non_empty, ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::student::Student;
use crate::importer::{ImportMode, ImportReport, RawRow, StudentImporter};
use crate::repository::{RepositoryError, StudentRepository};

// ==========================================
// StudentApi - 学生登记 API
// ==========================================
pub struct StudentApi {
    student_repo: Arc<StudentRepository>,
    config_manager: Arc<ConfigManager>,
    importer: Arc<StudentImporter>,
}

impl StudentApi {
    pub fn new(
        student_repo: Arc<StudentRepository>,
        config_manager: Arc<ConfigManager>,
        importer: Arc<StudentImporter>,
    ) -> Self {
        Self {
            student_repo,
            config_manager,
            importer,
        }
    }

    /// 登记学生
    ///
    /// # 返回
    /// - Err(ValidationError): 任一字段为空，或启用班级校验时班级不在列表中
    /// - Err(DuplicateKey): 学号已存在
    pub fn add(
        &self,
        student_id: &str,
        name: &str,
        course: &str,
        contact: &str,
    ) -> ApiResult<Student> {
        let student = Student::new(student_id, name, course, contact);

        if let Some(field) = student.first_missing_field() {
            tracing::warn!(field = field, "学生登记被拒绝: 字段为空");
            return Err(ApiError::ValidationError(format!("字段 {} 不能为空", field)));
        }

        if self.config_manager.enforce_course_options()? {
            let options = self.config_manager.course_options()?;
            if !options.iter().any(|c| c == &student.course) {
                tracing::warn!(course = %student.course, "学生登记被拒绝: 班级不在列表中");
                return Err(ApiError::ValidationError(format!(
                    "班级 {} 不在可选列表中: {}",
                    student.course,
                    options.join(", ")
                )));
            }
        }

        match self.student_repo.insert(&student) {
            Ok(()) => {}
            Err(RepositoryError::UniqueConstraintViolation(_)) => {
                tracing::warn!(student_id = %student.student_id, "学生登记被拒绝: 学号重复");
                return Err(ApiError::DuplicateKey(format!(
                    "学号 {} 已存在",
                    student.student_id
                )));
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(
            student_id = %student.student_id,
            course = %student.course,
            "学生已登记"
        );
        Ok(student)
    }

    /// 全部学生（按登记顺序）
    pub fn list_all(&self) -> ApiResult<Vec<Student>> {
        Ok(self.student_repo.find_all()?)
    }

    /// 按学号查询
    pub fn get(&self, student_id: &str) -> ApiResult<Student> {
        let student_id = require_non_empty("学号", student_id)?;
        self.student_repo
            .find_by_id(student_id)?
            .ok_or_else(|| ApiError::NotFound(format!("学号 {} 未登记", student_id)))
    }

    /// 批量登记已解析的行
    ///
    /// 列按位置对应 学号/姓名/班级/联系方式。`mode` 为空时使用配置的默认模式。
    pub fn bulk_import(
        &self,
        rows: &[RawRow],
        mode: Option<ImportMode>,
    ) -> ApiResult<ImportReport> {
        let mode = match mode {
            Some(m) => m,
            None => self.config_manager.default_import_mode()?,
        };
        Ok(self.importer.import_rows(rows, mode, "rows")?)
    }
}
