// ==========================================
// 机房电脑分配管理 - 学生数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化
// ==========================================

use crate::db::SharedConnection;
use crate::domain::student::Student;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};

// ==========================================
// StudentRepository - 学生仓储
// ==========================================
/// 职责: 管理 students 表的写入与查询
pub struct StudentRepository {
    conn: SharedConnection,
}

impl StudentRepository {
    /// 从已有连接创建仓储实例
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入学生
    ///
    /// # 返回
    /// - Err(UniqueConstraintViolation): 学号已存在
    pub fn insert(&self, student: &Student) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        insert_student(&conn, student)?;
        Ok(())
    }

    /// 在单个事务中批量插入
    ///
    /// 任意一行失败则整体回滚，返回失败行在切片中的下标与错误。
    pub fn insert_batch(&self, students: &[Student]) -> Result<usize, (usize, RepositoryError)> {
        let conn = self.get_conn().map_err(|e| (0, e))?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| (0, RepositoryError::DatabaseTransactionError(e.to_string())))?;

        for (idx, student) in students.iter().enumerate() {
            insert_student(&tx, student).map_err(|e| (idx, e.into()))?;
        }

        tx.commit()
            .map_err(|e| (0, RepositoryError::DatabaseTransactionError(e.to_string())))?;
        Ok(students.len())
    }

    /// 按学号查询
    pub fn find_by_id(&self, student_id: &str) -> RepositoryResult<Option<Student>> {
        let conn = self.get_conn()?;
        let student = conn
            .query_row(
                "SELECT student_id, name, course, contact FROM students WHERE student_id = ?1",
                params![student_id],
                map_student,
            )
            .optional()?;
        Ok(student)
    }

    /// 学号是否已存在
    pub fn exists(&self, student_id: &str) -> RepositoryResult<bool> {
        Ok(self.find_by_id(student_id)?.is_some())
    }

    /// 按登记顺序列出全部学生
    pub fn find_all(&self) -> RepositoryResult<Vec<Student>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT student_id, name, course, contact FROM students ORDER BY rowid ASC",
        )?;
        let students = stmt
            .query_map([], map_student)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(students)
    }

    /// 学生总数
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let n = conn.query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))?;
        Ok(n)
    }
}

fn insert_student(conn: &Connection, student: &Student) -> SqliteResult<usize> {
    conn.execute(
        "INSERT INTO students (student_id, name, course, contact) VALUES (?1, ?2, ?3, ?4)",
        params![
            student.student_id,
            student.name,
            student.course,
            student.contact,
        ],
    )
}

fn map_student(row: &Row<'_>) -> SqliteResult<Student> {
    Ok(Student {
        student_id: row.get(0)?,
        name: row.get(1)?,
        course: row.get(2)?,
        contact: row.get(3)?,
    })
}
