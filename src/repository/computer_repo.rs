// ==========================================
// 机房电脑分配管理 - 机位数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化
// ==========================================

use crate::db::SharedConnection;
use crate::domain::computer::Computer;
use crate::domain::types::PcStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};

// ==========================================
// ComputerRepository - 机位仓储
// ==========================================
pub struct ComputerRepository {
    conn: SharedConnection,
}

impl ComputerRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 登记新机位（状态 Vacant）
    ///
    /// # 返回
    /// - Err(UniqueConstraintViolation): 机位编号已存在
    pub fn insert(&self, pc_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO computers (pc_id, student_id, status) VALUES (?1, NULL, ?2)",
            params![pc_id, PcStatus::Vacant.to_db_str()],
        )?;
        Ok(())
    }

    /// 删除空闲机位
    ///
    /// 删除与"是否空闲"的判断在同一把锁内完成。
    ///
    /// # 返回
    /// - Err(NotFound): 机位不存在
    /// - Err(InvalidStateTransition): 机位正在使用
    pub fn delete_vacant(&self, pc_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let computer = conn
            .query_row(
                "SELECT pc_id, student_id, status FROM computers WHERE pc_id = ?1",
                params![pc_id],
                map_computer,
            )
            .optional()?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "Computer".to_string(),
                id: pc_id.to_string(),
            })?;

        if !computer.can_be_removed() {
            return Err(RepositoryError::InvalidStateTransition {
                from: computer.status.to_string(),
                to: "Deleted".to_string(),
            });
        }

        conn.execute(
            "DELETE FROM computers WHERE pc_id = ?1 AND student_id IS NULL",
            params![pc_id],
        )?;
        Ok(())
    }

    /// 按编号查询
    pub fn find_by_id(&self, pc_id: &str) -> RepositoryResult<Option<Computer>> {
        let conn = self.get_conn()?;
        let computer = conn
            .query_row(
                "SELECT pc_id, student_id, status FROM computers WHERE pc_id = ?1",
                params![pc_id],
                map_computer,
            )
            .optional()?;
        Ok(computer)
    }

    /// 查询学生当前占用的机位
    #[cfg(test)]
    pub fn find_by_student(&self, student_id: &str) -> RepositoryResult<Option<Computer>> {
        let conn = self.get_conn()?;
        let computer = conn
            .query_row(
                "SELECT pc_id, student_id, status FROM computers WHERE student_id = ?1",
                params![student_id],
                map_computer,
            )
            .optional()?;
        Ok(computer)
    }

    /// 全部机位（按登记顺序）
    pub fn find_all(&self) -> RepositoryResult<Vec<Computer>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT pc_id, student_id, status FROM computers ORDER BY rowid ASC")?;
        let computers = stmt
            .query_map([], map_computer)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(computers)
    }

    /// 空闲机位编号（按登记顺序）
    pub fn find_vacant_ids(&self) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT pc_id FROM computers WHERE status = ?1 ORDER BY rowid ASC",
        )?;
        let ids = stmt
            .query_map(params![PcStatus::Vacant.to_db_str()], |row| row.get(0))?
            .collect::<SqliteResult<Vec<String>>>()?;
        Ok(ids)
    }
}

pub(crate) fn map_computer(row: &Row<'_>) -> SqliteResult<Computer> {
    Ok(Computer {
        pc_id: row.get(0)?,
        assigned_student_id: row.get(1)?,
        status: PcStatus::from_db_str(&row.get::<_, String>(2)?),
    })
}
