// ==========================================
// 机房电脑分配管理 - 历史记录查询仓储
// ==========================================
// 职责: students × reservations 的只读投影，支持按日期/学号/机位过滤
// 约束: 过滤条件一律以参数绑定，不拼接用户输入
// ==========================================

use crate::db::SharedConnection;
use crate::domain::reservation::{HistoryFilter, HistoryRow};
use crate::domain::types::DATE_FORMAT;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::reservation_repo::{get_optional_timestamp, get_timestamp};
use rusqlite::{params_from_iter, Connection, Result as SqliteResult};

// 不连接 computers 表：机位删除后其历史记录仍可查询
const HISTORY_BASE_SQL: &str = r#"
    SELECT s.student_id, s.name, r.pc_id, r.entry_time, r.exit_time
    FROM reservations r
    JOIN students s ON s.student_id = r.student_id
"#;

const HISTORY_ORDER_BY: &str = "r.entry_time DESC, r.reservation_id DESC";

/// 构建历史查询 SQL 与绑定参数
///
/// 参数顺序与条件出现顺序一致，全部使用 `?` 占位。
pub fn build_history_sql(filter: &HistoryFilter) -> (String, Vec<String>) {
    let mut conditions: Vec<&str> = Vec::new();
    let mut args: Vec<String> = Vec::new();

    if let Some(date) = filter.date {
        conditions.push("substr(r.entry_time, 1, 10) = ?");
        args.push(date.format(DATE_FORMAT).to_string());
    }
    if let Some(student_id) = &filter.student_id {
        conditions.push("s.student_id = ?");
        args.push(student_id.clone());
    }
    if let Some(pc_id) = &filter.pc_id {
        conditions.push("r.pc_id = ?");
        args.push(pc_id.clone());
    }

    let sql = if conditions.is_empty() {
        format!("{} ORDER BY {}", HISTORY_BASE_SQL, HISTORY_ORDER_BY)
    } else {
        format!(
            "{} WHERE {} ORDER BY {}",
            HISTORY_BASE_SQL,
            conditions.join(" AND "),
            HISTORY_ORDER_BY
        )
    };

    (sql, args)
}

// ==========================================
// HistoryRepository - 历史查询仓储
// ==========================================
pub struct HistoryRepository {
    conn: SharedConnection,
}

impl HistoryRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 按过滤条件查询历史（上机时间降序）
    pub fn query(&self, filter: &HistoryFilter) -> RepositoryResult<Vec<HistoryRow>> {
        let (sql, args) = build_history_sql(filter);
        tracing::debug!(sql = %sql.trim(), args = ?args, "历史查询");

        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(args.iter()), |row| {
                Ok(HistoryRow::new(
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    get_timestamp(row, 3)?,
                    get_optional_timestamp(row, 4)?,
                ))
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }
}
