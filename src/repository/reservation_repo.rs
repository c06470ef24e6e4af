// ==========================================
// 机房电脑分配管理 - 上机记录数据仓储
// ==========================================
// 职责: reservations 表读写；上机/下机两个写操作各自在单个事务内
//       同时维护 reservations 与 computers，保证"至多一条进行中记录"
// 约束: 所有查询使用参数化
// ==========================================

use crate::db::SharedConnection;
use crate::domain::reservation::{ActiveAssignment, Reservation};
use crate::domain::types::{format_timestamp, parse_timestamp, PcStatus};
use crate::repository::computer_repo::map_computer;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};

// ==========================================
// ReservationRepository - 上机记录仓储
// ==========================================
pub struct ReservationRepository {
    conn: SharedConnection,
}

impl ReservationRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 上机: 新建进行中记录并占用机位
    ///
    /// # 返回
    /// - Err(NotFound{entity="Student"}): 学号不存在
    /// - Err(NotFound{entity="Computer"}): 机位不存在
    /// - Err(BusinessRuleViolation): 学生已占用其他机位
    /// - Err(InvalidStateTransition): 机位非空闲
    pub fn open(
        &self,
        student_id: &str,
        pc_id: &str,
        entry_time: NaiveDateTime,
    ) -> RepositoryResult<Reservation> {
        let conn = self.get_conn()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let student_exists = tx
            .query_row(
                "SELECT 1 FROM students WHERE student_id = ?1",
                params![student_id],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if !student_exists {
            return Err(RepositoryError::NotFound {
                entity: "Student".to_string(),
                id: student_id.to_string(),
            });
        }

        let computer = tx
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

        // 学生是否已占用机位（机位表与进行中记录两处都查）
        let occupied_pc: Option<String> = tx
            .query_row(
                "SELECT pc_id FROM computers WHERE student_id = ?1",
                params![student_id],
                |row| row.get(0),
            )
            .optional()?;
        let open_pc: Option<String> = tx
            .query_row(
                "SELECT pc_id FROM reservations WHERE student_id = ?1 AND exit_time IS NULL",
                params![student_id],
                |row| row.get(0),
            )
            .optional()?;
        if let Some(other) = occupied_pc.or(open_pc) {
            return Err(RepositoryError::BusinessRuleViolation(format!(
                "学生 {} 已占用机位 {}",
                student_id, other
            )));
        }

        if !computer.is_vacant() {
            return Err(RepositoryError::InvalidStateTransition {
                from: computer.status.to_string(),
                to: PcStatus::Assigned.to_string(),
            });
        }

        tx.execute(
            "INSERT INTO reservations (student_id, pc_id, entry_time, exit_time) \
             VALUES (?1, ?2, ?3, NULL)",
            params![student_id, pc_id, format_timestamp(&entry_time)],
        )?;
        let reservation_id = tx.last_insert_rowid();

        tx.execute(
            "UPDATE computers SET student_id = ?1, status = ?2 WHERE pc_id = ?3",
            params![student_id, PcStatus::Assigned.to_db_str(), pc_id],
        )?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(Reservation {
            reservation_id,
            student_id: student_id.to_string(),
            pc_id: pc_id.to_string(),
            entry_time,
            exit_time: None,
        })
    }

    /// 下机: 关闭学生的进行中记录并释放机位
    ///
    /// # 返回
    /// - Err(NotFound{entity="OpenReservation"}): 学生没有进行中的记录
    /// - Err(FieldValueError): 下机时间早于上机时间
    pub fn close_for_student(
        &self,
        student_id: &str,
        exit_time: NaiveDateTime,
    ) -> RepositoryResult<Reservation> {
        let conn = self.get_conn()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let open = tx
            .query_row(
                "SELECT reservation_id, student_id, pc_id, entry_time, exit_time \
                 FROM reservations WHERE student_id = ?1 AND exit_time IS NULL",
                params![student_id],
                map_reservation,
            )
            .optional()?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "OpenReservation".to_string(),
                id: student_id.to_string(),
            })?;

        if exit_time < open.entry_time {
            return Err(RepositoryError::FieldValueError {
                field: "exit_time".to_string(),
                message: format!(
                    "下机时间 {} 早于上机时间 {}",
                    format_timestamp(&exit_time),
                    format_timestamp(&open.entry_time)
                ),
            });
        }

        let updated = tx.execute(
            "UPDATE reservations SET exit_time = ?1 \
             WHERE reservation_id = ?2 AND exit_time IS NULL",
            params![format_timestamp(&exit_time), open.reservation_id],
        )?;
        if updated != 1 {
            return Err(RepositoryError::DatabaseTransactionError(format!(
                "关闭上机记录失败: reservation_id={}",
                open.reservation_id
            )));
        }

        tx.execute(
            "UPDATE computers SET student_id = NULL, status = ?1 WHERE student_id = ?2",
            params![PcStatus::Vacant.to_db_str(), student_id],
        )?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(Reservation {
            exit_time: Some(exit_time),
            ..open
        })
    }

    // ==========================================
    // 查询操作
    // ==========================================

    pub fn find_by_id(&self, reservation_id: i64) -> RepositoryResult<Option<Reservation>> {
        let conn = self.get_conn()?;
        let r = conn
            .query_row(
                "SELECT reservation_id, student_id, pc_id, entry_time, exit_time \
                 FROM reservations WHERE reservation_id = ?1",
                params![reservation_id],
                map_reservation,
            )
            .optional()?;
        Ok(r)
    }

    /// 学生的进行中记录
    pub fn find_open_by_student(&self, student_id: &str) -> RepositoryResult<Option<Reservation>> {
        let conn = self.get_conn()?;
        let r = conn
            .query_row(
                "SELECT reservation_id, student_id, pc_id, entry_time, exit_time \
                 FROM reservations WHERE student_id = ?1 AND exit_time IS NULL",
                params![student_id],
                map_reservation,
            )
            .optional()?;
        Ok(r)
    }

    /// 机位的全部进行中记录（正常情况下至多一条）
    #[cfg(test)]
    pub fn find_open_by_pc(&self, pc_id: &str) -> RepositoryResult<Vec<Reservation>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT reservation_id, student_id, pc_id, entry_time, exit_time \
             FROM reservations WHERE pc_id = ?1 AND exit_time IS NULL",
        )?;
        let rows = stmt
            .query_map(params![pc_id], map_reservation)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    /// 当前占用列表（按上机时间升序，最早的在前）
    pub fn find_active_assignments(&self) -> RepositoryResult<Vec<ActiveAssignment>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT s.student_id, s.name, c.pc_id, r.entry_time
            FROM reservations r
            JOIN students s ON s.student_id = r.student_id
            JOIN computers c ON c.pc_id = r.pc_id
            WHERE c.status != ?1 AND r.exit_time IS NULL
            ORDER BY r.entry_time ASC, r.reservation_id ASC
            "#,
        )?;
        let rows = stmt
            .query_map(params![PcStatus::Vacant.to_db_str()], |row| {
                Ok(ActiveAssignment {
                    student_id: row.get(0)?,
                    name: row.get(1)?,
                    pc_id: row.get(2)?,
                    entry_time: get_timestamp(row, 3)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }
}

pub(crate) fn map_reservation(row: &Row<'_>) -> SqliteResult<Reservation> {
    Ok(Reservation {
        reservation_id: row.get(0)?,
        student_id: row.get(1)?,
        pc_id: row.get(2)?,
        entry_time: get_timestamp(row, 3)?,
        exit_time: get_optional_timestamp(row, 4)?,
    })
}

/// 读取 TEXT 时间戳列
pub(crate) fn get_timestamp(row: &Row<'_>, idx: usize) -> SqliteResult<NaiveDateTime> {
    let raw: String = row.get(idx)?;
    parse_timestamp(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("非法时间戳: {}", raw).into(),
        )
    })
}

/// 读取可空 TEXT 时间戳列（空串按 NULL 处理）
pub(crate) fn get_optional_timestamp(
    row: &Row<'_>,
    idx: usize,
) -> SqliteResult<Option<NaiveDateTime>> {
    match row.get::<_, Option<String>>(idx)? {
        Some(raw) if !raw.trim().is_empty() => parse_timestamp(&raw).map(Some).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                idx,
                Type::Text,
                format!("非法时间戳: {}", raw).into(),
            )
        }),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory_shared;
    use crate::repository::computer_repo::ComputerRepository;

    fn ts(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    fn setup() -> (SharedConnection, ReservationRepository, ComputerRepository) {
        let conn = open_in_memory_shared().unwrap();
        {
            let c = conn.lock().unwrap();
            c.execute_batch(
                r#"
                INSERT INTO students VALUES ('101', 'A', 'FYBSC CS', '999');
                INSERT INTO students VALUES ('102', 'B', 'SYBSC IT', '888');
                INSERT INTO computers (pc_id) VALUES ('PC1');
                INSERT INTO computers (pc_id) VALUES ('PC2');
                "#,
            )
            .unwrap();
        }
        (
            conn.clone(),
            ReservationRepository::new(conn.clone()),
            ComputerRepository::new(conn),
        )
    }

    #[test]
    fn test_open_and_close() {
        let (_conn, repo, pcs) = setup();

        let r = repo.open("101", "PC1", ts("2024-03-01 09:00:00")).unwrap();
        assert!(r.is_open());
        let pc = pcs.find_by_id("PC1").unwrap().unwrap();
        assert_eq!(pc.status, PcStatus::Assigned);
        assert_eq!(pc.assigned_student_id.as_deref(), Some("101"));

        let closed = repo
            .close_for_student("101", ts("2024-03-01 10:00:00"))
            .unwrap();
        assert_eq!(closed.reservation_id, r.reservation_id);
        assert_eq!(closed.duration().unwrap().num_seconds(), 3_600);

        let pc = pcs.find_by_id("PC1").unwrap().unwrap();
        assert_eq!(pc.status, PcStatus::Vacant);
        assert!(pc.assigned_student_id.is_none());

        let stored = repo.find_by_id(r.reservation_id).unwrap().unwrap();
        assert_eq!(stored.exit_time, Some(ts("2024-03-01 10:00:00")));
    }

    #[test]
    fn test_open_rejects_unknown_student_and_pc() {
        let (_conn, repo, _pcs) = setup();

        let err = repo.open("404", "PC1", ts("2024-03-01 09:00:00")).unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { ref entity, .. } if entity == "Student"));

        let err = repo.open("101", "PC9", ts("2024-03-01 09:00:00")).unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { ref entity, .. } if entity == "Computer"));
    }

    #[test]
    fn test_open_rejects_double_assignment() {
        let (_conn, repo, _pcs) = setup();
        repo.open("101", "PC1", ts("2024-03-01 09:00:00")).unwrap();

        // 机位已占用
        let err = repo.open("102", "PC1", ts("2024-03-01 09:01:00")).unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidStateTransition { .. }));

        // 学生已占用其他机位
        let err = repo.open("101", "PC2", ts("2024-03-01 09:02:00")).unwrap_err();
        assert!(matches!(err, RepositoryError::BusinessRuleViolation(_)));

        assert_eq!(repo.find_open_by_pc("PC1").unwrap().len(), 1);
        assert!(repo.find_open_by_pc("PC2").unwrap().is_empty());
    }

    #[test]
    fn test_close_without_open_reservation() {
        let (_conn, repo, _pcs) = setup();
        let err = repo
            .close_for_student("101", ts("2024-03-01 10:00:00"))
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }

    #[test]
    fn test_close_before_entry_is_rejected_and_rolled_back() {
        let (_conn, repo, pcs) = setup();
        repo.open("101", "PC1", ts("2024-03-01 09:00:00")).unwrap();

        let err = repo
            .close_for_student("101", ts("2024-03-01 08:00:00"))
            .unwrap_err();
        assert!(matches!(err, RepositoryError::FieldValueError { .. }));

        assert!(repo.find_open_by_student("101").unwrap().is_some());
        assert_eq!(
            pcs.find_by_id("PC1").unwrap().unwrap().status,
            PcStatus::Assigned
        );
    }

    #[test]
    fn test_active_assignments_ordered_by_entry_time() {
        let (_conn, repo, _pcs) = setup();
        repo.open("102", "PC2", ts("2024-03-01 11:00:00")).unwrap();
        repo.open("101", "PC1", ts("2024-03-01 09:00:00")).unwrap();

        let active = repo.find_active_assignments().unwrap();
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].student_id, "101");
        assert_eq!(active[0].name, "A");
        assert_eq!(active[1].pc_id, "PC2");
    }
}
