// ==========================================
// 机房电脑分配管理 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为（外键、busy_timeout）
// - 启动时幂等建表（students / computers / reservations / config_kv）
// - 通过部分唯一索引在库层兜底"每个学生/每台机位至多一条进行中记录"
// ==========================================

use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 共享连接句柄（由 AppState 注入到各仓储）
pub type SharedConnection = Arc<Mutex<Connection>>;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 打开连接、建表，并包装为共享句柄
pub fn open_shared_connection(db_path: &str) -> rusqlite::Result<SharedConnection> {
    let conn = open_sqlite_connection(db_path)?;
    init_schema(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

/// 内存库（测试使用，每次调用互相隔离）
pub fn open_in_memory_shared() -> rusqlite::Result<SharedConnection> {
    let conn = Connection::open_in_memory()?;
    configure_sqlite_connection(&conn)?;
    init_schema(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

/// 幂等建表
///
/// - reservations.pc_id 不设外键: 历史记录在机位删除后仍需保留
/// - computers 上的 CHECK 约束对应 "Assigned 当且仅当 student_id 非空"
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS students (
            student_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            course TEXT NOT NULL,
            contact TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS computers (
            pc_id TEXT PRIMARY KEY,
            student_id TEXT REFERENCES students(student_id),
            status TEXT NOT NULL DEFAULT 'Vacant'
                CHECK (status IN ('Vacant', 'Assigned')),
            CHECK ((status = 'Assigned') = (student_id IS NOT NULL))
        );

        CREATE UNIQUE INDEX IF NOT EXISTS ux_computers_student
            ON computers(student_id) WHERE student_id IS NOT NULL;

        CREATE TABLE IF NOT EXISTS reservations (
            reservation_id INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id TEXT NOT NULL REFERENCES students(student_id),
            pc_id TEXT NOT NULL,
            entry_time TEXT NOT NULL,
            exit_time TEXT
        );

        CREATE UNIQUE INDEX IF NOT EXISTS ux_reservations_open_student
            ON reservations(student_id) WHERE exit_time IS NULL;
        CREATE UNIQUE INDEX IF NOT EXISTS ux_reservations_open_pc
            ON reservations(pc_id) WHERE exit_time IS NULL;
        CREATE INDEX IF NOT EXISTS idx_reservations_entry_time
            ON reservations(entry_time);

        CREATE TABLE IF NOT EXISTS config_kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime'))
        );
        "#,
    )?;

    Ok(())
}
