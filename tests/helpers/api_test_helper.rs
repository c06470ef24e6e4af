// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 提供API层集成测试的通用辅助函数
// ==========================================
#![allow(dead_code)]

use std::sync::Arc;
use tempfile::NamedTempFile;

use library_pc::api::{ApiError, ComputerApi, HistoryApi, ImportApi, ReservationApi, StudentApi};
use library_pc::config::ConfigManager;
use library_pc::db::{open_shared_connection, SharedConnection};
use library_pc::AppState;

use crate::test_helpers;

// ==========================================
// API测试环境
// ==========================================

/// API测试环境
///
/// 所有API共享同一个临时数据库文件
pub struct ApiTestEnv {
    pub db_path: String,
    pub student_api: Arc<StudentApi>,
    pub computer_api: Arc<ComputerApi>,
    pub reservation_api: Arc<ReservationApi>,
    pub history_api: Arc<HistoryApi>,
    pub import_api: Arc<ImportApi>,
    pub config_manager: Arc<ConfigManager>,

    // 原始连接（用于直接校验表内容）
    pub conn: SharedConnection,

    // 临时文件（确保生命周期）
    _temp_file: NamedTempFile,
}

impl ApiTestEnv {
    /// 创建新的API测试环境
    pub fn new() -> Result<Self, String> {
        library_pc::logging::init_test();

        let (temp_file, db_path) = test_helpers::create_test_db()
            .map_err(|e| format!("创建测试数据库失败: {}", e))?;

        let conn =
            open_shared_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        let state = AppState::from_connection(conn.clone(), db_path.clone());

        Ok(Self {
            db_path,
            student_api: state.student_api,
            computer_api: state.computer_api,
            reservation_api: state.reservation_api,
            history_api: state.history_api,
            import_api: state.import_api,
            config_manager: state.config_manager,
            conn,
            _temp_file: temp_file,
        })
    }

    /// 登记测试学生（班级固定为 FYBSC CS）
    pub fn seed_student(&self, student_id: &str, name: &str) {
        self.student_api
            .add(student_id, name, "FYBSC CS", "999")
            .expect("登记学生失败");
    }

    pub fn seed_pc(&self, pc_id: &str) {
        self.computer_api.add(pc_id).expect("登记机位失败");
    }

    /// 某机位进行中的上机记录数
    pub fn open_reservations_for_pc(&self, pc_id: &str) -> i64 {
        let conn = self.conn.lock().expect("锁获取失败");
        conn.query_row(
            "SELECT COUNT(*) FROM reservations WHERE pc_id = ?1 AND exit_time IS NULL",
            [pc_id],
            |row| row.get(0),
        )
        .expect("查询失败")
    }

    /// 某学生占用的机位数
    pub fn computers_held_by(&self, student_id: &str) -> i64 {
        let conn = self.conn.lock().expect("锁获取失败");
        conn.query_row(
            "SELECT COUNT(*) FROM computers WHERE student_id = ?1",
            [student_id],
            |row| row.get(0),
        )
        .expect("查询失败")
    }

    pub fn count_rows(&self, table: &str) -> i64 {
        let conn = self.conn.lock().expect("锁获取失败");
        conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
            .expect("查询失败")
    }
}

/// 断言错误码
pub fn assert_code(err: &ApiError, code: &str) {
    assert_eq!(err.code(), code, "错误类型不符: {}", err);
}
