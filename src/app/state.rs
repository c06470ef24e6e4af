// ==========================================
// 机房电脑分配管理 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 所有仓储共享同一个注入的数据库连接（测试可注入内存库）
// ==========================================

use std::sync::Arc;

use crate::api::{ComputerApi, HistoryApi, ImportApi, ReservationApi, StudentApi};
use crate::config::{AppConfig, ConfigManager};
use crate::db::{open_in_memory_shared, open_shared_connection, SharedConnection};
use crate::importer::StudentImporter;
use crate::repository::{
    ComputerRepository, HistoryRepository, ReservationRepository, StudentRepository,
};

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径（内存库为 ":memory:"）
    pub db_path: String,

    /// 学生登记API
    pub student_api: Arc<StudentApi>,

    /// 机位管理API
    pub computer_api: Arc<ComputerApi>,

    /// 上机/下机API
    pub reservation_api: Arc<ReservationApi>,

    /// 历史查询与导出API
    pub history_api: Arc<HistoryApi>,

    /// 学生导入API
    pub import_api: Arc<ImportApi>,

    /// 持久化配置
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// 按启动配置打开数据库并创建所有API实例
    ///
    /// 表结构在打开时幂等创建。
    pub fn new(config: &AppConfig) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", config.db_path);

        let conn = open_shared_connection(&config.db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        Ok(Self::from_connection(conn, config.db_path.clone()))
    }

    /// 使用内存数据库（测试用）
    pub fn in_memory() -> Result<Self, String> {
        let conn = open_in_memory_shared().map_err(|e| format!("无法创建内存数据库: {}", e))?;
        Ok(Self::from_connection(conn, ":memory:".to_string()))
    }

    /// 在已初始化表结构的连接上组装
    pub fn from_connection(conn: SharedConnection, db_path: String) -> Self {
        // ==========================================
        // 初始化Repository层
        // ==========================================
        let student_repo = Arc::new(StudentRepository::new(conn.clone()));
        let computer_repo = Arc::new(ComputerRepository::new(conn.clone()));
        let reservation_repo = Arc::new(ReservationRepository::new(conn.clone()));
        let history_repo = Arc::new(HistoryRepository::new(conn.clone()));
        let config_manager = Arc::new(ConfigManager::new(conn));

        let importer = Arc::new(StudentImporter::new(
            student_repo.clone(),
            config_manager.clone(),
        ));

        // ==========================================
        // 创建API实例
        // ==========================================
        let student_api = Arc::new(StudentApi::new(
            student_repo,
            config_manager.clone(),
            importer.clone(),
        ));
        let computer_api = Arc::new(ComputerApi::new(computer_repo));
        let reservation_api = Arc::new(ReservationApi::new(reservation_repo));
        let history_api = Arc::new(HistoryApi::new(history_repo));
        let import_api = Arc::new(ImportApi::new(importer, config_manager.clone()));

        tracing::info!("AppState初始化成功");

        Self {
            db_path,
            student_api,
            computer_api,
            reservation_api,
            history_api,
            import_api,
            config_manager,
        }
    }

    /// 获取数据库路径
    pub fn get_db_path(&self) -> &str {
        &self.db_path
    }
}
