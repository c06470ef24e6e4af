// ==========================================
// 机房电脑分配管理 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 职责: 学生登记、机位管理、上机/下机记录、历史查询与导出
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据库基础设施（连接初始化/PRAGMA/建表）
pub mod db;

// 数据仓储层 - 数据访问
pub mod repository;

// 配置层 - 启动配置与持久化配置
pub mod config;

// 导入层 - 外部表格
pub mod importer;

// 导出层 - 历史记录文件
pub mod exporter;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// ==========================================
// 重导出核心类型
// ==========================================

pub use api::{
    ApiError, ApiResult, ComputerApi, ErrorKind, HistoryApi, ImportApi, ReservationApi,
    StudentApi,
};
pub use app::AppState;
pub use config::AppConfig;
pub use domain::{
    ActiveAssignment, Computer, HistoryFilter, HistoryRow, PcStatus, Reservation, Student,
};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "机房电脑分配管理";
