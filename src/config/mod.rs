// ==========================================
// 机房电脑分配管理 - 配置层
// ==========================================
// 职责: 启动配置（环境变量）与持久化配置（config_kv 表）
// ==========================================

pub mod app_config;
pub mod config_manager;

// 重导出核心配置类型
pub use app_config::{get_default_db_path, AppConfig};
pub use config_manager::{config_keys, ConfigManager, DEFAULT_COURSE_OPTIONS};
