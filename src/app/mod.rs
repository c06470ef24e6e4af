// ==========================================
// 机房电脑分配管理 - 应用层
// ==========================================
// 职责: 组装仓储与API，供展示层使用
// ==========================================

pub mod state;

// 重导出
pub use crate::config::get_default_db_path;
pub use state::AppState;
