// ==========================================
// 机房电脑分配管理 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供展示层（命令行）调用
// 命令返回结果或错误，刷新时机由展示层决定
// ==========================================

pub mod computer_api;
pub mod error;
pub mod history_api;
pub mod import_api;
pub mod reservation_api;
pub mod student_api;

// 重导出核心类型
pub use computer_api::ComputerApi;
pub use error::{ApiError, ApiResult, ErrorKind, ErrorResponse};
pub use history_api::HistoryApi;
pub use import_api::ImportApi;
pub use reservation_api::ReservationApi;
pub use student_api::StudentApi;
