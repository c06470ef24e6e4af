// ==========================================
// 机房电脑分配管理 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑
// ==========================================

pub mod computer;
pub mod reservation;
pub mod student;
pub mod types;

// 重导出核心类型
pub use computer::Computer;
pub use reservation::{ActiveAssignment, HistoryFilter, HistoryRow, Reservation};
pub use student::Student;
pub use types::PcStatus;
