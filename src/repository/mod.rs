// ==========================================
// 机房电脑分配管理 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod computer_repo;
pub mod error;
pub mod history_repo;
pub mod reservation_repo;
pub mod student_repo;

pub use computer_repo::ComputerRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use history_repo::{build_history_sql, HistoryRepository};
pub use reservation_repo::ReservationRepository;
pub use student_repo::StudentRepository;
