// ==========================================
// 机房电脑分配管理 - 上机/下机 API
// ==========================================
// 职责: 分配空闲机位、下机释放机位、当前占用查询
// 约束: 每名学生、每台机位同一时刻至多一条进行中记录
//       上机/下机各自在单个事务内完成（见 ReservationRepository）
// ==========================================

use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::api::error::{require_non_empty, ApiError, ApiResult};
use crate::domain::reservation::{ActiveAssignment, Reservation};
use crate::domain::types::{format_timestamp, now_local};
use crate::repository::{RepositoryError, ReservationRepository};

// ==========================================
// ReservationApi - 上机记录 API
// ==========================================
pub struct ReservationApi {
    reservation_repo: Arc<ReservationRepository>,
}

impl ReservationApi {
    pub fn new(reservation_repo: Arc<ReservationRepository>) -> Self {
        Self { reservation_repo }
    }

    /// 上机（当前时间）
    pub fn assign(&self, student_id: &str, pc_id: &str) -> ApiResult<Reservation> {
        self.assign_at(student_id, pc_id, now_local())
    }

    /// 上机（指定时间）
    ///
    /// # 返回
    /// - Err(ValidationError): 学号未登记
    /// - Err(NotFound): 机位不存在
    /// - Err(Conflict): 机位非空闲，或学生已占用其他机位
    pub fn assign_at(
        &self,
        student_id: &str,
        pc_id: &str,
        entry_time: NaiveDateTime,
    ) -> ApiResult<Reservation> {
        let student_id = require_non_empty("学号", student_id)?;
        let pc_id = require_non_empty("机位编号", pc_id)?;

        let reservation = self
            .reservation_repo
            .open(student_id, pc_id, entry_time)
            .map_err(|e| {
                tracing::warn!(student_id, pc_id, error = %e, "上机被拒绝");
                match e {
                    RepositoryError::NotFound { entity, id } if entity == "Student" => {
                        ApiError::ValidationError(format!("学号 {} 未登记", id))
                    }
                    other => ApiError::from(other),
                }
            })?;

        tracing::info!(
            reservation_id = reservation.reservation_id,
            student_id,
            pc_id,
            entry_time = %format_timestamp(&reservation.entry_time),
            "上机"
        );
        Ok(reservation)
    }

    /// 下机（当前时间）
    pub fn unassign(&self, student_id: &str) -> ApiResult<Reservation> {
        self.unassign_at(student_id, now_local())
    }

    /// 下机（指定时间）
    ///
    /// # 返回
    /// - Err(NotFound): 学生没有进行中的记录
    /// - Err(ValidationError): 下机时间早于上机时间
    pub fn unassign_at(
        &self,
        student_id: &str,
        exit_time: NaiveDateTime,
    ) -> ApiResult<Reservation> {
        let student_id = require_non_empty("学号", student_id)?;

        let reservation = self
            .reservation_repo
            .close_for_student(student_id, exit_time)
            .map_err(|e| {
                tracing::warn!(student_id, error = %e, "下机被拒绝");
                match e {
                    RepositoryError::NotFound { .. } => {
                        ApiError::NotFound(format!("学号 {} 没有进行中的上机记录", student_id))
                    }
                    other => ApiError::from(other),
                }
            })?;

        tracing::info!(
            reservation_id = reservation.reservation_id,
            student_id,
            pc_id = %reservation.pc_id,
            "下机"
        );
        Ok(reservation)
    }

    /// 当前占用（上机时间升序）
    pub fn list_active(&self) -> ApiResult<Vec<ActiveAssignment>> {
        Ok(self.reservation_repo.find_active_assignments()?)
    }

    /// 学生当前进行中的记录
    pub fn active_for_student(&self, student_id: &str) -> ApiResult<Option<Reservation>> {
        let student_id = require_non_empty("学号", student_id)?;
        Ok(self.reservation_repo.find_open_by_student(student_id)?)
    }
}
