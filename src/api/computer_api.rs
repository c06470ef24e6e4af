// ==========================================
// 机房电脑分配管理 - 机位管理 API
// ==========================================
// 职责: 机位登记、删除、查询
// 状态机: Vacant --assign--> Assigned --unassign--> Vacant
// ==========================================

use std::sync::Arc;

use crate::api::error::{require_non_empty, ApiError, ApiResult};
use crate::domain::computer::Computer;
use crate::repository::{ComputerRepository, RepositoryError};

pub struct ComputerApi {
    computer_repo: Arc<ComputerRepository>,
}

impl ComputerApi {
    pub fn new(computer_repo: Arc<ComputerRepository>) -> Self {
        Self { computer_repo }
    }

    /// 登记机位（初始为 Vacant）
    ///
    /// # 返回
    /// - Err(DuplicateKey): 机位编号已存在
    pub fn add(&self, pc_id: &str) -> ApiResult<Computer> {
        let pc_id = require_non_empty("机位编号", pc_id)?;

        match self.computer_repo.insert(pc_id) {
            Ok(()) => {}
            Err(RepositoryError::UniqueConstraintViolation(_)) => {
                tracing::warn!(pc_id = pc_id, "机位登记被拒绝: 编号重复");
                return Err(ApiError::DuplicateKey(format!("机位 {} 已存在", pc_id)));
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(pc_id = pc_id, "机位已登记");
        Ok(Computer::vacant(pc_id))
    }

    /// 删除机位
    ///
    /// # 返回
    /// - Err(NotFound): 机位不存在
    /// - Err(Conflict): 机位正在使用
    pub fn remove(&self, pc_id: &str) -> ApiResult<()> {
        let pc_id = require_non_empty("机位编号", pc_id)?;

        self.computer_repo.delete_vacant(pc_id).map_err(|e| {
            tracing::warn!(pc_id = pc_id, error = %e, "机位删除被拒绝");
            ApiError::from(e)
        })?;

        tracing::info!(pc_id = pc_id, "机位已删除");
        Ok(())
    }

    /// 全部机位及当前状态
    pub fn list_all(&self) -> ApiResult<Vec<Computer>> {
        Ok(self.computer_repo.find_all()?)
    }

    /// 空闲机位编号
    pub fn list_vacant(&self) -> ApiResult<Vec<String>> {
        Ok(self.computer_repo.find_vacant_ids()?)
    }

    pub fn get(&self, pc_id: &str) -> ApiResult<Computer> {
        let pc_id = require_non_empty("机位编号", pc_id)?;
        self.computer_repo
            .find_by_id(pc_id)?
            .ok_or_else(|| ApiError::NotFound(format!("机位 {} 不存在", pc_id)))
    }
}
