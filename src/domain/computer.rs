// ==========================================
// 机房电脑分配管理 - 机位领域模型
// ==========================================

use crate::domain::types::PcStatus;
use serde::{Deserialize, Serialize};

// ==========================================
// Computer - 机位
// ==========================================
// 对齐: computers 表
// 不变式: status == Assigned 当且仅当 assigned_student_id 非空
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Computer {
    pub pc_id: String,                       // 机位编号（主键）
    pub assigned_student_id: Option<String>, // 当前使用学生
    pub status: PcStatus,                    // 占用状态
}

impl Computer {
    /// 新登记的机位（空闲）
    pub fn vacant(pc_id: impl Into<String>) -> Self {
        Self {
            pc_id: pc_id.into().trim().to_string(),
            assigned_student_id: None,
            status: PcStatus::Vacant,
        }
    }

    pub fn is_vacant(&self) -> bool {
        self.status.is_vacant()
    }

    /// 只有空闲机位可以删除
    pub fn can_be_removed(&self) -> bool {
        self.assigned_student_id.is_none()
    }
}
