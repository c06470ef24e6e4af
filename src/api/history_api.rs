// ==========================================
// 机房电脑分配管理 - 历史记录 API
// ==========================================
// 职责: 历史查询（按日期/学号/机位过滤）与导出
// ==========================================

use std::path::Path;
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::reservation::{HistoryFilter, HistoryRow};
use crate::domain::types::parse_date;
use crate::exporter::{ExportSummary, HistoryExporter};
use crate::repository::HistoryRepository;

pub struct HistoryApi {
    history_repo: Arc<HistoryRepository>,
    exporter: HistoryExporter,
}

impl HistoryApi {
    pub fn new(history_repo: Arc<HistoryRepository>) -> Self {
        Self {
            history_repo,
            exporter: HistoryExporter,
        }
    }

    /// 由文本参数构建过滤条件
    ///
    /// 空白参数视为未设置；日期格式 YYYY-MM-DD。
    pub fn build_filter(
        date: Option<&str>,
        student_id: Option<&str>,
        pc_id: Option<&str>,
    ) -> ApiResult<HistoryFilter> {
        let mut filter = HistoryFilter::new();

        if let Some(raw) = date.map(str::trim).filter(|s| !s.is_empty()) {
            let parsed = parse_date(raw).ok_or_else(|| {
                ApiError::ValidationError(format!("日期格式错误（应为YYYY-MM-DD）: {}", raw))
            })?;
            filter = filter.with_date(parsed);
        }
        if let Some(id) = student_id.map(str::trim).filter(|s| !s.is_empty()) {
            filter = filter.with_student(id);
        }
        if let Some(id) = pc_id.map(str::trim).filter(|s| !s.is_empty()) {
            filter = filter.with_pc(id);
        }
        Ok(filter)
    }

    /// 查询历史（上机时间降序；无过滤条件时返回全部）
    pub fn query(&self, filter: &HistoryFilter) -> ApiResult<Vec<HistoryRow>> {
        Ok(self.history_repo.query(filter)?)
    }

    /// 导出给定的行（即当前展示的行，不重新查询）
    ///
    /// # 返回
    /// - Err(ValidationError): 没有可导出的行
    /// - Err(IoError): 写入失败，目标文件保持原样
    pub fn export(&self, rows: &[HistoryRow], destination: &Path) -> ApiResult<ExportSummary> {
        self.exporter.export(rows, destination).map_err(|e| {
            tracing::warn!(destination = %destination.display(), error = %e, "导出失败");
            ApiError::from(e)
        })
    }
}
