// ==========================================
// 机房电脑分配管理 - 学生导入 API
// ==========================================
// 职责: 封装表格文件导入（.xlsx/.xls/.csv）与预览
// ==========================================

use std::path::Path;
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::config::ConfigManager;
use crate::importer::{ImportMode, ImportReport, RawSheet, StudentImporter};

pub struct ImportApi {
    importer: Arc<StudentImporter>,
    config_manager: Arc<ConfigManager>,
}

impl ImportApi {
    pub fn new(importer: Arc<StudentImporter>, config_manager: Arc<ConfigManager>) -> Self {
        Self {
            importer,
            config_manager,
        }
    }

    /// 从文件批量登记学生
    ///
    /// `mode` 为空时使用配置项 import.default_mode。
    pub fn import_file(&self, path: &Path, mode: Option<ImportMode>) -> ApiResult<ImportReport> {
        let mode = match mode {
            Some(m) => m,
            None => self.config_manager.default_import_mode()?,
        };
        let report = self.importer.import_file(path, mode).map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "学生导入失败");
            e
        })?;
        Ok(report)
    }

    /// 预览文件内容（不写库）
    pub fn preview(&self, path: &Path) -> ApiResult<RawSheet> {
        Ok(self.importer.preview(path)?)
    }
}
