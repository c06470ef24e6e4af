// ==========================================
// 机房电脑分配管理 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写
// 存储: config_kv 表 (key-value)
// ==========================================

use crate::db::SharedConnection;
use crate::importer::ImportMode;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::collections::BTreeMap;

/// 原登记表单提供的固定班级列表
pub const DEFAULT_COURSE_OPTIONS: [&str; 6] = [
    "FYBSC CS", "SYBSC CS", "TYBSC CS", "FYBSC IT", "SYBSC IT", "TYBSC IT",
];

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: SharedConnection,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 读取配置值，带默认值
    pub fn get_or_default(&self, key: &str, default: &str) -> RepositoryResult<String> {
        Ok(self.get(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 写入配置值（存在则覆盖）
    pub fn set(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO config_kv (key, value, updated_at)
            VALUES (?1, ?2, datetime('now', 'localtime'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        tracing::info!(key = key, "配置已更新");
        Ok(())
    }

    /// 所有已持久化的配置（按 key 排序）
    pub fn list_all(&self) -> RepositoryResult<BTreeMap<String, String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT key, value FROM config_kv ORDER BY key")?;
        let pairs = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(pairs.into_iter().collect())
    }

    // ==========================================
    // 类型化读取
    // ==========================================

    /// 可选班级列表（JSON 数组）
    ///
    /// 未配置或内容无法解析时返回默认列表。
    pub fn course_options(&self) -> RepositoryResult<Vec<String>> {
        let raw = match self.get(config_keys::COURSE_OPTIONS)? {
            Some(v) => v,
            None => return Ok(default_course_options()),
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(list) if !list.is_empty() => Ok(list),
            Ok(_) => Ok(default_course_options()),
            Err(e) => {
                tracing::warn!("{} 解析失败，使用默认值: {}", config_keys::COURSE_OPTIONS, e);
                Ok(default_course_options())
            }
        }
    }

    /// 覆盖班级列表
    pub fn set_course_options(&self, courses: &[String]) -> RepositoryResult<()> {
        let cleaned: Vec<String> = courses
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        if cleaned.is_empty() {
            return Err(RepositoryError::FieldValueError {
                field: config_keys::COURSE_OPTIONS.to_string(),
                message: "班级列表不能为空".to_string(),
            });
        }
        let json = serde_json::to_string(&cleaned)
            .map_err(|e| RepositoryError::Other(anyhow::Error::new(e)))?;
        self.set(config_keys::COURSE_OPTIONS, &json)
    }

    /// 是否强制班级必须出自列表
    pub fn enforce_course_options(&self) -> RepositoryResult<bool> {
        let raw = self.get_or_default(config_keys::ENFORCE_COURSE_OPTIONS, "false")?;
        Ok(matches!(raw.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
    }

    /// 默认批量导入模式
    pub fn default_import_mode(&self) -> RepositoryResult<ImportMode> {
        let raw = self.get(config_keys::IMPORT_DEFAULT_MODE)?;
        Ok(raw
            .as_deref()
            .and_then(ImportMode::from_config_str)
            .unwrap_or_default())
    }
}

fn default_course_options() -> Vec<String> {
    DEFAULT_COURSE_OPTIONS.iter().map(|s| s.to_string()).collect()
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 学生登记
    pub const COURSE_OPTIONS: &str = "student.course_options";
    pub const ENFORCE_COURSE_OPTIONS: &str = "student.enforce_course_options";

    // 批量导入
    pub const IMPORT_DEFAULT_MODE: &str = "import.default_mode";
}
