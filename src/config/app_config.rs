// ==========================================
// 机房电脑分配管理 - 启动配置
// ==========================================
// 来源: 环境变量
// - LIBRARY_PC_DB_PATH: 数据库文件路径（缺省使用用户数据目录）
// - LIBRARY_PC_LOCALE:  界面语言（zh-CN / en，缺省 zh-CN）
// ==========================================

use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "LIBRARY_PC_DB_PATH";
pub const ENV_LOCALE: &str = "LIBRARY_PC_LOCALE";

pub const DEFAULT_LOCALE: &str = "zh-CN";
pub const SUPPORTED_LOCALES: [&str; 2] = ["zh-CN", "en"];

/// 启动配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: String,
    pub locale: String,
}

impl AppConfig {
    /// 从环境变量读取
    pub fn from_env() -> Self {
        let db_path = non_empty_env(ENV_DB_PATH).unwrap_or_else(get_default_db_path);
        let locale = non_empty_env(ENV_LOCALE)
            .map(|l| normalize_locale(&l))
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string());
        Self { db_path, locale }
    }

    /// 命令行参数覆盖
    pub fn with_overrides(mut self, db_path: Option<String>, locale: Option<String>) -> Self {
        if let Some(path) = db_path.filter(|p| !p.trim().is_empty()) {
            self.db_path = path.trim().to_string();
        }
        if let Some(l) = locale {
            self.locale = normalize_locale(&l);
        }
        self
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 不支持的语言回落到默认语言
pub fn normalize_locale(raw: &str) -> String {
    let raw = raw.trim();
    SUPPORTED_LOCALES
        .iter()
        .find(|l| l.eq_ignore_ascii_case(raw))
        .map(|l| l.to_string())
        .unwrap_or_else(|| {
            if raw.to_ascii_lowercase().starts_with("en") {
                "en".to_string()
            } else {
                DEFAULT_LOCALE.to_string()
            }
        })
}

/// 获取默认数据库路径
///
/// - 开发环境: 用户数据目录/library-pc-manager-dev/library_pc.db
/// - 生产环境: 用户数据目录/library-pc-manager/library_pc.db
/// - 取不到用户数据目录时: ./library_pc.db
pub fn get_default_db_path() -> String {
    let mut path = PathBuf::from("./library_pc.db");

    if let Some(data_dir) = dirs::data_dir() {
        #[cfg(debug_assertions)]
        let dir = data_dir.join("library-pc-manager-dev");

        #[cfg(not(debug_assertions))]
        let dir = data_dir.join("library-pc-manager");

        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("library_pc.db");
        }
    }

    path.to_string_lossy().to_string()
}
