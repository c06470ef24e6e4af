// ==========================================
// 国际化 (i18n)
// ==========================================
// 语言包: locales/zh-CN.yml（默认）、locales/en.yml
// 占位符写法: %{name}
// rust_i18n::i18n! 宏在 lib.rs 中初始化
// ==========================================

use crate::config::app_config::normalize_locale;
use crate::config::AppConfig;

/// 当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 切换语言（不支持的语言回落到 zh-CN）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(&normalize_locale(locale));
}

/// 按启动配置设置语言
pub fn apply_config(config: &AppConfig) {
    set_locale(&config.locale);
    tracing::debug!(locale = %current_locale(), "界面语言");
}

/// 取文案
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 取文案并替换占位符
///
/// ```no_run
/// use library_pc::i18n::t_with_args;
/// let msg = t_with_args("reservation.assigned", &[("student", "101"), ("pc", "PC1")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    args.iter().fold(t(key), |text, (name, value)| {
        text.replace(&format!("%{{{}}}", name), value)
    })
}
