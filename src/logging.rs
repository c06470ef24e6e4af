// ==========================================
// 日志系统初始化
// ==========================================
// tracing-subscriber 输出到 stderr，stdout 只留给命令结果
// 级别优先级: 命令行 -v > RUST_LOG > info
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LEVEL: &str = "info";

fn build_filter(level: Option<&str>) -> EnvFilter {
    match level {
        Some(l) => EnvFilter::new(l),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL)),
    }
}

/// 初始化文本日志
///
/// # 示例
/// ```no_run
/// use library_pc::logging;
/// logging::init(None);
/// logging::init(Some("debug"));
/// ```
pub fn init(level: Option<&str>) {
    let _ = fmt()
        .with_env_filter(build_filter(level))
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .try_init();
}

/// 初始化 JSON 日志（配合命令行 --json）
pub fn init_json(level: Option<&str>) {
    let _ = fmt()
        .json()
        .with_env_filter(build_filter(level))
        .with_writer(std::io::stderr)
        .try_init();
}

/// 测试用: debug 级别，写入测试捕获的输出；可重复调用
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
