// ==========================================
// 机房电脑分配管理 - 领域类型定义
// ==========================================
// 机位状态机: Vacant --assign--> Assigned --unassign--> Vacant
// 时间戳格式: YYYY-MM-DD HH:MM:SS（本地时间，秒级，字典序即时间序）
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 时间戳存储格式
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 日期格式（按日期过滤历史时使用）
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ==========================================
// 机位状态 (PC Status)
// ==========================================
// 不变式: Assigned 当且仅当 assigned_student_id 非空
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PcStatus {
    Vacant,   // 空闲
    Assigned, // 已分配
}

impl PcStatus {
    /// 数据库存储值
    pub fn to_db_str(&self) -> &'static str {
        match self {
            PcStatus::Vacant => "Vacant",
            PcStatus::Assigned => "Assigned",
        }
    }

    /// 从数据库值解析（未知值按 Assigned 处理，避免把占用中的机位误判为空闲）
    pub fn from_db_str(s: &str) -> Self {
        match s.trim() {
            "Vacant" => PcStatus::Vacant,
            _ => PcStatus::Assigned,
        }
    }

    pub fn is_vacant(&self) -> bool {
        matches!(self, PcStatus::Vacant)
    }
}

impl fmt::Display for PcStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 时间戳辅助函数
// ==========================================

/// 当前本地时间（截断到秒）
pub fn now_local() -> NaiveDateTime {
    let now = chrono::Local::now().naive_local();
    // 存储精度为秒，这里先截断，保证内存值与落库值一致
    parse_timestamp(&format_timestamp(&now)).unwrap_or(now)
}

/// 格式化为存储字符串
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// 解析存储字符串
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT).ok()
}

/// 解析日期 (YYYY-MM-DD)
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// 时长展示
///
/// 不足一天: `H:MM:SS`；超过一天: `N day, H:MM:SS` / `N days, H:MM:SS`
pub fn format_duration(duration: &chrono::Duration) -> String {
    let total = duration.num_seconds();
    let (sign, total) = if total < 0 { ("-", -total) } else { ("", total) };

    let days = total / 86_400;
    let rem = total % 86_400;
    let hours = rem / 3_600;
    let minutes = (rem % 3_600) / 60;
    let seconds = rem % 60;

    let clock = format!("{}:{:02}:{:02}", hours, minutes, seconds);
    match days {
        0 => format!("{}{}", sign, clock),
        1 => format!("{}1 day, {}", sign, clock),
        n => format!("{}{} days, {}", sign, n, clock),
    }
}
