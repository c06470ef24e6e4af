// ==========================================
// 机房电脑分配管理 - 上机记录领域模型
// ==========================================
// Reservation: 一次上机会话（entry_time 必填，exit_time 仅在下机时写入一次）
// ActiveAssignment: 当前占用视图
// HistoryRow / HistoryFilter: 历史查询投影与过滤条件
// ==========================================

use crate::domain::types::{format_duration, format_timestamp};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// Reservation - 上机记录
// ==========================================
// 对齐: reservations 表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub reservation_id: i64,              // 自增主键（同秒内的先后顺序）
    pub student_id: String,               // 学号
    pub pc_id: String,                    // 机位编号
    pub entry_time: NaiveDateTime,        // 上机时间
    pub exit_time: Option<NaiveDateTime>, // 下机时间（None 表示进行中）
}

impl Reservation {
    pub fn is_open(&self) -> bool {
        self.exit_time.is_none()
    }

    /// 会话时长（进行中的会话没有时长）
    pub fn duration(&self) -> Option<Duration> {
        self.exit_time.map(|exit| exit - self.entry_time)
    }
}

// ==========================================
// ActiveAssignment - 当前占用
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveAssignment {
    pub student_id: String,
    pub name: String,
    pub pc_id: String,
    pub entry_time: NaiveDateTime,
}

// ==========================================
// HistoryRow - 历史记录行
// ==========================================
// 列顺序与导出列一致: 学号 / 姓名 / 机位 / 上机时间 / 下机时间 / 时长
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub student_id: String,
    pub name: String,
    pub pc_id: String,
    pub entry_time: NaiveDateTime,
    pub exit_time: Option<NaiveDateTime>,
    pub duration_secs: Option<i64>, // 时长（秒），进行中为 None
}

impl HistoryRow {
    pub fn new(
        student_id: String,
        name: String,
        pc_id: String,
        entry_time: NaiveDateTime,
        exit_time: Option<NaiveDateTime>,
    ) -> Self {
        let duration_secs = exit_time.map(|exit| (exit - entry_time).num_seconds());
        Self {
            student_id,
            name,
            pc_id,
            entry_time,
            exit_time,
            duration_secs,
        }
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration_secs.map(Duration::seconds)
    }

    pub fn entry_time_display(&self) -> String {
        format_timestamp(&self.entry_time)
    }

    /// 进行中的会话返回空串
    pub fn exit_time_display(&self) -> String {
        self.exit_time.as_ref().map(format_timestamp).unwrap_or_default()
    }

    /// 进行中的会话返回空串
    pub fn duration_display(&self) -> String {
        self.duration()
            .as_ref()
            .map(format_duration)
            .unwrap_or_default()
    }

    /// 按导出列顺序展开为文本
    pub fn to_cells(&self) -> [String; 6] {
        [
            self.student_id.clone(),
            self.name.clone(),
            self.pc_id.clone(),
            self.entry_time_display(),
            self.exit_time_display(),
            self.duration_display(),
        ]
    }
}

// ==========================================
// HistoryFilter - 历史过滤条件
// ==========================================
// 所有已设置的条件以 AND 组合；全部为空时返回完整历史
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryFilter {
    pub date: Option<NaiveDate>,    // 按上机日期精确匹配
    pub student_id: Option<String>, // 按学号精确匹配
    pub pc_id: Option<String>,      // 按机位精确匹配
}

impl HistoryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_student(mut self, student_id: impl Into<String>) -> Self {
        self.student_id = Some(student_id.into());
        self
    }

    pub fn with_pc(mut self, pc_id: impl Into<String>) -> Self {
        self.pc_id = Some(pc_id.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.student_id.is_none() && self.pc_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::parse_timestamp;

    fn ts(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    #[test]
    fn test_reservation_duration() {
        let mut r = Reservation {
            reservation_id: 1,
            student_id: "101".to_string(),
            pc_id: "PC1".to_string(),
            entry_time: ts("2024-03-01 09:00:00"),
            exit_time: None,
        };
        assert!(r.is_open());
        assert_eq!(r.duration(), None);

        r.exit_time = Some(ts("2024-03-01 10:30:15"));
        assert!(!r.is_open());
        assert_eq!(r.duration(), Some(Duration::seconds(5_415)));
    }

    #[test]
    fn test_history_row_cells() {
        let row = HistoryRow::new(
            "101".to_string(),
            "A".to_string(),
            "PC1".to_string(),
            ts("2024-03-01 09:00:00"),
            Some(ts("2024-03-01 10:00:00")),
        );
        assert_eq!(
            row.to_cells(),
            [
                "101".to_string(),
                "A".to_string(),
                "PC1".to_string(),
                "2024-03-01 09:00:00".to_string(),
                "2024-03-01 10:00:00".to_string(),
                "1:00:00".to_string(),
            ]
        );

        let open = HistoryRow::new(
            "101".to_string(),
            "A".to_string(),
            "PC1".to_string(),
            ts("2024-03-01 09:00:00"),
            None,
        );
        assert_eq!(open.exit_time_display(), "");
        assert_eq!(open.duration_display(), "");
        assert!(open.duration().is_none());
    }

    #[test]
    fn test_history_filter_builder() {
        assert!(HistoryFilter::new().is_empty());
        let f = HistoryFilter::new().with_pc("PC1").with_student("101");
        assert!(!f.is_empty());
        assert_eq!(f.pc_id.as_deref(), Some("PC1"));
        assert_eq!(f.student_id.as_deref(), Some("101"));
        assert!(f.date.is_none());
    }
}
