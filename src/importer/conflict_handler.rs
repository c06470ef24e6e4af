// ==========================================
// 机房电脑分配管理 - 学号冲突检测
// ==========================================
// 职责: 检测同批次内 / 与已登记学生之间的重复学号
// ==========================================

use std::collections::{HashMap, HashSet};

pub struct ConflictHandler;

impl ConflictHandler {
    /// 检测同批次内重复学号
    ///
    /// # 参数
    /// - records: (行号, 学号) 列表，仅含已通过字段校验的行
    ///
    /// # 返回
    /// - Vec<(行号, 学号)>: 重复记录（不包括第一次出现）
    pub fn detect_duplicates(&self, records: &[(usize, String)]) -> Vec<(usize, String)> {
        let mut first_occurrence: HashMap<&str, usize> = HashMap::new();
        let mut duplicates = Vec::new();

        for (row_number, student_id) in records {
            if student_id.is_empty() {
                continue;
            }
            if first_occurrence.contains_key(student_id.as_str()) {
                duplicates.push((*row_number, student_id.clone()));
            } else {
                first_occurrence.insert(student_id.as_str(), *row_number);
            }
        }

        duplicates
    }

    /// 检测与数据库中已存在学号的冲突
    pub fn detect_existing(
        &self,
        records: &[(usize, String)],
        existing_ids: &HashSet<String>,
    ) -> Vec<(usize, String)> {
        records
            .iter()
            .filter(|(_, id)| existing_ids.contains(id))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(row: usize, id: &str) -> (usize, String) {
        (row, id.to_string())
    }

    #[test]
    fn test_detect_duplicates_in_batch() {
        let records = vec![rec(2, "101"), rec(3, "102"), rec(4, "101"), rec(5, "")];
        let dups = ConflictHandler.detect_duplicates(&records);
        assert_eq!(dups, vec![rec(4, "101")]);
    }

    #[test]
    fn test_detect_existing() {
        let records = vec![rec(2, "101"), rec(3, "102")];
        let existing: HashSet<String> = ["102".to_string()].into_iter().collect();
        let conflicts = ConflictHandler.detect_existing(&records, &existing);
        assert_eq!(conflicts, vec![rec(3, "102")]);
    }
}
