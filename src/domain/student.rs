// ==========================================
// 机房电脑分配管理 - 学生领域模型
// ==========================================
// 学生登记后不可修改、不可删除
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Student - 学生
// ==========================================
// 对齐: students 表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub student_id: String, // 学号（主键）
    pub name: String,       // 姓名
    pub course: String,     // 班级/课程（例如 FYBSC CS）
    pub contact: String,    // 联系方式
}

impl Student {
    /// 创建学生（字段统一去除首尾空白）
    pub fn new(
        student_id: impl Into<String>,
        name: impl Into<String>,
        course: impl Into<String>,
        contact: impl Into<String>,
    ) -> Self {
        Self {
            student_id: student_id.into().trim().to_string(),
            name: name.into().trim().to_string(),
            course: course.into().trim().to_string(),
            contact: contact.into().trim().to_string(),
        }
    }

    /// 返回第一个为空的必填字段名
    pub fn first_missing_field(&self) -> Option<&'static str> {
        [
            ("student_id", &self.student_id),
            ("name", &self.name),
            ("course", &self.course),
            ("contact", &self.contact),
        ]
        .into_iter()
        .find(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_fields() {
        let s = Student::new(" 101 ", "A ", " FYBSC CS", "999");
        assert_eq!(s.student_id, "101");
        assert_eq!(s.name, "A");
        assert_eq!(s.course, "FYBSC CS");
        assert_eq!(s.first_missing_field(), None);
    }

    #[test]
    fn test_first_missing_field() {
        let s = Student::new("101", "A", "FYBSC CS", "   ");
        assert_eq!(s.first_missing_field(), Some("contact"));

        let s = Student::new("", "", "", "");
        assert_eq!(s.first_missing_field(), Some("student_id"));
    }
}
