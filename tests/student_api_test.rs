// ==========================================
// StudentApi 集成测试
// ==========================================
// 测试范围:
// 1. 登记校验（空字段、重复学号、班级列表）
// 2. 列表顺序、按学号查询
// 3. 已解析行的批量登记
// ==========================================

mod helpers;

use helpers::api_test_helper::*;
use library_pc::api::ApiError;
use library_pc::config::config_keys;
use library_pc::importer::{ImportMode, RawRow, RowIssueKind};

fn raw(row_number: usize, cells: [&str; 4]) -> RawRow {
    RawRow {
        row_number,
        cells: cells.iter().map(|c| c.to_string()).collect(),
    }
}

#[test]
fn test_add_成功() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let s = env
        .student_api
        .add(" 101 ", "A", "FYBSC CS", "999")
        .expect("登记失败");
    assert_eq!(s.student_id, "101");

    let found = env.student_api.get("101").expect("查询失败");
    assert_eq!(found, s);
}

#[test]
fn test_add_学号重复() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    env.student_api
        .add("101", "A", "FYBSC CS", "999")
        .expect("登记失败");

    let err = env
        .student_api
        .add("101", "Other", "SYBSC IT", "111")
        .unwrap_err();
    assert_code(&err, "DUPLICATE_KEY");

    let all = env.student_api.list_all().expect("查询失败");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "A", "原记录不应被覆盖");
}

#[test]
fn test_add_空字段() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    for (id, name, course, contact) in [
        ("", "A", "FYBSC CS", "999"),
        ("101", " ", "FYBSC CS", "999"),
        ("101", "A", "", "999"),
        ("101", "A", "FYBSC CS", ""),
    ] {
        let err = env.student_api.add(id, name, course, contact).unwrap_err();
        assert_code(&err, "VALIDATION_ERROR");
    }
    assert_eq!(env.count_rows("students"), 0);
}

#[test]
fn test_add_班级校验() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    // 默认不校验
    env.student_api
        .add("101", "A", "MSC DS", "999")
        .expect("未启用校验时应允许任意班级");

    env.config_manager
        .set(config_keys::ENFORCE_COURSE_OPTIONS, "true")
        .expect("设置失败");
    let err = env
        .student_api
        .add("102", "B", "MSC DS", "888")
        .unwrap_err();
    assert_code(&err, "VALIDATION_ERROR");

    env.student_api
        .add("103", "C", "TYBSC IT", "777")
        .expect("默认列表中的班级应通过");
}

#[test]
fn test_list_all_登记顺序() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    for id in ["300", "100", "200"] {
        env.seed_student(id, "X");
    }
    let ids: Vec<String> = env
        .student_api
        .list_all()
        .expect("查询失败")
        .into_iter()
        .map(|s| s.student_id)
        .collect();
    assert_eq!(ids, vec!["300", "100", "200"]);
}

#[test]
fn test_get_未登记() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let err = env.student_api.get("404").unwrap_err();
    assert_code(&err, "NOT_FOUND");
}

#[test]
fn test_bulk_import_整批拒绝() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    env.seed_student("102", "Existing");

    let rows = vec![
        raw(2, ["101", "A", "FYBSC CS", "999"]),
        raw(3, ["102", "B", "FYBSC CS", "888"]),
    ];
    let err = env
        .student_api
        .bulk_import(&rows, Some(ImportMode::AllOrNothing))
        .unwrap_err();
    assert_code(&err, "VALIDATION_ERROR");
    match err {
        ApiError::ImportRejected { issues, .. } => {
            assert_eq!(issues.len(), 1);
            assert_eq!(issues[0].row_number, 3);
            assert_eq!(issues[0].kind, RowIssueKind::DuplicateKey);
        }
        other => panic!("Expected ImportRejected, got {:?}", other),
    }
    assert!(env.student_api.get("101").is_err(), "整批拒绝时不应写入任何行");
}

#[test]
fn test_bulk_import_尽力导入() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let rows = vec![
        raw(2, ["101", "A", "FYBSC CS", "999"]),
        raw(3, ["101", "A again", "FYBSC CS", "999"]),
        raw(4, ["103", "C", "FYBSC CS", ""]),
        raw(5, ["104", "D", "SYBSC IT", "777"]),
    ];
    let report = env
        .student_api
        .bulk_import(&rows, Some(ImportMode::BestEffort))
        .expect("导入失败");

    assert_eq!(report.total_rows, 4);
    assert_eq!(report.imported, 2);
    let skipped: Vec<(usize, RowIssueKind)> =
        report.skipped.iter().map(|i| (i.row_number, i.kind)).collect();
    assert_eq!(
        skipped,
        vec![(3, RowIssueKind::DuplicateKey), (4, RowIssueKind::MissingField)]
    );
    assert_eq!(env.student_api.get("101").expect("查询失败").name, "A");
}

#[test]
fn test_bulk_import_无效行后的同学号合法行() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let rows = vec![
        raw(2, ["101", "", "FYBSC CS", "999"]),
        raw(3, ["101", "A", "FYBSC CS", "999"]),
    ];
    let report = env
        .student_api
        .bulk_import(&rows, Some(ImportMode::BestEffort))
        .expect("导入失败");

    assert_eq!(report.imported, 1);
    let skipped: Vec<(usize, RowIssueKind)> =
        report.skipped.iter().map(|i| (i.row_number, i.kind)).collect();
    assert_eq!(skipped, vec![(2, RowIssueKind::MissingField)]);
    assert_eq!(env.student_api.get("101").expect("查询失败").name, "A");
}

#[test]
fn test_bulk_import_使用配置的默认模式() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    env.config_manager
        .set(config_keys::IMPORT_DEFAULT_MODE, "best_effort")
        .expect("设置失败");

    let rows = vec![
        raw(2, ["101", "A", "FYBSC CS", "999"]),
        raw(3, ["", "B", "FYBSC CS", "888"]),
    ];
    let report = env.student_api.bulk_import(&rows, None).expect("导入失败");
    assert_eq!(report.mode, ImportMode::BestEffort);
    assert_eq!(report.imported, 1);
}
