// ==========================================
// ImportApi 集成测试
// ==========================================
// 测试范围: CSV 文件导入、预览、文件错误
// ==========================================

mod helpers;

use helpers::api_test_helper::*;
use library_pc::importer::ImportMode;
use std::path::Path;
use test_helpers::write_student_csv;

#[test]
fn test_import_file_成功() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let file = write_student_csv(&[
        ["101", "A", "FYBSC CS", "999"],
        ["102", "B", "SYBSC IT", "888"],
    ]);

    let report = env
        .import_api
        .import_file(file.path(), None)
        .expect("导入失败");
    assert_eq!(report.mode, ImportMode::AllOrNothing);
    assert_eq!(report.imported, 2);
    assert!(report.skipped.is_empty());
    assert!(!report.batch_id.is_empty());

    let names: Vec<String> = env
        .student_api
        .list_all()
        .expect("查询失败")
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[test]
fn test_import_file_重复导入整批拒绝() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let file = write_student_csv(&[["101", "A", "FYBSC CS", "999"]]);

    env.import_api
        .import_file(file.path(), None)
        .expect("首次导入失败");
    let err = env.import_api.import_file(file.path(), None).unwrap_err();
    assert_code(&err, "VALIDATION_ERROR");
    assert_eq!(env.count_rows("students"), 1);
}

#[test]
fn test_import_file_尽力导入() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    env.seed_student("101", "Existing");
    let file = write_student_csv(&[
        ["101", "A", "FYBSC CS", "999"],
        ["102", "B", "SYBSC IT", "888"],
    ]);

    let report = env
        .import_api
        .import_file(file.path(), Some(ImportMode::BestEffort))
        .expect("导入失败");
    assert_eq!(report.imported, 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].row_number, 2);
    assert_eq!(env.student_api.get("101").expect("查询失败").name, "Existing");
}

#[test]
fn test_preview_不写库() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let file = write_student_csv(&[["101", "A", "FYBSC CS", "999"]]);

    let sheet = env.import_api.preview(file.path()).expect("预览失败");
    assert_eq!(sheet.headers.len(), 4);
    assert_eq!(sheet.rows.len(), 1);
    assert_eq!(sheet.rows[0].cells[1], "A");
    assert_eq!(env.count_rows("students"), 0);
}

#[test]
fn test_import_file_文件不存在() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let err = env
        .import_api
        .import_file(Path::new("/nonexistent/students.csv"), None)
        .unwrap_err();
    assert_code(&err, "IO_ERROR");
}

#[test]
fn test_import_file_格式不支持() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let file = tempfile::Builder::new()
        .suffix(".txt")
        .tempfile()
        .expect("创建临时文件失败");
    let err = env.import_api.import_file(file.path(), None).unwrap_err();
    assert_code(&err, "IO_ERROR");
}
