// ==========================================
// ComputerApi 集成测试
// ==========================================
// 测试范围: 机位登记、删除、列表与空闲机位
// ==========================================

mod helpers;

use helpers::api_test_helper::*;
use library_pc::domain::types::PcStatus;

#[test]
fn test_add_成功() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let pc = env.computer_api.add(" PC1 ").expect("登记失败");
    assert_eq!(pc.pc_id, "PC1");
    assert_eq!(pc.status, PcStatus::Vacant);

    let all = env.computer_api.list_all().expect("查询失败");
    assert_eq!(all.len(), 1);
    assert!(all[0].is_vacant());
}

#[test]
fn test_add_编号重复() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    env.seed_pc("PC1");
    let err = env.computer_api.add("PC1").unwrap_err();
    assert_code(&err, "DUPLICATE_KEY");
    assert_eq!(env.count_rows("computers"), 1);
}

#[test]
fn test_add_空编号() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let err = env.computer_api.add("   ").unwrap_err();
    assert_code(&err, "VALIDATION_ERROR");
}

#[test]
fn test_remove_空闲机位() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    env.seed_pc("PC1");
    env.computer_api.remove("PC1").expect("删除失败");
    assert!(env.computer_api.list_all().expect("查询失败").is_empty());
}

#[test]
fn test_remove_不存在() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let err = env.computer_api.remove("PC1").unwrap_err();
    assert_code(&err, "NOT_FOUND");
}

#[test]
fn test_remove_使用中() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    env.seed_student("101", "A");
    env.seed_pc("PC1");
    env.reservation_api.assign("101", "PC1").expect("上机失败");

    let err = env.computer_api.remove("PC1").unwrap_err();
    assert_code(&err, "CONFLICT");
    assert_eq!(env.count_rows("computers"), 1);

    // 下机后可删除，历史记录保留
    env.reservation_api.unassign("101").expect("下机失败");
    env.computer_api.remove("PC1").expect("删除失败");
    assert_eq!(env.count_rows("computers"), 0);
    assert_eq!(env.count_rows("reservations"), 1);
}

#[test]
fn test_list_vacant() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    env.seed_student("101", "A");
    for id in ["PC1", "PC2", "PC3"] {
        env.seed_pc(id);
    }
    env.reservation_api.assign("101", "PC2").expect("上机失败");

    let vacant = env.computer_api.list_vacant().expect("查询失败");
    assert_eq!(vacant, vec!["PC1", "PC3"]);

    let all = env.computer_api.list_all().expect("查询失败");
    assert_eq!(all.len(), 3);
    assert_eq!(all[1].status, PcStatus::Assigned);
}

#[test]
fn test_get_不存在() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let err = env.computer_api.get("PC1").unwrap_err();
    assert_code(&err, "NOT_FOUND");
}
