//! trybuild 编译期测试

#[test]
fn trybuild_component_macros() {
    let t = trybuild::TestCases::new();
    t.pass("tests/trybuild/entity_ok.rs");
    t.pass("tests/trybuild/component_ok.rs");
    t.pass("tests/trybuild/repository_ok.rs");
}
