use jolly::{CompileError, JollyCompiler, MisuseKind};

#[test]
fn case_a_conditional_chain_with_comments() {
    let src = include_str!("compiler_regression/grades.jolly");
    let expected = include_str!("compiler_regression/grades.js");
    let out = JollyCompiler::new().compile(src, "grades.jolly").unwrap();
    assert_eq!(out, expected);
}

#[test]
fn case_b_switch_class_and_loops() {
    let src = include_str!("compiler_regression/shop.jolly");
    let expected = include_str!("compiler_regression/shop.js");
    let out = JollyCompiler::new().compile(src, "shop.jolly").unwrap();
    assert_eq!(out, expected);
}

#[test]
fn case_c_else_after_loop_is_rejected() {
    let src = include_str!("compiler_regression/orphan_else.jolly");
    let err = JollyCompiler::new().compile(src, "orphan_else.jolly").unwrap_err();
    let diag = err.diagnostic();
    assert!(matches!(err, CompileError::Placement { ref required_parent, .. } if required_parent == "when"));
    assert_eq!(diag.file, "orphan_else.jolly");
    assert_eq!(diag.line, 5);
    assert_eq!(diag.source_line, "meh {");
    assert_eq!(diag.keyword, "meh");
}

#[test]
fn case_d_line_count_matches_fixture() {
    let src = include_str!("compiler_regression/shop.jolly");
    let out = JollyCompiler::new().compile(src, "shop.jolly").unwrap();
    assert_eq!(src.lines().count(), out.lines().count());
}

#[test]
fn case_e_else_if_without_if() {
    let err = JollyCompiler::new()
        .compile("maybe (x > 0) {\n  yay 1;\n}", "lone.jolly")
        .unwrap_err();
    assert_eq!(err.to_string(), "The keyword \"maybe\" cannot be used outside a when block.");
    assert_eq!(err.diagnostic().line, 1);
}

#[test]
fn case_f_misuse_kinds_through_public_api() {
    let compiler = JollyCompiler::new();
    let kind = |src: &str| match compiler.compile(src, "m.jolly") {
        Err(CompileError::ReservedKeywordMisuse { kind, .. }) => Some(kind),
        _ => None,
    };
    assert_eq!(kind("yay = 1;"), Some(MisuseKind::VariableName));
    assert_eq!(kind("free x = pls(1);"), Some(MisuseKind::FunctionName));
    assert_eq!(kind("free o = { skip: true };"), Some(MisuseKind::PropertyKey));
    assert_eq!(kind("free o = { skipped: true };"), None);
}

#[test]
fn case_g_rendered_report_points_at_keyword() {
    let src = "free ok = 1;\nfree o = {\n\tbail: 2,\n};";
    let err = JollyCompiler::new().compile(src, "tabs.jolly").unwrap_err();
    let report = err.render(false);
    assert!(report.contains("--> tabs.jolly:3:2"));
    assert!(report.contains("3 | \tbail: 2,"));
    assert!(report.contains("  | \t^^^^"));
}
