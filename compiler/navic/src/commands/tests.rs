#![allow(clippy::unwrap_used, reason = "test code uses unwrap for concise assertions")]

use super::*;
use pretty_assertions::assert_eq;

fn default() -> EvalConfig {
    EvalConfig::default()
}

#[test]
fn max_depth_flag_wins_over_environment() {
    assert_eq!(resolve_config(None, None).unwrap(), EvalConfig::default());
    assert_eq!(resolve_config(None, Some("7")).unwrap().max_depth, 7);
    assert_eq!(resolve_config(Some("5"), Some("7")).unwrap().max_depth, 5);
    assert!(matches!(
        resolve_config(Some("0"), None),
        Err(CommandError::InvalidMaxDepth(raw)) if raw == "0"
    ));
    assert!(matches!(
        resolve_config(None, Some("deep")),
        Err(CommandError::InvalidMaxDepth(_))
    ));
}

#[test]
fn consistent_file_checks_clean() {
    let text = "struct Point { x: number, y: number }\n\
                def distance(a: Point, b: Point) = number::add(a.x, b.x);\n";
    let report = check_source("points.navi", text, default()).unwrap();
    assert!(report.is_ok());
    assert_eq!(report.definitions, 2);
    assert_eq!(report.into_result().unwrap(), "OK: points.navi (2 definitions)");
}

#[test]
fn failing_definitions_are_all_reported() {
    let text = "let a = missing;\nlet fine = uint;\nlet b = Image.depth;\n";
    let report = check_source("bad.navi", text, default()).unwrap();
    assert_eq!(report.diagnostics.len(), 2);
    assert!(report.diagnostics[0].starts_with("error[undefined-name] in `a`"));
    assert!(report.diagnostics[1].starts_with("error[unknown-field] in `b`"));
    assert_eq!(report.summary(), "bad.navi: 2 of 3 definitions failed");

    let rendered = report.into_result().unwrap_err().render();
    assert!(rendered.ends_with("error: 2 definition(s) failed to check"), "{rendered}");
}

#[test]
fn user_definitions_may_shadow_the_prelude() {
    let defs = "let uint = string;";
    assert!(check_source("shadow.navi", defs, default()).unwrap().is_ok());
    let value = eval_expression("uint", Some(("shadow.navi", defs)), default()).unwrap();
    assert_eq!(value, "string");
    assert_eq!(eval_expression("uint", None, default()).unwrap(), "int(0..inf)");
}

#[test]
fn user_definitions_may_shadow_names_the_prelude_uses() {
    let defs = "let bool = bool::not(true);\ndef flip(a: bool) = bool::not(a);\n";
    let report = check_source("shadow.navi", defs, default()).unwrap();
    assert_eq!(report.diagnostics, Vec::<String>::new());
    assert_eq!(eval_expression("bool", Some(("shadow.navi", defs)), default()).unwrap(), "false");
    assert_eq!(
        eval_expression("flip(bool)", Some(("shadow.navi", defs)), default()).unwrap(),
        "true"
    );
}

#[test]
fn duplicate_user_definitions_abort_the_check() {
    let error = check_source("dup.navi", "let a = 1;\nlet a = 2;\n", default()).unwrap_err();
    assert!(matches!(
        error,
        CommandError::Eval(EvalError::DuplicateDefinition { ref name }) if name == "a"
    ));
}

#[test]
fn syntax_errors_render_with_the_source() {
    let error = check_source("syntax.navi", "let a = ;", default()).unwrap_err();
    assert!(matches!(error, CommandError::Parse { .. }));
    let rendered = error.render();
    assert!(rendered.contains("syntax.navi"), "{rendered}");
    assert!(rendered.contains("expected an expression"), "{rendered}");
}

#[test]
fn expressions_evaluate_against_the_prelude() {
    let value = eval_expression(
        "image::resize(Image { channels: 3 }, 10, 20)",
        None,
        default(),
    )
    .unwrap();
    assert_eq!(value, "Image { width: 10, height: 20, channels: 3 }");
}

#[test]
fn max_depth_bounds_recursive_definitions() {
    let defs = "def spin(a: number) = spin(a);";
    let config = resolve_config(Some("5"), None).unwrap();
    let error = eval_expression("spin(1)", Some(("spin.navi", defs)), config).unwrap_err();
    assert!(matches!(
        error,
        CommandError::Eval(EvalError::RecursionLimit { limit: 5 })
    ));
    assert!(error.render().starts_with("error[recursion-limit]"));
}

#[test]
fn missing_files_are_io_errors() {
    let error = check_file("/nonexistent/defs.navi", default()).unwrap_err();
    assert!(matches!(error, CommandError::Io { .. }));
    let error = eval_expression_with_file("1", Some("/nonexistent/defs.navi"), default()).unwrap_err();
    assert!(matches!(error, CommandError::Io { .. }));
}

#[test]
fn prelude_lists_every_definition_and_passes() {
    let report = prelude_report(default()).unwrap();
    let has = |kind: &str, name: &str| {
        report
            .lines()
            .any(|line| line.split_whitespace().eq([kind, name]))
    };
    assert!(has("struct", "Image"));
    assert!(has("variable", "uint"));
    assert!(has("function", "image::resize"));
    assert!(has("builtin-function", "number::add"));
    assert!(report.trim_end().lines().last().unwrap().starts_with("OK: "));
}
