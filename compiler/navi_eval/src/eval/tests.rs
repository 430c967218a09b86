use super::*;
use crate::test_helpers::{child_scope, eval, scope_from, show};
use crate::{Definition, ScopeBuilder};
use navi_ir::SharedInterner;
use pretty_assertions::assert_eq;
use std::sync::Arc;

const SHAPES: &str = "
    struct Point { x: number, y: number }
    struct Size { width: uint, height: uint }
    struct true;
    struct false;
    let bool = true | false;
    let uint = int(0..inf);
    def id(a: int(0..10)) = a;
    def first(a: any, b: any) = a;
    def not(a: bool) = match a { true => false, false => true };
    def width_of(s: Size) = s.width;
";

#[test]
fn literals_need_no_scope() {
    let scope = scope_from("");
    assert_eq!(show(&scope, "number"), "number");
    assert_eq!(show(&scope, "int(0..3)"), "int(0..3)");
    assert_eq!(show(&scope, "\"png\""), "\"png\"");
    assert_eq!(show(&scope, "2..1"), "never");
    assert_eq!(show(&scope, "any"), "any");
}

#[test]
fn variables_and_structs_resolve_by_name() {
    let scope = scope_from(SHAPES);
    assert_eq!(eval(&scope, "bool"), eval(&scope, "false | true"));
    assert_eq!(eval(&scope, "bool").map(|value| value.members().len()), Ok(2));
    assert_eq!(show(&scope, "uint"), "int(0..inf)");
    assert_eq!(show(&scope, "Point"), "Point { x: number, y: number }");
    assert_eq!(show(&scope, "Size"), "Size { width: int(0..inf), height: int(0..inf) }");
}

#[test]
fn evaluation_is_repeatable() {
    let scope = scope_from(SHAPES);
    assert_eq!(eval(&scope, "Size"), eval(&scope, "Size"));
    assert_eq!(eval(&scope, "not(bool)"), eval(&scope, "not(bool)"));
}

#[test]
fn functions_resolve_to_signatures() {
    let scope = scope_from(SHAPES);
    let value = eval(&scope, "id").unwrap_or_else(|error| panic!("{error}"));
    let function = value.as_function().unwrap_or_else(|| panic!("not a function"));
    assert_eq!(function.arity(), 1);
    assert_eq!(show(&scope, "number::neg"), "fn number::neg(a: number)");
}

#[test]
fn parameters_have_no_standalone_value() {
    let interner = SharedInterner::new();
    let mut builder = ScopeBuilder::new(interner.clone());
    let name = interner.intern("Input0");
    assert_eq!(builder.add(Definition::Parameter { name, ty: None }), Ok(()));
    let scope = builder.build();
    assert_eq!(
        evaluate(&Expr::named(name), &scope),
        Err(EvalError::UnboundParameter {
            name: "Input0".to_owned()
        })
    );
    let bindings = Bindings::new().with(name, TypeValue::int());
    assert_eq!(
        evaluate_with(&Expr::named(name), &scope, &bindings),
        Ok(TypeValue::int())
    );
}

#[test]
fn undefined_names_fail() {
    let scope = scope_from(SHAPES);
    assert_eq!(
        eval(&scope, "nonexistent"),
        Err(EvalError::UndefinedName {
            name: "nonexistent".to_owned()
        })
    );
    assert_eq!(
        eval(&scope, "missing(1)"),
        Err(EvalError::UndefinedName {
            name: "missing".to_owned()
        })
    );
}

#[test]
fn call_narrows_arguments_to_parameter_types() {
    let scope = scope_from(SHAPES);
    assert_eq!(show(&scope, "id(5)"), "5");
    assert_eq!(show(&scope, "id(0..20)"), "int(0..10)");
    assert_eq!(show(&scope, "id(int)"), "int(0..10)");
    assert_eq!(show(&scope, "id(never)"), "never");
}

#[test]
fn call_rejects_disjoint_arguments() {
    let scope = scope_from(SHAPES);
    assert_eq!(
        eval(&scope, "id(\"x\")"),
        Err(EvalError::TypeMismatch {
            context: "argument `a` of `id`".to_owned(),
            expected: "int(0..10)".to_owned(),
            found: "\"x\"".to_owned(),
        })
    );
    assert_eq!(
        eval(&scope, "id(11)").map_err(|error| error.kind()),
        Err("type-mismatch")
    );
}

#[test]
fn arity_is_checked_before_arguments() {
    let scope = scope_from(SHAPES);
    assert_eq!(
        eval(&scope, "id(1, 2)"),
        Err(EvalError::ArityMismatch {
            function: "id".to_owned(),
            expected: 1,
            found: 2,
        })
    );
    // The bad argument would be a type mismatch, but arity wins.
    assert_eq!(
        eval(&scope, "first(\"a\")").map_err(|error| error.kind()),
        Err("arity-mismatch")
    );
    assert_eq!(
        eval(&scope, "id(nonexistent, 2)").map_err(|error| error.kind()),
        Err("arity-mismatch")
    );
}

#[test]
fn bodies_see_parameters_not_caller_bindings() {
    let scope = scope_from("let a = 1; def get_a(b: number) = a; def echo(a: number) = a;");
    let interner = scope.interner();
    let a = interner.intern("a");
    let bindings = Bindings::new().with(a, TypeValue::number_literal(5.0));

    let call = |source: &str| {
        let expr = navi_parse::parse_expression(source, interner)
            .unwrap_or_else(|error| panic!("{error}"));
        evaluate_with(&expr, &scope, &bindings)
    };
    assert_eq!(call("a"), Ok(TypeValue::number_literal(5.0)));
    assert_eq!(call("get_a(2)"), Ok(TypeValue::number_literal(1.0)));
    assert_eq!(call("echo(3)"), Ok(TypeValue::number_literal(3.0)));
    assert_eq!(call("echo(a)"), Ok(TypeValue::number_literal(5.0)));
}

#[test]
fn bound_function_values_are_callable() {
    let scope = scope_from("");
    let interner = scope.interner();
    let f = interner.intern("f");
    let neg = evaluate(&Expr::named(interner.intern("number::neg")), &scope)
        .unwrap_or_else(|error| panic!("{error}"));
    let bindings = Bindings::new().with(f, neg);
    let expr = Expr::call(f, vec![Expr::number(2.0)]);
    assert_eq!(
        evaluate_with(&expr, &scope, &bindings),
        Ok(TypeValue::number_literal(-2.0))
    );

    let bindings = Bindings::new().with(f, TypeValue::int());
    assert_eq!(
        evaluate_with(&expr, &scope, &bindings),
        Err(EvalError::NotCallable {
            name: "f".to_owned()
        })
    );
}

#[test]
fn only_functions_are_callable() {
    let scope = scope_from(SHAPES);
    assert_eq!(
        eval(&scope, "uint(1)"),
        Err(EvalError::NotCallable {
            name: "uint".to_owned()
        })
    );
}

#[test]
fn field_access() {
    let scope = scope_from(SHAPES);
    assert_eq!(show(&scope, "Point.x"), "number");
    assert_eq!(show(&scope, "width_of(Size { width: 3 })"), "3");
    assert_eq!(show(&scope, "(Point | Point { x: 1 }).y"), "number");
    assert_eq!(show(&scope, "any.x"), "any");
    assert_eq!(show(&scope, "never.x"), "never");
    assert_eq!(
        eval(&scope, "Point.z"),
        Err(EvalError::UnknownField {
            ty: "Point".to_owned(),
            field: "z".to_owned(),
        })
    );
    assert_eq!(
        eval(&scope, "int.x"),
        Err(EvalError::NotAStruct {
            ty: "int".to_owned()
        })
    );
}

#[test]
fn field_access_projects_unions_of_structs() {
    let scope = scope_from(SHAPES);
    assert_eq!(
        show(&scope, "(Point { x: 0..1, y: 0 } | Point { x: 5, y: 1 }).x"),
        "0..1 | 5"
    );
}

#[test]
fn struct_instances_narrow_fields() {
    let scope = scope_from(SHAPES);
    assert_eq!(show(&scope, "Point { x: int }"), "Point { x: int, y: number }");
    assert_eq!(show(&scope, "Point { x: never }"), "never");
    assert_eq!(
        eval(&scope, "Size { width: -1 }"),
        Err(EvalError::TypeMismatch {
            context: "field `width` of `Size`".to_owned(),
            expected: "int(0..inf)".to_owned(),
            found: "-1".to_owned(),
        })
    );
    assert_eq!(
        eval(&scope, "Point { z: 1 }").map_err(|error| error.kind()),
        Err("unknown-field")
    );
    assert_eq!(
        eval(&scope, "bool { }"),
        Err(EvalError::NotAStruct {
            ty: "bool".to_owned()
        })
    );
}

#[test]
fn union_and_intersection_expressions() {
    let scope = scope_from(SHAPES);
    assert_eq!(show(&scope, "0..10 & int"), "int(0..10)");
    assert_eq!(show(&scope, "1 | \"a\" | 1"), "1 | \"a\"");
    assert_eq!(show(&scope, "\"a\" & int"), "never");
}

#[test]
fn match_selects_overlapping_arms() {
    let scope = scope_from(SHAPES);
    assert_eq!(show(&scope, "not(true)"), "false");
    assert_eq!(show(&scope, "not(false)"), "true");
    assert_eq!(eval(&scope, "not(bool)"), eval(&scope, "bool"));
}

#[test]
fn match_binds_the_overlap_and_stops_at_a_covering_arm() {
    let scope = scope_from(SHAPES);
    assert_eq!(
        show(&scope, "match 0..10 { int as i => i, _ => \"fraction\" }"),
        "int(0..10) | \"fraction\""
    );
    assert_eq!(show(&scope, "match 3 { int as i => i, _ => \"fraction\" }"), "3");
    assert_eq!(show(&scope, "match \"a\" { int => 1 }"), "never");
}

#[test]
fn self_reference_is_a_cycle() {
    let scope = scope_from("let a = b; let b = a | 1; struct Node { next: Node }");
    assert_eq!(
        eval(&scope, "a"),
        Err(EvalError::CyclicReference {
            name: "a".to_owned()
        })
    );
    assert_eq!(
        eval(&scope, "Node").map_err(|error| error.kind()),
        Err("cyclic-reference")
    );
}

#[test]
fn unbounded_recursion_hits_the_depth_limit() {
    let scope = scope_from("def spin(a: number) = spin(a);");
    assert_eq!(
        eval(&scope, "spin(1)"),
        Err(EvalError::RecursionLimit {
            limit: EvalConfig::DEFAULT_MAX_DEPTH
        })
    );

    let expr = navi_parse::parse_expression("spin(1)", scope.interner())
        .unwrap_or_else(|error| panic!("{error}"));
    let config = EvalConfig::default().with_max_depth(3);
    assert_eq!(
        Evaluator::with_config(&scope, config).evaluate(&expr),
        Err(EvalError::RecursionLimit { limit: 3 })
    );
}

#[test]
fn definitions_evaluate_in_their_declaring_scope() {
    let parent = scope_from("let base = 1; let derived = base | 2;");
    let mut child = ScopeBuilder::child_of(&parent);
    let base = parent.interner().intern("base");
    assert_eq!(
        child.add(Definition::Variable {
            name: base,
            value: Arc::new(Expr::string("shadowed")),
        }),
        Ok(())
    );
    let child = child.build();
    assert_eq!(show(&child, "base"), "\"shadowed\"");
    assert_eq!(show(&child, "derived"), "int(1..2)");
}

const LOGIC: &str = "
    struct true;
    struct false;
    let bool = true | false;
    def not(a: bool) = match a { true => false, false => true };
";

#[test]
fn child_may_shadow_a_name_its_parent_depends_on() {
    let parent = scope_from(LOGIC);
    let child = child_scope(&parent, "let bool = not(true);");
    assert_eq!(show(&child, "bool"), "false");
    assert_eq!(eval(&child, "not(false)"), eval(&parent, "true"));
    assert_eq!(eval(&parent, "bool"), eval(&parent, "true | false"));
}

#[test]
fn one_evaluator_keeps_shadowed_definitions_apart() {
    let parent = scope_from(LOGIC);
    let child = child_scope(&parent, "let bool = not(true); let both = bool | not(false);");
    let expr = navi_parse::parse_expression("both", child.interner())
        .unwrap_or_else(|error| panic!("{error}"));
    let mut evaluator = Evaluator::new(&child);
    let first = evaluator.evaluate(&expr);
    assert_eq!(first, eval(&parent, "bool"));
    assert_eq!(evaluator.evaluate(&expr), first);
}

#[test]
fn function_values_call_the_definition_they_were_made_from() {
    let parent = scope_from(
        r#"
        def label(a: number) = "parent";
        def apply(f: any) = f(1);
        "#,
    );
    let child = child_scope(
        &parent,
        r#"
        def label(a: number) = "child";
        def only_here(a: number) = "only here";
        "#,
    );
    assert_eq!(show(&parent, "apply(label)"), "\"parent\"");
    assert_eq!(show(&child, "apply(label)"), "\"child\"");
    assert_eq!(show(&child, "apply(only_here)"), "\"only here\"");
}

#[test]
fn doubling_chains_resolve_each_definition_once() {
    let mut source = String::from("let a0 = 1 | 2;\n");
    for i in 1..=40 {
        source.push_str(&format!("let a{i} = a{prev} | a{prev};\n", prev = i - 1));
    }
    let scope = scope_from(&source);
    assert_eq!(show(&scope, "a40"), "int(1..2)");
}
