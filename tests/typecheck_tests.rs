//! Exercises the type checker through the public façade, covering each
//! diagnostic kind it can raise and the `strict_types` toggle.

use kestrel::{run, Config, ErrorKind, MapLoader, Output};

fn strict_errors(src: &str) -> Vec<ErrorKind> {
    let loader = MapLoader::new().with("main", src);
    let config = Config { all_errors: true, ..Config::default() };
    let report = run("main", &loader, config, Output::Discarded);
    report.diagnostics().iter().map(|d| d.kind).collect()
}

#[test]
fn arity_mismatch_is_reported() {
    let loader = MapLoader::new().with(
        "main",
        r#"
        fn add(a: Int, b: Int) -> Int { return a + b; }
        fn main() { print(add(1)); }
        "#,
    );
    let report = run("main", &loader, Config::default(), Output::Discarded);
    assert!(!report.succeeded());
    assert!(report.diagnostics().iter().any(|d| d.kind == ErrorKind::WrongArity));
}

#[test]
fn unknown_field_on_a_record_is_reported() {
    let errs = strict_errors(
        r#"
        fn main() {
            let r = { a: 1 };
            print(r.b);
        }
        "#,
    );
    assert!(errs.contains(&ErrorKind::UnknownField));
}

#[test]
fn indexing_a_non_list_is_reported() {
    let errs = strict_errors("fn main() { let x = 5; print(x[0]); }");
    assert!(errs.contains(&ErrorKind::NonListIndex));
}

#[test]
fn unknown_variant_in_a_pattern_is_reported() {
    let errs = strict_errors(
        r#"
        enum Shape { Circle(Int) }
        fn main() {
            let s = Circle(1);
            match s {
                Square(x) => { print(x); },
            }
        }
        "#,
    );
    assert!(errs.contains(&ErrorKind::PatternMismatch));
}

#[test]
fn variant_constructor_arity_mismatch_is_reported_at_typecheck() {
    let errs = strict_errors(
        r#"
        enum Shape { Circle(Int) }
        fn main() {
            let s = Circle(1, 2);
            print(s);
        }
        "#,
    );
    assert!(errs.contains(&ErrorKind::WrongArity));
}

#[test]
fn match_against_a_variant_constructed_value_is_statically_checked() {
    let errs = strict_errors(
        r#"
        enum Shape { Circle(Int) }
        enum Color { Red }
        fn main() {
            let s = Circle(1);
            match s {
                Red => { print(1); },
            }
        }
        "#,
    );
    assert!(errs.contains(&ErrorKind::TypeMismatch));
}

#[test]
fn function_return_type_mismatch_is_reported() {
    let errs = strict_errors(
        r#"
        fn answer() -> Int { return "nope"; }
        fn main() { print(answer()); }
        "#,
    );
    assert!(errs.contains(&ErrorKind::TypeMismatch));
}

#[test]
fn unexported_function_accessed_through_an_alias_is_reported() {
    let loader = MapLoader::new()
        .with("helper", "fn secret() -> Int { return 1; }")
        .with("main", "import helper;\nfn main() { print(helper.secret()); }");
    let report = run("main", &loader, Config::default(), Output::Discarded);
    assert!(!report.succeeded());
    assert!(report.diagnostics().iter().any(|d| d.kind == ErrorKind::MissingExport));
}

#[test]
fn strict_types_rejects_a_call_through_an_untyped_parameter_that_lenient_mode_allows() {
    let src = r#"
        fn describe(x) -> Int { return 1; }
        fn main() { print(describe("anything")); }
        "#;
    let loader = MapLoader::new().with("main", src);
    let strict = run("main", &loader, Config { strict_types: true, ..Config::default() }, Output::Discarded);
    let lenient = run("main", &loader, Config { strict_types: false, ..Config::default() }, Output::Collected);
    assert!(!strict.succeeded());
    assert!(strict.diagnostics().iter().any(|d| d.kind == ErrorKind::TypeMismatch));
    assert!(lenient.succeeded());
}
