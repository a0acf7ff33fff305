//! Exercises the tree-walking evaluator's runtime diagnostics and control
//! flow through the public façade.

use kestrel::{run, Config, ErrorKind, MapLoader, Output};

fn runtime_errors(src: &str) -> Vec<ErrorKind> {
    let loader = MapLoader::new().with("main", src);
    let config = Config { all_errors: true, ..Config::default() };
    let report = run("main", &loader, config, Output::Discarded);
    report.diagnostics().iter().map(|d| d.kind).collect()
}

#[test]
fn divide_by_zero_is_a_runtime_error() {
    let errs = runtime_errors("fn main() { print(5 / 0); }");
    assert!(errs.contains(&ErrorKind::DivideByZero));
}

#[test]
fn list_index_out_of_bounds_is_a_runtime_error() {
    let errs = runtime_errors("fn main() { let xs = [1, 2, 3]; print(xs[5]); }");
    assert!(errs.contains(&ErrorKind::IndexOutOfBounds));
}

#[test]
fn non_exhaustive_match_is_a_runtime_error() {
    let loader = MapLoader::new().with(
        "main",
        r#"
        enum Shape { Circle(Int), Square(Int) }
        fn main() {
            let s = Square(2);
            match s {
                Circle(r) => { print(r); },
            }
        }
        "#,
    );
    let report = run("main", &loader, Config::default(), Output::Discarded);
    assert!(!report.succeeded());
    assert!(report.diagnostics().iter().any(|d| d.kind == ErrorKind::NonExhaustiveMatch));
}

#[test]
fn break_outside_a_loop_is_a_runtime_error() {
    let loader = MapLoader::new().with(
        "main",
        r#"
        fn stray() { break; }
        fn main() { stray(); }
        "#,
    );
    let report = run("main", &loader, Config { strict_types: false, ..Config::default() }, Output::Discarded);
    assert!(!report.succeeded());
    assert!(report.diagnostics().iter().any(|d| d.kind == ErrorKind::LoopControlOutsideLoop));
}

#[test]
fn break_inside_a_called_function_does_not_escape_into_the_callers_loop() {
    let loader = MapLoader::new().with(
        "main",
        r#"
        fn stray() { break; }
        fn main() {
            for i in 0..3 {
                stray();
                print(i);
            }
        }
        "#,
    );
    let report = run("main", &loader, Config { strict_types: false, ..Config::default() }, Output::Collected);
    assert!(!report.succeeded());
    assert!(report.diagnostics().iter().any(|d| d.kind == ErrorKind::LoopControlOutsideLoop));
    assert_eq!(report.output(), None);
}

#[test]
fn for_loop_step_direction_must_match_the_range() {
    let errs = runtime_errors("fn main() { for i in 0..5 by -1 { print(i); } }");
    assert!(errs.contains(&ErrorKind::BadRange));
}

#[test]
fn for_loop_zero_step_is_a_bad_range() {
    let errs = runtime_errors("fn main() { for i in 0..5 by 0 { print(i); } }");
    assert!(errs.contains(&ErrorKind::BadRange));
}

#[test]
fn calling_a_non_function_value_is_not_callable() {
    let loader = MapLoader::new().with(
        "main",
        r#"
        fn main() {
            let x = 5;
            print(x());
        }
        "#,
    );
    let report = run("main", &loader, Config { strict_types: false, ..Config::default() }, Output::Discarded);
    assert!(!report.succeeded());
    assert!(report.diagnostics().iter().any(|d| d.kind == ErrorKind::NotCallable));
}

#[test]
fn main_missing_is_reported() {
    let loader = MapLoader::new().with("main", "fn other() { }");
    let report = run("main", &loader, Config::default(), Output::Discarded);
    assert!(!report.succeeded());
    assert!(report.diagnostics().iter().any(|d| d.kind == ErrorKind::MainMissing));
}

#[test]
fn step_limit_aborts_an_infinite_loop() {
    let loader = MapLoader::new().with("main", "fn main() { while true { } }");
    let config = Config { max_steps: Some(100), ..Config::default() };
    let report = run("main", &loader, config, Output::Discarded);
    assert!(!report.succeeded());
    assert!(report.diagnostics().iter().any(|d| d.kind == ErrorKind::StepLimitExceeded));
}

#[test]
fn implicit_trailing_expression_is_the_function_result() {
    let loader = MapLoader::new().with(
        "main",
        r#"
        fn double(x: Int) -> Int { x * 2 }
        fn main() { print(double(21)); }
        "#,
    );
    let report = run("main", &loader, Config::default(), Output::Collected);
    assert!(report.succeeded());
    assert_eq!(report.output(), Some("42\n"));
}

#[test]
fn explicit_return_short_circuits_the_rest_of_the_body() {
    let loader = MapLoader::new().with(
        "main",
        r#"
        fn first_even(xs: [Int]) -> Int {
            for x in 0..3 {
                if xs[x] / 2 * 2 == xs[x] {
                    return xs[x];
                }
            }
            return -1;
        }
        fn main() {
            let xs = [1, 3, 4];
            print(first_even(xs));
        }
        "#,
    );
    let report = run("main", &loader, Config::default(), Output::Collected);
    assert!(report.succeeded());
    assert_eq!(report.output(), Some("4\n"));
}
