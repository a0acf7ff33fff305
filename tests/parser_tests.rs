//! Exercises the recursive-descent parser's error recovery through the
//! public façade: a malformed top-level item should not abort the whole
//! parse, and at least one diagnostic of the expected kind should surface.

use kestrel::{run, Config, ErrorKind, MapLoader, Output, Phase};

#[test]
fn unexpected_top_level_token_is_reported() {
    let loader = MapLoader::new().with("main", "123 fn main() { }");
    let report = run("main", &loader, Config::default(), Output::Discarded);
    assert!(!report.succeeded());
    assert!(report.diagnostics().iter().any(|d| d.kind == ErrorKind::UnexpectedToken));
    assert_eq!(report.diagnostics()[0].kind.phase(), Phase::Parse);
}

#[test]
fn missing_closing_brace_is_reported() {
    let loader = MapLoader::new().with("main", "fn main() { print(\"hi\");");
    let report = run("main", &loader, Config::default(), Output::Discarded);
    assert!(!report.succeeded());
    assert!(report.diagnostics().iter().any(|d| d.kind == ErrorKind::MissingTerminator));
}

#[test]
fn malformed_match_pattern_is_reported() {
    let loader = MapLoader::new().with(
        "main",
        r#"
        fn main() {
            let x = 1;
            match x {
                + => { print(x); }
            }
        }
        "#,
    );
    let report = run("main", &loader, Config::default(), Output::Discarded);
    assert!(!report.succeeded());
    assert!(report.diagnostics().iter().any(|d| d.kind == ErrorKind::MalformedPattern));
}

#[test]
fn wildcard_pattern_parses_as_a_catch_all_arm() {
    let loader = MapLoader::new().with(
        "main",
        r#"
        enum Shape {
            Circle(Int),
            Square(Int),
        }

        fn main() {
            let s = Square(4);
            match s {
                Circle(r) => { print(r); },
                _ => { print("other"); },
            }
        }
        "#,
    );
    let report = run("main", &loader, Config::default(), Output::Collected);
    assert!(report.succeeded());
    assert_eq!(report.output(), Some("other\n"));
}

#[test]
fn trailing_commas_are_tolerated_in_literals() {
    let loader = MapLoader::new().with(
        "main",
        r#"
        fn main() {
            let xs = [1, 2, 3,];
            let r = { a: 1, b: 2, };
            print(xs[2]);
            print(r.b);
        }
        "#,
    );
    let report = run("main", &loader, Config::default(), Output::Collected);
    assert!(report.succeeded());
    assert_eq!(report.output(), Some("3\n2\n"));
}

#[test]
fn a_parse_error_in_one_module_does_not_crash_the_run() {
    let loader = MapLoader::new()
        .with("main", "import broken;\nfn main() { print(\"still here\"); }")
        .with("broken", "fn {");
    let report = run("main", &loader, Config::default(), Output::Discarded);
    assert!(!report.succeeded());
    assert!(!report.diagnostics().is_empty());
}
