//! Lexing is only reachable through the public façade; these exercise it
//! via full runs and check the diagnostics a bad token stream produces.

use kestrel::{run, Config, ErrorKind, MapLoader, Output, Phase};

#[test]
fn invalid_character_is_reported_at_lex_phase() {
    let loader = MapLoader::new().with("main", "fn main() { let x = 1 @ 2; }");
    let report = run("main", &loader, Config::default(), Output::Discarded);
    assert!(!report.succeeded());
    let diag = &report.diagnostics()[0];
    assert_eq!(diag.kind, ErrorKind::InvalidChar);
    assert_eq!(diag.kind.phase(), Phase::Lex);
}

#[test]
fn unterminated_string_is_reported() {
    let loader = MapLoader::new().with("main", "fn main() { let s = \"never closes; }");
    let report = run("main", &loader, Config::default(), Output::Discarded);
    assert!(!report.succeeded());
    assert!(report.diagnostics().iter().any(|d| d.kind == ErrorKind::UnterminatedString));
}

#[test]
fn comments_and_whitespace_never_affect_a_clean_run() {
    let loader = MapLoader::new().with(
        "main",
        r#"
        # a leading comment
        fn main() {
            # inline comment
            print("ok"); # trailing comment
        }
        "#,
    );
    let report = run("main", &loader, Config::default(), Output::Collected);
    assert!(report.succeeded());
    assert_eq!(report.output(), Some("ok\n"));
}

#[test]
fn distinct_comparison_and_range_operators_do_not_collide() {
    let loader = MapLoader::new().with(
        "main",
        r#"
        fn main() {
            for i in 0..3 {
                if i <= 1 {
                    print(i);
                }
            }
        }
        "#,
    );
    let report = run("main", &loader, Config::default(), Output::Collected);
    assert!(report.succeeded());
    assert_eq!(report.output(), Some("0\n1\n"));
}
