//! Exercises `all_errors` mode and diagnostic rendering through the public
//! façade.

use kestrel::{run, Config, MapLoader, Output};
use pretty_assertions::assert_eq;

#[test]
fn first_only_mode_surfaces_a_single_diagnostic() {
    let loader = MapLoader::new().with(
        "main",
        r#"
        fn main() {
            let x: Int = "a";
            let y: Int = "b";
        }
        "#,
    );
    let report = run("main", &loader, Config::default(), Output::Discarded);
    assert!(!report.succeeded());
    assert_eq!(report.diagnostics().len(), 1);
}

#[test]
fn all_errors_mode_surfaces_every_diagnostic() {
    let loader = MapLoader::new().with(
        "main",
        r#"
        fn main() {
            let x: Int = "a";
            let y: Int = "b";
        }
        "#,
    );
    let config = Config { all_errors: true, ..Config::default() };
    let report = run("main", &loader, config, Output::Discarded);
    assert!(!report.succeeded());
    assert_eq!(report.diagnostics().len(), 2);
}

#[test]
fn format_diagnostics_renders_path_line_column_phase_and_message() {
    let source = "fn main() { let x: Int = \"a\"; }\n";
    let loader = MapLoader::new().with("main", source);
    let report = run("main", &loader, Config::default(), Output::Discarded);
    assert!(!report.succeeded());
    let rendered = report.format_diagnostics(|file| if file == "main" { Some(source.to_string()) } else { None });
    assert!(rendered.starts_with("main:1:"));
    assert!(rendered.contains("typecheck"));
    assert!(rendered.contains("expected Int"));
}

#[test]
fn a_clean_run_reports_no_diagnostics() {
    let loader = MapLoader::new().with("main", r#"fn main() { print("ok"); }"#);
    let report = run("main", &loader, Config::default(), Output::Collected);
    assert!(report.succeeded());
    assert_eq!(report.diagnostics().len(), 0);
    assert_eq!(report.format_diagnostics(|_| None), "");
}
