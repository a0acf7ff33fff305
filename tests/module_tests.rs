//! Exercises multi-module loading: import/export/alias resolution and
//! cyclic-import detection, through the public façade.

use kestrel::{run, Config, ErrorKind, MapLoader, Output};

#[test]
fn imported_function_is_callable_through_its_alias() {
    let loader = MapLoader::new()
        .with(
            "shapes",
            r#"
            export { area }
            fn area(side: Int) -> Int { side * side }
            "#,
        )
        .with(
            "main",
            r#"
            import shapes;
            fn main() { print(shapes.area(3)); }
            "#,
        );
    let report = run("main", &loader, Config::default(), Output::Collected);
    assert!(report.succeeded());
    assert_eq!(report.output(), Some("9\n"));
}

#[test]
fn aliased_import_is_only_reachable_under_its_alias() {
    let loader = MapLoader::new()
        .with("shapes", "export { area }\nfn area(side: Int) -> Int { side * side }")
        .with(
            "main",
            r#"
            import shapes as sq;
            fn main() { print(sq.area(4)); }
            "#,
        );
    let report = run("main", &loader, Config::default(), Output::Collected);
    assert!(report.succeeded());
    assert_eq!(report.output(), Some("16\n"));
}

#[test]
fn exported_enum_variant_is_reachable_through_a_qualified_constructor() {
    let loader = MapLoader::new()
        .with(
            "colors",
            r#"
            export { Color }
            enum Color { Red, Green, Blue }
            "#,
        )
        .with(
            "main",
            r#"
            import colors;
            fn main() {
                let c = colors.Red;
                match c {
                    colors.Red => { print("red"); },
                    _ => { print("other"); },
                }
            }
            "#,
        );
    let report = run("main", &loader, Config::default(), Output::Collected);
    assert!(report.succeeded());
    assert_eq!(report.output(), Some("red\n"));
}

#[test]
fn qualified_variant_payload_is_evaluated_in_the_calling_module() {
    let loader = MapLoader::new()
        .with(
            "colors",
            r#"
            export { Tagged }
            enum Tagged { Value(Int) }
            "#,
        )
        .with(
            "main",
            r#"
            import colors;
            fn helper() -> Int { return 7; }
            fn main() {
                let v = colors.Value(helper());
                match v {
                    colors.Value(n) => { print(n); },
                }
            }
            "#,
        );
    let report = run("main", &loader, Config::default(), Output::Collected);
    assert!(report.succeeded(), "expected success, got: {:?}", report.diagnostics());
    assert_eq!(report.output(), Some("7\n"));
}

#[test]
fn cyclic_import_is_detected() {
    let loader = MapLoader::new().with("a", "import b;\nfn main() { }").with("b", "import a;\n");
    let report = run("a", &loader, Config::default(), Output::Discarded);
    assert!(!report.succeeded());
    assert!(report.diagnostics().iter().any(|d| d.kind == ErrorKind::CyclicImport));
}

#[test]
fn missing_module_is_reported() {
    let loader = MapLoader::new().with("main", "import nowhere;\nfn main() { }");
    let report = run("main", &loader, Config::default(), Output::Discarded);
    assert!(!report.succeeded());
}

#[test]
fn duplicate_import_alias_is_ambiguous() {
    let loader = MapLoader::new()
        .with("a", "fn f() { }")
        .with("b", "fn g() { }")
        .with(
            "main",
            r#"
            import a as shared;
            import b as shared;
            fn main() { }
            "#,
        );
    let report = run("main", &loader, Config::default(), Output::Discarded);
    assert!(!report.succeeded());
    assert!(report.diagnostics().iter().any(|d| d.kind == ErrorKind::AmbiguousAlias));
}

#[test]
fn import_alias_colliding_with_a_local_declaration_is_ambiguous() {
    let loader = MapLoader::new().with("helper", "fn f() { }").with(
        "main",
        r#"
        import helper as f;
        fn f() { }
        fn main() { }
        "#,
    );
    let report = run("main", &loader, Config::default(), Output::Discarded);
    assert!(!report.succeeded());
    assert!(report.diagnostics().iter().any(|d| d.kind == ErrorKind::AmbiguousAlias));
}

#[test]
fn unexported_name_is_not_reachable_via_its_module() {
    let loader = MapLoader::new().with("helper", "fn secret() -> Int { 1 }").with(
        "main",
        r#"
        import helper;
        fn main() { print(helper.secret()); }
        "#,
    );
    let report = run("main", &loader, Config::default(), Output::Discarded);
    assert!(!report.succeeded());
    assert!(report.diagnostics().iter().any(|d| d.kind == ErrorKind::MissingExport));
}
