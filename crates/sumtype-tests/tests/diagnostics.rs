//! Declarations the generator rejects

use rstest::rstest;
use sumtype_gen::{DiagnosticCode, GenConfig, expand_source};

fn diagnose(src: &str) -> Vec<(DiagnosticCode, &'static str)> {
    expand_source(src, &GenConfig::default())
        .unwrap()
        .diagnostics
        .into_iter()
        .map(|d| (d.code, d.id))
        .collect()
}

#[rstest]
#[case::in_function("fn f() { #[union(i32, u8)] struct U; }", DiagnosticCode::TopLevelError, "SUM1000")]
#[case::with_fields("#[union(i32, u8)] struct U { x: u8 }", DiagnosticCode::WrongBaseType, "SUM1001")]
#[case::generic("#[union(i32, u8)] struct U<T>;", DiagnosticCode::WrongBaseType, "SUM1001")]
#[case::top_type("#[union(i32, Box<dyn std::any::Any>)] struct U;", DiagnosticCode::ObjectNotValidType, "SUM1002")]
#[case::interface("#[union(i32, Box<dyn std::fmt::Display>)] struct U;", DiagnosticCode::InterfaceNotValidType, "SUM1003")]
#[case::repeated("#[union(i32, u8, i32)] struct U;", DiagnosticCode::RepeatedTypeSymbols, "SUM1004")]
#[case::too_few("#[union(i32)] struct U;", DiagnosticCode::InvalidArity, "SUM1005")]
#[case::too_many("#[union(i8, i16, i32, i64, u8, u16)] struct U;", DiagnosticCode::InvalidArity, "SUM1005")]
fn test_union_rules(#[case] src: &str, #[case] code: DiagnosticCode, #[case] id: &str) {
    assert_eq!(diagnose(src), vec![(code, id)]);
}

#[rstest]
#[case::in_const("const C: () = { #[result(u8)] struct R; };", DiagnosticCode::TopLevelError, "SUM0001")]
#[case::with_fields("#[result(u8)] struct R(u8);", DiagnosticCode::WrongBaseType, "SUM0002")]
#[case::top_type("#[result(&'static dyn std::any::Any)] struct R;", DiagnosticCode::ObjectNotValidType, "SUM0003")]
#[case::repeated("#[result(String, String)] struct R;", DiagnosticCode::RepeatedTypeSymbols, "SUM0004")]
#[case::too_many("#[result(u8, u16, u32)] struct R;", DiagnosticCode::InvalidArity, "SUM0005")]
fn test_result_rules(#[case] src: &str, #[case] code: DiagnosticCode, #[case] id: &str) {
    assert_eq!(diagnose(src), vec![(code, id)]);
}

#[test]
fn test_results_accept_interfaces() {
    assert!(diagnose("#[result(Box<dyn std::error::Error>)] struct R;").is_empty());
}

#[test]
fn test_first_violated_rule_wins() {
    // Both the fields and the single type are wrong; the shape check comes first.
    assert_eq!(
        diagnose("#[union(i32)] struct U { x: u8 }"),
        vec![(DiagnosticCode::WrongBaseType, "SUM1001")]
    );
    // Arity is checked before the types themselves.
    assert_eq!(
        diagnose("#[union(Box<dyn std::any::Any>)] struct U;"),
        vec![(DiagnosticCode::InvalidArity, "SUM1005")]
    );
}

#[test]
fn test_each_declaration_is_judged_alone() {
    let expansion = expand_source(
        r#"
        #[union(i32, i32)] pub struct Bad;
        #[union(i32, String)] pub struct Good;
        #[result(u8, u8)] pub struct AlsoBad;
        #[result(u8, String)] pub struct AlsoGood;
        "#,
        &GenConfig::default(),
    )
    .unwrap();

    let names: Vec<&str> = expansion.diagnostics.iter().map(|d| d.type_name.as_str()).collect();
    assert_eq!(names, vec!["Bad", "AlsoBad"]);
    assert_eq!(expansion.generated, vec!["Good", "AlsoGood"]);
}
