//! Command-level tests for the sumtype CLI

use std::path::{Path, PathBuf};

use sumtype::OutputFormat;
use sumtype::commands::{load_config, run_check, run_expand};
use sumtype_gen::GenConfig;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn check(files: &[PathBuf], format: OutputFormat) -> (Option<u8>, String) {
    let mut out = Vec::new();
    let code = run_check(files, &GenConfig::default(), format, &mut out, false).unwrap();
    (code, String::from_utf8(out).unwrap())
}

#[test]
fn test_check_clean_files() {
    let dir = TempDir::new().unwrap();
    let shapes = write(dir.path(), "shapes.rs", "#[union(Circle, Square)] pub struct Shape;");
    let results = write(dir.path(), "results.rs", "#[result(Shape, String)] pub struct Drawn;");

    let (code, text) = check(&[shapes, results], OutputFormat::Human);

    assert_eq!(code, None);
    assert_eq!(text.trim(), "2 file(s) checked, 0 diagnostic(s)");
}

#[test]
fn test_check_reports_and_fails() {
    let dir = TempDir::new().unwrap();
    let decls = write(
        dir.path(),
        "decls.rs",
        "#[union(i32, i32)] pub struct Twice;\n#[result(u8, String)] pub struct Fine;",
    );

    let (code, text) = check(&[decls.clone()], OutputFormat::Human);

    assert_eq!(code, Some(1));
    let first = text.lines().next().unwrap();
    assert!(first.starts_with(&format!("{}: SUM1004 RepeatedTypeSymbols:", decls.display())));
}

#[test]
fn test_check_json() {
    let dir = TempDir::new().unwrap();
    let decls = write(dir.path(), "decls.rs", "#[result(Box<dyn std::any::Any>)] pub struct Loose;");

    let (code, text) = check(&[decls], OutputFormat::Json);
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(code, Some(1));
    assert_eq!(value["success"], false);
    assert_eq!(value["diagnostics"][0]["id"], "SUM0003");
    assert_eq!(value["diagnostics"][0]["type_name"], "Loose");
}

#[test]
fn test_check_missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let mut out = Vec::new();

    let err = run_check(
        &[dir.path().join("absent.rs")],
        &GenConfig::default(),
        OutputFormat::Human,
        &mut out,
        false,
    )
    .unwrap_err();

    assert!(format!("{err:#}").contains("Failed to read declarations"));
}

#[test]
fn test_expand_to_stdout() {
    let dir = TempDir::new().unwrap();
    let decls = write(dir.path(), "decls.rs", "#[union(i32, String)] pub struct Value;");
    let mut out = Vec::new();

    let code = run_expand(&decls, None, &GenConfig::default(), &mut out).unwrap();

    assert_eq!(code, None);
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("pub enum Value"));
    assert!(!text.contains("struct Value"));
}

#[test]
fn test_expand_to_file() {
    let dir = TempDir::new().unwrap();
    let decls = write(dir.path(), "decls.rs", "#[result(String)] pub struct Saved;");
    let target = dir.path().join("out.rs");
    let mut out = Vec::new();

    run_expand(&decls, Some(target.as_path()), &GenConfig::default(), &mut out).unwrap();

    assert!(out.is_empty());
    assert!(std::fs::read_to_string(&target).unwrap().contains("pub enum Saved"));
}

#[test]
fn test_expand_fails_on_diagnostics_when_configured() {
    let dir = TempDir::new().unwrap();
    let decls = write(dir.path(), "decls.rs", "#[union(u8)] pub struct Lonely;");
    let config = GenConfig {
        fail_on_diagnostics: true,
        ..GenConfig::default()
    };
    let mut out = Vec::new();

    assert_eq!(run_expand(&decls, None, &config, &mut out).unwrap(), Some(1));
}

#[test]
fn test_config_is_discovered_from_parent() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "sumtype.toml", "[generate]\nruntime_path = \"crate::rt\"\n");
    let nested = dir.path().join("a/b");
    std::fs::create_dir_all(&nested).unwrap();

    let config = load_config(None, &nested).unwrap();

    assert_eq!(config.runtime_path, "crate::rt");
}

#[test]
fn test_explicit_config_wins() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "sumtype.toml", "[codec]\ncase_insensitive = false\n");
    let explicit = write(dir.path(), "other.toml", "[codec]\ncase_insensitive = true\n");

    let config = load_config(Some(explicit.as_path()), dir.path()).unwrap();

    assert!(config.case_insensitive);
}

#[test]
fn test_broken_config_is_reported() {
    let dir = TempDir::new().unwrap();
    let broken = write(dir.path(), "sumtype.toml", "[generate\n");

    let err = load_config(Some(broken.as_path()), dir.path()).unwrap_err();

    assert!(format!("{err:#}").contains("Failed to load configuration"));
}
