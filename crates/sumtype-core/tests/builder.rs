//! Exact-type error mapping through `OutcomeBuilder`.

use std::fmt;

use sumtype_core::{BoxError, Fallible, Outcome};

#[derive(Debug)]
struct MissingFile(String);

impl fmt::Display for MissingFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing file {}", self.0)
    }
}

impl std::error::Error for MissingFile {}

#[derive(Debug)]
struct Denied;

impl fmt::Display for Denied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("denied")
    }
}

impl std::error::Error for Denied {}

type Loaded = Outcome<String, String>;

#[test]
fn test_success_is_wrapped_as_ok() {
    let builder = Loaded::builder().map_error(|e: MissingFile| e.0);

    let result = builder.try_run(|| Ok::<_, MissingFile>("contents".to_string())).unwrap();

    assert_eq!(result, Outcome::Ok("contents".to_string()));
}

#[test]
fn test_registered_error_becomes_err() {
    let builder = Loaded::builder().map_error(|e: MissingFile| format!("no {}", e.0));

    let result = builder.try_run(|| Err::<String, _>(MissingFile("a.txt".into()))).unwrap();

    assert_eq!(result.as_err().map(String::as_str), Some("no a.txt"));
}

#[test]
fn test_unregistered_error_is_returned_unchanged() {
    let builder = Loaded::builder().map_error(|e: MissingFile| e.0);

    let error = builder.try_run(|| Err::<String, _>(Denied)).unwrap_err();

    assert!(error.downcast_ref::<Denied>().is_some());
}

#[test]
fn test_catch_all_claims_leftovers() {
    let builder = Loaded::builder()
        .map_error(|e: MissingFile| e.0)
        .map_else(|e: BoxError| format!("other: {e}"));

    let result = builder.try_run(|| Err::<String, _>(Denied)).unwrap();

    assert_eq!(result, Outcome::Err("other: denied".to_string()));
}

#[test]
fn test_exact_mapping_wins_over_catch_all() {
    let builder = Loaded::builder()
        .map_else(|_| "fallback".to_string())
        .map_error(|_: Denied| "exact".to_string());

    let result = builder.try_run(|| Err::<String, _>(Denied)).unwrap();

    assert_eq!(result, Outcome::Err("exact".to_string()));
}

#[test]
fn test_reregistering_replaces_mapping() {
    let builder = Loaded::builder()
        .map_error(|_: Denied| "first".to_string())
        .map_error(|_: MissingFile| "file".to_string())
        .map_error(|_: Denied| "second".to_string());

    assert_eq!(builder.len(), 2);
    let result = builder.try_run(|| Err::<String, _>(Denied)).unwrap();
    assert_eq!(result, Outcome::Err("second".to_string()));
}

#[test]
fn test_builder_is_reusable() {
    let builder = Loaded::builder().map_error(|e: MissingFile| e.0);

    for name in ["a", "b"] {
        let result = builder
            .try_run(|| Err::<String, _>(MissingFile(name.to_string())))
            .unwrap();
        assert_eq!(result, Outcome::Err(name.to_string()));
    }
}

#[test]
fn test_empty_builder_passes_everything_through() {
    let builder = Loaded::builder();
    assert!(builder.is_empty());

    let error = builder.try_run(|| Err::<String, _>(MissingFile("x".into()))).unwrap_err();
    assert_eq!(error.to_string(), "missing file x");
}

#[tokio::test]
async fn test_try_run_async_maps_errors() {
    let builder = Loaded::builder().map_error(|e: MissingFile| e.0);

    let ok = builder
        .try_run_async(|| async { Ok::<_, MissingFile>("fine".to_string()) })
        .await
        .unwrap();
    assert!(ok.is_ok());

    let err = builder
        .try_run_async(|| async {
            tokio::task::yield_now().await;
            Err::<String, _>(MissingFile("late".into()))
        })
        .await
        .unwrap();
    assert_eq!(err, Outcome::Err("late".to_string()));

    let passthrough = builder
        .try_run_async(|| async { Err::<String, _>(Denied) })
        .await
        .unwrap_err();
    assert!(passthrough.is::<Denied>());
}
