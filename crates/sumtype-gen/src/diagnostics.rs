//! Validation reports for declarations that could not be generated.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::model::DeclKind;

/// Rule a declaration violated, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticCode {
    TopLevelError,
    WrongBaseType,
    InvalidArity,
    ObjectNotValidType,
    InterfaceNotValidType,
    RepeatedTypeSymbols,
}

impl DiagnosticCode {
    /// Stable identifier, distinct per declaration kind.
    pub fn id(self, kind: DeclKind) -> &'static str {
        match (kind, self) {
            (DeclKind::Result, DiagnosticCode::TopLevelError) => "SUM0001",
            (DeclKind::Result, DiagnosticCode::WrongBaseType) => "SUM0002",
            (DeclKind::Result, DiagnosticCode::ObjectNotValidType) => "SUM0003",
            (DeclKind::Result, DiagnosticCode::RepeatedTypeSymbols) => "SUM0004",
            (DeclKind::Result, DiagnosticCode::InvalidArity) => "SUM0005",
            // Results have no interface rule; keep the id space total anyway.
            (DeclKind::Result, DiagnosticCode::InterfaceNotValidType) => "SUM0006",
            (DeclKind::Union, DiagnosticCode::TopLevelError) => "SUM1000",
            (DeclKind::Union, DiagnosticCode::WrongBaseType) => "SUM1001",
            (DeclKind::Union, DiagnosticCode::ObjectNotValidType) => "SUM1002",
            (DeclKind::Union, DiagnosticCode::InterfaceNotValidType) => "SUM1003",
            (DeclKind::Union, DiagnosticCode::RepeatedTypeSymbols) => "SUM1004",
            (DeclKind::Union, DiagnosticCode::InvalidArity) => "SUM1005",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One report per rejected declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub id: &'static str,
    pub message: String,
    /// Name of the declaring type.
    pub type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Diagnostic {
    pub fn new(kind: DeclKind, code: DiagnosticCode, type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            id: code.id(kind),
            message: message.into(),
            type_name: type_name.into(),
            file: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}: ", file.display())?;
        }
        write!(f, "{} {}: {}", self.id, self.code, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_differ_by_kind() {
        assert_eq!(DiagnosticCode::TopLevelError.id(DeclKind::Result), "SUM0001");
        assert_eq!(DiagnosticCode::TopLevelError.id(DeclKind::Union), "SUM1000");
        assert_eq!(DiagnosticCode::RepeatedTypeSymbols.id(DeclKind::Union), "SUM1004");
    }

    #[test]
    fn test_serializes_to_json() {
        let diagnostic = Diagnostic::new(
            DeclKind::Union,
            DiagnosticCode::RepeatedTypeSymbols,
            "Shape",
            "`Shape` lists `i32` more than once",
        );

        let json = serde_json::to_value(&diagnostic).unwrap();

        assert_eq!(json["code"], "RepeatedTypeSymbols");
        assert_eq!(json["id"], "SUM1004");
        assert_eq!(json["type_name"], "Shape");
        assert!(json.get("file").is_none());
    }

    #[test]
    fn test_display_includes_file() {
        let diagnostic = Diagnostic::new(DeclKind::Result, DiagnosticCode::WrongBaseType, "Parsed", "boom")
            .with_file("decls.rs");

        assert_eq!(diagnostic.to_string(), "decls.rs: SUM0002 WrongBaseType: boom");
    }
}
