//! Tests for loading command documents from disk.

use std::fs;

use hackterm::player::MessageStyle;
use hackterm::shell::{load_or_fallback, BuiltinAction, CommandKind, CommandTableError, DEFAULT_SITE};
use tempfile::TempDir;

const DOC: &str = r#"{
    "site": "zion",
    "commands": {
        "help":   { "description": "Show available commands", "type": "function", "action": "help" },
        "WhoAmI": { "description": "Display current user", "type": "info", "response": "neo" },
        "blog":   { "description": "Open the blog", "type": "redirect",
                    "message": "Redirecting to blog...", "url": "https://example.com" },
        "clear":  { "description": "Clear the screen", "type": "function" }
    }
}"#;

fn write_doc(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

// ============================================================================
// Successful loads
// ============================================================================

#[test]
fn loads_commands_in_document_order() {
    let dir = TempDir::new().unwrap();
    let outcome = load_or_fallback(write_doc(&dir, "config.json", DOC));

    assert!(outcome.notices.is_empty());
    assert!(outcome.fallback_reason.is_none());
    assert_eq!(outcome.document.site, "zion");
    let names: Vec<&str> = outcome
        .document
        .table
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["help", "whoami", "blog", "clear"]);
}

#[test]
fn command_kinds_are_resolved() {
    let dir = TempDir::new().unwrap();
    let table = load_or_fallback(write_doc(&dir, "config.json", DOC))
        .document
        .table;

    assert_eq!(
        table.get("whoami").map(|c| &c.kind),
        Some(&CommandKind::Static("neo".to_string()))
    );
    assert_eq!(
        table.get("clear").map(|c| &c.kind),
        Some(&CommandKind::Builtin(BuiltinAction::Clear))
    );
    assert_eq!(
        table.get("blog").map(|c| &c.kind),
        Some(&CommandKind::Redirect {
            message: "Redirecting to blog...".to_string(),
            url: "https://example.com".to_string(),
        })
    );
}

// ============================================================================
// Fallbacks
// ============================================================================

#[test]
fn missing_document_falls_back_with_two_notices() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.json");

    let outcome = load_or_fallback(&path);

    assert_eq!(outcome.document.site, DEFAULT_SITE);
    assert!(outcome.fallback_reason.is_some());
    assert_eq!(outcome.notices.len(), 2);
    assert_eq!(outcome.notices[0].style, MessageStyle::Error);
    assert!(outcome.notices[0]
        .text
        .starts_with(&format!("[ERROR] Failed to load {}: ", path.display())));
    assert_eq!(outcome.notices[1].style, MessageStyle::Info);
    assert_eq!(outcome.notices[1].text, "[INFO] Using fallback commands");
    for name in ["help", "clear", "status", "scan", "hack", "exit"] {
        assert!(outcome.document.table.get(name).is_some(), "missing {}", name);
    }
}

#[test]
fn malformed_document_falls_back() {
    let dir = TempDir::new().unwrap();
    let outcome = load_or_fallback(write_doc(&dir, "bad.json", "{ \"commands\": "));

    assert_eq!(outcome.notices.len(), 2);
    assert_eq!(outcome.document.site, DEFAULT_SITE);
}

#[test]
fn unknown_action_falls_back() {
    let dir = TempDir::new().unwrap();
    let doc = r#"{ "commands": { "dance": { "description": "x", "type": "function", "action": "dance" } } }"#;

    let outcome = load_or_fallback(write_doc(&dir, "config.json", doc));

    assert!(outcome
        .fallback_reason
        .as_deref()
        .is_some_and(|r| r.contains("dance")));
    assert!(outcome.document.table.get("dance").is_none());
}

#[test]
fn document_error_names_the_problem() {
    let err = hackterm::shell::CommandDocument::parse(
        r#"{ "commands": { "go": { "description": "x", "type": "redirect" } } }"#,
    )
    .unwrap_err();
    assert!(matches!(err, CommandTableError::MissingField { .. }));
}
