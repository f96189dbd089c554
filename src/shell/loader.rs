//! Command document loading
//!
//! A command document is JSON:
//!
//! ```json
//! {
//!   "site": "hacker-system",
//!   "commands": {
//!     "help":   { "description": "Show available commands", "type": "function", "action": "help" },
//!     "whoami": { "description": "Display current user", "type": "info", "response": "root" },
//!     "blog":   { "description": "Open the blog", "type": "redirect",
//!                 "message": "Redirecting to blog...", "url": "https://example.com" }
//!   }
//! }
//! ```
//!
//! Command order is document order (serde_json is built with
//! `preserve_order`).

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::builtin::fallback_table;
use super::{BuiltinAction, Command, CommandKind, CommandTable};
use crate::player::Message;

/// Site name used when the document does not set one.
pub const DEFAULT_SITE: &str = "hacker-system";

/// Why a command document could not be used.
#[derive(Debug, thiserror::Error)]
pub enum CommandTableError {
    #[error("{0}")]
    Read(#[from] std::io::Error),

    #[error("invalid command document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("command '{command}' has unknown action '{action}'")]
    UnknownAction { command: String, action: String },

    #[error("command '{command}' is missing '{field}'")]
    MissingField {
        command: String,
        field: &'static str,
    },
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    site: Option<String>,
    commands: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCommand {
    description: String,
    #[serde(rename = "type")]
    kind: Option<String>,
    response: Option<String>,
    action: Option<String>,
    message: Option<String>,
    url: Option<String>,
}

/// A parsed command document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDocument {
    pub site: String,
    pub table: CommandTable,
}

impl CommandDocument {
    /// Parse a document from JSON text.
    pub fn parse(json: &str) -> Result<Self, CommandTableError> {
        let raw: RawDocument = serde_json::from_str(json)?;

        let mut table = CommandTable::new();
        for (name, value) in raw.commands {
            let command: RawCommand = serde_json::from_value(value)?;
            table.insert(build_command(&name, command)?);
        }

        let site = raw
            .site
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SITE.to_string());
        Ok(Self { site, table })
    }

    /// Read and parse a document from disk.
    pub fn load(path: &Path) -> Result<Self, CommandTableError> {
        let json = fs::read_to_string(path)?;
        Self::parse(&json)
    }

    /// The built-in fallback document.
    pub fn fallback() -> Self {
        Self {
            site: DEFAULT_SITE.to_string(),
            table: fallback_table(),
        }
    }
}

fn build_command(name: &str, raw: RawCommand) -> Result<Command, CommandTableError> {
    let kind = match raw.kind.as_deref().unwrap_or("info") {
        "function" => {
            // Without an explicit action the command name is the action
            let tag = raw.action.as_deref().unwrap_or(name);
            let action =
                BuiltinAction::from_tag(tag).ok_or_else(|| CommandTableError::UnknownAction {
                    command: name.to_string(),
                    action: tag.to_string(),
                })?;
            CommandKind::Builtin(action)
        }
        "redirect" => {
            let url = raw
                .url
                .filter(|u| !u.trim().is_empty())
                .ok_or_else(|| CommandTableError::MissingField {
                    command: name.to_string(),
                    field: "url",
                })?;
            let message = raw
                .message
                .unwrap_or_else(|| format!("Redirecting to {}...", url));
            CommandKind::Redirect { message, url }
        }
        other => {
            if other != "info" {
                tracing::warn!("command '{}' has unknown type '{}', treating as info", name, other);
            }
            CommandKind::Static(raw.response.unwrap_or_else(|| raw.description.clone()))
        }
    };
    Ok(Command::new(name, raw.description, kind))
}

/// Result of loading a command document with fallback.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub document: CommandDocument,
    /// Messages to show at once before the session starts
    pub notices: Vec<Message>,
    /// Set when the fallback table is in use
    pub fallback_reason: Option<String>,
}

/// Load the document at `path`, falling back to the built-in set.
///
/// Never fails: on any error the reason is logged and returned as a pair of
/// notices for the transcript.
pub fn load_or_fallback(path: impl Into<PathBuf>) -> LoadOutcome {
    let path = path.into();
    match CommandDocument::load(&path) {
        Ok(document) => {
            tracing::info!(
                "loaded {} commands from {}",
                document.table.len(),
                path.display()
            );
            LoadOutcome {
                document,
                notices: Vec::new(),
                fallback_reason: None,
            }
        }
        Err(e) => {
            tracing::warn!("failed to load {}: {}", path.display(), e);
            let reason = e.to_string();
            LoadOutcome {
                document: CommandDocument::fallback(),
                notices: vec![
                    Message::error(format!(
                        "[ERROR] Failed to load {}: {}",
                        path.display(),
                        reason
                    )),
                    Message::info("[INFO] Using fallback commands"),
                ],
                fallback_reason: Some(reason),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::MessageStyle;

    const DOC: &str = r#"{
        "site": "neo",
        "commands": {
            "Help":   { "description": "Show available commands", "type": "function", "action": "help" },
            "whoami": { "description": "Display current user", "type": "info", "response": "root" },
            "about":  { "description": "About this site" },
            "clear":  { "description": "Clear the terminal", "type": "function" },
            "blog":   { "description": "Open the blog", "type": "redirect",
                        "message": "Redirecting to blog...", "url": "https://example.com" }
        }
    }"#;

    #[test]
    fn parses_all_command_kinds_in_order() {
        let doc = CommandDocument::parse(DOC).unwrap();

        assert_eq!(doc.site, "neo");
        let names: Vec<&str> = doc.table.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["help", "whoami", "about", "clear", "blog"]);

        let kind = |name: &str| doc.table.get(name).unwrap().kind.clone();
        assert_eq!(kind("help"), CommandKind::Builtin(BuiltinAction::Help));
        assert_eq!(kind("whoami"), CommandKind::Static("root".into()));
        assert_eq!(kind("about"), CommandKind::Static("About this site".into()));
        assert_eq!(kind("clear"), CommandKind::Builtin(BuiltinAction::Clear));
        assert_eq!(
            kind("blog"),
            CommandKind::Redirect {
                message: "Redirecting to blog...".into(),
                url: "https://example.com".into()
            }
        );
    }

    #[test]
    fn missing_site_uses_default() {
        let doc = CommandDocument::parse(r#"{ "commands": {} }"#).unwrap();
        assert_eq!(doc.site, DEFAULT_SITE);
        assert!(doc.table.is_empty());
    }

    #[test]
    fn unknown_action_is_rejected() {
        let err = CommandDocument::parse(
            r#"{ "commands": { "todo": { "description": "x", "type": "function" } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, CommandTableError::UnknownAction { .. }));
        assert_eq!(err.to_string(), "command 'todo' has unknown action 'todo'");
    }

    #[test]
    fn redirect_without_url_is_rejected() {
        let err = CommandDocument::parse(
            r#"{ "commands": { "blog": { "description": "x", "type": "redirect" } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, CommandTableError::MissingField { field: "url", .. }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = CommandDocument::parse("{ not json").unwrap_err();
        assert!(matches!(err, CommandTableError::Parse(_)));
    }

    #[test]
    fn missing_file_falls_back_with_notices() {
        let outcome = load_or_fallback("/definitely/not/here/config.json");

        assert!(outcome.fallback_reason.is_some());
        assert_eq!(outcome.document, CommandDocument::fallback());
        assert_eq!(outcome.notices.len(), 2);
        assert_eq!(outcome.notices[0].style, MessageStyle::Error);
        assert!(outcome.notices[0]
            .text
            .starts_with("[ERROR] Failed to load /definitely/not/here/config.json: "));
        assert_eq!(outcome.notices[1], Message::info("[INFO] Using fallback commands"));
    }
}
