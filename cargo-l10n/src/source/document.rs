//! Definition documents.
//!
//! YAML, JSON and TOML files share one shape: a map from message name to
//! either a template string or a table.
//!
//! ```yaml
//! title: "Inbox"
//! items:
//!   plural: count
//!   zero: "No messages"
//!   one: "One message{@unread}"
//!   other: "{count:d} messages{@unread}"
//!   vars:
//!     unread: " ({count} unread)"
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use serde_json::{Map, Value};
use serde_saphyr::Options;

use crate::error::L10nError;

/// Serialization format of a definition file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `.yaml` or `.yml`.
    Yaml,
    /// `.json`.
    Json,
    /// `.toml`.
    Toml,
}

impl Format {
    /// Detects the format from a file extension.
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// A message or variable definition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Entry {
    /// Plain template.
    Text(String),
    /// Structured definition.
    Table(Table),
}

/// Structured message or variable definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Table {
    /// Ordered `name:spec` argument declarations.
    pub args: Vec<String>,
    /// Plain template.
    pub text: Option<String>,
    /// Driving argument of a plural, optionally as `name:spec`.
    pub plural: Option<String>,
    /// Branch for zero.
    pub zero: Option<String>,
    /// Branch for one.
    pub one: Option<String>,
    /// Branch for values above one.
    pub many: Option<String>,
    /// Default branch.
    pub other: Option<String>,
    /// Shared variables, in declaration order.
    pub vars: Map<String, Value>,
}

impl Table {
    /// Plural branches in dispatch order.
    #[must_use]
    pub fn branches(&self) -> [Option<&str>; 4] {
        [
            self.zero.as_deref(),
            self.one.as_deref(),
            self.many.as_deref(),
            self.other.as_deref(),
        ]
    }

    /// Returns `true` when any plural branch is present.
    #[must_use]
    pub fn has_branches(&self) -> bool {
        self.branches().iter().any(Option::is_some)
    }
}

/// A parsed definition file: messages in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Source path, for diagnostics.
    pub path: Utf8PathBuf,
    /// Message entries in document order.
    pub messages: Vec<(String, Entry)>,
}

impl Document {
    /// Parses `contents` as `format`.
    ///
    /// # Errors
    ///
    /// Returns a parse error for malformed input and
    /// [`L10nError::Definition`] for entries of the wrong shape.
    pub fn parse(path: &Utf8Path, format: Format, contents: &str) -> Result<Self, L10nError> {
        if contents.trim().is_empty() {
            return Ok(Self {
                path: path.to_path_buf(),
                messages: Vec::new(),
            });
        }
        let value: Value = match format {
            Format::Yaml => serde_saphyr::from_str_with_options(
                contents,
                Options {
                    strict_booleans: true,
                    ..Options::default()
                },
            )
            .map_err(|source| L10nError::Yaml {
                path: path.to_path_buf(),
                source,
            })?,
            Format::Json => serde_json::from_str(contents).map_err(|source| L10nError::Json {
                path: path.to_path_buf(),
                source,
            })?,
            Format::Toml => toml::from_str(contents).map_err(|source| L10nError::Toml {
                path: path.to_path_buf(),
                source,
            })?,
        };
        let map = match value {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(L10nError::Definition {
                    path: path.to_path_buf(),
                    message: String::new(),
                    reason: format!("expected a map of messages, found {}", kind(&other)),
                });
            }
        };
        Ok(Self {
            path: path.to_path_buf(),
            messages: entries(path, map)?,
        })
    }
}

/// Converts a map of raw values into typed entries, keeping order.
///
/// # Errors
///
/// Returns [`L10nError::Definition`] for the first entry of the wrong shape.
pub fn entries(path: &Utf8Path, map: Map<String, Value>) -> Result<Vec<(String, Entry)>, L10nError> {
    map.into_iter()
        .map(|(name, value)| match serde_json::from_value::<Entry>(value) {
            Ok(entry) => Ok((name, entry)),
            Err(err) => Err(L10nError::Definition {
                path: path.to_path_buf(),
                message: name,
                reason: format!("expected a template string or a message table: {err}"),
            }),
        })
        .collect()
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a map",
    }
}
