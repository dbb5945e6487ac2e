//! Shared helpers for `cargo-l10n` integration tests.

use anyhow::{Result, anyhow};
use camino::Utf8PathBuf;
use cargo_l10n::cli::SourceArgs;
use test_helpers::fs::DefinitionDir;

/// Resolves the compiled `cargo-l10n` binary path, preferring the path cargo
/// bakes in at compile time over runtime test environment variables.
///
/// # Errors
///
/// Returns an error when none of the supported cargo/nextest binary
/// environment variables are present.
pub(crate) fn cargo_l10n_exe() -> Result<Utf8PathBuf> {
    if let Some(path) = option_env!("CARGO_BIN_EXE_cargo-l10n") {
        return Ok(Utf8PathBuf::from(path));
    }
    let env_vars = [
        "CARGO_BIN_EXE_cargo-l10n",
        "CARGO_BIN_EXE_cargo_l10n",
        "NEXTEST_BIN_EXE_cargo-l10n",
        "NEXTEST_BIN_EXE_cargo_l10n",
    ];
    for var in env_vars {
        if let Ok(path) = std::env::var(var) {
            return Ok(Utf8PathBuf::from(path));
        }
    }
    Err(anyhow!("cargo-l10n binary path not found in environment"))
}

/// Source arguments reading from `dir` with no overrides.
pub(crate) fn source(dir: &DefinitionDir) -> SourceArgs {
    SourceArgs {
        input: dir.path().to_path_buf(),
        config: None,
        module: None,
        integer: None,
        pattern: None,
    }
}

/// A two-language definition set mixing every file format.
///
/// # Errors
///
/// Returns an error when a file cannot be written.
pub(crate) fn inbox() -> Result<DefinitionDir> {
    let dir = DefinitionDir::new()?;
    dir.write(
        "inbox.en.yaml",
        "\
title: Inbox
greeting: \"Hello, {name:s}\"
items:
  plural: \"count:d\"
  zero: \"No messages\"
  one: \"One message{@unread}\"
  other: \"{count} messages{@unread}\"
  vars:
    unread: \" in {folder:s}\"
",
    )?;
    dir.write(
        "inbox.de.json",
        r#"{
  "title": "Posteingang",
  "greeting": "Hallo, {name:s}",
  "items": {
    "plural": "count:d",
    "zero": "Keine Nachrichten",
    "one": "Eine Nachricht{@unread}",
    "other": "{count} Nachrichten{@unread}",
    "vars": { "unread": " in {folder:s}" }
  }
}"#,
    )?;
    dir.write("l10n.toml", "module = \"strings\"\n")?;
    Ok(dir)
}
