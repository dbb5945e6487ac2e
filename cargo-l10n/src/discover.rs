//! Definition file discovery.
//!
//! Files directly inside the input directory whose whole name matches the
//! file-name pattern are grouped by language. Languages are returned in
//! sorted order and each language's files in sorted file-name order, so
//! output is stable across platforms.

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;

use crate::error::L10nError;
use crate::fs_helpers;
use crate::source::document::{Document, Format};

/// Pattern used when neither `--pattern` nor `l10n.toml` sets one.
pub const DEFAULT_PATTERN: &str = r"([a-z_]+)\.([a-z_]+)\.(yaml|yml|json|toml)";

/// A definition file found in the input directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionFile {
    /// File name relative to the input directory.
    pub name: String,
    /// Serialization format.
    pub format: Format,
}

/// Definition files of one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageFiles {
    /// Language identifier taken from the file names.
    pub language: String,
    /// Files in sorted order.
    pub files: Vec<DefinitionFile>,
}

/// Compiled file-name pattern.
///
/// Capture groups 1, 2 and 3 hold the base name, the language and the
/// extension. The pattern must match the whole file name.
#[derive(Debug, Clone)]
pub struct FileNamePattern {
    source: String,
    regex: Regex,
}

impl FileNamePattern {
    /// Compiles `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`L10nError::Pattern`] when `pattern` is not a valid regular
    /// expression or has fewer than three capture groups.
    pub fn new(pattern: &str) -> Result<Self, L10nError> {
        let invalid = |reason: String| L10nError::Pattern {
            pattern: pattern.to_owned(),
            reason,
        };
        let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|err| invalid(err.to_string()))?;
        // Group 0 is the whole match.
        if regex.captures_len() < 4 {
            return Err(invalid(
                "expected capture groups for name, language and extension".to_owned(),
            ));
        }
        Ok(Self {
            source: pattern.to_owned(),
            regex,
        })
    }

    /// Pattern text as given.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Splits a definition file name into its language and format.
    ///
    /// Returns `None` when the name does not match, a group is empty or the
    /// extension is not a supported format.
    #[must_use]
    pub fn parse<'n>(&self, name: &'n str) -> Option<(&'n str, Format)> {
        let captures = self.regex.captures(name)?;
        let stem = captures.get(1)?.as_str();
        let language = captures.get(2)?.as_str();
        let format = Format::from_extension(captures.get(3)?.as_str())?;
        (!stem.is_empty() && !language.is_empty()).then_some((language, format))
    }
}

/// Lists the definition files in `input` whose names match `pattern`.
///
/// # Errors
///
/// Returns [`L10nError::NoDefinitions`] when the directory is missing or
/// holds no definition files, and [`L10nError::Io`] when it cannot be read.
pub fn discover(
    input: &Utf8Path,
    pattern: &FileNamePattern,
) -> Result<Vec<LanguageFiles>, L10nError> {
    let Some(dir) = fs_helpers::open_optional_dir(input)? else {
        return Err(L10nError::NoDefinitions(input.to_path_buf()));
    };
    let mut grouped: BTreeMap<String, Vec<DefinitionFile>> = BTreeMap::new();
    for item in dir.entries().map_err(L10nError::io(input))? {
        let entry = item.map_err(L10nError::io(input))?;
        if !entry.file_type().map_err(L10nError::io(input))?.is_file() {
            continue;
        }
        let name = entry.file_name().map_err(L10nError::io(input))?;
        let Some((language, format)) = pattern.parse(&name) else {
            tracing::debug!(file = %name, pattern = pattern.as_str(), "skipping non-definition file");
            continue;
        };
        grouped
            .entry(language.to_owned())
            .or_default()
            .push(DefinitionFile { name, format });
    }
    if grouped.is_empty() {
        return Err(L10nError::NoDefinitions(input.to_path_buf()));
    }
    Ok(grouped
        .into_iter()
        .map(|(language, mut files)| {
            files.sort_by(|a, b| a.name.cmp(&b.name));
            tracing::debug!(%language, files = files.len(), "discovered language");
            LanguageFiles { language, files }
        })
        .collect())
}

/// Reads and parses every file of one language.
///
/// # Errors
///
/// Returns every read or parse failure, aggregated.
pub fn read_documents(
    input: &Utf8Path,
    language: &LanguageFiles,
) -> Result<Vec<Document>, L10nError> {
    let Some(dir) = fs_helpers::open_optional_dir(input)? else {
        return Err(L10nError::NoDefinitions(input.to_path_buf()));
    };
    let mut documents = Vec::with_capacity(language.files.len());
    let mut errors = Vec::new();
    for file in &language.files {
        let path: Utf8PathBuf = input.join(&file.name);
        let parsed = dir
            .read_to_string(&file.name)
            .map_err(L10nError::io(path.clone()))
            .and_then(|contents| Document::parse(&path, file.format, &contents));
        match parsed {
            Ok(document) => documents.push(document),
            Err(err) => errors.push(err),
        }
    }
    L10nError::try_aggregate(errors).map_or(Ok(documents), Err)
}
