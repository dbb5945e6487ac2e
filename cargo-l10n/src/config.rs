//! Project configuration.
//!
//! Settings come from an optional `l10n.toml` next to the definition files
//! and are overridden by command-line flags. The result is resolved once and
//! passed by value into compilation.
//!
//! ```toml
//! module = "l10n"
//! integer = "u64"
//! pattern = '([a-z_]+)\.([a-z_]+)\.(yaml|yml|json|toml)'
//!
//! [specifiers]
//! m = "crate::Money"
//! ```

use std::collections::BTreeMap;

use camino::Utf8Path;
use l10n_codegen::ir::{SemanticType, TypePath};
use l10n_codegen::{CodegenConfig, IntegerWidth};
use serde::Deserialize;

use crate::discover::DEFAULT_PATTERN;
use crate::error::L10nError;
use crate::fs_helpers;

/// Name of the configuration file looked up in the input directory.
pub const CONFIG_FILE: &str = "l10n.toml";

/// Maps placeholder specifier characters to semantic types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specifiers(BTreeMap<char, SemanticType>);

impl Default for Specifiers {
    fn default() -> Self {
        Self(BTreeMap::from([
            ('s', SemanticType::Text),
            ('d', SemanticType::Integer),
            ('f', SemanticType::Float),
            ('v', SemanticType::Display),
        ]))
    }
}

impl Specifiers {
    /// Type bound to `spec`.
    #[must_use]
    pub fn get(&self, spec: char) -> Option<&SemanticType> {
        self.0.get(&spec)
    }

    /// Binds `spec` to `ty`, replacing any previous binding.
    pub fn insert(&mut self, spec: char, ty: SemanticType) {
        self.0.insert(spec, ty);
    }

    /// Reads a type name: `text`, `integer`, `float`, `display` or a type
    /// path.
    #[must_use]
    pub fn parse_type(raw: &str) -> SemanticType {
        match raw.trim() {
            "text" => SemanticType::Text,
            "integer" => SemanticType::Integer,
            "float" => SemanticType::Float,
            "display" => SemanticType::Display,
            path => SemanticType::Custom(TypePath::new(path)),
        }
    }
}

/// Flags that override file settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Generated module name.
    pub module: Option<String>,
    /// Integer representation.
    pub integer: Option<IntegerWidth>,
    /// Definition file-name pattern.
    pub pattern: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    module: Option<String>,
    integer: Option<String>,
    pattern: Option<String>,
    specifiers: BTreeMap<String, String>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Settings passed to the compiler.
    pub codegen: CodegenConfig,
    /// Placeholder specifier table.
    pub specifiers: Specifiers,
    /// Regular expression selecting definition files.
    pub pattern: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            codegen: CodegenConfig::default(),
            specifiers: Specifiers::default(),
            pattern: DEFAULT_PATTERN.to_owned(),
        }
    }
}

impl ProjectConfig {
    /// Loads `path`, or `<input>/l10n.toml` when no path is given, then
    /// applies `overrides`. A missing default file yields the defaults; a
    /// missing explicit file is an error.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read, does not parse or holds
    /// invalid values.
    pub fn load(
        input: &Utf8Path,
        path: Option<&Utf8Path>,
        overrides: &Overrides,
    ) -> Result<Self, L10nError> {
        let (file, required) = path.map_or_else(
            || (input.join(CONFIG_FILE), false),
            |explicit| (explicit.to_path_buf(), true),
        );
        let config = match fs_helpers::read_optional(&file)? {
            Some(contents) => Self::from_toml(&file, &contents)?,
            None if required => {
                return Err(L10nError::io(file)(std::io::Error::from(
                    std::io::ErrorKind::NotFound,
                )));
            }
            None => Self::default(),
        };
        tracing::debug!(path = %file, module = %config.codegen.module, "resolved configuration");
        Ok(config.with_overrides(overrides))
    }

    /// Parses configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`L10nError::Toml`] for malformed TOML and
    /// [`L10nError::Config`] for invalid values.
    pub fn from_toml(path: &Utf8Path, contents: &str) -> Result<Self, L10nError> {
        let raw: FileConfig = toml::from_str(contents).map_err(|source| L10nError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        let invalid = |reason: String| L10nError::Config {
            path: path.to_path_buf(),
            reason,
        };
        let mut config = Self::default();
        if let Some(module) = raw.module {
            config.codegen.module = module;
        }
        if let Some(integer) = raw.integer {
            config.codegen.integer = integer.parse().map_err(invalid)?;
        }
        if let Some(pattern) = raw.pattern {
            config.pattern = pattern;
        }
        for (key, ty) in raw.specifiers {
            let mut chars = key.chars();
            let (Some(spec), None) = (chars.next(), chars.next()) else {
                return Err(invalid(format!(
                    "specifier '{key}' must be a single character"
                )));
            };
            config.specifiers.insert(spec, Specifiers::parse_type(&ty));
        }
        Ok(config)
    }

    /// Applies command-line overrides.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        if let Some(module) = &overrides.module {
            self.codegen.module.clone_from(module);
        }
        if let Some(integer) = overrides.integer {
            self.codegen.integer = integer;
        }
        if let Some(pattern) = &overrides.pattern {
            self.pattern.clone_from(pattern);
        }
        self
    }
}
